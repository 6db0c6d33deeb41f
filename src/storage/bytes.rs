//! Variable-width byte storage for string-family columns.

/// Byte payload of a column: one shared append buffer plus a
/// `(start, length)` window per slot.
///
/// Writers call [`BytesData::init_buffer`] once per pass before setting
/// values; slots written earlier in the pass stay valid while the buffer grows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BytesData {
    buffer: Vec<u8>,
    start: Vec<usize>,
    length: Vec<usize>,
}

impl BytesData {
    /// Creates storage for `capacity` empty slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        BytesData {
            buffer: Vec::new(),
            start: vec![0; capacity],
            length: vec![0; capacity],
        }
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.start.len()
    }

    /// Discards previously written bytes, keeping the allocation.
    pub fn init_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Copies `value` into the shared buffer and points slot `row` at it.
    pub fn set_val(&mut self, row: usize, value: &[u8]) {
        self.start[row] = self.buffer.len();
        self.length[row] = value.len();
        self.buffer.extend_from_slice(value);
    }

    /// Returns the bytes of slot `row`.
    ///
    /// A slot not rewritten since the last [`BytesData::init_buffer`] may
    /// point past the buffer; it reads as empty.
    #[must_use]
    pub fn get(&self, row: usize) -> &[u8] {
        let start = self.start[row];
        self.buffer
            .get(start..start + self.length[row])
            .unwrap_or(&[])
    }

    /// Total bytes held in the shared buffer.
    #[must_use]
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}
