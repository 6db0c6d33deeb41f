//! Static operator descriptors used to select and validate variants at
//! tree-construction time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::DataType;

/// Maximum number of arguments a vectorized expression can declare.
pub const MAX_NUM_ARGUMENTS: usize = 3;

/// Evaluation mode of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Writes an output column.
    Projection,
    /// Narrows the batch's active rows.
    Filter,
}

/// Class of SQL types accepted at one argument position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArgumentType {
    IntFamily,
    FloatFamily,
    /// Integer or floating point.
    NumericFamily,
    Decimal,
    StringFamily,
    Binary,
    Date,
    Timestamp,
    /// String family, date or timestamp.
    StringDatetimeFamily,
    Any,
}

impl ArgumentType {
    /// Returns whether `data_type` belongs to this class.
    #[must_use]
    pub fn accepts(&self, data_type: &DataType) -> bool {
        match self {
            ArgumentType::IntFamily => data_type.is_integer(),
            ArgumentType::FloatFamily => data_type.is_float(),
            ArgumentType::NumericFamily => data_type.is_integer() || data_type.is_float(),
            ArgumentType::Decimal => matches!(data_type, DataType::Decimal { .. }),
            ArgumentType::StringFamily => data_type.is_string_family(),
            ArgumentType::Binary => matches!(data_type, DataType::Binary),
            ArgumentType::Date => matches!(data_type, DataType::Date),
            ArgumentType::Timestamp => matches!(data_type, DataType::Timestamp),
            ArgumentType::StringDatetimeFamily => {
                data_type.is_string_family()
                    || matches!(data_type, DataType::Date | DataType::Timestamp)
            }
            ArgumentType::Any => true,
        }
    }
}

/// Whether an argument is read from a column or bound as a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputExpressionType {
    Column,
    Scalar,
}

/// Static shape of an operator: mode, argument type classes and input kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Descriptor {
    mode: Mode,
    argument_types: Vec<ArgumentType>,
    input_types: Vec<InputExpressionType>,
}

impl Descriptor {
    /// Starts building a descriptor.
    #[must_use]
    pub fn builder() -> DescriptorBuilder {
        DescriptorBuilder::default()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn num_arguments(&self) -> usize {
        self.argument_types.len()
    }

    #[must_use]
    pub fn argument_types(&self) -> &[ArgumentType] {
        &self.argument_types
    }

    #[must_use]
    pub fn input_types(&self) -> &[InputExpressionType] {
        &self.input_types
    }

    /// Returns whether a call with these argument types and kinds fits this descriptor.
    #[must_use]
    pub fn matches(
        &self,
        mode: Mode,
        types: &[DataType],
        inputs: &[InputExpressionType],
    ) -> bool {
        self.mode == mode
            && types.len() == self.argument_types.len()
            && inputs == self.input_types.as_slice()
            && self
                .argument_types
                .iter()
                .zip(types)
                .all(|(class, data_type)| class.accepts(data_type))
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}(", self.mode)?;
        for (i, (arg, input)) in self
            .argument_types
            .iter()
            .zip(&self.input_types)
            .enumerate()
        {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg:?} {input:?}")?;
        }
        write!(f, ")")
    }
}

/// Builder for [`Descriptor`].
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    mode: Mode,
    argument_types: Vec<ArgumentType>,
    input_types: Vec<InputExpressionType>,
}

impl Default for DescriptorBuilder {
    fn default() -> Self {
        DescriptorBuilder {
            mode: Mode::Projection,
            argument_types: Vec::new(),
            input_types: Vec::new(),
        }
    }
}

impl DescriptorBuilder {
    #[must_use]
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the argument type classes, one per position.
    #[must_use]
    pub fn argument_types(mut self, types: &[ArgumentType]) -> Self {
        self.argument_types = types.to_vec();
        self
    }

    /// Sets the input kind per position.
    #[must_use]
    pub fn input_types(mut self, inputs: &[InputExpressionType]) -> Self {
        self.input_types = inputs.to_vec();
        self
    }

    /// Finishes the descriptor.
    ///
    /// Positions without an explicit input kind default to `Column`; extra
    /// positions beyond [`MAX_NUM_ARGUMENTS`] are dropped.
    #[must_use]
    pub fn build(mut self) -> Descriptor {
        self.argument_types.truncate(MAX_NUM_ARGUMENTS);
        self.input_types
            .resize(self.argument_types.len(), InputExpressionType::Column);
        Descriptor {
            mode: self.mode,
            argument_types: self.argument_types,
            input_types: self.input_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col_scalar_int() -> Descriptor {
        Descriptor::builder()
            .mode(Mode::Projection)
            .argument_types(&[ArgumentType::IntFamily, ArgumentType::IntFamily])
            .input_types(&[InputExpressionType::Column, InputExpressionType::Scalar])
            .build()
    }

    #[test]
    fn test_matches_signature() {
        let d = col_scalar_int();
        assert_eq!(d.num_arguments(), 2);
        assert!(d.matches(
            Mode::Projection,
            &[DataType::Int, DataType::BigInt],
            &[InputExpressionType::Column, InputExpressionType::Scalar],
        ));
        assert!(!d.matches(
            Mode::Projection,
            &[DataType::Double, DataType::BigInt],
            &[InputExpressionType::Column, InputExpressionType::Scalar],
        ));
        assert!(!d.matches(
            Mode::Projection,
            &[DataType::Int, DataType::BigInt],
            &[InputExpressionType::Scalar, InputExpressionType::Column],
        ));
        assert!(!d.matches(
            Mode::Filter,
            &[DataType::Int, DataType::BigInt],
            &[InputExpressionType::Column, InputExpressionType::Scalar],
        ));
    }

    #[test]
    fn test_string_datetime_family() {
        let class = ArgumentType::StringDatetimeFamily;
        assert!(class.accepts(&DataType::Varchar(12)));
        assert!(class.accepts(&DataType::Date));
        assert!(class.accepts(&DataType::Timestamp));
        assert!(!class.accepts(&DataType::BigInt));
    }

    #[test]
    fn test_builder_defaults_input_kind() {
        let d = Descriptor::builder()
            .argument_types(&[ArgumentType::StringFamily])
            .build();
        assert_eq!(d.input_types(), &[InputExpressionType::Column]);
        assert_eq!(d.to_string(), "Projection(StringFamily Column)");
    }
}
