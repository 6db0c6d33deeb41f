//! Unit tests for vexec's public building blocks.

use vexec::executor::vectorized::{
    ArgumentType, Descriptor, InputExpressionType, Mode, VectorizedRowBatch,
};
use vexec::storage::{ColumnData, ColumnVector};
use vexec::types::{ColumnKind, DataType, ScalarValue};
use vexec::{EvaluatorConfig, VexError, DEFAULT_BATCH_SIZE};

// =============================================================================
// Error Tests
// =============================================================================

mod error_tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = VexError::UnexpectedScalar {
            operator: "LongColDivideLongScalar".into(),
            value: ScalarValue::Double(1.5).to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected scalar 1.5 for LongColDivideLongScalar"
        );

        let err = VexError::ColumnKindMismatch {
            column: 3,
            expected: ColumnKind::Double,
            actual: ColumnKind::Long,
        };
        assert_eq!(err.to_string(), "Column 3 has kind long, expected double");

        let err = VexError::ScalarParse {
            value: "x".into(),
            target: "date",
        };
        assert_eq!(err.to_string(), "Cannot parse scalar \"x\" as date");
    }

    #[test]
    fn test_errors_are_cloneable() {
        let err = VexError::ColumnAliasing(2);
        assert_eq!(err.clone(), err);
    }
}

// =============================================================================
// Type Tests
// =============================================================================

mod type_tests {
    use super::*;

    #[test]
    fn test_string_family() {
        assert!(DataType::Char(3).is_string_family());
        assert!(DataType::Varchar(3).is_string_family());
        assert!(!DataType::Binary.is_string_family());
    }

    #[test]
    fn test_scalar_kind() {
        assert_eq!(
            ScalarValue::Timestamp(0).column_kind(),
            Some(ColumnKind::Timestamp)
        );
        assert_eq!(ScalarValue::Decimal(5).column_kind(), Some(ColumnKind::Decimal));
    }
}

// =============================================================================
// Descriptor Tests
// =============================================================================

mod descriptor_tests {
    use super::*;

    #[test]
    fn test_extra_arguments_truncated() {
        let d = Descriptor::builder()
            .mode(Mode::Filter)
            .argument_types(&[ArgumentType::Any; 5])
            .build();
        assert_eq!(d.num_arguments(), 3);
        assert_eq!(d.input_types().len(), 3);
        assert_eq!(d.mode(), Mode::Filter);
    }

    #[test]
    fn test_decimal_class() {
        let d = Descriptor::builder()
            .argument_types(&[ArgumentType::Decimal])
            .input_types(&[InputExpressionType::Scalar])
            .build();
        assert!(d.matches(
            Mode::Projection,
            &[DataType::Decimal {
                precision: 10,
                scale: 2
            }],
            &[InputExpressionType::Scalar],
        ));
        assert!(!d.matches(
            Mode::Projection,
            &[DataType::Double],
            &[InputExpressionType::Scalar],
        ));
    }
}

// =============================================================================
// Batch Tests
// =============================================================================

mod batch_tests {
    use super::*;

    #[test]
    fn test_selection_validation() {
        let mut batch = VectorizedRowBatch::new(&[ColumnKind::Long], 4);
        assert!(batch.set_selection(&[0, 2, 3]).is_ok());
        assert_eq!(batch.size, 3);
        assert!(matches!(
            batch.set_selection(&[2, 1]),
            Err(VexError::InvalidSelection(_))
        ));
        assert!(matches!(
            batch.set_selection(&[4]),
            Err(VexError::InvalidSelection(_))
        ));
        assert!(batch.set_size(5).is_err());
    }

    #[test]
    fn test_for_types_keeps_decimal_shape() {
        let batch = VectorizedRowBatch::for_types(
            &[
                DataType::Date,
                DataType::Decimal {
                    precision: 12,
                    scale: 3,
                },
            ],
            DEFAULT_BATCH_SIZE,
        );
        assert_eq!(batch.num_columns(), 2);
        assert_eq!(batch.capacity(), DEFAULT_BATCH_SIZE);
        assert_eq!(batch.cols[0].kind(), ColumnKind::Long);
        let decimal = batch.cols[1].data.decimals(1).expect("decimals");
        assert_eq!((decimal.precision, decimal.scale), (12, 3));
    }

    #[test]
    fn test_column_lookup_out_of_range() {
        let batch = VectorizedRowBatch::new(&[ColumnKind::Double], 2);
        assert_eq!(
            batch.column(1).unwrap_err(),
            VexError::ColumnOutOfRange {
                column: 1,
                width: 1
            }
        );
    }

    #[test]
    fn test_mismatched_capacities_rejected() {
        let err = VectorizedRowBatch::from_columns(vec![
            ColumnVector::new(ColumnKind::Long, 2),
            ColumnVector::new(ColumnKind::Long, 3),
        ])
        .unwrap_err();
        assert!(matches!(err, VexError::InvalidSelection(_)));
    }
}

// =============================================================================
// Column Tests
// =============================================================================

mod column_tests {
    use super::*;

    #[test]
    fn test_kind_accessor_mismatch() {
        let col = ColumnVector::new(ColumnKind::Bytes, 1);
        assert!(matches!(
            col.data.longs(4),
            Err(VexError::ColumnKindMismatch {
                column: 4,
                expected: ColumnKind::Long,
                actual: ColumnKind::Bytes,
            })
        ));
        assert!(matches!(col.data, ColumnData::Bytes(_)));
    }
}

// =============================================================================
// Config Tests
// =============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = EvaluatorConfig::default();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.with_parallelism(2).parallelism, 2);
    }

    #[test]
    fn test_batch_size_shapes_batches() {
        let config = EvaluatorConfig::new().with_batch_size(256);
        let batch = VectorizedRowBatch::for_config(&[DataType::Date, DataType::String], &config);
        assert_eq!(batch.capacity(), 256);
        assert_eq!(batch.cols[1].kind(), ColumnKind::Bytes);

        let err = VexError::BatchTooLarge {
            index: 0,
            capacity: 1024,
            batch_size: 256,
        };
        assert_eq!(
            err.to_string(),
            "Batch 0 has capacity 1024, configured batch size is 256"
        );
    }
}
