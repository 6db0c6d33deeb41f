//! Plan-time lookup of vectorized operator variants.
//!
//! A plan describes each call as an [`ExpressionSpec`]: a function identity,
//! typed arguments (column references or bound literals) and an output
//! column. [`VectorExpressionRegistry::bind`] picks the variant whose
//! [`Descriptor`] matches the call's mode, argument types and input kinds and
//! constructs it. Specs are plain data and can be shipped as bincode bytes.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, VexError};
use crate::expressions::{
    ArithmeticOp, ColScalarArithmetic, CompareOp, ConstantVectorExpression, DateDiffColScalar,
    DateDiffScalarCol, FilterLongColCompareLongScalar, IdentityExpression,
    LongColDivideLongColumn, LongColDivideLongScalar, LongScalarDivideLongColumn, Lower, Ltrim,
    Reverse, Rtrim, SelectColumnIsNotNull, StringUnaryUdf, Trim, UnaryStringFunction, Upper,
};
use crate::types::{DataType, ScalarValue};

use super::descriptor::{Descriptor, InputExpressionType, Mode};
use super::expression::VectorExpression;

/// Function identity as it appears in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionName {
    Divide,
    Add,
    Subtract,
    Multiply,
    DateDiff,
    Upper,
    Lower,
    Trim,
    Ltrim,
    Rtrim,
    Reverse,
    Compare(CompareOp),
    IsNotNull,
    Column,
    Constant,
}

impl FunctionName {
    /// Mode the function is evaluated in.
    #[must_use]
    pub fn mode(&self) -> Mode {
        match self {
            FunctionName::Compare(_) | FunctionName::IsNotNull => Mode::Filter,
            _ => Mode::Projection,
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionName::Divide => write!(f, "divide"),
            FunctionName::Add => write!(f, "add"),
            FunctionName::Subtract => write!(f, "subtract"),
            FunctionName::Multiply => write!(f, "multiply"),
            FunctionName::DateDiff => write!(f, "datediff"),
            FunctionName::Upper => write!(f, "upper"),
            FunctionName::Lower => write!(f, "lower"),
            FunctionName::Trim => write!(f, "trim"),
            FunctionName::Ltrim => write!(f, "ltrim"),
            FunctionName::Rtrim => write!(f, "rtrim"),
            FunctionName::Reverse => write!(f, "reverse"),
            FunctionName::Compare(op) => write!(f, "compare({op:?})"),
            FunctionName::IsNotNull => write!(f, "isnotnull"),
            FunctionName::Column => write!(f, "column"),
            FunctionName::Constant => write!(f, "constant"),
        }
    }
}

/// One argument of a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArgumentSpec {
    /// Read from batch column `ordinal`.
    Column { ordinal: usize, data_type: DataType },
    /// Bound literal.
    Scalar {
        value: ScalarValue,
        data_type: DataType,
    },
}

impl ArgumentSpec {
    #[must_use]
    pub fn column(ordinal: usize, data_type: DataType) -> Self {
        ArgumentSpec::Column { ordinal, data_type }
    }

    #[must_use]
    pub fn scalar(value: ScalarValue, data_type: DataType) -> Self {
        ArgumentSpec::Scalar { value, data_type }
    }

    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            ArgumentSpec::Column { data_type, .. } | ArgumentSpec::Scalar { data_type, .. } => {
                *data_type
            }
        }
    }

    #[must_use]
    pub fn input_type(&self) -> InputExpressionType {
        match self {
            ArgumentSpec::Column { .. } => InputExpressionType::Column,
            ArgumentSpec::Scalar { .. } => InputExpressionType::Scalar,
        }
    }
}

impl fmt::Display for ArgumentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentSpec::Column { data_type, .. } => write!(f, "column {data_type}"),
            ArgumentSpec::Scalar { data_type, .. } => write!(f, "scalar {data_type}"),
        }
    }
}

/// Serializable description of one expression node and its subtree.
///
/// Children are evaluated before the node itself; a parent reads a child's
/// result through a column argument naming the child's output column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionSpec {
    pub function: FunctionName,
    pub args: Vec<ArgumentSpec>,
    /// None for filters and column references.
    pub output_column: Option<usize>,
    pub children: Vec<ExpressionSpec>,
}

impl ExpressionSpec {
    #[must_use]
    pub fn new(
        function: FunctionName,
        args: Vec<ArgumentSpec>,
        output_column: Option<usize>,
    ) -> Self {
        ExpressionSpec {
            function,
            args,
            output_column,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<ExpressionSpec>) -> Self {
        self.children = children;
        self
    }

    /// Encodes the spec tree with bincode.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decodes a spec tree produced by [`ExpressionSpec::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns a serialization error for malformed input.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    fn signature(&self) -> String {
        self.args
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Column ordinal and type of argument `position`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidExpression` if that argument is missing or a literal.
    pub fn column_arg(&self, position: usize) -> Result<(usize, DataType)> {
        match self.args.get(position) {
            Some(ArgumentSpec::Column { ordinal, data_type }) => Ok((*ordinal, *data_type)),
            _ => Err(VexError::InvalidExpression(format!(
                "{}: argument {position} must be a column",
                self.function
            ))),
        }
    }

    /// Literal and declared type of argument `position`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidExpression` if that argument is missing or a column.
    pub fn scalar_arg(&self, position: usize) -> Result<(&ScalarValue, DataType)> {
        match self.args.get(position) {
            Some(ArgumentSpec::Scalar { value, data_type }) => Ok((value, *data_type)),
            _ => Err(VexError::InvalidExpression(format!(
                "{}: argument {position} must be a scalar",
                self.function
            ))),
        }
    }

    /// # Errors
    ///
    /// Returns `InvalidExpression` if no output column was given.
    pub fn output(&self) -> Result<usize> {
        self.output_column.ok_or_else(|| {
            VexError::InvalidExpression(format!("{}: missing output column", self.function))
        })
    }
}

type Builder = Box<dyn Fn(&ExpressionSpec) -> Result<Box<dyn VectorExpression>> + Send + Sync>;

struct Variant {
    name: &'static str,
    descriptor: Descriptor,
    build: Builder,
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variant")
            .field("name", &self.name)
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Maps function identity and call signature to a concrete operator.
#[derive(Debug)]
pub struct VectorExpressionRegistry {
    variants: HashMap<FunctionName, Vec<Variant>>,
}

impl Default for VectorExpressionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorExpressionRegistry {
    /// Creates a registry holding every built-in operator.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = VectorExpressionRegistry {
            variants: HashMap::new(),
        };
        registry.register_builtins();
        registry
    }

    /// Adds a variant for `function`. Earlier registrations win on overlap.
    pub fn register<F>(
        &mut self,
        function: FunctionName,
        name: &'static str,
        descriptor: Descriptor,
        build: F,
    ) where
        F: Fn(&ExpressionSpec) -> Result<Box<dyn VectorExpression>> + Send + Sync + 'static,
    {
        self.variants.entry(function).or_default().push(Variant {
            name,
            descriptor,
            build: Box::new(build),
        });
    }

    /// Descriptors registered for `function`, in lookup order.
    #[must_use]
    pub fn descriptors(&self, function: FunctionName) -> Vec<&Descriptor> {
        self.variants
            .get(&function)
            .map(|variants| variants.iter().map(|v| &v.descriptor).collect())
            .unwrap_or_default()
    }

    /// Builds the operator tree described by `spec`, children first.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedSignature` when no variant matches a node, or the
    /// construction error of the selected variant.
    pub fn bind(&self, spec: &ExpressionSpec) -> Result<Box<dyn VectorExpression>> {
        let children = spec
            .children
            .iter()
            .map(|child| self.bind(child))
            .collect::<Result<Vec<_>>>()?;

        let types: Vec<DataType> = spec.args.iter().map(ArgumentSpec::data_type).collect();
        let inputs: Vec<InputExpressionType> =
            spec.args.iter().map(ArgumentSpec::input_type).collect();
        let mode = spec.function.mode();

        let variant = self
            .variants
            .get(&spec.function)
            .and_then(|variants| {
                variants
                    .iter()
                    .find(|v| v.descriptor.matches(mode, &types, &inputs))
            })
            .ok_or_else(|| VexError::UnsupportedSignature {
                function: spec.function.to_string(),
                signature: spec.signature(),
            })?;

        let mut expr = (variant.build)(spec)?;
        debug!(
            "Bound {}({}) to {}",
            spec.function,
            spec.signature(),
            variant.name
        );
        expr.set_children(children);
        Ok(expr)
    }

    fn register_builtins(&mut self) {
        self.register(
            FunctionName::Divide,
            "LongColDivideLongScalar",
            LongColDivideLongScalar::signature(),
            |spec| {
                let (col, _) = spec.column_arg(0)?;
                let (value, _) = spec.scalar_arg(1)?;
                Ok(Box::new(LongColDivideLongScalar::new(col, value, spec.output()?)?))
            },
        );
        self.register(
            FunctionName::Divide,
            "LongScalarDivideLongColumn",
            LongScalarDivideLongColumn::signature(),
            |spec| {
                let (value, _) = spec.scalar_arg(0)?;
                let (col, _) = spec.column_arg(1)?;
                Ok(Box::new(LongScalarDivideLongColumn::new(value, col, spec.output()?)?))
            },
        );
        self.register(
            FunctionName::Divide,
            "LongColDivideLongColumn",
            LongColDivideLongColumn::signature(),
            |spec| {
                let (left, _) = spec.column_arg(0)?;
                let (right, _) = spec.column_arg(1)?;
                Ok(Box::new(LongColDivideLongColumn::new(left, right, spec.output()?)?))
            },
        );

        for (function, op, name) in [
            (FunctionName::Add, ArithmeticOp::Add, "ColAddScalar"),
            (FunctionName::Subtract, ArithmeticOp::Subtract, "ColSubtractScalar"),
            (FunctionName::Multiply, ArithmeticOp::Multiply, "ColMultiplyScalar"),
        ] {
            self.register(function, name, ColScalarArithmetic::signature(), move |spec| {
                let (col, col_type) = spec.column_arg(0)?;
                let (value, _) = spec.scalar_arg(1)?;
                Ok(Box::new(ColScalarArithmetic::new(
                    op,
                    col,
                    col_type,
                    value,
                    spec.output()?,
                )?))
            });
        }

        self.register(
            FunctionName::DateDiff,
            "DateDiffScalarCol",
            DateDiffScalarCol::signature(),
            |spec| {
                let (value, scalar_type) = spec.scalar_arg(0)?;
                let (col, col_type) = spec.column_arg(1)?;
                Ok(Box::new(DateDiffScalarCol::new(
                    value,
                    scalar_type,
                    col,
                    col_type,
                    spec.output()?,
                )?))
            },
        );
        self.register(
            FunctionName::DateDiff,
            "DateDiffColScalar",
            DateDiffColScalar::signature(),
            |spec| {
                let (col, col_type) = spec.column_arg(0)?;
                let (value, scalar_type) = spec.scalar_arg(1)?;
                Ok(Box::new(DateDiffColScalar::new(
                    col,
                    col_type,
                    value,
                    scalar_type,
                    spec.output()?,
                )?))
            },
        );

        let string_functions: [(FunctionName, fn() -> Box<dyn UnaryStringFunction>); 6] = [
            (FunctionName::Upper, || Box::new(Upper)),
            (FunctionName::Lower, || Box::new(Lower)),
            (FunctionName::Trim, || Box::new(Trim)),
            (FunctionName::Ltrim, || Box::new(Ltrim)),
            (FunctionName::Rtrim, || Box::new(Rtrim)),
            (FunctionName::Reverse, || Box::new(Reverse)),
        ];
        for (function, make) in string_functions {
            self.register(function, "StringUnaryUdf", StringUnaryUdf::signature(), move |spec| {
                let (col, _) = spec.column_arg(0)?;
                Ok(Box::new(StringUnaryUdf::new(col, spec.output()?, make())?))
            });
        }

        for op in [
            CompareOp::Equal,
            CompareOp::NotEqual,
            CompareOp::Less,
            CompareOp::LessEqual,
            CompareOp::Greater,
            CompareOp::GreaterEqual,
        ] {
            self.register(
                FunctionName::Compare(op),
                "FilterLongColCompareLongScalar",
                FilterLongColCompareLongScalar::signature(),
                move |spec| {
                    let (col, _) = spec.column_arg(0)?;
                    let (value, _) = spec.scalar_arg(1)?;
                    Ok(Box::new(FilterLongColCompareLongScalar::new(col, op, value)?))
                },
            );
        }
        self.register(
            FunctionName::IsNotNull,
            "SelectColumnIsNotNull",
            SelectColumnIsNotNull::signature(),
            |spec| {
                let (col, _) = spec.column_arg(0)?;
                Ok(Box::new(SelectColumnIsNotNull::new(col)))
            },
        );

        self.register(
            FunctionName::Column,
            "IdentityExpression",
            IdentityExpression::signature(),
            |spec| {
                let (col, data_type) = spec.column_arg(0)?;
                Ok(Box::new(IdentityExpression::new(col, data_type)))
            },
        );
        self.register(
            FunctionName::Constant,
            "ConstantVectorExpression",
            ConstantVectorExpression::signature(),
            |spec| {
                let (value, data_type) = spec.scalar_arg(0)?;
                Ok(Box::new(ConstantVectorExpression::new(
                    spec.output()?,
                    data_type,
                    value.clone(),
                )?))
            },
        );
    }
}
