use std::fmt::Debug;

use stratum_core::proto::{ComparisonOperator, TypeRepresentation};

use crate::common::{
    default_aggregate_functions, default_cast_type, default_comparison_operators,
    sanitize_type_name, CastType,
};

/// The type catalog of a dialect: the native column types of the warehouse and
/// what they mean in the protocol's type system.
pub trait ColumnType: Debug + Clone + PartialEq + Send + Sync + Sized {
    /// Operators legal on string types in addition to the equality and
    /// ordering operators
    const STRING_OPERATORS: &'static [ComparisonOperator];

    /// Aggregate functions legal on numeric types
    const NUMERIC_AGGREGATES: &'static [&'static str];

    /// Parses the vendor type text, eg `NUMBER(38,0)`.
    ///
    /// Unrecognised types parse to the dialect's unknown variant.
    fn parse(type_name: &str) -> Self;

    /// The canonical name of the type
    fn type_name(&self) -> String;

    /// The protocol representation of the type, if known
    fn representation(&self) -> Option<TypeRepresentation>;

    /// How values of this type are cast when projected
    fn cast_type(&self) -> CastType {
        default_cast_type(self.representation())
    }

    /// The aggregate functions which may be applied to a column of this type
    fn aggregate_functions(&self) -> Vec<&'static str> {
        default_aggregate_functions(self.representation(), Self::NUMERIC_AGGREGATES)
    }

    /// The binary comparison operators which may be applied to a column of this type
    fn comparison_operators(&self) -> Vec<ComparisonOperator> {
        default_comparison_operators(self.representation(), Self::STRING_OPERATORS)
    }

    /// The name of the scalar type in the schema, eg `NUMBER_38_0`
    fn scalar_type_name(&self) -> String {
        sanitize_type_name(&self.type_name())
    }
}
