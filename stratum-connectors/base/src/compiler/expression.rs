use std::marker::PhantomData;

use stratum_core::{
    err::Result,
    invalid_request, not_supported,
    proto::{
        ComparisonOperator, ComparisonTarget, ComparisonValue, Expression,
        UnaryComparisonOperator,
    },
};

use crate::{
    common::ScalarLiteral,
    interface::{ColumnType, Dialect},
};

use super::{QueryContext, ResolvedColumn, VARIABLES_CTE, VARIABLE_PREFIX};

/// Lowers filter expressions into SQL conditions
pub struct ExpressionCompiler<D: Dialect> {
    _dialect: PhantomData<D>,
}

impl<D: Dialect> ExpressionCompiler<D> {
    pub fn compile(ctx: &QueryContext<D::TColumnType>, expr: &Expression) -> Result<String> {
        match expr {
            Expression::And { expressions } => {
                Self::compile_junction(ctx, expressions, "AND", "1 = 1")
            }
            Expression::Or { expressions } => Self::compile_junction(ctx, expressions, "OR", "1 = 0"),
            Expression::Not { expression } => {
                Ok(format!("NOT ({})", Self::compile(ctx, expression)?))
            }
            Expression::UnaryComparisonOperator { column, operator } => match operator {
                UnaryComparisonOperator::IsNull => {
                    let column = Self::compile_target(ctx, column)?;
                    Ok(format!("{} IS NULL", column.sql))
                }
            },
            Expression::BinaryComparisonOperator {
                column,
                operator,
                value,
            } => Self::compile_binary_comparison(ctx, column, operator, value),
            Expression::Exists { .. } => not_supported!("EXISTS expressions"),
        }
    }

    /// Empty conjunctions are true, empty disjunctions false
    fn compile_junction(
        ctx: &QueryContext<D::TColumnType>,
        expressions: &[Expression],
        op: &str,
        identity: &str,
    ) -> Result<String> {
        if expressions.is_empty() {
            return Ok(identity.to_string());
        }

        let conds = expressions
            .iter()
            .map(|e| Self::compile(ctx, e))
            .collect::<Result<Vec<_>>>()?;

        Ok(format!("({})", conds.join(&format!(" {} ", op))))
    }

    fn compile_target<'a>(
        ctx: &'a QueryContext<D::TColumnType>,
        target: &'a ComparisonTarget,
    ) -> Result<ResolvedColumn<'a, D::TColumnType>> {
        match target {
            ComparisonTarget::Column {
                name,
                path,
                field_path,
            } => {
                if !path.is_empty() {
                    not_supported!("comparison on column '{}' of a related collection", name);
                }

                if field_path.as_ref().map_or(false, |p| !p.is_empty()) {
                    not_supported!("comparison on a nested field of column '{}'", name);
                }

                ctx.column::<D>(name)
            }
            ComparisonTarget::RootCollectionColumn { name, .. } => {
                not_supported!("comparison on root collection column '{}'", name)
            }
        }
    }

    fn compile_binary_comparison(
        ctx: &QueryContext<D::TColumnType>,
        target: &ComparisonTarget,
        operator: &str,
        value: &ComparisonValue,
    ) -> Result<String> {
        let op = ComparisonOperator::parse(operator)?;
        let column = Self::compile_target(ctx, target)?;

        if !column.r#type.comparison_operators().contains(&op) {
            not_supported!(
                "operator '{}' on column '{}' of type {}",
                op,
                column.name,
                column.r#type.type_name()
            );
        }

        match value {
            ComparisonValue::Scalar { value } => {
                Self::compile_scalar_comparison(&column.sql, op, &ScalarLiteral::from_json(value))
            }
            ComparisonValue::Variable { name } => {
                Self::compile_variable_comparison(ctx, &column.sql, op, name)
            }
            ComparisonValue::Column { .. } => not_supported!("column to column comparisons"),
        }
    }

    fn compile_scalar_comparison(
        field: &str,
        op: ComparisonOperator,
        value: &ScalarLiteral,
    ) -> Result<String> {
        if op == ComparisonOperator::In {
            let Some(items) = value.as_list() else {
                not_supported!("operator '{}' requires a list value", op);
            };

            if items.is_empty() {
                return Ok("1 = 0".to_string());
            }

            return Ok(format!("{} IN ({})", field, D::compile_literal(value)?));
        }

        if matches!(value, ScalarLiteral::List(_)) {
            not_supported!("list value for operator '{}'", op);
        }

        let literal = D::compile_literal(value)?;

        if op.is_like() {
            return D::compile_like_comparison(
                field,
                &literal,
                op.is_case_insensitive(),
                op.is_negated(),
            );
        }

        if op.is_regex() {
            return D::compile_regex_comparison(
                field,
                &literal,
                op.is_case_insensitive(),
                op.is_negated(),
            );
        }

        Ok(format!("{} {} {}", field, Self::compile_operator(op)?, literal))
    }

    /// Correlates the row with the variables of its batch, only valid when
    /// compiling a batched query
    fn compile_variable_comparison(
        ctx: &QueryContext<D::TColumnType>,
        field: &str,
        op: ComparisonOperator,
        name: &str,
    ) -> Result<String> {
        let Some(variables) = ctx.variables.as_ref() else {
            not_supported!("variable comparison outside of a query with variables");
        };

        if op != ComparisonOperator::Eq {
            not_supported!("variable comparison with operator '{}'", op);
        }

        if !variables.iter().any(|v| v == name) {
            invalid_request!("unknown variable '{}'", name);
        }

        Ok(format!(
            "{} = {}.{}",
            field,
            D::compile_identifier(VARIABLES_CTE)?,
            D::compile_identifier(&format!("{}{}", VARIABLE_PREFIX, name))?
        ))
    }

    fn compile_operator(op: ComparisonOperator) -> Result<&'static str> {
        Ok(match op {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Neq => "<>",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::Lte => "<=",
            _ => not_supported!("operator '{}'", op),
        })
    }
}
