use std::marker::PhantomData;

use indexmap::IndexMap;
use itertools::Itertools;
use serde_json::Value;
use stratum_core::{
    config::ConnectorConfig,
    err::{Context, Result},
    not_supported,
    proto::{
        Aggregate, ComparisonTarget, ComparisonValue, Expression, Field, OrderByTarget,
        OrderDirection, Query, QueryRequest,
    },
};
use stratum_logging::{debug, MaxLogLength, MAX_SQL_LOG_LENGTH};

use crate::{
    common::{ScalarLiteral, FLOAT_AGGREGATES},
    interface::{ColumnType, Dialect},
};

use super::{
    ExpressionCompiler, QueryContext, INDEX_COLUMN, RESULTS_CTE, ROW_NUMBER_COLUMN,
    VARIABLES_CTE, VARIABLE_PREFIX,
};

/// The statements compiled from a query request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledQuery {
    /// Returns the requested fields, if any were requested
    pub rows: Option<String>,
    /// Returns the requested aggregates, if any were requested
    pub aggregates: Option<String>,
}

/// A requested field: its alias, column name and column type
type FieldProjection<'a, T> = (&'a str, &'a str, &'a T);

/// Compiles query requests into SQL statements of dialect `D`
pub struct QueryPlanner<D: Dialect> {
    _dialect: PhantomData<D>,
}

impl<D: Dialect> QueryPlanner<D> {
    /// Compiles the request.
    ///
    /// Either every requested construct compiles or the request fails, no
    /// partial statement is ever returned.
    pub fn compile(config: &ConnectorConfig, request: &QueryRequest) -> Result<CompiledQuery> {
        let compiled = match request.variables.as_ref() {
            Some(vars) if vars.is_empty() => CompiledQuery::default(),
            Some(vars) => Self::compile_batched(config, request, vars)?,
            None => Self::compile_single(config, request)?,
        };

        for sql in [&compiled.rows, &compiled.aggregates].into_iter().flatten() {
            debug!(
                "Compiled {} query for '{}': {}",
                D::TYPE,
                request.collection,
                MaxLogLength::new(Some(MAX_SQL_LOG_LENGTH), sql.as_str())
            );
        }

        Ok(compiled)
    }

    fn compile_single(config: &ConnectorConfig, request: &QueryRequest) -> Result<CompiledQuery> {
        let ctx = QueryContext::new::<D>(config, request)?;
        let query = &request.query;

        let r#where = Self::compile_where(&ctx, query)?;
        let order_by = Self::compile_order_by(&ctx, query)?;
        let limit = D::compile_limit_offset(query.limit, query.offset);

        let rows = match Self::field_projections(&ctx, query)? {
            Some(fields) => Some(
                [
                    format!("SELECT {}", Self::compile_field_list(&ctx, &fields)?),
                    format!("FROM {}", ctx.source),
                    r#where.clone(),
                    Self::prefixed("ORDER BY", &order_by),
                    limit.clone(),
                ]
                .into_iter()
                .filter(|i| !i.is_empty())
                .collect::<Vec<String>>()
                .join(" "),
            ),
            None => None,
        };

        let aggregates = match Self::aggregates(query) {
            Some(aggregates) => {
                let cols = aggregates
                    .iter()
                    .map(|(alias, agg)| -> Result<String> {
                        Self::compile_aggregate(&ctx, &ctx.alias, "*", alias, agg)
                    })
                    .collect::<Result<Vec<_>>>()?;

                // pagination applies to the rows being aggregated
                let (source, r#where) = if query.limit.is_some() || query.offset.is_some() {
                    let inner = [
                        format!("SELECT * FROM {}", ctx.source),
                        r#where,
                        Self::prefixed("ORDER BY", &order_by),
                        limit,
                    ]
                    .into_iter()
                    .filter(|i| !i.is_empty())
                    .collect::<Vec<String>>()
                    .join(" ");

                    (format!("({}) AS {}", inner, ctx.alias), String::new())
                } else {
                    (ctx.source.clone(), r#where)
                };

                Some(
                    [
                        format!("SELECT {}", cols.join(", ")),
                        format!("FROM {}", source),
                        r#where,
                    ]
                    .into_iter()
                    .filter(|i| !i.is_empty())
                    .collect::<Vec<String>>()
                    .join(" "),
                )
            }
            None => None,
        };

        Ok(CompiledQuery { rows, aggregates })
    }

    fn compile_batched(
        config: &ConnectorConfig,
        request: &QueryRequest,
        vars: &[IndexMap<String, Value>],
    ) -> Result<CompiledQuery> {
        if !D::SUPPORTS_VARIABLES {
            not_supported!("queries with variables on {}", D::TYPE);
        }

        let mut ctx = QueryContext::new::<D>(config, request)?;
        ctx.variables = Some(
            vars.iter()
                .flat_map(|v| v.keys().cloned())
                .unique()
                .collect(),
        );
        let query = &request.query;

        let join = Self::compile_correlation(&ctx, query.predicate.as_ref())?;
        let vars_cte = Self::compile_variables_cte(
            &ctx,
            vars,
            Self::correlated_variable(&ctx, query.predicate.as_ref()),
        )?;
        let window_order = Self::compile_order_by(&ctx, query)?;
        let bounds = Self::compile_row_number_bounds(query.limit, query.offset)?;

        let results = D::compile_identifier(RESULTS_CTE)?;
        let vars_alias = D::compile_identifier(VARIABLES_CTE)?;
        let idx = D::compile_identifier(INDEX_COLUMN)?;
        let rn = D::compile_identifier(ROW_NUMBER_COLUMN)?;

        let rows = match Self::field_projections(&ctx, query)? {
            Some(fields) => {
                let inner = fields
                    .iter()
                    .map(|(_, col, _)| *col)
                    .unique()
                    .map(|col| -> Result<String> {
                        let column = ctx.column::<D>(col)?;
                        Ok(format!(
                            "{} AS {}",
                            D::compile_cast(column.sql, column.r#type),
                            D::compile_identifier(col)?
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;

                let mut outer = fields
                    .iter()
                    .map(|(alias, col, _)| -> Result<String> {
                        Ok(format!(
                            "{}.{} AS {}",
                            results,
                            D::compile_identifier(col)?,
                            D::compile_identifier(alias)?
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;
                outer.push(format!("{}.{} AS {}", results, idx, idx));

                Some(
                    [
                        format!(
                            "WITH {}, {}",
                            vars_cte,
                            Self::compile_results_cte(&ctx, inner, &window_order, &join)?
                        ),
                        format!("SELECT {}", outer.join(", ")),
                        format!("FROM {}", results),
                        Self::prefixed("WHERE", &[bounds.join(" AND ")]),
                        format!(
                            "ORDER BY {}.{} ASC, {}.{} ASC",
                            results, idx, results, rn
                        ),
                    ]
                    .into_iter()
                    .filter(|i| !i.is_empty())
                    .collect::<Vec<String>>()
                    .join(" "),
                )
            }
            None => None,
        };

        let aggregates = match Self::aggregates(query) {
            Some(aggregates) => {
                let inner = aggregates
                    .values()
                    .filter_map(|agg| match agg {
                        Aggregate::StarCount => None,
                        Aggregate::ColumnCount { column, .. }
                        | Aggregate::SingleColumn { column, .. } => Some(column.as_str()),
                    })
                    .unique()
                    .map(|col| -> Result<String> {
                        let column = ctx.column::<D>(col)?;
                        Ok(format!("{} AS {}", column.sql, D::compile_identifier(col)?))
                    })
                    .collect::<Result<Vec<_>>>()?;

                let mut cols = vec![format!("{}.{} AS {}", vars_alias, idx, idx)];
                for (alias, agg) in aggregates.iter() {
                    cols.push(Self::compile_aggregate(
                        &ctx,
                        &results,
                        &format!("{}.{}", results, rn),
                        alias,
                        agg,
                    )?);
                }

                let on = [format!("{}.{} = {}.{}", vars_alias, idx, results, idx)]
                    .into_iter()
                    .chain(bounds.iter().cloned())
                    .collect::<Vec<_>>()
                    .join(" AND ");

                Some(
                    [
                        format!(
                            "WITH {}, {}",
                            vars_cte,
                            Self::compile_results_cte(&ctx, inner, &window_order, &join)?
                        ),
                        format!("SELECT {}", cols.join(", ")),
                        format!("FROM {} LEFT JOIN {} ON {}", vars_alias, results, on),
                        format!("GROUP BY {}.{}", vars_alias, idx),
                        format!("ORDER BY {}.{} ASC", vars_alias, idx),
                    ]
                    .join(" "),
                )
            }
            None => None,
        };

        Ok(CompiledQuery { rows, aggregates })
    }

    /// The correlation between a row and its variable set: the predicate must
    /// be exactly one comparison against a variable
    fn compile_correlation(
        ctx: &QueryContext<D::TColumnType>,
        predicate: Option<&Expression>,
    ) -> Result<String> {
        let Some(predicate) = predicate else {
            not_supported!("predicate required for variable queries");
        };

        match predicate {
            Expression::BinaryComparisonOperator {
                value: ComparisonValue::Variable { .. },
                ..
            } => ExpressionCompiler::<D>::compile(ctx, predicate),
            Expression::BinaryComparisonOperator { .. } => {
                not_supported!("predicate must use a variable comparison")
            }
            _ => not_supported!("predicate must be a binary comparison"),
        }
    }

    /// The variable of the correlation and the type of the column it is compared to
    fn correlated_variable<'a>(
        ctx: &'a QueryContext<D::TColumnType>,
        predicate: Option<&'a Expression>,
    ) -> Option<(&'a str, &'a D::TColumnType)> {
        match predicate {
            Some(Expression::BinaryComparisonOperator {
                column: ComparisonTarget::Column { name, .. },
                value: ComparisonValue::Variable { name: variable },
                ..
            }) => ctx
                .columns
                .get(name)
                .map(|column_type| (variable.as_str(), column_type)),
            _ => None,
        }
    }

    /// One row per variable set, missing variables are null
    fn compile_variables_cte(
        ctx: &QueryContext<D::TColumnType>,
        vars: &[IndexMap<String, Value>],
        correlated: Option<(&str, &D::TColumnType)>,
    ) -> Result<String> {
        let names = ctx.variables.as_deref().unwrap_or_default();

        let rows = vars
            .iter()
            .enumerate()
            .map(|(idx, binding)| -> Result<String> {
                let mut cols = names
                    .iter()
                    .map(|name| -> Result<String> {
                        let value = binding
                            .get(name)
                            .map(ScalarLiteral::from_json)
                            .unwrap_or(ScalarLiteral::Null);

                        if matches!(value, ScalarLiteral::List(_)) {
                            not_supported!("list value for variable '{}'", name);
                        }

                        let literal = match correlated {
                            Some((variable, column_type)) if variable == name.as_str() => {
                                D::compile_variable_literal(&value, column_type)?
                            }
                            _ => D::compile_literal(&value)?,
                        };

                        Ok(format!(
                            "{} AS {}",
                            literal,
                            D::compile_identifier(&format!("{}{}", VARIABLE_PREFIX, name))?
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;
                cols.push(format!("{} AS {}", idx, D::compile_identifier(INDEX_COLUMN)?));

                Ok(format!("SELECT {}", cols.join(", ")))
            })
            .collect::<Result<Vec<_>>>()
            .context("Failed to compile variables")?;

        Ok(format!(
            "{} AS ({})",
            D::compile_identifier(VARIABLES_CTE)?,
            rows.join(" UNION ALL ")
        ))
    }

    /// Rows of the collection joined to their variable set, numbered within it
    fn compile_results_cte(
        ctx: &QueryContext<D::TColumnType>,
        mut cols: Vec<String>,
        window_order: &[String],
        join: &str,
    ) -> Result<String> {
        let vars = D::compile_identifier(VARIABLES_CTE)?;
        let idx = format!("{}.{}", vars, D::compile_identifier(INDEX_COLUMN)?);
        let order = if window_order.is_empty() {
            idx.clone()
        } else {
            window_order.join(", ")
        };

        cols.push(format!(
            "ROW_NUMBER() OVER (PARTITION BY {} ORDER BY {}) AS {}",
            idx,
            order,
            D::compile_identifier(ROW_NUMBER_COLUMN)?
        ));
        cols.push(format!("{} AS {}", idx, D::compile_identifier(INDEX_COLUMN)?));

        Ok(format!(
            "{} AS (SELECT {} FROM {} INNER JOIN {} ON {})",
            D::compile_identifier(RESULTS_CTE)?,
            cols.join(", "),
            ctx.source,
            vars,
            join
        ))
    }

    /// Pagination within each variable set
    fn compile_row_number_bounds(limit: Option<u32>, offset: Option<u32>) -> Result<Vec<String>> {
        let rn = format!(
            "{}.{}",
            D::compile_identifier(RESULTS_CTE)?,
            D::compile_identifier(ROW_NUMBER_COLUMN)?
        );
        let mut bounds = vec![];

        if let Some(offset) = offset {
            bounds.push(format!("{} > {}", rn, offset));
        }

        if let Some(limit) = limit {
            bounds.push(format!(
                "{} <= {}",
                rn,
                offset.unwrap_or(0) as u64 + limit as u64
            ));
        }

        Ok(bounds)
    }

    fn compile_where(ctx: &QueryContext<D::TColumnType>, query: &Query) -> Result<String> {
        match query.predicate.as_ref() {
            Some(predicate) => Ok(format!(
                "WHERE {}",
                ExpressionCompiler::<D>::compile(ctx, predicate)?
            )),
            None => Ok("".to_string()),
        }
    }

    fn compile_order_by(ctx: &QueryContext<D::TColumnType>, query: &Query) -> Result<Vec<String>> {
        let Some(order_by) = query.order_by.as_ref() else {
            return Ok(vec![]);
        };

        order_by
            .elements
            .iter()
            .map(|element| -> Result<String> {
                let column = match &element.target {
                    OrderByTarget::Column {
                        name,
                        path,
                        field_path,
                    } => {
                        if !path.is_empty() {
                            not_supported!("ordering by column '{}' of a related collection", name);
                        }

                        if field_path.as_ref().map_or(false, |p| !p.is_empty()) {
                            not_supported!("ordering by a nested field of column '{}'", name);
                        }

                        ctx.column::<D>(name)?
                    }
                    OrderByTarget::SingleColumnAggregate { .. }
                    | OrderByTarget::StarCountAggregate { .. } => {
                        not_supported!("ordering by an aggregate")
                    }
                };

                Ok(format!(
                    "{} {}",
                    column.sql,
                    match element.order_direction {
                        OrderDirection::Asc => "ASC",
                        OrderDirection::Desc => "DESC",
                    }
                ))
            })
            .collect()
    }

    /// The requested fields, `None` if no rows were requested
    fn field_projections<'a>(
        ctx: &'a QueryContext<D::TColumnType>,
        query: &'a Query,
    ) -> Result<Option<Vec<FieldProjection<'a, D::TColumnType>>>> {
        let Some(fields) = query.fields.as_ref() else {
            return Ok(None);
        };

        fields
            .iter()
            .map(|(alias, field)| -> Result<FieldProjection<'a, D::TColumnType>> {
                match field {
                    Field::Column { column, fields } => {
                        if fields.is_some() {
                            not_supported!("nested field selection on column '{}'", column);
                        }

                        let resolved = ctx.column::<D>(column)?;
                        Ok((alias.as_str(), column.as_str(), resolved.r#type))
                    }
                    Field::Relationship { relationship, .. } => {
                        not_supported!("relationship field '{}' ({})", alias, relationship)
                    }
                }
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Projects the fields under their aliases, a query without fields
    /// projects a constant so the row count is kept
    fn compile_field_list(
        ctx: &QueryContext<D::TColumnType>,
        fields: &[FieldProjection<'_, D::TColumnType>],
    ) -> Result<String> {
        if fields.is_empty() {
            return Ok(format!("0 AS {}", D::compile_identifier(INDEX_COLUMN)?));
        }

        Ok(fields
            .iter()
            .map(|(alias, col, _)| -> Result<String> {
                let column = ctx.column::<D>(col)?;
                Ok(format!(
                    "{} AS {}",
                    D::compile_cast(column.sql, column.r#type),
                    D::compile_identifier(alias)?
                ))
            })
            .collect::<Result<Vec<_>>>()?
            .join(", "))
    }

    fn aggregates(query: &Query) -> Option<&IndexMap<String, Aggregate>> {
        query.aggregates.as_ref().filter(|a| !a.is_empty())
    }

    /// Compiles an aggregate over the columns of `qualifier`, `star` is the
    /// argument counted by a star count
    fn compile_aggregate(
        ctx: &QueryContext<D::TColumnType>,
        qualifier: &str,
        star: &str,
        alias: &str,
        aggregate: &Aggregate,
    ) -> Result<String> {
        let expr = match aggregate {
            Aggregate::StarCount => format!("COUNT({})", star),
            Aggregate::ColumnCount {
                column,
                distinct,
                field_path,
            } => {
                Self::check_field_path(column, field_path)?;
                ctx.column::<D>(column)?;

                format!(
                    "COUNT({}{}.{})",
                    if *distinct { "DISTINCT " } else { "" },
                    qualifier,
                    D::compile_identifier(column)?
                )
            }
            Aggregate::SingleColumn {
                column,
                function,
                field_path,
            } => {
                Self::check_field_path(column, field_path)?;
                let resolved = ctx.column::<D>(column)?;

                if !resolved
                    .r#type
                    .aggregate_functions()
                    .contains(&function.as_str())
                {
                    not_supported!(
                        "aggregate function '{}' on column '{}' of type {}",
                        function,
                        column,
                        resolved.r#type.type_name()
                    );
                }

                let expr = D::compile_aggregate_function(
                    function,
                    &format!("{}.{}", qualifier, D::compile_identifier(column)?),
                )?;

                if FLOAT_AGGREGATES.contains(&function.as_str()) {
                    expr
                } else {
                    D::compile_cast(expr, resolved.r#type)
                }
            }
        };

        Ok(format!("{} AS {}", expr, D::compile_identifier(alias)?))
    }

    fn check_field_path(column: &str, field_path: &Option<Vec<String>>) -> Result<()> {
        if field_path.as_ref().map_or(false, |p| !p.is_empty()) {
            not_supported!("aggregate over a nested field of column '{}'", column);
        }

        Ok(())
    }

    fn prefixed(keyword: &str, clauses: &[String]) -> String {
        if clauses.is_empty() || clauses.iter().all(|c| c.is_empty()) {
            return "".to_string();
        }

        format!("{} {}", keyword, clauses.join(", "))
    }
}
