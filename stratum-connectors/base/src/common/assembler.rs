use indexmap::IndexMap;
use serde_json::Value;
use stratum_core::{
    data::{DataValue, Row},
    err::{bail, Result},
    proto::{QueryRequest, QueryResponse, ResponseRow, RowSet},
};

use crate::compiler::INDEX_COLUMN;

use super::to_protocol_value;

/// Reshapes the rows returned by the warehouse into the row sets of the response
pub struct ResponseAssembler;

impl ResponseAssembler {
    /// Assembles the response of the request from the fetched rows and
    /// aggregates, either of which is absent when it was not requested
    pub fn assemble(
        request: &QueryRequest,
        rows: Option<Vec<Row>>,
        aggregates: Option<Vec<Row>>,
    ) -> Result<QueryResponse> {
        let field_aliases = request
            .query
            .fields
            .as_ref()
            .map(|f| f.keys().map(|k| k.as_str()).collect::<Vec<_>>());
        let aggregate_aliases = request
            .query
            .aggregates
            .as_ref()
            .map(|a| a.keys().map(|k| k.as_str()).collect::<Vec<_>>());

        let row_sets = match request.variables.as_ref() {
            None => vec![RowSet {
                rows: Self::rows(field_aliases.as_deref(), rows),
                aggregates: Self::single_aggregates(aggregate_aliases.as_deref(), aggregates),
            }],
            Some(vars) => Self::batched(
                vars.len(),
                field_aliases.as_deref(),
                aggregate_aliases.as_deref(),
                rows,
                aggregates,
            )?,
        };

        Ok(QueryResponse { row_sets })
    }

    fn rows(aliases: Option<&[&str]>, rows: Option<Vec<Row>>) -> Option<Vec<ResponseRow>> {
        let aliases = aliases?;

        Some(
            rows.unwrap_or_default()
                .into_iter()
                .map(|row| Self::project(aliases, row))
                .collect(),
        )
    }

    fn single_aggregates(
        aliases: Option<&[&str]>,
        aggregates: Option<Vec<Row>>,
    ) -> Option<ResponseRow> {
        let aliases = aliases?;

        match aggregates {
            Some(rows) => rows
                .into_iter()
                .next()
                .map(|row| Self::project(aliases, row)),
            None => Some(IndexMap::new()),
        }
    }

    fn batched(
        sets: usize,
        field_aliases: Option<&[&str]>,
        aggregate_aliases: Option<&[&str]>,
        rows: Option<Vec<Row>>,
        aggregates: Option<Vec<Row>>,
    ) -> Result<Vec<RowSet>> {
        // an empty set of aggregates is never queried
        let empty_aggregates = aggregates.is_none();
        let mut row_sets = (0..sets)
            .map(|_| RowSet {
                rows: field_aliases.map(|_| vec![]),
                aggregates: aggregate_aliases
                    .filter(|_| empty_aggregates)
                    .map(|_| IndexMap::new()),
            })
            .collect::<Vec<_>>();

        if let (Some(aliases), Some(rows)) = (field_aliases, rows) {
            for row in rows.into_iter() {
                let idx = Self::batch_index(&row)?;
                let Some(row_set) = row_sets.get_mut(idx) else {
                    bail!(
                        "Row has batch index {} but only {} variable sets were supplied",
                        idx,
                        sets
                    );
                };

                if let Some(rows) = row_set.rows.as_mut() {
                    rows.push(Self::project(aliases, row));
                }
            }
        }

        if let (Some(aliases), Some(aggregates)) = (aggregate_aliases, aggregates) {
            for (row_set, row) in row_sets.iter_mut().zip(aggregates.into_iter()) {
                row_set.aggregates = Some(Self::project(aliases, row));
            }
        }

        Ok(row_sets)
    }

    /// The position of the variable set of a batched row
    fn batch_index(row: &Row) -> Result<usize> {
        let Some((_, value)) = row.iter().find(|(col, _)| col.eq_ignore_ascii_case(INDEX_COLUMN))
        else {
            bail!("Row is missing the {} column", INDEX_COLUMN);
        };

        let idx = match to_protocol_value(value.clone()) {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };

        match idx {
            Some(idx) => Ok(idx as usize),
            None => bail!("Failed to parse batch index from {:?}", value),
        }
    }

    /// Keeps the requested aliases, matching returned column names
    /// case-insensitively, in request order
    fn project(aliases: &[&str], row: Row) -> ResponseRow {
        let mut cells = row
            .into_iter()
            .filter(|(col, _)| !col.eq_ignore_ascii_case(INDEX_COLUMN))
            .map(|(col, val)| (col, Some(val)))
            .collect::<Vec<(String, Option<DataValue>)>>();

        aliases
            .iter()
            .filter_map(|alias| {
                let (_, cell) = cells
                    .iter_mut()
                    .find(|(col, cell)| cell.is_some() && col.eq_ignore_ascii_case(alias))?;

                cell.take()
                    .map(|value| (alias.to_string(), to_protocol_value(value)))
            })
            .collect()
    }
}
