use indexmap::IndexMap;
use stratum_core::{
    config::{ConnectorConfig, NativeQueryInfo, NativeQueryPart, TableInfo},
    err::Result,
    invalid_request, not_supported,
    proto::{Argument, QueryRequest},
};

use crate::{
    common::ScalarLiteral,
    interface::{ColumnType, Dialect},
};

/// The collection a query is compiled against, resolved from the config
#[derive(Debug, Clone, PartialEq)]
pub struct QueryContext<T: ColumnType> {
    /// The collection name
    pub collection: String,
    /// The compiled FROM source
    pub source: String,
    /// The quoted alias which qualifies the collection's columns
    pub alias: String,
    /// The columns of the collection with their parsed types
    pub columns: IndexMap<String, T>,
    /// The variable names, when compiling a batched query
    pub variables: Option<Vec<String>>,
}

/// A column reference resolved against the collection
#[derive(Debug)]
pub struct ResolvedColumn<'a, T> {
    pub name: &'a str,
    /// The qualified column identifier
    pub sql: String,
    pub r#type: &'a T,
}

impl<T: ColumnType> QueryContext<T> {
    /// Resolves the collection targeted by the request
    pub fn new<D: Dialect<TColumnType = T>>(
        config: &ConnectorConfig,
        request: &QueryRequest,
    ) -> Result<Self> {
        if let Some(table) = config.table(&request.collection) {
            return Self::table::<D>(table);
        }

        if let Some(native) = config.native_query(&request.collection) {
            return Self::native_query::<D>(&request.collection, native, &request.arguments);
        }

        invalid_request!("unknown collection '{}'", request.collection)
    }

    fn table<D: Dialect<TColumnType = T>>(table: &TableInfo) -> Result<Self> {
        let qualified = table
            .name_parts()
            .into_iter()
            .map(D::compile_identifier)
            .collect::<Result<Vec<_>>>()?
            .join(".");
        let alias = D::compile_identifier(table.alias())?;

        let source = if qualified == alias {
            qualified
        } else {
            format!("{} AS {}", qualified, alias)
        };

        Ok(Self {
            collection: table.name.clone(),
            source,
            alias,
            columns: table
                .columns
                .iter()
                .map(|c| (c.name.clone(), T::parse(&c.r#type)))
                .collect(),
            variables: None,
        })
    }

    fn native_query<D: Dialect<TColumnType = T>>(
        name: &str,
        native: &NativeQueryInfo,
        arguments: &IndexMap<String, Argument>,
    ) -> Result<Self> {
        let sql = native
            .parts()
            .into_iter()
            .map(|part| -> Result<String> {
                match part {
                    NativeQueryPart::Text(text) => Ok(text),
                    NativeQueryPart::Argument(arg) => match arguments.get(&arg) {
                        Some(Argument::Literal { value }) => {
                            D::compile_literal(&ScalarLiteral::from_json(value))
                        }
                        Some(Argument::Variable { .. }) => not_supported!(
                            "variable argument '{}' of native query '{}'",
                            arg,
                            name
                        ),
                        None => invalid_request!(
                            "missing argument '{}' of native query '{}'",
                            arg,
                            name
                        ),
                    },
                }
            })
            .collect::<Result<String>>()?;
        let alias = D::compile_identifier(name)?;

        Ok(Self {
            collection: name.to_string(),
            source: format!("({}) AS {}", sql, alias),
            alias,
            columns: native
                .columns
                .iter()
                .map(|(name, c)| (name.clone(), T::parse(&c.r#type)))
                .collect(),
            variables: None,
        })
    }

    /// Resolves a column of the collection, qualified by the collection alias
    pub fn column<'a, D: Dialect<TColumnType = T>>(
        &'a self,
        name: &'a str,
    ) -> Result<ResolvedColumn<'a, T>> {
        let Some(r#type) = self.columns.get(name) else {
            invalid_request!(
                "unknown column '{}' of collection '{}'",
                name,
                self.collection
            );
        };

        Ok(ResolvedColumn {
            name,
            sql: format!("{}.{}", self.alias, D::compile_identifier(name)?),
            r#type,
        })
    }
}
