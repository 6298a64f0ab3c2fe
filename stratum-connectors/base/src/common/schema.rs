use std::marker::PhantomData;

use indexmap::IndexMap;
use stratum_core::{
    config::ConnectorConfig,
    err::Result,
    proto::{
        AggregateFunctionDefinition, ArgumentInfo, CollectionInfo, ComparisonOperator,
        ComparisonOperatorDefinition, ForeignKeyConstraint, ObjectField, ObjectType,
        ScalarType, SchemaResponse, Type, TypeRepresentation, UniquenessConstraint,
    },
};

use crate::interface::ColumnType;

use super::FLOAT_AGGREGATES;

/// The scalar type of aggregates returning floating point numbers
pub const FLOAT_SCALAR_TYPE: &str = "Float64";

/// Derives the schema document from the configuration and the dialect's
/// type catalog
pub struct SchemaBuilder<T: ColumnType> {
    scalar_types: IndexMap<String, ScalarType>,
    _type: PhantomData<T>,
}

impl<T: ColumnType> SchemaBuilder<T> {
    pub fn build(config: &ConnectorConfig) -> Result<SchemaResponse> {
        let mut builder = Self {
            scalar_types: IndexMap::new(),
            _type: PhantomData,
        };
        let mut object_types = IndexMap::new();
        let mut collections = vec![];

        for table in config.tables.iter() {
            let fields = table
                .columns
                .iter()
                .map(|c| {
                    (
                        c.name.clone(),
                        ObjectField {
                            description: c.description.clone(),
                            r#type: builder.column_type(&c.r#type, c.nullable),
                        },
                    )
                })
                .collect();

            object_types.insert(
                table.name.clone(),
                ObjectType {
                    description: table.description.clone(),
                    fields,
                },
            );

            let mut uniqueness_constraints = IndexMap::new();
            if !table.primary_keys.is_empty() {
                uniqueness_constraints.insert(
                    format!("{}_pkey", table.alias()),
                    UniquenessConstraint {
                        unique_columns: table.primary_keys.clone(),
                    },
                );
            }

            collections.push(CollectionInfo {
                name: table.name.clone(),
                description: table.description.clone(),
                arguments: IndexMap::new(),
                r#type: table.name.clone(),
                uniqueness_constraints,
                foreign_keys: table
                    .foreign_keys
                    .iter()
                    .map(|(name, fk)| {
                        (
                            name.clone(),
                            ForeignKeyConstraint {
                                column_mapping: fk.column_mapping.clone(),
                                foreign_collection: fk.foreign_collection.clone(),
                            },
                        )
                    })
                    .collect(),
            });
        }

        for (name, native) in config.native_operations.iter() {
            let fields = native
                .columns
                .iter()
                .map(|(col, c)| {
                    (
                        col.clone(),
                        ObjectField {
                            description: c.description.clone(),
                            r#type: builder.column_type(&c.r#type, c.nullable),
                        },
                    )
                })
                .collect();

            object_types.insert(
                name.clone(),
                ObjectType {
                    description: native.description.clone(),
                    fields,
                },
            );

            collections.push(CollectionInfo {
                name: name.clone(),
                description: native.description.clone(),
                arguments: native
                    .arguments
                    .iter()
                    .map(|(arg, a)| {
                        (
                            arg.clone(),
                            ArgumentInfo {
                                description: a.description.clone(),
                                r#type: builder.column_type(&a.r#type, a.nullable),
                            },
                        )
                    })
                    .collect(),
                r#type: name.clone(),
                uniqueness_constraints: IndexMap::new(),
                foreign_keys: IndexMap::new(),
            });
        }

        Ok(SchemaResponse {
            scalar_types: builder.scalar_types,
            object_types,
            collections,
            functions: config.functions.clone(),
            procedures: vec![],
        })
    }

    /// Registers the scalar type of the column and returns its type reference
    fn column_type(&mut self, type_name: &str, nullable: bool) -> Type {
        let ty = T::parse(type_name);
        let name = ty.scalar_type_name();

        if !self.scalar_types.contains_key(&name) {
            let scalar = self.scalar_type(&ty, &name);
            self.scalar_types.insert(name.clone(), scalar);
        }

        let r#type = Type::named(name);
        if nullable {
            r#type.nullable()
        } else {
            r#type
        }
    }

    fn scalar_type(&mut self, ty: &T, name: &str) -> ScalarType {
        let aggregate_functions = ty
            .aggregate_functions()
            .into_iter()
            .map(|function| {
                let result_type = if FLOAT_AGGREGATES.contains(&function) {
                    self.float_scalar_type();
                    Type::named(FLOAT_SCALAR_TYPE)
                } else {
                    Type::named(name)
                };

                (
                    function.to_string(),
                    AggregateFunctionDefinition {
                        result_type: result_type.nullable(),
                    },
                )
            })
            .collect();

        let comparison_operators = ty
            .comparison_operators()
            .into_iter()
            .map(|op| {
                let def = match op {
                    ComparisonOperator::Eq => ComparisonOperatorDefinition::Equal,
                    ComparisonOperator::In => ComparisonOperatorDefinition::In,
                    _ => ComparisonOperatorDefinition::Custom {
                        argument_type: Type::named(name),
                    },
                };

                (op.name().to_string(), def)
            })
            .collect();

        ScalarType {
            representation: ty.representation(),
            aggregate_functions,
            comparison_operators,
        }
    }

    fn float_scalar_type(&mut self) {
        self.scalar_types
            .entry(FLOAT_SCALAR_TYPE.to_string())
            .or_insert_with(|| ScalarType {
                representation: Some(TypeRepresentation::Float64),
                aggregate_functions: IndexMap::new(),
                comparison_operators: IndexMap::from([
                    ("_eq".to_string(), ComparisonOperatorDefinition::Equal),
                    ("_in".to_string(), ComparisonOperatorDefinition::In),
                ]),
            });
    }
}
