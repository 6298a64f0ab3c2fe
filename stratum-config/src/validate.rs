use itertools::Itertools;
use stratum_core::{
    config::ConnectorConfig,
    err::{bail, ensure, Result},
};

/// Checks the catalog is consistent before any request is served
pub(crate) fn validate(config: &ConnectorConfig) -> Result<()> {
    let names = config
        .tables
        .iter()
        .map(|t| t.name.as_str())
        .chain(config.native_operations.keys().map(|k| k.as_str()));

    if let Some(dup) = names.duplicates().next() {
        bail!("Collection \"{}\" is defined more than once", dup);
    }

    for table in config.tables.iter() {
        ensure!(
            !table.columns.is_empty(),
            "Table \"{}\" must have at least one column",
            table.name
        );

        if let Some(dup) = table.columns.iter().map(|c| c.name.as_str()).duplicates().next() {
            bail!("Column \"{}\" of table \"{}\" is defined more than once", dup, table.name);
        }

        for pk in table.primary_keys.iter() {
            ensure!(
                table.column(pk).is_some(),
                "Primary key \"{}\" of table \"{}\" is not a column of the table",
                pk,
                table.name
            );
        }
    }

    for (name, native) in config.native_operations.iter() {
        ensure!(
            !native.columns.is_empty(),
            "Native query \"{}\" must have at least one column",
            name
        );
    }

    Ok(())
}
