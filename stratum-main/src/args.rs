use std::path::PathBuf;

use clap::Parser;
use stratum_connectors_all::Dialects;

/// Compiles and runs query requests against SQL warehouses
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub(crate) enum Command {
    /// Prints the schema derived from the configuration
    Schema(Args),
    /// Prints the SQL compiled from a query request, without connecting
    Compile(RequestArgs),
    /// Executes a query request and prints the row sets
    Query(RequestArgs),
    /// Validates a query request
    Explain(RequestArgs),
    /// Executes a literal SQL statement and prints its rows
    Sql(SqlArgs),
}

#[derive(Parser, Debug)]
pub(crate) struct Args {
    /// The path of the connector configuration file
    #[clap(short, long, value_parser)]
    pub config: PathBuf,

    /// The warehouse dialect, eg snowflake
    #[clap(short, long, value_parser = parse_dialect)]
    pub dialect: Dialects,
}

#[derive(Parser, Debug)]
pub(crate) struct RequestArgs {
    #[clap(flatten)]
    pub common: Args,

    /// The path of the query request, read from stdin if absent
    #[clap(short, long, value_parser)]
    pub request: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub(crate) struct SqlArgs {
    #[clap(flatten)]
    pub common: Args,

    /// The statement, read from stdin if absent
    #[clap(value_parser)]
    pub sql: Option<String>,
}

impl Command {
    pub(crate) fn args(&self) -> &Args {
        match self {
            Command::Schema(args) => args,
            Command::Compile(args) => &args.common,
            Command::Query(args) => &args.common,
            Command::Explain(args) => &args.common,
            Command::Sql(args) => &args.common,
        }
    }
}

fn parse_dialect(r#type: &str) -> Result<Dialects, String> {
    Dialects::from_type(&r#type.to_lowercase()).ok_or_else(|| {
        format!(
            "unknown dialect, expected one of: {}",
            Dialects::ALL.map(|d| d.r#type()).join(", ")
        )
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_compile_args() {
        let command = Command::try_parse_from([
            "stratum-main",
            "compile",
            "-c",
            "conf.json",
            "-d",
            "BigQuery",
            "-r",
            "req.json",
        ])
        .unwrap();

        assert_eq!(command.args().config, PathBuf::from("conf.json"));
        assert_eq!(command.args().dialect, Dialects::BigQuery);
        match command {
            Command::Compile(args) => assert_eq!(args.request, Some("req.json".into())),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_parse_sql_args() {
        let command = Command::try_parse_from([
            "stratum-main",
            "sql",
            "--config",
            "conf.json",
            "--dialect",
            "postgres",
            "SELECT 1",
        ])
        .unwrap();

        match command {
            Command::Sql(args) => {
                assert_eq!(args.sql, Some("SELECT 1".into()));
                assert_eq!(args.common.dialect, Dialects::Postgres);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_parse_unknown_dialect() {
        let err = Command::try_parse_from([
            "stratum-main",
            "schema",
            "-c",
            "conf.json",
            "-d",
            "oracle",
        ])
        .unwrap_err();

        assert!(err.to_string().contains("snowflake, bigquery"));
    }
}
