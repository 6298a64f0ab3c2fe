use std::{
    fs,
    io::{self, Read},
    path::Path,
    process,
};

use clap::Parser;
use serde::Serialize;
use stratum_config::ConfigLoader;
use stratum_connectors_all::{Connectors, Dialects};
use stratum_core::{
    config::ConnectorConfig,
    err::{Context, Error, InvalidRequest, Result},
    proto::{ErrorResponse, QueryRequest},
};
use stratum_logging::{error, info};
use tokio::runtime::Runtime;

use crate::args::Command;

mod args;

/// Exit code when the configuration cannot be loaded
const EXIT_CONFIG: i32 = 2;
/// Exit code when a command fails
const EXIT_FAILURE: i32 = 1;

fn main() {
    if let Err(err) = stratum_logging::init_logging() {
        eprintln!("Failed to init logging: {:?}", err);
    }

    let command = Command::parse();
    let args = command.args();

    let config = match ConfigLoader::new().load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            error!("Failed to load configuration: {:?}", err);
            process::exit(EXIT_CONFIG);
        }
    };

    if let Err(err) = run(command, config) {
        error!("{:?}", err);
        print_error(&err);
        process::exit(EXIT_FAILURE);
    }
}

fn run(command: Command, config: ConnectorConfig) -> Result<()> {
    let dialect = command.args().dialect;
    info!("Running {} connector", dialect.r#type());

    match command {
        Command::Schema(_) => print_json(&dialect.schema(&config)?),
        Command::Compile(args) => {
            let request = read_request(args.request.as_deref())?;
            let compiled = dialect.compile(&config, &request)?;

            for (name, sql) in [("rows", compiled.rows), ("aggregates", compiled.aggregates)] {
                if let Some(sql) = sql {
                    println!("-- {}\n{}", name, sql);
                }
            }

            Ok(())
        }
        Command::Explain(args) => {
            let request = read_request(args.request.as_deref())?;
            print_json(&dialect.explain(&config, &request)?)
        }
        Command::Query(args) => {
            let request = read_request(args.request.as_deref())?;
            // the request is validated before any connection is made
            dialect.compile(&config, &request)?;

            let connector = connect(dialect, config)?;
            let res = runtime()?.block_on(connector.query(request))?;

            print_json(&res)
        }
        Command::Sql(args) => {
            let sql = match args.sql {
                Some(sql) => sql,
                None => String::from_utf8(read_stdin()?).context("Statement is not utf-8")?,
            };

            let connector = connect(dialect, config)?;
            let rows = runtime()?.block_on(connector.sql(sql))?;

            print_json(&rows)
        }
    }
}

/// Connects to the warehouse, this blocks so must happen outside the runtime
fn connect(dialect: Dialects, config: ConnectorConfig) -> Result<Connectors> {
    info!("Connecting to {}...", dialect.r#type());
    Connectors::new(dialect, config)
}

fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create runtime")
}

fn read_request(path: Option<&Path>) -> Result<QueryRequest> {
    let data = match path {
        Some(path) => fs::read(path)
            .with_context(|| format!("Failed to read request from {}", path.display()))?,
        None => read_stdin()?,
    };

    serde_json::from_slice(&data)
        .map_err(|e| Error::new(InvalidRequest::new(format!("malformed query request: {}", e))))
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut buf = vec![];
    io::stdin()
        .read_to_end(&mut buf)
        .context("Failed to read from stdin")?;

    Ok(buf)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize response")?
    );

    Ok(())
}

/// Reports the error to the caller in the protocol's error format
fn print_error(err: &Error) {
    match serde_json::to_string_pretty(&ErrorResponse::from(err)) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize error: {:?}", e),
    }
}
