mod config;
mod dlq;
mod domain;
mod engine;
mod ingestion;
mod ledger;

use std::{env, fs::File, path::PathBuf};

use futures::StreamExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::dlq::StdErrDLQ;
use crate::domain::traits::{DeadLetterQueue, RequestStream};
use crate::engine::Engine;
use crate::ingestion::CsvReader;
use crate::ledger::JsonFileLedger;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Diagnostics go to stderr; stdout is reserved for screen output.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args();
    let script_path = args.nth(1).expect("No session script was provided");

    let mut config = Config::from_env()?;
    if let Some(ledger_path) = args.next() {
        config.ledger_path = PathBuf::from(ledger_path);
    }

    tracing::info!(
        script = %script_path,
        ledger = %config.ledger_path.display(),
        "starting"
    );

    let script = File::open(&script_path)?;
    let mut ingestion = CsvReader::new(script)?;
    let ledger = JsonFileLedger::open(&config.ledger_path)?;
    let mut engine = Engine::new(config, ledger);
    let dlq = StdErrDLQ::default();

    let mut requests = ingestion.stream();
    while let Some(request) = requests.next().await {
        match request {
            Ok(request) => match engine.handle(request) {
                Ok(outcome) => println!("{outcome}"),
                Err(e) => println!("{e}"),
            },
            Err(e) => dlq.report(&e),
        }
    }

    Ok(())
}
