mod logger;
mod repl;

use anyhow::Context;
use logger::FileEventLog;
use matching_engine::{EngineConfig, MatchingEngine};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // All durable files live under one directory
    let data_dir = std::env::var("LOB_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let data_dir = PathBuf::from(data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;

    tracing::info!(data_dir = %data_dir.display(), "starting console");

    let events = Arc::new(
        FileEventLog::open(data_dir.join("events.log")).context("opening event log")?,
    );
    let config = EngineConfig::new(&data_dir);
    let mut engine =
        MatchingEngine::open(&config, events).context("opening matching engine")?;

    let stdin = io::stdin().lock();
    let mut stdout = io::stdout();
    repl::run(&mut engine, stdin, &mut stdout)?;

    // Dropping the engine exports the final snapshot
    drop(engine);
    println!("Exiting gracefully.");
    Ok(())
}
