use schemars::schema_for;

use crate::config::AppConfig;
use crate::model::raw::RawSnapshot;

/// Document kinds the `schema` and `example` commands can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "full", derive(clap::ValueEnum))]
pub enum DocumentKind {
    /// Option-chain payload accepted by the engine
    #[default]
    Snapshot,
    /// Application configuration file
    Config,
}

/// JSON Schema for the requested document.
pub fn schema_json(kind: DocumentKind) -> anyhow::Result<String> {
    let schema = match kind {
        DocumentKind::Snapshot => schema_for!(RawSnapshot),
        DocumentKind::Config => schema_for!(AppConfig),
    };
    Ok(serde_json::to_string_pretty(&schema)?)
}

/// Generate and print the JSON Schema for the requested document.
pub fn run(kind: DocumentKind) -> anyhow::Result<()> {
    println!("{}", schema_json(kind)?);
    Ok(())
}
