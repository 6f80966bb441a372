//! Option-chain signal engine.
//!
//! The core (`model`, `engine`, `config`) is synchronous and I/O free.
//! With the default `full` feature the crate adds live/offline fetching,
//! the batch runner, report writers and the dashboard API.

pub mod config;
pub mod engine;
pub mod example;
pub mod model;
pub mod schema;

#[cfg(feature = "full")]
pub mod api;
#[cfg(feature = "full")]
pub mod fetch;
#[cfg(feature = "full")]
pub mod report;
#[cfg(feature = "full")]
pub mod runner;
