//! # Speicherlupe
//!
//! Bounded filesystem investigation for endpoint agents. An operator asks for
//! one path to be analyzed; the engine walks the tree once under an entry and
//! wall-clock budget and reports the largest consumers, cleanup candidates,
//! stale downloads, unrotated logs, name+size duplicate candidates and trash
//! usage. A bound being hit yields an explicitly flagged partial result, never
//! an error.
//!
//! ## Core Components
//!
//! - [`analysis`]: the traversal engine and its collectors
//! - [`cleanup`]: read-only cleanup preview over a stored snapshot
//! - [`config`]: layered application configuration
//! - [`db`]: SQLite schema and snapshot store
//! - [`error`]: engine and HTTP error types
//! - [`metrics`]: process-wide counters
//! - [`routes`]: HTTP API endpoint handlers
//! - [`state`]: shared application state
//! - [`types`]: wire types shared by engine and API

pub mod analysis;
pub mod cleanup;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
