//! Unit and integration tests for Speicherlupe.
//!
//! ## Test Modules
//!
//! - **budget_tests**: request defaults and clamping
//! - **topk_tests**: bounded ranked collections
//! - **classify_tests**: per-file heuristics
//! - **aggregate_tests**: directory roll-up
//! - **walker_tests**: bounded traversal and the trash estimator
//! - **analysis_tests**: the full engine against real directory trees
//! - **cleanup_tests**: cleanup preview
//! - **api_tests**: analysis, snapshot and preview endpoints
//! - **error_tests**: error mapping and validation
//! - **config_tests**: configuration loading and validation
//! - **db_tests**: schema and snapshot store
//! - **health_api_tests**: health, metrics and version endpoints
//!
//! Individual modules can be run with `cargo test walker_tests` etc.


pub mod aggregate_tests;
pub mod budget_tests;
pub mod db_tests;
pub mod walker_tests;
