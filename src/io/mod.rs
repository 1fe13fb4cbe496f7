/// Image asset records and dimension lookup
pub mod assets;
/// Scoped bulk operations and reactive import hooks
pub mod bulk;
/// Command-line parsing and the batch command runner
pub mod cli;
/// Constants and runtime configuration
pub mod configuration;
/// Error type shared by every module
pub mod error;
/// Image decode, resize and encode primitives
pub mod image;
/// Tracing subscriber setup
pub mod logging;
/// Content manifest model and persistence
pub mod manifest;
/// Progress display and cooperative cancellation
pub mod progress;
/// Plain-text usage report
pub mod report;
