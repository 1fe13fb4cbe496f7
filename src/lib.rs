//! Picture slot cataloging, size-normalized variant generation and orientation-pure random assignment
//!
//! A run scans templates and composed scenes for picture slots, generates
//! compressed variants of a raw image pool whose long side stays below a bound,
//! assigns those variants to frame slots without ever mixing portrait and
//! landscape, and deletes variants no slot references any more.

#![forbid(unsafe_code)]

/// Slot discovery, size groups and orientation classification
pub mod catalog;
/// Input/output collaborators, configuration, CLI and error handling
pub mod io;
/// Compression, assignment and reconciliation passes
pub mod pipeline;

pub use io::error::{Result, SlotError};
