//! Phase progress display and cooperative cancellation

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicBool, Ordering};

static PHASE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] {{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{wide_msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Shared flag requesting that a batch stop before its next unit of work
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create an unset flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Set this flag when the process receives Ctrl-C
    ///
    /// Only one interrupt handler can exist per process.
    ///
    /// # Errors
    ///
    /// Returns an error if a handler is already installed or the OS refuses one
    pub fn cancel_on_interrupt(&self) -> std::result::Result<(), ctrlc::Error> {
        let flag = self.clone();
        ctrlc::set_handler(move || flag.cancel())
    }
}

/// Per-phase progress bars; silent when disabled
pub struct ProgressManager {
    enabled: bool,
    bar: Option<ProgressBar>,
    cancel: CancelFlag,
}

impl ProgressManager {
    /// Create a manager; `enabled = false` suppresses all drawing
    pub fn new(enabled: bool, cancel: CancelFlag) -> Self {
        Self {
            enabled,
            bar: None,
            cancel,
        }
    }

    /// Create a manager that never draws
    pub fn hidden() -> Self {
        Self::new(false, CancelFlag::new())
    }

    /// Start a new phase of `len` units, finishing any previous one
    pub fn begin_phase(&mut self, name: &str, len: usize) {
        self.finish_phase();
        if !self.enabled {
            return;
        }
        let bar = ProgressBar::new(len as u64);
        bar.set_style(PHASE_STYLE.clone());
        bar.set_prefix(name.to_string());
        self.bar = Some(bar);
    }

    /// Check for cancellation, then report that `item` is being processed
    ///
    /// Returns `false` when the batch should stop before this unit.
    pub fn next_unit(&self, item: &str) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        if let Some(ref bar) = self.bar {
            bar.set_message(item.to_string());
            bar.inc(1);
        }
        true
    }

    /// Clear the current phase bar
    pub fn finish_phase(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    /// Flag shared with whoever may cancel the batch
    pub const fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for ProgressManager {
    fn drop(&mut self) {
        self.finish_phase();
    }
}
