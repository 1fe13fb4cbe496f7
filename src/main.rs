//! CLI entry point for the picture slot tool

use clap::Parser;
use slotfill::io::cli::{BatchOutcome, Cli, CommandRunner};
use slotfill::io::logging::init_tracing;
use slotfill::io::progress::{CancelFlag, ProgressManager};

fn main() -> slotfill::Result<()> {
    let cli = Cli::parse();
    let logging = init_tracing(cli.verbose);

    let cancel = CancelFlag::new();
    if let Err(e) = cancel.cancel_on_interrupt() {
        tracing::warn!("Ctrl-C will not stop the batch cleanly: {e}");
    }

    let progress = ProgressManager::new(cli.should_show_progress(), cancel);
    let mut runner = CommandRunner::from_cli(&cli, progress)?;
    logging.set_verbose(runner.config().verbose_logging);

    match runner.run(&cli.command)? {
        BatchOutcome::Completed => {}
        BatchOutcome::Aborted(reason) => tracing::warn!("Aborted: {reason}"),
        BatchOutcome::Declined => tracing::info!("Cancelled by operator"),
        BatchOutcome::Cancelled => tracing::info!("Stopped early; completed work was kept"),
    }
    Ok(())
}
