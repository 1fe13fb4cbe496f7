//! Command-line interface exposing the scan, assign and clean batch operations

use crate::catalog::orientation::OrientationClassifier;
use crate::catalog::scanner::{SlotCatalogScanner, frames_without_size, size_folder_names};
use crate::catalog::slot::Slot;
use crate::io::assets::FsAssetCatalog;
use crate::io::bulk::{BulkState, PendingImports};
use crate::io::configuration::{PipelineConfig, REPORT_FILE_NAME};
use crate::io::error::{Result, fs_error};
use crate::io::image::PngResizer;
use crate::io::manifest::{ContainerKind, ContentManifest};
use crate::io::progress::ProgressManager;
use crate::io::report::write_report;
use crate::pipeline::assign::{RandomAssignmentEngine, load_compressed_variants, write_bindings};
use crate::pipeline::compress::{CompressionPipeline, load_source_library};
use crate::pipeline::reconcile::ReferenceReconciler;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Write as _;
use std::path::PathBuf;

/// Default location of the content manifest
pub const DEFAULT_MANIFEST: &str = "content.json";

#[derive(Parser)]
#[command(name = "slotfill")]
#[command(
    author,
    version,
    about = "Catalog picture slots, generate compressed variants and randomly assign them"
)]
/// Command-line arguments for the picture slot tool
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Content manifest describing templates and composed scenes
    #[arg(short, long, global = true, default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory asset identifiers are relative to
    #[arg(short, long, global = true)]
    pub project_root: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log per-file detail
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Operator commands
#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Scan usages and sizes, write the report and per-size folders
    Scan,
    /// Generate compressed variants and randomly assign them to frame slots
    Assign {
        /// Raw random-image pool folder, relative to the project root
        #[arg(short, long)]
        input: Option<String>,
        /// Case-insensitive substring required in source file names
        #[arg(short, long)]
        filter: Option<String>,
        /// Exclusive upper bound for the long side of variants
        #[arg(short = 'l', long)]
        max_long_side: Option<u32>,
        /// Random seed for a reproducible assignment
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Delete compressed variants no longer bound to any slot
    Clean,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Build the effective configuration: file values, then command-line overrides
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded or a value is invalid
    pub fn load_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(root) = &self.project_root {
            config.project_root.clone_from(root);
        }
        if self.verbose {
            config.verbose_logging = true;
        }
        if let Command::Assign {
            input,
            filter,
            max_long_side,
            ..
        } = &self.command
        {
            if let Some(input) = input {
                config.random_input_folder.clone_from(input);
            }
            if let Some(filter) = filter {
                config.name_filter.clone_from(filter);
            }
            if let Some(max) = max_long_side {
                config.max_long_side_exclusive = *max;
            }
        }

        let config = config.with_defaults();
        config.validate()?;
        Ok(config)
    }
}

/// How a batch operation ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every unit of work was attempted
    Completed,
    /// A precondition failed before any work started
    Aborted(String),
    /// The operator declined the confirmation prompt
    Declined,
    /// Stopped early on request; completed units were kept
    Cancelled,
}

/// Asks the operator to approve a mutating operation
pub trait Confirm {
    /// Return `true` to proceed
    fn confirm(&mut self, question: &str) -> bool;
}

/// Fixed answer, used for `--yes` and scripted runs
#[derive(Clone, Copy, Debug)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _question: &str) -> bool {
        self.0
    }
}

/// Interactive y/N prompt on the terminal
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, question: &str) -> bool {
        let mut stderr = std::io::stderr();
        if write!(stderr, "{question} [y/N] ").is_err() || stderr.flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if std::io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

/// Runs operator commands against one manifest and configuration
pub struct CommandRunner {
    config: PipelineConfig,
    manifest_path: PathBuf,
    progress: ProgressManager,
    confirm: Box<dyn Confirm>,
    codec: PngResizer,
    classifier: OrientationClassifier,
    bulk: BulkState,
    imports: PendingImports,
}

impl CommandRunner {
    /// Create a runner
    pub fn new(
        config: PipelineConfig,
        manifest_path: PathBuf,
        progress: ProgressManager,
        confirm: Box<dyn Confirm>,
    ) -> Self {
        let imports = PendingImports::new(config.resolve(&config.root_id()));
        Self {
            config,
            manifest_path,
            progress,
            confirm,
            codec: PngResizer::default(),
            classifier: OrientationClassifier::default(),
            bulk: BulkState::new(),
            imports,
        }
    }

    /// Create a runner from parsed arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded
    pub fn from_cli(cli: &Cli, progress: ProgressManager) -> Result<Self> {
        let confirm: Box<dyn Confirm> = if cli.yes {
            Box::new(AutoConfirm(true))
        } else {
            Box::new(TerminalConfirm)
        };
        Ok(Self::new(
            cli.load_config()?,
            cli.manifest.clone(),
            progress,
            confirm,
        ))
    }

    /// Effective configuration
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Files written outside any bulk operation, awaiting re-import
    pub fn pending_imports(&self) -> &[PathBuf] {
        self.imports.pending()
    }

    /// Dispatch one command
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest or output folders cannot be read or written
    pub fn run(&mut self, command: &Command) -> Result<BatchOutcome> {
        match command {
            Command::Scan => self.scan(),
            Command::Assign { seed, .. } => self.assign(*seed),
            Command::Clean => self.clean(),
        }
    }

    // Scans every container; the flag is set when cancelled part-way
    fn scan_all(&mut self, manifest: &ContentManifest, phase: &str) -> (Vec<Slot>, bool) {
        let catalog = FsAssetCatalog::new(&self.config.project_root);
        let scanner = SlotCatalogScanner::new(&catalog, &self.classifier);
        let mut slots = Vec::new();
        let mut cancelled = false;

        self.progress.begin_phase(phase, manifest.containers.len());
        for container in &manifest.containers {
            if !self.progress.next_unit(&container.path) {
                cancelled = true;
                break;
            }
            slots.extend(scanner.scan_container(container));
        }
        self.progress.finish_phase();
        (slots, cancelled)
    }

    /// Scan usages, write the report, create per-size folders
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be loaded or the report/folders cannot be written
    pub fn scan(&mut self) -> Result<BatchOutcome> {
        let manifest = ContentManifest::load(&self.manifest_path)?;
        let (slots, cancelled) = self.scan_all(&manifest, "Scan slots");

        let root = self.config.resolve(&self.config.root_id());
        let report_path = root.join(REPORT_FILE_NAME);
        write_report(&slots, &report_path)?;
        tracing::info!(
            "Report written: {} ({} slot(s))",
            report_path.display(),
            slots.len()
        );

        for group in size_folder_names(&slots) {
            let folder = root.join(&group);
            if !folder.is_dir() {
                std::fs::create_dir_all(&folder)
                    .map_err(|e| fs_error(&folder, "create directory", e))?;
                tracing::debug!("Created folder: {}", folder.display());
            }
        }

        for slot in frames_without_size(&slots, &self.config.frame_marker) {
            tracing::warn!(
                "Size {} for {} in {}; its orientation comes from names and geometry during random-assign",
                slot.size_group,
                slot.hierarchy_path,
                slot.container
            );
        }

        Ok(if cancelled {
            BatchOutcome::Cancelled
        } else {
            BatchOutcome::Completed
        })
    }

    /// Compress the raw pool and randomly assign variants to frame slots in composed scenes
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest or compressed folder cannot be read or written
    pub fn assign(&mut self, seed: Option<u64>) -> Result<BatchOutcome> {
        let input = self.config.input_dir();
        if !input.is_dir() {
            tracing::warn!("Folder not found: {}", input.display());
            return Ok(BatchOutcome::Aborted(format!(
                "input folder not found: {}",
                input.display()
            )));
        }

        if !self
            .confirm
            .confirm("This will generate resized images and modify scenes. Proceed?")
        {
            return Ok(BatchOutcome::Declined);
        }

        let bulk = self.bulk.begin();

        let library = load_source_library(&input, &self.config.name_filter, &self.codec);
        if library.is_empty() {
            tracing::warn!(
                "No images containing '{}' in name under {}",
                self.config.name_filter,
                input.display()
            );
            return Ok(BatchOutcome::Aborted(format!(
                "no source images under {}",
                input.display()
            )));
        }

        let compressed_dir = self.config.compressed_dir();
        let pipeline = CompressionPipeline::new(&self.codec, self.config.max_long_side_exclusive);
        let generated = pipeline.compress(
            &library,
            &compressed_dir,
            &bulk,
            &mut self.imports,
            &mut self.progress,
        )?;
        tracing::info!(
            "{} generated: portrait={}, landscape={}, skipped-existing={}, failed={}",
            self.config.compressed_folder_name,
            generated.portrait,
            generated.landscape,
            generated.skipped_existing,
            generated.failed
        );
        if generated.cancelled {
            return Ok(BatchOutcome::Cancelled);
        }

        let seed = seed.unwrap_or_else(rand::random);
        tracing::info!("Assignment seed: {seed}");
        let mut rng = StdRng::seed_from_u64(seed);

        let variants =
            load_compressed_variants(&compressed_dir, &self.config.compressed_id(), &self.codec);
        let mut manifest = ContentManifest::load(&self.manifest_path)?;
        let catalog = FsAssetCatalog::new(&self.config.project_root);
        let scanner = SlotCatalogScanner::new(&catalog, &self.classifier);
        let engine = RandomAssignmentEngine::new(self.config.frame_marker.clone());
        let mut cancelled = false;

        self.progress
            .begin_phase("Assign random images", manifest.containers.len());
        for container in &mut manifest.containers {
            if !self.progress.next_unit(&container.path) {
                cancelled = true;
                break;
            }
            if container.kind != ContainerKind::ComposedScene {
                continue;
            }

            let mut slots = scanner.scan_container(container);
            let assignment = engine.assign(&mut slots, &variants, &mut rng);
            for index in assignment.assigned {
                let Some(slot) = slots.get(index) else {
                    continue;
                };
                if let Err(e) = write_bindings(container, slot) {
                    tracing::error!("Failed to rebind: {e}");
                }
            }
        }
        self.progress.finish_phase();

        let updated = manifest.modified_count();
        if updated > 0 {
            manifest.save(&self.manifest_path)?;
        }
        drop(bulk);
        tracing::info!("Random-assigned images to {updated} scene(s)");

        Ok(if cancelled {
            BatchOutcome::Cancelled
        } else {
            BatchOutcome::Completed
        })
    }

    /// Delete compressed variants not bound by any slot in any container
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be loaded
    pub fn clean(&mut self) -> Result<BatchOutcome> {
        if !self
            .confirm
            .confirm("Delete unreferenced compressed images? This cannot be undone.")
        {
            return Ok(BatchOutcome::Declined);
        }

        let manifest = ContentManifest::load(&self.manifest_path)?;
        let (slots, cancelled) = self.scan_all(&manifest, "Scan references");
        // A partial reference set would delete images that are still in use
        if cancelled {
            return Ok(BatchOutcome::Cancelled);
        }

        let reconciler =
            ReferenceReconciler::new(self.config.compressed_dir(), self.config.compressed_id());
        let cleaned = reconciler.reconcile(&slots, &mut self.progress);
        tracing::info!(
            "Cleaned {} unreferenced compressed images. Kept referenced={}, failed={}",
            cleaned.deleted,
            cleaned.kept,
            cleaned.failed
        );

        Ok(if cleaned.cancelled {
            BatchOutcome::Cancelled
        } else {
            BatchOutcome::Completed
        })
    }
}
