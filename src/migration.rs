// Migration phases
// 1. Preflight
//      - Manifest must exist, root must be a directory, output's folder must exist
//      - Any failure aborts before anything is touched
// 2. Loading
//      - Read and decode the manifest. Invalid JSON or an empty list aborts
// 3. Parsing
//      - Split items into validated records and rejects; apply the reject policy
//      - A `fail` policy aborts on the first reject, still before any rename
// 4. Processing
//      - For each record, in manifest order:
//          - Missing source: skip
//          - Destination already taken by a different file: skip
//          - Rename; if it errors or the destination is absent afterwards: skip
//          - Otherwise append one UPDATE statement
//      - No record aborts the batch and nothing is retried
// 5. Done
//      - Write the accumulated SQL (possibly empty) to the output, replacing its contents

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, error, info, trace, warn};

use crate::config::RejectPolicy;
use crate::error::MigrateError;
use crate::fs_ops::FileOps;
use crate::manifest::{self, ManifestItem, ValidatedRecord};
use crate::sql;
use crate::transformer;

/// Counters and generated SQL for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub parsed: usize,
    pub rejected: usize,
    /// Files renamed. In a dry run, renames that would have been attempted.
    pub renamed: usize,
    pub missing_source: usize,
    pub destination_exists: usize,
    pub rename_failed: usize,
    pub statements: usize,
    pub sql: String,
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records parsed ({} rejected), {} renamed, {} missing, {} blocked, {} failed, {} statements",
            self.parsed,
            self.rejected,
            self.renamed,
            self.missing_source,
            self.destination_exists,
            self.rename_failed,
            self.statements
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordOutcome {
    Renamed,
    MissingSource,
    DestinationExists,
    RenameFailed,
}

pub struct Migration {
    manifest: PathBuf,
    root: PathBuf,
    output: PathBuf,
    reject_policy: RejectPolicy,
    dry_run: bool,
}

impl Migration {
    pub fn new(manifest: impl Into<PathBuf>, root: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Migration {
            manifest: manifest.into(),
            root: root.into(),
            output: output.into(),
            reject_policy: RejectPolicy::default(),
            dry_run: false,
        }
    }

    pub fn with_reject_policy(mut self, reject_policy: RejectPolicy) -> Self {
        self.reject_policy = reject_policy;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run(&self, fs: &dyn FileOps) -> Result<MigrationReport, MigrateError> {
        self.preflight(fs)?;

        let items = self.load(fs)?;

        let mut report = MigrationReport::default();
        let records = self.parse(&items, &mut report)?;

        debug!("Processing {} records", records.len());
        for record in &records {
            match self.process_record(fs, record, &mut report) {
                RecordOutcome::Renamed => report.renamed += 1,
                RecordOutcome::MissingSource => report.missing_source += 1,
                RecordOutcome::DestinationExists => report.destination_exists += 1,
                RecordOutcome::RenameFailed => report.rename_failed += 1,
            }
        }

        if self.dry_run {
            info!("Dry run: {} not written", self.output.display());
        } else {
            fs.write(&self.output, &report.sql).map_err(|e| {
                MigrateError::Error(format!(
                    "Failed to write {} after renaming {} files: {}",
                    self.output.display(),
                    report.renamed,
                    e
                ))
            })?;
            info!("Files renamed and queries generated to: {}", self.output.display());
        }

        Ok(report)
    }

    fn preflight(&self, fs: &dyn FileOps) -> Result<(), MigrateError> {
        if !fs.exists(&self.manifest) {
            return Err(MigrateError::Error(format!(
                "Incorrect data file name: {}",
                self.manifest.display()
            )));
        }

        if !fs.is_dir(&self.root) {
            return Err(MigrateError::Error(format!(
                "Incorrect files folder name: {}",
                self.root.display()
            )));
        }

        let output_folder = self
            .output
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        if !fs.is_dir(output_folder) {
            return Err(MigrateError::Error(format!(
                "Output folder does not exist: {}",
                output_folder.display()
            )));
        }

        if !fs.exists(&self.output) {
            info!("Output file {} does not exist, it will be created", self.output.display());
        }

        Ok(())
    }

    fn load(&self, fs: &dyn FileOps) -> Result<Vec<ManifestItem>, MigrateError> {
        debug!("Loading manifest {}", self.manifest.display());
        let text = fs.read_to_string(&self.manifest)?;
        let items = manifest::load_manifest(&text)?;
        info!("Loaded {} items from {}", items.len(), self.manifest.display());

        Ok(items)
    }

    fn parse(
        &self,
        items: &[ManifestItem],
        report: &mut MigrationReport,
    ) -> Result<Vec<ValidatedRecord>, MigrateError> {
        let outcome = manifest::parse_items(items);

        for rejected in &outcome.rejected {
            match self.reject_policy {
                RejectPolicy::Silent => debug!("Skipping record {}: {}", rejected.id, rejected.reason),
                RejectPolicy::Warn => warn!("Skipping record {}: {}", rejected.id, rejected.reason),
                RejectPolicy::Fail => {
                    return Err(MigrateError::Rejected {
                        id: rejected.id,
                        reason: rejected.reason.clone(),
                    })
                }
            }
        }

        report.parsed = outcome.valid.len();
        report.rejected = outcome.rejected.len();

        Ok(outcome.valid)
    }

    fn process_record(
        &self,
        fs: &dyn FileOps,
        record: &ValidatedRecord,
        report: &mut MigrationReport,
    ) -> RecordOutcome {
        trace!("Record {}: raw file field {:?}", record.id, record.raw_field);
        let plan = transformer::build_rename_plan(record, &self.root);

        if !fs.exists(&plan.from) {
            info!("Record {}: source file {} not found", record.id, plan.from.display());
            return RecordOutcome::MissingSource;
        }

        if !plan.is_noop() && fs.exists(&plan.to) && !fs.same_file(&plan.from, &plan.to) {
            warn!(
                "Record {}: {} already exists, not overwriting it with {}",
                record.id,
                plan.to.display(),
                plan.from.display()
            );
            return RecordOutcome::DestinationExists;
        }

        if self.dry_run {
            info!("Would rename {} -> {}", plan.from.display(), plan.to.display());
        } else {
            if let Err(e) = fs.rename(&plan.from, &plan.to) {
                error!("Error of rename file {}: {}", plan.from.display(), e);
                return RecordOutcome::RenameFailed;
            }
            if !fs.exists(&plan.to) {
                error!(
                    "Error of rename file {}: {} not found after rename",
                    plan.from.display(),
                    plan.to.display()
                );
                return RecordOutcome::RenameFailed;
            }
            info!("File successfully renamed: {}", plan.to.display());
        }

        let field = transformer::build_updated_field_text(record);
        debug!(
            "Record {}: name {:?}, path {:?} -> {:?}",
            record.id,
            record.field_text.stored_name(),
            record.field_text.stored_path(),
            field
        );
        report.sql.push_str(&sql::render_update(&field, record.id));
        report.statements += 1;

        RecordOutcome::Renamed
    }
}
