use serde::Deserialize;
use thiserror::Error;

use crate::error::MigrateError;
use crate::field_parser::{self, FileDescriptor};
use crate::field_text::{FieldText, FieldTextError};

/// One record of the input manifest, as exported from the CMS.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestItem {
    pub id: i64,
    pub file: String,
    pub slug: String,
}

/// Decodes the manifest text. An empty list is an error: there is nothing to migrate and
/// the operator most likely pointed at the wrong file.
pub fn load_manifest(text: &str) -> Result<Vec<ManifestItem>, MigrateError> {
    let items: Vec<ManifestItem> = serde_json::from_str(text)?;
    if items.is_empty() {
        return Err(MigrateError::EmptyManifest);
    }
    Ok(items)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("file field is not of the form '<path>/<fileName>.<ext>'")]
    MalformedFileField,

    #[error("slug yields an empty file name")]
    EmptyFileName,

    #[error("slug yields a file name that leaves its folder: '{0}'")]
    UnsafeFileName(String),

    #[error("{0}")]
    FieldLayout(#[from] FieldTextError),
}

/// A manifest item that survived parsing and can be migrated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    pub id: i64,
    pub file: FileDescriptor,
    /// Normalized file name derived from the slug, without extension
    pub file_name: String,
    pub field_text: FieldText,
    pub raw_field: String,
}

impl ValidatedRecord {
    pub fn from_item(item: &ManifestItem) -> Result<Self, RejectReason> {
        let file =
            field_parser::parse_file_field(&item.file).ok_or(RejectReason::MalformedFileField)?;

        let file_name = field_parser::parse_slug(&item.slug);
        if file_name.is_empty() {
            return Err(RejectReason::EmptyFileName);
        }
        if !is_plain_file_name(&file_name) {
            return Err(RejectReason::UnsafeFileName(file_name));
        }

        let field_text = FieldText::parse(&item.file)?;

        Ok(ValidatedRecord {
            id: item.id,
            file,
            file_name,
            field_text,
            raw_field: item.file.clone(),
        })
    }
}

/// A single path component that stays in the record's folder when joined.
fn is_plain_file_name(name: &str) -> bool {
    !name.contains(['/', '\\']) && name != "." && name != ".."
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub id: i64,
    pub reason: RejectReason,
}

#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub valid: Vec<ValidatedRecord>,
    pub rejected: Vec<Rejected>,
}

/// Splits manifest items into migratable records and rejects. Both lists keep manifest order.
pub fn parse_items(items: &[ManifestItem]) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for item in items {
        match ValidatedRecord::from_item(item) {
            Ok(record) => outcome.valid.push(record),
            Err(reason) => outcome.rejected.push(Rejected { id: item.id, reason }),
        }
    }

    outcome
}
