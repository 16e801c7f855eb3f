use std::path::{Path, PathBuf};

use crate::manifest::ValidatedRecord;

/// Source and destination of one file rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl RenamePlan {
    /// True when the normalized name equals the stored one.
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Rewrites the record's field so that both its name and its path point at the
/// normalized file name, keeping the original path and extension.
pub fn build_updated_field_text(record: &ValidatedRecord) -> String {
    let file_with_ext = format!("{}.{}", record.file_name, record.file.ext);
    let path_value = format!("{}/{}", record.file.path, file_with_ext);

    record.field_text.render(&file_with_ext, &path_value)
}

pub fn build_rename_plan(record: &ValidatedRecord, root: &Path) -> RenamePlan {
    let folder = root.join(&record.file.path);

    RenamePlan {
        from: folder.join(record.file.file_with_ext()),
        to: folder.join(format!("{}.{}", record.file_name, record.file.ext)),
    }
}
