use thiserror::Error;

use crate::field_parser::{line_end, PATH_MARKER};

pub const NAME_MARKER: &str = "name: ";
pub const SIZE_MARKER: &str = "size:";

/// Layout problems that make a field impossible to rewrite safely.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldTextError {
    #[error("field has a 'path: ' marker but no 'name: ' line")]
    MissingNameMarker,

    #[error("field has more than one 'name: ' line")]
    DuplicateNameMarker,

    #[error("field has no 'size:' line after its 'name: ' line")]
    MissingSizeLine,

    #[error("field has no 'path: ' marker after its 'size:' line")]
    MissingPathMarker,

    /// Counted over the whole text, including the `name: ` line
    #[error("field has more than one 'path: ' marker")]
    DuplicatePathMarker,
}

/// The raw manifest `file` field split into the pieces a rename rewrites.
///
/// A field is either a bare compound value (`docs/report.pdf`) or a small record:
///
/// ```text
/// name: report.pdf
/// size: 1024
/// path: docs/report.pdf
/// ```
///
/// In a record, `name` is the rest of the `name: ` line and `path` runs from the `path: `
/// marker to the end of the text. Only those two values change on rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldText {
    Bare {
        value: String,
        suffix: String,
    },
    Structured {
        prefix: String,
        name: String,
        middle: String,
        path: String,
    },
}

impl FieldText {
    pub fn parse(raw: &str) -> Result<Self, FieldTextError> {
        let Some(name_line) = find_line_starting(raw, 0, NAME_MARKER) else {
            if raw.contains(PATH_MARKER) {
                return Err(FieldTextError::MissingNameMarker);
            }
            let end = line_end(raw);
            return Ok(FieldText::Bare {
                value: raw[..end].to_owned(),
                suffix: raw[end..].to_owned(),
            });
        };

        let name_start = name_line + NAME_MARKER.len();
        if find_line_starting(raw, name_start, NAME_MARKER).is_some() {
            return Err(FieldTextError::DuplicateNameMarker);
        }
        let name_end = name_start + line_end(&raw[name_start..]);

        let size_line =
            find_line_starting(raw, name_end, SIZE_MARKER).ok_or(FieldTextError::MissingSizeLine)?;
        let path_start = raw[size_line..]
            .find(PATH_MARKER)
            .map(|pos| size_line + pos + PATH_MARKER.len())
            .ok_or(FieldTextError::MissingPathMarker)?;
        // The compound value is read from the first marker in the whole text, so a second
        // one anywhere makes the field ambiguous
        if raw.matches(PATH_MARKER).count() > 1 {
            return Err(FieldTextError::DuplicatePathMarker);
        }

        Ok(FieldText::Structured {
            prefix: raw[..name_start].to_owned(),
            name: raw[name_start..name_end].to_owned(),
            middle: raw[name_end..path_start].to_owned(),
            path: raw[path_start..].to_owned(),
        })
    }

    /// The stored `name: ` value, if the field is a record.
    pub fn stored_name(&self) -> Option<&str> {
        match self {
            FieldText::Bare { .. } => None,
            FieldText::Structured { name, .. } => Some(name),
        }
    }

    /// The stored compound path value.
    pub fn stored_path(&self) -> &str {
        match self {
            FieldText::Bare { value, .. } => value,
            FieldText::Structured { path, .. } => path,
        }
    }

    /// Re-joins the field with new `name` and `path` values. A bare field only carries the
    /// path value.
    pub fn render(&self, name_value: &str, path_value: &str) -> String {
        match self {
            FieldText::Bare { suffix, .. } => format!("{}{}", path_value, suffix),
            FieldText::Structured { prefix, middle, .. } => {
                format!("{}{}{}{}", prefix, name_value, middle, path_value)
            }
        }
    }
}

/// Finds the first line at or after byte `from` that starts with `marker`, returning the
/// byte offset of that line.
fn find_line_starting(raw: &str, from: usize, marker: &str) -> Option<usize> {
    let line_starts = std::iter::once(0).chain(raw.match_indices('\n').map(|(pos, _)| pos + 1));
    line_starts
        .filter(|&start| start >= from)
        .find(|&start| raw[start..].starts_with(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RECORD: &str = "name: report.pdf\nsize: 1024\npath: docs/report.pdf";

    #[test]
    fn test_parse_bare_field() {
        assert_eq!(
            FieldText::parse("docs/report.pdf").unwrap(),
            FieldText::Bare {
                value: "docs/report.pdf".into(),
                suffix: "".into(),
            }
        );
        assert_eq!(
            FieldText::parse("docs/report.pdf\n").unwrap(),
            FieldText::Bare {
                value: "docs/report.pdf".into(),
                suffix: "\n".into(),
            }
        );
    }

    #[test]
    fn test_parse_structured_field() {
        assert_eq!(
            FieldText::parse(RECORD).unwrap(),
            FieldText::Structured {
                prefix: "name: ".into(),
                name: "report.pdf".into(),
                middle: "\nsize: 1024\npath: ".into(),
                path: "docs/report.pdf".into(),
            }
        );
    }

    #[test]
    fn test_path_value_runs_to_end_of_text() {
        let raw = "---\nname: report.pdf\nmime: application/pdf\nsize: 1024 path: docs/report.pdf\nhash: abc\n";
        let parsed = FieldText::parse(raw).unwrap();
        assert_eq!(
            parsed,
            FieldText::Structured {
                prefix: "---\nname: ".into(),
                name: "report.pdf".into(),
                middle: "\nmime: application/pdf\nsize: 1024 path: ".into(),
                path: "docs/report.pdf\nhash: abc\n".into(),
            }
        );
        assert_eq!(parsed.stored_name(), Some("report.pdf"));
        assert_eq!(parsed.stored_path(), "docs/report.pdf\nhash: abc\n");
    }

    #[test]
    fn test_name_marker_must_start_a_line() {
        let raw = "filename: report.pdf\nsize: 1\npath: docs/report.pdf";
        assert_eq!(FieldText::parse(raw), Err(FieldTextError::MissingNameMarker));
    }

    #[test]
    fn test_layout_errors() {
        assert_eq!(
            FieldText::parse("path: docs/report.pdf"),
            Err(FieldTextError::MissingNameMarker)
        );
        assert_eq!(
            FieldText::parse("name: a.pdf\nname: b.pdf\nsize: 1\npath: docs/a.pdf"),
            Err(FieldTextError::DuplicateNameMarker)
        );
        assert_eq!(
            FieldText::parse("name: a.pdf\npath: docs/a.pdf"),
            Err(FieldTextError::MissingSizeLine)
        );
        assert_eq!(
            FieldText::parse("size: 1\nname: a.pdf\npath: docs/a.pdf"),
            Err(FieldTextError::MissingSizeLine)
        );
        assert_eq!(
            FieldText::parse("name: a.pdf\nsize: 1\n"),
            Err(FieldTextError::MissingPathMarker)
        );
        assert_eq!(
            FieldText::parse("name: a.pdf\nsize: 1\npath: docs/a.pdf\npath: docs/b.pdf"),
            Err(FieldTextError::DuplicatePathMarker)
        );
        assert_eq!(
            FieldText::parse("name: path: x/a.pdf\nsize: 1\npath: docs/a.pdf"),
            Err(FieldTextError::DuplicatePathMarker)
        );
    }

    #[test]
    fn test_render_replaces_only_name_and_path() {
        let parsed = FieldText::parse(RECORD).unwrap();
        assert_eq!(
            parsed.render("annual-report.pdf", "docs/annual-report.pdf"),
            "name: annual-report.pdf\nsize: 1024\npath: docs/annual-report.pdf"
        );

        let bare = FieldText::parse("docs/report.pdf").unwrap();
        assert_eq!(
            bare.render("annual-report.pdf", "docs/annual-report.pdf"),
            "docs/annual-report.pdf"
        );
    }

    #[test]
    fn test_render_drops_trailing_text_after_path() {
        let raw = "---\nname: report.pdf\r\nsize: 1024\r\npath: docs/report.pdf\r\nhash: abc\n";
        let parsed = FieldText::parse(raw).unwrap();
        let rendered = parsed.render("annual-report.pdf", "docs/annual-report.pdf");

        assert_eq!(
            rendered,
            "---\nname: annual-report.pdf\r\nsize: 1024\r\npath: docs/annual-report.pdf"
        );
        assert!(rendered.ends_with("/annual-report.pdf"));
    }

    #[test]
    fn test_bare_field_accessors() {
        let bare = FieldText::parse("docs/report.pdf\n").unwrap();
        assert_eq!(bare.stored_name(), None);
        assert_eq!(bare.stored_path(), "docs/report.pdf");
    }
}
