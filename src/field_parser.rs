/// Marker that introduces the compound path value inside a structured field.
pub const PATH_MARKER: &str = "path: ";

/// The three parts of a `<path>/<fileName>.<ext>` compound field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileDescriptor {
    pub path: String,
    pub file_name: String,
    pub ext: String,
}

impl FileDescriptor {
    pub fn file_with_ext(&self) -> String {
        format!("{}.{}", self.file_name, self.ext)
    }
}

/// Parses the compound file value out of a raw manifest `file` field.
///
/// When the field carries a `path: ` marker, the value is the remainder of that line;
/// otherwise the first line of the field is taken as the value. The value is split at its
/// last `/` and the remainder at its last `.`. Returns `None` if a separator is missing or
/// any part is empty or does not begin with a word character.
pub fn parse_file_field(raw: &str) -> Option<FileDescriptor> {
    let value = match raw.find(PATH_MARKER) {
        Some(pos) => &raw[pos + PATH_MARKER.len()..],
        None => raw,
    };
    let value = &value[..line_end(value)];

    let (path, rest) = value.rsplit_once('/')?;
    let (file_name, ext) = rest.rsplit_once('.')?;

    if [path, file_name, ext].iter().all(|part| starts_with_word_char(part)) {
        Some(FileDescriptor {
            path: path.to_owned(),
            file_name: file_name.to_owned(),
            ext: ext.to_owned(),
        })
    } else {
        None
    }
}

/// Strips a leading `<digits>-` prefix from a slug. Slugs without the prefix pass through
/// unchanged. The result may be empty.
pub fn parse_slug(raw: &str) -> String {
    let digits = raw.bytes().take_while(u8::is_ascii_digit).count();
    match raw[digits..].strip_prefix('-') {
        Some(rest) if digits > 0 => rest.to_owned(),
        _ => raw.to_owned(),
    }
}

/// Byte offset where the first line of `s` ends, excluding any `\r\n` or `\n` terminator.
pub fn line_end(s: &str) -> usize {
    match s.find('\n') {
        Some(pos) if s[..pos].ends_with('\r') => pos - 1,
        Some(pos) => pos,
        None => s.len(),
    }
}

fn starts_with_word_char(s: &str) -> bool {
    s.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn descriptor(path: &str, file_name: &str, ext: &str) -> FileDescriptor {
        FileDescriptor {
            path: path.to_owned(),
            file_name: file_name.to_owned(),
            ext: ext.to_owned(),
        }
    }

    #[test]
    fn test_parse_bare_compound_field() {
        assert_eq!(
            parse_file_field("docs/report.pdf"),
            Some(descriptor("docs", "report", "pdf"))
        );
    }

    #[test]
    fn test_parse_nested_path_and_dotted_name() {
        assert_eq!(
            parse_file_field("uploads/2020/05/annual.report.v2.docx"),
            Some(descriptor("uploads/2020/05", "annual.report.v2", "docx"))
        );
    }

    #[test]
    fn test_parse_structured_field_uses_path_line() {
        let raw = "name: report.pdf\nsize: 1024\npath: docs/report.pdf";
        assert_eq!(parse_file_field(raw), Some(descriptor("docs", "report", "pdf")));

        let raw = "name: report.pdf\r\nsize: 1024\r\npath: docs/report.pdf\r\n";
        assert_eq!(parse_file_field(raw), Some(descriptor("docs", "report", "pdf")));
    }

    #[test]
    fn test_parse_rejects_missing_separators() {
        assert_eq!(parse_file_field("report.pdf"), None);
        assert_eq!(parse_file_field("docs/report"), None);
        assert_eq!(parse_file_field(""), None);
    }

    #[test]
    fn test_parse_rejects_empty_or_non_word_parts() {
        assert_eq!(parse_file_field("/report.pdf"), None);
        assert_eq!(parse_file_field("docs/.pdf"), None);
        assert_eq!(parse_file_field("docs/report."), None);
        assert_eq!(parse_file_field("docs/-report.pdf"), None);
        assert_eq!(parse_file_field("path: "), None);
    }

    #[test]
    fn test_parse_slug_strips_numeric_prefix() {
        assert_eq!(parse_slug("123-my-document"), "my-document");
        assert_eq!(parse_slug("42-annual-report"), "annual-report");
        assert_eq!(parse_slug("7-"), "");
    }

    #[test]
    fn test_parse_slug_without_prefix_is_unchanged() {
        assert_eq!(parse_slug("my-document"), "my-document");
        assert_eq!(parse_slug("-my-document"), "-my-document");
        assert_eq!(parse_slug("123document"), "123document");
        assert_eq!(parse_slug(""), "");
    }

    #[test]
    fn test_line_end() {
        assert_eq!(line_end("abc"), 3);
        assert_eq!(line_end("abc\ndef"), 3);
        assert_eq!(line_end("abc\r\ndef"), 3);
        assert_eq!(line_end("\n"), 0);
    }

    proptest! {
        #[test]
        fn prop_parse_file_field_splits_well_formed_values(
            path in "[a-z0-9_][a-z0-9_/-]{0,12}",
            file_name in "[A-Za-z0-9_][A-Za-z0-9_ -]{0,12}",
            ext in "[a-z0-9_]{1,5}",
        ) {
            let raw = format!("{}/{}.{}", path, file_name, ext);
            prop_assert_eq!(parse_file_field(&raw), Some(descriptor(&path, &file_name, &ext)));
        }

        #[test]
        fn prop_parse_file_field_requires_slash(value in "[a-z0-9_.]{0,20}") {
            prop_assert_eq!(parse_file_field(&value), None);
        }

        #[test]
        fn prop_parse_file_field_requires_dot_after_slash(
            path in "[a-z0-9_.]{1,10}",
            file_name in "[a-z0-9_]{1,10}",
        ) {
            let raw = format!("{}/{}", path, file_name);
            prop_assert_eq!(parse_file_field(&raw), None);
        }

        #[test]
        fn prop_parse_slug_strips_digit_prefix(digits in "[0-9]{1,6}", rest in "[a-z-]{0,16}") {
            let slug = format!("{}-{}", digits, rest);
            prop_assert_eq!(parse_slug(&slug), rest);
        }

        #[test]
        fn prop_parse_slug_is_identity_without_digit_prefix(slug in "[a-z][a-z0-9-]{0,16}") {
            prop_assert_eq!(parse_slug(&slug), slug.clone());
            prop_assert_eq!(parse_slug(&parse_slug(&slug)), parse_slug(&slug));
        }
    }
}
