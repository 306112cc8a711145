//! The file sink/source boundary for CSV import and export.
//!
//! The host owns pickers and share sheets; this module owns what happens
//! at the filesystem edge: naming the export, writing it atomically, and
//! rejecting unusable import sources before any parsing starts.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::crypto::random;
use crate::errors::{Result, VaultError};

/// Digits in the random token appended to export file names.
const TOKEN_DIGITS: usize = 6;

/// A serialized export ready for the file sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Suggested file name, e.g. `credentials_07-08-2026_483172.csv`.
    pub file_name: String,
    /// The full CSV content, UTF-8.
    pub content: String,
}

/// Build an export file name: date plus a random token so repeated
/// exports on the same day never collide.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!(
        "credentials_{}_{}.csv",
        now.format("%d-%m-%Y"),
        random::numeric_token(TOKEN_DIGITS)
    )
}

/// Write an export into `dir` atomically and return the final path.
///
/// Writes to a temp file in the same directory first, then renames, so a
/// reader never sees a half-written export.
pub fn write_export(dir: &Path, export: &CsvExport) -> Result<PathBuf> {
    let target = dir.join(&export.file_name);
    let tmp = dir.join(format!(".{}.tmp", export.file_name));

    fs::write(&tmp, export.content.as_bytes())?;
    fs::rename(&tmp, &target)?;

    Ok(target)
}

/// Read CSV content from a picked import file.
///
/// A missing path means the picker produced nothing (`NoFileSelected`);
/// blank content is rejected (`EmptySource`) before parsing begins.
pub fn read_import(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(VaultError::NoFileSelected);
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(VaultError::EmptySource);
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        rfc3339.parse().unwrap()
    }

    #[test]
    fn file_name_carries_date_and_token() {
        let name = export_file_name(at("2026-08-07T12:00:00Z"));
        assert!(name.starts_with("credentials_07-08-2026_"));
        assert!(name.ends_with(".csv"));

        let token = name
            .trim_start_matches("credentials_07-08-2026_")
            .trim_end_matches(".csv");
        assert_eq!(token.len(), TOKEN_DIGITS);
        assert!(token.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn file_names_differ_between_exports() {
        let now = at("2026-08-07T12:00:00Z");
        assert_ne!(export_file_name(now), export_file_name(now));
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = TempDir::new().unwrap();
        let export = CsvExport {
            file_name: "credentials_test.csv".into(),
            content: "url,username,password\n\"a\",\"b\",\"c\"\n".into(),
        };

        let path = write_export(dir.path(), &export).unwrap();
        assert_eq!(read_import(&path).unwrap(), export.content);
    }

    #[test]
    fn write_leaves_no_temp_file_behind() {
        let dir = TempDir::new().unwrap();
        let export = CsvExport {
            file_name: "out.csv".into(),
            content: "url,username,password\n".into(),
        };

        write_export(dir.path(), &export).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["out.csv"]);
    }

    #[test]
    fn missing_import_file_is_no_file_selected() {
        let dir = TempDir::new().unwrap();
        let result = read_import(&dir.path().join("nope.csv"));
        assert!(matches!(result, Err(VaultError::NoFileSelected)));
    }

    #[test]
    fn blank_import_file_is_empty_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blank.csv");
        fs::write(&path, "  \n \n").unwrap();

        assert!(matches!(read_import(&path), Err(VaultError::EmptySource)));
    }
}
