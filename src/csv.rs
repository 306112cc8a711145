//! CSV import/export for the credential list.
//!
//! The wire format is a fixed three-column CSV: `url,username,password`.
//! Export quotes every field (internal quotes doubled, standard CSV
//! quoting).  Import is strict about the header — wrong column count,
//! names, or order rejects the whole file before a single row is read —
//! but tolerant about rows: a malformed row is counted and skipped, and
//! parsing continues.
//!
//! Field extraction uses an explicit quoted-field-or-bare-field scanner,
//! so "fewer than 3 fields" and "empty field" are well-defined outcomes
//! rather than artifacts of string splitting.

use crate::errors::{Result, VaultError};
use crate::vault::entry::CredentialEntry;

/// The one and only accepted header, in this exact order.
const EXPECTED_COLUMNS: [&str; 3] = ["url", "username", "password"];

/// Outcome of parsing a CSV import.
///
/// `entries` holds the accepted new entries in input-line order;
/// `error_count` is the number of rows that were skipped as malformed.
/// Duplicates are dropped silently and appear in neither.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub entries: Vec<CredentialEntry>,
    pub error_count: usize,
}

/// Serialize entries to CSV, one line per entry in input order.
///
/// Fields map service→url, username→username, secret→password, each
/// individually quoted.
pub fn serialize(entries: &[CredentialEntry]) -> String {
    let mut out = String::from("url,username,password\n");

    for entry in entries {
        out.push_str(&escape_field(&entry.service));
        out.push(',');
        out.push_str(&escape_field(&entry.username));
        out.push(',');
        out.push_str(&escape_field(&entry.secret));
        out.push('\n');
    }

    out
}

/// Validate the header line of a CSV import.
///
/// The first non-blank line must hold exactly `url,username,password`
/// (case-insensitive, quotes and surrounding whitespace ignored, order
/// fixed).  Error messages name the exact count and columns found so the
/// user can fix the file.
pub fn validate_header(content: &str) -> Result<()> {
    let header = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or(VaultError::EmptySource)?;

    let columns: Vec<String> = header
        .split(',')
        .map(|col| strip_quotes(col.trim()).trim().to_ascii_lowercase())
        .collect();

    if columns.len() != EXPECTED_COLUMNS.len() {
        return Err(VaultError::MalformedHeader(format!(
            "the file must have exactly 3 columns (url,username,password), found {} column(s): {}",
            columns.len(),
            columns.join(", ")
        )));
    }

    if columns != EXPECTED_COLUMNS {
        return Err(VaultError::MalformedHeader(format!(
            "columns must be url,username,password in that exact order, found: {}",
            columns.join(", ")
        )));
    }

    Ok(())
}

/// Parse CSV content into new credential entries.
///
/// After header validation, each non-blank data line is handled
/// independently: rows with fewer than 3 extractable fields or with an
/// empty field value are counted in `error_count` and skipped.  Rows
/// whose service+username+secret match an entry in `existing` — or an
/// earlier accepted row of this same parse — are dropped silently.
/// Accepted rows become entries with freshly generated ids, in input
/// order.
pub fn parse(content: &str, existing: &[CredentialEntry]) -> Result<ImportReport> {
    validate_header(content)?;

    let mut entries: Vec<CredentialEntry> = Vec::new();
    let mut error_count = 0;

    let data_lines = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .skip(1); // header

    for line in data_lines {
        let fields = split_fields(line);
        if fields.len() < 3 {
            error_count += 1;
            continue;
        }

        let service = fields[0].trim();
        let username = fields[1].trim();
        let secret = fields[2].trim();

        if service.is_empty() || username.is_empty() || secret.is_empty() {
            error_count += 1;
            continue;
        }

        let candidate =
            CredentialEntry::new(service.to_string(), username.to_string(), secret.to_string());

        let duplicate = existing.iter().any(|e| e.same_content(&candidate))
            || entries.iter().any(|e| e.same_content(&candidate));
        if duplicate {
            continue;
        }

        entries.push(candidate);
    }

    Ok(ImportReport {
        entries,
        error_count,
    })
}

/// Quote a field for CSV output, doubling internal double quotes.
fn escape_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Strip one pair of surrounding double quotes, if present.
fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Split one CSV line into its fields.
///
/// Grammar per field: optional leading whitespace, then either a quoted
/// field (`"` up to the matching `"`, with `""` as an escaped quote) or
/// a bare field (everything up to the next comma).  Anything between a
/// closing quote and the next comma is ignored; an unterminated quote
/// runs to the end of the line.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        // Leading whitespace before the field body.
        while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
            chars.next();
        }

        let mut field = String::new();

        if chars.peek() == Some(&'"') {
            chars.next(); // opening quote
            loop {
                match chars.next() {
                    Some('"') => {
                        if chars.peek() == Some(&'"') {
                            chars.next();
                            field.push('"');
                        } else {
                            break; // closing quote
                        }
                    }
                    Some(c) => field.push(c),
                    None => break, // unterminated quote
                }
            }
            // Skip anything up to the separator.
            while matches!(chars.peek(), Some(&c) if c != ',') {
                chars.next();
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == ',' {
                    break;
                }
                field.push(c);
                chars.next();
            }
        }

        fields.push(field);

        match chars.next() {
            Some(',') => continue,
            _ => break,
        }
    }

    fields
}
