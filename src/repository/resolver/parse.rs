//! History-line parsing
//!
//! The broad scan emits blocks of `<40-hex-id> <unix-seconds> <subject>`
//! headers followed by `--name-status` changed-path lines. This module
//! turns single lines into domain values; it never looks across lines.

use gix_hash::ObjectId;

use crate::model::PartialCommit;

use super::types::ResolveError;

/// Minimum commit-header width: 40-char id, space, at least one timestamp
/// digit, space, message.
const MIN_COMMIT_LINE_LEN: usize = 43;

fn malformed(line: &str) -> ResolveError {
    ResolveError::MalformedLine(line.to_string())
}

/// Parse one commit-header line into a PartialCommit.
pub(crate) fn parse_commit_line(line: &str) -> Result<PartialCommit, ResolveError> {
    if line.len() < MIN_COMMIT_LINE_LEN {
        return Err(malformed(line));
    }
    let bytes = line.as_bytes();
    let id = ObjectId::from_hex(&bytes[..40]).map_err(|_| malformed(line))?;
    if bytes[40] != b' ' {
        return Err(malformed(line));
    }
    // The first 41 bytes are ASCII at this point, so slicing is safe.
    let rest = &line[41..];
    let (ts_part, message) = rest.split_once(' ').ok_or_else(|| malformed(line))?;
    let timestamp: i64 = ts_part.parse().map_err(|_| malformed(line))?;
    Ok(PartialCommit {
        id,
        timestamp,
        message: message.to_string(),
    })
}

/// A `--name-status` line starts with an uppercase status code (`M`, `A`,
/// `D`, `R100`, ...); commit headers start with a lowercase hex digit.
/// Status code semantics are not interpreted, only the line shape.
pub(crate) fn is_changed_path_line(line: &str) -> bool {
    line.as_bytes().first().is_some_and(|b| b.is_ascii_uppercase())
}

/// Extracts the path a change applies to: the last tab-delimited field,
/// which for renames and copies is the destination path.
pub(crate) fn parse_changed_path(line: &str) -> Result<String, ResolveError> {
    let (_, field) = line.rsplit_once('\t').ok_or_else(|| malformed(line))?;
    if field.starts_with('"') {
        unquote_c_style(field)
    } else {
        Ok(field.to_string())
    }
}

/// Unquotes git's C-style quoted path: surrounding double quotes, backslash
/// escapes for specials, 1-3 digit octal escapes for raw bytes.
fn unquote_c_style(field: &str) -> Result<String, ResolveError> {
    let inner = field
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| malformed(field))?;

    let bytes = inner.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }
        i += 1;
        let esc = *bytes.get(i).ok_or_else(|| malformed(field))?;
        match esc {
            b'"' | b'\\' => {
                out.push(esc);
                i += 1;
            }
            b'a' => {
                out.push(0x07);
                i += 1;
            }
            b'b' => {
                out.push(0x08);
                i += 1;
            }
            b'f' => {
                out.push(0x0c);
                i += 1;
            }
            b'n' => {
                out.push(b'\n');
                i += 1;
            }
            b'r' => {
                out.push(b'\r');
                i += 1;
            }
            b't' => {
                out.push(b'\t');
                i += 1;
            }
            b'v' => {
                out.push(0x0b);
                i += 1;
            }
            b'0'..=b'7' => {
                let mut val: u32 = 0;
                let mut digits = 0;
                while digits < 3 && i < bytes.len() && bytes[i].is_ascii_digit() && bytes[i] <= b'7' {
                    val = val * 8 + u32::from(bytes[i] - b'0');
                    i += 1;
                    digits += 1;
                }
                if val > 0xff {
                    return Err(malformed(field));
                }
                out.push(val as u8);
            }
            _ => return Err(malformed(field)),
        }
    }

    String::from_utf8(out).map_err(|_| malformed(field))
}
