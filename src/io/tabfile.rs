//! Tabfile conversion: dictd databases to `word<TAB>definition` lines.
//!
//! The tabfile is the exchange format between the dictd stage and the
//! StarDict writer. One entry per line, with backslash, tab and newline
//! escaped inside the definition so the line structure survives.
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::io::dictd::{self, DictdError};

/// Errors raised while producing or parsing tabfiles
#[derive(Debug, Error)]
pub enum TabfileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("dictd database error: {0}")]
    Dictd(#[from] DictdError),
    #[error("tabfile line has no tab separator: {line:?}")]
    NoSeparator { line: String },
}

/// Escape a definition for embedding in a single tabfile line.
pub fn escape(definition: &str) -> String {
    let mut out = String::with_capacity(definition.len());
    for c in definition.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

/// Undo [`escape`]. Unknown escapes pass through unchanged.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split one tabfile line into the word and the unescaped definition.
pub fn parse_line(line: &str) -> Result<(String, String), TabfileError> {
    match line.split_once('\t') {
        Some((word, definition)) => Ok((word.to_string(), unescape(definition))),
        None => Err(TabfileError::NoSeparator {
            line: line.to_string(),
        }),
    }
}

fn is_metadata_key(key: &str) -> bool {
    key.starts_with("00-database") || key.starts_with("00database")
}

/// Convert a dictd database into a tabfile at `out_path`, returning the
/// number of lines written.
///
/// Entries come out in index order. The `00-database` metadata entries
/// describe the database rather than the language and are skipped.
pub fn dictd_to_tabfile(
    index_path: &Path,
    dict_path: &Path,
    out_path: &Path,
) -> Result<usize, TabfileError> {
    let entries = dictd::read_index(index_path)?;
    let dict = fs::read(dict_path)?;

    let mut out = BufWriter::new(File::create(out_path)?);
    let mut written = 0usize;
    for entry in &entries {
        if is_metadata_key(&entry.key) {
            continue;
        }
        let block = dictd::read_entry(&dict, entry)?;
        let definition = String::from_utf8_lossy(block);
        writeln!(out, "{}\t{}", entry.key, escape(definition.trim_end_matches('\n')))?;
        written += 1;
    }
    out.flush()?;

    info!("wrote {} tabfile lines to {:?}", written, out_path);
    Ok(written)
}
