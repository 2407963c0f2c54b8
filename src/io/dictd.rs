//! dictd database construction and reading.
//!
//! The cleaned lexicon text is a stream of entries separated by lines of
//! underscores, with the headword on the first line after each separator.
//! This module splits that stream, folds headwords into index keys, and
//! writes the `.dict`/`.index` pair in the format the dict protocol
//! servers consume: the index holds one `key<TAB>offset<TAB>length` line
//! per entry, offsets and lengths encoded in dictd's base64 alphabet.
//!
//! Two index variants are produced from the same text. The folded
//! variant drops the tashkeel marks and punctuation so bare-consonant
//! searches hit; the verbatim variant keeps headwords exactly as written
//! so fully vocalized searches hit too.
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::types::IndexVariant;

/// Errors raised while building or reading a dictd database
#[derive(Debug, Error)]
pub enum DictdError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid base64 number {input:?} in index")]
    BadNumber { input: String },
    #[error("malformed index line {line:?}")]
    BadIndexLine { line: String },
    #[error("entry {key:?} points outside the dictionary data")]
    EntryOutOfBounds { key: String },
}

/// One line of a dictd index: the key plus the byte range of the entry
/// block inside the `.dict` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: String,
    pub offset: u64,
    pub length: u64,
}

/// A built database pair on disk.
#[derive(Debug, Clone)]
pub struct DictdDatabase {
    pub dict_path: PathBuf,
    pub index_path: PathBuf,
    pub entry_count: usize,
}

/// Metadata recorded in the database's `00-database` entries.
#[derive(Debug, Clone, Default)]
pub struct DatabaseMeta {
    pub book_name: String,
    pub contact_url: String,
    pub source_title: Option<String>,
    pub source_author: Option<String>,
}

const B64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Encode an offset or length the way dictd index files do: base64
/// digits from `A` upward, most significant digit first, no padding.
pub fn encode_number(mut value: u64) -> String {
    if value == 0 {
        return "A".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(B64_ALPHABET[(value & 0x3f) as usize]);
        value >>= 6;
    }
    digits.reverse();
    digits.iter().map(|&d| d as char).collect()
}

/// Decode a dictd base64 number back into an integer.
pub fn decode_number(input: &str) -> Result<u64, DictdError> {
    if input.is_empty() {
        return Err(DictdError::BadNumber {
            input: input.to_string(),
        });
    }
    let mut value: u64 = 0;
    for b in input.bytes() {
        let digit = match b {
            b'A'..=b'Z' => b - b'A',
            b'a'..=b'z' => b - b'a' + 26,
            b'0'..=b'9' => b - b'0' + 52,
            b'+' => 62,
            b'/' => 63,
            _ => {
                return Err(DictdError::BadNumber {
                    input: input.to_string(),
                });
            }
        };
        value = (value << 6) | u64::from(digit);
    }
    Ok(value)
}

/// Arabic diacritics dropped by the folded index: the harakat and tanwin
/// signs, superscript alef, and the Koranic annotation marks. These count
/// as alphabetic in Unicode, so the alphanumeric test alone keeps them.
fn is_tashkeel(c: char) -> bool {
    matches!(c,
        '\u{0610}'..='\u{061A}'
            | '\u{064B}'..='\u{065F}'
            | '\u{0670}'
            | '\u{06D6}'..='\u{06DC}'
            | '\u{06DF}'..='\u{06E8}'
            | '\u{06EA}'..='\u{06ED}')
}

/// Fold a headword into an index key.
///
/// The verbatim variant trims surrounding whitespace and keeps the rest.
/// The folded variant keeps only letters, digits and single spaces,
/// lowercased, with the tashkeel marks removed.
pub fn fold_headword(headword: &str, variant: IndexVariant) -> String {
    if variant.allchars() {
        return headword.trim().to_string();
    }
    let mut key = String::new();
    let mut pending_space = false;
    for c in headword.trim().chars() {
        if is_tashkeel(c) {
            continue;
        }
        if c.is_alphanumeric() {
            if pending_space && !key.is_empty() {
                key.push(' ');
            }
            pending_space = false;
            for lc in c.to_lowercase() {
                key.push(lc);
            }
        } else if c.is_whitespace() {
            pending_space = true;
        }
    }
    key
}

/// Split cleaned lexicon text into `(headword, entry block)` pairs.
///
/// An entry starts after a line beginning with five underscores; the
/// first non-blank line after the separator is the headword, and the
/// block runs from that line up to the next separator. Anything before
/// the first separator is front matter and is dropped.
pub fn split_entries(text: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;
    let mut awaiting_headword = false;

    for line in text.lines() {
        if line.starts_with("_____") {
            if let Some((headword, lines)) = current.take() {
                entries.push((headword, finish_block(lines)));
            }
            awaiting_headword = true;
            continue;
        }
        if awaiting_headword {
            if line.trim().is_empty() {
                continue;
            }
            current = Some((line.trim().to_string(), vec![line]));
            awaiting_headword = false;
            continue;
        }
        if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }
    if let Some((headword, lines)) = current.take() {
        entries.push((headword, finish_block(lines)));
    }
    entries
}

fn finish_block(mut lines: Vec<&str>) -> String {
    while matches!(lines.last(), Some(l) if l.trim().is_empty()) {
        lines.pop();
    }
    let mut block = lines.join("\n");
    block.push('\n');
    block
}

/// Build a `.dict`/`.index` pair at `base` (extensions are appended)
/// from the cleaned text, indexed under the given variant.
///
/// The database carries the usual `00-database` metadata entries, whose
/// keys skip folding so they stay findable by their literal names.
/// Entries whose folded key comes out empty carry no searchable text and
/// are dropped.
pub fn build_database(
    text: &str,
    base: &Path,
    variant: IndexVariant,
    meta: &DatabaseMeta,
) -> Result<DictdDatabase, DictdError> {
    let dict_path = with_suffix(base, ".dict");
    let index_path = with_suffix(base, ".index");

    let mut dict: Vec<u8> = Vec::new();
    let mut index: Vec<IndexEntry> = Vec::new();

    if variant.allchars() {
        append_entry(
            &mut dict,
            &mut index,
            "00-database-allchars".into(),
            "00-database-allchars\n",
        );
    }
    append_entry(&mut dict, &mut index, "00-database-info".into(), &info_block(meta));
    append_entry(
        &mut dict,
        &mut index,
        "00-database-short".into(),
        &format!("00-database-short\n{}\n", meta.book_name),
    );
    append_entry(
        &mut dict,
        &mut index,
        "00-database-url".into(),
        &format!("00-database-url\n{}\n", meta.contact_url),
    );
    append_entry(&mut dict, &mut index, "00-database-utf8".into(), "00-database-utf8\n");

    let mut dropped = 0usize;
    for (headword, block) in split_entries(text) {
        let key = fold_headword(&headword, variant);
        if key.is_empty() {
            dropped += 1;
            continue;
        }
        append_entry(&mut dict, &mut index, key, &block);
    }
    if dropped > 0 {
        warn!("dropped {} entries with empty {} keys", dropped, variant);
    }

    index.sort_by(|a, b| a.key.as_bytes().cmp(b.key.as_bytes()));

    fs::write(&dict_path, &dict)?;
    let mut out = BufWriter::new(File::create(&index_path)?);
    for entry in &index {
        writeln!(
            out,
            "{}\t{}\t{}",
            entry.key,
            encode_number(entry.offset),
            encode_number(entry.length)
        )?;
    }
    out.flush()?;

    info!(
        "wrote {} database: {} entries, {} bytes of definitions",
        variant,
        index.len(),
        dict.len()
    );
    Ok(DictdDatabase {
        dict_path,
        index_path,
        entry_count: index.len(),
    })
}

fn append_entry(dict: &mut Vec<u8>, index: &mut Vec<IndexEntry>, key: String, block: &str) {
    let offset = dict.len() as u64;
    dict.extend_from_slice(block.as_bytes());
    index.push(IndexEntry {
        key,
        offset,
        length: block.len() as u64,
    });
}

/// Append a suffix to the path as-is; `with_extension` would clip a
/// dotted base name at its last dot and merge the two variants.
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn info_block(meta: &DatabaseMeta) -> String {
    let mut body = String::from("00-database-info\n");
    body.push_str(&format!("{}\n", meta.book_name));
    body.push_str(&format!(
        "This file was converted with {} {} on {}.\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        chrono::Utc::now().format("%Y-%m-%d"),
    ));
    if let Some(title) = &meta.source_title {
        body.push_str(&format!("Source: {}\n", title));
    }
    if let Some(author) = &meta.source_author {
        body.push_str(&format!("Author: {}\n", author));
    }
    body.push_str(&format!("Contact: {}\n", meta.contact_url));
    body
}

/// Parse a dictd index file into entries in file order.
pub fn read_index(path: &Path) -> Result<Vec<IndexEntry>, DictdError> {
    let file = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    for line in file.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        entries.push(parse_index_line(&line)?);
    }
    Ok(entries)
}

/// Parse one `key<TAB>offset<TAB>length` index line.
pub fn parse_index_line(line: &str) -> Result<IndexEntry, DictdError> {
    let mut parts = line.split('\t');
    let (Some(key), Some(offset), Some(length), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(DictdError::BadIndexLine {
            line: line.to_string(),
        });
    };
    Ok(IndexEntry {
        key: key.to_string(),
        offset: decode_number(offset)?,
        length: decode_number(length)?,
    })
}

/// Slice one entry's block out of the dictionary data.
pub fn read_entry<'a>(dict: &'a [u8], entry: &IndexEntry) -> Result<&'a [u8], DictdError> {
    let start = entry.offset as usize;
    match start.checked_add(entry.length as usize) {
        Some(end) if end <= dict.len() => Ok(&dict[start..end]),
        _ => Err(DictdError::EntryOutOfBounds {
            key: entry.key.clone(),
        }),
    }
}
