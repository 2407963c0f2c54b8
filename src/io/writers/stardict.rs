//! StarDict dictionary writer.
//!
//! Takes a tabfile and produces the `.ifo`/`.idx`/`.dict` triple that
//! StarDict and its many clones load. The index is a flat sequence of
//! `word NUL offset size` records with big-endian 32-bit numbers,
//! sorted ASCII-case-insensitively with a plain byte comparison breaking
//! ties. Definitions are plain text (`sametypesequence=m`).
use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, WriteBytesExt};
use thiserror::Error;
use tracing::{info, warn};

use crate::io::tabfile::{self, TabfileError};

/// The index format stores the word as a NUL-terminated string, which
/// caps it at this many bytes.
const MAX_WORD_BYTES: usize = 255;

/// Errors raised while writing a StarDict dictionary
#[derive(Debug, Error)]
pub enum StardictError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("tabfile error: {0}")]
    Tabfile(#[from] TabfileError),
    #[error("refusing to write a dictionary with no entries")]
    EmptyDictionary,
}

/// Fields recorded in the `.ifo` file.
#[derive(Debug, Clone, Default)]
pub struct StardictInfo {
    pub book_name: String,
    pub author: Option<String>,
    pub description: Option<String>,
}

/// The produced file triple.
#[derive(Debug, Clone)]
pub struct StardictFiles {
    pub ifo_path: PathBuf,
    pub idx_path: PathBuf,
    pub dict_path: PathBuf,
    pub word_count: usize,
}

/// Order two words the way the StarDict index is sorted: compare bytes
/// with ASCII letters case-folded, then break ties with the raw bytes.
pub fn stardict_cmp(a: &str, b: &str) -> Ordering {
    let folded_a = a.bytes().map(|byte| byte.to_ascii_lowercase());
    let folded_b = b.bytes().map(|byte| byte.to_ascii_lowercase());
    folded_a
        .cmp(folded_b)
        .then_with(|| a.as_bytes().cmp(b.as_bytes()))
}

/// Build `<base_name>.ifo`, `.idx` and `.dict` in `out_dir` from the
/// tabfile at `tab_path`.
///
/// Headwords longer than the index format allows are skipped with a
/// warning. Duplicate headwords are kept; StarDict shows them as
/// multiple hits. A tabfile with no usable lines is an error.
pub fn write_stardict(
    tab_path: &Path,
    out_dir: &Path,
    base_name: &str,
    info: &StardictInfo,
) -> Result<StardictFiles, StardictError> {
    let file = BufReader::new(File::open(tab_path)?);
    let mut words: Vec<(String, String)> = Vec::new();
    for line in file.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let (word, definition) = tabfile::parse_line(&line)?;
        if word.is_empty() {
            warn!("skipping tabfile line with an empty headword");
            continue;
        }
        if word.len() > MAX_WORD_BYTES {
            warn!("skipping headword of {} bytes, over the index limit", word.len());
            continue;
        }
        words.push((word, definition));
    }
    if words.is_empty() {
        return Err(StardictError::EmptyDictionary);
    }

    words.sort_by(|a, b| stardict_cmp(&a.0, &b.0));

    let duplicates = words
        .windows(2)
        .filter(|pair| pair[0].0 == pair[1].0)
        .count();
    if duplicates > 0 {
        warn!("index keeps {} duplicate headwords", duplicates);
    }

    let ifo_path = out_dir.join(format!("{base_name}.ifo"));
    let idx_path = out_dir.join(format!("{base_name}.idx"));
    let dict_path = out_dir.join(format!("{base_name}.dict"));

    let mut dict = BufWriter::new(File::create(&dict_path)?);
    let mut idx = BufWriter::new(File::create(&idx_path)?);
    let mut offset: u32 = 0;
    for (word, definition) in &words {
        let bytes = definition.as_bytes();
        idx.write_all(word.as_bytes())?;
        idx.write_u8(0)?;
        idx.write_u32::<BigEndian>(offset)?;
        idx.write_u32::<BigEndian>(bytes.len() as u32)?;
        dict.write_all(bytes)?;
        offset += bytes.len() as u32;
    }
    dict.flush()?;
    idx.flush()?;

    let idx_size = fs::metadata(&idx_path)?.len();
    let mut ifo = BufWriter::new(File::create(&ifo_path)?);
    writeln!(ifo, "StarDict's dict ifo file")?;
    writeln!(ifo, "version=2.4.2")?;
    writeln!(ifo, "wordcount={}", words.len())?;
    writeln!(ifo, "idxfilesize={}", idx_size)?;
    writeln!(ifo, "bookname={}", info.book_name)?;
    if let Some(author) = &info.author {
        writeln!(ifo, "author={}", author)?;
    }
    if let Some(description) = &info.description {
        writeln!(ifo, "description={}", description)?;
    }
    writeln!(ifo, "date={}", chrono::Utc::now().format("%Y.%m.%d"))?;
    writeln!(ifo, "sametypesequence=m")?;
    ifo.flush()?;

    info!("wrote StarDict dictionary {:?}: {} words", ifo_path, words.len());
    Ok(StardictFiles {
        ifo_path,
        idx_path,
        dict_path,
        word_count: words.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn index_order_folds_ascii_case_then_compares_bytes() {
        assert_eq!(stardict_cmp("a", "B"), Ordering::Less);
        assert_eq!(stardict_cmp("b", "A"), Ordering::Greater);
        // case-insensitively equal words fall back to raw bytes
        assert_eq!(stardict_cmp("Apple", "apple"), Ordering::Less);
        assert_eq!(stardict_cmp("same", "same"), Ordering::Equal);
        // bytes beyond ASCII keep their unsigned order
        assert_eq!(stardict_cmp("z", "\u{0643}"), Ordering::Less);
    }

    #[test]
    fn writes_the_expected_idx_and_dict_layout() {
        let dir = tempfile::tempdir().unwrap();
        let tab = dir.path().join("sample.csv");
        fs::write(&tab, "a\tdef1\nB\tdef2\n").unwrap();

        let files = write_stardict(&tab, dir.path(), "sample", &StardictInfo::default()).unwrap();
        assert_eq!(files.word_count, 2);

        // sorted case-insensitively: "a" before "B"
        let mut expected_idx = Vec::new();
        expected_idx.extend_from_slice(b"a\0");
        expected_idx.extend_from_slice(&0u32.to_be_bytes());
        expected_idx.extend_from_slice(&4u32.to_be_bytes());
        expected_idx.extend_from_slice(b"B\0");
        expected_idx.extend_from_slice(&4u32.to_be_bytes());
        expected_idx.extend_from_slice(&4u32.to_be_bytes());
        assert_eq!(fs::read(&files.idx_path).unwrap(), expected_idx);
        assert_eq!(fs::read(&files.dict_path).unwrap(), b"def1def2");
    }

    #[test]
    fn ifo_carries_the_header_fields() {
        let dir = tempfile::tempdir().unwrap();
        let tab = dir.path().join("sample.csv");
        fs::write(&tab, "word\tdefinition\n").unwrap();

        let info = StardictInfo {
            book_name: "Sample Lexicon".to_string(),
            author: Some("Somebody".to_string()),
            description: None,
        };
        let files = write_stardict(&tab, dir.path(), "sample", &info).unwrap();

        let ifo = fs::read_to_string(&files.ifo_path).unwrap();
        assert!(ifo.starts_with("StarDict's dict ifo file\nversion=2.4.2\n"));
        assert!(ifo.contains("wordcount=1\n"));
        assert!(ifo.contains("idxfilesize=13\n"));
        assert!(ifo.contains("bookname=Sample Lexicon\n"));
        assert!(ifo.contains("author=Somebody\n"));
        assert!(ifo.contains("sametypesequence=m\n"));
    }

    #[test]
    fn duplicate_headwords_survive() {
        let dir = tempfile::tempdir().unwrap();
        let tab = dir.path().join("sample.csv");
        fs::write(&tab, "x\tfirst\nx\tsecond\n").unwrap();

        let files = write_stardict(&tab, dir.path(), "sample", &StardictInfo::default()).unwrap();
        assert_eq!(files.word_count, 2);
        assert_eq!(fs::read(&files.dict_path).unwrap(), b"firstsecond");
    }

    #[test]
    fn empty_headwords_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let tab = dir.path().join("sample.csv");
        fs::write(&tab, "\tno headword\nok\tkept\n").unwrap();

        let files = write_stardict(&tab, dir.path(), "sample", &StardictInfo::default()).unwrap();
        assert_eq!(files.word_count, 1);
        let idx = fs::read(&files.idx_path).unwrap();
        assert_eq!(&idx[..3], b"ok\0");
    }

    #[test]
    fn over_long_headwords_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let tab = dir.path().join("sample.csv");
        let long_word = "x".repeat(300);
        fs::write(&tab, format!("{long_word}\ttoo long\nok\tkept\n")).unwrap();

        let files = write_stardict(&tab, dir.path(), "sample", &StardictInfo::default()).unwrap();
        assert_eq!(files.word_count, 1);
    }

    #[test]
    fn an_empty_tabfile_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let tab = dir.path().join("empty.csv");
        fs::write(&tab, "").unwrap();

        let err =
            write_stardict(&tab, dir.path(), "empty", &StardictInfo::default()).unwrap_err();
        assert!(matches!(err, StardictError::EmptyDictionary));
    }
}
