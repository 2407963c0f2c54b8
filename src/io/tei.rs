//! TEI volume discovery and header scanning.
//!
//! The lexicon ships as a set of TEI XML volume files. This module lists
//! them in merge order and pulls the bibliographic fields out of the
//! volume headers so the converted dictionary can carry them forward.
use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Errors raised while reading the TEI sources
#[derive(Debug, Error)]
pub enum TeiError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("no XML volumes found in {0:?}")]
    NoSources(PathBuf),
}

/// Bibliographic fields collected from the volume headers, plus entry
/// and volume counts for reporting.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeiSummary {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub date: Option<String>,
    pub entry_count: usize,
    pub volumes: usize,
}

/// List the `*.xml` volume files in `dir`, sorted by file name.
///
/// Volume files are named so that lexical order is volume order, so the
/// sorted list is also the merge order. An empty directory is an error.
pub fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>, TeiError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map(|ext| ext == "xml").unwrap_or(false) {
            files.push(path);
        }
    }
    files.sort();
    if files.is_empty() {
        return Err(TeiError::NoSources(dir.to_path_buf()));
    }
    Ok(files)
}

/// Scan every volume and return the combined summary.
///
/// Header fields keep the first value seen across the volumes; the
/// entry count accumulates over all of them.
pub fn scan_sources(files: &[PathBuf]) -> Result<TeiSummary, TeiError> {
    let mut summary = TeiSummary {
        volumes: files.len(),
        ..Default::default()
    };
    for file in files {
        scan_volume(file, &mut summary)?;
    }
    info!(
        "scanned {} volumes, {} entries",
        summary.volumes, summary.entry_count
    );
    Ok(summary)
}

fn scan_volume(path: &Path, summary: &mut TeiSummary) -> Result<(), TeiError> {
    let mut reader = Reader::from_file(path)?;
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut curr = String::new();
    let mut in_title_stmt = false;
    let mut in_publication_stmt = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                curr = tag.clone();
                match tag.as_str() {
                    "titleStmt" => in_title_stmt = true,
                    "publicationStmt" => in_publication_stmt = true,
                    "entryFree" => summary.entry_count += 1,
                    _ => {}
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"titleStmt" => in_title_stmt = false,
                b"publicationStmt" => in_publication_stmt = false,
                _ => {}
            },
            Event::Text(e) => {
                let txt = e.unescape()?;
                match curr.as_str() {
                    "title" if in_title_stmt && summary.title.is_none() => {
                        summary.title = Some(txt.to_string());
                    }
                    "author" if in_title_stmt && summary.author.is_none() => {
                        summary.author = Some(txt.to_string());
                    }
                    "publisher" if in_publication_stmt && summary.publisher.is_none() => {
                        summary.publisher = Some(txt.to_string());
                    }
                    "date" if in_publication_stmt && summary.date.is_none() => {
                        summary.date = Some(txt.to_string());
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VOLUME: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI.2>
<teiHeader type="text" status="new">
<fileDesc>
<titleStmt>
<title>An Arabic-English Lexicon</title>
<author>Edward William Lane</author>
</titleStmt>
<publicationStmt>
<publisher>Williams and Norgate</publisher>
<date>1863</date>
</publicationStmt>
</fileDesc>
</teiHeader>
<text>
<body>
<entryFree id="n1" key="a" type="main"><form><orth>alpha</orth></form><sense>first</sense></entryFree>
<entryFree id="n2" key="b" type="main"><form><orth>beta</orth></form><sense>second</sense></entryFree>
</body>
</text>
</TEI.2>
"#;

    #[test]
    fn lists_xml_volumes_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lanexml-2.xml"), VOLUME).unwrap();
        fs::write(dir.path().join("lanexml-1.xml"), VOLUME).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let files = list_source_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["lanexml-1.xml", "lanexml-2.xml"]);
    }

    #[test]
    fn empty_source_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.md"), "no volumes here").unwrap();

        let err = list_source_files(dir.path()).unwrap_err();
        assert!(matches!(err, TeiError::NoSources(_)));
    }

    #[test]
    fn mismatched_tags_surface_as_xml_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xml");
        fs::write(&path, "<TEI.2><text></TEI.2>").unwrap();

        let err = scan_sources(&[path]).unwrap_err();
        assert!(matches!(err, TeiError::Xml(_)));
    }

    #[test]
    fn scans_header_fields_and_counts_entries() {
        let dir = tempfile::tempdir().unwrap();
        let one = dir.path().join("lanexml-1.xml");
        let two = dir.path().join("lanexml-2.xml");
        fs::write(&one, VOLUME).unwrap();
        fs::write(&two, VOLUME).unwrap();

        let summary = scan_sources(&[one, two]).unwrap();
        assert_eq!(summary.volumes, 2);
        assert_eq!(summary.entry_count, 4);
        assert_eq!(summary.title.as_deref(), Some("An Arabic-English Lexicon"));
        assert_eq!(summary.author.as_deref(), Some("Edward William Lane"));
        assert_eq!(summary.publisher.as_deref(), Some("Williams and Norgate"));
        assert_eq!(summary.date.as_deref(), Some("1863"));
    }
}
