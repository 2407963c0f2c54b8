//! High-level, ergonomic library API: run the whole conversion pipeline
//! from TEI sources to dictionary files in one call. Prefer these
//! entrypoints over the stage modules when integrating the converter.
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::core::params::ConvertParams;
use crate::core::pipeline::{
    colorize_text, merge_xml_files, refine_text, restore_tabs, strip_markup_file,
};
use crate::error::{Error, Result};
use crate::io::dictd::{DatabaseMeta, build_database};
use crate::io::tabfile::dictd_to_tabfile;
use crate::io::tei::{TeiSummary, list_source_files, scan_sources};
use crate::io::writers::{StardictInfo, dictzip_file, write_stardict};
use crate::types::{IndexVariant, OutputFormat};

/// Summary of a completed conversion. The CLI serializes this as the
/// `--report` sidecar.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub source: TeiSummary,
    pub format: OutputFormat,
    pub no_tashkeel_entries: usize,
    pub tashkeel_entries: usize,
    pub tabfile_lines: usize,
    pub stardict_words: Option<usize>,
    pub outputs: Vec<PathBuf>,
    pub started_at: String,
    pub finished_at: String,
}

/// Convert the TEI volumes in `source_dir` into dictionary files in
/// `output_dir`, running as many stages as `params.format` asks for.
///
/// Intermediate artifacts live in a scratch directory that is dropped on
/// completion; with `keep_intermediates` they are written next to the
/// outputs instead and left in place.
pub fn convert_lexicon_to_path(
    source_dir: &Path,
    output_dir: &Path,
    params: &ConvertParams,
) -> Result<ConversionReport> {
    let started_at = chrono::Utc::now().to_rfc3339();
    fs::create_dir_all(output_dir)?;

    let volumes = list_source_files(source_dir)?;
    let source = scan_sources(&volumes)?;

    let scratch = if params.keep_intermediates {
        None
    } else {
        Some(tempfile::tempdir()?)
    };
    let workdir = scratch
        .as_ref()
        .map(|dir| dir.path().to_path_buf())
        .unwrap_or_else(|| output_dir.to_path_buf());

    info!("merging {} volumes into one working file", volumes.len());
    let merged = workdir.join(format!("{}.xml", params.base_name));
    merge_xml_files(&volumes, &merged)?;

    info!("stripping TEI markup");
    strip_markup_file(&merged)?;
    let text = fs::read_to_string(&merged)?;
    if !text.lines().any(|line| line.starts_with("_____")) {
        return Err(Error::Processing(format!(
            "markup strip left no entry separators in {:?}",
            merged
        )));
    }

    let meta = DatabaseMeta {
        book_name: params.book_name.clone(),
        contact_url: params.contact_url.clone(),
        source_title: source.title.clone(),
        source_author: source.author.clone(),
    };

    // the databases are final outputs in dictd mode, intermediates otherwise
    let dictd_dir = if params.format == OutputFormat::Dictd {
        output_dir.to_path_buf()
    } else {
        workdir.clone()
    };
    let mut databases = Vec::new();
    for variant in IndexVariant::ALL {
        info!("building the {} database", variant);
        let base = dictd_dir.join(format!("{}-{}", params.base_name, variant));
        let db = build_database(&text, &base, variant, &meta)?;
        databases.push((variant, db));
    }

    let mut report = ConversionReport {
        source,
        format: params.format,
        no_tashkeel_entries: 0,
        tashkeel_entries: 0,
        tabfile_lines: 0,
        stardict_words: None,
        outputs: Vec::new(),
        started_at,
        finished_at: String::new(),
    };
    for (variant, db) in &databases {
        match variant {
            IndexVariant::NoTashkeel => report.no_tashkeel_entries = db.entry_count,
            IndexVariant::Tashkeel => report.tashkeel_entries = db.entry_count,
        }
    }

    if params.format == OutputFormat::Dictd {
        report.outputs = databases
            .iter()
            .flat_map(|(_, db)| [db.dict_path.clone(), db.index_path.clone()])
            .collect();
        report.finished_at = chrono::Utc::now().to_rfc3339();
        return Ok(report);
    }

    info!("converting the databases to tab-separated text");
    let mut tab_paths = Vec::new();
    for (variant, db) in &databases {
        let tab = workdir.join(format!("{}-{}.txt", params.base_name, variant));
        report.tabfile_lines += dictd_to_tabfile(&db.index_path, &db.dict_path, &tab)?;
        tab_paths.push(tab);
    }

    let csv_dir = if params.format == OutputFormat::Tabfile {
        output_dir
    } else {
        workdir.as_path()
    };
    let csv_path = csv_dir.join(format!("{}.csv", params.base_name));
    concat_tabfiles(&tab_paths, &csv_path)?;

    info!("refining and colorizing the combined tabfile");
    let combined = fs::read_to_string(&csv_path)?;
    let refined = restore_tabs(&colorize_text(&refine_text(&combined)));
    fs::write(&csv_path, &refined)?;

    if params.format == OutputFormat::Tabfile {
        report.outputs = vec![csv_path];
        report.finished_at = chrono::Utc::now().to_rfc3339();
        return Ok(report);
    }

    info!("writing the StarDict dictionary");
    let stardict_info = StardictInfo {
        book_name: params.book_name.clone(),
        author: report.source.author.clone(),
        description: report.source.title.clone(),
    };
    let files = write_stardict(&csv_path, output_dir, &params.base_name, &stardict_info)?;
    let dz_path = dictzip_file(&files.dict_path)?;

    report.stardict_words = Some(files.word_count);
    report.outputs = vec![files.ifo_path, files.idx_path, dz_path];
    report.finished_at = chrono::Utc::now().to_rfc3339();
    Ok(report)
}

/// Concatenate the per-variant tabfiles, folded variant first.
fn concat_tabfiles(paths: &[PathBuf], dest: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(dest)?);
    for path in paths {
        let mut input = File::open(path)?;
        std::io::copy(&mut input, &mut out)?;
    }
    out.flush()?;
    Ok(())
}
