#![doc = r#"
lanedict — Lane's Arabic-English Lexicon to dictd/StarDict converter.

This crate turns the public-domain TEI XML of Lane's Arabic-English Lexicon into
dictionary files: dictd `.dict`/`.index` databases, a tab-separated exchange
file, or a StarDict `.ifo`/`.idx`/`.dict.dz` set. The external toolchain such
conversions usually shell out to (dictfmt, a dictd-to-tabfile converter, a
tabfile-to-StarDict converter, dictzip) is implemented natively, so the
converter is a single self-contained binary with a library API.

The pipeline runs in stages: merge the volume files, strip the TEI markup into
plain entry blocks, build the dictd databases (one with tashkeel folded out of
the keys, one with verbatim keys), convert them to tab-separated text, clean
and colorize the definitions, and emit the StarDict files.

Stability
---------
The public library API is experimental in initial releases. It covers the whole
CLI feature set and can be embedded, but may evolve as the crate stabilizes.
Breaking changes can occur.

Add dependency
--------------
```toml
[dependencies]
lanedict = "0.1"
```

Quick start: convert the lexicon to StarDict files
--------------------------------------------------
```rust,no_run
use std::path::Path;
use lanedict::{ConvertParams, OutputFormat, convert_lexicon_to_path};

fn main() -> lanedict::Result<()> {
    let params = ConvertParams {
        format: OutputFormat::Stardict,
        ..ConvertParams::default()
    };

    let report = convert_lexicon_to_path(
        Path::new("../source-lane"),
        Path::new("out"),
        &params,
    )?;

    println!(
        "{} volumes, {} entries, {} headwords",
        report.source.volumes,
        report.source.entry_count,
        report.stardict_words.unwrap_or(0),
    );
    Ok(())
}
```

Stage functions
---------------
The individual pipeline stages are plain functions and can be used on their
own, for example to inspect what the markup strip makes of a TEI fragment:

```rust
use lanedict::core::pipeline::strip_markup;

let cleaned = strip_markup(
    "<entryFree key=\"x\"><form><orth>word</orth></form>body</entryFree>",
);
assert!(cleaned.starts_with("_____"));
assert!(cleaned.contains("word"));
```

Error handling
--------------
All public functions return `lanedict::Result<T>`; match on `lanedict::Error`
to handle specific cases, e.g. missing sources or a malformed database.

```rust,no_run
use std::path::Path;
use lanedict::{ConvertParams, Error, convert_lexicon_to_path};

fn main() {
    let params = ConvertParams::default();
    match convert_lexicon_to_path(Path::new("/bad/dir"), Path::new("out"), &params) {
        Ok(report) => println!("wrote {} files", report.outputs.len()),
        Err(Error::Tei(e)) => eprintln!("source error: {e}"),
        Err(Error::Stardict(e)) => eprintln!("writer error: {e}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`] — high-level, ergonomic entry points.
- [`core::pipeline`] — the textual transformation stages.
- [`io`] — TEI scanning, dictd/tabfile conversion, StarDict and dictzip writers.
- [`types`] — shared enums (`IndexVariant`, `OutputFormat`).
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use core::params::ConvertParams;
pub use error::{Error, Result};
pub use types::{IndexVariant, OutputFormat};

// Readers and writers
pub use io::dictd::{DatabaseMeta, DictdDatabase, IndexEntry};
pub use io::tei::{TeiSummary, list_source_files, scan_sources};
pub use io::writers::{StardictFiles, StardictInfo, dictzip_file, write_stardict};

// High-level API re-exports
pub use api::{ConversionReport, convert_lexicon_to_path};
