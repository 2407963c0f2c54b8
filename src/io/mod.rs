//! I/O layer for the conversion pipeline. Provides the `tei` source
//! scanner, the `dictd` database builder, `tabfile` conversion, and
//! `writers` for the StarDict and dictzip outputs.
pub mod tei;
pub use tei::{TeiError, TeiSummary, list_source_files, scan_sources};

pub mod dictd;
pub use dictd::{DatabaseMeta, DictdDatabase, DictdError, IndexEntry};

pub mod tabfile;
pub use tabfile::TabfileError;

pub mod writers;
pub use writers::{DictzipError, StardictError, StardictFiles, StardictInfo};
