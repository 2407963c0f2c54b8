//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, TEI, dictd, tabfile, StarDict and dictzip errors,
//! and provides a semantic variant for pipeline failures.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TEI reader error: {0}")]
    Tei(#[from] crate::io::TeiError),

    #[error("dictd database error: {0}")]
    Dictd(#[from] crate::io::DictdError),

    #[error("tabfile error: {0}")]
    Tabfile(#[from] crate::io::TabfileError),

    #[error("StarDict writer error: {0}")]
    Stardict(#[from] crate::io::StardictError),

    #[error("dictzip writer error: {0}")]
    Dictzip(#[from] crate::io::DictzipError),

    #[error("Processing error: {0}")]
    Processing(String),
}
