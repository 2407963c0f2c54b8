//! Output writers for the supported dictionary container formats.
pub mod dictzip;
pub mod stardict;

pub use dictzip::{DictzipError, dictzip_file, write_dictzip};
pub use stardict::{StardictError, StardictFiles, StardictInfo, write_stardict};
