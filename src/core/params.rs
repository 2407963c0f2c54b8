use serde::{Deserialize, Serialize};

use crate::types::OutputFormat;

/// Conversion parameters suitable for config files and scripted runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertParams {
    pub format: OutputFormat,
    /// Stem of every produced file (`<base>.idx`, `<base>.dict.dz`, ...)
    pub base_name: String,
    /// Dictionary title recorded in the dictd metadata and the `.ifo` bookname
    pub book_name: String,
    /// Maintainer contact recorded in the `00-database-url` entry
    pub contact_url: String,
    /// If true, intermediate artifacts survive next to the outputs
    pub keep_intermediates: bool,
}

impl Default for ConvertParams {
    fn default() -> Self {
        Self {
            format: OutputFormat::Stardict,
            base_name: "lane-lexicon".to_string(),
            book_name: "Lane Arabic-English Lexicon".to_string(),
            contact_url: "dfmcreator@gmail.com".to_string(),
            keep_intermediates: false,
        }
    }
}
