//! Shared types and enums used across lanedict.
//! Includes the dictd index variant (`IndexVariant`) and the pipeline
//! output selector (`OutputFormat`).
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which headword keys a dictd index carries.
///
/// The lexicon is indexed twice: once with the Arabic diacritics (tashkeel)
/// folded away so entries match unvowelled searches, and once with the
/// headwords kept verbatim.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum IndexVariant {
    NoTashkeel,
    Tashkeel,
}

impl IndexVariant {
    /// Both variants, in the order the pipeline builds and concatenates them.
    pub const ALL: [IndexVariant; 2] = [IndexVariant::NoTashkeel, IndexVariant::Tashkeel];

    /// Index every character of the headword verbatim (dictfmt's
    /// `--allchars` behavior) instead of folding to searchable form.
    pub fn allchars(self) -> bool {
        matches!(self, IndexVariant::Tashkeel)
    }
}

impl std::fmt::Display for IndexVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IndexVariant::NoTashkeel => "no-tashkeel",
            IndexVariant::Tashkeel => "tashkeel",
        };
        write!(f, "{}", s)
    }
}

/// How far the pipeline runs and which artifacts are the final product.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Full pipeline: `.ifo`, `.idx` and dictzipped `.dict.dz`.
    Stardict,
    /// Stop after the dictd databases (`.dict` + `.index` per variant).
    Dictd,
    /// Stop after the refined tab-separated file (`.csv`).
    Tabfile,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Stardict => write!(f, "Stardict"),
            OutputFormat::Dictd => write!(f, "Dictd"),
            OutputFormat::Tabfile => write!(f, "Tabfile"),
        }
    }
}
