//! The staged text pipeline. Stages run in order: volume merge, TEI markup
//! rewrite, dictd construction (io::dictd), tabfile extraction (io::tabfile),
//! definition refinement, colorizing. Every stage is a pure text
//! transformation except the merge, which streams files.
pub mod colorize;
pub mod markup;
pub mod merge;
pub mod refine;

pub use colorize::colorize_text;
pub use markup::{strip_markup, strip_markup_file};
pub use merge::merge_xml_files;
pub use refine::{TAB_SENTINEL, refine_text, restore_tabs};
