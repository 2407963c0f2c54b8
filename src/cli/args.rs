use clap::Parser;
use std::path::PathBuf;

use lanedict::types::OutputFormat;

#[derive(Parser)]
#[command(name = "lanedict", version, about = "Lane Lexicon dictionary converter")]
pub struct CliArgs {
    /// Directory holding the TEI XML volume files
    #[arg(short, long, default_value = "../source-lane")]
    pub source_dir: PathBuf,

    /// Directory the dictionary files are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Output format (stardict, dictd or tabfile)
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Stardict)]
    pub format: OutputFormat,

    /// Base name of the produced files
    #[arg(long, default_value = "lane-lexicon")]
    pub base_name: String,

    /// Dictionary title shown by dictionary clients
    #[arg(long, default_value = "Lane Arabic-English Lexicon")]
    pub book_name: String,

    /// Keep the intermediate files next to the outputs
    #[arg(long, default_value_t = false)]
    pub no_clean: bool,

    /// Write a JSON conversion report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
