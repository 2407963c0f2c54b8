use std::fs;
use std::path::Path;

use tracing::info;

use lanedict::ConvertParams;
use lanedict::api::{ConversionReport, convert_lexicon_to_path};

use super::args::CliArgs;
use super::errors::AppError;

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    // the base name is spliced into every artifact file name
    if args.base_name.is_empty() || args.base_name.contains(['/', '\\']) {
        return Err(AppError::InvalidBaseName {
            value: args.base_name.clone(),
        }
        .into());
    }

    let params = ConvertParams {
        format: args.format,
        base_name: args.base_name.clone(),
        book_name: args.book_name.clone(),
        keep_intermediates: args.no_clean,
        ..ConvertParams::default()
    };

    info!(
        "Converting sources from {:?} into {:?}",
        args.source_dir, args.output_dir
    );
    let report = convert_lexicon_to_path(&args.source_dir, &args.output_dir, &params)?;

    info!(
        "Conversion complete: {} volumes, {} entries",
        report.source.volumes, report.source.entry_count
    );
    for path in &report.outputs {
        info!("Wrote {:?}", path);
    }

    if let Some(report_path) = &args.report {
        write_report(&report, report_path)?;
        info!("Report written to {:?}", report_path);
    }

    Ok(())
}

fn write_report(report: &ConversionReport, path: &Path) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
