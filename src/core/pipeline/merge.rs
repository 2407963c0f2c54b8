use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;

/// Concatenate the volume files byte-for-byte into `dest`, returning the
/// number of bytes written.
///
/// The merged file is not well-formed XML (every volume keeps its own
/// declaration and root element). That is fine: everything downstream is
/// purely textual and never parses it as a document.
pub fn merge_xml_files(files: &[PathBuf], dest: &Path) -> Result<u64> {
    let mut out = BufWriter::new(File::create(dest)?);
    let mut total = 0u64;
    for file in files {
        let mut volume = File::open(file)?;
        total += io::copy(&mut volume, &mut out)?;
    }
    out.flush()?;
    info!("merged {} volume files into {:?}", files.len(), dest);
    Ok(total)
}
