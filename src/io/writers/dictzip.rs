//! dictzip compression for `.dict` files.
//!
//! A dictzip file is a single gzip member whose FEXTRA field carries an
//! `RA` subfield: the uncompressed chunk length plus the compressed size
//! of every chunk. Each chunk ends on a full deflate flush, so a reader
//! can seek to any chunk boundary and inflate just the chunk it needs.
//! dict servers use this to serve definitions out of the compressed file
//! without unpacking it.
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::{Compress, Compression, Crc, FlushCompress, Status};
use thiserror::Error;
use tracing::info;

/// Uncompressed bytes per chunk, the value the reference tools use.
const CHUNK_LENGTH: usize = 58315;

/// The chunk table shares the 16-bit XLEN field with its own header, so
/// at most this many chunks fit.
const MAX_CHUNKS: usize = 32762;

const FLG_FEXTRA: u8 = 0x04;
const FLG_FNAME: u8 = 0x08;
const OS_UNIX: u8 = 3;

/// Errors raised while writing a dictzip file
#[derive(Debug, Error)]
pub enum DictzipError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("deflate error: {0}")]
    Compress(String),
    #[error("a chunk compressed past the 16-bit size field")]
    ChunkOverflow,
    #[error("input needs {chunks} chunks, over the header limit")]
    TooLarge { chunks: usize },
}

/// Compress `path` in place: write `<path>.dz` and remove the original,
/// the way the dictzip tool replaces its input.
pub fn dictzip_file(path: &Path) -> Result<PathBuf, DictzipError> {
    let data = fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut dz_name = path.as_os_str().to_owned();
    dz_name.push(".dz");
    let dz_path = PathBuf::from(dz_name);

    write_dictzip(&dz_path, &data, &name)?;
    fs::remove_file(path)?;

    info!(
        "compressed {:?}: {} bytes into {:?}",
        path,
        data.len(),
        dz_path
    );
    Ok(dz_path)
}

/// Write `data` to `dest` as a dictzip member. `original_name` goes into
/// the gzip FNAME field.
pub fn write_dictzip(dest: &Path, data: &[u8], original_name: &str) -> Result<(), DictzipError> {
    let chunk_count = data.len().div_ceil(CHUNK_LENGTH);
    if chunk_count > MAX_CHUNKS {
        return Err(DictzipError::TooLarge {
            chunks: chunk_count,
        });
    }

    let mut compressor = Compress::new(Compression::new(6), false);
    let mut payload: Vec<u8> = Vec::with_capacity(data.len() / 2 + 1024);
    let mut chunk_sizes: Vec<u16> = Vec::with_capacity(chunk_count);

    let mut chunks = data.chunks(CHUNK_LENGTH).peekable();
    while let Some(chunk) = chunks.next() {
        let flush = if chunks.peek().is_some() {
            FlushCompress::Full
        } else {
            FlushCompress::Finish
        };
        let produced = compress_chunk(&mut compressor, chunk, flush, &mut payload)?;
        let size = u16::try_from(produced).map_err(|_| DictzipError::ChunkOverflow)?;
        chunk_sizes.push(size);
    }
    if data.is_empty() {
        // still emit a complete deflate stream so the member is valid gzip
        compress_chunk(&mut compressor, &[], FlushCompress::Finish, &mut payload)?;
    }

    let mut crc = Crc::new();
    crc.update(data);

    let mut out = BufWriter::new(File::create(dest)?);
    out.write_all(&[0x1f, 0x8b, 8, FLG_FEXTRA | FLG_FNAME])?;
    out.write_u32::<LittleEndian>(chrono::Utc::now().timestamp() as u32)?;
    out.write_all(&[0, OS_UNIX])?;
    out.write_u16::<LittleEndian>((10 + 2 * chunk_sizes.len()) as u16)?;
    out.write_all(b"RA")?;
    out.write_u16::<LittleEndian>((6 + 2 * chunk_sizes.len()) as u16)?;
    out.write_u16::<LittleEndian>(1)?;
    out.write_u16::<LittleEndian>(CHUNK_LENGTH as u16)?;
    out.write_u16::<LittleEndian>(chunk_sizes.len() as u16)?;
    for size in &chunk_sizes {
        out.write_u16::<LittleEndian>(*size)?;
    }
    out.write_all(original_name.as_bytes())?;
    out.write_u8(0)?;
    out.write_all(&payload)?;
    out.write_u32::<LittleEndian>(crc.sum())?;
    out.write_u32::<LittleEndian>(crc.amount())?;
    out.flush()?;
    Ok(())
}

fn compress_chunk(
    compressor: &mut Compress,
    mut input: &[u8],
    flush: FlushCompress,
    payload: &mut Vec<u8>,
) -> Result<usize, DictzipError> {
    let start = payload.len();
    loop {
        payload.reserve(input.len() / 2 + 1024);
        let before = compressor.total_in();
        let status = compressor
            .compress_vec(input, payload, flush)
            .map_err(|e| DictzipError::Compress(e.to_string()))?;
        let consumed = (compressor.total_in() - before) as usize;
        input = &input[consumed..];
        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                // spare output space left over means the flush fully drained
                if input.is_empty() && payload.len() < payload.capacity() {
                    break;
                }
            }
        }
    }
    Ok(payload.len() - start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::DeflateDecoder;
    use std::io::Read;

    fn sample_data(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn header_carries_the_chunk_table() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("sample.dict.dz");
        let data = sample_data(150_000);
        write_dictzip(&dest, &data, "sample.dict").unwrap();

        let dz = std::fs::read(&dest).unwrap();
        assert_eq!(&dz[0..2], &[0x1f, 0x8b]);
        assert_eq!(dz[2], 8);
        assert_eq!(dz[3], FLG_FEXTRA | FLG_FNAME);
        assert_eq!(dz[9], OS_UNIX);

        let xlen = u16::from_le_bytes([dz[10], dz[11]]) as usize;
        assert_eq!(&dz[12..14], b"RA");
        let sub_len = u16::from_le_bytes([dz[14], dz[15]]) as usize;
        let version = u16::from_le_bytes([dz[16], dz[17]]);
        let chlen = u16::from_le_bytes([dz[18], dz[19]]) as usize;
        let chcnt = u16::from_le_bytes([dz[20], dz[21]]) as usize;
        assert_eq!(version, 1);
        assert_eq!(chlen, CHUNK_LENGTH);
        assert_eq!(chcnt, 3);
        assert_eq!(xlen, 10 + 2 * chcnt);
        assert_eq!(sub_len, 6 + 2 * chcnt);

        let name_start = 12 + xlen;
        let name_len = dz[name_start..].iter().position(|&b| b == 0).unwrap();
        assert_eq!(&dz[name_start..name_start + name_len], b"sample.dict");
    }

    #[test]
    fn payload_inflates_back_to_the_input() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("sample.dict.dz");
        let data = sample_data(150_000);
        write_dictzip(&dest, &data, "sample.dict").unwrap();

        let dz = std::fs::read(&dest).unwrap();
        let xlen = u16::from_le_bytes([dz[10], dz[11]]) as usize;
        let name_start = 12 + xlen;
        let name_len = dz[name_start..].iter().position(|&b| b == 0).unwrap();
        let payload = &dz[name_start + name_len + 1..dz.len() - 8];

        let mut decoder = DeflateDecoder::new(payload);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);

        let crc = u32::from_le_bytes([
            dz[dz.len() - 8],
            dz[dz.len() - 7],
            dz[dz.len() - 6],
            dz[dz.len() - 5],
        ]);
        let isize = u32::from_le_bytes([
            dz[dz.len() - 4],
            dz[dz.len() - 3],
            dz[dz.len() - 2],
            dz[dz.len() - 1],
        ]);
        assert_eq!(isize as usize, data.len());
        let mut check = Crc::new();
        check.update(&data);
        assert_eq!(crc, check.sum());
    }

    #[test]
    fn a_middle_chunk_inflates_on_its_own() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("sample.dict.dz");
        let data = sample_data(150_000);
        write_dictzip(&dest, &data, "sample.dict").unwrap();

        let dz = std::fs::read(&dest).unwrap();
        let xlen = u16::from_le_bytes([dz[10], dz[11]]) as usize;
        let chcnt = u16::from_le_bytes([dz[20], dz[21]]) as usize;
        let mut sizes = Vec::new();
        for i in 0..chcnt {
            sizes.push(u16::from_le_bytes([dz[22 + 2 * i], dz[23 + 2 * i]]) as usize);
        }
        let name_start = 12 + xlen;
        let name_len = dz[name_start..].iter().position(|&b| b == 0).unwrap();
        let payload = &dz[name_start + name_len + 1..dz.len() - 8];
        assert_eq!(payload.len(), sizes.iter().sum::<usize>());

        // inflate chunk 1 from its boundary without touching chunk 0
        let fragment = &payload[sizes[0]..sizes[0] + sizes[1]];
        let mut decoder = DeflateDecoder::new(fragment);
        let mut chunk = vec![0u8; CHUNK_LENGTH];
        decoder.read_exact(&mut chunk).unwrap();
        assert_eq!(&chunk[..], &data[CHUNK_LENGTH..2 * CHUNK_LENGTH]);
    }

    #[test]
    fn empty_input_still_forms_a_valid_member() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("empty.dict.dz");
        write_dictzip(&dest, &[], "empty.dict").unwrap();

        let dz = std::fs::read(&dest).unwrap();
        let chcnt = u16::from_le_bytes([dz[20], dz[21]]);
        assert_eq!(chcnt, 0);

        let xlen = u16::from_le_bytes([dz[10], dz[11]]) as usize;
        let name_start = 12 + xlen;
        let name_len = dz[name_start..].iter().position(|&b| b == 0).unwrap();
        let payload = &dz[name_start + name_len + 1..dz.len() - 8];
        let mut decoder = DeflateDecoder::new(payload);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn replaces_the_original_file() {
        let dir = tempfile::tempdir().unwrap();
        let dict = dir.path().join("sample.dict");
        std::fs::write(&dict, b"some definitions").unwrap();

        let dz = dictzip_file(&dict).unwrap();
        assert_eq!(dz, dir.path().join("sample.dict.dz"));
        assert!(dz.exists());
        assert!(!dict.exists());
    }
}
