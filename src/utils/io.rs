//! Text loading and synchronizing-set offset dumps.
//!
//! Offsets are written as fixed-width little-endian words; the width is a
//! parameter (5-byte words halve the footprint of a `u64` dump for texts
//! under 2^40). Because the raw file does not encode its own layout, a JSON
//! metadata sidecar (`<dump>.meta.json`) records the word width, tau and the
//! element count, and the reader consults it before decoding.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::sss::SyncSet;
use crate::types::IndexInt;

/// Reads a whole text file into memory.
pub fn read_text(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading text file {}", path.display()))
}

/// Reads at most `prefix_len` bytes of a text file.
pub fn read_text_prefix(path: &Path, prefix_len: usize) -> Result<Vec<u8>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut buffer = Vec::with_capacity(prefix_len);
    file.take(prefix_len as u64)
        .read_to_end(&mut buffer)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(buffer)
}

/// Sidecar describing an offset dump.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OffsetDumpMeta {
    /// Bytes per stored offset (1..=8).
    pub width_bytes: u8,
    /// Granularity of the dumped synchronizing set.
    pub tau: u64,
    /// Number of offsets in the dump.
    pub len: u64,
}

fn meta_path(dump: &Path) -> PathBuf {
    let mut name = dump.as_os_str().to_owned();
    name.push(".meta.json");
    PathBuf::from(name)
}

/// Writes the offsets of a synchronizing set as `width_bytes`-wide
/// little-endian words, plus the metadata sidecar.
pub fn dump_offsets<I: IndexInt, const TAU: usize>(
    sss: &SyncSet<I, TAU>,
    path: &Path,
    width_bytes: u8,
) -> Result<()> {
    if !(1..=8).contains(&width_bytes) {
        bail!("unsupported offset width {width_bytes}");
    }
    let limit = if width_bytes == 8 {
        u64::MAX
    } else {
        (1u64 << (8 * width_bytes as u32)) - 1
    };

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for &offset in sss.positions() {
        let value = offset.to_usize() as u64;
        if value > limit {
            bail!("offset {value} does not fit {width_bytes}-byte words");
        }
        writer.write_all(&value.to_le_bytes()[..width_bytes as usize])?;
    }
    writer.flush()?;

    let meta = OffsetDumpMeta {
        width_bytes,
        tau: TAU as u64,
        len: sss.len() as u64,
    };
    let meta_file = File::create(meta_path(path))
        .with_context(|| format!("creating sidecar for {}", path.display()))?;
    serde_json::to_writer_pretty(meta_file, &meta)?;
    Ok(())
}

/// Reads an offset dump back, taking the word width from the sidecar.
pub fn load_offsets(path: &Path) -> Result<(OffsetDumpMeta, Vec<u64>)> {
    let meta_file = File::open(meta_path(path))
        .with_context(|| format!("opening sidecar for {}", path.display()))?;
    let meta: OffsetDumpMeta = serde_json::from_reader(meta_file)?;
    if !(1..=8).contains(&meta.width_bytes) {
        bail!("unsupported offset width {} in sidecar", meta.width_bytes);
    }

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let width = meta.width_bytes as usize;
    let mut offsets = Vec::with_capacity(meta.len as usize);
    for _ in 0..meta.len {
        let mut word = [0u8; 8];
        reader
            .read_exact(&mut word[..width])
            .context("offset dump shorter than its sidecar claims")?;
        offsets.push(u64::from_le_bytes(word));
    }
    Ok((meta, offsets))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lorem() -> Vec<u8> {
        b"Lorem ipsum dolor sit amet, consetetur sadipscing elitr, sed diam \
          nonumy eirmod tempor invidunt ut labore et dolore magna aliquyam erat. "
            .repeat(3)
    }

    #[test]
    fn test_dump_and_load_roundtrip() {
        let text = lorem();
        let sss: SyncSet<u32, 16> = SyncSet::with_base(&text, 296_819, false);
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("sss.offsets");

        for width in [4u8, 5, 8] {
            dump_offsets(&sss, &dump, width).unwrap();
            let (meta, offsets) = load_offsets(&dump).unwrap();
            assert_eq!(meta.width_bytes, width);
            assert_eq!(meta.tau, 16);
            assert_eq!(meta.len as usize, sss.len());
            let expected: Vec<u64> = sss.positions().iter().map(|&p| p as u64).collect();
            assert_eq!(offsets, expected);
        }
    }

    #[test]
    fn test_rejects_too_narrow_width() {
        let text = lorem();
        let sss: SyncSet<u32, 16> = SyncSet::with_base(&text, 296_819, false);
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("sss.offsets");
        // width 1 cannot hold offsets beyond 255
        assert!(dump_offsets(&sss, &dump, 1).is_err());
        assert!(dump_offsets(&sss, &dump, 0).is_err());
    }

    #[test]
    fn test_read_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("text.bin");
        std::fs::write(&path, b"hello world").unwrap();
        assert_eq!(read_text(&path).unwrap(), b"hello world");
        assert_eq!(read_text_prefix(&path, 5).unwrap(), b"hello");
        assert!(read_text(&dir.path().join("missing")).is_err());
    }
}
