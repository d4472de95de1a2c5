//! Gzip decompression and CSV merging
//!
//! Both functions are blocking and are run on the blocking thread pool by
//! the retriever.

use crate::domain::{Result, UsageExportError};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Decompresses the gzip file at `src` into `dest`
///
/// A partially written `dest` is removed on failure.
pub fn gunzip_file(src: &Path, dest: &Path) -> Result<u64> {
    let result = (|| -> io::Result<u64> {
        let mut decoder = MultiGzDecoder::new(BufReader::new(File::open(src)?));
        let mut writer = BufWriter::new(File::create(dest)?);
        let written = io::copy(&mut decoder, &mut writer)?;
        writer.flush()?;
        Ok(written)
    })();

    result.map_err(|e| {
        let _ = std::fs::remove_file(dest);
        UsageExportError::Download(format!(
            "Failed to decompress {}: {}",
            src.display(),
            e
        ))
    })
}

/// Concatenates CSV parts into `dest`, keeping only the first header row
///
/// Parts that contribute no bytes do not count as having written the header.
pub fn combine_csv_parts(parts: &[PathBuf], dest: &Path) -> Result<u64> {
    let mut writer = TrackingWriter::new(BufWriter::new(File::create(dest)?));
    let mut header_written = false;

    for part in parts {
        let mut reader = BufReader::new(File::open(part)?);

        if header_written {
            let mut header = Vec::new();
            reader.read_until(b'\n', &mut header)?;
        }

        if reader.fill_buf()?.is_empty() {
            continue;
        }

        if writer.last_byte.is_some_and(|b| b != b'\n') {
            writer.write_all(b"\n")?;
        }
        io::copy(&mut reader, &mut writer)?;
        header_written = true;
    }

    writer.flush()?;
    Ok(writer.written)
}

/// Counts bytes and remembers the last one written
struct TrackingWriter<W> {
    inner: W,
    written: u64,
    last_byte: Option<u8>,
}

impl<W: Write> TrackingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            written: 0,
            last_byte: None,
        }
    }
}

impl<W: Write> Write for TrackingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        if n > 0 {
            self.written += n as u64;
            self.last_byte = Some(buf[n - 1]);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
