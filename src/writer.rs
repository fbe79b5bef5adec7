use crate::record::FastqRecord;
use crate::util::has_gz_extension;

#[cfg(feature = "gzip")]
use flate2::{Compression, write::GzEncoder};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const OUTPUT_BUFFER: usize = 1024 * 1024;

/// Serializes records as four-line FASTQ.
pub struct FastqWriter<W: Write> {
    out: W,
}

impl<W: Write> FastqWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_record(&mut self, record: &FastqRecord) -> io::Result<()> {
        self.out.write_all(b"@")?;
        self.out.write_all(record.name().as_bytes())?;
        self.out.write_all(b"\n")?;
        self.out.write_all(record.sequence())?;
        self.out.write_all(b"\n+")?;
        self.out.write_all(record.comment().as_bytes())?;
        self.out.write_all(b"\n")?;
        self.out.write_all(record.quality())?;
        self.out.write_all(b"\n")
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// A buffered output file, gzip-compressed when its name ends in `.gz`.
pub enum OutputFile {
    Plain(BufWriter<File>),
    #[cfg(feature = "gzip")]
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputFile {
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = BufWriter::with_capacity(OUTPUT_BUFFER, File::create(path)?);
        if has_gz_extension(path) {
            #[cfg(feature = "gzip")]
            {
                return Ok(Self::Gzip(GzEncoder::new(file, Compression::default())));
            }
            #[cfg(not(feature = "gzip"))]
            {
                log::warn!(
                    "{} will be written uncompressed; gzip support is disabled",
                    path.display()
                );
            }
        }
        Ok(Self::Plain(file))
    }

    /// Write any compression trailer and flush to disk.
    pub fn finish(self) -> io::Result<()> {
        let mut file = match self {
            Self::Plain(file) => file,
            #[cfg(feature = "gzip")]
            Self::Gzip(enc) => enc.finish()?,
        };
        file.flush()
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            #[cfg(feature = "gzip")]
            Self::Gzip(w) => w.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.write_all(buf),
            #[cfg(feature = "gzip")]
            Self::Gzip(w) => w.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            #[cfg(feature = "gzip")]
            Self::Gzip(w) => w.flush(),
        }
    }
}
