use crate::error::{FastqError, FormatError, IoContext};
use crate::phred::PhredOffset;
use crate::policy::{LineMode, ReaderOptions};
use crate::record::FastqRecord;
use crate::util::{has_gz_extension, looks_like_gzip, open_file};

#[cfg(feature = "gzip")]
use flate2::read::MultiGzDecoder;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum Source {
    Path(PathBuf),
    Reader,
}

/// Sync FASTQ reader (plain/.gz), streaming. Any malformed record is returned as an error.
pub struct FastqReader {
    src: Source,
    rdr: Box<dyn BufRead + Send>,
    opts: ReaderOptions,
    line_num: u64,
    byte_pos: u64,
}

impl FastqReader {
    /// Open from a file path. Auto-detect `.gz` by extension or magic bytes.
    pub fn from_path<P: AsRef<Path>>(path: P, opts: ReaderOptions) -> Result<Self, FastqError> {
        let path = path.as_ref();
        let f = open_file(path).map_err(|e| {
            FastqError::io_err(
                e,
                IoContext {
                    byte_pos: 0,
                    line_num: 0,
                },
            )
        })?;

        let is_gz = has_gz_extension(path) || looks_like_gzip(&f).unwrap_or(false);

        let rdr: Box<dyn BufRead + Send> = if is_gz {
            #[cfg(feature = "gzip")]
            {
                let dec = MultiGzDecoder::new(f);
                Box::new(BufReader::with_capacity(256 * 1024, dec))
            }
            #[cfg(not(feature = "gzip"))]
            {
                return Err(FastqError::io_err(
                    io::Error::new(
                        io::ErrorKind::Unsupported,
                        "gzip input requires the `gzip` feature",
                    ),
                    IoContext {
                        byte_pos: 0,
                        line_num: 0,
                    },
                ));
            }
        } else {
            Box::new(BufReader::with_capacity(256 * 1024, f))
        };
        log::debug!("opened {} (gzip: {is_gz})", path.display());

        Ok(Self {
            src: Source::Path(path.to_path_buf()),
            rdr,
            opts,
            line_num: 0,
            byte_pos: 0,
        })
    }

    /// Wrap an arbitrary `BufRead` (stdin, in-memory data, etc.).
    pub fn from_bufread<R: BufRead + Send + 'static>(reader: R, opts: ReaderOptions) -> Self {
        Self {
            src: Source::Reader,
            rdr: Box::new(reader),
            opts,
            line_num: 0,
            byte_pos: 0,
        }
    }

    pub fn source(&self) -> &Source {
        &self.src
    }

    /// Encoding stamped on records parsed from now on.
    pub fn set_phred_offset(&mut self, offset: PhredOffset) {
        self.opts.phred_offset = offset;
    }

    /// Iterator-style `next` record.
    pub fn next(&mut self) -> Option<Result<FastqRecord, FastqError>> {
        self.read_one().transpose()
    }

    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_line(buf)?;
        if n > 0 {
            self.line_num += 1;
            self.byte_pos += n as u64;
            if buf.ends_with('\n') {
                buf.pop();
            }
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(n)
    }

    /// Read a line that must exist because a record has started.
    fn read_required_line(&mut self, buf: &mut String) -> Result<(), FastqError> {
        let n = self
            .read_line(buf)
            .map_err(|e| FastqError::io_err(e, self.ctx()))?;
        if n == 0 {
            return Err(FastqError::fmt_err(FormatError::UnexpectedEof, self.ctx()));
        }
        Ok(())
    }

    fn read_one(&mut self) -> Result<Option<FastqRecord>, FastqError> {
        // seek first non-empty line
        let mut header = String::with_capacity(128);
        loop {
            let n = self
                .read_line(&mut header)
                .map_err(|e| FastqError::io_err(e, self.ctx()))?;
            if n == 0 {
                return Ok(None);
            }
            if !header.is_empty() {
                break;
            }
        }

        let Some(name) = header.strip_prefix('@') else {
            if self.opts.fastq_only && header.starts_with('>') {
                return Err(FastqError::fmt_err(
                    FormatError::FastaHeaderDetected,
                    self.ctx(),
                ));
            }
            return Err(FastqError::fmt_err(FormatError::MissingHeader, self.ctx()));
        };
        let name = name.to_string();

        let mut line = String::with_capacity(256);

        let (seq, comment, qual) = match self.opts.line_mode {
            LineMode::Single => {
                self.read_required_line(&mut line)?;
                let seq = line.as_bytes().to_vec();

                self.read_required_line(&mut line)?;
                let Some(comment) = line.strip_prefix('+') else {
                    return Err(FastqError::fmt_err(FormatError::MissingPlus, self.ctx()));
                };
                let comment = comment.to_string();

                self.read_required_line(&mut line)?;
                (seq, comment, line.as_bytes().to_vec())
            }
            LineMode::Multi => {
                // Read sequence until '+' line
                let mut seq = Vec::<u8>::with_capacity(256);
                let comment = loop {
                    self.read_required_line(&mut line)?;
                    if let Some(comment) = line.strip_prefix('+') {
                        break comment.to_string();
                    }
                    seq.extend_from_slice(line.as_bytes());
                };
                if seq.is_empty() {
                    return Err(FastqError::fmt_err(FormatError::EmptySequence, self.ctx()));
                }

                // Read quality until length matches seq
                let mut qual = Vec::<u8>::with_capacity(seq.len());
                while qual.len() < seq.len() {
                    self.read_required_line(&mut line)?;
                    qual.extend_from_slice(line.as_bytes());
                }
                (seq, comment, qual)
            }
        };

        FastqRecord::new(name, seq, comment, qual, self.opts.phred_offset)
            .map(Some)
            .map_err(|e| FastqError::fmt_err(e, self.ctx()))
    }

    #[inline]
    fn ctx(&self) -> IoContext {
        IoContext {
            byte_pos: self.byte_pos,
            line_num: self.line_num,
        }
    }
}

impl Iterator for FastqReader {
    type Item = Result<FastqRecord, FastqError>;
    fn next(&mut self) -> Option<Self::Item> {
        FastqReader::next(self)
    }
}
