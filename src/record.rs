use crate::error::{FormatError, TrimError};
use crate::phred::PhredOffset;

/// Base symbol for an unknown nucleotide.
pub const AMBIGUOUS_BASE: u8 = b'N';

/// One sequencing read with its qualities.
///
/// `head_pos` is the offset of the first base within the read as it was parsed,
/// so positions stay relative to the untrimmed read however many trimmers ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    name: String,
    sequence: Vec<u8>,
    comment: String,
    quality: Vec<u8>,
    phred_offset: PhredOffset,
    head_pos: usize,
}

impl FastqRecord {
    pub fn new(
        name: impl Into<String>,
        sequence: Vec<u8>,
        comment: impl Into<String>,
        quality: Vec<u8>,
        phred_offset: PhredOffset,
    ) -> Result<Self, FormatError> {
        if sequence.len() != quality.len() {
            return Err(FormatError::LengthMismatch {
                seq: sequence.len(),
                qual: quality.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            sequence,
            comment: comment.into(),
            quality,
            phred_offset,
            head_pos: 0,
        })
    }

    /// Full header text after `@`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header text up to the first whitespace.
    pub fn id(&self) -> &str {
        self.name
            .split(char::is_whitespace)
            .next()
            .unwrap_or_default()
    }

    #[inline]
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    /// Text after `+` on the separator line.
    #[inline]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    #[inline]
    pub fn quality(&self) -> &[u8] {
        &self.quality
    }

    #[inline]
    pub fn phred_offset(&self) -> PhredOffset {
        self.phred_offset
    }

    #[inline]
    pub fn head_pos(&self) -> usize {
        self.head_pos
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub(crate) fn set_phred_offset(&mut self, offset: PhredOffset) {
        self.phred_offset = offset;
    }

    /// Quality scores with the encoding offset removed.
    ///
    /// With `zero_ambiguous`, positions holding [`AMBIGUOUS_BASE`] score 0.
    pub fn quality_as_integers(&self, zero_ambiguous: bool) -> Vec<i32> {
        let offset = i32::from(self.phred_offset.value());
        self.sequence
            .iter()
            .zip(&self.quality)
            .map(|(&base, &q)| {
                if zero_ambiguous && base == AMBIGUOUS_BASE {
                    0
                } else {
                    i32::from(q) - offset
                }
            })
            .collect()
    }

    /// The bases `[start, start + length)` as a new record.
    pub fn subrange(&self, start: usize, length: usize) -> Result<Self, TrimError> {
        let end = start.saturating_add(length);
        if end > self.len() {
            return Err(TrimError::OutOfBounds {
                start,
                end,
                len: self.len(),
            });
        }
        Ok(Self {
            name: self.name.clone(),
            sequence: self.sequence[start..end].to_vec(),
            comment: self.comment.clone(),
            quality: self.quality[start..end].to_vec(),
            phred_offset: self.phred_offset,
            head_pos: self.head_pos + start,
        })
    }
}
