//! Length-prefixed raw records and capture iteration.
//!
//! Every payload the decoder accepts is archived as a record:
//!
//! | Offset | Size | Type | Field |
//! |--------|------|------|-------|
//! | 0 | 4 | u32 BE | Payload length |
//! | 4 | var | bytes | Payload (discriminant included) |
//!
//! A capture is simply a concatenation of records, i.e. the raw log of one or
//! more matches. [`CaptureIterator`] walks a capture and yields payloads.
//!
//! # Example
//!
//! ```
//! use melee_stats::capture::{frame_record, CaptureIterator};
//!
//! let mut capture = frame_record(&[0x39, 0x01]);
//! capture.extend(frame_record(&[0x39, 0x02]));
//!
//! let payloads: Vec<_> = CaptureIterator::new(&capture)
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! assert_eq!(payloads, vec![&[0x39, 0x01][..], &[0x39, 0x02][..]]);
//! ```

use crate::binary::read_u32_be;
use crate::error::{ParserError, Result};
use crate::format::RECORD_LENGTH_PREFIX_SIZE;

/// Largest payload the device protocol ever sends.
pub const MAX_MESSAGE_LENGTH: usize = 1024;

/// Appends `payload` to `out` as a length-prefixed record.
pub fn append_record(out: &mut Vec<u8>, payload: &[u8]) {
    // Payloads are bounded by the transport; saturate rather than wrap.
    let len = u32::try_from(payload.len()).unwrap_or(u32::MAX);
    out.reserve(RECORD_LENGTH_PREFIX_SIZE + payload.len());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(payload);
}

/// Returns `payload` as a standalone length-prefixed record.
#[must_use]
pub fn frame_record(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(RECORD_LENGTH_PREFIX_SIZE + payload.len());
    append_record(&mut out, payload);
    out
}

/// Iterator over the payloads of a capture.
///
/// Iteration stops after the first error; a truncated or oversized trailing
/// record is reported once.
pub struct CaptureIterator<'a> {
    data: &'a [u8],
    offset: usize,
    record_count: usize,
    finished: bool,
}

impl<'a> CaptureIterator<'a> {
    /// Creates an iterator over `data`, starting at its first byte.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        CaptureIterator {
            data,
            offset: 0,
            record_count: 0,
            finished: false,
        }
    }

    /// Returns the current byte offset in the capture.
    #[must_use]
    pub fn current_offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of records yielded so far.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    fn parse_next(&mut self) -> Result<&'a [u8]> {
        let mut offset = self.offset;
        let len = read_u32_be(self.data, &mut offset)? as usize;

        if len > MAX_MESSAGE_LENGTH {
            return Err(ParserError::InvalidRecordLength {
                offset: self.offset,
                length: len,
            });
        }

        let end = offset + len;
        let payload = self
            .data
            .get(offset..end)
            .ok_or_else(|| ParserError::truncated(end, self.data.len()))?;

        self.offset = end;
        Ok(payload)
    }
}

impl<'a> Iterator for CaptureIterator<'a> {
    type Item = Result<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.offset >= self.data.len() {
            return None;
        }

        match self.parse_next() {
            Ok(payload) => {
                self.record_count += 1;
                Some(Ok(payload))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
