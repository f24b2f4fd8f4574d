use crate::error::{Error, Result};

/// Hard ceiling on a single record, in bytes.
pub(crate) const MAX_RECORD: usize = 1 << 30;

/// Initial capacity of the record buffer.
const RECSIZE: usize = 8 * 1024;

/// Growable byte buffer backing the record being read or rebuilt.
///
/// Created once per session and reused for every record. Growth doubles
/// the capacity until the requested size fits, with checked arithmetic;
/// exceeding the limit is the fatal "input record too long" condition.
pub(crate) struct RecordBuffer {
    buf: Vec<u8>,
    limit: usize,
}

impl RecordBuffer {
    pub fn new() -> Self {
        Self::with_limit(MAX_RECORD)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: Vec::with_capacity(RECSIZE.min(limit)),
            limit,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn push_byte(&mut self, b: u8) -> Result<()> {
        self.reserve_for(1)?;
        self.buf.push(b);
        Ok(())
    }

    pub fn push_str(&mut self, s: &str) -> Result<()> {
        self.reserve_for(s.len())?;
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }

    /// The accumulated bytes as an owned string. Invalid UTF-8 is replaced
    /// rather than rejected; the input stream owns its own encoding.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.buf).into_owned()
    }

    /// Make room for `extra` more bytes, failing instead of wrapping or
    /// exceeding the limit.
    fn reserve_for(&mut self, extra: usize) -> Result<()> {
        let needed = self
            .buf
            .len()
            .checked_add(extra)
            .ok_or_else(|| Error::record_too_long(&self.buf))?;
        if needed > self.limit {
            return Err(Error::record_too_long(&self.buf));
        }
        if needed > self.buf.capacity() {
            let target = self
                .buf
                .capacity()
                .max(RECSIZE)
                .saturating_mul(2)
                .max(needed)
                .min(self.limit);
            self.buf.reserve_exact(target - self.buf.len());
        }
        Ok(())
    }
}
