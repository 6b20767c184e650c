//! Bounds-checked cursor over an input buffer.

use crate::errors::{Error, Result};

/// Forward-only reader over a byte slice.
#[derive(Clone, Debug)]
pub(crate) struct Reader<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(input: &'a [u8]) -> Self {
        Self { input, position: 0 }
    }

    /// Number of unread bytes.
    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    /// Bytes consumed so far.
    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread bytes, without consuming them.
    pub(crate) fn rest(&self) -> &'a [u8] {
        &self.input[self.position..]
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_slice(1)?[0])
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_slice(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads `len` bytes, failing without consuming anything when fewer remain.
    pub(crate) fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::Truncated {
                needed: len,
                remaining: self.remaining(),
            });
        }

        let out = &self.input[self.position..self.position + len];
        self.position += len;
        Ok(out)
    }

    /// Fails unless `tag` is the next byte.
    pub(crate) fn expect_tag(&mut self, tag: u8) -> Result<()> {
        let actual = self.read_u8()?;
        if actual != tag {
            return Err(Error::UnexpectedTag {
                expected: tag,
                actual,
            });
        }
        Ok(())
    }
}
