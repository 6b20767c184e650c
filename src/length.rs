//! Length encodings.
//!
//! Two schemes appear on the wire and must not be mixed up:
//!
//! - the GSS token length that follows the `0x60` tag of a GSSToken, written
//!   with a `0x81..=0x84` marker byte bucketed exactly as the legacy peer
//!   writes it, and read back without a minimality check;
//! - the strict DER definite length used inside `OBJECT IDENTIFIER` values,
//!   handled by [`der::Length`].

use alloc::vec::Vec;

use der::{Decode, Encode, Length, Reader as _, SliceReader};

use crate::errors::{Error, Result};
use crate::reader::Reader;

/// Largest length representable by a single byte.
const SHORT_FORM_MAX: usize = 0x7f;

/// Marker bytes announcing 1 to 4 big-endian length octets.
const MARKER_MIN: u8 = 0x81;
const MARKER_MAX: u8 = 0x84;

/// Number of octets following the marker for a long-form length.
fn long_form_octets(len: usize) -> Result<usize> {
    match len {
        0..=0xff => Ok(1),
        0x100..=0xffff => Ok(2),
        0x1_0000..=0xff_ffff => Ok(3),
        _ if (len as u64) <= u64::from(u32::MAX) => Ok(4),
        _ => Err(Error::LengthOverflow),
    }
}

/// Writes a GSS token length using the marker scheme.
pub fn encode_token_length(len: usize, out: &mut Vec<u8>) -> Result<()> {
    if len <= SHORT_FORM_MAX {
        out.push(len as u8);
        return Ok(());
    }

    let octets = long_form_octets(len)?;
    out.push(0x80 | octets as u8);
    out.extend_from_slice(&(len as u32).to_be_bytes()[4 - octets..]);
    Ok(())
}

/// Encoded size of a GSS token length.
pub fn token_length_len(len: usize) -> Result<usize> {
    if len <= SHORT_FORM_MAX {
        return Ok(1);
    }
    Ok(1 + long_form_octets(len)?)
}

/// Reads a GSS token length.
///
/// A leading byte below `0x80` is the length itself; `0x81..=0x84` announces
/// that many big-endian octets. Any other leading byte is rejected.
pub(crate) fn decode_token_length(reader: &mut Reader<'_>) -> Result<usize> {
    let first = reader.read_u8()?;
    if usize::from(first) <= SHORT_FORM_MAX {
        return Ok(first.into());
    }
    if !(MARKER_MIN..=MARKER_MAX).contains(&first) {
        return Err(Error::InvalidLength);
    }

    let octets = reader.read_slice((first & 0x7f) as usize)?;
    Ok(octets
        .iter()
        .fold(0usize, |acc, byte| (acc << 8) | *byte as usize))
}

/// Reads a GSS token length from the front of `bytes`.
///
/// Returns the length and the number of bytes its encoding occupied.
pub fn read_token_length(bytes: &[u8]) -> Result<(usize, usize)> {
    let mut reader = Reader::new(bytes);
    let len = decode_token_length(&mut reader)?;
    Ok((len, reader.position()))
}

/// Writes a DER definite length (X.690 §8.1.3) using the minimal form.
pub fn encode_der_length(len: usize, out: &mut Vec<u8>) -> Result<()> {
    let len = Length::try_from(len).map_err(|_| Error::LengthOverflow)?;
    len.encode_to_vec(out)?;
    Ok(())
}

/// Reads a DER definite length from the front of `bytes`.
///
/// Returns the length and the number of bytes its encoding occupied. The
/// indefinite form, long forms that could have been shorter and lengths of
/// more than four octets are rejected with [`Error::InvalidLength`].
pub fn read_der_length(bytes: &[u8]) -> Result<(usize, usize)> {
    let mut reader = SliceReader::new(bytes)?;
    let len = Length::decode(&mut reader)
        .map_err(|err| Error::der_truncation(err).unwrap_or(Error::InvalidLength))?;
    Ok((usize::try_from(len)?, usize::try_from(reader.position())?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(len: usize) -> Vec<u8> {
        let mut out = Vec::new();
        encode_token_length(len, &mut out).unwrap();
        assert_eq!(out.len(), token_length_len(len).unwrap());
        out
    }

    fn read_token(bytes: &[u8]) -> usize {
        let mut reader = Reader::new(bytes);
        let len = decode_token_length(&mut reader).unwrap();
        assert!(reader.is_finished());
        len
    }

    #[test]
    fn token_length_buckets() {
        assert_eq!(token(0), vec![0x00]);
        assert_eq!(token(1), vec![0x01]);
        assert_eq!(token(127), vec![0x7f]);
        assert_eq!(token(128), vec![0x81, 0x80]);
        assert_eq!(token(255), vec![0x81, 0xff]);
        assert_eq!(token(256), vec![0x82, 0x01, 0x00]);
        assert_eq!(token(65535), vec![0x82, 0xff, 0xff]);
        assert_eq!(token(65536), vec![0x83, 0x01, 0x00, 0x00]);
        assert_eq!(token((1 << 24) - 1), vec![0x83, 0xff, 0xff, 0xff]);
        assert_eq!(token(1 << 24), vec![0x84, 0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn token_length_roundtrip_boundaries() {
        for len in [
            0,
            1,
            127,
            128,
            255,
            256,
            65535,
            65536,
            (1 << 24) - 1,
            1 << 24,
        ] {
            assert_eq!(read_token(&token(len)), len);
        }
    }

    #[test]
    fn token_length_accepts_non_minimal_marker() {
        assert_eq!(read_token(&[0x82, 0x00, 0x05]), 5);
    }

    #[test]
    fn token_length_truncated() {
        let mut reader = Reader::new(&[0x83, 0x01]);
        assert!(matches!(
            decode_token_length(&mut reader),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn token_length_rejects_reserved_first_bytes() {
        for first in [0x80, 0x85, 0x90, 0xff] {
            let buf = [first, 0x00, 0x00, 0x00, 0x00, 0x00];
            let mut reader = Reader::new(&buf);
            assert!(
                matches!(decode_token_length(&mut reader), Err(Error::InvalidLength)),
                "{:02x}",
                first
            );
        }
        assert!(matches!(read_token_length(&[0x80]), Err(Error::InvalidLength)));
    }

    #[test]
    fn der_length_rejects_bad_forms() {
        for bytes in [
            &[0x80][..],
            &[0x81, 0x05][..],
            &[0x82, 0x00, 0xff][..],
            &[0x85, 0x01, 0x00, 0x00, 0x00, 0x00][..],
        ] {
            assert!(
                matches!(read_der_length(bytes), Err(Error::InvalidLength)),
                "{:02x?}",
                bytes
            );
        }
    }

    #[test]
    fn der_length_truncated() {
        assert!(matches!(read_der_length(&[]), Err(Error::Truncated { .. })));
        assert!(matches!(
            read_der_length(&[0x82, 0x01]),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn der_length_long_form() {
        let mut out = Vec::new();
        encode_der_length(200, &mut out).unwrap();
        assert_eq!(out, vec![0x81, 0xc8]);
        assert_eq!(read_der_length(&out).unwrap(), (200, 2));

        out.clear();
        encode_der_length(0x1234, &mut out).unwrap();
        assert_eq!(out, vec![0x82, 0x12, 0x34]);
        assert_eq!(read_der_length(&[0x05, 0xff]).unwrap(), (5, 1));
    }
}
