//! GSS-API `InitialContextToken` framing as defined in [RFC 2743 § 3.1].
//!
//! ```text
//! 60                 [APPLICATION 0] IMPLICIT SEQUENCE
//! xx ...             token length, marker scheme
//! 06 xx ...          mechanism OID, DER
//! ...                mechanism-specific token
//! ```
//!
//! [RFC 2743 § 3.1]: https://datatracker.ietf.org/doc/html/rfc2743#section-3.1

use alloc::vec::Vec;

use crate::errors::{Error, Result};
use crate::length::{decode_token_length, encode_token_length, token_length_len};
use crate::oid::{read_oid, write_oid, ObjectIdentifier};
use crate::reader::Reader;

/// Tag of a GSS `InitialContextToken`.
pub const GSS_TOKEN_TAG: u8 = 0x60;

/// Frames `inner` as a GSS token for mechanism `oid`.
pub fn create_gss_token(oid: &ObjectIdentifier, inner: &[u8]) -> Result<Vec<u8>> {
    let mut oid_der = Vec::new();
    write_oid(oid, &mut oid_der)?;

    let body_len = oid_der
        .len()
        .checked_add(inner.len())
        .ok_or(Error::LengthOverflow)?;

    let mut out = Vec::with_capacity(1 + token_length_len(body_len)? + body_len);
    out.push(GSS_TOKEN_TAG);
    encode_token_length(body_len, &mut out)?;
    out.extend_from_slice(&oid_der);
    out.extend_from_slice(inner);
    Ok(out)
}

/// Parses the framing of `token` and returns its mechanism OID and payload.
fn parse(token: &[u8]) -> Result<(ObjectIdentifier, &[u8])> {
    let mut reader = Reader::new(token);
    reader.expect_tag(GSS_TOKEN_TAG)?;
    let body_len = decode_token_length(&mut reader)?;
    let mut body = Reader::new(reader.read_slice(body_len)?);

    let oid = read_oid(&mut body)?;
    let payload = body.read_slice(body.remaining())?;
    Ok((oid, payload))
}

/// Returns the mechanism-specific payload of `token`.
///
/// The payload is `token length - DER OID length` bytes long. Bytes after the
/// declared token length are ignored.
///
/// # Errors
///
/// - [`Error::UnexpectedTag`] when `token` does not start with `0x60`;
/// - [`Error::InvalidLength`] when the token length uses a reserved first byte;
/// - [`Error::Truncated`] when `token` is shorter than its declared length;
/// - [`Error::MechanismMismatch`] when the OID is not `expected_oid`.
pub fn read_gss_token_data<'a>(
    expected_oid: &ObjectIdentifier,
    token: &'a [u8],
) -> Result<&'a [u8]> {
    let (oid, payload) = parse(token)?;
    if oid != *expected_oid {
        log::debug!(
            "GSS token mechanism {} does not match expected {}",
            oid,
            expected_oid
        );
        return Err(Error::MechanismMismatch);
    }
    Ok(payload)
}

/// Mechanism OID of a GSS token.
pub fn gss_token_mechanism(token: &[u8]) -> Result<ObjectIdentifier> {
    parse(token).map(|(oid, _)| oid)
}

/// Whether `bytes` is a well-formed GSS token for `expected_oid`.
pub fn is_gss_token(expected_oid: &ObjectIdentifier, bytes: &[u8]) -> bool {
    bytes.first() == Some(&GSS_TOKEN_TAG) && read_gss_token_data(expected_oid, bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid::{GSSUP_MECH_OID, LTPA_MECH_OID};
    use hex_literal::hex;

    #[test]
    fn short_token_layout() {
        let token = create_gss_token(&LTPA_MECH_OID, b"xyz").unwrap();
        assert_eq!(token, hex!("60 0b 06062b1200021e02 78797a").to_vec());
        assert_eq!(read_gss_token_data(&LTPA_MECH_OID, &token).unwrap(), b"xyz");
    }

    #[test]
    fn long_token_uses_marker() {
        let inner = vec![0xab; 200];
        let token = create_gss_token(&GSSUP_MECH_OID, &inner).unwrap();
        // 8 bytes of OID + 200 bytes of payload
        assert_eq!(&token[..3], &[0x60, 0x81, 208]);
        assert_eq!(read_gss_token_data(&GSSUP_MECH_OID, &token).unwrap(), &inner[..]);
    }

    #[test]
    fn mechanism_mismatch() {
        let token = create_gss_token(&LTPA_MECH_OID, b"xyz").unwrap();
        assert!(matches!(
            read_gss_token_data(&GSSUP_MECH_OID, &token),
            Err(Error::MechanismMismatch)
        ));
        assert!(!is_gss_token(&GSSUP_MECH_OID, &token));
        assert!(is_gss_token(&LTPA_MECH_OID, &token));
        assert_eq!(gss_token_mechanism(&token).unwrap(), LTPA_MECH_OID);
    }

    #[test]
    fn wrong_tag() {
        assert!(matches!(
            read_gss_token_data(&LTPA_MECH_OID, &hex!("30 0b 06062b1200021e02 78797a")),
            Err(Error::UnexpectedTag {
                expected: GSS_TOKEN_TAG,
                actual: 0x30
            })
        ));
        assert!(!is_gss_token(&LTPA_MECH_OID, &[]));
    }

    #[test]
    fn shorter_than_declared() {
        let token = create_gss_token(&LTPA_MECH_OID, b"xyz").unwrap();
        assert!(matches!(
            read_gss_token_data(&LTPA_MECH_OID, &token[..token.len() - 1]),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn oid_longer_than_token() {
        // Token length 3 cannot hold the 8 byte OID.
        assert!(read_gss_token_data(&LTPA_MECH_OID, &hex!("60 03 06062b1200021e02")).is_err());
    }
}
