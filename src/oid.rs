//! DER `OBJECT IDENTIFIER` encoding and the mechanism OIDs used by CSIv2.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

pub use const_oid::ObjectIdentifier;
use der::{Decode, Encode, ErrorKind, Reader as _, SliceReader};

use crate::errors::{Error, Result};
use crate::reader::Reader;

/// Universal tag of an `OBJECT IDENTIFIER`.
pub const OID_TAG: u8 = 0x06;

/// Prefix CSIv2 IOR components put in front of a dotted OID.
const OID_PREFIX: &str = "oid:";

/// GSS username/password mechanism (CSIv2 §16.7).
pub const GSSUP_MECH_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.23.130.1.1.1");

/// Lightweight Third Party Authentication mechanism.
pub const LTPA_MECH_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.18.0.2.30.2");

/// Kerberos V5 mechanism (RFC 1964).
pub const KRB5_MECH_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113554.1.2.2");

/// `GSS_C_NT_EXPORT_NAME` name type (RFC 2743 §3.2).
pub const GSS_NT_EXPORT_NAME_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.3.6.1.5.6.4");

/// GSSUP scoped-username name type (CSIv2 §16.2.5).
pub const GSS_NT_SCOPED_USERNAME_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("2.23.130.1.2.1");

/// Strips an optional `"oid:"` prefix.
pub fn normalize_oid(oid: &str) -> &str {
    oid.strip_prefix(OID_PREFIX).unwrap_or(oid)
}

/// Parses a dotted OID, with or without the `"oid:"` prefix.
pub fn parse_oid(oid: &str) -> Result<ObjectIdentifier> {
    Ok(ObjectIdentifier::new(normalize_oid(oid))?)
}

/// Appends `0x06, length, arcs` for `oid` to `out`.
pub(crate) fn write_oid(oid: &ObjectIdentifier, out: &mut Vec<u8>) -> Result<()> {
    oid.encode_to_vec(out)?;
    Ok(())
}

/// DER encoding of an already parsed OID.
pub fn encode_object_identifier(oid: &ObjectIdentifier) -> Result<Vec<u8>> {
    Ok(oid.to_der()?)
}

/// DER encoding of a dotted OID string.
///
/// ```
/// use csiv2_token::oid::encode_oid;
///
/// let der = encode_oid("oid:2.23.130.1.1.1").unwrap();
/// assert_eq!(der, [0x06, 0x06, 0x67, 0x81, 0x02, 0x01, 0x01, 0x01]);
/// ```
pub fn encode_oid(oid: &str) -> Result<Vec<u8>> {
    encode_object_identifier(&parse_oid(oid)?)
}

/// Maps the `der` failures callers distinguish onto this crate's errors.
fn oid_error(err: der::Error) -> Error {
    match err.kind() {
        ErrorKind::TagUnexpected { actual, .. } => Error::UnexpectedTag {
            expected: OID_TAG,
            actual: actual.into(),
        },
        _ => Error::der_truncation(err).unwrap_or(Error::Der(err)),
    }
}

/// Reads a DER `OBJECT IDENTIFIER` from `reader`.
pub(crate) fn read_oid(reader: &mut Reader<'_>) -> Result<ObjectIdentifier> {
    let mut der_reader = SliceReader::new(reader.rest())?;
    let oid = ObjectIdentifier::decode(&mut der_reader).map_err(oid_error)?;
    reader.read_slice(usize::try_from(der_reader.position())?)?;
    Ok(oid)
}

/// Decodes a DER `OBJECT IDENTIFIER` that occupies the whole of `bytes`.
pub fn decode_oid(bytes: &[u8]) -> Result<ObjectIdentifier> {
    let mut reader = Reader::new(bytes);
    let oid = read_oid(&mut reader)?;
    if !reader.is_finished() {
        return Err(Error::TrailingData);
    }
    Ok(oid)
}

/// Decodes a DER `OBJECT IDENTIFIER` back to its dotted form.
pub fn decode_oid_string(bytes: &[u8]) -> Result<String> {
    decode_oid(bytes).map(|oid| oid.to_string())
}
