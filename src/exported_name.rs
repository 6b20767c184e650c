//! GSS exported names as defined in [RFC 2743 § 3.2].
//!
//! ```text
//! 04 01            token identifier
//! xx xx            mechanism OID length, big-endian
//! ...              mechanism OID, DER
//! xx xx xx xx      name length, big-endian
//! ...              name
//! ```
//!
//! CSIv2 carries the GSSUP target name in this form.
//!
//! [RFC 2743 § 3.2]: https://datatracker.ietf.org/doc/html/rfc2743#section-3.2

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::errors::{Error, Result};
use crate::oid::{parse_oid, read_oid, write_oid, ObjectIdentifier};
use crate::reader::Reader;

/// Token identifier of an exported name.
pub const EXPORTED_NAME_TOKEN_ID: [u8; 2] = [0x04, 0x01];

/// A decoded GSS exported name.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GssExportedName {
    name: String,
    oid: String,
}

impl GssExportedName {
    /// Mechanism-specific name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted mechanism OID, without the `"oid:"` prefix.
    pub fn oid(&self) -> &str {
        &self.oid
    }

    /// Splits the value into `(name, oid)`.
    pub fn into_parts(self) -> (String, String) {
        (self.name, self.oid)
    }
}

pub(crate) fn export_name(oid: &ObjectIdentifier, name: &str) -> Result<Vec<u8>> {
    let mut oid_der = Vec::new();
    write_oid(oid, &mut oid_der)?;
    let oid_len = u16::try_from(oid_der.len()).map_err(|_| Error::LengthOverflow)?;
    let name_len = u32::try_from(name.len()).map_err(|_| Error::LengthOverflow)?;

    let mut out = Vec::with_capacity(2 + 2 + oid_der.len() + 4 + name.len());
    out.extend_from_slice(&EXPORTED_NAME_TOKEN_ID);
    out.extend_from_slice(&oid_len.to_be_bytes());
    out.extend_from_slice(&oid_der);
    out.extend_from_slice(&name_len.to_be_bytes());
    out.extend_from_slice(name.as_bytes());
    Ok(out)
}

/// Encodes `name` as an exported name for the mechanism `oid`.
///
/// `oid` is dotted, optionally prefixed with `"oid:"`. Returns `None` when the
/// name cannot be encoded.
///
/// ```
/// use csiv2_token::exported_name::{decode_exported_name, encode_exported_name};
///
/// let token = encode_exported_name("oid:2.23.130.1.1.1", "realm").unwrap();
/// let exported = decode_exported_name(&token).unwrap();
/// assert_eq!(exported.name(), "realm");
/// assert_eq!(exported.oid(), "2.23.130.1.1.1");
/// ```
pub fn encode_exported_name(oid: &str, name: &str) -> Option<Vec<u8>> {
    match parse_oid(oid).and_then(|oid| export_name(&oid, name)) {
        Ok(token) => Some(token),
        Err(err) => {
            log::debug!("cannot encode exported name for mechanism {}: {}", oid, err);
            None
        }
    }
}

fn try_decode(token: &[u8]) -> Result<GssExportedName> {
    let mut reader = Reader::new(token);
    reader.expect_tag(EXPORTED_NAME_TOKEN_ID[0])?;
    reader.expect_tag(EXPORTED_NAME_TOKEN_ID[1])?;

    let oid_len = reader.read_u16()? as usize;
    let mut oid_reader = Reader::new(reader.read_slice(oid_len)?);
    let oid = read_oid(&mut oid_reader)?;
    if !oid_reader.is_finished() {
        return Err(Error::TrailingData);
    }

    let name_len = reader.read_u32()? as usize;
    let name = reader.read_slice(name_len)?;

    Ok(GssExportedName {
        name: String::from_utf8_lossy(name).into_owned(),
        oid: oid.to_string(),
    })
}

/// Decodes an exported name token.
///
/// Returns `None` when the token identifier is wrong or the token is
/// malformed. Bytes following the name are ignored. Name bytes that are not
/// valid UTF-8 are replaced with `U+FFFD`.
pub fn decode_exported_name(token: &[u8]) -> Option<GssExportedName> {
    match try_decode(token) {
        Ok(exported) => Some(exported),
        Err(err) => {
            log::debug!("cannot decode exported name: {}", err);
            None
        }
    }
}
