//! X.501 distinguished names carried as `CSI::X501DistinguishedName`.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;
use core::str::FromStr;

use der::{Decode, Encode};
use x509_cert::name::Name;

use crate::codec::{Any, Codec, TypeCode};
use crate::errors::{Error, Result, SasStatus};

/// Drops whitespace that follows an unescaped `,` or `+`, so that
/// `"CN=a, O=b"` parses like `"CN=a,O=b"`.
fn normalize(dn: &str) -> String {
    let mut out = String::with_capacity(dn.len());
    let mut chars = dn.trim().chars();
    let mut after_separator = false;

    while let Some(c) = chars.next() {
        if after_separator && c.is_whitespace() {
            continue;
        }
        after_separator = false;
        out.push(c);
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            ',' | '+' => after_separator = true,
            _ => {}
        }
    }
    out
}

/// Parses a string distinguished name into an X.501 `Name`.
pub fn parse_dn(dn: &str) -> Result<Name> {
    let dn = normalize(dn);
    if dn.is_empty() {
        return Ok(Name::default());
    }
    Ok(Name::from_str(&dn)?)
}

/// Renders `name` most specific RDN first, separated by `", "`.
pub fn format_dn(name: &Name) -> String {
    let mut out = String::new();
    for (i, rdn) in name.0.iter().rev().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        // Writing to a String cannot fail.
        let _ = write!(out, "{}", rdn);
    }
    out
}

fn try_encode<C: Codec + ?Sized>(codec: &C, dn: &str) -> Result<Vec<u8>> {
    let der = parse_dn(dn)?.to_der()?;
    codec.encode_value(&Any::X501DistinguishedName(der))
}

/// Encodes a distinguished name such as `"CN=alice, O=example"`.
///
/// Returns `None` when the name cannot be parsed or encoded.
pub fn encode_dn<C: Codec + ?Sized>(codec: &C, dn: &str) -> Option<Vec<u8>> {
    match try_encode(codec, dn) {
        Ok(encoded) => Some(encoded),
        Err(err) => {
            log::debug!("cannot encode distinguished name {:?}: {}", dn, err);
            None
        }
    }
}

fn try_decode<C: Codec + ?Sized>(codec: &C, encoded: &[u8]) -> Result<String> {
    let der = match codec.decode_value(encoded, TypeCode::X501DistinguishedName)? {
        Any::X501DistinguishedName(der) => der,
        _ => {
            return Err(Error::Codec {
                reason: "codec returned an unexpected type",
            })
        }
    };
    Ok(format_dn(&Name::from_der(&der)?))
}

/// Decodes a distinguished name produced by [`encode_dn`].
///
/// # Errors
///
/// [`Error::Sas`] with [`SasStatus::InvalidEvidence`], wrapping the cause.
pub fn decode_dn<C: Codec + ?Sized>(codec: &C, encoded: &[u8]) -> Result<String> {
    try_decode(codec, encoded).map_err(|err| {
        log::debug!("rejecting distinguished name: {}", err);
        Error::sas(SasStatus::InvalidEvidence, err)
    })
}
