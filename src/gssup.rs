//! GSSUP username/password tokens (CSIv2 § 16.7).
//!
//! The `InitialContextToken` carrying the credentials is serialized by the
//! injected [`Codec`] and framed as a GSS token for [`GSSUP_MECH_OID`]. The
//! target name travels as a GSS exported name.

use alloc::vec::Vec;

use zeroize::Zeroizing;

use crate::codec::{Any, Codec, InitialContextToken, TypeCode};
use crate::errors::{Error, Result, SasStatus};
use crate::exported_name::{decode_exported_name, export_name};
use crate::gss_token::{create_gss_token, read_gss_token_data};
use crate::oid::GSSUP_MECH_OID;

fn try_encode<C: Codec + ?Sized>(
    codec: &C,
    user: &str,
    password: &str,
    target: &str,
) -> Result<Vec<u8>> {
    let target_name = export_name(&GSSUP_MECH_OID, target)?;

    let token = InitialContextToken {
        username: user.as_bytes().to_vec(),
        password: Zeroizing::new(password.as_bytes().to_vec()),
        target_name,
    };

    // The encoded body contains the password as well.
    let body = Zeroizing::new(codec.encode_value(&Any::InitialContextToken(token))?);
    create_gss_token(&GSSUP_MECH_OID, &body)
}

/// Builds a GSSUP token for `user`/`password` addressed to `target`.
///
/// Every intermediate copy of the password is zeroed before this function
/// returns. Returns `None` when the token cannot be encoded.
pub fn encode_gssup_token<C: Codec + ?Sized>(
    codec: &C,
    user: &str,
    password: &str,
    target: &str,
) -> Option<Vec<u8>> {
    match try_encode(codec, user, password, target) {
        Ok(token) => Some(token),
        Err(err) => {
            log::debug!("cannot encode GSSUP token: {}", err);
            None
        }
    }
}

fn try_decode<C: Codec + ?Sized>(codec: &C, token: &[u8]) -> Result<InitialContextToken> {
    let data = read_gss_token_data(&GSSUP_MECH_OID, token)?;

    let mut decoded = match codec.decode_value(data, TypeCode::InitialContextToken)? {
        Any::InitialContextToken(decoded) => decoded,
        _ => {
            return Err(Error::Codec {
                reason: "codec returned an unexpected type",
            })
        }
    };

    let exported = decode_exported_name(&decoded.target_name).ok_or(Error::Codec {
        reason: "target name is not an exported name",
    })?;
    let (name, _) = exported.into_parts();
    decoded.target_name = name.into_bytes();
    Ok(decoded)
}

/// Decodes a GSSUP token.
///
/// On success `target_name` holds the UTF-8 bytes of the target's name, with
/// the exported-name framing removed.
///
/// # Errors
///
/// [`Error::Sas`] with [`SasStatus::InvalidEvidence`], wrapping the cause.
pub fn decode_gssup_token<C: Codec + ?Sized>(
    codec: &C,
    token: &[u8],
) -> Result<InitialContextToken> {
    try_decode(codec, token).map_err(|err| {
        log::debug!("rejecting GSSUP token: {}", err);
        Error::sas(SasStatus::InvalidEvidence, err)
    })
}
