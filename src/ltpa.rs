//! LTPA tokens.
//!
//! The raw LTPA token is carried as an opaque octet sequence through the
//! [`Codec`] and framed as a GSS token for [`LTPA_MECH_OID`]. Classic WAS
//! peers expect that token wrapped once more in a second GSS token with the
//! same OID; the decoder accepts both forms.

use alloc::vec::Vec;

use zeroize::Zeroizing;

use crate::codec::{Any, Codec, TypeCode};
use crate::errors::{Error, Result, SasStatus};
use crate::gss_token::{create_gss_token, is_gss_token, read_gss_token_data};
use crate::oid::LTPA_MECH_OID;

fn try_encode<C: Codec + ?Sized>(codec: &C, ltpa_token: &[u8]) -> Result<Vec<u8>> {
    let opaque = Any::Opaque(Zeroizing::new(ltpa_token.to_vec()));
    let body = Zeroizing::new(codec.encode_value(&opaque)?);
    create_gss_token(&LTPA_MECH_OID, &body)
}

/// Builds an LTPA GSS token from raw LTPA token bytes.
///
/// Returns `None` when the token cannot be encoded.
pub fn encode_ltpa_token<C: Codec + ?Sized>(codec: &C, ltpa_token: &[u8]) -> Option<Vec<u8>> {
    match try_encode(codec, ltpa_token) {
        Ok(token) => Some(token),
        Err(err) => {
            log::debug!("cannot encode LTPA token: {}", err);
            None
        }
    }
}

/// Builds the double-wrapped LTPA token classic WAS peers expect.
///
/// The output of [`encode_ltpa_token`] is framed in a second GSS token with
/// the same mechanism OID. Choosing this form over the single-wrapped one is
/// up to the caller, based on the peer it is talking to.
pub fn encode_ltpa_token_for_was_classic<C: Codec + ?Sized>(
    codec: &C,
    ltpa_token: &[u8],
) -> Option<Vec<u8>> {
    let inner = Zeroizing::new(encode_ltpa_token(codec, ltpa_token)?);
    match create_gss_token(&LTPA_MECH_OID, &inner) {
        Ok(token) => Some(token),
        Err(err) => {
            log::debug!("cannot wrap LTPA token for classic WAS: {}", err);
            None
        }
    }
}

fn try_decode<C: Codec + ?Sized>(codec: &C, token: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let mut data = read_gss_token_data(&LTPA_MECH_OID, token)?;
    if is_gss_token(&LTPA_MECH_OID, data) {
        log::trace!("unwrapping double-wrapped LTPA token");
        data = read_gss_token_data(&LTPA_MECH_OID, data)?;
    }

    match codec.decode_value(data, TypeCode::Opaque)? {
        Any::Opaque(bytes) => Ok(bytes),
        _ => Err(Error::Codec {
            reason: "codec returned an unexpected type",
        }),
    }
}

/// Extracts the raw LTPA token bytes from an LTPA GSS token.
///
/// Single- and double-wrapped tokens are both accepted; exactly one extra
/// layer is removed from the latter.
///
/// # Errors
///
/// [`Error::Sas`] with [`SasStatus::InvalidMechanism`]. The cause is set when
/// the token is malformed and absent when it decodes to an empty LTPA token.
pub fn decode_ltpa_token<C: Codec + ?Sized>(
    codec: &C,
    token: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let bytes = try_decode(codec, token).map_err(|err| {
        log::debug!("rejecting LTPA token: {}", err);
        Error::sas(SasStatus::InvalidMechanism, err)
    })?;

    if bytes.is_empty() {
        log::debug!("rejecting empty LTPA token");
        return Err(Error::Sas {
            status: SasStatus::InvalidMechanism,
            cause: None,
        });
    }
    Ok(bytes)
}
