//! X.509 certificate chains carried as `CSI::X509CertificateChain`.
//!
//! On the wire the chain is a DER PkiPath:
//!
//! ```text
//! PkiPath ::= SEQUENCE OF Certificate
//! ```
//!
//! PkiPath lists the certificate closest to the trust anchor first, while the
//! chains handled here are ordered end-entity first, as in a TLS handshake.

use alloc::vec::Vec;

use der::{Decode, Encode};
use x509_cert::Certificate;

use crate::codec::{Any, Codec, TypeCode};
use crate::errors::{Error, Result, SasStatus};

fn try_encode<C: Codec + ?Sized>(codec: &C, chain: &[Certificate]) -> Result<Vec<u8>> {
    let pki_path: Vec<Certificate> = chain.iter().rev().cloned().collect();
    let der = pki_path.to_der()?;
    codec.encode_value(&Any::X509CertificateChain(der))
}

/// Encodes a certificate chain, end-entity certificate first.
///
/// Returns `None` for an empty chain or when encoding fails.
pub fn encode_cert_chain<C: Codec + ?Sized>(
    codec: &C,
    chain: &[Certificate],
) -> Option<Vec<u8>> {
    if chain.is_empty() {
        return None;
    }

    match try_encode(codec, chain) {
        Ok(encoded) => Some(encoded),
        Err(err) => {
            log::debug!("cannot encode certificate chain: {}", err);
            None
        }
    }
}

fn try_decode<C: Codec + ?Sized>(codec: &C, encoded: &[u8]) -> Result<Vec<Certificate>> {
    let der = match codec.decode_value(encoded, TypeCode::X509CertificateChain)? {
        Any::X509CertificateChain(der) => der,
        _ => {
            return Err(Error::Codec {
                reason: "codec returned an unexpected type",
            })
        }
    };

    let mut chain = Vec::<Certificate>::from_der(&der)?;
    chain.reverse();
    Ok(chain)
}

/// Decodes a certificate chain produced by [`encode_cert_chain`].
///
/// The returned chain is ordered end-entity certificate first.
///
/// # Errors
///
/// [`Error::Sas`] with [`SasStatus::InvalidEvidence`], wrapping the cause.
pub fn decode_cert_chain<C: Codec + ?Sized>(
    codec: &C,
    encoded: &[u8],
) -> Result<Vec<Certificate>> {
    try_decode(codec, encoded).map_err(|err| {
        log::debug!("rejecting certificate chain: {}", err);
        Error::sas(SasStatus::InvalidEvidence, err)
    })
}
