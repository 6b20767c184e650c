//! Error types.

use alloc::boxed::Box;
use core::fmt;

/// Alias for [`core::result::Result`] with the `csiv2-token` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// CSIv2 `ContextError` major status reported when a received token is rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SasStatus {
    /// The evidence (credentials) carried in the token is invalid.
    InvalidEvidence,
    /// The authentication mechanism token could not be processed.
    InvalidMechanism,
    /// Identity and authentication evidence conflict.
    ConflictingEvidence,
    /// The referenced security context does not exist.
    NoContext,
}

impl SasStatus {
    /// Numeric major status as carried in a CSIv2 `ContextError` message.
    pub const fn code(self) -> u32 {
        match self {
            SasStatus::InvalidEvidence => 1,
            SasStatus::InvalidMechanism => 2,
            SasStatus::ConflictingEvidence => 3,
            SasStatus::NoContext => 4,
        }
    }
}

/// Error types
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Input ended before a declared length was satisfied.
    Truncated {
        /// Bytes required by the current read.
        needed: usize,
        /// Bytes left in the input.
        remaining: usize,
    },
    /// A fixed tag byte did not have the expected value.
    UnexpectedTag {
        /// Tag required by the wire format.
        expected: u8,
        /// Tag found in the input.
        actual: u8,
    },
    /// A length field was indefinite, non-minimal or used a reserved form.
    InvalidLength,
    /// A value is too large to be represented in its length field.
    LengthOverflow,
    /// The mechanism OID of a GSS token did not match the expected one.
    MechanismMismatch,
    /// Bytes were left over after a complete value was decoded.
    TrailingData,
    /// Invalid object identifier.
    Oid(const_oid::Error),
    /// DER encoding or decoding failure.
    Der(der::Error),
    /// The injected codec could not encode or decode a value.
    Codec {
        /// Short description of the failure.
        reason: &'static str,
    },
    /// A received token was rejected.
    Sas {
        /// Major status reported back to the peer.
        status: SasStatus,
        /// Underlying decode failure, if any.
        cause: Option<Box<Error>>,
    },
}

impl Error {
    pub(crate) fn sas(status: SasStatus, cause: Error) -> Self {
        Error::Sas {
            status,
            cause: Some(Box::new(cause)),
        }
    }

    /// [`Error::Truncated`] for an incomplete `der` read.
    pub(crate) fn der_truncation(err: der::Error) -> Option<Self> {
        match err.kind() {
            der::ErrorKind::Incomplete {
                expected_len,
                actual_len,
            } => Some(Error::Truncated {
                needed: usize::try_from(expected_len).ok()?,
                remaining: usize::try_from(actual_len).ok()?,
            }),
            _ => None,
        }
    }

    /// CSIv2 major status for errors raised while decoding a received token.
    pub fn sas_status(&self) -> Option<SasStatus> {
        match self {
            Error::Sas { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Der(err) => Some(err),
            Error::Sas {
                cause: Some(cause), ..
            } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Truncated { needed, remaining } => write!(
                f,
                "truncated input: needed {} bytes, {} remaining",
                needed, remaining
            ),
            Error::UnexpectedTag { expected, actual } => write!(
                f,
                "unexpected tag: expected 0x{:02x}, found 0x{:02x}",
                expected, actual
            ),
            Error::InvalidLength => write!(f, "invalid DER length"),
            Error::LengthOverflow => write!(f, "length overflow"),
            Error::MechanismMismatch => write!(f, "mechanism OID mismatch"),
            Error::TrailingData => write!(f, "trailing data after value"),
            Error::Oid(err) => write!(f, "invalid object identifier: {}", err),
            Error::Der(err) => write!(f, "DER error: {}", err),
            Error::Codec { reason } => write!(f, "codec error: {}", reason),
            Error::Sas { status, cause } => {
                write!(f, "SAS error (major status {})", status.code())?;
                if let Some(cause) = cause {
                    write!(f, ": {}", cause)?;
                }
                Ok(())
            }
        }
    }
}

impl From<const_oid::Error> for Error {
    fn from(err: const_oid::Error) -> Error {
        Error::Oid(err)
    }
}

impl From<der::Error> for Error {
    fn from(err: der::Error) -> Error {
        Error::Der(err)
    }
}
