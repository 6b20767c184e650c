//! CORBA `IOP::Codec` seam.
//!
//! Token bodies are serialized by the ORB's codec before they are framed as
//! GSS tokens. The token functions in this crate only need a handful of IDL
//! types, so the codec is modelled as a trait over a closed [`Any`] type.
//! [`CdrEncapsCodec`] is a self-contained implementation of the
//! `ENCODING_CDR_ENCAPS` format that ORBs use for service context data.

use alloc::vec::Vec;
use core::fmt;

use zeroize::Zeroizing;

use crate::errors::{Error, Result};
use crate::reader::Reader;

/// `GSSUP::InitialContextToken`.
///
/// ```text
/// struct InitialContextToken {
///     CSI::UTF8String username;
///     CSI::UTF8String password;
///     CSI::GSS_NT_ExportedName target_name;
/// };
/// ```
#[derive(Clone, Default, Eq, PartialEq)]
pub struct InitialContextToken {
    /// UTF-8 username, possibly scoped (`user@domain`).
    pub username: Vec<u8>,
    /// UTF-8 password, zeroed on drop.
    pub password: Zeroizing<Vec<u8>>,
    /// Target name; an exported name on the wire, the bare name after decoding.
    pub target_name: Vec<u8>,
}

impl fmt::Debug for InitialContextToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitialContextToken")
            .field("username", &self.username)
            .field("password", &"..")
            .field("target_name", &self.target_name)
            .finish()
    }
}

/// IDL type of a value carried in an [`Any`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TypeCode {
    /// `GSSUP::InitialContextToken`
    InitialContextToken,
    /// `Security::Opaque` octet sequence.
    Opaque,
    /// `CSI::X501DistinguishedName`
    X501DistinguishedName,
    /// `CSI::X509CertificateChain`
    X509CertificateChain,
}

/// Value handed to or returned by a [`Codec`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Any {
    /// GSSUP username/password token.
    InitialContextToken(InitialContextToken),
    /// Opaque bytes such as an LTPA token.
    Opaque(Zeroizing<Vec<u8>>),
    /// DER-encoded X.501 `Name`.
    X501DistinguishedName(Vec<u8>),
    /// DER-encoded PkiPath.
    X509CertificateChain(Vec<u8>),
}

impl Any {
    /// Type code of the carried value.
    pub fn type_code(&self) -> TypeCode {
        match self {
            Any::InitialContextToken(_) => TypeCode::InitialContextToken,
            Any::Opaque(_) => TypeCode::Opaque,
            Any::X501DistinguishedName(_) => TypeCode::X501DistinguishedName,
            Any::X509CertificateChain(_) => TypeCode::X509CertificateChain,
        }
    }
}

/// Serializes typed values to bytes and back.
pub trait Codec {
    /// Encode `value` without its type code.
    fn encode_value(&self, value: &Any) -> Result<Vec<u8>>;

    /// Decode a value of type `type_code` from `data`.
    fn decode_value(&self, data: &[u8], type_code: TypeCode) -> Result<Any>;
}

impl<C: Codec + ?Sized> Codec for &C {
    fn encode_value(&self, value: &Any) -> Result<Vec<u8>> {
        (**self).encode_value(value)
    }

    fn decode_value(&self, data: &[u8], type_code: TypeCode) -> Result<Any> {
        (**self).decode_value(data, type_code)
    }
}

const BIG_ENDIAN: u8 = 0;
const LITTLE_ENDIAN: u8 = 1;

/// CDR encapsulation codec (`IOP::ENCODING_CDR_ENCAPS`, GIOP 1.2).
///
/// Encodes big-endian. Decodes either byte order.
#[derive(Clone, Copy, Debug, Default)]
pub struct CdrEncapsCodec;

impl CdrEncapsCodec {
    /// Creates a codec.
    pub fn new() -> Self {
        Self
    }
}

/// Offset just past an `octet` sequence of `len` bytes written at `offset`.
fn octet_seq_end(offset: usize, len: usize) -> Result<usize> {
    u32::try_from(len).map_err(|_| Error::LengthOverflow)?;
    let aligned = offset
        .checked_add(3)
        .map(|end| end & !3)
        .ok_or(Error::LengthOverflow)?;
    aligned
        .checked_add(4)
        .and_then(|end| end.checked_add(len))
        .ok_or(Error::LengthOverflow)
}

/// Writes an `octet` sequence, aligning its `ulong` length to 4 bytes
/// relative to the start of the encapsulation.
fn write_octet_seq(out: &mut Vec<u8>, data: &[u8]) -> Result<()> {
    let len = u32::try_from(data.len()).map_err(|_| Error::LengthOverflow)?;
    while out.len() % 4 != 0 {
        out.push(0);
    }
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(data);
    Ok(())
}

/// Encapsulates `fields` as consecutive `octet` sequences.
///
/// Every length is checked and the buffer allocated at its final size before
/// the first field is written. Fields may hold credentials, and a reallocation
/// would free a copy of them unscrubbed.
fn write_encapsulation(fields: &[&[u8]]) -> Result<Vec<u8>> {
    let size = fields
        .iter()
        .try_fold(1, |offset, field| octet_seq_end(offset, field.len()))?;

    let mut out = Vec::with_capacity(size);
    out.push(BIG_ENDIAN);
    for field in fields {
        write_octet_seq(&mut out, field)?;
    }
    debug_assert_eq!(out.len(), size);
    Ok(out)
}

struct CdrReader<'a> {
    inner: Reader<'a>,
    little_endian: bool,
}

impl<'a> CdrReader<'a> {
    fn new(data: &'a [u8]) -> Result<Self> {
        let mut inner = Reader::new(data);
        let little_endian = match inner.read_u8() {
            Ok(BIG_ENDIAN) => false,
            Ok(LITTLE_ENDIAN) => true,
            Ok(_) => {
                return Err(Error::Codec {
                    reason: "invalid byte order flag",
                })
            }
            Err(_) => {
                return Err(Error::Codec {
                    reason: "empty encapsulation",
                })
            }
        };
        Ok(Self {
            inner,
            little_endian,
        })
    }

    fn read_octet_seq(&mut self) -> Result<&'a [u8]> {
        let padding = (4 - self.inner.position() % 4) % 4;
        self.inner.read_slice(padding)?;

        let len = self.inner.read_u32()?;
        let len = if self.little_endian {
            len.swap_bytes()
        } else {
            len
        };
        self.inner.read_slice(len as usize)
    }

    fn finish<T>(self, value: T) -> Result<T> {
        if !self.inner.is_finished() {
            return Err(Error::TrailingData);
        }
        Ok(value)
    }
}

impl Codec for CdrEncapsCodec {
    fn encode_value(&self, value: &Any) -> Result<Vec<u8>> {
        match value {
            Any::InitialContextToken(token) => write_encapsulation(&[
                &token.username,
                &token.password,
                &token.target_name,
            ]),
            Any::Opaque(data) => write_encapsulation(&[data]),
            Any::X501DistinguishedName(data) | Any::X509CertificateChain(data) => {
                write_encapsulation(&[data])
            }
        }
    }

    fn decode_value(&self, data: &[u8], type_code: TypeCode) -> Result<Any> {
        let mut reader = CdrReader::new(data)?;
        match type_code {
            TypeCode::InitialContextToken => {
                let username = reader.read_octet_seq()?.to_vec();
                let password = Zeroizing::new(reader.read_octet_seq()?.to_vec());
                let target_name = reader.read_octet_seq()?.to_vec();
                reader.finish(Any::InitialContextToken(InitialContextToken {
                    username,
                    password,
                    target_name,
                }))
            }
            TypeCode::Opaque => {
                let bytes = Zeroizing::new(reader.read_octet_seq()?.to_vec());
                reader.finish(Any::Opaque(bytes))
            }
            TypeCode::X501DistinguishedName => {
                let bytes = reader.read_octet_seq()?.to_vec();
                reader.finish(Any::X501DistinguishedName(bytes))
            }
            TypeCode::X509CertificateChain => {
                let bytes = reader.read_octet_seq()?.to_vec();
                reader.finish(Any::X509CertificateChain(bytes))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    fn token() -> InitialContextToken {
        InitialContextToken {
            username: b"alice".to_vec(),
            password: Zeroizing::new(b"pw".to_vec()),
            target_name: b"t".to_vec(),
        }
    }

    #[test]
    fn opaque_layout() {
        let codec = CdrEncapsCodec::new();
        let bytes = codec
            .encode_value(&Any::Opaque(Zeroizing::new(b"abc".to_vec())))
            .unwrap();
        assert_eq!(bytes, hex!("00000000 00000003 616263").to_vec());
    }

    #[test]
    fn initial_context_token_layout() {
        let codec = CdrEncapsCodec::new();
        let bytes = codec
            .encode_value(&Any::InitialContextToken(token()))
            .unwrap();
        assert_eq!(
            bytes,
            hex!(
                "00000000 00000005 616c696365"
                "000000 00000002 7077"
                "0000 00000001 74"
            )
            .to_vec()
        );

        let decoded = codec
            .decode_value(&bytes, TypeCode::InitialContextToken)
            .unwrap();
        assert_eq!(decoded, Any::InitialContextToken(token()));
    }

    #[test]
    fn encapsulation_is_allocated_once() {
        let token = InitialContextToken {
            username: b"alice".to_vec(),
            password: Zeroizing::new(b"S3cr3tPassw0rd!!".to_vec()),
            target_name: vec![b't'; 41],
        };
        let bytes = CdrEncapsCodec::new()
            .encode_value(&Any::InitialContextToken(token))
            .unwrap();
        // 1 + 3 + 4 + 5, + 3 + 4 + 16, + 4 + 41
        assert_eq!(bytes.len(), 81);
        assert_eq!(bytes.capacity(), bytes.len());
    }

    #[test]
    fn octet_seq_alignment() {
        assert_eq!(octet_seq_end(1, 0).unwrap(), 8);
        assert_eq!(octet_seq_end(4, 2).unwrap(), 10);
        assert_eq!(octet_seq_end(10, 1).unwrap(), 17);
        assert!(octet_seq_end(usize::MAX - 1, 0).is_err());
    }

    #[test]
    fn decodes_little_endian() {
        let codec = CdrEncapsCodec::new();
        let decoded = codec
            .decode_value(&hex!("01000000 02000000 6869"), TypeCode::Opaque)
            .unwrap();
        assert_eq!(decoded, Any::Opaque(Zeroizing::new(b"hi".to_vec())));
    }

    #[test]
    fn rejects_malformed() {
        let codec = CdrEncapsCodec::new();
        assert!(codec.decode_value(&[], TypeCode::Opaque).is_err());
        assert!(codec
            .decode_value(&hex!("02000000 00000000"), TypeCode::Opaque)
            .is_err());
        assert!(matches!(
            codec.decode_value(&hex!("00000000 00000009 6869"), TypeCode::Opaque),
            Err(Error::Truncated { .. })
        ));
        assert!(matches!(
            codec.decode_value(&hex!("00000000 00000001 68 69"), TypeCode::Opaque),
            Err(Error::TrailingData)
        ));
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", token());
        assert!(!rendered.contains("112, 119"));
        assert!(rendered.contains("password: \"..\""));
    }

    #[test]
    fn type_codes() {
        assert_eq!(
            Any::X509CertificateChain(Vec::new()).type_code(),
            TypeCode::X509CertificateChain
        );
        assert_eq!(
            Any::X501DistinguishedName(Vec::new()).type_code(),
            TypeCode::X501DistinguishedName
        );
    }
}
