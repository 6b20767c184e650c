#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/6ee8e381/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/6ee8e381/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_qualifications
)]

//! # Token formats
//!
//! All tokens produced here end up in the `client_authentication_token` or
//! `identity_token` fields of a CSIv2 `EstablishContext` message.
//!
//! | Structure          | Bytes                                                        |
//! |--------------------|--------------------------------------------------------------|
//! | DER OID            | `06, DER length, arcs`                                       |
//! | GSS token length   | `len` (< 128) or `81..84, big-endian length`                 |
//! | GSS token          | `60, token length, DER OID, payload`                         |
//! | GSS exported name  | `04 01, OID length (u16), DER OID, name length (u32), name`  |
//!
//! # Usage
//!
//! ## GSSUP
//!
//! ```
//! use csiv2_token::{codec::CdrEncapsCodec, decode_gssup_token, encode_gssup_token};
//!
//! let codec = CdrEncapsCodec::new();
//! let token = encode_gssup_token(&codec, "alice", "secret", "example.com")
//!     .expect("failed to encode");
//!
//! let decoded = decode_gssup_token(&codec, &token).expect("failed to decode");
//! assert_eq!(decoded.username, b"alice");
//! assert_eq!(decoded.target_name, b"example.com");
//! ```
//!
//! ## LTPA
//!
//! Classic WAS peers expect the LTPA token wrapped in a second GSS token;
//! [`decode_ltpa_token`] accepts both forms.
//!
//! ```
//! use csiv2_token::{
//!     codec::CdrEncapsCodec, decode_ltpa_token, encode_ltpa_token_for_was_classic,
//! };
//!
//! let codec = CdrEncapsCodec::new();
//! let token = encode_ltpa_token_for_was_classic(&codec, b"ltpa").expect("failed to encode");
//! let ltpa = decode_ltpa_token(&codec, &token).expect("failed to decode");
//! assert_eq!(&ltpa[..], b"ltpa");
//! ```
//!
//! # Errors
//!
//! Encoders return [`Option`]: `None` means the credential cannot be put on
//! the wire and no token should be sent. Decoders return [`Result`]; tokens
//! received from a peer that fail to decode produce [`Error::Sas`] carrying
//! the CSIv2 major status to report back.

#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod cert_chain;
pub mod codec;
pub mod dn;
pub mod errors;
pub mod exported_name;
pub mod gss_token;
pub mod gssup;
pub mod length;
pub mod ltpa;
pub mod oid;
#[cfg(feature = "std")]
pub mod registry;
pub mod scoped_name;

mod reader;

pub use der;
pub use x509_cert;

pub use crate::{
    cert_chain::{decode_cert_chain, encode_cert_chain},
    codec::{Any, Codec, InitialContextToken, TypeCode},
    dn::{decode_dn, encode_dn},
    errors::{Error, Result, SasStatus},
    exported_name::{decode_exported_name, encode_exported_name, GssExportedName},
    gss_token::{is_gss_token, read_gss_token_data},
    gssup::{decode_gssup_token, encode_gssup_token},
    ltpa::{decode_ltpa_token, encode_ltpa_token, encode_ltpa_token_for_was_classic},
    oid::{decode_oid, encode_oid, ObjectIdentifier},
    scoped_name::{build_scoped_user_name, extract_user_name_from_scoped_name},
};

#[cfg(feature = "std")]
pub use crate::registry::TssConfigRegistry;
