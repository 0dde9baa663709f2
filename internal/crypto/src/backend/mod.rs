// Copyright 2024 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! The crypto backend port.
//!
//! The validation engine never touches an ASN.1 or signature library
//! directly. Every such operation goes through a [`CryptoBackend`] that the
//! caller chooses and injects.

use std::{fmt, str::FromStr, sync::Arc};

#[cfg(feature = "json_schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    raw_signature::{RawSignatureValidationError, RawSigner, RawSignerError, SigningAlg},
    BasicOcspResponse, Certificate, Crl, CryptoError, DigestAlgorithm,
};

mod fips;
pub use fips::FipsBackend;

mod standard;
pub use standard::StandardBackend;

/// Cryptographic operations needed to validate certificate chains and their
/// revocation data.
///
/// Implementations must be usable from many threads at once.
pub trait CryptoBackend: fmt::Debug + Send + Sync {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Return `true` if this backend only permits FIPS-approved algorithms.
    fn is_fips(&self) -> bool {
        false
    }

    /// DER-encode an OBJECT IDENTIFIER given in dotted-decimal notation.
    fn create_oid(&self, dotted: &str) -> Result<Vec<u8>, CryptoError>;

    /// DER-encode an OCTET STRING.
    fn create_octet_string(&self, content: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// DER-encode a SEQUENCE whose elements are already DER-encoded.
    fn create_sequence(&self, elements: &[Vec<u8>]) -> Result<Vec<u8>, CryptoError>;

    /// Hash `data` with the given algorithm.
    fn digest(&self, alg: DigestAlgorithm, data: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Decode a DER-encoded certificate.
    fn parse_certificate(&self, der: &[u8]) -> Result<Certificate, CryptoError>;

    /// Decode every certificate in a PEM bundle.
    fn parse_certificates_pem(&self, pem: &[u8]) -> Result<Vec<Certificate>, CryptoError>;

    /// Check `signature` over `data` against the public key in `spki_der`
    /// (a DER-encoded `SubjectPublicKeyInfo`).
    fn verify_signature(
        &self,
        alg: SigningAlg,
        data: &[u8],
        signature: &[u8],
        spki_der: &[u8],
    ) -> Result<(), RawSignatureValidationError>;

    /// Build a DER-encoded OCSP request for `cert`, issued by `issuer`.
    fn create_ocsp_request(
        &self,
        cert: &Certificate,
        issuer: &Certificate,
    ) -> Result<Vec<u8>, CryptoError>;

    /// Decode a DER-encoded `OCSPResponse`.
    fn parse_ocsp_response(&self, der: &[u8]) -> Result<BasicOcspResponse, CryptoError>;

    /// Decode a DER-encoded CRL.
    fn parse_crl(&self, der: &[u8]) -> Result<Crl, CryptoError>;

    /// Return a signer for the given PKCS#8 PEM private key.
    fn content_signer(
        &self,
        alg: SigningAlg,
        private_key_pem: &[u8],
    ) -> Result<Box<dyn RawSigner>, RawSignerError>;
}

/// Selects one of the built-in backends.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum CryptoBackendKind {
    /// [`StandardBackend`]
    #[default]
    Standard,

    /// [`FipsBackend`]
    Fips,
}

impl FromStr for CryptoBackendKind {
    type Err = CryptoError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "standard" => Ok(Self::Standard),
            "fips" => Ok(Self::Fips),
            _ => Err(CryptoError::EncodingError(format!(
                "unknown crypto backend: {kind}"
            ))),
        }
    }
}

impl fmt::Display for CryptoBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Standard => "standard",
            Self::Fips => "fips",
        })
    }
}

/// Construct the built-in backend of the requested kind.
pub fn backend_for(kind: CryptoBackendKind) -> Arc<dyn CryptoBackend> {
    match kind {
        CryptoBackendKind::Standard => Arc::new(StandardBackend),
        CryptoBackendKind::Fips => Arc::new(FipsBackend::default()),
    }
}
