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

use std::{borrow::Cow, str::FromStr};

use asn1_rs::{OctetString, Oid, Sequence, ToDer};

use crate::{
    backend::CryptoBackend,
    ocsp::build_ocsp_request,
    raw_signature::{
        signer_from_private_key, validator_for_signing_alg, RawSignatureValidationError,
        RawSigner, RawSignerError, SigningAlg,
    },
    BasicOcspResponse, Certificate, Crl, CryptoError, DigestAlgorithm,
};

/// Backend built on the pure-Rust `RustCrypto` providers, `x509-parser`, and
/// `rasn`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardBackend;

impl CryptoBackend for StandardBackend {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn create_oid(&self, dotted: &str) -> Result<Vec<u8>, CryptoError> {
        let oid = Oid::from_str(dotted).map_err(|_| CryptoError::InvalidOid(dotted.to_string()))?;

        oid.to_der_vec()
            .map_err(|e| CryptoError::EncodingError(e.to_string()))
    }

    fn create_octet_string(&self, content: &[u8]) -> Result<Vec<u8>, CryptoError> {
        OctetString::new(content)
            .to_der_vec()
            .map_err(|e| CryptoError::EncodingError(e.to_string()))
    }

    fn create_sequence(&self, elements: &[Vec<u8>]) -> Result<Vec<u8>, CryptoError> {
        let content = elements.concat();

        Sequence::new(Cow::Owned(content))
            .to_der_vec()
            .map_err(|e| CryptoError::EncodingError(e.to_string()))
    }

    fn digest(&self, alg: DigestAlgorithm, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(alg.digest(data))
    }

    fn parse_certificate(&self, der: &[u8]) -> Result<Certificate, CryptoError> {
        Certificate::from_der(der)
    }

    fn parse_certificates_pem(&self, pem: &[u8]) -> Result<Vec<Certificate>, CryptoError> {
        Certificate::from_pem_bundle(pem)
    }

    fn verify_signature(
        &self,
        alg: SigningAlg,
        data: &[u8],
        signature: &[u8],
        spki_der: &[u8],
    ) -> Result<(), RawSignatureValidationError> {
        let Some(validator) = validator_for_signing_alg(alg) else {
            return Err(RawSignatureValidationError::UnsupportedAlgorithm);
        };

        validator.validate(signature, data, spki_der)
    }

    fn create_ocsp_request(
        &self,
        cert: &Certificate,
        issuer: &Certificate,
    ) -> Result<Vec<u8>, CryptoError> {
        build_ocsp_request(cert, issuer)
    }

    fn parse_ocsp_response(&self, der: &[u8]) -> Result<BasicOcspResponse, CryptoError> {
        BasicOcspResponse::from_der(der)
    }

    fn parse_crl(&self, der: &[u8]) -> Result<Crl, CryptoError> {
        Crl::from_der(der)
    }

    fn content_signer(
        &self,
        alg: SigningAlg,
        private_key_pem: &[u8],
    ) -> Result<Box<dyn RawSigner>, RawSignerError> {
        signer_from_private_key(private_key_pem, alg)
    }
}
