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

use log::warn;

use crate::{
    backend::{CryptoBackend, StandardBackend},
    raw_signature::{
        rust_native::validators::rsa_key_bits, RawSignatureValidationError, RawSigner,
        RawSignerError, SigningAlg,
    },
    BasicOcspResponse, Certificate, Crl, CryptoError, DigestAlgorithm,
};

const MIN_RSA_KEY_BITS: usize = 2048;

/// Backend that only permits FIPS 140 approved signature algorithms.
///
/// Parsing and encoding are delegated to [`StandardBackend`]. Signatures
/// using SHA-1 are refused, as are RSA keys shorter than 2048 bits. SHA-1
/// digests remain available because OCSP `CertID` values are commonly
/// computed with it.
#[derive(Clone, Copy, Debug, Default)]
pub struct FipsBackend {
    inner: StandardBackend,
}

impl FipsBackend {
    fn check_alg(alg: SigningAlg) -> Result<(), String> {
        if alg.digest_algorithm() == Some(DigestAlgorithm::Sha1) {
            return Err(format!("{alg} signatures use SHA-1"));
        }
        Ok(())
    }
}

impl CryptoBackend for FipsBackend {
    fn name(&self) -> &'static str {
        "fips"
    }

    fn is_fips(&self) -> bool {
        true
    }

    fn create_oid(&self, dotted: &str) -> Result<Vec<u8>, CryptoError> {
        self.inner.create_oid(dotted)
    }

    fn create_octet_string(&self, content: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.inner.create_octet_string(content)
    }

    fn create_sequence(&self, elements: &[Vec<u8>]) -> Result<Vec<u8>, CryptoError> {
        self.inner.create_sequence(elements)
    }

    fn digest(&self, alg: DigestAlgorithm, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.inner.digest(alg, data)
    }

    fn parse_certificate(&self, der: &[u8]) -> Result<Certificate, CryptoError> {
        self.inner.parse_certificate(der)
    }

    fn parse_certificates_pem(&self, pem: &[u8]) -> Result<Vec<Certificate>, CryptoError> {
        self.inner.parse_certificates_pem(pem)
    }

    fn verify_signature(
        &self,
        alg: SigningAlg,
        data: &[u8],
        signature: &[u8],
        spki_der: &[u8],
    ) -> Result<(), RawSignatureValidationError> {
        if let Err(reason) = Self::check_alg(alg) {
            warn!("FIPS backend refused signature check: {reason}");
            return Err(RawSignatureValidationError::NotApproved(reason));
        }

        if alg.is_rsa() {
            let bits = rsa_key_bits(spki_der).ok_or(RawSignatureValidationError::InvalidPublicKey)?;
            if bits < MIN_RSA_KEY_BITS {
                let reason = format!("{bits}-bit RSA key is below {MIN_RSA_KEY_BITS} bits");
                warn!("FIPS backend refused signature check: {reason}");
                return Err(RawSignatureValidationError::NotApproved(reason));
            }
        }

        self.inner.verify_signature(alg, data, signature, spki_der)
    }

    fn create_ocsp_request(
        &self,
        cert: &Certificate,
        issuer: &Certificate,
    ) -> Result<Vec<u8>, CryptoError> {
        self.inner.create_ocsp_request(cert, issuer)
    }

    fn parse_ocsp_response(&self, der: &[u8]) -> Result<BasicOcspResponse, CryptoError> {
        self.inner.parse_ocsp_response(der)
    }

    fn parse_crl(&self, der: &[u8]) -> Result<Crl, CryptoError> {
        self.inner.parse_crl(der)
    }

    fn content_signer(
        &self,
        alg: SigningAlg,
        private_key_pem: &[u8],
    ) -> Result<Box<dyn RawSigner>, RawSignerError> {
        Self::check_alg(alg).map_err(RawSignerError::NotApproved)?;
        self.inner.content_signer(alg, private_key_pem)
    }
}
