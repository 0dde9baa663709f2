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

use p256::ecdsa::SigningKey as P256SigningKey;
use p384::ecdsa::SigningKey as P384SigningKey;

use super::private_key_pem;
use crate::raw_signature::{RawSigner, RawSignerError, SigningAlg};

enum EcdsaSigningKey {
    Es256(P256SigningKey),
    Es384(P384SigningKey),
}

/// Implements `RawSigner` trait using the `p256` and `p384` crates'
/// implementations of ECDSA.
pub(crate) struct EcdsaSigner {
    alg: SigningAlg,
    signing_key: EcdsaSigningKey,
}

impl EcdsaSigner {
    pub(crate) fn from_private_key(
        private_key: &[u8],
        alg: SigningAlg,
    ) -> Result<Self, RawSignerError> {
        let pem = private_key_pem(private_key)?;

        let signing_key = match alg {
            SigningAlg::Es256 => {
                use p256::pkcs8::DecodePrivateKey;
                EcdsaSigningKey::Es256(P256SigningKey::from_pkcs8_pem(pem).map_err(|e| {
                    RawSignerError::InvalidSigningCredentials(format!("invalid private key: {e}"))
                })?)
            }
            SigningAlg::Es384 => {
                use p384::pkcs8::DecodePrivateKey;
                EcdsaSigningKey::Es384(P384SigningKey::from_pkcs8_pem(pem).map_err(|e| {
                    RawSignerError::InvalidSigningCredentials(format!("invalid private key: {e}"))
                })?)
            }
            _ => return Err(RawSignerError::UnsupportedAlgorithm(alg)),
        };

        Ok(EcdsaSigner { alg, signing_key })
    }
}

impl RawSigner for EcdsaSigner {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, RawSignerError> {
        match &self.signing_key {
            EcdsaSigningKey::Es256(key) => {
                use p256::ecdsa::{signature::Signer, Signature};
                let signature: Signature = key
                    .try_sign(data)
                    .map_err(|e| RawSignerError::InternalError(format!("signature error: {e}")))?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
            EcdsaSigningKey::Es384(key) => {
                use p384::ecdsa::{signature::Signer, Signature};
                let signature: Signature = key
                    .try_sign(data)
                    .map_err(|e| RawSignerError::InternalError(format!("signature error: {e}")))?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
        }
    }

    fn alg(&self) -> SigningAlg {
        self.alg
    }

    fn reserve_size(&self) -> usize {
        match self.signing_key {
            EcdsaSigningKey::Es256(_) => 72,
            EcdsaSigningKey::Es384(_) => 104,
        }
    }
}
