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

use rsa::{
    pkcs1v15::{Signature, VerifyingKey},
    pkcs8::DecodePublicKey,
    signature::Verifier,
    traits::PublicKeyParts,
    RsaPublicKey,
};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};

use crate::raw_signature::{RawSignatureValidationError, RawSignatureValidator};

/// An `RsaLegacyValidator` can validate raw signatures with one of the
/// RSASSA-PKCS1-v1_5 signature algorithms. These are the algorithms most CA
/// hierarchies still sign certificates, CRLs and OCSP responses with.
pub enum RsaLegacyValidator {
    Rsa1,
    Rsa256,
    Rsa384,
    Rsa512,
}

impl RawSignatureValidator for RsaLegacyValidator {
    fn validate(
        &self,
        sig: &[u8],
        data: &[u8],
        public_key: &[u8],
    ) -> Result<(), RawSignatureValidationError> {
        let key = RsaPublicKey::from_public_key_der(public_key)
            .map_err(|_| RawSignatureValidationError::InvalidPublicKey)?;

        let signature =
            Signature::try_from(sig).map_err(|_| RawSignatureValidationError::InvalidSignature)?;

        let result = match self {
            Self::Rsa1 => VerifyingKey::<Sha1>::new(key).verify(data, &signature),
            Self::Rsa256 => VerifyingKey::<Sha256>::new(key).verify(data, &signature),
            Self::Rsa384 => VerifyingKey::<Sha384>::new(key).verify(data, &signature),
            Self::Rsa512 => VerifyingKey::<Sha512>::new(key).verify(data, &signature),
        };

        result.map_err(|_| RawSignatureValidationError::SignatureMismatch)
    }
}

/// Return the modulus size in bits of an RSA `SubjectPublicKeyInfo`.
pub(crate) fn rsa_key_bits(public_key: &[u8]) -> Option<usize> {
    let key = RsaPublicKey::from_public_key_der(public_key).ok()?;
    Some(key.size() * 8)
}
