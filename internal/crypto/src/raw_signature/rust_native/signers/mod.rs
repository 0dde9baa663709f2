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

use crate::raw_signature::{RawSigner, RawSignerError, SigningAlg};

mod ecdsa_signer;
use ecdsa_signer::EcdsaSigner;

mod ed25519_signer;
use ed25519_signer::Ed25519Signer;

/// Return a built-in signer for the given algorithm and PKCS#8 PEM private
/// key.
pub(crate) fn signer_from_private_key(
    private_key: &[u8],
    alg: SigningAlg,
) -> Result<Box<dyn RawSigner>, RawSignerError> {
    match alg {
        SigningAlg::Es256 | SigningAlg::Es384 => Ok(Box::new(EcdsaSigner::from_private_key(
            private_key,
            alg,
        )?)),

        SigningAlg::Ed25519 => Ok(Box::new(Ed25519Signer::from_private_key(private_key)?)),

        _ => Err(RawSignerError::UnsupportedAlgorithm(alg)),
    }
}

fn private_key_pem(private_key: &[u8]) -> Result<&str, RawSignerError> {
    std::str::from_utf8(private_key).map_err(|e| {
        RawSignerError::InvalidSigningCredentials(format!("invalid private key: {e}"))
    })
}
