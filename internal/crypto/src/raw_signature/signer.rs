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

use thiserror::Error;

use crate::raw_signature::{rust_native, SigningAlg};

/// Implementations of the `RawSigner` trait generate a cryptographic signature
/// over an arbitrary byte array.
pub trait RawSigner: Send + Sync {
    /// Return a raw signature over the original byte slice.
    ///
    /// ECDSA signatures are returned DER-encoded, as they appear inside
    /// X.509 structures.
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, RawSignerError>;

    /// Return the algorithm implemented by this signer.
    fn alg(&self) -> SigningAlg;

    /// Return the size in bytes of the largest possible expected signature.
    fn reserve_size(&self) -> usize;
}

/// Return a built-in [`RawSigner`] instance using the provided private key.
///
/// `private_key` must be a PKCS#8 private key in PEM format.
pub fn signer_from_private_key(
    private_key: &[u8],
    alg: SigningAlg,
) -> Result<Box<dyn RawSigner>, RawSignerError> {
    rust_native::signers::signer_from_private_key(private_key, alg)
}

/// Describes errors that can be identified when generating a raw signature.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum RawSignerError {
    /// The private key could not be loaded.
    #[error("invalid signing credentials ({0})")]
    InvalidSigningCredentials(String),

    /// No signer is available for the requested algorithm.
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(SigningAlg),

    /// The backend refuses to sign with the requested algorithm.
    #[error("signing algorithm not approved: {0}")]
    NotApproved(String),

    /// An unexpected internal error occured while generating the signature.
    #[error("internal error ({0})")]
    InternalError(String),
}
