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

/// Describes errors that can be identified when a crypto backend parses or
/// constructs ASN.1 structures.
#[derive(Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum CryptoError {
    /// The certificate could not be decoded.
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// A PEM bundle could not be decoded.
    #[error("invalid PEM data: {0}")]
    InvalidPem(String),

    /// The OCSP response could not be decoded.
    #[error("invalid OCSP response: {0}")]
    InvalidOcspResponse(String),

    /// The OCSP responder answered with a status other than `successful`.
    #[error("OCSP responder returned status {0}")]
    OcspResponderStatus(String),

    /// The certificate revocation list could not be decoded.
    #[error("invalid CRL: {0}")]
    InvalidCrl(String),

    /// The object identifier is not in dotted-decimal form.
    #[error("invalid object identifier: {0}")]
    InvalidOid(String),

    /// A time value could not be represented.
    #[error("invalid time value: {0}")]
    InvalidTime(String),

    /// An ASN.1 structure could not be encoded.
    #[error("encoding error: {0}")]
    EncodingError(String),

    /// The backend does not allow the requested operation.
    #[error("operation not approved by the {backend} backend: {reason}")]
    NotApproved {
        /// Name of the refusing backend.
        backend: &'static str,

        /// What was refused.
        reason: String,
    },
}
