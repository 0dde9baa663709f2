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

#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg, doc_cfg_hide))]

mod backend;
pub use backend::{backend_for, CryptoBackend, CryptoBackendKind, FipsBackend, StandardBackend};

pub mod base64;

mod certificate;
pub use certificate::{BasicConstraints, Certificate, DistinguishedName, Extension, KeyUsage};

mod crl;
pub use crl::{Crl, RevokedEntry};

pub(crate) mod ec_utils;

mod error;
pub use error::CryptoError;

pub mod hash;
pub use hash::DigestAlgorithm;

pub(crate) mod internal;

mod ocsp;
pub use ocsp::{BasicOcspResponse, CertId, CertStatus, ResponderId, SingleResponse};

pub mod oids;

pub mod raw_signature;

mod revocation_reason;
pub use revocation_reason::RevocationReason;

#[cfg(test)]
pub(crate) mod tests;
