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

//! Utilities for working with the elliptic curve keys used in ECDSA
//! signatures.

use x509_parser::{prelude::FromDer, x509::SubjectPublicKeyInfo};

use crate::oids::{EC_PUBLIC_KEY, PRIME256V1, SECP384R1, SECP521R1};

/// NIST curves recognized in EC public keys.
#[derive(Debug, Eq, PartialEq)]
pub(crate) enum EcdsaCurve {
    /// NIST curve P-256
    P256,

    /// NIST curve P-384
    P384,

    /// NIST curve P-521
    P521,
}

// Returns the EcdsaCurve for a given DER SubjectPublicKeyInfo.
pub(crate) fn ec_curve_from_public_key_der(public_key: &[u8]) -> Option<EcdsaCurve> {
    let (_, pk) = SubjectPublicKeyInfo::from_der(public_key).ok()?;

    let public_key_alg = &pk.algorithm;

    if public_key_alg.algorithm.to_id_string() != EC_PUBLIC_KEY {
        return None;
    }

    let named_curve_oid = public_key_alg.parameters.as_ref()?.as_oid().ok()?;

    match named_curve_oid.to_id_string().as_str() {
        PRIME256V1 => Some(EcdsaCurve::P256),
        SECP384R1 => Some(EcdsaCurve::P384),
        SECP521R1 => Some(EcdsaCurve::P521),
        _ => None,
    }
}
