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

use std::{fmt, str::FromStr};

#[cfg(feature = "json_schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{oids, DigestAlgorithm};

/// Describes the certificate and revocation-artifact signature algorithms the
/// crypto backends can evaluate.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "json_schema", derive(JsonSchema))]
#[non_exhaustive]
pub enum SigningAlg {
    /// ECDSA with SHA-256
    Es256,

    /// ECDSA with SHA-384
    Es384,

    /// ECDSA with SHA-512
    Es512,

    /// Edwards-Curve DSA (Ed25519 instance only)
    Ed25519,

    /// RSASSA-PKCS1-v1_5 with SHA-256
    Rs256,

    /// RSASSA-PKCS1-v1_5 with SHA-384
    Rs384,

    /// RSASSA-PKCS1-v1_5 with SHA-512
    Rs512,

    /// RSASSA-PKCS1-v1_5 with SHA-1 (legacy)
    Rs1,
}

impl SigningAlg {
    /// Resolve an X.509 `AlgorithmIdentifier` OID to a signing algorithm.
    ///
    /// Returns `None` for algorithms that none of the backends support.
    pub fn from_signature_oid(oid: &str) -> Option<Self> {
        match oid {
            oids::ECDSA_WITH_SHA256 => Some(Self::Es256),
            oids::ECDSA_WITH_SHA384 => Some(Self::Es384),
            oids::ECDSA_WITH_SHA512 => Some(Self::Es512),
            oids::ED25519 => Some(Self::Ed25519),
            oids::SHA256_WITH_RSA_ENCRYPTION => Some(Self::Rs256),
            oids::SHA384_WITH_RSA_ENCRYPTION => Some(Self::Rs384),
            oids::SHA512_WITH_RSA_ENCRYPTION => Some(Self::Rs512),
            oids::SHA1_WITH_RSA_ENCRYPTION => Some(Self::Rs1),
            _ => None,
        }
    }

    /// Return the signature algorithm OID.
    pub fn oid(&self) -> &'static str {
        match self {
            Self::Es256 => oids::ECDSA_WITH_SHA256,
            Self::Es384 => oids::ECDSA_WITH_SHA384,
            Self::Es512 => oids::ECDSA_WITH_SHA512,
            Self::Ed25519 => oids::ED25519,
            Self::Rs256 => oids::SHA256_WITH_RSA_ENCRYPTION,
            Self::Rs384 => oids::SHA384_WITH_RSA_ENCRYPTION,
            Self::Rs512 => oids::SHA512_WITH_RSA_ENCRYPTION,
            Self::Rs1 => oids::SHA1_WITH_RSA_ENCRYPTION,
        }
    }

    /// Return the digest algorithm this signature algorithm hashes with.
    ///
    /// Ed25519 hashes internally and returns `None`.
    pub fn digest_algorithm(&self) -> Option<DigestAlgorithm> {
        match self {
            Self::Es256 | Self::Rs256 => Some(DigestAlgorithm::Sha256),
            Self::Es384 | Self::Rs384 => Some(DigestAlgorithm::Sha384),
            Self::Es512 | Self::Rs512 => Some(DigestAlgorithm::Sha512),
            Self::Rs1 => Some(DigestAlgorithm::Sha1),
            Self::Ed25519 => None,
        }
    }

    /// Return `true` if this is one of the RSA algorithms.
    pub fn is_rsa(&self) -> bool {
        matches!(self, Self::Rs256 | Self::Rs384 | Self::Rs512 | Self::Rs1)
    }
}

impl FromStr for SigningAlg {
    type Err = UnknownAlgorithmError;

    fn from_str(alg: &str) -> Result<Self, Self::Err> {
        match alg {
            "es256" => Ok(Self::Es256),
            "es384" => Ok(Self::Es384),
            "es512" => Ok(Self::Es512),
            "ed25519" => Ok(Self::Ed25519),
            "rs256" => Ok(Self::Rs256),
            "rs384" => Ok(Self::Rs384),
            "rs512" => Ok(Self::Rs512),
            "rs1" => Ok(Self::Rs1),
            _ => Err(UnknownAlgorithmError(alg.to_owned())),
        }
    }
}

impl fmt::Display for SigningAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{}",
            match self {
                Self::Es256 => "es256",
                Self::Es384 => "es384",
                Self::Es512 => "es512",
                Self::Ed25519 => "ed25519",
                Self::Rs256 => "rs256",
                Self::Rs384 => "rs384",
                Self::Rs512 => "rs512",
                Self::Rs1 => "rs1",
            }
        )
    }
}

#[derive(Debug, PartialEq, Eq)]
/// This error is thrown when converting from a string to [`SigningAlg`]
/// if the algorithm string is unrecognized.
pub struct UnknownAlgorithmError(pub String);

impl fmt::Display for UnknownAlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "UnknownAlgorithmError({})", self.0)
    }
}

impl std::error::Error for UnknownAlgorithmError {}
