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

//! The immutable context threaded through every check.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which validator is currently running.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum ValidatorContext {
    /// Walking the certificate chain.
    ChainValidator,

    /// Checking revocation through OCSP.
    OcspValidator,

    /// Checking revocation through a CRL.
    CrlValidator,

    /// Checking a document signature.
    SignatureValidator,
}

/// The role the certificate under test plays.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum CertificateSource {
    /// The certificate that signed the document.
    SignerCert,

    /// A CA certificate that issued another certificate in the chain.
    CertIssuer,

    /// The certificate that signed an OCSP response.
    OcspIssuer,

    /// The certificate that signed a CRL.
    CrlIssuer,

    /// A certificate in a timestamp authority's chain.
    TimestampIssuer,
}

/// Which moment in time validity and revocation are evaluated at.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum TimeBasedContext {
    /// The wall-clock time when validation runs.
    Present,

    /// A claimed historical time, usually the document's signing time.
    Historical,
}

impl fmt::Display for ValidatorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ChainValidator => "chain validator",
            Self::OcspValidator => "OCSP validator",
            Self::CrlValidator => "CRL validator",
            Self::SignatureValidator => "signature validator",
        })
    }
}

impl fmt::Display for CertificateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SignerCert => "signer certificate",
            Self::CertIssuer => "certificate issuer",
            Self::OcspIssuer => "OCSP responder",
            Self::CrlIssuer => "CRL issuer",
            Self::TimestampIssuer => "timestamp issuer",
        })
    }
}

/// Identifies which validator is running, which role the certificate plays,
/// and which time it is evaluated at.
///
/// `ValidationContext` is a value type. The `with_*` functions return a
/// modified copy and leave the original untouched, so a context can be
/// rebound for a nested check without affecting the caller's copy.
///
/// ```
/// use certchain::{CertificateSource, ValidationContext, ValidatorContext};
///
/// let context = ValidationContext::default();
/// let issuer_context = context.with_source(CertificateSource::CertIssuer);
///
/// assert_eq!(context.source(), CertificateSource::SignerCert);
/// assert_eq!(issuer_context.source(), CertificateSource::CertIssuer);
/// assert_eq!(issuer_context.validator(), ValidatorContext::ChainValidator);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct ValidationContext {
    validator: ValidatorContext,
    source: CertificateSource,
    time_based: TimeBasedContext,
    validation_time: Option<DateTime<Utc>>,
}

impl ValidationContext {
    /// Create a new context.
    pub fn new(
        validator: ValidatorContext,
        source: CertificateSource,
        time_based: TimeBasedContext,
    ) -> Self {
        Self {
            validator,
            source,
            time_based,
            validation_time: None,
        }
    }

    /// Which validator is running.
    pub fn validator(&self) -> ValidatorContext {
        self.validator
    }

    /// Role of the certificate under test.
    pub fn source(&self) -> CertificateSource {
        self.source
    }

    /// Whether present or historical time applies.
    pub fn time_based(&self) -> TimeBasedContext {
        self.time_based
    }

    /// The historical time, if one was supplied.
    pub fn validation_time(&self) -> Option<DateTime<Utc>> {
        self.validation_time
    }

    /// Return a copy with a different validator.
    pub fn with_validator(self, validator: ValidatorContext) -> Self {
        Self { validator, ..self }
    }

    /// Return a copy with a different certificate role.
    pub fn with_source(self, source: CertificateSource) -> Self {
        Self { source, ..self }
    }

    /// Return a copy with a different time basis.
    ///
    /// Switching to [`TimeBasedContext::Historical`] this way keeps any
    /// previously supplied time. Without one the context has no effective
    /// time; prefer [`with_validation_time`](Self::with_validation_time).
    pub fn with_time_based(self, time_based: TimeBasedContext) -> Self {
        Self { time_based, ..self }
    }

    /// Return a copy evaluated at the given historical time.
    pub fn with_validation_time(self, time: DateTime<Utc>) -> Self {
        Self {
            time_based: TimeBasedContext::Historical,
            validation_time: Some(time),
            ..self
        }
    }

    /// Resolve the time checks are evaluated at.
    ///
    /// Returns `None` for a historical context that was never given a time.
    pub fn effective_time(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.time_based {
            TimeBasedContext::Present => Some(now),
            TimeBasedContext::Historical => self.validation_time,
        }
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new(
            ValidatorContext::ChainValidator,
            CertificateSource::SignerCert,
            TimeBasedContext::Present,
        )
    }
}
