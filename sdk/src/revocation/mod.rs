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

//! Revocation checking through OCSP and CRLs.
//!
//! For each certificate OCSP is tried first. A definitive answer (good or
//! revoked) ends the check. Otherwise the CRL validator runs as a fallback
//! and the findings of both attempts stay in the report.

use std::{sync::Arc, time::Duration};

use certchain_crypto::{
    raw_signature::SigningAlg, Certificate, CryptoBackend, RevocationReason,
};
use chrono::{DateTime, Utc};
use log::debug;
use url::Url;

use crate::{
    context::ValidationContext,
    fetch::{FetchError, ResourceFetcher},
    report::{CertificateReportItem, ReportItem, ValidationReport},
    settings::Settings,
};

mod crl;
pub use crl::CrlValidator;

mod ocsp;
pub use ocsp::OcspValidator;

/// Check name used for OCSP findings.
pub const OCSP_CHECK: &str = "OCSP revocation";

/// Check name used for CRL findings.
pub const CRL_CHECK: &str = "CRL revocation";

/// Check name used for findings not tied to either protocol.
pub const REVOCATION_CHECK: &str = "revocation";

/// Revocation artifacts the caller already has, typically embedded in the
/// signed document. They are tried before anything is fetched.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RevocationData {
    /// DER-encoded `OCSPResponse` values.
    pub ocsp_responses: Vec<Vec<u8>>,

    /// DER-encoded CRLs.
    pub crls: Vec<Vec<u8>>,
}

impl RevocationData {
    /// Add a DER-encoded OCSP response.
    pub fn with_ocsp_response(mut self, der: Vec<u8>) -> Self {
        self.ocsp_responses.push(der);
        self
    }

    /// Add a DER-encoded CRL.
    pub fn with_crl(mut self, der: Vec<u8>) -> Self {
        self.crls.push(der);
        self
    }
}

/// Outcome of a revocation check for one certificate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RevocationStatus {
    /// Proven not revoked at the validation time.
    Good,

    /// Proven revoked at or before the validation time.
    Revoked,

    /// No usable evidence either way.
    Indeterminate,
}

impl RevocationStatus {
    /// Returns `true` for `Good` and `Revoked`.
    pub fn is_definitive(self) -> bool {
        !matches!(self, Self::Indeterminate)
    }
}

/// Tunables shared by both revocation validators.
#[derive(Clone, Copy, Debug)]
pub struct RevocationOptions {
    /// Deadline for each fetch.
    pub fetch_timeout: Duration,

    /// Tolerance applied to freshness windows.
    pub clock_skew: chrono::Duration,

    /// Largest fetched OCSP response or CRL accepted, in bytes.
    pub max_response_size: usize,
}

impl RevocationOptions {
    /// Take the options from the validator settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            fetch_timeout: settings.fetch_timeout(),
            clock_skew: settings.clock_skew(),
            max_response_size: settings.fetch.max_response_size,
        }
    }
}

/// Runs OCSP, then CRL if needed, for one certificate.
#[derive(Debug)]
pub struct RevocationValidator {
    ocsp: OcspValidator,
    crl: CrlValidator,
    indeterminate_is_invalid: bool,
}

impl RevocationValidator {
    /// Create a validator from its collaborators.
    pub fn new(
        backend: Arc<dyn CryptoBackend>,
        fetcher: Arc<dyn ResourceFetcher>,
        settings: &Settings,
    ) -> Self {
        let options = RevocationOptions::from_settings(settings);
        Self {
            ocsp: OcspValidator::new(backend.clone(), fetcher.clone(), options),
            crl: CrlValidator::new(backend, fetcher, options),
            indeterminate_is_invalid: settings.verify.indeterminate_revocation_is_invalid,
        }
    }

    /// Check `cert`, issued by `issuer`, at `validation_time` and record
    /// the findings in `report`.
    pub fn validate(
        &self,
        report: &mut ValidationReport,
        cert: &Arc<Certificate>,
        issuer: &Arc<Certificate>,
        context: ValidationContext,
        known: &RevocationData,
        validation_time: DateTime<Utc>,
    ) -> RevocationStatus {
        let mut findings = ValidationReport::with_error_behavior(report.error_behavior());

        if cert.ocsp_no_check {
            findings.add_report_item(CertificateReportItem::new(
                cert,
                ReportItem::info(
                    REVOCATION_CHECK,
                    "certificate carries id-pkix-ocsp-nocheck; revocation is not checked",
                ),
            ));
            report.merge(&findings);
            return RevocationStatus::Good;
        }

        let ocsp_status =
            self.ocsp
                .validate(&mut findings, cert, issuer, context, known, validation_time);

        let status = match ocsp_status {
            Some(status) if status.is_definitive() => {
                debug!("OCSP answer for {cert} is definitive; skipping CRL");
                status
            }
            _ => {
                let crl_status =
                    self.crl
                        .validate(&mut findings, cert, issuer, context, known, validation_time);

                if ocsp_status.is_none() && crl_status.is_none() {
                    findings.add_report_item(CertificateReportItem::new(
                        cert,
                        ReportItem::indeterminate(
                            REVOCATION_CHECK,
                            "no OCSP responder or CRL distribution point is available",
                        ),
                    ));
                }

                crl_status.unwrap_or(RevocationStatus::Indeterminate)
            }
        };

        if self.indeterminate_is_invalid {
            findings.downgrade_indeterminate_to_invalid();
        }

        report.merge(&findings);
        status
    }
}

// Why one attempt to use a revocation artifact produced no definitive answer.
#[derive(Clone, Debug)]
pub(crate) struct Failure {
    message: String,
    cause: Option<String>,
}

impl Failure {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub(crate) fn with_cause<E: std::error::Error + ?Sized>(
        message: impl Into<String>,
        err: &E,
    ) -> Self {
        Self {
            message: message.into(),
            cause: Some(err.to_string()),
        }
    }
}

// Fold every failed attempt into the single INDETERMINATE finding.
pub(crate) fn failure_item(check_name: &'static str, failures: &[Failure]) -> ReportItem {
    let message = failures
        .iter()
        .map(|failure| failure.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    let causes: Vec<&str> = failures
        .iter()
        .filter_map(|failure| failure.cause.as_deref())
        .collect();

    let mut item = ReportItem::indeterminate(check_name, message);
    if !causes.is_empty() {
        item.cause = Some(causes.join("; "));
    }
    item
}

pub(crate) fn check_freshness(
    artifact: &str,
    this_update: DateTime<Utc>,
    next_update: Option<DateTime<Utc>>,
    validation_time: DateTime<Utc>,
    clock_skew: chrono::Duration,
) -> Result<(), Failure> {
    if validation_time < this_update - clock_skew {
        return Err(Failure::new(format!(
            "{artifact} was issued at {this_update}, after the validation time {validation_time}"
        )));
    }

    if let Some(next_update) = next_update {
        if validation_time > next_update + clock_skew {
            return Err(Failure::new(format!(
                "{artifact} expired at {next_update}, before the validation time {validation_time}"
            )));
        }
    }

    Ok(())
}

pub(crate) fn verify_artifact_signature(
    backend: &dyn CryptoBackend,
    artifact: &str,
    alg: Option<SigningAlg>,
    alg_oid: &str,
    tbs: &[u8],
    signature: &[u8],
    signer: &Certificate,
) -> Result<(), Failure> {
    let Some(alg) = alg else {
        return Err(Failure::new(format!(
            "{artifact} uses unsupported signature algorithm {alg_oid}"
        )));
    };

    backend
        .verify_signature(alg, tbs, signature, &signer.spki_der)
        .map_err(|e| {
            Failure::with_cause(
                format!("{artifact} signature does not verify with the key of {signer}"),
                &e,
            )
        })
}

// Fetched bodies over the configured limit are refused.
pub(crate) fn check_response_size(
    locator: &Url,
    bytes: &[u8],
    limit: usize,
) -> Result<(), FetchError> {
    if bytes.len() > limit {
        return Err(FetchError::TooLarge {
            locator: locator.to_string(),
            size: bytes.len(),
            limit,
        });
    }
    Ok(())
}

// A revocation that was later lifted by removeFromCRL does not count.
pub(crate) fn is_effective_revocation(
    revoked_at: DateTime<Utc>,
    reason: Option<RevocationReason>,
    validation_time: DateTime<Utc>,
) -> bool {
    reason != Some(RevocationReason::RemoveFromCrl) && revoked_at <= validation_time
}

pub(crate) fn revocation_message(
    artifact: &str,
    revoked_at: DateTime<Utc>,
    reason: Option<RevocationReason>,
) -> String {
    match reason {
        Some(reason) => format!("certificate was revoked at {revoked_at} ({reason}) according to {artifact}"),
        None => format!("certificate was revoked at {revoked_at} according to {artifact}"),
    }
}
