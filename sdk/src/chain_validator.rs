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

//! Walks a certificate chain from the signer to a trust anchor.

use std::{collections::HashSet, fmt, sync::Arc};

use certchain_crypto::{
    backend_for, raw_signature::RawSignatureValidationError, Certificate, CryptoBackend,
};
use chrono::{DateTime, Utc};
use log::debug;

use crate::{
    context::{CertificateSource, ValidationContext, ValidatorContext},
    extensions::{Requirement, RequiredExtensions},
    fetch::ResourceFetcher,
    report::{CertificateReportItem, ErrorBehavior, ReportItem, ValidationReport},
    revocation::{RevocationData, RevocationValidator},
    settings::Settings,
    trust_store::{CertificateTrustStore, TrustStore},
    Result,
};

/// Check name for findings about the shape of the chain itself.
pub const CHAIN_CHECK: &str = "certificate chain";

/// Check name for validity period findings.
pub const VALIDITY_CHECK: &str = "validity period";

/// Check name for certificate signature findings.
pub const SIGNATURE_CHECK: &str = "signature";

/// Check name for reaching a trust anchor.
pub const TRUST_ANCHOR_CHECK: &str = "trust anchor";

/// Validates certificate chains against a trust store.
///
/// A `ChainValidator` holds only read-only collaborators, so one instance
/// can serve many concurrent validation runs. Each run gets its own
/// [`ValidationReport`].
pub struct ChainValidator {
    backend: Arc<dyn CryptoBackend>,
    trust_store: Arc<dyn TrustStore>,
    revocation: RevocationValidator,
    settings: Settings,
}

impl fmt::Debug for ChainValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainValidator")
            .field("backend", &self.backend.name())
            .field("revocation", &self.revocation)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ChainValidator {
    /// Create a validator from explicit collaborators.
    pub fn new(
        backend: Arc<dyn CryptoBackend>,
        trust_store: Arc<dyn TrustStore>,
        fetcher: Arc<dyn ResourceFetcher>,
        settings: Settings,
    ) -> Self {
        let revocation = RevocationValidator::new(backend.clone(), fetcher, &settings);
        Self {
            backend,
            trust_store,
            revocation,
            settings,
        }
    }

    /// Create a validator whose backend and trust anchors come from
    /// `settings`.
    ///
    /// Fails if the settings are inconsistent or the trust anchors cannot be
    /// loaded.
    pub fn from_settings(settings: Settings, fetcher: Arc<dyn ResourceFetcher>) -> Result<Self> {
        settings.check()?;

        let backend = backend_for(settings.crypto.backend);
        let trust_store = CertificateTrustStore::from_settings(backend.as_ref(), &settings.trust)?;

        Ok(Self::new(backend, Arc::new(trust_store), fetcher, settings))
    }

    /// The settings this validator was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Validate a chain given as DER-encoded certificates, signer first.
    ///
    /// A certificate that cannot be decoded ends the run with an
    /// `INDETERMINATE` item.
    pub fn validate_der(
        &self,
        chain: &[Vec<u8>],
        context: ValidationContext,
        known: &RevocationData,
    ) -> ValidationReport {
        let mut certs = Vec::with_capacity(chain.len());

        for (index, der) in chain.iter().enumerate() {
            match self.backend.parse_certificate(der) {
                Ok(cert) => certs.push(cert),
                Err(e) => {
                    let mut report = self.new_report();
                    report.add_report_item(
                        ReportItem::indeterminate(
                            CHAIN_CHECK,
                            format!("certificate {index} in the chain could not be decoded"),
                        )
                        .with_cause(&e),
                    );
                    return report;
                }
            }
        }

        self.validate(&certs, context, known)
    }

    /// Validate `chain`, signer first.
    ///
    /// The chain does not need to be complete. Missing issuers are looked up
    /// among the certificates embedded in `known` OCSP responses and then in
    /// the trust store.
    pub fn validate(
        &self,
        chain: &[Certificate],
        context: ValidationContext,
        known: &RevocationData,
    ) -> ValidationReport {
        let mut report = self.new_report();

        let Some(signer) = chain.first() else {
            report.add_report_item(ReportItem::indeterminate(
                CHAIN_CHECK,
                "chain incomplete: no certificates were supplied",
            ));
            return report;
        };

        let Some(validation_time) = context.effective_time(Utc::now()) else {
            report.add_report_item(ReportItem::indeterminate(
                CHAIN_CHECK,
                "historical validation was requested without a validation time",
            ));
            return report;
        };
        let context = context.with_validator(ValidatorContext::ChainValidator);

        let supplied: Vec<Arc<Certificate>> = chain.iter().cloned().map(Arc::new).collect();
        let embedded: Vec<Arc<Certificate>> = known
            .ocsp_responses
            .iter()
            .filter_map(|der| self.backend.parse_ocsp_response(der).ok())
            .flat_map(|response| response.certs)
            .map(Arc::new)
            .collect();

        let max_depth = self.settings.verify.max_chain_depth;
        let mut seen = HashSet::new();
        let mut current = Arc::new(signer.clone());
        let mut hop_context = context;
        let mut hop = 0usize;

        loop {
            if hop >= max_depth {
                report.add_report_item(CertificateReportItem::new(
                    &current,
                    ReportItem::invalid(
                        CHAIN_CHECK,
                        format!("chain too long: no trust anchor within {max_depth} certificates"),
                    ),
                ));
                break;
            }

            if !seen.insert(current.fingerprint_sha256()) {
                report.add_report_item(CertificateReportItem::new(
                    &current,
                    ReportItem::invalid(
                        CHAIN_CHECK,
                        "chain too long: certificate appears twice in the chain",
                    ),
                ));
                break;
            }

            self.check_validity(&mut report, &current, validation_time);
            if report.should_stop() {
                break;
            }

            self.check_extensions(&mut report, &current, hop_context, hop.saturating_sub(1));
            if report.should_stop() {
                break;
            }

            // Anchors are exempt from revocation only.
            if self.trust_store.is_trust_anchor(&current) {
                report.add_report_item(CertificateReportItem::new(
                    &current,
                    ReportItem::info(TRUST_ANCHOR_CHECK, "certificate is a trust anchor"),
                ));
                break;
            }

            let Some(issuer) = self.find_issuer(&current, &supplied, &embedded) else {
                report.add_report_item(CertificateReportItem::new(
                    &current,
                    ReportItem::indeterminate(
                        CHAIN_CHECK,
                        format!("chain incomplete: issuer {} was not found", current.issuer),
                    ),
                ));
                break;
            };

            if self.settings.verify.check_revocation {
                self.revocation.validate(
                    &mut report,
                    &current,
                    &issuer,
                    hop_context,
                    known,
                    validation_time,
                );
                if report.should_stop() {
                    break;
                }
            }

            self.check_signature(&mut report, &current, &issuer);
            if report.should_stop() {
                break;
            }

            debug!("advancing from {current} to issuer {issuer}");

            current = issuer;
            hop_context = hop_context.with_source(CertificateSource::CertIssuer);
            hop += 1;
        }

        report
    }

    fn new_report(&self) -> ValidationReport {
        ValidationReport::with_error_behavior(if self.settings.verify.stop_on_first_invalid {
            ErrorBehavior::StopOnFirstInvalid
        } else {
            ErrorBehavior::ContinueWhenPossible
        })
    }

    fn check_validity(
        &self,
        report: &mut ValidationReport,
        cert: &Arc<Certificate>,
        validation_time: DateTime<Utc>,
    ) {
        let message = if validation_time < cert.not_before {
            format!(
                "certificate is not valid until {}, after the validation time {validation_time}",
                cert.not_before
            )
        } else if validation_time > cert.not_after {
            format!(
                "certificate expired at {}, before the validation time {validation_time}",
                cert.not_after
            )
        } else {
            return;
        };

        report.add_report_item(CertificateReportItem::new(
            cert,
            ReportItem::invalid(VALIDITY_CHECK, message),
        ));
    }

    fn check_extensions(
        &self,
        report: &mut ValidationReport,
        cert: &Arc<Certificate>,
        context: ValidationContext,
        chain_depth_remaining: usize,
    ) {
        let required = RequiredExtensions::for_source(
            context.source(),
            &self.settings.verify.required_signer_ekus,
        );

        for required in required.iter() {
            if required
                .check
                .exists_in_certificate(cert, chain_depth_remaining)
            {
                continue;
            }

            let item = match required.requirement {
                Requirement::Mandatory => {
                    ReportItem::invalid(required.check.name(), required.check.expectation())
                }
                Requirement::Advisory => {
                    ReportItem::indeterminate(required.check.name(), required.check.expectation())
                }
            };

            report.add_report_item(CertificateReportItem::new(cert, item));
            if report.should_stop() {
                return;
            }
        }
    }

    fn check_signature(
        &self,
        report: &mut ValidationReport,
        cert: &Arc<Certificate>,
        issuer: &Certificate,
    ) {
        let Some(alg) = cert.signature_algorithm else {
            report.add_report_item(CertificateReportItem::new(
                cert,
                ReportItem::indeterminate(
                    SIGNATURE_CHECK,
                    format!(
                        "unsupported signature algorithm {}",
                        cert.signature_algorithm_oid
                    ),
                ),
            ));
            return;
        };

        let Err(err) =
            self.backend
                .verify_signature(alg, &cert.tbs_der, &cert.signature, &issuer.spki_der)
        else {
            return;
        };

        let item = match err {
            RawSignatureValidationError::UnsupportedAlgorithm
            | RawSignatureValidationError::NotApproved(_) => ReportItem::indeterminate(
                SIGNATURE_CHECK,
                format!("signature could not be checked with the key of {issuer}"),
            ),
            _ => ReportItem::invalid(
                SIGNATURE_CHECK,
                format!("signature does not verify with the key of {issuer}"),
            ),
        };

        report.add_report_item(CertificateReportItem::new(cert, item.with_cause(&err)));
    }

    // Candidates come from the supplied chain, then from OCSP responses, then
    // from the trust store. Among them the first whose key verifies the
    // certificate's signature wins; failing that, the first candidate.
    fn find_issuer(
        &self,
        cert: &Certificate,
        supplied: &[Arc<Certificate>],
        embedded: &[Arc<Certificate>],
    ) -> Option<Arc<Certificate>> {
        let names_issuer = |candidate: &&Arc<Certificate>| {
            candidate.subject == cert.issuer
                && match (&cert.authority_key_id, &candidate.subject_key_id) {
                    (Some(aki), Some(ski)) => aki == ski,
                    _ => true,
                }
        };

        let mut candidates: Vec<Arc<Certificate>> = supplied
            .iter()
            .chain(embedded.iter())
            .filter(names_issuer)
            .cloned()
            .collect();

        candidates.extend(self.trust_store.find_by_subject(&cert.issuer));
        if let Some(aki) = &cert.authority_key_id {
            candidates.extend(self.trust_store.find_by_key_id(aki));
        }

        let verifies = |candidate: &Arc<Certificate>| {
            cert.signature_algorithm.is_some_and(|alg| {
                self.backend
                    .verify_signature(alg, &cert.tbs_der, &cert.signature, &candidate.spki_der)
                    .is_ok()
            })
        };

        candidates
            .iter()
            .find(|candidate| verifies(candidate))
            .or_else(|| candidates.first())
            .cloned()
    }
}
