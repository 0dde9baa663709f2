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

use std::{fmt, sync::Arc};

use certchain_crypto::{Certificate, Crl, CryptoBackend};
use chrono::{DateTime, Utc};
use log::debug;
use url::Url;

use super::{
    check_freshness, check_response_size, failure_item, is_effective_revocation,
    revocation_message, verify_artifact_signature, Failure, RevocationData, RevocationOptions,
    RevocationStatus, CRL_CHECK,
};
use crate::{
    context::{CertificateSource, ValidationContext, ValidatorContext},
    extensions::RequiredExtensions,
    fetch::ResourceFetcher,
    report::{CertificateReportItem, ReportItem, ValidationReport},
};

/// Checks a certificate's status against certificate revocation lists.
///
/// Only CRLs issued directly by the certificate's issuer are considered.
pub struct CrlValidator {
    backend: Arc<dyn CryptoBackend>,
    fetcher: Arc<dyn ResourceFetcher>,
    options: RevocationOptions,
}

impl fmt::Debug for CrlValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrlValidator")
            .field("backend", &self.backend.name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl CrlValidator {
    /// Create a CRL validator.
    pub fn new(
        backend: Arc<dyn CryptoBackend>,
        fetcher: Arc<dyn ResourceFetcher>,
        options: RevocationOptions,
    ) -> Self {
        Self {
            backend,
            fetcher,
            options,
        }
    }

    /// Check `cert` and record the findings in `report`.
    ///
    /// Returns `None` if no supplied CRL comes from the certificate's issuer
    /// and the certificate names no distribution point. A supplied CRL that
    /// cannot be decoded counts as a failed attempt.
    pub fn validate(
        &self,
        report: &mut ValidationReport,
        cert: &Arc<Certificate>,
        issuer: &Arc<Certificate>,
        context: ValidationContext,
        known: &RevocationData,
        validation_time: DateTime<Utc>,
    ) -> Option<RevocationStatus> {
        let context = context.with_validator(ValidatorContext::CrlValidator);

        let mut attempted = false;
        let mut failures = Vec::new();

        for der in &known.crls {
            let crl = match self.backend.parse_crl(der) {
                Ok(crl) => crl,
                Err(e) => {
                    attempted = true;
                    failures.push(Failure::with_cause("unreadable supplied CRL", &e));
                    continue;
                }
            };

            if crl.issuer != cert.issuer {
                continue;
            }

            attempted = true;
            match self.evaluate(report, &crl, cert, issuer, context, validation_time) {
                Ok(status) => return Some(status),
                Err(failure) => failures.push(failure),
            }
        }

        for locator in &cert.crl_distribution_points {
            attempted = true;

            let crl = match self.fetch_crl(locator) {
                Ok(crl) => crl,
                Err(failure) => {
                    failures.push(failure);
                    continue;
                }
            };

            match self.evaluate(report, &crl, cert, issuer, context, validation_time) {
                Ok(status) => return Some(status),
                Err(failure) => failures.push(failure),
            }
        }

        if !attempted {
            return None;
        }

        report.add_report_item(CertificateReportItem::new(
            cert,
            failure_item(CRL_CHECK, &failures),
        ));

        Some(RevocationStatus::Indeterminate)
    }

    fn fetch_crl(&self, locator: &str) -> Result<Crl, Failure> {
        let url = Url::parse(locator).map_err(|e| {
            Failure::with_cause(format!("invalid CRL distribution point {locator}"), &e)
        })?;

        debug!("fetching CRL from {locator}");

        let bytes = self
            .fetcher
            .fetch(&url, self.options.fetch_timeout)
            .and_then(|bytes| {
                check_response_size(&url, &bytes, self.options.max_response_size)?;
                Ok(bytes)
            })
            .map_err(|e| Failure::with_cause(format!("unable to fetch CRL from {locator}"), &e))?;

        self.backend
            .parse_crl(&bytes)
            .map_err(|e| Failure::with_cause(format!("invalid CRL from {locator}"), &e))
    }

    fn evaluate(
        &self,
        report: &mut ValidationReport,
        crl: &Crl,
        cert: &Arc<Certificate>,
        issuer: &Arc<Certificate>,
        context: ValidationContext,
        validation_time: DateTime<Utc>,
    ) -> Result<RevocationStatus, Failure> {
        if crl.issuer != cert.issuer {
            return Err(Failure::new(format!(
                "CRL issued by {} does not cover certificates issued by {}",
                crl.issuer, cert.issuer
            )));
        }

        if let (Some(aki), Some(ski)) = (&crl.authority_key_id, &issuer.subject_key_id) {
            if aki != ski {
                return Err(Failure::new(format!(
                    "CRL was signed by a different key than the one certified for {issuer}"
                )));
            }
        }

        let context = context.with_source(CertificateSource::CrlIssuer);
        for required in RequiredExtensions::for_source(context.source(), &[]).iter() {
            if !required.check.exists_in_certificate(issuer, 0) {
                return Err(Failure::new(format!(
                    "CRL issuer {issuer}: {}",
                    required.check.expectation()
                )));
            }
        }

        verify_artifact_signature(
            self.backend.as_ref(),
            "CRL",
            crl.signature_algorithm,
            &crl.signature_algorithm_oid,
            &crl.tbs_der,
            &crl.signature,
            issuer,
        )?;

        if let Some(entry) = crl.find_revoked(&cert.serial) {
            if is_effective_revocation(entry.revocation_date, entry.reason, validation_time) {
                report.add_report_item(CertificateReportItem::new(
                    cert,
                    ReportItem::invalid(
                        CRL_CHECK,
                        revocation_message("CRL", entry.revocation_date, entry.reason),
                    ),
                ));
                return Ok(RevocationStatus::Revoked);
            }
        }

        check_freshness(
            "CRL",
            crl.this_update,
            crl.next_update,
            validation_time,
            self.options.clock_skew,
        )?;

        report.add_report_item(CertificateReportItem::new(
            cert,
            ReportItem::info(
                CRL_CHECK,
                format!(
                    "certificate is not revoked (CRL issued at {})",
                    crl.this_update
                ),
            ),
        ));

        Ok(RevocationStatus::Good)
    }
}
