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

use certchain_crypto::{
    BasicOcspResponse, CertStatus, Certificate, CryptoBackend, DigestAlgorithm, ResponderId,
    SingleResponse,
};
use chrono::{DateTime, Utc};
use log::debug;
use url::Url;

use super::{
    check_freshness, check_response_size, failure_item, is_effective_revocation,
    revocation_message, verify_artifact_signature, Failure, RevocationData, RevocationOptions,
    RevocationStatus, OCSP_CHECK,
};
use crate::{
    context::{CertificateSource, ValidationContext, ValidatorContext},
    extensions::{Requirement, RequiredExtensions},
    fetch::{ocsp_get_url, ResourceFetcher},
    report::{CertificateReportItem, ReportItem, ValidationReport},
};

/// Checks a certificate's status with OCSP.
///
/// Responses supplied by the caller are tried first, then each responder
/// listed in the certificate's authority information access extension.
pub struct OcspValidator {
    backend: Arc<dyn CryptoBackend>,
    fetcher: Arc<dyn ResourceFetcher>,
    options: RevocationOptions,
}

impl fmt::Debug for OcspValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcspValidator")
            .field("backend", &self.backend.name())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl OcspValidator {
    /// Create an OCSP validator.
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
    /// Returns `None` if there was nothing to try: no supplied response
    /// covers the certificate and it names no responder. In that case the
    /// report is left untouched. A supplied response that cannot be decoded
    /// counts as a failed attempt.
    ///
    /// When every attempt fails the report gets exactly one
    /// `INDETERMINATE` item describing all of them.
    pub fn validate(
        &self,
        report: &mut ValidationReport,
        cert: &Arc<Certificate>,
        issuer: &Arc<Certificate>,
        context: ValidationContext,
        known: &RevocationData,
        validation_time: DateTime<Utc>,
    ) -> Option<RevocationStatus> {
        let context = context.with_validator(ValidatorContext::OcspValidator);

        let mut attempted = false;
        let mut failures = Vec::new();

        for der in &known.ocsp_responses {
            let response = match self.backend.parse_ocsp_response(der) {
                Ok(response) => response,
                Err(e) => {
                    attempted = true;
                    failures.push(Failure::with_cause("unreadable supplied OCSP response", &e));
                    continue;
                }
            };

            let Some(single) = self.find_single_response(&response, cert, issuer) else {
                continue;
            };

            attempted = true;
            match self.evaluate(report, &response, single, cert, issuer, context, validation_time) {
                Ok(status) => return Some(status),
                Err(failure) => failures.push(failure),
            }
        }

        for locator in &cert.ocsp_urls {
            attempted = true;

            let response = match self.fetch_response(cert, issuer, locator) {
                Ok(response) => response,
                Err(failure) => {
                    failures.push(failure);
                    continue;
                }
            };

            let Some(single) = self.find_single_response(&response, cert, issuer) else {
                failures.push(Failure::new(format!(
                    "OCSP response from {locator} does not cover the certificate"
                )));
                continue;
            };

            match self.evaluate(report, &response, single, cert, issuer, context, validation_time) {
                Ok(status) => return Some(status),
                Err(failure) => failures.push(failure),
            }
        }

        if !attempted {
            return None;
        }

        report.add_report_item(CertificateReportItem::new(
            cert,
            failure_item(OCSP_CHECK, &failures),
        ));

        Some(RevocationStatus::Indeterminate)
    }

    fn fetch_response(
        &self,
        cert: &Certificate,
        issuer: &Certificate,
        locator: &str,
    ) -> Result<BasicOcspResponse, Failure> {
        let responder = Url::parse(locator).map_err(|e| {
            Failure::with_cause(format!("invalid OCSP responder URL {locator}"), &e)
        })?;

        let request = self
            .backend
            .create_ocsp_request(cert, issuer)
            .map_err(|e| Failure::with_cause("unable to build OCSP request", &e))?;

        let url = ocsp_get_url(&responder, &request).map_err(|e| {
            Failure::with_cause(format!("invalid OCSP responder URL {locator}"), &e)
        })?;

        debug!("fetching OCSP response for {cert} from {locator}");

        let bytes = self
            .fetcher
            .fetch(&url, self.options.fetch_timeout)
            .and_then(|bytes| {
                check_response_size(&url, &bytes, self.options.max_response_size)?;
                Ok(bytes)
            })
            .map_err(|e| {
                Failure::with_cause(format!("unable to fetch OCSP response from {locator}"), &e)
            })?;

        self.backend.parse_ocsp_response(&bytes).map_err(|e| {
            Failure::with_cause(format!("invalid OCSP response from {locator}"), &e)
        })
    }

    // The single response whose CertID names `cert` as issued by `issuer`.
    fn find_single_response<'a>(
        &self,
        response: &'a BasicOcspResponse,
        cert: &Certificate,
        issuer: &Certificate,
    ) -> Option<&'a SingleResponse> {
        response.responses.iter().find(|single| {
            let cert_id = &single.cert_id;
            if cert_id.serial != cert.serial {
                return false;
            }

            let Some(alg) = DigestAlgorithm::from_oid(&cert_id.hash_algorithm) else {
                return false;
            };

            let name_hash = self.backend.digest(alg, &issuer.subject.der);
            let key_hash = self.backend.digest(alg, &issuer.public_key);

            matches!((name_hash, key_hash), (Ok(name_hash), Ok(key_hash))
                if name_hash == cert_id.issuer_name_hash && key_hash == cert_id.issuer_key_hash)
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn evaluate(
        &self,
        report: &mut ValidationReport,
        response: &BasicOcspResponse,
        single: &SingleResponse,
        cert: &Arc<Certificate>,
        issuer: &Arc<Certificate>,
        context: ValidationContext,
        validation_time: DateTime<Utc>,
    ) -> Result<RevocationStatus, Failure> {
        let responder = self.find_responder(report, response, issuer, context, validation_time)?;

        verify_artifact_signature(
            self.backend.as_ref(),
            "OCSP response",
            response.signature_algorithm,
            &response.signature_algorithm_oid,
            &response.tbs_der,
            &response.signature,
            &responder,
        )?;

        match &single.status {
            CertStatus::Revoked { time, reason }
                if is_effective_revocation(*time, *reason, validation_time) =>
            {
                report.add_report_item(CertificateReportItem::new(
                    cert,
                    ReportItem::invalid(
                        OCSP_CHECK,
                        revocation_message("OCSP response", *time, *reason),
                    ),
                ));
                Ok(RevocationStatus::Revoked)
            }

            CertStatus::Unknown => Err(Failure::new(
                "certificate status is unknown to the OCSP responder",
            )),

            status => {
                check_freshness(
                    "OCSP response",
                    single.this_update,
                    single.next_update,
                    validation_time,
                    self.options.clock_skew,
                )?;

                let message = match status {
                    CertStatus::Revoked { time, .. } => format!(
                        "certificate is not revoked at the validation time (revocation at {time} does not apply)"
                    ),
                    _ => format!(
                        "certificate is not revoked (OCSP response produced at {})",
                        response.produced_at
                    ),
                };

                report.add_report_item(CertificateReportItem::new(
                    cert,
                    ReportItem::info(OCSP_CHECK, message),
                ));
                Ok(RevocationStatus::Good)
            }
        }
    }

    // The certificate whose key signed `response`: either the issuer itself
    // or a responder the issuer delegated OCSP signing to.
    fn find_responder(
        &self,
        report: &mut ValidationReport,
        response: &BasicOcspResponse,
        issuer: &Arc<Certificate>,
        context: ValidationContext,
        validation_time: DateTime<Utc>,
    ) -> Result<Arc<Certificate>, Failure> {
        if self.responder_matches(&response.responder_id, issuer) {
            return Ok(issuer.clone());
        }

        let Some(delegate) = response
            .certs
            .iter()
            .find(|cert| self.responder_matches(&response.responder_id, cert))
        else {
            return Err(Failure::new(
                "OCSP response is not signed by the issuer and carries no responder certificate",
            ));
        };

        let delegate = Arc::new(delegate.clone());

        if delegate.issuer != issuer.subject {
            return Err(Failure::new(format!(
                "OCSP responder {delegate} was not issued by {issuer}"
            )));
        }

        verify_artifact_signature(
            self.backend.as_ref(),
            "OCSP responder certificate",
            delegate.signature_algorithm,
            &delegate.signature_algorithm_oid,
            &delegate.tbs_der,
            &delegate.signature,
            issuer,
        )?;

        if !delegate.is_valid_at(validation_time) {
            return Err(Failure::new(format!(
                "OCSP responder {delegate} is not valid at {validation_time}"
            )));
        }

        let context = context.with_source(CertificateSource::OcspIssuer);
        for required in RequiredExtensions::for_source(context.source(), &[]).iter() {
            if required.check.exists_in_certificate(&delegate, 0) {
                continue;
            }

            match required.requirement {
                Requirement::Mandatory => {
                    return Err(Failure::new(format!(
                        "OCSP responder {delegate}: {}",
                        required.check.expectation()
                    )));
                }
                Requirement::Advisory => {
                    report.add_report_item(CertificateReportItem::new(
                        &delegate,
                        ReportItem::indeterminate(
                            required.check.name(),
                            required.check.expectation(),
                        ),
                    ));
                }
            }
        }

        Ok(delegate)
    }

    fn responder_matches(&self, responder_id: &ResponderId, cert: &Certificate) -> bool {
        match responder_id {
            ResponderId::ByName(name) => name == &cert.subject,
            ResponderId::ByKey(key_hash) => self
                .backend
                .digest(DigestAlgorithm::Sha1, &cert.public_key)
                .is_ok_and(|hash| &hash == key_hash),
        }
    }
}
