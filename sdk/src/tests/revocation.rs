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

use std::sync::Arc;

use certchain_crypto::{oids, CertStatus, Certificate, RevocationReason, RevokedEntry};

use crate::{
    context::ValidationContext,
    fetch::{CachedFetcher, NoFetch, ResourceFetcher},
    report::{ReportItemStatus, ValidationReport},
    revocation::{
        CrlValidator, OcspValidator, RevocationData, RevocationOptions, RevocationStatus,
        RevocationValidator, CRL_CHECK, OCSP_CHECK, REVOCATION_CHECK,
    },
    tests::fixtures::{
        at, crl, model_cert, ocsp_response, settings, sign_model, sign_ocsp_response,
        validation_time, MockBackend, ModelPki, LEAF_CRL_URL,
    },
};

fn options() -> RevocationOptions {
    RevocationOptions::from_settings(&settings(|_| {}))
}

fn ocsp_validator(backend: MockBackend) -> OcspValidator {
    OcspValidator::new(backend.into_arc(), Arc::new(NoFetch), options())
}

fn crl_validator(backend: MockBackend, fetcher: Arc<dyn ResourceFetcher>) -> CrlValidator {
    CrlValidator::new(backend.into_arc(), fetcher, options())
}

fn check_ocsp(
    backend: MockBackend,
    cert: &Certificate,
    issuer: &Certificate,
    known: &RevocationData,
) -> (Option<RevocationStatus>, ValidationReport) {
    let mut report = ValidationReport::default();
    let status = ocsp_validator(backend).validate(
        &mut report,
        &Arc::new(cert.clone()),
        &Arc::new(issuer.clone()),
        ValidationContext::default(),
        known,
        validation_time(),
    );
    (status, report)
}

fn responder(pki: &ModelPki, ekus: &[&str], no_check: bool) -> Certificate {
    let mut responder = model_cert("Model OCSP Responder", 9, Some(&pki.intermediate));
    responder.extended_key_usage = Some(ekus.iter().map(|eku| eku.to_string()).collect());
    responder.ocsp_no_check = no_check;
    sign_model(&mut responder, &pki.intermediate.spki_der);
    responder
}

fn delegated_response(pki: &ModelPki, responder: &Certificate) -> certchain_crypto::BasicOcspResponse {
    let mut response = ocsp_response(
        &pki.leaf,
        &pki.intermediate,
        CertStatus::Good,
        at(2025, 5, 30),
        Some(at(2025, 6, 6)),
    );
    response.responder_id = certchain_crypto::ResponderId::ByName(responder.subject.clone());
    response.certs = vec![responder.clone()];
    sign_ocsp_response(&mut response, &responder.spki_der);
    response
}

#[test]
fn ocsp_signed_by_issuer() {
    let pki = ModelPki::new();
    let response = ocsp_response(
        &pki.leaf,
        &pki.intermediate,
        CertStatus::Good,
        at(2025, 5, 30),
        Some(at(2025, 6, 6)),
    );

    let known = RevocationData::default().with_ocsp_response(response.der.clone());
    let (status, report) = check_ocsp(
        pki.backend().with_ocsp_response(&response),
        &pki.leaf,
        &pki.intermediate,
        &known,
    );

    assert_eq!(status, Some(RevocationStatus::Good));
    assert_eq!(report.len(), 1);
    assert_eq!(report.items()[0].status(), ReportItemStatus::Info);
    assert_eq!(report.items()[0].item().check_name, OCSP_CHECK);
}

#[test]
fn ocsp_responder_by_key_hash() {
    let pki = ModelPki::new();
    let mut response = ocsp_response(
        &pki.leaf,
        &pki.intermediate,
        CertStatus::Good,
        at(2025, 5, 30),
        None,
    );
    response.responder_id = certchain_crypto::ResponderId::ByKey(
        certchain_crypto::hash::sha1(&pki.intermediate.public_key),
    );
    sign_ocsp_response(&mut response, &pki.intermediate.spki_der);

    let known = RevocationData::default().with_ocsp_response(response.der.clone());
    let (status, report) = check_ocsp(
        pki.backend().with_ocsp_response(&response),
        &pki.leaf,
        &pki.intermediate,
        &known,
    );

    assert_eq!(status, Some(RevocationStatus::Good));
    assert!(report.get_failures().is_empty());
}

#[test]
fn delegated_responder() {
    let pki = ModelPki::new();
    let responder = responder(&pki, &[oids::OCSP_SIGNING, oids::CODE_SIGNING], true);
    let response = delegated_response(&pki, &responder);

    let known = RevocationData::default().with_ocsp_response(response.der.clone());
    let (status, report) = check_ocsp(
        pki.backend().with_ocsp_response(&response),
        &pki.leaf,
        &pki.intermediate,
        &known,
    );

    assert_eq!(status, Some(RevocationStatus::Good));
    assert_eq!(report.len(), 1);
    assert!(report.get_failures().is_empty());
}

#[test]
fn delegated_responder_without_no_check() {
    let pki = ModelPki::new();
    let responder = responder(&pki, &[oids::OCSP_SIGNING], false);
    let response = delegated_response(&pki, &responder);

    let known = RevocationData::default().with_ocsp_response(response.der.clone());
    let (status, report) = check_ocsp(
        pki.backend().with_ocsp_response(&response),
        &pki.leaf,
        &pki.intermediate,
        &known,
    );

    assert_eq!(status, Some(RevocationStatus::Good));

    let failures = report.get_certificate_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].item().status(), ReportItemStatus::Indeterminate);
    assert_eq!(failures[0].item().check_name, "OCSP no check");
    assert_eq!(failures[0].certificate(), &responder);
}

#[test]
fn delegated_responder_without_ocsp_signing() {
    let pki = ModelPki::new();
    let responder = responder(&pki, &[oids::CODE_SIGNING], true);
    let response = delegated_response(&pki, &responder);

    let known = RevocationData::default().with_ocsp_response(response.der.clone());
    let (status, report) = check_ocsp(
        pki.backend().with_ocsp_response(&response),
        &pki.leaf,
        &pki.intermediate,
        &known,
    );

    assert_eq!(status, Some(RevocationStatus::Indeterminate));
    assert_eq!(report.len(), 1);
    assert!(report.items()[0]
        .item()
        .message
        .contains("Model OCSP Responder"));
}

#[test]
fn delegated_responder_from_another_ca() {
    let pki = ModelPki::new();

    let mut responder = model_cert("Model OCSP Responder", 9, Some(&pki.root));
    responder.extended_key_usage = Some(vec![oids::OCSP_SIGNING.to_string()]);
    responder.ocsp_no_check = true;
    sign_model(&mut responder, &pki.root.spki_der);

    let response = delegated_response(&pki, &responder);

    let known = RevocationData::default().with_ocsp_response(response.der.clone());
    let (status, report) = check_ocsp(
        pki.backend().with_ocsp_response(&response),
        &pki.leaf,
        &pki.intermediate,
        &known,
    );

    assert_eq!(status, Some(RevocationStatus::Indeterminate));
    assert!(report.items()[0].item().message.contains("was not issued by"));
}

#[test]
fn ocsp_forged_signature() {
    let pki = ModelPki::new();
    let mut response = ocsp_response(
        &pki.leaf,
        &pki.intermediate,
        CertStatus::Good,
        at(2025, 5, 30),
        Some(at(2025, 6, 6)),
    );
    sign_ocsp_response(&mut response, &pki.root.spki_der);

    let known = RevocationData::default().with_ocsp_response(response.der.clone());
    let (status, report) = check_ocsp(
        pki.backend().with_ocsp_response(&response),
        &pki.leaf,
        &pki.intermediate,
        &known,
    );

    assert_eq!(status, Some(RevocationStatus::Indeterminate));
    assert!(report.items()[0]
        .item()
        .message
        .contains("signature does not verify"));
}

#[test]
fn ocsp_stale_response() {
    let pki = ModelPki::new();
    let response = ocsp_response(
        &pki.leaf,
        &pki.intermediate,
        CertStatus::Good,
        at(2025, 1, 1),
        Some(at(2025, 1, 8)),
    );

    let known = RevocationData::default().with_ocsp_response(response.der.clone());
    let (status, report) = check_ocsp(
        pki.backend().with_ocsp_response(&response),
        &pki.leaf,
        &pki.intermediate,
        &known,
    );

    assert_eq!(status, Some(RevocationStatus::Indeterminate));
    assert!(report.items()[0].item().message.contains("expired at"));
}

#[test]
fn ocsp_clock_skew_widens_window() {
    let pki = ModelPki::new();
    let response = ocsp_response(
        &pki.leaf,
        &pki.intermediate,
        CertStatus::Good,
        at(2025, 5, 1),
        Some(at(2025, 5, 31)),
    );

    let backend = pki.backend().with_ocsp_response(&response);
    let known = RevocationData::default().with_ocsp_response(response.der.clone());

    let options = RevocationOptions::from_settings(&settings(|s| s.verify.clock_skew_secs = 86_400));
    let validator = OcspValidator::new(backend.into_arc(), Arc::new(NoFetch), options);

    let mut report = ValidationReport::default();
    let status = validator.validate(
        &mut report,
        &Arc::new(pki.leaf.clone()),
        &Arc::new(pki.intermediate.clone()),
        ValidationContext::default(),
        &known,
        validation_time(),
    );

    assert_eq!(status, Some(RevocationStatus::Good));
}

#[test]
fn ocsp_revoked_after_validation_time() {
    let pki = ModelPki::new();
    let response = ocsp_response(
        &pki.leaf,
        &pki.intermediate,
        CertStatus::Revoked {
            time: at(2025, 6, 3),
            reason: Some(RevocationReason::Superseded),
        },
        at(2025, 5, 30),
        Some(at(2025, 6, 6)),
    );

    let known = RevocationData::default().with_ocsp_response(response.der.clone());
    let (status, report) = check_ocsp(
        pki.backend().with_ocsp_response(&response),
        &pki.leaf,
        &pki.intermediate,
        &known,
    );

    assert_eq!(status, Some(RevocationStatus::Good));
    assert_eq!(report.items()[0].status(), ReportItemStatus::Info);
}

#[test]
fn ocsp_revoked_regardless_of_freshness() {
    let pki = ModelPki::new();
    let response = ocsp_response(
        &pki.leaf,
        &pki.intermediate,
        CertStatus::Revoked {
            time: at(2023, 1, 1),
            reason: None,
        },
        at(2024, 1, 1),
        Some(at(2024, 1, 8)),
    );

    let known = RevocationData::default().with_ocsp_response(response.der.clone());
    let (status, report) = check_ocsp(
        pki.backend().with_ocsp_response(&response),
        &pki.leaf,
        &pki.intermediate,
        &known,
    );

    assert_eq!(status, Some(RevocationStatus::Revoked));
    assert_eq!(report.items()[0].status(), ReportItemStatus::Invalid);
}

#[test]
fn ocsp_remove_from_crl() {
    let pki = ModelPki::new();
    let response = ocsp_response(
        &pki.leaf,
        &pki.intermediate,
        CertStatus::Revoked {
            time: at(2024, 1, 1),
            reason: Some(RevocationReason::RemoveFromCrl),
        },
        at(2025, 5, 30),
        Some(at(2025, 6, 6)),
    );

    let known = RevocationData::default().with_ocsp_response(response.der.clone());
    let (status, _) = check_ocsp(
        pki.backend().with_ocsp_response(&response),
        &pki.leaf,
        &pki.intermediate,
        &known,
    );

    assert_eq!(status, Some(RevocationStatus::Good));
}

#[test]
fn ocsp_unknown_status() {
    let pki = ModelPki::new();
    let response = ocsp_response(
        &pki.leaf,
        &pki.intermediate,
        CertStatus::Unknown,
        at(2025, 5, 30),
        Some(at(2025, 6, 6)),
    );

    let known = RevocationData::default().with_ocsp_response(response.der.clone());
    let (status, report) = check_ocsp(
        pki.backend().with_ocsp_response(&response),
        &pki.leaf,
        &pki.intermediate,
        &known,
    );

    assert_eq!(status, Some(RevocationStatus::Indeterminate));
    assert_eq!(report.len(), 1);
    assert!(report.items()[0].item().message.contains("unknown"));
}

#[test]
fn ocsp_response_for_another_certificate_is_ignored() {
    let pki = ModelPki::new();
    let response = ocsp_response(
        &pki.intermediate,
        &pki.root,
        CertStatus::Good,
        at(2025, 5, 30),
        Some(at(2025, 6, 6)),
    );

    let mut leaf = pki.leaf.clone();
    leaf.ocsp_urls.clear();

    let known = RevocationData::default().with_ocsp_response(response.der.clone());
    let (status, report) = check_ocsp(
        pki.backend().with_ocsp_response(&response),
        &leaf,
        &pki.intermediate,
        &known,
    );

    assert_eq!(status, None);
    assert!(report.is_empty());
}

#[test]
fn fetched_ocsp_response_for_another_certificate() {
    let pki = ModelPki::new();
    let response = ocsp_response(
        &pki.intermediate,
        &pki.root,
        CertStatus::Good,
        at(2025, 5, 30),
        Some(at(2025, 6, 6)),
    );

    let mut fetcher = crate::fetch::MockResourceFetcher::new();
    let der = response.der.clone();
    fetcher
        .expect_fetch()
        .times(1)
        .returning(move |_, _| Ok(der.clone()));

    let validator = OcspValidator::new(
        pki.backend().with_ocsp_response(&response).into_arc(),
        Arc::new(fetcher),
        options(),
    );

    let mut report = ValidationReport::default();
    let status = validator.validate(
        &mut report,
        &Arc::new(pki.leaf.clone()),
        &Arc::new(pki.intermediate.clone()),
        ValidationContext::default(),
        &RevocationData::default(),
        validation_time(),
    );

    assert_eq!(status, Some(RevocationStatus::Indeterminate));
    assert!(report.items()[0]
        .item()
        .message
        .contains("does not cover the certificate"));
}

#[test]
fn crl_not_revoked() {
    let pki = ModelPki::new();
    let list = crl(&pki.intermediate, vec![], at(2025, 5, 1), Some(at(2025, 7, 1)));

    let mut fetcher = CachedFetcher::new(1024 * 1024);
    fetcher.insert(&url::Url::parse(LEAF_CRL_URL).unwrap(), list.der.clone());

    let validator = crl_validator(pki.backend().with_crl(&list), Arc::new(fetcher));

    let mut report = ValidationReport::default();
    let status = validator.validate(
        &mut report,
        &Arc::new(pki.leaf.clone()),
        &Arc::new(pki.intermediate.clone()),
        ValidationContext::default(),
        &RevocationData::default(),
        validation_time(),
    );

    assert_eq!(status, Some(RevocationStatus::Good));
    assert_eq!(report.len(), 1);
    assert_eq!(report.items()[0].item().check_name, CRL_CHECK);
    assert_eq!(report.items()[0].status(), ReportItemStatus::Info);
}

#[test]
fn crl_revoked() {
    let pki = ModelPki::new();
    let list = crl(
        &pki.intermediate,
        vec![RevokedEntry {
            serial: pki.leaf.serial.clone(),
            revocation_date: at(2024, 2, 1),
            reason: Some(RevocationReason::KeyCompromise),
        }],
        at(2025, 5, 1),
        Some(at(2025, 7, 1)),
    );

    let known = RevocationData::default().with_crl(list.der.clone());
    let validator = crl_validator(pki.backend().with_crl(&list), Arc::new(NoFetch));

    let mut report = ValidationReport::default();
    let status = validator.validate(
        &mut report,
        &Arc::new(pki.leaf.clone()),
        &Arc::new(pki.intermediate.clone()),
        ValidationContext::default(),
        &known,
        validation_time(),
    );

    assert_eq!(status, Some(RevocationStatus::Revoked));
    assert_eq!(report.get_certificate_failures().len(), 1);
    assert_eq!(report.items()[0].status(), ReportItemStatus::Invalid);
}

#[test]
fn crl_signed_by_another_key() {
    let pki = ModelPki::new();
    let mut list = crl(&pki.intermediate, vec![], at(2025, 5, 1), Some(at(2025, 7, 1)));
    list.authority_key_id = pki.root.subject_key_id.clone();

    let known = RevocationData::default().with_crl(list.der.clone());
    let validator = crl_validator(pki.backend().with_crl(&list), Arc::new(NoFetch));

    let mut report = ValidationReport::default();
    let status = validator.validate(
        &mut report,
        &Arc::new(pki.leaf.clone()),
        &Arc::new(pki.intermediate.clone()),
        ValidationContext::default(),
        &known,
        validation_time(),
    );

    // The supplied CRL fails and the distribution point is unreachable.
    assert_eq!(status, Some(RevocationStatus::Indeterminate));
    assert_eq!(report.len(), 1);

    let message = &report.items()[0].item().message;
    assert!(message.contains("different key"));
    assert!(message.contains("unable to fetch CRL"));
}

#[test]
fn crl_issuer_without_crl_sign() {
    let mut pki = ModelPki::new();
    if let Some(key_usage) = pki.intermediate.key_usage.as_mut() {
        key_usage.crl_sign = false;
    }

    let list = crl(&pki.intermediate, vec![], at(2025, 5, 1), Some(at(2025, 7, 1)));
    let known = RevocationData::default().with_crl(list.der.clone());

    let mut leaf = pki.leaf.clone();
    leaf.crl_distribution_points.clear();

    let validator = crl_validator(pki.backend().with_crl(&list), Arc::new(NoFetch));

    let mut report = ValidationReport::default();
    let status = validator.validate(
        &mut report,
        &Arc::new(leaf),
        &Arc::new(pki.intermediate.clone()),
        ValidationContext::default(),
        &known,
        validation_time(),
    );

    assert_eq!(status, Some(RevocationStatus::Indeterminate));
    assert!(report.items()[0].item().message.contains("cRLSign"));
}

#[test]
fn ocsp_failure_falls_back_to_crl() {
    let pki = ModelPki::new();
    let list = crl(&pki.intermediate, vec![], at(2025, 5, 1), Some(at(2025, 7, 1)));

    let mut fetcher = CachedFetcher::new(1024 * 1024);
    fetcher.insert(&url::Url::parse(LEAF_CRL_URL).unwrap(), list.der.clone());

    let validator = RevocationValidator::new(
        pki.backend().with_crl(&list).into_arc(),
        Arc::new(fetcher),
        &settings(|_| {}),
    );

    let mut report = ValidationReport::default();
    let status = validator.validate(
        &mut report,
        &Arc::new(pki.leaf.clone()),
        &Arc::new(pki.intermediate.clone()),
        ValidationContext::default(),
        &RevocationData::default(),
        validation_time(),
    );

    assert_eq!(status, RevocationStatus::Good);

    // Both attempts stay visible.
    let items: Vec<_> = report
        .items()
        .iter()
        .map(|entry| (entry.item().check_name.to_string(), entry.status()))
        .collect();
    assert_eq!(
        items,
        vec![
            (OCSP_CHECK.to_string(), ReportItemStatus::Indeterminate),
            (CRL_CHECK.to_string(), ReportItemStatus::Info),
        ]
    );
}

#[test]
fn no_revocation_sources() {
    let pki = ModelPki::new();

    let mut leaf = pki.leaf.clone();
    leaf.ocsp_urls.clear();
    leaf.crl_distribution_points.clear();

    let validator = RevocationValidator::new(
        pki.backend().into_arc(),
        Arc::new(NoFetch),
        &settings(|_| {}),
    );

    let mut report = ValidationReport::default();
    let status = validator.validate(
        &mut report,
        &Arc::new(leaf),
        &Arc::new(pki.intermediate.clone()),
        ValidationContext::default(),
        &RevocationData::default(),
        validation_time(),
    );

    assert_eq!(status, RevocationStatus::Indeterminate);
    assert_eq!(report.len(), 1);
    assert_eq!(report.items()[0].item().check_name, REVOCATION_CHECK);
    assert_eq!(report.items()[0].status(), ReportItemStatus::Indeterminate);
}

#[test]
fn ocsp_no_check_certificate_is_not_checked() {
    let pki = ModelPki::new();

    let mut leaf = pki.leaf.clone();
    leaf.ocsp_no_check = true;

    // No expectations: any fetch panics.
    let fetcher = crate::fetch::MockResourceFetcher::new();

    let validator = RevocationValidator::new(
        pki.backend().into_arc(),
        Arc::new(fetcher),
        &settings(|_| {}),
    );

    let mut report = ValidationReport::default();
    let status = validator.validate(
        &mut report,
        &Arc::new(leaf),
        &Arc::new(pki.intermediate.clone()),
        ValidationContext::default(),
        &RevocationData::default(),
        validation_time(),
    );

    assert_eq!(status, RevocationStatus::Good);
    assert_eq!(report.len(), 1);
    assert_eq!(report.items()[0].status(), ReportItemStatus::Info);
}

fn oversized_fetcher(times: usize) -> crate::fetch::MockResourceFetcher {
    let mut fetcher = crate::fetch::MockResourceFetcher::new();
    fetcher
        .expect_fetch()
        .times(times)
        .returning(|_, _| Ok(vec![0u8; 64]));
    fetcher
}

#[test]
fn oversized_ocsp_response_is_refused() {
    let pki = ModelPki::new();

    let validator = OcspValidator::new(
        pki.backend().into_arc(),
        Arc::new(oversized_fetcher(1)),
        RevocationOptions::from_settings(&settings(|s| s.fetch.max_response_size = 16)),
    );

    let mut report = ValidationReport::default();
    let status = validator.validate(
        &mut report,
        &Arc::new(pki.leaf.clone()),
        &Arc::new(pki.intermediate.clone()),
        ValidationContext::default(),
        &RevocationData::default(),
        validation_time(),
    );

    assert_eq!(status, Some(RevocationStatus::Indeterminate));
    assert_eq!(report.len(), 1);

    let item = report.items()[0].item();
    assert!(item.message.starts_with("unable to fetch OCSP response"));
    assert!(item
        .cause
        .as_deref()
        .is_some_and(|cause| cause.contains("over the 16 byte limit")));
}

#[test]
fn oversized_crl_is_refused() {
    let pki = ModelPki::new();

    let validator = CrlValidator::new(
        pki.backend().into_arc(),
        Arc::new(oversized_fetcher(1)),
        RevocationOptions::from_settings(&settings(|s| s.fetch.max_response_size = 16)),
    );

    let mut report = ValidationReport::default();
    let status = validator.validate(
        &mut report,
        &Arc::new(pki.leaf.clone()),
        &Arc::new(pki.intermediate.clone()),
        ValidationContext::default(),
        &RevocationData::default(),
        validation_time(),
    );

    assert_eq!(status, Some(RevocationStatus::Indeterminate));
    assert_eq!(report.len(), 1);

    let item = report.items()[0].item();
    assert!(item.message.starts_with("unable to fetch CRL"));
    assert!(item
        .cause
        .as_deref()
        .is_some_and(|cause| cause.contains("64 bytes")));
}

#[test]
fn unreadable_supplied_artifacts_are_reported() {
    let pki = ModelPki::new();

    let mut leaf = pki.leaf.clone();
    leaf.ocsp_urls.clear();
    leaf.crl_distribution_points.clear();

    let known = RevocationData::default()
        .with_ocsp_response(b"not an OCSP response".to_vec())
        .with_crl(b"not a CRL".to_vec());

    let validator = RevocationValidator::new(
        pki.backend().into_arc(),
        Arc::new(NoFetch),
        &settings(|_| {}),
    );

    let mut report = ValidationReport::default();
    let status = validator.validate(
        &mut report,
        &Arc::new(leaf),
        &Arc::new(pki.intermediate.clone()),
        ValidationContext::default(),
        &known,
        validation_time(),
    );

    assert_eq!(status, RevocationStatus::Indeterminate);

    let items: Vec<_> = report
        .items()
        .iter()
        .map(|entry| (entry.item().check_name.to_string(), entry.status()))
        .collect();
    assert_eq!(
        items,
        vec![
            (OCSP_CHECK.to_string(), ReportItemStatus::Indeterminate),
            (CRL_CHECK.to_string(), ReportItemStatus::Indeterminate),
        ]
    );

    let ocsp = report.items()[0].item();
    assert_eq!(ocsp.message, "unreadable supplied OCSP response");
    assert!(ocsp
        .cause
        .as_deref()
        .is_some_and(|cause| cause.contains("unknown test response")));

    let crl = report.items()[1].item();
    assert_eq!(crl.message, "unreadable supplied CRL");
    assert!(crl
        .cause
        .as_deref()
        .is_some_and(|cause| cause.contains("unknown test CRL")));
}
