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

//! A deterministic crypto backend and a small PKI made of model objects.
//!
//! The mock backend "signs" by hashing the signer's SPKI together with the
//! data, so any tampering with either side makes verification fail.

use std::{collections::HashMap, sync::Arc};

use certchain_crypto::{
    hash::{sha1, sha256},
    oids,
    raw_signature::{RawSignatureValidationError, RawSigner, RawSignerError, SigningAlg},
    BasicConstraints, BasicOcspResponse, CertId, CertStatus, Certificate, Crl, CryptoBackend,
    CryptoError, DigestAlgorithm, DistinguishedName, KeyUsage, ResponderId, RevokedEntry,
    SingleResponse, StandardBackend,
};
use chrono::{DateTime, TimeZone, Utc};

use crate::{
    context::ValidationContext, settings::Settings, trust_store::CertificateTrustStore,
};

pub(crate) const LEAF_OCSP_URL: &str = "http://ocsp.test/intermediate";
pub(crate) const INTERMEDIATE_OCSP_URL: &str = "http://ocsp.test/root";
pub(crate) const LEAF_CRL_URL: &str = "http://crl.test/intermediate.crl";
pub(crate) const INTERMEDIATE_CRL_URL: &str = "http://crl.test/root.crl";

pub(crate) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

/// Validation time used by most scenarios.
pub(crate) fn validation_time() -> DateTime<Utc> {
    at(2025, 6, 1)
}

pub(crate) fn historical_context() -> ValidationContext {
    ValidationContext::default().with_validation_time(validation_time())
}

pub(crate) fn mock_signature(spki: &[u8], data: &[u8]) -> Vec<u8> {
    let mut signed = spki.to_vec();
    signed.extend_from_slice(data);
    sha256(&signed)
}

#[derive(Debug, Default)]
pub(crate) struct MockBackend {
    certs: HashMap<Vec<u8>, Certificate>,
    ocsp_responses: HashMap<Vec<u8>, BasicOcspResponse>,
    crls: HashMap<Vec<u8>, Crl>,
}

impl MockBackend {
    pub(crate) fn with_certificate(mut self, cert: &Certificate) -> Self {
        self.certs.insert(cert.der.clone(), cert.clone());
        self
    }

    pub(crate) fn with_ocsp_response(mut self, response: &BasicOcspResponse) -> Self {
        self.ocsp_responses
            .insert(response.der.clone(), response.clone());
        self
    }

    pub(crate) fn with_crl(mut self, crl: &Crl) -> Self {
        self.crls.insert(crl.der.clone(), crl.clone());
        self
    }

    pub(crate) fn into_arc(self) -> Arc<dyn CryptoBackend> {
        Arc::new(self)
    }
}

impl CryptoBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn create_oid(&self, dotted: &str) -> Result<Vec<u8>, CryptoError> {
        StandardBackend.create_oid(dotted)
    }

    fn create_octet_string(&self, content: &[u8]) -> Result<Vec<u8>, CryptoError> {
        StandardBackend.create_octet_string(content)
    }

    fn create_sequence(&self, elements: &[Vec<u8>]) -> Result<Vec<u8>, CryptoError> {
        StandardBackend.create_sequence(elements)
    }

    fn digest(&self, alg: DigestAlgorithm, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(alg.digest(data))
    }

    fn parse_certificate(&self, der: &[u8]) -> Result<Certificate, CryptoError> {
        self.certs
            .get(der)
            .cloned()
            .ok_or_else(|| CryptoError::InvalidCertificate("unknown test certificate".into()))
    }

    fn parse_certificates_pem(&self, _pem: &[u8]) -> Result<Vec<Certificate>, CryptoError> {
        Err(CryptoError::InvalidPem("not supported by the mock backend".into()))
    }

    fn verify_signature(
        &self,
        _alg: SigningAlg,
        data: &[u8],
        signature: &[u8],
        spki_der: &[u8],
    ) -> Result<(), RawSignatureValidationError> {
        if signature == mock_signature(spki_der, data).as_slice() {
            Ok(())
        } else {
            Err(RawSignatureValidationError::SignatureMismatch)
        }
    }

    fn create_ocsp_request(
        &self,
        cert: &Certificate,
        _issuer: &Certificate,
    ) -> Result<Vec<u8>, CryptoError> {
        Ok(cert.serial.clone())
    }

    fn parse_ocsp_response(&self, der: &[u8]) -> Result<BasicOcspResponse, CryptoError> {
        self.ocsp_responses
            .get(der)
            .cloned()
            .ok_or_else(|| CryptoError::InvalidOcspResponse("unknown test response".into()))
    }

    fn parse_crl(&self, der: &[u8]) -> Result<Crl, CryptoError> {
        self.crls
            .get(der)
            .cloned()
            .ok_or_else(|| CryptoError::InvalidCrl("unknown test CRL".into()))
    }

    fn content_signer(
        &self,
        alg: SigningAlg,
        _private_key_pem: &[u8],
    ) -> Result<Box<dyn RawSigner>, RawSignerError> {
        Err(RawSignerError::UnsupportedAlgorithm(alg))
    }
}

pub(crate) fn name(common_name: &str) -> DistinguishedName {
    DistinguishedName {
        der: common_name.as_bytes().to_vec(),
        text: format!("CN={common_name}"),
    }
}

/// A certificate model for `subject`, signed by the key of `issuer`
/// (`None` for self-signed).
pub(crate) fn model_cert(subject: &str, serial: u8, issuer: Option<&Certificate>) -> Certificate {
    let subject_name = name(subject);
    let spki_der = format!("spki:{subject}").into_bytes();
    let key_id = sha1(&spki_der);

    let (issuer_name, issuer_spki, issuer_key_id) = match issuer {
        Some(issuer) => (
            issuer.subject.clone(),
            issuer.spki_der.clone(),
            issuer.subject_key_id.clone(),
        ),
        None => (subject_name.clone(), spki_der.clone(), Some(key_id.clone())),
    };

    let mut cert = Certificate {
        version: 3,
        serial: vec![serial],
        subject: subject_name,
        issuer: issuer_name,
        not_before: at(2020, 1, 1),
        not_after: at(2040, 1, 1),
        signature_algorithm: Some(SigningAlg::Es256),
        signature_algorithm_oid: oids::ECDSA_WITH_SHA256.to_string(),
        tbs_der: format!("tbs:{subject}:{serial}").into_bytes(),
        public_key: format!("key:{subject}").into_bytes(),
        spki_der,
        subject_key_id: Some(key_id),
        authority_key_id: issuer_key_id,
        ..Default::default()
    };

    sign_model(&mut cert, &issuer_spki);
    cert
}

/// Recompute the DER and signature after a test changed the model.
pub(crate) fn sign_model(cert: &mut Certificate, issuer_spki: &[u8]) {
    cert.tbs_der = format!(
        "tbs:{}:{}:{:?}:{:?}:{}",
        cert.subject.text,
        cert.serial_hex(),
        cert.basic_constraints,
        cert.key_usage,
        cert.not_after
    )
    .into_bytes();
    cert.signature = mock_signature(issuer_spki, &cert.tbs_der);

    let mut der = cert.tbs_der.clone();
    der.extend_from_slice(&cert.signature);
    cert.der = der;
}

pub(crate) fn make_ca(cert: &mut Certificate, path_len: Option<u32>) {
    cert.basic_constraints = Some(BasicConstraints { ca: true, path_len });
    cert.key_usage = Some(KeyUsage {
        key_cert_sign: true,
        crl_sign: true,
        ..Default::default()
    });
}

/// Root, intermediate (path length 0) and signer, as models.
#[derive(Clone, Debug)]
pub(crate) struct ModelPki {
    pub(crate) root: Certificate,
    pub(crate) intermediate: Certificate,
    pub(crate) leaf: Certificate,
}

impl ModelPki {
    pub(crate) fn new() -> Self {
        let mut root = model_cert("Model Root CA", 1, None);
        make_ca(&mut root, None);
        let root_spki = root.spki_der.clone();
        sign_model(&mut root, &root_spki);

        let mut intermediate = model_cert("Model Intermediate CA", 2, Some(&root));
        make_ca(&mut intermediate, Some(0));
        intermediate.ocsp_urls = vec![INTERMEDIATE_OCSP_URL.to_string()];
        intermediate.crl_distribution_points = vec![INTERMEDIATE_CRL_URL.to_string()];
        sign_model(&mut intermediate, &root.spki_der);

        let mut leaf = model_cert("Model Signer", 3, Some(&intermediate));
        leaf.key_usage = Some(KeyUsage {
            digital_signature: true,
            ..Default::default()
        });
        leaf.extended_key_usage = Some(vec![oids::CODE_SIGNING.to_string()]);
        leaf.ocsp_urls = vec![LEAF_OCSP_URL.to_string()];
        leaf.crl_distribution_points = vec![LEAF_CRL_URL.to_string()];
        sign_model(&mut leaf, &intermediate.spki_der);

        Self {
            root,
            intermediate,
            leaf,
        }
    }

    pub(crate) fn chain(&self) -> Vec<Certificate> {
        vec![self.leaf.clone(), self.intermediate.clone()]
    }

    pub(crate) fn backend(&self) -> MockBackend {
        MockBackend::default()
            .with_certificate(&self.root)
            .with_certificate(&self.intermediate)
            .with_certificate(&self.leaf)
    }

    pub(crate) fn trust_store(&self) -> Arc<CertificateTrustStore> {
        let mut store = CertificateTrustStore::new();
        store.add_trust_anchor(self.root.clone());
        Arc::new(store)
    }
}

/// An OCSP response about `cert` signed directly by `issuer`.
pub(crate) fn ocsp_response(
    cert: &Certificate,
    issuer: &Certificate,
    status: CertStatus,
    this_update: DateTime<Utc>,
    next_update: Option<DateTime<Utc>>,
) -> BasicOcspResponse {
    let mut response = BasicOcspResponse {
        signature_algorithm: Some(SigningAlg::Es256),
        signature_algorithm_oid: oids::ECDSA_WITH_SHA256.to_string(),
        responder_id: ResponderId::ByName(issuer.subject.clone()),
        produced_at: this_update,
        responses: vec![SingleResponse {
            cert_id: CertId {
                hash_algorithm: oids::SHA1.to_string(),
                issuer_name_hash: sha1(&issuer.subject.der),
                issuer_key_hash: sha1(&issuer.public_key),
                serial: cert.serial.clone(),
            },
            status,
            this_update,
            next_update,
        }],
        ..Default::default()
    };

    sign_ocsp_response(&mut response, &issuer.spki_der);
    response
}

/// Recompute the DER and signature after a test changed the response.
pub(crate) fn sign_ocsp_response(response: &mut BasicOcspResponse, signer_spki: &[u8]) {
    response.tbs_der = format!(
        "ocsp-tbs:{:?}:{:?}:{}",
        response.responder_id,
        response.responses,
        response.certs.len()
    )
    .into_bytes();
    response.signature = mock_signature(signer_spki, &response.tbs_der);

    let mut der = b"ocsp:".to_vec();
    der.extend_from_slice(&response.tbs_der);
    der.extend_from_slice(&response.signature);
    response.der = der;
}

/// A CRL issued and signed by `issuer` listing `revoked`.
pub(crate) fn crl(
    issuer: &Certificate,
    revoked: Vec<RevokedEntry>,
    this_update: DateTime<Utc>,
    next_update: Option<DateTime<Utc>>,
) -> Crl {
    let mut crl = Crl {
        issuer: issuer.subject.clone(),
        this_update,
        next_update,
        signature_algorithm: Some(SigningAlg::Es256),
        signature_algorithm_oid: oids::ECDSA_WITH_SHA256.to_string(),
        revoked,
        authority_key_id: issuer.subject_key_id.clone(),
        ..Default::default()
    };

    crl.tbs_der = format!(
        "crl-tbs:{}:{:?}:{this_update}:{next_update:?}",
        crl.issuer.text, crl.revoked
    )
    .into_bytes();
    crl.signature = mock_signature(&issuer.spki_der, &crl.tbs_der);

    let mut der = b"crl:".to_vec();
    der.extend_from_slice(&crl.tbs_der);
    der.extend_from_slice(&crl.signature);
    crl.der = der;
    crl
}

/// Settings with the given tweaks applied to the defaults.
pub(crate) fn settings(tweak: impl FnOnce(&mut Settings)) -> Settings {
    let mut settings = Settings::default();
    tweak(&mut settings);
    settings
}
