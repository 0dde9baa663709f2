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

//! Tools for working with OCSP requests and responses.

use chrono::{DateTime, Utc};
use rasn::prelude::*;
use rasn_ocsp::OcspResponseStatus;
use rasn_pkix::CrlReason;
use x509_parser::der_parser::der::parse_der_integer;

use crate::{
    hash::sha1, internal::time, raw_signature::SigningAlg, Certificate, CryptoError,
    DistinguishedName, RevocationReason,
};

/// Identifies the key or name of the entity that signed an OCSP response.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResponderId {
    /// Responder identified by its subject name.
    ByName(DistinguishedName),

    /// Responder identified by the SHA-1 hash of its public key bits.
    ByKey(Vec<u8>),
}

impl Default for ResponderId {
    fn default() -> Self {
        Self::ByKey(Vec::new())
    }
}

/// OCSP `CertID`: the identifier a single response is issued for.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CertId {
    /// Hash algorithm OID used for the two hashes below.
    pub hash_algorithm: String,

    /// Hash of the issuer's DER-encoded subject name.
    pub issuer_name_hash: Vec<u8>,

    /// Hash of the issuer's public key bits.
    pub issuer_key_hash: Vec<u8>,

    /// Serial number of the certificate the status is about.
    pub serial: Vec<u8>,
}

/// Revocation status reported for one certificate.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum CertStatus {
    /// The certificate is not revoked.
    #[default]
    Good,

    /// The certificate was revoked at `time`.
    Revoked {
        /// Revocation time.
        time: DateTime<Utc>,

        /// Revocation reason, if the responder supplied one.
        reason: Option<RevocationReason>,
    },

    /// The responder does not know the certificate.
    Unknown,
}

/// One `SingleResponse` from a basic OCSP response.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SingleResponse {
    /// Certificate the status is about.
    pub cert_id: CertId,

    /// Reported status.
    pub status: CertStatus,

    /// Time at which the status was known to be correct.
    pub this_update: DateTime<Utc>,

    /// Time at or before which newer information will be available.
    pub next_update: Option<DateTime<Utc>>,
}

/// An already-parsed `BasicOCSPResponse`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BasicOcspResponse {
    /// Original DER encoding of the enclosing `OCSPResponse`.
    pub der: Vec<u8>,

    /// DER encoding of `ResponseData`, the data covered by the signature.
    pub tbs_der: Vec<u8>,

    /// Signature algorithm, if it is one the backends understand.
    pub signature_algorithm: Option<SigningAlg>,

    /// Signature algorithm OID in dotted-decimal notation.
    pub signature_algorithm_oid: String,

    /// Responder's signature over `tbs_der`.
    pub signature: Vec<u8>,

    /// Who signed the response.
    pub responder_id: ResponderId,

    /// When the response was signed.
    pub produced_at: DateTime<Utc>,

    /// Status entries.
    pub responses: Vec<SingleResponse>,

    /// Certificates the responder embedded to help verify its signature.
    pub certs: Vec<Certificate>,
}

impl BasicOcspResponse {
    /// Decode a DER-encoded `OCSPResponse` and extract its basic response.
    ///
    /// Fails if the responder status is anything other than `successful`.
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let ocsp_response = rasn::der::decode::<rasn_ocsp::OcspResponse>(der)
            .map_err(|e| CryptoError::InvalidOcspResponse(e.to_string()))?;

        if ocsp_response.status != OcspResponseStatus::Successful {
            return Err(CryptoError::OcspResponderStatus(format!(
                "{:?}",
                ocsp_response.status
            )));
        }

        let Some(response_bytes) = ocsp_response.bytes else {
            return Err(CryptoError::InvalidOcspResponse(
                "missing response bytes".to_string(),
            ));
        };

        let basic_response =
            rasn::der::decode::<rasn_ocsp::BasicOcspResponse>(&response_bytes.response)
                .map_err(|e| CryptoError::InvalidOcspResponse(e.to_string()))?;

        let response_data = &basic_response.tbs_response_data;

        let tbs_der = rasn::der::encode(response_data)
            .map_err(|e| CryptoError::EncodingError(e.to_string()))?;

        let responder_id = match &response_data.responder_id {
            rasn_ocsp::ResponderId::ByName(name) => {
                let name_der = rasn::der::encode(name)
                    .map_err(|e| CryptoError::EncodingError(e.to_string()))?;
                ResponderId::ByName(DistinguishedName::from_der(&name_der)?)
            }
            rasn_ocsp::ResponderId::ByKey(key_hash) => ResponderId::ByKey(key_hash.to_vec()),
        };

        let mut responses = Vec::new();
        for single_response in &response_data.responses {
            let cert_id = &single_response.cert_id;

            let status = match &single_response.cert_status {
                rasn_ocsp::CertStatus::Good => CertStatus::Good,
                rasn_ocsp::CertStatus::Revoked(revoked_info) => CertStatus::Revoked {
                    time: time::from_generalized_time(&revoked_info.revocation_time),
                    reason: revoked_info.revocation_reason.as_ref().map(reason_from_crl_reason),
                },
                rasn_ocsp::CertStatus::Unknown(_) => CertStatus::Unknown,
            };

            responses.push(SingleResponse {
                cert_id: CertId {
                    hash_algorithm: dotted_oid(&cert_id.hash_algorithm.algorithm),
                    issuer_name_hash: cert_id.issuer_name_hash.to_vec(),
                    issuer_key_hash: cert_id.issuer_key_hash.to_vec(),
                    serial: integer_content(&cert_id.serial_number)?,
                },
                status,
                this_update: time::from_generalized_time(&single_response.this_update),
                next_update: single_response
                    .next_update
                    .as_ref()
                    .map(time::from_generalized_time),
            });
        }

        let mut certs = Vec::new();
        if let Some(ocsp_certs) = &basic_response.certs {
            for ocsp_cert in ocsp_certs {
                let cert_der = rasn::der::encode(ocsp_cert)
                    .map_err(|e| CryptoError::EncodingError(e.to_string()))?;
                certs.push(Certificate::from_der(&cert_der)?);
            }
        }

        let signature_algorithm_oid = dotted_oid(&basic_response.signature_algorithm.algorithm);

        Ok(BasicOcspResponse {
            der: der.to_vec(),
            tbs_der,
            signature_algorithm: SigningAlg::from_signature_oid(&signature_algorithm_oid),
            signature_algorithm_oid,
            signature: basic_response.signature.as_raw_slice().to_vec(),
            responder_id,
            produced_at: time::from_generalized_time(&response_data.produced_at),
            responses,
            certs,
        })
    }
}

/// Build a DER `OCSPRequest` asking about `cert`, which must have been issued
/// by `issuer`.
///
/// The `CertID` is hashed with SHA-1 as most responders expect.
pub(crate) fn build_ocsp_request(
    cert: &Certificate,
    issuer: &Certificate,
) -> Result<Vec<u8>, CryptoError> {
    let subject: rasn_pkix::Certificate = rasn::der::decode(&cert.der)
        .map_err(|e| CryptoError::InvalidCertificate(e.to_string()))?;

    let issuer_name_hash = OctetString::from(sha1(&issuer.subject.der));
    let issuer_key_hash = OctetString::from(sha1(&issuer.public_key));
    let serial_number = subject.tbs_certificate.serial_number;

    let sha1_oid = rasn::types::Oid::new(&[1, 3, 14, 3, 2, 26])
        .ok_or_else(|| CryptoError::EncodingError("invalid SHA-1 OID".to_string()))?;
    let alg = rasn::types::ObjectIdentifier::from(sha1_oid);

    let null =
        rasn::der::encode(&()).map_err(|e| CryptoError::EncodingError(e.to_string()))?;

    // Many OCSP responders expect NULL parameters rather than absent ones.
    let sha1_ai = rasn_pkix::AlgorithmIdentifier {
        algorithm: alg,
        parameters: Some(Any::new(null)),
    };

    let req_cert = rasn_ocsp::CertId {
        hash_algorithm: sha1_ai,
        issuer_name_hash,
        issuer_key_hash,
        serial_number,
    };

    let tbs_request = rasn_ocsp::TbsRequest {
        version: rasn_ocsp::Version::from(0u8),
        requestor_name: None,
        request_list: vec![rasn_ocsp::Request {
            req_cert,
            single_request_extensions: None,
        }],
        request_extensions: None,
    };

    let ocsp_request = rasn_ocsp::OcspRequest {
        tbs_request,
        optional_signature: None,
    };

    rasn::der::encode(&ocsp_request).map_err(|e| CryptoError::EncodingError(e.to_string()))
}

fn dotted_oid(oid: &rasn::types::ObjectIdentifier) -> String {
    oid.iter()
        .map(|arc| arc.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

// Content octets of a DER INTEGER, the same form X.509 parsers report for
// serial numbers.
fn integer_content(value: &Integer) -> Result<Vec<u8>, CryptoError> {
    let tlv = rasn::der::encode(value).map_err(|e| CryptoError::EncodingError(e.to_string()))?;

    let (_, obj) = parse_der_integer(&tlv)
        .map_err(|e| CryptoError::InvalidOcspResponse(format!("invalid serial number: {e}")))?;

    obj.as_slice()
        .map(|content| content.to_vec())
        .map_err(|e| CryptoError::InvalidOcspResponse(format!("invalid serial number: {e}")))
}

fn reason_from_crl_reason(reason: &CrlReason) -> RevocationReason {
    match reason {
        CrlReason::KeyCompromise => RevocationReason::KeyCompromise,
        CrlReason::CaCompromise => RevocationReason::CaCompromise,
        CrlReason::AffiliationChanged => RevocationReason::AffiliationChanged,
        CrlReason::Superseded => RevocationReason::Superseded,
        CrlReason::CessationOfOperation => RevocationReason::CessationOfOperation,
        CrlReason::CertificateHold => RevocationReason::CertificateHold,
        CrlReason::RemoveFromCRL => RevocationReason::RemoveFromCrl,
        _ => RevocationReason::Unspecified,
    }
}
