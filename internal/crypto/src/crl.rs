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

use chrono::{DateTime, Utc};
use x509_parser::{
    extensions::ParsedExtension, prelude::FromDer, revocation_list::CertificateRevocationList,
};

use crate::{
    internal::time, raw_signature::SigningAlg, CryptoError, DistinguishedName, RevocationReason,
};

/// One entry of a CRL's `revokedCertificates` list.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RevokedEntry {
    /// Serial number of the revoked certificate.
    pub serial: Vec<u8>,

    /// When the certificate was revoked.
    pub revocation_date: DateTime<Utc>,

    /// Reason code entry extension, if present.
    pub reason: Option<RevocationReason>,
}

/// An already-parsed X.509 certificate revocation list.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Crl {
    /// Original DER encoding.
    pub der: Vec<u8>,

    /// CRL issuer name.
    pub issuer: DistinguishedName,

    /// `thisUpdate` field.
    pub this_update: DateTime<Utc>,

    /// `nextUpdate` field, if present.
    pub next_update: Option<DateTime<Utc>>,

    /// DER encoding of `TBSCertList`.
    pub tbs_der: Vec<u8>,

    /// Signature algorithm, if it is one the backends understand.
    pub signature_algorithm: Option<SigningAlg>,

    /// Signature algorithm OID in dotted-decimal notation.
    pub signature_algorithm_oid: String,

    /// Issuer's signature over `tbs_der`.
    pub signature: Vec<u8>,

    /// Revoked certificate entries.
    pub revoked: Vec<RevokedEntry>,

    /// Key identifier from the authority key identifier extension.
    pub authority_key_id: Option<Vec<u8>>,
}

impl Crl {
    /// Decode a DER-encoded CRL.
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let (_rem, crl) = CertificateRevocationList::from_der(der)
            .map_err(|e| CryptoError::InvalidCrl(e.to_string()))?;

        let signature_algorithm_oid = crl.signature_algorithm.algorithm.to_id_string();

        let mut revoked = Vec::new();
        for entry in crl.iter_revoked_certificates() {
            revoked.push(RevokedEntry {
                serial: entry.raw_serial().to_vec(),
                revocation_date: time::from_asn1_time(entry.revocation_date)?,
                reason: entry
                    .reason_code()
                    .map(|(_critical, code)| RevocationReason::from_code(code.0)),
            });
        }

        let mut authority_key_id = None;
        for ext in crl.tbs_cert_list.extensions() {
            if let ParsedExtension::AuthorityKeyIdentifier(aki) = ext.parsed_extension() {
                authority_key_id = aki.key_identifier.as_ref().map(|ki| ki.0.to_vec());
            }
        }

        Ok(Crl {
            der: der.to_vec(),
            issuer: DistinguishedName::from_x509_name(crl.issuer()),
            this_update: time::from_asn1_time(crl.last_update())?,
            next_update: crl.next_update().map(time::from_asn1_time).transpose()?,
            tbs_der: crl.tbs_cert_list.as_ref().to_vec(),
            signature_algorithm: SigningAlg::from_signature_oid(&signature_algorithm_oid),
            signature_algorithm_oid,
            signature: crl.signature_value.as_ref().to_vec(),
            revoked,
            authority_key_id,
        })
    }

    /// Return the entry for `serial`, if the CRL lists it.
    pub fn find_revoked(&self, serial: &[u8]) -> Option<&RevokedEntry> {
        self.revoked.iter().find(|entry| entry.serial == serial)
    }
}
