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

use rcgen::{
    date_time_ymd, CertificateRevocationListParams, KeyIdMethod, RevocationReason as
    RcgenRevocationReason, RevokedCertParams, SerialNumber,
};

use crate::{tests::test_pki, Crl, RevocationReason};

#[test]
fn parse_crl() {
    let root = test_pki::root_ca();

    let crl = CertificateRevocationListParams {
        this_update: date_time_ymd(2024, 1, 1),
        next_update: date_time_ymd(2024, 2, 1),
        crl_number: SerialNumber::from(7u64),
        issuing_distribution_point: None,
        revoked_certs: vec![RevokedCertParams {
            serial_number: SerialNumber::from(vec![0x42]),
            revocation_time: date_time_ymd(2023, 12, 1),
            reason_code: Some(RcgenRevocationReason::KeyCompromise),
            invalidity_date: None,
        }],
        key_identifier_method: KeyIdMethod::Sha256,
    }
    .signed_by(&root.cert, &root.key)
    .unwrap();

    let parsed = Crl::from_der(crl.der()).unwrap();

    assert_eq!(parsed.issuer.text, "CN=Test Root CA");
    assert_eq!(parsed.this_update.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    assert_eq!(
        parsed.next_update.map(|t| t.to_rfc3339()),
        Some("2024-02-01T00:00:00+00:00".to_string())
    );
    assert_eq!(parsed.revoked.len(), 1);

    let entry = parsed.find_revoked(&[0x42]).unwrap();
    assert_eq!(entry.reason, Some(RevocationReason::KeyCompromise));
    assert_eq!(entry.revocation_date.to_rfc3339(), "2023-12-01T00:00:00+00:00");

    assert!(parsed.find_revoked(&[0x43]).is_none());
}

#[test]
fn garbage() {
    assert!(Crl::from_der(&[0x30, 0x03, 0x01, 0x01, 0xff]).is_err());
}
