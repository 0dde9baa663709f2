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

use crate::{
    context::{CertificateSource, TimeBasedContext, ValidationContext, ValidatorContext},
    tests::fixtures::at,
};

#[test]
fn defaults() {
    let context = ValidationContext::default();

    assert_eq!(context.validator(), ValidatorContext::ChainValidator);
    assert_eq!(context.source(), CertificateSource::SignerCert);
    assert_eq!(context.time_based(), TimeBasedContext::Present);
    assert_eq!(context.validation_time(), None);
}

#[test]
fn setters_return_new_values() {
    let context = ValidationContext::default();
    let ocsp = context
        .with_validator(ValidatorContext::OcspValidator)
        .with_source(CertificateSource::OcspIssuer);

    assert_eq!(context.validator(), ValidatorContext::ChainValidator);
    assert_eq!(ocsp.validator(), ValidatorContext::OcspValidator);
    assert_eq!(ocsp.source(), CertificateSource::OcspIssuer);
    assert_ne!(context, ocsp);

    let again = ValidationContext::default()
        .with_validator(ValidatorContext::OcspValidator)
        .with_source(CertificateSource::OcspIssuer);
    assert_eq!(ocsp, again);
}

#[test]
fn effective_time() {
    let now = at(2026, 1, 1);
    let signed = at(2023, 4, 5);

    let present = ValidationContext::default();
    assert_eq!(present.effective_time(now), Some(now));

    let historical = present.with_validation_time(signed);
    assert_eq!(historical.time_based(), TimeBasedContext::Historical);
    assert_eq!(historical.effective_time(now), Some(signed));

    // Switching back to present ignores the stored time.
    let back = historical.with_time_based(TimeBasedContext::Present);
    assert_eq!(back.effective_time(now), Some(now));

    // Historical without a time has no effective time.
    let vague = present.with_time_based(TimeBasedContext::Historical);
    assert_eq!(vague.effective_time(now), None);
}

#[test]
fn display() {
    assert_eq!(ValidatorContext::CrlValidator.to_string(), "CRL validator");
    assert_eq!(CertificateSource::OcspIssuer.to_string(), "OCSP responder");
}
