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

//! Predicates over certificate extensions.
//!
//! A [`CertificateExtension`] answers whether a certificate satisfies one
//! constraint. Some constraints depend on where the certificate sits in the
//! chain, so the number of intermediate CA certificates below it is passed
//! to every check. Checks that do not care simply ignore it.
//!
//! An unsatisfied constraint is a plain `false`, never an error.

use std::fmt::Debug;

use certchain_crypto::{oids, Certificate, KeyUsage};

use crate::context::CertificateSource;

/// A constraint on one certificate extension.
pub trait CertificateExtension: Debug + Send + Sync {
    /// Name used as the check name in report items.
    fn name(&self) -> &'static str;

    /// OID of the extension this check inspects.
    fn oid(&self) -> &'static str;

    /// Human-readable statement of what the check expects.
    fn expectation(&self) -> String;

    /// Return `true` if `cert` satisfies the constraint when
    /// `chain_depth_remaining` intermediate CA certificates follow it on the
    /// way to the end-entity certificate.
    fn exists_in_certificate(&self, cert: &Certificate, chain_depth_remaining: usize) -> bool;
}

/// Requires the basic constraints CA flag to match `require_ca`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BasicConstraintsExtension {
    /// Whether the certificate must be a CA.
    pub require_ca: bool,
}

impl CertificateExtension for BasicConstraintsExtension {
    fn name(&self) -> &'static str {
        "basic constraints"
    }

    fn oid(&self) -> &'static str {
        oids::BASIC_CONSTRAINTS
    }

    fn expectation(&self) -> String {
        if self.require_ca {
            "certificate must be a CA".to_string()
        } else {
            "certificate must not be a CA".to_string()
        }
    }

    fn exists_in_certificate(&self, cert: &Certificate, _chain_depth_remaining: usize) -> bool {
        let is_ca = cert.basic_constraints.is_some_and(|bc| bc.ca);
        is_ca == self.require_ca
    }
}

/// Requires a CA whose path length constraint allows the intermediate CA
/// certificates that follow it.
///
/// A CA without a path length constraint is unbounded.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DynamicBasicConstraintsExtension;

impl CertificateExtension for DynamicBasicConstraintsExtension {
    fn name(&self) -> &'static str {
        "basic constraints"
    }

    fn oid(&self) -> &'static str {
        oids::BASIC_CONSTRAINTS
    }

    fn expectation(&self) -> String {
        "certificate must be a CA whose path length allows the chain below it".to_string()
    }

    fn exists_in_certificate(&self, cert: &Certificate, chain_depth_remaining: usize) -> bool {
        match cert.basic_constraints {
            Some(bc) if bc.ca => bc
                .path_len
                .map_or(true, |path_len| path_len as usize >= chain_depth_remaining),
            _ => false,
        }
    }
}

/// Requires every bit of `required` in the key usage extension.
///
/// A certificate without the extension fails.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyUsageExtension {
    /// Bits that must be present.
    pub required: KeyUsage,
}

impl CertificateExtension for KeyUsageExtension {
    fn name(&self) -> &'static str {
        "key usage"
    }

    fn oid(&self) -> &'static str {
        oids::KEY_USAGE
    }

    fn expectation(&self) -> String {
        let mut bits = Vec::new();
        if self.required.digital_signature {
            bits.push("digitalSignature");
        }
        if self.required.non_repudiation {
            bits.push("nonRepudiation");
        }
        if self.required.key_encipherment {
            bits.push("keyEncipherment");
        }
        if self.required.data_encipherment {
            bits.push("dataEncipherment");
        }
        if self.required.key_agreement {
            bits.push("keyAgreement");
        }
        if self.required.key_cert_sign {
            bits.push("keyCertSign");
        }
        if self.required.crl_sign {
            bits.push("cRLSign");
        }
        format!("key usage must include {}", bits.join(", "))
    }

    fn exists_in_certificate(&self, cert: &Certificate, _chain_depth_remaining: usize) -> bool {
        cert.key_usage
            .is_some_and(|key_usage| key_usage.contains(&self.required))
    }
}

/// Requires the extended key usage extension to list every OID in
/// `required`, or the `anyExtendedKeyUsage` OID.
///
/// Extra usages are allowed and order does not matter. A certificate without
/// the extension fails.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtendedKeyUsageExtension {
    required: Vec<String>,
}

impl ExtendedKeyUsageExtension {
    /// Require the given usage OIDs.
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    /// The required usage OIDs.
    pub fn required(&self) -> &[String] {
        &self.required
    }
}

impl CertificateExtension for ExtendedKeyUsageExtension {
    fn name(&self) -> &'static str {
        "extended key usage"
    }

    fn oid(&self) -> &'static str {
        oids::EXTENDED_KEY_USAGE
    }

    fn expectation(&self) -> String {
        format!("extended key usage must include {}", self.required.join(", "))
    }

    fn exists_in_certificate(&self, cert: &Certificate, _chain_depth_remaining: usize) -> bool {
        let Some(usages) = &cert.extended_key_usage else {
            return false;
        };

        if usages.iter().any(|usage| usage == oids::ANY_EXTENDED_KEY_USAGE) {
            return true;
        }

        self.required
            .iter()
            .all(|required| usages.iter().any(|usage| usage == required))
    }
}

/// Requires the `id-pkix-ocsp-nocheck` extension.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OcspNoCheckExtension;

impl CertificateExtension for OcspNoCheckExtension {
    fn name(&self) -> &'static str {
        "OCSP no check"
    }

    fn oid(&self) -> &'static str {
        oids::OCSP_NO_CHECK
    }

    fn expectation(&self) -> String {
        "OCSP responder certificate should carry id-pkix-ocsp-nocheck".to_string()
    }

    fn exists_in_certificate(&self, cert: &Certificate, _chain_depth_remaining: usize) -> bool {
        cert.ocsp_no_check
    }
}

/// How a failed check affects the verdict.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Requirement {
    /// Failure makes the certificate invalid.
    Mandatory,

    /// Failure leaves the verdict indeterminate.
    Advisory,
}

/// One check in a role policy.
#[derive(Debug)]
pub struct RequiredExtension {
    /// The predicate.
    pub check: Box<dyn CertificateExtension>,

    /// Consequence of failing it.
    pub requirement: Requirement,
}

impl RequiredExtension {
    fn mandatory(check: impl CertificateExtension + 'static) -> Self {
        Self {
            check: Box::new(check),
            requirement: Requirement::Mandatory,
        }
    }

    fn advisory(check: impl CertificateExtension + 'static) -> Self {
        Self {
            check: Box::new(check),
            requirement: Requirement::Advisory,
        }
    }
}

/// The extension checks a certificate must pass for the role it plays.
#[derive(Debug, Default)]
pub struct RequiredExtensions {
    checks: Vec<RequiredExtension>,
}

impl RequiredExtensions {
    /// Build the policy for a certificate role.
    ///
    /// `signer_ekus` lists usages the signing certificate must carry. The
    /// extended key usage check is skipped for signers when it is empty.
    pub fn for_source(source: CertificateSource, signer_ekus: &[String]) -> Self {
        let checks = match source {
            CertificateSource::SignerCert => {
                let mut checks = vec![RequiredExtension::mandatory(KeyUsageExtension {
                    required: KeyUsage::DIGITAL_SIGNATURE,
                })];
                if !signer_ekus.is_empty() {
                    checks.push(RequiredExtension::mandatory(
                        ExtendedKeyUsageExtension::new(signer_ekus.iter().cloned()),
                    ));
                }
                checks
            }

            CertificateSource::CertIssuer => vec![
                RequiredExtension::mandatory(DynamicBasicConstraintsExtension),
                RequiredExtension::mandatory(KeyUsageExtension {
                    required: KeyUsage::KEY_CERT_SIGN,
                }),
            ],

            CertificateSource::CrlIssuer => vec![RequiredExtension::mandatory(KeyUsageExtension {
                required: KeyUsage::CRL_SIGN,
            })],

            CertificateSource::OcspIssuer => vec![
                RequiredExtension::mandatory(ExtendedKeyUsageExtension::new([oids::OCSP_SIGNING])),
                RequiredExtension::advisory(OcspNoCheckExtension),
            ],

            CertificateSource::TimestampIssuer => vec![RequiredExtension::mandatory(
                ExtendedKeyUsageExtension::new([oids::TIME_STAMPING]),
            )],
        };

        Self { checks }
    }

    /// Iterate over the checks in policy order.
    pub fn iter(&self) -> impl Iterator<Item = &RequiredExtension> {
        self.checks.iter()
    }

    /// Return `true` if the policy has no checks.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
