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

use std::fmt;

use chrono::{DateTime, Utc};
use x509_parser::{
    certificate::X509Certificate,
    extensions::{DistributionPointName, GeneralName, ParsedExtension},
    pem::Pem,
    prelude::FromDer,
    x509::X509Name,
};

use crate::{hash::sha256, internal::time, oids, raw_signature::SigningAlg, CryptoError};

/// An X.509 distinguished name, kept in both its DER encoding (used for
/// comparisons and hashing) and its RFC 4514 text form (used for
/// diagnostics).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct DistinguishedName {
    /// DER encoding of the `Name` structure.
    pub der: Vec<u8>,

    /// Human-readable rendering of the name.
    pub text: String,
}

impl DistinguishedName {
    /// Decode a DER-encoded `Name`.
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let (_, name) = X509Name::from_der(der)
            .map_err(|e| CryptoError::InvalidCertificate(format!("invalid name: {e}")))?;

        Ok(Self::from_x509_name(&name))
    }

    pub(crate) fn from_x509_name(name: &X509Name) -> Self {
        Self {
            der: name.as_raw().to_vec(),
            text: name.to_string(),
        }
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Decoded value of the basic constraints extension.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BasicConstraints {
    /// `true` if the subject is a certificate authority.
    pub ca: bool,

    /// Maximum number of intermediate CA certificates that may follow this
    /// certificate in a path. `None` means unbounded.
    pub path_len: Option<u32>,
}

/// Decoded value of the key usage extension.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct KeyUsage {
    pub digital_signature: bool,
    pub non_repudiation: bool,
    pub key_encipherment: bool,
    pub data_encipherment: bool,
    pub key_agreement: bool,
    pub key_cert_sign: bool,
    pub crl_sign: bool,
}

impl KeyUsage {
    /// No key usage bits set.
    pub const NONE: KeyUsage = KeyUsage {
        digital_signature: false,
        non_repudiation: false,
        key_encipherment: false,
        data_encipherment: false,
        key_agreement: false,
        key_cert_sign: false,
        crl_sign: false,
    };

    /// Only `digitalSignature` set.
    pub const DIGITAL_SIGNATURE: KeyUsage = KeyUsage {
        digital_signature: true,
        ..KeyUsage::NONE
    };

    /// Only `keyCertSign` set.
    pub const KEY_CERT_SIGN: KeyUsage = KeyUsage {
        key_cert_sign: true,
        ..KeyUsage::NONE
    };

    /// Only `cRLSign` set.
    pub const CRL_SIGN: KeyUsage = KeyUsage {
        crl_sign: true,
        ..KeyUsage::NONE
    };

    /// Return `true` if every bit set in `required` is also set here.
    pub fn contains(&self, required: &KeyUsage) -> bool {
        (!required.digital_signature || self.digital_signature)
            && (!required.non_repudiation || self.non_repudiation)
            && (!required.key_encipherment || self.key_encipherment)
            && (!required.data_encipherment || self.data_encipherment)
            && (!required.key_agreement || self.key_agreement)
            && (!required.key_cert_sign || self.key_cert_sign)
            && (!required.crl_sign || self.crl_sign)
    }
}

/// A certificate extension in its raw form.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Extension {
    /// Extension OID in dotted-decimal notation.
    pub oid: String,

    /// Value of the `critical` flag.
    pub critical: bool,

    /// DER content of the `extnValue` OCTET STRING.
    pub value: Vec<u8>,
}

/// An already-parsed X.509 certificate.
///
/// This is the object model the validation engine works with. It is produced
/// by [`CryptoBackend::parse_certificate`] and never mutated afterwards.
///
/// [`CryptoBackend::parse_certificate`]: crate::CryptoBackend::parse_certificate
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Certificate {
    /// Original DER encoding.
    pub der: Vec<u8>,

    /// Certificate version (1, 2 or 3).
    pub version: u32,

    /// Serial number as big-endian two's complement bytes.
    pub serial: Vec<u8>,

    /// Subject name.
    pub subject: DistinguishedName,

    /// Issuer name.
    pub issuer: DistinguishedName,

    /// Start of the validity period.
    pub not_before: DateTime<Utc>,

    /// End of the validity period.
    pub not_after: DateTime<Utc>,

    /// Signature algorithm, if it is one the backends understand.
    pub signature_algorithm: Option<SigningAlg>,

    /// Signature algorithm OID in dotted-decimal notation.
    pub signature_algorithm_oid: String,

    /// DER encoding of the `TBSCertificate`, the data covered by the
    /// issuer's signature.
    pub tbs_der: Vec<u8>,

    /// Issuer's signature over `tbs_der`.
    pub signature: Vec<u8>,

    /// DER encoding of the `SubjectPublicKeyInfo`.
    pub spki_der: Vec<u8>,

    /// Raw subject public key bits (the BIT STRING content of the
    /// `SubjectPublicKeyInfo`).
    pub public_key: Vec<u8>,

    /// Every extension, in certificate order.
    pub extensions: Vec<Extension>,

    /// Basic constraints, if present.
    pub basic_constraints: Option<BasicConstraints>,

    /// Key usage, if present.
    pub key_usage: Option<KeyUsage>,

    /// Extended key usage OIDs, if the extension is present.
    pub extended_key_usage: Option<Vec<String>>,

    /// Subject key identifier, if present.
    pub subject_key_id: Option<Vec<u8>>,

    /// Key identifier from the authority key identifier extension.
    pub authority_key_id: Option<Vec<u8>>,

    /// OCSP responder locations from the authority information access
    /// extension.
    pub ocsp_urls: Vec<String>,

    /// CA issuer locations from the authority information access extension.
    pub ca_issuer_urls: Vec<String>,

    /// URIs from the CRL distribution points extension.
    pub crl_distribution_points: Vec<String>,

    /// `true` if the `id-pkix-ocsp-nocheck` extension is present.
    pub ocsp_no_check: bool,
}

impl Certificate {
    /// Decode a DER-encoded X.509 certificate.
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let (_rem, x509) = X509Certificate::from_der(der)
            .map_err(|e| CryptoError::InvalidCertificate(e.to_string()))?;

        let validity = x509.validity();
        let signature_algorithm_oid = x509.signature_algorithm.algorithm.to_id_string();

        let mut cert = Certificate {
            der: der.to_vec(),
            version: x509.version().0 + 1,
            serial: x509.raw_serial().to_vec(),
            subject: DistinguishedName::from_x509_name(x509.subject()),
            issuer: DistinguishedName::from_x509_name(x509.issuer()),
            not_before: time::from_asn1_time(validity.not_before)?,
            not_after: time::from_asn1_time(validity.not_after)?,
            signature_algorithm: SigningAlg::from_signature_oid(&signature_algorithm_oid),
            signature_algorithm_oid,
            tbs_der: x509.tbs_certificate.as_ref().to_vec(),
            signature: x509.signature_value.as_ref().to_vec(),
            spki_der: x509.public_key().raw.to_vec(),
            public_key: x509.public_key().subject_public_key.as_ref().to_vec(),
            ..Default::default()
        };

        for ext in x509.extensions() {
            let oid = ext.oid.to_id_string();
            if oid == oids::OCSP_NO_CHECK {
                cert.ocsp_no_check = true;
            }

            cert.extensions.push(Extension {
                oid,
                critical: ext.critical,
                value: ext.value.to_vec(),
            });

            match ext.parsed_extension() {
                ParsedExtension::BasicConstraints(bc) => {
                    cert.basic_constraints = Some(BasicConstraints {
                        ca: bc.ca,
                        path_len: bc.path_len_constraint,
                    });
                }
                ParsedExtension::KeyUsage(ku) => {
                    cert.key_usage = Some(KeyUsage {
                        digital_signature: ku.digital_signature(),
                        non_repudiation: ku.non_repudiation(),
                        key_encipherment: ku.key_encipherment(),
                        data_encipherment: ku.data_encipherment(),
                        key_agreement: ku.key_agreement(),
                        key_cert_sign: ku.key_cert_sign(),
                        crl_sign: ku.crl_sign(),
                    });
                }
                ParsedExtension::ExtendedKeyUsage(eku) => {
                    let mut usages = Vec::new();
                    let known = [
                        (eku.any, oids::ANY_EXTENDED_KEY_USAGE),
                        (eku.server_auth, oids::SERVER_AUTH),
                        (eku.client_auth, oids::CLIENT_AUTH),
                        (eku.code_signing, oids::CODE_SIGNING),
                        (eku.email_protection, oids::EMAIL_PROTECTION),
                        (eku.time_stamping, oids::TIME_STAMPING),
                        (eku.ocsp_signing, oids::OCSP_SIGNING),
                    ];
                    for (present, oid) in known {
                        if present {
                            usages.push(oid.to_string());
                        }
                    }
                    usages.extend(eku.other.iter().map(|oid| oid.to_id_string()));
                    cert.extended_key_usage = Some(usages);
                }
                ParsedExtension::SubjectKeyIdentifier(ki) => {
                    cert.subject_key_id = Some(ki.0.to_vec());
                }
                ParsedExtension::AuthorityKeyIdentifier(aki) => {
                    cert.authority_key_id = aki.key_identifier.as_ref().map(|ki| ki.0.to_vec());
                }
                ParsedExtension::AuthorityInfoAccess(aia) => {
                    for ad in &aia.accessdescs {
                        if let GeneralName::URI(uri) = &ad.access_location {
                            match ad.access_method.to_id_string().as_str() {
                                oids::AD_OCSP => cert.ocsp_urls.push(uri.to_string()),
                                oids::AD_CA_ISSUERS => cert.ca_issuer_urls.push(uri.to_string()),
                                _ => (),
                            }
                        }
                    }
                }
                ParsedExtension::CRLDistributionPoints(cdp) => {
                    for point in cdp.points.iter() {
                        if let Some(DistributionPointName::FullName(names)) =
                            &point.distribution_point
                        {
                            for name in names {
                                if let GeneralName::URI(uri) = name {
                                    cert.crl_distribution_points.push(uri.to_string());
                                }
                            }
                        }
                    }
                }
                _ => (),
            }
        }

        Ok(cert)
    }

    /// Decode every `CERTIFICATE` block in a PEM bundle.
    ///
    /// Blocks with other labels are skipped.
    pub fn from_pem_bundle(pem: &[u8]) -> Result<Vec<Self>, CryptoError> {
        let mut certs = Vec::new();

        for maybe_pem in Pem::iter_from_buffer(pem) {
            let pem = maybe_pem.map_err(|e| CryptoError::InvalidPem(e.to_string()))?;
            if pem.label == "CERTIFICATE" {
                certs.push(Self::from_der(&pem.contents)?);
            }
        }

        Ok(certs)
    }

    /// Return `true` if subject and issuer names are identical.
    pub fn is_self_issued(&self) -> bool {
        self.subject == self.issuer
    }

    /// Return `true` if an extension with the given OID is present.
    pub fn has_extension(&self, oid: &str) -> bool {
        self.extensions.iter().any(|ext| ext.oid == oid)
    }

    /// Return `true` if `time` lies within the validity period.
    pub fn is_valid_at(&self, time: DateTime<Utc>) -> bool {
        self.not_before <= time && time <= self.not_after
    }

    /// SHA-256 fingerprint of the DER encoding.
    pub fn fingerprint_sha256(&self) -> Vec<u8> {
        sha256(&self.der)
    }

    /// Serial number rendered as lowercase hex.
    pub fn serial_hex(&self) -> String {
        const_hex::encode(&self.serial)
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (serial {})", self.subject, self.serial_hex())
    }
}
