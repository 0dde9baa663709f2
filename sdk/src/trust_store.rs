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

//! Trust anchors and the end-entity allow list.

use std::{collections::HashSet, io::BufRead, sync::Arc};

use certchain_crypto::{base64, Certificate, CryptoBackend, DistinguishedName};
use log::debug;

use crate::{settings::Trust, Error, Result};

/// Read-only lookup of trust anchors.
///
/// Implementations are shared between concurrent validation runs and must
/// not change while a run is in progress.
pub trait TrustStore: Send + Sync {
    /// Anchors whose subject equals `name`.
    fn find_by_subject(&self, name: &DistinguishedName) -> Vec<Arc<Certificate>>;

    /// Anchors whose subject key identifier equals `key_id`.
    fn find_by_key_id(&self, key_id: &[u8]) -> Vec<Arc<Certificate>>;

    /// Returns `true` if `cert` is a configured trust anchor.
    fn is_trust_anchor(&self, cert: &Certificate) -> bool;
}

/// In-memory [`TrustStore`] loaded from PEM bundles.
///
/// A certificate matches an anchor if their DER encodings are identical or if
/// subject name and public key are both identical (a re-issued anchor).
///
/// Certificates named in the end-entity allow list count as anchors of their
/// own one-certificate chain.
#[derive(Debug, Default)]
pub struct CertificateTrustStore {
    trust_anchors: Vec<Arc<Certificate>>,
    end_entity_cert_set: HashSet<String>,
}

impl CertificateTrustStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from the `trust` settings.
    pub fn from_settings(backend: &dyn CryptoBackend, trust: &Trust) -> Result<Self> {
        let mut store = Self::new();

        if let Some(anchors) = &trust.trust_anchors {
            store.add_trust_anchors(backend, anchors.as_bytes())?;
        }

        if let Some(allowed_list) = &trust.allowed_list {
            store.add_end_entity_credentials(allowed_list.as_bytes())?;
        }

        Ok(store)
    }

    /// Add every certificate in a PEM bundle as a trust anchor.
    pub fn add_trust_anchors(&mut self, backend: &dyn CryptoBackend, pems: &[u8]) -> Result<()> {
        let anchors = backend
            .parse_certificates_pem(pems)
            .map_err(|e| Error::TrustAnchorLoad(e.to_string()))?;

        debug!("loaded {} trust anchors", anchors.len());
        self.trust_anchors.extend(anchors.into_iter().map(Arc::new));
        Ok(())
    }

    /// Add a single parsed trust anchor.
    pub fn add_trust_anchor(&mut self, anchor: Certificate) {
        self.trust_anchors.push(Arc::new(anchor));
    }

    /// Add end-entity certificates to the allow list.
    ///
    /// `allowed` may mix PEM certificates and lines holding the base64
    /// SHA-256 hash of a certificate's DER encoding.
    pub fn add_end_entity_credentials(&mut self, allowed: &[u8]) -> Result<()> {
        let mut inside_pem_block = false;

        for line in allowed.lines().map_while(std::result::Result::ok) {
            let line = line.trim();
            if line.contains("-----BEGIN") {
                inside_pem_block = true;
            }
            if line.contains("-----END") {
                inside_pem_block = false;
                continue;
            }
            if !inside_pem_block && line.len() == 44 && base64::decode(line).is_ok() {
                self.end_entity_cert_set.insert(line.to_string());
            }
        }

        for cert_der in x509_pem_blocks(allowed)? {
            self.end_entity_cert_set
                .insert(base64_sha256_cert_der(&cert_der));
        }

        Ok(())
    }

    /// All configured anchors.
    pub fn trust_anchors(&self) -> &[Arc<Certificate>] {
        &self.trust_anchors
    }

    /// Returns `true` if `cert` is on the end-entity allow list.
    pub fn is_allowed_end_entity(&self, cert: &Certificate) -> bool {
        self.end_entity_cert_set
            .contains(&base64_sha256_cert_der(&cert.der))
    }

    /// Remove every anchor and allow-list entry.
    pub fn clear(&mut self) {
        self.trust_anchors.clear();
        self.end_entity_cert_set.clear();
    }
}

impl TrustStore for CertificateTrustStore {
    fn find_by_subject(&self, name: &DistinguishedName) -> Vec<Arc<Certificate>> {
        self.trust_anchors
            .iter()
            .filter(|anchor| &anchor.subject == name)
            .cloned()
            .collect()
    }

    fn find_by_key_id(&self, key_id: &[u8]) -> Vec<Arc<Certificate>> {
        self.trust_anchors
            .iter()
            .filter(|anchor| anchor.subject_key_id.as_deref() == Some(key_id))
            .cloned()
            .collect()
    }

    fn is_trust_anchor(&self, cert: &Certificate) -> bool {
        if self.is_allowed_end_entity(cert) {
            return true;
        }

        self.trust_anchors.iter().any(|anchor| {
            anchor.der == cert.der
                || (anchor.subject == cert.subject && anchor.spki_der == cert.spki_der)
        })
    }
}

// Decoded contents of every PEM block in `data`.
fn x509_pem_blocks(data: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut blocks = Vec::new();
    for maybe_pem in x509_parser::pem::Pem::iter_from_buffer(data) {
        match maybe_pem {
            Ok(pem) => blocks.push(pem.contents),
            Err(e) => return Err(Error::TrustAnchorLoad(e.to_string())),
        }
    }
    Ok(blocks)
}

fn base64_sha256_cert_der(cert_der: &[u8]) -> String {
    base64::encode(&certchain_crypto::hash::sha256(cert_der))
}
