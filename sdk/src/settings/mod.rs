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

//! Validator configuration.
//!
//! A [`Settings`] value is built once (from defaults, TOML, or JSON) and
//! handed to the [`ChainValidator`]. Nothing is stored in global or
//! thread-local state.
//!
//! [`ChainValidator`]: crate::ChainValidator

use std::{
    io::{BufRead, BufReader, Cursor},
    time::Duration,
};

use certchain_crypto::{base64, CryptoBackendKind};
use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const VERSION: u32 = 1;

const MAX_CLOCK_SKEW_SECS: u64 = 24 * 60 * 60;

// trait used to validate user input to make sure user supplied configurations are valid
pub(crate) trait SettingsValidate {
    // returns error if settings are invalid
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Settings to configure the trust list.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema), schemars(default))]
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Trust {
    /// Trust anchor root certificates as a PEM bundle.
    pub trust_anchors: Option<String>,

    /// Explicitly allowed end-entity certificates, as a PEM bundle and/or
    /// lines of base64-encoded SHA-256 hashes of certificate DER.
    pub allowed_list: Option<String>,
}

impl Trust {
    // sanity check to see if can parse trust settings
    fn test_load_trust(&self, trust_data: &[u8]) -> Result<()> {
        let mut found_pem = false;
        for pem_result in x509_parser::pem::Pem::iter_from_buffer(trust_data) {
            pem_result.map_err(|e| Error::InvalidSettings(e.to_string()))?;
            found_pem = true;
        }

        if found_pem {
            return Ok(());
        }

        // otherwise expect base64 encoded SHA-256 hashes of certificate DER
        let buf_reader = BufReader::new(Cursor::new(trust_data));
        let found_der_hash = buf_reader
            .lines()
            .map_while(|line| line.ok())
            .any(|line| !line.is_empty() && base64::decode(line.trim()).is_ok());

        if found_der_hash {
            Ok(())
        } else {
            Err(Error::InvalidSettings(
                "trust list contains neither certificates nor hashes".into(),
            ))
        }
    }
}

impl SettingsValidate for Trust {
    fn validate(&self) -> Result<()> {
        if let Some(ta) = &self.trust_anchors {
            self.test_load_trust(ta.as_bytes())?;
        }

        if let Some(al) = &self.allowed_list {
            self.test_load_trust(al.as_bytes())?;
        }

        Ok(())
    }
}

/// Settings to configure the verification process.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema), schemars(default))]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Verify {
    /// Maximum number of certificates walked before giving up with
    /// "chain too long".
    ///
    /// The trust anchor counts toward the limit: a signer, one
    /// intermediate and a root need a depth of at least 3.
    ///
    /// The default value is 10.
    pub max_chain_depth: usize,

    /// Whether to stop at the first `INVALID` finding instead of collecting
    /// further diagnostics.
    ///
    /// The default value is false.
    pub stop_on_first_invalid: bool,

    /// Whether to check revocation status through OCSP and CRLs.
    ///
    /// The default value is true.
    pub check_revocation: bool,

    /// Whether missing or unusable revocation evidence makes a certificate
    /// `INVALID` rather than `INDETERMINATE`.
    ///
    /// The default value is false.
    pub indeterminate_revocation_is_invalid: bool,

    /// Extended key usage OIDs the signing certificate must carry.
    ///
    /// Empty by default, which disables the check.
    pub required_signer_ekus: Vec<String>,

    /// Tolerance applied to revocation freshness windows, in seconds.
    ///
    /// At most one day.
    pub clock_skew_secs: u64,
}

impl Default for Verify {
    fn default() -> Self {
        Self {
            max_chain_depth: 10,
            stop_on_first_invalid: false,
            check_revocation: true,
            indeterminate_revocation_is_invalid: false,
            required_signer_ekus: Vec::new(),
            clock_skew_secs: 0,
        }
    }
}

impl SettingsValidate for Verify {
    fn validate(&self) -> Result<()> {
        if self.max_chain_depth == 0 {
            return Err(Error::InvalidSettings(
                "max_chain_depth must be at least 1".into(),
            ));
        }

        if self.clock_skew_secs > MAX_CLOCK_SKEW_SECS {
            return Err(Error::InvalidSettings(format!(
                "clock_skew_secs must not exceed {MAX_CLOCK_SKEW_SECS}"
            )));
        }

        for eku in &self.required_signer_ekus {
            if !is_dotted_oid(eku) {
                return Err(Error::InvalidSettings(format!(
                    "required_signer_ekus contains invalid OID {eku:?}"
                )));
            }
        }

        Ok(())
    }
}

/// Settings for retrieving revocation data.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema), schemars(default))]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Fetch {
    /// Deadline passed to the resource fetcher for each request.
    ///
    /// The default value is 10 seconds.
    pub timeout_secs: u64,

    /// Largest OCSP response or CRL accepted, in bytes.
    ///
    /// The default value is 1 MB.
    pub max_response_size: usize,
}

impl Default for Fetch {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_response_size: 1024 * 1024,
        }
    }
}

impl SettingsValidate for Fetch {
    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::InvalidSettings("timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

/// Settings for choosing the cryptography backend.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema), schemars(default))]
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Crypto {
    /// Which backend to use.
    pub backend: CryptoBackendKind,
}

impl SettingsValidate for Crypto {}

/// Settings for configuring certificate chain validation.
#[cfg_attr(feature = "json_schema", derive(schemars::JsonSchema), schemars(default))]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Version of the configuration.
    pub version: u32,

    /// Trust anchors and allow list.
    pub trust: Trust,

    /// Verification behavior.
    pub verify: Verify,

    /// Revocation data retrieval.
    pub fetch: Fetch,

    /// Cryptography backend selection.
    pub crypto: Crypto,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: VERSION,
            trust: Trust::default(),
            verify: Verify::default(),
            fetch: Fetch::default(),
            crypto: Crypto::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a string in the given format ("json" or "toml").
    ///
    /// Values not mentioned keep their defaults.
    pub fn from_string(settings_str: &str, format: &str) -> Result<Self> {
        let f = match format.to_lowercase().as_str() {
            "json" => FileFormat::Json,
            "toml" => FileFormat::Toml,
            _ => return Err(Error::UnsupportedFormat(format.to_string())),
        };

        let defaults = Config::try_from(&Settings::default())
            .map_err(|e| Error::InvalidSettings(e.to_string()))?;

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(config::File::from_str(settings_str, f))
            .build() // merge overrides, allows for partial changes
            .map_err(|_e| Error::InvalidSettings("could not parse configuration".into()))?
            .try_deserialize::<Settings>()
            .map_err(|e| Error::InvalidSettings(e.to_string()))?;

        // sanity check the values before handing them out
        settings.validate()?;

        Ok(settings)
    }

    /// Parse settings from TOML.
    ///
    /// ```
    /// use certchain::settings::Settings;
    ///
    /// let settings = Settings::from_toml(
    ///     r#"
    ///     [verify]
    ///     max_chain_depth = 4
    /// "#,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(settings.verify.max_chain_depth, 4);
    /// assert!(settings.verify.check_revocation);
    /// ```
    pub fn from_toml(toml: &str) -> Result<Self> {
        Settings::from_string(toml, "toml")
    }

    /// Parse settings from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Settings::from_string(json, "json")
    }

    /// Check the settings for inconsistent values.
    pub fn check(&self) -> Result<()> {
        self.validate()
    }

    /// Per-request fetch deadline.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_secs)
    }

    /// Freshness tolerance for revocation data.
    pub fn clock_skew(&self) -> chrono::Duration {
        i64::try_from(self.verify.clock_skew_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or_else(chrono::Duration::zero)
    }
}

impl SettingsValidate for Settings {
    fn validate(&self) -> Result<()> {
        if self.version > VERSION {
            return Err(Error::InvalidSettings("settings version too new".into()));
        }
        self.trust.validate()?;
        self.verify.validate()?;
        self.fetch.validate()?;
        self.crypto.validate()
    }
}

fn is_dotted_oid(oid: &str) -> bool {
    let arcs: Vec<&str> = oid.split('.').collect();
    arcs.len() >= 2
        && arcs
            .iter()
            .all(|arc| !arc.is_empty() && arc.bytes().all(|b| b.is_ascii_digit()))
}
