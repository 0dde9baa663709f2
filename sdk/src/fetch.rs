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

//! Retrieval of OCSP responses and CRLs.
//!
//! The validator never opens network connections itself. It asks a
//! [`ResourceFetcher`] supplied by the host application, which decides
//! whether to use the network, a cache, or nothing at all.

use std::{collections::HashMap, time::Duration};

use certchain_crypto::base64;
use thiserror::Error;
use url::Url;

/// Describes why a resource could not be retrieved.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum FetchError {
    /// The locator could not be reached or returned no usable content.
    #[error("{0} is unreachable")]
    Unreachable(String),

    /// The request did not complete before the deadline.
    #[error("request to {locator} timed out after {timeout:?}")]
    Timeout {
        /// The requested locator.
        locator: String,

        /// The deadline that was exceeded.
        timeout: Duration,
    },

    /// The response exceeded the configured size limit.
    #[error("response from {locator} is {size} bytes, over the {limit} byte limit")]
    TooLarge {
        /// The requested locator.
        locator: String,

        /// Size of the response.
        size: usize,

        /// Configured maximum.
        limit: usize,
    },
}

/// Retrieves raw bytes for an OCSP responder or CRL distribution point.
///
/// Implementations must honor `timeout` and return [`FetchError::Timeout`]
/// rather than block past it.
#[cfg_attr(test, mockall::automock)]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch the resource at `locator`.
    fn fetch(&self, locator: &Url, timeout: Duration) -> Result<Vec<u8>, FetchError>;
}

/// A fetcher for offline operation. Every locator is unreachable.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFetch;

impl ResourceFetcher for NoFetch {
    fn fetch(&self, locator: &Url, _timeout: Duration) -> Result<Vec<u8>, FetchError> {
        Err(FetchError::Unreachable(locator.to_string()))
    }
}

/// A fetcher that serves previously stored responses from memory.
///
/// Useful for replaying revocation data captured at signing time.
#[derive(Clone, Debug)]
pub struct CachedFetcher {
    entries: HashMap<String, Vec<u8>>,
    max_response_size: usize,
}

impl CachedFetcher {
    /// Create an empty cache that refuses entries larger than
    /// `max_response_size` bytes.
    pub fn new(max_response_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_response_size,
        }
    }

    /// Store the response for `locator`, replacing any previous one.
    pub fn insert(&mut self, locator: &Url, bytes: Vec<u8>) {
        self.entries.insert(locator.to_string(), bytes);
    }

    /// Number of stored responses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceFetcher for CachedFetcher {
    fn fetch(&self, locator: &Url, _timeout: Duration) -> Result<Vec<u8>, FetchError> {
        let Some(bytes) = self.entries.get(locator.as_str()) else {
            return Err(FetchError::Unreachable(locator.to_string()));
        };

        if bytes.len() > self.max_response_size {
            return Err(FetchError::TooLarge {
                locator: locator.to_string(),
                size: bytes.len(),
                limit: self.max_response_size,
            });
        }

        Ok(bytes.clone())
    }
}

/// Build the HTTP GET locator for an OCSP request: the base64 encoding of
/// the DER request, URL-encoded and appended to the responder URL.
pub fn ocsp_get_url(responder: &Url, request_der: &[u8]) -> Result<Url, url::ParseError> {
    let request_str: String =
        url::form_urlencoded::byte_serialize(base64::encode(request_der).as_bytes()).collect();

    let mut base = responder.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(&request_str)
}
