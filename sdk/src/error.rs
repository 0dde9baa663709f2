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

use certchain_crypto::CryptoError;
use thiserror::Error;

/// Errors raised for configuration and programming mistakes.
///
/// Problems with the certificates being validated are never reported this
/// way. They are recorded as items in the
/// [`ValidationReport`](crate::report::ValidationReport).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The settings could not be parsed or contain inconsistent values.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// A trust anchor or allow-list bundle could not be loaded.
    #[error("unable to load trust anchors: {0}")]
    TrustAnchorLoad(String),

    /// The requested input or settings format is not supported.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Configuration material could not be decoded by the crypto backend.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// A specialized `Result` type for chain validation configuration.
pub type Result<T> = std::result::Result<T, Error>;
