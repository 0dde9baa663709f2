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

//! This module binds Rust native logic for generating and validating raw
//! signatures to this crate's [`RawSigner`] and [`RawSignatureValidator`]
//! traits.
//!
//! [`RawSigner`]: crate::raw_signature::RawSigner
//! [`RawSignatureValidator`]: crate::raw_signature::RawSignatureValidator

pub(crate) mod signers;
pub(crate) mod validators;
