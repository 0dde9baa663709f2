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

use chrono::{DateTime, FixedOffset, Utc};
use x509_parser::time::ASN1Time;

use crate::CryptoError;

/// Convert an X.509 time value to UTC.
pub(crate) fn from_asn1_time(time: ASN1Time) -> Result<DateTime<Utc>, CryptoError> {
    DateTime::from_timestamp(time.timestamp(), 0)
        .ok_or_else(|| CryptoError::InvalidTime(time.to_string()))
}

/// Convert an ASN.1 `GeneralizedTime` as decoded by `rasn` to UTC.
pub(crate) fn from_generalized_time(time: &DateTime<FixedOffset>) -> DateTime<Utc> {
    time.with_timezone(&Utc)
}
