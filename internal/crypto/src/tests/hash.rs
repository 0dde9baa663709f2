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
    hash::{sha1, sha256},
    oids, DigestAlgorithm,
};

#[test]
fn test_sha1() {
    let hash = sha1(b"test message");
    assert_eq!(
        hash,
        [
            53, 238, 131, 134, 65, 13, 65, 209, 75, 63, 119, 159, 201, 95, 70, 149, 244, 133, 22,
            130
        ]
    );
}

#[test]
fn digest_algorithm_matches_free_functions() {
    assert_eq!(DigestAlgorithm::Sha1.digest(b"abc"), sha1(b"abc"));
    assert_eq!(DigestAlgorithm::Sha256.digest(b"abc"), sha256(b"abc"));
    assert_eq!(DigestAlgorithm::Sha384.digest(b"abc").len(), 48);
    assert_eq!(DigestAlgorithm::Sha512.digest(b"abc").len(), 64);
}

#[test]
fn digest_algorithm_from_oid() {
    assert_eq!(
        DigestAlgorithm::from_oid(oids::SHA256),
        Some(DigestAlgorithm::Sha256)
    );
    assert_eq!(
        DigestAlgorithm::from_oid(DigestAlgorithm::Sha1.oid()),
        Some(DigestAlgorithm::Sha1)
    );
    assert_eq!(DigestAlgorithm::from_oid("1.2.3.4"), None);
}
