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

//! The report produced by a validation run.

use std::fmt;

use log::{info, warn};
use serde::Serialize;

mod item;
pub use item::{CertificateReportItem, ReportEntry, ReportItem, ReportItemStatus};

/// Overall verdict derived from a [`ValidationReport`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationResult {
    /// No item is `INVALID` or `INDETERMINATE`.
    Valid,

    /// At least one item is `INDETERMINATE` and none is `INVALID`.
    Indeterminate,

    /// At least one item is `INVALID`.
    Invalid,
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Valid => "VALID",
            Self::Indeterminate => "INDETERMINATE",
            Self::Invalid => "INVALID",
        })
    }
}

/// `ErrorBehavior` configures whether a validation run keeps going after
/// the first `INVALID` finding.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ErrorBehavior {
    /// Stop as soon as the report contains an `INVALID` item.
    StopOnFirstInvalid,

    /// Record the finding and keep collecting diagnostics.
    #[default]
    ContinueWhenPossible,
}

/// An append-only, ordered log of validation findings.
///
/// The verdict is never stored. [`get_validation_result`] derives it from
/// the items each time it is called.
///
/// A report belongs to a single validation run and is not meant to be
/// shared between concurrent writers. Use [`merge`] to combine reports
/// from independent runs.
///
/// [`get_validation_result`]: Self::get_validation_result
/// [`merge`]: Self::merge
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ValidationReport {
    items: Vec<ReportEntry>,

    #[serde(skip)]
    error_behavior: ErrorBehavior,
}

impl ValidationReport {
    /// Returns a [`ValidationReport`] with the specified [`ErrorBehavior`].
    pub fn with_error_behavior(error_behavior: ErrorBehavior) -> Self {
        Self {
            items: vec![],
            error_behavior,
        }
    }

    /// Append a finding.
    pub fn add_report_item(&mut self, item: impl Into<ReportEntry>) {
        let entry = item.into();

        match entry.status() {
            ReportItemStatus::Info => info!("Validation info: {entry}"),
            _ => warn!("Validation finding: {entry}"),
        }

        self.items.push(entry);
    }

    /// Append every item of `other`, preserving order.
    pub fn merge(&mut self, other: &ValidationReport) {
        self.items.extend(other.items.iter().cloned());
    }

    /// All items in insertion order.
    pub fn items(&self) -> &[ReportEntry] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The verdict: `INVALID` if any item is invalid, else `INDETERMINATE`
    /// if any item is indeterminate, else `VALID`.
    pub fn get_validation_result(&self) -> ValidationResult {
        match self.items.iter().map(|entry| entry.status()).max() {
            Some(ReportItemStatus::Invalid) => ValidationResult::Invalid,
            Some(ReportItemStatus::Indeterminate) => ValidationResult::Indeterminate,
            Some(ReportItemStatus::Info) | None => ValidationResult::Valid,
        }
    }

    /// Items that are `INVALID` or `INDETERMINATE`, in insertion order.
    pub fn get_failures(&self) -> Vec<&ReportEntry> {
        self.items
            .iter()
            .filter(|entry| entry.status() != ReportItemStatus::Info)
            .collect()
    }

    /// Certificate items that are `INVALID` or `INDETERMINATE`.
    pub fn get_certificate_failures(&self) -> Vec<&CertificateReportItem> {
        self.get_certificate_logs()
            .into_iter()
            .filter(|cert_item| cert_item.item().status() != ReportItemStatus::Info)
            .collect()
    }

    /// Every certificate item, whatever its status.
    pub fn get_certificate_logs(&self) -> Vec<&CertificateReportItem> {
        self.items
            .iter()
            .filter_map(ReportEntry::as_certificate_item)
            .collect()
    }

    /// Raise every `INDETERMINATE` item to `INVALID`.
    ///
    /// Used for policies that refuse to accept missing revocation evidence.
    pub fn downgrade_indeterminate_to_invalid(&mut self) {
        for entry in &mut self.items {
            if entry.status() == ReportItemStatus::Indeterminate {
                entry.item_mut().downgrade(ReportItemStatus::Invalid);
            }
        }
    }

    /// Returns `true` if the run should stop now under the configured
    /// [`ErrorBehavior`].
    pub fn should_stop(&self) -> bool {
        self.error_behavior == ErrorBehavior::StopOnFirstInvalid
            && self.get_validation_result() == ValidationResult::Invalid
    }

    pub(crate) fn error_behavior(&self) -> ErrorBehavior {
        self.error_behavior
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation result: {}", self.get_validation_result())?;
        for entry in &self.items {
            writeln!(f, "  {entry}")?;
        }
        Ok(())
    }
}
