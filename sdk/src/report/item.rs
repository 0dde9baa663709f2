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

use std::{borrow::Cow, fmt, sync::Arc};

use certchain_crypto::Certificate;
use serde::{Serialize, Serializer};

/// Severity of a single finding.
///
/// Ordered from least to most severe.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportItemStatus {
    /// Informational; does not affect the verdict.
    Info,

    /// Validity could not be established either way.
    Indeterminate,

    /// Validation failed.
    Invalid,
}

impl fmt::Display for ReportItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Indeterminate => "INDETERMINATE",
            Self::Invalid => "INVALID",
        })
    }
}

/// One finding of a validation run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ReportItem {
    /// Name of the check that produced this item.
    pub check_name: Cow<'static, str>,

    /// What was found.
    pub message: String,

    /// Rendered error that caused this finding, if any.
    pub cause: Option<String>,

    status: ReportItemStatus,
}

impl ReportItem {
    /// Create a new item.
    pub fn new<C, M>(check_name: C, message: M, status: ReportItemStatus) -> Self
    where
        C: Into<Cow<'static, str>>,
        M: Into<String>,
    {
        Self {
            check_name: check_name.into(),
            message: message.into(),
            cause: None,
            status,
        }
    }

    /// Create an `INFO` item.
    pub fn info(check_name: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(check_name, message, ReportItemStatus::Info)
    }

    /// Create an `INDETERMINATE` item.
    pub fn indeterminate(
        check_name: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(check_name, message, ReportItemStatus::Indeterminate)
    }

    /// Create an `INVALID` item.
    pub fn invalid(check_name: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::new(check_name, message, ReportItemStatus::Invalid)
    }

    /// Attach the error that caused this finding.
    pub fn with_cause<E: std::error::Error + ?Sized>(self, err: &E) -> Self {
        Self {
            cause: Some(err.to_string()),
            ..self
        }
    }

    /// Current severity.
    pub fn status(&self) -> ReportItemStatus {
        self.status
    }

    /// Raise the severity to `status`.
    ///
    /// Never lowers it: downgrading an `INVALID` item to `INDETERMINATE`
    /// leaves it `INVALID`.
    pub fn downgrade(&mut self, status: ReportItemStatus) {
        self.status = self.status.max(status);
    }
}

impl fmt::Display for ReportItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status, self.check_name, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " (caused by: {cause})")?;
        }
        Ok(())
    }
}

/// A [`ReportItem`] about one specific certificate.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CertificateReportItem {
    #[serde(flatten)]
    item: ReportItem,

    #[serde(serialize_with = "serialize_certificate")]
    certificate: Arc<Certificate>,
}

impl CertificateReportItem {
    /// Attach `item` to `certificate`.
    pub fn new(certificate: &Arc<Certificate>, item: ReportItem) -> Self {
        Self {
            item,
            certificate: Arc::clone(certificate),
        }
    }

    /// The finding.
    pub fn item(&self) -> &ReportItem {
        &self.item
    }

    /// The certificate the finding is about.
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }
}

impl fmt::Display for CertificateReportItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let item = &self.item;
        write!(
            f,
            "{} {}: {} [certificate: {}]",
            item.status, item.check_name, item.message, self.certificate
        )?;
        if let Some(cause) = &item.cause {
            write!(f, " (caused by: {cause})")?;
        }
        Ok(())
    }
}

fn serialize_certificate<S: Serializer>(
    certificate: &Arc<Certificate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&certificate.to_string())
}

/// An entry in a [`ValidationReport`].
///
/// [`ValidationReport`]: crate::report::ValidationReport
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportEntry {
    /// A finding not tied to a certificate.
    Item(ReportItem),

    /// A finding about one certificate.
    Certificate(CertificateReportItem),
}

impl ReportEntry {
    /// The underlying finding.
    pub fn item(&self) -> &ReportItem {
        match self {
            Self::Item(item) => item,
            Self::Certificate(cert_item) => &cert_item.item,
        }
    }

    pub(crate) fn item_mut(&mut self) -> &mut ReportItem {
        match self {
            Self::Item(item) => item,
            Self::Certificate(cert_item) => &mut cert_item.item,
        }
    }

    /// Severity of the finding.
    pub fn status(&self) -> ReportItemStatus {
        self.item().status
    }

    /// The certificate-specific view, if this entry has one.
    pub fn as_certificate_item(&self) -> Option<&CertificateReportItem> {
        match self {
            Self::Item(_) => None,
            Self::Certificate(cert_item) => Some(cert_item),
        }
    }
}

impl From<ReportItem> for ReportEntry {
    fn from(item: ReportItem) -> Self {
        Self::Item(item)
    }
}

impl From<CertificateReportItem> for ReportEntry {
    fn from(item: CertificateReportItem) -> Self {
        Self::Certificate(item)
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(item) => item.fmt(f),
            Self::Certificate(cert_item) => cert_item.fmt(f),
        }
    }
}
