use core::fmt;

use uuid::Uuid;

use crate::{CoreError, CoreResult};

/// Identifier of one video submission.
///
/// Each request owns the upload slot named after its id, so two submissions
/// in flight never share an input file.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", self.0)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// File name of a report inside the reports directory.
///
/// Only bare file names are accepted: no separators, no parent references.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct ReportName(String);

impl ReportName {
    pub fn parse(name: &str) -> CoreResult<Self> {
        let reason = if name.trim().is_empty() {
            Some("name is empty")
        } else if name.contains(|c: char| c == '/' || c == '\\') {
            Some("name contains a path separator")
        } else if name == "." || name == ".." {
            Some("name refers to a directory")
        } else if name.contains('\0') {
            Some("name contains a NUL byte")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(CoreError::InvalidReportName {
                name: name.to_string(),
                reason,
            }),
            None => Ok(Self(name.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name without a trailing `.csv`.
    pub fn stem(&self) -> &str {
        self.0.strip_suffix(".csv").unwrap_or(&self.0)
    }

    /// File name used when a report is exported to PDF.
    pub fn pdf_file_name(&self) -> String {
        format!("{}_report.pdf", self.stem())
    }
}

impl TryFrom<String> for ReportName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReportName> for String {
    fn from(value: ReportName) -> Self {
        value.0
    }
}

impl fmt::Debug for ReportName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReportName({})", self.0)
    }
}

impl fmt::Display for ReportName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_distinct() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), 32);
    }

    #[test]
    fn report_name_rejects_traversal() {
        for bad in ["", "  ", "..", ".", "../secrets.csv", "a/b.csv", "a\\b.csv"] {
            assert!(ReportName::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn pdf_name_drops_csv_extension() {
        let name = ReportName::parse("20240101_120000_potholes.csv").unwrap();
        assert_eq!(name.stem(), "20240101_120000_potholes");
        assert_eq!(name.pdf_file_name(), "20240101_120000_potholes_report.pdf");

        let bare = ReportName::parse("district-7").unwrap();
        assert_eq!(bare.pdf_file_name(), "district-7_report.pdf");
    }
}
