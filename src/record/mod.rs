//! Normalized row model
//!
//! Parsing produces [`NormalizedRow`]s: shared provenance and labeling fields
//! plus a [`RecordKind`] that carries only the fields meaningful for its
//! record type. The wide, nullable CSV shape lives in [`FlatRow`] and is only
//! used at the storage boundary.

mod flat;

pub use flat::{FlatRow, COLUMNS};

use std::fmt;

/// Record type tag, as written to the `type` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    Service,
    About,
    JoinInfo,
    PricingSummary,
    Testimonial,
    Link,
    Generic,
}

impl RecordType {
    /// Converts the record type to its storage string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::About => "about",
            Self::JoinInfo => "join_info",
            Self::PricingSummary => "pricing_summary",
            Self::Testimonial => "testimonial",
            Self::Link => "link",
            Self::Generic => "generic",
        }
    }

    /// Parses a record type from its storage string
    ///
    /// Returns None if the string doesn't match any known type.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "service" => Some(Self::Service),
            "about" => Some(Self::About),
            "join_info" => Some(Self::JoinInfo),
            "pricing_summary" => Some(Self::PricingSummary),
            "testimonial" => Some(Self::Testimonial),
            "link" => Some(Self::Link),
            "generic" => Some(Self::Generic),
            _ => None,
        }
    }

    pub fn all() -> [Self; 7] {
        [
            Self::Service,
            Self::About,
            Self::JoinInfo,
            Self::PricingSummary,
            Self::Testimonial,
            Self::Link,
            Self::Generic,
        ]
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact details broadcast onto service rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactDetails {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub hours: Option<String>,
}

/// Type-specific payload of a row
#[derive(Debug, Clone, PartialEq)]
pub enum RecordKind {
    /// A unit count sold at a price
    Service {
        units: u32,
        price: f64,
        member_fee_month: Option<f64>,
        content: Option<String>,
        contact: ContactDetails,
    },
    About {
        content: String,
    },
    JoinInfo {
        content: String,
    },
    PricingSummary {
        content: String,
    },
    Testimonial {
        content: String,
    },
    Link {
        text: Option<String>,
        url: String,
    },
    Generic {
        content: Option<String>,
    },
}

impl RecordKind {
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::Service { .. } => RecordType::Service,
            Self::About { .. } => RecordType::About,
            Self::JoinInfo { .. } => RecordType::JoinInfo,
            Self::PricingSummary { .. } => RecordType::PricingSummary,
            Self::Testimonial { .. } => RecordType::Testimonial,
            Self::Link { .. } => RecordType::Link,
            Self::Generic { .. } => RecordType::Generic,
        }
    }

    /// Free text carried by the row, if its type has any
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Service { content, .. } | Self::Generic { content } => content.as_deref(),
            Self::About { content }
            | Self::JoinInfo { content }
            | Self::PricingSummary { content }
            | Self::Testimonial { content } => Some(content),
            Self::Link { .. } => None,
        }
    }
}

/// One unit of extracted knowledge
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub section_label: Option<String>,
    pub title: Option<String>,
    /// Normalized URL the row was derived from
    pub source_url: String,
    pub kind: RecordKind,
}

impl NormalizedRow {
    pub fn new(source_url: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            section_label: None,
            title: None,
            source_url: source_url.into(),
            kind,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.section_label = non_empty(label);
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title.and_then(non_empty);
        self
    }

    pub fn record_type(&self) -> RecordType {
        self.kind.record_type()
    }
}

/// Keeps `Some` only for non-blank text
///
/// A blank string and a missing value are indistinguishable once stored.
pub fn non_empty(text: impl Into<String>) -> Option<String> {
    let text = text.into();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_roundtrip() {
        for kind in RecordType::all() {
            assert_eq!(RecordType::from_str_opt(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_record_type_invalid() {
        assert_eq!(RecordType::from_str_opt("invalid"), None);
        assert_eq!(RecordType::from_str_opt(""), None);
    }

    #[test]
    fn test_kind_content() {
        let about = RecordKind::About {
            content: "We are nurses".to_string(),
        };
        assert_eq!(about.content(), Some("We are nurses"));
        assert_eq!(about.record_type(), RecordType::About);

        let link = RecordKind::Link {
            text: None,
            url: "https://example.com/".to_string(),
        };
        assert_eq!(link.content(), None);
    }

    #[test]
    fn test_builders_drop_blank_text() {
        let row = NormalizedRow::new("https://example.com/", RecordKind::Generic { content: None })
            .with_label("")
            .with_title(Some("   ".to_string()));
        assert_eq!(row.section_label, None);
        assert_eq!(row.title, None);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("x"), Some("x".to_string()));
    }
}
