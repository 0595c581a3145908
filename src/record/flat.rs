use crate::record::{ContactDetails, NormalizedRow, RecordKind, RecordType};
use crate::storage::StorageError;
use serde::{Deserialize, Serialize};

/// CSV header, in column order
pub const COLUMNS: [&str; 14] = [
    "record_type",
    "section_label",
    "title",
    "content",
    "units",
    "price",
    "member_fee_month",
    "phone",
    "email",
    "address",
    "hours",
    "link_text",
    "link_url",
    "source_url",
];

/// Wide storage shape of a row: every field of every record type, nullable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    #[serde(alias = "type")]
    pub record_type: String,
    pub section_label: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub units: Option<u32>,
    pub price: Option<f64>,
    pub member_fee_month: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub hours: Option<String>,
    pub link_text: Option<String>,
    pub link_url: Option<String>,
    pub source_url: String,
}

impl From<&NormalizedRow> for FlatRow {
    fn from(row: &NormalizedRow) -> Self {
        let mut flat = FlatRow {
            record_type: row.record_type().as_str().to_string(),
            section_label: row.section_label.clone(),
            title: row.title.clone(),
            content: row.kind.content().map(str::to_string),
            source_url: row.source_url.clone(),
            ..Default::default()
        };

        match &row.kind {
            RecordKind::Service {
                units,
                price,
                member_fee_month,
                contact,
                ..
            } => {
                flat.units = Some(*units);
                flat.price = Some(*price);
                flat.member_fee_month = *member_fee_month;
                flat.phone = contact.phone.clone();
                flat.email = contact.email.clone();
                flat.address = contact.address.clone();
                flat.hours = contact.hours.clone();
            }
            RecordKind::Link { text, url } => {
                flat.link_text = text.clone();
                flat.link_url = Some(url.clone());
            }
            _ => {}
        }

        flat
    }
}

impl TryFrom<FlatRow> for NormalizedRow {
    type Error = StorageError;

    fn try_from(flat: FlatRow) -> Result<Self, Self::Error> {
        let record_type = RecordType::from_str_opt(flat.record_type.trim()).ok_or_else(|| {
            StorageError::Serialization(format!("Unknown record type '{}'", flat.record_type))
        })?;

        let kind = match record_type {
            RecordType::Service => {
                let (units, price) = match (flat.units, flat.price) {
                    (Some(units), Some(price)) => (units, price),
                    _ => {
                        return Err(StorageError::Serialization(
                            "service row must carry both units and price".to_string(),
                        ))
                    }
                };
                RecordKind::Service {
                    units,
                    price,
                    member_fee_month: flat.member_fee_month,
                    content: flat.content,
                    contact: ContactDetails {
                        phone: flat.phone,
                        email: flat.email,
                        address: flat.address,
                        hours: flat.hours,
                    },
                }
            }
            RecordType::About => RecordKind::About {
                content: flat.content.unwrap_or_default(),
            },
            RecordType::JoinInfo => RecordKind::JoinInfo {
                content: flat.content.unwrap_or_default(),
            },
            RecordType::PricingSummary => RecordKind::PricingSummary {
                content: flat.content.unwrap_or_default(),
            },
            RecordType::Testimonial => RecordKind::Testimonial {
                content: flat.content.unwrap_or_default(),
            },
            RecordType::Link => RecordKind::Link {
                text: flat.link_text,
                url: flat.link_url.unwrap_or_default(),
            },
            RecordType::Generic => RecordKind::Generic {
                content: flat.content,
            },
        };

        Ok(NormalizedRow {
            section_label: flat.section_label,
            title: flat.title,
            source_url: flat.source_url,
            kind,
        })
    }
}
