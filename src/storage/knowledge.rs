//! Business knowledge view
//!
//! A read-only projection of stored rows grouped by record type. The
//! responder rebuilds it from storage on every load.

use crate::record::{NormalizedRow, RecordKind};

/// One priced unit bundle
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOffer {
    pub units: u32,
    pub price: f64,
    pub member_fee_month: Option<f64>,
}

/// A stored hyperlink
#[derive(Debug, Clone, PartialEq)]
pub struct LinkEntry {
    pub text: Option<String>,
    pub url: String,
}

/// Everything the responder knows about the business
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessKnowledge {
    pub about: Option<String>,
    pub join_info: Option<String>,
    pub pricing_summary: Option<String>,
    pub services: Vec<ServiceOffer>,
    pub testimonials: Vec<String>,
    pub links: Vec<LinkEntry>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub hours: Option<String>,
}

impl BusinessKnowledge {
    /// Groups rows by type
    ///
    /// Storage order matters: single-valued fields keep the first value seen.
    pub fn from_rows(rows: &[NormalizedRow]) -> Self {
        let mut view = Self::default();

        for row in rows {
            match &row.kind {
                RecordKind::Service {
                    units,
                    price,
                    member_fee_month,
                    contact,
                    ..
                } => {
                    view.services.push(ServiceOffer {
                        units: *units,
                        price: *price,
                        member_fee_month: *member_fee_month,
                    });
                    first_wins(&mut view.address, &contact.address);
                    first_wins(&mut view.phone, &contact.phone);
                    first_wins(&mut view.email, &contact.email);
                    first_wins(&mut view.hours, &contact.hours);
                }
                RecordKind::About { content } => {
                    first_wins(&mut view.about, &Some(content.clone()))
                }
                RecordKind::JoinInfo { content } => {
                    first_wins(&mut view.join_info, &Some(content.clone()))
                }
                RecordKind::PricingSummary { content } => {
                    first_wins(&mut view.pricing_summary, &Some(content.clone()))
                }
                RecordKind::Testimonial { content } => view.testimonials.push(content.clone()),
                RecordKind::Link { text, url } => view.links.push(LinkEntry {
                    text: text.clone(),
                    url: url.clone(),
                }),
                RecordKind::Generic { .. } => {}
            }
        }

        view
    }

    /// Looks up the price of an exact unit bundle
    pub fn price_for_units(&self, units: u32) -> Option<&ServiceOffer> {
        self.services.iter().find(|s| s.units == units)
    }

    /// Monthly membership fee, taken from the first service that carries one
    pub fn member_fee_month(&self) -> Option<f64> {
        self.services.iter().find_map(|s| s.member_fee_month)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn first_wins(slot: &mut Option<String>, candidate: &Option<String>) {
    if slot.is_none() {
        if let Some(value) = candidate.as_ref().filter(|v| !v.trim().is_empty()) {
            *slot = Some(value.clone());
        }
    }
}
