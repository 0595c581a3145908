//! Chat responder over the business knowledge view

use crate::bot::intent::{classify, Intent};
use crate::storage::{load_knowledge, BusinessKnowledge, StorageResult};
use std::path::Path;

pub const DEFAULT_REPLY: &str = "Hi! I am MonAgent 🤖, currently under development~";
pub const GREETING_REPLY: &str = "Hello! Nice to meet you 😊";

/// Most testimonials or links quoted in one reply
const LIST_LIMIT: usize = 3;

/// Answers keyword questions from stored knowledge
///
/// Questions whose data is missing get the default reply.
#[derive(Debug, Clone, Default)]
pub struct ChatBot {
    knowledge: BusinessKnowledge,
}

impl ChatBot {
    pub fn new(knowledge: BusinessKnowledge) -> Self {
        Self { knowledge }
    }

    /// Builds a bot from the rows stored at `path`
    pub fn from_store(path: &Path) -> StorageResult<Self> {
        Ok(Self::new(load_knowledge(path)?))
    }

    pub fn reply(&self, message: &str) -> String {
        let intent = classify(message);
        tracing::debug!("Classified message as {}", intent.as_str());
        self.answer(intent)
            .unwrap_or_else(|| DEFAULT_REPLY.to_string())
    }

    fn answer(&self, intent: Intent) -> Option<String> {
        let k = &self.knowledge;
        match intent {
            Intent::Greeting => Some(GREETING_REPLY.to_string()),
            Intent::Address => k.address.as_ref().map(|a| format!("Our address is {}.", a)),
            Intent::Phone => k.phone.as_ref().map(|p| format!("You can call us at {}.", p)),
            Intent::Email => k.email.as_ref().map(|e| format!("You can email us at {}.", e)),
            Intent::Hours => k.hours.as_ref().map(|h| format!("Our hours: {}", h)),
            Intent::About => k.about.clone(),
            Intent::Join => k.join_info.clone().or_else(|| {
                k.member_fee_month()
                    .map(|fee| format!("Membership is ${:.2}/month.", fee))
            }),
            Intent::Review => {
                if k.testimonials.is_empty() {
                    return None;
                }
                let quoted: Vec<&str> = k
                    .testimonials
                    .iter()
                    .take(LIST_LIMIT)
                    .map(String::as_str)
                    .collect();
                Some(format!("What our clients say:\n{}", quoted.join("\n")))
            }
            Intent::UnitPrice(units) => self.unit_price(units),
            Intent::Pricing => k.pricing_summary.clone().or_else(|| self.price_list()),
            Intent::Links => {
                if k.links.is_empty() {
                    return None;
                }
                let lines: Vec<String> = k
                    .links
                    .iter()
                    .take(LIST_LIMIT)
                    .map(|link| match &link.text {
                        Some(text) => format!("{}: {}", text, link.url),
                        None => link.url.clone(),
                    })
                    .collect();
                Some(lines.join("\n"))
            }
            Intent::Unknown => None,
        }
    }

    fn unit_price(&self, units: u32) -> Option<String> {
        match self.knowledge.price_for_units(units) {
            Some(offer) => {
                let mut reply = format!("{} units cost ${:.2}.", offer.units, offer.price);
                if let Some(fee) = offer.member_fee_month {
                    reply.push_str(&format!(" Membership is ${:.2}/month.", fee));
                }
                Some(reply)
            }
            None => self
                .price_list()
                .map(|list| format!("We don't list a {}-unit option. {}", units, list)),
        }
    }

    fn price_list(&self) -> Option<String> {
        if self.knowledge.services.is_empty() {
            return None;
        }
        let offers: Vec<String> = self
            .knowledge
            .services
            .iter()
            .map(|s| format!("{} units ${:.2}", s.units, s.price))
            .collect();
        Some(format!("Our prices: {}.", offers.join(", ")))
    }
}
