//! Keyword intent classification
//!
//! Plain substring matching over the lowercased message, English and
//! Chinese keywords side by side. The first matching intent wins.

use regex::Regex;
use std::sync::LazyLock;

static UNITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*units?").expect("Failed to compile units regex"));

const ADDRESS: &[&str] = &["address", "在哪", "location", "where"];
const PHONE: &[&str] = &["phone", "電話", "call"];
const EMAIL: &[&str] = &["email", "mail"];
const HOURS: &[&str] = &["hours", "open", "營業", "時間"];
const ABOUT: &[&str] = &["about", "你們是誰", "介紹", "who are you"];
const JOIN: &[&str] = &["member", "membership", "加入", "會員"];
const REVIEW: &[&str] = &["review", "評論", "評價"];
const PRICING: &[&str] = &["botox", "dysport", "價格", "price", "cost"];
const LINKS: &[&str] = &["link", "website", "book", "預約"];
const GREETING_WORDS: &[&str] = &["hi", "hello", "hey"];
const GREETING_PHRASES: &[&str] = &["你好", "哈囉"];

/// What the user is asking about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Address,
    Phone,
    Email,
    Hours,
    About,
    Join,
    Review,
    /// Price of a specific unit bundle
    UnitPrice(u32),
    Pricing,
    Links,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Hours => "hours",
            Self::About => "about",
            Self::Join => "join",
            Self::Review => "review",
            Self::UnitPrice(_) => "unit_price",
            Self::Pricing => "pricing",
            Self::Links => "links",
            Self::Unknown => "unknown",
        }
    }
}

/// Classifies a message
///
/// Greetings are matched on whole words and only when nothing more specific
/// matched, so "hi, where are you?" is an address question.
pub fn classify(message: &str) -> Intent {
    let msg = message.trim().to_lowercase();
    let has = |keywords: &[&str]| keywords.iter().any(|k| msg.contains(k));

    if has(ADDRESS) {
        return Intent::Address;
    }
    if has(PHONE) {
        return Intent::Phone;
    }
    if has(EMAIL) {
        return Intent::Email;
    }
    if has(HOURS) {
        return Intent::Hours;
    }
    if has(ABOUT) {
        return Intent::About;
    }
    if has(JOIN) {
        return Intent::Join;
    }
    if has(REVIEW) {
        return Intent::Review;
    }
    if let Some(units) = UNITS_RE
        .captures(&msg)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
    {
        return Intent::UnitPrice(units);
    }
    if has(PRICING) {
        return Intent::Pricing;
    }
    if has(LINKS) {
        return Intent::Links;
    }

    let greeting_word = msg
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| GREETING_WORDS.contains(&word));
    if greeting_word || has(GREETING_PHRASES) {
        return Intent::Greeting;
    }

    Intent::Unknown
}
