use serde::Deserialize;

/// Site extraction configuration, one per named TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Human readable site name, used in logs and run summaries
    pub site_name: String,

    /// The page to extract
    pub target_url: String,

    /// Fetch strategy
    #[serde(default)]
    pub mode: FetchMode,

    /// Drop the query component of `target_url` before fetching
    #[serde(default = "default_true")]
    pub strip_query_params: bool,

    /// Parse strategy
    #[serde(default)]
    pub parse_mode: ParseMode,

    /// Browser used by the rendered strategy; only "chrome" is implemented
    #[serde(default = "default_browser")]
    pub browser: String,

    /// Rendered fetch attempts (>= 1)
    #[serde(default = "default_retry")]
    pub retry: u32,

    /// Seconds to wait between rendered fetch attempts
    #[serde(default = "default_delay")]
    pub delay: f64,

    /// User agent token evaluated against robots.txt groups
    #[serde(default = "default_crawler_identity")]
    pub crawler_identity: String,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    /// Title/price selectors for the generic parse strategy
    #[serde(default)]
    pub selectors: Option<SelectorConfig>,

    #[serde(default)]
    pub structured: StructuredConfig,
}

/// Which fetcher a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Single HTTP GET
    #[default]
    Static,
    /// Headless browser snapshot after lazy-load scrolling
    Dynamic,
}

impl FetchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
        }
    }
}

/// Which parser a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Caller-declared title/price selector pairs
    #[default]
    Generic,
    /// Visible-text patterns plus labeled content blocks
    Structured,
}

/// Output location
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path of the CSV file written by each run
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Network and browser tunables
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Direct fetch request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Pause after every direct fetch
    #[serde(default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    /// WebDriver endpoint (chromedriver)
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_true")]
    pub headless: bool,

    /// Element whose presence marks the page as rendered
    #[serde(default = "default_ready_selector")]
    pub ready_selector: String,

    #[serde(default = "default_ready_timeout_secs")]
    pub ready_timeout_secs: u64,

    /// Scroll-to-bottom passes used to trigger lazy-loaded widgets
    #[serde(default = "default_scroll_passes")]
    pub scroll_passes: u32,

    #[serde(default = "default_scroll_delay_ms")]
    pub scroll_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            politeness_delay_ms: default_politeness_delay_ms(),
            webdriver_url: default_webdriver_url(),
            headless: true,
            ready_selector: default_ready_selector(),
            ready_timeout_secs: default_ready_timeout_secs(),
            scroll_passes: default_scroll_passes(),
            scroll_delay_ms: default_scroll_delay_ms(),
        }
    }
}

/// CSS selectors for the generic parse strategy
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    pub title: String,
    pub price: String,
}

/// Settings for the structured-text parse strategy
#[derive(Debug, Clone, Deserialize)]
pub struct StructuredConfig {
    /// Section label written on service rows
    #[serde(default = "default_service_label")]
    pub service_label: String,

    #[serde(default)]
    pub service_title: Option<String>,

    /// Short description written into service rows' content
    #[serde(default)]
    pub service_tagline: Option<String>,

    /// City token that must appear on an address line
    #[serde(default)]
    pub locality: Option<String>,

    /// Region tokens, one of which must share the line with `locality`
    #[serde(default)]
    pub region_tokens: Vec<String>,

    /// Inline font-size marking a block title
    #[serde(default = "default_title_font_size")]
    pub title_font_size: String,

    /// Inline font-size marking a block body
    #[serde(default = "default_body_font_size")]
    pub body_font_size: String,

    /// Lowercase title phrases that open an "about" section
    #[serde(default = "default_about_headings")]
    pub about_headings: Vec<String>,

    #[serde(default)]
    pub rules: BlockRules,
}

impl Default for StructuredConfig {
    fn default() -> Self {
        Self {
            service_label: default_service_label(),
            service_title: None,
            service_tagline: None,
            locality: None,
            region_tokens: Vec::new(),
            title_font_size: default_title_font_size(),
            body_font_size: default_body_font_size(),
            about_headings: default_about_headings(),
            rules: BlockRules::default(),
        }
    }
}

/// Phrase rules used to classify labeled content blocks
///
/// A category matches when any of its rules matches. Checked in field order.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockRules {
    #[serde(default = "default_membership_rules")]
    pub membership: Vec<PhraseRule>,

    #[serde(default = "default_pricing_rules")]
    pub pricing: Vec<PhraseRule>,

    /// Only consulted for bodies that follow an "about" heading
    #[serde(default = "default_about_rules")]
    pub about: Vec<PhraseRule>,

    #[serde(default = "default_testimonial_rules")]
    pub testimonial: Vec<PhraseRule>,
}

impl Default for BlockRules {
    fn default() -> Self {
        Self {
            membership: default_membership_rules(),
            pricing: default_pricing_rules(),
            about: default_about_rules(),
            testimonial: default_testimonial_rules(),
        }
    }
}

/// Lowercase phrase conjunction: every `all` phrase and at least one `any`
/// phrase (when `any` is non-empty) must occur in the text
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhraseRule {
    #[serde(default)]
    pub all: Vec<String>,
    #[serde(default)]
    pub any: Vec<String>,
}

impl PhraseRule {
    pub fn all_of(phrases: &[&str]) -> Self {
        Self {
            all: phrases.iter().map(|p| p.to_string()).collect(),
            any: Vec::new(),
        }
    }

    pub fn any_of(phrases: &[&str]) -> Self {
        Self {
            all: Vec::new(),
            any: phrases.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Tests the rule against already-lowercased text
    pub fn matches(&self, lower: &str) -> bool {
        self.all.iter().all(|p| lower.contains(p.as_str()))
            && (self.any.is_empty() || self.any.iter().any(|p| lower.contains(p.as_str())))
    }
}

fn default_true() -> bool {
    true
}

fn default_browser() -> String {
    "chrome".to_string()
}

fn default_retry() -> u32 {
    2
}

fn default_delay() -> f64 {
    3.0
}

fn default_crawler_identity() -> String {
    "MonAgentCrawler".to_string()
}

fn default_storage_path() -> String {
    "output.csv".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_politeness_delay_ms() -> u64 {
    1200
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".to_string()
}

fn default_ready_selector() -> String {
    "footer".to_string()
}

fn default_ready_timeout_secs() -> u64 {
    20
}

fn default_scroll_passes() -> u32 {
    4
}

fn default_scroll_delay_ms() -> u64 {
    1800
}

fn default_service_label() -> String {
    "Service".to_string()
}

fn default_title_font_size() -> String {
    "40px".to_string()
}

fn default_body_font_size() -> String {
    "22px".to_string()
}

fn default_about_headings() -> Vec<String> {
    vec!["about us".to_string()]
}

fn default_membership_rules() -> Vec<PhraseRule> {
    vec![PhraseRule::any_of(&["memberships are just", "membership"])]
}

fn default_pricing_rules() -> Vec<PhraseRule> {
    vec![PhraseRule {
        all: vec!["we charge".to_string()],
        any: vec!["botox".to_string(), "dysport".to_string()],
    }]
}

fn default_about_rules() -> Vec<PhraseRule> {
    vec![PhraseRule::default()]
}

fn default_testimonial_rules() -> Vec<PhraseRule> {
    vec![
        PhraseRule::any_of(&["review"]),
        PhraseRule::all_of(&["google", "stars"]),
    ]
}
