//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote price table access settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Site-wide limits and defaults
    #[serde(default)]
    pub site: SiteConfig,

    /// Featured-products carousel behavior
    #[serde(default)]
    pub carousel: CarouselConfig,

    /// Ordered category keyword rules (first match wins)
    #[serde(default = "defaults::categories")]
    pub categories: Vec<CategoryRule>,

    /// Label used when no category rule matches
    #[serde(default = "defaults::fallback_category")]
    pub fallback_category: String,

    /// Well-known neighborhoods, merged with the ones seen in the store
    #[serde(default = "defaults::known_bairros")]
    pub known_bairros: Vec<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.store.table.trim().is_empty() {
            return Err(AppError::validation("store.table is empty"));
        }
        if self.store.timeout_secs == 0 {
            return Err(AppError::validation("store.timeout_secs must be > 0"));
        }
        if self.site.cidade.trim().is_empty() {
            return Err(AppError::validation("site.cidade is empty"));
        }
        if self.site.recent_limit == 0 {
            return Err(AppError::validation("site.recent_limit must be > 0"));
        }
        if self.site.featured_limit == 0 {
            return Err(AppError::validation("site.featured_limit must be > 0"));
        }
        if self.carousel.autoplay_interval_secs == 0 {
            return Err(AppError::validation(
                "carousel.autoplay_interval_secs must be > 0",
            ));
        }
        if self.categories.is_empty() {
            return Err(AppError::validation("No category rules defined"));
        }
        if self
            .categories
            .iter()
            .any(|rule| rule.label.trim().is_empty() || rule.keywords.is_empty())
        {
            return Err(AppError::validation(
                "Every category rule needs a label and at least one keyword",
            ));
        }
        if self.fallback_category.trim().is_empty() {
            return Err(AppError::validation("fallback_category is empty"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            site: SiteConfig::default(),
            carousel: CarouselConfig::default(),
            categories: defaults::categories(),
            fallback_category: defaults::fallback_category(),
            known_bairros: defaults::known_bairros(),
        }
    }
}

/// Remote price table access settings.
///
/// The URL and API key may also come from the `PRECOS_STORE_URL` and
/// `PRECOS_STORE_KEY` environment variables; values in the config file
/// take precedence when non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the hosted table service
    #[serde(default)]
    pub url: String,

    /// API key for the hosted table service
    #[serde(default)]
    pub api_key: String,

    /// Table holding the price records
    #[serde(default = "defaults::table")]
    pub table: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: defaults::table(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Site-wide limits and defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Home city; submissions default to it and the city filter list
    /// always contains it
    #[serde(default = "defaults::cidade")]
    pub cidade: String,

    /// Fixed region code for submissions
    #[serde(default = "defaults::estado")]
    pub estado: String,

    /// How many records the listing page fetches
    #[serde(default = "defaults::recent_limit")]
    pub recent_limit: usize,

    /// How many records the product detail page fetches
    #[serde(default = "defaults::product_limit")]
    pub product_limit: usize,

    /// Maximum entries in the best-offers ranking
    #[serde(default = "defaults::featured_limit")]
    pub featured_limit: usize,

    /// Maximum entries in the form's product suggestion dropdown
    #[serde(default = "defaults::suggestion_limit")]
    pub suggestion_limit: usize,

    /// Similar products shown on the detail page
    #[serde(default = "defaults::similar_limit")]
    pub similar_limit: usize,

    /// How long the submission success state is displayed
    #[serde(default = "defaults::success_display_secs")]
    pub success_display_secs: u64,

    /// Bounded wait for the insert call before surfacing an error
    #[serde(default = "defaults::submit_timeout_secs")]
    pub submit_timeout_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            cidade: defaults::cidade(),
            estado: defaults::estado(),
            recent_limit: defaults::recent_limit(),
            product_limit: defaults::product_limit(),
            featured_limit: defaults::featured_limit(),
            suggestion_limit: defaults::suggestion_limit(),
            similar_limit: defaults::similar_limit(),
            success_display_secs: defaults::success_display_secs(),
            submit_timeout_secs: defaults::submit_timeout_secs(),
        }
    }
}

/// Featured-products carousel behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Seconds between automatic advances
    #[serde(default = "defaults::autoplay_interval")]
    pub autoplay_interval_secs: u64,

    /// Seconds auto-play stays paused after a manual interaction
    #[serde(default = "defaults::resume_delay")]
    pub resume_delay_secs: u64,

    /// Cards visible at once
    #[serde(default = "defaults::items_per_view")]
    pub items_per_view: usize,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            autoplay_interval_secs: defaults::autoplay_interval(),
            resume_delay_secs: defaults::resume_delay(),
            items_per_view: defaults::items_per_view(),
        }
    }
}

mod defaults {
    use super::CategoryRule;

    // Store defaults
    pub fn table() -> String {
        "precos".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; precos/0.1)".into()
    }

    // Site defaults
    pub fn cidade() -> String {
        "Montes Claros".into()
    }
    pub fn estado() -> String {
        "MG".into()
    }
    pub fn recent_limit() -> usize {
        50
    }
    pub fn product_limit() -> usize {
        50
    }
    pub fn featured_limit() -> usize {
        10
    }
    pub fn suggestion_limit() -> usize {
        15
    }
    pub fn similar_limit() -> usize {
        3
    }
    pub fn success_display_secs() -> u64 {
        2
    }
    pub fn submit_timeout_secs() -> u64 {
        15
    }

    // Carousel defaults
    pub fn autoplay_interval() -> u64 {
        5
    }
    pub fn resume_delay() -> u64 {
        2
    }
    pub fn items_per_view() -> usize {
        3
    }

    // Category defaults
    //
    // Rule order is significant: classification stops at the first rule
    // with a matching keyword, so "água sanitária" lands in Limpeza even
    // though "água" alone would match Bebidas.
    pub fn fallback_category() -> String {
        "Outros".into()
    }

    pub fn categories() -> Vec<CategoryRule> {
        vec![
            CategoryRule {
                label: "Combustível".to_string(),
                keywords: vec![
                    "gasolina".into(),
                    "álcool".into(),
                    "alcool".into(),
                    "diesel".into(),
                    "combustível".into(),
                    "combustivel".into(),
                    "gás".into(),
                    "gas".into(),
                ],
            },
            CategoryRule {
                label: "Alimentos".to_string(),
                keywords: vec![
                    "arroz".into(),
                    "feijão".into(),
                    "feijao".into(),
                    "carne".into(),
                    "leite".into(),
                    "pão".into(),
                    "pao".into(),
                    "açúcar".into(),
                    "acucar".into(),
                    "óleo".into(),
                    "oleo".into(),
                    "café".into(),
                    "cafe".into(),
                    "farinha".into(),
                    "macarrão".into(),
                    "macarrao".into(),
                ],
            },
            CategoryRule {
                label: "Higiene".to_string(),
                keywords: vec![
                    "sabonete".into(),
                    "shampoo".into(),
                    "pasta".into(),
                    "dental".into(),
                    "papel higiênico".into(),
                    "papel higienico".into(),
                    "creme".into(),
                    "desodorante".into(),
                    "absorvente".into(),
                    "escova".into(),
                ],
            },
            CategoryRule {
                label: "Limpeza".to_string(),
                keywords: vec![
                    "detergente".into(),
                    "sabão".into(),
                    "sabao".into(),
                    "desinfetante".into(),
                    "água sanitária".into(),
                    "agua sanitaria".into(),
                    "limpador".into(),
                    "alvejante".into(),
                    "multiuso".into(),
                    "vassoura".into(),
                ],
            },
            CategoryRule {
                label: "Bebidas".to_string(),
                keywords: vec![
                    "água".into(),
                    "agua".into(),
                    "refrigerante".into(),
                    "suco".into(),
                    "cerveja".into(),
                    "vinho".into(),
                    "bebida".into(),
                    "chá".into(),
                    "cha".into(),
                    "energético".into(),
                    "energetico".into(),
                ],
            },
        ]
    }

    // Neighborhood defaults
    pub fn known_bairros() -> Vec<String> {
        [
            "Centro",
            "Major Prates",
            "Ibituruna",
            "Todos os Santos",
            "Morada do Sol",
            "Cândida Câmara",
            "São José",
            "Maracanã",
            "Delfino Magalhães",
            "Santo Expedito",
            "Vila Atlântida",
            "Edgar Pereira",
            "Funcionários",
            "Jaraguá",
            "Augusta Mota",
            "Planalto",
            "Alto São João",
            "Santos Reis",
            "Village do Lago",
            "Renascença",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}


/// One category with the keywords that select it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Display label (e.g., "Alimentos")
    pub label: String,

    /// Lower-case substrings that map a product name to this category
    pub keywords: Vec<String>,
}
