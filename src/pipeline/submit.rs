// src/pipeline/submit.rs

//! Submission flow for the add-price page.
//!
//! Drives the form through `Idle → Submitting → Success | Error`.
//! Validation failures never leave `Idle` and never touch the store;
//! store failures keep the entered values so the user can resubmit.

use std::time::{Duration, Instant};

use futures::join;
use log::{debug, error, warn};

use crate::error::{AppError, Result};
use crate::models::{Config, PriceDraft, PriceRecord, SiteConfig};
use crate::store::PriceStore;

use super::listing::merge_bairros;

/// State of the submission flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    /// Waiting for input; the submit action is enabled
    Idle,
    /// Insert in flight; further submits are ignored
    Submitting,
    /// Saved; shown until the display duration elapses
    Success { at: Instant },
    /// Store failure; retry-eligible, draft preserved
    Error { message: String },
}

/// What a submit attempt did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Record stored
    Saved(PriceRecord),
    /// Validation failed; nothing sent
    Invalid,
    /// Store call failed or timed out
    Failed,
    /// A submit was already in flight
    Ignored,
}

/// Submission flow state machine.
///
/// The presentation layer owns one of these per form, reads `state`,
/// `draft` and `inline_error` directly, and mutates only through
/// [`submit`](Self::submit) and [`tick`](Self::tick).
#[derive(Debug)]
pub struct SubmissionFlow {
    pub state: SubmissionState,
    pub draft: PriceDraft,
    /// Validation message shown next to the form while `Idle`
    pub inline_error: Option<String>,
    success_display: Duration,
    submit_timeout: Duration,
}

impl SubmissionFlow {
    /// Create an idle flow with an empty draft.
    pub fn new(config: &Config) -> Self {
        Self {
            state: SubmissionState::Idle,
            draft: PriceDraft::default(),
            inline_error: None,
            success_display: Duration::from_secs(config.site.success_display_secs),
            submit_timeout: Duration::from_secs(config.site.submit_timeout_secs),
        }
    }

    /// True while an insert is in flight.
    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// Attempt to submit the current draft.
    ///
    /// A call while already `Submitting` is a no-op. On success the
    /// draft is cleared; on store failure it is preserved.
    pub async fn submit(&mut self, store: &dyn PriceStore, site: &SiteConfig) -> SubmitOutcome {
        if self.is_submitting() {
            debug!("Submit ignored: another submission is in flight");
            return SubmitOutcome::Ignored;
        }

        self.inline_error = None;

        let novo = match self.draft.resolve(site) {
            Ok(novo) => novo,
            Err(e) => {
                self.inline_error = Some(e.user_message());
                self.state = SubmissionState::Idle;
                return SubmitOutcome::Invalid;
            }
        };

        self.state = SubmissionState::Submitting;

        let result = tokio::time::timeout(self.submit_timeout, store.insert(&novo)).await;
        match result {
            Ok(Ok(record)) => {
                self.draft.clear();
                self.state = SubmissionState::Success { at: Instant::now() };
                SubmitOutcome::Saved(record)
            }
            Ok(Err(e)) => {
                error!("Price insert failed: {}", e);
                self.state = SubmissionState::Error {
                    message: e.user_message(),
                };
                SubmitOutcome::Failed
            }
            Err(_) => {
                let timeout = AppError::StoreTimeout {
                    operation: "insert".to_string(),
                    seconds: self.submit_timeout.as_secs(),
                };
                error!("{}", timeout);
                self.state = SubmissionState::Error {
                    message: timeout.user_message(),
                };
                SubmitOutcome::Failed
            }
        }
    }

    /// Advance time-based transitions.
    ///
    /// Returns the success state to `Idle` once the display duration
    /// has elapsed; every other state is left alone.
    pub fn tick(&mut self, now: Instant) {
        if let SubmissionState::Success { at } = self.state {
            if now.duration_since(at) >= self.success_display {
                self.state = SubmissionState::Idle;
            }
        }
    }
}

/// Select options for the add-price form.
#[derive(Debug, Clone)]
pub struct FormOptions {
    pub bairros: Vec<String>,
    pub lojas: Vec<String>,
    pub cidades: Vec<String>,
}

/// Load the form's select options.
///
/// All three lists are auxiliary (the form always offers the free-text
/// "other" escape), so store failures degrade to the configured
/// fallbacks instead of failing the page.
pub async fn load_form_options(store: &dyn PriceStore, config: &Config) -> Result<FormOptions> {
    let (bairros, lojas, cidades) = join!(
        store.distinct_bairros(),
        store.distinct_lojas(),
        store.distinct_cidades(),
    );

    let bairros = match bairros {
        Ok(list) => merge_bairros(list, &config.known_bairros),
        Err(e) => {
            warn!("Neighborhood listing failed: {}. Using the known list.", e);
            merge_bairros(Vec::new(), &config.known_bairros)
        }
    };

    let lojas = lojas.unwrap_or_else(|e| {
        warn!("Store listing failed: {}. Offering free text only.", e);
        Vec::new()
    });

    let mut cidades = cidades.unwrap_or_else(|e| {
        warn!("City listing failed: {}. Using the home city only.", e);
        Vec::new()
    });
    if !cidades.iter().any(|c| c == &config.site.cidade) {
        cidades.insert(0, config.site.cidade.clone());
    }

    Ok(FormOptions {
        bairros,
        lojas,
        cidades,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::models::NewPrice;
    use crate::store::MemoryStore;

    /// Store whose operations always fail.
    struct FailingStore;

    #[async_trait]
    impl PriceStore for FailingStore {
        async fn list_recent(&self, _: usize) -> Result<Vec<PriceRecord>> {
            Err(AppError::store("list_recent", "boom"))
        }
        async fn list_by_product(&self, _: &str, _: usize) -> Result<Vec<PriceRecord>> {
            Err(AppError::store("list_by_product", "boom"))
        }
        async fn list_by_bairro(&self, _: &str, _: usize) -> Result<Vec<PriceRecord>> {
            Err(AppError::store("list_by_bairro", "boom"))
        }
        async fn list_by_cidade(&self, _: &str, _: usize) -> Result<Vec<PriceRecord>> {
            Err(AppError::store("list_by_cidade", "boom"))
        }
        async fn list_by_loja(&self, _: &str, _: usize) -> Result<Vec<PriceRecord>> {
            Err(AppError::store("list_by_loja", "boom"))
        }
        async fn insert(&self, _: &NewPrice) -> Result<PriceRecord> {
            Err(AppError::store("insert", "boom"))
        }
        async fn distinct_bairros(&self) -> Result<Vec<String>> {
            Err(AppError::store("distinct_bairros", "boom"))
        }
        async fn distinct_cidades(&self) -> Result<Vec<String>> {
            Err(AppError::store("distinct_cidades", "boom"))
        }
        async fn distinct_lojas(&self) -> Result<Vec<String>> {
            Err(AppError::store("distinct_lojas", "boom"))
        }
    }

    /// Store whose insert never completes.
    struct HangingStore;

    #[async_trait]
    impl PriceStore for HangingStore {
        async fn list_recent(&self, _: usize) -> Result<Vec<PriceRecord>> {
            Ok(Vec::new())
        }
        async fn list_by_product(&self, _: &str, _: usize) -> Result<Vec<PriceRecord>> {
            Ok(Vec::new())
        }
        async fn list_by_bairro(&self, _: &str, _: usize) -> Result<Vec<PriceRecord>> {
            Ok(Vec::new())
        }
        async fn list_by_cidade(&self, _: &str, _: usize) -> Result<Vec<PriceRecord>> {
            Ok(Vec::new())
        }
        async fn list_by_loja(&self, _: &str, _: usize) -> Result<Vec<PriceRecord>> {
            Ok(Vec::new())
        }
        async fn insert(&self, _: &NewPrice) -> Result<PriceRecord> {
            std::future::pending().await
        }
        async fn distinct_bairros(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
        async fn distinct_cidades(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
        async fn distinct_lojas(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn config() -> Config {
        Config::default()
    }

    fn fill_valid_draft(flow: &mut SubmissionFlow) {
        flow.draft.produto = "Gasolina Comum".to_string();
        flow.draft.preco = "5,89".to_string();
        flow.draft.loja = "Posto Trevão".to_string();
        flow.draft.bairro = "Centro".to_string();
        flow.draft.cidade = "Montes Claros".to_string();
    }

    #[tokio::test]
    async fn test_invalid_draft_stays_idle_without_store_call() {
        let config = config();
        let store = FailingStore; // would error loudly if reached
        let mut flow = SubmissionFlow::new(&config);
        flow.draft.produto = "".to_string();
        flow.draft.preco = "5,00".to_string();

        let outcome = flow.submit(&store, &config.site).await;
        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert_eq!(flow.state, SubmissionState::Idle);
        assert!(flow.inline_error.is_some());
    }

    #[tokio::test]
    async fn test_successful_submit_clears_draft() {
        let config = config();
        let store = MemoryStore::new();
        let mut flow = SubmissionFlow::new(&config);
        fill_valid_draft(&mut flow);

        let outcome = flow.submit(&store, &config.site).await;
        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
        assert!(matches!(flow.state, SubmissionState::Success { .. }));
        assert!(flow.draft.is_empty());
    }

    #[tokio::test]
    async fn test_success_returns_to_idle_after_display_duration() {
        let config = config();
        let store = MemoryStore::new();
        let mut flow = SubmissionFlow::new(&config);
        fill_valid_draft(&mut flow);
        flow.submit(&store, &config.site).await;

        let SubmissionState::Success { at } = flow.state else {
            panic!("expected success state");
        };

        // Just before the deadline: still success.
        flow.tick(at + Duration::from_millis(100));
        assert!(matches!(flow.state, SubmissionState::Success { .. }));

        // Past the deadline: back to idle.
        flow.tick(at + Duration::from_secs(config.site.success_display_secs) + Duration::from_millis(1));
        assert_eq!(flow.state, SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_store_failure_preserves_draft() {
        let config = config();
        let store = FailingStore;
        let mut flow = SubmissionFlow::new(&config);
        fill_valid_draft(&mut flow);
        let draft_before = flow.draft.clone();

        let outcome = flow.submit(&store, &config.site).await;
        assert_eq!(outcome, SubmitOutcome::Failed);
        assert!(matches!(flow.state, SubmissionState::Error { .. }));
        assert_eq!(flow.draft, draft_before);

        // The user-facing message is the generic retry text.
        let SubmissionState::Error { message } = &flow.state else {
            unreachable!()
        };
        assert!(!message.contains("boom"));
    }

    #[tokio::test]
    async fn test_submit_while_submitting_is_ignored() {
        let config = config();
        let store = MemoryStore::new();
        let mut flow = SubmissionFlow::new(&config);
        fill_valid_draft(&mut flow);
        flow.state = SubmissionState::Submitting;

        let outcome = flow.submit(&store, &config.site).await;
        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert_eq!(flow.state, SubmissionState::Submitting);
        assert!(store.list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hung_store_surfaces_error_after_timeout() {
        let mut config = config();
        config.site.submit_timeout_secs = 0;
        let store = HangingStore;
        let mut flow = SubmissionFlow::new(&config);
        fill_valid_draft(&mut flow);

        let outcome = flow.submit(&store, &config.site).await;
        assert_eq!(outcome, SubmitOutcome::Failed);
        assert!(matches!(flow.state, SubmissionState::Error { .. }));
    }

    #[tokio::test]
    async fn test_retry_after_error_succeeds() {
        let config = config();
        let mut flow = SubmissionFlow::new(&config);
        fill_valid_draft(&mut flow);

        let outcome = flow.submit(&FailingStore, &config.site).await;
        assert_eq!(outcome, SubmitOutcome::Failed);

        // Same draft, working store: the retry goes through.
        let store = MemoryStore::new();
        let outcome = flow.submit(&store, &config.site).await;
        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
    }

    #[tokio::test]
    async fn test_form_options_degrade_on_store_failure() {
        let config = config();
        let options = load_form_options(&FailingStore, &config).await.unwrap();

        assert_eq!(options.bairros.len(), config.known_bairros.len());
        assert!(options.lojas.is_empty());
        assert_eq!(options.cidades, vec!["Montes Claros".to_string()]);
    }

    #[tokio::test]
    async fn test_form_options_from_store_data() {
        let config = config();
        let store = MemoryStore::with_sample_data();
        let options = load_form_options(&store, &config).await.unwrap();

        assert!(options.lojas.iter().any(|l| l == "Mart Minas"));
        assert!(options.bairros.iter().any(|b| b == "Ibituruna"));
        assert!(options.cidades.iter().any(|c| c == "Montes Claros"));
    }
}
