use crate::api::client::PriceApi;
use crate::error::Result;
use crate::models::catalog::CatalogOption;
use crate::models::entry::ItemKind;
use crate::models::material::MaterialFile;
use crate::models::state::{PriceAction, PriceListState};
use crate::services::slice::PriceSlice;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// A failed store operation; the message is also recorded in the state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Rejected {
    pub message: String,
}

/// Price list for one item kind.
///
/// Mutations never touch `items`; callers refetch after a successful
/// add/update/delete so the list always mirrors the server.
pub struct PriceStore<S: PriceSlice> {
    slice: S,
    api: Arc<dyn PriceApi>,
    state: watch::Sender<PriceListState<S::Entry>>,
    next_fetch: AtomicU64,
}

impl<S: PriceSlice> PriceStore<S> {
    pub fn new(slice: S, api: Arc<dyn PriceApi>) -> Self {
        let (state, _) = watch::channel(PriceListState::default());
        Self {
            slice,
            api,
            state,
            next_fetch: AtomicU64::new(0),
        }
    }

    pub fn kind(&self) -> ItemKind {
        S::KIND
    }

    pub fn snapshot(&self) -> PriceListState<S::Entry> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PriceListState<S::Entry>> {
        self.state.subscribe()
    }

    pub fn find(&self, entry_id: i64) -> Option<S::Entry> {
        self.state
            .borrow()
            .items
            .iter()
            .find(|e| S::entry_id(e) == entry_id)
            .cloned()
    }

    fn dispatch(&self, action: PriceAction<S::Entry>) -> bool {
        let mut applied = false;
        self.state.send_modify(|state| applied = state.apply(action));
        applied
    }

    pub async fn fetch_all(&self) -> std::result::Result<(), Rejected> {
        self.fetch(false).await
    }

    /// Pull-to-refresh: a fetch that also raises `refreshing`.
    pub async fn refresh(&self) -> std::result::Result<(), Rejected> {
        self.fetch(true).await
    }

    async fn fetch(&self, refresh: bool) -> std::result::Result<(), Rejected> {
        let seq = self.next_fetch.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Fetching {} prices (request {})", S::KIND, seq);
        self.dispatch(PriceAction::FetchStarted { seq, refresh });

        match self.slice.fetch(self.api.as_ref()).await {
            Ok(items) => {
                let count = items.len();
                if self.dispatch(PriceAction::FetchSucceeded { seq, refresh, items }) {
                    debug!("Loaded {} {} prices", count, S::KIND);
                } else {
                    debug!("Discarded stale {} price response {}", S::KIND, seq);
                }
                Ok(())
            }
            Err(e) => {
                error!("Failed to fetch {} prices: {}", S::KIND, e);
                let message = e.user_message(S::FETCH_FALLBACK);
                self.dispatch(PriceAction::FetchFailed {
                    seq,
                    refresh,
                    message: message.clone(),
                });
                Err(Rejected { message })
            }
        }
    }

    /// Creates or updates the price of `item_id`. Returns the server's
    /// confirmation message, if it sent one.
    pub async fn add_or_update(
        &self,
        item_id: i64,
        price: &str,
        material: Option<&MaterialFile>,
    ) -> std::result::Result<Option<String>, Rejected> {
        info!("Saving {} {} price {}", S::KIND, item_id, price);
        self.dispatch(PriceAction::MutationStarted);
        let outcome = self
            .slice
            .save(self.api.as_ref(), item_id, price, material)
            .await;
        self.settle_mutation(outcome.map(|ack| ack.message), S::SAVE_FALLBACK)
    }

    pub async fn delete(&self, entry_id: i64) -> std::result::Result<Option<String>, Rejected> {
        info!("Deleting {} price {}", S::KIND, entry_id);
        self.dispatch(PriceAction::MutationStarted);
        let outcome = self.slice.delete(self.api.as_ref(), entry_id).await;
        self.settle_mutation(outcome.map(|ack| ack.message), S::DELETE_FALLBACK)
    }

    fn settle_mutation(
        &self,
        outcome: Result<Option<String>>,
        fallback: &str,
    ) -> std::result::Result<Option<String>, Rejected> {
        match outcome {
            Ok(message) => {
                self.dispatch(PriceAction::MutationSucceeded);
                Ok(message)
            }
            Err(e) => {
                error!("{}: {}", fallback, e);
                let message = e.user_message(fallback);
                self.dispatch(PriceAction::MutationFailed {
                    message: message.clone(),
                });
                Err(Rejected { message })
            }
        }
    }

    /// Selection list for the add/edit form. Does not touch the state.
    pub async fn catalog(&self) -> Result<Vec<CatalogOption>> {
        debug!("Loading {} catalog", S::KIND);
        self.slice.catalog(self.api.as_ref()).await
    }

    pub fn clear_error(&self) {
        self.dispatch(PriceAction::ClearError);
    }

    /// Empties the list and ignores any fetch still in flight.
    pub fn reset(&self) {
        let through = self.next_fetch.load(Ordering::SeqCst);
        debug!("Resetting {} prices", S::KIND);
        self.dispatch(PriceAction::Reset { through });
    }
}
