use crate::api::client::PriceApi;
use crate::models::entry::{ItemKind, PriceEntry};
use crate::models::state::PriceListState;
use crate::services::price_form::{PriceForm, SubmitOutcome};
use crate::services::price_store::{PriceStore, Rejected};
use crate::services::slice::PriceSlice;
use crate::utils::display::{CardFields, DisplayFormatter, PriceCard};
use std::cell::Cell;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Edit,
    Delete,
}

/// Outcome of pressing a card button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    /// The edit form is open (possibly with a list-load alert).
    EditorOpened { alert: Option<String> },
    Deleted { message: String },
    Alert { message: String },
}

/// "My prices" screen: the list of cards plus the add/edit form.
pub struct PriceListScreen<S: PriceSlice> {
    store: Arc<PriceStore<S>>,
    form: PriceForm<S>,
    display: DisplayFormatter,
}

impl<S: PriceSlice> PriceListScreen<S> {
    pub fn new(slice: S, api: Arc<dyn PriceApi>) -> Self {
        let store = Arc::new(PriceStore::new(slice, api));
        Self {
            form: PriceForm::new(store.clone()),
            store,
            display: DisplayFormatter::new(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        S::KIND
    }

    pub fn store(&self) -> &Arc<PriceStore<S>> {
        &self.store
    }

    pub fn form(&self) -> &PriceForm<S> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PriceForm<S> {
        &mut self.form
    }

    pub fn state(&self) -> PriceListState<S::Entry> {
        self.store.snapshot()
    }

    /// Initial load when the screen comes up.
    pub async fn mount(&self) -> Result<(), Rejected> {
        info!("Opening {} price screen", S::KIND);
        self.store.fetch_all().await
    }

    pub async fn refresh(&self) -> Result<(), Rejected> {
        self.store.refresh().await
    }

    pub fn cards(&self) -> Vec<CardFields> {
        self.store
            .snapshot()
            .items
            .into_iter()
            .map(|e| {
                let entry: PriceEntry = e.into();
                CardFields::of(&entry)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let mut text = self.display.format_price_list(S::KIND, &self.cards());
        if let Some(error) = self.store.snapshot().error {
            text.push('\n');
            text.push_str(&self.display.format_error(&error));
        }
        text
    }

    pub fn dismiss_error(&self) {
        self.store.clear_error();
    }

    pub async fn open_add(&mut self) -> Result<(), Rejected> {
        self.form.open(None).await
    }

    /// Routes a card button press. Unknown ids produce an alert.
    pub async fn press(&mut self, entry_id: i64, action: CardAction) -> ScreenEvent {
        let Some(entry) = self.store.find(entry_id) else {
            return ScreenEvent::Alert {
                message: format!("No {} price with id {}", S::KIND, entry_id),
            };
        };

        let requested = Cell::new(None);
        let on_edit = |id: i64| requested.set(Some((CardAction::Edit, id)));
        let on_delete = |id: i64| requested.set(Some((CardAction::Delete, id)));
        let as_entry: PriceEntry = entry.clone().into();
        let card = PriceCard::new(&as_entry, &on_edit, &on_delete);
        match action {
            CardAction::Edit => card.edit(),
            CardAction::Delete => card.delete(),
        }

        match requested.take() {
            Some((CardAction::Edit, _)) => {
                debug!("Editing {} price {}", S::KIND, entry_id);
                let alert = self.form.open(Some(&entry)).await.err().map(|r| r.message);
                ScreenEvent::EditorOpened { alert }
            }
            Some((CardAction::Delete, id)) => match self.delete(id).await {
                Ok(message) => ScreenEvent::Deleted { message },
                Err(rejected) => ScreenEvent::Alert {
                    message: rejected.message,
                },
            },
            None => ScreenEvent::Alert {
                message: "Nothing to do".to_string(),
            },
        }
    }

    /// Deletes and, on success, refetches the list.
    pub async fn delete(&self, entry_id: i64) -> Result<String, Rejected> {
        let message = self.store.delete(entry_id).await?;
        // A failed refetch is recorded in the store and shown by `render`.
        let _ = self.store.fetch_all().await;
        Ok(message.unwrap_or_else(|| format!("{} price deleted", capitalize(S::KIND.noun()))))
    }

    /// Submits the form and refetches the list once the server accepts it.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let store = self.store.clone();
        self.form
            .submit(move || async move {
                let _ = store.fetch_all().await;
            })
            .await
    }

    pub fn close_form(&mut self) {
        self.form.close();
    }

    /// Tears the screen down; late responses are ignored from here on.
    pub fn unmount(&mut self) {
        info!("Closing {} price screen", S::KIND);
        self.form.close();
        self.store.reset();
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
