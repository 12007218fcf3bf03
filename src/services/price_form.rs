use crate::error::{FormError, Result};
use crate::models::catalog::CatalogOption;
use crate::models::entry::PriceEntry;
use crate::models::material::MaterialFile;
use crate::services::pdf_picker::{pick_material, FilePicker};
use crate::services::price_store::{PriceStore, Rejected};
use crate::services::slice::PriceSlice;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    ListLoading,
    Ready,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Rejected before any request was made.
    Invalid(FormError),
    /// Saved; the form has been closed.
    Saved { message: String },
    /// The server or network refused; selection and price are kept.
    Failed { message: String },
}

/// Add/edit price form for one item kind.
pub struct PriceForm<S: PriceSlice> {
    store: Arc<PriceStore<S>>,
    phase: FormPhase,
    options: Vec<CatalogOption>,
    selected: Option<i64>,
    price: String,
    material: Option<MaterialFile>,
    editing: Option<i64>,
}

impl<S: PriceSlice> PriceForm<S> {
    pub fn new(store: Arc<PriceStore<S>>) -> Self {
        Self {
            store,
            phase: FormPhase::Idle,
            options: Vec::new(),
            selected: None,
            price: String::new(),
            material: None,
            editing: None,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != FormPhase::Idle
    }

    pub fn options(&self) -> &[CatalogOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<&CatalogOption> {
        let id = self.selected?;
        self.options.iter().find(|o| o.id == id)
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn material(&self) -> Option<&MaterialFile> {
        self.material.as_ref()
    }

    /// Entry id being edited, `None` when adding.
    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    /// Opens the form and loads the selection list. With `existing`, the
    /// form starts out on that entry's item and price.
    ///
    /// A failed list load leaves the form open with no options.
    pub async fn open(&mut self, existing: Option<&S::Entry>) -> std::result::Result<(), Rejected> {
        self.close();
        if let Some(entry) = existing {
            let entry: PriceEntry = entry.clone().into();
            self.editing = Some(entry.id());
            self.selected = Some(entry.item_id());
            self.price = entry.price().to_string();
        }

        self.phase = FormPhase::ListLoading;
        let loaded = self.store.catalog().await;
        self.phase = FormPhase::Ready;

        match loaded {
            Ok(options) => {
                debug!("Loaded {} {} options", options.len(), S::KIND);
                self.options = options;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load {} list: {}", S::KIND, e);
                Err(Rejected {
                    message: e.user_message(&format!("Failed to load {}s", S::KIND)),
                })
            }
        }
    }

    pub fn select(&mut self, item_id: i64) -> std::result::Result<(), FormError> {
        self.ensure_ready()?;
        if !self.options.iter().any(|o| o.id == item_id) {
            return Err(FormError::UnknownItem(item_id));
        }
        self.selected = Some(item_id);
        Ok(())
    }

    pub fn set_price(&mut self, price: &str) -> std::result::Result<(), FormError> {
        self.ensure_ready()?;
        self.price = price.trim().to_string();
        Ok(())
    }

    /// Asks the picker for a PDF. Returns whether an attachment was set; a
    /// cancelled pick keeps whatever was attached before.
    pub fn attach_material(&mut self, picker: &dyn FilePicker) -> Result<bool> {
        self.ensure_ready()?;
        if !S::KIND.supports_material() {
            return Err(FormError::MaterialUnsupported.into());
        }
        match pick_material(picker)? {
            Some(file) => {
                self.material = Some(file);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Validates and submits. On success `on_success` runs before the form
    /// closes; the caller uses it to refetch the list.
    pub async fn submit<F, Fut>(&mut self, on_success: F) -> SubmitOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        if let Err(e) = self.ensure_ready() {
            return SubmitOutcome::Invalid(e);
        }
        let Some(item_id) = self.selected else {
            return SubmitOutcome::Invalid(FormError::NoSelection);
        };
        if self.price.is_empty() {
            return SubmitOutcome::Invalid(FormError::EmptyPrice);
        }

        self.phase = FormPhase::Submitting;
        let material = self.material.as_ref().filter(|_| S::KIND.supports_material());
        match self.store.add_or_update(item_id, &self.price, material).await {
            Ok(message) => {
                let message = message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Price updated successfully".to_string());
                info!("Saved {} {} price {}", S::KIND, item_id, self.price);
                on_success().await;
                self.close();
                SubmitOutcome::Saved { message }
            }
            Err(rejected) => {
                self.phase = FormPhase::Ready;
                SubmitOutcome::Failed {
                    message: rejected.message,
                }
            }
        }
    }

    /// Drops selection, price and attachment.
    pub fn close(&mut self) {
        self.phase = FormPhase::Idle;
        self.options.clear();
        self.selected = None;
        self.price.clear();
        self.material = None;
        self.editing = None;
    }

    fn ensure_ready(&self) -> std::result::Result<(), FormError> {
        match self.phase {
            FormPhase::Ready => Ok(()),
            _ => Err(FormError::NotOpen),
        }
    }
}
