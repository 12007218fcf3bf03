use crate::api::client::{ApiAck, PriceApi};
use crate::error::Result;
use crate::models::catalog::CatalogOption;
use crate::models::entry::{ItemKind, PriceEntry, PujaPriceEntry, ServicePriceEntry};
use crate::models::material::MaterialFile;
use async_trait::async_trait;
use std::fmt::Debug;

/// Per-kind glue between a price store and the API.
#[async_trait]
pub trait PriceSlice: Send + Sync + 'static {
    type Entry: Clone + Debug + Send + Sync + Into<PriceEntry> + 'static;

    const KIND: ItemKind;
    const FETCH_FALLBACK: &'static str;
    const SAVE_FALLBACK: &'static str;
    const DELETE_FALLBACK: &'static str;

    async fn fetch(&self, api: &dyn PriceApi) -> Result<Vec<Self::Entry>>;

    async fn catalog(&self, api: &dyn PriceApi) -> Result<Vec<CatalogOption>>;

    async fn save(
        &self,
        api: &dyn PriceApi,
        item_id: i64,
        price: &str,
        material: Option<&MaterialFile>,
    ) -> Result<ApiAck>;

    async fn delete(&self, api: &dyn PriceApi, entry_id: i64) -> Result<ApiAck>;

    fn entry_id(entry: &Self::Entry) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ServicePrices;

#[derive(Debug, Clone, Copy, Default)]
pub struct PujaPrices;

#[async_trait]
impl PriceSlice for ServicePrices {
    type Entry = ServicePriceEntry;

    const KIND: ItemKind = ItemKind::Service;
    const FETCH_FALLBACK: &'static str = "Failed to fetch service prices";
    const SAVE_FALLBACK: &'static str = "Failed to add service price";
    const DELETE_FALLBACK: &'static str = "Failed to delete service price";

    async fn fetch(&self, api: &dyn PriceApi) -> Result<Vec<ServicePriceEntry>> {
        api.get_service_prices().await
    }

    async fn catalog(&self, api: &dyn PriceApi) -> Result<Vec<CatalogOption>> {
        let services = api.get_services().await?;
        Ok(services.into_iter().map(CatalogOption::from).collect())
    }

    async fn save(
        &self,
        api: &dyn PriceApi,
        item_id: i64,
        price: &str,
        _material: Option<&MaterialFile>,
    ) -> Result<ApiAck> {
        api.update_service_price(item_id, price).await
    }

    async fn delete(&self, api: &dyn PriceApi, entry_id: i64) -> Result<ApiAck> {
        api.delete_service_price(entry_id).await
    }

    fn entry_id(entry: &ServicePriceEntry) -> i64 {
        entry.id
    }
}

#[async_trait]
impl PriceSlice for PujaPrices {
    type Entry = PujaPriceEntry;

    const KIND: ItemKind = ItemKind::Puja;
    const FETCH_FALLBACK: &'static str = "Failed to fetch puja prices";
    const SAVE_FALLBACK: &'static str = "Failed to add puja price";
    const DELETE_FALLBACK: &'static str = "Failed to delete puja price";

    async fn fetch(&self, api: &dyn PriceApi) -> Result<Vec<PujaPriceEntry>> {
        api.get_puja_prices().await
    }

    async fn catalog(&self, api: &dyn PriceApi) -> Result<Vec<CatalogOption>> {
        let pujas = api.get_pujas().await?;
        Ok(pujas.into_iter().map(CatalogOption::from).collect())
    }

    async fn save(
        &self,
        api: &dyn PriceApi,
        item_id: i64,
        price: &str,
        material: Option<&MaterialFile>,
    ) -> Result<ApiAck> {
        api.update_puja_price(item_id, price, material).await
    }

    async fn delete(&self, api: &dyn PriceApi, entry_id: i64) -> Result<ApiAck> {
        api.delete_puja_price(entry_id).await
    }

    fn entry_id(entry: &PujaPriceEntry) -> i64 {
        entry.id
    }
}
