use crate::error::{PriceError, Result};
use crate::models::catalog::{Puja, Service};
use crate::models::entry::{PujaPriceEntry, ServicePriceEntry};
use crate::models::material::MaterialFile;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Outcome of a successful create/update/delete call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiAck {
    pub message: Option<String>,
}

/// The REST endpoints the price screens depend on.
#[async_trait]
pub trait PriceApi: Send + Sync {
    async fn get_services(&self) -> Result<Vec<Service>>;
    async fn get_pujas(&self) -> Result<Vec<Puja>>;

    async fn get_service_prices(&self) -> Result<Vec<ServicePriceEntry>>;
    async fn get_puja_prices(&self) -> Result<Vec<PujaPriceEntry>>;

    async fn update_service_price(&self, service_id: i64, price: &str) -> Result<ApiAck>;
    async fn update_puja_price(
        &self,
        puja_id: i64,
        price: &str,
        material: Option<&MaterialFile>,
    ) -> Result<ApiAck>;

    async fn delete_service_price(&self, id: i64) -> Result<ApiAck>;
    async fn delete_puja_price(&self, id: i64) -> Result<ApiAck>;
}

/// `{success, message?, data?}` wrapper used by the backend.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped(Envelope<Vec<T>>),
}

/// Decodes a list response, accepting either a bare array or an envelope.
pub fn decode_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    match serde_json::from_str::<ListBody<T>>(body) {
        Ok(ListBody::Bare(items)) => Ok(items),
        Ok(ListBody::Wrapped(envelope)) if envelope.success => Ok(envelope.data.unwrap_or_default()),
        Ok(ListBody::Wrapped(envelope)) => Err(PriceError::Rejected {
            message: envelope.message,
        }),
        // Re-decode strictly so the error names the offending field.
        Err(untagged) => Err(PriceError::Decode(
            serde_json::from_str::<Envelope<Vec<T>>>(body)
                .err()
                .unwrap_or(untagged),
        )),
    }
}

/// Decodes a mutation response. An empty body counts as success.
pub fn decode_ack(body: &str) -> Result<ApiAck> {
    if body.trim().is_empty() {
        return Ok(ApiAck::default());
    }
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(body)?;
    if envelope.success {
        Ok(ApiAck {
            message: envelope.message,
        })
    } else {
        Err(PriceError::Rejected {
            message: envelope.message,
        })
    }
}

/// Pulls `message` (or `detail`/`error`) out of an error body.
pub fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "detail", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
