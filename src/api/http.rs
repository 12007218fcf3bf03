use crate::api::client::{decode_ack, decode_list, error_message, ApiAck, PriceApi};
use crate::config::Config;
use crate::error::{PriceError, Result};
use crate::models::catalog::{Puja, Service};
use crate::models::entry::{PujaPriceEntry, ServicePriceEntry};
use crate::models::material::MaterialFile;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

const SERVICES_PATH: &str = "/services";
const PUJAS_PATH: &str = "/pujas";
const SERVICE_PRICES_PATH: &str = "/serviceman/service-prices";
const PUJA_PRICES_PATH: &str = "/brahman/puja-prices";

/// reqwest-backed implementation of [`PriceApi`].
pub struct HttpPriceApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPriceApi {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends the request and returns the body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<String> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if status.as_u16() == 429 {
                warn!("Rate limit hit");
            }
            debug!("Request failed with {}: {}", status, body);
            return Err(PriceError::Server {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(body)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = self.url(path);
        debug!("Sending request to {}", url);
        let body = self.send(self.client.get(&url)).await?;
        let items = decode_list(&body)?;
        debug!("Parsed {} records from {}", items.len(), url);
        Ok(items)
    }

    async fn delete(&self, path: &str, id: i64) -> Result<ApiAck> {
        let url = format!("{}/{}", self.url(path), id);
        debug!("Deleting {}", url);
        let body = self.send(self.client.delete(&url)).await?;
        decode_ack(&body)
    }
}

#[async_trait]
impl PriceApi for HttpPriceApi {
    async fn get_services(&self) -> Result<Vec<Service>> {
        self.get_list(SERVICES_PATH).await
    }

    async fn get_pujas(&self) -> Result<Vec<Puja>> {
        self.get_list(PUJAS_PATH).await
    }

    async fn get_service_prices(&self) -> Result<Vec<ServicePriceEntry>> {
        self.get_list(SERVICE_PRICES_PATH).await
    }

    async fn get_puja_prices(&self) -> Result<Vec<PujaPriceEntry>> {
        self.get_list(PUJA_PRICES_PATH).await
    }

    async fn update_service_price(&self, service_id: i64, price: &str) -> Result<ApiAck> {
        let url = self.url(SERVICE_PRICES_PATH);
        debug!("Updating service {} price to {}", service_id, price);
        let request = self
            .client
            .post(&url)
            .json(&json!({ "service_id": service_id, "price": price }));
        let body = self.send(request).await?;
        decode_ack(&body)
    }

    async fn update_puja_price(
        &self,
        puja_id: i64,
        price: &str,
        material: Option<&MaterialFile>,
    ) -> Result<ApiAck> {
        let url = self.url(PUJA_PRICES_PATH);
        debug!("Updating puja {} price to {}", puja_id, price);

        let mut form = Form::new()
            .text("puja_id", puja_id.to_string())
            .text("price", price.to_string());

        if let Some(file) = material {
            let bytes = tokio::fs::read(file.local_path()).await?;
            debug!("Attaching {} ({} bytes)", file.upload_name(), bytes.len());
            let part = Part::bytes(bytes)
                .file_name(file.upload_name())
                .mime_str(file.upload_mime())?;
            form = form.part("material_file", part);
        }

        let body = self.send(self.client.post(&url).multipart(form)).await?;
        decode_ack(&body)
    }

    async fn delete_service_price(&self, id: i64) -> Result<ApiAck> {
        self.delete(SERVICE_PRICES_PATH, id).await
    }

    async fn delete_puja_price(&self, id: i64) -> Result<ApiAck> {
        self.delete(PUJA_PRICES_PATH, id).await
    }
}
