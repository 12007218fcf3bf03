//! Scripted in-memory [`PriceApi`] for tests.

use crate::api::client::{ApiAck, PriceApi};
use crate::error::{PriceError, Result};
use crate::models::catalog::{Puja, Service};
use crate::models::entry::{PujaPriceEntry, ServicePriceEntry};
use crate::models::material::MaterialFile;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetServices,
    GetPujas,
    GetServicePrices,
    GetPujaPrices,
    UpdateService { service_id: i64, price: String },
    UpdatePuja { puja_id: i64, price: String, material: Option<MaterialFile> },
    DeleteService(i64),
    DeletePuja(i64),
}

pub enum Reply<T> {
    Now(Result<T>),
    /// Resolves once the test sends on the paired channel.
    Gated(oneshot::Receiver<Result<T>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T> {
        match self {
            Reply::Now(result) => result,
            Reply::Gated(rx) => rx.await.unwrap_or(Err(PriceError::Rejected {
                message: Some("gate dropped".into()),
            })),
        }
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub services: Vec<Service>,
    pub pujas: Vec<Puja>,
    catalog_fails: bool,
    service_prices: Mutex<VecDeque<Reply<Vec<ServicePriceEntry>>>>,
    puja_prices: Mutex<VecDeque<Reply<Vec<PujaPriceEntry>>>>,
    acks: Mutex<VecDeque<Result<ApiAck>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            services: vec![
                Service {
                    id: 5,
                    name: "Tap repair".into(),
                    category_name: Some("Plumbing".into()),
                },
                Service {
                    id: 6,
                    name: "Fan install".into(),
                    category_name: None,
                },
            ],
            pujas: vec![Puja {
                id: 20,
                name: "Ganesh Puja".into(),
                puja_type_name: Some("Festival".into()),
                duration: Some("1 hour".into()),
            }],
            ..Self::default()
        }
    }

    pub fn with_failing_catalog(mut self) -> Self {
        self.catalog_fails = true;
        self
    }

    pub fn push_service_prices(&self, reply: Reply<Vec<ServicePriceEntry>>) {
        self.service_prices.lock().unwrap().push_back(reply);
    }

    pub fn push_puja_prices(&self, reply: Reply<Vec<PujaPriceEntry>>) {
        self.puja_prices.lock().unwrap().push_back(reply);
    }

    pub fn push_ack(&self, ack: Result<ApiAck>) {
        self.acks.lock().unwrap().push_back(ack);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::UpdateService { .. }
                        | Call::UpdatePuja { .. }
                        | Call::DeleteService(_)
                        | Call::DeletePuja(_)
                )
            })
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_ack(&self) -> Result<ApiAck> {
        self.acks
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiAck::default()))
    }

    fn catalog<T: Clone>(&self, items: &[T]) -> Result<Vec<T>> {
        if self.catalog_fails {
            return Err(PriceError::Server {
                status: 503,
                message: None,
            });
        }
        Ok(items.to_vec())
    }
}

#[async_trait]
impl PriceApi for FakeApi {
    async fn get_services(&self) -> Result<Vec<Service>> {
        self.record(Call::GetServices);
        self.catalog(&self.services)
    }

    async fn get_pujas(&self) -> Result<Vec<Puja>> {
        self.record(Call::GetPujas);
        self.catalog(&self.pujas)
    }

    async fn get_service_prices(&self) -> Result<Vec<ServicePriceEntry>> {
        self.record(Call::GetServicePrices);
        let reply = self.service_prices.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Ok(Vec::new()),
        }
    }

    async fn get_puja_prices(&self) -> Result<Vec<PujaPriceEntry>> {
        self.record(Call::GetPujaPrices);
        let reply = self.puja_prices.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => Ok(Vec::new()),
        }
    }

    async fn update_service_price(&self, service_id: i64, price: &str) -> Result<ApiAck> {
        self.record(Call::UpdateService {
            service_id,
            price: price.to_string(),
        });
        self.next_ack()
    }

    async fn update_puja_price(
        &self,
        puja_id: i64,
        price: &str,
        material: Option<&MaterialFile>,
    ) -> Result<ApiAck> {
        self.record(Call::UpdatePuja {
            puja_id,
            price: price.to_string(),
            material: material.cloned(),
        });
        self.next_ack()
    }

    async fn delete_service_price(&self, id: i64) -> Result<ApiAck> {
        self.record(Call::DeleteService(id));
        self.next_ack()
    }

    async fn delete_puja_price(&self, id: i64) -> Result<ApiAck> {
        self.record(Call::DeletePuja(id));
        self.next_ack()
    }
}
