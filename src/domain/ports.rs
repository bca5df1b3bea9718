use crate::domain::model::{Address, FetchedResponse, RacePolicy, ServiceEndpoint};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// Performs one GET bounded by the race deadline. Status codes are not checked.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, deadline: Instant) -> Result<FetchedResponse>;
}

/// One upstream lookup service.
pub trait AddressProvider: Send + Sync {
    fn name(&self) -> &str;
    fn lookup_url(&self, cep: &str) -> String;
    fn decode(&self, body: &[u8]) -> Address;
}

pub trait ConfigProvider: Send + Sync {
    fn cep(&self) -> &str;
    fn timeout(&self) -> Duration;
    fn policy(&self) -> RacePolicy;
    fn services(&self) -> Vec<ServiceEndpoint>;
}
