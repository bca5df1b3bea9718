use crate::domain::model::{
    decode_lenient, Address, AddressBrasilApi, AddressViaCep, ServiceEndpoint, ServiceKind,
};
use crate::domain::ports::AddressProvider;
use std::sync::Arc;

fn with_trailing_slash(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    }
}

/// `GET {base}{cep}`
#[derive(Debug, Clone)]
pub struct BrasilApiProvider {
    base_url: String,
}

impl BrasilApiProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
        }
    }
}

impl AddressProvider for BrasilApiProvider {
    fn name(&self) -> &str {
        "BrasilAPI"
    }

    fn lookup_url(&self, cep: &str) -> String {
        format!("{}{}", self.base_url, cep)
    }

    fn decode(&self, body: &[u8]) -> Address {
        Address::BrasilApi(decode_lenient::<AddressBrasilApi>(body))
    }
}

/// `GET {base}{cep}/json/`
#[derive(Debug, Clone)]
pub struct ViaCepProvider {
    base_url: String,
}

impl ViaCepProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
        }
    }
}

impl AddressProvider for ViaCepProvider {
    fn name(&self) -> &str {
        "ViaCEP"
    }

    fn lookup_url(&self, cep: &str) -> String {
        format!("{}{}/json/", self.base_url, cep)
    }

    fn decode(&self, body: &[u8]) -> Address {
        Address::ViaCep(decode_lenient::<AddressViaCep>(body))
    }
}

pub fn provider_for(endpoint: &ServiceEndpoint) -> Arc<dyn AddressProvider> {
    match endpoint.kind {
        ServiceKind::BrasilApi => Arc::new(BrasilApiProvider::new(&endpoint.base_url)),
        ServiceKind::ViaCep => Arc::new(ViaCepProvider::new(&endpoint.base_url)),
    }
}
