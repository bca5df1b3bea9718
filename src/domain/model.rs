use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Address as returned by BrasilAPI (`/api/cep/v1/{cep}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBrasilApi {
    #[serde(default, deserialize_with = "lenient_string")]
    pub cep: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub neighborhood: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub street: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub service: String,
}

/// Address as returned by ViaCEP (`/ws/{cep}/json/`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressViaCep {
    #[serde(default, deserialize_with = "lenient_string")]
    pub cep: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub logradouro: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub complemento: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bairro: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub localidade: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub uf: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ibge: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gia: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ddd: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub siafi: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    BrasilApi(AddressBrasilApi),
    ViaCep(AddressViaCep),
}

/// Terminal state of a lookup race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceOutcome {
    /// A service answered before the deadline.
    Resolved { service: String, address: Address },
    /// The first event was a failure and the policy stops on any event.
    Failed { service: String },
    /// Every service failed before the deadline.
    Exhausted { failures: Vec<String> },
    TimedOut,
}

/// What the coordinator does when the first event of the race is a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum RacePolicy {
    /// Keep waiting on the remaining services until one succeeds or the deadline passes.
    #[default]
    FirstSuccess,
    /// Stop on the first event of any kind, printing nothing on failure.
    FirstEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    BrasilApi,
    ViaCep,
}

pub const DEFAULT_CEP: &str = "69304350";
pub const DEFAULT_BRASILAPI_URL: &str = "https://brasilapi.com.br/api/cep/v1/";
pub const DEFAULT_VIACEP_URL: &str = "http://viacep.com.br/ws/";
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    pub kind: ServiceKind,
    pub base_url: String,
}

impl ServiceEndpoint {
    pub fn new(kind: ServiceKind, base_url: impl Into<String>) -> Self {
        Self {
            kind,
            base_url: base_url.into(),
        }
    }

    /// BrasilAPI followed by ViaCEP, both at their public URLs.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(ServiceKind::BrasilApi, DEFAULT_BRASILAPI_URL),
            Self::new(ServiceKind::ViaCep, DEFAULT_VIACEP_URL),
        ]
    }
}

/// Raw HTTP reply handed from a fetcher to the coordinator.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Decodes a JSON body, falling back to the empty record when it is not an object.
pub fn decode_lenient<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    let value: serde_json::Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("⚠️ Could not decode response body ({} bytes): {}", body.len(), e);
            return T::default();
        }
    };

    // 只接受 JSON 物件，陣列不可依位置填入欄位
    match value {
        serde_json::Value::Object(map) => T::deserialize(serde_json::Value::Object(map))
            .unwrap_or_else(|e| {
                tracing::warn!("⚠️ Could not map response body onto address: {}", e);
                T::default()
            }),
        other => {
            tracing::warn!("⚠️ Response body is not a JSON object: {}", json_kind(&other));
            T::default()
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// 只有字串值會被保留，其他型別一律視為空字串
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

impl fmt::Display for AddressBrasilApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{Cep:{} State:{} City:{} Neighborhood:{} Street:{} Service:{}}}",
            self.cep, self.state, self.city, self.neighborhood, self.street, self.service
        )
    }
}

impl fmt::Display for AddressViaCep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{Cep:{} Logradouro:{} Complemento:{} Bairro:{} Localidade:{} Uf:{} Ibge:{} Gia:{} Ddd:{} Siafi:{}}}",
            self.cep,
            self.logradouro,
            self.complemento,
            self.bairro,
            self.localidade,
            self.uf,
            self.ibge,
            self.gia,
            self.ddd,
            self.siafi
        )
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::BrasilApi(address) => address.fmt(f),
            Address::ViaCep(address) => address.fmt(f),
        }
    }
}
