pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{BrasilApiProvider, HttpFetcher, ViaCepProvider};
pub use config::TomlConfig;
pub use core::{lookup::LookupEngine, race::LookupRace, render::render_outcome};
pub use domain::model::{Address, AddressBrasilApi, AddressViaCep, RaceOutcome, RacePolicy};
pub use utils::error::{LookupError, Result};
