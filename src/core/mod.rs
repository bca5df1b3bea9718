pub mod lookup;
pub mod race;
pub mod render;

pub use crate::domain::model::{Address, FetchedResponse, RaceOutcome, RacePolicy};
pub use crate::domain::ports::{AddressProvider, ConfigProvider, Fetcher};
pub use crate::utils::error::Result;
