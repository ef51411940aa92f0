//! Traffic-code configuration for fleet management.
//!
//! Speed limits are loaded from a [`ConfigStore`] by a [`ConfigurationProvider`].
//! Consumers such as [`TicketCalculator`] only ever see the provider trait, so
//! they can be exercised against in-memory doubles (enable the `mock` feature)
//! instead of real configuration files.

pub mod error;
pub mod provider;
pub mod store;
pub mod ticket;
pub mod traffic_code;

#[cfg(test)]
mod integration_tests;

pub use error::FleetError;
pub use provider::ConfigurationProvider;
pub use provider::cached::CachedProvider;
pub use provider::store::StoreProvider;
pub use store::file::FileStore;
pub use store::{ConfigStore, Section};
pub use ticket::{
    Amount, Speed, TariffTable, TicketCalculator, TicketCalculatorBuilder, TicketPricing,
};
pub use traffic_code::{
    SpeedLimit, SpeedLimitCollection, SpeedLimits, SpeedUnit, TRAFFIC_CODE_SECTION, TrafficCode,
    TrafficCodeSection,
};
