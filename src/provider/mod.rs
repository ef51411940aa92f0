pub mod cached;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod store;

use crate::error::FleetError;
use crate::traffic_code::TrafficCode;
#[cfg(test)]
use mockall::automock;
use std::rc::Rc;

/// Source of parsed configuration sections. Consumers depend on this trait
/// rather than on where or how the configuration is stored.
#[cfg_attr(test, automock)]
pub trait ConfigurationProvider {
    fn traffic_code(&self) -> Result<Rc<dyn TrafficCode>, FleetError>;
}
