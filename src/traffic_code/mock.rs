use super::collection::{SPEED_LIMIT, SpeedLimits};
use super::section::TrafficCode;
use super::speed_limit::SpeedLimit;
use crate::error::FleetError;
use std::collections::HashMap;

/// Editable speed limits for building fixtures without a store.
pub struct MockSpeedLimits {
    entries: HashMap<String, SpeedLimit>,
    order: Vec<String>,
}

impl MockSpeedLimits {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Adds or replaces a limit. A replaced country keeps its position.
    pub fn insert(&mut self, limit: SpeedLimit) {
        let country = limit.country_name().to_string();
        if self.entries.insert(country.clone(), limit).is_none() {
            self.order.push(country);
        }
    }

    pub fn with(mut self, limit: SpeedLimit) -> Self {
        self.insert(limit);
        self
    }
}

impl SpeedLimits for MockSpeedLimits {
    fn get(&self, country_name: &str) -> Result<&SpeedLimit, FleetError> {
        self.entries.get(country_name).ok_or(FleetError::NotFound {
            what: SPEED_LIMIT.to_string(),
            key: country_name.to_string(),
        })
    }

    fn countries(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

pub struct MockTrafficCode {
    speed_limits: MockSpeedLimits,
}

impl MockTrafficCode {
    pub fn new(speed_limits: MockSpeedLimits) -> Self {
        Self { speed_limits }
    }
}

impl TrafficCode for MockTrafficCode {
    fn speed_limits(&self) -> &dyn SpeedLimits {
        &self.speed_limits
    }
}

#[test]
fn test_mock_speed_limits() {
    use super::speed_limit::SpeedUnit;
    use std::num::NonZeroU32;

    let poland = SpeedLimit::new("Poland", NonZeroU32::new(90).unwrap(), SpeedUnit::Kmh).unwrap();
    let mut limits = MockSpeedLimits::new();
    assert!(limits.is_empty());

    limits.insert(poland.clone());
    let traffic_code = MockTrafficCode::new(
        limits.with(SpeedLimit::new("UK", NonZeroU32::new(60).unwrap(), SpeedUnit::Mph).unwrap()),
    );

    let limits = traffic_code.speed_limits();
    assert_eq!(limits.len(), 2);
    assert_eq!(limits.countries(), vec!["Poland", "UK"]);
    assert_eq!(limits.get("Poland"), Ok(&poland));
    limits.get("Germany").expect_err("Germany is not configured");
}

#[test]
fn test_mock_speed_limits_keep_insertion_order() {
    use super::speed_limit::SpeedUnit;
    use std::num::NonZeroU32;

    let limit = |country: &str, limit: u32| {
        SpeedLimit::new(country, NonZeroU32::new(limit).unwrap(), SpeedUnit::Kmh).unwrap()
    };
    let mut limits = MockSpeedLimits::new()
        .with(limit("UK", 60))
        .with(limit("Poland", 90))
        .with(limit("Austria", 100));
    assert_eq!(limits.countries(), vec!["UK", "Poland", "Austria"]);

    limits.insert(limit("Poland", 80));
    assert_eq!(limits.len(), 3);
    assert_eq!(limits.countries(), vec!["UK", "Poland", "Austria"]);
    assert_eq!(limits.get("Poland").map(|l| l.limit()), Ok(80));
}
