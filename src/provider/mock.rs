use super::ConfigurationProvider;
use crate::error::FleetError;
use crate::traffic_code::TrafficCode;
use std::cell::Cell;
use std::rc::Rc;

/// In-memory provider returning a fixed traffic code, or a fixed error.
pub struct MockProvider {
    result: Result<Rc<dyn TrafficCode>, FleetError>,
    calls: Cell<usize>, // the trait only hands out &self
}

impl MockProvider {
    pub fn new(traffic_code: impl TrafficCode + 'static) -> Self {
        Self {
            result: Ok(Rc::new(traffic_code)),
            calls: Cell::new(0),
        }
    }

    pub fn new_with_error(error: FleetError) -> Self {
        Self {
            result: Err(error),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ConfigurationProvider for MockProvider {
    fn traffic_code(&self) -> Result<Rc<dyn TrafficCode>, FleetError> {
        self.calls.set(self.calls.get() + 1);
        self.result.clone()
    }
}

#[test]
fn test_mock_provider() {
    use crate::traffic_code::mock::{MockSpeedLimits, MockTrafficCode};

    let provider = MockProvider::new(MockTrafficCode::new(MockSpeedLimits::new()));
    assert_eq!(provider.calls(), 0);
    let traffic_code = provider.traffic_code().expect("failed to get traffic code");
    assert!(traffic_code.speed_limits().is_empty());
    assert_eq!(provider.calls(), 1);

    let provider = MockProvider::new_with_error(FleetError::ConfigurationMissing {
        section: "trafficCode".to_string(),
    });
    provider.traffic_code().err().expect("should fail");
    assert_eq!(provider.calls(), 1);
}
