use super::ConfigurationProvider;
use crate::error::FleetError;
use crate::store::ConfigStore;
use crate::store::file::FileStore;
#[cfg(test)]
use crate::store::MockConfigStore;
use crate::traffic_code::{SpeedLimits, TRAFFIC_CODE_SECTION, TrafficCode, TrafficCodeSection};
use log::debug;
#[cfg(test)]
use mockall::predicate::eq;
use std::rc::Rc;

/// Reads the traffic code from a `ConfigStore` on every call. Nothing is cached.
pub struct StoreProvider {
    store: Box<dyn ConfigStore>,
}

impl StoreProvider {
    pub fn new(store: Box<dyn ConfigStore>) -> Self {
        Self { store }
    }

    pub fn from_env() -> Result<Self, FleetError> {
        Ok(Self::new(Box::new(FileStore::from_env()?)))
    }
}

impl ConfigurationProvider for StoreProvider {
    fn traffic_code(&self) -> Result<Rc<dyn TrafficCode>, FleetError> {
        let section = self.store.section(TRAFFIC_CODE_SECTION)?.ok_or(
            FleetError::ConfigurationMissing {
                section: TRAFFIC_CODE_SECTION.to_string(),
            },
        )?;
        let traffic_code = TrafficCodeSection::from_section(&section)?;
        debug!(
            "loaded {} speed limits from section {:?}",
            traffic_code.collection().len(),
            TRAFFIC_CODE_SECTION
        );
        Ok(Rc::new(traffic_code))
    }
}

#[cfg(test)]
fn yaml(yaml: &str) -> crate::store::Section {
    serde_yaml::from_str(yaml).expect("invalid test yaml")
}

#[test]
fn test_traffic_code() {
    use crate::traffic_code::SpeedUnit;

    let mut mock_store = MockConfigStore::new();
    mock_store
        .expect_section()
        .with(eq(TRAFFIC_CODE_SECTION))
        .times(1)
        .return_const(Ok(Some(yaml(
            "speedLimits:\n  - {country: Poland, limit: 90, unit: kmh}\n  - {country: UK, limit: 60, unit: mph}\n",
        ))));
    let provider = StoreProvider::new(Box::new(mock_store));

    let traffic_code = provider.traffic_code().expect("failed to load traffic code");
    assert_eq!(traffic_code.speed_limits().len(), 2);
    assert_eq!(traffic_code.speed_limits().countries(), vec!["Poland", "UK"]);
    let poland = traffic_code
        .speed_limits()
        .get("Poland")
        .expect("Poland should be present");
    assert_eq!(poland.country_name(), "Poland");
    assert_eq!(poland.limit(), 90);
    assert_eq!(poland.unit(), SpeedUnit::Kmh);
}

#[test]
fn test_missing_section() {
    let mut mock_store = MockConfigStore::new();
    mock_store
        .expect_section()
        .with(eq(TRAFFIC_CODE_SECTION))
        .return_const(Ok(None));
    let provider = StoreProvider::new(Box::new(mock_store));

    let err = provider.traffic_code().err().expect("should fail");
    assert_eq!(
        err,
        FleetError::ConfigurationMissing {
            section: TRAFFIC_CODE_SECTION.to_string(),
        }
    );
}

#[test]
fn test_malformed_section() {
    let mut mock_store = MockConfigStore::new();
    mock_store
        .expect_section()
        .with(eq(TRAFFIC_CODE_SECTION))
        .return_const(Ok(Some(yaml(
            "speedLimits:\n  - {country: Poland, unit: kmh}\n",
        ))));
    let provider = StoreProvider::new(Box::new(mock_store));

    let err = provider.traffic_code().err().expect("should fail");
    assert!(matches!(err, FleetError::InvalidConfiguration { .. }));
}

#[test]
fn test_store_failure() {
    let failure = FleetError::Failure {
        action: "reading config file".to_string(),
        details: Some("permission denied".to_string()),
    };
    let mut mock_store = MockConfigStore::new();
    mock_store
        .expect_section()
        .return_const(Err(failure.clone()));
    let provider = StoreProvider::new(Box::new(mock_store));

    let err = provider.traffic_code().err().expect("should fail");
    assert_eq!(err, failure);
}

#[test]
fn test_idempotent() {
    let mut mock_store = MockConfigStore::new();
    mock_store
        .expect_section()
        .with(eq(TRAFFIC_CODE_SECTION))
        .times(2)
        .return_const(Ok(Some(yaml(
            "speedLimits:\n  - {country: Poland, limit: 90, unit: kmh}\n  - {country: UK, limit: 60, unit: mph}\n",
        ))));
    let provider = StoreProvider::new(Box::new(mock_store));

    let first = provider.traffic_code().expect("failed to load traffic code");
    let second = provider.traffic_code().expect("failed to load traffic code");
    assert!(!Rc::ptr_eq(&first, &second));

    let first = first.speed_limits();
    let second = second.speed_limits();
    assert_eq!(first.countries(), second.countries());
    for country in first.countries() {
        assert_eq!(first.get(country), second.get(country));
    }
}
