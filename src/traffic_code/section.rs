use super::collection::{SpeedLimitCollection, SpeedLimits};
use crate::error::FleetError;
use crate::store::{Section, describe};

pub const TRAFFIC_CODE_SECTION: &str = "trafficCode";
const SPEED_LIMITS_KEY: &str = "speedLimits";

pub trait TrafficCode {
    fn speed_limits(&self) -> &dyn SpeedLimits;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrafficCodeSection {
    speed_limits: SpeedLimitCollection,
}

impl TrafficCodeSection {
    pub fn new(speed_limits: SpeedLimitCollection) -> Self {
        Self { speed_limits }
    }

    pub fn from_section(section: &Section) -> Result<Self, FleetError> {
        let speed_limits = match section {
            // `trafficCode:` with no body
            Section::Null => SpeedLimitCollection::default(),
            Section::Mapping(mapping) => {
                SpeedLimitCollection::from_section(mapping.get(SPEED_LIMITS_KEY))?
            }
            other => {
                return Err(FleetError::invalid(
                    "traffic code section",
                    format!("expected a mapping, got {}", describe(other)),
                ));
            }
        };
        Ok(Self { speed_limits })
    }

    pub fn collection(&self) -> &SpeedLimitCollection {
        &self.speed_limits
    }
}

impl TrafficCode for TrafficCodeSection {
    fn speed_limits(&self) -> &dyn SpeedLimits {
        &self.speed_limits
    }
}

#[cfg(test)]
fn section(yaml: &str) -> Result<TrafficCodeSection, FleetError> {
    let value: Section = serde_yaml::from_str(yaml).expect("invalid test yaml");
    TrafficCodeSection::from_section(&value)
}

#[test]
fn test_from_section() {
    let traffic_code = section(
        "speedLimits:\n  - {country: Poland, limit: 90, unit: kmh}\n  - {country: UK, limit: 60, unit: mph}\n",
    )
    .expect("failed to load section");
    let limits = traffic_code.speed_limits();
    assert_eq!(limits.countries(), vec!["Poland", "UK"]);
    assert_eq!(limits.get("Poland").map(|l| l.limit()), Ok(90));
    assert_eq!(traffic_code.collection().len(), 2);
}

#[test]
fn test_always_has_collection() {
    let traffic_code = section("~").expect("empty section should load");
    assert!(traffic_code.speed_limits().is_empty());

    let traffic_code = section("{}").expect("section without speedLimits should load");
    assert!(traffic_code.speed_limits().is_empty());

    let traffic_code = section("speedLimits:\n").expect("null speedLimits should load");
    assert!(traffic_code.speed_limits().is_empty());
}

#[test]
fn test_invalid() {
    let err = section("just a string").expect_err("section must be a mapping");
    assert_eq!(
        err,
        FleetError::invalid("traffic code section", "expected a mapping, got a string")
    );

    section("speedLimits: 90").expect_err("speedLimits must be a sequence");
    section("speedLimits:\n  - {country: Poland, limit: 90}\n").expect_err("missing unit");
}
