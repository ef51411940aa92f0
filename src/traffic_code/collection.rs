use super::speed_limit::SpeedLimit;
use crate::error::FleetError;
use crate::store::{Section, describe};
use std::collections::HashMap;

pub const SPEED_LIMIT: &str = "speed limit";

/// Read-only lookup of speed limits by exact, case-sensitive country name.
pub trait SpeedLimits {
    fn get(&self, country_name: &str) -> Result<&SpeedLimit, FleetError>;
    fn countries(&self) -> Vec<&str>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpeedLimitCollection {
    entries: HashMap<String, SpeedLimit>,
    // keys in the order they appeared in the store
    order: Vec<String>,
}

impl SpeedLimitCollection {
    pub fn from_entries(limits: Vec<SpeedLimit>) -> Result<Self, FleetError> {
        let mut entries = HashMap::with_capacity(limits.len());
        let mut order = Vec::with_capacity(limits.len());
        for limit in limits {
            let country = limit.country_name().to_string();
            if entries.contains_key(&country) {
                return Err(FleetError::invalid(
                    "speed limits",
                    format!("duplicate country {:?}", country),
                ));
            }
            order.push(country.clone());
            entries.insert(country, limit);
        }
        Ok(Self { entries, order })
    }

    /// Builds the collection from the `speedLimits` value of a section. An absent
    /// or null value is an empty collection.
    pub(crate) fn from_section(value: Option<&Section>) -> Result<Self, FleetError> {
        let items = match value {
            None | Some(Section::Null) => return Ok(Self::default()),
            Some(Section::Sequence(items)) => items,
            Some(other) => {
                return Err(FleetError::invalid(
                    "speed limits",
                    format!("expected a sequence, got {}", describe(other)),
                ));
            }
        };

        let limits = items
            .iter()
            .map(SpeedLimit::from_section)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_entries(limits)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeedLimit> {
        self.order.iter().filter_map(|country| self.entries.get(country))
    }
}

impl SpeedLimits for SpeedLimitCollection {
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

#[cfg(test)]
fn collection(yaml: &str) -> Result<SpeedLimitCollection, FleetError> {
    let value: Section = serde_yaml::from_str(yaml).expect("invalid test yaml");
    SpeedLimitCollection::from_section(Some(&value))
}

#[test]
fn test_get() {
    use super::speed_limit::SpeedUnit;

    let limits = collection(
        "- {country: Poland, limit: 90, unit: kmh}\n- {country: UK, limit: 60, unit: mph}\n",
    )
    .expect("failed to build collection");
    assert_eq!(limits.len(), 2);
    assert_eq!(limits.countries(), vec!["Poland", "UK"]);

    let poland = limits.get("Poland").expect("Poland should be present");
    assert_eq!(poland.country_name(), "Poland");
    assert_eq!(poland.limit(), 90);
    assert_eq!(poland.unit(), SpeedUnit::Kmh);

    let uk = limits.get("UK").expect("UK should be present");
    assert_eq!(uk.country_name(), "UK");
    assert_eq!(uk.limit(), 60);
    assert_eq!(uk.unit(), SpeedUnit::Mph);

    let err = limits.get("Germany").expect_err("Germany is not configured");
    assert_eq!(
        err,
        FleetError::NotFound {
            what: SPEED_LIMIT.to_string(),
            key: "Germany".to_string(),
        }
    );

    // lookups are case-sensitive
    limits.get("poland").expect_err("lookup should be case-sensitive");
    limits.get("uk").expect_err("lookup should be case-sensitive");

    let iterated: Vec<&str> = limits.iter().map(|l| l.country_name()).collect();
    assert_eq!(iterated, vec!["Poland", "UK"]);
}

#[test]
fn test_empty() {
    let limits = SpeedLimitCollection::from_section(None).expect("absent value is empty");
    assert!(limits.is_empty());
    assert!(limits.countries().is_empty());

    let limits = collection("~").expect("null value is empty");
    assert!(limits.is_empty());

    let limits = collection("[]").expect("empty sequence is empty");
    assert!(limits.is_empty());
    limits.get("Poland").expect_err("empty collection has no entries");
}

#[test]
fn test_invalid() {
    let err = collection(
        "- {country: Poland, limit: 90, unit: kmh}\n- {country: Poland, limit: 70, unit: kmh}\n",
    )
    .expect_err("duplicate country");
    assert_eq!(
        err,
        FleetError::invalid("speed limits", "duplicate country \"Poland\"")
    );

    let err = collection("{country: Poland, limit: 90, unit: kmh}").expect_err("not a sequence");
    assert_eq!(
        err,
        FleetError::invalid("speed limits", "expected a sequence, got a mapping")
    );

    // one bad entry fails the whole collection
    let err = collection(
        "- {country: Poland, limit: 90, unit: kmh}\n- {country: UK, unit: mph}\n",
    )
    .expect_err("missing limit");
    assert!(matches!(err, FleetError::InvalidConfiguration { .. }));
}
