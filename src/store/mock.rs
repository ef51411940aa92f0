use super::{ConfigStore, Section, describe};
use crate::error::FleetError;
use std::collections::HashMap;

#[derive(Debug)]
pub struct MockStore {
    sections: HashMap<String, Section>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            sections: HashMap::new(),
        }
    }

    pub fn new_with_sections(sections: HashMap<String, Section>) -> Self {
        Self { sections }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, FleetError> {
        let document: Section = serde_yaml::from_str(yaml)
            .map_err(|e| FleetError::invalid("config document", e.to_string()))?;
        let mapping = match document {
            Section::Mapping(mapping) => mapping,
            Section::Null => return Ok(Self::new()),
            other => {
                return Err(FleetError::invalid(
                    "config document",
                    format!("expected a mapping at the root, got {}", describe(&other)),
                ));
            }
        };

        let mut sections = HashMap::new();
        for (name, section) in mapping {
            let name = name
                .as_str()
                .ok_or(FleetError::invalid("section name", describe(&name)))?;
            sections.insert(name.to_string(), section);
        }
        Ok(Self { sections })
    }
}

impl ConfigStore for MockStore {
    fn section(&self, name: &str) -> Result<Option<Section>, FleetError> {
        Ok(self.sections.get(name).cloned())
    }
}

#[test]
fn test_mock_store() {
    let store = MockStore::new();
    assert_eq!(store.section("trafficCode"), Ok(None));

    let store = MockStore::from_yaml("trafficCode:\n  speedLimits: []\nother: 1\n")
        .expect("failed to build store");
    assert!(store.section("trafficCode").unwrap().is_some());
    assert!(store.section("other").unwrap().is_some());
    assert!(store.section("missing").unwrap().is_none());

    MockStore::from_yaml("42").expect_err("root must be a mapping");
    MockStore::from_yaml("1: trafficCode").expect_err("section names must be strings");
}
