pub mod file;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

use crate::error::FleetError;
#[cfg(test)]
use mockall::automock;

/// Raw, unvalidated contents of one named section.
pub type Section = serde_yaml::Value;

/// Anything that can hand out named configuration sections.
#[cfg_attr(test, automock)]
pub trait ConfigStore {
    /// `Ok(None)` means the store was readable but has no section called `name`.
    fn section(&self, name: &str) -> Result<Option<Section>, FleetError>;
}

pub(crate) fn describe(value: &Section) -> &'static str {
    match value {
        Section::Null => "null",
        Section::Bool(_) => "a boolean",
        Section::Number(_) => "a number",
        Section::String(_) => "a string",
        Section::Sequence(_) => "a sequence",
        Section::Mapping(_) => "a mapping",
        Section::Tagged(_) => "a tagged value",
    }
}

#[test]
fn test_describe() {
    assert_eq!(describe(&Section::Null), "null");
    assert_eq!(describe(&Section::String("kmh".to_string())), "a string");
    assert_eq!(describe(&Section::Sequence(vec![])), "a sequence");
    assert_eq!(
        describe(&Section::Mapping(serde_yaml::Mapping::new())),
        "a mapping"
    );
}
