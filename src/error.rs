use std::error::Error;

#[derive(Debug, PartialEq, Clone)]
pub enum FleetError {
    NullArgument {
        what: String,
    },
    ConfigurationMissing {
        section: String,
    },
    InvalidConfiguration {
        what: String,
        value: String,
    },
    NotFound {
        what: String,
        key: String,
    },
    Failure {
        action: String,
        details: Option<String>,
    },
}

impl FleetError {
    pub(crate) fn invalid(what: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            what: what.into(),
            value: value.into(),
        }
    }
}

impl Error for FleetError {}

impl std::fmt::Display for FleetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NullArgument { what } => write!(f, "missing required argument: {}", what),
            Self::ConfigurationMissing { section } => {
                write!(f, "configuration section not found: {:?}", section)
            }
            Self::InvalidConfiguration { what, value } => {
                write!(f, "invalid {}: {}", what, value)
            }
            Self::NotFound { what, key } => write!(f, "{} not found: {:?}", what, key),
            Self::Failure { action, details } => write!(
                f,
                "{} failed: {}",
                action,
                details
                    .clone()
                    .unwrap_or("details not provided".to_string())
            ),
        }
    }
}

#[test]
fn test_display() {
    let err = FleetError::NullArgument {
        what: "configuration provider".to_string(),
    };
    assert_eq!(err.to_string(), "missing required argument: configuration provider");

    let err = FleetError::ConfigurationMissing {
        section: "trafficCode".to_string(),
    };
    assert_eq!(err.to_string(), "configuration section not found: \"trafficCode\"");

    let err = FleetError::invalid("speed unit", "knots");
    assert_eq!(err.to_string(), "invalid speed unit: knots");

    let err = FleetError::NotFound {
        what: "speed limit".to_string(),
        key: "Germany".to_string(),
    };
    assert_eq!(err.to_string(), "speed limit not found: \"Germany\"");

    let err = FleetError::Failure {
        action: "reading config file".to_string(),
        details: None,
    };
    assert_eq!(err.to_string(), "reading config file failed: details not provided");
}
