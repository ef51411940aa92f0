use crate::error::FleetError;
use crate::store::{Section, describe};
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::LazyLock;

// Non-empty, no leading or trailing whitespace
static COUNTRY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S(.*\S)?$").expect("failed to create country regex"));

const KMH_PER_MPH: f64 = 1.609344;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedUnit {
    Kmh,
    Mph,
}

impl SpeedUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kmh => "kmh",
            Self::Mph => "mph",
        }
    }

    pub fn convert(&self, value: f64, to: SpeedUnit) -> f64 {
        match (self, to) {
            (Self::Kmh, Self::Mph) => value / KMH_PER_MPH,
            (Self::Mph, Self::Kmh) => value * KMH_PER_MPH,
            _ => value,
        }
    }
}

impl FromStr for SpeedUnit {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kmh" => Ok(Self::Kmh),
            "mph" => Ok(Self::Mph),
            _ => Err(FleetError::invalid("speed unit", format!("{:?}", s))),
        }
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSpeedLimit {
    #[serde(alias = "name")]
    country: Option<String>,
    limit: Option<i64>,
    unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedLimit {
    country_name: String,
    limit: NonZeroU32,
    unit: SpeedUnit,
}

impl SpeedLimit {
    pub fn new(country_name: &str, limit: NonZeroU32, unit: SpeedUnit) -> Result<Self, FleetError> {
        if !COUNTRY_REGEX.is_match(country_name) {
            return Err(FleetError::invalid(
                "country name",
                format!("{:?}", country_name),
            ));
        }
        Ok(Self {
            country_name: country_name.to_string(),
            limit,
            unit,
        })
    }

    pub fn country_name(&self) -> &str {
        &self.country_name
    }

    pub fn limit(&self) -> u32 {
        self.limit.get()
    }

    pub fn unit(&self) -> SpeedUnit {
        self.unit
    }

    pub(crate) fn from_section(value: &Section) -> Result<Self, FleetError> {
        // serde would otherwise accept `[country, limit, unit]` as a struct
        if !value.is_mapping() {
            return Err(FleetError::invalid(
                "speed limit entry",
                format!("expected a mapping, got {}", describe(value)),
            ));
        }
        let raw: RawSpeedLimit = serde_yaml::from_value(value.clone())
            .map_err(|e| FleetError::invalid("speed limit entry", e.to_string()))?;

        let country = raw.country.ok_or(FleetError::invalid(
            "speed limit entry",
            "missing field `country`",
        ))?;
        let limit = raw.limit.ok_or(FleetError::invalid(
            "speed limit entry",
            format!("missing field `limit` for country {:?}", country),
        ))?;
        let unit = raw.unit.ok_or(FleetError::invalid(
            "speed limit entry",
            format!("missing field `unit` for country {:?}", country),
        ))?;

        let limit = u32::try_from(limit)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(FleetError::invalid(
                "speed limit",
                format!("{} for country {:?}", limit, country),
            ))?;
        Self::new(&country, limit, unit.parse()?)
    }
}

#[cfg(test)]
fn entry(yaml: &str) -> Result<SpeedLimit, FleetError> {
    let value: Section = serde_yaml::from_str(yaml).expect("invalid test yaml");
    SpeedLimit::from_section(&value)
}

#[test]
fn test_speed_unit() {
    assert_eq!("kmh".parse::<SpeedUnit>(), Ok(SpeedUnit::Kmh));
    assert_eq!("mph".parse::<SpeedUnit>(), Ok(SpeedUnit::Mph));
    // units are matched exactly
    assert_eq!(
        "Kmh".parse::<SpeedUnit>(),
        Err(FleetError::invalid("speed unit", "\"Kmh\""))
    );
    "MPH".parse::<SpeedUnit>().expect_err("upper-case unit should fail");
    assert_eq!(
        "knots".parse::<SpeedUnit>(),
        Err(FleetError::invalid("speed unit", "\"knots\""))
    );
    "".parse::<SpeedUnit>().expect_err("empty unit should fail");

    assert_eq!(SpeedUnit::Kmh.to_string(), "kmh");
    assert_eq!(SpeedUnit::Mph.to_string(), "mph");
}

#[test]
fn test_convert() {
    assert_eq!(SpeedUnit::Kmh.convert(90.0, SpeedUnit::Kmh), 90.0);
    assert_eq!(SpeedUnit::Mph.convert(60.0, SpeedUnit::Mph), 60.0);
    assert!((SpeedUnit::Mph.convert(60.0, SpeedUnit::Kmh) - 96.56064).abs() < 1e-9);
    assert!((SpeedUnit::Kmh.convert(96.56064, SpeedUnit::Mph) - 60.0).abs() < 1e-9);
}

#[test]
fn test_from_section() {
    let limit = entry("{country: Poland, limit: 90, unit: kmh}").expect("failed to parse entry");
    assert_eq!(limit.country_name(), "Poland");
    assert_eq!(limit.limit(), 90);
    assert_eq!(limit.unit(), SpeedUnit::Kmh);

    // `name` is accepted in place of `country`
    let limit = entry("{name: UK, limit: 60, unit: mph}").expect("failed to parse entry");
    assert_eq!(limit.country_name(), "UK");
    assert_eq!(limit.limit(), 60);
    assert_eq!(limit.unit(), SpeedUnit::Mph);

    let limit = entry("{country: United States, limit: 65, unit: mph}")
        .expect("failed to parse entry");
    assert_eq!(limit.country_name(), "United States");
}

#[test]
fn test_from_section_invalid() {
    let err = entry("{country: Poland, unit: kmh}").expect_err("missing limit");
    assert_eq!(
        err,
        FleetError::invalid(
            "speed limit entry",
            "missing field `limit` for country \"Poland\""
        )
    );

    let err = entry("{country: Poland, limit: 90}").expect_err("missing unit");
    assert_eq!(
        err,
        FleetError::invalid(
            "speed limit entry",
            "missing field `unit` for country \"Poland\""
        )
    );

    let err = entry("{limit: 90, unit: kmh}").expect_err("missing country");
    assert_eq!(
        err,
        FleetError::invalid("speed limit entry", "missing field `country`")
    );

    let err = entry("{country: Poland, limit: 0, unit: kmh}").expect_err("zero limit");
    assert_eq!(
        err,
        FleetError::invalid("speed limit", "0 for country \"Poland\"")
    );

    entry("{country: Poland, limit: -50, unit: kmh}").expect_err("negative limit");
    entry("{country: Poland, limit: 5000000000, unit: kmh}").expect_err("limit overflows u32");
    entry("{country: Poland, limit: fast, unit: kmh}").expect_err("non-numeric limit");
    entry("{country: Poland, limit: 90.5, unit: kmh}").expect_err("fractional limit");
    entry("{country: Poland, limit: 90, unit: knots}").expect_err("unknown unit");
    entry("{country: Poland, limit: 90, unit: KMH}").expect_err("upper-case unit");
    entry("{country: UK, limit: 60, unit: Mph}").expect_err("capitalised unit");
    entry("{country: '', limit: 90, unit: kmh}").expect_err("empty country");
    entry("{country: ' Poland', limit: 90, unit: kmh}").expect_err("padded country");
    entry("{country: Poland, limit: 90, unit: kmh, extra: 1}").expect_err("unknown field");
    entry("[Poland, 90, kmh]").expect_err("entry must be a mapping");
}
