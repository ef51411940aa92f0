pub mod calculator;
pub mod pricing;

use crate::traffic_code::SpeedUnit;
use std::fmt;

pub use calculator::{TicketCalculator, TicketCalculatorBuilder};
pub use pricing::{TariffTable, TicketPricing};

/// A measured speed. Any value can be constructed; the calculator refuses
/// NaN, infinite and negative values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speed {
    value: f64,
    unit: SpeedUnit,
}

impl Speed {
    pub fn new(value: f64, unit: SpeedUnit) -> Self {
        Self { value, unit }
    }

    pub fn kmh(value: f64) -> Self {
        Self::new(value, SpeedUnit::Kmh)
    }

    pub fn mph(value: f64) -> Self {
        Self::new(value, SpeedUnit::Mph)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> SpeedUnit {
        self.unit
    }

    pub fn in_unit(&self, unit: SpeedUnit) -> f64 {
        self.unit.convert(self.value, unit)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

/// Fine in whole units of the local currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[test]
fn test_speed() {
    let speed = Speed::mph(60.0);
    assert_eq!(speed.value(), 60.0);
    assert_eq!(speed.unit(), SpeedUnit::Mph);
    assert_eq!(speed.in_unit(SpeedUnit::Mph), 60.0);
    assert!((speed.in_unit(SpeedUnit::Kmh) - 96.56064).abs() < 1e-9);
    assert_eq!(Speed::kmh(90.5).to_string(), "90.5 kmh");
}

#[test]
fn test_amount() {
    assert!(Amount::ZERO.is_zero());
    assert_eq!(Amount::default(), Amount::ZERO);
    assert!(Amount::new(100) > Amount::new(50));
    assert_eq!(Amount::new(250).value(), 250);
    assert_eq!(Amount::new(250).to_string(), "250");
}
