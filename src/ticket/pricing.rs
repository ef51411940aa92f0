use super::Amount;
use crate::error::FleetError;
use crate::traffic_code::SpeedUnit;
#[cfg(test)]
use mockall::automock;

/// Turns a speed excess into a fine. `excess` is expressed in `unit`.
#[cfg_attr(test, automock)]
pub trait TicketPricing {
    fn price(&self, excess: u32, unit: SpeedUnit) -> Amount;
}

/// Bracketed tariff: each bracket applies from its minimum excess upwards until
/// the next bracket starts. Excess below the first bracket is free.
#[derive(Debug, Clone, PartialEq)]
pub struct TariffTable {
    unit: SpeedUnit,
    brackets: Vec<(u32, Amount)>,
}

impl TariffTable {
    pub fn new(unit: SpeedUnit, mut brackets: Vec<(u32, Amount)>) -> Result<Self, FleetError> {
        if brackets.is_empty() {
            return Err(FleetError::invalid("tariff table", "no brackets"));
        }
        brackets.sort_by_key(|(min_excess, _)| *min_excess);
        if let Some(pair) = brackets.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(FleetError::invalid(
                "tariff table",
                format!("duplicate bracket starting at {}", pair[0].0),
            ));
        }
        if brackets[0].0 == 0 {
            return Err(FleetError::invalid(
                "tariff table",
                "brackets must start above zero excess",
            ));
        }
        Ok(Self { unit, brackets })
    }

    pub fn unit(&self) -> SpeedUnit {
        self.unit
    }
}

impl TicketPricing for TariffTable {
    fn price(&self, excess: u32, unit: SpeedUnit) -> Amount {
        let excess = unit.convert(excess as f64, self.unit).trunc() as u32;
        self.brackets
            .iter()
            .rev()
            .find(|(min_excess, _)| *min_excess <= excess)
            .map(|(_, amount)| *amount)
            .unwrap_or(Amount::ZERO)
    }
}

#[cfg(test)]
fn tariff() -> TariffTable {
    TariffTable::new(
        SpeedUnit::Kmh,
        vec![
            (21, Amount::new(300)),
            (1, Amount::new(50)),
            (11, Amount::new(100)),
        ],
    )
    .expect("failed to build tariff")
}

#[test]
fn test_price() {
    let tariff = tariff();
    assert_eq!(tariff.unit(), SpeedUnit::Kmh);
    assert_eq!(tariff.price(0, SpeedUnit::Kmh), Amount::ZERO);
    assert_eq!(tariff.price(1, SpeedUnit::Kmh), Amount::new(50));
    assert_eq!(tariff.price(10, SpeedUnit::Kmh), Amount::new(50));
    assert_eq!(tariff.price(11, SpeedUnit::Kmh), Amount::new(100));
    assert_eq!(tariff.price(20, SpeedUnit::Kmh), Amount::new(100));
    assert_eq!(tariff.price(21, SpeedUnit::Kmh), Amount::new(300));
    assert_eq!(tariff.price(150, SpeedUnit::Kmh), Amount::new(300));
}

#[test]
fn test_price_converts_unit() {
    let tariff = tariff();
    // 7 mph is 11.26 km/h
    assert_eq!(tariff.price(7, SpeedUnit::Mph), Amount::new(100));
    // 6 mph is 9.66 km/h
    assert_eq!(tariff.price(6, SpeedUnit::Mph), Amount::new(50));
}

#[test]
fn test_invalid_tariff() {
    TariffTable::new(SpeedUnit::Kmh, vec![]).expect_err("empty tariff");
    TariffTable::new(SpeedUnit::Kmh, vec![(0, Amount::new(10))]).expect_err("zero bracket");
    let err = TariffTable::new(
        SpeedUnit::Mph,
        vec![(5, Amount::new(10)), (5, Amount::new(20))],
    )
    .expect_err("duplicate bracket");
    assert_eq!(
        err,
        FleetError::invalid("tariff table", "duplicate bracket starting at 5")
    );
}
