use super::pricing::TicketPricing;
#[cfg(test)]
use super::pricing::MockTicketPricing;
use super::{Amount, Speed};
use crate::error::FleetError;
use crate::provider::ConfigurationProvider;
#[cfg(test)]
use crate::provider::MockConfigurationProvider;
#[cfg(test)]
use crate::provider::mock::MockProvider;
use crate::traffic_code::SpeedUnit;
#[cfg(test)]
use crate::traffic_code::mock::{MockSpeedLimits, MockTrafficCode};
#[cfg(test)]
use crate::traffic_code::SpeedLimit;
use log::debug;
#[cfg(test)]
use mockall::predicate::eq;
use std::rc::Rc;

const PROVIDER_ARGUMENT: &str = "configuration provider";
const PRICING_ARGUMENT: &str = "ticket pricing";
const MEASURED_SPEED: &str = "measured speed";

/// Computes speeding tickets against the configured traffic code. The provider
/// is only queried when a ticket is computed, never at construction.
pub struct TicketCalculator {
    provider: Rc<dyn ConfigurationProvider>,
    pricing: Option<Box<dyn TicketPricing>>,
}

impl TicketCalculator {
    pub fn new(provider: Rc<dyn ConfigurationProvider>) -> Self {
        Self {
            provider,
            pricing: None,
        }
    }

    pub fn builder() -> TicketCalculatorBuilder {
        TicketCalculatorBuilder::default()
    }

    /// How far `measured` is above the country's limit, in the limit's unit.
    /// Negative or non-finite measurements are rejected before the provider is
    /// queried.
    pub fn excess(&self, country: &str, measured: Speed) -> Result<u32, FleetError> {
        self.excess_with_unit(country, measured)
            .map(|(excess, _)| excess)
    }

    pub fn compute_ticket(&self, country: &str, measured: Speed) -> Result<Amount, FleetError> {
        let pricing = self.pricing.as_ref().ok_or(FleetError::NullArgument {
            what: PRICING_ARGUMENT.to_string(),
        })?;

        let (excess, unit) = self.excess_with_unit(country, measured)?;
        let amount = match excess {
            0 => Amount::ZERO,
            _ => pricing.price(excess, unit),
        };
        debug!(
            "ticket for {} in {:?}: excess {} {}, amount {}",
            measured, country, excess, unit, amount
        );
        Ok(amount)
    }

    fn excess_with_unit(
        &self,
        country: &str,
        measured: Speed,
    ) -> Result<(u32, SpeedUnit), FleetError> {
        if !measured.value().is_finite() || measured.value() < 0.0 {
            return Err(FleetError::invalid(MEASURED_SPEED, measured.to_string()));
        }
        let traffic_code = self.provider.traffic_code()?;
        let limit = traffic_code.speed_limits().get(country)?;

        let measured = measured.in_unit(limit.unit()).trunc();
        let allowed = limit.limit() as f64;
        let excess = if measured > allowed {
            (measured - allowed) as u32
        } else {
            0
        };
        Ok((excess, limit.unit()))
    }
}

#[derive(Default)]
pub struct TicketCalculatorBuilder {
    provider: Option<Rc<dyn ConfigurationProvider>>,
    pricing: Option<Box<dyn TicketPricing>>,
}

impl TicketCalculatorBuilder {
    pub fn provider(mut self, provider: Rc<dyn ConfigurationProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn pricing(mut self, pricing: Box<dyn TicketPricing>) -> Self {
        self.pricing = Some(pricing);
        self
    }

    pub fn build(self) -> Result<TicketCalculator, FleetError> {
        let provider = self.provider.ok_or(FleetError::NullArgument {
            what: PROVIDER_ARGUMENT.to_string(),
        })?;
        Ok(TicketCalculator {
            provider,
            pricing: self.pricing,
        })
    }
}

#[cfg(test)]
fn limit(country: &str, limit: u32, unit: SpeedUnit) -> SpeedLimit {
    SpeedLimit::new(country, std::num::NonZeroU32::new(limit).unwrap(), unit).unwrap()
}

#[cfg(test)]
fn provider() -> Rc<MockProvider> {
    Rc::new(MockProvider::new(MockTrafficCode::new(
        MockSpeedLimits::new()
            .with(limit("Poland", 90, SpeedUnit::Kmh))
            .with(limit("UK", 60, SpeedUnit::Mph)),
    )))
}

#[test]
fn test_builder_requires_provider() {
    let err = TicketCalculator::builder()
        .build()
        .err()
        .expect("should fail without provider");
    assert_eq!(
        err,
        FleetError::NullArgument {
            what: "configuration provider".to_string(),
        }
    );
}

#[test]
fn test_construction_does_not_query_provider() {
    // no expectations: any call to traffic_code would panic
    let mock_provider = Rc::new(MockConfigurationProvider::new());
    assert!(
        TicketCalculator::builder()
            .provider(mock_provider.clone())
            .build()
            .is_ok()
    );
    let _calculator = TicketCalculator::new(mock_provider);

    let provider = provider();
    let _calculator = TicketCalculator::builder()
        .provider(provider.clone())
        .pricing(Box::new(MockTicketPricing::new()))
        .build();
    assert_eq!(provider.calls(), 0);
}

#[test]
fn test_excess() {
    let provider = provider();
    let calculator = TicketCalculator::new(provider.clone());

    assert_eq!(calculator.excess("Poland", Speed::kmh(80.0)), Ok(0));
    assert_eq!(calculator.excess("Poland", Speed::kmh(90.0)), Ok(0));
    assert_eq!(calculator.excess("Poland", Speed::kmh(90.9)), Ok(0));
    assert_eq!(calculator.excess("Poland", Speed::kmh(111.0)), Ok(21));
    // 70 mph is 112.65 km/h
    assert_eq!(calculator.excess("Poland", Speed::mph(70.0)), Ok(22));
    // 112 km/h is 69.59 mph
    assert_eq!(calculator.excess("UK", Speed::kmh(112.0)), Ok(9));
    assert_eq!(provider.calls(), 6);

    let err = calculator
        .excess("Germany", Speed::kmh(200.0))
        .expect_err("Germany is not configured");
    assert!(matches!(err, FleetError::NotFound { .. }));
}

#[test]
fn test_compute_ticket() {
    let mut mock_pricing = MockTicketPricing::new();
    mock_pricing
        .expect_price()
        .with(eq(21), eq(SpeedUnit::Kmh))
        .times(1)
        .return_const(Amount::new(300));
    mock_pricing
        .expect_price()
        .with(eq(5), eq(SpeedUnit::Mph))
        .times(1)
        .return_const(Amount::new(100));

    let calculator = TicketCalculator::builder()
        .provider(provider())
        .pricing(Box::new(mock_pricing))
        .build()
        .expect("failed to build calculator");

    assert_eq!(
        calculator.compute_ticket("Poland", Speed::kmh(111.0)),
        Ok(Amount::new(300))
    );
    assert_eq!(
        calculator.compute_ticket("UK", Speed::mph(65.0)),
        Ok(Amount::new(100))
    );
    // at or below the limit the pricing rule is not consulted
    assert_eq!(
        calculator.compute_ticket("UK", Speed::mph(60.0)),
        Ok(Amount::ZERO)
    );
}

#[test]
fn test_compute_ticket_errors() {
    let calculator = TicketCalculator::new(provider());
    let err = calculator
        .compute_ticket("Poland", Speed::kmh(150.0))
        .expect_err("no pricing configured");
    assert_eq!(
        err,
        FleetError::NullArgument {
            what: "ticket pricing".to_string(),
        }
    );

    let calculator = TicketCalculator::builder()
        .provider(provider())
        .pricing(Box::new(MockTicketPricing::new()))
        .build()
        .expect("failed to build calculator");
    let err = calculator
        .compute_ticket("Germany", Speed::kmh(150.0))
        .expect_err("Germany is not configured");
    assert_eq!(
        err,
        FleetError::NotFound {
            what: "speed limit".to_string(),
            key: "Germany".to_string(),
        }
    );

    let missing = FleetError::ConfigurationMissing {
        section: "trafficCode".to_string(),
    };
    let calculator = TicketCalculator::builder()
        .provider(Rc::new(MockProvider::new_with_error(missing.clone())))
        .pricing(Box::new(MockTicketPricing::new()))
        .build()
        .expect("failed to build calculator");
    assert_eq!(
        calculator.compute_ticket("Poland", Speed::kmh(150.0)),
        Err(missing)
    );
}

#[test]
fn test_rejects_invalid_measurement() {
    let provider = provider();
    let calculator = TicketCalculator::builder()
        .provider(provider.clone())
        .pricing(Box::new(MockTicketPricing::new()))
        .build()
        .expect("failed to build calculator");

    for measured in [
        Speed::kmh(f64::NAN),
        Speed::kmh(f64::INFINITY),
        Speed::mph(f64::NEG_INFINITY),
        Speed::kmh(-5.0),
    ] {
        let err = calculator
            .excess("Poland", measured)
            .expect_err("measurement should be rejected");
        assert_eq!(
            err,
            FleetError::invalid("measured speed", measured.to_string())
        );
    }
    let err = calculator
        .compute_ticket("Poland", Speed::kmh(f64::NAN))
        .expect_err("NaN should not produce a ticket");
    assert!(matches!(err, FleetError::InvalidConfiguration { .. }));
    assert_eq!(provider.calls(), 0);

    assert_eq!(calculator.excess("Poland", Speed::kmh(0.0)), Ok(0));
    assert_eq!(provider.calls(), 1);
}
