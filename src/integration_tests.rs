use crate::error::FleetError;
use crate::provider::ConfigurationProvider;
use crate::provider::cached::CachedProvider;
use crate::provider::mock::MockProvider;
use crate::provider::store::StoreProvider;
use crate::store::file::FileStore;
use crate::store::mock::MockStore;
use crate::ticket::{Amount, Speed, TariffTable, TicketCalculator};
use crate::traffic_code::mock::{MockSpeedLimits, MockTrafficCode};
use crate::traffic_code::SpeedUnit;
use flexi_logger::{Logger, WriteMode};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Once;

static LOGGER: Once = Once::new();

fn init_logger() {
    LOGGER.call_once(|| {
        if let Ok(handle) = Logger::try_with_env_or_str("info")
            .and_then(|logger| logger.log_to_stderr().write_mode(WriteMode::Direct).start())
        {
            // the handle has to outlive every test in the binary
            std::mem::forget(handle);
        }
    });
}

fn sample_config() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is not set");
    PathBuf::from(manifest_dir).join("config").join("fleet.yaml")
}

fn file_provider(path: PathBuf) -> StoreProvider {
    StoreProvider::new(Box::new(FileStore::new(path)))
}

fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("fleet.yaml");
    std::fs::write(&path, contents).expect("failed to write config file");
    path
}

#[test]
fn test_sample_config_poland() {
    init_logger();
    let provider = file_provider(sample_config());

    let traffic_code = provider.traffic_code().expect("failed to read traffic code");
    let poland = traffic_code
        .speed_limits()
        .get("Poland")
        .expect("Poland should be configured");
    assert_eq!(poland.country_name(), "Poland");
    assert_eq!(poland.limit(), 90);
    assert_eq!(poland.unit(), SpeedUnit::Kmh);
}

#[test]
fn test_sample_config_uk() {
    init_logger();
    let provider = file_provider(sample_config());

    let traffic_code = provider.traffic_code().expect("failed to read traffic code");
    let uk = traffic_code
        .speed_limits()
        .get("UK")
        .expect("UK should be configured");
    assert_eq!(uk.country_name(), "UK");
    assert_eq!(uk.limit(), 60);
    assert_eq!(uk.unit(), SpeedUnit::Mph);
}

#[test]
fn test_sample_config_unknown_country() {
    init_logger();
    let provider = file_provider(sample_config());

    let traffic_code = provider.traffic_code().expect("failed to read traffic code");
    let err = traffic_code
        .speed_limits()
        .get("Germany")
        .expect_err("Germany is not configured");
    assert_eq!(
        err,
        FleetError::NotFound {
            what: "speed limit".to_string(),
            key: "Germany".to_string(),
        }
    );
}

#[test]
fn test_missing_limit_field() {
    init_logger();
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = write_config(
        &dir,
        "trafficCode:\n  speedLimits:\n    - country: Poland\n      unit: kmh\n",
    );

    let err = file_provider(path).traffic_code().err().expect("should fail");
    assert!(matches!(err, FleetError::InvalidConfiguration { .. }));
}

#[test]
fn test_missing_section() {
    init_logger();
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = write_config(&dir, "fuelPolicy:\n  maxLitres: 80\n");

    let err = file_provider(path).traffic_code().err().expect("should fail");
    assert_eq!(
        err,
        FleetError::ConfigurationMissing {
            section: "trafficCode".to_string(),
        }
    );
}

#[test]
fn test_repeated_reads_are_content_equal() {
    init_logger();
    let provider = file_provider(sample_config());

    let first = provider.traffic_code().expect("failed to read traffic code");
    let second = provider.traffic_code().expect("failed to read traffic code");
    let (first, second) = (first.speed_limits(), second.speed_limits());
    assert_eq!(first.countries(), second.countries());
    for country in first.countries() {
        assert_eq!(first.get(country), second.get(country));
    }
}

#[test]
fn test_file_and_memory_stores_agree() {
    init_logger();
    let contents = std::fs::read_to_string(sample_config()).expect("failed to read sample config");
    let from_file = file_provider(sample_config());
    let from_memory =
        StoreProvider::new(Box::new(MockStore::from_yaml(&contents).expect("invalid sample")));

    let from_file = from_file.traffic_code().expect("failed to read traffic code");
    let from_memory = from_memory.traffic_code().expect("failed to read traffic code");
    assert_eq!(
        from_file.speed_limits().countries(),
        from_memory.speed_limits().countries()
    );
    for country in from_file.speed_limits().countries() {
        assert_eq!(
            from_file.speed_limits().get(country),
            from_memory.speed_limits().get(country)
        );
    }
}

#[test]
fn test_cached_provider_ignores_edits_until_invalidated() {
    init_logger();
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = write_config(
        &dir,
        "trafficCode:\n  speedLimits:\n    - {country: Poland, limit: 90, unit: kmh}\n",
    );
    let provider = CachedProvider::new(Box::new(file_provider(path)));
    let limit = |provider: &CachedProvider| {
        provider
            .traffic_code()
            .and_then(|tc| tc.speed_limits().get("Poland").map(|l| l.limit()))
    };
    assert_eq!(limit(&provider), Ok(90));

    write_config(
        &dir,
        "trafficCode:\n  speedLimits:\n    - {country: Poland, limit: 100, unit: kmh}\n",
    );
    assert_eq!(limit(&provider), Ok(90));

    provider.invalidate();
    assert_eq!(limit(&provider), Ok(100));
}

#[test]
fn test_calculator_construction() {
    init_logger();
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

    let provider = Rc::new(MockProvider::new(MockTrafficCode::new(MockSpeedLimits::new())));
    let calculator = TicketCalculator::builder().provider(provider.clone()).build();
    assert!(calculator.is_ok());
    assert_eq!(provider.calls(), 0);
}

#[test]
fn test_calculator_over_sample_config() {
    init_logger();
    let tariff = TariffTable::new(
        SpeedUnit::Kmh,
        vec![
            (1, Amount::new(50)),
            (11, Amount::new(100)),
            (21, Amount::new(300)),
        ],
    )
    .expect("failed to build tariff");
    let calculator = TicketCalculator::builder()
        .provider(Rc::new(CachedProvider::new(Box::new(file_provider(sample_config())))))
        .pricing(Box::new(tariff))
        .build()
        .expect("failed to build calculator");

    assert_eq!(
        calculator.compute_ticket("Poland", Speed::kmh(85.0)),
        Ok(Amount::ZERO)
    );
    assert_eq!(
        calculator.compute_ticket("Poland", Speed::kmh(105.0)),
        Ok(Amount::new(100))
    );
    // 8 mph over in the UK is 12.87 km/h over on a km/h tariff
    assert_eq!(
        calculator.compute_ticket("UK", Speed::mph(68.0)),
        Ok(Amount::new(100))
    );
    calculator
        .compute_ticket("Germany", Speed::kmh(200.0))
        .expect_err("Germany is not configured");
}
