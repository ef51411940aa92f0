use super::ConfigurationProvider;
#[cfg(test)]
use super::MockConfigurationProvider;
use crate::error::FleetError;
use crate::traffic_code::TrafficCode;
#[cfg(test)]
use crate::traffic_code::TrafficCodeSection;
use log::{debug, trace};
use std::cell::RefCell;
use std::rc::Rc;

/// Keeps the first successfully loaded traffic code until `invalidate` is called.
/// Failed loads are not cached.
pub struct CachedProvider {
    inner: Box<dyn ConfigurationProvider>,
    cached: RefCell<Option<Rc<dyn TrafficCode>>>,
}

impl CachedProvider {
    pub fn new(inner: Box<dyn ConfigurationProvider>) -> Self {
        Self {
            inner,
            cached: RefCell::new(None),
        }
    }

    pub fn invalidate(&self) {
        if self.cached.borrow_mut().take().is_some() {
            debug!("traffic code cache invalidated");
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cached.borrow().is_some()
    }
}

impl ConfigurationProvider for CachedProvider {
    fn traffic_code(&self) -> Result<Rc<dyn TrafficCode>, FleetError> {
        if let Some(traffic_code) = self.cached.borrow().clone() {
            trace!("traffic code cache hit");
            return Ok(traffic_code);
        }

        trace!("traffic code cache miss");
        let traffic_code = self.inner.traffic_code()?;
        *self.cached.borrow_mut() = Some(Rc::clone(&traffic_code));
        Ok(traffic_code)
    }
}

#[cfg(test)]
fn loading_provider(times: usize) -> MockConfigurationProvider {
    let mut mock_provider = MockConfigurationProvider::new();
    mock_provider
        .expect_traffic_code()
        .times(times)
        .returning(|| {
            let traffic_code: Rc<dyn TrafficCode> = Rc::new(TrafficCodeSection::default());
            Ok(traffic_code)
        });
    mock_provider
}

#[test]
fn test_caches_first_load() {
    let provider = CachedProvider::new(Box::new(loading_provider(1)));
    assert!(!provider.is_cached());

    let first = provider.traffic_code().expect("failed to load traffic code");
    assert!(provider.is_cached());
    let second = provider.traffic_code().expect("failed to load traffic code");
    assert!(Rc::ptr_eq(&first, &second));
}

#[test]
fn test_invalidate() {
    let provider = CachedProvider::new(Box::new(loading_provider(2)));

    let first = provider.traffic_code().expect("failed to load traffic code");
    provider.invalidate();
    assert!(!provider.is_cached());
    let second = provider.traffic_code().expect("failed to load traffic code");
    assert!(!Rc::ptr_eq(&first, &second));

    // invalidating an empty cache is a no-op
    provider.invalidate();
    provider.invalidate();
}

#[test]
fn test_errors_not_cached() {
    use std::cell::Cell;

    struct FailsOnce {
        calls: Cell<usize>,
    }

    impl ConfigurationProvider for FailsOnce {
        fn traffic_code(&self) -> Result<Rc<dyn TrafficCode>, FleetError> {
            self.calls.set(self.calls.get() + 1);
            match self.calls.get() {
                1 => Err(FleetError::ConfigurationMissing {
                    section: "trafficCode".to_string(),
                }),
                _ => Ok(Rc::new(TrafficCodeSection::default())),
            }
        }
    }

    let provider = CachedProvider::new(Box::new(FailsOnce {
        calls: Cell::new(0),
    }));
    provider.traffic_code().err().expect("first load should fail");
    assert!(!provider.is_cached());
    provider.traffic_code().expect("second load should succeed");
    assert!(provider.is_cached());
}
