pub mod collection;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod section;
pub mod speed_limit;

pub use collection::{SpeedLimitCollection, SpeedLimits};
pub use section::{TRAFFIC_CODE_SECTION, TrafficCode, TrafficCodeSection};
pub use speed_limit::{SpeedLimit, SpeedUnit};
