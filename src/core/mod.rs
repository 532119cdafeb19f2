pub mod geometry;
pub mod lane_scale;
pub mod primitives;
pub mod scale;
pub mod tick_policy;
pub mod time_scale;
pub mod timebar;
pub mod types;

pub use geometry::{Geometry, LaneMetrics};
pub use lane_scale::LaneScale;
pub use scale::LinearScale;
pub use tick_policy::{AxisTick, TickFormat, TickSelection, TickUnit};
pub use time_scale::{TimeScale, TimeScaleZoomLimits};
pub use timebar::{BarId, DateValidationPolicy, TimeBar, TimeBarCollection, TimeBarJson};
pub use types::{Margins, Viewport};
