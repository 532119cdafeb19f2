mod collaborators;
mod drag_controller;
mod json_contract;
mod options;
mod plugin_dispatch;
mod plugin_registry;
mod render_coordinator;
mod scene_snapshot;
mod time_scale_controller;
mod time_scale_zoom_factor_resolver;
mod timebar_controller;
mod visibility_controller;
mod widget;

pub use collaborators::{
    Clock, DatePickerControl, FixedClock, MapCollaborator, SystemClock, TimelineCollaborators,
};
pub use json_contract::{SCENE_SNAPSHOT_JSON_SCHEMA_V1, SceneSnapshotJsonContractV1};
pub use options::{DEFAULT_WHEEL_ZOOM_STEP, NowMarkerPolicy, TimelineOptions};
pub use scene_snapshot::{BarSnapshot, SceneSnapshot};
pub use widget::TimelineWidget;
