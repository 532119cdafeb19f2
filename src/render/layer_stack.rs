use serde::{Deserialize, Serialize};

/// Drawing layers of one timeline frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneLayerKind {
    /// Lane separators.
    Lanes,
    Bars,
    /// Per-bar event timestamps.
    Details,
    Labels,
    Axis,
}

/// Back-to-front paint order. Date markers are painted after every layer.
pub const CANONICAL_LAYER_ORDER: [SceneLayerKind; 5] = [
    SceneLayerKind::Lanes,
    SceneLayerKind::Bars,
    SceneLayerKind::Details,
    SceneLayerKind::Labels,
    SceneLayerKind::Axis,
];
