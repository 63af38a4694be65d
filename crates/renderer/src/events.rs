use foundation::geo::LngLat;
use serde_json::Value;

use crate::api::MarkerId;

/// A rendered feature hit by a click, as reported by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFeature {
    pub properties: Value,
    pub geometry: Value,
}

/// Asynchronous renderer notifications, delivered in renderer order.
///
/// The engine's correctness depends on this ordering; callers must not
/// reorder or coalesce events.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererEvent {
    /// Initial load finished; the renderer is usable.
    Load,
    /// A style set via `set_style` (or the initial style) finished loading.
    StyleReady,
    /// All pending tile/style work has settled.
    Idle,
    MoveEnd { center: LngLat, zoom: f64 },
    Click { feature: Option<PickedFeature> },
    MarkerDragEnd { marker: MarkerId },
}
