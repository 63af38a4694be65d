use crate::descriptors::{
    BasemapDescriptor, CustomLayerDescriptor, MarkerDescriptor, OverlayLayerDescriptor,
};
use crate::model::SceneModel;

/// Last-observed baseline for one independently-varying value.
///
/// `observe` returns `true` (and records the new baseline) only when the
/// value differs structurally from the last observation. The first
/// observation always reports a change.
#[derive(Debug, Clone, Default)]
pub struct ChangeCell<T> {
    baseline: Option<T>,
}

impl<T: Clone + PartialEq> ChangeCell<T> {
    pub fn new() -> Self {
        Self { baseline: None }
    }

    /// Returns `true` if the value changed since the last observation.
    pub fn observe(&mut self, new: &T) -> bool {
        if self.baseline.as_ref() == Some(new) {
            return false;
        }
        self.baseline = Some(new.clone());
        true
    }
}

fn observe_slice<T: Clone + PartialEq>(baseline: &mut Option<Vec<T>>, new: &[T]) -> bool {
    if baseline.as_deref() == Some(new) {
        return false;
    }
    *baseline = Some(new.to_vec());
    true
}

/// Per-slice structural-equality gate over the scene model.
///
/// The host re-delivers the full scene on every external event; this gate
/// is what keeps an unrelated slice change from triggering a full
/// teardown/rebuild in every synchronizer.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    basemaps: Option<Vec<BasemapDescriptor>>,
    overlays: Option<Vec<OverlayLayerDescriptor>>,
    custom_layers: Option<Vec<CustomLayerDescriptor>>,
    markers: Option<Vec<MarkerDescriptor>>,
    selected_item: ChangeCell<String>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe_basemaps(&mut self, new: &[BasemapDescriptor]) -> bool {
        observe_slice(&mut self.basemaps, new)
    }

    pub fn observe_overlays(&mut self, new: &[OverlayLayerDescriptor]) -> bool {
        observe_slice(&mut self.overlays, new)
    }

    pub fn observe_custom_layers(&mut self, new: &[CustomLayerDescriptor]) -> bool {
        observe_slice(&mut self.custom_layers, new)
    }

    pub fn observe_markers(&mut self, new: &[MarkerDescriptor]) -> bool {
        observe_slice(&mut self.markers, new)
    }

    pub fn observe_selected_item(&mut self, new: &str) -> bool {
        self.selected_item.observe(&new.to_string())
    }

    /// Observes every slice of `scene` at once.
    pub fn observe_scene(&mut self, scene: &SceneModel) -> SceneChanges {
        SceneChanges {
            basemaps: self.observe_basemaps(&scene.basemaps),
            overlays: self.observe_overlays(&scene.overlays),
            custom_layers: self.observe_custom_layers(&scene.custom_layers),
            markers: self.observe_markers(&scene.markers),
            selected_item: self.observe_selected_item(&scene.selected_item_id),
        }
    }
}

/// Which slices changed in one scene delivery.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SceneChanges {
    pub basemaps: bool,
    pub overlays: bool,
    pub custom_layers: bool,
    pub markers: bool,
    pub selected_item: bool,
}

impl SceneChanges {
    pub fn any(&self) -> bool {
        self.basemaps || self.overlays || self.custom_layers || self.markers || self.selected_item
    }

    /// Accumulates changes observed while work had to be deferred.
    pub fn merge(&mut self, other: Self) {
        self.basemaps |= other.basemaps;
        self.overlays |= other.overlays;
        self.custom_layers |= other.custom_layers;
        self.markers |= other.markers;
        self.selected_item |= other.selected_item;
    }
}
