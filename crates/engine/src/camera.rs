use foundation::geo::{LngLat, LngLatBounds, union_all};
use renderer::{FitOptions, MapRenderer};
use scene::CustomLayerDescriptor;
use tracing::debug;

/// Fits the camera to the selected item's content.
#[derive(Debug, Clone)]
pub struct CameraFitController {
    options: FitOptions,
}

impl CameraFitController {
    pub fn new(options: FitOptions) -> Self {
        Self { options }
    }

    /// Unions every live marker position with every custom layer's
    /// `metadata.bbox` and requests a camera fit. No-op when the scene has
    /// nothing to frame. Returns whether a fit was requested.
    pub fn fit_to_item_bounds(
        &self,
        renderer: &mut dyn MapRenderer,
        marker_positions: &[LngLat],
        custom_layers: &[CustomLayerDescriptor],
    ) -> bool {
        let boxes = marker_positions
            .iter()
            .map(|p| LngLatBounds::from_point(*p))
            .chain(custom_layers.iter().filter_map(|l| l.metadata.bbox));
        let Some(bounds) = union_all(boxes) else {
            debug!("no item bounds to fit");
            return false;
        };
        renderer.fit_bounds(bounds, self.options);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::CameraFitController;
    use foundation::geo::{LngLat, LngLatBounds};
    use pretty_assertions::assert_eq;
    use renderer::{FitOptions, HeadlessRenderer, LayerSpec, SourceRef};
    use scene::{CustomLayerDescriptor, LayerMetadata};

    fn controller() -> CameraFitController {
        CameraFitController::new(FitOptions {
            padding_px: 64.0,
            max_zoom: 15.0,
            speed: 1.2,
        })
    }

    fn custom_layer_with_bbox(id: &str, bbox: LngLatBounds) -> CustomLayerDescriptor {
        CustomLayerDescriptor {
            id: id.to_string(),
            layer: LayerSpec::new(id, "fill", SourceRef::Id("s".to_string())),
            metadata: LayerMetadata {
                name: None,
                bbox: Some(bbox),
            },
        }
    }

    #[test]
    fn unions_markers_and_layer_boxes() {
        let mut renderer = HeadlessRenderer::new();
        let layers = vec![custom_layer_with_bbox(
            "a",
            LngLatBounds::new(LngLat::new(10.0, 10.0), LngLat::new(12.0, 12.0)),
        )];
        let fitted = controller().fit_to_item_bounds(
            &mut renderer,
            &[LngLat::new(-5.0, 0.0)],
            &layers,
        );
        assert!(fitted);
        let (bounds, options) = *renderer.last_fit().unwrap();
        assert_eq!(
            bounds,
            LngLatBounds::new(LngLat::new(-5.0, 0.0), LngLat::new(12.0, 12.0))
        );
        assert_eq!(options.max_zoom, 15.0);
    }

    #[test]
    fn empty_scene_requests_no_fit() {
        let mut renderer = HeadlessRenderer::new();
        assert!(!controller().fit_to_item_bounds(&mut renderer, &[], &[]));
        assert!(renderer.last_fit().is_none());
    }
}
