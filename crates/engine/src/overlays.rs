use catalog::{OVERLAY_ROOT_LAYER_ID, OverlayCatalog, overlay_layer_id};
use renderer::MapRenderer;
use tracing::debug;

use crate::error::EngineError;

/// Toggles overlay layers on and off against a selected-id set.
///
/// Overlays are inserted before the `overlay-root` sentinel so they always
/// paint below item-scoped content. Sources are shared resources: one is
/// removed only when no remaining live layer references it.
#[derive(Debug, Default)]
pub struct OverlaySynchronizer {
    active: Vec<String>,
}

impl OverlaySynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &[String] {
        &self.active
    }

    pub fn set_active(
        &mut self,
        renderer: &mut dyn MapRenderer,
        catalog: &OverlayCatalog,
        selected: &[String],
    ) -> Result<(), EngineError> {
        // Add layers that are missing.
        for id in selected {
            let overlay = catalog.resolve(id)?;
            let live_id = overlay_layer_id(id);
            if !renderer.has_layer(&live_id) {
                renderer.add_layer(
                    overlay.layer.clone().with_id(live_id),
                    Some(OVERLAY_ROOT_LAYER_ID),
                )?;
            }
        }

        // Remove layers that are turned off.
        for overlay in catalog.entries() {
            let live_id = overlay_layer_id(&overlay.id);
            if selected.contains(&overlay.id) || !renderer.has_layer(&live_id) {
                continue;
            }
            let source_id = renderer
                .layer(&live_id)
                .and_then(|layer| layer.source.id().map(str::to_string));
            renderer.remove_layer(&live_id)?;
            if let Some(source_id) = source_id
                && !renderer.style().source_in_use(&source_id)
                && renderer.has_source(&source_id)
            {
                renderer.remove_source(&source_id)?;
            }
        }

        debug!(active = selected.len(), "overlay selection applied");
        self.active = selected.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::OverlaySynchronizer;
    use catalog::{OVERLAY_ROOT_LAYER_ID, OverlayCatalog};
    use pretty_assertions::assert_eq;
    use renderer::{HeadlessRenderer, LayerSpec, MapRenderer, SourceRef, SourceSpec};
    use scene::OverlayLayerDescriptor;
    use serde_json::json;

    fn overlay(id: &str, source: &str) -> OverlayLayerDescriptor {
        OverlayLayerDescriptor {
            id: id.to_string(),
            name: None,
            layer: LayerSpec::new(id, "line", SourceRef::Id(source.to_string())),
        }
    }

    fn renderer_with_sentinel_and_source(source: &str) -> HeadlessRenderer {
        let mut renderer = HeadlessRenderer::new();
        renderer
            .add_layer(
                LayerSpec::new(
                    OVERLAY_ROOT_LAYER_ID,
                    "circle",
                    SourceRef::Inline(SourceSpec::geojson(json!({
                        "type": "Feature",
                        "properties": {},
                        "geometry": { "type": "Point", "coordinates": [] }
                    }))),
                ),
                None,
            )
            .unwrap();
        renderer
            .add_source(
                source,
                SourceSpec::geojson(json!({ "type": "Point", "coordinates": [0.0, 0.0] })),
            )
            .unwrap();
        renderer
    }

    #[test]
    fn activation_inserts_below_the_sentinel() {
        let mut renderer = renderer_with_sentinel_and_source("s");
        let catalog = OverlayCatalog::from_scene(&[overlay("a", "s")]);
        let mut sync = OverlaySynchronizer::new();
        sync.set_active(&mut renderer, &catalog, &["a".to_string()])
            .unwrap();

        let style = renderer.style();
        let overlay_index = style.layer_index("overlay-a").unwrap();
        let sentinel_index = style.layer_index(OVERLAY_ROOT_LAYER_ID).unwrap();
        assert!(overlay_index < sentinel_index);
        assert_eq!(sync.active(), ["a".to_string()]);
    }

    #[test]
    fn activation_is_idempotent() {
        let mut renderer = renderer_with_sentinel_and_source("s");
        let catalog = OverlayCatalog::from_scene(&[overlay("a", "s")]);
        let mut sync = OverlaySynchronizer::new();
        let selected = vec!["a".to_string()];
        sync.set_active(&mut renderer, &catalog, &selected).unwrap();
        sync.set_active(&mut renderer, &catalog, &selected).unwrap();
        assert_eq!(
            renderer
                .style()
                .layers
                .iter()
                .filter(|l| l.id == "overlay-a")
                .count(),
            1
        );
    }

    #[test]
    fn shared_source_outlives_single_deactivation() {
        let mut renderer = renderer_with_sentinel_and_source("s");
        let catalog = OverlayCatalog::from_scene(&[overlay("a", "s"), overlay("b", "s")]);
        let mut sync = OverlaySynchronizer::new();
        sync.set_active(
            &mut renderer,
            &catalog,
            &["a".to_string(), "b".to_string()],
        )
        .unwrap();

        // Deactivating only A keeps S (B still references it) and keeps B.
        sync.set_active(&mut renderer, &catalog, &["b".to_string()])
            .unwrap();
        assert!(!renderer.has_layer("overlay-a"));
        assert!(renderer.has_layer("overlay-b"));
        assert!(renderer.has_source("s"));

        // Deactivating both removes S.
        sync.set_active(&mut renderer, &catalog, &[]).unwrap();
        assert!(!renderer.has_layer("overlay-b"));
        assert!(!renderer.has_source("s"));
    }

    #[test]
    fn source_removed_iff_unreferenced_after_every_toggle() {
        let mut renderer = renderer_with_sentinel_and_source("s");
        let catalog = OverlayCatalog::from_scene(&[overlay("a", "s"), overlay("b", "s")]);
        let mut sync = OverlaySynchronizer::new();

        let toggles: Vec<Vec<String>> = vec![
            vec!["a".to_string()],
            vec!["a".to_string(), "b".to_string()],
            vec!["b".to_string()],
            vec![],
        ];
        for selected in toggles {
            sync.set_active(&mut renderer, &catalog, &selected).unwrap();
            // The property: a source exists iff some live layer references it.
            assert_eq!(renderer.has_source("s"), renderer.style().source_in_use("s"));
        }
    }

    #[test]
    fn unknown_overlay_id_is_an_error() {
        let mut renderer = renderer_with_sentinel_and_source("s");
        let catalog = OverlayCatalog::from_scene(&[]);
        let mut sync = OverlaySynchronizer::new();
        assert!(
            sync.set_active(&mut renderer, &catalog, &["ghost".to_string()])
                .is_err()
        );
    }
}
