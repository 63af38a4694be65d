use catalog::ROOT_LAYER_ID;
use renderer::{LayerSpec, MapRenderer, RendererError, SourceSpec, Style};
use tracing::debug;

/// Scene-owned style content captured immediately before a base-style swap.
///
/// Layers keep their original stacking order; each referenced source is
/// captured once, even when shared by several layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSnapshot {
    pub sources: Vec<(String, SourceSpec)>,
    pub layers: Vec<LayerSpec>,
}

/// Carries scene-owned layers and sources across the renderer's
/// destructive `set_style`.
///
/// `set_style` discards every layer and source, including ones this engine
/// added. The coordinator snapshots everything above the sentinel root
/// layer before triggering the swap and replays the snapshot once the new
/// base style signals ready.
#[derive(Debug, Default)]
pub struct StyleSwapCoordinator {
    pending: Option<StyleSnapshot>,
}

impl StyleSwapCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything positioned above the sentinel root layer.
    ///
    /// Without a root layer in the style there is no scene-owned content
    /// to capture and the snapshot is empty.
    pub fn snapshot_scene_owned(style: &Style) -> StyleSnapshot {
        let mut snapshot = StyleSnapshot::default();
        let Some(root_index) = style.layer_index(ROOT_LAYER_ID) else {
            return snapshot;
        };
        for layer in &style.layers[root_index + 1..] {
            if let Some(source_id) = layer.source.id()
                && !snapshot.sources.iter().any(|(id, _)| id == source_id)
                && let Some(source) = style.sources.get(source_id)
            {
                snapshot
                    .sources
                    .push((source_id.to_string(), source.clone()));
            }
            snapshot.layers.push(layer.clone());
        }
        snapshot
    }

    /// Snapshots the live style and triggers the swap. The renderer now
    /// tears everything down asynchronously; [`Self::replay`] must run from
    /// the style-ready handler.
    pub fn begin(&mut self, renderer: &mut dyn MapRenderer, style_ref: &str) {
        let snapshot = Self::snapshot_scene_owned(&renderer.style());
        debug!(
            layers = snapshot.layers.len(),
            sources = snapshot.sources.len(),
            style_ref,
            "snapshotting scene-owned content for style swap"
        );
        self.pending = Some(snapshot);
        renderer.set_style(style_ref);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replays the pending snapshot into the freshly loaded style.
    ///
    /// Sources go first so every layer's reference resolves; both adds are
    /// check-before-add since the sentinel handler (and the base style
    /// itself) may already have inserted an id.
    pub fn replay(&mut self, renderer: &mut dyn MapRenderer) -> Result<(), RendererError> {
        let Some(snapshot) = self.pending.take() else {
            return Ok(());
        };
        for (id, source) in &snapshot.sources {
            if !renderer.has_source(id) {
                renderer.add_source(id, source.clone())?;
            }
        }
        for layer in snapshot.layers {
            if !renderer.has_layer(&layer.id) {
                renderer.add_layer(layer, None)?;
            }
        }
        Ok(())
    }
}
