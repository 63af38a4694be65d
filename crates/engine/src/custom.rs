use catalog::{CUSTOM_PREFIX, custom_layer_id};
use renderer::{MapRenderer, RendererError, SourceRef};
use scene::CustomLayerDescriptor;
use tracing::debug;

/// Reconciles item-scoped custom layers.
///
/// Custom layers are namespaced with [`CUSTOM_PREFIX`] so they can be found
/// and torn down wholesale when the selected item changes. Their sources
/// are reference-counted against the live style: a source is removed only
/// once no remaining layer references it.
#[derive(Debug, Default)]
pub struct CustomLayerSynchronizer {
    reconciling: bool,
}

impl CustomLayerSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tears down every custom-prefixed layer (and any sources left
    /// unreferenced), then adds one layer per descriptor.
    ///
    /// Descriptors missing a `metadata.bbox` get one computed from their
    /// geometry source and written back, so the camera-fit step never has
    /// to re-derive it.
    pub fn reload(
        &mut self,
        renderer: &mut dyn MapRenderer,
        descriptors: &mut [CustomLayerDescriptor],
    ) -> Result<(), RendererError> {
        if self.reconciling {
            debug!("custom-layer reload already in progress; skipping");
            return Ok(());
        }
        self.reconciling = true;
        let result = Self::reload_inner(renderer, descriptors);
        self.reconciling = false;
        result
    }

    fn reload_inner(
        renderer: &mut dyn MapRenderer,
        descriptors: &mut [CustomLayerDescriptor],
    ) -> Result<(), RendererError> {
        let mut removed_sources: Vec<String> = Vec::new();
        for layer in renderer.style().layers {
            if !layer.id.starts_with(CUSTOM_PREFIX) {
                continue;
            }
            if let Some(source_id) = layer.source.id()
                && !removed_sources.iter().any(|id| id == source_id)
            {
                removed_sources.push(source_id.to_string());
            }
            renderer.remove_layer(&layer.id)?;
        }
        // Only drop sources nothing else still draws from.
        for source_id in removed_sources {
            if !renderer.style().source_in_use(&source_id) && renderer.has_source(&source_id) {
                renderer.remove_source(&source_id)?;
            }
        }

        for descriptor in descriptors.iter_mut() {
            if descriptor.metadata.bbox.is_none() {
                descriptor.metadata.bbox = derive_bbox(renderer, descriptor);
            }
            renderer.add_layer(
                descriptor.layer.clone().with_id(custom_layer_id(&descriptor.id)),
                None,
            )?;
        }
        debug!(count = descriptors.len(), "custom layers reloaded");
        Ok(())
    }
}

/// Bounding box from the descriptor's backing source, when it is geometry
/// data. Inline sources are read directly; id references are looked up in
/// the live style.
fn derive_bbox(
    renderer: &dyn MapRenderer,
    descriptor: &CustomLayerDescriptor,
) -> Option<foundation::geo::LngLatBounds> {
    match &descriptor.layer.source {
        SourceRef::Inline(source) => source.geometry_bounds(),
        SourceRef::Id(id) => renderer.source(id)?.geometry_bounds(),
    }
}
