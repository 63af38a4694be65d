use std::collections::BTreeMap;

use foundation::geo::{LngLat, LngLatBounds};

use crate::api::{FitOptions, MapRenderer, MarkerId, MarkerSpec, RendererError};
use crate::spec::{LayerSpec, SourceSpec, Style};

/// In-memory renderer for tests and harnesses.
///
/// Faithful to the collaborating engine's view of Mapbox GL: `set_style`
/// wipes every layer and source and stages the new base style, which only
/// becomes visible after [`HeadlessRenderer::finish_style_load`] (the
/// harness then delivers `StyleReady`). Markers live outside the style and
/// survive swaps.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    registry: BTreeMap<String, Style>,
    live: Style,
    markers: BTreeMap<MarkerId, MarkerSpec>,
    next_marker: u64,
    style_loaded: bool,
    pending_style: Option<String>,
    center: LngLat,
    zoom: f64,
    last_fit: Option<(LngLatBounds, FitOptions)>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the base style a style ref resolves to.
    ///
    /// Unregistered refs load as an empty style.
    pub fn register_style(&mut self, style_ref: impl Into<String>, style: Style) {
        self.registry.insert(style_ref.into(), style);
    }

    /// Completes a pending `set_style`, installing the base style's layers
    /// and sources. Returns `false` when no load was pending.
    pub fn finish_style_load(&mut self) -> bool {
        let Some(style_ref) = self.pending_style.take() else {
            return false;
        };
        self.live = self.registry.get(&style_ref).cloned().unwrap_or_default();
        self.style_loaded = true;
        true
    }

    pub fn pending_style_ref(&self) -> Option<&str> {
        self.pending_style.as_deref()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn center(&self) -> LngLat {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn last_fit(&self) -> Option<&(LngLatBounds, FitOptions)> {
        self.last_fit.as_ref()
    }
}

impl MapRenderer for HeadlessRenderer {
    fn add_layer(&mut self, spec: LayerSpec, before: Option<&str>) -> Result<(), RendererError> {
        if self.has_layer(&spec.id) {
            return Err(RendererError::DuplicateLayer(spec.id));
        }
        match before {
            Some(before_id) => {
                let index = self
                    .live
                    .layer_index(before_id)
                    .ok_or_else(|| RendererError::UnknownBeforeLayer(before_id.to_string()))?;
                self.live.layers.insert(index, spec);
            }
            None => self.live.layers.push(spec),
        }
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), RendererError> {
        let index = self
            .live
            .layer_index(id)
            .ok_or_else(|| RendererError::UnknownLayer(id.to_string()))?;
        self.live.layers.remove(index);
        Ok(())
    }

    fn add_source(&mut self, id: &str, spec: SourceSpec) -> Result<(), RendererError> {
        if self.live.sources.contains_key(id) {
            return Err(RendererError::DuplicateSource(id.to_string()));
        }
        self.live.sources.insert(id.to_string(), spec);
        Ok(())
    }

    fn remove_source(&mut self, id: &str) -> Result<(), RendererError> {
        self.live
            .sources
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RendererError::UnknownSource(id.to_string()))
    }

    fn style(&self) -> Style {
        self.live.clone()
    }

    fn layer(&self, id: &str) -> Option<LayerSpec> {
        self.live
            .layers
            .iter()
            .find(|layer| layer.id == id)
            .cloned()
    }

    fn source(&self, id: &str) -> Option<SourceSpec> {
        self.live.sources.get(id).cloned()
    }

    fn set_style(&mut self, style_ref: &str) {
        self.live = Style::default();
        self.style_loaded = false;
        self.pending_style = Some(style_ref.to_string());
    }

    fn is_style_loaded(&self) -> bool {
        self.style_loaded
    }

    fn fit_bounds(&mut self, bounds: LngLatBounds, options: FitOptions) {
        self.center = bounds.center();
        self.zoom = self.zoom.max(0.0).min(options.max_zoom);
        self.last_fit = Some((bounds, options));
    }

    fn add_marker(&mut self, spec: MarkerSpec) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        self.markers.insert(id, spec);
        id
    }

    fn marker_lnglat(&self, marker: MarkerId) -> Option<LngLat> {
        self.markers.get(&marker).map(|spec| spec.lnglat)
    }

    fn set_marker_lnglat(
        &mut self,
        marker: MarkerId,
        lnglat: LngLat,
    ) -> Result<(), RendererError> {
        let spec = self
            .markers
            .get_mut(&marker)
            .ok_or(RendererError::UnknownMarker(marker))?;
        spec.lnglat = lnglat;
        Ok(())
    }

    fn remove_marker(&mut self, marker: MarkerId) -> Result<(), RendererError> {
        self.markers
            .remove(&marker)
            .map(|_| ())
            .ok_or(RendererError::UnknownMarker(marker))
    }
}
