use foundation::geo::{LngLat, LngLatBounds};

use crate::spec::{LayerSpec, SourceSpec, Style};

/// Handle to a live marker object.
///
/// Markers are DOM-level in Mapbox terms: they are not part of the style
/// and survive a `set_style`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub u64);

/// Options for creating a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub lnglat: LngLat,
    pub draggable: bool,
    pub color: Option<String>,
}

/// Camera-fit parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FitOptions {
    pub padding_px: f64,
    pub max_zoom: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererError {
    DuplicateLayer(String),
    DuplicateSource(String),
    UnknownLayer(String),
    UnknownSource(String),
    UnknownBeforeLayer(String),
    UnknownMarker(MarkerId),
}

impl std::fmt::Display for RendererError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RendererError::DuplicateLayer(id) => write!(f, "layer {id:?} already exists"),
            RendererError::DuplicateSource(id) => write!(f, "source {id:?} already exists"),
            RendererError::UnknownLayer(id) => write!(f, "no layer {id:?}"),
            RendererError::UnknownSource(id) => write!(f, "no source {id:?}"),
            RendererError::UnknownBeforeLayer(id) => {
                write!(f, "cannot insert before missing layer {id:?}")
            }
            RendererError::UnknownMarker(id) => write!(f, "no marker {:?}", id.0),
        }
    }
}

impl std::error::Error for RendererError {}

/// The imperative, stateful renderer the engine reconciles against.
///
/// Implementations mirror the Mapbox GL JS surface: mutations apply
/// immediately to the live style, `set_style` is destructive (every layer
/// and source is discarded, markers survive), and readiness is signalled
/// out-of-band through [`crate::RendererEvent`]s.
pub trait MapRenderer {
    /// Inserts `spec`, before `before` when given, else on top.
    fn add_layer(&mut self, spec: LayerSpec, before: Option<&str>) -> Result<(), RendererError>;
    fn remove_layer(&mut self, id: &str) -> Result<(), RendererError>;
    fn add_source(&mut self, id: &str, spec: SourceSpec) -> Result<(), RendererError>;
    fn remove_source(&mut self, id: &str) -> Result<(), RendererError>;

    /// Snapshot of the current live style.
    fn style(&self) -> Style;
    fn layer(&self, id: &str) -> Option<LayerSpec>;
    fn source(&self, id: &str) -> Option<SourceSpec>;
    fn has_layer(&self, id: &str) -> bool {
        self.layer(id).is_some()
    }
    fn has_source(&self, id: &str) -> bool {
        self.source(id).is_some()
    }

    /// Begins loading a new base style, discarding all layers and sources.
    fn set_style(&mut self, style_ref: &str);
    /// Whether the current style has finished loading.
    fn is_style_loaded(&self) -> bool;

    fn fit_bounds(&mut self, bounds: LngLatBounds, options: FitOptions);

    fn add_marker(&mut self, spec: MarkerSpec) -> MarkerId;
    fn marker_lnglat(&self, marker: MarkerId) -> Option<LngLat>;
    fn set_marker_lnglat(&mut self, marker: MarkerId, lnglat: LngLat)
    -> Result<(), RendererError>;
    fn remove_marker(&mut self, marker: MarkerId) -> Result<(), RendererError>;
}
