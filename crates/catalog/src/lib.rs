use scene::{BASEMAP_KIND_STYLE, BasemapDescriptor, OverlayLayerDescriptor};

/// Sentinel layer demarcating base-style content from scene-owned content.
///
/// Re-inserted into every freshly loaded base style; everything above it in
/// the layer stack belongs to the scene, everything below to the style.
pub const ROOT_LAYER_ID: &str = "root";

/// Second sentinel; overlays are inserted before it so they always paint
/// below item-scoped layers. Sits above `root`, so it is itself scene-owned.
pub const OVERLAY_ROOT_LAYER_ID: &str = "overlay-root";

/// Live-id namespace for overlay layers.
pub const OVERLAY_PREFIX: &str = "overlay-";

/// Live-id namespace for item-scoped custom layers.
pub const CUSTOM_PREFIX: &str = "custom-";

pub fn overlay_layer_id(id: &str) -> String {
    format!("{OVERLAY_PREFIX}{id}")
}

pub fn custom_layer_id(id: &str) -> String {
    format!("{CUSTOM_PREFIX}{id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    UnknownBasemap(String),
    UnknownOverlay(String),
    UnsupportedBasemapKind { id: String, kind: String },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::UnknownBasemap(id) => write!(f, "no basemap {id:?} in catalog"),
            CatalogError::UnknownOverlay(id) => write!(f, "no overlay {id:?} in catalog"),
            CatalogError::UnsupportedBasemapKind { id, kind } => write!(
                f,
                "basemap {id:?} is of kind {kind:?}, yet only \"style\" is implemented"
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Built-in base styles merged with caller-supplied ones.
///
/// Built-ins come first; the first entry flagged `default` (falling back to
/// the first entry overall) is the initial selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasemapCatalog {
    entries: Vec<BasemapDescriptor>,
}

impl BasemapCatalog {
    pub fn builtin() -> Vec<BasemapDescriptor> {
        let mut streets = BasemapDescriptor::style(
            "mapbox-streets-v12",
            "Mapbox Streets",
            "mapbox://styles/mapbox/streets-v12",
        );
        streets.default = true;
        let satellite = BasemapDescriptor::style(
            "mapbox-satellite-v9",
            "Mapbox Satellite",
            "mapbox://styles/mapbox/satellite-v9",
        );
        vec![streets, satellite]
    }

    pub fn with_defaults(extra: &[BasemapDescriptor]) -> Self {
        let mut entries = Self::builtin();
        entries.extend(extra.iter().cloned());
        Self { entries }
    }

    pub fn entries(&self) -> &[BasemapDescriptor] {
        &self.entries
    }

    pub fn resolve(&self, id: &str) -> Result<&BasemapDescriptor, CatalogError> {
        self.entries
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| CatalogError::UnknownBasemap(id.to_string()))
    }

    pub fn default_basemap(&self) -> Option<&BasemapDescriptor> {
        self.entries
            .iter()
            .find(|b| b.default)
            .or_else(|| self.entries.first())
    }

    /// The style reference of a `"style"`-kind basemap.
    pub fn style_ref(descriptor: &BasemapDescriptor) -> Result<&str, CatalogError> {
        if descriptor.kind != BASEMAP_KIND_STYLE {
            return Err(CatalogError::UnsupportedBasemapKind {
                id: descriptor.id.clone(),
                kind: descriptor.kind.clone(),
            });
        }
        Ok(&descriptor.url)
    }
}

/// Flattened, addressable list of the caller-supplied overlay layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayCatalog {
    entries: Vec<OverlayLayerDescriptor>,
}

impl OverlayCatalog {
    pub fn from_scene(overlays: &[OverlayLayerDescriptor]) -> Self {
        Self {
            entries: overlays.to_vec(),
        }
    }

    pub fn entries(&self) -> &[OverlayLayerDescriptor] {
        &self.entries
    }

    pub fn resolve(&self, id: &str) -> Result<&OverlayLayerDescriptor, CatalogError> {
        self.entries
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| CatalogError::UnknownOverlay(id.to_string()))
    }
}
