use foundation::geo::{LngLat, LngLatBounds};
use renderer::LayerSpec;
use serde::{Deserialize, Serialize};

/// The only basemap kind the engine implements. Descriptors may carry other
/// kinds; selecting one fails at swap time.
pub const BASEMAP_KIND_STYLE: &str = "style";

/// A selectable base style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasemapDescriptor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Style reference passed verbatim to the renderer's `set_style`.
    pub url: String,
    #[serde(default)]
    pub default: bool,
}

impl BasemapDescriptor {
    pub fn style(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: BASEMAP_KIND_STYLE.to_string(),
            url: url.into(),
            default: false,
        }
    }
}

/// A toggleable overlay layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayLayerDescriptor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub layer: LayerSpec,
}

/// Optional descriptor metadata for item-scoped layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<LngLatBounds>,
}

/// An item-scoped custom layer.
///
/// Every custom layer attached to the renderer carries a `metadata.bbox`;
/// when absent here it is computed from the layer's geometry source during
/// reconciliation and written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomLayerDescriptor {
    pub id: String,
    pub layer: LayerSpec,
    #[serde(default)]
    pub metadata: LayerMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerOptions {
    #[serde(default)]
    pub draggable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A marker, paired 1:1 by index with a live renderer marker handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerDescriptor {
    #[serde(flatten)]
    pub options: MarkerOptions,
    pub lnglat: LngLat,
}

impl MarkerDescriptor {
    pub fn at(lng: f64, lat: f64) -> Self {
        Self {
            options: MarkerOptions::default(),
            lnglat: LngLat::new(lng, lat),
        }
    }

    /// This descriptor moved to a new position, all other fields kept.
    pub fn moved_to(&self, lnglat: LngLat) -> Self {
        Self {
            options: self.options.clone(),
            lnglat,
        }
    }
}
