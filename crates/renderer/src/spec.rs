use std::collections::BTreeMap;

use foundation::geo::{LngLat, LngLatBounds};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Source payload as understood by the renderer.
///
/// `data` carries inline GeoJSON for `"geojson"` sources; tiled sources
/// reference a `url` instead. Both are opaque to the engine except for
/// bounding-box derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SourceSpec {
    pub fn geojson(data: Value) -> Self {
        Self {
            kind: "geojson".to_string(),
            data: Some(data),
            url: None,
        }
    }

    /// Bounding box of an inline GeoJSON payload.
    ///
    /// `None` for non-geojson sources and for payloads with no positions.
    pub fn geometry_bounds(&self) -> Option<LngLatBounds> {
        if self.kind != "geojson" {
            return None;
        }
        geojson_bounds(self.data.as_ref()?)
    }
}

/// A layer's source: either the id of a shared source or an inline spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceRef {
    Id(String),
    Inline(SourceSpec),
}

impl SourceRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            SourceRef::Id(id) => Some(id),
            SourceRef::Inline(_) => None,
        }
    }
}

/// Style-layer description, the unit of `add_layer`/`remove_layer`.
///
/// Paint and layout properties are opaque JSON passed through to the
/// renderer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: SourceRef,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub paint: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub layout: Value,
}

impl LayerSpec {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, source: SourceRef) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            source,
            paint: Value::Null,
            layout: Value::Null,
        }
    }

    /// Same spec under a different live id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Full style as reported by the renderer (`get_style` in Mapbox terms).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub layers: Vec<LayerSpec>,
    pub sources: BTreeMap<String, SourceSpec>,
}

impl Style {
    pub fn layer_index(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Whether any layer still references `source_id`.
    pub fn source_in_use(&self, source_id: &str) -> bool {
        self.layers
            .iter()
            .any(|l| l.source.id() == Some(source_id))
    }
}

/// Bounding box over every position in a GeoJSON value.
///
/// Handles Feature/FeatureCollection/GeometryCollection wrappers and all
/// seven geometry types; positions are `[lng, lat, ...]` arrays.
pub fn geojson_bounds(value: &Value) -> Option<LngLatBounds> {
    let mut bounds = None;
    collect_bounds(value, &mut bounds);
    bounds
}

fn collect_bounds(value: &Value, bounds: &mut Option<LngLatBounds>) {
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            if let Some(features) = value.get("features").and_then(Value::as_array) {
                for feature in features {
                    collect_bounds(feature, bounds);
                }
            }
        }
        Some("Feature") => {
            if let Some(geometry) = value.get("geometry") {
                collect_bounds(geometry, bounds);
            }
        }
        Some("GeometryCollection") => {
            if let Some(geometries) = value.get("geometries").and_then(Value::as_array) {
                for geometry in geometries {
                    collect_bounds(geometry, bounds);
                }
            }
        }
        Some(_) => {
            if let Some(coordinates) = value.get("coordinates") {
                extend_positions(coordinates, bounds);
            }
        }
        None => {}
    }
}

fn extend_positions(value: &Value, bounds: &mut Option<LngLatBounds>) {
    let Some(items) = value.as_array() else {
        return;
    };
    // A position is an array starting with a number; anything else nests.
    if let (Some(lng), Some(lat)) = (
        items.first().and_then(Value::as_f64),
        items.get(1).and_then(Value::as_f64),
    ) {
        let point = LngLat::new(lng, lat);
        match bounds {
            Some(b) => b.extend(point),
            None => *bounds = Some(LngLatBounds::from_point(point)),
        }
        return;
    }
    for item in items {
        extend_positions(item, bounds);
    }
}
