use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::descriptors::{
    BasemapDescriptor, CustomLayerDescriptor, MarkerDescriptor, OverlayLayerDescriptor,
};

/// The host-owned declarative scene description.
///
/// Delivered as a full replacement value on every host update cycle; the
/// engine reads it and requests partial updates back through the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneModel {
    #[serde(default)]
    pub basemaps: Vec<BasemapDescriptor>,
    #[serde(default)]
    pub overlays: Vec<OverlayLayerDescriptor>,
    #[serde(default, rename = "layers")]
    pub custom_layers: Vec<CustomLayerDescriptor>,
    #[serde(default)]
    pub markers: Vec<MarkerDescriptor>,
    #[serde(default, rename = "itemId")]
    pub selected_item_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    EmptyId { slice: &'static str },
    DuplicateId { slice: &'static str, id: String },
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::EmptyId { slice } => write!(f, "empty id in scene slice {slice:?}"),
            SceneError::DuplicateId { slice, id } => {
                write!(f, "duplicate id {id:?} in scene slice {slice:?}")
            }
        }
    }
}

impl std::error::Error for SceneError {}

impl SceneModel {
    /// Validates descriptor ids at the ingestion boundary.
    ///
    /// Ids must be non-empty and unique within their slice. Markers carry
    /// no ids (they are identified by array position) and are not checked.
    pub fn validate(&self) -> Result<(), SceneError> {
        check_ids("basemaps", self.basemaps.iter().map(|b| b.id.as_str()))?;
        check_ids("overlays", self.overlays.iter().map(|o| o.id.as_str()))?;
        check_ids("layers", self.custom_layers.iter().map(|l| l.id.as_str()))?;
        Ok(())
    }
}

fn check_ids<'a>(
    slice: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), SceneError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if id.is_empty() {
            return Err(SceneError::EmptyId { slice });
        }
        if !seen.insert(id) {
            return Err(SceneError::DuplicateId {
                slice,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
