use scene::MarkerDescriptor;
use serde_json::Value;

/// Partial scene updates the engine asks the host to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum HostUpdate {
    /// Camera settled; emitted on every move-end.
    MapCenter { lng: f64, lat: f64, zoom: f64 },
    /// A rendered feature was clicked.
    SelectedFeature { properties: Value, geometry: Value },
    /// Full marker-list replacement after a drag-end.
    UpdatedMarkers(Vec<MarkerDescriptor>),
    /// Loading-indicator visibility changed.
    Loading(bool),
}
