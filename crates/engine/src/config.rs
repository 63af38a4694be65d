use foundation::geo::LngLat;
use renderer::FitOptions;

/// Engine construction parameters, consumed once.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Renderer credential, read at init and never again.
    pub access_token: Option<String>,
    pub initial_center: LngLat,
    pub initial_zoom: f64,
    pub projection: String,
    /// Whether the host attaches a navigation control at init.
    pub navigation_control: bool,
    /// Grace period before a slow operation surfaces the loading flag.
    pub loading_grace_secs: f64,
    pub fit_padding_px: f64,
    /// Zoom ceiling for camera fits; prevents over-zooming on single-point
    /// scenes.
    pub fit_max_zoom: f64,
    pub fit_speed: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            initial_center: LngLat::new(0.0, 0.0),
            initial_zoom: 0.0,
            projection: "globe".to_string(),
            navigation_control: true,
            loading_grace_secs: 0.5,
            fit_padding_px: 64.0,
            fit_max_zoom: 15.0,
            fit_speed: 1.2,
        }
    }
}

impl EngineConfig {
    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            padding_px: self.fit_padding_px,
            max_zoom: self.fit_max_zoom,
            speed: self.fit_speed,
        }
    }
}
