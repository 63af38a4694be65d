use catalog::CatalogError;
use renderer::RendererError;
use scene::SceneError;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    Catalog(CatalogError),
    Scene(SceneError),
    /// Marker handle count diverged from descriptor count. Fatal: marker
    /// synchronization halts, since continuing would pair handles with the
    /// wrong descriptors.
    MarkerDesync {
        handles: usize,
        descriptors: usize,
    },
    Renderer(RendererError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Catalog(err) => write!(f, "{err}"),
            EngineError::Scene(err) => write!(f, "{err}"),
            EngineError::MarkerDesync {
                handles,
                descriptors,
            } => write!(
                f,
                "marker handles ({handles}) and descriptors ({descriptors}) are not in sync"
            ),
            EngineError::Renderer(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Catalog(err) => Some(err),
            EngineError::Scene(err) => Some(err),
            EngineError::Renderer(err) => Some(err),
            EngineError::MarkerDesync { .. } => None,
        }
    }
}

impl From<CatalogError> for EngineError {
    fn from(err: CatalogError) -> Self {
        EngineError::Catalog(err)
    }
}

impl From<SceneError> for EngineError {
    fn from(err: SceneError) -> Self {
        EngineError::Scene(err)
    }
}

impl From<RendererError> for EngineError {
    fn from(err: RendererError) -> Self {
        EngineError::Renderer(err)
    }
}
