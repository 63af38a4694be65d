//! Reconciliation engine keeping a stateful map renderer in step with a
//! host-owned declarative scene description.
//!
//! The renderer is an opaque collaborator whose `set_style` silently wipes
//! every layer and source the engine has added; the engine's job is a small
//! state machine plus a snapshot/replay protocol that survives that, with
//! all coordination flowing through ordering-sensitive renderer events.

pub mod camera;
pub mod config;
pub mod custom;
pub mod error;
pub mod loading;
pub mod markers;
pub mod output;
pub mod overlays;
pub mod swap;

pub use camera::CameraFitController;
pub use config::EngineConfig;
pub use custom::CustomLayerSynchronizer;
pub use error::EngineError;
pub use loading::LoadingIndicator;
pub use markers::MarkerSynchronizer;
pub use output::HostUpdate;
pub use overlays::OverlaySynchronizer;
pub use swap::{StyleSnapshot, StyleSwapCoordinator};

use catalog::{BasemapCatalog, OVERLAY_ROOT_LAYER_ID, OverlayCatalog, ROOT_LAYER_ID};
use foundation::time::Time;
use renderer::{LayerSpec, MapRenderer, RendererError, RendererEvent, SourceRef, SourceSpec};
use scene::{ChangeDetector, SceneChanges, SceneModel};
use tracing::debug;

/// Renderer lifecycle as observed by the engine.
///
/// Synchronizer operations that mutate layers or sources are valid only in
/// `Ready`; outside it they are deferred, not errored, since the host may
/// deliver scene updates before the renderer signals readiness.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, initial style still loading.
    Loading,
    Ready,
    /// A base-style swap is in flight; everything is torn down renderer-side.
    StyleSwapping,
    /// An item change triggered reconciliation; waiting for idle.
    Reloading,
}

/// The reconciliation engine.
///
/// Single-threaded and event-driven: the host forwards renderer events via
/// [`MapEngine::handle_event`], delivers scene replacements via
/// [`MapEngine::apply_scene`], advances time via [`MapEngine::tick`], and
/// drains requested scene updates via [`MapEngine::drain_updates`].
pub struct MapEngine {
    config: EngineConfig,
    phase: Phase,
    detector: ChangeDetector,
    basemap_catalog: BasemapCatalog,
    overlay_catalog: OverlayCatalog,
    selected_basemap: Option<String>,
    scene: SceneModel,
    /// Slice changes observed while mutations were invalid.
    deferred: SceneChanges,
    swap: StyleSwapCoordinator,
    markers: MarkerSynchronizer,
    custom_layers: CustomLayerSynchronizer,
    overlays: OverlaySynchronizer,
    camera: CameraFitController,
    loading: LoadingIndicator,
    outbox: Vec<HostUpdate>,
}

impl MapEngine {
    pub fn new(config: EngineConfig) -> Self {
        let camera = CameraFitController::new(config.fit_options());
        let loading = LoadingIndicator::new(config.loading_grace_secs);
        Self {
            config,
            phase: Phase::Loading,
            detector: ChangeDetector::new(),
            basemap_catalog: BasemapCatalog::with_defaults(&[]),
            overlay_catalog: OverlayCatalog::default(),
            selected_basemap: None,
            scene: SceneModel::default(),
            deferred: SceneChanges::default(),
            swap: StyleSwapCoordinator::new(),
            markers: MarkerSynchronizer::new(),
            custom_layers: CustomLayerSynchronizer::new(),
            overlays: OverlaySynchronizer::new(),
            camera,
            loading,
            outbox: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected_basemap(&self) -> Option<&str> {
        self.selected_basemap.as_deref()
    }

    pub fn active_overlays(&self) -> &[String] {
        self.overlays.active()
    }

    pub fn basemap_catalog(&self) -> &BasemapCatalog {
        &self.basemap_catalog
    }

    pub fn overlay_catalog(&self) -> &OverlayCatalog {
        &self.overlay_catalog
    }

    /// The engine's working copy of the scene, including computed bboxes.
    pub fn scene(&self) -> &SceneModel {
        &self.scene
    }

    pub fn loading_visible(&self) -> bool {
        self.loading.visible()
    }

    /// Drains the scene updates the host should apply to its model.
    pub fn drain_updates(&mut self) -> Vec<HostUpdate> {
        std::mem::take(&mut self.outbox)
    }

    /// Ingests a full replacement scene from the host.
    ///
    /// Each slice passes through the change detector; only changed slices
    /// trigger work, and renderer mutations are deferred unless the engine
    /// is `Ready`.
    pub fn apply_scene(
        &mut self,
        renderer: &mut dyn MapRenderer,
        scene: &SceneModel,
        now: Time,
    ) -> Result<(), EngineError> {
        scene.validate()?;
        self.scene = scene.clone();
        let changes = self.detector.observe_scene(scene);

        if changes.basemaps {
            self.basemap_catalog = BasemapCatalog::with_defaults(&scene.basemaps);
        }
        if changes.overlays {
            self.overlay_catalog = OverlayCatalog::from_scene(&scene.overlays);
        }

        if self.phase == Phase::Ready {
            self.reconcile(renderer, changes, now)?;
        } else if changes.any() {
            debug!(phase = ?self.phase, "deferring scene reconciliation");
            self.deferred.merge(changes);
        }
        Ok(())
    }

    /// Swaps the base style, carrying all scene-owned content across.
    ///
    /// Fails before touching the renderer when the basemap is unknown or
    /// not of kind `"style"`.
    pub fn swap_basemap(
        &mut self,
        renderer: &mut dyn MapRenderer,
        basemap_id: &str,
        now: Time,
    ) -> Result<(), EngineError> {
        if self.phase != Phase::Ready {
            debug!(phase = ?self.phase, basemap_id, "ignoring basemap swap outside Ready");
            return Ok(());
        }
        let descriptor = self.basemap_catalog.resolve(basemap_id)?;
        let style_ref = BasemapCatalog::style_ref(descriptor)?.to_string();

        debug!(basemap_id, style_ref = %style_ref, "swapping basemap");
        self.swap.begin(renderer, &style_ref);
        self.selected_basemap = Some(basemap_id.to_string());
        self.phase = Phase::StyleSwapping;
        self.loading.arm(now);
        Ok(())
    }

    /// Applies an overlay selection.
    pub fn set_active_overlays(
        &mut self,
        renderer: &mut dyn MapRenderer,
        selected: &[String],
        now: Time,
    ) -> Result<(), EngineError> {
        if self.phase != Phase::Ready {
            debug!(phase = ?self.phase, "ignoring overlay selection outside Ready");
            return Ok(());
        }
        self.overlays
            .set_active(renderer, &self.overlay_catalog, selected)?;
        self.loading.arm(now);
        Ok(())
    }

    /// Dispatches one renderer event.
    pub fn handle_event(
        &mut self,
        renderer: &mut dyn MapRenderer,
        event: RendererEvent,
        now: Time,
    ) -> Result<(), EngineError> {
        match event {
            RendererEvent::Load => {
                debug!("renderer loaded");
                self.phase = Phase::Ready;
                if self.selected_basemap.is_none() {
                    self.selected_basemap =
                        self.basemap_catalog.default_basemap().map(|b| b.id.clone());
                }
                // Seed baselines so the next host delivery of an unchanged
                // scene does not read as a change.
                let _ = self.detector.observe_scene(&self.scene);
                // Initial reconciliation: everything delivered before
                // readiness, plus the marker and custom-layer state the
                // scene starts with.
                let mut changes = std::mem::take(&mut self.deferred);
                changes.markers = true;
                changes.custom_layers = true;
                self.reconcile(renderer, changes, now)?;
            }
            RendererEvent::StyleReady => {
                // Sentinels first: replay and overlay anchoring depend on
                // them, and they do not persist across a style swap.
                ensure_sentinel_layers(renderer)?;
                self.swap.replay(renderer)?;
                if self.phase == Phase::StyleSwapping {
                    debug!("style swap complete");
                    self.resume_ready(renderer, now)?;
                }
            }
            RendererEvent::Idle => {
                if self.loading.settle() {
                    self.outbox.push(HostUpdate::Loading(false));
                }
                if self.phase == Phase::Reloading {
                    self.resume_ready(renderer, now)?;
                }
            }
            RendererEvent::MoveEnd { center, zoom } => {
                self.outbox.push(HostUpdate::MapCenter {
                    lng: center.lng,
                    lat: center.lat,
                    zoom,
                });
            }
            RendererEvent::Click { feature } => {
                if let Some(feature) = feature {
                    self.outbox.push(HostUpdate::SelectedFeature {
                        properties: feature.properties,
                        geometry: feature.geometry,
                    });
                }
            }
            RendererEvent::MarkerDragEnd { .. } => {
                let updated = self.markers.on_drag_end(renderer)?;
                self.outbox.push(HostUpdate::UpdatedMarkers(updated));
            }
        }
        Ok(())
    }

    /// Advances the engine's clock; surfaces the loading flag when a
    /// mutating operation overruns its grace period.
    pub fn tick(&mut self, now: Time) {
        if self.loading.tick(now) {
            self.outbox.push(HostUpdate::Loading(true));
        }
    }

    fn resume_ready(
        &mut self,
        renderer: &mut dyn MapRenderer,
        now: Time,
    ) -> Result<(), EngineError> {
        self.phase = Phase::Ready;
        let deferred = std::mem::take(&mut self.deferred);
        if deferred.any() {
            self.reconcile(renderer, deferred, now)?;
        }
        Ok(())
    }

    fn reconcile(
        &mut self,
        renderer: &mut dyn MapRenderer,
        changes: SceneChanges,
        now: Time,
    ) -> Result<(), EngineError> {
        let reload_markers = changes.markers || changes.selected_item;
        let reload_custom = changes.custom_layers || changes.selected_item;
        if !reload_markers && !reload_custom {
            return Ok(());
        }

        if reload_markers {
            self.reload_markers(renderer);
        }
        if reload_custom {
            self.reload_custom_layers(renderer)?;
        }
        if changes.selected_item {
            let positions = self.markers.live_positions(renderer);
            self.camera
                .fit_to_item_bounds(renderer, &positions, &self.scene.custom_layers);
            self.phase = Phase::Reloading;
        }
        self.loading.arm(now);
        Ok(())
    }

    fn reload_markers(&mut self, renderer: &mut dyn MapRenderer) {
        if !renderer.is_style_loaded() {
            debug!("style not loaded; skipping marker reload");
            return;
        }
        self.markers.reload(renderer, &self.scene.markers);
    }

    fn reload_custom_layers(&mut self, renderer: &mut dyn MapRenderer) -> Result<(), EngineError> {
        if !renderer.is_style_loaded() {
            debug!("style not loaded; skipping custom-layer reload");
            return Ok(());
        }
        self.custom_layers
            .reload(renderer, &mut self.scene.custom_layers)?;
        Ok(())
    }
}

fn sentinel_layer(id: &str) -> LayerSpec {
    // Empty no-op layer; exists purely as a position in the layer stack.
    LayerSpec::new(
        id,
        "circle",
        SourceRef::Inline(SourceSpec::geojson(serde_json::json!({
            "type": "Feature",
            "properties": {},
            "geometry": { "type": "Point", "coordinates": [] }
        }))),
    )
}

fn ensure_sentinel_layers(renderer: &mut dyn MapRenderer) -> Result<(), RendererError> {
    for id in [ROOT_LAYER_ID, OVERLAY_ROOT_LAYER_ID] {
        if !renderer.has_layer(id) {
            renderer.add_layer(sentinel_layer(id), None)?;
        }
    }
    Ok(())
}
