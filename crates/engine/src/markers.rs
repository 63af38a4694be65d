use foundation::geo::LngLat;
use renderer::{MapRenderer, MarkerId, MarkerSpec};
use scene::MarkerDescriptor;
use tracing::{debug, error};

use crate::error::EngineError;

/// Keeps live renderer markers in step with the scene's marker list.
///
/// Handles and descriptors are paired 1:1 by index; that pairing is the
/// only identity markers have. Reconciliation is full teardown/rebuild, and
/// drag-end reports are full-list replacements.
#[derive(Debug, Default)]
pub struct MarkerSynchronizer {
    handles: Vec<MarkerId>,
    descriptors: Vec<MarkerDescriptor>,
    reconciling: bool,
    halted: bool,
}

impl MarkerSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Destroys every live marker (reverse order) and recreates one per
    /// descriptor.
    pub fn reload(&mut self, renderer: &mut dyn MapRenderer, markers: &[MarkerDescriptor]) {
        if self.halted {
            debug!("marker synchronization halted after desync; skipping reload");
            return;
        }
        if self.reconciling {
            debug!("marker reload already in progress; skipping");
            return;
        }
        self.reconciling = true;

        for handle in self.handles.drain(..).rev() {
            let _ = renderer.remove_marker(handle);
        }
        self.descriptors.clear();

        for descriptor in markers {
            let handle = renderer.add_marker(MarkerSpec {
                lnglat: descriptor.lnglat,
                draggable: descriptor.options.draggable,
                color: descriptor.options.color.clone(),
            });
            self.handles.push(handle);
            self.descriptors.push(descriptor.clone());
        }
        debug!(count = self.handles.len(), "markers reloaded");

        self.reconciling = false;
    }

    /// Rebuilds the full marker list from live handle positions.
    ///
    /// A handle/descriptor count mismatch is a logic bug, not a transient
    /// condition: it halts all further marker synchronization.
    pub fn on_drag_end(
        &mut self,
        renderer: &dyn MapRenderer,
    ) -> Result<Vec<MarkerDescriptor>, EngineError> {
        if self.handles.len() != self.descriptors.len() {
            error!(
                handles = self.handles.len(),
                descriptors = self.descriptors.len(),
                "marker lists out of sync"
            );
            self.halted = true;
            return Err(EngineError::MarkerDesync {
                handles: self.handles.len(),
                descriptors: self.descriptors.len(),
            });
        }

        let mut updated = Vec::with_capacity(self.handles.len());
        for (handle, descriptor) in self.handles.iter().zip(&self.descriptors) {
            let lnglat = renderer
                .marker_lnglat(*handle)
                .unwrap_or(descriptor.lnglat);
            updated.push(descriptor.moved_to(lnglat));
        }
        Ok(updated)
    }

    /// Current positions of all live markers.
    pub fn live_positions(&self, renderer: &dyn MapRenderer) -> Vec<LngLat> {
        self.handles
            .iter()
            .filter_map(|handle| renderer.marker_lnglat(*handle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::MarkerSynchronizer;
    use crate::error::EngineError;
    use foundation::geo::LngLat;
    use pretty_assertions::assert_eq;
    use renderer::{HeadlessRenderer, MapRenderer};
    use scene::MarkerDescriptor;

    #[test]
    fn reload_replaces_all_markers() {
        let mut renderer = HeadlessRenderer::new();
        let mut sync = MarkerSynchronizer::new();
        sync.reload(&mut renderer, &[MarkerDescriptor::at(1.0, 2.0)]);
        assert_eq!(renderer.marker_count(), 1);

        sync.reload(
            &mut renderer,
            &[MarkerDescriptor::at(3.0, 4.0), MarkerDescriptor::at(5.0, 6.0)],
        );
        assert_eq!(renderer.marker_count(), 2);
        assert_eq!(sync.handle_count(), 2);
    }

    #[test]
    fn drag_end_merges_live_positions_into_descriptors() {
        let mut renderer = HeadlessRenderer::new();
        let mut sync = MarkerSynchronizer::new();
        let mut descriptor = MarkerDescriptor::at(1.0, 2.0);
        descriptor.options.draggable = true;
        sync.reload(&mut renderer, std::slice::from_ref(&descriptor));

        let handle = sync.handles[0];
        renderer
            .set_marker_lnglat(handle, LngLat::new(9.0, 8.0))
            .unwrap();

        let updated = sync.on_drag_end(&renderer).unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].lnglat, LngLat::new(9.0, 8.0));
        assert!(updated[0].options.draggable);
    }

    #[test]
    fn desync_is_fatal_and_halts_further_reloads() {
        let mut renderer = HeadlessRenderer::new();
        let mut sync = MarkerSynchronizer::new();
        sync.reload(&mut renderer, &[MarkerDescriptor::at(1.0, 2.0)]);

        // Simulate the logic bug the invariant exists to catch.
        sync.descriptors.push(MarkerDescriptor::at(0.0, 0.0));

        assert_eq!(
            sync.on_drag_end(&renderer),
            Err(EngineError::MarkerDesync {
                handles: 1,
                descriptors: 2
            })
        );
        assert!(sync.is_halted());

        // Halted: reload must not touch the renderer any more.
        sync.reload(&mut renderer, &[]);
        assert_eq!(renderer.marker_count(), 1);
    }

    #[test]
    fn counts_stay_paired_after_every_reload() {
        let mut renderer = HeadlessRenderer::new();
        let mut sync = MarkerSynchronizer::new();
        for n in 0..4usize {
            let markers: Vec<_> = (0..n).map(|i| MarkerDescriptor::at(i as f64, 0.0)).collect();
            sync.reload(&mut renderer, &markers);
            assert_eq!(sync.handles.len(), sync.descriptors.len());
            assert_eq!(sync.handle_count(), n);
        }
    }
}
