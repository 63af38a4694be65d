use foundation::time::Time;

/// Debounced loading flag.
///
/// Arming starts a deadline; if the renderer does not reach idle before it
/// passes, the flag turns visible. Idle clears both. Sub-grace operations
/// therefore never flash the flag, while genuinely slow loads surface it.
#[derive(Debug, Clone)]
pub struct LoadingIndicator {
    grace_secs: f64,
    deadline: Option<Time>,
    visible: bool,
}

impl LoadingIndicator {
    pub fn new(grace_secs: f64) -> Self {
        Self {
            grace_secs,
            deadline: None,
            visible: false,
        }
    }

    /// Starts (or restarts, cancelling any pending deadline) the grace
    /// timer.
    pub fn arm(&mut self, now: Time) {
        self.deadline = Some(now.plus_secs(self.grace_secs));
    }

    /// The renderer went idle. Returns `true` if visibility changed.
    pub fn settle(&mut self) -> bool {
        self.deadline = None;
        let was_visible = self.visible;
        self.visible = false;
        was_visible
    }

    /// Advances time. Returns `true` if the flag just became visible.
    pub fn tick(&mut self, now: Time) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }
        self.deadline = None;
        if self.visible {
            return false;
        }
        self.visible = true;
        true
    }

    pub fn visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::LoadingIndicator;
    use foundation::time::Time;

    #[test]
    fn fast_operation_never_shows_the_flag() {
        let mut loading = LoadingIndicator::new(0.5);
        loading.arm(Time(0.0));
        assert!(!loading.tick(Time(0.4)));
        assert!(!loading.settle());
        assert!(!loading.tick(Time(1.0)));
        assert!(!loading.visible());
    }

    #[test]
    fn slow_operation_shows_then_clears() {
        let mut loading = LoadingIndicator::new(0.5);
        loading.arm(Time(0.0));
        assert!(loading.tick(Time(0.5)));
        assert!(loading.visible());
        assert!(!loading.tick(Time(0.6)));
        assert!(loading.settle());
        assert!(!loading.visible());
    }

    #[test]
    fn rearming_restarts_the_deadline() {
        let mut loading = LoadingIndicator::new(0.5);
        loading.arm(Time(0.0));
        loading.arm(Time(0.4));
        assert!(!loading.tick(Time(0.5)));
        assert!(loading.tick(Time(0.9)));
    }
}
