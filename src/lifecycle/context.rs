//! Client-wide context shared by every resolution.
//!
//! # Responsibilities
//! - Hold the unauthorized hook, the success observer and the default date
//!   strategy
//! - Allow hooks to be installed and torn down explicitly
//!
//! # Design Decisions
//! - Passed to the resolver explicitly; no global mutable state
//! - Hooks live behind an `ArcSwap` so resolutions read them without locking
//!   while `install`/`teardown` swap them atomically

use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;

use crate::config::schema::ClientConfig;
use crate::decode::DateStrategy;
use crate::observability::metrics;

/// Fired (fire-and-forget) whenever any request receives 401.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// Fired before the callbacks of every successful delivery with the
/// request's host and path.
pub type SuccessObserver = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Replaceable set of client-wide hooks.
#[derive(Clone, Default)]
pub struct Hooks {
    pub unauthorized: Option<UnauthorizedHook>,
    pub success_observer: Option<SuccessObserver>,
    pub date_strategy: Option<DateStrategy>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_unauthorized(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.unauthorized = Some(Arc::new(hook));
        self
    }

    pub fn observe_success(mut self, observer: impl Fn(&str, &str) + Send + Sync + 'static) -> Self {
        self.success_observer = Some(Arc::new(observer));
        self
    }

    pub fn date_strategy(mut self, strategy: DateStrategy) -> Self {
        self.date_strategy = Some(strategy);
        self
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("unauthorized", &self.unauthorized.is_some())
            .field("success_observer", &self.success_observer.is_some())
            .field("date_strategy", &self.date_strategy)
            .finish()
    }
}

/// Context handed to the resolver.
pub struct ClientContext {
    hooks: ArcSwap<Hooks>,
    metrics_enabled: bool,
}

impl ClientContext {
    /// Create a context with the given hooks installed.
    pub fn new(hooks: Hooks) -> Self {
        tracing::debug!(hooks = ?hooks, "Client context initialized");
        Self {
            hooks: ArcSwap::from_pointee(hooks),
            metrics_enabled: true,
        }
    }

    /// Turn metric recording for resolutions on this context on or off.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    pub fn metrics_enabled(&self) -> bool {
        self.metrics_enabled
    }

    /// Build a context from loaded configuration.
    ///
    /// With metrics disabled nothing is recorded and the metrics-backed
    /// success observer is not installed.
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut hooks = Hooks::new();
        hooks.date_strategy = config.defaults.date_strategy.clone();
        if config.observability.metrics_enabled {
            hooks.success_observer = Some(metrics::success_counter());
        }
        Self::new(hooks).with_metrics(config.observability.metrics_enabled)
    }

    /// Snapshot of the currently installed hooks.
    pub fn hooks(&self) -> Arc<Hooks> {
        self.hooks.load_full()
    }

    /// Replace the installed hooks.
    pub fn install(&self, hooks: Hooks) {
        tracing::debug!(hooks = ?hooks, "Client context hooks replaced");
        self.hooks.store(Arc::new(hooks));
    }

    /// Remove every hook. Resolutions started afterwards see none.
    pub fn teardown(&self) {
        self.hooks.store(Arc::new(Hooks::default()));
        tracing::debug!("Client context torn down");
    }
}

impl Default for ClientContext {
    fn default() -> Self {
        Self::new(Hooks::default())
    }
}

impl fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientContext")
            .field("hooks", &*self.hooks.load())
            .field("metrics_enabled", &self.metrics_enabled)
            .finish()
    }
}
