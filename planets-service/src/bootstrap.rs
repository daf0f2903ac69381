//! Two-phase startup.
//!
//! [`Application::build`] wires every component; [`Application::start`] then
//! launches the ready hooks in registration order on a background task and
//! reports the process as ready without waiting for them. A slow or failing
//! source delays the warm-up, never readiness.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use planets_cache::{MemoryStore, RedisStore};
use planets_core::error::Result;
use planets_core::traits::{CacheStore, PlanetRepository, PlanetSource, ReadyHook};
use planets_registry::MemoryRepository;
use planets_swapi::SwapiClient;

use crate::config::ServiceConfig;
use crate::service::PlanetsService;
use crate::warmup::CacheWarmer;

/// Constructed but not yet started application.
pub struct Application {
    service: Arc<PlanetsService>,
    cache: Arc<dyn CacheStore>,
    warmer: Arc<CacheWarmer>,
    hooks: Vec<Arc<dyn ReadyHook>>,
    ready: Arc<AtomicBool>,
}

impl Application {
    /// Wires the service and warmer around the given collaborators.
    ///
    /// The warmer is registered as the first ready hook unless warm-up is
    /// disabled.
    pub fn build(
        config: &ServiceConfig,
        repository: Arc<dyn PlanetRepository>,
        cache: Arc<dyn CacheStore>,
        source: Arc<dyn PlanetSource>,
    ) -> Self {
        let service = Arc::new(PlanetsService::with_policy(
            repository,
            cache.clone(),
            config.planets_policy(),
        ));
        let warmer = Arc::new(CacheWarmer::with_policy(
            source,
            cache.clone(),
            config.appearances_policy(),
        ));

        let mut hooks: Vec<Arc<dyn ReadyHook>> = Vec::new();
        if config.warmup_enabled {
            hooks.push(warmer.clone());
        }

        Self {
            service,
            cache,
            warmer,
            hooks,
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Builds the default stack: Redis when configured (in-memory store
    /// otherwise), the SWAPI client, and an in-memory repository.
    pub async fn from_config(config: ServiceConfig) -> Result<Self> {
        let cache: Arc<dyn CacheStore> = match &config.redis {
            Some(redis) => Arc::new(RedisStore::connect(redis.clone()).await?),
            None => {
                info!("No Redis configured, using in-memory cache store");
                Arc::new(MemoryStore::new())
            }
        };
        let source = Arc::new(SwapiClient::with_config(config.swapi.clone())?);
        let repository = Arc::new(MemoryRepository::new());

        Ok(Self::build(&config, repository, cache, source))
    }

    /// Appends a ready hook, run after those already registered.
    pub fn with_hook(mut self, hook: Arc<dyn ReadyHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Handle that flips to true once startup completes.
    pub fn readiness(&self) -> Arc<AtomicBool> {
        self.ready.clone()
    }

    /// The cache-aside service.
    pub fn service(&self) -> &Arc<PlanetsService> {
        &self.service
    }

    /// The warm-up coordinator.
    pub fn warmer(&self) -> &Arc<CacheWarmer> {
        &self.warmer
    }

    /// The shared cache store.
    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// Launches the ready hooks in the background, then marks the
    /// application ready.
    ///
    /// Hooks run one after another in registration order. Must be called from
    /// within a tokio runtime.
    #[instrument(skip(self), fields(hooks = self.hooks.len()))]
    pub async fn start(self) -> RunningApplication {
        let hooks = self.hooks;
        let handle = tokio::spawn(async move {
            for hook in &hooks {
                info!(hook = hook.name(), "Running ready hook");
                hook.on_ready().await;
            }
        });

        self.ready.store(true, Ordering::SeqCst);
        info!("Application ready");

        RunningApplication {
            service: self.service,
            cache: self.cache,
            warmer: self.warmer,
            ready: self.ready,
            hooks: Mutex::new(Some(handle)),
        }
    }
}

/// Started application, accepting traffic.
pub struct RunningApplication {
    service: Arc<PlanetsService>,
    cache: Arc<dyn CacheStore>,
    warmer: Arc<CacheWarmer>,
    ready: Arc<AtomicBool>,
    hooks: Mutex<Option<JoinHandle<()>>>,
}

impl RunningApplication {
    /// True once startup has completed. Ready hooks may still be running.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// True once every ready hook has finished.
    pub fn hooks_finished(&self) -> bool {
        self.hooks
            .lock()
            .as_ref()
            .map_or(true, JoinHandle::is_finished)
    }

    /// Waits for the ready hooks to finish. Later calls return immediately.
    pub async fn wait_for_hooks(&self) {
        let handle = self.hooks.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Ready hook task aborted");
            }
        }
    }

    /// The cache-aside service.
    pub fn service(&self) -> &Arc<PlanetsService> {
        &self.service
    }

    /// The warm-up coordinator.
    pub fn warmer(&self) -> &Arc<CacheWarmer> {
        &self.warmer
    }

    /// The shared cache store.
    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }
}
