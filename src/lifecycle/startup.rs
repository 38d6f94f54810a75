//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Load the dataset and choose the course source
//! - Start background tasks (dataset watcher, metrics endpoint)
//! - Bind the listener last, so traffic only arrives when ready
//!
//! Any startup error is fatal; nothing after startup is.

use std::net::SocketAddr;
use std::sync::Arc;

use notify::RecommendedWatcher;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::catalog::{Catalog, CatalogError, CourseSource, Dataset, DatasetError, DatasetWatcher, RemoteCourses};
use crate::config::{validate_config, AppConfig, ValidationError};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {}", join_errors(.0))]
    Config(Vec<ValidationError>),

    #[error("failed to load dataset: {0}")]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to watch dataset: {0}")]
    Watch(#[from] notify::Error),

    #[error("failed to start metrics endpoint: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Task(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Composition root: owns the catalog, the bound listener and background
/// tasks for one server instance.
pub struct Application {
    config: AppConfig,
    catalog: Arc<Catalog>,
    listener: TcpListener,
    watcher: Option<RecommendedWatcher>,
}

impl Application {
    /// Initialize every subsystem and bind the listener.
    pub async fn build(config: AppConfig) -> Result<Self, StartupError> {
        validate_config(&config).map_err(StartupError::Config)?;

        let dataset = match &config.catalog.data_path {
            Some(path) => {
                tracing::info!(path = ?path, "Loading dataset");
                Dataset::load(path)?
            }
            None => {
                tracing::info!("Using built-in dataset");
                Dataset::builtin()?
            }
        };

        let source = match &config.catalog.upstream {
            Some(upstream) => {
                let remote = RemoteCourses::new(upstream)?;
                tracing::info!(base_url = %remote.base_url(), "Courses served from upstream catalog");
                CourseSource::Remote(remote)
            }
            None => CourseSource::Local,
        };

        let catalog = Arc::new(Catalog::new(dataset, source));

        let watcher = match (&config.catalog.data_path, config.catalog.watch) {
            (Some(path), true) => Some(DatasetWatcher::new(path, catalog.clone()).run()?),
            _ => None,
        };

        if config.observability.metrics_enabled {
            // validated above
            if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
                metrics::init_metrics(addr)?;
            }
        }

        let listener = TcpListener::bind(&config.listener.bind_address)
            .await
            .map_err(|source| StartupError::Bind {
                address: config.listener.bind_address.clone(),
                source,
            })?;

        Ok(Self {
            config,
            catalog,
            listener,
            watcher,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Serve until `shutdown` fires.
    pub async fn run(self, shutdown: broadcast::Receiver<()>) -> Result<(), StartupError> {
        // Held for the lifetime of the server; dropping it stops reloads.
        let _watcher = self.watcher;

        let server = HttpServer::new(self.config, self.catalog);
        server.run(self.listener, shutdown).await?;
        Ok(())
    }

    /// Build and serve in a background task.
    pub async fn start(config: AppConfig) -> Result<RunningApplication, StartupError> {
        let app = Self::build(config).await?;
        let addr = app.local_addr()?;

        let shutdown = Shutdown::new();
        let handle = tokio::spawn(app.run(shutdown.subscribe()));

        Ok(RunningApplication {
            addr,
            shutdown,
            handle,
        })
    }
}

/// Handle to an application started with [`Application::start`].
pub struct RunningApplication {
    addr: SocketAddr,
    shutdown: Shutdown,
    handle: JoinHandle<Result<(), StartupError>>,
}

impl RunningApplication {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signal shutdown and wait for the server to drain.
    pub async fn stop(self) -> Result<(), StartupError> {
        self.shutdown.trigger();
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(StartupError::Task(e.to_string())),
        }
    }
}
