//! Application startup and lifecycle management.
//!
//! Wires the configured provider, the in-memory store and the HTTP router
//! together and serves until a shutdown signal arrives.

use crate::config::{CourseConfig, ProviderSettings};
use crate::handlers::{
    create_course, delete_course, get_courses, health_check, method_not_allowed,
    metrics::render_metrics, readiness_check, route_not_found, update_course,
};
use crate::services::metrics::init_metrics;
use crate::services::providers::{
    gemini::GeminiProvider, mock::MockProvider, openai::OpenAiProvider, TextProvider,
};
use crate::services::{CourseService, CourseStore};
use axum::{
    middleware::from_fn,
    routing::{get, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub courses: CourseService,
    pub metrics: PrometheusHandle,
}

impl AppState {
    pub fn new(config: CourseConfig, provider: Arc<dyn TextProvider>) -> Self {
        let courses = CourseService::new(CourseStore::new(), provider, config.generation);
        Self {
            courses,
            metrics: init_metrics(),
        }
    }
}

/// Build the provider selected in the configuration.
pub fn build_provider(config: &CourseConfig) -> Result<Arc<dyn TextProvider>, AppError> {
    let timeout = config.generation.timeout;
    let provider: Arc<dyn TextProvider> = match &config.provider {
        ProviderSettings::OpenAi(openai) => {
            tracing::info!(model = %openai.model, "Initialized OpenAI text provider");
            Arc::new(
                OpenAiProvider::new(openai.clone(), timeout)
                    .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
            )
        }
        ProviderSettings::Gemini(gemini) => {
            tracing::info!(model = %gemini.model, "Initialized Gemini text provider");
            Arc::new(
                GeminiProvider::new(gemini.clone(), timeout)
                    .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?,
            )
        }
        ProviderSettings::Mock => {
            tracing::warn!("Using mock text provider; generated content is not real");
            Arc::new(MockProvider::new())
        }
    };
    Ok(provider)
}

/// The full HTTP router with middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check).fallback(method_not_allowed))
        .route("/ready", get(readiness_check).fallback(method_not_allowed))
        .route("/metrics", get(render_metrics).fallback(method_not_allowed))
        .route(
            "/courses",
            get(get_courses)
                .post(create_course)
                .fallback(method_not_allowed),
        )
        .route(
            "/courses/:id",
            put(update_course)
                .delete(delete_course)
                .fallback(method_not_allowed),
        )
        .fallback(route_not_found)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the provider named in the configuration.
    pub async fn build(config: CourseConfig) -> Result<Self, AppError> {
        let provider = build_provider(&config)?;
        Self::build_with_provider(config, provider).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: CourseConfig,
        provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        // Port 0 = random port for testing
        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            provider = provider.name(),
            "Course service: HTTP on port {}",
            port
        );

        Ok(Self {
            port,
            listener,
            state: AppState::new(config, provider),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run until the process receives Ctrl-C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
