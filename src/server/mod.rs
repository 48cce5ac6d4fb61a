//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::jwt::JwtVerifier;
use crate::middleware::ObservabilityLayer;
use crate::policy::IdentityResolver;
use crate::repository::{
    announcement::AnnouncementRepositoryImpl, class::ClassRepositoryImpl,
    syllabus::SyllabusRepositoryImpl, user::UserRepositoryImpl,
};
use crate::service::{
    AnnouncementService, ClassService, DashboardService, ProvisioningService, SyllabusService,
    UserService,
};
use crate::state::HasServices;
use anyhow::Result;
use axum::{
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub jwt_verifier: JwtVerifier,
    pub identity_resolver: Arc<IdentityResolver<UserRepositoryImpl, ClassRepositoryImpl>>,
    pub user_service: Arc<UserService<UserRepositoryImpl>>,
    pub provisioning_service: Arc<ProvisioningService<UserRepositoryImpl>>,
    pub class_service: Arc<ClassService<ClassRepositoryImpl, UserRepositoryImpl>>,
    pub syllabus_service: Arc<SyllabusService<SyllabusRepositoryImpl>>,
    pub announcement_service: Arc<AnnouncementService<AnnouncementRepositoryImpl>>,
    pub dashboard_service: Arc<DashboardService<UserRepositoryImpl, SyllabusRepositoryImpl>>,
    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Wire repositories and services over an existing pool.
    pub fn new(
        config: Config,
        db_pool: MySqlPool,
        prometheus_handle: Option<PrometheusHandle>,
    ) -> Self {
        let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));
        let class_repo = Arc::new(ClassRepositoryImpl::new(db_pool.clone()));
        let syllabus_repo = Arc::new(SyllabusRepositoryImpl::new(db_pool.clone()));
        let announcement_repo = Arc::new(AnnouncementRepositoryImpl::new(db_pool.clone()));

        Self {
            jwt_verifier: JwtVerifier::new(&config.auth),
            config: Arc::new(config),
            db_pool,
            identity_resolver: Arc::new(IdentityResolver::new(
                user_repo.clone(),
                class_repo.clone(),
            )),
            user_service: Arc::new(UserService::new(user_repo.clone())),
            provisioning_service: Arc::new(ProvisioningService::new(user_repo.clone())),
            class_service: Arc::new(ClassService::new(class_repo, user_repo.clone())),
            syllabus_service: Arc::new(SyllabusService::new(syllabus_repo.clone())),
            announcement_service: Arc::new(AnnouncementService::new(announcement_repo)),
            dashboard_service: Arc::new(DashboardService::new(user_repo, syllabus_repo)),
            prometheus_handle,
        }
    }
}

/// Implement HasServices trait for production AppState
impl HasServices for AppState {
    type UserRepo = UserRepositoryImpl;
    type ClassRepo = ClassRepositoryImpl;
    type SyllabusRepo = SyllabusRepositoryImpl;
    type AnnouncementRepo = AnnouncementRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn jwt_verifier(&self) -> &JwtVerifier {
        &self.jwt_verifier
    }

    fn identity_resolver(&self) -> &IdentityResolver<Self::UserRepo, Self::ClassRepo> {
        &self.identity_resolver
    }

    fn user_service(&self) -> &UserService<Self::UserRepo> {
        &self.user_service
    }

    fn provisioning_service(&self) -> &ProvisioningService<Self::UserRepo> {
        &self.provisioning_service
    }

    fn class_service(&self) -> &ClassService<Self::ClassRepo, Self::UserRepo> {
        &self.class_service
    }

    fn syllabus_service(&self) -> &SyllabusService<Self::SyllabusRepo> {
        &self.syllabus_service
    }

    fn announcement_service(&self) -> &AnnouncementService<Self::AnnouncementRepo> {
        &self.announcement_service
    }

    fn dashboard_service(&self) -> &DashboardService<Self::UserRepo, Self::SyllabusRepo> {
        &self.dashboard_service
    }

    fn prometheus_handle(&self) -> Option<&PrometheusHandle> {
        self.prometheus_handle.as_ref()
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

/// Run the HTTP server
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;
    info!("Connected to database");

    if config.hooks.webhook_secret.is_none() {
        warn!("HOOK_WEBHOOK_SECRET is not set; identity lifecycle hooks will reject every delivery");
    }

    let http_addr = config.http_addr();
    let state = AppState::new(config, db_pool, prometheus_handle);
    let app = build_router(state);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Build the HTTP router with generic state type
///
/// Generic over the state type so the same routes serve the production
/// `AppState` and test implementations of `HasServices`.
pub fn build_router<S: HasServices>(state: S) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        .route("/metrics", get(api::metrics::metrics_handler::<S>))
        // Identity lifecycle hooks
        .route(
            "/api/v1/hooks/identity-created",
            post(api::hooks::identity_created::<S>),
        )
        .route(
            "/api/v1/hooks/identity-deleted",
            post(api::hooks::identity_deleted::<S>),
        )
        // Users
        .route("/api/v1/me", get(api::user::me::<S>))
        .route("/api/v1/users", get(api::user::list::<S>))
        .route(
            "/api/v1/users/{id}",
            get(api::user::get::<S>)
                .put(api::user::update::<S>)
                .delete(api::user::delete::<S>),
        )
        .route("/api/v1/users/{id}/role", post(api::user::promote::<S>))
        // Classes and assignments
        .route(
            "/api/v1/classes",
            get(api::class::list::<S>).post(api::class::create::<S>),
        )
        .route(
            "/api/v1/classes/{id}",
            get(api::class::get::<S>)
                .put(api::class::update::<S>)
                .delete(api::class::delete::<S>),
        )
        .route(
            "/api/v1/classes/{id}/assignments",
            get(api::class::class_assignments::<S>),
        )
        .route(
            "/api/v1/classes/{id}/assignments/{user_id}",
            put(api::class::assign::<S>).delete(api::class::unassign::<S>),
        )
        .route("/api/v1/assignments", get(api::class::list_assignments::<S>))
        // Syllabus entries
        .route(
            "/api/v1/syllabus-entries",
            get(api::syllabus::list::<S>).post(api::syllabus::create::<S>),
        )
        .route(
            "/api/v1/syllabus-entries/{id}",
            get(api::syllabus::get::<S>)
                .put(api::syllabus::update::<S>)
                .delete(api::syllabus::delete::<S>),
        )
        // Announcements
        .route(
            "/api/v1/announcements",
            get(api::announcement::list::<S>).post(api::announcement::create::<S>),
        )
        .route(
            "/api/v1/announcements/{id}",
            get(api::announcement::get::<S>)
                .put(api::announcement::update::<S>)
                .delete(api::announcement::delete::<S>),
        )
        // Derived views
        .route(
            "/api/v1/views/pending-volunteers",
            get(api::views::pending_volunteers::<S>),
        )
        .route(
            "/api/v1/views/volunteer-dashboard",
            get(api::views::volunteer_dashboard::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .layer(ObservabilityLayer)
        .layer(cors)
        .with_state(state)
}
