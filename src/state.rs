//! Application state traits for dependency injection
//!
//! Handlers are generic over [`HasServices`] so the same router runs against
//! the MySQL-backed `AppState` in production and in-memory repositories in
//! tests.

use crate::config::Config;
use crate::jwt::JwtVerifier;
use crate::policy::IdentityResolver;
use crate::repository::{
    AnnouncementRepository, ClassRepository, SyllabusRepository, UserRepository,
};
use crate::service::{
    AnnouncementService, ClassService, DashboardService, ProvisioningService, SyllabusService,
    UserService,
};
use metrics_exporter_prometheus::PrometheusHandle;

/// Trait for application state that provides access to all services.
pub trait HasServices: Clone + Send + Sync + 'static {
    /// The user repository type
    type UserRepo: UserRepository;
    /// The class and assignment repository type
    type ClassRepo: ClassRepository;
    /// The syllabus entry repository type
    type SyllabusRepo: SyllabusRepository;
    /// The announcement repository type
    type AnnouncementRepo: AnnouncementRepository;

    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the bearer token verifier
    fn jwt_verifier(&self) -> &JwtVerifier;

    /// Get the resolver that turns an identity into a caller context
    fn identity_resolver(&self) -> &IdentityResolver<Self::UserRepo, Self::ClassRepo>;

    fn user_service(&self) -> &UserService<Self::UserRepo>;

    fn provisioning_service(&self) -> &ProvisioningService<Self::UserRepo>;

    fn class_service(&self) -> &ClassService<Self::ClassRepo, Self::UserRepo>;

    fn syllabus_service(&self) -> &SyllabusService<Self::SyllabusRepo>;

    fn announcement_service(&self) -> &AnnouncementService<Self::AnnouncementRepo>;

    fn dashboard_service(&self) -> &DashboardService<Self::UserRepo, Self::SyllabusRepo>;

    /// Prometheus handle when metrics are enabled
    fn prometheus_handle(&self) -> Option<&PrometheusHandle>;

    /// Check if the database is reachable
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}
