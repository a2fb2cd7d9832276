use std::sync::Arc;

use arc_swap::ArcSwapOption;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::api::rest::{openapi::CoursesApiDoc, routes};
use crate::config::CoursesConfig;
use crate::contract::client::CoursesApi;
use crate::domain::service::Service;
use crate::gateways::local::CoursesLocalClient;
use crate::infra::storage::{apply_unique_constraints, repositories, Migrator};

/// Entry point of the courses module: owns the wired service and exposes it
/// to the HTTP host and to in-process consumers.
#[derive(Default)]
pub struct Courses {
    // Keep the domain service behind ArcSwap for cheap read-mostly access.
    service: ArcSwapOption<Service>,
}

impl Courses {
    /// Run schema migrations, then the optional uniqueness hardening.
    pub async fn migrate(&self, db: &DatabaseConnection, cfg: &CoursesConfig) -> anyhow::Result<()> {
        info!("Running courses database migrations");
        Migrator::up(db, None).await?;
        if cfg.enforce_unique_constraints {
            apply_unique_constraints(db).await?;
        }
        info!("Courses database migrations completed successfully");
        Ok(())
    }

    /// Wire the SeaORM repositories into the domain service.
    pub fn init(&self, db: DatabaseConnection, cfg: &CoursesConfig) {
        info!("Initializing courses module");
        debug!(
            "Loaded courses config: max_name_length={}, max_notice_length={}, enforce_unique_constraints={}",
            cfg.max_name_length, cfg.max_notice_length, cfg.enforce_unique_constraints
        );

        let service = Service::new(repositories(db), cfg.service_config());
        self.service.store(Some(Arc::new(service)));
    }

    fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// Local in-process client.
    pub fn client(&self) -> anyhow::Result<Arc<dyn CoursesApi>> {
        Ok(Arc::new(CoursesLocalClient::new(self.service()?)))
    }

    pub fn register_rest(&self, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering courses REST routes");
        let router = routes::register_routes(router, self.service()?);
        info!("Courses REST routes registered successfully");
        Ok(router)
    }

    /// OpenAPI document covering every route added by [`Courses::register_rest`].
    pub fn openapi(&self) -> utoipa::openapi::OpenApi {
        CoursesApiDoc::openapi()
    }
}
