pub mod entity;
pub mod hardening;
pub mod mapper;
pub mod migrations;
pub mod sea_orm_repo;

pub use hardening::apply_unique_constraints;
pub use migrations::Migrator;
pub use sea_orm_repo::repositories;
