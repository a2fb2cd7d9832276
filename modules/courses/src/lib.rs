//! Course management: courses with their rosters, classes, attendance and notices.
//!
//! Consumers depend on [`contract`] (models, the [`client::CoursesApi`] trait and
//! [`error::CoursesError`]); the binary wires storage and HTTP through [`Courses`].

pub mod contract;

pub use contract::{client, error, model};

mod module;
pub use module::Courses;

pub use config::CoursesConfig;

// Layers below are public only so the integration tests can reach them.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
