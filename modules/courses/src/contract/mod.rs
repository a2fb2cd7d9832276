pub mod client;
pub mod error;
pub mod model;

pub use client::CoursesApi;
pub use error::CoursesError;
pub use model::*;
