pub mod attendance;
pub mod class;
pub mod course;
pub mod enrollment;
pub mod notice;
pub mod user;
