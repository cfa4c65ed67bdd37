//! HTTP handlers for course-service.

pub mod courses;
pub mod fallback;
pub mod health;
pub mod metrics;

pub use courses::{create_course, delete_course, get_courses, update_course};
pub use fallback::{method_not_allowed, route_not_found};
pub use health::{health_check, readiness_check};
