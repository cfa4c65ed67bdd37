pub mod course;
pub mod metrics;
pub mod providers;
pub mod store;

pub use course::{CourseError, CourseService, CourseStore};
pub use providers::{ProviderError, TextProvider};
pub use store::{KeyGuard, ResourceStore};
