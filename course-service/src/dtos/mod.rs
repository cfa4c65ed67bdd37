//! Request and response bodies for the HTTP API.

pub mod courses;

pub use courses::{
    CourseContentResponse, CourseListResponse, CourseMutationResponse, CourseQuery,
    CourseQueryResponse, CreateCourseRequest, DeleteCourseResponse, UpdateCourseRequest,
};
