use crate::models::{CourseBrief, WordCount};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service_core::error::AppError;
use std::collections::HashMap;
use validator::Validate;

/// Body of `POST /courses`.
///
/// Every field is optional at the serde level so that a missing field is a
/// validation error with a JSON body rather than an extractor rejection.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(
        required(message = "id is required"),
        length(min = 1, message = "id cannot be empty")
    )]
    pub id: Option<String>,
    #[validate(
        required(message = "course_description is required"),
        length(min = 1, message = "course_description cannot be empty")
    )]
    pub course_description: Option<String>,
    /// Integer or digit string; see [`WordCount::from_json`].
    #[validate(required(message = "number_of_words is required"))]
    pub number_of_words: Option<Value>,
    #[validate(
        required(message = "learner_type is required"),
        length(min = 1, message = "learner_type cannot be empty")
    )]
    pub learner_type: Option<String>,
}

impl CreateCourseRequest {
    /// Validate and split into the course id and the generation brief.
    pub fn into_parts(self) -> Result<(String, CourseBrief), AppError> {
        self.validate()?;
        let Some(id) = self.id else {
            return Err(missing("id"));
        };
        let brief = brief_from(
            self.course_description,
            self.number_of_words,
            self.learner_type,
        )?;
        Ok((id, brief))
    }
}

/// Body of `PUT /courses/:id`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(
        required(message = "course_description is required"),
        length(min = 1, message = "course_description cannot be empty")
    )]
    pub course_description: Option<String>,
    #[validate(required(message = "number_of_words is required"))]
    pub number_of_words: Option<Value>,
    #[validate(
        required(message = "learner_type is required"),
        length(min = 1, message = "learner_type cannot be empty")
    )]
    pub learner_type: Option<String>,
}

impl UpdateCourseRequest {
    pub fn into_brief(self) -> Result<CourseBrief, AppError> {
        self.validate()?;
        brief_from(
            self.course_description,
            self.number_of_words,
            self.learner_type,
        )
    }
}

fn brief_from(
    description: Option<String>,
    number_of_words: Option<Value>,
    learner_type: Option<String>,
) -> Result<CourseBrief, AppError> {
    let description = description.ok_or_else(|| missing("course_description"))?;
    let learner_type = learner_type.ok_or_else(|| missing("learner_type"))?;
    let number_of_words = number_of_words.ok_or_else(|| missing("number_of_words"))?;
    let word_count = WordCount::from_json(&number_of_words)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e)))?;

    Ok(CourseBrief {
        description,
        word_count,
        learner_type,
    })
}

fn missing(field: &str) -> AppError {
    AppError::BadRequest(anyhow::anyhow!("{} is required", field))
}

/// Query string of `GET /courses`.
#[derive(Debug, Default, Deserialize)]
pub struct CourseQuery {
    pub id: Option<String>,
}

impl CourseQuery {
    /// An empty `id=` means "no id", i.e. list everything.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Response of a successful create or update.
#[derive(Debug, Serialize, Deserialize)]
pub struct CourseMutationResponse {
    pub message: String,
    pub course_id: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CourseContentResponse {
    pub course_id: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CourseListResponse {
    pub courses: HashMap<String, String>,
}

/// `GET /courses` answers with one course or all of them.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CourseQueryResponse {
    One(CourseContentResponse),
    All(CourseListResponse),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteCourseResponse {
    pub message: String,
    pub course_id: String,
}
