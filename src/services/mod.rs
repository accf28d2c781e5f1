pub mod candidate_service;
pub mod grading_service;
pub mod question_service;
pub mod submission_service;
pub mod test_service;
pub mod user_service;
