pub mod assessment_dto;
pub mod submission_dto;
