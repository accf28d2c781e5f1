pub mod answer;
pub mod candidate;
pub mod question;
pub mod submission;
pub mod user;
