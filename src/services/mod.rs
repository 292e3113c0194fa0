pub mod content_service;
pub mod grading_service;
pub mod session_service;
