pub mod question;
pub mod section;
pub mod session;
