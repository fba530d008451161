pub mod form;
pub mod question;
pub mod report;
pub mod response;
pub mod survey;
pub mod template;
pub mod user;
