//! Domain models for the volunteer portal

pub mod announcement;
pub mod class;
pub mod common;
pub mod syllabus;
pub mod user;
pub mod view;

pub use announcement::*;
pub use class::*;
pub use common::StringUuid;
pub use syllabus::*;
pub use user::*;
pub use view::*;
