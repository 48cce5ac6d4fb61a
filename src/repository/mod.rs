//! Data access layer (Repository pattern)
//!
//! Repositories are plain CRUD. Authorization happens in the service layer
//! before any of these are called.

pub mod announcement;
pub mod class;
pub mod syllabus;
pub mod user;

pub use announcement::AnnouncementRepository;
pub use class::ClassRepository;
pub use syllabus::SyllabusRepository;
pub use user::UserRepository;
