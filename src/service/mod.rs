//! Business logic layer
//!
//! Every operation takes the caller's [`crate::policy::CallerContext`] and
//! checks each row it reads or writes against the policy engine.

pub mod announcement;
pub mod class;
pub mod dashboard;
pub mod provisioning;
pub mod syllabus;
pub mod user;

pub use announcement::AnnouncementService;
pub use class::ClassService;
pub use dashboard::DashboardService;
pub use provisioning::ProvisioningService;
pub use syllabus::SyllabusService;
pub use user::UserService;
