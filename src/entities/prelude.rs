pub use super::checkpoints::Entity as Checkpoints;
pub use super::reports::Entity as Reports;
pub use super::users::Entity as Users;
