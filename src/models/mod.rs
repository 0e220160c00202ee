pub mod checkpoint;
pub mod report;
pub mod user;

pub use checkpoint::Checkpoint;
pub use report::Report;
pub use user::User;
