pub mod checkpoint;
pub mod report;
pub mod user;
