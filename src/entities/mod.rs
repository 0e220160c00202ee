pub mod prelude;

pub mod checkpoints;
pub mod reports;
pub mod users;
