mod checkpoint;
mod report;
mod user;

pub use checkpoint::{cmd_checkpoint_add, cmd_checkpoint_list, cmd_checkpoint_seed, cmd_checkpoint_show};
pub use report::{cmd_report_list, cmd_report_record, cmd_report_show, cmd_report_start};
pub use user::{
    cmd_user_admin, cmd_user_create, cmd_user_delete, cmd_user_logout, cmd_user_show,
    cmd_user_token,
};
