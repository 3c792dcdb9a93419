mod init;
mod magic;
mod review;
mod stage;

pub use init::cmd_init;
pub use magic::cmd_magic;
pub use review::cmd_review;
pub use stage::{StageArgs, cmd_stage};
