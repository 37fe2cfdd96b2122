mod list;
mod plan;
mod sync;

pub use list::cmd_list;
pub use plan::cmd_plan;
pub use sync::cmd_sync;
