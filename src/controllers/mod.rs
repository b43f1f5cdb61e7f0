mod provisioning;
mod task_display;

pub use provisioning::run_provisioning;
pub use task_display::{BoardPresenter, run_task_display};
