// Process module - child lifecycle, kill semantics, exit classification

mod handle;
mod runner;
mod supervisor;

pub use handle::ProcessHandle;
pub use runner::{launch, run_and_monitor};
pub use supervisor::Supervisor;
