// Library exports for the rewatch file-change supervisor

pub mod config;
pub mod error;
pub mod logger;
pub mod process;
pub mod trigger;
pub mod watcher;
