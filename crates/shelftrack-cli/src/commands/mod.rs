pub mod common;
pub mod config;
pub mod inventory;
pub mod queue_cmd;
pub mod status;
pub mod submit;
pub mod sync;
