pub mod config;
pub mod error;
pub mod event;
pub mod executor;
pub mod mode;
pub mod process;
pub mod result;
pub mod state;
pub mod supervisor;
