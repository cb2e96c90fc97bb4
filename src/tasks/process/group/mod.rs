//! Isolation of a command and everything it forks, so one signal reaches
//! the whole tree. Unix uses a session led by the shell, windows a Job
//! Object.

pub(crate) mod action;
pub(crate) mod builder;
pub(crate) mod error;
