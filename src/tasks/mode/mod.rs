//! The two presentations of a running process: buffered and streaming.

pub mod buffered;
pub mod streaming;
