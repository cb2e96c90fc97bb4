pub(crate) mod group;
pub(crate) mod reader;
pub mod registry;
