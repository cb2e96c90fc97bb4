pub(crate) mod kill;
pub(crate) mod terminate;
