pub(crate) mod admin;
pub(crate) mod seed;
pub(crate) mod serve;
pub(crate) mod stats;
