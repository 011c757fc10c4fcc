//! Business services for the document pipeline
//!
//! access/ is the authorization guard used by every service; intake/,
//! review/, and status/ each own one workflow end to end. store/ holds the
//! persistence traits the services depend on.

pub mod access;
pub mod intake;
pub mod review;
pub mod status;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
