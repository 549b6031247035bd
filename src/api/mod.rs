//! Clients for external services.
//!
//! Task records live on the task server; [`TaskApi`] is the only way the
//! application reads or changes them.

pub mod tasks;

pub use tasks::TaskApi;
