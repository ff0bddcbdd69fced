//! Request handlers.

pub mod priority;
