//! Repository implementations

pub mod questions;
pub mod users;
