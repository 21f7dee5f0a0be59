//! Wire types for the platforms the service receives updates from.

pub mod telegram;
