//! bscforge Core - Domain types shared across the bscforge workspace.

mod types;

pub use types::*;
