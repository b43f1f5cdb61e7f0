//! Hardware-backed implementations of the `botion-core` ports.

pub mod adapters;
pub mod drivers;
pub mod tasks;
