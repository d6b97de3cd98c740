//! Configuration layer: JSON settings + validated in-memory structures.

pub mod layout;

pub use layout::{LayoutConfig, ValidatedLayout};
