//! Helpers shared by the RenderWare container crates.

pub mod debug;
