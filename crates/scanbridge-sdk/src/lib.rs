//! File-based workflows over the scanbridge scanning core.

pub mod commands;
pub mod request;
