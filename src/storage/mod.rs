//! Storage Layer
//!
//! File I/O with retry and atomic replace. All paths handed to this layer
//! have already passed the path validator.

pub mod file_ops;

pub use file_ops::*;
