// file: src/input/mod.rs
// description: document discovery module exports
// reference: internal module structure

mod scanner;

pub use scanner::{FileScanner, ScannedFile};
