//! Common utilities for integration tests

pub mod cli;

pub use cli::{strip_ansi, TallyCommand};

use std::path::Path;

/// Write a dataset file with the given inventory JSON
pub fn write_dataset(dir: &Path, name: &str, inventory: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!(r#"{{"inventory": {}, "images": {{}}}}"#, inventory))
        .expect("write dataset file");
    path
}
