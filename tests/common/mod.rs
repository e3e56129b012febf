//! Common test utilities and helpers
//!
//! Filesystem fixtures for building plugin directories and package trees.

#![allow(dead_code)]

use std::path::Path;

/// Create files (and their parent directories) below `root`
pub fn touch(root: &Path, files: &[&str]) {
    for file in files {
        write(root, file, "");
    }
}

/// Write `content` to `root/file`, creating parent directories
pub fn write(root: &Path, file: &str, content: &str) {
    let path = root.join(file);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Write a package manifest declaring plugin files
pub fn manifest_with_files(package_dir: &Path, files: &[&str]) {
    let listed: Vec<String> = files.iter().map(|file| format!("\"{}\"", file)).collect();
    write(
        package_dir,
        "package.json",
        &format!(r#"{{ "plugins": {{ "files": [{}] }} }}"#, listed.join(", ")),
    );
}
