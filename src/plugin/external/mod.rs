//! External Plugin Libraries
//!
//! Modules built as shared libraries and opened at discovery time.

pub mod library;
