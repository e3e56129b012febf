//! Command-line arguments
//!
//! Flags given here take precedence over the `[logging]` values of the
//! configuration file.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// What a run scans, in the order the scans happen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
    /// A plugin directory, scanned directly
    Directory(PathBuf),
    /// A package root and then its installed packages
    Project(PathBuf),
    /// An installed-packages directory
    Packages(PathBuf),
}

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "plugscout")]
#[command(about = "Discover plugins in plugin directories and installed packages")]
#[command(version, long_version = crate::core::version::long_version())]
#[command(after_help = " * can be specified multiple times")]
pub struct Args {
    /// Plugin directories to scan*
    #[arg(short = 'd', long = "dir", value_name = "DIR", action = ArgAction::Append)]
    pub dirs: Vec<PathBuf>,

    /// Package roots to scan, together with their installed packages*
    #[arg(short = 'p', long = "project", value_name = "DIR", action = ArgAction::Append)]
    pub projects: Vec<PathBuf>,

    /// Installed-packages directories to scan*
    #[arg(short = 'n', long = "packages", value_name = "DIR", action = ArgAction::Append)]
    pub packages: Vec<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = crate::core::logging::LOG_LEVELS)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = crate::core::logging::LOG_FORMATS)]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force coloured output
    #[arg(short = 'g', long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color", conflicts_with = "color")]
    pub no_color: bool,
}

impl Args {
    pub fn parse_from_env() -> Self {
        Self::parse()
    }

    /// Colour choice given on the command line, if any
    pub fn color_override(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Scan targets in run order: directories, projects, then package directories
    ///
    /// Without any explicit target the current directory is scanned as a project.
    pub fn scan_targets(&self) -> Vec<ScanTarget> {
        let mut targets: Vec<ScanTarget> = self
            .dirs
            .iter()
            .cloned()
            .map(ScanTarget::Directory)
            .chain(self.projects.iter().cloned().map(ScanTarget::Project))
            .chain(self.packages.iter().cloned().map(ScanTarget::Packages))
            .collect();

        if targets.is_empty() {
            targets.push(ScanTarget::Project(PathBuf::from(".")));
        }
        targets
    }
}
