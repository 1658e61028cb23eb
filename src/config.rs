//! # Configuration
//!
//! Sessions are configured by a TOML file; every field has a default, so an
//! empty file (or no file at all) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one subdirectory per assignment
    pub assignment_dir: PathBuf,
    pub editor: EditorConfig,
    pub eval: EvalConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of nodes in a program
    pub max_nodes: usize,
    /// Maximum number of distinct variables in a program
    pub max_vars: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Evaluation steps allowed per unit test
    pub fuel: usize,
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assignment_dir: PathBuf::from("assignments"),
            editor: EditorConfig::default(),
            eval: EvalConfig::default(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_nodes: 50,
            max_vars: 10,
        }
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            fuel: 10_000,
            max_depth: 200,
        }
    }
}
