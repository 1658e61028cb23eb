//! # Parsing
//!
//! There is no concrete syntax: programs are stored as serialized syntax
//! trees in JSON, and configuration and unit tests are TOML. The functions in
//! this module abstract away from which format is used for what.

use crate::config::Config;
use crate::core::*;
use crate::typecheck::Error;
use crate::unit_test::UnitTest;

use serde::Deserialize;

#[derive(Deserialize)]
struct TestFile {
    #[serde(default)]
    test: Vec<UnitTest>,
}

pub fn config(src: &str) -> Result<Config, Error> {
    toml::from_str(src).map_err(|e| Error::format(e.to_string()))
}

/// Parse a unit test file (a TOML array of tables named `test`).
pub fn unit_tests(src: &str) -> Result<Vec<UnitTest>, Error> {
    toml::from_str::<TestFile>(src)
        .map(|file| file.test)
        .map_err(|e| Error::format(e.to_string()))
}

/// Deserialize an expression from JSON.
pub fn exp(src: &str) -> Result<Expr, Error> {
    serde_json::from_str(src).map_err(|e| Error::format(e.to_string()))
}
