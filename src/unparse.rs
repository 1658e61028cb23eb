//! # Unparsing
//!
//! This module provides serialization for expressions and observations to
//! JSON.

use crate::core::*;
use crate::session::Observation;
use crate::typecheck::Error;

/// Serialize an expression to JSON
pub fn exp(e: &Expr) -> Result<String, Error> {
    serde_json::to_string(e).map_err(|e| Error::format(e.to_string()))
}

pub fn observation(obs: &Observation) -> Result<String, Error> {
    serde_json::to_string_pretty(obs).map_err(|e| Error::format(e.to_string()))
}
