//! # A type-directed structured editor core
//!
//! Programs in a small typed functional language are edited one action at a
//! time through a cursor. At every step the editor reports exactly the
//! actions that keep the program well-typed, in scope, and within a node
//! budget, and applies the one that is chosen. The editor is driven through a
//! [`session::Session`], which exchanges programs with its host as flat
//! integer tables.

pub mod main_handler;

pub mod action;
pub mod apply;
pub mod config;
pub mod core;
pub mod enumerate;
pub mod eval;
pub mod flat;
pub mod parse;
pub mod pbn;
pub mod render;
pub mod session;
pub mod snapshot;
pub mod typ;
pub mod typecheck;
pub mod unparse;
pub mod util;
pub mod zipper;
