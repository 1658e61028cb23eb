//! # Editor actions
//!
//! Actions are pure data: moving the cursor, constructing a new node around or
//! in place of the focus, or unwrapping the focus to one of its children.
//! Whether an action is legal at a cursor is decided by
//! [`crate::enumerate::Enumerator`].
//!
//! The host addresses actions by integer tags. The fixed actions come first
//! (in the order of [`Action::base`]), followed by one variable-reference tag
//! per possible let-bound variable and one argument-reference tag per possible
//! function argument.

use crate::core::*;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Move {
    Parent,
    Child(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Side {
    Left,
    Right,
}

/// Which slot of a new `let` the focus moves into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum LetSlot {
    Def,
    Body,
}

/// Which slot of a new conditional the focus moves into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum IfSlot {
    Cond,
    Then,
    Else,
}

/// The shape of a node to construct at the cursor.
///
/// Atoms and references replace the focus; every other shape wraps it, with
/// the focus placed in the slot the shape names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Shape {
    Hole,
    Nil,
    Int(i64),
    Bool(bool),
    UnOp(UnOp),
    BinOp(BinOp, Side),
    Let(LetSlot),
    If(IfSlot),
    Pair(Side),
    Fun,
    Fix,
    /// The `i`-th let-bound variable in scope, most recent first
    VarRef(usize),
    /// The `i`-th function argument in scope, most recent first
    ArgRef(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Action {
    Move(Move),
    Construct(Shape),
    Unwrap(usize),
}

/// The integer literals the editor can construct.
pub const INT_LITERALS: [i64; 5] = [-2, -1, 0, 1, 2];

impl Shape {
    /// Whether the shape replaces the focus outright.
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            Shape::Hole | Shape::Nil | Shape::Int(_) | Shape::Bool(_)
        )
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Shape::VarRef(_) | Shape::ArgRef(_))
    }
}

impl Action {
    /// The fixed (non-reference) actions, in tag order.
    pub fn base() -> Vec<Action> {
        let mut ret = vec![Action::Move(Move::Parent)];
        ret.extend((0..3).map(|n| Action::Move(Move::Child(n))));
        ret.push(Action::Construct(Shape::Hole));
        ret.push(Action::Construct(Shape::Nil));
        ret.extend(INT_LITERALS.map(|k| Action::Construct(Shape::Int(k))));
        ret.push(Action::Construct(Shape::Bool(true)));
        ret.push(Action::Construct(Shape::Bool(false)));
        ret.push(Action::Construct(Shape::UnOp(UnOp::Neg)));
        for op in BinOp::all() {
            for side in [Side::Left, Side::Right] {
                ret.push(Action::Construct(Shape::BinOp(op, side)));
            }
        }
        ret.push(Action::Construct(Shape::Let(LetSlot::Def)));
        ret.push(Action::Construct(Shape::Let(LetSlot::Body)));
        ret.push(Action::Construct(Shape::If(IfSlot::Cond)));
        ret.push(Action::Construct(Shape::If(IfSlot::Then)));
        ret.push(Action::Construct(Shape::If(IfSlot::Else)));
        ret.push(Action::Construct(Shape::Pair(Side::Left)));
        ret.push(Action::Construct(Shape::Pair(Side::Right)));
        ret.push(Action::Construct(Shape::Fun));
        ret.push(Action::Construct(Shape::Fix));
        ret.extend((0..3).map(Action::Unwrap));
        ret
    }

    /// The number of fixed actions; reference tags start here.
    pub fn base_count() -> usize {
        Self::base().len()
    }

    /// The total number of action tags for a given variable bound.
    pub fn count(max_vars: usize) -> usize {
        Self::base_count() + 2 * max_vars
    }

    pub fn encode(&self, max_vars: usize) -> Option<usize> {
        let base = Self::base_count();
        match self {
            Action::Construct(Shape::VarRef(i)) => {
                (*i < max_vars).then_some(base + i)
            }
            Action::Construct(Shape::ArgRef(i)) => {
                (*i < max_vars).then_some(base + max_vars + i)
            }
            _ => Self::base().iter().position(|a| a == self),
        }
    }

    pub fn decode(tag: usize, max_vars: usize) -> Option<Action> {
        let base = Self::base();
        if tag < base.len() {
            return Some(base[tag]);
        }
        let i = tag - base.len();
        if i < max_vars {
            Some(Action::Construct(Shape::VarRef(i)))
        } else if i < 2 * max_vars {
            Some(Action::Construct(Shape::ArgRef(i - max_vars)))
        } else {
            None
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Shape::Hole => write!(f, "?"),
            Shape::Nil => write!(f, "[]"),
            Shape::Int(k) => write!(f, "{}", k),
            Shape::Bool(b) => write!(f, "{}", b),
            Shape::UnOp(op) => write!(f, "{}(·)", op),
            Shape::BinOp(op, Side::Left) => write!(f, "· {} ?", op),
            Shape::BinOp(op, Side::Right) => write!(f, "? {} ·", op),
            Shape::Let(LetSlot::Def) => write!(f, "let _ = · in ?"),
            Shape::Let(LetSlot::Body) => write!(f, "let _ = ? in ·"),
            Shape::If(IfSlot::Cond) => write!(f, "if · then ? else ?"),
            Shape::If(IfSlot::Then) => write!(f, "if ? then · else ?"),
            Shape::If(IfSlot::Else) => write!(f, "if ? then ? else ·"),
            Shape::Pair(Side::Left) => write!(f, "(·, ?)"),
            Shape::Pair(Side::Right) => write!(f, "(?, ·)"),
            Shape::Fun => write!(f, "fun _ -> ·"),
            Shape::Fix => write!(f, "fix _ -> ·"),
            Shape::VarRef(i) => write!(f, "variable #{}", i),
            Shape::ArgRef(i) => write!(f, "argument #{}", i),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Move(Move::Parent) => write!(f, "move to parent"),
            Action::Move(Move::Child(n)) => write!(f, "move to child {}", n),
            Action::Construct(shape) => write!(f, "construct {}", shape),
            Action::Unwrap(n) => write!(f, "unwrap to child {}", n),
        }
    }
}
