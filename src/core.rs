//! # Core syntax
//!
//! This module defines the expression language that the editor manipulates:
//! constants, holes, unary and binary operators, conditionals, let-binding,
//! functions, fixpoints, and pairs. Expressions are immutable values; every
//! edit produces a new expression.

use crate::typ::Type;
use crate::util;

use serde::{Deserialize, Serialize};
use std::fmt;

////////////////////////////////////////////////////////////////////////////////
// Variables

/// The type of variables.
///
/// Variables are small integers minted by a [`VarAllocator`]; no two binders
/// along a path from the root share an identifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Deserialize,
    Serialize,
)]
pub struct Var(pub usize);

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x{}", util::subscript_numbers(&self.0.to_string()))
    }
}

/// A source of fresh variables, bounded by the maximum number of variables
/// the host encoding can represent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VarAllocator {
    next: usize,
    max: usize,
}

impl VarAllocator {
    pub fn new(max: usize) -> Self {
        Self { next: 0, max }
    }

    /// An allocator whose fresh variables do not clash with any variable in
    /// `e`.
    pub fn after(e: &Expr, max: usize) -> Self {
        Self {
            next: e.max_var().map_or(0, |x| x.0 + 1),
            max,
        }
    }

    pub fn available(&self) -> bool {
        self.next < self.max
    }

    pub fn fresh(&mut self) -> Option<Var> {
        if !self.available() {
            return None;
        }
        let x = Var(self.next);
        self.next += 1;
        Some(x)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Operators

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum UnOp {
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum BinOp {
    Plus,
    Minus,
    Times,
    Lt,
    Gt,
    Eq,
    Ne,
    Cons,
    Ap,
}

/// How a binary operator is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Int operands, Int result
    Arith,
    /// Int operands, Bool result
    Cmp,
    Cons,
    Ap,
}

impl BinOp {
    pub fn all() -> [BinOp; 9] {
        [
            BinOp::Plus,
            BinOp::Minus,
            BinOp::Times,
            BinOp::Lt,
            BinOp::Gt,
            BinOp::Eq,
            BinOp::Ne,
            BinOp::Cons,
            BinOp::Ap,
        ]
    }

    pub fn kind(&self) -> OpKind {
        match self {
            BinOp::Plus | BinOp::Minus | BinOp::Times => OpKind::Arith,
            BinOp::Lt | BinOp::Gt | BinOp::Eq | BinOp::Ne => OpKind::Cmp,
            BinOp::Cons => OpKind::Cons,
            BinOp::Ap => OpKind::Ap,
        }
    }
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnOp::Neg => write!(f, "-"),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            BinOp::Plus => "+",
            BinOp::Minus => "-",
            BinOp::Times => "*",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Eq => "=",
            BinOp::Ne => "<>",
            BinOp::Cons => "::",
            BinOp::Ap => "ap",
        };
        write!(f, "{}", s)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Expressions

/// The type of expressions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Expr {
    Var(Var),
    Int(i64),
    Bool(bool),
    Nil,
    Hole,
    UnOp(UnOp, Box<Expr>),
    BinOp(Box<Expr>, BinOp, Box<Expr>),
    If(Box<Expr>, Box<Expr>, Box<Expr>),
    Let(Var, Box<Expr>, Box<Expr>),
    Fun(Var, Type, Box<Expr>),
    Fix(Var, Type, Box<Expr>),
    Pair(Box<Expr>, Box<Expr>),
}

/// The two kinds of annotated binders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binder {
    Fun,
    Fix,
}

impl Binder {
    pub fn build(self, x: Var, t: Type, body: Expr) -> Expr {
        match self {
            Binder::Fun => Expr::Fun(x, t, Box::new(body)),
            Binder::Fix => Expr::Fix(x, t, Box::new(body)),
        }
    }
}

impl Expr {
    pub fn unop(op: UnOp, e: Expr) -> Self {
        Expr::UnOp(op, Box::new(e))
    }

    pub fn binop(e1: Expr, op: BinOp, e2: Expr) -> Self {
        Expr::BinOp(Box::new(e1), op, Box::new(e2))
    }

    pub fn ap(e1: Expr, e2: Expr) -> Self {
        Expr::binop(e1, BinOp::Ap, e2)
    }

    pub fn if_(c: Expr, t: Expr, e: Expr) -> Self {
        Expr::If(Box::new(c), Box::new(t), Box::new(e))
    }

    pub fn let_(x: Var, def: Expr, body: Expr) -> Self {
        Expr::Let(x, Box::new(def), Box::new(body))
    }

    pub fn fun(x: Var, t: Type, body: Expr) -> Self {
        Expr::Fun(x, t, Box::new(body))
    }

    pub fn fix(x: Var, t: Type, body: Expr) -> Self {
        Expr::Fix(x, t, Box::new(body))
    }

    pub fn pair(e1: Expr, e2: Expr) -> Self {
        Expr::Pair(Box::new(e1), Box::new(e2))
    }

    /// The number of nodes in the flat pre-order encoding of this expression.
    ///
    /// Binder variables and type annotations occupy nodes of their own.
    pub fn size(&self) -> usize {
        match self {
            Expr::Var(_)
            | Expr::Int(_)
            | Expr::Bool(_)
            | Expr::Nil
            | Expr::Hole => 1,
            Expr::UnOp(_, e) => 1 + e.size(),
            Expr::BinOp(e1, _, e2) | Expr::Pair(e1, e2) => {
                1 + e1.size() + e2.size()
            }
            Expr::If(c, t, e) => 1 + c.size() + t.size() + e.size(),
            Expr::Let(_, def, body) => 2 + def.size() + body.size(),
            Expr::Fun(_, t, body) | Expr::Fix(_, t, body) => {
                2 + t.size() + body.size()
            }
        }
    }

    /// The `n`-th child expression, numbered as the cursor numbers children
    /// (child 0 of a `fun`/`fix` is its annotation, which is not an
    /// expression).
    pub fn child(&self, n: usize) -> Option<&Expr> {
        let child: &Expr = match (self, n) {
            (Expr::UnOp(_, e), 0) => e,
            (Expr::BinOp(l, _, _), 0) | (Expr::Pair(l, _), 0) => l,
            (Expr::BinOp(_, _, r), 1) | (Expr::Pair(_, r), 1) => r,
            (Expr::If(c, _, _), 0) => c,
            (Expr::If(_, t, _), 1) => t,
            (Expr::If(_, _, f), 2) => f,
            (Expr::Let(_, def, _), 0) => def,
            (Expr::Let(_, _, body), 1)
            | (Expr::Fun(_, _, body), 1)
            | (Expr::Fix(_, _, body), 1) => body,
            _ => return None,
        };
        Some(child)
    }

    /// The variable bound by this node for its `n`-th child, if any.
    pub fn binds(&self, n: usize) -> Option<(Var, Option<&Type>)> {
        match (self, n) {
            (Expr::Let(x, _, _), 1) => Some((*x, None)),
            (Expr::Fun(x, t, _), 1) | (Expr::Fix(x, t, _), 1) => {
                Some((*x, Some(t)))
            }
            _ => None,
        }
    }

    /// Whether `x` is referenced anywhere in this expression.
    ///
    /// Identifiers are never shadowed, so any occurrence is a free
    /// occurrence relative to the binder of `x`.
    pub fn mentions(&self, x: Var) -> bool {
        match self {
            Expr::Var(y) => *y == x,
            Expr::Int(_) | Expr::Bool(_) | Expr::Nil | Expr::Hole => false,
            Expr::UnOp(_, e) => e.mentions(x),
            Expr::BinOp(e1, _, e2) | Expr::Pair(e1, e2) => {
                e1.mentions(x) || e2.mentions(x)
            }
            Expr::If(c, t, e) => {
                c.mentions(x) || t.mentions(x) || e.mentions(x)
            }
            Expr::Let(_, def, body) => def.mentions(x) || body.mentions(x),
            Expr::Fun(_, _, body) | Expr::Fix(_, _, body) => body.mentions(x),
        }
    }

    /// The largest variable bound or referenced in this expression.
    pub fn max_var(&self) -> Option<Var> {
        match self {
            Expr::Var(y) => Some(*y),
            Expr::Int(_) | Expr::Bool(_) | Expr::Nil | Expr::Hole => None,
            Expr::UnOp(_, e) => e.max_var(),
            Expr::BinOp(e1, _, e2) | Expr::Pair(e1, e2) => {
                e1.max_var().max(e2.max_var())
            }
            Expr::If(c, t, e) => c.max_var().max(t.max_var()).max(e.max_var()),
            Expr::Let(x, def, body) => {
                Some(*x).max(def.max_var()).max(body.max_var())
            }
            Expr::Fun(x, _, body) | Expr::Fix(x, _, body) => {
                Some(*x).max(body.max_var())
            }
        }
    }
}
