//! # Bidirectional typing
//!
//! Synthesis computes a type bottom-up from an expression alone; analysis
//! checks an expression against an expected type, pushing that type inward
//! through functions, fixpoints, pairs, conditionals, and let-bodies. The two
//! are kept in exact agreement:
//!
//! `analyze(ctx, e, t)` holds iff `synthesize(ctx, e)` is some `s` with
//! `consistent(s, t)`.
//!
//! The legality rules of the action enumerator rely on that equivalence.

use crate::core::*;
use crate::typ::*;

use std::fmt;

////////////////////////////////////////////////////////////////////////////////
// Errors

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A synthesis or analysis failed where a type was assumed to exist
    Type,
    /// A variable was referenced outside of its scope
    Scope,
    /// A malformed program, table, or file
    Format,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: Vec<String>,
    pub message: String,
    _private: (),
}

impl Error {
    pub fn with_context(mut self, ctx: String) -> Self {
        self.context.push(ctx);
        self
    }

    pub fn new(kind: ErrorKind, message: String) -> Self {
        Self {
            kind,
            context: vec![],
            message,
            _private: (),
        }
    }

    pub fn ill_typed(e: &Expr) -> Self {
        Self::new(ErrorKind::Type, format!("ill-typed expression {:?}", e))
    }

    pub fn mismatch(expected: &str, got: &Type) -> Self {
        Self::new(
            ErrorKind::Type,
            format!("expected {} type, got '{}'", expected, got),
        )
    }

    pub fn inconsistent(t1: &Type, t2: &Type) -> Self {
        Self::new(
            ErrorKind::Type,
            format!("types '{}' and '{}' are inconsistent", t1, t2),
        )
    }

    pub fn unbound(x: Var) -> Self {
        Self::new(ErrorKind::Scope, format!("unbound variable '{}'", x))
    }

    pub fn format(message: String) -> Self {
        Self::new(ErrorKind::Format, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for ctx in &self.context {
            write!(f, "\n  in {}", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

////////////////////////////////////////////////////////////////////////////////
// Typing contexts

/// An ordered typing context.
///
/// Contexts are persistent, so extending one for a binder body leaves the
/// outer context untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Context(im::Vector<(Var, Type)>);

impl Context {
    pub fn new() -> Self {
        Self(im::Vector::new())
    }

    pub fn extend(&self, x: Var, t: Type) -> Self {
        let mut bindings = self.0.clone();
        bindings.push_back((x, t));
        Self(bindings)
    }

    /// The most recently pushed binding for `x`.
    pub fn lookup(&self, x: Var) -> Option<&Type> {
        self.0.iter().rev().find(|(y, _)| *y == x).map(|(_, t)| t)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &(Var, Type)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Synthesis and analysis

/// The synthesized type of `e`, or `None` if `e` is ill-typed.
pub fn synthesize(ctx: &Context, e: &Expr) -> Option<Type> {
    match e {
        Expr::Var(x) => ctx.lookup(*x).cloned(),
        Expr::Int(_) => Some(Type::Int),
        Expr::Bool(_) => Some(Type::Bool),
        Expr::Nil => Some(Type::list(Type::Hole)),
        Expr::Hole => Some(Type::Hole),
        Expr::UnOp(UnOp::Neg, e) => {
            analyze(ctx, e, &Type::Int).then_some(Type::Int)
        }
        Expr::BinOp(e1, op, e2) => match op.kind() {
            OpKind::Arith => (analyze(ctx, e1, &Type::Int)
                && analyze(ctx, e2, &Type::Int))
                .then_some(Type::Int),
            OpKind::Cmp => (analyze(ctx, e1, &Type::Int)
                && analyze(ctx, e2, &Type::Int))
                .then_some(Type::Bool),
            OpKind::Ap => match synthesize(ctx, e1)? {
                Type::Arrow(dom, cod) => {
                    analyze(ctx, e2, &dom).then_some(*cod)
                }
                Type::Hole => {
                    analyze(ctx, e2, &Type::Hole).then_some(Type::Hole)
                }
                _ => None,
            },
            OpKind::Cons => {
                let elem = synthesize(ctx, e2)?.elem()?;
                let head = synthesize(ctx, e1)?;
                Some(Type::list(common_type(&elem, &head)?))
            }
        },
        Expr::If(c, t, e) => {
            if !analyze(ctx, c, &Type::Bool) {
                return None;
            }
            common_type(&synthesize(ctx, t)?, &synthesize(ctx, e)?)
        }
        Expr::Let(x, def, body) => {
            let tx = synthesize(ctx, def)?;
            synthesize(&ctx.extend(*x, tx), body)
        }
        Expr::Fun(x, t, body) => {
            let tb = synthesize(&ctx.extend(*x, t.clone()), body)?;
            Some(Type::arrow(t.clone(), tb))
        }
        Expr::Fix(x, t, body) => {
            analyze(&ctx.extend(*x, t.clone()), body, t).then(|| t.clone())
        }
        Expr::Pair(e1, e2) => {
            Some(Type::prod(synthesize(ctx, e1)?, synthesize(ctx, e2)?))
        }
    }
}

/// Whether `e` checks against `target`.
pub fn analyze(ctx: &Context, e: &Expr, target: &Type) -> bool {
    match e {
        Expr::Fun(x, t, body) => match target.arrow_parts() {
            Some((dom, cod)) => {
                consistent(t, &dom)
                    && analyze(&ctx.extend(*x, t.clone()), body, &cod)
            }
            None => false,
        },
        Expr::Fix(x, t, body) => {
            consistent(t, target)
                && analyze(&ctx.extend(*x, t.clone()), body, t)
        }
        Expr::Pair(e1, e2) => match target.prod_parts() {
            Some((t1, t2)) => analyze(ctx, e1, &t1) && analyze(ctx, e2, &t2),
            None => false,
        },
        Expr::If(c, t, e) => {
            analyze(ctx, c, &Type::Bool)
                && analyze(ctx, t, target)
                && analyze(ctx, e, target)
                && branches_agree(ctx, t, e)
        }
        Expr::Let(x, def, body) => match synthesize(ctx, def) {
            Some(tx) => analyze(&ctx.extend(*x, tx), body, target),
            None => false,
        },
        _ => match synthesize(ctx, e) {
            Some(t) => consistent(&t, target),
            None => false,
        },
    }
}

fn branches_agree(ctx: &Context, t: &Expr, e: &Expr) -> bool {
    match (synthesize(ctx, t), synthesize(ctx, e)) {
        (Some(tt), Some(te)) => consistent(&tt, &te),
        _ => false,
    }
}

/// Synthesize, converting failure into a type error.
pub fn infer(ctx: &Context, e: &Expr) -> Result<Type, Error> {
    if let Expr::Var(x) = e {
        return ctx.lookup(*x).cloned().ok_or_else(|| Error::unbound(*x));
    }
    synthesize(ctx, e).ok_or_else(|| Error::ill_typed(e))
}
