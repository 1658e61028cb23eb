//! # Legal action enumeration
//!
//! Given a snapshot of the cursor, the enumerator computes the set of actions
//! that keep the program well-typed, keep every variable in scope, and keep
//! the program within the node budget. Applying any of them to a well-typed
//! program yields a well-typed program.
//!
//! A construction is legal when the node it builds synthesizes a type
//! consistent with the expected type. When the focus sits in the definition
//! of a variable that is already in use, the definition must also keep the
//! exact type it synthesizes now.

use crate::action::*;
use crate::apply::{self, State};
use crate::core::*;
use crate::pbn;
use crate::snapshot::Snapshot;
use crate::typ::*;
use crate::typecheck::{synthesize, Error};
use crate::zipper::*;

use indexmap::IndexSet;

////////////////////////////////////////////////////////////////////////////////
// Budgets

/// What the program may still grow by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    /// Nodes left before the maximum tree size is reached
    pub nodes: usize,
    /// Whether a fresh variable can still be minted
    pub fresh_var: bool,
}

impl Budget {
    pub fn new(snap: &Snapshot, max_nodes: usize, vars: &VarAllocator) -> Self {
        Self {
            nodes: max_nodes.saturating_sub(snap.num_nodes),
            fresh_var: vars.available(),
        }
    }

    fn allows(&self, action: &Action) -> bool {
        cost(action) <= self.nodes
    }
}

/// The node budget an action requires.
///
/// This is how many nodes the action adds at most (atoms and references never
/// grow the tree), except that unwrapping is only offered with room to spare.
pub fn cost(action: &Action) -> usize {
    match action {
        Action::Move(_) => 0,
        Action::Construct(shape) => match shape {
            Shape::Hole
            | Shape::Nil
            | Shape::Int(_)
            | Shape::Bool(_)
            | Shape::VarRef(_)
            | Shape::ArgRef(_) => 0,
            Shape::UnOp(_) => 1,
            Shape::BinOp(..) | Shape::Pair(_) => 2,
            Shape::Let(_) | Shape::If(_) | Shape::Fun | Shape::Fix => 3,
        },
        Action::Unwrap(_) => 3,
    }
}

////////////////////////////////////////////////////////////////////////////////
// Enumeration

pub struct Enumerator {
    pub max_nodes: usize,
}

impl Enumerator {
    pub fn new(max_nodes: usize) -> Self {
        Self { max_nodes }
    }

    /// The legal actions at the cursor, in tag order.
    pub fn legal(
        &self,
        snap: &Snapshot,
        vars: &VarAllocator,
    ) -> IndexSet<Action> {
        let budget = Budget::new(snap, self.max_nodes, vars);

        let references = (0..snap.vars_in_scope.len())
            .map(|i| Action::Construct(Shape::VarRef(i)))
            .chain(
                (0..snap.args_in_scope.len())
                    .map(|i| Action::Construct(Shape::ArgRef(i))),
            );

        let ret: IndexSet<Action> = Action::base()
            .into_iter()
            .chain(references)
            .filter(|a| {
                budget.allows(a) && admissible(snap, &budget, vars, a)
            })
            .collect();

        log::debug!(
            "{} legal actions at cursor {}: {}",
            ret.len(),
            snap.cursor,
            ret.iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        ret
    }
}

fn admissible(
    snap: &Snapshot,
    budget: &Budget,
    vars: &VarAllocator,
    action: &Action,
) -> bool {
    let typed = match action {
        Action::Move(m) => return movable(snap, *m),
        // Annotations are not editable yet, so new binders are withheld
        Action::Construct(Shape::Fun | Shape::Fix) => return false,
        Action::Construct(_) => constructed_type(snap, budget, action),
        Action::Unwrap(n) => unwrapped_type(snap, *n),
    };
    typed.is_some_and(|t| consistent(&t, &snap.expected_type))
        && match &snap.preserved {
            None => true,
            Some(p) => replacement(snap, vars, action)
                .is_some_and(|e| p.keeps_type(e)),
        }
}

/// The expression an action leaves in place of the focus.
fn replacement(
    snap: &Snapshot,
    vars: &VarAllocator,
    action: &Action,
) -> Option<Expr> {
    let e = snap.focus_expr()?;
    match action {
        Action::Move(_) => None,
        Action::Unwrap(n) => e.child(*n).cloned(),
        Action::Construct(shape) => {
            let lets: Vec<Var> =
                snap.vars_in_scope.iter().map(|(x, _)| *x).collect();
            let args: Vec<Var> =
                snap.args_in_scope.iter().map(|a| a.var).collect();
            match apply::leaf(*shape, &lets, &args) {
                Some(leaf) => Some(leaf),
                None => {
                    let frame = apply::wrapper(*shape, &mut vars.clone())?;
                    Some(frame.plug(e.clone()))
                }
            }
        }
    }
}

fn movable(snap: &Snapshot, m: Move) -> bool {
    match m {
        Move::Parent => snap.parent.as_ref().is_some_and(|p| !p.starter),
        Move::Child(n) => match &snap.term {
            Term::Typ(t) => n < typ_children(t).len(),
            Term::Exp(Expr::Let(_, def, _)) => {
                n == 0
                    || (n == 1
                        && synthesize(&snap.ctx, def)
                            .is_some_and(|t| t != Type::Hole))
            }
            Term::Exp(e) => n < exp_children(e).len(),
        },
    }
}

/// The type of the node built by a construction, if it synthesizes.
fn constructed_type(
    snap: &Snapshot,
    budget: &Budget,
    action: &Action,
) -> Option<Type> {
    let shape = match action {
        Action::Construct(shape) => shape,
        _ => return None,
    };
    if snap.focus_expr().is_none() {
        return None;
    }
    let actual = &snap.actual_type;
    match shape {
        Shape::Hole => Some(Type::Hole),
        Shape::Nil => Some(Type::list(Type::Hole)),
        Shape::Int(_) => Some(Type::Int),
        Shape::Bool(_) => Some(Type::Bool),
        Shape::UnOp(UnOp::Neg) => {
            consistent(actual, &Type::Int).then_some(Type::Int)
        }
        Shape::BinOp(op, side) => match (op.kind(), side) {
            (OpKind::Arith, _) => {
                consistent(actual, &Type::Int).then_some(Type::Int)
            }
            (OpKind::Cmp, _) => {
                consistent(actual, &Type::Int).then_some(Type::Bool)
            }
            (OpKind::Ap, Side::Left) => actual.arrow_parts().map(|(_, r)| r),
            (OpKind::Ap, Side::Right) => Some(Type::Hole),
            (OpKind::Cons, Side::Left) => Some(Type::list(actual.clone())),
            (OpKind::Cons, Side::Right) => actual.elem().map(Type::list),
        },
        Shape::Let(slot) => {
            if !budget.fresh_var {
                return None;
            }
            match slot {
                LetSlot::Def => Some(Type::Hole),
                LetSlot::Body => Some(actual.clone()),
            }
        }
        Shape::If(IfSlot::Cond) => {
            consistent(actual, &Type::Bool).then_some(Type::Hole)
        }
        Shape::If(IfSlot::Then | IfSlot::Else) => Some(actual.clone()),
        Shape::Pair(Side::Left) => Some(Type::prod(actual.clone(), Type::Hole)),
        Shape::Pair(Side::Right) => {
            Some(Type::prod(Type::Hole, actual.clone()))
        }
        Shape::Fun => budget
            .fresh_var
            .then(|| Type::arrow(Type::Hole, actual.clone())),
        Shape::Fix => budget.fresh_var.then_some(Type::Hole),
        Shape::VarRef(i) => {
            let (x, _) = snap.vars_in_scope.get(*i)?;
            snap.ctx.lookup(*x).cloned()
        }
        Shape::ArgRef(i) => {
            let arg = snap.args_in_scope.get(*i)?;
            snap.ctx.lookup(arg.var).cloned()
        }
    }
}

/// The type of the `n`-th child of the focus if it were promoted, or `None`
/// if promoting it would leave one of its variables unbound.
fn unwrapped_type(snap: &Snapshot, n: usize) -> Option<Type> {
    let e = snap.focus_expr()?;
    let child = e.child(n)?;
    match e.binds(n) {
        None => synthesize(&snap.ctx, child),
        Some((x, _)) if child.mentions(x) => None,
        Some((x, annotation)) => {
            let tx = match annotation {
                Some(t) => t.clone(),
                None => match e {
                    Expr::Let(_, def, _) => synthesize(&snap.ctx, def)?,
                    _ => return None,
                },
            };
            synthesize(&snap.ctx.extend(x, tx), child)
        }
    }
}

impl pbn::StepProvider for Enumerator {
    type Step = Action;

    fn provide(&mut self, s: &State) -> Result<Vec<Action>, Error> {
        let snap = s.snapshot()?;
        Ok(self.legal(&snap, &s.vars).into_iter().collect())
    }
}
