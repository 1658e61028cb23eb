//! # Cursor contexts
//!
//! A snapshot bundles everything the action enumerator needs to know about
//! the cursor: the focused term, the scope, the type expected of the focus by
//! its surroundings, the type the focus actually has, and where the focus
//! sits in the flat encoding. Snapshots are recomputed from scratch on every
//! step by a single descent along the zipper path.

use crate::core::*;
use crate::typ::*;
use crate::typecheck::{infer, synthesize, Context, Error};
use crate::zipper::*;

/// The node directly above the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parent {
    /// Linear index of the parent node
    pub index: usize,
    /// Whether the parent belongs to the pinned starter scaffold
    pub starter: bool,
}

/// A function argument in scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub var: Var,
    /// Ordinal of the (curried) function that binds the argument
    pub function: usize,
    /// Position of the argument within that function
    pub position: usize,
}

/// The definition of a used let variable that encloses the cursor. Edits
/// below it must leave its synthesized type unchanged, since the variable's
/// uses were checked against that type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preserved {
    /// Context the definition is typed in
    pub ctx: Context,
    /// Frames from the root of the definition down to the cursor
    pub path: Vec<Frame>,
    pub typ: Type,
}

impl Preserved {
    /// Whether the definition keeps its type when the focus is replaced by
    /// `e`.
    pub fn keeps_type(&self, e: Expr) -> bool {
        let def = plug(&self.path, e);
        synthesize(&self.ctx, &def).is_some_and(|t| t == self.typ)
    }
}

fn plug(frames: &[Frame], e: Expr) -> Expr {
    frames.iter().rev().cloned().fold(e, |e, frame| frame.plug(e))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub term: Term,
    pub parent: Option<Parent>,
    /// Let-bound variables with the index of their binder node, most recent
    /// first
    pub vars_in_scope: Vec<(Var, usize)>,
    /// Function and fixpoint arguments, most recent first
    pub args_in_scope: Vec<Arg>,
    pub ctx: Context,
    pub expected_type: Type,
    pub actual_type: Type,
    /// Whether the cursor is inside the definition of a let whose variable
    /// is used in its body
    pub preserve_type: bool,
    /// The outermost such definition
    pub preserved: Option<Preserved>,
    pub cursor: usize,
    pub num_nodes: usize,
}

impl Snapshot {
    /// Compute the snapshot at the cursor of `z`.
    ///
    /// The first `pinned` nodes on the path from the root form the starter
    /// scaffold; the cursor may not move up into them.
    pub fn new(z: &Zipper, pinned: usize) -> Result<Self, Error> {
        build(z, pinned).map_err(|e| e.with_context("cursor context".into()))
    }

    pub fn focus_expr(&self) -> Option<&Expr> {
        match &self.term {
            Term::Exp(e) => Some(e),
            Term::Typ(_) => None,
        }
    }
}

fn build(z: &Zipper, pinned: usize) -> Result<Snapshot, Error> {
    let mut ctx = Context::new();
    let mut expected = Type::Hole;
    let mut index = 0;
    let mut parent = None;
    let mut lets = vec![];
    let mut args: Vec<Arg> = vec![];
    let mut functions = 0;
    let mut in_body = false;
    let mut preserve_from = None;

    for (depth, frame) in z.path().iter().enumerate() {
        let node = index;
        expected = match frame {
            Frame::UnOp(UnOp::Neg) => Type::Int,
            Frame::BinOpL(op, r) => match op.kind() {
                OpKind::Arith | OpKind::Cmp => Type::Int,
                OpKind::Ap => Type::arrow(infer(&ctx, r)?, expected),
                OpKind::Cons => {
                    let tail = infer(&ctx, r)?;
                    let elem = tail
                        .elem()
                        .ok_or_else(|| Error::mismatch("list", &tail))?;
                    let want = expected
                        .elem()
                        .ok_or_else(|| Error::mismatch("list", &expected))?;
                    common_type(&elem, &want)
                        .ok_or_else(|| Error::inconsistent(&elem, &want))?
                }
            },
            Frame::BinOpR(l, op) => match op.kind() {
                OpKind::Arith | OpKind::Cmp => Type::Int,
                OpKind::Ap => {
                    let tf = infer(&ctx, l)?;
                    tf.arrow_parts()
                        .ok_or_else(|| Error::mismatch("function", &tf))?
                        .0
                }
                OpKind::Cons => {
                    let list = Type::list(infer(&ctx, l)?);
                    common_type(&list, &expected)
                        .ok_or_else(|| Error::inconsistent(&list, &expected))?
                }
            },
            Frame::IfCond(..) => Type::Bool,
            Frame::IfThen(_, other) | Frame::IfElse(_, other) => {
                let t = infer(&ctx, other)?;
                common_type(&expected, &t)
                    .ok_or_else(|| Error::inconsistent(&expected, &t))?
            }
            Frame::LetDef(x, body) => {
                if preserve_from.is_none() && body.mentions(*x) {
                    preserve_from = Some((depth + 1, ctx.clone()));
                }
                Type::Hole
            }
            Frame::LetBody(x, def) => {
                let tx = infer(&ctx, def)?;
                ctx = ctx.extend(*x, tx);
                lets.push((*x, node + 1));
                expected
            }
            Frame::Body(binder, x, t) => {
                let (function, position) = match args.last() {
                    Some(last) if in_body => (last.function, last.position + 1),
                    _ => {
                        functions += 1;
                        (functions - 1, 0)
                    }
                };
                args.push(Arg {
                    var: *x,
                    function,
                    position,
                });
                ctx = ctx.extend(*x, t.clone());
                match binder {
                    Binder::Fun => {
                        expected
                            .arrow_parts()
                            .ok_or_else(|| {
                                Error::mismatch("function", &expected)
                            })?
                            .1
                    }
                    Binder::Fix => t.clone(),
                }
            }
            Frame::PairL(_) | Frame::PairR(_) => {
                let (t1, t2) = expected
                    .prod_parts()
                    .ok_or_else(|| Error::mismatch("product", &expected))?;
                if matches!(frame, Frame::PairL(_)) {
                    t1
                } else {
                    t2
                }
            }
        };
        in_body = matches!(frame, Frame::Body(..));
        parent = Some(Parent {
            index: node,
            starter: depth < pinned,
        });
        index = node + frame.offset();
    }

    let (term, actual_type, cursor) = match z.focus() {
        Focus::Exp(e) => (Term::Exp(e.clone()), infer(&ctx, e)?, index),
        Focus::Annot { typ, .. } => {
            let binder_node = index;
            parent = Some(Parent {
                index: binder_node,
                starter: z.path().len() < pinned,
            });
            let mut at = binder_node + 2;
            for frame in &typ.path {
                parent = Some(Parent {
                    index: at,
                    starter: false,
                });
                at += frame.offset();
            }
            expected = Type::Hole;
            (Term::Typ(typ.focus.clone()), Type::Hole, at)
        }
    };

    let preserved = match preserve_from {
        Some((start, ctx)) => {
            let path = z.path()[start..].to_vec();
            let typ = infer(&ctx, &plug(&path, z.node()))?;
            Some(Preserved { ctx, path, typ })
        }
        None => None,
    };

    lets.reverse();
    args.reverse();

    let snapshot = Snapshot {
        term,
        parent,
        vars_in_scope: lets,
        args_in_scope: args,
        ctx,
        expected_type: expected,
        actual_type,
        preserve_type: preserved.is_some(),
        preserved,
        cursor,
        num_nodes: z.size(),
    };

    log::debug!(
        "snapshot: cursor {} of {}, expected '{}', actual '{}'{}",
        snapshot.cursor,
        snapshot.num_nodes,
        snapshot.expected_type,
        snapshot.actual_type,
        if snapshot.preserve_type {
            " (type preserved)"
        } else {
            ""
        }
    );

    Ok(snapshot)
}
