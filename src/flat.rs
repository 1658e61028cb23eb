//! # Flat encoding
//!
//! The host exchanges programs as two integer tables. The node table holds
//! one tag per node in pre-order, so a node's position in the table is its
//! linear index. The edge table holds `[parent, child, slot]` triples; slots
//! tell apart the children of a node (condition and branches, definition and
//! body, and so on). Binder variables and type annotations are nodes of their
//! own.

use crate::core::*;
use crate::typ::Type;
use crate::typecheck::Error;
use crate::util;

use serde::{Deserialize, Serialize};

////////////////////////////////////////////////////////////////////////////////
// Tags

pub const TAG_TRUE: i32 = 5;
pub const TAG_FALSE: i32 = 6;
pub const TAG_NIL: i32 = 7;
pub const TAG_HOLE: i32 = 8;
pub const TAG_NEG: i32 = 9;
const TAG_BINOP: i32 = 10;
pub const TAG_IF: i32 = 19;
pub const TAG_LET: i32 = 20;
pub const TAG_FUN: i32 = 21;
pub const TAG_FIX: i32 = 22;
pub const TAG_PAIR: i32 = 23;
pub const TAG_TINT: i32 = 24;
pub const TAG_TBOOL: i32 = 25;
pub const TAG_THOLE: i32 = 26;
pub const TAG_TLIST: i32 = 27;
pub const TAG_TPROD: i32 = 28;
pub const TAG_TARROW: i32 = 29;

/// Variable nodes (binders and references alike) are tagged
/// `VAR_BASE + id`.
pub const VAR_BASE: i32 = 30;

/// Integer literals occupy tags 0 through 4.
pub fn int_tag(k: i64) -> Option<i32> {
    (-2..=2).contains(&k).then(|| (k + 2) as i32)
}

pub fn binop_tag(op: BinOp) -> i32 {
    let pos = BinOp::all().iter().position(|o| *o == op).unwrap_or(0);
    TAG_BINOP + util::int(pos)
}

pub fn var_tag(x: Var) -> i32 {
    VAR_BASE + util::int(x.0)
}

////////////////////////////////////////////////////////////////////////////////
// Tables

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Flat {
    pub nodes: Vec<i32>,
    pub edges: Vec<[i32; 3]>,
}

impl Flat {
    /// Linearize `e`; its root is node 0.
    pub fn new(e: &Expr) -> Result<Self, Error> {
        let mut flat = Self {
            nodes: vec![],
            edges: vec![],
        };
        flat.exp(e)?;
        Ok(flat)
    }

    fn node(&mut self, tag: i32) -> i32 {
        self.nodes.push(tag);
        util::int(self.nodes.len() - 1)
    }

    fn edge(&mut self, parent: i32, child: i32, slot: i32) {
        self.edges.push([parent, child, slot]);
    }

    fn children(&mut self, me: i32, children: &[&Expr]) -> Result<(), Error> {
        for (slot, child) in children.iter().enumerate() {
            let c = self.exp(child)?;
            self.edge(me, c, util::int(slot));
        }
        Ok(())
    }

    fn exp(&mut self, e: &Expr) -> Result<i32, Error> {
        match e {
            Expr::Var(x) => Ok(self.node(var_tag(*x))),
            Expr::Int(k) => match int_tag(*k) {
                Some(tag) => Ok(self.node(tag)),
                None => Err(Error::format(format!(
                    "integer literal {} has no node tag",
                    k
                ))),
            },
            Expr::Bool(true) => Ok(self.node(TAG_TRUE)),
            Expr::Bool(false) => Ok(self.node(TAG_FALSE)),
            Expr::Nil => Ok(self.node(TAG_NIL)),
            Expr::Hole => Ok(self.node(TAG_HOLE)),
            Expr::UnOp(UnOp::Neg, e) => {
                let me = self.node(TAG_NEG);
                self.children(me, &[&**e])?;
                Ok(me)
            }
            Expr::BinOp(l, op, r) => {
                let me = self.node(binop_tag(*op));
                self.children(me, &[&**l, &**r])?;
                Ok(me)
            }
            Expr::If(c, t, f) => {
                let me = self.node(TAG_IF);
                self.children(me, &[&**c, &**t, &**f])?;
                Ok(me)
            }
            Expr::Let(x, def, body) => {
                let me = self.node(TAG_LET);
                let v = self.node(var_tag(*x));
                self.edge(me, v, 0);
                let d = self.exp(def)?;
                self.edge(me, d, 1);
                let b = self.exp(body)?;
                self.edge(me, b, 2);
                Ok(me)
            }
            Expr::Fun(x, t, body) | Expr::Fix(x, t, body) => {
                let tag = match e {
                    Expr::Fun(..) => TAG_FUN,
                    _ => TAG_FIX,
                };
                let me = self.node(tag);
                let v = self.node(var_tag(*x));
                self.edge(me, v, 0);
                let a = self.typ(t);
                self.edge(me, a, 1);
                let b = self.exp(body)?;
                self.edge(me, b, 2);
                Ok(me)
            }
            Expr::Pair(l, r) => {
                let me = self.node(TAG_PAIR);
                self.children(me, &[&**l, &**r])?;
                Ok(me)
            }
        }
    }

    fn typ(&mut self, t: &Type) -> i32 {
        match t {
            Type::Int => self.node(TAG_TINT),
            Type::Bool => self.node(TAG_TBOOL),
            Type::Hole => self.node(TAG_THOLE),
            Type::List(t) => {
                let me = self.node(TAG_TLIST);
                let c = self.typ(t);
                self.edge(me, c, 0);
                me
            }
            Type::Prod(l, r) | Type::Arrow(l, r) => {
                let tag = match t {
                    Type::Prod(..) => TAG_TPROD,
                    _ => TAG_TARROW,
                };
                let me = self.node(tag);
                let c = self.typ(l);
                self.edge(me, c, 0);
                let c = self.typ(r);
                self.edge(me, c, 1);
                me
            }
        }
    }

    /// Rebuild the expression rooted at node `root`.
    pub fn to_expr(&self, root: usize) -> Result<Expr, Error> {
        Reader::new(self)?
            .exp(root, 0)
            .map_err(|e| e.with_context("flat node table".into()))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Reading tables back

struct Reader<'a> {
    nodes: &'a [i32],
    /// The child of each node in each slot
    slots: Vec<[Option<usize>; 3]>,
}

impl<'a> Reader<'a> {
    fn new(flat: &'a Flat) -> Result<Self, Error> {
        let n = flat.nodes.len();
        let mut slots = vec![[None; 3]; n];
        for [p, c, slot] in &flat.edges {
            let (p, c, slot) = match (
                usize::try_from(*p),
                usize::try_from(*c),
                usize::try_from(*slot),
            ) {
                (Ok(p), Ok(c), Ok(slot)) if p < n && c < n && slot < 3 => {
                    (p, c, slot)
                }
                _ => {
                    return Err(Error::format(format!(
                        "malformed edge [{}, {}, {}]",
                        p, c, slot
                    )))
                }
            };
            if let Some(earlier) = slots[p][slot].replace(c) {
                return Err(Error::format(format!(
                    "node {} has children {} and {} in slot {}",
                    p, earlier, c, slot
                )));
            }
        }
        Ok(Self {
            nodes: &flat.nodes,
            slots,
        })
    }

    fn child(&self, i: usize, slot: usize) -> Result<usize, Error> {
        self.slots[i][slot].ok_or_else(|| {
            Error::format(format!("node {} has no child in slot {}", i, slot))
        })
    }

    fn tag(&self, i: usize, depth: usize) -> Result<i32, Error> {
        if depth > self.nodes.len() {
            return Err(Error::format("cyclic edge table".to_owned()));
        }
        self.nodes.get(i).copied().ok_or_else(|| {
            Error::format(format!("node index {} out of range", i))
        })
    }

    fn var(&self, i: usize) -> Result<Var, Error> {
        let tag = self.tag(i, 0)?;
        tag.checked_sub(VAR_BASE)
            .and_then(|k| usize::try_from(k).ok())
            .map(Var)
            .ok_or_else(|| {
                Error::format(format!("expected variable, got {}", tag))
            })
    }

    fn sub(
        &self,
        i: usize,
        slot: usize,
        depth: usize,
    ) -> Result<Box<Expr>, Error> {
        Ok(Box::new(self.exp(self.child(i, slot)?, depth + 1)?))
    }

    fn exp(&self, i: usize, depth: usize) -> Result<Expr, Error> {
        let tag = self.tag(i, depth)?;
        let e = match tag {
            0..=4 => Expr::Int(i64::from(tag) - 2),
            TAG_TRUE => Expr::Bool(true),
            TAG_FALSE => Expr::Bool(false),
            TAG_NIL => Expr::Nil,
            TAG_HOLE => Expr::Hole,
            TAG_NEG => Expr::UnOp(UnOp::Neg, self.sub(i, 0, depth)?),
            10..=18 => {
                let op = BinOp::all()[(tag - TAG_BINOP) as usize];
                let l = self.sub(i, 0, depth)?;
                Expr::BinOp(l, op, self.sub(i, 1, depth)?)
            }
            TAG_IF => Expr::If(
                self.sub(i, 0, depth)?,
                self.sub(i, 1, depth)?,
                self.sub(i, 2, depth)?,
            ),
            TAG_LET => Expr::Let(
                self.var(self.child(i, 0)?)?,
                self.sub(i, 1, depth)?,
                self.sub(i, 2, depth)?,
            ),
            TAG_FUN | TAG_FIX => {
                let x = self.var(self.child(i, 0)?)?;
                let t = self.typ(self.child(i, 1)?, depth + 1)?;
                let body = self.sub(i, 2, depth)?;
                if tag == TAG_FUN {
                    Expr::Fun(x, t, body)
                } else {
                    Expr::Fix(x, t, body)
                }
            }
            TAG_PAIR => {
                Expr::Pair(self.sub(i, 0, depth)?, self.sub(i, 1, depth)?)
            }
            _ if tag >= VAR_BASE => Expr::Var(self.var(i)?),
            _ => {
                return Err(Error::format(format!(
                    "node {} has non-expression tag {}",
                    i, tag
                )))
            }
        };
        Ok(e)
    }

    fn typ(&self, i: usize, depth: usize) -> Result<Type, Error> {
        let tag = self.tag(i, depth)?;
        let t = match tag {
            TAG_TINT => Type::Int,
            TAG_TBOOL => Type::Bool,
            TAG_THOLE => Type::Hole,
            TAG_TLIST => Type::list(self.typ(self.child(i, 0)?, depth + 1)?),
            TAG_TPROD | TAG_TARROW => {
                let l = self.typ(self.child(i, 0)?, depth + 1)?;
                let r = self.typ(self.child(i, 1)?, depth + 1)?;
                if tag == TAG_TPROD {
                    Type::prod(l, r)
                } else {
                    Type::arrow(l, r)
                }
            }
            _ => {
                return Err(Error::format(format!(
                    "node {} has non-type tag {}",
                    i, tag
                )))
            }
        };
        Ok(t)
    }
}
