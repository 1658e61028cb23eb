//! # Action application
//!
//! Applying an action is a structural rewrite of the zipper: moves re-plug or
//! push a frame, constructions replace or wrap the focus (filling every new
//! slot with a hole), and unwrapping promotes a child. Legality is the
//! enumerator's business; the applicator only refuses actions that make no
//! structural sense at the cursor.

use crate::action::*;
use crate::core::*;
use crate::pbn;
use crate::snapshot::Snapshot;
use crate::typ::Type;
use crate::typecheck::Error;
use crate::zipper::*;

/// The state of an editing session: the zippered program, the source of
/// fresh variables, and how many ancestors of the cursor are pinned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub zipper: Zipper,
    pub vars: VarAllocator,
    pub pinned: usize,
}

impl State {
    pub fn new(zipper: Zipper, vars: VarAllocator, pinned: usize) -> Self {
        Self {
            zipper,
            vars,
            pinned,
        }
    }

    pub fn snapshot(&self) -> Result<Snapshot, Error> {
        Snapshot::new(&self.zipper, self.pinned)
    }
}

impl pbn::Step for Action {
    type Exp = State;

    fn apply(&self, s: &State) -> Option<State> {
        let mut vars = s.vars.clone();
        let z = s.zipper.clone();
        let zipper = match self {
            Action::Move(Move::Parent) => match z.clone().up() {
                Some(up) => up,
                None => z,
            },
            Action::Move(Move::Child(n)) => z.down(*n)?,
            Action::Construct(shape) => construct(z, *shape, &mut vars)?,
            Action::Unwrap(n) => {
                let child = match z.focus() {
                    Focus::Exp(e) => e.child(*n)?.clone(),
                    Focus::Annot { .. } => return None,
                };
                z.replace(child)?
            }
        };
        log::debug!("applied '{}'", self);
        Some(State {
            zipper,
            vars,
            pinned: s.pinned,
        })
    }
}

fn construct(
    z: Zipper,
    shape: Shape,
    vars: &mut VarAllocator,
) -> Option<Zipper> {
    if z.in_annotation() {
        return None;
    }
    let (lets, args) = z.scope();
    match leaf(shape, &lets, &args) {
        Some(e) => z.replace(e),
        None => z.wrap(wrapper(shape, vars)?),
    }
}

/// The node a construction puts in place of the focus, if it builds a leaf.
/// `lets` and `args` are the variables in scope, most recent first.
pub fn leaf(shape: Shape, lets: &[Var], args: &[Var]) -> Option<Expr> {
    match shape {
        Shape::Hole => Some(Expr::Hole),
        Shape::Nil => Some(Expr::Nil),
        Shape::Int(k) => Some(Expr::Int(k)),
        Shape::Bool(b) => Some(Expr::Bool(b)),
        Shape::VarRef(i) => lets.get(i).map(|x| Expr::Var(*x)),
        Shape::ArgRef(i) => args.get(i).map(|x| Expr::Var(*x)),
        _ => None,
    }
}

/// The frame a construction wraps around the focus, if it wraps. New binders
/// take their variable from `vars`.
pub fn wrapper(shape: Shape, vars: &mut VarAllocator) -> Option<Frame> {
    let hole = || Expr::Hole;
    match shape {
        Shape::UnOp(op) => Some(Frame::UnOp(op)),
        Shape::BinOp(op, Side::Left) => Some(Frame::BinOpL(op, hole())),
        Shape::BinOp(op, Side::Right) => Some(Frame::BinOpR(hole(), op)),
        Shape::Let(slot) => {
            let x = vars.fresh()?;
            Some(match slot {
                LetSlot::Def => Frame::LetDef(x, hole()),
                LetSlot::Body => Frame::LetBody(x, hole()),
            })
        }
        Shape::If(IfSlot::Cond) => Some(Frame::IfCond(hole(), hole())),
        Shape::If(IfSlot::Then) => Some(Frame::IfThen(hole(), hole())),
        Shape::If(IfSlot::Else) => Some(Frame::IfElse(hole(), hole())),
        Shape::Pair(Side::Left) => Some(Frame::PairL(hole())),
        Shape::Pair(Side::Right) => Some(Frame::PairR(hole())),
        Shape::Fun => Some(Frame::Body(Binder::Fun, vars.fresh()?, Type::Hole)),
        Shape::Fix => Some(Frame::Body(Binder::Fix, vars.fresh()?, Type::Hole)),
        Shape::Hole
        | Shape::Nil
        | Shape::Int(_)
        | Shape::Bool(_)
        | Shape::VarRef(_)
        | Shape::ArgRef(_) => None,
    }
}
