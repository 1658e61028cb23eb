//! # Zippers
//!
//! A zipper is an expression with exactly one cursor. It is represented as a
//! path of frames from the root down to the focus; each frame owns the
//! siblings that were not traversed, so plugging the focus back into every
//! frame (innermost first) reassembles the ordinary expression.
//!
//! The cursor may also sit inside the type annotation of a `fun` or `fix`
//! node, in which case the focus carries a zipper over that type.
//!
//! Every node has a linear index: its position in the pre-order flat
//! encoding of the whole tree (see [`crate::flat`]). Binder variables and
//! type annotations are nodes too, so the index of the cursor is the sum of
//! the offsets of every frame on the path.

use crate::core::*;
use crate::typ::Type;

////////////////////////////////////////////////////////////////////////////////
// Frames

/// An expression with a hole where the focus was, one level deep.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Frame {
    UnOp(UnOp),
    /// Focus is the left operand; holds the right operand
    BinOpL(BinOp, Expr),
    /// Focus is the right operand; holds the left operand
    BinOpR(Expr, BinOp),
    /// Holds the branches
    IfCond(Expr, Expr),
    /// Holds the condition and the else branch
    IfThen(Expr, Expr),
    /// Holds the condition and the then branch
    IfElse(Expr, Expr),
    /// Holds the body
    LetDef(Var, Expr),
    /// Holds the definition
    LetBody(Var, Expr),
    /// Focus is the body of a function or fixpoint
    Body(Binder, Var, Type),
    PairL(Expr),
    PairR(Expr),
}

impl Frame {
    pub fn plug(self, e: Expr) -> Expr {
        match self {
            Frame::UnOp(op) => Expr::unop(op, e),
            Frame::BinOpL(op, r) => Expr::binop(e, op, r),
            Frame::BinOpR(l, op) => Expr::binop(l, op, e),
            Frame::IfCond(t, f) => Expr::if_(e, t, f),
            Frame::IfThen(c, f) => Expr::if_(c, e, f),
            Frame::IfElse(c, t) => Expr::if_(c, t, e),
            Frame::LetDef(x, body) => Expr::let_(x, e, body),
            Frame::LetBody(x, def) => Expr::let_(x, def, e),
            Frame::Body(b, x, t) => b.build(x, t, e),
            Frame::PairL(r) => Expr::pair(e, r),
            Frame::PairR(l) => Expr::pair(l, e),
        }
    }

    /// The linear index of the focus relative to the frame's own node.
    pub fn offset(&self) -> usize {
        match self {
            Frame::UnOp(_)
            | Frame::BinOpL(..)
            | Frame::IfCond(..)
            | Frame::PairL(_) => 1,
            Frame::BinOpR(l, _) | Frame::PairR(l) => 1 + l.size(),
            Frame::IfThen(c, _) => 1 + c.size(),
            Frame::IfElse(c, t) => 1 + c.size() + t.size(),
            Frame::LetDef(..) => 2,
            Frame::LetBody(_, def) => 2 + def.size(),
            Frame::Body(_, _, t) => 2 + t.size(),
        }
    }
}

/// A type with a hole where the focus was, one level deep.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypFrame {
    List,
    ProdL(Type),
    ProdR(Type),
    ArrowL(Type),
    ArrowR(Type),
}

impl TypFrame {
    pub fn plug(self, t: Type) -> Type {
        match self {
            TypFrame::List => Type::list(t),
            TypFrame::ProdL(r) => Type::prod(t, r),
            TypFrame::ProdR(l) => Type::prod(l, t),
            TypFrame::ArrowL(r) => Type::arrow(t, r),
            TypFrame::ArrowR(l) => Type::arrow(l, t),
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            TypFrame::List | TypFrame::ProdL(_) | TypFrame::ArrowL(_) => 1,
            TypFrame::ProdR(l) | TypFrame::ArrowR(l) => 1 + l.size(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Type zippers

/// A type annotation with a cursor in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypZipper {
    pub path: Vec<TypFrame>,
    pub focus: Type,
}

impl TypZipper {
    pub fn new(t: Type) -> Self {
        Self {
            path: vec![],
            focus: t,
        }
    }

    /// The annotation with its cursor removed.
    pub fn strip(&self) -> Type {
        self.path
            .iter()
            .rev()
            .cloned()
            .fold(self.focus.clone(), |t, frame| frame.plug(t))
    }

    pub fn offset(&self) -> usize {
        self.path.iter().map(TypFrame::offset).sum()
    }

    fn down(mut self, n: usize) -> Option<Self> {
        let (frame, child) = match (self.focus, n) {
            (Type::List(t), 0) => (TypFrame::List, *t),
            (Type::Prod(l, r), 0) => (TypFrame::ProdL(*r), *l),
            (Type::Prod(l, r), 1) => (TypFrame::ProdR(*l), *r),
            (Type::Arrow(l, r), 0) => (TypFrame::ArrowL(*r), *l),
            (Type::Arrow(l, r), 1) => (TypFrame::ArrowR(*l), *r),
            _ => return None,
        };
        self.path.push(frame);
        self.focus = child;
        Some(self)
    }
}

/// The number of children the cursor can move into, with their offsets and
/// sizes relative to the node.
pub fn typ_children(t: &Type) -> Vec<(usize, usize)> {
    match t {
        Type::Int | Type::Bool | Type::Hole => vec![],
        Type::List(t) => vec![(1, t.size())],
        Type::Prod(l, r) | Type::Arrow(l, r) => {
            vec![(1, l.size()), (1 + l.size(), r.size())]
        }
    }
}

/// The movable children of an expression node, with their offsets and sizes
/// relative to the node. Child 0 of a `fun`/`fix` is its annotation.
pub fn exp_children(e: &Expr) -> Vec<(usize, usize)> {
    match e {
        Expr::Var(_)
        | Expr::Int(_)
        | Expr::Bool(_)
        | Expr::Nil
        | Expr::Hole => vec![],
        Expr::UnOp(_, e) => vec![(1, e.size())],
        Expr::BinOp(l, _, r) | Expr::Pair(l, r) => {
            vec![(1, l.size()), (1 + l.size(), r.size())]
        }
        Expr::If(c, t, f) => vec![
            (1, c.size()),
            (1 + c.size(), t.size()),
            (1 + c.size() + t.size(), f.size()),
        ],
        Expr::Let(_, def, body) => {
            vec![(2, def.size()), (2 + def.size(), body.size())]
        }
        Expr::Fun(_, t, body) | Expr::Fix(_, t, body) => {
            vec![(2, t.size()), (2 + t.size(), body.size())]
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Expression zippers

/// What the cursor designates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Focus {
    Exp(Expr),
    /// The cursor is inside the annotation of a `fun` or `fix` node
    Annot {
        binder: Binder,
        var: Var,
        body: Expr,
        typ: TypZipper,
    },
}

/// The focused term: an expression or a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Exp(Expr),
    Typ(Type),
}

/// An expression with a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Zipper {
    path: Vec<Frame>,
    focus: Focus,
}

impl Zipper {
    /// A zipper focused on the root of `e`.
    pub fn new(e: Expr) -> Self {
        Self {
            path: vec![],
            focus: Focus::Exp(e),
        }
    }

    /// A zipper focused on the node with linear index `index` in `e`.
    ///
    /// Returns `None` if the index is out of range or designates a binder
    /// variable, which the cursor cannot visit.
    pub fn at(e: Expr, index: usize) -> Option<Self> {
        let mut z = Self::new(e);
        let mut rel = index;
        while rel > 0 {
            let (n, offset) = z
                .children()
                .into_iter()
                .enumerate()
                .find(|(_, (offset, size))| {
                    *offset <= rel && rel < offset + size
                })
                .map(|(n, (offset, _))| (n, offset))?;
            z = z.down(n)?;
            rel -= offset;
        }
        Some(z)
    }

    pub fn path(&self) -> &[Frame] {
        &self.path
    }

    pub fn focus(&self) -> &Focus {
        &self.focus
    }

    /// The focused term.
    pub fn term(&self) -> Term {
        match &self.focus {
            Focus::Exp(e) => Term::Exp(e.clone()),
            Focus::Annot { typ, .. } => Term::Typ(typ.focus.clone()),
        }
    }

    /// The movable children of the focused node.
    pub fn children(&self) -> Vec<(usize, usize)> {
        match &self.focus {
            Focus::Exp(e) => exp_children(e),
            Focus::Annot { typ, .. } => typ_children(&typ.focus),
        }
    }

    /// The expression node the cursor is in: the focus itself, or the binder
    /// whose annotation holds the cursor.
    pub fn node(&self) -> Expr {
        match &self.focus {
            Focus::Exp(e) => e.clone(),
            Focus::Annot {
                binder,
                var,
                body,
                typ,
            } => binder.build(*var, typ.strip(), body.clone()),
        }
    }

    /// The expression with its cursor removed.
    pub fn to_expr(&self) -> Expr {
        self.path
            .iter()
            .rev()
            .cloned()
            .fold(self.node(), |e, frame| frame.plug(e))
    }

    /// The linear pre-order index of the cursor.
    pub fn cursor_index(&self) -> usize {
        let exp: usize = self.path.iter().map(Frame::offset).sum();
        match &self.focus {
            Focus::Exp(_) => exp,
            Focus::Annot { typ, .. } => exp + 2 + typ.offset(),
        }
    }

    /// The number of nodes in the whole tree.
    pub fn size(&self) -> usize {
        self.to_expr().size()
    }

    /// Whether the cursor is inside a type annotation.
    pub fn in_annotation(&self) -> bool {
        matches!(self.focus, Focus::Annot { .. })
    }

    /// The let-bound variables and function arguments in scope at the
    /// cursor, each most recent first.
    pub fn scope(&self) -> (Vec<Var>, Vec<Var>) {
        let mut lets = vec![];
        let mut args = vec![];
        for frame in self.path.iter().rev() {
            match frame {
                Frame::LetBody(x, _) => lets.push(*x),
                Frame::Body(_, x, _) => args.push(*x),
                _ => (),
            }
        }
        (lets, args)
    }

    /// Move the cursor to the parent node (`None` at the root).
    pub fn up(mut self) -> Option<Self> {
        match self.focus {
            Focus::Annot {
                binder,
                var,
                body,
                mut typ,
            } => match typ.path.pop() {
                Some(frame) => {
                    typ.focus = frame.plug(typ.focus);
                    self.focus = Focus::Annot {
                        binder,
                        var,
                        body,
                        typ,
                    };
                }
                None => {
                    self.focus =
                        Focus::Exp(binder.build(var, typ.focus, body));
                }
            },
            Focus::Exp(e) => {
                let frame = self.path.pop()?;
                self.focus = Focus::Exp(frame.plug(e));
            }
        }
        Some(self)
    }

    /// Move the cursor into the `n`-th movable child of the focused node.
    pub fn down(mut self, n: usize) -> Option<Self> {
        let e = match self.focus {
            Focus::Annot {
                binder,
                var,
                body,
                typ,
            } => {
                self.focus = Focus::Annot {
                    binder,
                    var,
                    body,
                    typ: typ.down(n)?,
                };
                return Some(self);
            }
            Focus::Exp(e) => e,
        };
        let (frame, child) = match (e, n) {
            (Expr::UnOp(op, e), 0) => (Frame::UnOp(op), *e),
            (Expr::BinOp(l, op, r), 0) => (Frame::BinOpL(op, *r), *l),
            (Expr::BinOp(l, op, r), 1) => (Frame::BinOpR(*l, op), *r),
            (Expr::If(c, t, f), 0) => (Frame::IfCond(*t, *f), *c),
            (Expr::If(c, t, f), 1) => (Frame::IfThen(*c, *f), *t),
            (Expr::If(c, t, f), 2) => (Frame::IfElse(*c, *t), *f),
            (Expr::Let(x, def, body), 0) => (Frame::LetDef(x, *body), *def),
            (Expr::Let(x, def, body), 1) => (Frame::LetBody(x, *def), *body),
            (Expr::Pair(l, r), 0) => (Frame::PairL(*r), *l),
            (Expr::Pair(l, r), 1) => (Frame::PairR(*l), *r),
            (Expr::Fun(x, t, body), 0) => {
                self.focus = annotation(Binder::Fun, x, t, *body);
                return Some(self);
            }
            (Expr::Fix(x, t, body), 0) => {
                self.focus = annotation(Binder::Fix, x, t, *body);
                return Some(self);
            }
            (Expr::Fun(x, t, body), 1) => {
                (Frame::Body(Binder::Fun, x, t), *body)
            }
            (Expr::Fix(x, t, body), 1) => {
                (Frame::Body(Binder::Fix, x, t), *body)
            }
            _ => return None,
        };
        self.path.push(frame);
        self.focus = Focus::Exp(child);
        Some(self)
    }

    /// Replace the focused expression (`None` inside an annotation).
    pub fn replace(mut self, e: Expr) -> Option<Self> {
        match self.focus {
            Focus::Exp(_) => {
                self.focus = Focus::Exp(e);
                Some(self)
            }
            Focus::Annot { .. } => None,
        }
    }

    /// Wrap the focused expression in `frame`, keeping the cursor on it.
    pub fn wrap(mut self, frame: Frame) -> Option<Self> {
        match self.focus {
            Focus::Exp(_) => {
                self.path.push(frame);
                Some(self)
            }
            Focus::Annot { .. } => None,
        }
    }
}

fn annotation(binder: Binder, var: Var, t: Type, body: Expr) -> Focus {
    Focus::Annot {
        binder,
        var,
        body,
        typ: TypZipper::new(t),
    }
}
