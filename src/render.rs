//! # Rendering
//!
//! Programs have no concrete syntax, so they are shown as trees: one line per
//! node, labelled with the node's linear index and the slot it fills in its
//! parent. The node under the cursor is highlighted.

use crate::core::*;
use crate::typ::Type;

use ansi_term::Color::*;

fn glyphs() -> termtree::GlyphPalette {
    let mut gp = termtree::GlyphPalette::new();
    gp.item_indent = "─";
    gp.skip_indent = " ";

    gp.middle_item = Fixed(8).paint(gp.middle_item).to_string().leak();
    gp.last_item = Fixed(8).paint(gp.last_item).to_string().leak();
    gp.item_indent = Fixed(8).paint(gp.item_indent).to_string().leak();
    gp.middle_skip = Fixed(8).paint(gp.middle_skip).to_string().leak();
    gp.last_skip = Fixed(8).paint(gp.last_skip).to_string().leak();
    gp.skip_indent = Fixed(8).paint(gp.skip_indent).to_string().leak();
    gp
}

struct Renderer {
    gp: termtree::GlyphPalette,
    cursor: usize,
    next: usize,
}

impl Renderer {
    fn leaf(&mut self, slot: &str, label: String) -> termtree::Tree<String> {
        let index = self.next;
        self.next += 1;
        let label = if index == self.cursor {
            format!(
                "{} {} {}",
                Yellow.bold().paint(format!("▶ {}", index)),
                Blue.paint(slot),
                Yellow.bold().paint(label)
            )
        } else {
            format!(
                "{} {} {}",
                Fixed(8).paint(index.to_string()),
                Blue.paint(slot),
                label
            )
        };
        termtree::Tree::new(label).with_glyphs(self.gp)
    }

    fn exp(&mut self, slot: &str, e: &Expr) -> termtree::Tree<String> {
        match e {
            Expr::Var(x) => self.leaf(slot, x.to_string()),
            Expr::Int(k) => self.leaf(slot, k.to_string()),
            Expr::Bool(b) => self.leaf(slot, b.to_string()),
            Expr::Nil => self.leaf(slot, "[]".to_owned()),
            Expr::Hole => self.leaf(slot, Purple.paint("?").to_string()),
            Expr::UnOp(op, e) => {
                let mut t =
                    self.leaf(slot, Green.paint(op.to_string()).to_string());
                t.push(self.exp("arg", e));
                t
            }
            Expr::BinOp(l, op, r) => {
                let mut t =
                    self.leaf(slot, Green.paint(op.to_string()).to_string());
                t.push(self.exp("left", l));
                t.push(self.exp("right", r));
                t
            }
            Expr::If(c, th, el) => {
                let mut t = self.leaf(slot, Green.paint("if").to_string());
                t.push(self.exp("cond", c));
                t.push(self.exp("then", th));
                t.push(self.exp("else", el));
                t
            }
            Expr::Let(x, def, body) => {
                let mut t = self.leaf(slot, Green.paint("let").to_string());
                t.push(self.leaf("var", x.to_string()));
                t.push(self.exp("def", def));
                t.push(self.exp("body", body));
                t
            }
            Expr::Fun(x, typ, body) | Expr::Fix(x, typ, body) => {
                let kw = match e {
                    Expr::Fun(..) => "fun",
                    _ => "fix",
                };
                let mut t = self.leaf(slot, Green.paint(kw).to_string());
                t.push(self.leaf("var", x.to_string()));
                t.push(self.typ("type", typ));
                t.push(self.exp("body", body));
                t
            }
            Expr::Pair(l, r) => {
                let mut t = self.leaf(slot, Green.paint("pair").to_string());
                t.push(self.exp("fst", l));
                t.push(self.exp("snd", r));
                t
            }
        }
    }

    fn typ(&mut self, slot: &str, typ: &Type) -> termtree::Tree<String> {
        let label = |s: &str| Cyan.paint(s.to_owned()).to_string();
        match typ {
            Type::Int => self.leaf(slot, label("int")),
            Type::Bool => self.leaf(slot, label("bool")),
            Type::Hole => self.leaf(slot, label("?")),
            Type::List(elem) => {
                let mut t = self.leaf(slot, label("list"));
                t.push(self.typ("elem", elem));
                t
            }
            Type::Prod(l, r) | Type::Arrow(l, r) => {
                let head = match typ {
                    Type::Prod(..) => "*",
                    _ => "->",
                };
                let mut t = self.leaf(slot, label(head));
                t.push(self.typ("left", l));
                t.push(self.typ("right", r));
                t
            }
        }
    }
}

/// A tree view of `e` with the node at linear index `cursor` highlighted.
pub fn tree(e: &Expr, cursor: usize) -> termtree::Tree<String> {
    let mut r = Renderer {
        gp: glyphs(),
        cursor,
        next: 0,
    };
    r.exp("root", e)
}
