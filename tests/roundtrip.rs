use holenav::core::*;
use holenav::flat::{self, Flat};
use holenav::typ::Type;
use holenav::typecheck::ErrorKind;
use holenav::zipper::Zipper;

fn samples() -> Vec<Expr> {
    vec![
        Expr::Hole,
        Expr::let_(Var(0), Expr::Int(1), Expr::Var(Var(0))),
        // let x0 = fix x1 : int -> int ->
        //   fun x2 : int -> if x2 < 1 then 0 else x2 + x1 (x2 - 1)
        // in (x0 2, [] :: -true)
        Expr::let_(
            Var(0),
            Expr::fix(
                Var(1),
                Type::arrow(Type::Int, Type::Int),
                Expr::fun(
                    Var(2),
                    Type::Int,
                    Expr::if_(
                        Expr::binop(Expr::Var(Var(2)), BinOp::Lt, Expr::Int(1)),
                        Expr::Int(0),
                        Expr::binop(
                            Expr::Var(Var(2)),
                            BinOp::Plus,
                            Expr::ap(
                                Expr::Var(Var(1)),
                                Expr::binop(
                                    Expr::Var(Var(2)),
                                    BinOp::Minus,
                                    Expr::Int(1),
                                ),
                            ),
                        ),
                    ),
                ),
            ),
            Expr::pair(
                Expr::ap(Expr::Var(Var(0)), Expr::Int(2)),
                Expr::binop(
                    Expr::Nil,
                    BinOp::Cons,
                    Expr::unop(UnOp::Neg, Expr::Bool(true)),
                ),
            ),
        ),
        Expr::fun(
            Var(3),
            Type::prod(Type::list(Type::Bool), Type::Hole),
            Expr::Hole,
        ),
    ]
}

fn binders(e: &Expr) -> usize {
    match e {
        Expr::Var(_)
        | Expr::Int(_)
        | Expr::Bool(_)
        | Expr::Nil
        | Expr::Hole => 0,
        Expr::UnOp(_, e) => binders(e),
        Expr::BinOp(l, _, r) | Expr::Pair(l, r) => binders(l) + binders(r),
        Expr::If(c, t, f) => binders(c) + binders(t) + binders(f),
        Expr::Let(_, def, body) => 1 + binders(def) + binders(body),
        Expr::Fun(_, _, body) | Expr::Fix(_, _, body) => 1 + binders(body),
    }
}

#[test]
fn every_visitable_index_round_trips() {
    for e in samples() {
        let mut skipped = 0;
        for index in 0..e.size() {
            match Zipper::at(e.clone(), index) {
                Some(z) => {
                    assert_eq!(z.cursor_index(), index, "{:?}", e);
                    assert_eq!(z.to_expr(), e);
                    assert_eq!(z.size(), e.size());
                }
                None => skipped += 1,
            }
        }
        assert_eq!(skipped, binders(&e), "{:?}", e);
        assert!(Zipper::at(e.clone(), e.size()).is_none());
    }
}

#[test]
fn moving_up_and_down_returns_to_the_same_place() {
    for e in samples() {
        for index in 0..e.size() {
            let z = match Zipper::at(e.clone(), index) {
                Some(z) => z,
                None => continue,
            };
            for n in 0..z.children().len() {
                let child = z.clone().down(n).unwrap();
                assert_eq!(child.clone().up().unwrap(), z);
                assert_eq!(child.to_expr(), e);
            }
        }
    }
}

#[test]
fn flat_tables_round_trip() {
    for e in samples() {
        let f = Flat::new(&e).unwrap();
        assert_eq!(f.nodes.len(), e.size());
        assert_eq!(f.edges.len(), e.size() - 1);
        assert_eq!(f.to_expr(0).unwrap(), e);
    }
}

#[test]
fn flat_tags() {
    // let x0 = fun x1 : int -> x1 in ?
    let e = Expr::let_(
        Var(0),
        Expr::fun(Var(1), Type::Int, Expr::Var(Var(1))),
        Expr::Hole,
    );
    let f = Flat::new(&e).unwrap();
    assert_eq!(
        f.nodes,
        vec![
            flat::TAG_LET,
            flat::VAR_BASE,
            flat::TAG_FUN,
            flat::VAR_BASE + 1,
            flat::TAG_TINT,
            flat::VAR_BASE + 1,
            flat::TAG_HOLE,
        ]
    );
    assert!(f.edges.contains(&[0, 1, 0]));
    assert!(f.edges.contains(&[0, 2, 1]));
    assert!(f.edges.contains(&[0, 6, 2]));
    assert!(f.edges.contains(&[2, 4, 1]));
    assert_eq!(flat::int_tag(-2), Some(0));
    assert_eq!(flat::int_tag(3), None);
}

#[test]
fn subtrees_are_read_from_their_own_root() {
    let e = Expr::let_(
        Var(0),
        Expr::binop(Expr::Int(1), BinOp::Times, Expr::Int(2)),
        Expr::Hole,
    );
    let f = Flat::new(&e).unwrap();
    assert_eq!(
        f.to_expr(2).unwrap(),
        Expr::binop(Expr::Int(1), BinOp::Times, Expr::Int(2))
    );
}

#[test]
fn malformed_tables_are_rejected() {
    let cyclic = Flat {
        nodes: vec![flat::TAG_NEG],
        edges: vec![[0, 0, 0]],
    };
    assert_eq!(cyclic.to_expr(0).unwrap_err().kind, ErrorKind::Format);

    let dangling = Flat {
        nodes: vec![flat::TAG_NEG],
        edges: vec![[0, 3, 0]],
    };
    assert!(dangling.to_expr(0).is_err());

    let missing_child = Flat {
        nodes: vec![flat::TAG_PAIR, flat::TAG_HOLE],
        edges: vec![[0, 1, 0]],
    };
    assert!(missing_child.to_expr(0).is_err());

    let unknown_tag = Flat {
        nodes: vec![-7],
        edges: vec![],
    };
    assert!(unknown_tag.to_expr(0).is_err());

    let extreme_var = Flat {
        nodes: vec![flat::TAG_LET, i32::MIN, flat::TAG_HOLE, flat::TAG_HOLE],
        edges: vec![[0, 1, 0], [0, 2, 1], [0, 3, 2]],
    };
    let err = extreme_var.to_expr(0).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Format);

    let duplicate_slot = Flat {
        nodes: vec![flat::TAG_NEG, flat::TAG_HOLE, flat::TAG_TRUE],
        edges: vec![[0, 1, 0], [0, 2, 0]],
    };
    let err = duplicate_slot.to_expr(0).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Format);

    assert!(Flat::new(&Expr::Int(100)).is_err());
}
