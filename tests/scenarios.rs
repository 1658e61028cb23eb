use holenav::action::*;
use holenav::core::*;
use holenav::enumerate::Enumerator;
use holenav::snapshot::Snapshot;
use holenav::typ::Type;
use holenav::zipper::Zipper;

fn snapshot(e: Expr, cursor: usize) -> Snapshot {
    let z = Zipper::at(e, cursor).unwrap();
    Snapshot::new(&z, 0).unwrap()
}

fn legal(snap: &Snapshot, max_nodes: usize) -> Vec<Action> {
    Enumerator::new(max_nodes)
        .legal(snap, &VarAllocator::new(10))
        .into_iter()
        .collect()
}

fn construct(shape: Shape) -> Action {
    Action::Construct(shape)
}

#[test]
fn bare_hole_offers_only_atoms() {
    let snap = snapshot(Expr::Hole, 0);
    assert_eq!(snap.expected_type, Type::Hole);
    assert_eq!(snap.parent, None);

    let mut expected = vec![construct(Shape::Hole), construct(Shape::Nil)];
    expected.extend(INT_LITERALS.map(|k| construct(Shape::Int(k))));
    expected.push(construct(Shape::Bool(true)));
    expected.push(construct(Shape::Bool(false)));

    assert_eq!(legal(&snap, 1), expected);
}

#[test]
fn boolean_under_negation_offers_nothing_integer_shaped() {
    let e = Expr::unop(UnOp::Neg, Expr::Bool(true));
    let snap = snapshot(e, 1);
    assert_eq!(snap.expected_type, Type::Int);
    assert_eq!(snap.actual_type, Type::Bool);

    let actions = legal(&snap, 50);
    assert!(actions.contains(&Action::Move(Move::Parent)));
    assert!(!actions.contains(&construct(Shape::UnOp(UnOp::Neg))));
    assert!(!actions.contains(&construct(Shape::Bool(true))));
    assert!(!actions.contains(&construct(Shape::Bool(false))));
    for op in BinOp::all() {
        if matches!(op.kind(), OpKind::Arith | OpKind::Cmp) {
            for side in [Side::Left, Side::Right] {
                assert!(
                    !actions.contains(&construct(Shape::BinOp(op, side))),
                    "{} {}",
                    op,
                    side
                );
            }
        }
    }
}

#[test]
fn let_body_sees_its_variable() {
    let e = Expr::let_(Var(0), Expr::Int(1), Expr::Var(Var(0)));
    let snap = snapshot(e, 3);
    assert_eq!(snap.vars_in_scope, vec![(Var(0), 1)]);
    assert_eq!(
        snap.ctx.bindings().cloned().collect::<Vec<_>>(),
        vec![(Var(0), Type::Int)]
    );
    assert_eq!(snap.actual_type, Type::Int);
    assert_eq!(snap.cursor, 3);
    assert_eq!(snap.num_nodes, 4);
    assert!(!snap.preserve_type);
}

#[test]
fn applied_function_expects_an_arrow() {
    // let x0 = 1 in let x1 = false in x1 2
    let e = Expr::let_(
        Var(0),
        Expr::Int(1),
        Expr::let_(
            Var(1),
            Expr::Bool(false),
            Expr::ap(Expr::Var(Var(1)), Expr::Int(2)),
        ),
    );
    let snap = snapshot(e, 7);
    assert_eq!(snap.expected_type, Type::arrow(Type::Int, Type::Hole));
    assert_eq!(snap.actual_type, Type::Bool);
    assert_eq!(snap.cursor, 7);
    assert_eq!(snap.num_nodes, 9);
    assert_eq!(snap.vars_in_scope, vec![(Var(1), 4), (Var(0), 1)]);
}

#[test]
fn full_budget_offers_only_atoms_and_references() {
    // let x0 = 1 in x0 + 2, cursor on the sum
    let e = Expr::let_(
        Var(0),
        Expr::Int(1),
        Expr::binop(Expr::Var(Var(0)), BinOp::Plus, Expr::Int(2)),
    );
    let max_nodes = e.size();
    let snap = snapshot(e, 3);

    let actions = legal(&snap, max_nodes);
    assert!(actions.contains(&construct(Shape::VarRef(0))));
    assert!(actions.contains(&construct(Shape::Int(0))));
    for a in actions {
        match a {
            Action::Move(_) => (),
            Action::Construct(shape) => {
                assert!(shape.is_atom() || shape.is_reference(), "{}", a)
            }
            Action::Unwrap(_) => panic!("unexpected {}", a),
        }
    }
}

#[test]
fn each_budget_tier_unlocks_its_constructions() {
    let snap = snapshot(Expr::Int(1), 0);

    let mut atoms = vec![construct(Shape::Hole), construct(Shape::Nil)];
    atoms.extend(INT_LITERALS.map(|k| construct(Shape::Int(k))));
    atoms.push(construct(Shape::Bool(true)));
    atoms.push(construct(Shape::Bool(false)));
    assert_eq!(legal(&snap, 1), atoms);

    let mut one = atoms.clone();
    one.push(construct(Shape::UnOp(UnOp::Neg)));
    assert_eq!(legal(&snap, 2), one);

    // An integer is neither a list tail nor a function.
    let mut binops = vec![];
    for op in BinOp::all() {
        for side in [Side::Left, Side::Right] {
            if !matches!(
                (op.kind(), side),
                (OpKind::Cons, Side::Right) | (OpKind::Ap, Side::Left)
            ) {
                binops.push(construct(Shape::BinOp(op, side)));
            }
        }
    }
    let pairs = [
        construct(Shape::Pair(Side::Left)),
        construct(Shape::Pair(Side::Right)),
    ];

    let mut two = one.clone();
    two.extend(binops.iter().copied());
    two.extend(pairs);
    assert_eq!(legal(&snap, 3), two);

    let mut three = one.clone();
    three.extend(binops.iter().copied());
    three.push(construct(Shape::Let(LetSlot::Def)));
    three.push(construct(Shape::Let(LetSlot::Body)));
    three.push(construct(Shape::If(IfSlot::Then)));
    three.push(construct(Shape::If(IfSlot::Else)));
    three.extend(pairs);
    assert_eq!(legal(&snap, 4), three);
    assert_eq!(legal(&snap, 50), three);
}

#[test]
fn argument_ordinals_follow_currying() {
    // fix x0 : int -> int -> fun x1 : int -> (fun x2 : bool -> ?)
    let e = Expr::fix(
        Var(0),
        Type::arrow(Type::Int, Type::Int),
        Expr::fun(
            Var(1),
            Type::Int,
            Expr::pair(Expr::fun(Var(2), Type::Bool, Expr::Hole), Expr::Hole),
        ),
    );
    let index = e.size() - 2;
    let z = Zipper::at(e, index).unwrap();
    assert_eq!(z.term(), holenav::zipper::Term::Exp(Expr::Hole));
    let snap = Snapshot::new(&z, 0);
    // The pair is not an integer, so the fixpoint is ill-typed.
    assert!(snap.is_err());

    let e = Expr::fix(
        Var(0),
        Type::arrow(Type::Int, Type::Hole),
        Expr::fun(
            Var(1),
            Type::Int,
            Expr::pair(Expr::fun(Var(2), Type::Bool, Expr::Hole), Expr::Hole),
        ),
    );
    // fix(0) x0(1) type(2..4) fun(5) x1(6) int(7) pair(8) fun(9) x2(10)
    // bool(11) hole(12) hole(13)
    let snap = snapshot(e, 12);
    let args: Vec<_> = snap
        .args_in_scope
        .iter()
        .map(|a| (a.var, a.function, a.position))
        .collect();
    assert_eq!(
        args,
        vec![(Var(2), 1, 0), (Var(1), 0, 1), (Var(0), 0, 0)]
    );
}

#[test]
fn definitions_of_used_variables_preserve_their_type() {
    // let x0 = 1 in x0, cursor on the definition
    let e = Expr::let_(Var(0), Expr::Int(1), Expr::Var(Var(0)));
    let snap = snapshot(e, 2);
    assert!(snap.preserve_type);

    let actions = legal(&snap, 50);
    assert!(actions.contains(&construct(Shape::Int(2))));
    assert!(!actions.contains(&construct(Shape::Hole)));
    assert!(!actions.contains(&construct(Shape::Bool(true))));
    assert!(!actions.contains(&construct(Shape::Pair(Side::Left))));
}

#[test]
fn holes_in_used_definitions_take_type_preserving_fillers() {
    // let x0 = ? + 1 in x0, cursor on the hole
    let e = Expr::let_(
        Var(0),
        Expr::binop(Expr::Hole, BinOp::Plus, Expr::Int(1)),
        Expr::Var(Var(0)),
    );
    let snap = snapshot(e, 3);
    assert!(snap.preserve_type);
    assert_eq!(snap.actual_type, Type::Hole);

    let actions = legal(&snap, 50);
    for k in INT_LITERALS {
        assert!(actions.contains(&construct(Shape::Int(k))), "{}", k);
    }
    assert!(actions.contains(&construct(Shape::Hole)));
    assert!(!actions.contains(&construct(Shape::Bool(true))));
    assert!(!actions.contains(&construct(Shape::Nil)));

    // let x0 = if ? then 1 else 2 in x0, cursor on the condition
    let e = Expr::let_(
        Var(0),
        Expr::if_(Expr::Hole, Expr::Int(1), Expr::Int(2)),
        Expr::Var(Var(0)),
    );
    let snap = snapshot(e, 3);
    assert!(snap.preserve_type);
    assert_eq!(snap.expected_type, Type::Bool);

    let actions = legal(&snap, 50);
    assert!(actions.contains(&construct(Shape::Bool(true))));
    assert!(actions.contains(&construct(Shape::Bool(false))));
    assert!(!actions.contains(&construct(Shape::Int(1))));
}

#[test]
fn nested_edits_keep_the_definition_type() {
    // let x0 = (?, ? + 1) in x0
    let e = Expr::let_(
        Var(0),
        Expr::pair(
            Expr::Hole,
            Expr::binop(Expr::Hole, BinOp::Plus, Expr::Int(1)),
        ),
        Expr::Var(Var(0)),
    );

    // The first hole decides the left component, so it has to stay a hole.
    let snap = snapshot(e.clone(), 3);
    assert_eq!(
        snap.preserved.as_ref().map(|p| p.typ.clone()),
        Some(Type::prod(Type::Hole, Type::Int))
    );
    assert_eq!(snap.expected_type, Type::Hole);
    let actions = legal(&snap, 50);
    assert!(actions.contains(&construct(Shape::Hole)));
    assert!(!actions.contains(&construct(Shape::Int(0))));
    assert!(!actions.contains(&construct(Shape::Nil)));
    assert!(!actions.contains(&construct(Shape::UnOp(UnOp::Neg))));

    // The second hole is an operand, so any integer expression fits.
    let snap = snapshot(e, 5);
    assert_eq!(snap.expected_type, Type::Int);
    let actions = legal(&snap, 50);
    assert!(actions.contains(&construct(Shape::Int(0))));
    assert!(actions.contains(&construct(Shape::UnOp(UnOp::Neg))));
    assert!(
        actions.contains(&construct(Shape::BinOp(BinOp::Times, Side::Left)))
    );
    assert!(!actions.contains(&construct(Shape::Bool(false))));
    assert!(
        !actions.contains(&construct(Shape::BinOp(BinOp::Lt, Side::Left)))
    );
}

#[test]
fn unwrapping_never_orphans_a_variable() {
    // let x0 = 1 in x0 + 1, cursor on the let
    let used = Expr::let_(
        Var(0),
        Expr::Int(1),
        Expr::binop(Expr::Var(Var(0)), BinOp::Plus, Expr::Int(1)),
    );
    let actions = legal(&snapshot(used, 0), 50);
    assert!(actions.contains(&Action::Unwrap(0)));
    assert!(!actions.contains(&Action::Unwrap(1)));

    let unused = Expr::let_(Var(0), Expr::Int(1), Expr::Bool(true));
    let actions = legal(&snapshot(unused, 0), 50);
    assert!(actions.contains(&Action::Unwrap(1)));
}

#[test]
fn let_hides_its_body_while_the_definition_is_a_hole() {
    let e = Expr::let_(Var(0), Expr::Hole, Expr::Int(1));
    let actions = legal(&snapshot(e, 0), 50);
    assert!(actions.contains(&Action::Move(Move::Child(0))));
    assert!(!actions.contains(&Action::Move(Move::Child(1))));

    let e = Expr::let_(Var(0), Expr::Int(0), Expr::Int(1));
    let actions = legal(&snapshot(e, 0), 50);
    assert!(actions.contains(&Action::Move(Move::Child(1))));
}

#[test]
fn binders_are_never_constructed() {
    let snap = snapshot(Expr::Int(1), 0);
    let actions = legal(&snap, 50);
    assert!(!actions.contains(&construct(Shape::Fun)));
    assert!(!actions.contains(&construct(Shape::Fix)));
    assert!(actions.contains(&construct(Shape::Let(LetSlot::Body))));
}

#[test]
fn annotations_only_allow_movement() {
    // fun x0 : int list -> x0
    let e = Expr::fun(Var(0), Type::list(Type::Int), Expr::Var(Var(0)));
    let z = Zipper::at(e, 0).unwrap().down(0).unwrap();
    assert!(z.in_annotation());
    let snap = Snapshot::new(&z, 0).unwrap();
    assert_eq!(snap.cursor, 2);
    assert_eq!(snap.parent.as_ref().map(|p| p.index), Some(0));

    let actions = legal(&snap, 50);
    assert_eq!(
        actions,
        vec![Action::Move(Move::Parent), Action::Move(Move::Child(0))]
    );
}
