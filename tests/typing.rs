use holenav::core::*;
use holenav::typ::*;
use holenav::typecheck::*;

fn types() -> Vec<Type> {
    vec![
        Type::Hole,
        Type::Int,
        Type::Bool,
        Type::list(Type::Hole),
        Type::list(Type::Int),
        Type::prod(Type::Int, Type::Hole),
        Type::arrow(Type::Int, Type::Int),
        Type::arrow(Type::Hole, Type::Bool),
        Type::arrow(Type::Bool, Type::Hole),
    ]
}

fn exprs() -> Vec<Expr> {
    let x = Var(0);
    vec![
        Expr::Hole,
        Expr::Int(2),
        Expr::Nil,
        Expr::binop(Expr::Int(1), BinOp::Cons, Expr::Nil),
        Expr::binop(Expr::Hole, BinOp::Cons, Expr::Hole),
        Expr::if_(Expr::Bool(true), Expr::Int(1), Expr::Hole),
        Expr::if_(Expr::Hole, Expr::Nil, Expr::Nil),
        Expr::pair(Expr::Int(0), Expr::Bool(false)),
        Expr::fun(x, Type::Int, Expr::Var(x)),
        Expr::fun(x, Type::Hole, Expr::Bool(true)),
        Expr::fix(x, Type::arrow(Type::Int, Type::Int), Expr::Var(x)),
        Expr::fix(x, Type::Hole, Expr::Hole),
        Expr::let_(x, Expr::Int(1), Expr::pair(Expr::Var(x), Expr::Hole)),
        Expr::let_(
            x,
            Expr::fun(Var(1), Type::Int, Expr::Nil),
            Expr::if_(Expr::Hole, Expr::Var(x), Expr::Hole),
        ),
        Expr::ap(Expr::Hole, Expr::Int(1)),
    ]
}

#[test]
fn analysis_agrees_with_synthesis() {
    let ctx = Context::new();
    for e in exprs() {
        let synthesized = synthesize(&ctx, &e);
        assert!(synthesized.is_some(), "{:?} should synthesize", e);
        for t in types() {
            let expected = synthesized
                .as_ref()
                .is_some_and(|s| consistent(s, &t));
            assert_eq!(
                analyze(&ctx, &e, &t),
                expected,
                "{:?} against {}",
                e,
                t
            );
        }
    }
}

#[test]
fn synthesized_types() {
    let ctx = Context::new();
    let x = Var(0);
    let cases = vec![
        (Expr::Nil, Type::list(Type::Hole)),
        (
            Expr::binop(Expr::Int(1), BinOp::Cons, Expr::Nil),
            Type::list(Type::Int),
        ),
        (
            Expr::if_(
                Expr::Hole,
                Expr::pair(Expr::Int(1), Expr::Hole),
                Expr::pair(Expr::Hole, Expr::Bool(true)),
            ),
            Type::prod(Type::Int, Type::Bool),
        ),
        (
            Expr::fun(x, Type::Int, Expr::unop(UnOp::Neg, Expr::Var(x))),
            Type::arrow(Type::Int, Type::Int),
        ),
        (
            Expr::binop(Expr::Int(1), BinOp::Eq, Expr::Hole),
            Type::Bool,
        ),
        (
            Expr::ap(Expr::fun(x, Type::Int, Expr::Nil), Expr::Int(2)),
            Type::list(Type::Hole),
        ),
    ];
    for (e, t) in cases {
        assert_eq!(synthesize(&ctx, &e), Some(t), "{:?}", e);
    }
}

#[test]
fn ill_typed_expressions() {
    let ctx = Context::new();
    let x = Var(0);
    let cases = vec![
        Expr::unop(UnOp::Neg, Expr::Bool(true)),
        Expr::binop(Expr::Nil, BinOp::Plus, Expr::Int(1)),
        Expr::binop(Expr::Int(1), BinOp::Cons, Expr::Int(2)),
        Expr::binop(
            Expr::Bool(true),
            BinOp::Cons,
            Expr::binop(Expr::Int(1), BinOp::Cons, Expr::Nil),
        ),
        Expr::if_(Expr::Int(0), Expr::Hole, Expr::Hole),
        Expr::if_(Expr::Hole, Expr::Int(1), Expr::Bool(false)),
        Expr::ap(Expr::Int(1), Expr::Int(2)),
        Expr::ap(Expr::fun(x, Type::Bool, Expr::Var(x)), Expr::Int(2)),
        Expr::fix(x, Type::Int, Expr::Bool(true)),
    ];
    for e in cases {
        assert_eq!(synthesize(&ctx, &e), None, "{:?}", e);
        assert_eq!(infer(&ctx, &e).unwrap_err().kind, ErrorKind::Type);
    }
}

#[test]
fn unbound_variables_are_scope_errors() {
    let ctx = Context::new();
    let err = infer(&ctx, &Expr::Var(Var(3))).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Scope);

    let ctx = ctx.extend(Var(3), Type::Bool);
    assert_eq!(infer(&ctx, &Expr::Var(Var(3))).unwrap(), Type::Bool);
    assert_eq!(ctx.len(), 1);
}

#[test]
fn let_bound_variables_take_the_definition_type() {
    let e = Expr::let_(
        Var(0),
        Expr::pair(Expr::Int(1), Expr::Nil),
        Expr::Var(Var(0)),
    );
    assert_eq!(
        infer(&Context::new(), &e).unwrap(),
        Type::prod(Type::Int, Type::list(Type::Hole))
    );
}
