//! # Evaluation
//!
//! A call-by-value, environment-based interpreter used to run unit tests on
//! finished programs. Evaluation is bounded by a fuel budget (one unit per
//! step) and by a maximum recursion depth, so that programs built by an agent
//! cannot hang the session.

use crate::core::*;

use std::fmt;

////////////////////////////////////////////////////////////////////////////////
// Values

pub type Env = im::HashMap<Var, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Nil,
    Cons(Box<Value>, Box<Value>),
    Pair(Box<Value>, Box<Value>),
    Closure(Env, Var, Expr),
    /// A fixpoint, unrolled whenever its variable is looked up
    Fix(Env, Var, Expr),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(k) => write!(f, "{}", k),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "[]"),
            Value::Cons(h, t) => write!(f, "{} :: {}", h, t),
            Value::Pair(a, b) => write!(f, "({}, {})", a, b),
            Value::Closure(_, x, _) => write!(f, "<fun {}>", x),
            Value::Fix(_, x, _) => write!(f, "<fix {}>", x),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Errors

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    Hole,
    Unbound(Var),
    NotAFunction,
    TypeMismatch(&'static str),
    OutOfFuel,
    TooDeep,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalError::Hole => write!(f, "evaluated a hole"),
            EvalError::Unbound(x) => write!(f, "unbound variable '{}'", x),
            EvalError::NotAFunction => write!(f, "applied a non-function"),
            EvalError::TypeMismatch(expected) => {
                write!(f, "expected {} value", expected)
            }
            EvalError::OutOfFuel => write!(f, "ran out of fuel"),
            EvalError::TooDeep => write!(f, "exceeded maximum depth"),
        }
    }
}

impl std::error::Error for EvalError {}

////////////////////////////////////////////////////////////////////////////////
// Evaluator

pub struct Evaluator {
    fuel: usize,
    max_depth: usize,
}

impl Evaluator {
    pub fn new(fuel: usize, max_depth: usize) -> Self {
        Self { fuel, max_depth }
    }

    /// The remaining fuel.
    pub fn fuel(&self) -> usize {
        self.fuel
    }

    pub fn eval(&mut self, e: &Expr) -> Result<Value, EvalError> {
        self.go(&Env::new(), e, 0)
    }

    fn tick(&mut self, depth: usize) -> Result<(), EvalError> {
        if depth > self.max_depth {
            return Err(EvalError::TooDeep);
        }
        if self.fuel == 0 {
            return Err(EvalError::OutOfFuel);
        }
        self.fuel -= 1;
        Ok(())
    }

    fn int(
        &mut self,
        env: &Env,
        e: &Expr,
        depth: usize,
    ) -> Result<i64, EvalError> {
        match self.go(env, e, depth)? {
            Value::Int(k) => Ok(k),
            _ => Err(EvalError::TypeMismatch("integer")),
        }
    }

    fn unroll(
        &mut self,
        env: &Env,
        f: Var,
        body: &Expr,
        depth: usize,
    ) -> Result<Value, EvalError> {
        let fix = Value::Fix(env.clone(), f, body.clone());
        self.go(&env.update(f, fix), body, depth + 1)
    }

    fn go(
        &mut self,
        env: &Env,
        e: &Expr,
        depth: usize,
    ) -> Result<Value, EvalError> {
        self.tick(depth)?;
        let depth = depth + 1;
        match e {
            Expr::Var(x) => match env.get(x) {
                Some(Value::Fix(fenv, f, body)) => {
                    self.unroll(fenv, *f, body, depth)
                }
                Some(v) => Ok(v.clone()),
                None => Err(EvalError::Unbound(*x)),
            },
            Expr::Int(k) => Ok(Value::Int(*k)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Nil => Ok(Value::Nil),
            Expr::Hole => Err(EvalError::Hole),
            Expr::UnOp(UnOp::Neg, e) => {
                Ok(Value::Int(self.int(env, e, depth)?.wrapping_neg()))
            }
            Expr::BinOp(l, op, r) => match op {
                BinOp::Cons => {
                    let head = self.go(env, l, depth)?;
                    match self.go(env, r, depth)? {
                        tail @ (Value::Nil | Value::Cons(..)) => {
                            Ok(Value::Cons(Box::new(head), Box::new(tail)))
                        }
                        _ => Err(EvalError::TypeMismatch("list")),
                    }
                }
                BinOp::Ap => {
                    let fun = self.go(env, l, depth)?;
                    let arg = self.go(env, r, depth)?;
                    match fun {
                        Value::Closure(cenv, x, body) => {
                            self.go(&cenv.update(x, arg), &body, depth)
                        }
                        _ => Err(EvalError::NotAFunction),
                    }
                }
                _ => {
                    let a = self.int(env, l, depth)?;
                    let b = self.int(env, r, depth)?;
                    Ok(match op {
                        BinOp::Plus => Value::Int(a.wrapping_add(b)),
                        BinOp::Minus => Value::Int(a.wrapping_sub(b)),
                        BinOp::Times => Value::Int(a.wrapping_mul(b)),
                        BinOp::Lt => Value::Bool(a < b),
                        BinOp::Gt => Value::Bool(a > b),
                        BinOp::Eq => Value::Bool(a == b),
                        _ => Value::Bool(a != b),
                    })
                }
            },
            Expr::If(c, t, f) => match self.go(env, c, depth)? {
                Value::Bool(true) => self.go(env, t, depth),
                Value::Bool(false) => self.go(env, f, depth),
                _ => Err(EvalError::TypeMismatch("boolean")),
            },
            Expr::Let(x, def, body) => {
                let v = self.go(env, def, depth)?;
                self.go(&env.update(*x, v), body, depth)
            }
            Expr::Fun(x, _, body) => {
                Ok(Value::Closure(env.clone(), *x, (**body).clone()))
            }
            Expr::Fix(f, _, body) => self.unroll(env, *f, body, depth),
            Expr::Pair(l, r) => {
                let a = self.go(env, l, depth)?;
                let b = self.go(env, r, depth)?;
                Ok(Value::Pair(Box::new(a), Box::new(b)))
            }
        }
    }
}
