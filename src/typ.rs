//! # Types
//!
//! This module defines the hole-extended simple type algebra. The `Hole` type
//! acts as a wildcard: it is consistent with every type, and two non-hole
//! types are consistent exactly when their head constructors agree and their
//! components are pairwise consistent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The types of the language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Type {
    Int,
    Bool,
    Hole,
    List(Box<Type>),
    Prod(Box<Type>, Box<Type>),
    Arrow(Box<Type>, Box<Type>),
}

impl Type {
    pub fn list(t: Type) -> Self {
        Type::List(Box::new(t))
    }

    pub fn prod(t1: Type, t2: Type) -> Self {
        Type::Prod(Box::new(t1), Box::new(t2))
    }

    pub fn arrow(t1: Type, t2: Type) -> Self {
        Type::Arrow(Box::new(t1), Box::new(t2))
    }

    /// The number of nodes this type occupies in the flat node table.
    pub fn size(&self) -> usize {
        match self {
            Type::Int | Type::Bool | Type::Hole => 1,
            Type::List(t) => 1 + t.size(),
            Type::Prod(t1, t2) | Type::Arrow(t1, t2) => {
                1 + t1.size() + t2.size()
            }
        }
    }

    /// The element type of a list-like type (`Hole` is list-like).
    pub fn elem(&self) -> Option<Type> {
        match self {
            Type::List(t) => Some((**t).clone()),
            Type::Hole => Some(Type::Hole),
            _ => None,
        }
    }

    /// The components of a product-like type (`Hole` is product-like).
    pub fn prod_parts(&self) -> Option<(Type, Type)> {
        match self {
            Type::Prod(t1, t2) => Some(((**t1).clone(), (**t2).clone())),
            Type::Hole => Some((Type::Hole, Type::Hole)),
            _ => None,
        }
    }

    /// The domain and codomain of an arrow-like type (`Hole` is arrow-like).
    pub fn arrow_parts(&self) -> Option<(Type, Type)> {
        match self {
            Type::Arrow(t1, t2) => Some(((**t1).clone(), (**t2).clone())),
            Type::Hole => Some((Type::Hole, Type::Hole)),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::Hole => write!(f, "?"),
            Type::List(t) => match **t {
                Type::Prod(..) | Type::Arrow(..) => write!(f, "({}) list", t),
                _ => write!(f, "{} list", t),
            },
            Type::Prod(t1, t2) => write!(f, "({} * {})", t1, t2),
            Type::Arrow(t1, t2) => match **t1 {
                Type::Arrow(..) => write!(f, "({}) -> {}", t1, t2),
                _ => write!(f, "{} -> {}", t1, t2),
            },
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Consistency

/// The consistency relation (reflexive and symmetric, but not transitive).
pub fn consistent(t1: &Type, t2: &Type) -> bool {
    match (t1, t2) {
        (Type::Hole, _) | (_, Type::Hole) => true,
        (Type::Int, Type::Int) | (Type::Bool, Type::Bool) => true,
        (Type::List(a), Type::List(b)) => consistent(a, b),
        (Type::Prod(a1, a2), Type::Prod(b1, b2))
        | (Type::Arrow(a1, a2), Type::Arrow(b1, b2)) => {
            consistent(a1, b1) && consistent(a2, b2)
        }
        _ => false,
    }
}

/// The most specific type consistent with both arguments.
///
/// Defined exactly when [`consistent`] holds: holes on either side are
/// replaced by the corresponding component of the other side.
pub fn common_type(t1: &Type, t2: &Type) -> Option<Type> {
    match (t1, t2) {
        (Type::Hole, t) | (t, Type::Hole) => Some(t.clone()),
        (Type::Int, Type::Int) => Some(Type::Int),
        (Type::Bool, Type::Bool) => Some(Type::Bool),
        (Type::List(a), Type::List(b)) => Some(Type::list(common_type(a, b)?)),
        (Type::Prod(a1, a2), Type::Prod(b1, b2)) => Some(Type::prod(
            common_type(a1, b1)?,
            common_type(a2, b2)?,
        )),
        (Type::Arrow(a1, a2), Type::Arrow(b1, b2)) => Some(Type::arrow(
            common_type(a1, b1)?,
            common_type(a2, b2)?,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<Type> {
        vec![
            Type::Int,
            Type::Bool,
            Type::Hole,
            Type::list(Type::Hole),
            Type::list(Type::Int),
            Type::prod(Type::Int, Type::Hole),
            Type::prod(Type::Hole, Type::Bool),
            Type::arrow(Type::Int, Type::Hole),
            Type::arrow(Type::Hole, Type::Bool),
            Type::arrow(Type::Int, Type::Bool),
        ]
    }

    #[test]
    fn hole_is_consistent_with_everything() {
        for t in samples() {
            assert!(consistent(&Type::Hole, &t));
            assert!(consistent(&t, &Type::Hole));
        }
    }

    #[test]
    fn consistency_is_symmetric_and_matches_common_type() {
        for t1 in samples() {
            for t2 in samples() {
                assert_eq!(consistent(&t1, &t2), consistent(&t2, &t1));
                assert_eq!(
                    consistent(&t1, &t2),
                    common_type(&t1, &t2).is_some(),
                    "{} and {}",
                    t1,
                    t2
                );
            }
        }
    }

    #[test]
    fn consistency_is_not_transitive() {
        let a = Type::Int;
        let b = Type::Hole;
        let c = Type::Bool;
        assert!(consistent(&a, &b));
        assert!(consistent(&b, &c));
        assert!(!consistent(&a, &c));
    }

    #[test]
    fn common_type_fills_holes_from_both_sides() {
        let t1 = Type::prod(Type::Int, Type::Hole);
        let t2 = Type::prod(Type::Hole, Type::Bool);
        assert_eq!(
            common_type(&t1, &t2),
            Some(Type::prod(Type::Int, Type::Bool))
        );
        assert_eq!(
            common_type(&Type::list(Type::Int), &Type::list(Type::Bool)),
            None
        );
    }

    #[test]
    fn sizes_count_every_constructor() {
        assert_eq!(Type::Int.size(), 1);
        assert_eq!(Type::arrow(Type::Int, Type::list(Type::Bool)).size(), 4);
    }
}
