//! # Programming By Navigation
//!
//! The editor is an instance of the Programming By Navigation interaction
//! model: a step provider offers the steps that may be taken from the working
//! expression, the user (or an agent) decides on one, and a validity checker
//! says when the working expression is finished.

use crate::typecheck::Error;

/// The type of steps.
pub trait Step {
    type Exp;
    fn apply(&self, e: &Self::Exp) -> Option<Self::Exp>;
}

/// The type of step providers.
///
/// Every step provided must be applicable to the expression it was provided
/// for.
pub trait StepProvider {
    type Step: Step;
    fn provide(
        &mut self,
        e: &<Self::Step as Step>::Exp,
    ) -> Result<Vec<Self::Step>, Error>;
}

/// The type of validity checkers.
pub trait ValidityChecker {
    type Exp;
    fn check(&self, e: &Self::Exp) -> bool;
}

/// A Programming By Navigation controller.
pub struct Controller<S: Step> {
    provider: Box<dyn StepProvider<Step = S>>,
    checker: Box<dyn ValidityChecker<Exp = S::Exp>>,
    state: S::Exp,
    history: Vec<S::Exp>,
}

impl<S: Step> Controller<S>
where
    S::Exp: Clone,
{
    pub fn new(
        provider: impl StepProvider<Step = S> + 'static,
        checker: impl ValidityChecker<Exp = S::Exp> + 'static,
        start: S::Exp,
    ) -> Self {
        Self {
            provider: Box::new(provider),
            checker: Box::new(checker),
            state: start,
            history: vec![],
        }
    }

    pub fn provide(&mut self) -> Result<Vec<S>, Error> {
        self.provider.provide(&self.state)
    }

    /// Take a step. Returns whether the step applied.
    pub fn decide(&mut self, step: S) -> bool {
        match step.apply(&self.state) {
            Some(next) => {
                let prev = std::mem::replace(&mut self.state, next);
                self.history.push(prev);
                true
            }
            None => false,
        }
    }

    /// Undo the most recent step. Returns whether there was one.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(prev) => {
                self.state = prev;
                true
            }
            None => false,
        }
    }

    pub fn working_expression(&self) -> &S::Exp {
        &self.state
    }

    pub fn valid(&self) -> bool {
        self.checker.check(&self.state)
    }
}
