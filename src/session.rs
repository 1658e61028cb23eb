//! # Editing sessions
//!
//! A session is what the host drives: it holds the current program in its
//! flat encoding together with the cursor, the variable allocator, the staged
//! unit tests, and the starter program the episode began from. Each host
//! operation rebuilds the zipper from the flat tables, does its work, and
//! (for edits) flattens the result again.

use crate::action::Action;
use crate::apply::State;
use crate::config::Config;
use crate::core::*;
use crate::enumerate::Enumerator;
use crate::flat::Flat;
use crate::parse;
use crate::pbn::{self, Step};
use crate::typecheck::{infer, Context, Error};
use crate::unit_test::{Checker, UnitTest};
use crate::util;
use crate::zipper::Zipper;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything the host observes about a session, as fixed-size integer
/// tables padded with -1.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Observation {
    pub nodes: Vec<i32>,
    pub edges: Vec<[i32; 3]>,
    /// The node table of the starter program
    pub starter: Vec<i32>,
    /// One entry per action tag: 1 if the action is legal, 0 otherwise
    pub permitted_actions: Vec<i32>,
    pub cursor: usize,
    /// The binder node of each let-bound variable in scope, most recent first
    pub vars_in_scope: Vec<i32>,
    /// `[function, position]` of each argument in scope, most recent first
    pub args_in_scope: Vec<[i32; 2]>,
    pub tests: Vec<[i64; 2]>,
    pub assignment: i32,
}

pub struct Session {
    config: Config,
    flat: Flat,
    cursor: usize,
    vars: VarAllocator,
    pinned: usize,
    tests: Vec<UnitTest>,
    starter: Vec<i32>,
    assignment: Option<usize>,
}

impl Session {
    /// A session editing a lone hole.
    pub fn new(config: Config) -> Self {
        let vars = VarAllocator::new(config.editor.max_vars);
        Self {
            config,
            flat: Flat {
                nodes: vec![crate::flat::TAG_HOLE],
                edges: vec![],
            },
            cursor: 0,
            vars,
            pinned: 0,
            tests: vec![],
            starter: vec![],
            assignment: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn assignment_path(&self, assignment: usize) -> PathBuf {
        self.config.assignment_dir.join(assignment.to_string())
    }

    /// Start editing `e` as starter code: the root `let` is pinned and the
    /// cursor is placed on its definition. Returns the root index.
    pub fn load_program(
        &mut self,
        e: Expr,
        assignment: Option<usize>,
    ) -> Result<usize, Error> {
        validate(&e, &self.config)
            .map_err(|err| err.with_context("starter code".into()))?;

        self.flat = Flat::new(&e)?;
        self.starter = self.flat.nodes.clone();
        self.cursor = 2;
        self.pinned = 1;
        self.vars = VarAllocator::after(&e, self.config.editor.max_vars);
        self.assignment = assignment;

        log::info!(
            "loaded starter code with {} nodes",
            self.flat.nodes.len()
        );

        Ok(0)
    }

    pub fn load_starter_code(
        &mut self,
        assignment: usize,
        variant: usize,
    ) -> Result<usize, Error> {
        let path = self
            .assignment_path(assignment)
            .join(format!("code_{}.json", variant));
        let e = parse::exp(&read(&path)?).map_err(|err| {
            err.with_context(format!("'{}'", path.display()))
        })?;
        log::info!("assignment {}, variant {}", assignment, variant);
        self.load_program(e, Some(assignment))
    }

    pub fn load_unit_tests(&mut self, assignment: usize) -> Result<(), Error> {
        let path = self.assignment_path(assignment).join("tests.toml");
        self.tests = parse::unit_tests(&read(&path)?).map_err(|err| {
            err.with_context(format!("'{}'", path.display()))
        })?;
        log::info!(
            "loaded {} unit tests for assignment {}",
            self.tests.len(),
            assignment
        );
        Ok(())
    }

    pub fn set_unit_tests(&mut self, tests: Vec<UnitTest>) {
        self.tests = tests;
    }

    /// The program rooted at node `root`.
    pub fn expr(&self, root: usize) -> Result<Expr, Error> {
        self.flat.to_expr(root)
    }

    /// The editing state of the whole program.
    pub fn state(&self) -> Result<State, Error> {
        let e = self.expr(0)?;
        let zipper = Zipper::at(e, self.cursor).ok_or_else(|| {
            Error::format(format!(
                "cursor {} does not designate a node",
                self.cursor
            ))
        })?;
        Ok(State::new(zipper, self.vars.clone(), self.pinned))
    }

    pub fn legal_actions(&self) -> Result<IndexSet<Action>, Error> {
        let state = self.state()?;
        let snap = state.snapshot()?;
        Ok(Enumerator::new(self.config.editor.max_nodes)
            .legal(&snap, &state.vars))
    }

    /// Apply the action with tag `tag` and return the new root index.
    ///
    /// Edits always apply to the whole program, so `root` must be `0`. The
    /// action is not checked against the legal actions at the cursor; an
    /// action that does not apply leaves the program unchanged.
    pub fn apply_action(
        &mut self,
        root: usize,
        tag: usize,
    ) -> Result<usize, Error> {
        if root != 0 {
            return Err(Error::format(format!(
                "cannot edit under root {}, only the whole program",
                root
            )));
        }
        let max_vars = self.config.editor.max_vars;
        let action = Action::decode(tag, max_vars).ok_or_else(|| {
            Error::format(format!("action tag {} out of range", tag))
        })?;
        let state = self.state()?;
        match action.apply(&state) {
            Some(next) => self.store(&next)?,
            None => log::warn!("'{}' does not apply at the cursor", action),
        }
        Ok(0)
    }

    fn store(&mut self, s: &State) -> Result<(), Error> {
        self.flat = Flat::new(&s.zipper.to_expr())?;
        self.cursor = s.zipper.cursor_index();
        self.vars = s.vars.clone();
        self.pinned = s.pinned;
        Ok(())
    }

    fn checker(&self) -> Checker {
        Checker::new(self.tests.clone(), self.config.eval.clone())
    }

    pub fn check_unit_tests(&self, root: usize) -> Result<bool, Error> {
        self.checker().run(&self.expr(root)?)
    }

    /// A Programming By Navigation controller starting from the current
    /// program.
    pub fn controller(&self) -> Result<pbn::Controller<Action>, Error> {
        Ok(pbn::Controller::new(
            Enumerator::new(self.config.editor.max_nodes),
            self.checker(),
            self.state()?,
        ))
    }

    /// Replace the current program with a controller's working expression.
    pub fn commit(&mut self, s: &State) -> Result<(), Error> {
        self.store(s)
    }

    pub fn observe(&self) -> Result<Observation, Error> {
        let max_nodes = self.config.editor.max_nodes;
        let max_vars = self.config.editor.max_vars;

        let state = self.state()?;
        let snap = state.snapshot()?;
        let legal = Enumerator::new(max_nodes).legal(&snap, &state.vars);

        let mut permitted_actions = vec![0; Action::count(max_vars)];
        for a in &legal {
            if let Some(tag) = a.encode(max_vars) {
                permitted_actions[tag] = 1;
            }
        }

        Ok(Observation {
            nodes: util::pad(self.flat.nodes.clone(), max_nodes, -1),
            edges: util::pad(self.flat.edges.clone(), 3 * max_nodes, [-1; 3]),
            starter: util::pad(self.starter.clone(), max_nodes, -1),
            permitted_actions,
            cursor: snap.cursor,
            vars_in_scope: util::pad(
                snap.vars_in_scope
                    .iter()
                    .map(|(_, index)| util::int(*index))
                    .collect(),
                max_vars,
                -1,
            ),
            args_in_scope: util::pad(
                snap.args_in_scope
                    .iter()
                    .map(|arg| {
                        [util::int(arg.function), util::int(arg.position)]
                    })
                    .collect(),
                max_vars,
                [-1; 2],
            ),
            tests: self.tests.iter().map(|t| [t.input, t.output]).collect(),
            assignment: self.assignment.map_or(-1, util::int),
        })
    }
}

fn read(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|e| {
        Error::format(format!("could not read '{}': {}", path.display(), e))
    })
}

/// Starter programs must be a well-typed `let` that fits the editor's node
/// and variable bounds.
fn validate(e: &Expr, config: &Config) -> Result<(), Error> {
    if !matches!(e, Expr::Let(..)) {
        return Err(Error::format("root is not a 'let'".to_owned()));
    }
    infer(&Context::new(), e)?;
    if e.size() > config.editor.max_nodes {
        return Err(Error::format(format!(
            "{} nodes exceed the maximum of {}",
            e.size(),
            config.editor.max_nodes
        )));
    }
    if let Some(x) = e.max_var() {
        if x.0 >= config.editor.max_vars {
            return Err(Error::format(format!(
                "variable {} exceeds the maximum of {} variables",
                x, config.editor.max_vars
            )));
        }
    }
    Ok(())
}
