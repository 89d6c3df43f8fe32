//! Shared fixtures: a small imperative program run by a rewrite engine.
//!
//! The program is
//!
//! ```text
//! int s, n; n = N; while (0 <= n) { s = s + n; n = n + -1; }
//! ```
//!
//! encoded as a term with an explicit program counter, so every loop
//! iteration takes three rewrite steps and leaving the loop takes one more.

#![allow(dead_code)]

use std::convert::Infallible;
use stepwise::core::{RewriteEngine, StepIndex, StepOutcome};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pc {
    Test,
    Add,
    Dec,
    Halt,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Imp {
    pub s: i64,
    pub n: i64,
    pub pc: Pc,
}

/// Initial term for the summing loop starting at `n`.
pub fn program(n: i64) -> Imp {
    Imp {
        s: 0,
        n,
        pc: Pc::Test,
    }
}

/// Index at which the summing loop started at `n >= 0` halts.
pub fn terminal_index(n: i64) -> StepIndex {
    3 * (n as u64 + 1) + 1
}

pub struct ImpEngine;

impl RewriteEngine<Imp> for ImpEngine {
    type Error = Infallible;

    fn advance_one_step(&self, term: &Imp) -> Result<StepOutcome<Imp>, Infallible> {
        let next = match term.pc {
            Pc::Test if term.n >= 0 => Imp {
                pc: Pc::Add,
                ..term.clone()
            },
            Pc::Test => Imp {
                pc: Pc::Halt,
                ..term.clone()
            },
            Pc::Add => Imp {
                s: term.s + term.n,
                pc: Pc::Dec,
                ..term.clone()
            },
            Pc::Dec => Imp {
                n: term.n - 1,
                pc: Pc::Test,
                ..term.clone()
            },
            Pc::Halt => return Ok(StepOutcome::Terminated),
        };
        Ok(StepOutcome::Rewrote(next))
    }
}

/// Term reached by uninterrupted execution of `steps` steps.
pub fn direct(initial: &Imp, steps: StepIndex) -> Imp {
    match ImpEngine.run(initial, steps) {
        Ok(execution) => execution.state,
        Err(never) => match never {},
    }
}
