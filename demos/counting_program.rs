//! Counting Program
//!
//! This demo steps through a summing loop forwards and backwards.
//!
//! Key concepts:
//! - Forward stepping replays the engine one rule at a time
//! - Backward stepping is served from recorded history, never by undoing rules
//! - Jumping past the end lands on the index where the program halts
//! - Checkpoint retention trades memory for short replays
//!
//! Run with: RUST_LOG=stepwise=debug cargo run --example counting_program

use std::convert::Infallible;
use std::error::Error;
use stepwise::core::{RewriteEngine, StepOutcome};
use stepwise::{DebuggerSession, SessionBuilder};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, PartialEq, Debug)]
enum Pc {
    Test,
    Add,
    Dec,
    Halt,
}

/// `int s, n; n = 10; while (0 <= n) { s = s + n; n = n + -1; }`
#[derive(Clone, PartialEq, Debug)]
struct Imp {
    s: i64,
    n: i64,
    pc: Pc,
}

struct ImpEngine;

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

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Counting Program Example ===\n");

    let initial = Imp {
        s: 0,
        n: 10,
        pc: Pc::Test,
    };
    let mut session = DebuggerSession::new(initial.clone(), ImpEngine);

    let result = session.step(10)?;
    println!("step(10)     -> #{} {:?}", result.current_index(), result.current_state());

    let result = session.back_step(4)?;
    println!("back_step(4) -> #{} {:?}", result.current_index(), result.current_state());

    let result = session.step(3)?;
    println!("step(3)      -> #{} {:?}", result.current_index(), result.current_state());

    let result = session.jump_to(1_000)?;
    println!(
        "jump_to(1000) -> #{} {:?} (terminated: {})",
        result.current_index(),
        result.current_state(),
        result.is_terminated()
    );

    let direct = ImpEngine.run(&initial, 1_000)?;
    println!("direct run    -> #{} {:?}", direct.steps, direct.state);

    println!("\nStats: {:?}", session.stats());

    println!("\n=== Checkpoint Retention ===\n");

    let mut sparse = SessionBuilder::new()
        .initial(initial)
        .engine(ImpEngine)
        .checkpoint_every(8)
        .build()?;

    sparse.resume()?;
    sparse.jump_to(13)?;
    println!(
        "Recorded indices: {:?}",
        sparse.history().indices().collect::<Vec<_>>()
    );
    println!("Replayed for jump_to(13): {}", sparse.stats().last_replay);

    println!("\n=== Example Complete ===");
    Ok(())
}
