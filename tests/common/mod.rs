//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use reflow_core::{Cycle, Effects, Session};

/// Raw state of the counter fixture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Counter {
    pub counter: u64,
}

/// Derived state of the counter fixture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Memo {
    pub memo: u64,
    pub label: String,
}

/// Effect descriptors used across the suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fx {
    Transition(&'static str),
    Always(&'static str),
    Lazy(&'static str),
    Decade(u64),
}

pub type CounterSession = Session<Counter, Memo>;
pub type CounterCycle = Cycle<Counter, Memo, Fx>;

pub fn counter_session(counter: u64) -> CounterSession {
    Session::new(Counter { counter }, Memo::default())
}

/// Transition that increments the counter and emits nothing.
pub fn increment(raw: Counter) -> (Counter, Effects<Fx>) {
    (
        Counter {
            counter: raw.counter + 1,
        },
        Effects::none(),
    )
}

/// Transition that leaves the state alone and emits nothing.
pub fn idle(raw: Counter) -> (Counter, Effects<Fx>) {
    (raw, Effects::none())
}

/// Shared invocation counter for compute/produce functions.
#[derive(Debug, Clone, Default)]
pub struct Calls(Rc<Cell<u32>>);

impl Calls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn count(&self) -> u32 {
        self.0.get()
    }
}
