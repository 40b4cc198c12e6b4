//! Several sessions under one enclosing update.

use reflow_core::{CycleFault, Effects, Session, SessionOptions, compose, try_compose};

use crate::common::{Calls, CounterCycle, CounterSession, Fx, counter_session, increment};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Parent {
    Left(Fx),
    Right(Fx),
}

fn lazy_effect(cycle: &mut CounterCycle) {
    cycle.schedule_lazy(|raw| raw.counter, |_, _, counter| Fx::Decade(*counter));
}

/// Two sibling counters as one model.
struct Pair {
    left: CounterSession,
    right: CounterSession,
}

impl Pair {
    fn update(self) -> (Self, Effects<Parent>) {
        let Pair { left, right } = self;
        let (left, left_fx) = left.cycle(increment, lazy_effect);
        compose((left, left_fx.map(Parent::Left)), |left| {
            let (right, right_fx) = right.cycle(
                |raw| (raw, Effects::one(Fx::Transition("right"))),
                lazy_effect,
            );
            (Pair { left, right }, right_fx.map(Parent::Right))
        })
    }
}

#[test]
fn left_session_effects_precede_right_session_effects() {
    let pair = Pair {
        left: counter_session(0),
        right: counter_session(100),
    };

    let (pair, effects) = pair.update();
    assert_eq!(
        effects.into_vec(),
        vec![
            Parent::Left(Fx::Decade(1)),
            Parent::Right(Fx::Transition("right")),
            Parent::Right(Fx::Decade(100)),
        ]
    );

    // Right's selection is stable now; only left keeps producing.
    let (pair, effects) = pair.update();
    assert_eq!(
        effects.into_vec(),
        vec![
            Parent::Left(Fx::Decade(2)),
            Parent::Right(Fx::Transition("right")),
        ]
    );
    assert_eq!(pair.left.raw().counter, 2);
    assert_eq!(pair.right.raw().counter, 100);
}

#[test]
fn sibling_histories_are_independent() {
    let left_calls = Calls::new();
    let right_calls = Calls::new();

    let mut left = counter_session(0);
    let mut right = Session::with_options((), 0_u32, SessionOptions::labeled("right"));

    for _ in 0..4 {
        let cycled = left.cycle(increment, |cycle: &mut CounterCycle| {
            cycle.derive_lazy(
                |raw| raw.counter,
                |_, d, _| {
                    left_calls.hit();
                    d.clone()
                },
            );
        });
        let ((l, r), _) = compose(cycled, |left| {
            let (right, fx) = right.cycle(
                |raw| (raw, Effects::none()),
                |cycle| {
                    cycle
                        .derive_lazy(|_| 1_u8, |_, d, _| {
                            right_calls.hit();
                            *d + 1
                        })
                        .derive_lazy(|_| 2_u8, |_, d, _| *d);
                },
            );
            ((left, right), fx)
        });
        left = l;
        right = r;
    }

    assert_eq!(left_calls.count(), 4);
    assert_eq!(right_calls.count(), 1);
    assert_eq!(left.slot_count(), 1);
    assert_eq!(right.slot_count(), 2);
    assert_eq!(*right.derived(), 1);
}

#[test]
fn try_compose_propagates_a_sibling_fault() {
    let (left, _) = counter_session(0).cycle(increment, lazy_effect);
    let right = counter_session(0);
    let (right, _) = right.cycle(increment, lazy_effect);

    let result = try_compose(left.try_cycle(increment, lazy_effect), |left| {
        let (right, fx) = right.try_cycle(increment, |_| {})?;
        Ok(((left, right), fx))
    });

    assert!(matches!(
        result,
        Err(CycleFault::SlotCountMismatch {
            previous: 1,
            current: 0,
            ..
        })
    ));
}
