//! Structural-consistency invariant between cycles.

use reflow_core::{CycleFault, Effects, Session, SessionOptions};

use crate::common::{Calls, Counter, CounterCycle, Fx, counter_session, idle, increment};

fn two_lazy_steps(cycle: &mut CounterCycle) {
    cycle
        .derive_lazy(|raw| raw.counter, |_, d, _| d.clone())
        .derive_lazy(|raw| raw.counter % 2, |_, d, _| d.clone());
}

fn one_lazy_step(cycle: &mut CounterCycle) {
    cycle.derive_lazy(|raw| raw.counter, |_, d, _| d.clone());
}

#[test]
#[should_panic(expected = "must be invariant in count and order across cycles")]
fn dropping_a_lazy_step_panics() {
    let (session, _) = counter_session(0).cycle(idle, two_lazy_steps);
    let _ = session.cycle(increment, one_lazy_step);
}

#[test]
fn dropping_a_lazy_step_is_reported_by_try_cycle() {
    let (session, _) = counter_session(0).cycle(idle, two_lazy_steps);

    let fault = session
        .try_cycle(increment, one_lazy_step)
        .expect_err("shape changed");

    assert_eq!(
        fault,
        CycleFault::SlotCountMismatch {
            label: SessionOptions::DEFAULT_LABEL,
            previous: 2,
            current: 1,
        }
    );
}

#[test]
fn adding_a_lazy_step_is_also_a_fault() {
    let (session, _) = counter_session(0).cycle(idle, one_lazy_step);
    let fault = session
        .try_cycle(increment, two_lazy_steps)
        .expect_err("shape changed");
    assert!(matches!(
        fault,
        CycleFault::SlotCountMismatch {
            previous: 1,
            current: 2,
            ..
        }
    ));
}

#[test]
fn bootstrap_accepts_any_shape() {
    let (session, _) = counter_session(0).cycle(idle, two_lazy_steps);
    assert_eq!(session.slot_count(), 2);
    let (session, _) = session.cycle(increment, two_lazy_steps);
    assert_eq!(session.slot_count(), 2);
}

#[test]
fn sessions_without_lazy_steps_never_fault() {
    let mut session = counter_session(0);
    for _ in 0..3 {
        let (next, _) = session.cycle(increment, |cycle: &mut CounterCycle| {
            cycle.derive(|_, d| d.clone());
        });
        session = next;
    }
    assert_eq!(session.slot_count(), 0);
    assert_eq!(session.cycle_count(), 3);
}

#[test]
fn fault_message_names_the_session() {
    let session = Session::with_options(0_u8, (), SessionOptions::labeled("sidebar"));
    let (session, _) = session.cycle(
        |raw| (raw, Effects::<()>::none()),
        |cycle| {
            cycle.derive_lazy(|raw| *raw, |_, _, _| ());
        },
    );

    let fault = session
        .try_cycle(|raw| (raw, Effects::<()>::none()), |_| {})
        .expect_err("shape changed");

    assert_eq!(fault.label(), "sidebar");
    assert!(
        fault
            .to_string()
            .starts_with("session `sidebar`: previous cycle ran 1 lazy steps but this cycle ran 0")
    );
}

#[test]
fn reordered_steps_with_different_types_fault_at_the_step() {
    let later = Calls::new();
    let (session, _) = counter_session(0).cycle(idle, |cycle: &mut CounterCycle| {
        cycle
            .derive_lazy(|raw| raw.counter, |_, d, _| d.clone())
            .derive_lazy(|raw| raw.counter > 5, |_, d, _| d.clone());
    });

    let fault = session
        .try_cycle(idle, |cycle: &mut CounterCycle| {
            cycle
                .derive_lazy(|raw| raw.counter > 5, |_, d, _| d.clone())
                .derive_lazy(
                    |raw| {
                        later.hit();
                        raw.counter
                    },
                    |_, d, _| d.clone(),
                );
        })
        .expect_err("order changed");

    assert!(matches!(
        fault,
        CycleFault::SlotTypeMismatch {
            position: 0,
            expected: "u64",
            found: "bool",
            ..
        }
    ));
    assert_eq!(later.count(), 0, "selectors after a fault must not run");
}

#[test]
#[should_panic(expected = "decade table missing")]
fn compute_panic_propagates_unchanged() {
    let (session, _) = counter_session(9).cycle(idle, one_lazy_step);
    let _ = session.cycle(increment, |cycle: &mut CounterCycle| {
        cycle.derive_lazy(
            |raw| raw.counter,
            |_, _, counter| panic!("decade table missing for {counter}"),
        );
    });
}

#[test]
#[should_panic(expected = "transition rejected message")]
fn transition_panic_propagates_from_try_cycle() {
    let _ = counter_session(0).try_cycle(
        |_| -> (Counter, Effects<Fx>) {
            panic!("transition rejected message")
        },
        one_lazy_step,
    );
}
