//! Keyed lazy steps: memoization that survives reordering.

use reflow_core::{CycleFault, SlotKey};

use crate::common::{Calls, CounterCycle, Fx, Memo, counter_session, idle, increment};

const PARITY: SlotKey = SlotKey::new("parity");
const DECADE: SlotKey = SlotKey::new("decade");

#[test]
fn keyed_steps_skip_across_reordering() {
    let calls = Calls::new();
    let parity = |cycle: &mut CounterCycle| {
        cycle.derive_keyed(
            PARITY,
            |raw| raw.counter % 2,
            |_, d, _| {
                calls.hit();
                d.clone()
            },
        );
    };
    let decade = |cycle: &mut CounterCycle| {
        cycle.derive_keyed(
            DECADE,
            |raw| raw.counter / 10,
            |_, d, _| {
                calls.hit();
                d.clone()
            },
        );
    };

    let (session, _) = counter_session(0).cycle(idle, |cycle| {
        parity(cycle);
        decade(cycle);
    });
    assert_eq!(calls.count(), 2);

    let (session, _) = session.cycle(idle, |cycle| {
        decade(cycle);
        parity(cycle);
    });
    assert_eq!(calls.count(), 2, "same keys, same selections");
    assert_eq!(session.keyed_slot_count(), 2);
    assert_eq!(session.slot_count(), 0);
}

#[test]
fn conditional_keyed_step_does_not_fault() {
    let calls = Calls::new();
    let body = |cycle: &mut CounterCycle| {
        cycle.derive_lazy(|raw| raw.counter / 10, |_, d, _| d.clone());
        if cycle.raw().counter % 2 == 0 {
            cycle.schedule_keyed(
                PARITY,
                |raw| raw.counter / 10,
                |_, _, decade| {
                    calls.hit();
                    Fx::Decade(*decade)
                },
            );
        }
    };

    let (session, first) = counter_session(0).cycle(idle, body);
    assert_eq!(first.into_vec(), vec![Fx::Decade(0)]);

    // Odd: the keyed step does not run and its slot is released.
    let (session, second) = session.cycle(increment, body);
    assert!(second.is_empty());
    assert_eq!(session.keyed_slot_count(), 0);

    // Even again: no recorded value under the key, so it runs fresh even
    // though the selection equals the one from two cycles ago.
    let (session, third) = session.cycle(increment, body);
    assert_eq!(third.into_vec(), vec![Fx::Decade(0)]);
    assert_eq!(calls.count(), 2);
    assert_eq!(session.slot_count(), 1);
}

#[test]
fn duplicate_key_in_one_cycle_is_a_fault() {
    let result = counter_session(0).try_cycle(idle, |cycle: &mut CounterCycle| {
        cycle
            .derive_keyed(PARITY, |raw| raw.counter, |_, d, _| d.clone())
            .derive_keyed(PARITY, |raw| raw.counter, |_, d, _| d.clone());
    });

    assert!(matches!(
        result,
        Err(CycleFault::DuplicateKey { key, .. }) if key == PARITY
    ));
}

#[test]
fn key_changing_type_is_a_fault() {
    let (session, _) = counter_session(0).cycle(idle, |cycle: &mut CounterCycle| {
        cycle.derive_keyed(DECADE, |raw| raw.counter, |_, d, _| d.clone());
    });

    let fault = session
        .try_cycle(idle, |cycle: &mut CounterCycle| {
            cycle.derive_keyed(DECADE, |raw| raw.counter.to_string(), |_, d, _| d.clone());
        })
        .expect_err("type changed under key");

    assert!(matches!(
        fault,
        CycleFault::KeyedTypeMismatch { key, expected: "u64", .. } if key == DECADE
    ));
}

#[test]
fn keyed_derivation_updates_on_change() {
    let body = |cycle: &mut CounterCycle| {
        cycle.derive_keyed(
            DECADE,
            |raw| raw.counter / 10,
            |raw, _, decade| Memo {
                memo: raw.counter,
                label: format!("decade {decade}"),
            },
        );
    };

    let (session, _) = counter_session(19).cycle(idle, body);
    assert_eq!(session.derived().label, "decade 1");
    let (session, _) = session.cycle(increment, body);
    assert_eq!(session.derived().label, "decade 2");
    assert_eq!(session.derived().memo, 20);
}
