//! Effect batching and ordering within one cycle.

use reflow_core::Effects;

use crate::common::{Counter, CounterCycle, Fx, Memo, counter_session, idle};

fn announce(raw: Counter) -> (Counter, Effects<Fx>) {
    (raw, Effects::one(Fx::Transition("E1")))
}

fn declared_steps(cycle: &mut CounterCycle) {
    cycle
        .schedule(|_, _| Fx::Always("E2"))
        .schedule_lazy(|raw| raw.counter, |_, _, _| Fx::Lazy("E3"));
}

#[test]
fn transition_then_unconditional_then_lazy() {
    let (_, effects) = counter_session(0).cycle(announce, declared_steps);

    assert_eq!(
        effects.into_vec(),
        vec![
            Fx::Transition("E1"),
            Fx::Always("E2"),
            Fx::Lazy("E3"),
        ]
    );
}

#[test]
fn untriggered_lazy_effect_leaves_a_gap_not_a_placeholder() {
    let (session, _) = counter_session(0).cycle(announce, declared_steps);
    let (_, effects) = session.cycle(announce, declared_steps);

    assert_eq!(
        effects.into_vec(),
        vec![Fx::Transition("E1"), Fx::Always("E2")]
    );
}

#[test]
fn effects_are_not_deduplicated() {
    let (_, effects) = counter_session(0).cycle(
        |raw| (raw, Effects::<Fx>::from(vec![Fx::Always("tick"), Fx::Always("tick")])),
        |cycle: &mut CounterCycle| {
            cycle
                .schedule(|_, _| Fx::Always("tick"))
                .schedule(|_, _| Fx::Always("tick"));
        },
    );
    assert_eq!(effects.len(), 4);
}

#[test]
fn guard_step_may_emit_nothing() {
    let guard = |cycle: &mut CounterCycle| {
        cycle.schedule(|raw, _| (raw.counter >= 3).then_some(Fx::Always("limit")));
    };

    let (session, quiet) = counter_session(1).cycle(idle, guard);
    assert!(quiet.is_empty());
    assert_eq!(session.last_cycle().effects, 0);

    let (session, loud) = session.cycle(|_| (Counter { counter: 3 }, Effects::none()), guard);
    assert_eq!(loud.into_vec(), vec![Fx::Always("limit")]);
    assert_eq!(session.last_cycle().effects, 1);
}

#[test]
fn producers_read_state_after_earlier_derivations() {
    let (_, effects) = counter_session(7).refresh(|cycle: &mut CounterCycle| {
        cycle
            .derive(|raw, derived| Memo {
                memo: raw.counter * 3,
                ..derived.clone()
            })
            .schedule(|_, derived| Fx::Decade(derived.memo));
    });
    assert_eq!(effects.into_vec(), vec![Fx::Decade(21)]);
}
