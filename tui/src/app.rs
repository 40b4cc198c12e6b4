//! The demo model: a counter session and a clock session under one update.

use std::time::Duration;

use reflow_config::Settings;
use reflow_core::{Cycle, Effects, Session, SessionOptions, compose};

/// Frame cadence of the host loop. The clock session counts frames.
pub const FRAMES_PER_SECOND: u64 = 30;

#[must_use]
pub fn frame_duration() -> Duration {
    Duration::from_millis(1000 / FRAMES_PER_SECOND)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    /// Timer fired.
    Tick,
    Increment,
    Decrement,
    TogglePause,
    Reset,
    /// One host frame elapsed.
    Frame,
    Quit,
}

/// Effect descriptors the host runtime executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEffect {
    /// Start (or restart) the periodic timer.
    ScheduleTick(Duration),
    CancelTick,
    Announce(String),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    pub count: u64,
    pub step: u64,
    pub limit: Option<u64>,
    pub paused: bool,
    pub tick: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterView {
    pub status: String,
    pub decade: String,
    pub memo: u64,
    /// How many times the memo has been recomputed.
    pub memo_runs: u32,
    pub milestone: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    pub frames: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Uptime {
    pub seconds: u64,
    pub label: String,
    pub recomputes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEffect {
    /// A whole minute of frames has elapsed.
    Minute(u64),
}

impl From<ClockEffect> for AppEffect {
    fn from(effect: ClockEffect) -> Self {
        match effect {
            ClockEffect::Minute(1) => AppEffect::Announce("up for 1 minute".to_string()),
            ClockEffect::Minute(minutes) => {
                AppEffect::Announce(format!("up for {minutes} minutes"))
            }
        }
    }
}

type CounterCycle = Cycle<Counter, CounterView, AppEffect>;
type ClockCycle = Cycle<Clock, Uptime, ClockEffect>;

pub struct App {
    counter: Session<Counter, CounterView>,
    clock: Session<Clock, Uptime>,
}

impl App {
    /// Build both sessions and run their first cycle. The returned effects
    /// include the initial timer schedule unless the counter starts paused.
    #[must_use]
    pub fn new(settings: &Settings) -> (Self, Effects<AppEffect>) {
        let counter = Session::with_options(
            Counter {
                count: 0,
                step: settings.step,
                limit: settings.limit,
                paused: settings.paused,
                tick: settings.tick,
            },
            CounterView::default(),
            SessionOptions::labeled("counter").with_slot_capacity(settings.slot_capacity),
        );
        let clock = Session::with_options(
            Clock::default(),
            Uptime::default(),
            SessionOptions::labeled("clock").with_slot_capacity(settings.slot_capacity),
        );

        compose(counter.refresh(counter_steps), |counter| {
            let (clock, fx) = clock.refresh(clock_steps);
            (App { counter, clock }, fx.map(AppEffect::from))
        })
    }

    /// One message through both sessions. Counter effects precede clock
    /// effects.
    #[must_use]
    pub fn update(self, msg: Msg) -> (Self, Effects<AppEffect>) {
        let App { counter, clock } = self;
        compose(
            counter.cycle(|raw| apply_counter(raw, msg), counter_steps),
            |counter| {
                let (clock, fx) = clock.cycle(|raw| apply_clock(raw, msg), clock_steps);
                (App { counter, clock }, fx.map(AppEffect::from))
            },
        )
    }

    #[must_use]
    pub fn counter(&self) -> &Session<Counter, CounterView> {
        &self.counter
    }

    #[must_use]
    pub fn clock(&self) -> &Session<Clock, Uptime> {
        &self.clock
    }
}

fn apply_counter(mut raw: Counter, msg: Msg) -> (Counter, Effects<AppEffect>) {
    let effects = match msg {
        Msg::Tick if !raw.paused => {
            raw.count = raw.count.saturating_add(raw.step);
            Effects::none()
        }
        Msg::Increment => {
            raw.count = raw.count.saturating_add(raw.step);
            Effects::none()
        }
        Msg::Decrement => {
            raw.count = raw.count.saturating_sub(raw.step);
            Effects::none()
        }
        Msg::TogglePause => {
            raw.paused = !raw.paused;
            Effects::none()
        }
        Msg::Reset => {
            raw.count = 0;
            Effects::one(AppEffect::Announce("counter reset".to_string()))
        }
        Msg::Quit => Effects::one(AppEffect::Quit),
        Msg::Tick | Msg::Frame => Effects::none(),
    };
    (raw, effects)
}

fn apply_clock(mut raw: Clock, msg: Msg) -> (Clock, Effects<ClockEffect>) {
    if msg == Msg::Frame {
        raw.frames = raw.frames.saturating_add(1);
    }
    (raw, Effects::none())
}

fn counter_steps(cycle: &mut CounterCycle) {
    cycle
        .derive(|raw, view| {
            let mut status = format!("count {} | step {}", raw.count, raw.step);
            if let Some(limit) = raw.limit {
                status.push_str(&format!(" | limit {limit}"));
            }
            if raw.paused {
                status.push_str(" | paused");
            }
            CounterView {
                status,
                ..view.clone()
            }
        })
        .derive_lazy(
            |raw| raw.count / 10,
            |raw, view, decade| CounterView {
                decade: format!("{}-{}", decade * 10, decade * 10 + 9),
                memo: raw.count.saturating_mul(1000),
                memo_runs: view.memo_runs + 1,
                milestone: (*decade > 0).then(|| format!("reached {}", decade * 10)),
                ..view.clone()
            },
        )
        .schedule_lazy(
            |raw| raw.count / 10,
            |_, _, decade| AppEffect::Announce(format!("entered decade {decade}")),
        )
        .schedule_lazy(
            |raw| raw.paused,
            |raw, _, paused| {
                if *paused {
                    AppEffect::CancelTick
                } else {
                    AppEffect::ScheduleTick(raw.tick)
                }
            },
        )
        .schedule(|raw, _| {
            raw.limit
                .filter(|limit| raw.count >= *limit)
                .map(|_| AppEffect::Quit)
        });
}

fn clock_steps(cycle: &mut ClockCycle) {
    cycle
        .derive_lazy(
            |raw| raw.frames / FRAMES_PER_SECOND,
            |_, uptime, seconds| Uptime {
                seconds: *seconds,
                label: format!("{:02}:{:02}", seconds / 60, seconds % 60),
                recomputes: uptime.recomputes + 1,
            },
        )
        .schedule_lazy(
            |raw| raw.frames / (FRAMES_PER_SECOND * 60),
            |_, _, minutes| (*minutes > 0).then_some(ClockEffect::Minute(*minutes)),
        );
}
