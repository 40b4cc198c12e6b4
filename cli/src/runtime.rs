//! Executes the effect descriptors returned by `App::update`.
//!
//! The model only describes work; this is the one place that starts timers,
//! writes announcements to the log and decides when to stop.

use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use reflow_core::Effects;
use reflow_tui::{AppEffect, Msg};

const RUNTIME_CHANNEL_CAPACITY: usize = 64;
const MAX_MSGS_PER_FRAME: usize = 64;

pub struct Runtime {
    tx: mpsc::Sender<Msg>,
    rx: mpsc::Receiver<Msg>,
    timer: Option<JoinHandle<()>>,
    last_announcement: Option<String>,
    quit: bool,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(RUNTIME_CHANNEL_CAPACITY);
        Self {
            tx,
            rx,
            timer: None,
            last_announcement: None,
            quit: false,
        }
    }

    /// Run every effect of a batch, in order.
    pub fn execute(&mut self, effects: Effects<AppEffect>) {
        for effect in effects {
            self.execute_one(effect);
        }
    }

    fn execute_one(&mut self, effect: AppEffect) {
        match effect {
            AppEffect::ScheduleTick(period) => self.schedule_tick(period),
            AppEffect::CancelTick => {
                if self.cancel_tick() {
                    debug!("timer cancelled");
                }
            }
            AppEffect::Announce(text) => {
                info!(announcement = %text, "announce");
                self.last_announcement = Some(text);
            }
            AppEffect::Quit => {
                debug!("quit requested");
                self.quit = true;
            }
        }
    }

    /// Replaces any running timer.
    fn schedule_tick(&mut self, period: Duration) {
        self.cancel_tick();
        debug!(period_ms = period.as_millis(), "timer scheduled");

        let tx = self.tx.clone();
        self.timer = Some(tokio::spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticks.tick().await;
                if tx.send(Msg::Tick).await.is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel_tick(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                timer.abort();
                true
            }
            None => false,
        }
    }

    /// Messages fed back by effects since the last call.
    pub fn drain(&mut self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while msgs.len() < MAX_MSGS_PER_FRAME {
            match self.rx.try_recv() {
                Ok(msg) => msgs.push(msg),
                Err(_) => break,
            }
        }
        msgs
    }

    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    #[must_use]
    pub fn last_announcement(&self) -> Option<&str> {
        self.last_announcement.as_deref()
    }

    pub fn shutdown(&mut self) {
        self.cancel_tick();
        self.rx.close();
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.cancel_tick();
    }
}
