//! Demo application for Reflow: two composed sessions, ratatui rendering and
//! crossterm input.

mod app;
mod input;
mod theme;
mod view;

pub use app::{
    App, AppEffect, Clock, ClockEffect, Counter, CounterView, FRAMES_PER_SECOND, Msg, Uptime,
    frame_duration,
};
pub use input::{InputPump, handle_events, msg_for_event};
pub use theme::{Palette, palette, styles};
pub use view::draw;
