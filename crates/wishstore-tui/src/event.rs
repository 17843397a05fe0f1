//! Terminal input plus the two clocks that drive the app: a slow tick for
//! toast expiry and alert draining, and a fast one for redraws.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    /// Redraw. Also sent after a terminal resize.
    Render,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRates {
    pub tick: Duration,
    pub render: Duration,
}

impl Default for FrameRates {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(250),
            render: Duration::from_millis(33),
        }
    }
}

/// Map a raw terminal event onto what the app reacts to. Key releases and
/// repeats, mouse, focus and paste events are ignored.
pub fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(cols, rows) => {
            debug!(cols, rows, "terminal resized");
            Some(Event::Render)
        }
        _ => None,
    }
}

fn clock(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Background task feeding [`Event`]s into a channel until stopped or dropped.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn spawn(rates: FrameRates) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let stop = cancel.clone();

        tokio::spawn(async move {
            let mut input = EventStream::new();
            let mut tick = clock(rates.tick);
            let mut render = clock(rates.render);

            loop {
                // Input first so a key is never starved by the redraw clock.
                let event = tokio::select! {
                    biased;
                    () = stop.cancelled() => break,
                    Some(Ok(raw)) = input.next() => match translate(raw) {
                        Some(event) => event,
                        None => continue,
                    },
                    _ = tick.tick() => Event::Tick,
                    _ = render.tick() => Event::Render,
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, cancel }
    }

    /// `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
