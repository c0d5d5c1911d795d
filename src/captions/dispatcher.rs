use std::time::Duration;

use bevy::prelude::*;

use super::TriggerPolicy;
use super::trigger_table::{CaptionTrigger, TriggerTable};
use crate::error::{ConfigError, PresentError};
use crate::math;
use crate::path::PathSettings;

/// Receiver for dispatched captions; implemented by the scene layer.
pub trait CaptionPresenter<P> {
    /// Makes `payload` visible at `anchor`.
    fn present(&mut self, payload: &P, anchor: Transform) -> Result<(), PresentError>;

    /// Called exactly once, when the camera reaches the end of the path.
    fn path_complete(&mut self);
}

/// Camera state for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameSample {
    /// Camera transform after this frame's movement.
    pub camera: Transform,
    /// Time since the previous frame.
    pub delta: Duration,
}

/// Progress consumed by the previous tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressCursor {
    /// Last progress value handed to the table.
    pub previous: f32,
}

/// Dispatcher lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchPhase {
    /// Captions may still be revealed.
    Advancing,
    /// End of path reached; nothing is revealed again.
    Finished,
}

/// Repeating reveal timer for [`TriggerPolicy::Timed`].
///
/// Released on [`RevealTimer::cancel`]; a released timer never fires again.
#[derive(Debug)]
pub struct RevealTimer(Option<Timer>);

impl RevealTimer {
    /// Starts a repeating timer with the given period.
    pub fn start(period: Duration) -> Self {
        Self(Some(Timer::new(period, TimerMode::Repeating)))
    }

    /// Advances the timer; `true` when a period elapsed during this tick.
    pub fn tick(&mut self, delta: Duration) -> bool {
        match self.0.as_mut() {
            Some(timer) => timer.tick(delta).just_finished(),
            None => false,
        }
    }

    /// Releases the timer.
    pub fn cancel(&mut self) {
        self.0 = None;
    }

    /// Whether the timer is still held.
    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }
}

/// How the dispatcher picks the next caption.
#[derive(Debug)]
enum Reveal {
    Sweep,
    Timed(RevealTimer),
}

/// Reveals captions as the camera advances, each exactly once.
///
/// Call [`Dispatcher::tick`] once per frame after the camera moved.
#[derive(Debug)]
pub struct Dispatcher<P> {
    table: TriggerTable<P>,
    path: PathSettings,
    cursor: ProgressCursor,
    reveal: Reveal,
    phase: DispatchPhase,
    anchor_offset: f32,
}

impl<P> Dispatcher<P> {
    /// Wraps a built table. `speed` is the dolly speed in units per second and
    /// only matters for [`TriggerPolicy::Timed`], where one caption is revealed
    /// per path segment travelled.
    ///
    /// Fails when the timed reveal period `segment / speed` is negative, NaN or
    /// too large for a [`Duration`].
    pub fn new(
        table: TriggerTable<P>,
        path: PathSettings,
        policy: TriggerPolicy,
        speed: f32,
        anchor_offset: f32,
    ) -> Result<Self, ConfigError> {
        let reveal = match policy {
            TriggerPolicy::Sweep => Reveal::Sweep,
            TriggerPolicy::Timed if table.is_empty() => Reveal::Timed(RevealTimer(None)),
            TriggerPolicy::Timed => {
                let segment = path.length() / (table.len() + 1) as f32;
                let period = Duration::try_from_secs_f32(segment / speed)
                    .map_err(|_| ConfigError::RevealPeriod { segment, speed })?;
                Reveal::Timed(RevealTimer::start(period))
            }
        };
        Ok(Self {
            cursor: ProgressCursor {
                previous: path.origin(),
            },
            table,
            path,
            reveal,
            phase: DispatchPhase::Advancing,
            anchor_offset,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> DispatchPhase {
        self.phase
    }

    /// Progress consumed by the last tick.
    #[cfg(test)]
    pub fn cursor(&self) -> ProgressCursor {
        self.cursor
    }

    /// The reveal timer, when running under [`TriggerPolicy::Timed`].
    #[cfg(test)]
    pub fn timer(&self) -> Option<&RevealTimer> {
        match &self.reveal {
            Reveal::Timed(timer) => Some(timer),
            Reveal::Sweep => None,
        }
    }

    /// Processes one frame.
    ///
    /// Reveals at most one caption. Once the camera reaches the destination the
    /// dispatcher finishes, notifies the presenter, and ignores further ticks.
    pub fn tick(
        &mut self,
        frame: FrameSample,
        presenter: &mut impl CaptionPresenter<P>,
    ) -> DispatchPhase {
        if self.phase == DispatchPhase::Finished {
            return self.phase;
        }

        let curr = self.path.progress(frame.camera.translation);
        if self.path.reached_end(curr) {
            self.finish();
            info!(
                "intro path complete at {curr:.1}, {} of {} captions shown",
                self.table.len() - self.table.remaining(),
                self.table.len()
            );
            presenter.path_complete();
            return self.phase;
        }

        let previous = self.cursor.previous;
        let hit = match &mut self.reveal {
            Reveal::Sweep => self.table.find_eligible(previous, curr),
            Reveal::Timed(timer) => {
                if timer.tick(frame.delta) {
                    self.table.take_next(self.path.direction)
                } else {
                    None
                }
            }
        };

        if let Some(CaptionTrigger { threshold, payload, .. }) = hit {
            let anchor = math::caption_anchor(&frame.camera, self.anchor_offset);
            match presenter.present(payload, anchor) {
                Ok(()) => debug!("caption at {threshold:.1} revealed at progress {curr:.1}"),
                Err(err) => error!("caption at {threshold:.1} not shown: {err}"),
            }
        }

        self.cursor.previous = curr;
        self.phase
    }

    /// Releases the reveal timer without finishing the path, for teardown.
    pub fn cancel(&mut self) {
        if let Reveal::Timed(timer) = &mut self.reveal {
            timer.cancel();
        }
    }

    fn finish(&mut self) {
        self.cancel();
        self.phase = DispatchPhase::Finished;
    }
}
