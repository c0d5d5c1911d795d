//! Scripted captions revealed as the camera travels.
//!
//! Each caption line becomes a hidden entity at startup. A
//! [`TriggerTable`](trigger_table::TriggerTable) assigns each one a point on the path,
//! and the [`Dispatcher`](dispatcher::Dispatcher) reveals them one at a time as the
//! camera passes those points. Revealed captions fade in ahead of the camera and are
//! drawn as screen-projected egui text.

mod dispatcher;
mod entities;
mod systems;
mod trigger_table;

pub use entities::{Caption, CaptionFade};

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::{GameState, IntroSystems};

/// How the dispatcher decides when the next caption is due.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum TriggerPolicy {
    /// Every frame, reveal a caption whose point lies in the interval the
    /// camera swept since the previous frame.
    #[default]
    Sweep,
    /// Reveal captions in path order on a repeating timer, one per path
    /// segment at the dolly's speed, regardless of the actual camera position.
    Timed,
}

/// A single caption in the script.
#[derive(Clone, Debug, Reflect)]
pub struct CaptionLine {
    /// Text shown on screen. May contain line breaks.
    pub text: String,
    /// Pinned path position; `None` spaces the caption evenly by its index.
    pub at: Option<f32>,
}

impl CaptionLine {
    /// An evenly spaced caption.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            at: None,
        }
    }
}

/// Per-plugin configuration for the caption script and its presentation.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct CaptionsConfig {
    /// Caption script in reveal order.
    pub lines: Vec<CaptionLine>,
    /// Reveal policy.
    pub policy: TriggerPolicy,
    /// Distance ahead of the camera at which captions appear (negative: behind).
    pub anchor_offset: f32,
    /// Vertical lift applied to the caption anchor.
    pub anchor_lift: f32,
    /// Fade-in duration (seconds).
    pub fade_in: f32,
    /// Seconds a caption stays before fading out; `None` keeps it on screen.
    pub linger: Option<f32>,
    /// Fade-out duration (seconds).
    pub fade_out: f32,
    /// Caption font size in points.
    pub font_size: f32,
    /// Caption text color.
    pub color: Color,
    /// Quit the app once the path is complete instead of holding the last frame.
    pub exit_on_complete: bool,
}

impl Default for CaptionsConfig {
    fn default() -> Self {
        Self {
            lines: [
                "Nothing moves out here\nexcept the wind.",
                "The dunes remember\nevery road that was swallowed.",
                "Smoke on the horizon,\nno fire in sight.",
                "Water was the first rumour.",
                "The second was a city\nbeneath the sand.",
                "We stopped counting the days.",
                "Keep walking.",
            ]
            .into_iter()
            .map(CaptionLine::new)
            .collect(),
            policy: TriggerPolicy::Sweep,
            anchor_offset: 28.0,
            anchor_lift: 1.5,
            fade_in: 1.2,
            linger: Some(5.0),
            fade_out: 1.5,
            font_size: 28.0,
            color: Color::srgb(1.0, 0.95, 0.85),
            exit_on_complete: false,
        }
    }
}

/// Caption scheduling, fading and overlay drawing.
pub struct CaptionsPlugin(pub CaptionsConfig);

impl Plugin for CaptionsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CaptionsConfig>()
            .register_type::<Caption>()
            .register_type::<CaptionFade>()
            .insert_resource(self.0.clone())
            .add_systems(Startup, systems::spawn_captions)
            .add_systems(
                Update,
                systems::dispatch_captions
                    .in_set(IntroSystems::Reveal)
                    .run_if(resource_exists::<systems::CaptionSession>)
                    .run_if(in_state(GameState::Intro)),
            )
            .add_systems(Update, systems::fade_captions)
            .add_systems(EguiPrimaryContextPass, systems::draw_captions)
            .add_systems(OnEnter(GameState::Finished), systems::finish_intro)
            .add_systems(Last, systems::release_on_exit);
    }
}
