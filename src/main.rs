#![warn(missing_docs)]
//! Desert intro sequence.
//!
//! A camera dollies along a fixed path through a fogged desert while captions
//! fade in at evenly spaced points along the way, smoke drifts past, and a
//! soundtrack plays behind a single on/off toggle.

mod captions;
mod desert;
mod dolly;
mod error;
pub mod math;
mod path;
mod soundtrack;

use bevy::app::AppExit;
use bevy::prelude::*;
#[cfg(feature = "native")]
use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
use bevy_inspector_egui::quick::WorldInspectorPlugin;

use captions::{CaptionsConfig, CaptionsPlugin};
use desert::{DesertConfig, DesertPlugin};
use dolly::{DollyConfig, DollyPlugin};
use soundtrack::{SoundtrackConfig, SoundtrackPlugin};

/// Application-wide state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum GameState {
    /// Camera travelling, captions being revealed.
    #[default]
    Intro,
    /// End of path reached; the final frame holds.
    Finished,
    /// World inspector open (Tab to toggle); the dolly is paused.
    Inspecting,
}

/// Per-frame ordering of the intro: the camera moves before captions read it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum IntroSystems {
    /// Dolly movement.
    Move,
    /// Caption dispatch.
    Reveal,
}

/// Command-line overrides for the default configuration.
#[cfg(feature = "native")]
#[derive(clap::Parser, Debug)]
#[command(version, about = "Scripted desert intro sequence")]
struct Cli {
    /// Axis the camera travels along.
    #[arg(long, value_enum)]
    axis: Option<path::PathAxis>,
    /// Travel from the end bound towards the start bound.
    #[arg(long)]
    descending: bool,
    /// Lower path bound.
    #[arg(long, allow_negative_numbers = true)]
    start: Option<f32>,
    /// Upper path bound.
    #[arg(long, allow_negative_numbers = true)]
    end: Option<f32>,
    /// Dolly speed in units per second.
    #[arg(long)]
    speed: Option<f32>,
    /// Reveal captions on a fixed timer instead of by camera position.
    #[arg(long)]
    timed: bool,
    /// Caption text; repeat to replace the built-in script.
    #[arg(long = "caption")]
    captions: Vec<String>,
    /// Start with the soundtrack playing.
    #[arg(long)]
    sound: bool,
    /// Quit when the camera reaches the end of the path.
    #[arg(long)]
    exit_on_complete: bool,
}

#[cfg(feature = "native")]
impl Cli {
    fn apply(
        self,
        dolly: &mut DollyConfig,
        captions: &mut CaptionsConfig,
        sound: &mut SoundtrackConfig,
    ) {
        if let Some(axis) = self.axis {
            dolly.path.axis = axis;
        }
        if self.descending {
            dolly.path.direction = path::TravelDirection::Descending;
        }
        if let Some(start) = self.start {
            dolly.path.start = start;
        }
        if let Some(end) = self.end {
            dolly.path.end = end;
        }
        if let Some(speed) = self.speed {
            dolly.speed = speed;
        }
        if self.timed {
            captions.policy = captions::TriggerPolicy::Timed;
        }
        if !self.captions.is_empty() {
            captions.lines = self
                .captions
                .into_iter()
                .map(captions::CaptionLine::new)
                .collect();
        }
        if self.sound {
            sound.start_muted = false;
        }
        captions.exit_on_complete |= self.exit_on_complete;
    }
}

#[cfg(feature = "native")]
fn configure() -> (DollyConfig, CaptionsConfig, SoundtrackConfig) {
    let mut dolly = DollyConfig::default();
    let mut captions = CaptionsConfig::default();
    let mut sound = SoundtrackConfig::default();
    <Cli as clap::Parser>::parse().apply(&mut dolly, &mut captions, &mut sound);
    (dolly, captions, sound)
}

#[cfg(not(feature = "native"))]
fn configure() -> (DollyConfig, CaptionsConfig, SoundtrackConfig) {
    default()
}

fn main() {
    let (dolly_cfg, captions_cfg, sound_cfg) = configure();

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Desert Intro".into(),
            ..default()
        }),
        ..default()
    }))
    .register_type::<GameState>()
    .init_state::<GameState>()
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(DesertPlugin(DesertConfig::default()))
    .add_plugins(DollyPlugin(dolly_cfg))
    .add_plugins(CaptionsPlugin(captions_cfg))
    .add_plugins(SoundtrackPlugin(sound_cfg))
    .add_plugins(WorldInspectorPlugin::new().run_if(in_state(GameState::Inspecting)));
    add_controls(&mut app);

    #[cfg(feature = "native")]
    app.add_plugins(RemotePlugin::default())
        .add_plugins(RemoteHttpPlugin::default());

    app.run();
}

/// Frame ordering and keyboard controls.
///
/// Tab is read before captions are dispatched, so reaching the end of the path
/// in the same frame still lands in [`GameState::Finished`].
fn add_controls(app: &mut App) {
    app.configure_sets(Update, (IntroSystems::Move, IntroSystems::Reveal).chain())
        .add_systems(Update, exit_on_esc)
        .add_systems(Update, toggle_inspector.before(IntroSystems::Reveal));
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        let new_state = match state.get() {
            GameState::Intro => GameState::Inspecting,
            GameState::Inspecting => GameState::Intro,
            GameState::Finished => return,
        };
        info!("{:?} -> {:?}", state.get(), new_state);
        next.set(new_state);
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
