//! Looping soundtrack with a single play/pause toggle.
//!
//! M or the speaker button in the top-right corner flips [`SoundState`]; the
//! change is pushed to the audio sink on the next frame. A sink that appears
//! after a toggle (the track finished loading late) picks up the current state
//! when it is added.

use bevy::audio::{AudioSinkPlayback, Volume};
use bevy::ecs::component::Mutable;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

/// Per-plugin configuration for the soundtrack.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct SoundtrackConfig {
    /// Audio asset path.
    pub track: String,
    /// Linear playback volume.
    pub volume: f32,
    /// Start paused until the viewer turns sound on.
    pub start_muted: bool,
}

impl Default for SoundtrackConfig {
    fn default() -> Self {
        Self {
            track: "audio/intro.ogg".into(),
            volume: 0.8,
            start_muted: true,
        }
    }
}

/// Whether the soundtrack should be audible.
#[derive(Resource, Reflect)]
pub struct SoundState {
    /// `true` while the track plays.
    pub playing: bool,
}

/// Marker on the soundtrack audio entity.
#[derive(Component, Reflect)]
pub struct Soundtrack;

/// A sink the soundtrack can start and stop.
pub trait Playback {
    /// Resumes or pauses playback.
    fn set_playing(&mut self, playing: bool);
}

impl Playback for AudioSink {
    fn set_playing(&mut self, playing: bool) {
        if playing {
            self.play();
        } else {
            self.pause();
        }
    }
}

/// Soundtrack playback and its toggle.
pub struct SoundtrackPlugin(pub SoundtrackConfig);

impl Plugin for SoundtrackPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SoundtrackConfig>()
            .register_type::<SoundState>()
            .register_type::<Soundtrack>()
            .insert_resource(self.0.clone())
            .insert_resource(SoundState {
                playing: !self.0.start_muted,
            })
            .add_systems(Startup, spawn_soundtrack)
            .add_systems(Update, toggle_on_key)
            .add_systems(EguiPrimaryContextPass, sound_button)
            .add_systems(Update, apply_sound_state::<AudioSink>.after(toggle_on_key));
    }
}

fn spawn_soundtrack(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    cfg: Res<SoundtrackConfig>,
) {
    commands.spawn((
        Name::new("Soundtrack"),
        AudioPlayer::new(asset_server.load(cfg.track.clone())),
        PlaybackSettings {
            volume: Volume::Linear(cfg.volume),
            paused: cfg.start_muted,
            ..PlaybackSettings::LOOP
        },
        Soundtrack,
    ));
}

fn toggle_on_key(keys: Res<ButtonInput<KeyCode>>, mut sound: ResMut<SoundState>) {
    if keys.just_pressed(KeyCode::KeyM) {
        sound.playing = !sound.playing;
    }
}

fn sound_button(mut contexts: EguiContexts, mut sound: ResMut<SoundState>) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let label = if sound.playing { "🔊 Sound on" } else { "🔇 Sound off" };
    egui::Area::new(egui::Id::new("sound_toggle"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
        .show(ctx, |ui| {
            if ui.button(label).clicked() {
                sound.playing = !sound.playing;
            }
        });
}

/// Pushes [`SoundState`] to the soundtrack sink when the state changes or the
/// sink has just been created.
fn apply_sound_state<S>(sound: Res<SoundState>, mut sinks: Query<&mut S, With<Soundtrack>>)
where
    S: Component<Mutability = Mutable> + Playback,
{
    for mut sink in &mut sinks {
        if !sound.is_changed() && !sink.is_added() {
            continue;
        }
        sink.set_playing(sound.playing);
        info!("soundtrack {}", if sound.playing { "playing" } else { "paused" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Component, Default)]
    struct FakeSink {
        playing: Option<bool>,
    }

    impl Playback for FakeSink {
        fn set_playing(&mut self, playing: bool) {
            self.playing = Some(playing);
        }
    }

    fn app(playing: bool) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(SoundState { playing })
            .add_systems(Update, apply_sound_state::<FakeSink>);
        app
    }

    fn sink_state(app: &App, sink: Entity) -> Option<bool> {
        app.world().get::<FakeSink>(sink).and_then(|s| s.playing)
    }

    #[test]
    fn toggle_reaches_existing_sink() {
        let mut app = app(true);
        let sink = app.world_mut().spawn((Soundtrack, FakeSink::default())).id();
        app.update();
        assert_eq!(sink_state(&app, sink), Some(true));

        app.world_mut().resource_mut::<SoundState>().playing = false;
        app.update();
        assert_eq!(sink_state(&app, sink), Some(false));
    }

    #[test]
    fn sink_added_after_toggle_follows_current_state() {
        let mut app = app(false);
        app.update();
        app.world_mut().resource_mut::<SoundState>().playing = true;
        app.update();

        let sink = app.world_mut().spawn((Soundtrack, FakeSink::default())).id();
        app.update();
        assert_eq!(sink_state(&app, sink), Some(true));
    }

    #[test]
    fn unchanged_state_leaves_sink_alone() {
        let mut app = app(true);
        let sink = app.world_mut().spawn((Soundtrack, FakeSink::default())).id();
        app.update();
        if let Some(mut s) = app.world_mut().get_mut::<FakeSink>(sink) {
            s.playing = None;
        }
        app.update();
        assert_eq!(sink_state(&app, sink), None);
    }

    #[test]
    fn untagged_sinks_are_ignored() {
        let mut app = app(true);
        let other = app.world_mut().spawn(FakeSink::default()).id();
        app.update();
        assert_eq!(sink_state(&app, other), None);
    }
}
