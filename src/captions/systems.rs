use bevy::app::AppExit;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::CaptionsConfig;
use super::dispatcher::{CaptionPresenter, DispatchPhase, Dispatcher, FrameSample};
use super::entities::{Caption, CaptionFade};
use super::trigger_table::TriggerTable;
use crate::GameState;
use crate::dolly::{DollyCamera, DollyConfig};
use crate::error::PresentError;
use crate::math;

/// The running caption dispatcher. Payloads are caption entities.
#[derive(Resource)]
pub struct CaptionSession {
    dispatcher: Dispatcher<Entity>,
}

type CaptionQuery<'w, 's> = Query<
    'w,
    's,
    (&'static mut Transform, &'static mut Visibility, &'static mut CaptionFade),
    With<Caption>,
>;

/// Shows caption entities in the scene and ends the intro.
struct ScenePresenter<'a, 'w, 's> {
    captions: &'a mut CaptionQuery<'w, 's>,
    next_state: &'a mut NextState<GameState>,
    lift: f32,
}

impl CaptionPresenter<Entity> for ScenePresenter<'_, '_, '_> {
    fn present(&mut self, payload: &Entity, anchor: Transform) -> Result<(), PresentError> {
        let Ok((mut transform, mut visibility, mut fade)) = self.captions.get_mut(*payload) else {
            return Err(PresentError::Despawned(*payload));
        };
        *transform = anchor;
        transform.translation.y += self.lift;
        *visibility = Visibility::Visible;
        fade.restart();
        Ok(())
    }

    fn path_complete(&mut self) {
        self.next_state.set(GameState::Finished);
    }
}

// ── Startup ─────────────────────────────────────────────────────────

/// Spawns a hidden entity per caption line and builds the [`CaptionSession`].
///
/// Invalid configuration is logged and exits the app.
pub fn spawn_captions(
    mut commands: Commands,
    cfg: Res<CaptionsConfig>,
    dolly: Res<DollyConfig>,
    mut exit: MessageWriter<AppExit>,
) {
    if let Err(err) = dolly.validate() {
        error!("invalid dolly configuration: {err}");
        exit.write(AppExit::error());
        return;
    }

    let entries: Vec<(Entity, Option<f32>)> = cfg
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let entity = commands
                .spawn((
                    Name::new(format!("Caption {i}")),
                    Caption {
                        text: line.text.clone(),
                    },
                    CaptionFade::default(),
                    Transform::default(),
                    Visibility::Hidden,
                ))
                .id();
            (entity, line.at)
        })
        .collect();

    let table = match TriggerTable::build(entries, &dolly.path) {
        Ok(table) => table,
        Err(err) => {
            error!("invalid caption script: {err}");
            exit.write(AppExit::error());
            return;
        }
    };

    let count = table.len();
    let dispatcher = match Dispatcher::new(
        table,
        dolly.path.clone(),
        cfg.policy,
        dolly.speed,
        cfg.anchor_offset,
    ) {
        Ok(dispatcher) => dispatcher,
        Err(err) => {
            error!("invalid caption timing: {err}");
            exit.write(AppExit::error());
            return;
        }
    };

    info!(
        "scheduled {count} captions over {:.0} units ({:?})",
        dolly.path.length(),
        cfg.policy
    );
    commands.insert_resource(CaptionSession { dispatcher });
}

// ── Update ──────────────────────────────────────────────────────────

/// Feeds the camera position to the dispatcher once per frame.
pub fn dispatch_captions(
    time: Res<Time>,
    mut session: ResMut<CaptionSession>,
    camera_q: Query<&Transform, (With<DollyCamera>, Without<Caption>)>,
    mut captions: CaptionQuery,
    mut next_state: ResMut<NextState<GameState>>,
    cfg: Res<CaptionsConfig>,
) {
    let Ok(camera) = camera_q.single() else {
        return;
    };

    let frame = FrameSample {
        camera: *camera,
        delta: time.delta(),
    };
    let mut presenter = ScenePresenter {
        captions: &mut captions,
        next_state: &mut next_state,
        lift: cfg.anchor_lift,
    };
    session.dispatcher.tick(frame, &mut presenter);
}

/// Advances caption fades and hides captions that have faded out.
pub fn fade_captions(
    time: Res<Time>,
    cfg: Res<CaptionsConfig>,
    mut q: Query<(&mut CaptionFade, &mut Visibility), With<Caption>>,
) {
    for (mut fade, mut visibility) in &mut q {
        let Some(age) = fade.age else { continue };
        let age = age + time.delta_secs();
        fade.alpha = math::caption_alpha(age, cfg.fade_in, cfg.linger, cfg.fade_out);

        let faded_out = cfg.linger.is_some_and(|linger| age > linger) && fade.alpha <= 0.0;
        if faded_out {
            fade.age = None;
            *visibility = Visibility::Hidden;
        } else {
            fade.age = Some(age);
        }
    }
}

/// Paints visible captions at their projected screen position.
pub fn draw_captions(
    mut contexts: EguiContexts,
    camera_q: Query<(&Camera, &GlobalTransform), With<DollyCamera>>,
    captions: Query<(&GlobalTransform, &Caption, &CaptionFade, &Visibility)>,
    cfg: Res<CaptionsConfig>,
) {
    let Ok((camera, cam_gt)) = camera_q.single() else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let cam_pos = cam_gt.translation();
    let forward = cam_gt.forward().as_vec3();

    let painter = ctx.layer_painter(egui::LayerId::background());
    let font = egui::FontId::proportional(cfg.font_size);

    for (caption_gt, caption, fade, visibility) in &captions {
        if *visibility == Visibility::Hidden || fade.alpha <= 0.0 {
            continue;
        }
        let world_pos = caption_gt.translation();
        // Behind the camera
        if (world_pos - cam_pos).dot(forward) <= 0.0 {
            continue;
        }
        let Ok(viewport) = camera.world_to_viewport(cam_gt, world_pos) else {
            continue;
        };
        let pos = egui::pos2(viewport.x, viewport.y);

        painter.text(
            pos + egui::vec2(2.0, 2.0),
            egui::Align2::CENTER_CENTER,
            &caption.text,
            font.clone(),
            egui::Color32::from_black_alpha((fade.alpha * 160.0) as u8),
        );
        painter.text(
            pos,
            egui::Align2::CENTER_CENTER,
            &caption.text,
            font.clone(),
            egui_color(cfg.color, fade.alpha),
        );
    }
}

// ── Completion ──────────────────────────────────────────────────────

/// Runs once when the dispatcher reports the end of the path.
pub fn finish_intro(cfg: Res<CaptionsConfig>, mut exit: MessageWriter<AppExit>) {
    if cfg.exit_on_complete {
        info!("intro finished, exiting");
        exit.write(AppExit::Success);
    } else {
        info!("intro finished, holding final frame");
    }
}

/// Releases the reveal timer when the app shuts down mid-intro.
pub fn release_on_exit(mut exits: MessageReader<AppExit>, session: Option<ResMut<CaptionSession>>) {
    if exits.read().next().is_none() {
        return;
    }
    if let Some(mut session) = session
        && session.dispatcher.phase() == DispatchPhase::Advancing
    {
        session.dispatcher.cancel();
        debug!("caption dispatcher released");
    }
}

fn egui_color(color: Color, alpha: f32) -> egui::Color32 {
    let c = color.to_srgba();
    egui::Color32::from_rgba_unmultiplied(
        (c.red * 255.0) as u8,
        (c.green * 255.0) as u8,
        (c.blue * 255.0) as u8,
        (c.alpha * alpha * 255.0) as u8,
    )
}
