use bevy::prelude::*;

/// Caption text carried by a caption entity.
#[derive(Component, Reflect)]
pub struct Caption {
    /// Text painted on screen.
    pub text: String,
}

/// Fade state of a caption entity.
#[derive(Component, Default, Reflect)]
pub struct CaptionFade {
    /// Seconds since the caption was presented; `None` while hidden.
    pub age: Option<f32>,
    /// Current opacity in `[0, 1]`.
    pub alpha: f32,
}

impl CaptionFade {
    /// Restarts the fade from fully transparent.
    pub fn restart(&mut self) {
        self.age = Some(0.0);
        self.alpha = 0.0;
    }
}
