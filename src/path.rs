//! The traversable range the camera travels along.
//!
//! Progress is a single scalar: the camera's coordinate on the configured axis.
//! Both the dolly and the caption dispatcher read it through [`PathSettings`].

use bevy::prelude::*;

use crate::error::ConfigError;

/// World axis the camera travels along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
#[cfg_attr(feature = "native", derive(clap::ValueEnum))]
pub enum PathAxis {
    /// Travel along world X.
    #[default]
    X,
    /// Travel along world Z.
    Z,
}

/// Which way along the axis the camera moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum TravelDirection {
    /// From `start` towards `end`.
    #[default]
    Ascending,
    /// From `end` towards `start`.
    Descending,
}

/// Axis, bounds and direction of the camera path.
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct PathSettings {
    /// Travel axis.
    pub axis: PathAxis,
    /// Lower bound of the path on the axis.
    pub start: f32,
    /// Upper bound of the path on the axis.
    pub end: f32,
    /// Travel direction between the bounds.
    pub direction: TravelDirection,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            axis: PathAxis::X,
            start: -100.0,
            end: 200.0,
            direction: TravelDirection::Ascending,
        }
    }
}

impl PathSettings {
    /// Rejects non-finite bounds or length, and paths where `end <= start`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.length().is_finite() || self.end <= self.start {
            return Err(ConfigError::InvalidPath {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Progress value the camera starts at.
    pub fn origin(&self) -> f32 {
        match self.direction {
            TravelDirection::Ascending => self.start,
            TravelDirection::Descending => self.end,
        }
    }

    /// Progress value at which the path is complete.
    pub fn destination(&self) -> f32 {
        match self.direction {
            TravelDirection::Ascending => self.end,
            TravelDirection::Descending => self.start,
        }
    }

    /// Distance between the bounds.
    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    /// `1.0` when progress grows during travel, `-1.0` when it shrinks.
    pub fn sign(&self) -> f32 {
        match self.direction {
            TravelDirection::Ascending => 1.0,
            TravelDirection::Descending => -1.0,
        }
    }

    /// Whether `progress` lies within `[start, end]`.
    pub fn contains(&self, progress: f32) -> bool {
        (self.start..=self.end).contains(&progress)
    }

    /// Whether `progress` has reached or passed the destination.
    pub fn reached_end(&self, progress: f32) -> bool {
        match self.direction {
            TravelDirection::Ascending => progress >= self.end,
            TravelDirection::Descending => progress <= self.start,
        }
    }

    /// Reads progress from a world position.
    pub fn progress(&self, translation: Vec3) -> f32 {
        match self.axis {
            PathAxis::X => translation.x,
            PathAxis::Z => translation.z,
        }
    }

    /// Returns `translation` with its path coordinate replaced by `progress`.
    pub fn place(&self, translation: Vec3, progress: f32) -> Vec3 {
        match self.axis {
            PathAxis::X => translation.with_x(progress),
            PathAxis::Z => translation.with_z(progress),
        }
    }

    /// Unit vector pointing in the travel direction.
    pub fn heading(&self) -> Vec3 {
        let axis = match self.axis {
            PathAxis::X => Vec3::X,
            PathAxis::Z => Vec3::Z,
        };
        axis * self.sign()
    }

    /// Unit vector across the path on the ground plane.
    pub fn lateral(&self) -> Vec3 {
        match self.axis {
            PathAxis::X => Vec3::Z,
            PathAxis::Z => Vec3::X,
        }
    }

    /// Moves `progress` by `distance` towards the destination, never past it.
    pub fn advance(&self, progress: f32, distance: f32) -> f32 {
        let next = progress + distance * self.sign();
        match self.direction {
            TravelDirection::Ascending => next.min(self.end),
            TravelDirection::Descending => next.max(self.start),
        }
    }
}
