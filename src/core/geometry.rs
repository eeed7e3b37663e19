//! Two-receiver array geometry handed to the capture simulator

use serde::{Deserialize, Serialize};

use crate::core::constants::{DEFAULT_RECEIVER_SPACING_M, SPACING_TOLERANCE_M};
use crate::core::types::Position;
use crate::validation::data::require_positive;
use crate::validation::error::{BearingError, BearingResult};

/// Receiver pair, source position and declared receiver spacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ArrayGeometryRaw")]
pub struct ArrayGeometry {
    origin: Position,
    receivers: [Position; 2],
    target: Position,
    spacing_m: f64,
}

impl ArrayGeometry {
    /// Build a geometry from explicit receiver positions.
    ///
    /// The declared spacing must agree with the distance between the two
    /// receivers; the origin is placed at their midpoint.
    pub fn new(rx0: Position, rx1: Position, target: Position, spacing_m: f64) -> BearingResult<Self> {
        require_positive("spacing_m", spacing_m)?;

        let measured_m = rx0.distance_to(&rx1);
        if (measured_m - spacing_m).abs() > SPACING_TOLERANCE_M {
            return Err(BearingError::SpacingMismatch {
                declared_m: spacing_m,
                measured_m,
            });
        }

        let origin = Position::from((rx0.as_vector() + rx1.as_vector()) * 0.5);
        Ok(Self {
            origin,
            receivers: [rx0, rx1],
            target,
            spacing_m,
        })
    }

    /// Receivers at `(-d/2, 0)` and `(+d/2, 0)` around the origin
    pub fn symmetric(spacing_m: f64, target: Position) -> BearingResult<Self> {
        require_positive("spacing_m", spacing_m)?;
        let half = spacing_m / 2.0;
        Self::new(Position::new(-half, 0.0), Position::new(half, 0.0), target, spacing_m)
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn receivers(&self) -> &[Position; 2] {
        &self.receivers
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn spacing_m(&self) -> f64 {
        self.spacing_m
    }

    /// Bearing of the target seen from the origin, measured from broadside (+y)
    /// toward +x, in radians.
    pub fn true_bearing_rad(&self) -> f64 {
        let dx = self.target.x() - self.origin.x();
        let dy = self.target.y() - self.origin.y();
        dx.atan2(dy)
    }
}

/// Serialized form; the origin is always recomputed from the receivers
#[derive(Deserialize)]
struct ArrayGeometryRaw {
    receivers: [Position; 2],
    target: Position,
    spacing_m: f64,
}

impl TryFrom<ArrayGeometryRaw> for ArrayGeometry {
    type Error = BearingError;

    fn try_from(raw: ArrayGeometryRaw) -> BearingResult<Self> {
        let [rx0, rx1] = raw.receivers;
        Self::new(rx0, rx1, raw.target, raw.spacing_m)
    }
}

impl Default for ArrayGeometry {
    fn default() -> Self {
        let half = DEFAULT_RECEIVER_SPACING_M / 2.0;
        Self {
            origin: Position::origin(),
            receivers: [Position::new(-half, 0.0), Position::new(half, 0.0)],
            target: Position::new(0.70, 0.25),
            spacing_m: DEFAULT_RECEIVER_SPACING_M,
        }
    }
}
