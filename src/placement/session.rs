//! Draft placement edited during one placement session

use super::geo::{GeoBounds, GeographicPlacement};
use crate::error::PlacementError;

/// Whether the user confirmed an action that overwrites manual edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Unconfirmed,
}

/// Result of [`PlacementSession::apply_known_scale`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleOutcome {
    /// The draft was resized
    Applied,
    /// The draft holds manual edits; nothing changed until confirmed
    NeedsConfirmation,
}

/// A draft copy of a placement plus whether the user moved, resized, or
/// rotated it since the session began.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSession {
    draft: GeographicPlacement,
    transformed: bool,
}

impl PlacementSession {
    /// Start a session from the persisted placement
    pub fn new(placement: &GeographicPlacement) -> Self {
        PlacementSession {
            draft: *placement,
            transformed: false,
        }
    }

    pub fn draft(&self) -> &GeographicPlacement {
        &self.draft
    }

    /// Whether a manual edit happened in this session
    pub fn is_transformed(&self) -> bool {
        self.transformed
    }

    /// Free-form move/resize (drag handles)
    pub fn set_bounds(&mut self, bounds: GeoBounds) {
        self.draft.bounds = bounds;
        self.transformed = true;
    }

    /// Move the draft by a delta in degrees
    pub fn translate(&mut self, d_lat: f64, d_lng: f64) -> Result<(), PlacementError> {
        self.draft.bounds = self.draft.bounds.translated(d_lat, d_lng)?;
        self.transformed = true;
        Ok(())
    }

    /// Rotate by `delta` degrees clockwise. The total is kept as is, so
    /// two half turns read 360, not 0.
    pub fn rotate_by(&mut self, delta: f64) {
        self.draft.rotation += delta;
        self.transformed = true;
    }

    /// Resize the draft so one drawing unit spans `meters_per_unit` meters,
    /// keeping its current center.
    ///
    /// After a manual edit this needs [`Confirmation::Confirmed`]; without
    /// it the draft is left untouched and `NeedsConfirmation` is returned.
    pub fn apply_known_scale(
        &mut self,
        meters_per_unit: f64,
        confirmation: Confirmation,
    ) -> Result<ScaleOutcome, PlacementError> {
        if !meters_per_unit.is_finite() || meters_per_unit <= 0.0 {
            return Err(PlacementError::InvalidFactor(meters_per_unit));
        }
        if self.transformed && confirmation == Confirmation::Unconfirmed {
            tracing::debug!(meters_per_unit, "known scale held for confirmation");
            return Ok(ScaleOutcome::NeedsConfirmation);
        }

        let width_m = self.draft.intrinsic_width * meters_per_unit;
        let height_m = self.draft.intrinsic_height * meters_per_unit;
        self.draft.bounds = GeoBounds::from_center_size(self.draft.bounds.center(), width_m, height_m)?;
        tracing::debug!(meters_per_unit, width_m, height_m, "known scale applied");
        Ok(ScaleOutcome::Applied)
    }

    pub fn into_draft(self) -> GeographicPlacement {
        self.draft
    }
}
