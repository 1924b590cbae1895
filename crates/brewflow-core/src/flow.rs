//! The liquid-state record carried between activities.
//!
//! A [`Flow`] describes the water, wort or beer at one point of the process.
//! All quantities are absolute at that point, never deltas.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Computation status of a state node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FlowStatus {
    /// Not yet computed in the current brew run.
    #[default]
    Pending,
    /// Computed (or user input); the values can be trusted.
    Ready,
}

/// Physical properties of the liquid at one point of the process.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Flow {
    /// Volume in liters.
    pub volume: f64,
    /// Original specific gravity (1.000 = water).
    pub original_gravity: f64,
    /// Final specific gravity (equals `original_gravity` before fermentation).
    pub final_gravity: f64,
    /// Alcohol by volume in %.
    pub abv: f64,
    /// Color in EBC.
    pub color: f64,
    /// Bitterness in IBU.
    pub bitterness: f64,
    /// Dissolved CO2 in g/L.
    pub carbonation: f64,
    /// Whether this state has been computed.
    pub status: FlowStatus,
}

impl Default for Flow {
    fn default() -> Self {
        Self::water(0.0)
    }
}

impl Flow {
    /// Plain water of the given volume, pending computation.
    pub fn water(volume: f64) -> Self {
        Self {
            volume,
            original_gravity: 1.0,
            final_gravity: 1.0,
            abv: 0.0,
            color: 0.0,
            bitterness: 0.0,
            carbonation: 0.0,
            status: FlowStatus::Pending,
        }
    }

    /// Sets the volume.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// Sets both gravities (an unfermented wort).
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.original_gravity = gravity;
        self.final_gravity = gravity;
        self
    }

    /// Sets the color in EBC.
    pub fn with_color(mut self, color: f64) -> Self {
        self.color = color;
        self
    }

    /// Sets the bitterness in IBU.
    pub fn with_bitterness(mut self, bitterness: f64) -> Self {
        self.bitterness = bitterness;
        self
    }

    /// Returns `true` once the flow has been computed.
    pub fn is_ready(&self) -> bool {
        self.status == FlowStatus::Ready
    }

    /// Returns `true` if the flow has not fermented yet (`fg == og`).
    pub fn is_unfermented(&self) -> bool {
        self.final_gravity == self.original_gravity
    }

    /// Returns the same flow marked [`FlowStatus::Ready`].
    pub(crate) fn ready(mut self) -> Self {
        self.status = FlowStatus::Ready;
        self
    }

    /// Checks that every quantity is finite and physically meaningful.
    ///
    /// Transformation functions run this on their output so that no `NaN`
    /// or negative volume ever reaches a state node.
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields = [
            ("volume", self.volume),
            ("original gravity", self.original_gravity),
            ("final gravity", self.final_gravity),
            ("abv", self.abv),
            ("color", self.color),
            ("bitterness", self.bitterness),
            ("carbonation", self.carbonation),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(DomainError::NonFinite(name));
            }
        }
        if self.volume < 0.0 {
            return Err(DomainError::NegativeVolume(self.volume));
        }
        Ok(())
    }
}
