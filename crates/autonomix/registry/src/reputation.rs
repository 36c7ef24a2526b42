//! Clamped reputation arithmetic

use crate::error::{RegistryError, Result};
use autonomix_types::{Reputation, ReputationDelta};

/// Apply a signed delta to a non-negative score.
///
/// `ReputationDelta::MIN` is rejected before any arithmetic. Negative deltas
/// saturate at zero; positive deltas saturate at `Reputation::MAX`.
pub fn apply_delta(current: Reputation, delta: ReputationDelta) -> Result<Reputation> {
    if delta == ReputationDelta::MIN {
        return Err(RegistryError::InvalidDeltaMin);
    }

    if delta >= 0 {
        // delta is non-negative here, so the cast is lossless
        Ok(current.saturating_add(delta as Reputation))
    } else {
        let magnitude = delta.unsigned_abs();
        Ok(current - current.min(magnitude))
    }
}
