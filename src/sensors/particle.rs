// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! Particle classification

use serde::{Deserialize, Serialize};

/// Default monitored particle label (carbon monoxide)
pub const DEFAULT_TARGET_LABEL: &str = "CO";

/// Report name of the catch-all bucket
pub const OTHER_LABEL: &str = "other";

/// Counting bucket for a detected particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleClass {
    /// The monitored particle
    Target,
    /// Everything else, including unrecognized labels
    Other,
}

impl ParticleClass {
    /// Classify a raw detection label.
    ///
    /// Only an exact case-insensitive match of the target label counts as
    /// [`ParticleClass::Target`]. Surrounding whitespace is significant.
    pub fn classify(raw: &str, target_label: &str) -> Self {
        if raw.eq_ignore_ascii_case(target_label) {
            ParticleClass::Target
        } else {
            ParticleClass::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_target_case_insensitive() {
        assert_eq!(ParticleClass::classify("CO", "CO"), ParticleClass::Target);
        assert_eq!(ParticleClass::classify("co", "CO"), ParticleClass::Target);
        assert_eq!(ParticleClass::classify("cO", "co"), ParticleClass::Target);
    }

    #[test]
    fn test_classify_everything_else_as_other() {
        assert_eq!(ParticleClass::classify("O2", "CO"), ParticleClass::Other);
        assert_eq!(ParticleClass::classify("", "CO"), ParticleClass::Other);
        assert_eq!(ParticleClass::classify("CO2", "CO"), ParticleClass::Other);
        assert_eq!(ParticleClass::classify(" CO", "CO"), ParticleClass::Other);
        assert_eq!(ParticleClass::classify("\u{fffd}", "CO"), ParticleClass::Other);
    }
}
