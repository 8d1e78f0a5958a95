//! Output levels
//!
//! Samples and synthesized notes each have a level, scaled by a master level.

use serde::{Deserialize, Serialize};

/// Which level a cue is played at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeGroup {
    /// Scales every other group
    Master,
    /// Percussive samples
    Samples,
    /// Synthesized notes
    Voices,
}

impl VolumeGroup {
    fn slot(self) -> usize {
        match self {
            VolumeGroup::Master => 0,
            VolumeGroup::Samples => 1,
            VolumeGroup::Voices => 2,
        }
    }
}

/// Per-group levels in `[0, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct MixerSystem {
    levels: [f32; 3],
}

impl MixerSystem {
    /// Full master and samples; notes sit lower so they do not mask the hits
    pub fn new() -> Self {
        Self {
            levels: [1.0, 1.0, 0.6],
        }
    }

    /// Set a group's level; out-of-range values are clamped and NaN reads as silence
    pub fn set_level(&mut self, group: VolumeGroup, level: f32) {
        self.levels[group.slot()] = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
    }

    /// A group's own level
    pub fn level(&self, group: VolumeGroup) -> f32 {
        self.levels[group.slot()]
    }

    /// Level a cue in `group` is actually played at
    pub fn effective_level(&self, group: VolumeGroup) -> f32 {
        match group {
            VolumeGroup::Master => self.level(VolumeGroup::Master),
            _ => self.level(group) * self.level(VolumeGroup::Master),
        }
    }
}

impl Default for MixerSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_notes_start_below_samples() {
        let mixer = MixerSystem::new();
        assert_eq!(mixer.effective_level(VolumeGroup::Samples), 1.0);
        assert_relative_eq!(mixer.effective_level(VolumeGroup::Voices), 0.6);
    }

    #[test]
    fn test_levels_are_clamped() {
        let mut mixer = MixerSystem::new();
        mixer.set_level(VolumeGroup::Samples, 2.0);
        assert_eq!(mixer.level(VolumeGroup::Samples), 1.0);

        mixer.set_level(VolumeGroup::Samples, -0.5);
        assert_eq!(mixer.level(VolumeGroup::Samples), 0.0);

        mixer.set_level(VolumeGroup::Voices, f32::NAN);
        assert_eq!(mixer.level(VolumeGroup::Voices), 0.0);
    }

    #[test]
    fn test_master_scales_groups() {
        let mut mixer = MixerSystem::new();
        mixer.set_level(VolumeGroup::Master, 0.5);
        mixer.set_level(VolumeGroup::Voices, 0.8);

        assert_relative_eq!(mixer.effective_level(VolumeGroup::Voices), 0.4);
        assert_relative_eq!(mixer.effective_level(VolumeGroup::Samples), 0.5);
    }

    #[test]
    fn test_zero_master_silences_everything() {
        let mut mixer = MixerSystem::new();
        mixer.set_level(VolumeGroup::Master, 0.0);

        assert_eq!(mixer.effective_level(VolumeGroup::Samples), 0.0);
        assert_eq!(mixer.effective_level(VolumeGroup::Voices), 0.0);
    }
}
