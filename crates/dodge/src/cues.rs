//! Collision sound selection
//!
//! A collision plays one percussive sample and one note. Which ones is a pure
//! function of the score tier and two independent uniform draws in `[0, 1)`,
//! so the random source stays with the caller.

use crate::config::{TierSound, TierTable};
use pose_engine::audio::Voice;

/// Score band that picks the note pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScoreTier {
    /// Below the mid threshold
    Low,
    /// Between the mid and high thresholds
    Mid,
    /// At or above the high threshold
    High,
}

impl ScoreTier {
    /// Tier a score falls in
    pub fn for_score(score: u32, tiers: &TierTable) -> Self {
        if score >= tiers.high_from {
            ScoreTier::High
        } else if score >= tiers.mid_from {
            ScoreTier::Mid
        } else {
            ScoreTier::Low
        }
    }

    /// This tier's voice and notes
    pub fn sound(self, tiers: &TierTable) -> &TierSound {
        match self {
            ScoreTier::Low => &tiers.low,
            ScoreTier::Mid => &tiers.mid,
            ScoreTier::High => &tiers.high,
        }
    }
}

/// Sounds chosen for one collision
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    /// Tier the note came from
    pub tier: ScoreTier,
    /// Sample name; `None` when the sample set is empty
    pub sample: Option<String>,
    /// Note name; `None` when the tier's pool is empty
    pub note: Option<String>,
    /// Voice the note is played with
    pub voice: Voice,
}

/// Pick the sample and note for a collision
pub fn select_cue(tiers: &TierTable, samples: &[String], tier: ScoreTier, sample_draw: f32, note_draw: f32) -> Cue {
    let sound = tier.sound(tiers);
    Cue {
        tier,
        sample: pick(samples, sample_draw).cloned(),
        note: pick(&sound.notes, note_draw).cloned(),
        voice: sound.voice,
    }
}

fn pick<T>(pool: &[T], draw: f32) -> Option<&T> {
    if pool.is_empty() {
        return None;
    }
    let draw = if draw.is_finite() { draw.clamp(0.0, 1.0) } else { 0.0 };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let index = (draw * pool.len() as f32) as usize;
    pool.get(index.min(pool.len() - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<String> {
        vec!["kick".to_string(), "snare".to_string(), "hihat".to_string()]
    }

    #[test]
    fn test_tier_boundaries() {
        let tiers = TierTable::default();
        assert_eq!(ScoreTier::for_score(0, &tiers), ScoreTier::Low);
        assert_eq!(ScoreTier::for_score(2, &tiers), ScoreTier::Low);
        assert_eq!(ScoreTier::for_score(3, &tiers), ScoreTier::Mid);
        assert_eq!(ScoreTier::for_score(5, &tiers), ScoreTier::Mid);
        assert_eq!(ScoreTier::for_score(6, &tiers), ScoreTier::High);
        assert_eq!(ScoreTier::for_score(1000, &tiers), ScoreTier::High);
    }

    #[test]
    fn test_mid_tier_uses_mid_pool_and_voice() {
        let tiers = TierTable::default();
        let tier = ScoreTier::for_score(3, &tiers);
        for step in 0..10 {
            let draw = step as f32 / 10.0;
            let cue = select_cue(&tiers, &samples(), tier, draw, draw);
            assert_eq!(cue.voice, Voice::Lead);
            let note = cue.note.unwrap();
            assert!(tiers.mid.notes.contains(&note));
            assert!(!tiers.low.notes.contains(&note));
            assert!(!tiers.high.notes.contains(&note));
        }
    }

    #[test]
    fn test_draws_cover_the_pool() {
        let tiers = TierTable::default();
        assert_eq!(select_cue(&tiers, &samples(), ScoreTier::Low, 0.0, 0.0).sample.as_deref(), Some("kick"));
        assert_eq!(select_cue(&tiers, &samples(), ScoreTier::Low, 0.5, 0.0).sample.as_deref(), Some("snare"));
        assert_eq!(select_cue(&tiers, &samples(), ScoreTier::Low, 0.999, 0.0).sample.as_deref(), Some("hihat"));
        assert_eq!(select_cue(&tiers, &samples(), ScoreTier::High, 0.0, 0.999).note.as_deref(), Some("D6"));
    }

    #[test]
    fn test_same_draws_same_cue() {
        let tiers = TierTable::default();
        let first = select_cue(&tiers, &samples(), ScoreTier::High, 0.42, 0.17);
        let second = select_cue(&tiers, &samples(), ScoreTier::High, 0.42, 0.17);
        assert_eq!(first, second);
    }

    #[test]
    fn test_out_of_range_draws_are_clamped() {
        let tiers = TierTable::default();
        let cue = select_cue(&tiers, &samples(), ScoreTier::Low, 1.5, f32::NAN);
        assert_eq!(cue.sample.as_deref(), Some("hihat"));
        assert_eq!(cue.note.as_deref(), Some("C3"));
    }

    #[test]
    fn test_empty_pools_give_nothing() {
        let mut tiers = TierTable::default();
        tiers.low.notes.clear();
        let cue = select_cue(&tiers, &[], ScoreTier::Low, 0.3, 0.3);
        assert_eq!(cue.sample, None);
        assert_eq!(cue.note, None);
        assert_eq!(cue.voice, Voice::Bass);
    }
}
