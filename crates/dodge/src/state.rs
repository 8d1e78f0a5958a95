//! Playing / game-over state machine

use std::fmt;

/// Whether the round is live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    /// Balls spawn, score runs, collisions make sound
    #[default]
    Playing,
    /// The player was hit; only a reset leaves this state
    GameOver,
}

/// Something that may move the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    /// A spawned ball touched the player
    PlayerHit,
    /// The reset key was pressed
    Reset,
    /// Any other collision or key
    Other,
}

impl GameState {
    /// State after `input`
    pub fn next(self, input: GameInput) -> Self {
        match (self, input) {
            (_, GameInput::Reset) => GameState::Playing,
            (GameState::Playing, GameInput::PlayerHit) => GameState::GameOver,
            (state, _) => state,
        }
    }

    /// Whether spawning, scoring and collision audio are active
    pub fn is_playing(self) -> bool {
        self == GameState::Playing
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::Playing => write!(f, "playing"),
            GameState::GameOver => write!(f, "game over"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_playing() {
        assert_eq!(GameState::default(), GameState::Playing);
    }

    #[test]
    fn test_hit_ends_the_round() {
        assert_eq!(GameState::Playing.next(GameInput::PlayerHit), GameState::GameOver);
        assert_eq!(GameState::Playing.next(GameInput::Other), GameState::Playing);
    }

    #[test]
    fn test_game_over_only_leaves_on_reset() {
        let state = GameState::GameOver;
        assert_eq!(state.next(GameInput::PlayerHit), GameState::GameOver);
        assert_eq!(state.next(GameInput::Other), GameState::GameOver);
        assert_eq!(state.next(GameInput::Reset), GameState::Playing);
    }

    #[test]
    fn test_reset_while_playing_keeps_playing() {
        assert_eq!(GameState::Playing.next(GameInput::Reset), GameState::Playing);
    }
}
