//! The dodge game
//!
//! Balls drop into the play volume on a timer and roll towards the player.
//! Every tick scores a point while the round is live; the first ball to
//! touch the player ends it. Ball collisions ring out a sample and a note
//! whose pool climbs with the score.

use crate::config::{DodgeConfig, GameConfig};
use crate::cues::{select_cue, Cue, ScoreTier};
use crate::state::{GameInput, GameState};
use pose_engine::audio::{create_backend, AudioSystem, VolumeGroup};
use pose_engine::config::ConfigError;
use pose_engine::foundation::math::Vec3;
use pose_engine::foundation::time::IntervalTimer;
use pose_engine::physics::{arena, Contact, Material};
use pose_engine::scene::{BodyPair, Color};
use pose_engine::{AppError, AppEvent, Application, Session};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Game state and the resources it drives
pub struct DodgeGame {
    game: GameConfig,
    audio: AudioSystem,
    note_duration: Duration,
    sample_duration: Duration,
    rng: StdRng,
    spawn_timer: IntervalTimer,
    score: u32,
    state: GameState,
    last_cue: Option<Cue>,
}

impl DodgeGame {
    /// Create the game with the configured audio output
    pub fn new(config: &DodgeConfig) -> Result<Self, ConfigError> {
        let backend = create_backend(&config.audio.backend);
        let audio = AudioSystem::new(backend, config.audio.sample_dir.clone());
        Self::with_audio(config, audio)
    }

    /// Create the game around an existing audio system
    ///
    /// Rejects game settings that spawning cannot use, such as a negative
    /// spawn extent.
    pub fn with_audio(config: &DodgeConfig, mut audio: AudioSystem) -> Result<Self, ConfigError> {
        config.game.validate()?;

        let mixer = audio.mixer_mut();
        mixer.set_level(VolumeGroup::Master, config.audio.master_volume);
        mixer.set_level(VolumeGroup::Samples, config.audio.sample_volume);
        mixer.set_level(VolumeGroup::Voices, config.audio.voice_volume);

        let rng = match config.game.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            game: config.game.clone(),
            audio,
            note_duration: config.audio.note_duration(),
            sample_duration: config.audio.sample_duration(),
            rng,
            spawn_timer: IntervalTimer::new(config.game.spawn_interval),
            score: 0,
            state: GameState::Playing,
            last_cue: None,
        })
    }

    /// Current score
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current state
    pub fn state(&self) -> GameState {
        self.state
    }

    /// The sounds chosen for the most recent live collision
    pub fn last_cue(&self) -> Option<&Cue> {
        self.last_cue.as_ref()
    }

    /// Collision audio
    pub fn audio(&self) -> &AudioSystem {
        &self.audio
    }

    /// Clear every spawned ball, zero the score and start a new round with one ball
    pub fn reset(&mut self, session: &mut Session) -> Result<(), AppError> {
        let cleared = session.clear_spawned()?;
        self.score = 0;
        self.state = self.state.next(GameInput::Reset);
        self.spawn_timer.restart();
        self.last_cue = None;
        self.spawn_ball(session)?;
        log::info!("Round started, cleared {} balls", cleared);
        Ok(())
    }

    fn spawn_ball(&mut self, session: &mut Session) -> Result<BodyPair, AppError> {
        let [extent_x, extent_z] = self.game.spawn_extent;
        let position = Vec3::new(
            self.rng.gen_range(-extent_x..=extent_x),
            self.game.spawn_height,
            self.rng.gen_range(-extent_z..=extent_z),
        );

        let target = session.world.translation(session.controllable().body)?;
        let mut heading = target - position;
        heading.y = 0.0;
        let velocity = if heading.norm() > f32::EPSILON {
            heading.normalize() * self.game.launch_speed
        } else {
            Vec3::zeros()
        };

        let color: Color = [
            self.rng.gen_range(0.2..1.0),
            self.rng.gen_range(0.2..1.0),
            self.rng.gen_range(0.2..1.0),
        ];
        let pair = session.spawn(&arena::ball(position).with_linear_velocity(velocity), color);
        log::info!("Spawned ball at ({:.1}, {:.1}, {:.1})", position.x, position.y, position.z);
        Ok(pair)
    }

    fn handle_contacts(&mut self, session: &Session, contacts: &[Contact]) {
        for contact in contacts {
            if !self.state.is_playing() {
                break;
            }
            let Some(touched) = spawned_ball_touching(session, contact) else {
                continue;
            };

            self.play_collision_cue();

            let input = if touched == Material::Player {
                GameInput::PlayerHit
            } else {
                GameInput::Other
            };
            self.state = self.state.next(input);
            if !self.state.is_playing() {
                log::info!("Game over with score {}", self.score);
            }
        }
    }

    fn play_collision_cue(&mut self) {
        let tier = ScoreTier::for_score(self.score, &self.game.tiers);
        let sample_draw: f32 = self.rng.gen();
        let note_draw: f32 = self.rng.gen();
        let cue = select_cue(&self.game.tiers, &self.game.samples, tier, sample_draw, note_draw);
        log::debug!("Collision cue {:?}", cue);

        if let Some(sample) = &cue.sample {
            self.audio.play_sample(sample, Some(self.sample_duration));
        }
        if let Some(note) = &cue.note {
            self.audio.play_note(cue.voice, note, self.note_duration);
        }
        self.last_cue = Some(cue);
    }
}

/// What a tracked spawned ball in `contact` touched, if one is involved
fn spawned_ball_touching(session: &Session, contact: &Contact) -> Option<Material> {
    [
        (contact.body_a, contact.material_a, contact.material_b),
        (contact.body_b, contact.material_b, contact.material_a),
    ]
    .into_iter()
    .find(|&(body, material, _)| material == Material::Ball && session.is_spawned(body))
    .map(|(_, _, other)| other)
}

impl Application for DodgeGame {
    fn initialize(&mut self, session: &mut Session) -> Result<(), AppError> {
        log::info!("Dodge starting, reset with {:?}", self.game.reset_key);
        self.reset(session)
    }

    fn update(&mut self, session: &mut Session, contacts: &[Contact], delta_time: f32) -> Result<(), AppError> {
        self.handle_contacts(session, contacts);

        // The timer runs in both states; only a live round spawns and scores
        let fired = self.spawn_timer.tick(delta_time);
        if self.state.is_playing() {
            for _ in 0..fired {
                self.spawn_ball(session)?;
                self.score += 1;
            }
        }

        self.audio.update();
        Ok(())
    }

    fn handle_event(&mut self, session: &mut Session, event: &AppEvent) -> Result<(), AppError> {
        match event {
            AppEvent::KeyPressed(key) if *key == self.game.reset_key => self.reset(session),
            _ => Ok(()),
        }
    }

    fn status(&self) -> Option<String> {
        Some(match self.state {
            GameState::Playing => format!("Score: {}", self.score),
            GameState::GameOver => format!("Score: {} | Game over, press {:?} to restart", self.score, self.game.reset_key),
        })
    }

    fn cleanup(&mut self, _session: &mut Session) {
        log::info!("Final score: {}", self.score);
        self.audio.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_engine::core::SessionConfig;
    use pose_engine::input::KeyCode;
    use pose_engine::physics::BodyHandle;

    fn config() -> DodgeConfig {
        let mut config = DodgeConfig::default();
        config.game.seed = Some(7);
        config
    }

    fn started() -> (DodgeGame, Session) {
        let config = config();
        let mut session = Session::new(SessionConfig::default());
        let mut game = DodgeGame::with_audio(&config, AudioSystem::silent()).unwrap();
        game.initialize(&mut session).unwrap();
        (game, session)
    }

    fn contact(body_a: BodyHandle, material_a: Material, body_b: BodyHandle, material_b: Material) -> Contact {
        Contact {
            body_a,
            material_a,
            body_b,
            material_b,
        }
    }

    #[test]
    fn test_initialize_starts_a_round() {
        let (game, session) = started();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(session.spawned().len(), 1);
        assert_eq!(game.status().as_deref(), Some("Score: 0"));
    }

    #[test]
    fn test_rejects_unusable_spawn_settings() {
        let mut config = config();
        config.game.spawn_extent = [-1.0, 5.0];
        assert!(matches!(
            DodgeGame::with_audio(&config, AudioSystem::silent()),
            Err(ConfigError::Invalid { field: "game.spawn_extent", .. })
        ));
    }

    #[test]
    fn test_configured_levels_reach_the_mixer() {
        let mut config = config();
        config.audio.master_volume = 0.5;
        config.audio.voice_volume = 0.4;
        let game = DodgeGame::with_audio(&config, AudioSystem::silent()).unwrap();

        let mixer = game.audio().mixer();
        assert_eq!(mixer.effective_level(VolumeGroup::Samples), 0.5);
        assert_eq!(mixer.effective_level(VolumeGroup::Voices), 0.2);
    }

    #[test]
    fn test_spawn_is_inside_the_volume() {
        let (_game, session) = started();
        let ball = session.spawned()[0].body;
        let position = session.world.translation(ball).unwrap();
        assert!(position.x.abs() <= 17.0);
        assert!(position.z.abs() <= 7.0);
        assert_eq!(position.y, 6.0);
    }

    #[test]
    fn test_timer_spawns_and_scores() {
        let (mut game, mut session) = started();
        game.update(&mut session, &[], 1.0).unwrap();
        assert_eq!(game.score(), 0);
        game.update(&mut session, &[], 1.0).unwrap();
        assert_eq!(game.score(), 1);
        assert_eq!(session.spawned().len(), 2);
    }

    #[test]
    fn test_ball_hitting_wall_plays_but_keeps_round() {
        let (mut game, mut session) = started();
        let ball = session.spawned()[0].body;
        let wall = session.body_pairs().nth(1).unwrap().body;
        assert_eq!(session.world.material(wall), Some(Material::Wall));
        let hit = contact(ball, Material::Ball, wall, Material::Wall);

        game.update(&mut session, &[hit], 0.0).unwrap();

        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.audio().cues_played(), 2);
        assert_eq!(game.last_cue().unwrap().tier, ScoreTier::Low);
    }

    #[test]
    fn test_untracked_ball_is_ignored() {
        let (mut game, mut session) = started();
        let free = session.add_prop(&arena::free_ball(), [1.0, 1.0, 1.0]).body;
        let player = session.controllable().body;

        game.update(&mut session, &[contact(player, Material::Player, free, Material::Ball)], 0.0).unwrap();

        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.audio().cues_played(), 0);
    }

    #[test]
    fn test_reset_key_restarts() {
        let (mut game, mut session) = started();
        let ball = session.spawned()[0].body;
        let player = session.controllable().body;
        game.update(&mut session, &[contact(ball, Material::Ball, player, Material::Player)], 0.0).unwrap();
        assert_eq!(game.state(), GameState::GameOver);
        assert!(game.status().unwrap().contains("Game over"));

        game.handle_event(&mut session, &AppEvent::KeyPressed(KeyCode::Space)).unwrap();
        assert_eq!(game.state(), GameState::GameOver);

        game.handle_event(&mut session, &AppEvent::KeyPressed(KeyCode::R)).unwrap();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(session.spawned().len(), 1);
        assert!(!session.is_spawned(ball));
    }
}
