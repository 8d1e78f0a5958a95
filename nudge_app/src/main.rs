//! Wrist nudge demo
//!
//! One box you push around the play volume with your wrists, and a ball to
//! knock about. Run with an optional session config:
//! `wrist_nudge [session.toml|session.ron]`

use pose_engine::foundation::logging;
use pose_engine::prelude::*;
use std::path::PathBuf;

const BALL_COLOR: Color = [0.2, 0.6, 0.9];

/// The box and the free ball
#[derive(Default)]
struct NudgeDemo {
    ball: Option<BodyHandle>,
    knocks: u32,
    player_position: Vec3,
}

impl Application for NudgeDemo {
    fn initialize(&mut self, session: &mut Session) -> Result<(), AppError> {
        let ball = session.add_prop(&arena::free_ball(), BALL_COLOR);
        self.ball = Some(ball.body);
        log::info!("Nudge demo ready, move your wrists to push the box");
        Ok(())
    }

    fn update(&mut self, session: &mut Session, contacts: &[Contact], _delta_time: f32) -> Result<(), AppError> {
        let knocked = contacts
            .iter()
            .filter(|contact| contact.is_between(Material::Player, Material::Ball))
            .count();
        if knocked > 0 {
            self.knocks += u32::try_from(knocked).unwrap_or(u32::MAX);
            log::debug!("Ball knocked ({} so far)", self.knocks);
        }

        self.player_position = session.world.translation(session.controllable().body)?;
        Ok(())
    }

    fn status(&self) -> Option<String> {
        let p = self.player_position;
        Some(format!("Box at ({:.1}, {:.1}, {:.1}), {} knocks", p.x, p.y, p.z, self.knocks))
    }

    fn cleanup(&mut self, _session: &mut Session) {
        log::info!("Ball knocked {} times", self.knocks);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::install_panic_hook();
    logging::init();

    log::info!("Starting wrist nudge demo...");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = SessionConfig::load_or_default(config_path.as_deref())?;

    let presenter = create_presenter(&config.presentation)?;
    let mut cameras = config.video.camera_provider();
    let loader = config.detection.pose_loader()?;

    let mut engine = Engine::start(config, cameras.as_mut(), loader, presenter)?;
    engine.run(&mut NudgeDemo::default())?;

    log::info!("Wrist nudge demo finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_adds_the_ball() {
        let mut session = Session::new(SessionConfig::default());
        let mut demo = NudgeDemo::default();
        demo.initialize(&mut session).unwrap();

        let ball = demo.ball.unwrap();
        assert_eq!(session.world.material(ball), Some(Material::Ball));
        assert!(!session.is_spawned(ball));
        assert_eq!(session.world.body_count(), 8);
    }

    #[test]
    fn test_counts_knocks() {
        let mut session = Session::new(SessionConfig::default());
        let mut demo = NudgeDemo::default();
        demo.initialize(&mut session).unwrap();
        let knock = Contact {
            body_a: session.controllable().body,
            material_a: Material::Player,
            body_b: demo.ball.unwrap(),
            material_b: Material::Ball,
        };

        demo.update(&mut session, &[knock, knock], 0.0).unwrap();

        assert_eq!(demo.knocks, 2);
        assert!(demo.status().unwrap().ends_with("2 knocks"));
    }
}
