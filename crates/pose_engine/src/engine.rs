//! Core engine implementation
//!
//! The frame loop. One iteration:
//!
//! 1. handle input (quit, model and algorithm keys, then the application)
//! 2. swap the pose model if the architecture changed
//! 3. grab a frame and estimate poses (blocking)
//! 4. in single-pose mode, map the first pose to a control signal and apply it
//! 5. step physics once and hand new contacts to the application
//! 6. copy body poses into renderables
//! 7. draw the scene and pose overlay, then wait for the next refresh

use crate::application::{AppError, AppEvent, Application};
use crate::camera::{is_mobile, Camera, CameraError, CameraProvider, VideoConstraints, VideoFrame, CAMERA_UNAVAILABLE_MESSAGE};
use crate::config::ConfigError;
use crate::core::SessionConfig;
use crate::foundation::time::{IntervalTimer, Timer};
use crate::input::KeyCode;
use crate::physics::PhysicsError;
use crate::control::ControlSignal;
use crate::pose::{Algorithm, ModelArchitecture, ModelSlot, Pose, PoseError, PoseModelLoader};
use crate::present::{FrameView, Overlay, PresentError, Presenter};
use crate::session::Session;
use thiserror::Error;

/// Seconds between frame-rate log lines
const FPS_LOG_PERIOD: f32 = 5.0;

/// Main engine struct
///
/// Owns the session and every external capability the loop drives.
pub struct Engine {
    session: Session,
    camera: Box<dyn Camera>,
    loader: Box<dyn PoseModelLoader>,
    model: ModelSlot,
    presenter: Box<dyn Presenter>,

    /// Poses from the most recent frame
    poses: Vec<Pose>,

    /// Frame timing
    timer: Timer,
    fps_log: IntervalTimer,

    /// Whether the loop should continue running
    running: bool,
}

impl Engine {
    /// Load the pose model and open the camera
    ///
    /// A camera that cannot be opened is fatal: the user is told through the
    /// presenter and the error is returned, so the loop never starts.
    pub fn start(
        config: SessionConfig,
        cameras: &mut dyn CameraProvider,
        mut loader: Box<dyn PoseModelLoader>,
        mut presenter: Box<dyn Presenter>,
    ) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");
        config.validate()?;

        let model = ModelSlot::load(loader.as_mut(), config.detection.architecture)?;

        let constraints = VideoConstraints::user_facing(config.video.width, config.video.height, is_mobile());
        let camera = match cameras.open(&constraints) {
            Ok(camera) => camera,
            Err(e) => {
                log::error!("{}", e);
                presenter.show_message(CAMERA_UNAVAILABLE_MESSAGE);
                return Err(EngineError::Camera(e));
            }
        };
        let (width, height) = camera.size();
        log::info!("Camera opened at {}x{}", width, height);

        Ok(Self {
            session: Session::new(config),
            camera,
            loader,
            model,
            presenter,
            poses: Vec::new(),
            timer: Timer::new(),
            fps_log: IntervalTimer::new(FPS_LOG_PERIOD),
            running: true,
        })
    }

    /// Run the loop until quit, then clean up the application
    pub fn run<A: Application>(&mut self, app: &mut A) -> Result<(), EngineError> {
        self.initialize(app)?;

        log::info!("Starting main loop...");
        let result = self.run_frames(app);

        app.cleanup(&mut self.session);
        log::info!("Engine shutdown complete");
        result
    }

    fn run_frames<A: Application>(&mut self, app: &mut A) -> Result<(), EngineError> {
        while self.running {
            self.frame(app)?;
        }
        Ok(())
    }

    /// Let the application set up its bodies
    pub fn initialize<A: Application>(&mut self, app: &mut A) -> Result<(), EngineError> {
        app.initialize(&mut self.session)?;
        self.session.sync_transforms();
        Ok(())
    }

    /// Run one loop iteration
    pub fn frame<A: Application>(&mut self, app: &mut A) -> Result<(), EngineError> {
        self.timer.update();

        for event in self.presenter.poll_events() {
            self.handle_event(app, event)?;
        }
        if !self.running {
            return Ok(());
        }

        self.reload_model()?;

        let frame = self.capture();
        self.poses = match frame.as_ref() {
            Some(frame) => self.estimate(frame),
            None => Vec::new(),
        };

        // Multi-pose detection only feeds the overlay; it never steers the body
        let signal = match self.session.config.detection.algorithm {
            Algorithm::SinglePose => self.session.mapper().map(&self.poses),
            Algorithm::MultiPose => ControlSignal::ZERO,
        };
        log::trace!("Control signal {:?} from {} poses", signal, self.poses.len());
        app.control(&mut self.session, signal)?;

        self.session.world.step();
        let contacts = self.session.world.new_contacts().to_vec();
        let delta_time = self.session.world.timestep();
        app.update(&mut self.session, &contacts, delta_time)?;

        self.session.sync_transforms();
        self.draw(app, frame.as_ref())?;

        if self.fps_log.tick(self.timer.delta_time()) > 0 {
            log::debug!("{:.1} fps over {} frames", self.timer.average_fps(), self.timer.frame_count());
        }
        Ok(())
    }

    fn handle_event<A: Application>(&mut self, app: &mut A, event: AppEvent) -> Result<(), EngineError> {
        match event {
            AppEvent::CloseRequested | AppEvent::KeyPressed(KeyCode::Escape) => self.quit(),
            AppEvent::KeyPressed(KeyCode::M) => {
                let detection = &mut self.session.config.detection;
                detection.algorithm = detection.algorithm.toggled();
                log::info!("Pose algorithm: {:?}", detection.algorithm);
            }
            AppEvent::KeyPressed(key) => {
                if let Some(architecture) = architecture_for_key(key) {
                    self.session.config.detection.architecture = architecture;
                }
            }
        }
        app.handle_event(&mut self.session, &event)?;
        Ok(())
    }

    fn reload_model(&mut self) -> Result<(), EngineError> {
        let wanted = self.session.config.detection.architecture;
        if wanted == self.model.architecture() {
            return Ok(());
        }

        self.model.switch_to(self.loader.as_mut(), wanted)?;
        // After a fallback the settings follow the model that is actually live
        self.session.config.detection.architecture = self.model.architecture();
        Ok(())
    }

    fn capture(&mut self) -> Option<VideoFrame> {
        match self.camera.next_frame() {
            Ok(frame) => Some(frame),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }

    fn estimate(&mut self, frame: &VideoFrame) -> Vec<Pose> {
        let options = self.session.config.detection.estimate_options();
        self.model.estimate(frame, &options).unwrap_or_else(|e| {
            log::warn!("Pose estimation failed: {}", e);
            Vec::new()
        })
    }

    fn draw<A: Application>(&mut self, app: &A, frame: Option<&VideoFrame>) -> Result<(), EngineError> {
        let detection = &self.session.config.detection;
        let (min_pose, min_part) = detection.confidence_thresholds();
        let overlay = Overlay::build(
            &self.poses,
            min_pose,
            min_part,
            detection.overlay_flags(),
            detection.flip_horizontal,
        );

        if let Some(status) = app.status() {
            self.presenter.set_status(&status);
        }
        self.presenter.present(&FrameView {
            scene: &self.session.scene,
            overlay: &overlay,
            video: frame,
        })?;
        Ok(())
    }

    /// Request loop shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the loop will run another frame
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access to the session
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Poses estimated in the most recent frame
    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    /// Architecture of the live pose model
    pub fn model_architecture(&self) -> ModelArchitecture {
        self.model.architecture()
    }
}

/// Model picked by the number keys
pub fn architecture_for_key(key: KeyCode) -> Option<ModelArchitecture> {
    match key {
        KeyCode::Num1 => Some(ModelArchitecture::MobileNet101),
        KeyCode::Num2 => Some(ModelArchitecture::MobileNet100),
        KeyCode::Num7 => Some(ModelArchitecture::MobileNet075),
        KeyCode::Num5 => Some(ModelArchitecture::MobileNet050),
        _ => None,
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Camera could not be opened
    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    /// Pose model could not be loaded
    #[error("Pose error: {0}")]
    Pose(#[from] PoseError),

    /// Physics error
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Presenter error
    #[error("Presentation error: {0}")]
    Present(#[from] PresentError),

    /// Application error
    #[error("Application error: {0}")]
    Application(#[from] AppError),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_keys_pick_architectures() {
        assert_eq!(architecture_for_key(KeyCode::Num1), Some(ModelArchitecture::MobileNet101));
        assert_eq!(architecture_for_key(KeyCode::Num5), Some(ModelArchitecture::MobileNet050));
        assert_eq!(architecture_for_key(KeyCode::R), None);
    }
}
