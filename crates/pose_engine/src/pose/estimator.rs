//! Pose model seam and the dispose-and-reload slot that owns the live model

use super::Pose;
use crate::camera::VideoFrame;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pose estimation errors
#[derive(Error, Debug)]
pub enum PoseError {
    /// A model could not be loaded
    #[error("Failed to load {architecture} model: {reason}")]
    ModelLoad {
        /// Architecture that was requested
        architecture: ModelArchitecture,
        /// Why loading failed
        reason: String,
    },

    /// Inference failed on a frame
    #[error("Pose estimation failed: {0}")]
    Estimation(String),

    /// A pose recording could not be read
    #[error("Recording error: {0}")]
    Recording(#[from] std::io::Error),

    /// A pose recording line could not be parsed
    #[error("Recording line {line}: {source}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// Parser error
        source: serde_json::Error,
    },
}

/// Model size; larger is slower and more accurate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelArchitecture {
    /// Multiplier 1.01 (largest)
    #[serde(rename = "1.01")]
    MobileNet101,
    /// Multiplier 1.00
    #[serde(rename = "1.00")]
    MobileNet100,
    /// Multiplier 0.75
    #[serde(rename = "0.75")]
    MobileNet075,
    /// Multiplier 0.50 (fastest)
    #[serde(rename = "0.50")]
    MobileNet050,
}

impl ModelArchitecture {
    /// Depth multiplier passed to the model loader
    pub fn multiplier(self) -> f32 {
        match self {
            Self::MobileNet101 => 1.01,
            Self::MobileNet100 => 1.0,
            Self::MobileNet075 => 0.75,
            Self::MobileNet050 => 0.5,
        }
    }

    /// Largest model on desktop, smallest on mobile
    pub fn default_for(mobile: bool) -> Self {
        if mobile {
            Self::MobileNet050
        } else {
            Self::MobileNet101
        }
    }
}

impl std::fmt::Display for ModelArchitecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::MobileNet101 => "1.01",
            Self::MobileNet100 => "1.00",
            Self::MobileNet075 => "0.75",
            Self::MobileNet050 => "0.50",
        };
        f.write_str(label)
    }
}

/// Single- or multi-person decoding, as picked by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Fast; assumes one person in frame
    SinglePose,
    /// Slower; separates several people
    MultiPose,
}

impl Algorithm {
    /// The other algorithm
    pub fn toggled(self) -> Self {
        match self {
            Self::SinglePose => Self::MultiPose,
            Self::MultiPose => Self::SinglePose,
        }
    }
}

/// How the model decodes its output into poses
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecodingMode {
    /// At most one pose
    SinglePerson,
    /// Several poses
    MultiPerson {
        /// Maximum poses returned
        max_poses: usize,
        /// Minimum part score for a pose root
        min_part_confidence: f32,
        /// Minimum pixel distance between corresponding parts of two poses
        nms_radius: f32,
    },
}

/// Per-frame inference parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateOptions {
    /// Decoding mode
    pub decoding: DecodingMode,
    /// Mirror x coordinates (webcam input)
    pub flip_horizontal: bool,
    /// Input downscale before inference
    pub image_scale_factor: f32,
    /// Network output stride (8, 16 or 32)
    pub output_stride: u32,
}

/// A loaded pose model
pub trait PoseModel {
    /// Architecture this instance was built with
    fn architecture(&self) -> ModelArchitecture;

    /// Detect poses in one frame, most confident first
    fn estimate(&mut self, frame: &VideoFrame, options: &EstimateOptions) -> Result<Vec<Pose>, PoseError>;

    /// Release model resources; the instance must not be used afterwards
    fn dispose(&mut self);
}

/// Builds pose models
pub trait PoseModelLoader {
    /// Load a model of the given architecture
    fn load(&mut self, architecture: ModelArchitecture) -> Result<Box<dyn PoseModel>, PoseError>;
}

/// Owns the live model and applies architecture changes between frames
pub struct ModelSlot {
    model: Box<dyn PoseModel>,
}

impl ModelSlot {
    /// Load the initial model
    pub fn load(loader: &mut dyn PoseModelLoader, architecture: ModelArchitecture) -> Result<Self, PoseError> {
        log::info!("Loading pose model {}", architecture);
        Ok(Self {
            model: loader.load(architecture)?,
        })
    }

    /// Architecture of the live model
    pub fn architecture(&self) -> ModelArchitecture {
        self.model.architecture()
    }

    /// Swap the live model for `architecture`
    ///
    /// The live model is disposed before the new one loads. If the new
    /// architecture fails, the previous architecture is loaded again; only
    /// when that also fails is the error returned. Returns whether the
    /// requested model is now live.
    pub fn switch_to(
        &mut self,
        loader: &mut dyn PoseModelLoader,
        architecture: ModelArchitecture,
    ) -> Result<bool, PoseError> {
        let previous = self.model.architecture();
        if architecture == previous {
            return Ok(false);
        }
        self.model.dispose();

        match loader.load(architecture) {
            Ok(model) => {
                log::info!("Pose model switched {} -> {}", previous, architecture);
                self.model = model;
                Ok(true)
            }
            Err(err) => {
                log::warn!("{}; restoring {} model", err, previous);
                self.model = loader.load(previous)?;
                Ok(false)
            }
        }
    }

    /// Run the live model on a frame
    pub fn estimate(&mut self, frame: &VideoFrame, options: &EstimateOptions) -> Result<Vec<Pose>, PoseError> {
        self.model.estimate(frame, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Journal {
        events: Vec<String>,
    }

    struct FakeModel {
        architecture: ModelArchitecture,
        journal: Rc<RefCell<Journal>>,
    }

    impl PoseModel for FakeModel {
        fn architecture(&self) -> ModelArchitecture {
            self.architecture
        }

        fn estimate(&mut self, _frame: &VideoFrame, _options: &EstimateOptions) -> Result<Vec<Pose>, PoseError> {
            Ok(Vec::new())
        }

        fn dispose(&mut self) {
            self.journal.borrow_mut().events.push(format!("dispose {}", self.architecture));
        }
    }

    struct FakeLoader {
        broken: Vec<ModelArchitecture>,
        journal: Rc<RefCell<Journal>>,
    }

    impl PoseModelLoader for FakeLoader {
        fn load(&mut self, architecture: ModelArchitecture) -> Result<Box<dyn PoseModel>, PoseError> {
            self.journal.borrow_mut().events.push(format!("load {}", architecture));
            if self.broken.contains(&architecture) {
                return Err(PoseError::ModelLoad {
                    architecture,
                    reason: "weights missing".to_string(),
                });
            }
            Ok(Box::new(FakeModel {
                architecture,
                journal: Rc::clone(&self.journal),
            }))
        }
    }

    fn loader(broken: Vec<ModelArchitecture>) -> (FakeLoader, Rc<RefCell<Journal>>) {
        let journal = Rc::new(RefCell::new(Journal::default()));
        (
            FakeLoader {
                broken,
                journal: Rc::clone(&journal),
            },
            journal,
        )
    }

    #[test]
    fn test_same_architecture_is_noop() {
        let (mut loader, journal) = loader(vec![]);
        let mut slot = ModelSlot::load(&mut loader, ModelArchitecture::MobileNet101).unwrap();
        assert!(!slot.switch_to(&mut loader, ModelArchitecture::MobileNet101).unwrap());
        assert_eq!(journal.borrow().events, vec!["load 1.01"]);
    }

    #[test]
    fn test_reload_disposes_before_loading() {
        let (mut loader, journal) = loader(vec![]);
        let mut slot = ModelSlot::load(&mut loader, ModelArchitecture::MobileNet101).unwrap();
        assert!(slot.switch_to(&mut loader, ModelArchitecture::MobileNet050).unwrap());
        assert_eq!(slot.architecture(), ModelArchitecture::MobileNet050);
        assert_eq!(journal.borrow().events, vec!["load 1.01", "dispose 1.01", "load 0.50"]);
    }

    #[test]
    fn test_failed_reload_restores_previous_model() {
        let (mut loader, journal) = loader(vec![ModelArchitecture::MobileNet075]);
        let mut slot = ModelSlot::load(&mut loader, ModelArchitecture::MobileNet101).unwrap();
        assert!(!slot.switch_to(&mut loader, ModelArchitecture::MobileNet075).unwrap());
        assert_eq!(slot.architecture(), ModelArchitecture::MobileNet101);
        assert_eq!(
            journal.borrow().events,
            vec!["load 1.01", "dispose 1.01", "load 0.75", "load 1.01"]
        );
    }

    #[test]
    fn test_architecture_labels_round_trip_through_serde() {
        let parsed: ModelArchitecture = serde_json::from_str("\"0.75\"").unwrap();
        assert_eq!(parsed, ModelArchitecture::MobileNet075);
        assert_eq!(parsed.to_string(), "0.75");
        assert_eq!(ModelArchitecture::default_for(true), ModelArchitecture::MobileNet050);
    }

    #[test]
    fn test_algorithm_toggle() {
        assert_eq!(Algorithm::SinglePose.toggled(), Algorithm::MultiPose);
        let parsed: Algorithm = serde_json::from_str("\"multi-pose\"").unwrap();
        assert_eq!(parsed, Algorithm::MultiPose);
    }
}
