#[cfg(feature = "desktop")]
pub mod detector;
pub mod estimator;
pub mod keypoint;
pub mod topology;

#[cfg(feature = "desktop")]
pub use detector::{preprocess_for_blazepose, BlazePoseDetector};
pub use estimator::{EstimatorConfig, PoseEstimator};
pub use keypoint::{JointIndex, Keypoint2D, Keypoint3D, PoseRecord, ALL_JOINTS};
pub use topology::{ModelType, SideGroups};
