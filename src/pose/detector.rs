use anyhow::{Context, Result};
use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

use crate::pose::estimator::{EstimatorConfig, PoseEstimator};
use crate::pose::keypoint::{JointIndex, Keypoint2D, Keypoint3D, PoseRecord, ALL_JOINTS};
use crate::video::frame::Frame;

/// BlazePose の入力サイズ
pub const BLAZEPOSE_INPUT_SIZE: usize = 256;

/// 被写体が居るとみなすポーズフラグの閾値
const POSE_PRESENCE_THRESHOLD: f32 = 0.5;

/// BlazePose (単一人物) を使用した姿勢検出器
pub struct BlazePoseDetector {
    session: Session,
}

impl BlazePoseDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())
            .context("Failed to load ONNX model")?;

        Ok(Self { session })
    }
}

/// Frame を BlazePose 用の入力テンソルに変換
///
/// - バイリニアで 256x256 に縮小
/// - [1, 256, 256, 3] の f32 テンソル (0.0-1.0)
pub fn preprocess_for_blazepose(frame: &Frame) -> Array4<f32> {
    let size = BLAZEPOSE_INPUT_SIZE;
    let mut tensor = Array4::<f32>::zeros((1, size, size, 3));

    // 寸法のないフレームはゼロテンソルのまま返す
    if frame.width() == 0 || frame.height() == 0 {
        return tensor;
    }

    let src_w = frame.width() as f32;
    let src_h = frame.height() as f32;

    for y in 0..size {
        for x in 0..size {
            // 出力ピクセル中心をソース座標へ写像
            let sx = ((x as f32 + 0.5) * src_w / size as f32 - 0.5).clamp(0.0, src_w - 1.0);
            let sy = ((y as f32 + 0.5) * src_h / size as f32 - 0.5).clamp(0.0, src_h - 1.0);

            let x0 = sx.floor() as u32;
            let y0 = sy.floor() as u32;
            let x1 = (x0 + 1).min(frame.width() - 1);
            let y1 = (y0 + 1).min(frame.height() - 1);
            let fx = sx - x0 as f32;
            let fy = sy - y0 as f32;

            for c in 0..3 {
                let shift = 16 - 8 * c;
                let channel = |px: u32| ((px >> shift) & 0xFF) as f32;
                let top = channel(frame.pixel(x0, y0)) * (1.0 - fx) + channel(frame.pixel(x1, y0)) * fx;
                let bottom = channel(frame.pixel(x0, y1)) * (1.0 - fx) + channel(frame.pixel(x1, y1)) * fx;
                tensor[[0, y, x, c]] = (top * (1.0 - fy) + bottom * fy) / 255.0;
            }
        }
    }

    tensor
}

fn visibility_score(logit: f32) -> f32 {
    1.0 / (1.0 + (-logit).exp())
}

impl PoseEstimator for BlazePoseDetector {
    /// 1フレーム分の姿勢を推定する。
    ///
    /// 出力: ランドマーク [1, 195] = 33 x (x, y, z, visibility, presence)、
    /// ポーズフラグ [1, 1]、ワールドランドマーク [1, 117] = 33 x (x, y, z)。
    /// ポーズフラグが閾値未満なら被写体なしとして空を返す。
    fn estimate(&mut self, frame: &Frame, config: &EstimatorConfig) -> Result<Vec<PoseRecord>> {
        let input = preprocess_for_blazepose(frame);
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs!["input_1" => input_tensor])
            .context("Inference failed")?;

        let pose_flag: ndarray::ArrayViewD<f32> = outputs["Identity_1"]
            .try_extract_array()
            .context("Failed to extract pose flag")?;
        if pose_flag[[0, 0]] < POSE_PRESENCE_THRESHOLD {
            return Ok(Vec::new());
        }

        let landmarks: ndarray::ArrayViewD<f32> = outputs["Identity"]
            .try_extract_array()
            .context("Failed to extract landmarks")?;
        let world: ndarray::ArrayViewD<f32> = outputs["Identity_4"]
            .try_extract_array()
            .context("Failed to extract world landmarks")?;

        // 入力スケールからフレームピクセルへ
        let sx = frame.width() as f32 / BLAZEPOSE_INPUT_SIZE as f32;
        let sy = frame.height() as f32 / BLAZEPOSE_INPUT_SIZE as f32;

        let mut keypoints = Vec::with_capacity(JointIndex::COUNT);
        let mut keypoints3d = Vec::with_capacity(JointIndex::COUNT);

        for (i, joint) in ALL_JOINTS.iter().enumerate() {
            let score = visibility_score(landmarks[[0, i * 5 + 3]]);
            keypoints.push(Keypoint2D {
                name: joint.name().to_string(),
                x: landmarks[[0, i * 5]] * sx,
                y: landmarks[[0, i * 5 + 1]] * sy,
                score: Some(score),
            });
            keypoints3d.push(Keypoint3D {
                name: joint.name().to_string(),
                x: world[[0, i * 3]],
                y: world[[0, i * 3 + 1]],
                z: world[[0, i * 3 + 2]],
                score: Some(score),
            });
        }

        let mut poses = vec![PoseRecord::new(keypoints, keypoints3d)];
        poses.truncate(config.max_poses);
        Ok(poses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_degenerate_frame_is_zero_tensor() {
        let tensor = preprocess_for_blazepose(&Frame::blank(0, 0));
        assert_eq!(tensor.shape(), &[1, BLAZEPOSE_INPUT_SIZE, BLAZEPOSE_INPUT_SIZE, 3]);
        assert!(tensor.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_preprocess_normalizes_uniform_frame() {
        let frame = Frame::new(4, 4, vec![0x808080; 16]);
        let tensor = preprocess_for_blazepose(&frame);
        let expected = 128.0 / 255.0;
        assert!(tensor.iter().all(|v| (*v - expected).abs() < 1e-6));
    }
}
