use anyhow::Result;

use crate::pose::keypoint::PoseRecord;
use crate::video::frame::Frame;

/// 推論呼び出しの設定
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// 返す被写体数の上限
    pub max_poses: usize,
    /// 左右反転。このパイプラインでは常に無効。
    pub flip_horizontal: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            max_poses: 1,
            flip_horizontal: false,
        }
    }
}

/// 姿勢推定器の境界インターフェース。
///
/// CaptureDriver がフレームごとに一度だけ呼び出す。
/// 結果が空 (被写体なし) とエラー (推論失敗) は区別され、
/// 後者はキャプチャ全体を中断させる。
pub trait PoseEstimator {
    /// フレームに対する姿勢結果列 (空もありうる)
    fn estimate(&mut self, frame: &Frame, config: &EstimatorConfig) -> Result<Vec<PoseRecord>>;

    /// ウォームアップ呼び出しに使う同寸法の空フレーム
    fn blank_frame(&self, width: u32, height: u32) -> Frame {
        Frame::blank(width, height)
    }
}
