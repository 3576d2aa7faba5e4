use anyhow::{bail, Result};

use crate::export;
use crate::pose::estimator::{EstimatorConfig, PoseEstimator};
use crate::pose::keypoint::{JointIndex, PoseRecord};
use crate::track::PoseTrack;
use crate::video::cursor::VideoCursor;
use crate::video::frame::Frame;
use crate::video::source::VideoSource;

/// キャプチャ状態機械の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Warming,
    Capturing,
    Finalizing,
    Done,
}

/// 全フレームを順にキャプチャする逐次パイプライン。
///
/// フレームごとに シーク -> 推論 -> 格納 -> 描画 -> 前進 を繰り返す。
/// 明示的なループの状態機械であり、再帰しない。推論は必ず直近のシークで
/// ロードされたフレームに対して行われ、同じフレームに二度は走らない。
pub struct CaptureDriver<S: VideoSource, E: PoseEstimator> {
    cursor: VideoCursor<S>,
    estimator: E,
    config: EstimatorConfig,
    track: PoseTrack,
    state: CaptureState,
    csv: Option<String>,
}

impl<S: VideoSource, E: PoseEstimator> CaptureDriver<S, E> {
    pub fn new(cursor: VideoCursor<S>, estimator: E, config: EstimatorConfig) -> Self {
        Self {
            cursor,
            estimator,
            config,
            track: PoseTrack::new(),
            state: CaptureState::Idle,
            csv: None,
        }
    }

    /// キャプチャを最後まで実行する。
    ///
    /// `on_frame` はフレームごとの描画フック。推論直後、格納済みの
    /// レコード (無ければ None) と履歴全体を渡して呼ばれる。
    ///
    /// 推論エラーはその場で伝播し、状態は `Capturing` のまま残る。
    /// それまでに格納されたフレームは `track()` から参照できる。
    pub fn run<F>(&mut self, mut on_frame: F) -> Result<()>
    where
        F: FnMut(u32, &Frame, Option<&PoseRecord>, &PoseTrack) -> Result<()>,
    {
        if self.state != CaptureState::Idle {
            bail!("capture can only start from Idle; call reset() first");
        }

        loop {
            match self.state {
                CaptureState::Idle => {
                    // 前回の結果を破棄してからウォームアップ。
                    // 結果は格納しない。
                    self.track.clear();
                    self.csv = None;
                    let blank = self
                        .estimator
                        .blank_frame(self.cursor.width(), self.cursor.height());
                    self.estimator.estimate(&blank, &self.config)?;
                    self.state = CaptureState::Warming;
                }
                CaptureState::Warming => {
                    self.cursor.first()?;
                    self.state = CaptureState::Capturing;
                }
                CaptureState::Capturing => {
                    let index = self.cursor.index();
                    let frame = self.cursor.frame()?;
                    let poses = self.estimator.estimate(&frame, &self.config)?;
                    if let Some(first) = poses.into_iter().next() {
                        // 長さの壊れたレコードは推論失敗と同じく致命的。
                        // 格納すると行エクスポートの行数と関節インデックス
                        // 参照の両方が破綻する。
                        if !first.is_well_formed() {
                            bail!(
                                "estimator returned {} / {} keypoints at frame {}, expected {}",
                                first.keypoints.len(),
                                first.keypoints3d.len(),
                                index,
                                JointIndex::COUNT
                            );
                        }
                        self.track.insert(index, first);
                    }
                    on_frame(index, &frame, self.track.get(index), &self.track)?;

                    if index == self.cursor.total() - 1 {
                        self.state = CaptureState::Finalizing;
                    } else {
                        self.cursor.next()?;
                    }
                }
                CaptureState::Finalizing => {
                    self.csv = Some(export::to_csv(&self.track));
                    self.state = CaptureState::Done;
                }
                CaptureState::Done => return Ok(()),
            }
        }
    }

    /// Idle に戻す。次の run() が track を破棄して始まる。
    pub fn reset(&mut self) {
        self.state = CaptureState::Idle;
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn track(&self) -> &PoseTrack {
        &self.track
    }

    /// Finalizing で生成された行フォーマット。Done 以降のみ Some。
    pub fn csv(&self) -> Option<&str> {
        self.csv.as_deref()
    }

    pub fn cursor(&self) -> &VideoCursor<S> {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut VideoCursor<S> {
        &mut self.cursor
    }
}
