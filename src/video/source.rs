use anyhow::Result;

use crate::video::frame::Frame;

/// 動画ソースの境界インターフェース。
///
/// `seek` はシーク完了までブロックし、復帰時点で該当位置のフレームが
/// デコード済みであることを保証する (完了通知はこの同期復帰そのもの)。
/// `&mut self` を取るため、未完了のシークが複数存在することはない。
pub trait VideoSource {
    /// 再生位置を秒単位で設定し、シーク完了まで待つ
    fn seek(&mut self, time_secs: f64) -> Result<()>;

    /// 直近に完了したシーク位置のフレーム
    fn frame(&mut self) -> Result<Frame>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn duration_secs(&self) -> f64;
}

/// 動画ロード時に一度だけ取得するメタデータ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoMetadata {
    pub frame_rate: f64,
    pub frame_count: u32,
}
