use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::video::cursor::VideoCursor;
use crate::video::frame::Frame;
use crate::video::source::VideoSource;

/// レビュー用の擬似リアルタイム再生ループ。推論は行わない。
///
/// 各ステップの所要時間を目標間隔から差し引いてスリープし、
/// タイマードリフトを補償する。ステップが目標間隔を超過しても
/// フレームはスキップせず、即座に次へ進む (遅延は累積する)。
/// ポーズフラグはステップ間でのみ確認される。
pub struct PlaybackController {
    speed: f64,
    paused: Arc<AtomicBool>,
}

impl PlaybackController {
    pub fn new(speed: f64) -> Self {
        Self {
            speed,
            paused: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// ステップ間で確認される共有ポーズフラグ
    pub fn pause_flag(&self) -> Arc<AtomicBool> {
        self.paused.clone()
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// ポーズされるか最終フレームに達するまで再生する。
    ///
    /// ステップ: 前進 -> 描画フック -> 残り時間スリープ -> フラグ確認。
    /// 最終フレーム到達時はフラグを強制的に立てる。
    pub fn play<S, F>(&self, cursor: &mut VideoCursor<S>, mut redraw: F) -> Result<()>
    where
        S: VideoSource,
        F: FnMut(u32, &Frame) -> Result<()>,
    {
        self.paused.store(false, Ordering::Release);

        loop {
            let start = Instant::now();

            cursor.next()?;
            let frame = cursor.frame()?;
            redraw(cursor.index(), &frame)?;

            let interval = Duration::from_secs_f64(1.0 / (self.speed * cursor.frame_rate()));
            if let Some(remaining) = interval.checked_sub(start.elapsed()) {
                thread::sleep(remaining);
            }

            if cursor.index() + 1 >= cursor.total() {
                self.paused.store(true, Ordering::Release);
            }
            if self.paused.load(Ordering::Acquire) {
                return Ok(());
            }
        }
    }
}
