use anyhow::{ensure, Result};

use crate::video::frame::Frame;
use crate::video::source::{VideoMetadata, VideoSource};

/// シーク位置に足す秒オフセット。
/// 一部のデコーダはちょうどのフレーム境界で1フレーム手前に着地するため必要。
pub const SEEK_EPSILON: f64 = 0.001;

/// 現在フレーム位置。index < total が常に成り立つ。
/// total と frame_rate は動画ロード時に固定され、以後変更されない。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameCursor {
    index: u32,
    total: u32,
    frame_rate: f64,
}

impl FrameCursor {
    pub fn new(total: u32, frame_rate: f64) -> Result<Self> {
        ensure!(total > 0, "video has no frames");
        ensure!(frame_rate > 0.0, "invalid frame rate: {}", frame_rate);
        Ok(Self {
            index: 0,
            total,
            frame_rate,
        })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }
}

/// フレームカーソルと動画ソースをまとめて所有し、
/// seek-and-wait ナビゲーションを提供する。描画は行わない。
pub struct VideoCursor<S: VideoSource> {
    source: S,
    cursor: FrameCursor,
}

impl<S: VideoSource> VideoCursor<S> {
    pub fn new(source: S, metadata: &VideoMetadata) -> Result<Self> {
        let cursor = FrameCursor::new(metadata.frame_count, metadata.frame_rate)?;
        Ok(Self { source, cursor })
    }

    /// 指定インデックスへシークし完了を待つ。
    /// インデックスはシーク成功後にのみ更新される。
    pub fn seek_to(&mut self, index: u32) -> Result<()> {
        let time = index as f64 / self.cursor.frame_rate + SEEK_EPSILON;
        self.source.seek(time)?;
        self.cursor.index = index;
        Ok(())
    }

    /// 先頭フレームへ
    pub fn first(&mut self) -> Result<()> {
        self.seek_to(0)
    }

    /// 次のフレームへ。最終フレームでは何もしない。
    pub fn next(&mut self) -> Result<()> {
        if self.cursor.index + 1 >= self.cursor.total {
            return Ok(());
        }
        self.seek_to(self.cursor.index + 1)
    }

    /// 前のフレームへ。先頭フレームでは何もしない。
    pub fn previous(&mut self) -> Result<()> {
        if self.cursor.index == 0 {
            return Ok(());
        }
        self.seek_to(self.cursor.index - 1)
    }

    /// 任意のインデックスへ。範囲外は [0, total-1] に丸める。
    pub fn go_to(&mut self, index: u32) -> Result<()> {
        self.seek_to(index.min(self.cursor.total - 1))
    }

    /// 直近のシークでロードされたフレーム
    pub fn frame(&mut self) -> Result<Frame> {
        self.source.frame()
    }

    pub fn index(&self) -> u32 {
        self.cursor.index
    }

    pub fn total(&self) -> u32 {
        self.cursor.total
    }

    pub fn frame_rate(&self) -> f64 {
        self.cursor.frame_rate
    }

    pub fn width(&self) -> u32 {
        self.source.width()
    }

    pub fn height(&self) -> u32 {
        self.source.height()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
