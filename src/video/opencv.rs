use anyhow::{Context, Result};
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureAPIs},
};
use std::path::Path;

use crate::video::frame::Frame;
use crate::video::source::{VideoMetadata, VideoSource};

/// OpenCVを使用した動画ファイルソース。
///
/// シークは `CAP_PROP_POS_MSEC` で行い、完了時点のフレームを
/// デコードして保持する。`frame()` は保持済みフレームを返すだけなので
/// 何度呼んでも位置は進まない。
pub struct OpenCvVideoSource {
    capture: VideoCapture,
    width: u32,
    height: u32,
    duration: f64,
    current: Option<Frame>,
}

impl OpenCvVideoSource {
    /// 動画ファイルを開く
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy();
        let capture = VideoCapture::from_file(&path_str, VideoCaptureAPIs::CAP_ANY as i32)
            .with_context(|| format!("Failed to open video {}", path_str))?;

        if !capture.is_opened()? {
            anyhow::bail!("Video {} is not available", path_str);
        }

        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        if width == 0 || height == 0 {
            anyhow::bail!(
                "Could not read dimensions for {} ({}x{})",
                path_str,
                width,
                height
            );
        }
        let fps = capture.get(videoio::CAP_PROP_FPS)?;
        let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)?;
        let duration = if fps > 0.0 { frame_count / fps } else { 0.0 };

        Ok(Self {
            capture,
            width,
            height,
            duration,
            current: None,
        })
    }
}

impl VideoSource for OpenCvVideoSource {
    fn seek(&mut self, time_secs: f64) -> Result<()> {
        self.capture
            .set(videoio::CAP_PROP_POS_MSEC, time_secs * 1000.0)?;

        let mut mat = Mat::default();
        self.capture
            .read(&mut mat)
            .context("Failed to decode frame after seek")?;
        if mat.empty() {
            anyhow::bail!("Empty frame at {:.3}s", time_secs);
        }

        self.current = Some(mat_to_frame(&mat)?);
        Ok(())
    }

    fn frame(&mut self) -> Result<Frame> {
        self.current
            .clone()
            .context("No frame loaded; seek first")
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn duration_secs(&self) -> f64 {
        self.duration
    }
}

/// BGR Mat を 0x00RRGGBB バッファへ変換
fn mat_to_frame(mat: &Mat) -> Result<Frame> {
    let width = mat.cols() as u32;
    let height = mat.rows() as u32;
    let mut pixels = Vec::with_capacity((width * height) as usize);

    for y in 0..mat.rows() {
        for x in 0..mat.cols() {
            let pixel = mat.at_2d::<opencv::core::Vec3b>(y, x)?;
            let r = pixel[2] as u32;
            let g = pixel[1] as u32;
            let b = pixel[0] as u32;
            pixels.push((r << 16) | (g << 8) | b);
        }
    }

    Ok(Frame::new(width, height, pixels))
}

/// 動画ロード時に一度だけ呼ぶメタデータ取得。
/// FrameCursor の total / frameRate はここで決まり、以後不変。
pub fn probe_metadata<P: AsRef<Path>>(path: P) -> Result<VideoMetadata> {
    let path_str = path.as_ref().to_string_lossy();
    let capture = VideoCapture::from_file(&path_str, VideoCaptureAPIs::CAP_ANY as i32)
        .with_context(|| format!("Failed to open video {}", path_str))?;

    if !capture.is_opened()? {
        anyhow::bail!("Video {} is not available", path_str);
    }

    let frame_rate = capture.get(videoio::CAP_PROP_FPS)?;
    let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)? as u32;

    if frame_rate <= 0.0 || frame_count == 0 {
        anyhow::bail!(
            "Could not probe metadata for {} (fps={}, frames={})",
            path_str,
            frame_rate,
            frame_count
        );
    }

    Ok(VideoMetadata {
        frame_rate,
        frame_count,
    })
}
