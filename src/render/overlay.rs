use crate::config::OverlayConfig;
use crate::pose::keypoint::{JointIndex, Keypoint2D, PoseRecord};
use crate::pose::topology::ModelType;
use crate::track::PoseTrack;
use crate::video::frame::Frame;

/// 中央関節の色 (RGB)
pub const MIDDLE_COLOR: u32 = 0xFFFFFF; // 白

/// 左側関節の色 (RGB)
pub const LEFT_COLOR: u32 = 0x00FF00; // 緑

/// 右側関節の色 (RGB)
pub const RIGHT_COLOR: u32 = 0xFFA500; // オレンジ

/// 骨格線の色 (RGB)
pub const SKELETON_COLOR: u32 = 0xFFFFFF;

/// キーポイントの描画半径
pub const KEYPOINT_RADIUS: i32 = 4;

/// 骨格線の幅
pub const SKELETON_WIDTH: f32 = 2.0;

/// 軌跡セグメントの描画スタイル
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStyle {
    pub width: f32,
    /// 色相 (度)。彩度100%・輝度50%固定で使う。
    pub hue: f32,
}

pub fn sigmoid(d: f32, k: f32) -> f32 {
    1.0 / (1.0 + (-d / k).exp())
}

/// HSL -> 0x00RRGGBB。h は度、s/l は 0.0〜1.0。
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> u32 {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let r = ((r + m) * 255.0).round() as u32;
    let g = ((g + m) * 255.0).round() as u32;
    let b = ((b + m) * 255.0).round() as u32;
    (r << 16) | (g << 8) | b
}

/// フレーム画像・骨格・キーポイント・関節軌跡を重ねて描画する。
///
/// PoseTrack は読み取り専用で、同じ入力からは常に同じバッファが得られる。
pub struct OverlayRenderer {
    width: usize,
    height: usize,
    buffer: Vec<u32>,
    model: ModelType,
    score_threshold: f32,
    sigmoid_k: f32,
    min_path_width: f32,
    max_path_width: f32,
}

impl OverlayRenderer {
    pub fn new(
        width: usize,
        height: usize,
        model: ModelType,
        score_threshold: f32,
        config: &OverlayConfig,
    ) -> Self {
        Self {
            width,
            height,
            buffer: vec![0u32; width * height],
            model,
            score_threshold,
            sigmoid_k: config.sigmoid_k,
            min_path_width: config.min_path_width,
            max_path_width: config.max_path_width,
        }
    }

    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// 現在フレームのオーバーレイを描画する。
    ///
    /// record が None のフレームは画像と軌跡だけが描かれる。
    pub fn render(
        &mut self,
        frame: &Frame,
        record: Option<&PoseRecord>,
        track: &PoseTrack,
        current: u32,
        path_joint: JointIndex,
    ) {
        self.draw_frame(frame);
        if let Some(record) = record {
            self.draw_skeleton(record);
            self.draw_keypoints(record);
        }
        self.draw_joint_path(track, current, path_joint);
    }

    /// ベースレイヤとしてフレーム画像をコピー
    fn draw_frame(&mut self, frame: &Frame) {
        self.buffer.fill(0);
        let w = self.width.min(frame.width() as usize);
        let h = self.height.min(frame.height() as usize);
        for y in 0..h {
            for x in 0..w {
                self.buffer[y * self.width + x] = frame.pixel(x as u32, y as u32);
            }
        }
    }

    /// スコアが閾値未満のキーポイントは描かない (減光ではなく省略)
    fn draw_keypoints(&mut self, record: &PoseRecord) {
        let groups = self.model.side_groups();

        for (joints, color) in [
            (groups.middle, MIDDLE_COLOR),
            (groups.left, LEFT_COLOR),
            (groups.right, RIGHT_COLOR),
        ] {
            for joint in joints {
                let kp = record.keypoint(*joint);
                if score_of(kp) < self.score_threshold {
                    continue;
                }
                self.draw_circle(kp.x.round() as i32, kp.y.round() as i32, KEYPOINT_RADIUS, color);
            }
        }
    }

    /// 両端のスコアが閾値を超える辺だけを描く
    fn draw_skeleton(&mut self, record: &PoseRecord) {
        for (a, b) in self.model.adjacent_pairs() {
            let kp1 = record.keypoint(*a);
            let kp2 = record.keypoint(*b);
            if score_of(kp1) < self.score_threshold || score_of(kp2) < self.score_threshold {
                continue;
            }
            self.draw_segment(
                kp1.x.round() as i32,
                kp1.y.round() as i32,
                kp2.x.round() as i32,
                kp2.y.round() as i32,
                SKELETON_WIDTH,
                SKELETON_COLOR,
            );
        }
    }

    /// 選択関節の軌跡。連続するキャプチャ済みフレームの位置を結び、
    /// セグメントごとにフレーム間変位から幅と色相を決める。
    fn draw_joint_path(&mut self, track: &PoseTrack, current: u32, joint: JointIndex) {
        let path = track.joint_path(joint, current);

        for pair in path.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            let d = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
            let style = self.path_segment_style(d);
            let color = hsl_to_rgb(style.hue, 1.0, 0.5);
            self.draw_segment(
                x0.round() as i32,
                y0.round() as i32,
                x1.round() as i32,
                y1.round() as i32,
                style.width,
                color,
            );
        }
    }

    /// 変位 d に対するセグメントの幅と色相。
    ///
    ///   width = MIN + (1 - sigmoid(d, k)) * MAX
    ///   hue   = 360 * sigmoid(d, k)
    ///
    /// 静止に近いほど太く、速いほど細く色相が回る。物理単位ではなく
    /// 速度の視覚的エンコーディング。
    pub fn path_segment_style(&self, d: f32) -> PathStyle {
        let s = sigmoid(d, self.sigmoid_k);
        PathStyle {
            width: self.min_path_width + (1.0 - s) * self.max_path_width,
            hue: 360.0 * s,
        }
    }

    /// 幅付き線分。Bresenhamで辿った各点に円板を打つ。
    fn draw_segment(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, width: f32, color: u32) {
        let radius = ((width / 2.0).round() as i32).max(0);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.draw_circle(x, y, radius, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// 円を描画（塗りつぶし）
    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// ピクセルをセット（境界チェック付き）
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}

/// スコア欠落のキーポイントはそのまま表示対象になる
fn score_of(kp: &Keypoint2D) -> f32 {
    kp.score.unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::keypoint::{Keypoint3D, ALL_JOINTS};

    fn renderer(width: usize, height: usize) -> OverlayRenderer {
        OverlayRenderer::new(
            width,
            height,
            ModelType::BlazePose,
            0.3,
            &OverlayConfig::default(),
        )
    }

    fn record_with_scores(x: f32, y: f32, score: f32) -> PoseRecord {
        let keypoints = ALL_JOINTS
            .iter()
            .map(|j| Keypoint2D {
                name: j.name().to_string(),
                x,
                y,
                score: Some(score),
            })
            .collect();
        let keypoints3d = ALL_JOINTS
            .iter()
            .map(|j| Keypoint3D {
                name: j.name().to_string(),
                x: 0.0,
                y: 0.0,
                z: 0.0,
                score: Some(score),
            })
            .collect();
        PoseRecord::new(keypoints, keypoints3d)
    }

    #[test]
    fn test_style_mapping_is_monotonic() {
        let r = renderer(8, 8);
        let displacements = [0.0, 0.5, 1.0, 2.0, 5.0, 10.0, 50.0, 200.0];
        for pair in displacements.windows(2) {
            let a = r.path_segment_style(pair[0]);
            let b = r.path_segment_style(pair[1]);
            assert!(b.hue >= a.hue, "hue must not decrease: {:?} {:?}", a, b);
            assert!(b.width <= a.width, "width must not increase: {:?} {:?}", a, b);
        }
    }

    #[test]
    fn test_style_extremes() {
        let r = renderer(8, 8);
        // sigmoid(0) = 0.5
        let still = r.path_segment_style(0.0);
        assert!((still.hue - 180.0).abs() < 1e-3);
        let cfg = OverlayConfig::default();
        let expected = cfg.min_path_width + 0.5 * cfg.max_path_width;
        assert!((still.width - expected).abs() < 1e-3);

        // 大変位では hue -> 360, width -> MIN
        let fast = r.path_segment_style(1e6);
        assert!((fast.hue - 360.0).abs() < 1e-3);
        assert!((fast.width - cfg.min_path_width).abs() < 1e-3);
    }

    #[test]
    fn test_hsl_anchors() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), 0xFF0000);
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), 0x00FF00);
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), 0x0000FF);
        assert_eq!(hsl_to_rgb(360.0, 1.0, 0.5), 0xFF0000);
        assert_eq!(hsl_to_rgb(0.0, 0.0, 1.0), 0xFFFFFF);
        assert_eq!(hsl_to_rgb(0.0, 0.0, 0.0), 0x000000);
    }

    #[test]
    fn test_below_threshold_keypoints_omitted() {
        let mut r = renderer(32, 32);
        let record = record_with_scores(16.0, 16.0, 0.1);
        r.render(
            &Frame::blank(32, 32),
            Some(&record),
            &PoseTrack::new(),
            0,
            JointIndex::Nose,
        );
        assert!(r.buffer().iter().all(|p| *p == 0));
    }

    #[test]
    fn test_visible_keypoints_drawn() {
        let mut r = renderer(32, 32);
        let record = record_with_scores(16.0, 16.0, 0.9);
        r.render(
            &Frame::blank(32, 32),
            Some(&record),
            &PoseTrack::new(),
            0,
            JointIndex::Nose,
        );
        assert!(r.buffer().iter().any(|p| *p != 0));
    }

    #[test]
    fn test_missing_record_draws_only_frame() {
        let mut r = renderer(8, 8);
        let mut pixels = vec![0u32; 64];
        pixels[0] = 0x123456;
        let frame = Frame::new(8, 8, pixels);
        r.render(&frame, None, &PoseTrack::new(), 0, JointIndex::Nose);
        assert_eq!(r.buffer()[0], 0x123456);
        assert!(r.buffer()[1..].iter().all(|p| *p == 0));
    }

    #[test]
    fn test_joint_path_drawn_without_record() {
        let mut r = renderer(64, 64);
        let mut track = PoseTrack::new();
        track.insert(0, record_with_scores(10.0, 10.0, 0.9));
        track.insert(1, record_with_scores(50.0, 50.0, 0.9));

        // 現在フレームにレコードが無くても履歴の軌跡は描かれる
        r.render(
            &Frame::blank(64, 64),
            None,
            &track,
            2,
            JointIndex::RightElbow,
        );
        assert!(r.buffer().iter().any(|p| *p != 0));
    }
}
