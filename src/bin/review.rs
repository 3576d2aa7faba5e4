use anyhow::{anyhow, Result};

use pose_review::config::Config;
use pose_review::export;
use pose_review::playback::PlaybackController;
use pose_review::pose::{JointIndex, ModelType};
use pose_review::render::{Key, OverlayRenderer, ReviewWindow};
use pose_review::track::PoseTrack;
use pose_review::video::{probe_metadata, Frame, OpenCvVideoSource, VideoCursor};

const CONFIG_PATH: &str = "config.toml";

/// キャプチャ済みトラックのレビュー/スクラブビューア
///
/// 操作: ←/→ 前後フレーム, Home 先頭, Space 再生/停止,
///       ↑/↓ 再生速度, ESC 終了
fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: review <video> <pose.json> [config.toml]");
        std::process::exit(1);
    }
    let video_path = &args[1];
    let pose_path = &args[2];
    let config_path = args.get(3).map(String::as_str).unwrap_or(CONFIG_PATH);
    let config = Config::load_or_default(config_path);

    let path_joint = JointIndex::from_name(&config.overlay.path_joint)
        .ok_or_else(|| anyhow!("unknown joint: {}", config.overlay.path_joint))?;

    println!("姿勢データを読み込み中: {}", pose_path);
    let track = export::read_raw(pose_path)?;
    println!("  {}フレーム分のレコード", track.len());

    let metadata = probe_metadata(video_path)?;
    let source = OpenCvVideoSource::open(video_path)?;
    let mut cursor = VideoCursor::new(source, &metadata)?;
    let (width, height) = (cursor.width() as usize, cursor.height() as usize);

    let mut renderer = OverlayRenderer::new(
        width,
        height,
        ModelType::BlazePose,
        config.model.score_threshold,
        &config.overlay,
    );
    let mut window = ReviewWindow::new("Pose Review", width, height)?;
    let mut controller = PlaybackController::new(config.playback.speed);

    cursor.first()?;
    let frame = cursor.frame()?;
    redraw(&mut renderer, &mut window, &track, 0, &frame, path_joint)?;

    while window.is_open() {
        let mut moved = false;

        if window.key_repeated(Key::Right) {
            cursor.next()?;
            moved = true;
        } else if window.key_repeated(Key::Left) {
            cursor.previous()?;
            moved = true;
        } else if window.key_pressed(Key::Home) {
            cursor.first()?;
            moved = true;
        } else if window.key_pressed(Key::Up) {
            let speed = (controller.speed() * 2.0).min(4.0);
            controller.set_speed(speed);
            println!("再生速度: {}", speed);
        } else if window.key_pressed(Key::Down) {
            let speed = (controller.speed() / 2.0).max(0.25);
            controller.set_speed(speed);
            println!("再生速度: {}", speed);
        } else if window.key_pressed(Key::Space) {
            // 最終フレーム到達か Space/ESC で停止する
            let flag = controller.pause_flag();
            controller.play(&mut cursor, |index, frame| {
                renderer.render(frame, track.get(index), &track, index, path_joint);
                window.show(renderer.buffer())?;
                if window.key_pressed(Key::Space) || !window.is_open() {
                    flag.store(true, std::sync::atomic::Ordering::Release);
                }
                Ok(())
            })?;
            moved = true;
        }

        if moved {
            let index = cursor.index();
            let frame = cursor.frame()?;
            redraw(&mut renderer, &mut window, &track, index, &frame, path_joint)?;
        } else {
            window.poll();
        }
    }

    Ok(())
}

fn redraw(
    renderer: &mut OverlayRenderer,
    window: &mut ReviewWindow,
    track: &PoseTrack,
    index: u32,
    frame: &Frame,
    path_joint: JointIndex,
) -> Result<()> {
    renderer.render(frame, track.get(index), track, index, path_joint);
    window.show(renderer.buffer())
}
