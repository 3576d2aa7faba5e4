use anyhow::{anyhow, Context, Result};

use pose_review::capture::CaptureDriver;
use pose_review::config::Config;
use pose_review::export;
use pose_review::pose::{BlazePoseDetector, EstimatorConfig, JointIndex, ModelType};
use pose_review::render::{OverlayRenderer, ReviewWindow};
use pose_review::video::{probe_metadata, OpenCvVideoSource, VideoCursor};

const CONFIG_PATH: &str = "config.toml";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: pose-review <video> [config.toml]");
        std::process::exit(1);
    }
    let video_path = &args[1];
    let config_path = args.get(2).map(String::as_str).unwrap_or(CONFIG_PATH);
    let config = Config::load_or_default(config_path);

    let path_joint = JointIndex::from_name(&config.overlay.path_joint)
        .ok_or_else(|| anyhow!("unknown joint: {}", config.overlay.path_joint))?;

    println!("動画を読み込み中: {}", video_path);
    let metadata = probe_metadata(video_path)?;
    println!(
        "  フレームレート: {:.3}, フレーム数: {}",
        metadata.frame_rate, metadata.frame_count
    );

    let source = OpenCvVideoSource::open(video_path)?;
    let cursor = VideoCursor::new(source, &metadata)?;
    let (width, height) = (cursor.width() as usize, cursor.height() as usize);

    println!("モデルを読み込み中: {}", config.model.model_path);
    let detector = BlazePoseDetector::new(&config.model.model_path)?;
    let estimator_config = EstimatorConfig {
        max_poses: config.model.max_poses,
        flip_horizontal: false,
    };

    let mut renderer = OverlayRenderer::new(
        width,
        height,
        ModelType::BlazePose,
        config.model.score_threshold,
        &config.overlay,
    );
    let mut window = ReviewWindow::new("Pose Review - Capture", width, height)?;

    let mut driver = CaptureDriver::new(cursor, detector, estimator_config);
    let total = metadata.frame_count;

    println!("ウォームアップ中...");
    driver.run(|index, frame, record, track| {
        renderer.render(frame, record, track, index, path_joint);
        window.show(renderer.buffer())?;
        if index % 30 == 0 || index + 1 == total {
            println!("  フレーム {}/{}", index + 1, total);
        }
        Ok(())
    })?;

    let csv = driver
        .csv()
        .context("capture finished without finalizing")?;
    export::write_csv_text(csv, &config.export.csv_path)?;
    export::write_raw(driver.track(), &config.export.raw_path)?;

    println!(
        "書き出し完了: {} ({}フレーム), {}",
        config.export.csv_path,
        driver.track().len(),
        config.export.raw_path
    );
    Ok(())
}
