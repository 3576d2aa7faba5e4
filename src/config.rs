use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// ONNXモデルのパス
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// 返す被写体数の上限
    #[serde(default = "default_max_poses")]
    pub max_poses: usize,
    /// キーポイント・骨格描画のスコア閾値
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OverlayConfig {
    /// 軌跡を描く関節名
    #[serde(default = "default_path_joint")]
    pub path_joint: String,
    /// 変位->シグモイドの感度定数
    #[serde(default = "default_sigmoid_k")]
    pub sigmoid_k: f32,
    /// 軌跡セグメントの最小幅
    #[serde(default = "default_min_path_width")]
    pub min_path_width: f32,
    /// 軌跡セグメントの幅の可変分
    #[serde(default = "default_max_path_width")]
    pub max_path_width: f32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlaybackConfig {
    /// 再生速度倍率
    #[serde(default = "default_speed")]
    pub speed: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
    #[serde(default = "default_raw_path")]
    pub raw_path: String,
}

fn default_model_path() -> String { "models/blazepose_full.onnx".to_string() }
fn default_max_poses() -> usize { 1 }
fn default_score_threshold() -> f32 { 0.3 }
fn default_path_joint() -> String { "right_elbow".to_string() }
fn default_sigmoid_k() -> f32 { 5.0 }
fn default_min_path_width() -> f32 { 1.0 }
fn default_max_path_width() -> f32 { 8.0 }
fn default_speed() -> f64 { 1.0 }
fn default_csv_path() -> String { "pose.csv".to_string() }
fn default_raw_path() -> String { "pose.json".to_string() }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            max_poses: default_max_poses(),
            score_threshold: default_score_threshold(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            path_joint: default_path_joint(),
            sigmoid_k: default_sigmoid_k(),
            min_path_width: default_min_path_width(),
            max_path_width: default_max_path_width(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            raw_path: default_raw_path(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.model.max_poses, 1);
        assert_eq!(config.model.score_threshold, 0.3);
        assert_eq!(config.overlay.path_joint, "right_elbow");
        assert_eq!(config.overlay.sigmoid_k, 5.0);
        assert_eq!(config.playback.speed, 1.0);
        assert_eq!(config.export.csv_path, "pose.csv");
    }

    #[test]
    fn test_partial_toml_overrides() {
        let toml = r#"
            [overlay]
            path_joint = "left_wrist"

            [playback]
            speed = 0.5
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.overlay.path_joint, "left_wrist");
        assert_eq!(config.playback.speed, 0.5);
        // 未指定のセクションはデフォルト
        assert_eq!(config.model.score_threshold, 0.3);
        assert_eq!(config.overlay.sigmoid_k, 5.0);
    }
}
