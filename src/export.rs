use anyhow::{ensure, Context, Result};
use std::fs;
use std::path::Path;

use crate::pose::keypoint::JointIndex;
use crate::track::PoseTrack;

/// 行フォーマットのヘッダ
pub const CSV_HEADER: &str = "frame,name,x2d,y2d,x,y,z,score";

/// PoseTrack を行フォーマットへ直列化する。
///
/// キャプチャ済みフレームだけを昇順に出力し、フレームごとに
/// 正準関節順で1行ずつ書く。欠落フレームは行を生成しない。
/// スコアが欠落している場合は空フィールドになる。
pub fn to_csv(track: &PoseTrack) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for (frame, record) in track.iter() {
        for (kp, kp3) in record.keypoints.iter().zip(record.keypoints3d.iter()) {
            let score = kp3.score.map(|s| s.to_string()).unwrap_or_default();
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                frame, kp.name, kp.x, kp.y, kp3.x, kp3.y, kp3.z, score
            ));
        }
    }

    out
}

/// 直列化済みの行フォーマットをそのまま書き出す
/// (CaptureDriver が Finalizing で生成したテキスト用)
pub fn write_csv_text<P: AsRef<Path>>(csv: &str, path: P) -> Result<()> {
    fs::write(path.as_ref(), csv)
        .with_context(|| format!("Failed to write {}", path.as_ref().display()))
}

pub fn write_csv<P: AsRef<Path>>(track: &PoseTrack, path: P) -> Result<()> {
    write_csv_text(&to_csv(track), path)
}

/// 再インポート可能な生フォーマット (JSON) へ直列化
pub fn to_raw(track: &PoseTrack) -> Result<String> {
    Ok(serde_json::to_string_pretty(track)?)
}

pub fn write_raw<P: AsRef<Path>>(track: &PoseTrack, path: P) -> Result<()> {
    let json = to_raw(track)?;
    fs::write(path.as_ref(), json)
        .with_context(|| format!("Failed to write {}", path.as_ref().display()))
}

/// 生フォーマットから PoseTrack を復元する。
///
/// 不正な入力は受理しない: JSONとして壊れているか、いずれかのレコードの
/// キーポイント列長が関節数と一致しない場合はエラー。
pub fn import_raw(json: &str) -> Result<PoseTrack> {
    let track: PoseTrack = serde_json::from_str(json).context("Failed to parse pose data")?;
    for (frame, record) in track.iter() {
        ensure!(
            record.is_well_formed(),
            "frame {} has {} / {} keypoints, expected {}",
            frame,
            record.keypoints.len(),
            record.keypoints3d.len(),
            JointIndex::COUNT
        );
    }
    Ok(track)
}

pub fn read_raw<P: AsRef<Path>>(path: P) -> Result<PoseTrack> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
    import_raw(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::keypoint::{Keypoint2D, Keypoint3D, PoseRecord, ALL_JOINTS};

    /// フレーム番号から決まる値を各関節に持たせたレコード
    fn record_for_frame(frame: u32) -> PoseRecord {
        let base = frame as f32 * 100.0;
        let keypoints = ALL_JOINTS
            .iter()
            .enumerate()
            .map(|(i, j)| Keypoint2D {
                name: j.name().to_string(),
                x: base + i as f32,
                y: base + i as f32 + 0.5,
                score: Some(0.8),
            })
            .collect();
        let keypoints3d = ALL_JOINTS
            .iter()
            .enumerate()
            .map(|(i, j)| Keypoint3D {
                name: j.name().to_string(),
                x: 0.1 * i as f32,
                y: 0.2 * i as f32,
                z: 0.3 * i as f32,
                score: if i % 2 == 0 { Some(0.75) } else { None },
            })
            .collect();
        PoseRecord::new(keypoints, keypoints3d)
    }

    #[test]
    fn test_sparse_export_rows() {
        let mut track = PoseTrack::new();
        track.insert(0, record_for_frame(0));
        track.insert(2, record_for_frame(2));
        track.insert(5, record_for_frame(5));

        let csv = to_csv(&track);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        // 3フレーム x 33関節、欠落フレームの行は無い
        assert_eq!(lines.len(), 1 + 3 * JointIndex::COUNT);
        assert!(lines[1..].iter().all(|l| !l.starts_with("1,")));
        assert!(lines[1..].iter().all(|l| !l.starts_with("3,")));

        // フレームは昇順
        let first_fields: Vec<&str> = lines[1..]
            .iter()
            .map(|l| l.split(',').next().unwrap())
            .collect();
        let mut sorted = first_fields.clone();
        sorted.sort_by_key(|f| f.parse::<u32>().unwrap());
        assert_eq!(first_fields, sorted);
    }

    #[test]
    fn test_export_field_values() {
        let mut track = PoseTrack::new();
        track.insert(2, record_for_frame(2));

        let csv = to_csv(&track);
        let elbow = JointIndex::LeftElbow as usize;
        let line = csv
            .lines()
            .find(|l| l.starts_with("2,left_elbow,"))
            .unwrap();
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[2], (200.0 + elbow as f32).to_string());
        assert_eq!(fields[3], (200.0 + elbow as f32 + 0.5).to_string());
        assert_eq!(fields[4], (0.1 * elbow as f32).to_string());
        assert_eq!(fields[5], (0.2 * elbow as f32).to_string());
        assert_eq!(fields[6], (0.3 * elbow as f32).to_string());
        // 奇数インデックスの3Dスコアは欠落 -> 空フィールド
        assert_eq!(fields[7], "");
    }

    #[test]
    fn test_empty_track_exports_header_only() {
        let csv = to_csv(&PoseTrack::new());
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_write_csv_text_round_trips_file() {
        let mut track = PoseTrack::new();
        track.insert(0, record_for_frame(0));
        let csv = to_csv(&track);

        let path = std::env::temp_dir().join("pose_review_csv_text_test.csv");
        write_csv_text(&csv, &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(written, csv);
    }

    #[test]
    fn test_raw_round_trip() {
        let mut track = PoseTrack::new();
        track.insert(0, record_for_frame(0));
        track.insert(7, record_for_frame(7));

        let json = to_raw(&track).unwrap();
        let restored = import_raw(&json).unwrap();
        assert_eq!(restored, track);
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        assert!(import_raw("not json").is_err());
        assert!(import_raw("{\"0\": {\"keypoints\": []}").is_err());
    }

    #[test]
    fn test_import_rejects_wrong_length_record() {
        let mut track = PoseTrack::new();
        let mut record = record_for_frame(0);
        record.keypoints.pop();
        track.insert(0, record);

        let json = to_raw(&track).unwrap();
        assert!(import_raw(&json).is_err());
    }
}
