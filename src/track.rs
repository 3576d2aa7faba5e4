use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pose::keypoint::{JointIndex, PoseRecord};

/// フレームインデックスをキーとするスパースな姿勢ストア。
///
/// キャプチャされなかったフレームはエントリ自体が存在しない
/// (ゼロ埋めはしない)。キャプチャ中は CaptureDriver だけが書き込み、
/// レビュー時は読み取り専用で参照される。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseTrack(BTreeMap<u32, PoseRecord>);

impl PoseTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, frame: u32, record: PoseRecord) {
        self.0.insert(frame, record);
    }

    pub fn get(&self, frame: u32) -> Option<&PoseRecord> {
        self.0.get(&frame)
    }

    pub fn contains(&self, frame: u32) -> bool {
        self.0.contains_key(&frame)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// キャプチャ済みフレームのインデックス (昇順)
    pub fn frames(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }

    /// (フレーム, レコード) を昇順で返す
    pub fn iter(&self) -> impl Iterator<Item = (u32, &PoseRecord)> {
        self.0.iter().map(|(frame, record)| (*frame, record))
    }

    /// 指定関節が frame 0..=upto で辿った2D位置列 (昇順)。
    /// 欠落フレームは飛ばされるので、連続要素が隣接フレームとは限らない。
    /// 保存はせず毎回導出する。
    pub fn joint_path(&self, joint: JointIndex, upto: u32) -> Vec<(f32, f32)> {
        self.0
            .range(0..=upto)
            .map(|(_, record)| {
                let kp = record.keypoint(joint);
                (kp.x, kp.y)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::keypoint::{Keypoint2D, Keypoint3D, ALL_JOINTS};

    fn record_at(x: f32, y: f32) -> PoseRecord {
        let keypoints = ALL_JOINTS
            .iter()
            .map(|j| Keypoint2D {
                name: j.name().to_string(),
                x,
                y,
                score: Some(0.9),
            })
            .collect();
        let keypoints3d = ALL_JOINTS
            .iter()
            .map(|j| Keypoint3D {
                name: j.name().to_string(),
                x: 0.0,
                y: 0.0,
                z: 0.0,
                score: Some(0.9),
            })
            .collect();
        PoseRecord::new(keypoints, keypoints3d)
    }

    #[test]
    fn test_sparse_lookup() {
        let mut track = PoseTrack::new();
        track.insert(0, record_at(1.0, 1.0));
        track.insert(5, record_at(2.0, 2.0));
        assert_eq!(track.len(), 2);
        assert!(track.contains(0));
        assert!(!track.contains(3));
        assert!(track.get(3).is_none());
        assert_eq!(track.frames().collect::<Vec<_>>(), vec![0, 5]);
    }

    #[test]
    fn test_clear_resets() {
        let mut track = PoseTrack::new();
        track.insert(2, record_at(1.0, 1.0));
        track.clear();
        assert!(track.is_empty());
    }

    #[test]
    fn test_joint_path_skips_gaps() {
        let mut track = PoseTrack::new();
        track.insert(0, record_at(10.0, 10.0));
        track.insert(2, record_at(20.0, 20.0));
        track.insert(4, record_at(30.0, 30.0));

        // フレーム1,3は欠落、フレーム4は範囲外
        let path = track.joint_path(JointIndex::RightElbow, 3);
        assert_eq!(path, vec![(10.0, 10.0), (20.0, 20.0)]);

        let full = track.joint_path(JointIndex::RightElbow, 4);
        assert_eq!(full.len(), 3);
    }
}
