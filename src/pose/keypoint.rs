use serde::{Deserialize, Serialize};

/// BlazePose の 33 キーポイントインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

/// 全関節をインデックス順に並べたテーブル
pub const ALL_JOINTS: [JointIndex; JointIndex::COUNT] = [
    JointIndex::Nose,
    JointIndex::LeftEyeInner,
    JointIndex::LeftEye,
    JointIndex::LeftEyeOuter,
    JointIndex::RightEyeInner,
    JointIndex::RightEye,
    JointIndex::RightEyeOuter,
    JointIndex::LeftEar,
    JointIndex::RightEar,
    JointIndex::MouthLeft,
    JointIndex::MouthRight,
    JointIndex::LeftShoulder,
    JointIndex::RightShoulder,
    JointIndex::LeftElbow,
    JointIndex::RightElbow,
    JointIndex::LeftWrist,
    JointIndex::RightWrist,
    JointIndex::LeftPinky,
    JointIndex::RightPinky,
    JointIndex::LeftIndex,
    JointIndex::RightIndex,
    JointIndex::LeftThumb,
    JointIndex::RightThumb,
    JointIndex::LeftHip,
    JointIndex::RightHip,
    JointIndex::LeftKnee,
    JointIndex::RightKnee,
    JointIndex::LeftAnkle,
    JointIndex::RightAnkle,
    JointIndex::LeftHeel,
    JointIndex::RightHeel,
    JointIndex::LeftFootIndex,
    JointIndex::RightFootIndex,
];

impl JointIndex {
    pub const COUNT: usize = 33;

    pub fn from_index(index: usize) -> Option<Self> {
        ALL_JOINTS.get(index).copied()
    }

    /// 正準関節名 (エクスポート行・設定ファイルで使用)
    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::MouthLeft => "mouth_left",
            Self::MouthRight => "mouth_right",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftPinky => "left_pinky",
            Self::RightPinky => "right_pinky",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftThumb => "left_thumb",
            Self::RightThumb => "right_thumb",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
        }
    }

    /// 関節名からインデックスを引く。未知の名前は None。
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_JOINTS.iter().copied().find(|j| j.name() == name)
    }
}

/// 2Dキーポイント (画像ピクセル座標)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint2D {
    pub name: String,
    pub x: f32,
    pub y: f32,
    /// 信頼度スコア。モデルによっては欠落する。
    pub score: Option<f32>,
}

/// 3Dキーポイント (腰中心のメートル座標)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint3D {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub score: Option<f32>,
}

/// 1フレーム分の姿勢推定結果。
///
/// keypoints / keypoints3d はどちらも長さ `JointIndex::COUNT` で、
/// トポロジーテーブルと同じインデックス規約に従う。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseRecord {
    pub keypoints: Vec<Keypoint2D>,
    #[serde(rename = "keypoints3D")]
    pub keypoints3d: Vec<Keypoint3D>,
}

impl PoseRecord {
    pub fn new(keypoints: Vec<Keypoint2D>, keypoints3d: Vec<Keypoint3D>) -> Self {
        Self {
            keypoints,
            keypoints3d,
        }
    }

    /// インデックスで2Dキーポイントを取得
    pub fn keypoint(&self, joint: JointIndex) -> &Keypoint2D {
        &self.keypoints[joint as usize]
    }

    /// 両シーケンスの長さが関節数と一致しているか
    pub fn is_well_formed(&self) -> bool {
        self.keypoints.len() == JointIndex::COUNT && self.keypoints3d.len() == JointIndex::COUNT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_index_count() {
        assert_eq!(JointIndex::COUNT, 33);
        assert_eq!(ALL_JOINTS.len(), 33);
    }

    #[test]
    fn test_joint_index_from_index() {
        assert_eq!(JointIndex::from_index(0), Some(JointIndex::Nose));
        assert_eq!(JointIndex::from_index(32), Some(JointIndex::RightFootIndex));
        assert_eq!(JointIndex::from_index(33), None);
    }

    #[test]
    fn test_joint_name_round_trip() {
        for (i, joint) in ALL_JOINTS.iter().enumerate() {
            assert_eq!(*joint as usize, i);
            assert_eq!(JointIndex::from_name(joint.name()), Some(*joint));
        }
        assert_eq!(JointIndex::from_name("left_elbow"), Some(JointIndex::LeftElbow));
        assert_eq!(JointIndex::from_name("third_elbow"), None);
    }

    #[test]
    fn test_record_keypoint_lookup() {
        let keypoints: Vec<Keypoint2D> = ALL_JOINTS
            .iter()
            .map(|j| Keypoint2D {
                name: j.name().to_string(),
                x: *j as usize as f32,
                y: 0.0,
                score: Some(1.0),
            })
            .collect();
        let keypoints3d: Vec<Keypoint3D> = ALL_JOINTS
            .iter()
            .map(|j| Keypoint3D {
                name: j.name().to_string(),
                x: 0.0,
                y: 0.0,
                z: 0.0,
                score: None,
            })
            .collect();
        let record = PoseRecord::new(keypoints, keypoints3d);
        assert!(record.is_well_formed());
        assert_eq!(record.keypoint(JointIndex::LeftElbow).x, 13.0);
        assert_eq!(record.keypoint(JointIndex::LeftElbow).name, "left_elbow");
    }
}
