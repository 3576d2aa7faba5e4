use crate::pose::keypoint::JointIndex;

/// 対応する姿勢モデル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    BlazePose,
}

/// 左右・中央の関節グループ分け
#[derive(Debug, Clone, Copy)]
pub struct SideGroups {
    pub middle: &'static [JointIndex],
    pub left: &'static [JointIndex],
    pub right: &'static [JointIndex],
}

/// BlazePose の骨格接続定義 (開始キーポイント, 終了キーポイント)
pub const BLAZEPOSE_CONNECTIONS: [(JointIndex, JointIndex); 35] = [
    // 顔
    (JointIndex::Nose, JointIndex::LeftEyeInner),
    (JointIndex::LeftEyeInner, JointIndex::LeftEye),
    (JointIndex::LeftEye, JointIndex::LeftEyeOuter),
    (JointIndex::LeftEyeOuter, JointIndex::LeftEar),
    (JointIndex::Nose, JointIndex::RightEyeInner),
    (JointIndex::RightEyeInner, JointIndex::RightEye),
    (JointIndex::RightEye, JointIndex::RightEyeOuter),
    (JointIndex::RightEyeOuter, JointIndex::RightEar),
    (JointIndex::MouthLeft, JointIndex::MouthRight),
    // 腕
    (JointIndex::LeftShoulder, JointIndex::RightShoulder),
    (JointIndex::LeftShoulder, JointIndex::LeftElbow),
    (JointIndex::LeftElbow, JointIndex::LeftWrist),
    (JointIndex::LeftWrist, JointIndex::LeftPinky),
    (JointIndex::LeftWrist, JointIndex::LeftIndex),
    (JointIndex::LeftWrist, JointIndex::LeftThumb),
    (JointIndex::LeftPinky, JointIndex::LeftIndex),
    (JointIndex::RightShoulder, JointIndex::RightElbow),
    (JointIndex::RightElbow, JointIndex::RightWrist),
    (JointIndex::RightWrist, JointIndex::RightPinky),
    (JointIndex::RightWrist, JointIndex::RightIndex),
    (JointIndex::RightWrist, JointIndex::RightThumb),
    (JointIndex::RightPinky, JointIndex::RightIndex),
    // 胴体
    (JointIndex::LeftShoulder, JointIndex::LeftHip),
    (JointIndex::RightShoulder, JointIndex::RightHip),
    (JointIndex::LeftHip, JointIndex::RightHip),
    // 脚
    (JointIndex::LeftHip, JointIndex::LeftKnee),
    (JointIndex::LeftKnee, JointIndex::LeftAnkle),
    (JointIndex::RightHip, JointIndex::RightKnee),
    (JointIndex::RightKnee, JointIndex::RightAnkle),
    (JointIndex::LeftAnkle, JointIndex::LeftHeel),
    (JointIndex::RightAnkle, JointIndex::RightHeel),
    (JointIndex::LeftHeel, JointIndex::LeftFootIndex),
    (JointIndex::RightHeel, JointIndex::RightFootIndex),
    (JointIndex::LeftAnkle, JointIndex::LeftFootIndex),
    (JointIndex::RightAnkle, JointIndex::RightFootIndex),
];

const BLAZEPOSE_MIDDLE: [JointIndex; 1] = [JointIndex::Nose];

const BLAZEPOSE_LEFT: [JointIndex; 16] = [
    JointIndex::LeftEyeInner,
    JointIndex::LeftEye,
    JointIndex::LeftEyeOuter,
    JointIndex::LeftEar,
    JointIndex::MouthLeft,
    JointIndex::LeftShoulder,
    JointIndex::LeftElbow,
    JointIndex::LeftWrist,
    JointIndex::LeftPinky,
    JointIndex::LeftIndex,
    JointIndex::LeftThumb,
    JointIndex::LeftHip,
    JointIndex::LeftKnee,
    JointIndex::LeftAnkle,
    JointIndex::LeftHeel,
    JointIndex::LeftFootIndex,
];

const BLAZEPOSE_RIGHT: [JointIndex; 16] = [
    JointIndex::RightEyeInner,
    JointIndex::RightEye,
    JointIndex::RightEyeOuter,
    JointIndex::RightEar,
    JointIndex::MouthRight,
    JointIndex::RightShoulder,
    JointIndex::RightElbow,
    JointIndex::RightWrist,
    JointIndex::RightPinky,
    JointIndex::RightIndex,
    JointIndex::RightThumb,
    JointIndex::RightHip,
    JointIndex::RightKnee,
    JointIndex::RightAnkle,
    JointIndex::RightHeel,
    JointIndex::RightFootIndex,
];

impl ModelType {
    /// 骨格辺として接続する関節ペア
    pub fn adjacent_pairs(self) -> &'static [(JointIndex, JointIndex)] {
        match self {
            Self::BlazePose => &BLAZEPOSE_CONNECTIONS,
        }
    }

    /// 左右・中央のグループ分け
    pub fn side_groups(self) -> SideGroups {
        match self {
            Self::BlazePose => SideGroups {
                middle: &BLAZEPOSE_MIDDLE,
                left: &BLAZEPOSE_LEFT,
                right: &BLAZEPOSE_RIGHT,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pairs_in_range() {
        for (a, b) in ModelType::BlazePose.adjacent_pairs() {
            assert!((*a as usize) < JointIndex::COUNT);
            assert!((*b as usize) < JointIndex::COUNT);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_side_groups_partition_all_joints() {
        let groups = ModelType::BlazePose.side_groups();
        let mut seen = HashSet::new();
        for j in groups
            .middle
            .iter()
            .chain(groups.left.iter())
            .chain(groups.right.iter())
        {
            assert!(seen.insert(*j as usize), "joint {:?} in two groups", j);
        }
        assert_eq!(seen.len(), JointIndex::COUNT);
        assert_eq!(groups.left.len(), groups.right.len());
    }
}
