//! 骰子定義
//!
//! 每顆骰子都有一個目前點數與一組點數機率分佈。不同種類的骰子
//! 只是分佈與附帶屬性不同，因此以 `DiceKind` 標籤加上聲明式
//! `DICE_DEFS` 表描述，而不是各自一個型別。

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{FACE_COUNT, PROBABILITY_TOLERANCE};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiceError {
    #[error("invalid probability distribution: {0}")]
    InvalidProbabilityDistribution(String),
    #[error("face {face} out of range 1..={face_count}")]
    FaceOutOfRange { face: u8, face_count: usize },
}

const UNIFORM: [f64; FACE_COUNT] = [1.0 / 6.0; FACE_COUNT];

// ============================================================================
// Dice 定義系統
// ============================================================================

/// 骰子種類定義
#[derive(Clone, Copy)]
pub struct DiceDef {
    pub name: &'static str,
    pub price: i32,
    pub balance: i32,
    pub info: &'static str,
    pub distribution: [f64; FACE_COUNT],
    pub risk_number: Option<u8>,
}

/// Dice 定義表（順序與 DiceKind 枚舉一致）
pub static DICE_DEFS: [DiceDef; 5] = [
    // 0: Regular - 公平骰
    DiceDef { name: "RegularDice", price: 0, balance: 0, info: "A classic, fair die for traditional gameplay.", distribution: UNIFORM, risk_number: None },
    // 1: Lucky - 1 和 5 各 30%
    DiceDef { name: "LuckyDice", price: 20, balance: -1, info: "Favors fortune, landing on 1 or 5 more often, at a small balance cost.", distribution: [0.30, 0.10, 0.10, 0.10, 0.30, 0.10], risk_number: None },
    // 2: Cursed - 1 和 5 各 10%
    DiceDef { name: "CursedDice", price: 10, balance: 2, info: "A sinister die that makes 1s and 5s rare but pays a +2 balance bonus.", distribution: [0.10, 0.20, 0.20, 0.20, 0.10, 0.20], risk_number: None },
    // 3: Risk - 公平骰，風險點數由外部設定
    DiceDef { name: "RiskDice", price: 0, balance: 0, info: "A fair die that watches for one fateful number.", distribution: UNIFORM, risk_number: None },
    // 4: Royal - 擲出 1 觸發風險事件
    DiceDef { name: "RoyalDice", price: 200, balance: -1, info: "A regal die: rolling a 1 grants double points, at a -1 balance penalty.", distribution: UNIFORM, risk_number: Some(1) },
];

/// 骰子種類
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiceKind {
    Regular,
    Lucky,
    Cursed,
    Risk,
    Royal,
}

impl DiceKind {
    pub fn def(&self) -> &'static DiceDef {
        &DICE_DEFS[self.to_index()]
    }

    pub fn to_index(&self) -> usize {
        match self {
            DiceKind::Regular => 0,
            DiceKind::Lucky => 1,
            DiceKind::Cursed => 2,
            DiceKind::Risk => 3,
            DiceKind::Royal => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        self.def().name
    }

    pub fn all() -> &'static [DiceKind] {
        &[
            DiceKind::Regular,
            DiceKind::Lucky,
            DiceKind::Cursed,
            DiceKind::Risk,
            DiceKind::Royal,
        ]
    }
}

/// 骰子外觀
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Skin {
    #[default]
    Standard,
    Golden,
}

static NEXT_DIE_ID: AtomicU64 = AtomicU64::new(1);

/// 單顆骰子
///
/// `id` 在行程內唯一，用來區分點數相同的兩顆骰子。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Die {
    id: u64,
    kind: DiceKind,
    face: u8,
    distribution: [f64; FACE_COUNT],
    cheatable: bool,
    skin: Skin,
    risk_number: Option<u8>,
}

impl Die {
    /// 建立指定種類的骰子，`face` 夾在 1..=6 之內
    pub fn new(kind: DiceKind, face: u8) -> Self {
        let def = kind.def();
        Self {
            id: NEXT_DIE_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            face: face.clamp(1, FACE_COUNT as u8),
            distribution: def.distribution,
            cheatable: false,
            skin: Skin::default(),
            risk_number: def.risk_number,
        }
    }

    pub fn regular(face: u8) -> Self {
        Self::new(DiceKind::Regular, face)
    }

    /// 依目前分佈擲骰並回傳新點數
    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u8 {
        let target: f64 = rng.gen();
        let mut cumulative = 0.0;
        for (idx, p) in self.distribution.iter().enumerate() {
            cumulative += p;
            if target <= cumulative {
                self.face = (idx + 1) as u8;
                return self.face;
            }
        }
        // 浮點誤差：落到第一面
        self.face = 1;
        self.face
    }

    /// 替換機率分佈；驗證失敗時保留原分佈
    pub fn set_distribution(&mut self, probabilities: &BTreeMap<u8, f64>) -> Result<(), DiceError> {
        self.distribution = validate_distribution(probabilities)?;
        Ok(())
    }

    pub fn reset_distribution(&mut self) {
        self.distribution = UNIFORM;
    }

    pub fn distribution(&self) -> BTreeMap<u8, f64> {
        self.distribution
            .iter()
            .enumerate()
            .map(|(idx, &p)| ((idx + 1) as u8, p))
            .collect()
    }

    pub fn probability(&self, face: u8) -> f64 {
        match face {
            1..=6 => self.distribution[(face - 1) as usize],
            _ => 0.0,
        }
    }

    pub fn set_face(&mut self, face: u8) -> Result<(), DiceError> {
        if !(1..=FACE_COUNT as u8).contains(&face) {
            return Err(DiceError::FaceOutOfRange { face, face_count: FACE_COUNT });
        }
        self.face = face;
        Ok(())
    }

    /// 是否擲出風險點數（Royal 骰為 1）
    pub fn risk_number_dropped(&self) -> bool {
        self.risk_number == Some(self.face)
    }

    pub fn set_risk_number(&mut self, risk_number: Option<u8>) {
        self.risk_number = risk_number;
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> DiceKind {
        self.kind
    }

    pub fn face(&self) -> u8 {
        self.face
    }

    pub fn face_count(&self) -> usize {
        FACE_COUNT
    }

    pub fn risk_number(&self) -> Option<u8> {
        self.risk_number
    }

    pub fn is_cheatable(&self) -> bool {
        self.cheatable
    }

    pub fn set_cheatable(&mut self, cheatable: bool) {
        self.cheatable = cheatable;
    }

    pub fn skin(&self) -> Skin {
        self.skin
    }

    pub fn set_skin(&mut self, skin: Skin) {
        self.skin = skin;
    }

    pub fn name(&self) -> &'static str {
        self.kind.def().name
    }

    pub fn price(&self) -> i32 {
        self.kind.def().price
    }

    pub fn balance(&self) -> i32 {
        self.kind.def().balance
    }

    pub fn info(&self) -> &'static str {
        self.kind.def().info
    }
}

fn validate_distribution(probabilities: &BTreeMap<u8, f64>) -> Result<[f64; FACE_COUNT], DiceError> {
    if probabilities.is_empty() {
        return Err(DiceError::InvalidProbabilityDistribution(
            "probabilities map cannot be empty".to_string(),
        ));
    }

    let expected = 1..=FACE_COUNT as u8;
    if probabilities.len() != FACE_COUNT || !probabilities.keys().copied().eq(expected) {
        return Err(DiceError::InvalidProbabilityDistribution(format!(
            "faces must be exactly 1..={}, got {:?}",
            FACE_COUNT,
            probabilities.keys().collect::<Vec<_>>()
        )));
    }

    let mut distribution = [0.0; FACE_COUNT];
    for (&face, &p) in probabilities {
        if !p.is_finite() || p < 0.0 {
            return Err(DiceError::InvalidProbabilityDistribution(format!(
                "probability for face {} is {}",
                face, p
            )));
        }
        distribution[(face - 1) as usize] = p;
    }

    let sum: f64 = distribution.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(DiceError::InvalidProbabilityDistribution(format!(
            "probabilities must sum to 1.0, got {}",
            sum
        )));
    }

    Ok(distribution)
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn probs(values: [f64; 6]) -> BTreeMap<u8, f64> {
        values
            .iter()
            .enumerate()
            .map(|(idx, &p)| ((idx + 1) as u8, p))
            .collect()
    }

    #[test]
    fn test_dice_defs_sum_to_one() {
        for kind in DiceKind::all() {
            let sum: f64 = kind.def().distribution.iter().sum();
            assert!((sum - 1.0).abs() < PROBABILITY_TOLERANCE, "{}", kind.name());
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Die::regular(4);
        let b = Die::regular(4);
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_roll_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut die = Die::new(DiceKind::Cursed, 1);
        for _ in 0..500 {
            let face = die.roll(&mut rng);
            assert!((1..=6).contains(&face));
            assert_eq!(face, die.face());
        }
    }

    #[test]
    fn test_roll_follows_degenerate_distribution() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut die = Die::regular(1);
        die.set_distribution(&probs([0.0, 0.0, 0.0, 0.0, 1.0, 0.0])).unwrap();
        for _ in 0..50 {
            assert_eq!(die.roll(&mut rng), 5);
        }
    }

    #[test]
    fn test_lucky_dice_favor_scoring_faces() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut die = Die::new(DiceKind::Lucky, 1);
        let hits = (0..2000)
            .map(|_| die.roll(&mut rng))
            .filter(|&f| f == 1 || f == 5)
            .count();
        // 期望 60%
        assert!(hits > 1000, "hits={}", hits);
    }

    #[test]
    fn test_wrong_sum_rejected_and_previous_kept() {
        let mut die = Die::new(DiceKind::Lucky, 2);
        let before = die.distribution();
        let err = die
            .set_distribution(&probs([1.1, 1.0 / 6.0, 1.0 / 6.0, 1.0 / 6.0, 1.0 / 6.0, 1.0 / 6.0]))
            .unwrap_err();
        assert!(matches!(err, DiceError::InvalidProbabilityDistribution(_)));
        assert_eq!(die.distribution(), before);
    }

    #[test]
    fn test_empty_and_wrong_keys_rejected() {
        let mut die = Die::regular(2);
        assert!(die.set_distribution(&BTreeMap::new()).is_err());

        let mut seven = probs([0.1, 0.1, 0.1, 0.1, 0.1, 0.4]);
        seven.remove(&6);
        seven.insert(7, 0.4);
        assert!(die.set_distribution(&seven).is_err());

        let negative = probs([-0.1, 0.3, 0.2, 0.2, 0.2, 0.2]);
        assert!(die.set_distribution(&negative).is_err());
    }

    #[test]
    fn test_tolerance_accepted() {
        let mut die = Die::regular(2);
        let almost = probs([0.16667, 0.16667, 0.16667, 0.16667, 0.16666, 0.16666]);
        assert!(die.set_distribution(&almost).is_ok());
    }

    #[test]
    fn test_reset_to_uniform() {
        let mut die = Die::new(DiceKind::Cursed, 3);
        die.reset_distribution();
        for face in 1..=6 {
            assert!((die.probability(face) - 1.0 / 6.0).abs() < 1e-12);
        }
        assert_eq!(die.probability(7), 0.0);
    }

    #[test]
    fn test_set_face_validates() {
        let mut die = Die::regular(1);
        assert!(die.set_face(6).is_ok());
        assert_eq!(die.face(), 6);
        assert_eq!(
            die.set_face(0),
            Err(DiceError::FaceOutOfRange { face: 0, face_count: 6 })
        );
        assert_eq!(die.face(), 6);
    }

    #[test]
    fn test_new_clamps_face() {
        assert_eq!(Die::regular(0).face(), 1);
        assert_eq!(Die::new(DiceKind::Lucky, 9).face(), 6);
        assert_eq!(Die::regular(4).face(), 4);
    }

    #[test]
    fn test_risk_number() {
        let mut royal = Die::new(DiceKind::Royal, 6);
        assert_eq!(royal.risk_number(), Some(1));
        assert!(!royal.risk_number_dropped());
        royal.set_face(1).unwrap();
        assert!(royal.risk_number_dropped());

        let mut risk = Die::new(DiceKind::Risk, 6);
        assert!(!risk.risk_number_dropped());
        risk.set_risk_number(Some(5));
        risk.set_face(5).unwrap();
        assert!(risk.risk_number_dropped());
    }

    #[test]
    fn test_metadata() {
        let mut die = Die::new(DiceKind::Royal, 2);
        assert_eq!(die.name(), "RoyalDice");
        assert_eq!(die.price(), 200);
        assert_eq!(die.balance(), -1);
        die.set_cheatable(true);
        assert!(die.is_cheatable());
        die.set_skin(Skin::Golden);
        assert_eq!(die.skin(), Skin::Golden);
        assert_eq!(die.face_count(), 6);
    }
}
