//! 計分引擎
//!
//! 處理 Farkle 組合判定和基礎計分邏輯。純函數，無狀態。

use super::constants::{
    DECK_SIZE, FACE_COUNT, FOUR_AND_PAIR_SCORE, MIN_SET_SIZE, OVERFLOW_BONUS, STRAIGHT_SCORE,
    THREE_PAIRS_SCORE, TWO_TRIPLES_SCORE,
};
use super::dice::Die;

/// 點數頻率表，索引 0 對應點數 1
type FaceCounts = [usize; FACE_COUNT];

fn face_counts(faces: &[u8]) -> Option<FaceCounts> {
    let mut counts = [0usize; FACE_COUNT];
    for &face in faces {
        if !(1..=FACE_COUNT as u8).contains(&face) {
            return None;
        }
        counts[(face - 1) as usize] += 1;
    }
    Some(counts)
}

/// 計算一組點數的分數
pub fn score(faces: &[u8]) -> i32 {
    if faces.is_empty() {
        return 0;
    }

    // 超出 1..6 的點數視為死骰
    let Some(counts) = face_counts(faces) else {
        return 0;
    };

    // 六顆骰子先檢查特殊組合
    if faces.len() == DECK_SIZE {
        let special = special_combination_score(&counts);
        if special > 0 {
            return special;
        }
    }

    // 1 和 5 以外的點數必須成組
    if !all_dice_score(&counts) {
        return 0;
    }

    standard_score(&counts)
}

/// 是否存在任何可計分的組合（未爆）
pub fn has_any_scoring_combination(faces: &[u8]) -> bool {
    if faces.is_empty() {
        return false;
    }

    let mut counts = [0usize; FACE_COUNT];
    for &face in faces.iter().filter(|&&f| (1..=FACE_COUNT as u8).contains(&f)) {
        counts[(face - 1) as usize] += 1;
    }

    if faces.len() == DECK_SIZE && special_combination_score(&counts) > 0 {
        return true;
    }

    counts[0] > 0 || counts[4] > 0 || counts.iter().any(|&c| c >= MIN_SET_SIZE)
}

/// 計算一組骰子的分數
pub fn score_dice(dice: &[Die]) -> i32 {
    score(&faces_of(dice))
}

pub fn has_any_scoring_dice(dice: &[Die]) -> bool {
    has_any_scoring_combination(&faces_of(dice))
}

pub fn faces_of(dice: &[Die]) -> Vec<u8> {
    dice.iter().map(Die::face).collect()
}

/// 六顆骰子的特殊組合
fn special_combination_score(counts: &FaceCounts) -> i32 {
    let present: Vec<usize> = counts.iter().copied().filter(|&c| c > 0).collect();

    // 1-6 順子
    if present.len() == FACE_COUNT {
        return STRAIGHT_SCORE;
    }

    // 三對
    if present.len() == 3 && present.iter().all(|&c| c == 2) {
        return THREE_PAIRS_SCORE;
    }

    // 四條 + 一對
    if present.contains(&4) && present.contains(&2) {
        return FOUR_AND_PAIR_SCORE;
    }

    // 兩組三條
    if present.iter().all(|&c| c == 3) {
        return TWO_TRIPLES_SCORE;
    }

    0
}

fn all_dice_score(counts: &FaceCounts) -> bool {
    counts.iter().enumerate().all(|(idx, &count)| {
        let face = idx + 1;
        face == 1 || face == 5 || count == 0 || count >= MIN_SET_SIZE
    })
}

/// 超長的手牌分數飽和在 `i32::MAX`
fn standard_score(counts: &FaceCounts) -> i32 {
    let mut total: i64 = 0;
    for (idx, &count) in counts.iter().enumerate() {
        let face = (idx + 1) as i64;
        let count = count as i64;
        let points = match face {
            1 => 1000 * (count / 3) + 100 * (count % 3),
            5 => 500 * (count / 3) + 50 * (count % 3),
            _ if count >= MIN_SET_SIZE as i64 => {
                let overflow = (count - MIN_SET_SIZE as i64).max(0);
                face * 100 * (count / 3) + OVERFLOW_BONUS as i64 * overflow
            }
            _ => 0,
        };
        total = total.saturating_add(points);
    }
    total.min(i32::MAX as i64) as i32
}

// ============================================================================
// 單元測試
// ============================================================================
