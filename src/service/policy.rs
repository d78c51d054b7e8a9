//! NPC 風險與續擲策略
//!
//! 純函數：由剩餘骰子數、難度與本次得分決定風險、結束方式與是否續擲。

use crate::game::{TurnOutcome, DECK_SIZE};

/// 分類一個候選組合所需的事實
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnFacts {
    pub score: i32,
    pub selected_count: usize,
    pub remaining_count: usize,
    pub risk: f64,
    pub difficulty: i32,
    pub npc_score: i32,
    pub score_to_win: i32,
}

/// 剩餘骰子越少、難度越高，風險越高；上限 1
pub fn calculate_risk(remaining_count: usize, difficulty: i32) -> f64 {
    let base_risk = 1.0 - remaining_count as f64 / DECK_SIZE as f64;
    let difficulty_factor = 1.0 + (difficulty - 1) as f64 * 0.2;
    (base_risk * difficulty_factor).min(1.0)
}

/// 是否值得模擬「繼續擲」
pub fn should_continue(score: i32, remaining_count: usize, risk: f64, difficulty: i32) -> bool {
    let base_chance = 0.4 + 0.25 * difficulty as f64;
    let score_mod = (score as f64 / 1000.0).min(1.0);
    let dice_mod = (DECK_SIZE as f64 - remaining_count as f64) / DECK_SIZE as f64;
    let risk_factor = 1.0 - risk * (1.2 - difficulty as f64 * 0.4);

    (base_chance + score_mod + dice_mod) * risk_factor > 0.6
}

/// 決定候選組合的結束方式（依序判斷，先符合者勝出）
pub fn classify(facts: &TurnFacts) -> TurnOutcome {
    let TurnFacts {
        score,
        selected_count,
        remaining_count,
        risk,
        difficulty,
        npc_score,
        score_to_win,
    } = *facts;

    // 全部骰子都計分且不會超過勝利分數
    if remaining_count == 0 && score > 0 && npc_score + score <= score_to_win {
        return TurnOutcome::Scored;
    }

    // 剩太少骰子，太危險
    if remaining_count <= 2 && risk >= 0.65 {
        return TurnOutcome::Pass;
    }

    let few_dice_left = remaining_count < 4 && remaining_count > 1;
    if (difficulty as f64 / 3.0) < risk
        || (few_dice_left && score >= 600)
        || (few_dice_left && score >= 1000)
        || npc_score + score >= score_to_win
    {
        return TurnOutcome::Pass;
    }

    // 小而安全的一步
    if selected_count <= 4 && risk < 0.25 * difficulty as f64 {
        return TurnOutcome::Scored;
    }

    TurnOutcome::Pass
}

// ============================================================================
// 單元測試
// ============================================================================
