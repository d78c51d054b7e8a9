//! 回合結果紀錄

use std::fmt;

use serde::{Deserialize, Serialize};

use super::dice::Die;
use super::scoring::faces_of;

/// 回合結束方式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnOutcome {
    Scored,
    Pass,
    Busted,
}

impl fmt::Display for TurnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnOutcome::Scored => "SCORED",
            TurnOutcome::Pass => "PASS",
            TurnOutcome::Busted => "BUSTED",
        };
        f.write_str(name)
    }
}

/// 一個已決定回合的不可變快照
///
/// `selected`、`remaining`、`displayed` 在建構時各自複製，彼此不共享。
/// `displayed` 是玩家看到的整次擲骰，在遞迴模擬中原樣傳遞。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    score: i32,
    outcome: TurnOutcome,
    selected: Vec<Die>,
    remaining: Vec<Die>,
    displayed: Vec<Die>,
}

impl Turn {
    pub fn new(
        score: i32,
        outcome: TurnOutcome,
        selected: &[Die],
        remaining: &[Die],
        displayed: &[Die],
    ) -> Self {
        Self {
            score,
            outcome,
            selected: selected.to_vec(),
            remaining: remaining.to_vec(),
            displayed: displayed.to_vec(),
        }
    }

    /// 爆掉：零分、沒有保留任何骰子
    pub fn busted(remaining: &[Die], displayed: &[Die]) -> Self {
        Self::new(0, TurnOutcome::Busted, &[], remaining, displayed)
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn outcome(&self) -> TurnOutcome {
        self.outcome
    }

    pub fn selected(&self) -> &[Die] {
        &self.selected
    }

    pub fn remaining(&self) -> &[Die] {
        &self.remaining
    }

    pub fn displayed(&self) -> &[Die] {
        &self.displayed
    }

    pub fn selected_faces(&self) -> Vec<u8> {
        faces_of(&self.selected)
    }

    pub fn remaining_faces(&self) -> Vec<u8> {
        faces_of(&self.remaining)
    }

    pub fn is_busted(&self) -> bool {
        self.outcome == TurnOutcome::Busted
    }

    /// 從呼叫者自己的 `hand` 中，依點數各移除一顆被保留的骰子，回傳其餘骰子
    ///
    /// 快取命中時 `selected`/`remaining` 可能來自另一次點數相同的擲骰，
    /// 所以續擲時要用這個對回自己的骰子。
    pub fn unselected_from(&self, hand: &[Die]) -> Vec<Die> {
        let mut rest = hand.to_vec();
        for face in self.selected_faces() {
            if let Some(pos) = rest.iter().position(|d| d.face() == face) {
                rest.remove(pos);
            }
        }
        rest
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Turn[score={}, result={}, selected={} dice, remaining={} dice]",
            self.score,
            self.outcome,
            self.selected.len(),
            self.remaining.len()
        )
    }
}

// ============================================================================
// 單元測試
// ============================================================================
