//! 回合結果通知

use log::info;

use crate::game::Turn;

/// 呈現層掛勾：每次 `decide` 決定後呼叫一次
pub trait TurnObserver: Send + Sync {
    fn on_turn_resolved(&self, turn: &Turn);
}

/// 把結果寫進日誌
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl TurnObserver for LogObserver {
    fn on_turn_resolved(&self, turn: &Turn) {
        info!("NPC turn resolved: {} kept={:?}", turn, turn.selected_faces());
    }
}
