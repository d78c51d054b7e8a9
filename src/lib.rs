//! Farkle 骰子遊戲 NPC 決策引擎
//!
//! - `game`: 規則與資料（骰子、計分、回合紀錄、組合生成、NPC 名冊）
//! - `service`: 決策服務（風險策略、模擬快取、並行搜尋引擎）

pub mod game;
pub mod service;
