//! 遊戲核心模組
//!
//! 包含 Farkle 骰子遊戲的核心定義：
//! - `constants`: 遊戲常量
//! - `dice`: 骰子、種類、機率分佈
//! - `deck`: 骰組
//! - `scoring`: 計分引擎
//! - `turn`: 回合結果紀錄
//! - `combinations`: 候選保留組合生成
//! - `npc`: NPC 角色與名冊
//!
//! 注意：回合輪替、下注與存檔由外部遊戲流程處理，這裡只提供規則與資料

pub mod constants;
pub mod dice;
pub mod deck;
pub mod scoring;
pub mod turn;
pub mod combinations;
pub mod npc;

// Re-export 常用類型
pub use constants::*;
pub use dice::{Die, DiceKind, DiceDef, DiceError, Skin, DICE_DEFS};
pub use deck::DiceDeck;
pub use scoring::{score, has_any_scoring_combination, score_dice, has_any_scoring_dice, faces_of};
pub use turn::{Turn, TurnOutcome};
pub use combinations::{Candidate, generate_candidates, generate_candidates_capped};
pub use npc::{NpcDef, NpcProfile, NpcRoster, RosterError};
