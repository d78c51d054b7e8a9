//! 遊戲常量定義

// ============================================================================
// 骰子規則常量
// ============================================================================

pub const FACE_COUNT: usize = 6;         // 每顆骰子的面數
pub const DECK_SIZE: usize = 6;          // 一次完整擲骰的骰子數
pub const PROBABILITY_TOLERANCE: f64 = 1e-4;  // 機率總和允許誤差

// ============================================================================
// 計分常量
// ============================================================================

pub const STRAIGHT_SCORE: i32 = 1500;        // 1-6 順子
pub const THREE_PAIRS_SCORE: i32 = 1500;     // 三對
pub const FOUR_AND_PAIR_SCORE: i32 = 1500;   // 四條 + 一對
pub const TWO_TRIPLES_SCORE: i32 = 2500;     // 兩組三條
pub const OVERFLOW_BONUS: i32 = 1000;        // 三條之外每多一顆 +1000
pub const MIN_SET_SIZE: usize = 3;           // 成組的最少骰子數
pub const MAX_SINGLES_KEPT: usize = 3;       // 單顆 1/5 最多一次保留 3 顆

// ============================================================================
// NPC 搜尋常量
// ============================================================================

pub const MAX_DEPTH: i32 = 1;                // 遞迴前瞻深度
pub const MAX_COMBINATIONS: usize = 100;     // 候選組合上限
pub const BASE_TIMEOUT_MS: u64 = 4_000;      // 單一候選任務基礎逾時
pub const DEFAULT_SCORE_TO_WIN: i32 = 5000;  // 預設勝利分數
