//! 引擎設定
//!
//! 預設值與遊戲常量一致；可由環境變數或 JSON 覆寫。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::game::{BASE_TIMEOUT_MS, MAX_COMBINATIONS, MAX_DEPTH};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 遞迴前瞻深度
    pub max_depth: i32,
    /// 每次搜尋最多評估的候選組合數
    pub max_combinations: usize,
    /// 單一候選任務的基礎逾時（毫秒）
    pub base_timeout_ms: u64,
    /// 工作執行緒數量
    pub worker_threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            max_combinations: MAX_COMBINATIONS,
            base_timeout_ms: BASE_TIMEOUT_MS,
            worker_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

impl EngineConfig {
    /// 讀取 `FARKLE_MAX_DEPTH`、`FARKLE_MAX_COMBINATIONS`、
    /// `FARKLE_BASE_TIMEOUT_MS`、`FARKLE_WORKER_THREADS`；缺少或無法解析時用預設值
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_depth: env_or("FARKLE_MAX_DEPTH", defaults.max_depth),
            max_combinations: env_or("FARKLE_MAX_COMBINATIONS", defaults.max_combinations),
            base_timeout_ms: env_or("FARKLE_BASE_TIMEOUT_MS", defaults.base_timeout_ms),
            worker_threads: env_or("FARKLE_WORKER_THREADS", defaults.worker_threads).max(1),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 深度越淺（離根越遠）的任務給越長的時間：`base * (max_depth - depth + 1)`
    pub fn task_timeout(&self, depth: i32) -> Duration {
        let factor = (self.max_depth - depth + 1).max(1) as u64;
        Duration::from_millis(self.base_timeout_ms.saturating_mul(factor))
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_depth, 1);
        assert_eq!(config.max_combinations, 100);
        assert_eq!(config.base_timeout_ms, 4000);
        assert!(config.worker_threads >= 1);
    }

    #[test]
    fn test_task_timeout() {
        let config = EngineConfig::default();
        assert_eq!(config.task_timeout(1), Duration::from_secs(4));
        assert_eq!(config.task_timeout(0), Duration::from_secs(8));
        // 超過 max_depth 時倍數不低於 1
        assert_eq!(config.task_timeout(5), Duration::from_secs(4));
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(r#"{"base_timeout_ms": 250, "worker_threads": 2}"#).unwrap();
        assert_eq!(config.base_timeout_ms, 250);
        assert_eq!(config.worker_threads, 2);
        assert_eq!(config.max_depth, MAX_DEPTH);
        assert!(EngineConfig::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_env_or_fallback() {
        assert_eq!(env_or("FARKLE_TEST_UNSET_VARIABLE", 7usize), 7);
    }
}
