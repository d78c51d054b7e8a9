//! 模擬結果快取
//!
//! 以「排序後的點數 + 深度」為鍵，整個引擎生命週期內共用，不做淘汰。
//! 同一鍵的並行寫入以最後一次為準。

use std::fmt;

use dashmap::DashMap;

use crate::game::{Die, Turn};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    faces: Vec<u8>,
    depth: i32,
}

impl CacheKey {
    pub fn new(dice: &[Die], depth: i32) -> Self {
        let mut faces: Vec<u8> = dice.iter().map(Die::face).collect();
        faces.sort_unstable();
        Self { faces, depth }
    }

    pub fn faces(&self) -> &[u8] {
        &self.faces
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }
}

/// 形如 `1-1-5|d1`
impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.faces.iter().map(u8::to_string).collect();
        write!(f, "{}|d{}", faces.join("-"), self.depth)
    }
}

#[derive(Debug, Default)]
pub struct SimulationCache {
    entries: DashMap<CacheKey, Turn>,
}

impl SimulationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Turn> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn put(&self, key: CacheKey, turn: Turn) {
        self.entries.insert(key, turn);
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// 單元測試
// ============================================================================
