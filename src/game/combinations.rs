//! 候選組合生成
//!
//! 從一次擲骰中列舉 NPC 可能保留的骰子子集：
//! - 同點數 ≥3 顆的群組：從整組大小往下到 3 顆的所有子集
//! - 單顆 1/5：1 到 min(3, 數量) 顆的所有子集
//!
//! 子集以骰子在輸入中的位置識別，點數相同的兩顆骰子是不同元素。
//! 結果依分數由高到低排序（同分保留生成順序），最多回傳 `cap` 組。

use std::collections::HashSet;

use super::constants::{FACE_COUNT, MAX_COMBINATIONS, MAX_SINGLES_KEPT, MIN_SET_SIZE};
use super::dice::Die;
use super::scoring::score_dice;

/// 一組候選保留骰子
pub type Candidate = Vec<Die>;

/// 生成候選組合（上限 `MAX_COMBINATIONS`）
pub fn generate_candidates(available: &[Die]) -> Vec<Candidate> {
    generate_candidates_capped(available, MAX_COMBINATIONS)
}

pub fn generate_candidates_capped(available: &[Die], cap: usize) -> Vec<Candidate> {
    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut subsets: Vec<Vec<usize>> = Vec::new();
    let mut push = |subset: Vec<usize>| {
        if seen.insert(subset.clone()) {
            subsets.push(subset);
        }
    };

    // 先處理成組的骰子（依點數 1..6 的順序）
    let mut groups: [Vec<usize>; FACE_COUNT] = Default::default();
    for (idx, die) in available.iter().enumerate() {
        if (1..=FACE_COUNT as u8).contains(&die.face()) {
            groups[(die.face() - 1) as usize].push(idx);
        }
    }
    for group in groups.iter().filter(|g| g.len() >= MIN_SET_SIZE) {
        for size in (MIN_SET_SIZE..=group.len()).rev() {
            for subset in index_combinations(group, size) {
                push(subset);
            }
        }
    }

    // 再處理單顆 1/5
    let singles: Vec<usize> = available
        .iter()
        .enumerate()
        .filter(|(_, d)| d.face() == 1 || d.face() == 5)
        .map(|(idx, _)| idx)
        .collect();
    for size in 1..=singles.len().min(MAX_SINGLES_KEPT) {
        for subset in index_combinations(&singles, size) {
            push(subset);
        }
    }

    let mut scored: Vec<(i32, Candidate)> = subsets
        .into_iter()
        .map(|subset| {
            let dice: Candidate = subset.iter().map(|&idx| available[idx].clone()).collect();
            (score_dice(&dice), dice)
        })
        .filter(|(score, _)| *score > 0)
        .collect();

    // sort_by 是穩定排序，同分保留生成順序
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(cap);
    scored.into_iter().map(|(_, dice)| dice).collect()
}

/// 依字典序列舉 `pool` 中大小為 `size` 的所有組合
fn index_combinations(pool: &[usize], size: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    let mut current = Vec::with_capacity(size);
    combinations_helper(pool, size, 0, &mut current, &mut result);
    result
}

fn combinations_helper(
    pool: &[usize],
    size: usize,
    start: usize,
    current: &mut Vec<usize>,
    result: &mut Vec<Vec<usize>>,
) {
    if current.len() == size {
        let mut subset = current.clone();
        subset.sort_unstable();
        result.push(subset);
        return;
    }
    for i in start..pool.len() {
        current.push(pool[i]);
        combinations_helper(pool, size, i + 1, current, result);
        current.pop();
    }
}

// ============================================================================
// 單元測試
// ============================================================================
