//! NPC 決策引擎
//!
//! 對一次擲骰列舉候選保留組合，每個候選在工作池上平行模擬，
//! 取分數最高者（同分取先提交者）。結果以點數與深度快取。
//!
//! 工作池是引擎自有的 tokio 多執行緒 runtime；巢狀模擬以非同步任務進行，
//! 不會佔住工作執行緒等待子任務。`decide` 為同步呼叫；
//! 已在非同步環境中時可改用 `decide_async`。引擎本身（含 runtime）
//! 必須在非同步環境之外 drop。

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use log::{debug, trace, warn};
use thiserror::Error;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::time::{timeout_at, Instant};

use crate::game::{
    generate_candidates_capped, score_dice, Candidate, Die, NpcProfile, Turn,
};

use super::cache::{CacheKey, SimulationCache};
use super::config::EngineConfig;
use super::observer::TurnObserver;
use super::policy::{calculate_risk, classify, should_continue, TurnFacts};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start NPC worker pool: {0}")]
    WorkerPool(#[from] io::Error),
}

/// 單一候選模擬失敗；只記錄，不影響決策
#[derive(Debug, Error)]
pub enum CandidateFailure {
    #[error("candidate #{candidate} timed out after {after:?}")]
    Timeout { candidate: usize, after: Duration },
    #[error("candidate #{candidate} aborted: {message}")]
    Aborted { candidate: usize, message: String },
}

type SearchFuture = Pin<Box<dyn Future<Output = Turn> + Send>>;

struct EngineInner {
    config: EngineConfig,
    cache: SimulationCache,
    #[cfg(test)]
    fault: Option<InjectedFault>,
}

/// 測試用：讓每個候選任務卡住或 panic
#[cfg(test)]
#[derive(Clone, Copy, Debug)]
pub(crate) enum InjectedFault {
    Stall,
    Panic,
}

/// 一次 `decide` 期間唯讀的資料
struct SearchContext {
    difficulty: i32,
    deck: Vec<Die>,
    displayed: Vec<Die>,
    npc_score: i32,
    score_to_win: i32,
}

pub struct NpcEngine {
    inner: Arc<EngineInner>,
    runtime: Runtime,
    observer: Option<Arc<dyn TurnObserver>>,
}

impl NpcEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads.max(1))
            .thread_name("npc-worker")
            .enable_time()
            .build()?;

        Ok(Self {
            inner: Arc::new(EngineInner {
                config,
                cache: SimulationCache::new(),
                #[cfg(test)]
                fault: None,
            }),
            runtime,
            observer: None,
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn TurnObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    #[cfg(test)]
    pub(crate) fn with_fault(mut self, fault: InjectedFault) -> Self {
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            inner.fault = Some(fault);
        }
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn cache(&self) -> &SimulationCache {
        &self.inner.cache
    }

    /// 決定 NPC 對這次擲骰的回應
    ///
    /// `available` 同時作為顯示中的骰子快照；`profile` 在呼叫期間唯讀。
    /// 在其他 tokio runtime 之內呼叫時，搜尋交給引擎自己的工作池，
    /// 呼叫端執行緒以通道等待結果。
    pub fn decide(
        &self,
        available: &[Die],
        profile: &NpcProfile,
        npc_score: i32,
        score_to_win: i32,
    ) -> Turn {
        let search = self.search(available, profile, npc_score, score_to_win);

        let turn = if Handle::try_current().is_ok() {
            let (tx, rx) = mpsc::channel();
            self.runtime.spawn(async move {
                let _ = tx.send(search.await);
            });
            rx.recv().unwrap_or_else(|_| {
                warn!("NPC search was dropped before finishing");
                Turn::busted(available, available)
            })
        } else {
            self.runtime.block_on(search)
        };

        self.resolve(profile, turn)
    }

    /// `decide` 的非同步版本，可在任何 tokio runtime 中 await
    pub async fn decide_async(
        &self,
        available: &[Die],
        profile: &NpcProfile,
        npc_score: i32,
        score_to_win: i32,
    ) -> Turn {
        let search = self.search(available, profile, npc_score, score_to_win);

        let turn = match self.runtime.spawn(search).await {
            Ok(turn) => turn,
            Err(err) => {
                warn!("NPC search failed: {}", err);
                Turn::busted(available, available)
            }
        };

        self.resolve(profile, turn)
    }

    fn search(
        &self,
        available: &[Die],
        profile: &NpcProfile,
        npc_score: i32,
        score_to_win: i32,
    ) -> SearchFuture {
        let ctx = Arc::new(SearchContext {
            difficulty: profile.difficulty(),
            deck: profile.deck.dice().to_vec(),
            displayed: available.to_vec(),
            npc_score,
            score_to_win,
        });

        simulate_best_turn(
            Arc::clone(&self.inner),
            ctx,
            available.to_vec(),
            self.inner.config.max_depth,
        )
    }

    fn resolve(&self, profile: &NpcProfile, turn: Turn) -> Turn {
        debug!("{} decided {} kept={:?}", profile.name, turn, turn.selected_faces());
        if let Some(observer) = &self.observer {
            observer.on_turn_resolved(&turn);
        }
        turn
    }
}

fn simulate_best_turn(
    inner: Arc<EngineInner>,
    ctx: Arc<SearchContext>,
    available: Vec<Die>,
    depth: i32,
) -> SearchFuture {
    Box::pin(async move {
        if available.is_empty() {
            return Turn::busted(&available, &ctx.displayed);
        }

        let key = CacheKey::new(&available, depth);
        if let Some(cached) = inner.cache.get(&key) {
            trace!("cache hit {}", key);
            return cached;
        }

        let candidates = generate_candidates_capped(&available, inner.config.max_combinations);
        if candidates.is_empty() {
            return Turn::busted(&available, &ctx.displayed);
        }
        let candidate_count = candidates.len();

        let after = inner.config.task_timeout(depth);
        let deadline = Instant::now() + after;
        let handles: Vec<_> = candidates
            .into_iter()
            .map(|selected| {
                tokio::spawn(simulate_turn(
                    Arc::clone(&inner),
                    Arc::clone(&ctx),
                    selected,
                    available.clone(),
                    depth,
                ))
            })
            .collect();

        // 依提交順序等待，嚴格大於才替換，同分保留先提交者
        let mut best = Turn::busted(&available, &ctx.displayed);
        for (candidate, mut handle) in handles.into_iter().enumerate() {
            let failure = match timeout_at(deadline, &mut handle).await {
                Ok(Ok(turn)) => {
                    if turn.score() > best.score() {
                        best = turn;
                    }
                    continue;
                }
                Ok(Err(err)) => CandidateFailure::Aborted {
                    candidate,
                    message: err.to_string(),
                },
                Err(_) => {
                    handle.abort();
                    CandidateFailure::Timeout { candidate, after }
                }
            };
            warn!("skipping combination: {}", failure);
        }

        debug!("evaluated {} candidates for {}: {}", candidate_count, key, best);
        inner.cache.put(key, best.clone());
        best
    })
}

fn simulate_turn(
    inner: Arc<EngineInner>,
    ctx: Arc<SearchContext>,
    selected: Candidate,
    available: Vec<Die>,
    depth: i32,
) -> SearchFuture {
    Box::pin(async move {
        #[cfg(test)]
        match inner.fault {
            Some(InjectedFault::Stall) => std::future::pending::<()>().await,
            Some(InjectedFault::Panic) => panic!("injected candidate failure"),
            None => {}
        }

        let mut remaining = available;
        if remaining.is_empty() {
            remaining = ctx.deck.clone();
        }

        let score = score_dice(&selected);
        if selected.is_empty() || score == 0 {
            return Turn::busted(&remaining, &ctx.displayed);
        }

        remove_selected(&mut remaining, &selected);

        let remaining_count = remaining.len();
        let risk = calculate_risk(remaining_count, ctx.difficulty);
        let outcome = classify(&TurnFacts {
            score,
            selected_count: selected.len(),
            remaining_count,
            risk,
            difficulty: ctx.difficulty,
            npc_score: ctx.npc_score,
            score_to_win: ctx.score_to_win,
        });

        let turn = Turn::new(score, outcome, &selected, &remaining, &ctx.displayed);

        if depth > 0 && should_continue(score, remaining_count, risk, ctx.difficulty) {
            // 續擲結果只用來預熱快取，不改變本回合的決定
            let continued = simulate_continue(inner, Arc::clone(&ctx), &selected, &remaining, depth).await;
            trace!("continuation {} discarded in favour of {}", continued, turn);
        }

        turn
    })
}

async fn simulate_continue(
    inner: Arc<EngineInner>,
    ctx: Arc<SearchContext>,
    selected: &[Die],
    remaining: &[Die],
    depth: i32,
) -> Turn {
    let next_dice = if remaining.is_empty() {
        ctx.deck.clone()
    } else {
        remaining.to_vec()
    };

    let next = simulate_best_turn(inner, Arc::clone(&ctx), next_dice.clone(), depth - 1).await;
    Turn::new(score_dice(selected), next.outcome(), selected, &next_dice, &ctx.displayed)
}

/// 依骰子 id 從 `remaining` 移除選中的骰子
fn remove_selected(remaining: &mut Vec<Die>, selected: &[Die]) {
    for die in selected {
        if let Some(pos) = remaining.iter().position(|d| d.id() == die.id()) {
            remaining.remove(pos);
        }
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_selected_by_identity() {
        let dice: Vec<Die> = [5, 5, 3].iter().map(|&f| Die::regular(f)).collect();
        let mut remaining = dice.clone();
        remove_selected(&mut remaining, &dice[1..2]);
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining[0].id(), dice[0].id());
        assert_eq!(remaining[1].id(), dice[2].id());

        // 不在其中的骰子不影響
        remove_selected(&mut remaining, &[Die::regular(5)]);
        assert_eq!(remaining.len(), 2);
    }

    #[test]
    fn test_candidate_failure_messages() {
        let timeout = CandidateFailure::Timeout {
            candidate: 3,
            after: Duration::from_millis(250),
        };
        assert_eq!(timeout.to_string(), "candidate #3 timed out after 250ms");
        let aborted = CandidateFailure::Aborted {
            candidate: 0,
            message: "task panicked".to_string(),
        };
        assert!(aborted.to_string().contains("task panicked"));
    }

    #[test]
    fn test_engine_starts_with_single_worker() {
        let config = EngineConfig {
            worker_threads: 0,
            ..EngineConfig::default()
        };
        let engine = NpcEngine::new(config).unwrap();
        assert!(engine.cache().is_empty());
        assert_eq!(engine.config().worker_threads, 0);
    }
}
