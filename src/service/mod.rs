//! 服務層模組
//!
//! 提供 NPC 決策所需的設定、風險策略、模擬快取與並行搜尋引擎

pub mod cache;
pub mod config;
pub mod engine;
pub mod observer;
pub mod policy;

pub use cache::{CacheKey, SimulationCache};
pub use config::EngineConfig;
pub use engine::{CandidateFailure, EngineError, NpcEngine};
pub use observer::{LogObserver, TurnObserver};
pub use policy::{calculate_risk, classify, should_continue, TurnFacts};
