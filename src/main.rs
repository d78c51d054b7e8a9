use std::sync::Arc;

use env_logger::Env;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use farkle_npc::game::{Die, NpcProfile, NpcRoster, Turn, TurnOutcome, DEFAULT_SCORE_TO_WIN};
use farkle_npc::service::{EngineConfig, LogObserver, NpcEngine};

/// 單局最多回合數
const MAX_TURNS: usize = 200;
/// 單回合最多擲骰次數
const MAX_ROLLS_PER_TURN: usize = 50;

// ============================================================================
// 自我對局
// ============================================================================

/// 進行一個回合，回傳落袋的分數
fn play_turn<R: Rng>(
    engine: &NpcEngine,
    npc: &NpcProfile,
    banked: i32,
    score_to_win: i32,
    rng: &mut R,
) -> i32 {
    let mut hand = roll_full_deck(npc, rng);
    let mut turn_score = 0;

    for _ in 0..MAX_ROLLS_PER_TURN {
        let turn = engine.decide(&hand, npc, banked, score_to_win);
        match turn.outcome() {
            TurnOutcome::Busted => return 0,
            TurnOutcome::Pass => return turn_score + turn.score(),
            TurnOutcome::Scored => {
                turn_score += turn.score();
                hand = next_hand(npc, &turn, &hand, rng);
            }
        }
    }

    warn!("{} hit the roll cap, banking {}", npc.name, turn_score);
    turn_score
}

/// 用自己手上的骰子續擲；全部骰子都計分則整組重擲
fn next_hand<R: Rng>(npc: &NpcProfile, turn: &Turn, hand: &[Die], rng: &mut R) -> Vec<Die> {
    let mut rest = turn.unselected_from(hand);
    if rest.is_empty() {
        return roll_full_deck(npc, rng);
    }
    for die in &mut rest {
        die.roll(rng);
    }
    rest
}

fn roll_full_deck<R: Rng>(npc: &NpcProfile, rng: &mut R) -> Vec<Die> {
    let mut deck = npc.deck.clone();
    deck.roll(rng);
    deck.dice().to_vec()
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

// ============================================================================
// 入口
// ============================================================================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = EngineConfig::from_env();
    let npc_name = std::env::var("FARKLE_NPC").unwrap_or_else(|_| "Jeb".to_string());
    let score_to_win = env_parse("FARKLE_SCORE_TO_WIN").unwrap_or(DEFAULT_SCORE_TO_WIN);
    let mut rng = match env_parse::<u64>("FARKLE_SEED") {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let roster = NpcRoster::default();
    let npc = roster.get(&npc_name)?;
    info!(
        "{} (difficulty {}) plays to {} with {:?}",
        npc.name,
        npc.difficulty(),
        score_to_win,
        npc.deck.dice().iter().map(Die::name).collect::<Vec<_>>()
    );
    info!("engine config: {:?}", config);

    let engine = NpcEngine::new(config)?.with_observer(Arc::new(LogObserver));

    let mut banked = 0;
    for turn_number in 1..=MAX_TURNS {
        let gained = play_turn(&engine, npc, banked, score_to_win, &mut rng);
        banked += gained;
        info!("turn {}: +{} (total {})", turn_number, gained, banked);

        if banked >= score_to_win {
            info!(
                "{} reached {} in {} turns (cache entries: {})",
                npc.name,
                banked,
                turn_number,
                engine.cache().len()
            );
            return Ok(());
        }
    }

    info!("{} stopped at {} after {} turns", npc.name, banked, MAX_TURNS);
    Ok(())
}

// ============================================================================
// 單元測試
// ============================================================================
