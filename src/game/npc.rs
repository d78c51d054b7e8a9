//! NPC 角色設定與名冊
//!
//! 名冊使用聲明式定義（可由 JSON 載入），建構後轉成 `NpcProfile`。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::deck::DiceDeck;
use super::dice::DiceKind;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("NPC {0} has no dice")]
    EmptyDeck(String),
    #[error("NPC not found: {0}")]
    NotFound(String),
}

/// NPC 定義（名冊檔的一筆）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NpcDef {
    pub name: String,
    pub dice: Vec<DiceKind>,
    #[serde(default = "unlimited_balance")]
    pub balance: i64,
    pub difficulty: i32,
    pub integrity: bool,
    pub max_bet: i64,
    pub min_bet: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quote: String,
}

fn unlimited_balance() -> i64 {
    i32::MAX as i64
}

/// NPC 角色
///
/// `difficulty` 只能透過 `&mut self` 修改，因此不會與進行中的決策同時變動。
/// `integrity` 保留給反作弊行為，決策策略不讀取。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NpcProfile {
    pub name: String,
    pub deck: DiceDeck,
    pub balance: i64,
    pub current_bet: i64,
    difficulty: i32,
    pub integrity: bool,
    pub max_bet: i64,
    pub min_bet: i64,
    pub description: String,
    pub quote: String,
}

impl NpcProfile {
    pub fn from_def(def: &NpcDef) -> Result<Self, RosterError> {
        if def.dice.is_empty() {
            return Err(RosterError::EmptyDeck(def.name.clone()));
        }
        Ok(Self {
            name: def.name.clone(),
            deck: DiceDeck::from_kinds(&def.dice),
            balance: def.balance,
            current_bet: 0,
            difficulty: def.difficulty,
            integrity: def.integrity,
            max_bet: def.max_bet,
            min_bet: def.min_bet,
            description: def.description.clone(),
            quote: def.quote.clone(),
        })
    }

    pub fn difficulty(&self) -> i32 {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: i32) {
        self.difficulty = difficulty;
    }
}

/// 內建名冊
pub fn default_defs() -> Vec<NpcDef> {
    use DiceKind::*;
    vec![
        NpcDef {
            name: "Sam".to_string(),
            dice: vec![Lucky, Lucky, Lucky, Lucky, Cursed, Cursed],
            balance: unlimited_balance(),
            difficulty: 3,
            integrity: false,
            max_bet: 700,
            min_bet: 30,
            description: "A grinning rogue who palms dice, \"accidentally\" miscounts, and always has an excuse.".to_string(),
            quote: "\"What? Me? Naw, I'd never... unless the opportunity arises.\"".to_string(),
        },
        NpcDef {
            name: "Jeb".to_string(),
            dice: vec![Regular, Regular, Regular, Regular, Lucky, Cursed],
            balance: unlimited_balance(),
            difficulty: 2,
            integrity: true,
            max_bet: 400,
            min_bet: 10,
            description: "A wrinkled, tobacco-chewing farmer who's been playing dice since before the others were born.".to_string(),
            quote: "\"Back in my day, we rolled bones, not fancy dice!\"".to_string(),
        },
    ]
}

/// NPC 名冊
#[derive(Clone, Debug)]
pub struct NpcRoster {
    npcs: Vec<NpcProfile>,
}

impl NpcRoster {
    pub fn from_defs(defs: &[NpcDef]) -> Result<Self, RosterError> {
        let npcs = defs
            .iter()
            .map(NpcProfile::from_def)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { npcs })
    }

    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        let defs: Vec<NpcDef> = serde_json::from_str(json)?;
        Self::from_defs(&defs)
    }

    pub fn get(&self, name: &str) -> Result<&NpcProfile, RosterError> {
        self.npcs
            .iter()
            .find(|npc| npc.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| RosterError::NotFound(name.to_string()))
    }

    pub fn npcs(&self) -> &[NpcProfile] {
        &self.npcs
    }
}

impl Default for NpcRoster {
    fn default() -> Self {
        let npcs = default_defs()
            .iter()
            .filter_map(|def| NpcProfile::from_def(def).ok())
            .collect();
        Self { npcs }
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster() {
        let roster = NpcRoster::default();
        assert_eq!(roster.npcs().len(), 2);

        let sam = roster.get("Sam").unwrap();
        assert_eq!(sam.difficulty(), 3);
        assert!(!sam.integrity);
        assert_eq!(sam.deck.len(), 6);
        assert_eq!(sam.deck.balance(), 4 * -1 + 2 * 2);

        let jeb = roster.get("jeb").unwrap();
        assert_eq!(jeb.difficulty(), 2);
        assert_eq!((jeb.min_bet, jeb.max_bet), (10, 400));
        assert_eq!(jeb.balance, i32::MAX as i64);
    }

    #[test]
    fn test_unknown_npc() {
        let roster = NpcRoster::default();
        assert!(matches!(roster.get("Zed"), Err(RosterError::NotFound(_))));
    }

    #[test]
    fn test_roster_from_json() {
        let json = r#"[
            {"name": "Ada", "dice": ["Royal", "Regular", "Regular"], "difficulty": 1,
             "integrity": true, "max_bet": 50, "min_bet": 5}
        ]"#;
        let roster = NpcRoster::from_json(json).unwrap();
        let ada = roster.get("Ada").unwrap();
        assert_eq!(ada.deck.len(), 3);
        assert_eq!(ada.deck.dice()[0].kind(), DiceKind::Royal);
        assert_eq!(ada.balance, i32::MAX as i64);
        assert!(ada.quote.is_empty());
    }

    #[test]
    fn test_roster_errors() {
        assert!(matches!(NpcRoster::from_json("{"), Err(RosterError::Json(_))));
        let json = r#"[{"name": "Nobody", "dice": [], "difficulty": 1,
                        "integrity": true, "max_bet": 1, "min_bet": 1}]"#;
        assert!(matches!(NpcRoster::from_json(json), Err(RosterError::EmptyDeck(_))));
    }

    #[test]
    fn test_set_difficulty() {
        let mut jeb = NpcRoster::default().get("Jeb").unwrap().clone();
        jeb.set_difficulty(5);
        assert_eq!(jeb.difficulty(), 5);
    }
}
