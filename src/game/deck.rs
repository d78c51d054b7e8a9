//! 骰組
//!
//! 玩家持有的一組骰子。NPC 引擎只讀取點數；擲骰只發生在骰組上。

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::dice::{DiceKind, Die};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DiceDeck {
    dice: Vec<Die>,
}

impl DiceDeck {
    pub fn new(dice: Vec<Die>) -> Self {
        Self { dice }
    }

    /// 依種類建立骰組，初始點數皆為 1
    pub fn from_kinds(kinds: &[DiceKind]) -> Self {
        Self::new(kinds.iter().map(|&kind| Die::new(kind, 1)).collect())
    }

    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for die in &mut self.dice {
            die.roll(rng);
        }
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn faces(&self) -> Vec<u8> {
        self.dice.iter().map(Die::face).collect()
    }

    pub fn add(&mut self, die: Die) {
        self.dice.push(die);
    }

    pub fn remove(&mut self, id: u64) -> Option<Die> {
        let idx = self.dice.iter().position(|d| d.id() == id)?;
        Some(self.dice.remove(idx))
    }

    /// 骰組的 balance 加總
    pub fn balance(&self) -> i32 {
        self.dice.iter().map(Die::balance).sum()
    }

    pub fn len(&self) -> usize {
        self.dice.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }
}

// ============================================================================
// 單元測試
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_balance() {
        let deck = DiceDeck::from_kinds(&[DiceKind::Regular, DiceKind::Regular]);
        assert_eq!(deck.balance(), 0);

        let deck = DiceDeck::from_kinds(&[DiceKind::Lucky, DiceKind::Cursed, DiceKind::Cursed]);
        assert_eq!(deck.balance(), -1 + 2 + 2);
    }

    #[test]
    fn test_add_remove() {
        let mut deck = DiceDeck::default();
        assert!(deck.is_empty());
        let die = Die::regular(3);
        let id = die.id();
        deck.add(die);
        deck.add(Die::regular(3));
        assert_eq!(deck.len(), 2);

        let removed = deck.remove(id).unwrap();
        assert_eq!(removed.id(), id);
        assert_eq!(deck.len(), 1);
        assert!(deck.remove(id).is_none());
    }

    #[test]
    fn test_roll_changes_faces_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut deck = DiceDeck::from_kinds(&[DiceKind::Regular; 6]);
        assert_eq!(deck.faces(), vec![1; 6]);
        for _ in 0..20 {
            deck.roll(&mut rng);
            assert!(deck.faces().iter().all(|f| (1..=6).contains(f)));
        }
    }
}
