//! ダイスサービス
//!
//! NdS ロールと 2d6 ロールを提供します。シード付き生成器（ChaCha8）を使うと
//! 同じシードから同じ戦闘が再現されます。

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::models::traits::IDiceRoller;

/// ロール結果
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DiceRoll {
    /// 出目の合計
    pub total: u32,
    /// 各ダイスの出目
    pub rolls: Vec<u32>,
}

impl DiceRoll {
    /// 出目から作成（合計は u32 の上限で飽和）
    pub fn from_rolls(rolls: Vec<u32>) -> Self {
        let total = rolls.iter().fold(0u32, |acc, r| acc.saturating_add(*r));
        Self { total, rolls }
    }
}

/// シード付き乱数生成器（ChaCha8）によるダイス
#[derive(Debug, Clone)]
pub struct Dice {
    rng: ChaCha8Rng,
}

impl Dice {
    /// シード付きダイスを作成（再現可能）
    pub fn seeded(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }
}

impl IDiceRoller for Dice {
    fn roll(&mut self, count: u32, sides: u32) -> DiceRoll {
        if count == 0 || sides == 0 {
            return DiceRoll::default();
        }
        let rolls = (0..count).map(|_| self.rng.gen_range(1..=sides)).collect();
        DiceRoll::from_rolls(rolls)
    }
}

/// 出目を順番に返すダイス
///
/// テストやGMの手動裁定で使用します。出目は面数の範囲に丸められ、
/// 使い切ると先頭から繰り返します。
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    faces: VecDeque<u32>,
    script: Vec<u32>,
}

impl ScriptedDice {
    pub fn new(faces: impl Into<Vec<u32>>) -> Self {
        let script = faces.into();
        Self { faces: script.iter().copied().collect(), script }
    }

    fn next_face(&mut self, sides: u32) -> u32 {
        if self.faces.is_empty() {
            self.faces.extend(self.script.iter().copied());
        }
        self.faces.pop_front().unwrap_or(1).clamp(1, sides)
    }
}

impl IDiceRoller for ScriptedDice {
    fn roll(&mut self, count: u32, sides: u32) -> DiceRoll {
        if count == 0 || sides == 0 {
            return DiceRoll::default();
        }
        let rolls = (0..count).map(|_| self.next_face(sides)).collect();
        DiceRoll::from_rolls(rolls)
    }
}
