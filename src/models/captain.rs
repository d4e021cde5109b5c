use serde::Serialize;

use crate::models::ship::Combatant;

/// 既定の離脱閾値（船体割合）
pub const DEFAULT_FLEE_THRESHOLD: f64 = 0.3;
/// 出力割合がこれを下回ると離脱
pub const POWER_FLEE_THRESHOLD: f64 = 0.2;
/// 勝算がこれを下回り、かつ船体が半分未満なら降伏
pub const SURRENDER_ODDS: f64 = 0.2;
pub const SURRENDER_HULL: f64 = 0.5;
/// 勝算がこれを下回ると離脱
pub const FLEE_ODDS: f64 = 0.3;

/// 艦長の判断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptainDecision {
    Fight,
    Flee,
    Surrender,
}

/// 判断に使う彼我の戦力
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleOdds {
    pub friendly_strength: f64,
    pub enemy_strength: f64,
}

impl BattleOdds {
    pub fn new(friendly_strength: f64, enemy_strength: f64) -> Self {
        Self { friendly_strength, enemy_strength }
    }

    /// 勝算 = 味方戦力 / (味方 + 敵)。双方0なら0.5
    pub fn odds(&self) -> f64 {
        let total = self.friendly_strength + self.enemy_strength;
        if total <= 0.0 {
            return 0.5;
        }
        self.friendly_strength / total
    }
}

/// 艦長AIの判断
///
/// 先に一致した条件が優先されます:
/// 1. 船体割合 < 離脱閾値、または出力割合 < 0.2 → 離脱
/// 2. 勝算 < 0.2 かつ船体割合 < 0.5 → 降伏
/// 3. 勝算 < 0.3 → 離脱
/// 4. それ以外 → 交戦
///
/// 圧倒的に不利な場合でも、降伏より先に離脱を検討します。
pub fn captain_decision(ship: &Combatant, odds: &BattleOdds) -> CaptainDecision {
    let hull_percent = ship.hull_percent();
    let power_percent = ship.power_percent();
    let flee_threshold = ship.flee_threshold.unwrap_or(DEFAULT_FLEE_THRESHOLD);
    let odds = odds.odds();

    if hull_percent < flee_threshold || power_percent < POWER_FLEE_THRESHOLD {
        CaptainDecision::Flee
    } else if odds < SURRENDER_ODDS && hull_percent < SURRENDER_HULL {
        CaptainDecision::Surrender
    } else if odds < FLEE_ODDS {
        CaptainDecision::Flee
    } else {
        CaptainDecision::Fight
    }
}
