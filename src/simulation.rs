//! # Simulation モジュール
//!
//! 艦隊戦の中核となる戦闘ループ（ラウンド進行）を提供します。
//!
//! このモジュールは、艦長AIの判断、兵装の射撃、ミサイルの迎撃・着弾を
//! 厳密なラウンド順序で進行させ、終了条件を判定します。戦闘エンジン自体は
//! 同期的な純粋計算で、乱数は戦闘ごとに注入されたダイスからのみ取得します。
//!
//! ## ラウンド処理順序
//!
//! 各ラウンドにおいて、以下の順序で処理が実行されます：
//!
//! 1. **艦長判断**: アクティブな敵艦が交戦・離脱・降伏を判断
//! 2. **終了判定**: 一方の陣営にアクティブ艦が残っていなければ終了
//! 3. **ミサイル発射**: 発射待ちのミサイルを発射
//! 4. **直接射撃**: 残りの兵装による攻撃（味方 → 敵の順）
//! 5. **ミサイル進行**: 迎撃と着弾の解決
//! 6. **撃沈判定**: 船体値0の艦を撃沈状態に
//! 7. **ラウンド更新**
//!
//! 離脱した艦が同じラウンド内で攻撃目標に残らないよう、判断は射撃より先に行います。
//!
//! ## 使用例
//!
//! ```no_run
//! use fleetsim::simulation::BattleEngine;
//! use fleetsim::scenario::ScenarioConfig;
//!
//! let config = ScenarioConfig::from_file("scenarios/skirmish.yaml")?;
//! let mut engine = BattleEngine::from_scenario(&config);
//! let summary = engine.run();
//! println!("{:?}", summary.outcome);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::models::*;
use crate::scenario::ScenarioConfig;

/// 戦闘の基本設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleSettings {
    pub max_rounds: u32,
    pub range: RangeBand,
    pub missile_flight_rounds: u32,
}

impl Default for BattleSettings {
    fn default() -> Self {
        Self { max_rounds: 20, range: RangeBand::Medium, missile_flight_rounds: 1 }
    }
}

/// 戦闘結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    /// 一方の陣営が全滅（撃沈・離脱・降伏）
    Victory { winner: Side },
    /// 最大ラウンド到達。船体割合の高い陣営が優勢（同率なら None）
    Stalemate { favored: Option<Side> },
}

impl BattleOutcome {
    pub fn winner(&self) -> Option<Side> {
        match self {
            BattleOutcome::Victory { winner } => Some(*winner),
            BattleOutcome::Stalemate { .. } => None,
        }
    }
}

/// 戦闘ログのエントリ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BattleEvent {
    Decision { round: u32, ship_id: String, decision: CaptainDecision },
    Attack { round: u32, attacker_id: String, target_id: String, weapon: String, outcome: String, damage: u32 },
    Screen { round: u32, ship_id: String, armor_bonus: u32 },
    MissileLaunched { round: u32, missile_id: String, owner_id: String, target_id: String },
    Missile { round: u32, event: MissileEvent },
    Destroyed { round: u32, ship_id: String },
    Ended { round: u32, outcome: BattleOutcome },
}

/// 戦闘状態
///
/// 戦闘開始時に作成され、毎ラウンド更新されます。艦は作成した戦闘が排他的に所有します。
#[derive(Debug, Clone)]
pub struct BattleState {
    /// 現在のラウンド（1始まり）
    pub round: u32,
    pub player_fleet: Fleet,
    pub enemy_fleet: Fleet,
    pub missiles: MissileTracker,
    pub log: Vec<BattleEvent>,
}

impl BattleState {
    pub fn new(player_fleet: Fleet, enemy_fleet: Fleet, missile_flight_rounds: u32) -> Self {
        Self {
            round: 1,
            player_fleet,
            enemy_fleet,
            missiles: MissileTracker::new(missile_flight_rounds),
            log: Vec::new(),
        }
    }

    pub fn fleet(&self, side: Side) -> &Fleet {
        match side {
            Side::Player => &self.player_fleet,
            Side::Enemy => &self.enemy_fleet,
        }
    }

    /// 指定陣営から見た彼我の戦力
    pub fn odds_for(&self, side: Side) -> BattleOdds {
        BattleOdds::new(
            calculate_fleet_strength(self.fleet(side)),
            calculate_fleet_strength(self.fleet(side.opponent())),
        )
    }
}

/// 戦闘終了時のサマリ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleSummary {
    pub outcome: BattleOutcome,
    /// 完了したラウンド数
    pub rounds: u32,
    /// 艦IDごとの船体割合
    pub per_ship_hull_pct: BTreeMap<String, f64>,
    pub missiles_launched: usize,
    pub missiles_intercepted: usize,
    pub missiles_impacted: usize,
    /// 戦闘終了時点で追尾中のまま残ったミサイル数
    pub missiles_tracking: usize,
    pub flees: usize,
    pub surrenders: usize,
}

/// 戦闘エンジン（ラウンド進行）
pub struct BattleEngine<D: IDiceRoller = Dice> {
    pub state: BattleState,
    pub settings: BattleSettings,
    dispatcher: WeaponDispatcher<D>,
    rounds_completed: u32,
}

impl BattleEngine<Dice> {
    /// シナリオ設定から戦闘を作成（シナリオのシードでダイスを初期化）
    pub fn from_scenario(scenario: &ScenarioConfig) -> Self {
        Self::from_scenario_with_dice(scenario, Dice::seeded(scenario.battle.seed))
    }
}

impl<D: IDiceRoller> BattleEngine<D> {
    pub fn from_scenario_with_dice(scenario: &ScenarioConfig, dice: D) -> Self {
        let settings = BattleSettings {
            max_rounds: scenario.battle.max_rounds,
            range: scenario.battle.starting_range,
            missile_flight_rounds: scenario.battle.missile_flight_rounds,
        };
        Self::new(scenario.player_fleet.build(), scenario.enemy_fleet.build(), settings, dice)
    }

    pub fn new(player_fleet: Fleet, enemy_fleet: Fleet, settings: BattleSettings, dice: D) -> Self {
        Self {
            state: BattleState::new(player_fleet, enemy_fleet, settings.missile_flight_rounds),
            settings,
            dispatcher: WeaponDispatcher::new(dice),
            rounds_completed: 0,
        }
    }

    /// 終了条件まで戦闘を実行
    pub fn run(&mut self) -> BattleSummary {
        info!(
            player_ships = self.state.player_fleet.ships.len(),
            enemy_ships = self.state.enemy_fleet.ships.len(),
            range = %self.settings.range,
            max_rounds = self.settings.max_rounds,
            "=== 戦闘開始 ==="
        );

        let outcome = loop {
            if self.state.round > self.settings.max_rounds {
                break self.check_elimination().unwrap_or_else(|| self.stalemate());
            }
            if let Some(outcome) = self.step() {
                break outcome;
            }
        };

        self.state.log.push(BattleEvent::Ended { round: self.state.round, outcome });
        let summary = self.summary(outcome);
        for missile in self.state.missiles.tracking() {
            debug!(
                missile_id = %missile.id,
                target_id = %missile.target_id,
                arrival_round = missile.arrival_round,
                "MISSILE_STILL_TRACKING: 戦闘終了時に追尾中のミサイル"
            );
        }
        info!(
            outcome = ?summary.outcome,
            rounds = summary.rounds,
            missiles_launched = summary.missiles_launched,
            missiles_tracking = summary.missiles_tracking,
            flees = summary.flees,
            surrenders = summary.surrenders,
            "BATTLE_END: 戦闘が終了しました"
        );
        summary
    }

    /// 1ラウンドの処理。戦闘が終了した場合は結果を返す
    pub fn step(&mut self) -> Option<BattleOutcome> {
        trace!(round = self.state.round, "ラウンド開始");

        for ship in self.state.player_fleet.ships.iter_mut().chain(self.state.enemy_fleet.ships.iter_mut()) {
            ship.reset_round();
        }

        self.process_captains();

        if let Some(outcome) = self.check_elimination() {
            return Some(outcome);
        }

        self.process_launches(Side::Player);
        self.process_launches(Side::Enemy);
        self.process_direct_fire(Side::Player);
        self.process_direct_fire(Side::Enemy);
        self.process_missiles();
        self.process_destruction();

        self.state.round += 1;
        self.rounds_completed += 1;
        None
    }

    /// 敵艦の艦長判断（味方艦は常に交戦）
    fn process_captains(&mut self) {
        let round = self.state.round;
        let odds = self.state.odds_for(Side::Enemy);

        for ship in self.state.enemy_fleet.ships.iter_mut().filter(|s| s.is_active()) {
            let decision = captain_decision(ship, &odds);
            match decision {
                CaptainDecision::Fight => continue,
                CaptainDecision::Flee => ship.status = ShipStatus::Fled,
                CaptainDecision::Surrender => ship.status = ShipStatus::Surrendered,
            }
            info!(
                round,
                ship_id = %ship.id,
                decision = ?decision,
                hull_percent = ship.hull_percent(),
                odds = odds.odds(),
                "CAPTAIN_DECISION: 艦長が戦闘離脱を判断しました"
            );
            self.state.log.push(BattleEvent::Decision { round, ship_id: ship.id.clone(), decision });
        }
    }

    fn check_elimination(&self) -> Option<BattleOutcome> {
        let player_active = self.state.player_fleet.has_active_ships();
        let enemy_active = self.state.enemy_fleet.has_active_ships();
        match (player_active, enemy_active) {
            (true, true) => None,
            (true, false) => Some(BattleOutcome::Victory { winner: Side::Player }),
            (false, true) => Some(BattleOutcome::Victory { winner: Side::Enemy }),
            (false, false) => Some(self.stalemate()),
        }
    }

    fn stalemate(&self) -> BattleOutcome {
        let player = self.state.player_fleet.hull_percent();
        let enemy = self.state.enemy_fleet.hull_percent();
        let favored = if player > enemy {
            Some(Side::Player)
        } else if enemy > player {
            Some(Side::Enemy)
        } else {
            None
        };
        BattleOutcome::Stalemate { favored }
    }

    /// 発射待ちミサイルの発射
    fn process_launches(&mut self, side: Side) {
        let round = self.state.round;
        let range = self.settings.range;
        let BattleState { player_fleet, enemy_fleet, missiles, log, .. } = &mut self.state;
        let (own, opposing) = side_fleets(player_fleet, enemy_fleet, side);

        for index in 0..own.ships.len() {
            if !own.ships[index].is_active() {
                continue;
            }
            let queued: Vec<Weapon> = own.ships[index]
                .weapons()
                .filter(|w| w.kind() == Some(WeaponKind::Missile))
                .cloned()
                .collect();

            for weapon in &queued {
                if own.ships[index].ammo.missiles == 0 {
                    break;
                }
                let Some(target) = opposing.select_target() else {
                    return;
                };
                let defender = &opposing.ships[target];
                let mut context = AttackContext::new(&mut own.ships[index], weapon, range).against(defender);
                if let AttackResult::Launched { range_bonus } = self.dispatcher.launch_missile(&mut context) {
                    let missile = missiles.launch(&own.ships[index].id, &defender.id, range_bonus, round);
                    log.push(BattleEvent::MissileLaunched {
                        round,
                        missile_id: missile.id.clone(),
                        owner_id: missile.owner_id.clone(),
                        target_id: missile.target_id.clone(),
                    });
                }
            }
        }
    }

    /// 直接射撃兵装による攻撃
    fn process_direct_fire(&mut self, side: Side) {
        let round = self.state.round;
        let range = self.settings.range;
        let BattleState { player_fleet, enemy_fleet, log, .. } = &mut self.state;
        let (own, opposing) = side_fleets(player_fleet, enemy_fleet, side);

        for index in 0..own.ships.len() {
            if !own.ships[index].is_active() {
                continue;
            }
            let guns: Vec<Weapon> = own.ships[index]
                .weapons()
                .filter(|w| w.kind().is_none_or(WeaponKind::is_direct_fire))
                .cloned()
                .collect();

            for weapon in &guns {
                if !self.dispatcher.can_fire_at_range(weapon, range) {
                    trace!(ship_id = %own.ships[index].id, weapon = %weapon.weapon_type, "射程外のため射撃不可");
                    continue;
                }
                let Some(target) = opposing.select_target() else {
                    return;
                };

                if let Some(AttackResult::Screened { bonus, .. }) =
                    self.dispatcher.react_with_sandcaster(&mut opposing.ships[target], range, AttackType::Laser)
                {
                    log.push(BattleEvent::Screen {
                        round,
                        ship_id: opposing.ships[target].id.clone(),
                        armor_bonus: bonus.armor,
                    });
                }

                let attacker = &mut own.ships[index];
                let attacker_id = attacker.id.clone();
                let mut context = AttackContext::new(attacker, weapon, range).against(&opposing.ships[target]);
                let result = self.dispatcher.attack(&mut context);

                let defender = &mut opposing.ships[target];
                defender.take_damage(result.damage());
                defender.sand_bonus = None;

                let outcome = describe(&result);
                if result.is_hit() {
                    info!(
                        round,
                        attacker_id = %attacker_id,
                        target_id = %defender.id,
                        weapon = %weapon.weapon_type,
                        damage = result.damage(),
                        remaining_hull = defender.hull,
                        "ATTACK_HIT: 命中しました"
                    );
                } else {
                    debug!(round, attacker_id = %attacker_id, target_id = %defender.id, outcome = %outcome, "ATTACK_MISS");
                }
                log.push(BattleEvent::Attack {
                    round,
                    attacker_id,
                    target_id: defender.id.clone(),
                    weapon: normalize_weapon_type(&weapon.weapon_type),
                    outcome,
                    damage: result.damage(),
                });
            }
        }
    }

    /// ミサイルの迎撃・着弾
    fn process_missiles(&mut self) {
        let round = self.state.round;
        let BattleState { player_fleet, enemy_fleet, missiles, log, .. } = &mut self.state;
        let events = missiles.advance(round, self.settings.range, &mut self.dispatcher, &mut [player_fleet, enemy_fleet]);
        log.extend(events.into_iter().map(|event| BattleEvent::Missile { round, event }));
    }

    /// 撃沈判定
    fn process_destruction(&mut self) {
        let round = self.state.round;
        let BattleState { player_fleet, enemy_fleet, log, .. } = &mut self.state;
        for ship in player_fleet.ships.iter_mut().chain(enemy_fleet.ships.iter_mut()) {
            if ship.check_destruction() {
                info!(round, ship_id = %ship.id, name = %ship.name, "SHIP_DESTROYED: 艦が撃沈されました");
                log.push(BattleEvent::Destroyed { round, ship_id: ship.id.clone() });
            }
        }
    }

    /// 戦闘サマリの作成
    pub fn summary(&self, outcome: BattleOutcome) -> BattleSummary {
        let ships = || self.state.player_fleet.ships.iter().chain(self.state.enemy_fleet.ships.iter());
        BattleSummary {
            outcome,
            rounds: self.rounds_completed,
            per_ship_hull_pct: ships().map(|s| (s.id.clone(), s.hull_percent())).collect(),
            missiles_launched: self.state.missiles.missiles.len(),
            missiles_intercepted: self.state.missiles.count_with_status(MissileStatus::Destroyed),
            missiles_impacted: self.state.missiles.count_with_status(MissileStatus::Impacted),
            missiles_tracking: self.state.missiles.tracking().count(),
            flees: ships().filter(|s| s.status == ShipStatus::Fled).count(),
            surrenders: ships().filter(|s| s.status == ShipStatus::Surrendered).count(),
        }
    }
}

/// 陣営から（自艦隊, 敵艦隊）を取得
fn side_fleets<'a>(player: &'a mut Fleet, enemy: &'a mut Fleet, side: Side) -> (&'a mut Fleet, &'a mut Fleet) {
    match side {
        Side::Player => (player, enemy),
        Side::Enemy => (enemy, player),
    }
}

fn describe(result: &AttackResult) -> String {
    match result {
        AttackResult::Hit { damage, .. } => format!("hit: {}", damage.breakdown),
        AttackResult::Miss { attack } => format!("miss (total {})", attack.total),
        AttackResult::Blocked { reason } => format!("blocked: {}", reason),
        AttackResult::Launched { range_bonus } => format!("launched (+{})", range_bonus),
        AttackResult::Intercepted { .. } => "intercepted".to_string(),
        AttackResult::Screened { bonus, .. } => format!("screened (+{})", bonus.armor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::tests::SKIRMISH_YAML;

    fn gunboat(id: &str, hull: u32) -> Combatant {
        Combatant::new(id, id, hull, 0).with_weapon(Weapon::new("laser", "2d6"))
    }

    #[test]
    fn test_enemy_flees_before_firing() {
        let player = Fleet::new("p", vec![gunboat("p1", 100)]);
        let mut wounded = gunboat("e1", 100);
        wounded.hull = 10;
        let enemy = Fleet::new("e", vec![wounded]);
        let mut engine = BattleEngine::new(player, enemy, BattleSettings::default(), ScriptedDice::new(vec![6]));

        let summary = engine.run();
        assert_eq!(summary.outcome, BattleOutcome::Victory { winner: Side::Player });
        assert_eq!(summary.flees, 1);
        assert_eq!(summary.rounds, 0);
        assert_eq!(engine.state.enemy_fleet.ships[0].hull, 10);
        assert!(!engine.state.log.iter().any(|e| matches!(e, BattleEvent::Attack { .. })));
    }

    #[test]
    fn test_player_destroys_enemy() {
        let player = Fleet::new("p", vec![gunboat("p1", 100)]);
        let enemy = Fleet::new("e", vec![gunboat("e1", 16)]);
        // 全ての出目6: 命中判定12 効果4、ダメージ 12+4=16
        let mut engine = BattleEngine::new(player, enemy, BattleSettings::default(), ScriptedDice::new(vec![6]));

        let summary = engine.run();
        assert_eq!(summary.outcome.winner(), Some(Side::Player));
        assert!(engine.state.enemy_fleet.ships[0].is_destroyed());
        // 撃沈は射撃後に判定されるため、敵艦も同じラウンドに反撃する
        assert_eq!(engine.state.player_fleet.ships[0].hull, 100 - 16);
        assert_eq!(summary.rounds, 1);
        assert!(engine.state.log.iter().any(|e| matches!(e, BattleEvent::Destroyed { ship_id, .. } if ship_id == "e1")));
    }

    #[test]
    fn test_round_limit_stalemate_favours_healthier_side() {
        let player = Fleet::new("p", vec![Combatant::new("p1", "p1", 100, 0)]);
        let mut enemy_ship = Combatant::new("e1", "e1", 100, 0);
        enemy_ship.hull = 80;
        enemy_ship.flee_threshold = Some(0.0);
        let enemy = Fleet::new("e", vec![enemy_ship]);
        let settings = BattleSettings { max_rounds: 3, ..BattleSettings::default() };
        let mut engine = BattleEngine::new(player, enemy, settings, ScriptedDice::new(vec![1]));

        let summary = engine.run();
        assert_eq!(summary.rounds, 3);
        assert_eq!(summary.outcome, BattleOutcome::Stalemate { favored: Some(Side::Player) });
    }

    #[test]
    fn test_missiles_launch_and_impact_next_round() {
        let player = Fleet::new(
            "p",
            vec![Combatant::new("p1", "p1", 100, 0)
                .with_weapon(Weapon::standard(WeaponKind::Missile))
                .with_ammo(1, 0)],
        );
        let mut target = Combatant::new("e1", "e1", 100, 0);
        target.flee_threshold = Some(0.0);
        let enemy = Fleet::new("e", vec![target]);
        let settings = BattleSettings { max_rounds: 2, range: RangeBand::Long, missile_flight_rounds: 1 };
        let mut engine = BattleEngine::new(player, enemy, settings, ScriptedDice::new(vec![3]));

        assert_eq!(engine.step(), None);
        assert_eq!(engine.state.missiles.missiles.len(), 1);
        assert!(engine.state.missiles.missiles[0].is_tracking());
        assert_eq!(engine.state.player_fleet.ships[0].ammo.missiles, 0);

        assert_eq!(engine.step(), None);
        // 4d6 = 12 + 長距離ボーナス2
        assert_eq!(engine.state.enemy_fleet.ships[0].hull, 86);
        assert_eq!(engine.state.missiles.count_with_status(MissileStatus::Impacted), 1);
    }

    #[test]
    fn test_enemy_surrenders_when_outgunned() {
        let mut heavy = gunboat("p1", 100);
        heavy.thrust = Some(6);
        for _ in 0..4 {
            heavy = heavy.with_weapon(Weapon::new("pulse laser", "2d6"));
        }
        let player = Fleet::new("p", vec![heavy]);
        let mut hulk = gunboat("e1", 100);
        hulk.hull = 40;
        let enemy = Fleet::new("e", vec![hulk]);
        let mut engine = BattleEngine::new(player, enemy, BattleSettings::default(), ScriptedDice::new(vec![1]));

        let summary = engine.run();
        assert_eq!(summary.surrenders, 1);
        assert_eq!(summary.outcome.winner(), Some(Side::Player));
    }

    #[test]
    fn test_seeded_scenario_is_reproducible() {
        let config = ScenarioConfig::from_yaml_str(SKIRMISH_YAML).unwrap();
        let first = BattleEngine::from_scenario(&config).run();
        let second = BattleEngine::from_scenario(&config).run();
        assert_eq!(first, second);
        assert!(first.rounds <= config.battle.max_rounds);
        assert!(first.per_ship_hull_pct.values().all(|pct| (0.0..=1.0).contains(pct)));
    }

    #[test]
    fn test_missile_left_tracking_when_target_flees() {
        let raider = Combatant::new("p1", "p1", 100, 0)
            .with_weapon(Weapon::new("laser", "2d6"))
            .with_weapon(Weapon::standard(WeaponKind::Missile))
            .with_ammo(1, 0);
        let player = Fleet::new("p", vec![raider]);
        let mut target = Combatant::new("e1", "e1", 100, 0);
        target.hull = 40;
        target.thrust = Some(4);
        let enemy = Fleet::new("e", vec![target]);
        let settings = BattleSettings { max_rounds: 10, range: RangeBand::Long, missile_flight_rounds: 2 };
        // 命中 12-2=10 効果2、ダメージ 12+2=14 → 船体 26/100 で次ラウンドに離脱
        let mut engine = BattleEngine::new(player, enemy, settings, ScriptedDice::new(vec![6]));

        let summary = engine.run();
        assert_eq!(summary.outcome, BattleOutcome::Victory { winner: Side::Player });
        assert_eq!(summary.flees, 1);
        assert_eq!(summary.missiles_launched, 1);
        assert_eq!(summary.missiles_tracking, 1);
        assert_eq!(summary.missiles_impacted, 0);
        assert_eq!(engine.state.enemy_fleet.ships[0].hull, 26);
    }

    #[test]
    fn test_equal_hull_stalemate_favours_nobody() {
        let mut player_ship = Combatant::new("p1", "p1", 100, 0);
        player_ship.hull = 50;
        let mut enemy_ship = Combatant::new("e1", "e1", 100, 0);
        enemy_ship.hull = 50;
        enemy_ship.flee_threshold = Some(0.0);
        let player = Fleet::new("p", vec![player_ship]);
        let enemy = Fleet::new("e", vec![enemy_ship]);
        let settings = BattleSettings { max_rounds: 2, ..BattleSettings::default() };
        let mut engine = BattleEngine::new(player, enemy, settings, ScriptedDice::new(vec![1]));

        let summary = engine.run();
        assert_eq!(summary.rounds, 2);
        assert_eq!(summary.outcome, BattleOutcome::Stalemate { favored: None });
        assert_eq!(summary.outcome.winner(), None);
    }

    #[test]
    fn test_mutual_destruction_ends_without_winner() {
        let player = Fleet::new("p", vec![gunboat("p1", 16)]);
        let enemy = Fleet::new("e", vec![gunboat("e1", 16)]);
        // 両艦とも 16 ダメージを与え、同じラウンドの撃沈判定で両方撃沈
        let mut engine = BattleEngine::new(player, enemy, BattleSettings::default(), ScriptedDice::new(vec![6]));

        let summary = engine.run();
        assert!(engine.state.player_fleet.ships[0].is_destroyed());
        assert!(engine.state.enemy_fleet.ships[0].is_destroyed());
        assert_eq!(summary.rounds, 1);
        assert_eq!(summary.outcome, BattleOutcome::Stalemate { favored: None });
    }

    #[test]
    fn test_extreme_scenario_values_do_not_panic() {
        let yaml = SKIRMISH_YAML
            .replace("seed: 42", "seed: 42\n  missile_flight_rounds: 4294967295")
            .replace("damage_multiple: 2", "damage_multiple: 4294967295");
        let config = ScenarioConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(config.battle.missile_flight_rounds, u32::MAX);

        let summary = BattleEngine::from_scenario(&config).run();
        assert_eq!(summary.missiles_impacted, 0);
        assert!(summary.rounds <= config.battle.max_rounds);
    }
}
