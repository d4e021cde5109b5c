use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::{
    common::{AttackType, RangeBand},
    dispatcher::WeaponDispatcher,
    ship::{Combatant, Fleet},
    strategy::{AttackContext, AttackResult},
    traits::IDiceRoller,
    weapon::{Weapon, WeaponKind},
};

/// ミサイルの状態
///
/// Tracking → Destroyed（迎撃）| Impacted（着弾）。終端状態から戻ることはありません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissileStatus {
    /// 追尾中（迎撃可能）
    Tracking,
    /// 迎撃により破壊
    Destroyed,
    /// 着弾
    Impacted,
}

/// 飛翔中のミサイル
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Missile {
    pub id: String,
    pub status: MissileStatus,
    /// 着弾時に加算する射程ボーナス（発射時には適用しない）
    pub range_bonus: u32,
    pub owner_id: String,
    pub target_id: String,
    /// 発射ラウンド
    pub launched_round: u32,
    /// 到達ラウンド
    pub arrival_round: u32,
}

impl Missile {
    pub fn new(
        id: String,
        owner_id: String,
        target_id: String,
        range_bonus: u32,
        launched_round: u32,
        arrival_round: u32,
    ) -> Self {
        Self {
            id,
            status: MissileStatus::Tracking,
            range_bonus,
            owner_id,
            target_id,
            launched_round,
            arrival_round,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.status == MissileStatus::Tracking
    }

    /// 指定ラウンドで到達済みか
    pub fn has_arrived(&self, round: u32) -> bool {
        round >= self.arrival_round
    }
}

/// ミサイルのライフサイクルイベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MissileEvent {
    Intercepted { missile_id: String, by: String },
    InterceptFailed { missile_id: String, by: String },
    Screened { ship_id: String, armor_bonus: u32 },
    Impacted { missile_id: String, target_id: String, damage: u32, breakdown: String },
}

/// ミサイルライフサイクル管理
///
/// 飛翔中のミサイルを保持し、毎ラウンド迎撃と着弾を解決します。
#[derive(Debug, Clone, Default)]
pub struct MissileTracker {
    pub missiles: Vec<Missile>,
    /// 発射から到達までのラウンド数
    pub flight_rounds: u32,
    /// 発射艦ごとのID採番カウンタ
    counters: HashMap<String, u32>,
}

impl MissileTracker {
    pub fn new(flight_rounds: u32) -> Self {
        Self { missiles: Vec::new(), flight_rounds, counters: HashMap::new() }
    }

    /// 発射されたミサイルの登録
    pub fn launch(&mut self, owner_id: &str, target_id: &str, range_bonus: u32, round: u32) -> &Missile {
        let counter = self.counters.entry(owner_id.to_string()).or_insert(0);
        *counter += 1;
        let missile = Missile::new(
            format!("{}_M{:03}", owner_id, counter),
            owner_id.to_string(),
            target_id.to_string(),
            range_bonus,
            round,
            round.saturating_add(self.flight_rounds),
        );

        info!(
            missile_id = %missile.id,
            owner_id = %missile.owner_id,
            target_id = %missile.target_id,
            range_bonus = missile.range_bonus,
            arrival_round = missile.arrival_round,
            "MISSILE_LAUNCHED: ミサイルが発射されました"
        );

        self.missiles.push(missile);
        &self.missiles[self.missiles.len() - 1]
    }

    pub fn tracking(&self) -> impl Iterator<Item = &Missile> {
        self.missiles.iter().filter(|m| m.is_tracking())
    }

    pub fn count_with_status(&self, status: MissileStatus) -> usize {
        self.missiles.iter().filter(|m| m.status == status).count()
    }

    /// 1ラウンド分の進行
    ///
    /// 1. 目標艦のポイントディフェンスが追尾中の各ミサイルを迎撃（発射順、1門1射）
    /// 2. 生き残って到達したミサイルが着弾（目標艦のサンドキャスター防御を適用）
    ///
    /// 目標艦が戦闘から外れている場合、ミサイルは追尾中のまま着弾しません。
    pub fn advance<D: IDiceRoller>(
        &mut self,
        round: u32,
        range: RangeBand,
        dispatcher: &mut WeaponDispatcher<D>,
        fleets: &mut [&mut Fleet],
    ) -> Vec<MissileEvent> {
        let mut events = Vec::new();
        self.intercept_phase(range, dispatcher, fleets, &mut events);
        self.impact_phase(round, range, dispatcher, fleets, &mut events);
        events
    }

    fn intercept_phase<D: IDiceRoller>(
        &mut self,
        range: RangeBand,
        dispatcher: &mut WeaponDispatcher<D>,
        fleets: &mut [&mut Fleet],
        events: &mut Vec<MissileEvent>,
    ) {
        for missile in self.missiles.iter_mut().filter(|m| m.is_tracking()) {
            let Some(ship) = ship_mut(fleets, &missile.target_id) else {
                continue;
            };
            if !ship.is_active() || ship.point_defense_shots == 0 {
                continue;
            }
            let weapon = ship
                .weapons()
                .find(|w| w.kind() == Some(WeaponKind::PointDefense))
                .cloned()
                .unwrap_or_else(|| Weapon::standard(WeaponKind::PointDefense));
            ship.point_defense_shots -= 1;
            let by = ship.id.clone();

            let mut context = AttackContext::new(ship, &weapon, range).intercepting(Some(&mut *missile));
            match dispatcher.use_point_defense(&mut context) {
                AttackResult::Intercepted { .. } => {
                    info!(
                        missile_id = %missile.id,
                        ship_id = %by,
                        "MISSILE_INTERCEPTED: ミサイルを迎撃しました"
                    );
                    events.push(MissileEvent::Intercepted { missile_id: missile.id.clone(), by });
                }
                _ => {
                    debug!(missile_id = %missile.id, ship_id = %by, "MISSILE_INTERCEPT_FAILED");
                    events.push(MissileEvent::InterceptFailed { missile_id: missile.id.clone(), by });
                }
            }
        }
    }

    fn impact_phase<D: IDiceRoller>(
        &mut self,
        round: u32,
        range: RangeBand,
        dispatcher: &mut WeaponDispatcher<D>,
        fleets: &mut [&mut Fleet],
        events: &mut Vec<MissileEvent>,
    ) {
        for missile in self.missiles.iter_mut() {
            if !missile.is_tracking() || !missile.has_arrived(round) {
                continue;
            }
            let Some(ship) = ship_mut(fleets, &missile.target_id) else {
                continue;
            };
            if !ship.is_active() {
                continue;
            }

            if let Some(AttackResult::Screened { bonus, .. }) =
                dispatcher.react_with_sandcaster(ship, range, AttackType::Missile)
            {
                events.push(MissileEvent::Screened { ship_id: ship.id.clone(), armor_bonus: bonus.armor });
            }

            let result = dispatcher.resolve_missile_impact(missile, ship);
            ship.sand_bonus = None;
            if let AttackResult::Hit { damage, .. } = result {
                ship.take_damage(damage.damage);
                info!(
                    missile_id = %missile.id,
                    target_id = %ship.id,
                    damage = damage.damage,
                    remaining_hull = ship.hull,
                    "MISSILE_IMPACT: ミサイルが着弾しました"
                );
                events.push(MissileEvent::Impacted {
                    missile_id: missile.id.clone(),
                    target_id: ship.id.clone(),
                    damage: damage.damage,
                    breakdown: damage.breakdown,
                });
            }
        }
    }
}

fn ship_mut<'f>(fleets: &'f mut [&mut Fleet], id: &str) -> Option<&'f mut Combatant> {
    fleets.iter_mut().find_map(|fleet| fleet.ship_mut(id))
}
