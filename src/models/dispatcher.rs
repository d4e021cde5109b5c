use std::collections::HashMap;

use tracing::debug;

use crate::models::{
    common::{AttackType, RangeBand},
    dice::Dice,
    missile::Missile,
    ship::Combatant,
    strategy::{AttackContext, AttackResult, MissileStrategy, SandcasterStrategy, WeaponStrategy},
    traits::{IDiceRoller, IWeaponStrategy},
    weapon::{normalize_weapon_type, Weapon, WeaponKind},
};

/// 兵装ディスパッチャ
///
/// 兵装種別を正規化し、対応するストラテジーに攻撃・防御要求を振り分けます。
/// 他のコンポーネントはこの公開面だけを使います。戦闘ごとに1つ作成し、
/// その戦闘専用のダイスを所有します。
#[derive(Debug)]
pub struct WeaponDispatcher<D: IDiceRoller = Dice> {
    dice: D,
    /// 正規IDからストラテジーへのテーブル
    strategies: HashMap<&'static str, WeaponStrategy>,
}

impl<D: IDiceRoller> WeaponDispatcher<D> {
    pub fn new(dice: D) -> Self {
        let strategies = WeaponKind::ALL
            .into_iter()
            .map(|kind| (kind.canonical_id(), WeaponStrategy::for_kind(kind)))
            .collect();
        Self { dice, strategies }
    }

    /// 兵装種別に対応するストラテジー（未知の種別はレーザー）
    pub fn strategy_for(&self, weapon_type: &str) -> WeaponStrategy {
        let canonical = normalize_weapon_type(weapon_type);
        self.strategies
            .get(canonical.as_str())
            .copied()
            .unwrap_or(WeaponStrategy::for_kind(WeaponKind::Laser))
    }

    /// 攻撃の実行（兵装種別でストラテジーを選択）
    pub fn attack(&mut self, context: &mut AttackContext<'_>) -> AttackResult {
        let strategy = self.strategy_for(&context.weapon.weapon_type);
        let result = strategy.resolve(context, &mut self.dice);
        log_result(strategy.kind(), context, &result);
        result
    }

    /// ミサイル発射
    pub fn launch_missile(&mut self, context: &mut AttackContext<'_>) -> AttackResult {
        let result = MissileStrategy.resolve(context, &mut self.dice);
        log_result(WeaponKind::Missile, context, &result);
        result
    }

    /// ミサイル着弾の解決
    pub fn resolve_missile_impact(&mut self, missile: &mut Missile, defender: &Combatant) -> AttackResult {
        let result = MissileStrategy.resolve_impact(missile, defender, &mut self.dice);
        debug!(
            missile_id = %missile.id,
            target_id = %defender.id,
            damage = result.damage(),
            "MISSILE_IMPACT_RESOLVED"
        );
        result
    }

    /// サンドキャスター使用（射程は呼び出し側で確認すること）
    pub fn use_sandcaster(&mut self, context: &mut AttackContext<'_>) -> AttackResult {
        let result = SandcasterStrategy.resolve(context, &mut self.dice);
        log_result(WeaponKind::Sandcaster, context, &result);
        result
    }

    /// ポイントディフェンスによる迎撃
    pub fn use_point_defense(&mut self, context: &mut AttackContext<'_>) -> AttackResult {
        let strategy = WeaponStrategy::for_kind(WeaponKind::PointDefense);
        let result = strategy.resolve(context, &mut self.dice);
        log_result(WeaponKind::PointDefense, context, &result);
        result
    }

    /// 射程制限の確認（副作用なし）
    pub fn can_fire_at_range(&self, weapon: &Weapon, range: RangeBand) -> bool {
        weapon.allows_range(range)
    }

    /// サンドキャスターの使用可能射程の確認（副作用なし）
    pub fn can_use_sandcaster_at_range(&self, range: RangeBand) -> bool {
        SandcasterStrategy::can_use_at_range(range)
    }

    /// 攻撃を受ける艦のサンドキャスター反応
    ///
    /// 射撃数・弾薬・射程（Adjacent / Close）の条件を満たす場合のみ使用し、
    /// 成功した場合はその艦の有効な防御ボーナスとして設定します。
    /// 使用しなかった場合は None。
    pub fn react_with_sandcaster(
        &mut self,
        ship: &mut Combatant,
        range: RangeBand,
        attack_type: AttackType,
    ) -> Option<AttackResult> {
        if ship.sandcaster_shots == 0
            || ship.ammo.sandcaster == 0
            || !self.can_use_sandcaster_at_range(range)
        {
            return None;
        }
        let weapon = ship
            .weapons()
            .find(|weapon| weapon.kind() == Some(WeaponKind::Sandcaster))
            .cloned()?;
        ship.sandcaster_shots -= 1;

        let mut context = AttackContext::new(ship, &weapon, range).screening(attack_type);
        let result = self.use_sandcaster(&mut context);
        if let AttackResult::Screened { bonus, .. } = &result {
            ship.sand_bonus = Some(*bonus);
        }
        Some(result)
    }
}

fn log_result(kind: WeaponKind, context: &AttackContext<'_>, result: &AttackResult) {
    let attacker = context.attacker.id.as_str();
    let defender = context.defender.map_or("-", |d| d.id.as_str());
    match result {
        AttackResult::Hit { damage, .. } => debug!(
            weapon = %kind,
            attacker,
            defender,
            damage = damage.damage,
            breakdown = %damage.breakdown,
            "ATTACK_HIT"
        ),
        AttackResult::Miss { attack } => debug!(
            weapon = %kind,
            attacker,
            defender,
            total = attack.total,
            "ATTACK_MISS"
        ),
        AttackResult::Blocked { reason } => debug!(
            weapon = %kind,
            attacker,
            reason = %reason,
            "ATTACK_BLOCKED"
        ),
        AttackResult::Launched { range_bonus } => debug!(attacker, range_bonus, "MISSILE_LAUNCH_RESOLVED"),
        AttackResult::Intercepted { attack } => debug!(attacker, total = attack.total, "POINT_DEFENSE_HIT"),
        AttackResult::Screened { bonus, .. } => debug!(
            attacker,
            armor_bonus = bonus.armor,
            attack_type = %bonus.attack_type,
            "SANDCASTER_RESOLVED"
        ),
    }
}
