//! # 兵装ストラテジー
//!
//! 兵装クラスごとの解決ロジックです。すべてのストラテジーは共通の
//! 命中判定（roll-attack）とダメージ判定（roll-damage）を共有します。
//!
//! ## 命中判定
//!
//! `合計 = 2d6 + 砲手技能 + 射程DM − 回避DM`、合計が8以上で命中。
//! 効果値は命中時 `合計 − 8`、非命中時0です。
//!
//! ## ダメージ判定
//!
//! `生ダメージ = NdS + 効果値`、`装甲後 = max(0, 生ダメージ − 装甲)`、
//! `ダメージ = 装甲後 × 倍率`。倍率は装甲適用後に掛かります。
//!
//! ## 結果
//!
//! 解決結果は [`AttackResult`] のタグ付きユニオンで、ブロック（射程外・弾切れ・
//! 迎撃対象なし）は例外ではなく通常の戻り値です。

use std::fmt;

use tracing::{debug, trace};

use crate::models::{
    common::{AttackOptions, AttackType, RangeBand, TARGET_NUMBER},
    dice::DiceRoll,
    missile::{Missile, MissileStatus},
    ship::{Combatant, SandcasterBonus},
    traits::{IDiceRoller, IWeaponStrategy},
    weapon::{Weapon, WeaponKind},
};

/// ミサイル着弾時のダメージ式
pub const MISSILE_IMPACT_DAMAGE: &str = "4d6";
/// 長距離発射時のミサイル着弾ボーナス
pub const MISSILE_LONG_RANGE_BONUS: u32 = 2;

/// 命中判定の修正値内訳
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttackModifiers {
    pub gunner_skill: i32,
    pub range_dm: i32,
    pub dodge_dm: i32,
}

/// 命中判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRoll {
    /// 2d6 の出目
    pub roll: u32,
    /// 修正後の合計
    pub total: i32,
    pub hit: bool,
    /// 効果値（常に0以上）
    pub effect: u32,
    pub modifiers: AttackModifiers,
}

/// 出目から命中判定を評価（純粋関数）
pub fn evaluate_attack(roll: u32, range: RangeBand, options: AttackOptions) -> AttackRoll {
    let modifiers = AttackModifiers {
        gunner_skill: options.gunner_skill,
        range_dm: range.dm(),
        dodge_dm: options.dodge_dm,
    };
    let total = roll as i32 + modifiers.gunner_skill + modifiers.range_dm - modifiers.dodge_dm;
    let hit = total >= TARGET_NUMBER;
    let effect = if hit { (total - TARGET_NUMBER) as u32 } else { 0 };
    AttackRoll { roll, total, hit, effect, modifiers }
}

/// 2d6 を振って命中判定
pub fn roll_attack(dice: &mut dyn IDiceRoller, range: RangeBand, options: AttackOptions) -> AttackRoll {
    let roll = dice.roll_2d6();
    let attack = evaluate_attack(roll.total, range, options);
    trace!(
        roll = attack.roll,
        total = attack.total,
        hit = attack.hit,
        effect = attack.effect,
        range = %range,
        "ATTACK_ROLL"
    );
    attack
}

/// 射程DMを用いない技能判定（2d6 + 技能 ≥ 8）
pub fn roll_skill_check(dice: &mut dyn IDiceRoller, skill: i32) -> AttackRoll {
    let roll = dice.roll_2d6();
    evaluate_attack(roll.total, RangeBand::Medium, AttackOptions::new(skill, 0))
}

/// ダメージ式 "NdS"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageFormula {
    pub count: u32,
    pub sides: u32,
}

impl DamageFormula {
    /// "NdS" を解析（"dS" は1個、大文字小文字を区別しない）
    pub fn parse(formula: &str) -> Option<Self> {
        let lower = formula.trim().to_lowercase();
        let (count, sides) = lower.split_once('d')?;
        let count = if count.is_empty() { 1 } else { count.parse().ok()? };
        let sides = sides.parse().ok()?;
        if sides == 0 {
            return None;
        }
        Some(Self { count, sides })
    }
}

impl fmt::Display for DamageFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// ダメージ判定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageResult {
    /// 最終ダメージ
    pub damage: u32,
    pub roll: DiceRoll,
    /// 装甲適用前のダメージ
    pub raw_damage: u32,
    pub effect: u32,
    pub armor: u32,
    pub damage_multiple: u32,
    /// 人間が読める内訳
    pub breakdown: String,
}

/// ダメージ計算（純粋関数）
///
/// `(生ダメージ, 最終ダメージ)` を返します。加算・乗算は u32 の上限で飽和します。
pub fn compute_damage(rolled: u32, effect: u32, armor: u32, damage_multiple: u32) -> (u32, u32) {
    let raw_damage = rolled.saturating_add(effect);
    let after_armor = raw_damage.saturating_sub(armor);
    (raw_damage, after_armor.saturating_mul(damage_multiple))
}

/// ダメージ判定
///
/// 不正なダメージ式はダメージ0と内訳文字列を返します（エラーにはしません）。
pub fn roll_damage(
    dice: &mut dyn IDiceRoller,
    formula: &str,
    effect: u32,
    armor: u32,
    damage_multiple: u32,
) -> DamageResult {
    let Some(parsed) = DamageFormula::parse(formula) else {
        debug!(formula = %formula, "DAMAGE_FORMULA_INVALID");
        return DamageResult {
            damage: 0,
            roll: DiceRoll::default(),
            raw_damage: 0,
            effect,
            armor,
            damage_multiple,
            breakdown: format!("invalid damage formula '{}': 0 damage", formula),
        };
    };

    let roll = dice.roll(parsed.count, parsed.sides);
    let (raw_damage, damage) = compute_damage(roll.total, effect, armor, damage_multiple);
    let breakdown = format!(
        "{} {:?}={} + effect {} = {} - armor {} = {} x{} = {}",
        parsed,
        roll.rolls,
        roll.total,
        effect,
        raw_damage,
        armor,
        raw_damage.saturating_sub(armor),
        damage_multiple,
        damage
    );

    DamageResult { damage, roll, raw_damage, effect, armor, damage_multiple, breakdown }
}

/// ブロック理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// 射程制限外
    OutOfRange(RangeBand),
    /// ミサイル弾切れ
    NoMissiles,
    /// サンドキャスター弾切れ
    NoAmmo,
    /// 迎撃対象の指定なし
    NoMissile,
    /// 迎撃対象が追尾中でない
    MissileNotActive,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::OutOfRange(range) => write!(f, "out_of_range ({})", range),
            BlockReason::NoMissiles => f.write_str("No missiles remaining"),
            BlockReason::NoAmmo => f.write_str("no_ammo"),
            BlockReason::NoMissile => f.write_str("no_missile"),
            BlockReason::MissileNotActive => f.write_str("missile_not_active"),
        }
    }
}

/// 攻撃解決の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackResult {
    /// 非命中（サンドキャスター・迎撃の失敗を含む）
    Miss { attack: AttackRoll },
    /// 命中。ミサイル着弾は命中判定を行わないため `attack` は None
    Hit { attack: Option<AttackRoll>, damage: DamageResult },
    /// ブロック（状態は変更されない）
    Blocked { reason: BlockReason },
    /// ミサイル発射（追尾開始）。着弾時に使う射程ボーナスを保持
    Launched { range_bonus: u32 },
    /// 迎撃成功
    Intercepted { attack: AttackRoll },
    /// サンドキャスター防御成功
    Screened { attack: AttackRoll, bonus: SandcasterBonus, bonus_roll: DiceRoll },
}

impl AttackResult {
    pub fn is_hit(&self) -> bool {
        matches!(self, AttackResult::Hit { .. })
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, AttackResult::Blocked { .. })
    }

    /// 与えたダメージ（命中以外は0）
    pub fn damage(&self) -> u32 {
        match self {
            AttackResult::Hit { damage, .. } => damage.damage,
            _ => 0,
        }
    }

    pub fn block_reason(&self) -> Option<BlockReason> {
        match self {
            AttackResult::Blocked { reason } => Some(*reason),
            _ => None,
        }
    }
}

/// 攻撃コンテキスト（一時的な入力、永続化しない）
#[derive(Debug)]
pub struct AttackContext<'a> {
    /// 攻撃側（弾薬を消費する艦）
    pub attacker: &'a mut Combatant,
    /// 防御側
    pub defender: Option<&'a Combatant>,
    pub weapon: &'a Weapon,
    pub range: RangeBand,
    pub options: AttackOptions,
    /// 迎撃対象ミサイル（ポイントディフェンス用）
    pub target_missile: Option<&'a mut Missile>,
    /// 防御対象の攻撃種別（サンドキャスター用）
    pub attack_type: AttackType,
}

impl<'a> AttackContext<'a> {
    pub fn new(attacker: &'a mut Combatant, weapon: &'a Weapon, range: RangeBand) -> Self {
        let options = AttackOptions::new(attacker.gunner_skill, 0);
        Self {
            attacker,
            defender: None,
            weapon,
            range,
            options,
            target_missile: None,
            attack_type: AttackType::Laser,
        }
    }

    /// 防御側を設定（防御側の回避DMを取り込む）
    pub fn against(mut self, defender: &'a Combatant) -> Self {
        self.options.dodge_dm = defender.evasion_dm;
        self.defender = Some(defender);
        self
    }

    pub fn with_options(mut self, options: AttackOptions) -> Self {
        self.options = options;
        self
    }

    pub fn intercepting(mut self, missile: Option<&'a mut Missile>) -> Self {
        self.target_missile = missile;
        self
    }

    pub fn screening(mut self, attack_type: AttackType) -> Self {
        self.attack_type = attack_type;
        self
    }
}

/// レーザー系ストラテジー（レーザー・パルスレーザー・ビームレーザー）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaserStrategy {
    pub kind: WeaponKind,
}

impl IWeaponStrategy for LaserStrategy {
    fn resolve(&self, context: &mut AttackContext<'_>, dice: &mut dyn IDiceRoller) -> AttackResult {
        if !context.weapon.allows_range(context.range) {
            return AttackResult::Blocked { reason: BlockReason::OutOfRange(context.range) };
        }

        let attack = roll_attack(dice, context.range, context.options);
        if !attack.hit {
            return AttackResult::Miss { attack };
        }

        let armor = context.defender.map_or(0, |d| d.effective_armor(AttackType::Laser));
        let damage = roll_damage(
            dice,
            &context.weapon.damage,
            attack.effect,
            armor,
            context.weapon.damage_multiple,
        );
        AttackResult::Hit { attack: Some(attack), damage }
    }
}

/// ミサイルストラテジー
///
/// 発射（`resolve`）と着弾（`resolve_impact`）の2つの操作を持ちます。
/// 発射時には命中判定を行いません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MissileStrategy;

impl MissileStrategy {
    /// 発射射程による着弾ボーナス（Long以遠で+2）
    pub fn range_bonus(range: RangeBand) -> u32 {
        if range.is_long_or_beyond() { MISSILE_LONG_RANGE_BONUS } else { 0 }
    }

    /// 着弾の解決
    ///
    /// 自動命中で `4d6 + 射程ボーナス` のダメージを、防御側の装甲
    /// （有効なサンドキャスター防御を含む）に対して判定します。
    pub fn resolve_impact(
        &self,
        missile: &mut Missile,
        defender: &Combatant,
        dice: &mut dyn IDiceRoller,
    ) -> AttackResult {
        if missile.status != MissileStatus::Tracking {
            return AttackResult::Blocked { reason: BlockReason::MissileNotActive };
        }
        let armor = defender.effective_armor(AttackType::Missile);
        let damage = roll_damage(dice, MISSILE_IMPACT_DAMAGE, missile.range_bonus, armor, 1);
        missile.status = MissileStatus::Impacted;
        AttackResult::Hit { attack: None, damage }
    }
}

impl IWeaponStrategy for MissileStrategy {
    fn resolve(&self, context: &mut AttackContext<'_>, _dice: &mut dyn IDiceRoller) -> AttackResult {
        if context.attacker.ammo.missiles == 0 {
            return AttackResult::Blocked { reason: BlockReason::NoMissiles };
        }
        context.attacker.ammo.missiles -= 1;
        AttackResult::Launched { range_bonus: Self::range_bonus(context.range) }
    }
}

/// ポイントディフェンスストラテジー（弾薬消費なし）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointDefenseStrategy;

impl IWeaponStrategy for PointDefenseStrategy {
    fn resolve(&self, context: &mut AttackContext<'_>, dice: &mut dyn IDiceRoller) -> AttackResult {
        let Some(missile) = context.target_missile.as_deref_mut() else {
            return AttackResult::Blocked { reason: BlockReason::NoMissile };
        };
        if missile.status != MissileStatus::Tracking {
            return AttackResult::Blocked { reason: BlockReason::MissileNotActive };
        }

        let attack = roll_skill_check(dice, context.options.gunner_skill);
        if attack.hit {
            missile.status = MissileStatus::Destroyed;
            AttackResult::Intercepted { attack }
        } else {
            AttackResult::Miss { attack }
        }
    }
}

/// サンドキャスターストラテジー
///
/// `resolve` は射程を確認しません。射程の確認は呼び出し側が
/// [`SandcasterStrategy::can_use_at_range`] で行います。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SandcasterStrategy;

impl SandcasterStrategy {
    /// 使用可能射程（Adjacent / Close のみ）
    pub fn can_use_at_range(range: RangeBand) -> bool {
        matches!(range, RangeBand::Adjacent | RangeBand::Close)
    }
}

impl IWeaponStrategy for SandcasterStrategy {
    fn resolve(&self, context: &mut AttackContext<'_>, dice: &mut dyn IDiceRoller) -> AttackResult {
        if context.attacker.ammo.sandcaster == 0 {
            return AttackResult::Blocked { reason: BlockReason::NoAmmo };
        }
        // 成否に関わらず1発消費
        context.attacker.ammo.sandcaster -= 1;

        let attack = roll_skill_check(dice, context.options.gunner_skill);
        if !attack.hit {
            return AttackResult::Miss { attack };
        }

        let bonus_roll = dice.roll(1, 6);
        let bonus = SandcasterBonus {
            attack_type: context.attack_type,
            armor: bonus_roll.total + attack.effect,
        };
        AttackResult::Screened { attack, bonus, bonus_roll }
    }
}

/// 兵装ストラテジーの閉じた集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponStrategy {
    Laser(LaserStrategy),
    PulseLaser(LaserStrategy),
    BeamLaser(LaserStrategy),
    Missile(MissileStrategy),
    Sandcaster(SandcasterStrategy),
    PointDefense(PointDefenseStrategy),
}

impl WeaponStrategy {
    pub fn for_kind(kind: WeaponKind) -> Self {
        match kind {
            WeaponKind::Laser => WeaponStrategy::Laser(LaserStrategy { kind }),
            WeaponKind::PulseLaser => WeaponStrategy::PulseLaser(LaserStrategy { kind }),
            WeaponKind::BeamLaser => WeaponStrategy::BeamLaser(LaserStrategy { kind }),
            WeaponKind::Missile => WeaponStrategy::Missile(MissileStrategy),
            WeaponKind::Sandcaster => WeaponStrategy::Sandcaster(SandcasterStrategy),
            WeaponKind::PointDefense => WeaponStrategy::PointDefense(PointDefenseStrategy),
        }
    }

    pub fn kind(&self) -> WeaponKind {
        match self {
            WeaponStrategy::Laser(s) | WeaponStrategy::PulseLaser(s) | WeaponStrategy::BeamLaser(s) => s.kind,
            WeaponStrategy::Missile(_) => WeaponKind::Missile,
            WeaponStrategy::Sandcaster(_) => WeaponKind::Sandcaster,
            WeaponStrategy::PointDefense(_) => WeaponKind::PointDefense,
        }
    }
}

impl IWeaponStrategy for WeaponStrategy {
    fn resolve(&self, context: &mut AttackContext<'_>, dice: &mut dyn IDiceRoller) -> AttackResult {
        match self {
            WeaponStrategy::Laser(s) | WeaponStrategy::PulseLaser(s) | WeaponStrategy::BeamLaser(s) => {
                s.resolve(context, dice)
            }
            WeaponStrategy::Missile(s) => s.resolve(context, dice),
            WeaponStrategy::Sandcaster(s) => s.resolve(context, dice),
            WeaponStrategy::PointDefense(s) => s.resolve(context, dice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dice::ScriptedDice;
    use proptest::prelude::*;

    fn ship(armor: u32) -> Combatant {
        Combatant::new("s", "s", 40, armor)
    }

    #[test]
    fn test_evaluate_attack_hit_and_effect() {
        let attack = evaluate_attack(9, RangeBand::Short, AttackOptions::new(2, 1));
        assert_eq!(attack.total, 11);
        assert!(attack.hit);
        assert_eq!(attack.effect, 3);

        let attack = evaluate_attack(9, RangeBand::Distant, AttackOptions::default());
        assert_eq!(attack.total, 5);
        assert!(!attack.hit);
        assert_eq!(attack.effect, 0);
    }

    #[test]
    fn test_damage_formula_parse() {
        assert_eq!(DamageFormula::parse("2d6"), Some(DamageFormula { count: 2, sides: 6 }));
        assert_eq!(DamageFormula::parse("D6"), Some(DamageFormula { count: 1, sides: 6 }));
        assert_eq!(DamageFormula::parse("2x6"), None);
        assert_eq!(DamageFormula::parse("2d0"), None);
    }

    #[test]
    fn test_roll_damage_multiple_after_armor() {
        let mut dice = ScriptedDice::new(vec![4, 5]);
        let result = roll_damage(&mut dice, "2d6", 2, 5, 3);
        assert_eq!(result.raw_damage, 11);
        assert_eq!(result.damage, 18);
    }

    #[test]
    fn test_damage_saturates_instead_of_overflowing() {
        assert_eq!(compute_damage(10, 2, 4, u32::MAX), (12, u32::MAX));
        assert_eq!(compute_damage(u32::MAX, 5, 0, 1), (u32::MAX, u32::MAX));

        let mut dice = crate::models::dice::Dice::seeded(11);
        let result = roll_damage(&mut dice, "3d4294967295", 0, 0, 1);
        assert_eq!(result.roll.rolls.len(), 3);
        assert_eq!(result.damage, result.roll.total);
    }

    #[test]
    fn test_malformed_formula_is_soft_failure() {
        let mut dice = ScriptedDice::new(vec![6]);
        let result = roll_damage(&mut dice, "lots", 4, 0, 1);
        assert_eq!(result.damage, 0);
        assert!(result.breakdown.contains("lots"));
    }

    #[test]
    fn test_beam_laser_blocked_at_long_range() {
        let weapon = Weapon::new("beam_laser", "1d6").with_range_restriction(&[
            RangeBand::Adjacent,
            RangeBand::Close,
            RangeBand::Medium,
        ]);
        let mut attacker = ship(0);
        let defender = ship(0);
        let mut dice = ScriptedDice::new(vec![6]);
        let mut context = AttackContext::new(&mut attacker, &weapon, RangeBand::Long).against(&defender);
        let result = WeaponStrategy::for_kind(WeaponKind::BeamLaser).resolve(&mut context, &mut dice);
        assert!(!result.is_hit());
        assert_eq!(result.block_reason(), Some(BlockReason::OutOfRange(RangeBand::Long)));
    }

    #[test]
    fn test_laser_hit_against_armor() {
        let weapon = Weapon::new("pulse_laser", "2d6");
        let mut attacker = ship(0);
        attacker.gunner_skill = 1;
        let defender = ship(3);
        // 命中判定 5+6=11 (+1技能) → 効果4、ダメージ 3+3=6+4-3=7
        let mut dice = ScriptedDice::new(vec![5, 6, 3, 3]);
        let mut context = AttackContext::new(&mut attacker, &weapon, RangeBand::Medium).against(&defender);
        let result = LaserStrategy { kind: WeaponKind::PulseLaser }.resolve(&mut context, &mut dice);
        assert_eq!(result.damage(), 7);
    }

    #[test]
    fn test_missile_blocked_without_ammo() {
        let weapon = Weapon::standard(WeaponKind::Missile);
        let mut attacker = ship(0);
        let mut dice = ScriptedDice::new(vec![6]);
        let mut context = AttackContext::new(&mut attacker, &weapon, RangeBand::Long);
        let result = MissileStrategy.resolve(&mut context, &mut dice);
        assert_eq!(result, AttackResult::Blocked { reason: BlockReason::NoMissiles });
        assert_eq!(BlockReason::NoMissiles.to_string(), "No missiles remaining");
        assert_eq!(attacker.ammo.missiles, 0);
    }

    #[test]
    fn test_missile_launch_consumes_ammo_and_stores_bonus() {
        let weapon = Weapon::standard(WeaponKind::Missile);
        let mut attacker = ship(0).with_ammo(2, 0);
        let mut dice = ScriptedDice::new(vec![1]);
        let mut context = AttackContext::new(&mut attacker, &weapon, RangeBand::VeryLong);
        let result = MissileStrategy.resolve(&mut context, &mut dice);
        assert_eq!(result, AttackResult::Launched { range_bonus: 2 });
        assert_eq!(attacker.ammo.missiles, 1);
    }

    #[test]
    fn test_missile_impact_uses_range_bonus_and_sand() {
        let mut defender = ship(2);
        defender.sand_bonus = Some(SandcasterBonus { attack_type: AttackType::Missile, armor: 3 });
        let mut missile = Missile::new("m".into(), "a".into(), "s".into(), 2, 1, 1);
        let mut dice = ScriptedDice::new(vec![3, 3, 3, 3]);
        let result = MissileStrategy.resolve_impact(&mut missile, &defender, &mut dice);
        // 12 + 2 - (2 + 3) = 9
        assert_eq!(result.damage(), 9);
        assert_eq!(missile.status, MissileStatus::Impacted);
    }

    #[test]
    fn test_point_defense_requires_tracking_missile() {
        let weapon = Weapon::standard(WeaponKind::PointDefense);
        let mut owner = ship(0);
        let mut dice = ScriptedDice::new(vec![6]);
        let mut context = AttackContext::new(&mut owner, &weapon, RangeBand::Close);
        let result = PointDefenseStrategy.resolve(&mut context, &mut dice);
        assert_eq!(result.block_reason(), Some(BlockReason::NoMissile));

        let mut missile = Missile::new("m".into(), "a".into(), "s".into(), 0, 1, 1);
        missile.status = MissileStatus::Impacted;
        let mut context =
            AttackContext::new(&mut owner, &weapon, RangeBand::Close).intercepting(Some(&mut missile));
        let result = PointDefenseStrategy.resolve(&mut context, &mut dice);
        assert_eq!(result.block_reason(), Some(BlockReason::MissileNotActive));
        assert_eq!(missile.status, MissileStatus::Impacted);
    }

    #[test]
    fn test_point_defense_destroys_missile() {
        let weapon = Weapon::standard(WeaponKind::PointDefense);
        let mut owner = ship(0);
        let mut missile = Missile::new("m".into(), "a".into(), "s".into(), 0, 1, 1);
        let mut dice = ScriptedDice::new(vec![4, 4]);
        let mut context =
            AttackContext::new(&mut owner, &weapon, RangeBand::Close).intercepting(Some(&mut missile));
        let result = PointDefenseStrategy.resolve(&mut context, &mut dice);
        assert!(matches!(result, AttackResult::Intercepted { .. }));
        assert_eq!(missile.status, MissileStatus::Destroyed);
    }

    #[test]
    fn test_sandcaster_consumes_ammo_on_failure() {
        let weapon = Weapon::standard(WeaponKind::Sandcaster);
        let mut owner = ship(0).with_ammo(0, 1);
        let mut dice = ScriptedDice::new(vec![1, 1]);
        let mut context = AttackContext::new(&mut owner, &weapon, RangeBand::Close);
        let result = SandcasterStrategy.resolve(&mut context, &mut dice);
        assert!(matches!(result, AttackResult::Miss { .. }));
        assert_eq!(owner.ammo.sandcaster, 0);

        let mut context = AttackContext::new(&mut owner, &weapon, RangeBand::Close);
        let result = SandcasterStrategy.resolve(&mut context, &mut dice);
        assert_eq!(result.block_reason(), Some(BlockReason::NoAmmo));
    }

    #[test]
    fn test_sandcaster_bonus_and_no_range_check_in_resolve() {
        assert!(!SandcasterStrategy::can_use_at_range(RangeBand::Medium));
        assert!(SandcasterStrategy::can_use_at_range(RangeBand::Adjacent));

        let weapon = Weapon::standard(WeaponKind::Sandcaster);
        let mut owner = ship(0).with_ammo(0, 1);
        // 判定 5+5=10 → 効果2、ボーナス 1d6=4 → 6
        let mut dice = ScriptedDice::new(vec![5, 5, 4]);
        let mut context =
            AttackContext::new(&mut owner, &weapon, RangeBand::Medium).screening(AttackType::Missile);
        let result = SandcasterStrategy.resolve(&mut context, &mut dice);
        match result {
            AttackResult::Screened { bonus, .. } => {
                assert_eq!(bonus, SandcasterBonus { attack_type: AttackType::Missile, armor: 6 });
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn prop_attack_evaluation_is_deterministic(
            roll in 2u32..=12,
            skill in -3i32..=6,
            dodge in -2i32..=4,
            range_index in 0usize..7,
        ) {
            let range = RangeBand::ALL[range_index];
            let options = AttackOptions::new(skill, dodge);
            let a = evaluate_attack(roll, range, options);
            let b = evaluate_attack(roll, range, options);
            prop_assert_eq!(a, b);
            prop_assert_eq!(a.hit, a.total >= TARGET_NUMBER);
            if !a.hit {
                prop_assert_eq!(a.effect, 0);
            }
        }

        #[test]
        fn prop_damage_matches_formula(
            rolled in 0u32..=60,
            effect in 0u32..=10,
            armor in 0u32..=30,
            multiple in 1u32..=5,
        ) {
            let (raw, damage) = compute_damage(rolled, effect, armor, multiple);
            prop_assert_eq!(raw, rolled + effect);
            let expected = (rolled as i64 + effect as i64 - armor as i64).max(0) * multiple as i64;
            prop_assert_eq!(damage as i64, expected);
        }

        #[test]
        fn prop_blocked_laser_leaves_state_untouched(seed in any::<u64>()) {
            let weapon = Weapon::standard(WeaponKind::BeamLaser);
            let mut attacker = ship(0).with_ammo(3, 2);
            let before = attacker.clone();
            let defender = ship(1);
            let mut dice = crate::models::dice::Dice::seeded(seed);
            let mut context = AttackContext::new(&mut attacker, &weapon, RangeBand::Distant).against(&defender);
            let result = WeaponStrategy::for_kind(WeaponKind::BeamLaser).resolve(&mut context, &mut dice);
            prop_assert!(result.is_blocked());
            prop_assert_eq!(attacker, before);
            prop_assert_eq!(defender.hull, 40);
        }
    }
}
