use serde::{Deserialize, Serialize};

use crate::models::{
    common::{AttackType, ShipStatus},
    weapon::{Weapon, WeaponKind},
};

/// 弾薬
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ammo {
    /// ミサイル残弾
    #[serde(default)]
    pub missiles: u32,
    /// サンドキャスター残弾
    #[serde(default)]
    pub sandcaster: u32,
}

/// 砲塔（複数の兵装を搭載）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Turret {
    #[serde(default)]
    pub weapons: Vec<Weapon>,
}

/// 有効なサンドキャスター防御ボーナス（1回の攻撃にのみ適用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SandcasterBonus {
    pub attack_type: AttackType,
    pub armor: u32,
}

/// 戦闘艦
///
/// 艦隊に所属し、兵装の解決と艦長の判断によって状態が変化します。
/// 船体値が0になると撃沈、離脱・降伏は終端状態です。
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    /// 艦の一意識別子
    pub id: String,
    /// 艦名
    pub name: String,
    /// 現在の船体値
    pub hull: u32,
    /// 最大船体値
    pub max_hull: u32,
    /// 現在の出力（未指定なら出力判定は常に満タン扱い）
    pub power: Option<u32>,
    /// 最大出力
    pub max_power: Option<u32>,
    /// 装甲値
    pub armor: u32,
    /// 推力（未指定なら1として扱う）
    pub thrust: Option<u32>,
    pub turrets: Vec<Turret>,
    pub ammo: Ammo,
    /// 砲手技能
    pub gunner_skill: i32,
    /// 回避DM（この艦への攻撃に適用される）
    pub evasion_dm: i32,
    /// 離脱判定の船体割合閾値（未指定なら0.3）
    pub flee_threshold: Option<f64>,
    pub status: ShipStatus,
    /// 有効なサンドキャスター防御
    pub sand_bonus: Option<SandcasterBonus>,
    /// このラウンドの残り迎撃射撃数
    pub point_defense_shots: u32,
    /// このラウンドの残りサンドキャスター射撃数
    pub sandcaster_shots: u32,
}

impl Combatant {
    pub fn new(id: &str, name: &str, hull: u32, armor: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            hull,
            max_hull: hull,
            power: None,
            max_power: None,
            armor,
            thrust: None,
            turrets: Vec::new(),
            ammo: Ammo::default(),
            gunner_skill: 0,
            evasion_dm: 0,
            flee_threshold: None,
            status: ShipStatus::Active,
            sand_bonus: None,
            point_defense_shots: 0,
            sandcaster_shots: 0,
        }
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.turrets.push(Turret { weapons: vec![weapon] });
        self
    }

    pub fn with_power(mut self, power: u32, max_power: u32) -> Self {
        self.power = Some(power);
        self.max_power = Some(max_power);
        self
    }

    pub fn with_ammo(mut self, missiles: u32, sandcaster: u32) -> Self {
        self.ammo = Ammo { missiles, sandcaster };
        self
    }

    /// 戦闘に参加中か（撃沈・離脱・降伏していない）
    pub fn is_active(&self) -> bool {
        self.status == ShipStatus::Active
    }

    pub fn is_destroyed(&self) -> bool {
        self.status == ShipStatus::Destroyed
    }

    /// 船体割合（最大船体値が0以下なら0）
    pub fn hull_percent(&self) -> f64 {
        if self.max_hull == 0 {
            return 0.0;
        }
        f64::from(self.hull) / f64::from(self.max_hull)
    }

    /// 出力割合（出力が未指定なら1.0）
    pub fn power_percent(&self) -> f64 {
        match (self.power, self.max_power) {
            (Some(power), Some(max_power)) if max_power > 0 => f64::from(power) / f64::from(max_power),
            (Some(_), _) => 0.0,
            (None, _) => 1.0,
        }
    }

    /// 搭載兵装の一覧
    pub fn weapons(&self) -> impl Iterator<Item = &Weapon> {
        self.turrets.iter().flat_map(|turret| turret.weapons.iter())
    }

    pub fn weapon_count(&self) -> usize {
        self.weapons().count()
    }

    pub fn mounts_of(&self, kind: WeaponKind) -> usize {
        self.weapons().filter(|weapon| weapon.kind() == Some(kind)).count()
    }

    /// 指定種別の攻撃に対する実効装甲（サンドキャスター防御を含む）
    pub fn effective_armor(&self, attack_type: AttackType) -> u32 {
        match self.sand_bonus {
            Some(bonus) if bonus.attack_type == attack_type => self.armor + bonus.armor,
            _ => self.armor,
        }
    }

    /// ダメージを受ける（船体値は0で下限）
    pub fn take_damage(&mut self, damage: u32) {
        self.hull = self.hull.saturating_sub(damage);
    }

    /// ラウンド開始時の射撃数リセット
    pub fn reset_round(&mut self) {
        self.point_defense_shots = self.mounts_of(WeaponKind::PointDefense) as u32;
        self.sandcaster_shots = self.mounts_of(WeaponKind::Sandcaster) as u32;
        self.sand_bonus = None;
    }

    /// 撃沈判定（船体値0で撃沈、撃沈は他の終端状態より優先しない）
    ///
    /// 撃沈状態に遷移した場合は true を返します。
    pub fn check_destruction(&mut self) -> bool {
        if self.hull == 0 && self.status == ShipStatus::Active {
            self.status = ShipStatus::Destroyed;
            return true;
        }
        false
    }
}

/// 艦隊（論理的なグループ）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fleet {
    pub name: String,
    pub ships: Vec<Combatant>,
}

impl Fleet {
    pub fn new(name: &str, ships: Vec<Combatant>) -> Self {
        Self { name: name.to_string(), ships }
    }

    pub fn active_ships(&self) -> impl Iterator<Item = &Combatant> {
        self.ships.iter().filter(|ship| ship.is_active())
    }

    pub fn has_active_ships(&self) -> bool {
        self.active_ships().next().is_some()
    }

    pub fn ship_mut(&mut self, id: &str) -> Option<&mut Combatant> {
        self.ships.iter_mut().find(|ship| ship.id == id)
    }

    /// 艦隊全体の船体割合（撃沈艦を除く）
    pub fn hull_percent(&self) -> f64 {
        let (hull, max_hull) = self
            .ships
            .iter()
            .filter(|ship| !ship.is_destroyed())
            .fold((0u64, 0u64), |(hull, max), ship| {
                (hull + u64::from(ship.hull), max + u64::from(ship.max_hull))
            });
        if max_hull == 0 {
            return 0.0;
        }
        hull as f64 / max_hull as f64
    }

    /// 次の攻撃目標を選択
    ///
    /// 船体値が残っているアクティブ艦のうち船体割合が最も低い艦、
    /// 同率なら艦隊順。該当がなければ最初のアクティブ艦。
    pub fn select_target(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, ship) in self.ships.iter().enumerate() {
            if !ship.is_active() || ship.hull == 0 {
                continue;
            }
            let pct = ship.hull_percent();
            if best.is_none_or(|(_, best_pct)| pct < best_pct) {
                best = Some((index, pct));
            }
        }
        best.map(|(index, _)| index)
            .or_else(|| self.ships.iter().position(|ship| ship.is_active()))
    }
}

/// 艦隊戦力の算出
///
/// 撃沈されていない艦について `船体割合 × (1 + 0.2 × 兵装数) × 推力係数` を合計します。
/// 撃沈艦の寄与は常に0、結果は負になりません。
pub fn calculate_fleet_strength(fleet: &Fleet) -> f64 {
    fleet
        .ships
        .iter()
        .filter(|ship| !ship.is_destroyed())
        .map(ship_strength)
        .sum()
}

/// 1艦の戦力
pub fn ship_strength(ship: &Combatant) -> f64 {
    if ship.is_destroyed() {
        return 0.0;
    }
    let hull_factor = ship.hull_percent();
    let weapon_factor = 1.0 + 0.2 * ship.weapon_count() as f64;
    let thrust_factor = match ship.thrust {
        Some(thrust) if thrust > 0 => f64::from(thrust),
        _ => 1.0,
    };
    hull_factor * weapon_factor * thrust_factor
}
