use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::common::RangeBand;

/// 兵装の正規種別
///
/// 閉じた集合です。新しい兵装を追加する場合はここと別名テーブル、
/// ストラテジーテーブルに追加します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Laser,
    PulseLaser,
    BeamLaser,
    Missile,
    Sandcaster,
    PointDefense,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 6] = [
        WeaponKind::Laser,
        WeaponKind::PulseLaser,
        WeaponKind::BeamLaser,
        WeaponKind::Missile,
        WeaponKind::Sandcaster,
        WeaponKind::PointDefense,
    ];

    /// 正規ID（snake_case）
    pub fn canonical_id(self) -> &'static str {
        match self {
            WeaponKind::Laser => "laser",
            WeaponKind::PulseLaser => "pulse_laser",
            WeaponKind::BeamLaser => "beam_laser",
            WeaponKind::Missile => "missile",
            WeaponKind::Sandcaster => "sandcaster",
            WeaponKind::PointDefense => "point_defense",
        }
    }

    pub fn from_canonical_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.canonical_id() == id)
    }

    /// 直接射撃兵装かどうか（レーザー系）
    pub fn is_direct_fire(self) -> bool {
        matches!(self, WeaponKind::Laser | WeaponKind::PulseLaser | WeaponKind::BeamLaser)
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_id())
    }
}

/// 兵装種別の別名テーブル（区切り文字を `_` に正規化した後のキー）
const WEAPON_ALIASES: &[(&str, &str)] = &[
    ("laser", "laser"),
    ("pulse_laser", "pulse_laser"),
    ("pulselaser", "pulse_laser"),
    ("pulse", "pulse_laser"),
    ("beam_laser", "beam_laser"),
    ("beamlaser", "beam_laser"),
    ("beam", "beam_laser"),
    ("missile", "missile"),
    ("missiles", "missile"),
    ("missile_rack", "missile"),
    ("missile_launcher", "missile"),
    ("sandcaster", "sandcaster"),
    ("sand_caster", "sandcaster"),
    ("sand", "sandcaster"),
    ("point_defense", "point_defense"),
    ("point_defence", "point_defense"),
    ("pointdefense", "point_defense"),
    ("pd", "point_defense"),
];

/// 自由記述の兵装種別を正規ID（snake_case）に正規化
///
/// 例: "Pulse Laser" → "pulse_laser"、"beam-laser" → "beam_laser"、"pd" → "point_defense"。
/// 別名テーブルにない場合は区切りを正規化した文字列をそのまま返します。
pub fn normalize_weapon_type(raw: &str) -> String {
    let key = raw
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    WEAPON_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(key)
}

/// 兵装定義（不変）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// 兵装種別（自由記述、ディスパッチャで正規化）
    #[serde(rename = "type")]
    pub weapon_type: String,
    /// ダメージ式 "NdS"
    pub damage: String,
    /// 射撃可能な射程帯（未指定なら制限なし）
    #[serde(default)]
    pub range_restriction: Option<Vec<RangeBand>>,
    /// 装甲適用後に掛かるダメージ倍率（バーベット等）
    #[serde(default = "default_damage_multiple")]
    pub damage_multiple: u32,
}

fn default_damage_multiple() -> u32 {
    1
}

impl Weapon {
    pub fn new(weapon_type: &str, damage: &str) -> Self {
        Self {
            weapon_type: weapon_type.to_string(),
            damage: damage.to_string(),
            range_restriction: None,
            damage_multiple: 1,
        }
    }

    pub fn with_range_restriction(mut self, ranges: &[RangeBand]) -> Self {
        self.range_restriction = Some(ranges.to_vec());
        self
    }

    pub fn with_damage_multiple(mut self, multiple: u32) -> Self {
        self.damage_multiple = multiple;
        self
    }

    /// 標準兵装のプリセット
    pub fn standard(kind: WeaponKind) -> Self {
        use RangeBand::*;
        match kind {
            WeaponKind::Laser => Weapon::new("laser", "1d6"),
            WeaponKind::PulseLaser => Weapon::new("pulse_laser", "2d6")
                .with_range_restriction(&[Adjacent, Close, Short, Medium, Long]),
            WeaponKind::BeamLaser => Weapon::new("beam_laser", "1d6")
                .with_range_restriction(&[Adjacent, Close, Short, Medium]),
            WeaponKind::Missile => Weapon::new("missile", "4d6"),
            WeaponKind::Sandcaster => Weapon::new("sandcaster", "1d6"),
            WeaponKind::PointDefense => Weapon::new("point_defense", "0d6"),
        }
    }

    /// 正規化済みの兵装種別
    pub fn kind(&self) -> Option<WeaponKind> {
        WeaponKind::from_canonical_id(&normalize_weapon_type(&self.weapon_type))
    }

    /// 射程制限を満たすかどうか
    pub fn allows_range(&self, range: RangeBand) -> bool {
        match &self.range_restriction {
            Some(allowed) => allowed.contains(&range),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_weapon_type_aliases() {
        assert_eq!(normalize_weapon_type("Pulse Laser"), "pulse_laser");
        assert_eq!(normalize_weapon_type("beam-laser"), "beam_laser");
        assert_eq!(normalize_weapon_type("pd"), "point_defense");
        assert_eq!(normalize_weapon_type("  Sand Caster "), "sandcaster");
        assert_eq!(normalize_weapon_type("Missile Rack"), "missile");
    }

    #[test]
    fn test_normalize_unknown_type_passthrough() {
        assert_eq!(normalize_weapon_type("Particle Beam"), "particle_beam");
    }

    #[test]
    fn test_weapon_kind_resolution() {
        assert_eq!(Weapon::new("Beam Laser", "1d6").kind(), Some(WeaponKind::BeamLaser));
        assert_eq!(Weapon::new("fusion gun", "3d6").kind(), None);
    }

    #[test]
    fn test_weapon_yaml_defaults() {
        let yaml = "type: Pulse Laser\ndamage: 2d6\nrange_restriction: [close, Very Long]\n";
        let weapon: Weapon = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(weapon.damage_multiple, 1);
        assert!(weapon.allows_range(RangeBand::VeryLong));
        assert!(!weapon.allows_range(RangeBand::Medium));
    }
}
