use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 射程帯
///
/// 艦同士の距離を離散的に表したカテゴリです。命中判定のDM（ダイス修正値）を決定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RangeBand {
    Adjacent,
    Close,
    Short,
    Medium,
    Long,
    VeryLong,
    Distant,
}

impl RangeBand {
    /// 全射程帯（近い順）
    pub const ALL: [RangeBand; 7] = [
        RangeBand::Adjacent,
        RangeBand::Close,
        RangeBand::Short,
        RangeBand::Medium,
        RangeBand::Long,
        RangeBand::VeryLong,
        RangeBand::Distant,
    ];

    /// 射程DMの取得
    ///
    /// 固定の非対称テーブルです。短距離は命中しやすく、遠距離ほど不利になります。
    pub fn dm(self) -> i32 {
        match self {
            RangeBand::Adjacent | RangeBand::Close | RangeBand::Medium => 0,
            RangeBand::Short => 1,
            RangeBand::Long => -2,
            RangeBand::VeryLong | RangeBand::Distant => -4,
        }
    }

    /// 長距離帯（Long以遠）かどうか
    pub fn is_long_or_beyond(self) -> bool {
        matches!(self, RangeBand::Long | RangeBand::VeryLong | RangeBand::Distant)
    }

    /// 表示名
    pub fn label(self) -> &'static str {
        match self {
            RangeBand::Adjacent => "Adjacent",
            RangeBand::Close => "Close",
            RangeBand::Short => "Short",
            RangeBand::Medium => "Medium",
            RangeBand::Long => "Long",
            RangeBand::VeryLong => "Very Long",
            RangeBand::Distant => "Distant",
        }
    }
}

impl fmt::Display for RangeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RangeBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();
        match key.as_str() {
            "adjacent" => Ok(RangeBand::Adjacent),
            "close" => Ok(RangeBand::Close),
            "short" => Ok(RangeBand::Short),
            "medium" => Ok(RangeBand::Medium),
            "long" => Ok(RangeBand::Long),
            "verylong" => Ok(RangeBand::VeryLong),
            "distant" => Ok(RangeBand::Distant),
            _ => Err(format!("無効な射程帯: {}", s)),
        }
    }
}

impl TryFrom<String> for RangeBand {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RangeBand> for String {
    fn from(range: RangeBand) -> Self {
        range.label().to_string()
    }
}

/// 陣営
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Enemy => f.write_str("enemy"),
        }
    }
}

/// 艦の状態
///
/// Destroyed / Fled / Surrendered は終端状態で、以後の戦闘行動には参加しません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipStatus {
    Active,      // 戦闘中
    Destroyed,   // 撃沈
    Fled,        // 離脱
    Surrendered, // 降伏
}

/// 防御対象となる攻撃の種類（サンドキャスターの防御対象）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    Laser,
    Missile,
}

impl fmt::Display for AttackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackType::Laser => f.write_str("laser"),
            AttackType::Missile => f.write_str("missile"),
        }
    }
}

/// 攻撃オプション
///
/// 砲手技能と回避DMを明示的に持つ設定構造体です。どちらも既定値は0です。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackOptions {
    /// 砲手技能（命中判定に加算）
    pub gunner_skill: i32,
    /// 目標の回避DM（命中判定から減算）
    pub dodge_dm: i32,
}

impl AttackOptions {
    pub fn new(gunner_skill: i32, dodge_dm: i32) -> Self {
        Self { gunner_skill, dodge_dm }
    }
}

/// 判定の目標値（2d6 + 修正 ≥ 8 で成功）
pub const TARGET_NUMBER: i32 = 8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_dm_table() {
        assert_eq!(RangeBand::Adjacent.dm(), 0);
        assert_eq!(RangeBand::Close.dm(), 0);
        assert_eq!(RangeBand::Short.dm(), 1);
        assert_eq!(RangeBand::Medium.dm(), 0);
        assert_eq!(RangeBand::Long.dm(), -2);
        assert_eq!(RangeBand::VeryLong.dm(), -4);
        assert_eq!(RangeBand::Distant.dm(), -4);
    }

    #[test]
    fn test_range_band_from_str() {
        assert_eq!("Very Long".parse::<RangeBand>(), Ok(RangeBand::VeryLong));
        assert_eq!("very_long".parse::<RangeBand>(), Ok(RangeBand::VeryLong));
        assert_eq!("ADJACENT".parse::<RangeBand>(), Ok(RangeBand::Adjacent));
        assert!("orbit".parse::<RangeBand>().is_err());
    }

    #[test]
    fn test_range_band_yaml_roundtrip_label() {
        let range: RangeBand = serde_yaml::from_str("\"Very Long\"").unwrap();
        assert_eq!(range, RangeBand::VeryLong);
        assert_eq!(String::from(range), "Very Long");
    }
}
