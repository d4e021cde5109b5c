use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::models::{Ammo, Combatant, Fleet, RangeBand, Turret, Weapon, WeaponKind};

/// シナリオメタデータ
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioMeta {
    pub version: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// 戦闘設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BattleConfig {
    /// 最大ラウンド数（到達で膠着）
    pub max_rounds: u32,
    /// 開始射程帯
    pub starting_range: RangeBand,
    /// ダイスのシード値
    pub seed: u64,
    /// ミサイルの発射から到達までのラウンド数
    #[serde(default = "default_missile_flight_rounds")]
    pub missile_flight_rounds: u32,
}

fn default_missile_flight_rounds() -> u32 {
    1
}

/// 兵装設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeaponConfig {
    pub r#type: String, // "type"はRustのキーワードなのでr#でエスケープ
    /// ダメージ式（未指定なら標準兵装の値）
    #[serde(default)]
    pub damage: Option<String>,
    /// 射程制限（未指定なら標準兵装の値）
    #[serde(default)]
    pub range_restriction: Option<Vec<RangeBand>>,
    #[serde(default)]
    pub damage_multiple: Option<u32>,
}

impl WeaponConfig {
    pub fn build(&self) -> Weapon {
        let preset = Weapon::new(&self.r#type, "")
            .kind()
            .map(Weapon::standard)
            .unwrap_or_else(|| Weapon::standard(WeaponKind::Laser));
        let damage = self.damage.as_deref().unwrap_or(&preset.damage);
        let mut weapon = Weapon::new(&self.r#type, damage)
            .with_damage_multiple(self.damage_multiple.unwrap_or(preset.damage_multiple));
        weapon.range_restriction = self.range_restriction.clone().or(preset.range_restriction);
        weapon
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TurretConfig {
    #[serde(default)]
    pub weapons: Vec<WeaponConfig>,
}

/// 艦設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShipConfig {
    pub id: String,
    pub name: String,
    pub hull: u32,
    #[serde(default)]
    pub max_hull: Option<u32>,
    #[serde(default)]
    pub armor: u32,
    #[serde(default)]
    pub thrust: Option<u32>,
    #[serde(default)]
    pub power: Option<u32>,
    #[serde(default)]
    pub max_power: Option<u32>,
    #[serde(default)]
    pub gunner_skill: i32,
    #[serde(default)]
    pub evasion_dm: i32,
    #[serde(default)]
    pub flee_threshold: Option<f64>,
    #[serde(default)]
    pub ammo: Ammo,
    #[serde(default)]
    pub turrets: Vec<TurretConfig>,
}

impl ShipConfig {
    pub fn build(&self) -> Combatant {
        let mut ship = Combatant::new(&self.id, &self.name, self.hull, self.armor);
        ship.max_hull = self.max_hull.unwrap_or(self.hull);
        ship.thrust = self.thrust;
        ship.power = self.power.or(self.max_power);
        ship.max_power = self.max_power.or(self.power);
        ship.gunner_skill = self.gunner_skill;
        ship.evasion_dm = self.evasion_dm;
        ship.flee_threshold = self.flee_threshold;
        ship.ammo = self.ammo;
        ship.turrets = self
            .turrets
            .iter()
            .map(|turret| Turret { weapons: turret.weapons.iter().map(WeaponConfig::build).collect() })
            .collect();
        ship
    }
}

/// 艦隊設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FleetConfig {
    pub name: String,
    pub ships: Vec<ShipConfig>,
}

impl FleetConfig {
    pub fn build(&self) -> Fleet {
        Fleet::new(&self.name, self.ships.iter().map(ShipConfig::build).collect())
    }
}

/// 完全なシナリオ設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioConfig {
    pub meta: ScenarioMeta,
    pub battle: BattleConfig,
    pub player_fleet: FleetConfig,
    pub enemy_fleet: FleetConfig,
}

impl ScenarioConfig {
    /// YAMLファイルからシナリオ設定を読み込み
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();

        // ファイル存在チェック
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.to_path_buf()));
        }

        // ファイル読み込み
        let contents = fs::read_to_string(path)
            .map_err(|e| ScenarioError::IoError(path.to_path_buf(), e))?;

        // YAML解析
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .map_err(|e| ScenarioError::ParseError(path.to_path_buf(), e))?;

        // 基本的な検証
        config.validate()?;

        Ok(config)
    }

    /// YAML文字列からシナリオ設定を読み込み
    pub fn from_yaml_str(contents: &str) -> Result<Self, ScenarioError> {
        let config: ScenarioConfig = serde_yaml::from_str(contents)
            .map_err(|e| ScenarioError::ParseError(Path::new("<inline>").to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// 設定の基本的な検証
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.battle.max_rounds == 0 {
            return Err(ScenarioError::ValidationError("max_rounds must be positive".to_string()));
        }

        let mut seen_ids = HashSet::new();
        for fleet in [&self.player_fleet, &self.enemy_fleet] {
            if fleet.ships.is_empty() {
                return Err(ScenarioError::ValidationError(format!("Fleet {} has no ships", fleet.name)));
            }
            for ship in &fleet.ships {
                if !seen_ids.insert(ship.id.as_str()) {
                    return Err(ScenarioError::ValidationError(format!("Duplicate ship id {}", ship.id)));
                }
                if ship.hull == 0 {
                    return Err(ScenarioError::ValidationError(format!("Ship {} hull must be positive", ship.id)));
                }
                if ship.max_hull.is_some_and(|max_hull| max_hull < ship.hull) {
                    return Err(ScenarioError::ValidationError(format!(
                        "Ship {} max_hull {} < hull {}",
                        ship.id,
                        ship.max_hull.unwrap_or_default(),
                        ship.hull
                    )));
                }
                let max_power = ship.max_power.or(ship.power);
                if max_power == Some(0) {
                    return Err(ScenarioError::ValidationError(format!("Ship {} max_power must be positive", ship.id)));
                }
                if let (Some(power), Some(max_power)) = (ship.power, max_power) {
                    if power > max_power {
                        return Err(ScenarioError::ValidationError(format!(
                            "Ship {} power {} > max_power {}",
                            ship.id, power, max_power
                        )));
                    }
                }
                if ship.flee_threshold.is_some_and(|t| !(0.0..=1.0).contains(&t)) {
                    return Err(ScenarioError::ValidationError(format!(
                        "Ship {} flee_threshold must be within 0..1",
                        ship.id
                    )));
                }
            }
        }

        Ok(())
    }

    /// シナリオの概要を表示
    pub fn print_summary(&self) {
        println!("=== シナリオ情報 ===");
        println!("名前: {}", self.meta.name);
        println!("説明: {}", self.meta.description);
        println!("バージョン: {}", self.meta.version);
        println!();

        println!("=== 戦闘設定 ===");
        println!("最大ラウンド: {}", self.battle.max_rounds);
        println!("開始射程: {}", self.battle.starting_range);
        println!("シード値: {}", self.battle.seed);
        println!("ミサイル到達: {}ラウンド後", self.battle.missile_flight_rounds);
        println!();

        for (label, fleet) in [("味方艦隊", &self.player_fleet), ("敵艦隊", &self.enemy_fleet)] {
            println!("=== {}: {} ===", label, fleet.name);
            for ship in &fleet.ships {
                let weapons: usize = ship.turrets.iter().map(|t| t.weapons.len()).sum();
                println!(
                    "  {} ({}): 船体 {}, 装甲 {}, 兵装 {}門, ミサイル {}発",
                    ship.name, ship.id, ship.hull, ship.armor, weapons, ship.ammo.missiles
                );
            }
            println!();
        }
    }
}

/// シナリオ読み込みエラー
#[derive(Debug)]
pub enum ScenarioError {
    FileNotFound(std::path::PathBuf),
    IoError(std::path::PathBuf, std::io::Error),
    ParseError(std::path::PathBuf, serde_yaml::Error),
    ValidationError(String),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::FileNotFound(path) => {
                write!(f, "シナリオファイルが見つかりません: {}", path.display())
            }
            ScenarioError::IoError(path, err) => {
                write!(f, "ファイル読み込みエラー {}: {}", path.display(), err)
            }
            ScenarioError::ParseError(path, err) => {
                write!(f, "YAML解析エラー {}: {}", path.display(), err)
            }
            ScenarioError::ValidationError(msg) => {
                write!(f, "設定検証エラー: {}", msg)
            }
        }
    }
}

impl std::error::Error for ScenarioError {}
