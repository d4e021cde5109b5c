// 基本的なデータ型（射程帯・陣営・艦状態）
pub mod common;

// ダイスサービスとストラテジーのインターフェース（trait）定義
pub mod traits;

// 戦闘ルールの各コンポーネント
pub mod dice;
pub mod weapon;
pub mod ship;
pub mod strategy;
pub mod dispatcher;
pub mod missile;
pub mod captain;

// 便利な re-export
pub use common::*;
pub use traits::*;
pub use dice::{Dice, DiceRoll, ScriptedDice};
pub use weapon::{normalize_weapon_type, Weapon, WeaponKind};
pub use ship::{calculate_fleet_strength, ship_strength, Ammo, Combatant, Fleet, SandcasterBonus, Turret};
pub use strategy::{
    compute_damage, evaluate_attack, roll_attack, roll_damage, AttackContext, AttackResult, AttackRoll,
    BlockReason, DamageResult, LaserStrategy, MissileStrategy, PointDefenseStrategy, SandcasterStrategy,
    WeaponStrategy,
};
pub use dispatcher::WeaponDispatcher;
pub use missile::{Missile, MissileEvent, MissileStatus, MissileTracker};
pub use captain::{captain_decision, BattleOdds, CaptainDecision};
