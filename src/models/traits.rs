use crate::models::{
    dice::DiceRoll,
    strategy::{AttackContext, AttackResult},
};

/// ダイスサービスのインターフェース
///
/// 戦闘エンジン唯一の乱数源です。戦闘ごとに個別のインスタンスを注入します。
pub trait IDiceRoller {
    /// NdS ロール
    fn roll(&mut self, count: u32, sides: u32) -> DiceRoll;

    /// 2d6 ロール
    fn roll_2d6(&mut self) -> DiceRoll {
        self.roll(2, 6)
    }
}

impl<T: IDiceRoller + ?Sized> IDiceRoller for &mut T {
    fn roll(&mut self, count: u32, sides: u32) -> DiceRoll {
        (**self).roll(count, sides)
    }
}

impl<T: IDiceRoller + ?Sized> IDiceRoller for Box<T> {
    fn roll(&mut self, count: u32, sides: u32) -> DiceRoll {
        (**self).roll(count, sides)
    }
}

/// 兵装ストラテジーのインターフェース
///
/// 兵装クラスごとに1つ実装します。`resolve` は必須メソッドなので、
/// 具体実装の欠落はコンパイル時に検出されます。
pub trait IWeaponStrategy {
    /// 攻撃（または発射・迎撃・防御）の解決
    fn resolve(&self, context: &mut AttackContext<'_>, dice: &mut dyn IDiceRoller) -> AttackResult;
}
