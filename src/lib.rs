//! # fleetsim
//!
//! ターン制の艦隊戦闘解決エンジン。
//!
//! - [`models`]: ダイス・兵装ストラテジー・ミサイル・艦長AIなどの戦闘ルール
//! - [`simulation`]: ラウンド進行を行う戦闘ループ
//! - [`batch`]: 独立した戦闘の並行実行
//! - [`scenario`]: YAMLによる戦闘設定
//! - [`logging`]: tracing の初期化

pub mod batch;
pub mod logging;
pub mod models;
pub mod scenario;
pub mod simulation;
