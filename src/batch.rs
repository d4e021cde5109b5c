//! # Batch モジュール
//!
//! 独立した複数の戦闘を並行実行し、結果を集計します。
//!
//! 各戦闘は専用のダイス（シード `seed + i`）と専用の艦隊を持ち、戦闘間で
//! 可変状態を一切共有しません。tokio のブロッキングスレッドプールで実行します。

use serde::Serialize;
use tokio::runtime::Builder;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::models::{Dice, Side};
use crate::scenario::ScenarioConfig;
use crate::simulation::{BattleEngine, BattleOutcome, BattleSummary};

/// バッチ実行の集計結果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub runs: usize,
    pub player_wins: usize,
    pub enemy_wins: usize,
    pub stalemates: usize,
    pub mean_rounds: f64,
}

impl BatchReport {
    pub fn from_summaries(summaries: &[BattleSummary]) -> Self {
        let mut report = BatchReport { runs: summaries.len(), ..Default::default() };
        for summary in summaries {
            match summary.outcome {
                BattleOutcome::Victory { winner: Side::Player } => report.player_wins += 1,
                BattleOutcome::Victory { winner: Side::Enemy } => report.enemy_wins += 1,
                BattleOutcome::Stalemate { .. } => report.stalemates += 1,
            }
        }
        if !summaries.is_empty() {
            let total: u64 = summaries.iter().map(|s| u64::from(s.rounds)).sum();
            report.mean_rounds = total as f64 / summaries.len() as f64;
        }
        report
    }
}

/// 1戦闘の実行（戦闘番号からシードを決定）
pub fn run_single(scenario: &ScenarioConfig, index: u64) -> BattleSummary {
    let dice = Dice::seeded(scenario.battle.seed.wrapping_add(index));
    BattleEngine::from_scenario_with_dice(scenario, dice).run()
}

/// 複数戦闘の並行実行
pub fn run_batch(scenario: &ScenarioConfig, runs: usize) -> Result<BatchReport, Box<dyn std::error::Error>> {
    let runtime = Builder::new_multi_thread().build()?;

    let summaries = runtime.block_on(async {
        let mut tasks = JoinSet::new();
        for index in 0..runs {
            let scenario = scenario.clone();
            tasks.spawn_blocking(move || (index, run_single(&scenario, index as u64)));
        }

        let mut results = Vec::with_capacity(runs);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => warn!(error = %e, "BATCH_TASK_FAILED: 戦闘タスクが異常終了しました"),
            }
        }
        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, summary)| summary).collect::<Vec<_>>()
    });

    let report = BatchReport::from_summaries(&summaries);
    info!(
        runs = report.runs,
        player_wins = report.player_wins,
        enemy_wins = report.enemy_wins,
        stalemates = report.stalemates,
        mean_rounds = report.mean_rounds,
        "BATCH_COMPLETE: バッチ実行が完了しました"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::tests::SKIRMISH_YAML;

    #[test]
    fn test_batch_matches_sequential_runs() {
        let scenario = ScenarioConfig::from_yaml_str(SKIRMISH_YAML).unwrap();
        let report = run_batch(&scenario, 8).unwrap();
        let sequential: Vec<_> = (0..8).map(|i| run_single(&scenario, i)).collect();
        assert_eq!(report, BatchReport::from_summaries(&sequential));
        assert_eq!(report.player_wins + report.enemy_wins + report.stalemates, 8);
    }

    #[test]
    fn test_empty_report() {
        let report = BatchReport::from_summaries(&[]);
        assert_eq!(report.runs, 0);
        assert_eq!(report.mean_rounds, 0.0);
    }
}
