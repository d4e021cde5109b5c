use std::str::FromStr;

use clap::{Arg, ArgAction, Command};
use tracing::info;

use fleetsim::batch::run_batch;
use fleetsim::logging::{init_logging, level_for_verbosity, parse_log_level, LogConfig, LogOutput};
use fleetsim::scenario::ScenarioConfig;
use fleetsim::simulation::BattleEngine;

fn main() {
    // コマンドライン引数の解析
    let matches = Command::new("fleetsim")
        .version("0.1.0")
        .about("艦隊戦シミュレーション (Fleet Combat Simulation)")
        .long_about("ターン制の艦隊戦闘解決エンジン\n\
                     ダイス判定による射撃・ミサイル迎撃・艦長判断をラウンド単位で解決します。")
        .arg(
            Arg::new("scenario")
                .short('s')
                .long("scenario")
                .value_name("FILE")
                .help("シナリオファイル(.yaml)のパスを指定")
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .action(ArgAction::SetTrue)
                .help("シナリオの情報のみ表示して終了")
                .conflicts_with("runs")
        )
        .arg(
            Arg::new("runs")
                .short('n')
                .long("runs")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .help("独立した戦闘をN回並行実行して集計")
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .value_parser(clap::value_parser!(u64))
                .help("シナリオのシード値を上書き")
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("詳細出力レベル (-v: デバッグ, -vv: トレース)")
        )
        .arg(
            Arg::new("log-output")
                .long("log-output")
                .value_name("TARGET")
                .default_value("console")
                .help("ログ出力先 (console, file, both)")
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("ログレベル (trace, debug, info, warn, error)。-v より優先")
        )
        .get_matches();

    let verbose_level = matches.get_count("verbose");
    let level = matches
        .get_one::<String>("log-level")
        .map(|s| parse_log_level(s))
        .unwrap_or_else(|| level_for_verbosity(verbose_level));
    let output = match matches.get_one::<String>("log-output").map(|s| LogOutput::from_str(s)) {
        Some(Ok(output)) => output,
        Some(Err(e)) => {
            eprintln!("エラー: {}", e);
            std::process::exit(1);
        }
        None => LogOutput::Console,
    };

    let _guard = match init_logging(LogConfig { level, output, ..LogConfig::default() }) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("ログ初期化エラー: {}", e);
            std::process::exit(1);
        }
    };

    println!("艦隊戦シミュレーション (Fleet Combat Simulation) - fleetsim v0.1.0");
    println!();

    if let Some(scenario_path) = matches.get_one::<String>("scenario") {
        let options = RunOptions {
            info_only: matches.get_flag("info"),
            runs: matches.get_one::<usize>("runs").copied(),
            seed: matches.get_one::<u64>("seed").copied(),
        };
        if let Err(e) = run_scenario(scenario_path, &options) {
            eprintln!("エラー: {}", e);
            std::process::exit(1);
        }
    } else {
        // デフォルト動作: 利用可能なシナリオ一覧を表示
        show_default_help();
    }
}

/// 実行オプション
struct RunOptions {
    info_only: bool,
    runs: Option<usize>,
    seed: Option<u64>,
}

/// シナリオファイルを読み込んで実行
fn run_scenario(scenario_path: &str, options: &RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut scenario = ScenarioConfig::from_file(scenario_path)?;
    info!(path = scenario_path, name = %scenario.meta.name, "シナリオファイル読み込み完了");

    if let Some(seed) = options.seed {
        scenario.battle.seed = seed;
    }

    scenario.print_summary();
    if options.info_only {
        return Ok(());
    }

    match options.runs {
        Some(runs) => {
            let report = run_batch(&scenario, runs)?;
            println!("=== バッチ結果 ===");
            print!("{}", serde_yaml::to_string(&report)?);
        }
        None => {
            let summary = BattleEngine::from_scenario(&scenario).run();
            println!("=== 戦闘結果 ===");
            print!("{}", serde_yaml::to_string(&summary)?);
        }
    }

    Ok(())
}

/// デフォルトヘルプとシナリオ一覧を表示
fn show_default_help() {
    println!("使用方法:");
    println!("  fleetsim [オプション]");
    println!();
    println!("オプション:");
    println!("  -s, --scenario <FILE>    シナリオファイルを指定して実行");
    println!("  -i, --info               シナリオ情報のみ表示");
    println!("  -n, --runs <N>           N回の戦闘を並行実行して集計");
    println!("      --seed <SEED>        シード値を上書き");
    println!("  -v, --verbose            詳細出力 (複数指定で詳細レベル上昇)");
    println!("      --log-output <T>     ログ出力先 (console, file, both)");
    println!("      --log-level <LEVEL>  ログレベル");
    println!("  -h, --help               このヘルプを表示");
    println!();
    println!("利用可能なシナリオファイル:");
    println!("  scenarios/skirmish.yaml      - 小規模な遭遇戦");
    println!("  scenarios/fleet_action.yaml  - ミサイルと点防御を含む艦隊戦");
    println!();
    println!("例:");
    println!("  fleetsim -s scenarios/skirmish.yaml");
    println!("  fleetsim -s scenarios/fleet_action.yaml -v");
    println!("  fleetsim -s scenarios/fleet_action.yaml -n 100 --seed 7");
    println!("  fleetsim -s scenarios/skirmish.yaml -i");
}
