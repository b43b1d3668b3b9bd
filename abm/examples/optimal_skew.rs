//! Small regime grid search, one JSON row per (regime, objective)

use abm::{Objective, Regime, SearchConfig, TrajectoryConfig, optimize_regimes};

fn main() {
    env_logger::init();

    let config = SearchConfig {
        trajectory: TrajectoryConfig {
            horizon: 1_000,
            ..Default::default()
        },
        coarse_points: 10,
        fine_points: 5,
        replicates: 5,
        ..Default::default()
    };

    let regimes = Regime::grid(&[0.02, 0.05], &[0.3, 0.7]);

    println!("searching {} regimes...", regimes.len());
    for objective in [
        Objective::MeanReturn,
        Objective::FinalWealth,
        Objective::MeanSquaredDistance,
    ] {
        for result in optimize_regimes(&config, &regimes, objective) {
            println!(
                "{}",
                serde_json::to_string(&result).expect("serializable row")
            );
        }
    }
}
