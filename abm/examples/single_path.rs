//! Run one trajectory and print its summary

use abm::{SimulationRunner, TrajectoryConfig};

fn main() {
    env_logger::init();

    let config = TrajectoryConfig {
        sigma: 0.05,
        informed_fraction: 0.5,
        skew_coefficient: 8e-6,
        horizon: 10_000,
        seed: 42,
        record_series: true,
        ..Default::default()
    };

    println!("=== Single trajectory ===");
    println!(
        "sigma={} gamma={} c={:.1e} T={}",
        config.sigma, config.informed_fraction, config.skew_coefficient, config.horizon
    );

    let trajectory = SimulationRunner::new(config)
        .run()
        .expect("well-formed config");
    let summary = &trajectory.summary;

    println!("\nmean return:     {:.4}", summary.mean_return);
    println!("final wealth:    {:.1}", summary.final_wealth);
    println!("tracking MSD:    {:.3}", summary.mean_squared_distance);
    println!("final inventory: {}", summary.final_inventory);
    println!("trades:          {}", summary.num_trades);

    if let Some(series) = &trajectory.series {
        let last = series.last().expect("non-empty horizon");
        println!(
            "\nfinal tick: S={:.2} m={:.1} bid={:?} ask={:?}",
            last.fundamental,
            last.maker_mid,
            last.best_bid.map(|p| p.ticks()),
            last.best_ask.map(|p| p.ticks()),
        );
    }

    println!(
        "\nsummary json: {}",
        serde_json::to_string(summary).expect("serializable summary")
    );
}
