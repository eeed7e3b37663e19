//! Bearing estimation demonstration
//!
//! Simulates the reference two-receiver capture, recovers the lag and prints
//! the resulting bearing. Pass a JSON config path as the first argument to
//! override the defaults, and `--json` to dump the estimate.
//!
//! Set `RUST_LOG=tdoa_bearing=debug` to see the pipeline's tracing output.

use tdoa_bearing::{ArrayGeometry, BearingPipeline, Position, SimulationConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let dump_json = args.iter().any(|a| a == "--json");
    let config = match args.iter().find(|a| !a.starts_with("--")) {
        Some(path) => SimulationConfig::load_from_file(path)?,
        None => SimulationConfig::default(),
    };

    println!("=== Two-Receiver Bearing Demo ===\n");
    println!("Wave speed:   {:.1} m/s", config.wave_speed_mps);
    println!("Sample rate:  {:.0} Hz", config.sample_rate_hz);
    println!("Angle unit:   {:?}\n", config.angle_unit);

    let mut pipeline = BearingPipeline::new(config)?;

    demo_reference_scenario(&mut pipeline, dump_json)?;
    demo_bearing_sweep(&mut pipeline)?;

    let (hits, misses, hit_rate) = pipeline.cache().get_statistics();
    println!(
        "\nLookup tables: {} built, {} reused ({:.0}% hit rate)",
        misses,
        hits,
        hit_rate * 100.0
    );
    Ok(())
}

fn demo_reference_scenario(pipeline: &mut BearingPipeline, dump_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Reference Scenario ---");

    let geometry = ArrayGeometry::default();
    let (capture, estimate) = pipeline.run(&geometry)?;
    let [rx0, rx1] = geometry.receivers();

    println!("Receiver 0:   ({:.3}, {:.3}) m", rx0.x(), rx0.y());
    println!("Receiver 1:   ({:.3}, {:.3}) m", rx1.x(), rx1.y());
    println!(
        "Target:       ({:.3}, {:.3}) m",
        geometry.target().x(),
        geometry.target().y()
    );
    println!(
        "Distances:    {:.4} m / {:.4} m",
        capture.distances_m()[0], capture.distances_m()[1]
    );
    println!("Samples:      {}", capture.time_axis().len());
    println!("Lag range:    ±{}", estimate.search.max_lag());
    println!("True TDOA:    {:.3} µs", capture.true_tdoa_s() * 1e6);
    println!("Lag:          {}", estimate.lag);
    println!("Delay:        {:.3} µs", estimate.delay_s * 1e6);
    println!("Angle:        {:.2} ({:?})", estimate.angle, estimate.unit);
    println!(
        "True bearing: {:.2} degrees",
        geometry.true_bearing_rad().to_degrees()
    );

    if dump_json {
        println!("\n{}", serde_json::to_string_pretty(&estimate)?);
    }
    Ok(())
}

fn demo_bearing_sweep(pipeline: &mut BearingPipeline) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n--- Bearing Sweep (5 m range) ---");
    println!("{:>8} {:>6} {:>10}", "true", "lag", "estimate");

    for degrees in (-75..=75).step_by(15) {
        let theta = (degrees as f64).to_radians();
        let target = Position::new(5.0 * theta.sin(), 5.0 * theta.cos());
        let geometry = ArrayGeometry::symmetric(0.18, target)?;
        let (_, estimate) = pipeline.run(&geometry)?;
        println!("{:>8} {:>6} {:>10.2}", degrees, estimate.lag, estimate.angle);
    }
    Ok(())
}
