use log::info;
use pulse_sim::{ModuleGraph, SimulationConfig, SimulationContext};
use std::env;
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let mut args = env::args().skip(1);
    let path = args
        .next()
        .ok_or("usage: pulse-sim <input-file> [target]")?;
    let mut config = SimulationConfig::default();
    if let Some(target) = args.next() {
        config = config.with_activation_target(target);
    }

    let text = fs::read_to_string(&path)?;
    let graph = ModuleGraph::parse(&text)?;
    info!("Loaded {} modules from {}", graph.len(), path);

    let counts = SimulationContext::with_config(graph.clone(), config.clone())
        .run_configured_presses()?;
    let product = counts
        .product()
        .map_or_else(|| "overflows u64".to_string(), |product| product.to_string());
    println!(
        "Pulses after {} presses: low={} high={} product={}",
        config.press_count, counts.low, counts.high, product
    );

    let target = config.activation_target.clone();
    if graph.contains(&target) {
        let report = SimulationContext::with_config(graph, config).run_until_activation(&target)?;
        println!("Presses until '{}' activates: {}", target, report.presses);
    } else {
        info!("No module named '{}', skipping activation search", target);
    }

    Ok(())
}
