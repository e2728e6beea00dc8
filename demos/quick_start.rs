/// quick start - simulate one Crédito Associativo request
use credito_associativo_rs::report;
use credito_associativo_rs::{SafeTimeProvider, Simulator, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let simulator = Simulator::credito_associativo();

    // R$ 100.000 contract, R$ 24.000 down, R$ 20.000 monthly income
    let result = simulator.simulate_raw("100000", "24000", "20000", "2024-01-15", &time)?;

    println!("{}", report::render_text(&result));
    println!();
    println!("{}", report::render_json(&result)?);

    Ok(())
}
