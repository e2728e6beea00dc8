use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use credito_associativo_rs::report;
use credito_associativo_rs::{
    ProductConfig, SafeTimeProvider, SimulationError, Simulator, TimeSource,
};

/// Crédito Associativo payment capacity simulator
#[derive(Parser)]
#[command(
    name = "simulador",
    version,
    about = "Simulate a Crédito Associativo financing and check affordability"
)]
struct Cli {
    /// Contract value (R$)
    #[arg(long)]
    contract_value: String,

    /// Down payment (R$)
    #[arg(long)]
    down_payment: String,

    /// Declared monthly income (R$)
    #[arg(long)]
    monthly_income: String,

    /// Construction start date, YYYY-MM-DD
    #[arg(long)]
    start_date: String,

    /// Product configuration override (json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn load_config(path: Option<&PathBuf>) -> Result<ProductConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            Ok(ProductConfig::from_json(&raw)?)
        }
        None => Ok(ProductConfig::credito_associativo()),
    }
}

fn run(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_ref())?;
    log::debug!("using product configuration {:?}", config.product_name);

    let simulator = Simulator::new(config)?;
    let time = SafeTimeProvider::new(TimeSource::System);

    let result = simulator.simulate_raw(
        &cli.contract_value,
        &cli.down_payment,
        &cli.monthly_income,
        &cli.start_date,
        &time,
    )?;

    let output = match cli.format {
        OutputFormat::Text => report::render_text(&result),
        OutputFormat::Json => report::render_json(&result)?,
    };
    Ok(output)
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            let invalid_data = e
                .downcast_ref::<SimulationError>()
                .map(|err| err.is_invalid_data())
                .unwrap_or(false);
            if invalid_data {
                eprintln!("Dados inválidos");
                process::exit(2);
            }
            process::exit(1);
        }
    }
}
