use anyhow::{bail, Context};
use simulation::{generate_script, GeneratorConfig};

/// Usage: simulation [orders] [seed] [output]
///
/// Writes a random command script suitable for piping into the console:
/// `console < input_orders.txt`
fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() > 3 {
        bail!("usage: simulation [orders] [seed] [output]");
    }

    let orders: usize = match args.first() {
        Some(raw) => raw.parse().context("orders must be a positive integer")?,
        None => 100,
    };
    let seed: u64 = match args.get(1) {
        Some(raw) => raw.parse().context("seed must be an integer")?,
        None => 42,
    };
    let output = args
        .get(2)
        .map(String::as_str)
        .unwrap_or("input_orders.txt");

    let config = GeneratorConfig {
        orders,
        ..GeneratorConfig::default()
    };
    let script = generate_script(config, seed);
    std::fs::write(output, &script).with_context(|| format!("writing {output}"))?;

    println!("Generated {orders} commands (seed {seed}) in {output}");
    println!("Run them with: console < {output}");
    Ok(())
}
