//! Random command-script generator
//!
//! Produces `buy`/`sell`/`cancel` lines with prices and quantities
//! drawn from configurable bands, bracketed by `book` commands and a
//! final `exit` so the script drives a complete console session.
//! Cancels target ids the script has already placed — ids are assigned
//! in submission order, so the generator can predict them.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt::Write;

/// Configuration for the command generator
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of order lines to generate
    pub orders: usize,
    /// Inclusive price band in ticks
    pub min_price: u64,
    pub max_price: u64,
    /// Inclusive quantity band in units
    pub min_quantity: u64,
    pub max_quantity: u64,
    /// Chance that a line cancels a previously placed order instead
    pub cancel_ratio: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            orders: 100,
            min_price: 750,
            max_price: 1300,
            min_quantity: 10,
            max_quantity: 100,
            cancel_ratio: 0.1,
        }
    }
}

/// Deterministic command generator with a seeded RNG
pub struct CommandGenerator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
    placed: u64,
}

impl CommandGenerator {
    pub fn new(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            placed: 0,
        }
    }

    /// Generate the next command line
    pub fn next_command(&mut self) -> String {
        if self.placed > 0 && self.rng.gen_bool(self.config.cancel_ratio) {
            let id = self.rng.gen_range(1..=self.placed);
            return format!("cancel {id}");
        }

        let verb = if self.rng.gen_bool(0.5) { "buy" } else { "sell" };
        let price = self
            .rng
            .gen_range(self.config.min_price..=self.config.max_price);
        let quantity = self
            .rng
            .gen_range(self.config.min_quantity..=self.config.max_quantity);
        self.placed += 1;
        format!("{verb} {price} {quantity}")
    }
}

/// Generate a complete console script
pub fn generate_script(config: GeneratorConfig, seed: u64) -> String {
    let orders = config.orders;
    let mut generator = CommandGenerator::new(config, seed);

    let mut script = String::from("book\n");
    for _ in 0..orders {
        let line = generator.next_command();
        writeln!(script, "{line}").expect("writing to a String cannot fail");
    }
    script.push_str("book\nexit\n");
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_script() {
        let a = generate_script(GeneratorConfig::default(), 42);
        let b = generate_script(GeneratorConfig::default(), 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate_script(GeneratorConfig::default(), 1);
        let b = generate_script(GeneratorConfig::default(), 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_script_shape() {
        let config = GeneratorConfig {
            orders: 20,
            ..GeneratorConfig::default()
        };
        let script = generate_script(config, 7);
        let lines: Vec<&str> = script.lines().collect();

        assert_eq!(lines.len(), 23);
        assert_eq!(lines.first(), Some(&"book"));
        assert_eq!(lines[lines.len() - 2], "book");
        assert_eq!(lines.last(), Some(&"exit"));
    }

    #[test]
    fn test_lines_stay_in_configured_bands() {
        let config = GeneratorConfig {
            orders: 200,
            min_price: 100,
            max_price: 110,
            min_quantity: 1,
            max_quantity: 5,
            cancel_ratio: 0.2,
        };
        let script = generate_script(config, 9);

        let mut placed = 0u64;
        for line in script.lines() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens[0] {
                "buy" | "sell" => {
                    placed += 1;
                    let price: u64 = tokens[1].parse().unwrap();
                    let quantity: u64 = tokens[2].parse().unwrap();
                    assert!((100..=110).contains(&price));
                    assert!((1..=5).contains(&quantity));
                }
                "cancel" => {
                    let id: u64 = tokens[1].parse().unwrap();
                    assert!(id >= 1 && id <= placed, "cancel {id} before order existed");
                }
                "book" | "exit" => {}
                other => panic!("unexpected command {other}"),
            }
        }
        assert!(placed > 0);
    }
}
