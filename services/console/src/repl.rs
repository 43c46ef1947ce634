//! Free-form command reader
//!
//! Reads whitespace-separated commands line by line and drives the
//! engine. Input can be interactive or a piped script; bad input gets a
//! message, never a crash.

use matching_engine::{MatchingEngine, TopOfBook};
use std::io::{BufRead, Write};
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Side;

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Place { side: Side, price: u64, quantity: u64 },
    Cancel { id: u64 },
    Book,
    Status { id: u64 },
    Help,
    Exit,
}

/// Parse one input line into a command
///
/// Returns `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut tokens = line.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return Ok(None);
    };

    let command = match keyword {
        "buy" | "sell" => {
            let side = if keyword == "buy" { Side::Bid } else { Side::Ask };
            let price = parse_u64(tokens.next(), "price")?;
            let quantity = parse_u64(tokens.next(), "quantity")?;
            Command::Place {
                side,
                price,
                quantity,
            }
        }
        "cancel" => Command::Cancel {
            id: parse_u64(tokens.next(), "order id")?,
        },
        "status" => Command::Status {
            id: parse_u64(tokens.next(), "order id")?,
        },
        "book" => Command::Book,
        "help" => Command::Help,
        "exit" => Command::Exit,
        other => return Err(format!("unknown command `{other}`, try `help`")),
    };

    if tokens.next().is_some() {
        return Err(format!("too many arguments for `{keyword}`"));
    }
    Ok(Some(command))
}

fn parse_u64(token: Option<&str>, what: &str) -> Result<u64, String> {
    let token = token.ok_or_else(|| format!("missing {what}"))?;
    token
        .parse::<u64>()
        .map_err(|_| format!("invalid {what} `{token}`, expected a positive integer"))
}

/// Run the read-eval loop until `exit` or end of input.
pub fn run<R: BufRead, W: Write>(
    engine: &mut MatchingEngine,
    input: R,
    output: &mut W,
) -> std::io::Result<()> {
    writeln!(
        output,
        "Order Matching Engine (enter `help` for commands, `exit` to quit)"
    )?;

    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(Some(command)) => {
                if execute(engine, command, output)? {
                    break;
                }
            }
            Ok(None) => {}
            Err(message) => writeln!(output, "Error: {message}")?,
        }
    }
    Ok(())
}

/// Execute one command; returns true when the loop should stop.
fn execute<W: Write>(
    engine: &mut MatchingEngine,
    command: Command,
    output: &mut W,
) -> std::io::Result<bool> {
    match command {
        Command::Place {
            side,
            price,
            quantity,
        } => match engine.place(side, Price::from_u64(price), Quantity::from_u64(quantity)) {
            Ok(trades) if trades.is_empty() => writeln!(output, "Order placed, no trades.")?,
            Ok(trades) => {
                for trade in &trades {
                    writeln!(output, "TRADE: {} @ {}", trade.quantity, trade.price)?;
                }
            }
            Err(e) => writeln!(output, "Error: {e}")?,
        },
        Command::Cancel { id } => match engine.cancel(OrderId::from_u64(id)) {
            Ok(()) => writeln!(output, "Order {id} cancelled.")?,
            Err(e) => writeln!(output, "Error: {e}")?,
        },
        Command::Status { id } => match engine.order_status(OrderId::from_u64(id)) {
            Ok(status) => writeln!(output, "Order {id} is {status}.")?,
            Err(e) => writeln!(output, "Error: {e}")?,
        },
        Command::Book => print_book(&engine.snapshot_top(), output)?,
        Command::Help => print_help(output)?,
        Command::Exit => return Ok(true),
    }
    Ok(false)
}

fn print_book<W: Write>(top: &TopOfBook, output: &mut W) -> std::io::Result<()> {
    writeln!(output, "--- ORDER BOOK ---")?;
    match &top.best_ask {
        Some((price, order)) => writeln!(output, "Top Ask: {} @ {}", order.remaining(), price)?,
        None => writeln!(output, "Top Ask: <empty>")?,
    }
    match &top.best_bid {
        Some((price, order)) => writeln!(output, "Top Bid: {} @ {}", order.remaining(), price)?,
        None => writeln!(output, "Top Bid: <empty>")?,
    }
    writeln!(output, "------------------")
}

fn print_help<W: Write>(output: &mut W) -> std::io::Result<()> {
    writeln!(
        output,
        "Available commands:\n  \
         buy <price> <qty>   - place a bid\n  \
         sell <price> <qty>  - place an ask\n  \
         cancel <id>         - cancel a resting order\n  \
         status <id>         - show a resting order's status\n  \
         book                - show the top of the book\n  \
         exit                - save state and quit"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use matching_engine::events::MemoryEventLog;
    use matching_engine::EngineConfig;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_parse_place_commands() {
        assert_eq!(
            parse_command("buy 100 5").unwrap(),
            Some(Command::Place {
                side: Side::Bid,
                price: 100,
                quantity: 5
            })
        );
        assert_eq!(
            parse_command("sell 105 3").unwrap(),
            Some(Command::Place {
                side: Side::Ask,
                price: 105,
                quantity: 3
            })
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_command("buy 100").is_err());
        assert!(parse_command("buy abc 5").is_err());
        assert!(parse_command("cancel").is_err());
        assert!(parse_command("buy 100 5 9").is_err());
        assert!(parse_command("launch 1 2").is_err());
    }

    #[test]
    fn test_blank_line_is_no_command() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_scripted_session() {
        let tmp = TempDir::new().unwrap();
        let config = EngineConfig::new(tmp.path());
        let mut engine =
            MatchingEngine::open(&config, Arc::new(MemoryEventLog::new())).unwrap();

        let script = "sell 100 5\nbuy 100 5\nbook\nexit\nbuy 1 1\n";
        let mut output = Vec::new();
        run(&mut engine, script.as_bytes(), &mut output).unwrap();

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("TRADE: 5 @ 100"));
        assert!(printed.contains("Top Ask: <empty>"));
        // Nothing after `exit` ran
        assert_eq!(engine.resting_order_count(), 0);
    }

    #[test]
    fn test_engine_errors_are_messages_not_crashes() {
        let tmp = TempDir::new().unwrap();
        let config = EngineConfig::new(tmp.path());
        let mut engine =
            MatchingEngine::open(&config, Arc::new(MemoryEventLog::new())).unwrap();

        let script = "cancel 42\nbuy 0 5\nexit\n";
        let mut output = Vec::new();
        run(&mut engine, script.as_bytes(), &mut output).unwrap();

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("Order not found: 42"));
        assert!(printed.contains("Invalid price"));
    }
}
