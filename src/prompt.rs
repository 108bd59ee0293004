//! Interactive collection of match results
//!
//! Generic over reader and writer so the loop can run against stdin/stdout
//! in the binary and against in-memory buffers in tests.

use crate::error::{RatingError, Result};
use crate::rating::RatingCalculator;
use crate::types::{MatchResult, PlayerName};
use std::io::{BufRead, Write};
use tracing::warn;

pub const INVALID_INPUT_MESSAGE: &str =
    "Invalid input. Please enter a valid integer for round rank and a valid float for round points.";

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<Option<String>> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn report_skip<W: Write>(output: &mut W, name: &str, err: &RatingError) -> Result<()> {
    warn!(player = name, "Skipping player: {}", err);
    writeln!(output, "{}", INVALID_INPUT_MESSAGE)?;
    Ok(())
}

/// Ask for every player's rank and points, in roster order
///
/// A player whose answers do not parse is reported and skipped; a bad rank
/// skips them without asking for points. Returns the
/// names of the players left without a result, including any not reached
/// because input ran out.
pub fn prompt_match_results<R: BufRead, W: Write>(
    calculator: &mut RatingCalculator,
    input: &mut R,
    output: &mut W,
) -> Result<Vec<PlayerName>> {
    let names: Vec<PlayerName> = calculator
        .players()
        .iter()
        .map(|player| player.name.clone())
        .collect();

    for name in &names {
        let Some(rank) = ask(input, output, &format!("Enter round rank for player {}: ", name))?
        else {
            break;
        };
        let rank = match MatchResult::parse_rank(&rank) {
            Ok(rank) => rank,
            Err(e) => {
                report_skip(output, name, &e)?;
                continue;
            }
        };

        let Some(points) =
            ask(input, output, &format!("Enter round points for player {}: ", name))?
        else {
            break;
        };

        let recorded = MatchResult::parse_points(&points)
            .and_then(|points| MatchResult::new(rank, points))
            .and_then(|result| calculator.record_result(name, result));
        match recorded {
            Ok(()) => writeln!(output)?,
            Err(e) if e.is_recoverable() => report_skip(output, name, &e)?,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(calculator
        .unrecorded_players()
        .into_iter()
        .map(str::to_string)
        .collect())
}
