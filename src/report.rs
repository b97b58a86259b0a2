//! Console report for resolved tournament results

use crate::model::{Player, Prize, TournamentResults};
use std::fmt;

const RULE_WIDTH: usize = 120;
const NAME_WIDTH: usize = 24;

/// Renders the summary, prize structure and final results tables
///
/// ```ignore
/// println!("{}", Report(&results));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Report<'a>(pub &'a TournamentResults);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let results = self.0;
        let info = &results.tournament;
        let summary = &results.summary;

        writeln!(f)?;
        rule(f, '=')?;
        writeln!(
            f,
            "TOURNAMENT SUMMARY: {}",
            info.description.as_deref().unwrap_or("Unknown")
        )?;
        writeln!(f, "League: {}", info.league.as_deref().unwrap_or("Unknown"))?;
        writeln!(f, "Buy-in: ${}", info.buyin_fee.unwrap_or(0))?;
        rule(f, '=')?;

        writeln!(f)?;
        writeln!(f, "Total Players: {}", summary.total_players)?;
        writeln!(f, "Total Prize Pool: ${}", summary.total_prize_pool)?;
        writeln!(f, "Total Prizes Awarded: ${}", summary.total_prizes_awarded)?;
        writeln!(
            f,
            "Buy-ins: {}, Rebuys: {}, Add-ons: {}",
            summary.total_buyins, summary.total_rebuys, summary.total_addons
        )?;

        if !results.prizes.is_empty() {
            section(f, "PRIZE STRUCTURE")?;
            for prize in results.prizes_by_position() {
                prize_line(f, results, prize)?;
            }
        }

        section(f, "FINAL RESULTS")?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<5} {:<25} {:<8} {:<7} {:<8} {:<8} {:<8} {:<10}",
            "Pos", "Player Name", "Buy-ins", "Rebuys", "Add-ons", "Total $", "Elim Rd", "Prize Won"
        )?;
        rule(f, '-')?;
        for player in results.players_by_position() {
            player_row(f, player)?;
        }

        Ok(())
    }
}

fn rule(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    for _ in 0..RULE_WIDTH {
        write!(f, "{}", c)?;
    }
    writeln!(f)
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    rule(f, '=')?;
    writeln!(f, "{}", title)?;
    rule(f, '=')
}

fn prize_line(f: &mut fmt::Formatter<'_>, results: &TournamentResults, prize: &Prize) -> fmt::Result {
    let label = match (&prize.description, prize.position) {
        (Some(description), _) => description.clone(),
        (None, Some(position)) => format!("Position {}", position),
        (None, None) => "Unknown".to_string(),
    };

    let names = results.winner_names(prize);
    let winners = if names.is_empty() {
        "Not awarded".to_string()
    } else {
        names.join(", ")
    };

    writeln!(
        f,
        "{}: ${} ({}%) - {}",
        label,
        prize.money(),
        prize.percentage.unwrap_or(0),
        winners
    )
}

fn player_row(f: &mut fmt::Formatter<'_>, player: &Player) -> fmt::Result {
    let position = match player.final_position {
        Some(position) => format!("#{}", position),
        None => "-".to_string(),
    };
    let name: String = player.name.chars().take(NAME_WIDTH).collect();
    let elimination = match player.elimination_round {
        Some(round) => format!("R{}", round),
        None => "Active".to_string(),
    };
    let prize = if player.prize_won > 0 {
        format!("${}", player.prize_won)
    } else {
        "-".to_string()
    };

    writeln!(
        f,
        "{:<5} {:<25} {:<8} {:<7} {:<8} ${:<7} {:<8} {:<10}",
        position,
        name,
        player.buyins,
        player.rebuys,
        player.addons,
        player.total_invested,
        elimination,
        prize
    )
}
