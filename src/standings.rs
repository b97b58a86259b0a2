//! Final standings and summary totals
//!
//! Prize winners take the position of the prize they were awarded. Everyone
//! else is ranked after the last prize position: players still in the game
//! first, in file order, then eliminated players from the latest bust-out
//! round to the earliest.

use crate::model::{Player, Prize, Summary, TournamentResults};
use crate::tdt::TdtFile;
use rustc_hash::FxHashMap;
use std::cmp::Reverse;

/// Rank every player and total up the tournament
pub fn resolve(file: TdtFile) -> TournamentResults {
    let TdtFile {
        tournament,
        prizes,
        mut players,
        ..
    } = file;

    award_prizes(&prizes, &mut players);
    rank_remaining(&prizes, &mut players);
    let summary = summarize(&players, &prizes);

    TournamentResults {
        tournament,
        players,
        prizes,
        summary,
    }
}

/// Later prizes overwrite earlier ones for a player listed more than once
fn award_prizes(prizes: &[Prize], players: &mut [Player]) {
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    for (idx, player) in players.iter().enumerate() {
        index.entry(player.uuid.as_str()).or_insert(idx);
    }

    let mut awards = Vec::new();
    for prize in prizes {
        let Some(position) = prize.position else {
            continue;
        };
        for uuid in &prize.winner_uuids {
            if let Some(&idx) = index.get(uuid.as_str()) {
                awards.push((idx, position, prize.money()));
            }
        }
    }

    for (idx, position, money) in awards {
        let player = &mut players[idx];
        player.final_position = Some(position);
        player.prize_won = money;
    }
}

fn rank_remaining(prizes: &[Prize], players: &mut [Player]) {
    let start = prizes
        .iter()
        .filter_map(|prize| prize.position)
        .max()
        .unwrap_or(0)
        .saturating_add(1);

    let (active, mut eliminated): (Vec<usize>, Vec<usize>) = players
        .iter()
        .enumerate()
        .filter(|(_, player)| player.final_position.is_none())
        .map(|(idx, _)| idx)
        .partition(|&idx| players[idx].is_active());

    // Stable sort keeps file order within a round
    eliminated.sort_by_key(|&idx| Reverse(players[idx].elimination_round));

    let mut rank = start;
    for idx in active.into_iter().chain(eliminated) {
        players[idx].final_position = Some(rank);
        rank = rank.saturating_add(1);
    }
}

fn summarize(players: &[Player], prizes: &[Prize]) -> Summary {
    Summary {
        total_players: players.len(),
        total_prize_pool: players.iter().map(|p| p.total_invested).sum(),
        total_prizes_awarded: prizes.iter().map(Prize::money).sum(),
        total_buyins: players.iter().map(|p| u64::from(p.buyins)).sum(),
        total_rebuys: players.iter().map(|p| u64::from(p.rebuys)).sum(),
        total_addons: players.iter().map(|p| u64::from(p.addons)).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn player(uuid: &str, invested: u64, elimination_round: Option<u32>) -> Player {
        let mut player = Player::new(uuid, uuid.to_uppercase());
        player.buyins = 1;
        player.total_invested = invested;
        player.elimination_round = elimination_round;
        player
    }

    fn prize(position: Option<u32>, money: Option<u64>, winners: &[&str]) -> Prize {
        Prize {
            position,
            prize_money: money,
            winner_uuids: winners.iter().map(|id| id.to_string()).collect(),
            ..Default::default()
        }
    }

    fn positions(results: &TournamentResults) -> Vec<(&str, Option<u32>, u64)> {
        results
            .players
            .iter()
            .map(|p| (p.uuid.as_str(), p.final_position, p.prize_won))
            .collect()
    }

    #[test]
    fn test_prize_winners_and_eliminated_player() {
        let results = resolve(TdtFile {
            prizes: vec![
                prize(Some(1), Some(500), &["u1"]),
                prize(Some(2), Some(300), &["u2"]),
            ],
            players: vec![
                player("u1", 20, None),
                player("u2", 20, None),
                player("u3", 20, Some(2)),
            ],
            ..Default::default()
        });

        assert_eq!(
            positions(&results),
            vec![("u1", Some(1), 500), ("u2", Some(2), 300), ("u3", Some(3), 0)]
        );
        assert_eq!(results.summary.total_prizes_awarded, 800);
        assert_eq!(results.summary.total_prize_pool, 60);
    }

    #[test]
    fn test_no_prizes_ranks_active_first() {
        let results = resolve(TdtFile {
            players: vec![player("out", 20, Some(1)), player("in", 20, None)],
            ..Default::default()
        });
        assert_eq!(
            positions(&results),
            vec![("out", Some(2), 0), ("in", Some(1), 0)]
        );
    }

    #[test]
    fn test_eliminated_ranked_by_latest_round() {
        let results = resolve(TdtFile {
            prizes: vec![prize(Some(1), Some(100), &["w"])],
            players: vec![
                player("early", 0, Some(1)),
                player("w", 0, None),
                player("late", 0, Some(4)),
                player("mid_a", 0, Some(2)),
                player("mid_b", 0, Some(2)),
                player("alive", 0, None),
            ],
            ..Default::default()
        });
        let by_position: Vec<&str> = results
            .players_by_position()
            .iter()
            .map(|p| p.uuid.as_str())
            .collect();
        assert_eq!(
            by_position,
            vec!["w", "alive", "late", "mid_a", "mid_b", "early"]
        );
    }

    #[test]
    fn test_last_award_wins() {
        let results = resolve(TdtFile {
            prizes: vec![
                prize(Some(1), Some(500), &["u1"]),
                prize(Some(2), Some(300), &["u1"]),
            ],
            players: vec![player("u1", 0, None), player("u2", 0, None)],
            ..Default::default()
        });
        assert_eq!(
            positions(&results),
            vec![("u1", Some(2), 300), ("u2", Some(3), 0)]
        );
    }

    #[test]
    fn test_duplicate_uuid_awards_first_match() {
        let results = resolve(TdtFile {
            prizes: vec![prize(Some(1), Some(50), &["dup"])],
            players: vec![player("dup", 0, None), player("dup", 0, None)],
            ..Default::default()
        });
        assert_eq!(
            positions(&results),
            vec![("dup", Some(1), 50), ("dup", Some(2), 0)]
        );
    }

    #[test]
    fn test_chopped_prize_places_every_winner() {
        let results = resolve(TdtFile {
            prizes: vec![Prize {
                position: Some(1),
                prize_money: Some(400),
                winner_uuids: smallvec!["a".to_string(), "b".to_string()],
                ..Default::default()
            }],
            players: vec![player("a", 0, None), player("b", 0, None)],
            ..Default::default()
        });
        assert_eq!(
            positions(&results),
            vec![("a", Some(1), 400), ("b", Some(1), 400)]
        );
    }

    #[test]
    fn test_positionless_and_unmatched_prizes() {
        let results = resolve(TdtFile {
            prizes: vec![
                prize(None, Some(75), &["u1"]),
                prize(Some(1), None, &["ghost"]),
            ],
            players: vec![player("u1", 10, None)],
            ..Default::default()
        });
        // Positionless prize places nobody but its money still counts
        assert_eq!(positions(&results), vec![("u1", Some(2), 0)]);
        assert_eq!(results.summary.total_prizes_awarded, 75);
    }

    #[test]
    fn test_empty_input() {
        let results = resolve(TdtFile::default());
        assert!(results.players.is_empty());
        assert_eq!(results.summary, Summary::default());
    }

    #[test]
    fn test_summary_counts() {
        let mut rebuyer = player("r", 60, Some(3));
        rebuyer.rebuys = 2;
        rebuyer.addons = 1;
        let mut comp = player("c", 0, None);
        comp.buyins = 0;

        let results = resolve(TdtFile {
            players: vec![rebuyer, comp, player("p", 20, None)],
            ..Default::default()
        });
        assert_eq!(
            results.summary,
            Summary {
                total_players: 3,
                total_prize_pool: 80,
                total_prizes_awarded: 0,
                total_buyins: 2,
                total_rebuys: 2,
                total_addons: 1,
            }
        );
    }
}
