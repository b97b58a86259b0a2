//! Tournament records extracted from a save file and the resolved results

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Identifiers of the players a prize went to. Almost always one, more for a chop.
pub type WinnerIds = SmallVec<[String; 1]>;

/// Event metadata; every field is independently optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentInfo {
    pub version: Option<String>,
    pub description: Option<String>,
    pub league: Option<String>,
    pub buyin_fee: Option<u64>,
}

/// A configured payout slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    pub description: Option<String>,
    /// Finishing position the prize is awarded to
    pub position: Option<u32>,
    /// Share of the pool, in percent
    pub percentage: Option<u64>,
    /// Money actually paid out
    pub prize_money: Option<u64>,
    /// Empty when not yet awarded
    pub winner_uuids: WinnerIds,
}

impl Prize {
    pub fn money(&self) -> u64 {
        self.prize_money.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub uuid: String,
    /// Never empty
    pub name: String,
    /// 1 if the player bought in, otherwise 0
    pub buyins: u32,
    pub rebuys: u32,
    pub addons: u32,
    pub total_invested: u64,
    /// Set by the standings resolver
    pub final_position: Option<u32>,
    pub prize_won: u64,
    /// `None` while the player is still active
    pub elimination_round: Option<u32>,
}

impl Player {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Player {
            uuid: uuid.into(),
            name: name.into(),
            buyins: 0,
            rebuys: 0,
            addons: 0,
            total_invested: 0,
            final_position: None,
            prize_won: 0,
            elimination_round: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.elimination_round.is_none()
    }
}

/// Aggregate totals over the final player and prize lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_players: usize,
    pub total_prize_pool: u64,
    pub total_prizes_awarded: u64,
    pub total_buyins: u64,
    pub total_rebuys: u64,
    pub total_addons: u64,
}

/// Everything a run produces: the export file is this struct as JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentResults {
    pub tournament: TournamentInfo,
    /// In extraction order
    pub players: Vec<Player>,
    /// In extraction order
    pub prizes: Vec<Prize>,
    pub summary: Summary,
}

impl TournamentResults {
    /// First player with the given identifier
    pub fn player(&self, uuid: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.uuid == uuid)
    }

    /// Display names of the prize winners that resolve to a retained player
    pub fn winner_names(&self, prize: &Prize) -> Vec<&str> {
        prize
            .winner_uuids
            .iter()
            .filter_map(|uuid| self.player(uuid))
            .map(|player| player.name.as_str())
            .collect()
    }

    /// Players ordered by final position, unresolved last
    pub fn players_by_position(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.iter().collect();
        players.sort_by_key(|player| player.final_position.unwrap_or(u32::MAX));
        players
    }

    /// Prizes ordered by position, positionless last
    pub fn prizes_by_position(&self) -> Vec<&Prize> {
        let mut prizes: Vec<&Prize> = self.prizes.iter().collect();
        prizes.sort_by_key(|prize| prize.position.unwrap_or(u32::MAX));
        prizes
    }
}
