//! Record extraction from a parsed save file
//!
//! Turns the value tree into tournament metadata, prize tiers and
//! participating players. Missing fields are never an error: they stay unset,
//! count as zero, or (for players without a name or any sign of
//! participation) drop the record.

use super::value::{Document, Value};
use super::TdtFile;
use crate::model::{Player, Prize, TournamentInfo};

const PRIZE_RECORD: &str = "GamePrize";
const PLAYER_RECORD: &str = "GamePlayer";
const BUYIN_RECORD: &str = "GameBuyin";
const BUSTOUT_RECORD: &str = "GameBustOut";
const ADDON_RECORD: &str = "GameAddOn";

/// Extract every record from a document, in source order
pub fn extract(doc: &Document<'_>) -> TdtFile {
    let mut prizes = Vec::new();
    let mut players = Vec::new();
    let mut dropped_players = 0;

    for node in doc.walk() {
        match node.value.record_kind() {
            Some(PRIZE_RECORD) => prizes.push(prize(node.value)),
            Some(PLAYER_RECORD) => match player(node.value) {
                Some(player) => players.push(player),
                None => dropped_players += 1,
            },
            _ => {}
        }
    }

    TdtFile {
        tournament: tournament_info(doc),
        prizes,
        players,
        dropped_players,
    }
}

/// Metadata fields take their first non-empty occurrence in the file. The fee
/// is the first `Fee` amount anywhere after the first `Buyins` key, however
/// deeply nested.
fn tournament_info(doc: &Document<'_>) -> TournamentInfo {
    let mut info = TournamentInfo::default();
    let mut after_buyins = false;

    for node in doc.walk() {
        let Some(key) = node.key else {
            continue;
        };
        match key {
            "V" => first_text(&mut info.version, node.value),
            "Description" => first_text(&mut info.description, node.value),
            "LeagueName" => first_text(&mut info.league, node.value),
            "Buyins" => after_buyins = true,
            "Fee" if after_buyins && info.buyin_fee.is_none() => {
                info.buyin_fee = node.value.as_amount();
            }
            _ => {}
        }
    }

    info
}

fn first_text(slot: &mut Option<String>, value: &Value<'_>) {
    if slot.is_none() {
        *slot = value
            .as_str()
            .filter(|text| !text.is_empty())
            .map(str::to_string);
    }
}

fn prize(record: &Value<'_>) -> Prize {
    let winner_uuids = record
        .get("AwardedToPlayers")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Prize {
        description: record
            .get("Description")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string),
        position: record
            .get("Recipient")
            .and_then(Value::as_amount)
            .and_then(|position| u32::try_from(position).ok()),
        percentage: record.get("Amount").and_then(Value::as_amount),
        prize_money: record.get("CalculatedAmount").and_then(Value::as_amount),
        winner_uuids,
    }
}

/// `None` when the record has no identifier, no usable name, or shows no
/// participation
fn player(record: &Value<'_>) -> Option<Player> {
    let uuid = record
        .get("UUID")
        .and_then(Value::as_str)
        .filter(|uuid| !uuid.is_empty())?;
    let name = display_name(record)?;
    if !participated(record) {
        return None;
    }

    let mut player = Player::new(uuid, name);
    let mut bought_in = false;

    // Skip the player record itself
    for node in record.walk().skip(1) {
        match node.value.record_kind() {
            Some(BUYIN_RECORD) => {
                if bought_in {
                    player.rebuys += 1;
                } else {
                    player.buyins = 1;
                    bought_in = true;
                }
                player.total_invested += amount(node.value);

                if let Some(round) = bustout_round(node.value) {
                    player.elimination_round = Some(round);
                }
            }
            Some(ADDON_RECORD) => {
                player.addons += 1;
                player.total_invested += amount(node.value);
            }
            _ => {}
        }
    }

    Some(player)
}

/// Nickname if set, otherwise "First Last" from whichever parts are set
fn display_name(record: &Value<'_>) -> Option<String> {
    if let Some(nickname) = name_part(record, "Nickname") {
        return Some(nickname.to_string());
    }

    let parts: Vec<&str> = [name_part(record, "Firstname"), name_part(record, "Lastname")]
        .into_iter()
        .flatten()
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn name_part<'v>(record: &'v Value<'_>, key: &str) -> Option<&'v str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

/// A non-empty buy-in list, or paid in full
fn participated(record: &Value<'_>) -> bool {
    let has_buyins = record
        .get("Buyins")
        .and_then(Value::as_array)
        .is_some_and(|buyins| !buyins.is_empty());
    has_buyins || record.get("PaidInFull").and_then(Value::as_bool) == Some(true)
}

fn amount(record: &Value<'_>) -> u64 {
    record.get("Amount").and_then(Value::as_amount).unwrap_or(0)
}

/// Round of the last bust-out nested in a buy-in
fn bustout_round(buyin: &Value<'_>) -> Option<u32> {
    buyin
        .walk()
        .filter(|node| node.value.record_kind() == Some(BUSTOUT_RECORD))
        .filter_map(|node| node.value.get("Round").and_then(Value::as_amount))
        .filter_map(|round| u32::try_from(round).ok())
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(data: &str) -> TdtFile {
        extract(&Document::parse(data))
    }

    #[test]
    fn test_tournament_info() {
        let file = parse(
            r#"new Tournament({V: "3.7.2", Description: "", LeagueName: "Friday League",
                Title: {Description: "Game 3"},
                Buyins: new BuyinStructure({Rules: {Fee: "n/a"}, Fee: 25}), Fee: 99})"#,
        );
        assert_eq!(file.tournament.version.as_deref(), Some("3.7.2"));
        // Empty first occurrence falls through to the next one
        assert_eq!(file.tournament.description.as_deref(), Some("Game 3"));
        assert_eq!(file.tournament.league.as_deref(), Some("Friday League"));
        assert_eq!(file.tournament.buyin_fee, Some(25));
    }

    #[test]
    fn test_fee_before_buyins_is_ignored() {
        let file = parse(r#"{Fee: 10, Other: 1, Buyins: [], Fee: 30}"#);
        assert_eq!(file.tournament.buyin_fee, Some(30));

        let file = parse(r#"{Fee: 10}"#);
        assert_eq!(file.tournament, TournamentInfo::default());
    }

    #[test]
    fn test_prize_fields() {
        let file = parse(
            r#"[new GamePrize({Description: "1st Place", Recipient: 1, Amount: 50,
                CalculatedAmount: 500, AwardedToPlayers: ["u1", "u2"]}),
               new GamePrize({Recipient: 2})]"#,
        );
        assert_eq!(file.prizes.len(), 2);

        let first = &file.prizes[0];
        assert_eq!(first.description.as_deref(), Some("1st Place"));
        assert_eq!(first.position, Some(1));
        assert_eq!(first.percentage, Some(50));
        assert_eq!(first.prize_money, Some(500));
        assert_eq!(first.winner_uuids.as_slice(), ["u1", "u2"]);

        let second = &file.prizes[1];
        assert_eq!(second.position, Some(2));
        assert_eq!(second.prize_money, None);
        assert!(second.winner_uuids.is_empty());
    }

    #[test]
    fn test_player_name_resolution() {
        let file = parse(
            r#"new GamePlayer({UUID: "a", Nickname: "  Ace ", Firstname: "Ann", PaidInFull: true})
               new GamePlayer({UUID: "b", Nickname: "", Firstname: "Bob", Lastname: "Stone", PaidInFull: true})
               new GamePlayer({UUID: "c", Firstname: " ", Lastname: "Solo", PaidInFull: true})"#,
        );
        let names: Vec<&str> = file.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Ace", "Bob Stone", "Solo"]);
    }

    #[test]
    fn test_unnamed_player_is_dropped() {
        let file = parse(
            r#"new GamePlayer({UUID: "a", Nickname: "", Firstname: "", Lastname: "",
                Buyins: [new GameBuyin({Amount: 20})]})"#,
        );
        assert!(file.players.is_empty());
        assert_eq!(file.dropped_players, 1);
    }

    #[test]
    fn test_non_participant_is_dropped() {
        let file = parse(
            r#"new GamePlayer({UUID: "a", Nickname: "Idle", Buyins: []})
               new GamePlayer({UUID: "b", Nickname: "Unpaid", Buyins: [], PaidInFull: false})
               new GamePlayer({UUID: "c", Nickname: "Paid", Buyins: [], PaidInFull: true})"#,
        );
        assert_eq!(file.players.len(), 1);
        assert_eq!(file.players[0].name, "Paid");
        assert_eq!(file.players[0].buyins, 0);
        assert_eq!(file.dropped_players, 2);
    }

    #[test]
    fn test_player_without_uuid_is_dropped() {
        let file = parse(r#"new GamePlayer({Nickname: "Anon", PaidInFull: true})"#);
        assert!(file.players.is_empty());
    }

    #[test]
    fn test_buyins_rebuys_and_addons() {
        let file = parse(
            r#"new GamePlayer({UUID: "a", Nickname: "Ann",
                Buyins: [new GameBuyin({Amount: 20}), new GameBuyin({Amount: 20}), new GameBuyin({})],
                AddOns: [new GameAddOn({Amount: 10}), new GameAddOn({Amount: 10})]})"#,
        );
        let player = &file.players[0];
        assert_eq!(player.buyins, 1);
        assert_eq!(player.rebuys, 2);
        assert_eq!(player.addons, 2);
        assert_eq!(player.total_invested, 60);
    }

    #[test]
    fn test_exponent_amount_is_scaled() {
        let file = parse(
            r#"new GamePlayer({UUID: "a", Nickname: "Ann", Buyins: [new GameBuyin({Amount: 1e3})]})"#,
        );
        assert_eq!(file.players[0].total_invested, 1000);
    }

    #[test]
    fn test_buyin_without_amount_still_counts() {
        let file = parse(
            r#"new GamePlayer({UUID: "a", Nickname: "Ann", Buyins: [new GameBuyin({Chips: 5000})]})"#,
        );
        let player = &file.players[0];
        assert_eq!(player.buyins, 1);
        assert_eq!(player.rebuys, 0);
        assert_eq!(player.total_invested, 0);
    }

    #[test]
    fn test_bustout_round() {
        let file = parse(
            r#"new GamePlayer({UUID: "a", Nickname: "Ann", Buyins: [
                new GameBuyin({Amount: 20, BustOut: new GameBustOut({Round: 2})}),
                new GameBuyin({Amount: 20, BustOut: new GameBustOut({Round: 5, Hitman: "b"})})]})
               new GamePlayer({UUID: "b", Nickname: "Bob", Buyins: [new GameBuyin({Amount: 20})]})"#,
        );
        assert_eq!(file.players[0].elimination_round, Some(5));
        assert_eq!(file.players[1].elimination_round, None);
    }

    #[test]
    fn test_nested_players_keep_document_order() {
        let file = parse(
            r#"new Tournament({Players: new GamePlayers({Players: [
                new GamePlayer({UUID: "1", Nickname: "First", PaidInFull: true}),
                new GamePlayer({UUID: "2", Nickname: "Second", PaidInFull: true})]}),
               Prizes: [new GamePrize({Recipient: 1})]})"#,
        );
        let ids: Vec<&str> = file.players.iter().map(|p| p.uuid.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(file.prizes.len(), 1);
    }
}
