//! JSON export of resolved results

use crate::model::TournamentResults;
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Replaces the input's extension: `game 3.tdt` exports to `game 3.tournament_results.json`
pub const EXPORT_SUFFIX: &str = "tournament_results.json";

/// Where the export for a save file goes by default
pub fn export_path(input: &Path) -> PathBuf {
    input.with_extension(EXPORT_SUFFIX)
}

/// Write the results as pretty-printed JSON, replacing any existing file
pub fn write_results(results: &TournamentResults, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, results)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn to_json(results: &TournamentResults) -> Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Player, Prize};
    use serde_json::{json, Value};
    use smallvec::smallvec;

    fn results() -> TournamentResults {
        let mut ann = Player::new("u1", "Ann");
        ann.buyins = 1;
        ann.total_invested = 20;
        ann.final_position = Some(1);
        ann.prize_won = 100;

        TournamentResults {
            players: vec![ann],
            prizes: vec![Prize {
                position: Some(1),
                prize_money: Some(100),
                winner_uuids: smallvec!["u1".to_string()],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_export_path() {
        assert_eq!(
            export_path(Path::new("saves/game 3 25.tdt")),
            PathBuf::from("saves/game 3 25.tournament_results.json")
        );
        assert_eq!(
            export_path(Path::new("league")),
            PathBuf::from("league.tournament_results.json")
        );
    }

    #[test]
    fn test_every_field_is_rendered() {
        let value: Value = serde_json::from_str(&to_json(&results()).unwrap()).unwrap();

        assert_eq!(
            value["tournament"],
            json!({"version": null, "description": null, "league": null, "buyin_fee": null})
        );
        assert_eq!(
            value["players"][0],
            json!({
                "uuid": "u1",
                "name": "Ann",
                "buyins": 1,
                "rebuys": 0,
                "addons": 0,
                "total_invested": 20,
                "final_position": 1,
                "prize_won": 100,
                "elimination_round": null
            })
        );
        assert_eq!(value["prizes"][0]["winner_uuids"], json!(["u1"]));
        assert_eq!(value["prizes"][0]["description"], Value::Null);
        assert_eq!(value["summary"]["total_players"], json!(0));
    }

    #[test]
    fn test_write_and_read_back() {
        let path = std::env::temp_dir().join(format!("tdt-export-{}.json", std::process::id()));
        let results = results();

        write_results(&results, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let parsed: TournamentResults = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, results);
        assert!(contents.starts_with("{\n  \"tournament\""));
    }
}
