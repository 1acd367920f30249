use std::fmt;

use serde::Deserialize;

/// Games with a HoYoLAB battle chronicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Game {
    Genshin,
    StarRail,
}

impl Game {
    /// `game_id` used by the record card endpoint.
    pub(crate) fn id(self) -> u32 {
        match self {
            Game::Genshin => 2,
            Game::StarRail => 6,
        }
    }

    pub(crate) fn note_path(self) -> &'static str {
        match self {
            Game::Genshin => "game_record/genshin/api/dailyNote",
            Game::StarRail => "game_record/hkrpg/api/note",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Game::Genshin => f.write_str("Genshin Impact"),
            Game::StarRail => f.write_str("Honkai: Star Rail"),
        }
    }
}

/// HoYoLAB response envelope.
#[derive(Deserialize, Debug)]
pub(crate) struct Envelope<T> {
    pub retcode: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct Chronicle {
    #[serde(default)]
    pub list: Vec<ChronicleEntry>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct ChronicleEntry {
    #[serde(alias = "title", alias = "nickname")]
    pub name: Option<String>,
    pub level: Option<u32>,
    pub game_id: Option<u32>,
    pub game_role_id: Option<String>,
    pub region: Option<String>,
    /// Name/value pairs shown on the record card.
    #[serde(default)]
    pub data: Vec<CardStat>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct CardStat {
    pub name: String,
    pub value: String,
}

pub(crate) const MAX_CHRONICLE_LINES: usize = 8;

impl Chronicle {
    pub(crate) fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub(crate) fn summary_lines(&self) -> Vec<String> {
        self.list
            .iter()
            .take(MAX_CHRONICLE_LINES)
            .map(ChronicleEntry::summary)
            .collect()
    }
}

impl ChronicleEntry {
    /// Summary line followed by one line per card stat.
    pub(crate) fn stats_lines(&self) -> Vec<String> {
        std::iter::once(self.summary())
            .chain(
                self.data
                    .iter()
                    .map(|stat| format!("{}: {}", stat.name, stat.value)),
            )
            .collect()
    }

    pub(crate) fn summary(&self) -> String {
        let name = self.name.as_deref().unwrap_or("Unknown");
        match self.level {
            Some(level) => format!("{} - Lv {}", name, level),
            None => format!("{} - Lv ?", name),
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct DailyNote {
    #[serde(alias = "current_stamina")]
    pub current_resin: Option<u32>,
    #[serde(alias = "max_stamina")]
    pub max_resin: Option<u32>,
    #[serde(alias = "current_home_coin")]
    pub realm_currency: Option<u32>,
    #[serde(alias = "max_home_coin")]
    pub max_realm_currency: Option<u32>,
    #[serde(alias = "accepted_epedition_num")]
    pub current_expedition_num: Option<u32>,
    pub max_expedition_num: Option<u32>,
    pub expeditions: Option<Vec<Expedition>>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct Expedition {
    pub status: Option<String>,
}

impl DailyNote {
    /// One line per field present in the response; empty when none is.
    pub(crate) fn lines(&self) -> Vec<String> {
        let mut lines = vec![];

        if let Some(current) = self.current_resin {
            lines.push(match self.max_resin {
                Some(max) => format!("🔋 Resin: {}/{}", current, max),
                None => format!("🔋 Resin: {}", current),
            });
        }

        if let Some(currency) = self.realm_currency {
            lines.push(match self.max_realm_currency {
                Some(max) => format!("🏠 Realm currency: {}/{}", currency, max),
                None => format!("🏠 Realm currency: {}", currency),
            });
        }

        let active = self
            .current_expedition_num
            .or_else(|| self.expeditions.as_ref().map(|list| list.len() as u32));
        if let Some(active) = active {
            lines.push(match self.max_expedition_num {
                Some(max) => format!("🚩 Expeditions: {}/{} active", active, max),
                None => format!("🚩 Expeditions: {} active", active),
            });
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_card_deser() {
        let body = r#"
            {
                "retcode": 0,
                "message": "OK",
                "data": {
                    "list": [
                        {
                            "has_role": true,
                            "game_id": 2,
                            "game_role_id": "700000001",
                            "nickname": "Traveler",
                            "region": "os_euro",
                            "level": 58,
                            "region_name": "Europe Server",
                            "data": [
                                { "name": "Days Active", "type": 1, "value": "412" },
                                { "name": "Characters", "type": 1, "value": "38" }
                            ]
                        },
                        {
                            "game_id": 6,
                            "title": "Trailblazer",
                            "level": 70
                        }
                    ]
                }
            }
        "#;

        let envelope: Envelope<Chronicle> = serde_json::from_str(body).unwrap();

        assert_eq!(envelope.retcode, 0);
        assert_eq!(
            envelope.data.unwrap(),
            Chronicle {
                list: vec![
                    ChronicleEntry {
                        name: Some("Traveler".to_string()),
                        level: Some(58),
                        game_id: Some(2),
                        game_role_id: Some("700000001".to_string()),
                        region: Some("os_euro".to_string()),
                        data: vec![
                            CardStat {
                                name: "Days Active".to_string(),
                                value: "412".to_string(),
                            },
                            CardStat {
                                name: "Characters".to_string(),
                                value: "38".to_string(),
                            },
                        ],
                    },
                    ChronicleEntry {
                        name: Some("Trailblazer".to_string()),
                        level: Some(70),
                        game_id: Some(6),
                        ..Default::default()
                    },
                ]
            }
        );
    }

    #[test]
    fn error_envelope_deser() {
        let body = r#"{"retcode": -100, "message": "Please login", "data": null}"#;
        let envelope: Envelope<Chronicle> = serde_json::from_str(body).unwrap();

        assert_eq!(envelope.retcode, -100);
        assert_eq!(envelope.message, "Please login");
        assert!(envelope.data.is_none());
    }

    #[test]
    fn chronicle_summary_is_capped() {
        let chronicle = Chronicle {
            list: (1..=12)
                .map(|level| ChronicleEntry {
                    name: Some(format!("Account {}", level)),
                    level: Some(level),
                    ..Default::default()
                })
                .collect(),
        };

        let lines = chronicle.summary_lines();
        assert_eq!(lines.len(), MAX_CHRONICLE_LINES);
        assert_eq!(lines[0], "Account 1 - Lv 1");
    }

    #[test]
    fn chronicle_entry_without_fields() {
        assert_eq!(ChronicleEntry::default().summary(), "Unknown - Lv ?");
    }

    #[test]
    fn daily_note_resin_only() {
        let note: DailyNote =
            serde_json::from_str(r#"{"current_resin": 80, "max_resin": 160}"#).unwrap();

        assert_eq!(note.lines(), vec!["🔋 Resin: 80/160".to_string()]);
    }

    #[test]
    fn daily_note_genshin_wire_names() {
        let note: DailyNote = serde_json::from_str(
            r#"{
                "current_resin": 12,
                "max_resin": 200,
                "current_home_coin": 1500,
                "max_home_coin": 2400,
                "finished_task_num": 4
            }"#,
        )
        .unwrap();

        assert_eq!(
            note.lines(),
            vec![
                "🔋 Resin: 12/200".to_string(),
                "🏠 Realm currency: 1500/2400".to_string(),
            ]
        );
    }

    #[test]
    fn stats_lines_follow_summary() {
        let entry = ChronicleEntry {
            name: Some("Traveler".to_string()),
            level: Some(58),
            data: vec![CardStat {
                name: "Achievements".to_string(),
                value: "701".to_string(),
            }],
            ..Default::default()
        };

        assert_eq!(
            entry.stats_lines(),
            vec!["Traveler - Lv 58".to_string(), "Achievements: 701".to_string()]
        );
    }

    #[test]
    fn daily_note_expeditions() {
        let note: DailyNote = serde_json::from_str(
            r#"{
                "current_resin": 80,
                "max_resin": 160,
                "current_expedition_num": 3,
                "max_expedition_num": 5,
                "expeditions": [
                    { "status": "Ongoing" },
                    { "status": "Finished" },
                    { "status": "Ongoing" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            note.lines(),
            vec![
                "🔋 Resin: 80/160".to_string(),
                "🚩 Expeditions: 3/5 active".to_string(),
            ]
        );
    }

    #[test]
    fn daily_note_expedition_list_without_counts() {
        let note: DailyNote =
            serde_json::from_str(r#"{"expeditions": [{"status": "Ongoing"}]}"#).unwrap();

        assert_eq!(note.lines(), vec!["🚩 Expeditions: 1 active".to_string()]);
    }

    #[test]
    fn daily_note_star_rail_wire_names() {
        let note: DailyNote =
            serde_json::from_str(r#"{"current_stamina": 100, "max_stamina": 240}"#).unwrap();

        assert_eq!(note.lines(), vec!["🔋 Resin: 100/240".to_string()]);
    }

    #[test]
    fn daily_note_without_known_fields() {
        let note: DailyNote = serde_json::from_str(r#"{"finished_task_num": 4}"#).unwrap();
        assert!(note.lines().is_empty());
    }
}
