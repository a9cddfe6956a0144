//! JSON save format for agent needs.
use serde::{Deserialize, Serialize};

use crate::core::JsonLinesLog;

pub const NEEDS_SAVE_PATH: &str = "saves/needs.jsonl";

/// Plain need values as persisted. Loaded values are clamped by
/// `NeedsState::restore`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeedsSnapshot {
    pub hunger: f32,
    pub thirst: f32,
    pub rest: f32,
    pub energy: f32,
}

/// One agent line in the save file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedsSaveRecord {
    pub tick: u64,
    pub elapsed_seconds: f64,
    pub agent_id: String,
    pub display_name: String,
    pub needs: NeedsSnapshot,
}

/// Buffered writer for `saves/needs.jsonl`.
pub type NeedsSaveLog = JsonLinesLog<NeedsSaveRecord>;

#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        io::Write,
        path::PathBuf,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;
    use crate::core::read_json_lines;

    fn unique_save_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        env::temp_dir()
            .join(format!("hearthlands_{name}_{nanos}"))
            .join("needs.jsonl")
    }

    fn record(agent_id: &str, hunger: f32) -> NeedsSaveRecord {
        NeedsSaveRecord {
            tick: 12,
            elapsed_seconds: 6.0,
            agent_id: agent_id.into(),
            display_name: "Settler".into(),
            needs: NeedsSnapshot {
                hunger,
                thirst: 80.0,
                rest: 70.0,
                energy: 60.0,
            },
        }
    }

    #[test]
    fn records_round_trip_through_the_save_file() {
        let path = unique_save_path("needs_records");
        let mut log = NeedsSaveLog::new(&path);

        log.push(record("AGENT-0001", 90.0));
        log.push(record("AGENT-0002", 45.5));
        assert_eq!(log.flush().expect("flush"), 2);

        let contents = fs::read_to_string(&path).expect("save file written");
        assert!(contents.contains("\"agent_id\":\"AGENT-0002\""));

        let records: Vec<NeedsSaveRecord> = read_json_lines(&path).expect("records parse");
        assert_eq!(records[1], record("AGENT-0002", 45.5));

        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn interrupted_append_keeps_the_intact_record() {
        let path = unique_save_path("needs_torn");
        let mut log = NeedsSaveLog::new(&path);
        log.push(record("AGENT-0001", 64.0));
        log.flush().expect("seed save file");

        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .expect("open save file");
        file.write_all(b"{\"tick\":2,\"elap").expect("append torn line");
        drop(file);

        let records: Vec<NeedsSaveRecord> = read_json_lines(&path).expect("readable");
        assert_eq!(records, vec![record("AGENT-0001", 64.0)]);

        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir_all(parent);
        }
    }
}
