//! Integration tests for sessions, capture files and summaries.
//!
//! A session's raw records are written to a temporary capture file, read
//! back, and replayed; the replayed match must match the live one.

use std::fs;
use std::sync::mpsc;

use melee_stats::records::UpdateMessage;
use melee_stats::session::{replay, IgnoredReason, MatchObserver, Outcome, Session};
use melee_stats::summary::{MatchSummary, SummaryOptions};
use melee_stats::{Config, Match, MessageType, ParserError, PlayerFrameData};

const START: [u8; 11] = [0x37, 0x00, 0x1F, 0, 2, 0, 1, 1, 9, 0, 0];

fn update(frame: u32, first_percent: f32) -> Vec<u8> {
    UpdateMessage {
        frame,
        random_seed: frame,
        players: vec![
            PlayerFrameData {
                animation: if frame < 10 { 0x4B } else { 0x0E },
                percent: first_percent,
                stocks: 4,
                ..PlayerFrameData::default()
            },
            PlayerFrameData {
                stocks: 4,
                physical_buttons: if frame % 2 == 0 { 0x0001 } else { 0 },
                ..PlayerFrameData::default()
            },
        ],
    }
    .to_bytes()
}

fn scripted_payloads() -> Vec<Vec<u8>> {
    let mut payloads = vec![vec![0x38], START.to_vec()];
    for frame in 1..=120 {
        let percent = if frame < 10 { frame as f32 * 3.0 } else { 27.0 };
        payloads.push(update(frame, percent));
    }
    payloads.push(vec![0x7F, 0x00]);
    payloads.push(vec![0x39, 0x02]);
    payloads
}

struct FrameSender(mpsc::Sender<u32>);

impl MatchObserver for FrameSender {
    fn on_update(&mut self, game: &Match) {
        let _ = self.0.send(game.frame_counter());
    }
}

// ============================================================================
// Live Session Tests
// ============================================================================

#[test]
fn test_live_session_and_records() {
    let mut session = Session::new(Config::default());
    let (tx, rx) = mpsc::channel();
    session.set_observer(Box::new(FrameSender(tx)));

    let mut capture = Vec::new();
    let mut outcomes = Vec::new();
    for payload in scripted_payloads() {
        let outcome = session.process(&payload).unwrap();
        if !matches!(outcome, Outcome::Ignored(_)) {
            capture.extend_from_slice(session.last_record());
        }
        outcomes.push(outcome);
    }

    assert_eq!(
        outcomes[0],
        Outcome::Ignored(IgnoredReason::BeforeStart(MessageType::Update))
    );
    assert_eq!(
        outcomes[outcomes.len() - 2],
        Outcome::Ignored(IgnoredReason::UnknownType(0x7F))
    );
    assert_eq!(
        outcomes[outcomes.len() - 1],
        Outcome::Ended { win_condition: 2 }
    );

    let frames: Vec<u32> = rx.try_iter().collect();
    assert_eq!(frames.len(), 120);
    assert_eq!(frames.last(), Some(&120));

    let live = session.current_match().unwrap();
    assert_eq!(capture, live.raw_log());

    let strings = live.players()[1].stats().combo_strings();
    assert_eq!(strings.len(), 1);
    assert_eq!(strings[0].hit_count, 9);
    assert_eq!(strings[0].end_percent, 27.0);
    assert_eq!(live.players()[1].stats().action_count(), 60);
}

#[test]
fn test_out_of_order_reason_maps_to_error() {
    let reason = IgnoredReason::BeforeStart(MessageType::Update);
    let err = reason.to_error();
    assert!(matches!(err, ParserError::OutOfOrderUpdate { message: "Update" }));
    assert!(err.is_recoverable());
}

// ============================================================================
// Capture File Tests
// ============================================================================

#[test]
fn test_capture_file_replay_matches_live_session() {
    let mut session = Session::new(Config::default());
    for payload in scripted_payloads() {
        session.process(&payload).unwrap();
    }
    let live = session.take_match().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("match.bin");
    fs::write(&path, live.raw_log()).unwrap();

    let data = fs::read(&path).unwrap();
    let replayed = replay(&data, Config::default()).unwrap();
    assert_eq!(replayed.records, 122);
    assert_eq!(replayed.ignored, 0);
    assert_eq!(replayed.matches.len(), 1);
    assert_eq!(replayed.matches[0], live);
}

#[test]
fn test_truncated_capture_reports_error() {
    let mut session = Session::new(Config::default());
    for payload in scripted_payloads() {
        session.process(&payload).unwrap();
    }
    let mut data = session.current_match().unwrap().raw_log().to_vec();
    data.truncate(data.len() - 1);

    assert!(matches!(
        replay(&data, Config::default()),
        Err(ParserError::TruncatedMessage { .. })
    ));
}

// ============================================================================
// Summary Tests
// ============================================================================

#[test]
fn test_summary_json() {
    let mut session = Session::new(Config::default());
    for payload in scripted_payloads() {
        session.process(&payload).unwrap();
    }
    let game = session.current_match().unwrap();

    let summary = MatchSummary::from_match(
        game,
        &Config::default(),
        SummaryOptions {
            combo_strings: true,
            recoveries: true,
        },
    );
    assert_eq!(summary.frames, 120);
    assert_eq!(summary.duration_seconds, 2.0);
    assert_eq!(summary.players[1].number_of_openings, 1);
    assert_eq!(summary.players[1].most_hits_string, 9);
    assert!((summary.players[1].apm - 1800.0).abs() < 0.01);
    assert_eq!(summary.players[0].stocks[0].openings_allowed, 1);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["stage_name"], "Battlefield");
    assert_eq!(json["players"][1]["character_name"], "Marth");
    assert_eq!(json["players"][1]["combo_strings"][0]["hit_count"], 9);
    assert!(json["players"][0]["recoveries"].as_array().unwrap().is_empty());
}
