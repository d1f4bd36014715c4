//! Integration tests for message decoding.
//!
//! These tests validate that Start, Update and End payloads built with the
//! crate's own writers decode into the expected match state, and that
//! malformed payloads are rejected without side effects.

use proptest::prelude::*;

use melee_stats::format::{MessageType, UPDATE_PLAYER_BLOCK_SIZE};
use melee_stats::records::{EndMessage, PlayerIdentity, StartMessage, UpdateMessage};
use melee_stats::{decode_end, decode_start, decode_update, ParserError, PlayerFrameData};

fn start_payload() -> Vec<u8> {
    StartMessage {
        stage: 31,
        players: vec![
            PlayerIdentity {
                controller_port: 0,
                character_id: 2,
                player_type: 0,
                character_color: 1,
            },
            PlayerIdentity {
                controller_port: 1,
                character_id: 9,
                player_type: 1,
                character_color: 3,
            },
        ],
    }
    .to_bytes()
}

fn frame_strategy() -> impl Strategy<Value = PlayerFrameData> {
    (
        any::<u8>(),
        any::<u16>(),
        prop::array::uniform9(-1000.0f32..1000.0),
        any::<u32>(),
        prop::array::uniform4(any::<u8>()),
        any::<u16>(),
        prop::array::uniform2(0.0f32..1.0),
    )
        .prop_map(|(character, animation, floats, buttons, bytes, physical, triggers)| {
            PlayerFrameData {
                internal_character_id: character,
                animation,
                location_x: floats[0],
                location_y: floats[1],
                joystick_x: floats[2],
                joystick_y: floats[3],
                cstick_x: floats[4],
                cstick_y: floats[5],
                trigger: floats[6],
                buttons,
                percent: floats[7],
                shield_size: floats[8],
                last_move_hit_id: bytes[0],
                combo_count: bytes[1],
                last_hit_by: bytes[2],
                stocks: bytes[3],
                physical_buttons: physical,
                l_trigger: triggers[0],
                r_trigger: triggers[1],
            }
        })
}

// ============================================================================
// Start Tests
// ============================================================================

#[test]
fn test_start_populates_identities() {
    let game = decode_start(&start_payload(), 2).unwrap();

    assert_eq!(game.stage_id(), 31);
    assert_eq!(game.frame_counter(), 0);
    assert_eq!(game.frames_missed(), 0);
    assert!(game.win_condition().is_none());

    let second = game.players()[1].identity();
    assert_eq!(second.controller_port, 1);
    assert_eq!(second.character_id, 9);
    assert_eq!(second.player_type, 1);
    assert_eq!(second.character_color, 3);
}

#[test]
fn test_start_is_idempotent() {
    let payload = start_payload();
    let first = decode_start(&payload, 2).unwrap();
    let second = decode_start(&payload, 2).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_start_truncated() {
    let payload = start_payload();
    for len in 1..payload.len() {
        assert!(
            matches!(
                decode_start(&payload[..len], 2),
                Err(ParserError::TruncatedMessage { .. })
            ),
            "length {}",
            len
        );
    }
}

// ============================================================================
// Update Tests
// ============================================================================

#[test]
fn test_update_snapshots_previous_frame() {
    let mut game = decode_start(&start_payload(), 2).unwrap();
    let first = PlayerFrameData {
        percent: 12.0,
        stocks: 4,
        ..PlayerFrameData::default()
    };
    let second = PlayerFrameData {
        percent: 30.0,
        stocks: 4,
        ..PlayerFrameData::default()
    };

    for (frame, data) in [(100, first), (101, second)] {
        let update = UpdateMessage {
            frame,
            random_seed: 0xDEAD_BEEF,
            players: vec![data, PlayerFrameData::default()],
        };
        decode_update(&update.to_bytes(), &mut game).unwrap();
    }

    let player = &game.players()[0];
    assert_eq!(player.previous().percent, 12.0);
    assert_eq!(player.current().percent, 30.0);
    assert_eq!(game.random_seed(), 0xDEAD_BEEF);
    assert_eq!(game.frame_counter(), 101);
    assert_eq!(game.frames_missed(), 0);
}

#[test]
fn test_update_payload_size() {
    let update = UpdateMessage {
        frame: 1,
        random_seed: 0,
        players: vec![PlayerFrameData::default(); 2],
    };
    let bytes = update.to_bytes();
    assert_eq!(bytes.len(), MessageType::Update.payload_size(2));
    assert_eq!(bytes.len(), 9 + 2 * UPDATE_PLAYER_BLOCK_SIZE);
    assert_eq!(bytes[0], MessageType::Update.code());
}

#[test]
fn test_missed_frame_accounting() {
    let mut game = decode_start(&start_payload(), 2).unwrap();
    let update = |frame| {
        UpdateMessage {
            frame,
            random_seed: 0,
            players: vec![PlayerFrameData::default(); 2],
        }
        .to_bytes()
    };

    for frame in [10, 11, 12] {
        decode_update(&update(frame), &mut game).unwrap();
    }
    assert_eq!(game.frames_missed(), 0);

    decode_update(&update(15), &mut game).unwrap();
    assert_eq!(game.frames_missed(), 2);
}

#[test]
fn test_raw_log_contains_every_payload() {
    let start = start_payload();
    let update = UpdateMessage {
        frame: 1,
        random_seed: 0,
        players: vec![PlayerFrameData::default(); 2],
    }
    .to_bytes();
    let end = EndMessage { win_condition: 3 }.to_bytes();

    let mut game = decode_start(&start, 2).unwrap();
    decode_update(&update, &mut game).unwrap();
    decode_end(&end, &mut game).unwrap();

    let payloads: Vec<&[u8]> = melee_stats::CaptureIterator::new(game.raw_log())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(payloads, vec![&start[..], &update[..], &end[..]]);
    assert_eq!(game.win_condition(), Some(3));
}

#[test]
fn test_end_without_condition_is_truncated() {
    let mut game = decode_start(&start_payload(), 2).unwrap();
    assert!(matches!(
        decode_end(&[0x39], &mut game),
        Err(ParserError::TruncatedMessage {
            expected: 2,
            available: 1
        })
    ));
    assert!(!game.is_finished());
}

proptest! {
    #[test]
    fn prop_update_round_trip(
        frame in any::<u32>(),
        seed in any::<u32>(),
        first in frame_strategy(),
        second in frame_strategy(),
    ) {
        let message = UpdateMessage { frame, random_seed: seed, players: vec![first, second] };
        let bytes = message.to_bytes();
        let parsed = UpdateMessage::parse(&bytes, 2).unwrap();
        prop_assert_eq!(&parsed, &message);
        prop_assert_eq!(parsed.to_bytes(), bytes);
    }
}
