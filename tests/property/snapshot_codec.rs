//! Property-based tests for the board snapshot codec.
//!
//! Uses proptest to verify:
//! 1. Random bytes never cause a panic in `decode_snapshot`.
//! 2. Any snapshot survives encode → decode unchanged.
//! 3. Any version byte other than the current one is rejected.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, NaiveDate, Utc};
use proptest::prelude::*;
use taskboard_proto::codec::{
    BoardSnapshot, CodecError, SNAPSHOT_VERSION, SnapshotRow, decode_snapshot, encode_snapshot,
};
use taskboard_proto::{OwnerId, Task, TaskId, TaskPriority, TaskStatus};
use uuid::Uuid;

// --- Strategies ---

fn arb_owner() -> impl Strategy<Value = OwnerId> {
    "[a-zA-Z0-9@._-]{1,32}".prop_map(|name| OwnerId::new(name).unwrap())
}

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop::sample::select(TaskStatus::ALL.to_vec())
}

fn arb_priority() -> impl Strategy<Value = TaskPriority> {
    prop_oneof![
        Just(TaskPriority::Low),
        Just(TaskPriority::Medium),
        Just(TaskPriority::High),
    ]
}

fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_000_000_000, 0u32..1_000_000_000)
        .prop_map(|(secs, nanos)| DateTime::from_timestamp(secs, nanos).unwrap())
}

fn arb_due_date() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of((1970i32..2200, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }))
}

fn arb_task(owner: OwnerId) -> impl Strategy<Value = Task> {
    (
        any::<u128>(),
        "[^\x00]{1,140}",
        prop::option::of("[^\x00]{1,200}"),
        arb_status(),
        arb_priority(),
        0u32..1000,
        arb_due_date(),
        arb_timestamp(),
        arb_timestamp(),
    )
        .prop_map(
            move |(id, title, description, status, priority, position, due_date, created, updated)| Task {
                id: TaskId::from_uuid(Uuid::from_u128(id)),
                owner: owner.clone(),
                title,
                description,
                status,
                priority,
                position,
                due_date,
                created_at: created,
                updated_at: updated,
            },
        )
}

fn arb_snapshot() -> impl Strategy<Value = BoardSnapshot> {
    arb_owner().prop_flat_map(|owner| {
        (
            Just(owner.clone()),
            any::<u64>(),
            prop::collection::vec((any::<u64>(), arb_task(owner)), 0..8),
        )
            .prop_map(|(owner, next_seq, rows)| BoardSnapshot {
                owner,
                next_seq,
                rows: rows
                    .into_iter()
                    .map(|(seq, task)| SnapshotRow { seq, task })
                    .collect(),
            })
    })
}

// --- Property tests ---

proptest! {
    /// Any snapshot survives an encode → decode round trip.
    #[test]
    fn snapshot_roundtrip(snapshot in arb_snapshot()) {
        let bytes = encode_snapshot(&snapshot).unwrap();
        prop_assert_eq!(bytes[0], SNAPSHOT_VERSION);
        let decoded = decode_snapshot(&bytes).unwrap();
        prop_assert_eq!(decoded, snapshot);
    }

    /// Random bytes must never cause a panic in decode.
    #[test]
    fn random_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..1024)) {
        let _ = decode_snapshot(&data);
    }

    /// Payloads behind a foreign version byte are refused before parsing.
    #[test]
    fn unknown_version_is_rejected(
        version in any::<u8>().prop_filter("not current", |v| *v != SNAPSHOT_VERSION),
        payload in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut bytes = vec![version];
        bytes.extend(payload);
        let result = decode_snapshot(&bytes);
        prop_assert!(matches!(result, Err(CodecError::UnsupportedVersion(Some(v))) if v == version));
    }
}
