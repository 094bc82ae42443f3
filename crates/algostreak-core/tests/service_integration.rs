//! Integration tests for the streak service over real storage.

use algostreak_core::storage::streak_key;
use algostreak_core::{
    ActivityKind, CoreError, Database, MemoryStore, StreakEvent, StreakService, StreakStore,
};
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use std::thread;

fn day(n: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).unwrap() + Duration::days(n)
}

#[test]
fn test_streak_survives_reopening_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("algostreak.db");

    {
        let service = StreakService::new(Database::open_at(&path).unwrap());
        for n in 0..3 {
            service.record_activity("ada", day(n)).unwrap();
        }
    }

    let service = StreakService::new(Database::open_at(&path).unwrap());
    let out = service.record_activity("ada", day(3)).unwrap();
    assert_eq!(out.record.current_streak, 4);
    assert_eq!(out.kind, ActivityKind::Extended);

    let history = service.history("ada", 10).unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].date, day(3));
    assert_eq!(history[3].kind, ActivityKind::Started);
}

#[test]
fn test_full_week_then_break_then_claim() {
    let service = StreakService::new(Database::open_memory().unwrap());

    let mut events = Vec::new();
    for n in 0..7 {
        events.extend(service.record_activity("ada", day(n)).unwrap().events);
    }
    assert_eq!(events, vec![StreakEvent::MilestoneReached { streak: 7 }]);

    let claimed = service.claim_reward("ada").unwrap();
    assert!(claimed.reward_claimed);

    let out = service.record_activity("ada", day(10)).unwrap();
    assert_eq!(out.events, vec![StreakEvent::StreakReset { previous: 7 }]);
    assert_eq!(out.record.longest_streak, 7);
    // claim survives a reset until the next milestone
    assert!(out.record.reward_claimed);

    let status = service.status("ada").unwrap().unwrap();
    assert_eq!(status.current_streak, 1);
    assert_eq!(status.days_until_reward, 6);
    assert!(!status.reward_available);
}

#[test]
fn test_malformed_stored_record_is_repaired() {
    let db = Database::open_memory().unwrap();
    db.kv_set(
        &streak_key("ada"),
        r#"{"currentStreak":2,"longestStreak":9,"lastActivityDate":"2024-04-01","weeklyProgress":[1,1,1,1,1,1,1,1,1,1]}"#,
    )
    .unwrap();
    let service = StreakService::new(db);

    let out = service.record_activity("ada", day(1)).unwrap();
    assert_eq!(out.record.current_streak, 3);
    assert_eq!(out.record.longest_streak, 9);
    assert_eq!(out.record.weekly_progress.flags(), [true; 7]);

    let stored = service.store().kv_get(&streak_key("ada")).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(json["weeklyProgress"].as_array().unwrap().len(), 7);
}

#[test]
fn test_unusable_record_restarts_streak() {
    let db = Database::open_memory().unwrap();
    db.kv_set(&streak_key("ada"), r#"{"currentStreak":12}"#).unwrap();
    let service = StreakService::new(db);

    let out = service.record_activity("ada", day(0)).unwrap();
    assert_eq!(out.kind, ActivityKind::Started);
    assert_eq!(out.record.current_streak, 1);
    assert!(out.events.is_empty());
}

#[test]
fn test_concurrent_activity_for_one_user_is_serialized() {
    let service = Arc::new(StreakService::new(Database::open_memory().unwrap()));
    service.record_activity("ada", day(0)).unwrap();

    // every thread records the same next day; exactly one of them extends
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || service.record_activity("ada", day(1)).unwrap().kind)
        })
        .collect();
    let kinds: Vec<ActivityKind> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(
        kinds.iter().filter(|k| **k == ActivityKind::Extended).count(),
        1
    );
    assert_eq!(
        kinds.iter().filter(|k| **k == ActivityKind::Held).count(),
        7
    );
    let record = service.store().get("ada").unwrap().unwrap();
    assert_eq!(record.current_streak, 2);
    assert_eq!(record.weekly_progress.active_days(), 2);
}

#[test]
fn test_users_are_independent() {
    let service = StreakService::new(MemoryStore::new());
    for n in 0..3 {
        service.record_activity("ada", day(n)).unwrap();
    }
    service.record_activity("bob", day(2)).unwrap();

    assert_eq!(service.status("ada").unwrap().unwrap().current_streak, 3);
    assert_eq!(service.status("bob").unwrap().unwrap().current_streak, 1);
    assert!(matches!(
        service.claim_reward("carol"),
        Err(CoreError::NoRecord { .. })
    ));
}
