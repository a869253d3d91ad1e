//! Progress Invariant Tests
//!
//! Tests for course progress invariants:
//! - percent is in [0, 100] and reaches 100 only when every lesson is complete
//! - repeated completions never change the completed set
//! - lessons unlock strictly in ordinal order

use chrono::{DateTime, Duration, TimeZone, Utc};
use curio::catalog::{Catalog, CatalogLoader};
use curio::engine::Engine;
use curio::ids::{CourseId, LessonId, UserId};
use curio::ledger::ProgressEvent;
use curio::progress::{completion_percent, LessonState};

// =============================================================================
// Helper Functions
// =============================================================================

fn catalog() -> Catalog {
    let mut loader = CatalogLoader::new();
    loader
        .load_str(
            r#"{
            "courses": [
                {"id": "web", "name": "Web Development Fundamentals", "lessons": [
                    {"id": "html", "title": "Introduction to HTML", "duration_minutes": 15},
                    {"id": "css", "title": "CSS Styling Basics", "duration_minutes": 20},
                    {"id": "js", "title": "JavaScript Essentials", "duration_minutes": 30},
                    {"id": "responsive", "title": "Responsive Design", "duration_minutes": 25}
                ]},
                {"id": "python", "name": "Python for Data Science", "lessons": [
                    {"id": "py-basics", "title": "Python Basics"},
                    {"id": "pandas", "title": "Pandas"},
                    {"id": "plots", "title": "Plotting"}
                ]}
            ]}"#,
        )
        .unwrap();
    loader.build().unwrap()
}

fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(minute)
}

fn complete(engine: &Engine, user: &str, lessons: &[&str]) {
    let user_id = UserId::from(user);
    let offset = engine.ledger().events_for(&user_id).len() as i64;
    for (i, lesson) in lessons.iter().enumerate() {
        engine
            .record_event(&user_id, ProgressEvent::lesson_completed(user, *lesson, at(offset + i as i64)))
            .unwrap();
    }
}

fn assert_sequential(engine: &Engine, user: &UserId, course: &CourseId) {
    let availability = engine.lesson_availability(user, course).unwrap();
    for (k, status) in availability.lessons.iter().enumerate() {
        if status.state != LessonState::Locked {
            for earlier in &availability.lessons[..k] {
                assert_eq!(
                    earlier.state,
                    LessonState::Completed,
                    "{} is {:?} but {} is not completed",
                    status.lesson_id,
                    status.state,
                    earlier.lesson_id
                );
            }
        }
    }
}

// =============================================================================
// Percent Tests
// =============================================================================

/// Four lessons with the first three completed is 75%, lesson four unlocked.
#[test]
fn test_three_of_four_lessons() {
    let engine = Engine::with_catalog(catalog());
    let alice = UserId::from("alice");
    let web = CourseId::from("web");
    complete(&engine, "alice", &["html", "css", "js"]);

    let progress = engine.course_progress(&alice, &web).unwrap();
    assert_eq!(progress.percent, 75);
    assert_eq!(progress.completed_count(), 3);
    assert!(!progress.is_complete());

    let availability = engine.lesson_availability(&alice, &web).unwrap();
    assert_eq!(availability.state_of(&LessonId::from("html")), Some(LessonState::Completed));
    assert_eq!(availability.state_of(&LessonId::from("css")), Some(LessonState::Completed));
    assert_eq!(availability.state_of(&LessonId::from("js")), Some(LessonState::Completed));
    assert_eq!(availability.state_of(&LessonId::from("responsive")), Some(LessonState::Unlocked));
    assert_eq!(availability.next_lesson(), Some(&LessonId::from("responsive")));
}

/// 100% only once the last lesson is complete.
#[test]
fn test_percent_reaches_100_only_when_complete() {
    let engine = Engine::with_catalog(catalog());
    let alice = UserId::from("alice");
    let python = CourseId::from("python");

    let mut seen = Vec::new();
    for lesson in ["py-basics", "pandas", "plots"] {
        complete(&engine, "alice", &[lesson]);
        seen.push(engine.course_progress(&alice, &python).unwrap().percent);
    }

    assert_eq!(seen, vec![33, 67, 100]);
    assert!(engine.course_progress(&alice, &python).unwrap().is_complete());
    assert_eq!(engine.lesson_availability(&alice, &python).unwrap().next_lesson(), None);
}

/// Rounding never reports a course complete early.
#[test]
fn test_percent_bounds() {
    for total in 1..=300u32 {
        for completed in 0..=total {
            let percent = completion_percent(completed, total);
            assert!(percent <= 100);
            assert_eq!(percent == 100, completed == total, "{}/{}", completed, total);
        }
    }
}

/// A user with no events sees 0% and only the first lesson unlocked.
#[test]
fn test_empty_ledger() {
    let engine = Engine::with_catalog(catalog());
    let nobody = UserId::from("nobody");
    let web = CourseId::from("web");

    assert_eq!(engine.course_progress(&nobody, &web).unwrap().percent, 0);
    let availability = engine.lesson_availability(&nobody, &web).unwrap();
    let states: Vec<LessonState> = availability.lessons.iter().map(|s| s.state).collect();
    assert_eq!(
        states,
        vec![LessonState::Unlocked, LessonState::Locked, LessonState::Locked, LessonState::Locked]
    );
}

// =============================================================================
// Idempotence Tests
// =============================================================================

/// Completing the same lesson twice does not change cardinality.
#[test]
fn test_repeated_completion_idempotent() {
    let engine = Engine::with_catalog(catalog());
    let alice = UserId::from("alice");
    let web = CourseId::from("web");

    complete(&engine, "alice", &["html"]);
    let once = engine.course_progress(&alice, &web).unwrap();

    complete(&engine, "alice", &["html", "html"]);
    let thrice = engine.course_progress(&alice, &web).unwrap();

    assert_eq!(once, thrice);
    assert_eq!(engine.ledger().events_for(&alice).len(), 3);
}

// =============================================================================
// Sequential Lock Tests
// =============================================================================

/// The sequential lock invariant holds after every accepted event.
#[test]
fn test_sequential_lock_invariant() {
    let engine = Engine::with_catalog(catalog());
    let alice = UserId::from("alice");
    let attempts = ["js", "html", "responsive", "css", "html", "responsive", "js", "responsive"];

    for (i, lesson) in attempts.iter().enumerate() {
        // Out-of-order attempts are rejected, the invariant must hold either way
        let _ = engine.record_event(&alice, ProgressEvent::lesson_completed("alice", *lesson, at(i as i64)));
        assert_sequential(&engine, &alice, &CourseId::from("web"));
        assert_sequential(&engine, &alice, &CourseId::from("python"));
    }

    assert!(engine.course_progress(&alice, &CourseId::from("web")).unwrap().is_complete());
}

/// Courses are independent: progress in one never unlocks another.
#[test]
fn test_courses_independent() {
    let engine = Engine::with_catalog(catalog());
    let alice = UserId::from("alice");
    complete(&engine, "alice", &["html", "css", "js", "responsive"]);

    let python = engine.lesson_availability(&alice, &CourseId::from("python")).unwrap();
    assert_eq!(python.state_of(&LessonId::from("py-basics")), Some(LessonState::Unlocked));
    assert_eq!(python.state_of(&LessonId::from("pandas")), Some(LessonState::Locked));
}

/// Unknown course is a not-found error, not an empty result.
#[test]
fn test_unknown_course() {
    let engine = Engine::with_catalog(catalog());
    let err = engine
        .course_progress(&UserId::from("alice"), &CourseId::from("rust"))
        .unwrap_err();
    assert_eq!(err.code(), "CURIO_UNKNOWN_COURSE");
    assert!(!err.is_fatal());
}
