//! Catalog integrity validation
//!
//! Runs once, when the catalog is built. Everything checked here is a
//! configuration failure (FATAL): the catalog is never partially accepted.
//!
//! Checks:
//! - identifiers and names are not blank
//! - lesson ordinals within a course are exactly `0..n`
//! - counting thresholds are at least 1
//! - rule references (courses, prerequisite achievements) resolve
//! - prerequisite references between meta achievements are acyclic
//! - `achievements_unlocked` thresholds are reachable
//!
//! The output is the [`EvaluationPlan`]: plain achievements first, then meta
//! achievements in dependency order. Evaluation walks this plan exactly once
//! per event and never iterates to a fixpoint.

use std::collections::{BTreeMap, BTreeSet};

use crate::ids::{AchievementId, CourseId, LessonId};

use super::errors::{CatalogError, CatalogResult};
use super::types::{Achievement, Course, Lesson, UnlockRule};

/// Fixed two-pass achievement evaluation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationPlan {
    /// Achievements with plain rules, in id order
    pub plain: Vec<AchievementId>,
    /// Meta achievements, each after all of its meta prerequisites
    pub meta: Vec<AchievementId>,
}

impl EvaluationPlan {
    /// Iterates plain achievements first, then meta achievements.
    pub fn iter(&self) -> impl Iterator<Item = &AchievementId> {
        self.plain.iter().chain(self.meta.iter())
    }

    /// Total number of planned achievements
    pub fn len(&self) -> usize {
        self.plain.len() + self.meta.len()
    }

    /// Returns true if nothing is planned
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validates a resolved catalog and derives its evaluation plan.
pub fn validate_catalog(
    courses: &BTreeMap<CourseId, Course>,
    lessons: &BTreeMap<LessonId, Lesson>,
    achievements: &BTreeMap<AchievementId, Achievement>,
) -> CatalogResult<EvaluationPlan> {
    for course in courses.values() {
        validate_course(course, lessons)?;
    }
    for achievement in achievements.values() {
        validate_achievement(achievement, courses, achievements)?;
    }
    plan_evaluation(achievements)
}

fn validate_course(course: &Course, lessons: &BTreeMap<LessonId, Lesson>) -> CatalogResult<()> {
    if course.id.is_blank() {
        return Err(CatalogError::invalid(&course.id, "Course id must not be blank"));
    }
    if course.name.trim().is_empty() {
        return Err(CatalogError::invalid(&course.id, "Course name must not be blank"));
    }

    for (position, lesson_id) in course.lessons.iter().enumerate() {
        if lesson_id.is_blank() {
            return Err(CatalogError::invalid(
                &course.id,
                "Lesson id must not be blank",
            ));
        }
        let lesson = lessons
            .get(lesson_id)
            .ok_or_else(|| CatalogError::unknown_lesson(lesson_id))?;

        if lesson.course_id != course.id {
            return Err(CatalogError::invalid(
                lesson_id,
                format!(
                    "Lesson '{}' belongs to course '{}', not '{}'",
                    lesson_id, lesson.course_id, course.id
                ),
            ));
        }

        // Lessons are sorted by ordinal before validation, so any duplicate or
        // gap shows up as a position mismatch.
        if lesson.ordinal as usize != position {
            return Err(CatalogError::invalid(
                lesson_id,
                format!(
                    "Lesson ordinals in course '{}' must be 0..{} without gaps or duplicates (found {} at position {})",
                    course.id,
                    course.lessons.len(),
                    lesson.ordinal,
                    position
                ),
            ));
        }
    }

    Ok(())
}

fn validate_achievement(
    achievement: &Achievement,
    courses: &BTreeMap<CourseId, Course>,
    achievements: &BTreeMap<AchievementId, Achievement>,
) -> CatalogResult<()> {
    let id = &achievement.id;
    if id.is_blank() {
        return Err(CatalogError::invalid(id, "Achievement id must not be blank"));
    }
    if achievement.title.trim().is_empty() {
        return Err(CatalogError::invalid(id, "Achievement title must not be blank"));
    }

    if let Some(threshold) = achievement.rule.threshold() {
        if threshold == 0 {
            return Err(CatalogError::invalid(
                id,
                format!("Achievement '{}' threshold must be at least 1", id),
            ));
        }
    }

    match &achievement.rule {
        UnlockRule::CourseCompleted { course } => match courses.get(course) {
            None => {
                return Err(CatalogError::invalid(
                    id,
                    format!("Achievement '{}' references unknown course '{}'", id, course),
                ));
            }
            Some(target) if target.lessons.is_empty() => {
                return Err(CatalogError::invalid(
                    id,
                    format!("Achievement '{}' targets course '{}' which has no lessons", id, course),
                ));
            }
            Some(_) => {}
        },
        UnlockRule::Requires { achievements: required } => {
            if required.is_empty() {
                return Err(CatalogError::invalid(
                    id,
                    format!("Achievement '{}' requires an empty set of achievements", id),
                ));
            }
            for prerequisite in required {
                if !achievements.contains_key(prerequisite) {
                    return Err(CatalogError::invalid(
                        id,
                        format!(
                            "Achievement '{}' requires unknown achievement '{}'",
                            id, prerequisite
                        ),
                    ));
                }
            }
        }
        _ => {}
    }

    Ok(())
}

/// Splits achievements into the two evaluation passes.
///
/// Meta achievements are topologically sorted over what they wait on:
/// - a `requires` rule waits on its meta prerequisites (plain prerequisites
///   are always settled by the first pass)
/// - counters wait on each other in ascending threshold order
/// - a counter waits on every `requires` rule that does not wait on it
///
/// Ties are broken by id so the plan is deterministic. A cycle is a
/// configuration error, and so is a counter threshold that the achievements
/// able to count toward it can never reach.
pub fn plan_evaluation(
    achievements: &BTreeMap<AchievementId, Achievement>,
) -> CatalogResult<EvaluationPlan> {
    let mut plan = EvaluationPlan::default();

    // achievement -> what it waits on
    let mut waits_on: BTreeMap<&AchievementId, BTreeSet<&AchievementId>> = BTreeMap::new();
    let mut counters: Vec<(u32, &AchievementId)> = Vec::new();
    let mut requires: Vec<&AchievementId> = Vec::new();

    for achievement in achievements.values() {
        match &achievement.rule {
            UnlockRule::Requires { achievements: required } => {
                let meta_prerequisites = required
                    .iter()
                    .filter(|p| achievements.get(*p).is_some_and(|a| a.rule.is_meta()))
                    .collect();
                waits_on.insert(&achievement.id, meta_prerequisites);
                requires.push(&achievement.id);
            }
            UnlockRule::AchievementsUnlocked { at_least } => {
                waits_on.insert(&achievement.id, BTreeSet::new());
                counters.push((*at_least, &achievement.id));
            }
            _ => plan.plain.push(achievement.id.clone()),
        }
    }

    counters.sort();
    let explicit = waits_on.clone();
    for (position, (_, counter)) in counters.iter().enumerate() {
        if let Some(edges) = waits_on.get_mut(counter) {
            if position > 0 {
                edges.insert(counters[position - 1].1);
            }
            for rule in &requires {
                if !reaches(&explicit, rule, counter) {
                    edges.insert(*rule);
                }
            }
        }
    }

    // what it waits on -> dependents, and outstanding counts
    let mut dependents: BTreeMap<&AchievementId, Vec<&AchievementId>> = BTreeMap::new();
    let mut pending: BTreeMap<&AchievementId, usize> = BTreeMap::new();
    for (id, edges) in &waits_on {
        pending.insert(*id, edges.len());
        for prerequisite in edges {
            dependents.entry(*prerequisite).or_default().push(*id);
        }
    }

    let mut ready: BTreeSet<&AchievementId> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(id, _)| *id)
        .collect();

    while let Some(id) = ready.pop_first() {
        pending.remove(id);
        plan.meta.push(id.clone());

        if let Some(children) = dependents.get(id) {
            for child in children {
                if let Some(count) = pending.get_mut(child) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(*child);
                    }
                }
            }
        }
    }

    if !pending.is_empty() {
        let remaining: BTreeSet<&AchievementId> = pending.keys().copied().collect();
        return Err(CatalogError::rule_cycle(&find_cycle(&remaining, &waits_on)));
    }

    for (at_least, counter) in &counters {
        let waiting = waits_on
            .keys()
            .copied()
            .filter(|id| *id != *counter && reaches(&waits_on, id, counter))
            .count();
        let countable = achievements.len().saturating_sub(1 + waiting);
        if *at_least as usize > countable {
            return Err(CatalogError::invalid(
                *counter,
                format!(
                    "Achievement '{}' needs {} unlocked achievements but at most {} can count toward it",
                    counter, at_least, countable
                ),
            ));
        }
    }

    Ok(plan)
}

/// Returns true if `from` transitively waits on `target`.
fn reaches(
    waits_on: &BTreeMap<&AchievementId, BTreeSet<&AchievementId>>,
    from: &AchievementId,
    target: &AchievementId,
) -> bool {
    let mut seen: BTreeSet<&AchievementId> = BTreeSet::new();
    let mut stack: Vec<&AchievementId> = waits_on
        .get(from)
        .map(|edges| edges.iter().copied().collect())
        .unwrap_or_default();

    while let Some(id) = stack.pop() {
        if id == target {
            return true;
        }
        if seen.insert(id) {
            if let Some(edges) = waits_on.get(id) {
                stack.extend(edges.iter().copied());
            }
        }
    }
    false
}

/// Walks wait edges inside the unresolved set until an id repeats.
///
/// Every unresolved node still waits on another unresolved node, so the walk
/// cannot dead-end.
fn find_cycle(
    remaining: &BTreeSet<&AchievementId>,
    waits_on: &BTreeMap<&AchievementId, BTreeSet<&AchievementId>>,
) -> Vec<String> {
    let mut path: Vec<&AchievementId> = Vec::new();
    let mut current = match remaining.first() {
        Some(id) => *id,
        None => return Vec::new(),
    };

    loop {
        if let Some(start) = path.iter().position(|id| *id == current) {
            let mut cycle: Vec<String> = path[start..].iter().map(|id| id.to_string()).collect();
            cycle.push(current.to_string());
            return cycle;
        }
        path.push(current);

        let next = waits_on
            .get(current)
            .and_then(|edges| edges.iter().find(|p| remaining.contains(*p)));
        match next {
            Some(next) => current = *next,
            None => return path.iter().map(|id| id.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::Rarity;

    fn achievement(id: &str, rule: UnlockRule) -> Achievement {
        Achievement {
            id: AchievementId::from(id),
            title: id.to_string(),
            description: None,
            rarity: Rarity::Common,
            points: 10,
            rule,
        }
    }

    fn requires(ids: &[&str]) -> UnlockRule {
        UnlockRule::Requires {
            achievements: ids.iter().map(|s| AchievementId::from(*s)).collect(),
        }
    }

    fn map(list: Vec<Achievement>) -> BTreeMap<AchievementId, Achievement> {
        list.into_iter().map(|a| (a.id.clone(), a)).collect()
    }

    #[test]
    fn test_plain_before_meta() {
        let achievements = map(vec![
            achievement("z-collector", UnlockRule::AchievementsUnlocked { at_least: 2 }),
            achievement("a-first", UnlockRule::LessonsCompleted { at_least: 1 }),
            achievement("b-streak", UnlockRule::StreakDays { at_least: 3 }),
        ]);
        let plan = plan_evaluation(&achievements).unwrap();
        assert_eq!(plan.plain, vec![AchievementId::from("a-first"), AchievementId::from("b-streak")]);
        assert_eq!(plan.meta, vec![AchievementId::from("z-collector")]);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn test_meta_dependency_order() {
        // "a-top" needs "m-mid", which needs the plain "p"
        let achievements = map(vec![
            achievement("a-top", requires(&["m-mid"])),
            achievement("m-mid", requires(&["p"])),
            achievement("p", UnlockRule::LessonsCompleted { at_least: 1 }),
        ]);
        let plan = plan_evaluation(&achievements).unwrap();
        assert_eq!(plan.meta, vec![AchievementId::from("m-mid"), AchievementId::from("a-top")]);
    }

    #[test]
    fn test_mutual_recursion_is_configuration_error() {
        let achievements = map(vec![
            achievement("a", requires(&["b"])),
            achievement("b", requires(&["a"])),
        ]);
        let err = plan_evaluation(&achievements).unwrap_err();
        assert_eq!(err.code().code(), "CURIO_RULE_CYCLE");
        assert!(err.is_fatal());
        assert_eq!(err.details(), Some("cycle: a -> b -> a"));
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let achievements = map(vec![achievement("selfish", requires(&["selfish"]))]);
        let err = plan_evaluation(&achievements).unwrap_err();
        assert_eq!(err.details(), Some("cycle: selfish -> selfish"));
    }

    #[test]
    fn test_counter_waits_on_independent_requires() {
        // "combo" can unlock before "a-count" and counts toward it; "top"
        // needs "a-count" and therefore comes after it
        let achievements = map(vec![
            achievement("a-count", UnlockRule::AchievementsUnlocked { at_least: 3 }),
            achievement("combo", requires(&["one", "web"])),
            achievement("one", UnlockRule::LessonsCompleted { at_least: 1 }),
            achievement("top", requires(&["a-count"])),
            achievement("web", UnlockRule::LessonsCompleted { at_least: 2 }),
        ]);
        let plan = plan_evaluation(&achievements).unwrap();
        assert_eq!(
            plan.meta,
            vec![
                AchievementId::from("combo"),
                AchievementId::from("a-count"),
                AchievementId::from("top"),
            ]
        );
    }

    #[test]
    fn test_counters_ordered_by_threshold() {
        let achievements = map(vec![
            achievement("a-big", UnlockRule::AchievementsUnlocked { at_least: 3 }),
            achievement("b-small", UnlockRule::AchievementsUnlocked { at_least: 1 }),
            achievement("p", UnlockRule::LessonsCompleted { at_least: 1 }),
            achievement("q", UnlockRule::LessonsCompleted { at_least: 2 }),
        ]);
        let plan = plan_evaluation(&achievements).unwrap();
        assert_eq!(plan.meta, vec![AchievementId::from("b-small"), AchievementId::from("a-big")]);
    }

    #[test]
    fn test_unreachable_counter_threshold_rejected() {
        // Five achievements: the counter itself and "top", which waits on it,
        // can never count, so at most three can
        let achievements = map(vec![
            achievement("collector", UnlockRule::AchievementsUnlocked { at_least: 4 }),
            achievement("p", UnlockRule::LessonsCompleted { at_least: 1 }),
            achievement("q", UnlockRule::LessonsCompleted { at_least: 2 }),
            achievement("r", UnlockRule::StreakDays { at_least: 2 }),
            achievement("top", requires(&["collector"])),
        ]);
        let err = plan_evaluation(&achievements).unwrap_err();
        assert_eq!(err.code().code(), "CURIO_CATALOG_INVALID");
        assert!(err.is_fatal());
        assert_eq!(err.subject(), Some("collector"));

        let mut achievements = achievements;
        achievements.insert(
            AchievementId::from("collector"),
            achievement("collector", UnlockRule::AchievementsUnlocked { at_least: 3 }),
        );
        assert!(plan_evaluation(&achievements).is_ok());
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let achievements = map(vec![achievement(
            "none",
            UnlockRule::LessonsCompleted { at_least: 0 },
        )]);
        let err = validate_catalog(&BTreeMap::new(), &BTreeMap::new(), &achievements).unwrap_err();
        assert_eq!(err.code().code(), "CURIO_CATALOG_INVALID");
    }

    #[test]
    fn test_unknown_references_rejected() {
        let achievements = map(vec![achievement(
            "grad",
            UnlockRule::CourseCompleted { course: CourseId::from("ghost") },
        )]);
        assert!(validate_catalog(&BTreeMap::new(), &BTreeMap::new(), &achievements).is_err());

        let achievements = map(vec![achievement("needs", requires(&["ghost"]))]);
        assert!(validate_catalog(&BTreeMap::new(), &BTreeMap::new(), &achievements).is_err());
    }

    #[test]
    fn test_ordinal_gap_rejected() {
        let course_id = CourseId::from("web");
        let lesson = |id: &str, ordinal: u32| Lesson {
            id: LessonId::from(id),
            course_id: course_id.clone(),
            ordinal,
            title: id.into(),
            duration_minutes: 5,
        };
        let lessons: BTreeMap<_, _> = [lesson("a", 0), lesson("b", 2)]
            .into_iter()
            .map(|l| (l.id.clone(), l))
            .collect();
        let courses: BTreeMap<_, _> = [(
            course_id.clone(),
            Course {
                id: course_id.clone(),
                name: "Web".into(),
                lessons: vec![LessonId::from("a"), LessonId::from("b")],
                metadata: Default::default(),
            },
        )]
        .into_iter()
        .collect();

        let err = validate_catalog(&courses, &lessons, &BTreeMap::new()).unwrap_err();
        assert_eq!(err.subject(), Some("b"));
    }
}
