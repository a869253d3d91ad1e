//! Opaque string identifiers
//!
//! Courses, lessons, achievements and users are all addressed by string
//! identifiers taken verbatim from configuration or from the caller. Each gets
//! its own newtype so a lesson id can never be passed where a course id is
//! expected.
//!
//! All identifiers order lexicographically. Derived views iterate in that
//! order, which keeps snapshot output deterministic.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string-like value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the identifier is empty or only whitespace.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a published course
    CourseId
);

string_id!(
    /// Identifier of a lesson, unique across the whole catalog
    LessonId
);

string_id!(
    /// Identifier of an achievement
    AchievementId
);

string_id!(
    /// Identifier of a learner
    UserId
);
