//! Mutual courses between a pair of friends.

use std::collections::HashSet;
use std::fmt;

use crate::domain::foundation::{CourseId, UserId};

/// Default prefix of mutual-course cache keys.
pub const DEFAULT_KEY_PREFIX: &str = "mutual_courses";

/// Unordered pair of users, stored with the smaller id first so that
/// `(a, b)` and `(b, a)` are the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserPair {
    first: UserId,
    second: UserId,
}

impl UserPair {
    pub fn new(a: UserId, b: UserId) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> UserId {
        self.first
    }

    pub fn second(&self) -> UserId {
        self.second
    }

    /// Cache key for this pair under `prefix`: `{prefix}:{first}:{second}`.
    pub fn cache_key(&self, prefix: &str) -> String {
        format!("{}:{}:{}", prefix, self.first, self.second)
    }
}

impl fmt::Display for UserPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.first, self.second)
    }
}

/// Courses present in both sets.
pub fn mutual_course_ids(mine: &HashSet<CourseId>, theirs: &HashSet<CourseId>) -> HashSet<CourseId> {
    mine.intersection(theirs).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn courses(ids: &[&str]) -> HashSet<CourseId> {
        ids.iter().map(|id| CourseId::new(*id).unwrap()).collect()
    }

    #[test]
    fn pair_is_order_independent() {
        let a = UserId::new();
        let b = UserId::new();
        assert_eq!(UserPair::new(a, b), UserPair::new(b, a));
        assert_eq!(
            UserPair::new(a, b).cache_key(DEFAULT_KEY_PREFIX),
            UserPair::new(b, a).cache_key(DEFAULT_KEY_PREFIX)
        );
    }

    #[test]
    fn cache_key_puts_smaller_id_first() {
        let a = UserId::new();
        let b = UserId::new();
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        assert_eq!(
            UserPair::new(high, low).cache_key("mutual_courses"),
            format!("mutual_courses:{}:{}", low, high)
        );
    }

    #[test]
    fn intersection_keeps_shared_courses_only() {
        let mine = courses(&["x", "y", "z"]);
        let theirs = courses(&["y", "z", "w"]);
        assert_eq!(mutual_course_ids(&mine, &theirs), courses(&["y", "z"]));
        assert!(mutual_course_ids(&mine, &courses(&["q"])).is_empty());
    }
}
