//! Property tests for term recency, attempt merging, and pair keys.

use proptest::prelude::*;

use coursemates::domain::foundation::{CourseId, ProgramYearId, UserId};
use coursemates::domain::term::TermId;
use coursemates::domain::user::{AttemptMerge, CourseHistoryEntry, UserPair};
use uuid::Uuid;

fn concrete_term() -> impl Strategy<Value = TermId> {
    (1000u16..=9998, prop::sample::select(vec![1u8, 5, 9]))
        .prop_map(|(year, month)| TermId::concrete(year, month).unwrap())
}

fn any_term() -> impl Strategy<Value = TermId> {
    prop_oneof![1 => Just(TermId::Shortlist), 9 => concrete_term()]
}

fn user_id() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|n| UserId::from_uuid(Uuid::from_u128(n)))
}

fn entry(term: TermId) -> CourseHistoryEntry {
    CourseHistoryEntry::new(
        UserId::new(),
        CourseId::new("cs135").unwrap(),
        term,
        Some(ProgramYearId::new("1A").unwrap()),
    )
}

/// Applies attempts in order and returns the stored term.
fn settle(terms: &[TermId]) -> TermId {
    let mut stored = entry(terms[0]);
    for term in &terms[1..] {
        stored.merge_attempt(*term, None);
    }
    stored.term_id()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    #[test]
    fn display_parses_back(term in any_term()) {
        prop_assert_eq!(term.to_string().parse::<TermId>().unwrap(), term);
    }

    #[test]
    fn string_order_matches_recency_for_concrete_terms(a in concrete_term(), b in concrete_term()) {
        prop_assert_eq!(a.to_string().cmp(&b.to_string()), a.cmp(&b));
    }

    #[test]
    fn shortlist_is_older_than_every_real_term(term in concrete_term()) {
        prop_assert!(term.is_more_recent_than(&TermId::Shortlist));
        prop_assert!(!TermId::Shortlist.is_more_recent_than(&term));
    }

    #[test]
    fn merge_keeps_the_latest_real_attempt(a in concrete_term(), b in concrete_term()) {
        let latest = a.max(b);
        prop_assert_eq!(settle(&[a, b]), latest);
        prop_assert_eq!(settle(&[b, a]), latest);
    }

    #[test]
    fn shortlist_never_displaces_a_real_attempt(term in concrete_term()) {
        prop_assert_eq!(settle(&[term, TermId::Shortlist]), term);
        prop_assert_eq!(settle(&[TermId::Shortlist, term]), term);
    }

    #[test]
    fn outcome_is_independent_of_order(terms in prop::collection::vec(any_term(), 1..8)) {
        let forward = settle(&terms);
        let mut reversed = terms.clone();
        reversed.reverse();
        prop_assert_eq!(forward, settle(&reversed));
    }

    #[test]
    fn merging_the_same_attempt_twice_changes_nothing(term in concrete_term()) {
        let mut stored = entry(term);
        prop_assert_eq!(stored.merge_attempt(term, None), AttemptMerge::Kept);
        prop_assert_eq!(stored.term_id(), term);
    }

    #[test]
    fn pair_key_ignores_argument_order(a in user_id(), b in user_id()) {
        let ab = UserPair::new(a, b);
        let ba = UserPair::new(b, a);
        prop_assert_eq!(ab, ba);
        prop_assert_eq!(ab.cache_key("mutual_courses"), ba.cache_key("mutual_courses"));
        prop_assert!(ab.first() <= ab.second());
    }
}
