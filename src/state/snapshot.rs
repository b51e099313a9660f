//! Immutable-by-default view of every league relation at a point in time.
//!
//! A [`Snapshot`] is only written by the loader (which builds a fresh one) and by the score
//! mutator (which patches scores after a successful save). Aggregations borrow it read-only.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::state::league::{
    Contestant, ContestantId, FamilyMember, MemberId, ScoreEntry, WeekNumber, WeeklyScore,
};

/// Lowest value `current_week` can take, even without any score row.
pub const FIRST_WEEK: WeekNumber = 1;

/// Immutable view of the whole league, indexed for the standings queries.
///
/// Published behind an [`Arc`](std::sync::Arc); the score mutator patches a private copy.
#[derive(Debug, Clone)]
pub struct Snapshot {
    members: Vec<FamilyMember>,
    contestants: Vec<Contestant>,
    weekly_scores: Vec<WeeklyScore>,
    draft_picks: IndexMap<MemberId, Vec<ContestantId>>,
    current_week: WeekNumber,
    contestant_index: HashMap<ContestantId, usize>,
    /// week -> contestant -> position in `weekly_scores`.
    score_index: HashMap<WeekNumber, HashMap<ContestantId, usize>>,
}

impl Snapshot {
    /// Build a snapshot, folding pick edges into per-member lists in edge order.
    pub fn new(
        members: Vec<FamilyMember>,
        contestants: Vec<Contestant>,
        weekly_scores: Vec<WeeklyScore>,
        picks: impl IntoIterator<Item = (MemberId, ContestantId)>,
    ) -> Self {
        let mut draft_picks: IndexMap<MemberId, Vec<ContestantId>> = IndexMap::new();
        for (member_id, contestant_id) in picks {
            draft_picks.entry(member_id).or_default().push(contestant_id);
        }

        let mut contestant_index = HashMap::with_capacity(contestants.len());
        for (position, contestant) in contestants.iter().enumerate() {
            contestant_index
                .entry(contestant.id.clone())
                .or_insert(position);
        }

        let mut score_index: HashMap<WeekNumber, HashMap<ContestantId, usize>> = HashMap::new();
        for (position, score) in weekly_scores.iter().enumerate() {
            score_index
                .entry(score.week_number)
                .or_default()
                .entry(score.contestant_id.clone())
                .or_insert(position);
        }

        let current_week = weekly_scores
            .iter()
            .map(|score| score.week_number)
            .fold(FIRST_WEEK, WeekNumber::max);

        Self {
            members,
            contestants,
            weekly_scores,
            draft_picks,
            current_week,
            contestant_index,
            score_index,
        }
    }

    /// Members in gateway order (by name).
    pub fn members(&self) -> &[FamilyMember] {
        &self.members
    }

    /// Contestants in gateway order (by name).
    pub fn contestants(&self) -> &[Contestant] {
        &self.contestants
    }

    /// Every score row, in load order followed by rows appended by the mutator.
    pub fn weekly_scores(&self) -> &[WeeklyScore] {
        &self.weekly_scores
    }

    /// Latest week with scores, never below [`FIRST_WEEK`].
    pub fn current_week(&self) -> WeekNumber {
        self.current_week
    }

    /// Picks of `member_id` in pick order; empty when the member has none.
    pub fn picks_for(&self, member_id: &MemberId) -> &[ContestantId] {
        self.draft_picks
            .get(member_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Resolve a contestant id, `None` when the id no longer matches a record.
    pub fn contestant(&self, id: &ContestantId) -> Option<&Contestant> {
        self.contestant_index
            .get(id)
            .and_then(|&position| self.contestants.get(position))
    }

    /// Points stored for `(week_number, contestant_id)`, if a row exists.
    pub fn points_for(&self, week_number: WeekNumber, contestant_id: &ContestantId) -> Option<i32> {
        self.score_index
            .get(&week_number)
            .and_then(|week| week.get(contestant_id))
            .and_then(|&position| self.weekly_scores.get(position))
            .map(|score| score.points)
    }

    /// Rows belonging to `week_number`.
    pub fn scores_in_week(&self, week_number: WeekNumber) -> impl Iterator<Item = &WeeklyScore> {
        self.weekly_scores
            .iter()
            .filter(move |score| score.week_number == week_number)
    }

    /// Patch scores after a successful upsert: replace matching rows, append the others, and
    /// move `current_week` forward to `week_number` if needed. Returns the new `current_week`.
    pub fn apply_scores(&mut self, week_number: WeekNumber, entries: &[ScoreEntry]) -> WeekNumber {
        let week = self.score_index.entry(week_number).or_default();
        for entry in entries {
            let existing = week
                .get(&entry.contestant_id)
                .and_then(|&position| self.weekly_scores.get_mut(position));
            match existing {
                Some(score) => score.points = entry.points,
                None => {
                    week.insert(entry.contestant_id.clone(), self.weekly_scores.len());
                    self.weekly_scores.push(WeeklyScore {
                        week_number,
                        contestant_id: entry.contestant_id.clone(),
                        points: entry.points,
                    });
                }
            }
        }

        self.current_week = self.current_week.max(week_number);
        self.current_week
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(week_number: WeekNumber, contestant_id: &str, points: i32) -> WeeklyScore {
        WeeklyScore {
            week_number,
            contestant_id: contestant_id.into(),
            points,
        }
    }

    fn member(id: &str) -> FamilyMember {
        FamilyMember {
            id: id.into(),
            name: id.to_uppercase(),
            color: "#3b82f6".into(),
        }
    }

    #[test]
    fn empty_snapshot_starts_at_week_one() {
        let snapshot = Snapshot::default();
        assert_eq!(snapshot.current_week(), 1);
        assert!(snapshot.weekly_scores().is_empty());
    }

    #[test]
    fn current_week_is_highest_scored_week() {
        let snapshot = Snapshot::new(
            vec![],
            vec![],
            vec![score(2, "x", 1), score(5, "y", 0), score(3, "x", 4)],
            vec![],
        );
        assert_eq!(snapshot.current_week(), 5);
    }

    #[test]
    fn picks_are_grouped_per_member_in_edge_order() {
        let snapshot = Snapshot::new(
            vec![member("a"), member("b")],
            vec![],
            vec![],
            vec![
                ("a".into(), "y".into()),
                ("b".into(), "z".into()),
                ("a".into(), "x".into()),
            ],
        );

        let a_picks: Vec<&str> = snapshot
            .picks_for(&"a".into())
            .iter()
            .map(ContestantId::as_str)
            .collect();
        assert_eq!(a_picks, vec!["y", "x"]);
        assert!(snapshot.picks_for(&"missing".into()).is_empty());
    }

    #[test]
    fn apply_scores_replaces_and_appends() {
        let mut snapshot = Snapshot::new(vec![], vec![], vec![score(1, "x", 10)], vec![]);

        let week = snapshot.apply_scores(1, &[ScoreEntry::new("x", 2), ScoreEntry::new("y", 6)]);

        assert_eq!(week, 1);
        assert_eq!(snapshot.weekly_scores(), &[score(1, "x", 2), score(1, "y", 6)]);
        assert_eq!(snapshot.points_for(1, &"y".into()), Some(6));
    }

    #[test]
    fn apply_scores_twice_is_idempotent() {
        let mut snapshot = Snapshot::new(vec![], vec![], vec![score(1, "x", 10)], vec![]);
        let entries = [ScoreEntry::new("x", 3), ScoreEntry::new("y", 1)];

        snapshot.apply_scores(2, &entries);
        let once = snapshot.weekly_scores().to_vec();
        snapshot.apply_scores(2, &entries);

        assert_eq!(snapshot.weekly_scores(), once.as_slice());
    }

    #[test]
    fn current_week_never_moves_backward() {
        let mut snapshot = Snapshot::new(vec![], vec![], vec![score(4, "x", 1)], vec![]);

        assert_eq!(snapshot.apply_scores(2, &[ScoreEntry::new("x", 9)]), 4);
        assert_eq!(snapshot.apply_scores(6, &[ScoreEntry::new("x", 9)]), 6);
        assert_eq!(snapshot.apply_scores(5, &[]), 6);
        assert_eq!(snapshot.points_for(2, &"x".into()), Some(9));
    }
}
