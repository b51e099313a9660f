//! Pure aggregations turning a [`Snapshot`] into the leaderboard, the weekly breakdown, and the
//! tribe roster. Nothing here touches shared state or suspends.

use std::collections::{HashMap, HashSet};

use crate::state::{
    league::{Contestant, ContestantId, FamilyMember, WeekNumber},
    snapshot::Snapshot,
};

/// Season total of one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry<'a> {
    /// Ranked member.
    pub member: &'a FamilyMember,
    /// Sum over every week of the member's distinct picks.
    pub total_points: i64,
}

/// Result of resolving a picked contestant id against the contestant list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContestantLookup<'a> {
    /// The pick resolves to a contestant record.
    Found(&'a Contestant),
    /// The pick references an id with no contestant record.
    NotFound(&'a ContestantId),
}

impl<'a> ContestantLookup<'a> {
    /// Picked id, resolved or not.
    pub fn id(&self) -> &'a ContestantId {
        match self {
            ContestantLookup::Found(contestant) => &contestant.id,
            ContestantLookup::NotFound(id) => id,
        }
    }

    /// Resolved record, `None` for a dangling pick.
    pub fn contestant(&self) -> Option<&'a Contestant> {
        match self {
            ContestantLookup::Found(contestant) => Some(contestant),
            ContestantLookup::NotFound(_) => None,
        }
    }
}

/// Points one pick earned in the requested week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestantWeekScore<'a> {
    /// Picked contestant.
    pub contestant: ContestantLookup<'a>,
    /// Points for the week, 0 without a score row.
    pub points: i32,
}

/// One member's line in the weekly breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyBreakdownEntry<'a> {
    /// Member the line belongs to.
    pub member: &'a FamilyMember,
    /// Sum of `contestant_scores`.
    pub week_total: i64,
    /// One item per pick, in pick order.
    pub contestant_scores: Vec<ContestantWeekScore<'a>>,
}

/// A resolved contestant on a member's roster with its season total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSlot<'a> {
    /// Rostered contestant.
    pub contestant: &'a Contestant,
    /// Season total of the contestant.
    pub total_points: i64,
}

/// One member's roster card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TribeCard<'a> {
    /// Card owner.
    pub member: &'a FamilyMember,
    /// Same figure as the leaderboard total.
    pub total_points: i64,
    /// Resolved picks in pick order; dangling picks are skipped.
    pub roster: Vec<RosterSlot<'a>>,
    /// Rostered contestants still in the game.
    pub active_count: usize,
    /// Rostered contestants voted out.
    pub eliminated_count: usize,
    /// Free roster slots, never negative.
    pub picks_remaining: usize,
}

/// League-wide contestant status counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DraftSummary {
    /// Contestants still in the game.
    pub active: usize,
    /// Contestants voted out.
    pub eliminated: usize,
}

/// Season total per contestant id, across every week.
pub fn contestant_totals(snapshot: &Snapshot) -> HashMap<&ContestantId, i64> {
    let mut totals = HashMap::new();
    for score in snapshot.weekly_scores() {
        *totals.entry(&score.contestant_id).or_insert(0) += i64::from(score.points);
    }
    totals
}

/// Members ranked by season total, highest first. Ties keep the snapshot's member order.
pub fn leaderboard(snapshot: &Snapshot) -> Vec<LeaderboardEntry<'_>> {
    let totals = contestant_totals(snapshot);

    let mut entries: Vec<LeaderboardEntry<'_>> = snapshot
        .members()
        .iter()
        .map(|member| LeaderboardEntry {
            member,
            total_points: member_total(snapshot.picks_for(&member.id), &totals),
        })
        .collect();

    // `sort_by` is stable.
    entries.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    entries
}

/// Per-member points for `week_number`, in the snapshot's member order.
///
/// Weeks without any score row are valid and produce zero totals.
pub fn weekly_breakdown(
    snapshot: &Snapshot,
    week_number: WeekNumber,
) -> Vec<WeeklyBreakdownEntry<'_>> {
    snapshot
        .members()
        .iter()
        .map(|member| {
            let picks = snapshot.picks_for(&member.id);
            let week_total = distinct(picks)
                .map(|id| i64::from(snapshot.points_for(week_number, id).unwrap_or(0)))
                .sum();
            let contestant_scores = picks
                .iter()
                .map(|id| ContestantWeekScore {
                    contestant: lookup(snapshot, id),
                    points: snapshot.points_for(week_number, id).unwrap_or(0),
                })
                .collect();

            WeeklyBreakdownEntry {
                member,
                week_total,
                contestant_scores,
            }
        })
        .collect()
}

/// Roster cards in member order. Picks that no longer resolve are left off the roster but still
/// count against `roster_size`.
pub fn tribe_roster(snapshot: &Snapshot, roster_size: usize) -> Vec<TribeCard<'_>> {
    let totals = contestant_totals(snapshot);

    snapshot
        .members()
        .iter()
        .map(|member| {
            let picks = snapshot.picks_for(&member.id);
            let roster: Vec<RosterSlot<'_>> = picks
                .iter()
                .filter_map(|id| snapshot.contestant(id))
                .map(|contestant| RosterSlot {
                    contestant,
                    total_points: totals.get(&contestant.id).copied().unwrap_or(0),
                })
                .collect();
            let eliminated_count = roster
                .iter()
                .filter(|slot| slot.contestant.is_eliminated)
                .count();

            TribeCard {
                member,
                total_points: member_total(picks, &totals),
                active_count: roster.len() - eliminated_count,
                eliminated_count,
                picks_remaining: roster_size.saturating_sub(picks.len()),
                roster,
            }
        })
        .collect()
}

/// Count active and eliminated contestants across the whole cast.
pub fn draft_summary(snapshot: &Snapshot) -> DraftSummary {
    snapshot
        .contestants()
        .iter()
        .fold(DraftSummary::default(), |mut summary, contestant| {
            if contestant.is_eliminated {
                summary.eliminated += 1;
            } else {
                summary.active += 1;
            }
            summary
        })
}

fn lookup<'a>(snapshot: &'a Snapshot, id: &'a ContestantId) -> ContestantLookup<'a> {
    match snapshot.contestant(id) {
        Some(contestant) => ContestantLookup::Found(contestant),
        None => ContestantLookup::NotFound(id),
    }
}

/// A member holding the same contestant twice still collects each score row once.
fn member_total(picks: &[ContestantId], totals: &HashMap<&ContestantId, i64>) -> i64 {
    distinct(picks)
        .map(|id| totals.get(id).copied().unwrap_or(0))
        .sum()
}

fn distinct(picks: &[ContestantId]) -> impl Iterator<Item = &ContestantId> {
    let mut seen = HashSet::with_capacity(picks.len());
    picks.iter().filter(move |id| seen.insert(*id))
}
