use serde::Serialize;
use utoipa::ToSchema;

use crate::state::league::{Contestant, FamilyMember};

/// Public view of a league member.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct MemberSummary {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl From<&FamilyMember> for MemberSummary {
    fn from(member: &FamilyMember) -> Self {
        Self {
            id: member.id.to_string(),
            name: member.name.clone(),
            color: member.color.clone(),
        }
    }
}

/// Public view of a contestant.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct ContestantSummary {
    pub id: String,
    pub name: String,
    pub tribe: String,
    pub is_eliminated: bool,
}

impl From<&Contestant> for ContestantSummary {
    fn from(contestant: &Contestant) -> Self {
        Self {
            id: contestant.id.to_string(),
            name: contestant.name.clone(),
            tribe: contestant.tribe.clone(),
            is_eliminated: contestant.is_eliminated,
        }
    }
}
