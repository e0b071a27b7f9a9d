use serde::Serialize;

use super::conflict::{compute_conflict, ConflictSignal};
use super::heatmap::{compute_heatmap, Heatmap};
use super::slots::slot_label;
use crate::model::MemberWithData;

/// How many top slots are offered as meeting time suggestions
pub const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSuggestion {
    pub slot: usize,
    pub label: String,
    pub available: u32,
}

/// Everything the admin view needs to settle a meeting time and roles
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentReport {
    pub users: Vec<MemberWithData>,
    pub heatmap: Heatmap,
    pub conflict: ConflictSignal,
    pub total_members: usize,
    pub submitted_count: usize,
    pub suggested_slots: Vec<SlotSuggestion>,
}

pub fn analyze(users: Vec<MemberWithData>) -> AlignmentReport {
    let heatmap = compute_heatmap(&users);
    let conflict = compute_conflict(&users);
    let submitted_count = users.iter().filter(|u| u.questionnaire.is_some()).count();

    let suggested_slots = heatmap
        .ranked_slots()
        .into_iter()
        .take(SUGGESTION_LIMIT)
        .map(|(slot, available)| SlotSuggestion {
            slot,
            label: slot_label(slot),
            available,
        })
        .collect();

    AlignmentReport {
        total_members: users.len(),
        submitted_count,
        heatmap,
        conflict,
        suggested_slots,
        users,
    }
}
