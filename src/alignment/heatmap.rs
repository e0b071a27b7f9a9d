use serde::{Serialize, Serializer};

use super::slots::SLOT_COUNT;
use crate::model::MemberWithData;

/// Per-slot count of members available in that hour of the week
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heatmap {
    counts: [u32; SLOT_COUNT],
}

impl Default for Heatmap {
    fn default() -> Self {
        Self {
            counts: [0; SLOT_COUNT],
        }
    }
}

/// Serialized as a plain JSON array of 168 counts
impl Serialize for Heatmap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.counts.iter())
    }
}

impl Heatmap {
    pub fn counts(&self) -> &[u32; SLOT_COUNT] {
        &self.counts
    }

    pub fn get(&self, slot: usize) -> u32 {
        self.counts.get(slot).copied().unwrap_or(0)
    }

    /// Sum over all slots
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Slots with at least one available member, most popular first.
    /// Ties go to the earlier slot in the week.
    pub fn ranked_slots(&self) -> Vec<(usize, u32)> {
        let mut ranked: Vec<(usize, u32)> = self
            .counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(slot, &count)| (slot, count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

/// Counts, for every slot of the week, how many members selected it.
///
/// Members without a questionnaire contribute nothing. Slot ids outside
/// `0..168` are skipped, and a slot listed twice by the same member still
/// counts once for that member.
pub fn compute_heatmap(members: &[MemberWithData]) -> Heatmap {
    let mut heatmap = Heatmap::default();

    for entry in members {
        let Some(questionnaire) = &entry.questionnaire else {
            continue;
        };

        let mut seen = [false; SLOT_COUNT];
        for &slot in &questionnaire.availability {
            match usize::try_from(slot).ok().filter(|&s| s < SLOT_COUNT) {
                Some(s) if !seen[s] => {
                    seen[s] = true;
                    heatmap.counts[s] += 1;
                }
                Some(_) => {}
                None => log::debug!(
                    "Ignoring out-of-range slot {} for member {}",
                    slot,
                    entry.member.id
                ),
            }
        }
    }

    heatmap
}

/// Display weight for a slot: 0 when nobody is free, otherwise scaled
/// from 0.2 (one member) up to 1.0 (whole roster).
pub fn intensity(count: u32, total_members: usize) -> f64 {
    if count == 0 || total_members == 0 {
        return 0.0;
    }
    0.2 + (count as f64 / total_members as f64) * 0.8
}
