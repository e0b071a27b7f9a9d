use group_kickoff::alignment::{analyze, compute_conflict, compute_heatmap, intensity, SLOT_COUNT};
use group_kickoff::model::{ExpectationLevel, Member, MemberWithData, Questionnaire};

fn member(id: &str, level: Option<f64>, slots: &[i64]) -> MemberWithData {
    let questionnaire = level.map(|expectation_level| Questionnaire {
        expectation_level,
        availability: slots.to_vec(),
        ..serde_json::from_value(serde_json::json!({ "userId": id })).unwrap()
    });
    MemberWithData::new(
        Member::new(id.to_string(), "g1".to_string(), id.to_string(), false),
        questionnaire,
    )
}

/// Small deterministic generator so the roster varies without extra crates
fn roster(seed: u64, size: usize) -> Vec<MemberWithData> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as i64
    };

    (0..size)
        .map(|i| {
            let has_questionnaire = next() % 5 != 0;
            let slot_count = (next() % 20) as usize;
            let slots: Vec<i64> = (0..slot_count).map(|_| next() % 200 - 10).collect();
            let level = ExpectationLevel::STEPS[(next() % 10) as usize].value();
            member(&format!("m{}", i), has_questionnaire.then_some(level), &slots)
        })
        .collect()
}

fn distinct_valid_slots(members: &[MemberWithData]) -> u32 {
    members
        .iter()
        .filter_map(|m| m.questionnaire.as_ref())
        .map(|q| {
            let mut valid: Vec<i64> = q
                .availability
                .iter()
                .copied()
                .filter(|&s| (0..SLOT_COUNT as i64).contains(&s))
                .collect();
            valid.sort_unstable();
            valid.dedup();
            valid.len() as u32
        })
        .sum()
}

#[test]
fn heatmap_sum_matches_valid_selections() {
    for seed in 1..50 {
        let members = roster(seed, (seed % 12) as usize);
        let heatmap = compute_heatmap(&members);
        assert_eq!(heatmap.counts().len(), SLOT_COUNT);
        assert_eq!(heatmap.total(), distinct_valid_slots(&members), "seed {}", seed);
    }
}

#[test]
fn heatmap_is_order_independent() {
    for seed in 1..20 {
        let mut members = roster(seed, 8);
        let expected = compute_heatmap(&members);
        members.rotate_left(3);
        assert_eq!(compute_heatmap(&members), expected);
        members.reverse();
        assert_eq!(compute_heatmap(&members), expected);
    }
}

#[test]
fn no_slot_exceeds_roster_size() {
    let members = roster(7, 10);
    let heatmap = compute_heatmap(&members);
    assert!(heatmap.counts().iter().all(|&c| c as usize <= members.len()));
}

#[test]
fn three_member_scenario() {
    let members = vec![
        member("a", Some(2.0), &[0, 1, 24]),
        member("b", Some(2.0), &[0, 24, 25]),
        member("c", Some(2.0), &[1]),
    ];
    let heatmap = compute_heatmap(&members);
    assert_eq!(heatmap.get(0), 2);
    assert_eq!(heatmap.get(1), 2);
    assert_eq!(heatmap.get(24), 2);
    assert_eq!(heatmap.get(25), 1);
    assert_eq!(heatmap.total(), 7);
}

#[test]
fn conflict_thresholds() {
    let pair = |a: f64, b: f64| compute_conflict(&[member("a", Some(a), &[]), member("b", Some(b), &[])]);
    assert!(!pair(1.0, 2.3).has_conflict);
    assert!(pair(1.0, 2.7).has_conflict);
    assert!(pair(1.0, 2.4).has_conflict);

    let mixed = compute_conflict(&[member("a", Some(1.0), &[]), member("b", Some(4.0), &[]), member("c", None, &[])]);
    assert!(mixed.has_conflict);
    assert_eq!((mixed.min, mixed.max), (Some(1.0), Some(4.0)));
}

#[test]
fn fewer_than_two_opinions_never_conflict() {
    for seed in 1..30 {
        let members: Vec<MemberWithData> = roster(seed, 6)
            .into_iter()
            .enumerate()
            .map(|(i, m)| if i == 0 { m } else { MemberWithData::new(m.member, None) })
            .collect();
        assert!(!compute_conflict(&members).has_conflict);
    }
}

#[test]
fn empty_roster_is_quiet() {
    let report = analyze(Vec::new());
    assert!(report.heatmap.counts().iter().all(|&c| c == 0));
    assert!(!report.conflict.has_conflict);
    for slot in 0..SLOT_COUNT {
        assert_eq!(intensity(report.heatmap.get(slot), report.total_members), 0.0);
    }
}

#[test]
fn repeated_analysis_is_byte_identical() {
    let members = roster(42, 9);
    let first = serde_json::to_string(&analyze(members.clone())).unwrap();
    let second = serde_json::to_string(&analyze(members)).unwrap();
    assert_eq!(first, second);
}
