use std::fmt::Write;

use crate::alignment::slots::{slot_id, DAYS, HOURS_PER_DAY};
use crate::alignment::{intensity, AlignmentReport, ConflictSignal, Heatmap};
use crate::model::{ExpectationLevel, Group, MemberWithData};

/// Formats a member name with their role tag
pub fn format_member_name(role: Option<&str>, name: &str) -> String {
    match role {
        Some(role) if !role.is_empty() => format!("[{}] {}", role, name),
        _ => name.to_string(),
    }
}

fn grade_label(level: f64) -> String {
    match ExpectationLevel::from_value(level) {
        Some(step) => step.label(),
        None if level > 0.0 => format!("{:.1}", level),
        None => "-".to_string(),
    }
}

/// One roster line: name, grade aim and working preferences
pub fn format_member_line(user: &MemberWithData) -> String {
    let name = format_member_name(user.member.role.as_deref(), &user.member.name);
    match &user.questionnaire {
        Some(q) => format!(
            "{} aim {}, {}h/wk, {}, {}",
            name,
            q.expectation()
                .map_or_else(|| grade_label(q.expectation_level), ExpectationLevel::label),
            q.weekly_hours,
            q.meeting_frequency,
            q.project_methodology
        ),
        None => format!("{} (no questionnaire yet)", name),
    }
}

pub fn format_conflict(conflict: &ConflictSignal) -> String {
    if !conflict.has_conflict {
        return "No goal mismatch detected".to_string();
    }
    format!(
        "⚠️  Goal mismatch: aims range from {} to {} (gap {:.1})",
        grade_label(conflict.min.unwrap_or_default()),
        grade_label(conflict.max.unwrap_or_default()),
        conflict.spread().unwrap_or_default()
    )
}

/// Renders the week as a 24-row grid of counts; `.` marks an empty slot and
/// `*` marks a slot where the whole roster is free
pub fn format_heatmap(heatmap: &Heatmap, total_members: usize) -> String {
    let mut out = String::new();
    out.push_str("      ");
    for day in DAYS {
        let _ = write!(out, "{:>5}", day);
    }
    out.push('\n');

    for hour in 0..HOURS_PER_DAY {
        let _ = write!(out, "{:02}:00 ", hour);
        for day in 0..DAYS.len() {
            let count = slot_id(day, hour).map(|s| heatmap.get(s as usize)).unwrap_or(0);
            let cell = if count == 0 {
                ".".to_string()
            } else if intensity(count, total_members) >= 1.0 {
                format!("{}*", count)
            } else {
                count.to_string()
            };
            let _ = write!(out, "{:>5}", cell);
        }
        out.push('\n');
    }
    out
}

/// Prints the admin review for a group in a readable format
pub fn print_alignment_report(group: &Group, report: &AlignmentReport) {
    println!("\n=== {} ({}) ===", group.project_name, group.code);
    println!(
        "Questionnaires submitted: {}/{}{}",
        report.submitted_count,
        report.total_members,
        if group.is_finalized { " (finalized)" } else { "" }
    );

    println!("\nMembers:");
    for user in &report.users {
        println!("  - {}", format_member_line(user));
    }

    println!("\nAvailability:");
    print!("{}", format_heatmap(&report.heatmap, report.total_members));

    if !report.suggested_slots.is_empty() {
        println!("\nBest meeting slots:");
        for suggestion in &report.suggested_slots {
            println!(
                "  {} -> {}/{} free",
                suggestion.label, suggestion.available, report.total_members
            );
        }
    }

    println!("\n{}", format_conflict(&report.conflict));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::{compute_conflict, compute_heatmap};
    use crate::model::{Member, Questionnaire};

    #[test]
    fn member_name_with_role() {
        assert_eq!(format_member_name(Some("Lead"), "Ana"), "[Lead] Ana");
        assert_eq!(format_member_name(Some(""), "Ana"), "Ana");
        assert_eq!(format_member_name(None, "Ana"), "Ana");
    }

    #[test]
    fn grid_has_header_and_24_rows() {
        let questionnaire = Questionnaire {
            availability: vec![0, 24],
            ..serde_json::from_value(serde_json::json!({ "userId": "a" })).unwrap()
        };
        let members = vec![
            MemberWithData::new(Member::new("a".into(), "g".into(), "a".into(), false), Some(questionnaire)),
            MemberWithData::new(Member::new("b".into(), "g".into(), "b".into(), false), None),
        ];
        let grid = format_heatmap(&compute_heatmap(&members), 2);
        let lines: Vec<&str> = grid.lines().collect();

        assert_eq!(lines.len(), 25);
        assert!(lines[0].contains("Mon") && lines[0].contains("Sun"));
        assert!(lines[1].starts_with("00:00"));
        let cells: Vec<&str> = lines[1].split_whitespace().collect();
        assert_eq!(cells[1], "1");
        assert_eq!(cells[2], "1");
        assert_eq!(cells[3], ".");
    }

    #[test]
    fn full_roster_slot_is_starred() {
        let questionnaire = Questionnaire {
            availability: vec![0],
            ..serde_json::from_value(serde_json::json!({ "userId": "a" })).unwrap()
        };
        let members = vec![MemberWithData::new(
            Member::new("a".into(), "g".into(), "a".into(), false),
            Some(questionnaire),
        )];
        let grid = format_heatmap(&compute_heatmap(&members), 1);
        assert!(grid.lines().nth(1).unwrap().contains("1*"));
    }

    #[test]
    fn grade_labels() {
        assert_eq!(grade_label(1.0), "1.0 (Very Good)");
        assert_eq!(grade_label(2.3), "2.3");
        assert_eq!(grade_label(0.0), "-");
    }

    #[test]
    fn member_line_uses_scale_label() {
        let questionnaire = Questionnaire {
            expectation_level: 1.0,
            ..serde_json::from_value(serde_json::json!({ "userId": "a" })).unwrap()
        };
        let member = Member::new("a".into(), "g".into(), "Ana".into(), false).with_role("Lead");
        let line = format_member_line(&MemberWithData::new(member.clone(), Some(questionnaire)));
        assert!(line.starts_with("[Lead] Ana aim 1.0 (Very Good), 0h/wk"), "{}", line);

        let line = format_member_line(&MemberWithData::new(member, None));
        assert_eq!(line, "[Lead] Ana (no questionnaire yet)");
    }

    #[test]
    fn conflict_message_shows_gap() {
        let with_level = |id: &str, expectation_level: f64| {
            let questionnaire = Questionnaire {
                expectation_level,
                ..serde_json::from_value(serde_json::json!({ "userId": id })).unwrap()
            };
            MemberWithData::new(Member::new(id.into(), "g".into(), id.into(), false), Some(questionnaire))
        };

        let conflict = compute_conflict(&[with_level("a", 1.0), with_level("b", 4.0)]);
        let message = format_conflict(&conflict);
        assert!(message.contains("from 1.0 (Very Good) to 4.0 (Pass)"), "{}", message);
        assert!(message.ends_with("(gap 3.0)"));

        let calm = compute_conflict(&[with_level("a", 2.0), with_level("b", 2.3)]);
        assert_eq!(format_conflict(&calm), "No goal mismatch detected");
    }
}
