/// Number of hour slots in the weekly grid (7 days x 24 hours)
pub const SLOT_COUNT: usize = 168;

pub const HOURS_PER_DAY: usize = 24;

pub const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Slot id for a day (Monday = 0) and hour, or None when either is off the grid
pub fn slot_id(day: usize, hour: usize) -> Option<u8> {
    if day < DAYS.len() && hour < HOURS_PER_DAY {
        Some((day * HOURS_PER_DAY + hour) as u8)
    } else {
        None
    }
}

/// Splits a slot id back into (day, hour)
pub fn day_hour(slot: usize) -> Option<(usize, usize)> {
    if slot < SLOT_COUNT {
        Some((slot / HOURS_PER_DAY, slot % HOURS_PER_DAY))
    } else {
        None
    }
}

/// Formats a slot for display, e.g. "Mon 14:00"
pub fn slot_label(slot: usize) -> String {
    match day_hour(slot) {
        Some((day, hour)) => format!("{} {:02}:00", DAYS[day], hour),
        None => format!("slot {}", slot),
    }
}
