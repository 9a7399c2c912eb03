use crate::store::Class;
use chrono::Weekday;

/// Locale-fixed day tokens used in the `dias` column. The registration form
/// only ever wrote the unaccented forms, so matching sticks to them.
pub const DAY_TOKENS: [&str; 7] = ["Lun", "Mar", "Mie", "Jue", "Vie", "Sab", "Dom"];

pub fn day_token(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Lun",
        Weekday::Tue => "Mar",
        Weekday::Wed => "Mie",
        Weekday::Thu => "Jue",
        Weekday::Fri => "Vie",
        Weekday::Sat => "Sab",
        Weekday::Sun => "Dom",
    }
}

/// "HH:MM" to minutes since midnight. Anything that does not split into two
/// numeric parts is malformed and reported as None; callers skip it.
pub fn parse_hhmm(s: &str) -> Option<i64> {
    let mut parts = s.split(':');
    let h: i64 = parts.next()?.trim().parse().ok()?;
    let m: i64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() || h < 0 || m < 0 {
        return None;
    }
    Some(h * 60 + m)
}

/// Session length in minutes; an end before the start wraps past midnight.
pub fn session_minutes(start: &str, end: &str) -> Option<i64> {
    let s = parse_hhmm(start)?;
    let e = parse_hhmm(end)?;
    let mut dur = e - s;
    if dur < 0 {
        dur += 1440;
    }
    Some(dur)
}

/// Number of day tokens in a comma-joined list. Blank means zero; empty
/// segments still count, same as the original split-and-size behavior.
pub fn day_count(days: &str) -> i64 {
    if days.trim().is_empty() {
        0
    } else {
        days.split(',').count() as i64
    }
}

/// Total scheduled minutes per week. Classes with malformed times
/// contribute zero instead of failing the whole sum.
pub fn weekly_minutes(classes: &[Class]) -> i64 {
    classes
        .iter()
        .filter_map(|c| {
            let dur = session_minutes(&c.start_time, &c.end_time)?;
            Some(dur * day_count(&c.days))
        })
        .sum()
}

/// Renders a minute total as "Xh Ym", dropping the zero component.
pub fn format_weekly_total(total_minutes: i64) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    match (hours > 0, minutes > 0) {
        (true, true) => format!("{}h {}m", hours, minutes),
        (true, false) => format!("{}h", hours),
        (false, true) => format!("{}m", minutes),
        (false, false) => "0".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NextClass<'a> {
    /// No class lists today's token at all.
    NoneToday,
    /// There were classes today but every start time has passed.
    Finished,
    Upcoming(&'a Class),
}

/// Scans today's classes in start-time order and picks the first one that
/// has not started yet. String sort is correct for zero-padded "HH:MM".
pub fn next_class<'a>(classes: &'a [Class], today: &str, now_minutes: i64) -> NextClass<'a> {
    let mut today_classes: Vec<&Class> = classes
        .iter()
        .filter(|c| c.days.contains(today))
        .collect();
    if today_classes.is_empty() {
        return NextClass::NoneToday;
    }
    today_classes.sort_by(|a, b| a.start_time.cmp(&b.start_time));

    for class in today_classes {
        let Some(start) = parse_hhmm(&class.start_time) else {
            continue;
        };
        if start > now_minutes {
            return NextClass::Upcoming(class);
        }
    }
    NextClass::Finished
}

/// How far into the week we are: Mon=1 .. Sun=7, as a rounded-down percent.
pub fn week_progress(weekday: Weekday) -> (&'static str, i64) {
    let day = weekday.number_from_monday() as i64;
    (day_token(weekday), day * 100 / 7)
}
