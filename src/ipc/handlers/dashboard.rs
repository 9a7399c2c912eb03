use crate::agenda::{self, NextClass};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store;
use chrono::{Datelike, Local, Timelike};
use rusqlite::Connection;
use serde_json::json;

use super::classes::class_json;

/// One round trip for everything the dashboard and home screens show. The
/// shell redraws from scratch on every appearance, so there is no point in
/// finer-grained queries.
fn build_summary(conn: &Connection) -> anyhow::Result<serde_json::Value> {
    let now = Local::now();
    let today = agenda::day_token(now.weekday());
    let now_minutes = i64::from(now.hour()) * 60 + i64::from(now.minute());

    let classes = store::all_classes(conn)?;
    let total_minutes = agenda::weekly_minutes(&classes);

    let next_class = match agenda::next_class(&classes, today, now_minutes) {
        NextClass::NoneToday => json!({ "status": "none_today" }),
        NextClass::Finished => json!({ "status": "finished" }),
        NextClass::Upcoming(c) => json!({ "status": "upcoming", "class": class_json(c) }),
    };

    let next_task = store::next_pending_task(conn)?
        .map(|t| json!({ "name": t.name, "dueDate": t.due_date }))
        .unwrap_or(serde_json::Value::Null);

    let breakdown = store::pending_breakdown(conn)?
        .iter()
        .map(|b| json!({ "className": b.class_name, "pending": b.pending }))
        .collect::<Vec<_>>();

    let (day_token, percent) = agenda::week_progress(now.weekday());

    Ok(json!({
        "classCount": store::count_classes(conn)?,
        "todayClassCount": store::today_class_count(conn, today)?,
        "pendingCount": store::count_pending_tasks(conn)?,
        "completedCount": store::count_completed_tasks(conn)?,
        "weeklyHours": {
            "label": agenda::format_weekly_total(total_minutes),
            "totalMinutes": total_minutes
        },
        "nextTask": next_task,
        "nextClass": next_class,
        "pendingBreakdown": breakdown,
        "weekProgress": { "day": day_token, "percent": percent }
    }))
}

fn handle_dashboard_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match build_summary(conn) {
        Ok(summary) => ok(&req.id, summary),
        Err(e) => err(&req.id, "db_query_failed", e.to_string(), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.summary" => Some(handle_dashboard_summary(state, req)),
        _ => None,
    }
}
