use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store::{self, Class, ClassData};
use serde_json::json;

pub(super) fn class_json(c: &Class) -> serde_json::Value {
    json!({
        "id": c.id,
        "name": c.name,
        "teacher": c.teacher,
        "room": c.room,
        "days": c.days,
        "startTime": c.start_time,
        "endTime": c.end_time,
        "color": c.color
    })
}

/// The registration form requires name, days and a start time; everything
/// else may be blank. Validation failures never reach storage.
fn read_class_data(req: &Request) -> Result<ClassData, serde_json::Value> {
    let field = |key: &str| {
        req.params
            .get(key)
            .and_then(|v| v.as_str())
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    let name = field("name");
    let days = field("days");
    let start_time = field("startTime");
    for (key, value) in [("name", &name), ("days", &days), ("startTime", &start_time)] {
        if value.is_empty() {
            return Err(err(
                &req.id,
                "bad_params",
                format!("missing {}", key),
                None,
            ));
        }
    }

    let color = match field("color") {
        c if c.is_empty() => store::DEFAULT_CLASS_COLOR.to_string(),
        c => c,
    };

    Ok(ClassData {
        name,
        teacher: field("teacher"),
        room: field("room"),
        days,
        start_time,
        end_time: field("endTime"),
        color,
    })
}

fn read_class_id(req: &Request) -> Result<i64, serde_json::Value> {
    req.params
        .get("classId")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| err(&req.id, "bad_params", "missing classId", None))
}

fn handle_classes_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return ok(&req.id, json!({ "classes": [] }));
    };
    match store::all_classes(conn) {
        Ok(classes) => ok(
            &req.id,
            json!({ "classes": classes.iter().map(class_json).collect::<Vec<_>>() }),
        ),
        Err(e) => err(&req.id, "db_query_failed", e.to_string(), None),
    }
}

fn handle_classes_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let class_id = match read_class_id(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match store::class_by_id(conn, class_id) {
        Ok(Some(class)) => ok(&req.id, json!({ "class": class_json(&class) })),
        Ok(None) => err(&req.id, "not_found", "class not found", None),
        Err(e) => err(&req.id, "db_query_failed", e.to_string(), None),
    }
}

fn handle_classes_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let data = match read_class_data(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match store::insert_class(conn, &data) {
        Ok(class_id) => ok(&req.id, json!({ "classId": class_id })),
        Err(e) => err(
            &req.id,
            "db_insert_failed",
            e.to_string(),
            Some(json!({ "table": "clases" })),
        ),
    }
}

fn handle_classes_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let class_id = match read_class_id(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let data = match read_class_data(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match store::update_class(conn, class_id, &data) {
        Ok(true) => ok(&req.id, json!({ "ok": true })),
        Ok(false) => err(&req.id, "not_found", "class not found", None),
        Err(e) => err(
            &req.id,
            "db_update_failed",
            e.to_string(),
            Some(json!({ "table": "clases" })),
        ),
    }
}

fn handle_classes_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let class_id = match read_class_id(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    // Dependent tasks vanish through the FK cascade; no manual sweep here.
    match store::delete_class(conn, class_id) {
        Ok(true) => ok(&req.id, json!({ "ok": true })),
        Ok(false) => err(&req.id, "not_found", "class not found", None),
        Err(e) => err(
            &req.id,
            "db_delete_failed",
            e.to_string(),
            Some(json!({ "table": "clases" })),
        ),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "classes.list" => Some(handle_classes_list(state, req)),
        "classes.get" => Some(handle_classes_get(state, req)),
        "classes.create" => Some(handle_classes_create(state, req)),
        "classes.update" => Some(handle_classes_update(state, req)),
        "classes.delete" => Some(handle_classes_delete(state, req)),
        _ => None,
    }
}
