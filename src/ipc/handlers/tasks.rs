use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store::{self, Task, TaskData};
use serde_json::json;

const TASK_KINDS: [&str; 2] = ["Tarea", "Examen"];
const TASK_PRIORITIES: [&str; 3] = ["Alta", "Media", "Baja"];

pub(super) fn task_json(t: &Task) -> serde_json::Value {
    json!({
        "id": t.id,
        "name": t.name,
        "dueDate": t.due_date,
        "classId": t.class_id,
        "completed": t.completed,
        "className": t.class_name,
        "type": t.kind,
        "priority": t.priority
    })
}

/// The task form requires a name and a due date; kind and priority come
/// from fixed choices and anything else is rejected before storage.
fn read_task_data(req: &Request) -> Result<TaskData, serde_json::Value> {
    let field = |key: &str| {
        req.params
            .get(key)
            .and_then(|v| v.as_str())
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    let name = field("name");
    let due_date = field("dueDate");
    for (key, value) in [("name", &name), ("dueDate", &due_date)] {
        if value.is_empty() {
            return Err(err(
                &req.id,
                "bad_params",
                format!("missing {}", key),
                None,
            ));
        }
    }

    let Some(class_id) = req.params.get("classId").and_then(|v| v.as_i64()) else {
        return Err(err(&req.id, "bad_params", "missing classId", None));
    };

    let kind = field("type");
    if !TASK_KINDS.contains(&kind.as_str()) {
        return Err(err(
            &req.id,
            "bad_params",
            "type must be one of: Tarea, Examen",
            Some(json!({ "type": kind })),
        ));
    }
    let priority = field("priority");
    if !TASK_PRIORITIES.contains(&priority.as_str()) {
        return Err(err(
            &req.id,
            "bad_params",
            "priority must be one of: Alta, Media, Baja",
            Some(json!({ "priority": priority })),
        ));
    }

    Ok(TaskData {
        name,
        due_date,
        class_id,
        kind,
        priority,
    })
}

fn read_task_id(req: &Request) -> Result<i64, serde_json::Value> {
    req.params
        .get("taskId")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| err(&req.id, "bad_params", "missing taskId", None))
}

fn handle_tasks_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return ok(&req.id, json!({ "tasks": [] }));
    };
    match store::all_tasks(conn) {
        Ok(tasks) => ok(
            &req.id,
            json!({ "tasks": tasks.iter().map(task_json).collect::<Vec<_>>() }),
        ),
        Err(e) => err(&req.id, "db_query_failed", e.to_string(), None),
    }
}

fn handle_tasks_list_pending(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return ok(&req.id, json!({ "tasks": [] }));
    };
    match store::pending_tasks_detailed(conn) {
        Ok(tasks) => ok(
            &req.id,
            json!({ "tasks": tasks.iter().map(task_json).collect::<Vec<_>>() }),
        ),
        Err(e) => err(&req.id, "db_query_failed", e.to_string(), None),
    }
}

fn handle_tasks_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let task_id = match read_task_id(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match store::task_by_id(conn, task_id) {
        Ok(Some(task)) => ok(&req.id, json!({ "task": task_json(&task) })),
        Ok(None) => err(&req.id, "not_found", "task not found", None),
        Err(e) => err(&req.id, "db_query_failed", e.to_string(), None),
    }
}

fn handle_tasks_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let data = match read_task_data(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    // A dangling classId trips the FK constraint and surfaces here.
    match store::insert_task(conn, &data) {
        Ok(task_id) => ok(&req.id, json!({ "taskId": task_id })),
        Err(e) => err(
            &req.id,
            "db_insert_failed",
            e.to_string(),
            Some(json!({ "table": "tareas" })),
        ),
    }
}

fn handle_tasks_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let task_id = match read_task_id(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let data = match read_task_data(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match store::update_task(conn, task_id, &data) {
        Ok(true) => ok(&req.id, json!({ "ok": true })),
        Ok(false) => err(&req.id, "not_found", "task not found", None),
        Err(e) => err(
            &req.id,
            "db_update_failed",
            e.to_string(),
            Some(json!({ "table": "tareas" })),
        ),
    }
}

fn handle_tasks_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let task_id = match read_task_id(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match store::delete_task(conn, task_id) {
        Ok(true) => ok(&req.id, json!({ "ok": true })),
        Ok(false) => err(&req.id, "not_found", "task not found", None),
        Err(e) => err(
            &req.id,
            "db_delete_failed",
            e.to_string(),
            Some(json!({ "table": "tareas" })),
        ),
    }
}

fn handle_tasks_set_completed(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let task_id = match read_task_id(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let Some(completed) = req.params.get("completed").and_then(|v| v.as_bool()) else {
        return err(&req.id, "bad_params", "missing completed", None);
    };
    match store::set_task_completion(conn, task_id, completed) {
        Ok(true) => ok(&req.id, json!({ "ok": true, "completed": completed })),
        Ok(false) => err(&req.id, "not_found", "task not found", None),
        Err(e) => err(
            &req.id,
            "db_update_failed",
            e.to_string(),
            Some(json!({ "table": "tareas" })),
        ),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "tasks.list" => Some(handle_tasks_list(state, req)),
        "tasks.listPending" => Some(handle_tasks_list_pending(state, req)),
        "tasks.get" => Some(handle_tasks_get(state, req)),
        "tasks.create" => Some(handle_tasks_create(state, req)),
        "tasks.update" => Some(handle_tasks_update(state, req)),
        "tasks.delete" => Some(handle_tasks_delete(state, req)),
        "tasks.setCompleted" => Some(handle_tasks_set_completed(state, req)),
        _ => None,
    }
}
