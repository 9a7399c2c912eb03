use crate::backup;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::prefs;
use serde_json::json;
use tracing::info;

fn profile_json(p: &prefs::Profile) -> serde_json::Value {
    json!({
        "name": p.user_name,
        "program": p.user_carrera,
        "photoUri": p.user_photo_uri,
        "darkMode": p.dark_mode
    })
}

fn handle_profile_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(workspace) = state.workspace.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    ok(
        &req.id,
        json!({ "profile": profile_json(&prefs::load_profile(workspace)) }),
    )
}

/// Merge-and-save: absent params leave the stored value alone, present ones
/// replace it. Last write wins; nothing here is validated.
fn handle_profile_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(workspace) = state.workspace.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let mut profile = prefs::load_profile(workspace);
    if let Some(name) = req.params.get("name").and_then(|v| v.as_str()) {
        profile.user_name = Some(name.to_string());
    }
    if let Some(program) = req.params.get("program").and_then(|v| v.as_str()) {
        profile.user_carrera = Some(program.to_string());
    }
    if let Some(photo_uri) = req.params.get("photoUri").and_then(|v| v.as_str()) {
        profile.user_photo_uri = Some(photo_uri.to_string());
    }
    if let Some(dark_mode) = req.params.get("darkMode").and_then(|v| v.as_bool()) {
        profile.dark_mode = dark_mode;
    }

    match prefs::save_profile(workspace, &profile) {
        Ok(()) => ok(&req.id, json!({ "profile": profile_json(&profile) })),
        Err(e) => err(&req.id, "io_failed", e.to_string(), None),
    }
}

fn handle_backup_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (Some(conn), Some(workspace)) = (state.db.as_ref(), state.workspace.as_ref()) else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match backup::export_backup(conn, workspace) {
        Ok(summary) => {
            info!(
                classes = summary.classes,
                tasks = summary.tasks,
                "backup exported"
            );
            ok(
                &req.id,
                json!({
                    "path": backup::backup_path(workspace).to_string_lossy(),
                    "classes": summary.classes,
                    "tasks": summary.tasks
                }),
            )
        }
        Err(e) => err(&req.id, "io_failed", e.to_string(), None),
    }
}

fn handle_backup_import(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (Some(conn), Some(workspace)) = (state.db.as_ref(), state.workspace.as_ref()) else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let path = backup::backup_path(workspace);
    if !path.is_file() {
        return err(
            &req.id,
            "not_found",
            "no prior backup",
            Some(json!({ "path": path.to_string_lossy() })),
        );
    }
    match backup::import_backup(conn, workspace) {
        Ok(summary) => {
            info!(
                classes_restored = summary.classes_restored,
                tasks_skipped = summary.tasks_skipped,
                "backup imported"
            );
            ok(
                &req.id,
                json!({
                    "classesRestored": summary.classes_restored,
                    "tasksSkipped": summary.tasks_skipped
                }),
            )
        }
        Err(e) => err(&req.id, "bad_backup", e.to_string(), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "profile.get" => Some(handle_profile_get(state, req)),
        "profile.set" => Some(handle_profile_set(state, req)),
        "backup.export" => Some(handle_backup_export(state, req)),
        "backup.import" => Some(handle_backup_import(state, req)),
        _ => None,
    }
}
