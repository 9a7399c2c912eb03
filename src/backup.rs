use anyhow::Context;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::store;

pub const BACKUP_FILE_NAME: &str = "backup_horario.json";

/// Key names in the document match the backups written by earlier builds of
/// the app, so restored files keep working.
#[derive(Debug, Serialize, Deserialize)]
struct BackupClass {
    nombre: String,
    profesor: String,
    salon: String,
    dias: String,
    hora_inicio: String,
    hora_fin: String,
    #[serde(default = "default_color")]
    color: String,
}

fn default_color() -> String {
    store::DEFAULT_CLASS_COLOR.to_string()
}

/// Task entries deliberately drop the id and class linkage; the document
/// captures what the task said, not where it hung.
#[derive(Debug, Serialize, Deserialize)]
struct BackupTask {
    nombre: String,
    fecha: String,
    completada: bool,
    tipo: String,
    prioridad: String,
}

// `tareas` may be absent in documents written by hand or by older builds
// that only captured classes; those still import.
#[derive(Debug, Serialize, Deserialize)]
struct BackupDocument {
    clases: Vec<BackupClass>,
    #[serde(default)]
    tareas: Vec<BackupTask>,
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub classes: usize,
    pub tasks: usize,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub classes_restored: usize,
    /// Task entries present in the document but not reinserted. Restoring
    /// them was never implemented in the app; see DESIGN.md before "fixing".
    pub tasks_skipped: usize,
}

pub fn backup_path(workspace: &Path) -> PathBuf {
    workspace.join(BACKUP_FILE_NAME)
}

/// Serializes every class and every joined task into the fixed backup path,
/// overwriting any previous backup.
pub fn export_backup(conn: &Connection, workspace: &Path) -> anyhow::Result<ExportSummary> {
    let classes = store::all_classes(conn).context("failed to read classes for backup")?;
    let tasks = store::all_tasks(conn).context("failed to read tasks for backup")?;

    let doc = BackupDocument {
        clases: classes
            .into_iter()
            .map(|c| BackupClass {
                nombre: c.name,
                profesor: c.teacher,
                salon: c.room,
                dias: c.days,
                hora_inicio: c.start_time,
                hora_fin: c.end_time,
                color: c.color,
            })
            .collect(),
        tareas: tasks
            .into_iter()
            .map(|t| BackupTask {
                nombre: t.name,
                fecha: t.due_date,
                completada: t.completed,
                tipo: t.kind,
                prioridad: t.priority,
            })
            .collect(),
    };

    let summary = ExportSummary {
        classes: doc.clases.len(),
        tasks: doc.tareas.len(),
    };

    let out_path = backup_path(workspace);
    let text = serde_json::to_string(&doc).context("failed to serialize backup document")?;
    std::fs::write(&out_path, text)
        .with_context(|| format!("failed to write {}", out_path.to_string_lossy()))?;

    Ok(summary)
}

/// Reinserts every class entry as a brand-new row (fresh id, no
/// de-duplication; importing twice duplicates). Task entries are counted
/// but never restored, matching what the app has always done.
pub fn import_backup(conn: &Connection, workspace: &Path) -> anyhow::Result<ImportSummary> {
    let in_path = backup_path(workspace);
    let text = std::fs::read_to_string(&in_path)
        .with_context(|| format!("failed to read {}", in_path.to_string_lossy()))?;
    let doc: BackupDocument =
        serde_json::from_str(&text).context("backup document is invalid JSON")?;

    let mut classes_restored = 0usize;
    for entry in &doc.clases {
        store::insert_class(
            conn,
            &store::ClassData {
                name: entry.nombre.clone(),
                teacher: entry.profesor.clone(),
                room: entry.salon.clone(),
                days: entry.dias.clone(),
                start_time: entry.hora_inicio.clone(),
                end_time: entry.hora_fin.clone(),
                color: entry.color.clone(),
            },
        )
        .context("failed to reinsert class from backup")?;
        classes_restored += 1;
    }

    Ok(ImportSummary {
        classes_restored,
        tasks_skipped: doc.tareas.len(),
    })
}
