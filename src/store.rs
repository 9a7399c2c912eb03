use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;

pub const DEFAULT_CLASS_COLOR: &str = "#6200EE";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub teacher: String,
    pub room: String,
    /// Comma-joined day tokens, e.g. "Lun,Mie".
    pub days: String,
    pub start_time: String,
    pub end_time: String,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct ClassData {
    pub name: String,
    pub teacher: String,
    pub room: String,
    pub days: String,
    pub start_time: String,
    pub end_time: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub due_date: String,
    pub class_id: i64,
    pub completed: bool,
    /// Owning class name, materialized by joined reads.
    pub class_name: String,
    pub kind: String,
    pub priority: String,
}

#[derive(Debug, Clone)]
pub struct TaskData {
    pub name: String,
    pub due_date: String,
    pub class_id: i64,
    pub kind: String,
    pub priority: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NextTask {
    pub name: String,
    pub due_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingPerClass {
    pub class_name: String,
    pub pending: i64,
}

// ---- classes ----

pub fn insert_class(conn: &Connection, data: &ClassData) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO clases(nombre, profesor, salon, dias, hora_inicio, hora_fin, color)
         VALUES(?, ?, ?, ?, ?, ?, ?)",
        (
            &data.name,
            &data.teacher,
            &data.room,
            &data.days,
            &data.start_time,
            &data.end_time,
            &data.color,
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

fn class_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Class> {
    Ok(Class {
        id: row.get(0)?,
        name: row.get(1)?,
        teacher: row.get(2)?,
        room: row.get(3)?,
        days: row.get(4)?,
        start_time: row.get(5)?,
        end_time: row.get(6)?,
        color: row.get(7)?,
    })
}

pub fn all_classes(conn: &Connection) -> anyhow::Result<Vec<Class>> {
    let mut stmt = conn.prepare(
        "SELECT id, nombre, profesor, salon, dias, hora_inicio, hora_fin, color FROM clases",
    )?;
    let rows = stmt
        .query_map([], class_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn class_by_id(conn: &Connection, id: i64) -> anyhow::Result<Option<Class>> {
    let row = conn
        .query_row(
            "SELECT id, nombre, profesor, salon, dias, hora_inicio, hora_fin, color
             FROM clases WHERE id = ?",
            [id],
            class_from_row,
        )
        .optional()?;
    Ok(row)
}

/// Full-row update; returns false when no class has this id.
pub fn update_class(conn: &Connection, id: i64, data: &ClassData) -> anyhow::Result<bool> {
    let rows = conn.execute(
        "UPDATE clases
         SET nombre = ?, profesor = ?, salon = ?, dias = ?,
             hora_inicio = ?, hora_fin = ?, color = ?
         WHERE id = ?",
        (
            &data.name,
            &data.teacher,
            &data.room,
            &data.days,
            &data.start_time,
            &data.end_time,
            &data.color,
            id,
        ),
    )?;
    Ok(rows > 0)
}

/// Dependent tasks go with the class via ON DELETE CASCADE.
pub fn delete_class(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let rows = conn.execute("DELETE FROM clases WHERE id = ?", [id])?;
    Ok(rows > 0)
}

// ---- tasks ----

pub fn insert_task(conn: &Connection, data: &TaskData) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO tareas(nombre_tarea, fecha_limite, id_clase, completada, tipo, prioridad)
         VALUES(?, ?, ?, 0, ?, ?)",
        (
            &data.name,
            &data.due_date,
            data.class_id,
            &data.kind,
            &data.priority,
        ),
    )?;
    Ok(conn.last_insert_rowid())
}

fn task_from_joined_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        due_date: row.get(2)?,
        class_id: row.get(3)?,
        completed: row.get::<_, i64>(4)? == 1,
        class_name: row.get(5)?,
        kind: row.get(6)?,
        priority: row.get(7)?,
    })
}

/// Inner join: a task whose class row is gone is omitted, not surfaced.
pub fn all_tasks(conn: &Connection) -> anyhow::Result<Vec<Task>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.nombre_tarea, t.fecha_limite, t.id_clase, t.completada,
                c.nombre, t.tipo, t.prioridad
         FROM tareas t
         INNER JOIN clases c ON t.id_clase = c.id",
    )?;
    let rows = stmt
        .query_map([], task_from_joined_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn task_by_id(conn: &Connection, id: i64) -> anyhow::Result<Option<Task>> {
    let row = conn
        .query_row(
            "SELECT t.id, t.nombre_tarea, t.fecha_limite, t.id_clase, t.completada,
                    c.nombre, t.tipo, t.prioridad
             FROM tareas t
             INNER JOIN clases c ON t.id_clase = c.id
             WHERE t.id = ?",
            [id],
            task_from_joined_row,
        )
        .optional()?;
    Ok(row)
}

/// Updates the editable columns only; the completion flag is owned by
/// [`set_task_completion`], matching the edit form of the app.
pub fn update_task(conn: &Connection, id: i64, data: &TaskData) -> anyhow::Result<bool> {
    let rows = conn.execute(
        "UPDATE tareas
         SET nombre_tarea = ?, fecha_limite = ?, id_clase = ?, tipo = ?, prioridad = ?
         WHERE id = ?",
        (
            &data.name,
            &data.due_date,
            data.class_id,
            &data.kind,
            &data.priority,
            id,
        ),
    )?;
    Ok(rows > 0)
}

pub fn delete_task(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let rows = conn.execute("DELETE FROM tareas WHERE id = ?", [id])?;
    Ok(rows > 0)
}

pub fn set_task_completion(conn: &Connection, id: i64, completed: bool) -> anyhow::Result<bool> {
    let rows = conn.execute(
        "UPDATE tareas SET completada = ? WHERE id = ?",
        (if completed { 1 } else { 0 }, id),
    )?;
    Ok(rows > 0)
}

// ---- dashboard aggregates ----

fn count(conn: &Connection, sql: &str) -> anyhow::Result<i64> {
    let n = conn.query_row(sql, [], |r| r.get(0))?;
    Ok(n)
}

pub fn count_classes(conn: &Connection) -> anyhow::Result<i64> {
    count(conn, "SELECT COUNT(*) FROM clases")
}

pub fn count_pending_tasks(conn: &Connection) -> anyhow::Result<i64> {
    count(conn, "SELECT COUNT(*) FROM tareas WHERE completada = 0")
}

pub fn count_completed_tasks(conn: &Connection) -> anyhow::Result<i64> {
    count(conn, "SELECT COUNT(*) FROM tareas WHERE completada = 1")
}

/// The pending task with the smallest due-date string. Due dates are stored
/// as text, so this is lexicographic order, like the app always did.
pub fn next_pending_task(conn: &Connection) -> anyhow::Result<Option<NextTask>> {
    let row = conn
        .query_row(
            "SELECT nombre_tarea, fecha_limite FROM tareas
             WHERE completada = 0
             ORDER BY fecha_limite ASC
             LIMIT 1",
            [],
            |r| {
                Ok(NextTask {
                    name: r.get(0)?,
                    due_date: r.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

/// Per-class pending counts; classes with nothing pending are omitted.
pub fn pending_breakdown(conn: &Connection) -> anyhow::Result<Vec<PendingPerClass>> {
    let mut stmt = conn.prepare(
        "SELECT c.nombre, COUNT(t.id)
         FROM clases c
         LEFT JOIN tareas t ON c.id = t.id_clase AND t.completada = 0
         GROUP BY c.id",
    )?;
    let rows = stmt
        .query_map([], |r| {
            Ok(PendingPerClass {
                class_name: r.get(0)?,
                pending: r.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows.into_iter().filter(|b| b.pending > 0).collect())
}

/// Substring match against the comma-joined day list, same as the stored
/// format produced by the registration form.
pub fn today_class_count(conn: &Connection, day_token: &str) -> anyhow::Result<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM clases WHERE dias LIKE '%' || ? || '%'",
        [day_token],
        |r| r.get(0),
    )?;
    Ok(n)
}

pub fn pending_tasks_detailed(conn: &Connection) -> anyhow::Result<Vec<Task>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.nombre_tarea, t.fecha_limite, t.id_clase, t.completada,
                c.nombre, t.tipo, t.prioridad
         FROM tareas t
         INNER JOIN clases c ON t.id_clase = c.id
         WHERE t.completada = 0
         ORDER BY t.fecha_limite ASC",
    )?;
    let rows = stmt
        .query_map([], task_from_joined_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
