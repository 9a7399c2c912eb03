use rusqlite::Connection;
use std::path::Path;

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join("horario.sqlite3");
    let conn = Connection::open(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Table and column names are part of the on-disk interface shared with
/// earlier builds of the app, so they stay in Spanish.
pub(crate) fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS clases(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre TEXT NOT NULL,
            profesor TEXT NOT NULL,
            salon TEXT NOT NULL,
            dias TEXT NOT NULL,
            hora_inicio TEXT NOT NULL,
            hora_fin TEXT NOT NULL,
            color TEXT NOT NULL DEFAULT '#6200EE'
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS tareas(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre_tarea TEXT NOT NULL,
            fecha_limite TEXT NOT NULL,
            id_clase INTEGER NOT NULL,
            completada INTEGER NOT NULL DEFAULT 0,
            tipo TEXT NOT NULL,
            prioridad TEXT NOT NULL,
            FOREIGN KEY(id_clase) REFERENCES clases(id) ON DELETE CASCADE
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_tareas_clase ON tareas(id_clase)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_tareas_completada ON tareas(completada)",
        [],
    )?;

    Ok(())
}
