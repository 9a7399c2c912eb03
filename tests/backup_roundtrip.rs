use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_daemon() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_horariod");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn horariod");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({ "id": id, "method": method, "params": params });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    serde_json::from_str(line.trim()).expect("parse response json")
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "expected ok for {}: {}",
        method,
        value
    );
    value.get("result").cloned().expect("result")
}

fn error_code(value: &serde_json::Value) -> &str {
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

#[test]
fn export_then_import_restores_classes_but_never_tasks() {
    let workspace = temp_dir("horariod-backup-roundtrip");
    let (mut child, mut stdin, mut reader) = spawn_daemon();

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "classes.create",
        json!({
            "name": "Fisica",
            "teacher": "Prof. Lema",
            "room": "A-101",
            "days": "Mar,Jue",
            "startTime": "10:00",
            "endTime": "11:30",
            "color": "#FF5722"
        }),
    );
    let class_id = created.get("classId").and_then(|v| v.as_i64()).unwrap();
    request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "tasks.create",
        json!({
            "name": "Reporte",
            "dueDate": "2026-09-15",
            "classId": class_id,
            "type": "Tarea",
            "priority": "Media"
        }),
    );

    let exported = request_ok(&mut stdin, &mut reader, "4", "backup.export", json!({}));
    assert_eq!(exported.get("classes").and_then(|v| v.as_i64()), Some(1));
    assert_eq!(exported.get("tasks").and_then(|v| v.as_i64()), Some(1));
    let backup_path = exported
        .get("path")
        .and_then(|v| v.as_str())
        .expect("backup path");
    assert!(std::path::Path::new(backup_path).is_file());

    // Classes come back as fresh rows; tasks are only counted.
    let imported = request_ok(&mut stdin, &mut reader, "5", "backup.import", json!({}));
    assert_eq!(
        imported.get("classesRestored").and_then(|v| v.as_i64()),
        Some(1)
    );
    assert_eq!(
        imported.get("tasksSkipped").and_then(|v| v.as_i64()),
        Some(1)
    );

    let classes = request_ok(&mut stdin, &mut reader, "6", "classes.list", json!({}));
    let classes = classes.get("classes").and_then(|v| v.as_array()).unwrap();
    assert_eq!(classes.len(), 2);
    let ids: Vec<i64> = classes
        .iter()
        .map(|c| c.get("id").and_then(|v| v.as_i64()).unwrap())
        .collect();
    assert_ne!(ids[0], ids[1]);
    for class in classes {
        assert_eq!(class.get("name").and_then(|v| v.as_str()), Some("Fisica"));
        assert_eq!(
            class.get("color").and_then(|v| v.as_str()),
            Some("#FF5722")
        );
    }

    let tasks = request_ok(&mut stdin, &mut reader, "7", "tasks.list", json!({}));
    assert_eq!(tasks.get("tasks").and_then(|v| v.as_array()).unwrap().len(), 1);

    // Importing again stacks another copy on top.
    request_ok(&mut stdin, &mut reader, "8", "backup.import", json!({}));
    let classes = request_ok(&mut stdin, &mut reader, "9", "classes.list", json!({}));
    assert_eq!(classes.get("classes").and_then(|v| v.as_array()).unwrap().len(), 3);

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn import_without_prior_backup_reports_not_found() {
    let workspace = temp_dir("horariod-backup-missing");
    let (mut child, mut stdin, mut reader) = spawn_daemon();

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let resp = request(&mut stdin, &mut reader, "2", "backup.import", json!({}));
    assert_eq!(error_code(&resp), "not_found");

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn import_rejects_malformed_backup_file() {
    let workspace = temp_dir("horariod-backup-garbage");
    let (mut child, mut stdin, mut reader) = spawn_daemon();

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    std::fs::write(workspace.join("backup_horario.json"), "not json at all")
        .expect("write garbage backup");

    let resp = request(&mut stdin, &mut reader, "2", "backup.import", json!({}));
    assert_eq!(error_code(&resp), "bad_backup");

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn import_tolerates_legacy_document_shape() {
    let workspace = temp_dir("horariod-backup-color");
    let (mut child, mut stdin, mut reader) = spawn_daemon();

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    // Older exports omitted the color field and the tareas collection.
    let legacy = json!({
        "clases": [{
            "nombre": "Historia",
            "profesor": "Prof. Soto",
            "salon": "C-3",
            "dias": "Vie",
            "hora_inicio": "12:00",
            "hora_fin": "13:00"
        }]
    });
    std::fs::write(
        workspace.join("backup_horario.json"),
        serde_json::to_string(&legacy).unwrap(),
    )
    .expect("write legacy backup");

    let imported = request_ok(&mut stdin, &mut reader, "2", "backup.import", json!({}));
    assert_eq!(
        imported.get("classesRestored").and_then(|v| v.as_i64()),
        Some(1)
    );
    assert_eq!(
        imported.get("tasksSkipped").and_then(|v| v.as_i64()),
        Some(0)
    );
    let classes = request_ok(&mut stdin, &mut reader, "3", "classes.list", json!({}));
    assert_eq!(
        classes.pointer("/classes/0/color").and_then(|v| v.as_str()),
        Some("#6200EE")
    );

    drop(stdin);
    let _ = child.wait();
    let _ = std::fs::remove_dir_all(workspace);
}
