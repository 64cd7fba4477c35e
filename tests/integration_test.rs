use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn taskstore(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("taskstore").unwrap();
    cmd.current_dir(dir);
    cmd.env_remove("TASKSTORE_DB");
    cmd
}

fn init_with_users(dir: &TempDir) {
    taskstore(dir).arg("init").assert().success();
    taskstore(dir)
        .args(["user", "add", "Alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created user #1: Alice"));
    taskstore(dir)
        .args(["user", "add", "Bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created user #2: Bob"));
}

#[test]
fn test_full_workflow() {
    let temp_dir = TempDir::new().unwrap();
    init_with_users(&temp_dir);

    // Add a task authored by Alice, assigned to Bob
    taskstore(&temp_dir)
        .args([
            "add",
            "Fix login issue",
            "--author",
            "1",
            "--assigned",
            "2",
            "--content",
            "The login form throws an error on submit",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task #1"));

    // Alice has it, Bob has nothing yet
    taskstore(&temp_dir)
        .args(["list", "--author", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fix login issue"));
    taskstore(&temp_dir)
        .args(["list", "--author", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found."));

    // Label it
    taskstore(&temp_dir)
        .args(["label", "add", "Bug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created label #1: Bug"));
    taskstore(&temp_dir)
        .args(["tag", "1", "1"])
        .assert()
        .success();
    taskstore(&temp_dir)
        .args(["list", "--label", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fix login issue"));

    // Edit and close it
    taskstore(&temp_dir)
        .args(["update", "1", "--title", "Login fixed", "--close"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated task #1: Login fixed"));
    taskstore(&temp_dir)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Login fixed"))
        .stdout(predicate::str::contains("(open)").not())
        .stdout(predicate::str::contains("The login form throws an error on submit"));

    // Delete it, twice
    taskstore(&temp_dir)
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted task #1"));
    taskstore(&temp_dir)
        .args(["delete", "1"])
        .assert()
        .success();
    taskstore(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found."));
}

#[test]
fn test_update_missing_task_is_not_an_error() {
    let temp_dir = TempDir::new().unwrap();
    init_with_users(&temp_dir);

    taskstore(&temp_dir)
        .args(["update", "42", "--title", "Nothing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing updated"));
}

#[test]
fn test_show_missing_task_fails() {
    let temp_dir = TempDir::new().unwrap();
    init_with_users(&temp_dir);

    taskstore(&temp_dir)
        .args(["show", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task #7 not found"));
}

#[test]
fn test_add_with_unknown_author_fails() {
    let temp_dir = TempDir::new().unwrap();
    init_with_users(&temp_dir);

    taskstore(&temp_dir)
        .args(["add", "Orphan", "--author", "9", "--assigned", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Constraint violated"));
}

#[test]
fn test_requires_init() {
    let temp_dir = TempDir::new().unwrap();

    taskstore(&temp_dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn test_list_json() {
    let temp_dir = TempDir::new().unwrap();
    init_with_users(&temp_dir);
    taskstore(&temp_dir)
        .args(["add", "Add search feature", "--author", "2", "--assigned", "1"])
        .assert()
        .success();

    let output = taskstore(&temp_dir)
        .args(["list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let tasks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tasks[0]["title"], "Add search feature");
    assert_eq!(tasks[0]["author_id"], 2);
    assert_eq!(tasks[0]["closed"], 0);
}

#[test]
fn test_db_flag_selects_file() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("custom.db");
    let db = db.to_str().unwrap();

    taskstore(&temp_dir)
        .args(["--db", db, "init"])
        .assert()
        .success();
    assert!(temp_dir.path().join("custom.db").exists());
    assert!(!temp_dir.path().join("taskstore.db").exists());
}
