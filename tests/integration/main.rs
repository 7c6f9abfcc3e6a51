//! Integration tests for the classroom CLI

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    /// Command isolated in its own state directory
    fn classroom(home: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("classroom");
        cmd.env("CLASSROOM_HOME", home)
            .env("CLASSROOM_PLAIN", "1")
            .env_remove("CLASSROOM_CONFIG")
            .env_remove("CLASSROOM_OWNER")
            .env_remove("RUST_LOG");
        cmd
    }

    fn node_available() -> bool {
        std::process::Command::new("node")
            .arg("--version")
            .output()
            .is_ok_and(|output| output.status.success())
    }

    #[test]
    fn help_displays() {
        let home = TempDir::new().unwrap();
        classroom(home.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("coding workspace"));
    }

    #[test]
    fn version_displays() {
        let home = TempDir::new().unwrap();
        classroom(home.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("classroom"));
    }

    #[test]
    fn config_path_uses_home() {
        let home = TempDir::new().unwrap();
        classroom(home.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let home = TempDir::new().unwrap();
        classroom(home.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[sandbox]"))
            .stdout(predicate::str::contains("interpreter = \"node\""));
    }

    #[test]
    fn config_init_then_refuses_overwrite() {
        let home = TempDir::new().unwrap();
        classroom(home.path())
            .args(["config", "init"])
            .assert()
            .success();
        assert!(home.path().join("config.toml").exists());

        classroom(home.path())
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--force"));
    }

    #[test]
    fn starter_tree() {
        let home = TempDir::new().unwrap();
        classroom(home.path())
            .args(["tree", "--format", "plain"])
            .assert()
            .success()
            .stdout("index.html\nscript.js\nstyle.css\n");
    }

    #[test]
    fn files_persist_between_invocations() {
        let home = TempDir::new().unwrap();
        classroom(home.path())
            .args(["file", "new", "app.js", "--folder", "src/lib", "--content", "let x = 1;"])
            .assert()
            .success();

        classroom(home.path())
            .args(["file", "show", "/src/lib/app.js"])
            .assert()
            .success()
            .stdout("let x = 1;\n");

        classroom(home.path())
            .args(["tree", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("src/\n  lib/\n    app.js\n"));

        assert!(home.path().join("store").join("projects.json").exists());
    }

    #[test]
    fn rename_write_and_remove() {
        let home = TempDir::new().unwrap();
        classroom(home.path())
            .args(["file", "rename", "script.js", "main.js"])
            .assert()
            .success();
        classroom(home.path())
            .args(["file", "write", "/main.js", "--content", "console.log(2)"])
            .assert()
            .success();
        classroom(home.path())
            .args(["file", "show", "main.js"])
            .assert()
            .success()
            .stdout(predicate::str::contains("console.log(2)"));

        classroom(home.path())
            .args(["file", "rm", "/main.js"])
            .assert()
            .success();
        classroom(home.path())
            .args(["file", "show", "/main.js"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("File not found"));
    }

    #[test]
    fn file_write_reads_stdin() {
        let home = TempDir::new().unwrap();
        classroom(home.path())
            .args(["file", "write", "/script.js"])
            .write_stdin("console.log('from stdin');\n")
            .assert()
            .success();

        classroom(home.path())
            .args(["file", "show", "/script.js"])
            .assert()
            .success()
            .stdout(predicate::str::contains("from stdin"));
    }

    #[test]
    fn folder_removal_cascades() {
        let home = TempDir::new().unwrap();
        classroom(home.path())
            .args(["file", "new", "x.js", "-f", "/abc/"])
            .assert()
            .success();
        classroom(home.path())
            .args(["file", "new", "y.js", "-f", "/abcdef/"])
            .assert()
            .success();

        classroom(home.path())
            .args(["folder", "rm", "/abc/"])
            .assert()
            .success();

        classroom(home.path())
            .args(["tree", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("abcdef/\n  y.js"))
            .stdout(predicate::str::contains("x.js").not());
    }

    #[test]
    fn owners_have_separate_projects() {
        let home = TempDir::new().unwrap();
        classroom(home.path())
            .args(["--owner", "s1", "--role", "student", "project", "clear", "--yes"])
            .assert()
            .success();

        classroom(home.path())
            .args(["--owner", "s1", "tree", "--format", "plain"])
            .assert()
            .success()
            .stdout("");
        classroom(home.path())
            .args(["tree", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("index.html"));
    }

    #[test]
    fn project_clear_needs_confirmation() {
        let home = TempDir::new().unwrap();
        classroom(home.path())
            .args(["project", "clear"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--yes"));
        classroom(home.path())
            .args(["tree", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("index.html"));
    }

    #[test]
    fn project_export_import_roundtrip() {
        let home = TempDir::new().unwrap();
        let export = home.path().join("project.json");
        classroom(home.path())
            .args(["file", "new", "notes.txt", "--content", "keep me"])
            .assert()
            .success();
        classroom(home.path())
            .args(["project", "export", "-o"])
            .arg(&export)
            .assert()
            .success();

        classroom(home.path())
            .args(["--owner", "other", "project", "import"])
            .arg(&export)
            .assert()
            .success();
        classroom(home.path())
            .args(["--owner", "other", "file", "show", "/notes.txt"])
            .assert()
            .success()
            .stdout("keep me\n");
    }

    #[test]
    fn project_import_rejects_garbage() {
        let home = TempDir::new().unwrap();
        let bad = home.path().join("bad.json");
        std::fs::write(&bad, "{\"files\": 7}").unwrap();

        classroom(home.path())
            .args(["project", "import"])
            .arg(&bad)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid snapshot"));
    }

    #[test]
    fn tabs_persist() {
        let home = TempDir::new().unwrap();
        classroom(home.path())
            .args(["tab", "open", "/index.html"])
            .assert()
            .success();
        classroom(home.path())
            .args(["tab", "open", "/style.css"])
            .assert()
            .success();
        classroom(home.path())
            .args(["tab", "close", "/style.css"])
            .assert()
            .success();

        classroom(home.path())
            .args(["tab", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("* /index.html"))
            .stdout(predicate::str::contains("style.css").not());
    }

    #[test]
    fn db_snapshot_roundtrip() {
        let home = TempDir::new().unwrap();
        let snapshot = home.path().join("snapshot.json");
        std::fs::write(
            &snapshot,
            r#"{"students": [{"id": "s1", "name": "Ada"}], "homework": "broken"}"#,
        )
        .unwrap();

        classroom(home.path())
            .args(["db", "import"])
            .arg(&snapshot)
            .assert()
            .success()
            .stdout(predicate::str::contains("Imported students"))
            .stdout(predicate::str::contains("Skipped homework"));

        classroom(home.path())
            .args(["db", "stats", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("students\t1"));

        classroom(home.path())
            .args(["db", "export"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"Ada\""))
            .stdout(predicate::str::contains("\"timestamp\""));

        classroom(home.path())
            .args(["db", "reset", "--yes"])
            .assert()
            .success();
        classroom(home.path())
            .args(["db", "stats", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("students\t0"));
    }

    #[test]
    fn legacy_data_is_imported_on_first_run() {
        let home = TempDir::new().unwrap();
        let legacy = home.path().join("legacy");
        std::fs::create_dir_all(&legacy).unwrap();
        std::fs::write(
            legacy.join("teachers.json"),
            r#"[{"id": "t1", "name": "Grace"}]"#,
        )
        .unwrap();

        classroom(home.path())
            .args(["db", "stats", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("teachers\t1"));
    }

    #[test]
    fn run_with_missing_interpreter_reports_error() {
        let home = TempDir::new().unwrap();
        std::fs::write(
            home.path().join("config.toml"),
            "[sandbox]\ninterpreter = \"classroom-no-such-interpreter\"\n",
        )
        .unwrap();
        classroom(home.path())
            .args(["project", "clear", "--yes"])
            .assert()
            .success();
        classroom(home.path())
            .args(["file", "new", "a.js"])
            .assert()
            .success();

        classroom(home.path())
            .arg("run")
            .assert()
            .success()
            .stderr(predicate::str::contains("Interpreter not found"));
    }

    #[test]
    fn run_nothing() {
        let home = TempDir::new().unwrap();
        classroom(home.path())
            .args(["project", "clear", "--yes"])
            .assert()
            .success();
        classroom(home.path())
            .args(["file", "new", "notes.txt"])
            .assert()
            .success();

        classroom(home.path())
            .arg("run")
            .assert()
            .success()
            .stdout(predicate::str::contains("nothing to run"));
    }

    #[test]
    fn run_script_with_node() {
        if !node_available() {
            eprintln!("skipping: node not available");
            return;
        }
        let home = TempDir::new().unwrap();
        classroom(home.path())
            .args(["project", "clear", "--yes"])
            .assert()
            .success();
        classroom(home.path())
            .args(["file", "new", "a.js", "--content", "console.log('sum', 2 + 3);"])
            .assert()
            .success();

        classroom(home.path())
            .arg("run")
            .assert()
            .success()
            .stdout(predicate::str::contains("sum 5"))
            .stdout(predicate::str::contains("execution finished"));
    }

    #[test]
    fn run_document_writes_preview() {
        if !node_available() {
            eprintln!("skipping: node not available");
            return;
        }
        let home = TempDir::new().unwrap();
        let preview = home.path().join("preview.html");

        classroom(home.path())
            .args(["run", "--preview"])
            .arg(&preview)
            .assert()
            .success()
            .stdout(predicate::str::contains("preview updated"))
            .stdout(predicate::str::contains("Hello, World!"))
            .stderr(predicate::str::contains("Error").not());

        let markup = std::fs::read_to_string(&preview).unwrap();
        assert!(markup.contains("<style>"));
        assert!(markup.contains("console.log('Hello, World!');"));
    }
}
