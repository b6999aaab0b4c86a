use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Binary under test with the config file pointed at a path that does not exist,
/// so a developer's own config never leaks into these runs.
fn ext_sorter(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ext_sorter").unwrap();
    cmd.env("EXT_SORTER_CONFIG", config_dir.join("absent.xml"));
    cmd
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn sorts_tree_from_positional_args() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    let dst = td.path().join("dst");
    fs::create_dir_all(src.join("nested")).unwrap();
    fs::create_dir(&dst).unwrap();
    fs::write(src.join("one.txt"), "1").unwrap();
    fs::write(src.join("nested").join("one.txt"), "2").unwrap();

    let output = ext_sorter(td.path())
        .arg(&src)
        .arg(&dst)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout_of(&output).contains("Copied 2 files in"), "{}", stdout_of(&output));
    assert!(dst.join("txt").join("one.txt").is_file());
    assert!(dst.join("txt").join("one_1.txt").is_file());
}

#[test]
fn prompts_for_missing_paths_on_stdin() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    let dst = td.path().join("dst");
    fs::create_dir(&src).unwrap();
    fs::create_dir(&dst).unwrap();
    fs::write(src.join("notes.md"), "n").unwrap();

    let answers = format!("{}\n'{}'\n", src.display(), dst.display());
    let output = ext_sorter(td.path()).write_stdin(answers).output().unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Enter the source folder"), "{stdout}");
    assert!(stdout.contains("Enter the target folder"), "{stdout}");
    assert!(stdout.contains("Copied 1 files in"), "{stdout}");
    assert!(dst.join("md").join("notes.md").is_file());
}

#[test]
fn missing_source_exits_with_error_and_creates_nothing() {
    let td = tempdir().unwrap();
    let dst = td.path().join("dst");
    fs::create_dir(&dst).unwrap();

    let output = ext_sorter(td.path())
        .arg(td.path().join("missing"))
        .arg(&dst)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Source folder does not exist"), "{stderr}");
    assert_eq!(fs::read_dir(&dst).unwrap().count(), 0);
}

#[test]
fn closed_stdin_without_paths_fails() {
    let td = tempdir().unwrap();
    let output = ext_sorter(td.path()).write_stdin("").output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn dry_run_flag_leaves_target_empty() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    let dst = td.path().join("dst");
    fs::create_dir(&src).unwrap();
    fs::create_dir(&dst).unwrap();
    fs::write(src.join("a.csv"), "x,y").unwrap();

    let output = ext_sorter(td.path())
        .args(["--dry-run", "-j", "2"])
        .arg(&src)
        .arg(&dst)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("Copied 1 files in"));
    assert_eq!(fs::read_dir(&dst).unwrap().count(), 0);
}

#[test]
fn roots_can_come_from_config_file() {
    let td = tempdir().unwrap();
    let src = td.path().join("src");
    let dst = td.path().join("dst");
    fs::create_dir(&src).unwrap();
    fs::create_dir(&dst).unwrap();
    fs::write(src.join("pic.png"), [0x89, b'P', b'N', b'G']).unwrap();
    let cfg = td.path().join("config.xml");
    fs::write(
        &cfg,
        format!(
            "<config><source_dir>{}</source_dir><target_dir>{}</target_dir><workers>2</workers></config>",
            src.display(),
            dst.display()
        ),
    )
    .unwrap();

    let output = Command::cargo_bin("ext_sorter")
        .unwrap()
        .env("EXT_SORTER_CONFIG", &cfg)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(dst.join("png").join("pic.png").is_file());
}

#[test]
fn init_config_writes_template_once() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("conf").join("config.xml");

    let first = Command::cargo_bin("ext_sorter")
        .unwrap()
        .env("EXT_SORTER_CONFIG", &cfg)
        .arg("--init-config")
        .output()
        .unwrap();
    assert!(first.status.success());
    let text = fs::read_to_string(&cfg).unwrap();
    assert!(text.contains("<config>"));

    let second = Command::cargo_bin("ext_sorter")
        .unwrap()
        .env("EXT_SORTER_CONFIG", &cfg)
        .arg("--init-config")
        .output()
        .unwrap();
    assert!(!second.status.success());
}

#[test]
fn print_config_shows_env_path() {
    let td = tempdir().unwrap();
    let output = ext_sorter(td.path()).arg("--print-config").output().unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("absent.xml"));
}
