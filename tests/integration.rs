use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn jz_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("jz");
    path
}

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 13, 10, 26, 10, 0, 1, 2, 3];

/// Lays out a Joplin export and an empty Zola site:
///
/// ```text
/// joplin/Website/notes/My Note.md   -> converted
/// joplin/Website/notes/_index.md    -> skipped (underscore)
/// joplin/Website/books/draft.md     -> skipped (skip dir)
/// joplin/_resources/x1.png
/// site/content/notes/
/// site/static/images/
/// ```
fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let notes = root.join("joplin/Website/notes");
    fs::create_dir_all(&notes).unwrap();
    fs::create_dir_all(root.join("joplin/Website/books")).unwrap();
    fs::create_dir_all(root.join("joplin/_resources")).unwrap();
    fs::create_dir_all(root.join("site/content/notes")).unwrap();
    fs::create_dir_all(root.join("site/static/images")).unwrap();

    fs::write(
        notes.join("My Note.md"),
        "---\ntitle: Hi\ncreated: 2020-01-01\ntags: [a, b]\n---\n![](../../_resources/x1.png)\n",
    )
    .unwrap();
    // Both skipped files reference images that do not exist, so the run
    // only succeeds if they are never read.
    fs::write(
        notes.join("_index.md"),
        "---\ntitle: Index\n---\n![](../../_resources/nothere1.png)\n",
    )
    .unwrap();
    fs::write(
        root.join("joplin/Website/books/draft.md"),
        "---\ntitle: Draft\n---\n![](../../_resources/nothere2.png)\n",
    )
    .unwrap();
    fs::write(root.join("joplin/_resources/x1.png"), PNG_BYTES).unwrap();

    let config_content = format!(
        r#"[source]
root = "{root}/joplin"
skip_dirs = ["books", "about"]

[destination]
root = "{root}/site"
"#,
        root = root.display()
    );

    let config_path = root.join("jz.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_jz(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = jz_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("--progress")
        .arg("off")
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run jz binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn split_page(page: &str) -> (serde_yaml::Value, String) {
    let rest = page.strip_prefix("---\n").expect("page starts with ---");
    let end = rest.find("\n---\n").expect("header is closed");
    let header = serde_yaml::from_str(&rest[..end + 1]).unwrap();
    (header, rest[end + 5..].to_string())
}

#[test]
fn test_run_converts_copies_and_deletes() {
    let (tmp, config_path) = setup_test_env();
    let root = tmp.path();

    let (stdout, stderr, success) = run_jz(&config_path, &["run"]);
    assert!(success, "run failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("notes converted: 1"));
    assert!(stdout.contains("notes written: 1"));
    assert!(stdout.contains("resources copied: 1"));
    assert!(stdout.contains("source deleted: yes"));
    assert!(stdout.contains("ok"));

    let page = fs::read_to_string(root.join("site/content/notes/my-note.md")).unwrap();
    let (header, body) = split_page(&page);
    assert_eq!(header["title"].as_str(), Some("Hi"));
    assert_eq!(header["date"].as_str(), Some("2020-01-01"));
    let tags: Vec<&str> = header["taxonomies"]["tags"]
        .as_sequence()
        .unwrap()
        .iter()
        .filter_map(|t| t.as_str())
        .collect();
    assert_eq!(tags, vec!["a", "b"]);
    assert!(header.get("created").is_none());
    assert_eq!(body, "![](/images/x1.png)\n");

    assert_eq!(
        fs::read(root.join("site/static/images/x1.png")).unwrap(),
        PNG_BYTES
    );

    // Skipped files produce nothing.
    assert!(!root.join("site/content/notes/_index.md").exists());
    assert!(!root.join("site/content/notes/index.md").exists());
    assert!(!root.join("site/content/books").exists());

    assert!(!root.join("joplin").exists());
}

#[test]
fn test_run_keep_source() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_jz(&config_path, &["run", "--keep-source"]);
    assert!(success, "run failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("source deleted: no"));
    assert!(tmp.path().join("joplin/Website/notes/My Note.md").exists());
    assert!(tmp.path().join("site/content/notes/my-note.md").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_jz(&config_path, &["run", "--dry-run"]);
    assert!(success, "dry run failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("run (dry-run)"));
    assert!(stdout.contains("notes converted: 1"));
    assert!(stdout.contains("notes written: 0"));
    assert!(stdout.contains("resources copied: 0"));
    assert!(!tmp.path().join("site/content/notes/my-note.md").exists());
    assert!(!tmp.path().join("site/static/images/x1.png").exists());
    assert!(tmp.path().join("joplin").exists());
}

#[test]
fn test_malformed_header_aborts() {
    let (tmp, config_path) = setup_test_env();
    fs::write(
        tmp.path().join("joplin/Website/notes/broken.md"),
        "---\ntitle: never closed\nbody text\n",
    )
    .unwrap();

    let (_, stderr, success) = run_jz(&config_path, &["run"]);
    assert!(!success, "run should fail on a malformed header");
    assert_eq!(stderr.matches("malformed front matter").count(), 1);
    assert!(stderr.contains("broken.md"));
    assert!(tmp.path().join("joplin").exists());
}

#[test]
fn test_missing_destination_dir_aborts() {
    let (tmp, config_path) = setup_test_env();
    fs::remove_dir_all(tmp.path().join("site/content/notes")).unwrap();

    let (_, stderr, success) = run_jz(&config_path, &["run"]);
    assert!(!success);
    assert!(stderr.contains("could not write file"));
    assert!(tmp.path().join("joplin").exists());
}

#[test]
fn test_missing_resource_aborts_without_rollback() {
    let (tmp, config_path) = setup_test_env();
    fs::remove_file(tmp.path().join("joplin/_resources/x1.png")).unwrap();

    let (_, stderr, success) = run_jz(&config_path, &["run"]);
    assert!(!success);
    assert!(stderr.contains("missing resource"));
    // Notes written before the copy phase stay; the export is untouched.
    assert!(tmp.path().join("site/content/notes/my-note.md").exists());
    assert!(tmp.path().join("joplin/Website/notes/My Note.md").exists());
}

#[test]
fn test_check_reports_layout() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_jz(&config_path, &["check"]);
    assert!(success);
    assert!(stdout.contains("notes"));
    assert!(stdout.contains("assets"));
    assert!(!stdout.contains("MISSING"));

    fs::remove_dir_all(tmp.path().join("site/static/images")).unwrap();
    let (stdout, stderr, success) = run_jz(&config_path, &["check"]);
    assert!(!success);
    assert!(stdout.contains("MISSING"));
    assert!(stderr.contains("assets"));
}

#[test]
fn test_convert_prints_page() {
    let (tmp, config_path) = setup_test_env();
    let note = tmp.path().join("joplin/Website/notes/My Note.md");

    let (stdout, stderr, success) = run_jz(&config_path, &["convert", note.to_str().unwrap()]);
    assert!(success, "convert failed: stderr={}", stderr);
    let (header, body) = split_page(&stdout);
    assert_eq!(header["title"].as_str(), Some("Hi"));
    assert_eq!(body, "![](/images/x1.png)\n");
    // convert never touches disk
    assert!(!tmp.path().join("site/content/notes/my-note.md").exists());
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_jz(&tmp.path().join("nope.toml"), &["check"]);
    assert!(!success);
    assert_eq!(stderr.matches("Failed to read config file").count(), 1);
    assert!(stderr.contains("ERROR"));
}
