use std::cell::RefCell;
use std::path::{Path, PathBuf};

use phpstack_platform::{ActualUser, FileOwner, OwnershipError};
use phpstack_shell::{
    ConfigTarget, DEFAULT_MARKER, DEFAULT_SHEBANG, LOCAL_BIN_DETECT_PATTERN, LOCAL_BIN_PATH,
    PHP_BIN_PATH, PHP_DETECT_PATTERN, PathExport, PathExportPlan, configure_universal_shell_path,
    configure_user_target,
};

#[derive(Default)]
struct RecordingOwner {
    calls: RefCell<Vec<(PathBuf, u32, u32)>>,
}

impl FileOwner for RecordingOwner {
    fn set_owner(&self, path: &Path, user: &ActualUser) -> Result<(), OwnershipError> {
        self.calls
            .borrow_mut()
            .push((path.to_path_buf(), user.uid, user.gid));
        Ok(())
    }
}

fn plan(root: &Path) -> PathExportPlan {
    PathExportPlan {
        marker: DEFAULT_MARKER.to_string(),
        exports: vec![
            PathExport::new(PHP_BIN_PATH, PHP_DETECT_PATTERN).expect("pattern should compile"),
            PathExport::new(LOCAL_BIN_PATH, LOCAL_BIN_DETECT_PATTERN)
                .expect("pattern should compile"),
        ],
        system_fragment: root.join("etc").join("profile.d").join("phpstack-path.sh"),
        shebang: DEFAULT_SHEBANG.to_string(),
    }
}

fn alice(home: &Path) -> ActualUser {
    ActualUser {
        name: "alice".to_string(),
        uid: 1000,
        gid: 1000,
        home: home.to_path_buf(),
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("config file should be readable")
}

#[test]
fn empty_bashrc_gets_marker_and_both_exports_once() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let home = temp_dir.path().join("home").join("alice");
    std::fs::create_dir_all(&home).expect("create home");
    std::fs::write(home.join(".bashrc"), "").expect("write bashrc");
    let plan = plan(temp_dir.path());
    let owner = RecordingOwner::default();

    configure_universal_shell_path(&plan, &alice(&home), &owner).expect("first run");
    let after_first = read(&home.join(".bashrc"));

    assert_eq!(
        after_first,
        format!(
            "\n{DEFAULT_MARKER}\nexport PATH=$PATH:/usr/bin/php\nexport PATH=$PATH:/usr/local/bin\n"
        )
    );

    configure_universal_shell_path(&plan, &alice(&home), &owner).expect("second run");

    assert_eq!(read(&home.join(".bashrc")), after_first);
}

#[test]
fn every_user_file_is_byte_identical_after_a_second_run() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let home = temp_dir.path().join("home");
    std::fs::create_dir_all(&home).expect("create home");
    std::fs::write(home.join(".profile"), "# ~/.profile\numask 022").expect("write profile");
    std::fs::write(
        home.join(".zshrc"),
        format!("{DEFAULT_MARKER}\nexport PATH=$PATH:/usr/local/bin\n"),
    )
    .expect("write zshrc");
    let plan = plan(temp_dir.path());

    configure_universal_shell_path(&plan, &alice(&home), &RecordingOwner::default())
        .expect("first run");
    assert_eq!(
        read(&home.join(".profile")),
        format!(
            "# ~/.profile\numask 022\n{DEFAULT_MARKER}\nexport PATH=$PATH:/usr/bin/php\nexport PATH=$PATH:/usr/local/bin\n"
        )
    );
    let snapshot: Vec<String> = [".bashrc", ".zshrc", ".profile"]
        .iter()
        .map(|name| read(&home.join(name)))
        .collect();

    let second = configure_universal_shell_path(&plan, &alice(&home), &RecordingOwner::default())
        .expect("second run");

    for (name, before) in [".bashrc", ".zshrc", ".profile"].iter().zip(&snapshot) {
        assert_eq!(&read(&home.join(name)), before, "{name} changed on re-run");
    }
    assert_eq!(second.value.modified_count(), 0);
}

#[test]
fn existing_php_export_only_suppresses_php_insertion() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let path = temp_dir.path().join(".bashrc");
    std::fs::write(&path, "export PATH=\"/opt/php/bin:$PATH\"\n").expect("write bashrc");
    let plan = plan(temp_dir.path());

    let applied = configure_user_target(
        &ConfigTarget::user(path.clone()),
        &plan,
        &alice(temp_dir.path()),
        &RecordingOwner::default(),
    )
    .expect("configure bashrc");

    assert_eq!(applied.value.inserted, vec!["/usr/local/bin".to_string()]);
    let content = read(&path);
    assert!(!content.contains("export PATH=$PATH:/usr/bin/php"));
    assert_eq!(content.matches("export PATH=$PATH:/usr/local/bin").count(), 1);
}

#[test]
fn existing_marker_is_not_repeated() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let path = temp_dir.path().join(".zshrc");
    std::fs::write(
        &path,
        format!("{DEFAULT_MARKER}\nsetopt autocd\nexport PATH=$PATH:/usr/bin/php\n"),
    )
    .expect("write zshrc");
    let plan = plan(temp_dir.path());

    configure_user_target(
        &ConfigTarget::user(path.clone()),
        &plan,
        &alice(temp_dir.path()),
        &RecordingOwner::default(),
    )
    .expect("configure zshrc");

    let content = read(&path);
    assert_eq!(content.matches(DEFAULT_MARKER).count(), 1);
    assert!(content.ends_with("export PATH=$PATH:/usr/local/bin\n"));
}

#[test]
fn created_and_modified_files_are_handed_to_the_actual_user() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let home = temp_dir.path().join("home");
    std::fs::create_dir_all(&home).expect("create home");
    let plan = plan(temp_dir.path());
    let owner = RecordingOwner::default();

    let applied =
        configure_universal_shell_path(&plan, &alice(&home), &owner).expect("configure");

    let calls = owner.calls.borrow();
    for name in [".bashrc", ".zshrc", ".profile"] {
        let path = home.join(name);
        assert!(
            calls.iter().any(|(p, uid, gid)| p == &path && *uid == 1000 && *gid == 1000),
            "{name} was not chowned to alice"
        );
    }
    assert!(calls.iter().all(|(_, uid, _)| *uid != 0));
    assert!(calls.iter().all(|(p, _, _)| p != &plan.system_fragment));
    assert!(applied.warnings.is_empty());
}

#[test]
fn system_fragment_is_exactly_the_canonical_block() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let home = temp_dir.path().join("home");
    std::fs::create_dir_all(&home).expect("create home");
    let plan = plan(temp_dir.path());
    std::fs::create_dir_all(plan.system_fragment.parent().expect("fragment has a parent"))
        .expect("create profile.d");
    std::fs::write(&plan.system_fragment, "export PATH=/old\nexport PATH=/older\n")
        .expect("write stale fragment");

    configure_universal_shell_path(&plan, &alice(&home), &RecordingOwner::default())
        .expect("configure");

    let content = read(&plan.system_fragment);
    assert_eq!(content.lines().count(), 4);
    assert_eq!(
        content,
        format!(
            "{DEFAULT_SHEBANG}\n{DEFAULT_MARKER}\nexport PATH=$PATH:/usr/bin/php\nexport PATH=$PATH:/usr/local/bin\n"
        )
    );

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&plan.system_fragment)
            .expect("fragment metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}

#[test]
fn non_utf8_startup_file_is_configured_without_touching_its_bytes() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let home = temp_dir.path().join("home");
    std::fs::create_dir_all(&home).expect("create home");
    let original: &[u8] = b"# caf\xe9 settings\nalias ll='ls -l'\n";
    std::fs::write(home.join(".bashrc"), original).expect("write bashrc");
    let plan = plan(temp_dir.path());

    let applied = configure_universal_shell_path(&plan, &alice(&home), &RecordingOwner::default())
        .expect("latin-1 bashrc should not abort the run");

    let mut expected = original.to_vec();
    expected.extend_from_slice(
        format!(
            "\n{DEFAULT_MARKER}\nexport PATH=$PATH:/usr/bin/php\nexport PATH=$PATH:/usr/local/bin\n"
        )
        .as_bytes(),
    );
    assert_eq!(
        std::fs::read(home.join(".bashrc")).expect("read bashrc"),
        expected
    );
    assert_eq!(applied.value.outcomes.len(), 4);
    assert!(home.join(".zshrc").exists());
    assert!(home.join(".profile").exists());
    assert_eq!(read(&plan.system_fragment), plan.fragment_content());

    let second = configure_universal_shell_path(&plan, &alice(&home), &RecordingOwner::default())
        .expect("second run");
    assert_eq!(second.value.modified_count(), 0);
}
