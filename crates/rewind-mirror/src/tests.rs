use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use super::*;

static TEST_ROOT_COUNTER: AtomicU64 = AtomicU64::new(0);

const ORIGINAL_MIRRORLIST: &[u8] = b"##\n## Arch Linux repository mirrorlist\n##\n\n## Germany\nServer = https://mirror.example.test/archlinux/$repo/os/$arch\n#Server = https://other.example.test/$repo/os/$arch\n";

#[test]
fn mirror_server_line_appends_placeholder_suffix() {
    assert_eq!(
        mirror_server_line("https://example/2020/01/01"),
        "Server = https://example/2020/01/01/$repo/os/$arch"
    );
}

#[test]
fn mirror_server_line_normalizes_trailing_separators() {
    assert_eq!(
        mirror_server_line("https://example/2020/01/01/"),
        "Server = https://example/2020/01/01/$repo/os/$arch"
    );
    assert_eq!(
        mirror_server_line("https://example/2020/01/01///"),
        "Server = https://example/2020/01/01/$repo/os/$arch"
    );
}

#[test]
fn backup_copies_live_file_byte_for_byte() {
    let root = test_root();
    let mirror = mirror_in(&root);
    fs::write(mirror.live_path(), ORIGINAL_MIRRORLIST).expect("must seed mirrorlist");

    let copied = mirror.backup().expect("backup must succeed");

    assert_eq!(copied, ORIGINAL_MIRRORLIST.len() as u64);
    assert_eq!(
        fs::read(mirror.backup_path()).expect("must read backup"),
        ORIGINAL_MIRRORLIST
    );
    assert!(mirror.has_backup().expect("must inspect backup"));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn backup_overwrites_previous_backup() {
    let root = test_root();
    let mirror = mirror_in(&root);
    fs::write(mirror.backup_path(), b"stale backup from an earlier run\n").expect("seed backup");
    fs::write(mirror.live_path(), ORIGINAL_MIRRORLIST).expect("must seed mirrorlist");

    mirror.backup().expect("backup must succeed");

    assert_eq!(
        fs::read(mirror.backup_path()).expect("must read backup"),
        ORIGINAL_MIRRORLIST
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn backup_without_live_file_reports_source_missing() {
    let root = test_root();
    let mirror = mirror_in(&root);

    let err = mirror.backup().expect_err("backup must fail");
    assert!(matches!(err, MirrorError::SourceMissing { ref path } if path == mirror.live_path()));
    assert!(!mirror.backup_path().exists());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn backup_into_missing_directory_reports_io_error() {
    let root = test_root();
    let mirror = MirrorConfig::new(root.join("mirrorlist"), root.join("missing/mirrorlist.bak"));
    fs::write(mirror.live_path(), ORIGINAL_MIRRORLIST).expect("must seed mirrorlist");

    let err = mirror.backup().expect_err("backup must fail");
    assert!(matches!(err, MirrorError::Io { .. }));
    assert!(err.to_string().starts_with("failed to write backup"));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn io_error_message_leaves_os_error_to_source_chain() {
    let root = test_root();
    let mirror = MirrorConfig::new(root.join("mirrorlist"), root.join("missing/mirrorlist.bak"));
    fs::write(mirror.live_path(), ORIGINAL_MIRRORLIST).expect("must seed mirrorlist");

    let err = mirror.backup().expect_err("backup must fail");
    let source = std::error::Error::source(&err).expect("io error must be the source");

    assert_eq!(
        err.to_string(),
        format!("failed to write backup {}", mirror.backup_path().display())
    );
    assert!(!err.to_string().contains(&source.to_string()));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn write_replaces_live_file_with_single_directive() {
    let root = test_root();
    let mirror = mirror_in(&root);
    fs::write(mirror.live_path(), ORIGINAL_MIRRORLIST).expect("must seed mirrorlist");

    let line = mirror
        .write("https://archive.example.test/repos/2020/01/01/")
        .expect("write must succeed");

    assert_eq!(
        line,
        "Server = https://archive.example.test/repos/2020/01/01/$repo/os/$arch"
    );
    assert_eq!(
        fs::read_to_string(mirror.live_path()).expect("must read mirrorlist"),
        format!("{line}\n")
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn restore_without_backup_leaves_live_file_untouched() {
    let root = test_root();
    let mirror = mirror_in(&root);
    fs::write(mirror.live_path(), ORIGINAL_MIRRORLIST).expect("must seed mirrorlist");

    let err = mirror.restore().expect_err("restore must fail");

    assert!(matches!(err, MirrorError::BackupMissing { .. }));
    assert!(err.to_string().contains("backup not found"));
    assert_eq!(
        fs::read(mirror.live_path()).expect("must read mirrorlist"),
        ORIGINAL_MIRRORLIST
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn backup_write_restore_round_trips_original_bytes() {
    let root = test_root();
    let mirror = mirror_in(&root);
    let contents: [&[u8]; 3] = [
        ORIGINAL_MIRRORLIST,
        b"",
        b"Server = https://mirror.example.test/$repo/os/$arch\r\n\xef\xbb\xbf# trailing bytes",
    ];

    for original in contents {
        fs::write(mirror.live_path(), original).expect("must seed mirrorlist");

        mirror.backup().expect("backup must succeed");
        mirror
            .write("https://archive.example.test/repos/2020/01/01/")
            .expect("write must succeed");
        assert_ne!(
            fs::read(mirror.live_path()).expect("must read mirrorlist"),
            original
        );
        mirror.restore().expect("restore must succeed");

        assert_eq!(
            fs::read(mirror.live_path()).expect("must read mirrorlist"),
            original
        );
    }

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn restore_is_idempotent_and_keeps_backup() {
    let root = test_root();
    let mirror = mirror_in(&root);
    fs::write(mirror.live_path(), ORIGINAL_MIRRORLIST).expect("must seed mirrorlist");
    mirror.backup().expect("backup must succeed");
    mirror
        .write("https://archive.example.test/repos/2020/01/01")
        .expect("write must succeed");

    mirror.restore().expect("first restore must succeed");
    mirror.restore().expect("second restore must succeed");

    assert_eq!(
        fs::read(mirror.live_path()).expect("must read mirrorlist"),
        ORIGINAL_MIRRORLIST
    );
    assert!(mirror.has_backup().expect("must inspect backup"));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn restore_recreates_missing_live_file() {
    let root = test_root();
    let mirror = mirror_in(&root);
    fs::write(mirror.live_path(), ORIGINAL_MIRRORLIST).expect("must seed mirrorlist");
    mirror.backup().expect("backup must succeed");
    fs::remove_file(mirror.live_path()).expect("must remove mirrorlist");

    mirror.restore().expect("restore must succeed");

    assert_eq!(
        fs::read(mirror.live_path()).expect("must read mirrorlist"),
        ORIGINAL_MIRRORLIST
    );

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn from_config_uses_configured_paths() {
    let config = rewind_core::RewindConfig::default();
    let mirror = MirrorConfig::from_config(&config);
    assert_eq!(mirror.live_path(), PathBuf::from("/etc/pacman.d/mirrorlist"));
    assert_eq!(
        mirror.backup_path(),
        PathBuf::from("/etc/pacman.d/mirrorlist.bak")
    );
}

fn mirror_in(root: &std::path::Path) -> MirrorConfig {
    MirrorConfig::new(root.join("mirrorlist"), root.join("mirrorlist.bak"))
}

fn test_root() -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    let counter = TEST_ROOT_COUNTER.fetch_add(1, Ordering::SeqCst);
    path.push(format!(
        "rewind-mirror-tests-{}-{}-{}",
        std::process::id(),
        nanos,
        counter
    ));
    fs::create_dir_all(&path).expect("must create test root");
    path
}
