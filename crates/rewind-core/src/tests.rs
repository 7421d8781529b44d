use std::path::PathBuf;

use super::*;

const ENDPOINT: &str = "https://archive.example.test/repos";

#[test]
fn build_location_for_endpoint_root_ends_with_separator() {
    let location = build_location(ENDPOINT, "", "", "").expect("root must compose");
    assert_eq!(location.as_str(), "https://archive.example.test/repos/");
}

#[test]
fn build_location_adds_one_segment_per_level() {
    let year = build_location(ENDPOINT, "2020", "", "").expect("year must compose");
    let month = build_location(ENDPOINT, "2020", "01", "").expect("month must compose");
    let day = build_location(ENDPOINT, "2020", "01", "15").expect("day must compose");

    assert_eq!(year.as_str(), "https://archive.example.test/repos/2020/");
    assert_eq!(month.as_str(), "https://archive.example.test/repos/2020/01/");
    assert_eq!(day.as_str(), "https://archive.example.test/repos/2020/01/15/");

    for (shorter, longer) in [(&year, &month), (&month, &day)] {
        let suffix = longer
            .as_str()
            .strip_prefix(shorter.as_str())
            .expect("each level must extend its parent");
        assert_eq!(suffix.matches('/').count(), 1);
        assert!(suffix.ends_with('/'));
    }
}

#[test]
fn build_location_normalizes_trailing_endpoint_separators() {
    let location =
        build_location("https://archive.example.test/repos//", "2021", "", "").expect("compose");
    assert_eq!(location.as_str(), "https://archive.example.test/repos/2021/");
}

#[test]
fn build_location_rejects_day_without_month() {
    let err = build_location(ENDPOINT, "2020", "", "15").expect_err("must reject day-only path");
    assert_eq!(
        err,
        LocationError::MissingParent {
            level: SnapshotLevel::Day,
            parent: SnapshotLevel::Month,
        }
    );
}

#[test]
fn build_location_rejects_month_without_year() {
    let err = build_location(ENDPOINT, "", "01", "").expect_err("must reject month-only path");
    assert!(err.to_string().contains("without a year"));
}

#[test]
fn build_location_rejects_nested_segments() {
    let err = build_location(ENDPOINT, "2020/01", "", "").expect_err("must reject nested year");
    assert!(matches!(err, LocationError::InvalidSegment { .. }));

    let err = build_location(ENDPOINT, "..", "", "").expect_err("must reject parent segment");
    assert!(matches!(err, LocationError::InvalidSegment { .. }));
}

#[test]
fn build_location_rejects_empty_endpoint() {
    let err = build_location(" / ", "2020", "", "").expect_err("must reject empty endpoint");
    assert_eq!(err, LocationError::EmptyEndpoint);
}

#[test]
fn snapshot_location_join_avoids_double_separator() {
    let location = build_location(ENDPOINT, "2020", "01", "01").expect("compose");
    assert_eq!(
        location.join("/core/os/x86_64/core.db"),
        "https://archive.example.test/repos/2020/01/01/core/os/x86_64/core.db"
    );
}

#[test]
fn selection_set_clears_finer_levels() {
    let mut selection = SnapshotSelection::from_parts("2020", "01", "15");
    selection.set(SnapshotLevel::Month, "02");
    assert_eq!(selection, SnapshotSelection::from_parts("2020", "02", ""));

    selection.set(SnapshotLevel::Year, "2019");
    assert_eq!(selection, SnapshotSelection::from_parts("2019", "", ""));
    assert!(!selection.is_complete());
}

#[test]
fn selection_date_label_skips_unset_levels() {
    assert_eq!(
        SnapshotSelection::from_parts("2020", "01", "15").to_string(),
        "2020/01/15"
    );
    assert_eq!(SnapshotSelection::from_parts("2020", "", "").to_string(), "2020");
    assert!(SnapshotSelection::from_parts("2020", "01", "15").is_complete());
}

#[test]
fn default_config_matches_arch_archive_layout() {
    let config = RewindConfig::default();
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.arch, "x86_64");
    assert_eq!(config.required_repos, vec!["core", "extra"]);
    assert_eq!(config.optional_repos, vec!["multilib"]);
    assert_eq!(config.mirrorlist_path, PathBuf::from(DEFAULT_MIRRORLIST_PATH));
    assert_eq!(config.backup_path, PathBuf::from(DEFAULT_BACKUP_PATH));
    config.validate().expect("defaults must validate");
}

#[test]
fn config_from_toml_overrides_selected_fields() {
    let config = RewindConfig::from_toml_str(
        r#"
endpoint = "https://mirror.example.test/archive"
optional_repos = []
mirrorlist_path = "/tmp/mirrorlist"
backup_path = "/tmp/mirrorlist.bak"
http_timeout_secs = 5
"#,
    )
    .expect("config must parse");

    assert_eq!(config.endpoint, "https://mirror.example.test/archive");
    assert!(config.optional_repos.is_empty());
    assert_eq!(config.required_repos, vec!["core", "extra"]);
    assert_eq!(config.http_timeout().as_secs(), 5);
    assert_eq!(config.update_command, vec!["pacman", "-Syyuu"]);
}

#[test]
fn config_rejects_unknown_fields() {
    let err = RewindConfig::from_toml_str("mirror = \"x\"\n").expect_err("must reject field");
    assert!(err.to_string().contains("failed to parse rewind config"));
}

#[test]
fn config_rejects_non_http_endpoint() {
    let err = RewindConfig::from_toml_str("endpoint = \"ftp://archive.example.test\"\n")
        .expect_err("must reject endpoint");
    assert!(err.to_string().contains("invalid endpoint"));
}

#[test]
fn config_rejects_backup_path_equal_to_mirrorlist() {
    let err = RewindConfig::from_toml_str(
        "mirrorlist_path = \"/etc/mirrorlist\"\nbackup_path = \"/etc/mirrorlist\"\n",
    )
    .expect_err("must reject shared path");
    assert!(err.to_string().contains("backup_path must differ"));
}

#[test]
fn config_rejects_empty_required_repos_and_bad_names() {
    let err = RewindConfig::from_toml_str("required_repos = []\n").expect_err("must reject");
    assert!(err.to_string().contains("at least one repository"));

    let err =
        RewindConfig::from_toml_str("optional_repos = [\"multi lib\"]\n").expect_err("must reject");
    assert!(err.to_string().contains("invalid repository name"));
}

#[test]
fn config_rejects_empty_update_command() {
    let err = RewindConfig::from_toml_str("update_command = []\n").expect_err("must reject");
    assert!(err.to_string().contains("update_command"));
}
