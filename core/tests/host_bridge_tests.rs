/// Host bridge tests — file-based init payload and degraded mode
use leadlink_core::host::{ColorScheme, HostContext};
use leadlink_core::Config;
use std::io::Write;

#[tokio::test]
async fn test_init_data_read_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("init_data");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        "query_id=AAE&user=%7B%22id%22%3A7%2C%22first_name%22%3A%22Olga%22%7D&hash=ff"
    )
    .unwrap();

    let config = Config {
        init_data_path: Some(path),
        ..Config::default()
    };
    let host = HostContext::init(&config);

    assert!(host.init_data().await.is_some());
    assert_eq!(host.user.as_ref().unwrap().first_name, "Olga");
    assert_eq!(host.display_name(), "Olga");
}

#[tokio::test]
async fn test_missing_host_yields_anonymous_light_mode() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        init_data_path: Some(dir.path().join("does_not_exist")),
        ..Config::default()
    };
    let host = HostContext::init(&config);

    assert!(host.init_data().await.is_none());
    assert!(host.user.is_none());
    assert_eq!(host.display_name(), "Guest");
    assert_eq!(host.color_scheme, ColorScheme::Light);
}

#[tokio::test]
async fn test_theme_override_beats_host_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        init_data_path: Some(dir.path().join("does_not_exist")),
        theme_override: Some(ColorScheme::Dark),
        ..Config::default()
    };
    let host = HostContext::init(&config);
    assert_eq!(host.color_scheme, ColorScheme::Dark);
}
