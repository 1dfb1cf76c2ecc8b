mod common;
use common::temp_out;
use std::fs;
use std::path::Path;
use vocamark::config::Config;
use vocamark::errors::AppError;

#[test]
fn test_partial_file_gets_defaults() {
    let cfg = Config::parse("page_size: 50\napi_base_url: http://localhost:8000\n").unwrap();
    assert_eq!(cfg.page_size, 50);
    assert_eq!(cfg.api_base_url, "http://localhost:8000");
    assert_eq!(cfg.request_timeout_secs, 20);
    assert_eq!(cfg.upload_timeout_secs, 100);
    assert_eq!(cfg.export_file_name, "output.xlsx");
}

#[test]
fn test_zero_page_size_rejected() {
    assert!(matches!(
        Config::parse("page_size: 0\n"),
        Err(AppError::Config(_))
    ));
}

#[test]
fn test_malformed_yaml_rejected() {
    assert!(matches!(
        Config::parse("page_size: [1, 2"),
        Err(AppError::Yaml(_))
    ));
}

#[test]
fn test_missing_fields() {
    let missing = Config::missing_fields("database: /tmp/x.sqlite\npage_size: 10\n").unwrap();
    assert_eq!(
        missing,
        vec![
            "api_base_url",
            "request_timeout_secs",
            "upload_timeout_secs",
            "export_file_name"
        ]
    );

    let full = serde_yaml::to_string(&Config::default()).unwrap();
    assert!(Config::missing_fields(&full).unwrap().is_empty());
}

#[test]
fn test_load_from_missing_file_is_default() {
    let cfg = Config::load_from(Path::new("/nonexistent/vocamark.conf")).unwrap();
    assert_eq!(cfg, Config::default());
}

#[test]
fn test_load_from_file() {
    let path = temp_out("config_load_from", "conf");
    fs::write(&path, "export_file_name: marked.xlsx\n").unwrap();

    let cfg = Config::load_from(Path::new(&path)).unwrap();
    assert_eq!(cfg.export_file_name, "marked.xlsx");
    assert_eq!(cfg.page_size, 20);
}
