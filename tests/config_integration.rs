use std::path::PathBuf;

use marksplit::config::{
    ConfigFlags, ThemeMode, clear_config_flags, load_config_flags, parse_flag_tokens,
    save_config_flags,
};

fn args(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(ToString::to_string).collect()
}

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".marksplitrc");
    let content = r#"
# comment
--split 30

--theme light
   
--log-file=marksplit.log
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert_eq!(flags.split, Some(30));
    assert_eq!(flags.theme, Some(ThemeMode::Light));
    assert_eq!(flags.log_file, Some(PathBuf::from("marksplit.log")));
}

#[test]
fn test_local_override_then_cli_precedence() {
    let dir = tempfile::tempdir().unwrap();
    let global = dir.path().join("config");
    let local = dir.path().join(".marksplitrc");
    std::fs::write(&global, "--split 30\n--theme light\n--log-file global.log\n").unwrap();
    std::fs::write(&local, "--theme dark\n").unwrap();

    let file_flags = load_config_flags(&global)
        .unwrap()
        .union(&load_config_flags(&local).unwrap());
    assert_eq!(file_flags.theme, Some(ThemeMode::Dark), "local beats global");

    let cli_flags = parse_flag_tokens(&args(&["marksplit", "--split", "70", "notes.md"]));
    let effective = file_flags.union(&cli_flags);
    assert_eq!(effective.split, Some(70), "cli beats files");
    assert_eq!(effective.theme, Some(ThemeMode::Dark));
    assert_eq!(
        effective.log_file,
        Some(PathBuf::from("global.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_parse_flag_tokens_handles_equals_syntax() {
    let flags = parse_flag_tokens(&args(&["marksplit", "--theme=dark", "--split=40"]));
    assert_eq!(flags.theme, Some(ThemeMode::Dark));
    assert_eq!(flags.split, Some(40));
}

#[test]
fn test_invalid_values_are_ignored() {
    let flags = parse_flag_tokens(&args(&["--theme", "purple", "--split", "99"]));
    assert_eq!(flags, ConfigFlags::default());
}

#[test]
fn test_save_only_writes_set_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config");
    let flags = ConfigFlags {
        theme: Some(ThemeMode::Auto),
        ..ConfigFlags::default()
    };
    save_config_flags(&path, &flags).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with('#'));
    assert!(content.contains("--theme auto"));
    assert!(!content.contains("--split"));
    assert!(!content.contains("--log-file"));

    clear_config_flags(&path).unwrap();
    clear_config_flags(&path).unwrap();
    assert!(!path.exists());
}
