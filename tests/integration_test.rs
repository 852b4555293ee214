/// End-to-end tests: scan a sessions tree, parse sessions, search them
mod common;

use codex_sessions::models::UNKNOWN_CWD;
use codex_sessions::{DateKey, ParseOptions, Scanner, SearchIndex, parse_session_file};
use common::{LineBuilder, SessionsDirBuilder, minimal_sessions_dir, realistic_sessions_dir};

fn date(value: &str) -> DateKey {
    value.parse().unwrap()
}

#[test]
fn test_e2e_scan_minimal_directory() {
    let dir = minimal_sessions_dir();
    let scanner = Scanner::new(dir.path());
    let stats = scanner.refresh().unwrap();

    assert_eq!(stats.files, 1);
    assert_eq!(stats.dates, 1);
    assert_eq!(stats.without_header, 0);

    let files = scanner.sessions_by_date(&date("2026-01-09"));
    assert_eq!(files.len(), 1);
    let meta = files[0].meta.as_ref().unwrap();
    assert_eq!(meta.id, "sess-a");
    assert_eq!(meta.cwd, "/work/alpha");
    assert_eq!(meta.cli_version, "0.63.0");
}

#[test]
fn test_e2e_dates_and_browse_order() {
    let dir = realistic_sessions_dir();
    let scanner = Scanner::new(dir.path());
    scanner.refresh().unwrap();

    let dates: Vec<String> = scanner.dates().iter().map(ToString::to_string).collect();
    assert_eq!(dates, vec!["2026-01-09", "2026-01-08"]);

    let names: Vec<String> =
        scanner.sessions_by_date(&date("2026-01-09")).into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["rollout-new.jsonl", "rollout-nohdr.jsonl"]);

    let snapshot = scanner.snapshot();
    let all: Vec<&str> = snapshot.files().map(|f| f.name.as_str()).collect();
    assert_eq!(all, vec!["rollout-new.jsonl", "rollout-nohdr.jsonl", "rollout-old.jsonl"]);
}

#[test]
fn test_e2e_working_directories() {
    let dir = realistic_sessions_dir();
    let scanner = Scanner::new(dir.path());
    scanner.refresh().unwrap();

    assert_eq!(scanner.working_directories(), vec!["/work/alpha", "/work/beta", UNKNOWN_CWD]);

    let alpha = scanner.sessions_by_working_directory("/work/alpha");
    assert_eq!(alpha.len(), 1);
    assert_eq!(alpha[0].name, "rollout-old.jsonl");

    let unknown = scanner.sessions_by_working_directory("   ");
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].name, "rollout-nohdr.jsonl");

    let (latest, max) = scanner.working_directory_counts_for_latest_dates(1);
    assert_eq!(latest.get("/work/beta"), Some(&1));
    assert_eq!(latest.get(UNKNOWN_CWD), Some(&1));
    assert!(!latest.contains_key("/work/alpha"));
    assert_eq!(max, 1);
}

#[test]
fn test_e2e_parse_trimmed_and_full() {
    let dir = realistic_sessions_dir();
    let scanner = Scanner::new(dir.path());
    scanner.refresh().unwrap();
    let file = scanner.lookup(&date("2026-01-09"), "rollout-new.jsonl").unwrap();

    let trimmed = parse_session_file(&file.path, ParseOptions::default()).unwrap();
    assert_eq!(trimmed.meta.as_ref().unwrap().id, "sess-new");
    assert_eq!(trimmed.entries.len(), 2);
    assert_eq!(trimmed.entries[0].title, "User");
    assert_eq!(trimmed.entries[0].line, 2);
    assert_eq!(trimmed.entries[0].content, "fix the migration test");
    assert_eq!(trimmed.entries[1].title, "Agent");
    assert_eq!(trimmed.entries[1].line, 4);

    let full =
        parse_session_file(&file.path, ParseOptions { trim_user_request: false }).unwrap();
    assert!(full.entries[0].content.starts_with("# Context"));
    assert!(full.entries[0].content.ends_with("fix the migration test"));
}

#[test]
fn test_e2e_reasoning_and_ignored_records() {
    let dir = realistic_sessions_dir();
    let scanner = Scanner::new(dir.path());
    scanner.refresh().unwrap();
    let file = scanner.lookup(&date("2026-01-08"), "rollout-old.jsonl").unwrap();

    let session = parse_session_file(&file.path, ParseOptions::default()).unwrap();
    let titles: Vec<&str> = session.entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["User", "Reasoning", "Agent"]);
    assert_eq!(session.entries[1].role, "assistant");
    assert_eq!(session.entries[1].content, "Plan the schema");
    assert_eq!(session.entries[2].line, 5);
}

#[test]
fn test_e2e_consecutive_messages_are_merged() {
    let dir = SessionsDirBuilder::new()
        .with_session(
            "2026/02/01",
            "merge.jsonl",
            &[
                LineBuilder::user("keep"),
                LineBuilder::assistant("Reason"),
                LineBuilder::assistant("Later"),
                LineBuilder::user("draft"),
                LineBuilder::user("final"),
            ],
        )
        .build();
    let scanner = Scanner::new(dir.path());
    scanner.refresh().unwrap();
    let file = scanner.lookup(&date("2026-02-01"), "merge.jsonl").unwrap();

    let session = parse_session_file(&file.path, ParseOptions::default()).unwrap();
    assert_eq!(session.entries.len(), 3);
    assert_eq!(session.entries[1].content, "Reason\n\nLater");
    assert_eq!(session.entries[2].content, "final");
    assert_eq!(session.entries[2].line, 5);
}

#[test]
fn test_e2e_search_across_dates() {
    let dir = realistic_sessions_dir();
    let scanner = Scanner::new(dir.path());
    scanner.refresh().unwrap();
    let index = SearchIndex::new(ParseOptions::default());
    let stats = index.refresh_from(&scanner).unwrap();
    assert_eq!(stats.files, 3);

    let results = index.search("MIGRATION", 0);
    let hits: Vec<(String, String, usize)> =
        results.iter().map(|r| (r.date.clone(), r.file.clone(), r.line)).collect();
    assert_eq!(
        hits,
        vec![
            ("2026-01-09".to_string(), "rollout-new.jsonl".to_string(), 2),
            ("2026-01-08".to_string(), "rollout-old.jsonl".to_string(), 2),
            ("2026-01-08".to_string(), "rollout-old.jsonl".to_string(), 5),
        ]
    );
    assert_eq!(results[0].path, "2026/01/09");
    assert_eq!(results[0].role, "user");

    let reasoning = index.search("plan the schema", 0);
    assert_eq!(reasoning.len(), 1);
    assert_eq!(reasoning[0].role, "assistant");
}

#[test]
fn test_e2e_incremental_reindex_after_new_file() {
    let dir = minimal_sessions_dir();
    let scanner = Scanner::new(dir.path());
    scanner.refresh().unwrap();
    let index = SearchIndex::new(ParseOptions::default());
    index.refresh_from(&scanner).unwrap();

    common::write_file(
        dir.path(),
        "2026/01/10/rollout-b.jsonl",
        &(LineBuilder::user("brand new topic").to_json() + "\n"),
    );
    scanner.refresh().unwrap();
    let stats = index.refresh_from(&scanner).unwrap();

    assert_eq!(stats.reused, 1);
    assert_eq!(stats.reparsed, 1);
    assert_eq!(index.search("brand new", 0).len(), 1);
    assert_eq!(index.search("hi there", 0).len(), 1);
}

#[test]
fn test_e2e_empty_sessions_directory() {
    let dir = SessionsDirBuilder::new().build();
    let scanner = Scanner::new(dir.path());
    let stats = scanner.refresh().unwrap();
    assert_eq!(stats.files, 0);
    assert!(scanner.dates().is_empty());

    let index = SearchIndex::new(ParseOptions::default());
    index.refresh_from(&scanner).unwrap();
    assert!(index.is_empty());
    assert!(index.search("anything", 0).is_empty());
}

#[test]
fn test_e2e_missing_directory_is_an_error() {
    let dir = SessionsDirBuilder::new().build();
    let scanner = Scanner::new(dir.path().join("does-not-exist"));
    let err = scanner.refresh().unwrap_err();
    assert!(err.to_string().contains("Failed to read sessions directory"));
    assert!(scanner.last_updated().is_none());
}

#[test]
fn test_e2e_overwritten_file_is_reindexed() {
    let dir = SessionsDirBuilder::new()
        .with_session("2026/01/09", "a.jsonl", &[LineBuilder::user("Hello world")])
        .build();
    let scanner = Scanner::new(dir.path());
    scanner.refresh().unwrap();
    let index = SearchIndex::new(ParseOptions::default());
    index.refresh_from(&scanner).unwrap();

    let results = index.search("hello", 10);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].line, 1);

    common::write_file(
        dir.path(),
        "2026/01/09/a.jsonl",
        &(LineBuilder::user("Goodbye world").to_json() + "\n"),
    );
    scanner.refresh().unwrap();
    index.refresh_from(&scanner).unwrap();

    assert!(index.search("hello", 10).is_empty());
    assert_eq!(index.search("goodbye", 10).len(), 1);
}
