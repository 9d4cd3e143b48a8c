use chrono::{Local, TimeZone};
use fsweep::engine::{canonicalize_root, is_traversable, name_matches, running_as_root};
use fsweep::pipeline::{CancelToken, Shutdown, SignalState, WalkOutcome, WorkerGroup, walk};
use fsweep::{Match, Pattern, SearchTask, Signal, SweepOpts};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

fn cancel() -> CancelToken {
    CancelToken::new(SignalState::new(), Shutdown::new())
}

fn task(root: &Path, pattern: &str) -> SearchTask {
    SearchTask {
        root: root.to_path_buf(),
        pattern: Pattern::from(pattern),
    }
}

fn walk_paths(root: &Path, pattern: &str) -> BTreeSet<PathBuf> {
    let mut found = BTreeSet::new();
    let (outcome, _) = walk(&task(root, pattern), false, &cancel(), |m| {
        assert!(found.insert(m.path.clone()), "duplicate match {:?}", m.path);
    });
    assert_eq!(outcome, WalkOutcome::Completed);
    found
}

/// `<root>/{a.log, b.txt, sub/c.log}`
fn sample_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("a.log"), b"").unwrap();
    fs::write(dir.path().join("b.txt"), b"").unwrap();
    fs::write(dir.path().join("sub/c.log"), b"").unwrap();
    dir
}

// --- types ---

#[test]
fn test_match_renders_as_log_line() {
    let m = Match {
        timestamp: Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap(),
        path: PathBuf::from("/tmp/x/a.log"),
        pattern: Pattern::from(".log"),
    };
    assert_eq!(m.to_string(), "2024-03-09 07:05:01 | /tmp/x/a.log | .log");
}

#[test]
fn test_signal_from_raw_unknown_is_none() {
    assert_eq!(Signal::from_raw(0), Signal::None);
    assert_eq!(Signal::from_raw(1), Signal::AbortSweep);
    assert_eq!(Signal::from_raw(2), Signal::Terminate);
    assert_eq!(Signal::from_raw(99), Signal::None);
}

#[test]
fn test_tasks_one_per_pattern() {
    let opts = SweepOpts {
        root: PathBuf::from("/data"),
        patterns: vec![Pattern::from(".log"), Pattern::from(".txt")],
        ..Default::default()
    };
    let tasks = opts.tasks();
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|t| t.root == Path::new("/data")));
    assert_eq!(tasks[1].pattern.as_str(), ".txt");
}

// --- matcher ---

fn name_has(name: &str, pattern: &str) -> bool {
    name_matches(OsStr::new(name), &Pattern::from(pattern))
}

#[test]
fn test_name_matches_substring_anywhere() {
    assert!(name_has("a.log", ".log"));
    assert!(name_has("server.log.1", ".log"));
    assert!(name_has("catalog", "log"));
    assert!(!name_has("b.txt", ".log"));
}

#[test]
fn test_name_matches_case_sensitive() {
    assert!(!name_has("server.LOG", ".log"));
    assert!(name_has("server.LOG", ".LOG"));
}

#[test]
fn test_name_matches_pattern_longer_than_name() {
    assert!(!name_has("a", "abc"));
}

#[test]
fn test_name_matches_empty_pattern_matches_all() {
    assert!(name_has("anything", ""));
    assert!(name_has("", ""));
}

#[cfg(unix)]
#[test]
fn test_name_matches_non_utf8_name() {
    use std::os::unix::ffi::OsStrExt;
    let name = OsStr::from_bytes(b"\xffcore.dump");
    assert!(name_matches(name, &Pattern::from("core")));
}

// --- path tools ---

#[test]
fn test_canonicalize_root_rejects_missing() {
    let dir = tempfile::tempdir().unwrap();
    assert!(canonicalize_root(&dir.path().join("nope")).is_err());
}

#[test]
fn test_canonicalize_root_rejects_file() {
    let dir = tempfile::tempdir().unwrap();
    let f = dir.path().join("f");
    fs::write(&f, b"").unwrap();
    assert!(canonicalize_root(&f).is_err());
}

#[test]
fn test_canonicalize_root_is_absolute() {
    let dir = tempfile::tempdir().unwrap();
    assert!(canonicalize_root(dir.path()).unwrap().is_absolute());
}

#[test]
fn test_temp_dir_is_traversable() {
    let dir = tempfile::tempdir().unwrap();
    assert!(is_traversable(dir.path()));
    assert!(!is_traversable(&dir.path().join("missing")));
}

// --- signal relay and cancellation ---

#[test]
fn test_signal_state_starts_none_and_latches() {
    let s = SignalState::new();
    assert_eq!(s.get(), Signal::None);
    s.raise(Signal::AbortSweep);
    assert_eq!(s.get(), Signal::AbortSweep);
    assert_eq!(s.get(), Signal::AbortSweep);
    s.reset();
    assert_eq!(s.get(), Signal::None);
}

#[test]
fn test_worker_group_broadcast_is_shared() {
    let s = SignalState::new();
    let group = WorkerGroup::new(s.clone());
    group.broadcast(Signal::Terminate);
    assert_eq!(s.get(), Signal::Terminate);
}

#[cfg(unix)]
#[test]
fn test_os_signal_sets_state() {
    let s = SignalState::new();
    s.install_os_handlers().unwrap();
    unsafe {
        libc::raise(libc::SIGUSR2);
    }
    assert_eq!(s.get(), Signal::Terminate);
}

#[test]
fn test_shutdown_wait_times_out_without_request() {
    let s = Shutdown::new();
    let start = Instant::now();
    assert!(!s.wait_timeout(Duration::from_millis(30)));
    assert!(start.elapsed() >= Duration::from_millis(30));
}

#[test]
fn test_shutdown_request_wakes_waiter() {
    let s = Shutdown::new();
    let waiter = s.clone();
    let h = std::thread::spawn(move || waiter.wait_timeout(Duration::from_secs(30)));
    s.request();
    assert!(h.join().unwrap());
}

#[test]
fn test_shutdown_repeated_requests_do_not_block() {
    let s = Shutdown::new();
    s.request();
    s.request();
    assert!(s.is_requested());
    assert!(s.wait_timeout(Duration::from_secs(30)));
}

#[test]
fn test_cancel_token_ignores_terminate() {
    let signals = SignalState::new();
    let token = CancelToken::new(signals.clone(), Shutdown::new());
    assert!(!token.is_cancelled());
    signals.raise(Signal::Terminate);
    assert!(!token.is_cancelled());
    assert_eq!(token.signal(), Signal::Terminate);
    signals.raise(Signal::AbortSweep);
    assert!(token.is_cancelled());
}

#[test]
fn test_cancel_token_sees_shutdown() {
    let shutdown = Shutdown::new();
    let token = CancelToken::new(SignalState::new(), shutdown.clone());
    shutdown.request();
    assert!(token.is_cancelled());
}

// --- walker ---

#[test]
fn test_walk_sample_tree_log_pattern() {
    let dir = sample_tree();
    let found = walk_paths(dir.path(), ".log");
    let expected: BTreeSet<PathBuf> = [dir.path().join("a.log"), dir.path().join("sub/c.log")]
        .into_iter()
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn test_walk_directory_names_never_match() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("match_me/match_me_too")).unwrap();
    fs::write(dir.path().join("match_me/match_me_too/plain"), b"").unwrap();
    assert!(walk_paths(dir.path(), "match_me").is_empty());
}

#[test]
fn test_walk_paths_are_absolute_when_root_is() {
    let dir = sample_tree();
    let root = dir.path().canonicalize().unwrap();
    for p in walk_paths(&root, "") {
        assert!(p.is_absolute());
        assert!(p.starts_with(&root));
    }
}

#[test]
fn test_walk_empty_pattern_matches_every_file() {
    let dir = sample_tree();
    assert_eq!(walk_paths(dir.path(), "").len(), 3);
}

#[test]
fn test_walk_match_carries_pattern() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("core.dump"), b"").unwrap();
    let mut patterns = Vec::new();
    walk(&task(dir.path(), "core"), false, &cancel(), |m| {
        patterns.push(m.pattern.clone())
    });
    assert_eq!(patterns, vec![Pattern::from("core")]);
}

#[test]
fn test_walk_missing_root_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let (outcome, stats) = walk(&task(&dir.path().join("gone"), "x"), true, &cancel(), |_| {});
    assert_eq!(outcome, WalkOutcome::Completed);
    assert_eq!(stats.matched, 0);
    assert_eq!(stats.skipped, 1);
}

#[test]
fn test_walk_file_root_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let f = dir.path().join("x.log");
    fs::write(&f, b"").unwrap();
    assert!(walk_paths(&f, ".log").is_empty());
}

#[test]
fn test_walk_abort_before_start_yields_nothing() {
    let dir = sample_tree();
    let signals = SignalState::new();
    let token = CancelToken::new(signals.clone(), Shutdown::new());
    signals.raise(Signal::AbortSweep);
    let mut seen = 0;
    let (outcome, _) = walk(&task(dir.path(), ".log"), false, &token, |_| seen += 1);
    assert_eq!(outcome, WalkOutcome::Aborted);
    assert_eq!(seen, 0);
}

#[test]
fn test_walk_abort_mid_walk_stops_at_next_entry() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..20 {
        fs::write(dir.path().join(format!("f{i}.log")), b"").unwrap();
    }
    let signals = SignalState::new();
    let token = CancelToken::new(signals.clone(), Shutdown::new());
    let mut seen = 0;
    let (outcome, stats) = walk(&task(dir.path(), ".log"), false, &token, |_| {
        seen += 1;
        signals.raise(Signal::AbortSweep);
    });
    assert_eq!(outcome, WalkOutcome::Aborted);
    assert_eq!(seen, 1);
    assert_eq!(stats.matched, 1);
}

#[test]
fn test_walk_terminate_does_not_stop_walk() {
    let dir = sample_tree();
    let signals = SignalState::new();
    let token = CancelToken::new(signals.clone(), Shutdown::new());
    signals.raise(Signal::Terminate);
    let mut seen = 0;
    let (outcome, _) = walk(&task(dir.path(), ".log"), false, &token, |_| seen += 1);
    assert_eq!(outcome, WalkOutcome::Completed);
    assert_eq!(seen, 2);
}

#[cfg(unix)]
#[test]
fn test_walk_follows_symlinked_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("target.bin"), b"").unwrap();
    std::os::unix::fs::symlink(dir.path().join("target.bin"), dir.path().join("link.log"))
        .unwrap();
    std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("dangling.log"))
        .unwrap();
    let found: Vec<PathBuf> = walk_paths(dir.path(), ".log").into_iter().collect();
    assert_eq!(found, vec![dir.path().join("link.log")]);
}

#[cfg(unix)]
#[test]
fn test_walk_symlink_loop_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("d")).unwrap();
    fs::write(dir.path().join("d/a.log"), b"").unwrap();
    std::os::unix::fs::symlink(dir.path(), dir.path().join("d/up")).unwrap();
    let found: Vec<PathBuf> = walk_paths(dir.path(), ".log").into_iter().collect();
    assert_eq!(found, vec![dir.path().join("d/a.log")]);
}

#[cfg(unix)]
#[test]
fn test_walk_skips_unreadable_directory() {
    use std::os::unix::fs::PermissionsExt;
    // access(2) always grants root search permission.
    if running_as_root() {
        return;
    }
    let dir = sample_tree();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("hidden.log"), b"").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let found = walk_paths(dir.path(), ".log");

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let expected: BTreeSet<PathBuf> = [dir.path().join("a.log"), dir.path().join("sub/c.log")]
        .into_iter()
        .collect();
    assert_eq!(found, expected);
}

#[cfg(unix)]
#[test]
fn test_walk_skips_listable_but_not_searchable_directory() {
    use std::os::unix::fs::PermissionsExt;
    if running_as_root() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let half = dir.path().join("half");
    fs::create_dir(&half).unwrap();
    fs::write(half.join("x.log"), b"").unwrap();
    fs::set_permissions(&half, fs::Permissions::from_mode(0o644)).unwrap();

    let found = walk_paths(dir.path(), ".log");

    fs::set_permissions(&half, fs::Permissions::from_mode(0o755)).unwrap();
    assert!(found.is_empty());
}
