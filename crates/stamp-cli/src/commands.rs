//! CLI command implementations.

use crate::config::{WatchConfig, CONFIG_DIR};
use colored::Colorize;
use stamp_core::MetadataProvider;
use stamp_watcher::FileWatcher;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Settings for a `watch` run after merging config file and flags.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub config: WatchConfig,

    /// Stop after this many changes. `None` watches until the file is gone.
    pub max_changes: Option<usize>,
}

/// Why a poll loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The watcher became invalid after `changes` changes.
    Invalidated { changes: usize },

    /// `max_changes` was reached.
    Limit { changes: usize },
}

impl PollOutcome {
    pub fn changes(&self) -> usize {
        match *self {
            Self::Invalidated { changes } | Self::Limit { changes } => changes,
        }
    }
}

/// Initialize Stamp in a directory.
pub fn init(path: &Path) -> Result<()> {
    let stamp_dir = path.join(CONFIG_DIR);
    let config_path = WatchConfig::default_path(path);

    if config_path.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    fs::create_dir_all(&stamp_dir)?;
    let contents = serde_json::to_string_pretty(&WatchConfig::default())?;
    fs::write(&config_path, contents)?;

    println!(
        "{} Wrote {}",
        "✓".green(),
        config_path.display().to_string().cyan()
    );
    Ok(())
}

/// Report whether a file can be watched.
pub fn check(file: &Path, config: &WatchConfig) -> Result<()> {
    let watcher = FileWatcher::with_flags(file, config.flags());

    match watcher.last_modified() {
        Some(modified) => {
            println!(
                "{} {} {}",
                "✓".green(),
                file.display().to_string().cyan(),
                describe_mtime(modified).dimmed()
            );
            Ok(())
        }
        None => Err(format!("can't watch {}", file.display()).into()),
    }
}

/// Poll a file and print every change.
pub fn watch(file: &Path, options: &WatchOptions) -> Result<PollOutcome> {
    let mut watcher = FileWatcher::with_flags(file, options.config.flags());
    if !watcher.is_valid() {
        return Err(format!("can't watch {}", file.display()).into());
    }

    info!(
        "Watching {} every {:?}",
        file.display(),
        options.config.poll_interval()
    );

    let outcome = poll_loop(
        &mut watcher,
        options.config.poll_interval(),
        options.max_changes,
        |path| {
            println!(
                "{} {}",
                "changed:".yellow().bold(),
                path.display().to_string().cyan()
            )
        },
    );

    match outcome {
        PollOutcome::Invalidated { changes } => println!(
            "{} {} is gone, stopped after {} change(s)",
            "✗".red(),
            file.display(),
            changes
        ),
        PollOutcome::Limit { changes } => {
            println!("{} Stopped after {} change(s)", "✓".green(), changes)
        }
    }

    Ok(outcome)
}

/// Drives a watcher at a fixed cadence until it dies or `max_changes` hits.
///
/// The first check happens immediately, then once per `interval`.
pub fn poll_loop<P, F>(
    watcher: &mut FileWatcher<P>,
    interval: Duration,
    max_changes: Option<usize>,
    mut on_change: F,
) -> PollOutcome
where
    P: MetadataProvider,
    F: FnMut(&Path),
{
    let mut changes = 0;

    loop {
        if max_changes.is_some_and(|max| changes >= max) {
            return PollOutcome::Limit { changes };
        }

        if watcher.has_changed() {
            changes += 1;
            debug!("Change #{} in {}", changes, watcher.path().display());
            on_change(watcher.path());
            continue;
        }

        if !watcher.is_valid() {
            return PollOutcome::Invalidated { changes };
        }

        std::thread::sleep(interval);
    }
}

fn describe_mtime(modified: SystemTime) -> String {
    match SystemTime::now().duration_since(modified) {
        Ok(age) => format!("(modified {:.1}s ago)", age.as_secs_f64()),
        Err(_) => "(modified in the future)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{set_file_mtime, FileTime};
    use stamp_watcher::WatchFlags;
    use tempfile::tempdir;

    fn aged_file(dir: &Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, "hello").unwrap();
        let aged = SystemTime::now() - Duration::from_secs(10);
        set_file_mtime(&path, FileTime::from_system_time(aged)).unwrap();
        path
    }

    #[test]
    fn test_init_writes_default_config() {
        let dir = tempdir().unwrap();
        init(dir.path()).unwrap();

        let config = WatchConfig::discover(dir.path()).unwrap();
        assert_eq!(config, WatchConfig::default());

        // second run leaves the file alone
        fs::write(
            WatchConfig::default_path(dir.path()),
            r#"{ "poll_interval_ms": 5 }"#,
        )
        .unwrap();
        init(dir.path()).unwrap();
        assert_eq!(
            WatchConfig::discover(dir.path()).unwrap().poll_interval_ms,
            5
        );
    }

    #[test]
    fn test_check() {
        let dir = tempdir().unwrap();
        let path = aged_file(dir.path(), "file.txt");
        let config = WatchConfig::default();

        assert!(check(&path, &config).is_ok());
        assert!(check(&dir.path().join("missing.txt"), &config).is_err());
    }

    #[test]
    fn test_watch_rejects_missing_file() {
        let dir = tempdir().unwrap();
        let options = WatchOptions {
            config: WatchConfig::default(),
            max_changes: Some(1),
        };
        assert!(watch(&dir.path().join("missing.txt"), &options).is_err());
    }

    #[test]
    fn test_poll_loop_stops_at_limit() {
        let dir = tempdir().unwrap();
        let path = aged_file(dir.path(), "file.txt");
        let mut watcher = FileWatcher::new(&path);

        fs::write(&path, "ahoy").unwrap();
        let mut seen = Vec::new();
        let outcome = poll_loop(
            &mut watcher,
            Duration::from_millis(1),
            Some(1),
            |p| seen.push(p.to_path_buf()),
        );

        assert_eq!(outcome, PollOutcome::Limit { changes: 1 });
        assert_eq!(seen, vec![path]);
        assert!(watcher.is_valid());
    }

    #[test]
    fn test_poll_loop_ends_when_file_is_deleted() {
        let dir = tempdir().unwrap();
        let path = aged_file(dir.path(), "file.txt");
        let mut watcher = FileWatcher::new(&path);

        fs::write(&path, "ahoy").unwrap();
        let outcome = poll_loop(&mut watcher, Duration::from_millis(1), None, |p| {
            fs::remove_file(p).unwrap()
        });

        assert_eq!(outcome, PollOutcome::Invalidated { changes: 1 });
        assert_eq!(outcome.changes(), 1);
        assert!(!watcher.is_valid());
    }

    #[test]
    fn test_poll_loop_zero_limit_does_not_poll() {
        let dir = tempdir().unwrap();
        let path = aged_file(dir.path(), "file.txt");
        let mut watcher = FileWatcher::with_flags(&path, WatchFlags::IGNORE_ERRORS);

        fs::remove_file(&path).unwrap();
        let outcome = poll_loop(&mut watcher, Duration::from_millis(1), Some(0), |_| {
            panic!("no change expected")
        });
        assert_eq!(outcome, PollOutcome::Limit { changes: 0 });
    }

    #[test]
    fn test_describe_mtime() {
        let past = SystemTime::now() - Duration::from_secs(3);
        assert!(describe_mtime(past).starts_with("(modified 3."));

        let future = SystemTime::now() + Duration::from_secs(3600);
        assert_eq!(describe_mtime(future), "(modified in the future)");
    }
}
