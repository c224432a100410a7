use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Where a [`LineLogger`] sends its lines.
#[derive(Debug, Clone, PartialEq)]
pub enum LogTarget {
    Stdout,
    /// One `YYYY-MM-DD.log` file per day inside the directory.
    Directory(PathBuf),
}

enum Output {
    Stdout,
    Daily(Mutex<DailyFile>),
}

struct DailyFile {
    dir: PathBuf,
    current_date: String,
    file: File,
}

impl DailyFile {
    fn open(dir: PathBuf) -> std::io::Result<Self> {
        fs::create_dir_all(&dir)?;
        let current_date = format_today();
        let file = open_append(&dir, &current_date)?;
        Ok(Self {
            dir,
            current_date,
            file,
        })
    }

    fn roll_if_needed(&mut self) {
        let today = format_today();
        if today == self.current_date {
            return;
        }
        match open_append(&self.dir, &today) {
            Ok(file) => {
                self.file = file;
                self.current_date = today;
            }
            // keep writing to yesterday's file
            Err(e) => eprintln!("Failed to open log file for {}: {}", today, e),
        }
    }
}

fn open_append(dir: &Path, date: &str) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(format!("{}.log", date)))
}

/// Line-oriented logger shared by every binary and test in the workspace.
///
/// Lines look like `2024-01-31T12:00:00 [INFO] [thread:ThreadId(1)] file.rs:42 - message`.
pub struct LineLogger {
    max_level: LevelFilter,
    output: Output,
}

impl LineLogger {
    pub fn new(target: LogTarget, max_level: LevelFilter) -> std::io::Result<Self> {
        let output = match target {
            LogTarget::Stdout => Output::Stdout,
            LogTarget::Directory(dir) => Output::Daily(Mutex::new(DailyFile::open(dir)?)),
        };
        Ok(Self { max_level, output })
    }

    pub fn max_level(&self) -> LevelFilter {
        self.max_level
    }
}

fn format_line(record: &Record) -> String {
    format!(
        "{} [{}] [thread:{:?}] {}:{} - {}",
        format_timestamp(),
        record.level(),
        std::thread::current().id(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args()
    )
}

impl Log for LineLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record);
        match &self.output {
            Output::Stdout => println!("{}", line),
            Output::Daily(state) => {
                let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
                state.roll_if_needed();
                if let Err(e) = writeln!(state.file, "{}", line) {
                    eprintln!("Failed to write to log file: {}", e);
                    eprintln!("{}", line);
                }
            }
        }
    }

    fn flush(&self) {
        match &self.output {
            Output::Stdout => {
                std::io::stdout().flush().ok();
            }
            Output::Daily(state) => {
                let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
                state.file.flush().ok();
            }
        }
    }
}

/// Format current time as YYYY-MM-DDTHH:MM:SS (UTC)
pub fn format_timestamp() -> String {
    let secs = unix_seconds();
    let (year, month, day) = civil_from_days((secs / 86400) as i64);
    let time_of_day = secs % 86400;
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        year,
        month,
        day,
        time_of_day / 3600,
        (time_of_day % 3600) / 60,
        time_of_day % 60
    )
}

/// Format current date as YYYY-MM-DD (UTC)
pub fn format_today() -> String {
    let (year, month, day) = civil_from_days((unix_seconds() / 86400) as i64);
    format!("{:04}-{:02}-{:02}", year, month, day)
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Days since the Unix epoch to (year, month, day), Howard Hinnant's algorithm.
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

/// Debug in debug builds, Info in release builds.
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install a [`LineLogger`] as the global `log` backend.
///
/// Only the first successful call per process takes effect; later calls are ignored.
pub fn init_logger(target: LogTarget, max_level: LevelFilter) -> std::io::Result<()> {
    let logger = LineLogger::new(target, max_level)?;
    // set_logger needs a &'static; the leak is a one-time cost per process.
    if log::set_logger(Box::leak(Box::new(logger))).is_ok() {
        log::set_max_level(max_level);
    }
    Ok(())
}

pub fn init_stdout_logger() {
    // Stdout never fails to open.
    init_logger(LogTarget::Stdout, default_level()).ok();
}

pub fn init_file_logger(dir: impl Into<PathBuf>) -> std::io::Result<()> {
    init_logger(LogTarget::Directory(dir.into()), default_level())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_civil_from_days_epoch() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
    }

    #[test]
    fn test_civil_from_days_leap_year() {
        assert_eq!(civil_from_days(11016), (2000, 2, 29));
    }

    #[test]
    fn test_format_timestamp_structure() {
        let ts = format_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[16..17], ":");
    }

    #[test]
    fn test_daily_file_rolls_over_to_today() {
        let dir = std::env::temp_dir().join(format!("paf-log-test-{}-roll", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let logger = LineLogger::new(LogTarget::Directory(dir.clone()), LevelFilter::Info)
            .expect("Failed to create logger");

        // pretend the logger was opened on an old date
        let stale_path = dir.join("1999-01-01.log");
        if let Output::Daily(state) = &logger.output {
            let mut state = state.lock().unwrap();
            state.current_date = "1999-01-01".to_string();
            state.file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&stale_path)
                .unwrap();
        }

        let record = log::RecordBuilder::new()
            .level(log::Level::Info)
            .file(Some("roll.rs"))
            .line(Some(7))
            .args(format_args!("after rollover"))
            .build();
        logger.log(&record);
        logger.flush();

        let today = dir.join(format!("{}.log", format_today()));
        let content = fs::read_to_string(&today).unwrap();
        assert!(content.contains("after rollover"));
        assert_eq!(fs::read_to_string(&stale_path).unwrap(), "");

        fs::remove_dir_all(&dir).ok();
    }
}
