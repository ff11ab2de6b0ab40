// ═══════════════════════════════════════════════════════════════════════════════
// 📦 activity_log.rs - Appliance Activity Log (CSV)
// ═══════════════════════════════════════════════════════════════════════════════
// This module handles the append-only appliance activity log.
// Features:
// - One row per ON/OFF transition: date, time, message (no header)
// - Reopens the file in append mode for every row so nothing is lost on exit
// - In-memory mirror of the rows written this session for the live table
// - Reader that skips malformed rows, date grouping and filtered export
// ═══════════════════════════════════════════════════════════════════════════════

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::debug;

use crate::error::{Error, Result};

/// Date column format / صيغة عمود التاريخ
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time column format / صيغة عمود الوقت
pub const TIME_FORMAT: &str = "%H:%M:%S";

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Log Entry / سطر السجل
// ═══════════════════════════════════════════════════════════════════════════════

/// A single row of the activity log
/// صف واحد من سجل النشاط
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub message: String,
}

impl LogEntry {
    pub fn new(at: NaiveDateTime, message: impl Into<String>) -> Self {
        // Second precision, matching what is persisted
        let time = at.time().with_nanosecond(0).unwrap_or(at.time());

        Self {
            date: at.date(),
            time,
            message: message.into(),
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn time_string(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }

    /// Parse a CSV record; `None` for rows with the wrong shape
    /// تحليل سجل CSV؛ يرجع None للصفوف غير الصالحة
    fn from_record(record: &csv::StringRecord) -> Option<Self> {
        if record.len() != 3 {
            return None;
        }
        let date = NaiveDate::parse_from_str(record[0].trim(), DATE_FORMAT).ok()?;
        let time = NaiveTime::parse_from_str(record[1].trim(), TIME_FORMAT).ok()?;

        Some(Self {
            date,
            time,
            message: record[2].to_string(),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Activity Log / سجل النشاط
// ═══════════════════════════════════════════════════════════════════════════════

/// Append-only activity log plus the in-memory mirror shown on the home screen
pub struct ActivityLog {
    /// CSV file path / مسار ملف CSV
    path: PathBuf,

    /// Rows written during this session (newest last) / الصفوف المكتوبة في هذه الجلسة
    recent: Vec<LogEntry>,

    /// Maximum rows kept in `recent` / أقصى عدد صفوف في الذاكرة
    capacity: usize,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            recent: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries recorded this session / الإدخالات المسجلة في هذه الجلسة
    pub fn recent(&self) -> &[LogEntry] {
        &self.recent
    }

    /// Record a message: mirror it in memory and append it to the file.
    ///
    /// The mirror is updated even when the write fails so the live table
    /// still shows what happened; the write error is returned.
    pub fn record(&mut self, at: NaiveDateTime, message: impl Into<String>) -> Result<LogEntry> {
        let entry = LogEntry::new(at, message);

        self.recent.push(entry.clone());
        if self.recent.len() > self.capacity {
            self.recent.remove(0);
        }

        append_entry(&self.path, &entry)?;
        debug!(message = %entry.message, "activity logged");
        Ok(entry)
    }

    /// Read every well-formed entry of the file
    pub fn load(&self) -> Result<Vec<LogEntry>> {
        read_entries(&self.path)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 File Operations / عمليات الملفات
// ═══════════════════════════════════════════════════════════════════════════════

/// Append one row to the log file, creating it if needed
/// إضافة صف واحد إلى ملف السجل
pub fn append_entry(path: &Path, entry: &LogEntry) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record([entry.date_string(), entry.time_string(), entry.message.clone()])?;
    writer.flush()?;

    Ok(())
}

/// Read all entries, in file order, skipping malformed rows
/// قراءة جميع الإدخالات مع تخطي الصفوف غير الصالحة
pub fn read_entries(path: &Path) -> Result<Vec<LogEntry>> {
    if !path.exists() {
        return Err(Error::NoLogFile(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut entries = Vec::new();
    for (line, record) in reader.records().enumerate() {
        match record.ok().as_ref().and_then(LogEntry::from_record) {
            Some(entry) => entries.push(entry),
            None => debug!(line = line + 1, "skipping malformed log row"),
        }
    }

    Ok(entries)
}

/// Group entries by date, keeping file order inside each day
/// تجميع الإدخالات حسب التاريخ
pub fn group_by_date(entries: &[LogEntry]) -> BTreeMap<NaiveDate, Vec<&LogEntry>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&LogEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.date).or_default().push(entry);
    }
    groups
}

/// Copy the log to `dest`, optionally keeping a single date.
///
/// Only well-formed rows are copied. Returns the number of rows written.
pub fn export(src: &Path, dest: &Path, date: Option<NaiveDate>) -> Result<usize> {
    let entries = read_entries(src)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(dest)?;

    let mut written = 0;
    for entry in entries
        .iter()
        .filter(|e| date.map_or(true, |d| e.date == d))
    {
        writer.write_record([entry.date_string(), entry.time_string(), entry.message.clone()])?;
        written += 1;
    }
    writer.flush()?;

    Ok(written)
}

/// Ask the user where to save an export (uses rfd crate)
/// اختيار مكان حفظ الملف المصدّر (يستخدم مكتبة rfd)
pub fn pick_export_destination(date: Option<NaiveDate>) -> Option<PathBuf> {
    let file_name = match date {
        Some(d) => format!("appliance_logs_{}.csv", d.format(DATE_FORMAT)),
        None => "appliance_logs_export.csv".to_string(),
    };

    rfd::FileDialog::new()
        .add_filter("CSV Files", &["csv"])
        .set_title("Export Activity Log")
        .set_file_name(file_name)
        .save_file()
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Unit Tests / اختبارات الوحدة
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_record_and_read_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let mut log = ActivityLog::new(&path, 100);

        log.record(at(1, 8, 0, 0), "LIGHTS turned ON").unwrap();
        log.record(at(1, 8, 0, 0), "AIRCON turned ON").unwrap();
        log.record(at(2, 9, 30, 5), "LIGHTS turned OFF after 25:30:05").unwrap();

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries, log.recent());

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().next(), Some("2024-05-01,08:00:00,LIGHTS turned ON"));

        let groups = group_by_date(&entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&at(1, 0, 0, 0).date()].len(), 2);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        fs::write(
            &path,
            "2024-05-01,08:00:00,LIGHTS turned ON\n\
             only,two\n\
             2024-05-01,08:00:01,a,b\n\
             not-a-date,08:00:00,AIRCON turned ON\n\
             2024-05-01,08:00:16,LIGHTS turned OFF after 0:00:16\n",
        )
        .unwrap();

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].message, "LIGHTS turned OFF after 0:00:16");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_entries(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(Error::NoLogFile(_))));
    }

    #[test]
    fn test_export_filters_by_date() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("log.csv");
        let dest = dir.path().join("out.csv");
        let mut log = ActivityLog::new(&src, 10);
        log.record(at(1, 8, 0, 0), "LIGHTS turned ON").unwrap();
        log.record(at(2, 8, 0, 0), "AIRCON turned ON").unwrap();

        let written = export(&src, &dest, Some(at(2, 0, 0, 0).date())).unwrap();
        assert_eq!(written, 1);
        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "2024-05-02,08:00:00,AIRCON turned ON\n"
        );

        assert_eq!(export(&src, &dest, None).unwrap(), 2);
    }

    #[test]
    fn test_mirror_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = ActivityLog::new(dir.path().join("log.csv"), 2);
        for s in 0..5 {
            log.record(at(1, 8, 0, s), format!("entry {}", s)).unwrap();
        }
        assert_eq!(log.recent().len(), 2);
        assert_eq!(log.recent()[0].message, "entry 3");
    }

    #[test]
    fn test_entry_drops_sub_second_precision() {
        let ts = at(1, 8, 0, 1) + chrono::TimeDelta::milliseconds(750);
        let entry = LogEntry::new(ts, "x");
        assert_eq!(entry.time_string(), "08:00:01");
        assert_eq!(entry.timestamp(), at(1, 8, 0, 1));
    }
}
