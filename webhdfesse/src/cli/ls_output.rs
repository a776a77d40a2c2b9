/*
   Copyright 2021 Ivan Boldyrev

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

       http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.
*/
use chrono::TimeZone;
use libwebhdfesse::status::{FileStatus, FileType};
use number_prefix::NumberPrefix;
use std::borrow::Cow;
use std::cmp::max;
use std::io::Write;

fn format_flag_group(group: u32) -> &'static str {
    match group {
        0 => "---",
        1 => "--x",
        2 => "-w-",
        3 => "-wx",
        4 => "r--",
        5 => "r-x",
        6 => "rw-",
        7 => "rwx",
        _ => unreachable!(),
    }
}

fn format_type(type_: FileType) -> char {
    match type_ {
        FileType::Directory => 'd',
        FileType::File => '-',
        // It seems that original hdfs doesn't care about this
        // case.
        FileType::Symlink => 's',
        FileType::Unknown => '?',
    }
}

fn format_flags(flags: u32) -> String {
    let mut res = String::with_capacity(9);
    for offset in [6u32, 3, 0].iter() {
        res.push_str(format_flag_group((flags >> offset) & 0x7));
    }
    res
}

fn quote_name(name: &str) -> Cow<'_, str> {
    if name.chars().any(|c| c.is_control()) {
        Cow::Owned(
            name.chars()
                .map(|c| if c.is_control() { '?' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(name)
    }
}

pub(crate) struct Record {
    pub(crate) file_type: FileType,
    pub(crate) perm: u32,
    pub(crate) replication: u32,
    pub(crate) owner: Box<str>,
    pub(crate) group: Box<str>,
    pub(crate) size: u64,
    pub(crate) timestamp: u64,
    pub(crate) path: Box<str>,
}

impl Record {
    pub(crate) fn from_file_status(entry: FileStatus, atime: bool) -> Self {
        Record {
            file_type: entry.kind(),
            perm: entry.fs_permission().map(|p| p.0 as u32).unwrap_or(0),
            replication: entry.replication.unwrap_or(0),
            owner: entry.owner.unwrap_or_default().into_boxed_str(),
            group: entry.group.unwrap_or_default().into_boxed_str(),
            size: entry.length.unwrap_or(0),
            timestamp: if atime {
                entry.access_time
            } else {
                entry.modification_time
            }
            .unwrap_or(0),
            path: entry.path_suffix.unwrap_or_default().into_boxed_str(),
        }
    }
}

pub(crate) trait FieldFormatter<W: Write> {
    fn update_len(&mut self, rec: &Record);
    fn print(&self, out: &mut W, rec: &Record) -> std::io::Result<()>;
    fn print_streaming(&self, out: &mut W, rec: &Record) -> std::io::Result<()>;
}

#[derive(Default)]
struct PermFormatter {}

impl<W: Write> FieldFormatter<W> for PermFormatter {
    fn update_len(&mut self, _rec: &Record) {
        // Fixed-size rec
    }

    fn print(&self, out: &mut W, entry: &Record) -> std::io::Result<()> {
        write!(
            out,
            "{}{}",
            format_type(entry.file_type),
            format_flags(entry.perm),
        )
    }

    fn print_streaming(&self, out: &mut W, rec: &Record) -> std::io::Result<()> {
        self.print(out, rec)
    }
}

struct ReplicationFormatter {
    max_len: usize,
}

impl ReplicationFormatter {
    fn format(entry: &Record) -> Cow<'static, str> {
        if entry.file_type == FileType::Directory {
            Cow::from("-")
        } else {
            Cow::from(format!("{}", entry.replication))
        }
    }
}

impl Default for ReplicationFormatter {
    fn default() -> Self {
        Self { max_len: 3 }
    }
}

impl<W: Write> FieldFormatter<W> for ReplicationFormatter {
    fn update_len(&mut self, entry: &Record) {
        self.max_len = max(self.max_len, Self::format(entry).chars().count());
    }

    fn print(&self, out: &mut W, entry: &Record) -> std::io::Result<()> {
        write!(out, " {0:>1$}", Self::format(entry), self.max_len)
    }

    fn print_streaming(&self, out: &mut W, entry: &Record) -> std::io::Result<()> {
        write!(out, "{}", Self::format(entry))
    }
}

#[derive(Default)]
struct SimpleSizeFormatter {}

impl<W: Write> FieldFormatter<W> for SimpleSizeFormatter {
    fn update_len(&mut self, _entry: &Record) {}

    fn print(&self, out: &mut W, entry: &Record) -> std::io::Result<()> {
        write!(out, " {0:>10}", entry.size)
    }

    fn print_streaming(&self, out: &mut W, entry: &Record) -> std::io::Result<()> {
        write!(out, "{}", entry.size)
    }
}

struct HumanSizeFormatter {
    max_len: usize,
}

impl HumanSizeFormatter {
    fn format(val: u64) -> String {
        match NumberPrefix::binary(val as f64) {
            NumberPrefix::Standalone(bytes) => format!("{:.0}", bytes),
            NumberPrefix::Prefixed(pref, n) => format!("{:.1} {}", n, &pref.symbol()[0..1]),
        }
    }
}

impl Default for HumanSizeFormatter {
    fn default() -> Self {
        Self { max_len: 10 }
    }
}

impl<W: Write> FieldFormatter<W> for HumanSizeFormatter {
    fn update_len(&mut self, entry: &Record) {
        self.max_len = max(self.max_len, Self::format(entry.size).chars().count());
    }

    fn print(&self, out: &mut W, entry: &Record) -> std::io::Result<()> {
        write!(out, "{0:>1$}", Self::format(entry.size), self.max_len + 1)
    }

    fn print_streaming(&self, out: &mut W, entry: &Record) -> std::io::Result<()> {
        write!(out, "{}", Self::format(entry.size))
    }
}

struct DateFormatter {
    max_len: usize,
    tz_offset: chrono::FixedOffset,
}

impl DateFormatter {
    fn new(tz_offset: chrono::FixedOffset) -> Self {
        Self {
            max_len: 0,
            tz_offset,
        }
    }

    fn format_datetime(&self, entry: &Record) -> String {
        // millisec to secs; we don't need the millisecond part
        match self
            .tz_offset
            .timestamp_opt(entry.timestamp as i64 / 1000, 0)
            .single()
        {
            Some(time) => time.format("%Y-%m-%d %H:%M").to_string(),
            None => "?".to_owned(),
        }
    }
}

impl<W: Write> FieldFormatter<W> for DateFormatter {
    fn update_len(&mut self, entry: &Record) {
        self.max_len = max(self.max_len, self.format_datetime(entry).chars().count());
    }

    fn print(&self, out: &mut W, entry: &Record) -> std::io::Result<()> {
        write!(
            out,
            "{0:>1$}",
            self.format_datetime(entry),
            self.max_len + 1
        )
    }

    fn print_streaming(&self, out: &mut W, entry: &Record) -> std::io::Result<()> {
        write!(out, "{}", self.format_datetime(entry))
    }
}

#[derive(Default)]
struct OwnerFormatter {
    max_len: usize,
}

impl<W: Write> FieldFormatter<W> for OwnerFormatter {
    fn update_len(&mut self, entry: &Record) {
        self.max_len = max(self.max_len, entry.owner.chars().count());
    }

    fn print(&self, out: &mut W, entry: &Record) -> std::io::Result<()> {
        write!(out, " {0:1$}", entry.owner, self.max_len)
    }

    fn print_streaming(&self, out: &mut W, entry: &Record) -> std::io::Result<()> {
        write!(out, "{}", entry.owner)
    }
}

#[derive(Default)]
struct GroupFormatter {
    max_len: usize,
}

impl<W: Write> FieldFormatter<W> for GroupFormatter {
    fn update_len(&mut self, entry: &Record) {
        self.max_len = max(self.max_len, entry.group.chars().count());
    }

    fn print(&self, out: &mut W, entry: &Record) -> std::io::Result<()> {
        write!(out, " {0:1$}", entry.group, self.max_len)
    }

    fn print_streaming(&self, out: &mut W, entry: &Record) -> std::io::Result<()> {
        write!(out, "{}", entry.group)
    }
}

/// Entries of a listing carry only the last path component; a status
/// of the listed path itself has an empty one.
struct NameFormatter {
    base: String,
    quote: bool,
}

impl NameFormatter {
    fn new(base: &str, quote: bool) -> Self {
        Self {
            base: base.trim_end_matches('/').to_owned(),
            quote,
        }
    }

    fn format(&self, entry: &Record) -> String {
        let joined = if entry.path.is_empty() {
            if self.base.is_empty() {
                "/".to_owned()
            } else {
                self.base.clone()
            }
        } else {
            format!("{}/{}", self.base, entry.path)
        };
        if self.quote {
            quote_name(&joined).into_owned()
        } else {
            joined
        }
    }
}

impl<W: Write> FieldFormatter<W> for NameFormatter {
    fn update_len(&mut self, _entry: &Record) {}

    fn print(&self, out: &mut W, entry: &Record) -> std::io::Result<()> {
        write!(out, " {}", self.format(entry))
    }

    fn print_streaming(&self, out: &mut W, entry: &Record) -> std::io::Result<()> {
        write!(out, "{}", self.format(entry))
    }
}

pub(crate) struct LineFormat<W: Write> {
    pub(crate) formatters: Vec<Box<dyn FieldFormatter<W>>>,
}

impl<W: Write> LineFormat<W> {
    /// Path-only output
    pub(crate) fn compact(base: &str, quote: bool) -> Self {
        let name: Box<dyn FieldFormatter<W>> = Box::new(NameFormatter::new(base, quote));
        Self {
            formatters: vec![name],
        }
    }

    /// Full output; human is the flag that enables human-readable
    /// file size output.
    pub(crate) fn full(
        base: &str,
        human: bool,
        quote: bool,
        tz_offset: chrono::FixedOffset,
    ) -> Self {
        let mut formatters: Vec<Box<dyn FieldFormatter<W>>> = Vec::with_capacity(7);
        formatters.push(Box::new(PermFormatter::default()));
        formatters.push(Box::new(ReplicationFormatter::default()));
        formatters.push(Box::new(OwnerFormatter::default()));
        formatters.push(Box::new(GroupFormatter::default()));
        if human {
            formatters.push(Box::new(HumanSizeFormatter::default()));
        } else {
            formatters.push(Box::new(SimpleSizeFormatter::default()));
        }
        formatters.push(Box::new(DateFormatter::new(tz_offset)));
        formatters.push(Box::new(NameFormatter::new(base, quote)));
        Self { formatters }
    }

    pub(crate) fn update_len(&mut self, rec: &Record) {
        for formatter in self.formatters.iter_mut() {
            formatter.update_len(rec);
        }
    }

    pub(crate) fn print(&self, out: &mut W, rec: &Record) -> std::io::Result<()> {
        for formatter in self.formatters.iter() {
            formatter.print(out, rec)?;
        }
        writeln!(out)
    }

    /// Fields are separated with tabs, as no widths are known ahead.
    pub(crate) fn print_streaming(&self, out: &mut W, rec: &Record) -> std::io::Result<()> {
        for (idx, formatter) in self.formatters.iter().enumerate() {
            if idx != 0 {
                out.write_all(b"\t")?;
            }
            formatter.print_streaming(out, rec)?;
        }
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(file_type: FileType, path: &str, size: u64) -> Record {
        Record {
            file_type,
            perm: 0o755,
            replication: 3,
            owner: "hdfs".into(),
            group: "supergroup".into(),
            size,
            timestamp: 1371737704595,
            path: path.into(),
        }
    }

    fn utc() -> chrono::FixedOffset {
        chrono::FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_format_flags() {
        assert_eq!(format_flags(0o000), "---------");
        assert_eq!(format_flags(0o007), "------rwx");
        assert_eq!(format_flags(0o077), "---rwxrwx");
        assert_eq!(format_flags(0o777), "rwxrwxrwx");
        assert_eq!(format_flags(0o707), "rwx---rwx");
        assert_eq!(format_flags(0o123), "--x-w--wx");
        assert_eq!(format_flags(0o456), "r--r-xrw-");
        assert_eq!(format_flags(42), "---r-x-w-");
    }

    #[test]
    fn test_quote_name() {
        assert_eq!(quote_name("plain"), "plain");
        assert_eq!(quote_name("new\nline"), "new?line");
    }

    #[test]
    fn test_full_line() {
        let rec = record(FileType::File, "example.txt", 90);
        let mut format = LineFormat::<Vec<u8>>::full("/user/hdfs", false, false, utc());
        format.update_len(&rec);
        let mut out = vec![];
        format.print(&mut out, &rec).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "-rwxr-xr-x   3 hdfs supergroup         90 2013-06-20 14:15 /user/hdfs/example.txt\n"
        );
    }

    #[test]
    fn test_dir_line_streaming() {
        let rec = record(FileType::Directory, "data", 0);
        let format = LineFormat::<Vec<u8>>::full("/user/hdfs/", true, false, utc());
        let mut out = vec![];
        format.print_streaming(&mut out, &rec).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "drwxr-xr-x\t-\thdfs\tsupergroup\t0\t2013-06-20 14:15\t/user/hdfs/data\n"
        );
    }

    #[test]
    fn test_compact_status_of_itself() {
        let rec = record(FileType::File, "", 90);
        let format = LineFormat::<Vec<u8>>::compact("/user/hdfs/file", false);
        let mut out = vec![];
        format.print_streaming(&mut out, &rec).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "/user/hdfs/file\n");
    }

    #[test]
    fn test_human_size() {
        assert_eq!(HumanSizeFormatter::format(90), "90");
        assert_eq!(HumanSizeFormatter::format(134217728), "128.0 M");
    }

    #[test]
    fn test_record_from_partial_status() {
        let status: FileStatus = serde_json::from_str(
            r#"{"owner":"hdfs","pathSuffix":"data","type":"DIRECTORY","modificationTime":7}"#,
        )
        .unwrap();
        let rec = Record::from_file_status(status, false);
        assert_eq!(rec.file_type, FileType::Directory);
        assert_eq!(&*rec.owner, "hdfs");
        assert_eq!(&*rec.group, "");
        assert_eq!(rec.size, 0);
        assert_eq!(rec.timestamp, 7);
        assert_eq!(rec.perm, 0);

        let status: FileStatus = serde_json::from_str(r#"{"type":"SOCKET"}"#).unwrap();
        let rec = Record::from_file_status(status, true);
        assert_eq!(format_type(rec.file_type), '?');
        assert_eq!(rec.timestamp, 0);
    }
}
