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
use std::cmp::Reverse;
use std::io::Write;

use super::{absolute_path, describe, hdfs_path, Command};
use crate::cli::ls_output::{LineFormat, Record};
use libwebhdfesse::{transport::HttpTransport, WebHdfsClient, WebHdfsError};
use structopt::StructOpt;
use thiserror::Error;
use tracing::{span, trace, Level};

/*
 * See
 * hadoop/hadoop-common-project/hadoop-common/src/main/java/org/apache/hadoop/fs/shell/Ls.java
 */
// ls options are factored out to separate struct for convenience.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "ls",
    about = "List the contents that match the specified file pattern."
)]
pub struct LsOpts {
    #[structopt(
        short,
        name = "directory",
        help = "Directories are listed as plain files"
    )]
    directory: bool,
    #[structopt(
        short = "t",
        name = "sort_mtime",
        conflicts_with = "stream",
        help = "Sort output by modification time (most recent first)"
    )]
    sort_mtime: bool,
    #[structopt(
        short = "u",
        help = "Use access time rather than modification time for display and sorting"
    )]
    atime: bool,
    #[structopt(short = "C", help = "Display the paths of files and directories only")]
    path_only: bool,
    #[structopt(short = "r", help = "Reverse the sort order")]
    sort_reversed: bool,
    #[structopt(
        short = "S",
        conflicts_with = "sort_mtime",
        conflicts_with = "stream",
        help = "Sort output by file size"
    )]
    sort_size: bool,
    #[structopt(short = "q", help = "Print ? instead of non-printable characters")]
    quote: bool,
    #[structopt(
        short = "h",
        help = "Formats the sizes of files in a human-readable fashion"
    )]
    human: bool,
    #[structopt(long = "stream", help = "Streaming mode")]
    stream: bool,
}

#[derive(Debug, StructOpt)]
pub struct LsArgs {
    #[structopt(flatten)]
    opts: LsOpts,
    #[structopt(name = "path", default_value = "/")]
    paths: Vec<String>,
}

#[derive(Debug, Error)]
pub enum LsError {
    #[error("{0}")]
    Fs(String),
    #[error(transparent)]
    LocalIo(std::io::Error),
}

pub struct Ls<'a, T: HttpTransport> {
    hdfs: &'a WebHdfsClient<T>,
}

impl<'a, T: HttpTransport> Ls<'a, T> {
    pub fn new(hdfs: &'a WebHdfsClient<T>) -> Self {
        Self { hdfs }
    }

    fn fs_error(path: &str, e: WebHdfsError<T::Error>) -> LsError {
        LsError::Fs(describe("ls", path, &e))
    }

    fn sort(data: &mut Vec<Record>, args: &LsOpts) {
        let span = span!(Level::TRACE, "sort", len = data.len());
        let _enter = span.enter();

        if args.sort_mtime {
            if args.sort_reversed {
                data.sort_unstable_by_key(|a| a.timestamp);
            } else {
                // Please note that by default `hdfs dfs -ls` sorts
                // by timestamp from newer to older.
                data.sort_unstable_by_key(|a| Reverse(a.timestamp));
            }
        } else if args.sort_size {
            if args.sort_reversed {
                data.sort_unstable_by_key(|a| a.size);
            } else {
                // Please note that by default `hdfs dfs -ls` sorts
                // by file size from largest to smallest.
                data.sort_unstable_by_key(|a| Reverse(a.size));
            }
        } else {
            // Server returns entries sorted by name; can be just
            // reversed if needed.
            if args.sort_reversed {
                data.reverse();
            }
        }
        trace!("sorted");
    }

    fn list_dir(&mut self, path_str: &str, args: &LsOpts) -> Result<(), LsError> {
        let path = hdfs_path(path_str);
        let display_path = absolute_path(path_str);

        let stdout_obj = std::io::stdout();
        let mut stdout = std::io::LineWriter::new(stdout_obj.lock());

        let status = self
            .hdfs
            .get_file_dir_status(path)
            .map_err(|e| Self::fs_error(&display_path, e))?
            .file_status;

        let mut data = if args.directory || !status.is_dir() {
            vec![Record::from_file_status(status, args.atime)]
        } else {
            self.hdfs
                .list_dir(path)
                .map_err(|e| Self::fs_error(&display_path, e))?
                .into_entries()
                .into_iter()
                .map(|ent| Record::from_file_status(ent, args.atime))
                .collect()
        };

        // Our installation uses old Java with old timezone data; but
        // we use local timezone data which is updated with system
        // updates.
        let tz_offset = *chrono::Local::now().offset();
        let mut format = if args.path_only {
            LineFormat::compact(&display_path, args.quote)
        } else {
            LineFormat::full(&display_path, args.human, args.quote, tz_offset)
        };

        if args.stream {
            // No sorting and no column alignment: everything is
            // printed as soon as it is known.
            for rec in data.iter() {
                format
                    .print_streaming(&mut stdout, rec)
                    .map_err(LsError::LocalIo)?;
            }
        } else {
            if !args.path_only && !args.directory && status_is_listing(&data) {
                writeln!(stdout, "Found {} items", data.len()).map_err(LsError::LocalIo)?;
            }
            Self::sort(&mut data, args);

            for entry in data.iter() {
                format.update_len(entry);
            }
            for entry in data.iter() {
                format.print(&mut stdout, entry).map_err(LsError::LocalIo)?;
            }
        }
        Ok(())
    }
}

// Single-file status has an empty name.
fn status_is_listing(data: &[Record]) -> bool {
    data.first().map(|rec| !rec.path.is_empty()).unwrap_or(true)
}

impl<'a, T: HttpTransport> Command for Ls<'a, T> {
    type Args = LsArgs;
    type Error = LsError;

    fn run(&mut self, args: Self::Args) -> Result<i32, Self::Error> {
        let mut has_err = false;
        for path in args.paths {
            if let Err(e) = self.list_dir(&path, &args.opts) {
                if let LsError::LocalIo(ioe) = &e {
                    if ioe.kind() == std::io::ErrorKind::BrokenPipe {
                        // Exit early because of EPIPE
                        break;
                    }
                }
                has_err = true;
                eprintln!("{}", e);
            }
        }
        Ok(if has_err { 1 } else { 0 })
    }
}
