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
use super::{absolute_path, basename, describe, hdfs_path, is_not_found, Command};
use anyhow::{bail, Result};
use libwebhdfesse::{transport::HttpTransport, WebHdfsClient};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct MvArgs {
    #[structopt(name = "src", required = true)]
    srcs: Vec<String>,
    #[structopt(required = true)]
    dst: String,
}

pub struct Mv<'a, T: HttpTransport> {
    hdfs: &'a WebHdfsClient<T>,
}

impl<'a, T: HttpTransport> Mv<'a, T> {
    pub fn new(hdfs: &'a WebHdfsClient<T>) -> Self {
        Self { hdfs }
    }

    /// A missing destination is a new name, not an error.
    fn dst_is_dir(&self, dst: &str) -> Result<bool> {
        match self.hdfs.get_file_dir_status(hdfs_path(dst)) {
            Ok(status) => Ok(status.file_status.is_dir()),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => bail!(describe("mv", &absolute_path(dst), &e)),
        }
    }
}

impl<'a, T: HttpTransport> Command for Mv<'a, T> {
    type Args = MvArgs;
    type Error = anyhow::Error;

    fn run(&mut self, args: Self::Args) -> Result<i32> {
        // Several sources may go only into an existing directory.
        let into_dir = self.dst_is_dir(&args.dst)?;
        if args.srcs.len() > 1 && !into_dir {
            bail!("mv: `{}': Is not a directory", absolute_path(&args.dst));
        }

        let mut has_error = false;
        for src in args.srcs.iter() {
            let dst = if into_dir {
                format!("{}/{}", absolute_path(&args.dst).trim_end_matches('/'), basename(src))
            } else {
                absolute_path(&args.dst)
            };
            if let Err(e) = self.hdfs.rename_file_dir(hdfs_path(src), &dst) {
                has_error = true;
                eprintln!("{}", describe("mv", &absolute_path(src), &e));
            }
        }
        Ok(if has_error { 1 } else { 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::mock::{client, not_found, ok, response, status, uri};
    use libwebhdfesse::transport::StatusCode;

    fn args(srcs: &[&str], dst: &str) -> MvArgs {
        MvArgs {
            srcs: srcs.iter().map(|s| s.to_string()).collect(),
            dst: dst.to_owned(),
        }
    }

    #[test]
    fn test_mv_rename() {
        let hdfs = client(vec![not_found(), ok()]);
        assert_eq!(Mv::new(&hdfs).run(args(&["/a/old"], "/a/new")).unwrap(), 0);
        assert_eq!(
            hdfs.transport().sent()[1],
            "PUT ".to_owned() + &uri("a/old?op=RENAME&destination=/a/new")
        );
    }

    #[test]
    fn test_mv_into_dir() {
        let hdfs = client(vec![status("DIRECTORY"), ok(), ok()]);
        assert_eq!(Mv::new(&hdfs).run(args(&["/a/x", "b/y"], "/dir/")).unwrap(), 0);
        let sent = hdfs.transport().sent();
        assert_eq!(sent[1], "PUT ".to_owned() + &uri("a/x?op=RENAME&destination=/dir/x"));
        assert_eq!(sent[2], "PUT ".to_owned() + &uri("b/y?op=RENAME&destination=/dir/y"));
    }

    #[test]
    fn test_mv_many_into_file_fails() {
        let hdfs = client(vec![status("FILE")]);
        assert!(Mv::new(&hdfs).run(args(&["/a", "/b"], "/c")).is_err());
        assert_eq!(hdfs.transport().sent().len(), 1);
    }

    #[test]
    fn test_mv_status_error_stops() {
        let hdfs = client(vec![response(StatusCode::GATEWAY_TIMEOUT, "")]);
        assert!(Mv::new(&hdfs).run(args(&["/a/old"], "/a/new")).is_err());
        // No rename with a guessed destination.
        assert_eq!(hdfs.transport().sent().len(), 1);
    }
}
