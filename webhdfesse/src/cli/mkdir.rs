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
use super::{absolute_path, describe, hdfs_path, is_not_found, Command};
use anyhow::Result;
use libwebhdfesse::{
    options::MkdirsOptions, status::FsPermission, transport::HttpTransport, WebHdfsClient,
};
use structopt::StructOpt;
use thiserror::Error;

#[derive(Debug, StructOpt)]
#[structopt(name = "mkdir", about = "Create a directory in specified location")]
pub struct MkdirArgs {
    #[structopt(name = "src", required = true)]
    srcs: Vec<String>,
    #[structopt(short = "p", help = "Do not fail if the directory already exists")]
    parents: bool,
    #[structopt(short = "m", help = "Octal permission of new directories, e.g. 755")]
    mode: Option<FsPermission>,
}

#[derive(Debug, Error)]
pub enum MkdirError {
    #[error("mkdir: `{0}': File exists")]
    Exists(String),
    #[error("{0}")]
    Fs(String),
}

pub struct Mkdir<'a, T: HttpTransport> {
    hdfs: &'a WebHdfsClient<T>,
}

impl<'a, T: HttpTransport> Mkdir<'a, T> {
    pub fn new(hdfs: &'a WebHdfsClient<T>) -> Self {
        Self { hdfs }
    }

    fn mkdir(&mut self, path_str: &str, args: &MkdirArgs) -> Result<bool, MkdirError> {
        let path = hdfs_path(path_str);
        let display_path = absolute_path(path_str);

        // WebHDFS always creates parents and succeeds on existing
        // directories, so plain mkdir has to check it itself.
        if !args.parents {
            match self.hdfs.get_file_dir_status(path) {
                Ok(_) => return Err(MkdirError::Exists(display_path)),
                Err(e) if is_not_found(&e) => {}
                Err(e) => return Err(MkdirError::Fs(describe("mkdir", &display_path, &e))),
            }
        }

        let opts = MkdirsOptions {
            permission: args.mode,
            ..Default::default()
        };
        self.hdfs
            .make_dir(path, &opts)
            .map_err(|e| MkdirError::Fs(describe("mkdir", &display_path, &e)))
    }
}

impl<'a, T: HttpTransport> Command for Mkdir<'a, T> {
    type Args = MkdirArgs;
    type Error = anyhow::Error;

    fn run(&mut self, args: Self::Args) -> Result<i32> {
        let mut has_error = false;

        for path_str in args.srcs.iter() {
            if let Err(e) = self.mkdir(path_str, &args) {
                has_error = true;
                eprintln!("{}", e);
            }
        }

        Ok(if has_error { 1 } else { 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::mock::{self, client, not_found, ok, status, uri};
    use libwebhdfesse::transport::StatusCode;

    fn args(parents: bool, mode: Option<FsPermission>) -> MkdirArgs {
        MkdirArgs {
            srcs: vec!["/user/hdfs/dir".to_owned()],
            parents,
            mode,
        }
    }

    #[test]
    fn test_mkdir_existing_fails_without_parents() {
        let hdfs = client(vec![status("DIRECTORY")]);
        let res = Mkdir::new(&hdfs).mkdir("/user/hdfs/dir", &args(false, None));
        assert!(matches!(res, Err(MkdirError::Exists(ref path)) if path == "/user/hdfs/dir"));
        // Nothing is created.
        assert_eq!(
            hdfs.transport().sent(),
            ["GET ".to_owned() + &uri("user/hdfs/dir?op=GETFILESTATUS")]
        );
    }

    #[test]
    fn test_mkdir_missing_created() {
        let hdfs = client(vec![not_found(), ok()]);
        let res = Mkdir::new(&hdfs).mkdir("/user/hdfs/dir", &args(false, Some(FsPermission(0o750))));
        assert!(res.unwrap());
        assert_eq!(
            hdfs.transport().sent()[1],
            "PUT ".to_owned() + &uri("user/hdfs/dir?op=MKDIRS&permission=750")
        );
    }

    #[test]
    fn test_mkdir_parents_skips_check() {
        let hdfs = client(vec![ok()]);
        let mut cmd = Mkdir::new(&hdfs);
        assert_eq!(cmd.run(args(true, None)).unwrap(), 0);
        assert_eq!(
            hdfs.transport().sent(),
            ["PUT ".to_owned() + &uri("user/hdfs/dir?op=MKDIRS")]
        );
    }

    #[test]
    fn test_mkdir_check_error_reported() {
        let hdfs = client(vec![mock::response(StatusCode::UNAUTHORIZED, "denied")]);
        let mut cmd = Mkdir::new(&hdfs);
        assert_eq!(cmd.run(args(false, None)).unwrap(), 1);
        assert_eq!(hdfs.transport().sent().len(), 1);
    }
}
