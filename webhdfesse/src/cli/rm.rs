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
use super::{absolute_path, describe, hdfs_path, Command};
use anyhow::Result;
use libwebhdfesse::{transport::HttpTransport, WebHdfsClient};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct RmArgs {
    #[structopt(short = "r", help = "Remove directories recursively")]
    recursive: bool,
    #[structopt(name = "src", required = true)]
    srcs: Vec<String>,
}

pub struct Rm<'a, T: HttpTransport> {
    hdfs: &'a WebHdfsClient<T>,
}

impl<'a, T: HttpTransport> Rm<'a, T> {
    pub fn new(hdfs: &'a WebHdfsClient<T>) -> Self {
        Self { hdfs }
    }
}

impl<'a, T: HttpTransport> Command for Rm<'a, T> {
    type Args = RmArgs;
    type Error = anyhow::Error;

    fn run(&mut self, args: Self::Args) -> Result<i32> {
        let mut has_error = false;

        for src in args.srcs {
            if let Err(e) = self.hdfs.delete_file_dir(hdfs_path(&src), args.recursive) {
                has_error = true;
                eprintln!("{}", describe("rm", &absolute_path(&src), &e));
            }
        }

        Ok(has_error as _)
    }
}
