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
use std::io::{self, Write};

use super::{absolute_path, describe, hdfs_path, Command};
use anyhow::Result;
use libwebhdfesse::{transport::HttpTransport, WebHdfsClient};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "stat", about = "Print file status as JSON")]
pub struct StatArgs {
    #[structopt(name = "path", required = true)]
    paths: Vec<String>,
}

pub struct Stat<'a, T: HttpTransport> {
    hdfs: &'a WebHdfsClient<T>,
}

impl<'a, T: HttpTransport> Stat<'a, T> {
    pub fn new(hdfs: &'a WebHdfsClient<T>) -> Self {
        Self { hdfs }
    }

    fn stat<W: Write>(&self, out: &mut W, paths: &[String]) -> Result<i32> {
        let mut has_error = false;

        for path in paths.iter() {
            match self.hdfs.get_file_dir_status(hdfs_path(path)) {
                Ok(status) => {
                    let res = serde_json::to_writer_pretty(&mut *out, &status)
                        .map_err(io::Error::from)
                        .and_then(|()| writeln!(out));
                    match res {
                        Ok(()) => {}
                        // Exit early because of EPIPE
                        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => break,
                        Err(e) => return Err(e.into()),
                    }
                }
                Err(e) => {
                    has_error = true;
                    eprintln!("{}", describe("stat", &absolute_path(path), &e));
                }
            }
        }
        Ok(if has_error { 1 } else { 0 })
    }
}

impl<'a, T: HttpTransport> Command for Stat<'a, T> {
    type Args = StatArgs;
    type Error = anyhow::Error;

    fn run(&mut self, args: Self::Args) -> Result<i32> {
        let stdout_obj = io::stdout();
        let mut stdout = stdout_obj.lock();
        self.stat(&mut stdout, &args.paths)
    }
}
