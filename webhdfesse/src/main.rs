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
mod cli;
use std::time::Duration;

use anyhow::{anyhow, Result};
use cli::Command;
use libwebhdfesse::{hdconfig, transport::ReqwestTransport, ClientConfig, WebHdfsClient};
use structopt::StructOpt;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(StructOpt)]
struct WebhdfesseApp {
    #[structopt(
        long,
        help = "NameNode WebHDFS address as host:port; hdfs-site.xml is used if omitted"
    )]
    namenode: Option<String>,
    #[structopt(
        long,
        help = "WebHDFS user.name; HADOOP_USER_NAME or the current user if omitted"
    )]
    user: Option<String>,
    #[structopt(long, help = "HTTP request timeout, in seconds")]
    timeout: Option<u64>,
    #[structopt(subcommand)]
    subcmd: TopSubcmd,
}

// The name is not visible in the command line.
#[derive(StructOpt)]
enum TopSubcmd {
    Dfs(Dfs),
}

#[derive(StructOpt)]
enum Dfs {
    #[structopt(name = "-ls")]
    Ls(cli::ls::LsArgs),
    #[structopt(name = "-mkdir")]
    Mkdir(cli::mkdir::MkdirArgs),
    #[structopt(name = "-mv")]
    Mv(cli::mv::MvArgs),
    #[structopt(name = "-rm")]
    Rm(cli::rm::RmArgs),
    #[structopt(name = "-cat")]
    Cat(cli::cat::CatArgs),
    #[structopt(name = "-put")]
    Put(cli::put::PutArgs),
    #[structopt(name = "-appendToFile")]
    AppendToFile(cli::put::AppendArgs),
    #[structopt(name = "-stat")]
    Stat(cli::stat::StatArgs),
}

fn parse_namenode(addr: &str) -> Result<(&str, &str)> {
    match addr.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok((host, port)),
        _ => Err(anyhow!(
            "invalid namenode address {:?}, expected host:port",
            addr
        )),
    }
}

fn client_config(opt: &WebhdfesseApp) -> Result<ClientConfig> {
    let mut config = match &opt.namenode {
        Some(addr) => {
            let (host, port) = parse_namenode(addr)?;
            ClientConfig::new(host, port, None)
        }
        None => ClientConfig::auto(),
    };
    config.user_name = opt.user.clone().or_else(hdconfig::default_user_name);
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_tree::HierarchicalLayer::new(2).with_writer(std::io::stderr))
        .init();

    let opt = WebhdfesseApp::from_args();

    let config = client_config(&opt)?;
    debug!(?config, "using config");
    let transport = match opt.timeout {
        Some(secs) => ReqwestTransport::with_timeout(Duration::from_secs(secs))?,
        None => ReqwestTransport::new()?,
    };
    let hdfs = WebHdfsClient::new(config, transport);

    let code = match opt.subcmd {
        TopSubcmd::Dfs(dfs) => match dfs {
            Dfs::Ls(args) => cli::ls::Ls::new(&hdfs).run(args)?,
            Dfs::Mkdir(args) => cli::mkdir::Mkdir::new(&hdfs).run(args)?,
            Dfs::Mv(args) => cli::mv::Mv::new(&hdfs).run(args)?,
            Dfs::Rm(args) => cli::rm::Rm::new(&hdfs).run(args)?,
            Dfs::Cat(args) => cli::cat::Cat::new(&hdfs).run(args)?,
            Dfs::Put(args) => cli::put::Put::new(&hdfs).run(args)?,
            Dfs::AppendToFile(args) => cli::put::AppendToFile::new(&hdfs).run(args)?,
            Dfs::Stat(args) => cli::stat::Stat::new(&hdfs).run(args)?,
        },
    };
    std::process::exit(code)
}
