/*
 * This file is part of release-pruner, licensed under the MIT License (MIT).
 *
 * Copyright (c) 2024 easybill GmbH
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */
use std::io::Write;
use std::path::PathBuf;
use std::process::exit;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{debug, info};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::accessor::github_accessor::GitHubAccessor;
use crate::config::RetentionRequest;
use crate::entity::acknowledgment::Acknowledgment;
use crate::executor::connectivity_executor::{check_connectivity, DEFAULT_CONNECTIVITY_TARGET};
use crate::executor::resource_executor::{fetch_deleted_version, prune_releases};

mod accessor;
mod config;
mod entity;
mod error;
mod executor;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The command line options model.
#[derive(Parser, Clone, Debug)]
#[command(version, about = "Prunes old releases (and their tags) from a GitHub repository")]
struct CommandLineOptions {
    /// The base url of the GitHub api.
    #[arg(
        long = "api-url",
        env = "RELEASE_PRUNER_API_URL",
        default_value = "https://api.github.com",
        global = true
    )]
    pub api_url: String,
    /// The maximum time in seconds to wait for a connection to be established.
    #[arg(
        long = "connect-timeout",
        env = "RELEASE_PRUNER_CONNECT_TIMEOUT",
        default_value_t = 60,
        global = true
    )]
    pub connect_timeout_seconds: u64,
    #[command(subcommand)]
    pub command: ResourceCommand,
}

/// The commands of the resource.
#[derive(Subcommand, Clone, Debug)]
enum ResourceCommand {
    /// Gets the deleted sentinel version. Nothing is fetched from GitHub.
    In {
        /// The destination directory passed by the pipeline, unused.
        directory: Option<PathBuf>,
    },
    /// Prunes the releases selected by the request that is read from stdin.
    Out {
        /// The source directory passed by the pipeline, unused.
        directory: Option<PathBuf>,
    },
    /// Checks if outbound connections can be made.
    Test {
        /// The url to request.
        #[arg(
            long = "target",
            env = "RELEASE_PRUNER_TEST_TARGET",
            default_value = DEFAULT_CONNECTIVITY_TARGET
        )]
        target: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // initializes the logger, using the "info" level if the RUST_LOG environment variable isn't set.
    // the pipeline output is not a terminal, colors are forced unless RUST_LOG_STYLE says otherwise
    env_logger::Builder::from_env(
        Env::default()
            .default_filter_or("info")
            .default_write_style_or("always"),
    )
    .try_init()
    .context("unable to initialize logging")?;

    let command_line_options = CommandLineOptions::parse();
    info!("Running release-pruner version {}", VERSION);

    let exit_code = run_command(
        command_line_options,
        tokio::io::stdin(),
        &mut std::io::stdout(),
    )
    .await?;
    exit(exit_code)
}

/// Executes the command selected in the given options. The request payload is read from
/// the given input and only the acknowledgment is written to the given output.
///
/// # Returns
/// * `i32` - The exit code of the process, only non-zero for a failed connectivity test.
async fn run_command<R, W>(
    command_line_options: CommandLineOptions,
    mut input: R,
    output: &mut W,
) -> anyhow::Result<i32>
where
    R: AsyncRead + Unpin,
    W: Write,
{
    let connect_timeout = Duration::from_secs(command_line_options.connect_timeout_seconds);
    match command_line_options.command {
        ResourceCommand::In { directory } => {
            debug!("Resource directory: {:?}", directory);
            // the payload is not needed, but the caller expects it to be consumed
            read_payload(&mut input)
                .await
                .context("unable to read request from stdin")?;
            write_acknowledgment(output, &fetch_deleted_version())?;
            Ok(0)
        }
        ResourceCommand::Out { directory } => {
            debug!("Resource directory: {:?}", directory);
            let payload = read_payload(&mut input)
                .await
                .context("unable to read request from stdin")?;
            let request = RetentionRequest::parse(&payload).context("couldn't parse request")?;

            let github_accessor = GitHubAccessor::new(
                &request.source,
                &command_line_options.api_url,
                connect_timeout,
            )
            .context("couldn't initialize GitHub client")?;
            let acknowledgment = prune_releases(&github_accessor, &request)
                .await
                .context("unable to prune releases")?;
            write_acknowledgment(output, &acknowledgment)?;
            Ok(0)
        }
        ResourceCommand::Test { target } => {
            let reachable = check_connectivity(&target, connect_timeout).await;
            Ok(if reachable { 0 } else { 1 })
        }
    }
}

async fn read_payload<R: AsyncRead + Unpin>(input: &mut R) -> anyhow::Result<String> {
    let mut payload = String::new();
    input.read_to_string(&mut payload).await?;
    Ok(payload)
}

fn write_acknowledgment<W: Write>(
    output: &mut W,
    acknowledgment: &Acknowledgment,
) -> anyhow::Result<()> {
    let json = acknowledgment
        .to_json()
        .context("unable to serialize acknowledgment")?;
    writeln!(output, "{}", json)?;
    output.flush()?;
    Ok(())
}
