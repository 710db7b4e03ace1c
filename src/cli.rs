// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Command line interface for the agents resources.

use agents_kruise::client::AgentsResource;
use agents_kruise::config::Config;
use agents_kruise::kubernetes::{self, create_client};
use agents_kruise::types::{HasConditions, Sandbox, SandboxClaim, SandboxSet};
use agents_kruise::{ResourceClient, SandboxClaimClient, SandboxClient, SandboxSetClient};
use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use futures::StreamExt;
use kube::api::WatchEvent;
use kube::ResourceExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Manage OpenKruise agents sandboxes, sandbox sets and claims
#[derive(Parser, Debug)]
#[command(name = "agents-kruise", version)]
pub struct Args {
    /// Kubeconfig file to use instead of in-cluster or default config
    #[arg(long, global = true)]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context (or set KUBECONFIG_CONTEXT env var)
    #[arg(long, global = true, env = "KUBECONFIG_CONTEXT")]
    pub context: Option<String>,

    /// Namespace (or set AGENTS_NAMESPACE env var)
    #[arg(short, long, global = true, env = "AGENTS_NAMESPACE")]
    pub namespace: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate, install and inspect the CRDs
    #[command(subcommand)]
    Crd(CrdCommand),
    /// Operate on Sandbox resources
    #[command(subcommand)]
    Sandbox(SandboxCommand),
    /// Operate on SandboxSet resources
    #[command(name = "sandboxset")]
    #[command(subcommand)]
    SandboxSet(SandboxSetCommand),
    /// Operate on SandboxClaim resources
    #[command(subcommand)]
    Claim(ClaimCommand),
}

#[derive(Subcommand, Debug)]
pub enum CrdCommand {
    /// Print the generated CRDs as YAML
    Print,
    /// Install or update the CRDs with server-side apply
    Apply,
    /// Block until the API server serves every agents kind
    Wait {
        #[arg(long, default_value_t = 600)]
        timeout_secs: u64,
    },
    /// Print the openAPIV3Schema of a CRD YAML file as JSON
    Schema { file: PathBuf },
}

/// Operations every resource kind supports
#[derive(Subcommand, Debug)]
pub enum CommonCommand {
    /// List resources, one line each
    List(SelectorArgs),
    /// Print a resource as YAML
    Get { name: String },
    Delete {
        name: String,
        #[arg(long)]
        grace_period: Option<u32>,
    },
    /// Delete every resource matching the selectors
    DeleteAll(SelectorArgs),
    /// Wait for a status condition
    Wait {
        name: String,
        #[arg(long, default_value = "Ready")]
        condition: String,
        #[arg(long, default_value = "True")]
        status: String,
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Stream change events
    Watch {
        #[command(flatten)]
        selectors: SelectorArgs,
        #[arg(long)]
        timeout_secs: Option<u32>,
    },
}

#[derive(ClapArgs, Debug)]
pub struct SelectorArgs {
    #[arg(short = 'l', long)]
    pub selector: Option<String>,
    #[arg(long)]
    pub field_selector: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum SandboxCommand {
    #[command(flatten)]
    Common(CommonCommand),
    Pause { name: String },
    Resume { name: String },
}

#[derive(Subcommand, Debug)]
pub enum SandboxSetCommand {
    #[command(flatten)]
    Common(CommonCommand),
    Scale { name: String, replicas: i32 },
}

#[derive(Subcommand, Debug)]
pub enum ClaimCommand {
    #[command(flatten)]
    Common(CommonCommand),
    /// Claim sandboxes from a SandboxSet
    Create {
        name: String,
        #[arg(long)]
        template: String,
        #[arg(long, default_value_t = 1)]
        replicas: i32,
        /// Wait for the claim to complete
        #[arg(long)]
        wait: bool,
    },
}

pub async fn run(args: Args, mut config: Config) -> Result<()> {
    if let Some(namespace) = args.namespace {
        config.namespace = namespace;
    }
    if args.context.is_some() {
        config.context = args.context;
    }

    match args.command {
        Command::Crd(cmd) => run_crd(cmd, args.kubeconfig, &config).await,
        Command::Sandbox(cmd) => {
            let client = connect(args.kubeconfig.as_deref(), &config).await?;
            run_sandbox(cmd, SandboxClient::from_config(client, &config), &config).await
        }
        Command::SandboxSet(cmd) => {
            let client = connect(args.kubeconfig.as_deref(), &config).await?;
            run_sandboxset(cmd, SandboxSetClient::from_config(client, &config), &config).await
        }
        Command::Claim(cmd) => {
            let client = connect(args.kubeconfig.as_deref(), &config).await?;
            run_claim(cmd, SandboxClaimClient::from_config(client, &config), &config).await
        }
    }
}

async fn connect(kubeconfig: Option<&Path>, config: &Config) -> Result<kube::Client> {
    Ok(create_client(kubeconfig, config.context.clone()).await?)
}

/// CRD commands; only apply and wait talk to the cluster
async fn run_crd(
    command: CrdCommand,
    kubeconfig: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    match command {
        CrdCommand::Print => print!("{}", kubernetes::crds_yaml()?),
        CrdCommand::Schema { file } => {
            let yaml = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let schema = kubernetes::extract_schema(&yaml)?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        CrdCommand::Apply => {
            let client = connect(kubeconfig.as_deref(), config).await?;
            kubernetes::apply_crds(&client).await?;
            info!("CRDs applied");
        }
        CrdCommand::Wait { timeout_secs } => {
            let client = connect(kubeconfig.as_deref(), config).await?;
            tokio::time::timeout(
                Duration::from_secs(timeout_secs),
                kubernetes::wait_for_crds(&client),
            )
            .await
            .context("Timed out waiting for agents CRDs")??;
        }
    }
    Ok(())
}

async fn run_sandbox(
    command: SandboxCommand,
    sandboxes: SandboxClient,
    config: &Config,
) -> Result<()> {
    match command {
        SandboxCommand::Common(common) => {
            run_common(&sandboxes, common, config, summarize_sandbox).await
        }
        SandboxCommand::Pause { name } => print_yaml(&sandboxes.pause(&name, None).await?),
        SandboxCommand::Resume { name } => print_yaml(&sandboxes.resume(&name, None).await?),
    }
}

async fn run_sandboxset(
    command: SandboxSetCommand,
    sets: SandboxSetClient,
    config: &Config,
) -> Result<()> {
    match command {
        SandboxSetCommand::Common(common) => {
            run_common(&sets, common, config, summarize_sandboxset).await
        }
        SandboxSetCommand::Scale { name, replicas } => {
            let set = sets.scale(&name, replicas, None).await?;
            println!("{}", summarize_sandboxset(&set));
            Ok(())
        }
    }
}

async fn run_claim(
    command: ClaimCommand,
    claims: SandboxClaimClient,
    config: &Config,
) -> Result<()> {
    match command {
        ClaimCommand::Common(common) => {
            run_common(&claims, common, config, summarize_claim).await
        }
        ClaimCommand::Create {
            name,
            template,
            replicas,
            wait,
        } => {
            let mut claim = claims.claim(&name, &template, replicas, None).await?;
            if wait {
                claim = claims
                    .wait_for_completion(&name, config.wait_timeout, None)
                    .await?;
            }
            println!("{}", summarize_claim(&claim));
            Ok(())
        }
    }
}

async fn run_common<K: AgentsResource>(
    resources: &ResourceClient<K>,
    command: CommonCommand,
    config: &Config,
    summarize: fn(&K) -> String,
) -> Result<()> {
    match command {
        CommonCommand::List(selectors) => {
            let items = resources
                .list(
                    selectors.selector.as_deref(),
                    selectors.field_selector.as_deref(),
                    None,
                )
                .await?;
            for item in &items {
                println!("{}", summarize(item));
            }
        }
        CommonCommand::Get { name } => print_yaml(&resources.get(&name, None).await?)?,
        CommonCommand::Delete { name, grace_period } => {
            resources.delete(&name, grace_period, None).await?
        }
        CommonCommand::DeleteAll(selectors) => {
            let count = resources
                .delete_collection(
                    selectors.selector.as_deref(),
                    selectors.field_selector.as_deref(),
                    None,
                )
                .await?;
            println!("{} deletions started", count);
        }
        CommonCommand::Wait {
            name,
            condition,
            status,
            timeout_secs,
        } => {
            let timeout = timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(config.wait_timeout);
            let obj = resources
                .wait_for_condition(&name, &condition, &status, timeout, None)
                .await?;
            println!("{}", summarize(&obj));
        }
        CommonCommand::Watch {
            selectors,
            timeout_secs,
        } => {
            let mut events = resources
                .watch(
                    selectors.selector.as_deref(),
                    selectors.field_selector.as_deref(),
                    timeout_secs,
                    None,
                )
                .await?;
            while let Some(event) = events.next().await {
                match event? {
                    WatchEvent::Added(obj) => println!("ADDED\t{}", summarize(&obj)),
                    WatchEvent::Modified(obj) => println!("MODIFIED\t{}", summarize(&obj)),
                    WatchEvent::Deleted(obj) => println!("DELETED\t{}", summarize(&obj)),
                    WatchEvent::Bookmark(_) => {}
                    WatchEvent::Error(e) => warn!("Watch ended with error: {}", e),
                }
            }
        }
    }
    Ok(())
}

fn print_yaml<K: serde::Serialize>(obj: &K) -> Result<()> {
    print!("{}", serde_yaml::to_string(obj)?);
    Ok(())
}

fn ready_marker<K: HasConditions>(obj: &K) -> &'static str {
    if obj.is_ready() {
        "Ready"
    } else {
        "NotReady"
    }
}

fn summarize_sandbox(sandbox: &Sandbox) -> String {
    format!(
        "{}\t{:?}\t{}\t{}",
        sandbox.name_any(),
        sandbox.phase(),
        ready_marker(sandbox),
        sandbox.pod_ip().unwrap_or("-")
    )
}

fn summarize_sandboxset(set: &SandboxSet) -> String {
    format!(
        "{}\t{}/{}\t{}",
        set.name_any(),
        set.available_replicas(),
        set.desired_replicas(),
        ready_marker(set)
    )
}

fn summarize_claim(claim: &SandboxClaim) -> String {
    format!(
        "{}\t{}\t{:?}\t{}/{}",
        claim.name_any(),
        claim.spec.template_name,
        claim.phase(),
        claim.claimed_replicas(),
        claim.requested_replicas()
    )
}
