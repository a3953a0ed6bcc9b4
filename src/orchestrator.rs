//! Configuration orchestrator.
//!
//! This module coordinates a full generation run: building the topology,
//! rendering every node, writing the server configuration to disk and
//! producing the operator report.

use crate::config::NetworkSpec;
use crate::node::render;
use crate::topology::{self, Topology};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// How the operator report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// Rendered WireGuard configuration files
    #[default]
    Text,
    /// Node descriptors as JSON
    Json,
}

/// Options for a generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Where the server configuration is written
    pub output_path: PathBuf,
    /// Render everything but leave the filesystem untouched
    pub dry_run: bool,
}

/// Rendered configuration for one member
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMember {
    pub index: usize,
    pub public_key: String,
    pub config: String,
}

/// Everything produced by a generation run
#[derive(Debug, Clone)]
pub struct Generated {
    pub topology: Topology,
    pub server_config: String,
    pub members: Vec<RenderedMember>,
    /// Set when the server configuration was written to disk
    pub written_to: Option<PathBuf>,
}

/// Build the topology, render all nodes and write the server configuration
pub fn generate(spec: &NetworkSpec, options: &GenerateOptions) -> Result<Generated> {
    let topology = topology::build(spec).wrap_err("Failed to build nodes")?;

    let server_config = render(&topology.server);
    let members = topology
        .members
        .iter()
        .map(|member| RenderedMember {
            index: member.index,
            public_key: member.public_key.clone(),
            config: render(&member.node),
        })
        .collect();

    let written_to = if options.dry_run {
        info!(
            "Dry run: not writing server configuration to {:?}",
            options.output_path
        );
        None
    } else {
        write_server_config(&options.output_path, &server_config)?;
        Some(options.output_path.clone())
    };

    Ok(Generated {
        topology,
        server_config,
        members,
        written_to,
    })
}

/// Write the server configuration, readable only by its owner
pub fn write_server_config(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create directory '{}'", parent.display()))?;
    }

    let mut file = server_config_options()
        .open(path)
        .wrap_err_with(|| format!("Failed to open server config '{}'", path.display()))?;

    // open() keeps the mode of an existing file, so narrow it before writing
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .wrap_err_with(|| format!("Failed to restrict permissions on '{}'", path.display()))?;
    }

    file.write_all(contents.as_bytes())
        .wrap_err_with(|| format!("Failed to write server config '{}'", path.display()))?;

    info!("Wrote server configuration to {:?}", path);
    Ok(())
}

// The file carries the server private key, so it is created owner-only
fn server_config_options() -> std::fs::OpenOptions {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    server_public_key: &'a str,
    server: &'a crate::node::NodeDescriptor,
    members: &'a [topology::MemberNode],
}

/// Print the server and member configurations for distribution
pub fn write_report<W: Write>(generated: &Generated, format: ReportFormat, out: &mut W) -> Result<()> {
    match format {
        ReportFormat::Text => {
            writeln!(out, "Server")?;
            writeln!(out, "{}", generated.server_config)?;
            writeln!(out)?;
            writeln!(out, "Users")?;
            for member in &generated.members {
                writeln!(out, "# user {} {}", member.index, member.public_key)?;
                writeln!(out, "{}", member.config)?;
            }
        }
        ReportFormat::Json => {
            let report = JsonReport {
                server_public_key: &generated.topology.server_public_key,
                server: &generated.topology.server,
                members: &generated.topology.members,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
