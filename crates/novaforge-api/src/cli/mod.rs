//! CLI command definitions for the `novaforge` binary.
//!
//! Uses clap derive macros for argument parsing. Every project operation the
//! HTTP API exposes has a matching subcommand.

pub mod project;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use novaforge_types::bundle::Artifact;

/// Generate, extend and stage AI-built websites.
#[derive(Parser)]
#[command(name = "novaforge", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ./novaforge.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on (overrides the config file).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides the config file).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate a new project from a description.
    #[command(alias = "new")]
    Generate {
        /// Project name.
        name: String,

        /// What the site should do.
        #[arg(short, long, default_value = "")]
        description: String,

        /// Project type hint passed to the model.
        #[arg(long = "type", default_value = "custom")]
        project_type: String,
    },

    /// Add a feature to an existing project.
    AddFeature {
        /// Project name.
        name: String,

        /// Feature to add.
        feature: String,
    },

    /// List generated projects.
    #[command(alias = "ls")]
    List,

    /// Print a project's files.
    Show {
        /// Project name.
        name: String,

        /// Print only one artifact (html, css, js, backend).
        #[arg(long)]
        artifact: Option<Artifact>,
    },

    /// Copy a project into the deploy staging directory.
    Deploy {
        /// Project name.
        name: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_show_with_artifact() {
        let cli = Cli::parse_from(["novaforge", "--json", "show", "Blog", "--artifact", "css"]);
        assert!(cli.json);
        match cli.command {
            Commands::Show { name, artifact } => {
                assert_eq!(name, "Blog");
                assert_eq!(artifact, Some(Artifact::Css));
            }
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn test_parse_generate_defaults() {
        let cli = Cli::parse_from(["novaforge", "generate", "Todo App"]);
        match cli.command {
            Commands::Generate {
                name,
                description,
                project_type,
            } => {
                assert_eq!(name, "Todo App");
                assert_eq!(description, "");
                assert_eq!(project_type, "custom");
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["novaforge", "-v", "serve", "--port", "8080"]);
        assert_eq!(cli.verbose, 1);
        assert!(matches!(
            cli.command,
            Commands::Serve { port: Some(8080), host: None }
        ));
    }
}
