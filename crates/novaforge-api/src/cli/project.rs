//! Project CLI commands: generate, add-feature, list, show, deploy.

use std::time::Duration;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use novaforge_infra::hooks::trigger_build_hook;
use novaforge_types::bundle::Artifact;

use crate::state::AppState;

fn spinner(message: &str, json: bool) -> ProgressBar {
    if json {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Generate a project and write its bundle.
///
/// ```bash
/// novaforge generate "Todo App" --description "a todo list with due dates"
/// ```
pub async fn generate_project(
    state: &AppState,
    name: &str,
    description: &str,
    project_type: &str,
    json: bool,
) -> Result<()> {
    let progress = spinner("Generating page...", json);
    let result = state
        .project_service
        .generate(name, description, project_type)
        .await;
    progress.finish_and_clear();
    let outcome = result?;

    if json {
        let out = json!({
            "projectName": outcome.project,
            "fallback": outcome.fallback,
            "code": outcome.bundle,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let dir = state.project_service.project_dir(&outcome.project);
    println!();
    if outcome.fallback {
        println!(
            "  {} Model call failed; wrote an empty page for '{}'",
            style("!").yellow().bold(),
            style(&outcome.project).cyan()
        );
    } else {
        println!(
            "  {} Project '{}' generated",
            style("✓").green().bold(),
            style(&outcome.project).cyan()
        );
    }
    println!();
    for artifact in Artifact::ALL {
        println!(
            "    {} {:<11} {} bytes",
            style("•").dim(),
            artifact.file_name(),
            outcome.bundle.get(artifact).len()
        );
    }
    println!();
    println!("  Files in {}", style(dir.display()).dim());
    println!();
    Ok(())
}

/// Extend a project with a feature.
pub async fn add_feature(state: &AppState, name: &str, feature: &str, json: bool) -> Result<()> {
    let progress = spinner("Adding feature...", json);
    let result = state
        .project_service
        .add_feature(Some(name), Some(feature))
        .await;
    progress.finish_and_clear();
    let outcome = result?;

    let updated: Vec<&str> = outcome.updated.iter().map(Artifact::key).collect();

    if json {
        let out = json!({
            "projectName": outcome.project,
            "updated": updated,
            "aiFailed": outcome.ai_failed,
            "code": outcome.bundle,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    if outcome.ai_failed {
        println!(
            "  {} Model call failed; '{}' is unchanged",
            style("!").yellow().bold(),
            style(&outcome.project).cyan()
        );
    } else if updated.is_empty() {
        println!(
            "  {} The model returned no usable changes for '{}'",
            style("i").blue().bold(),
            style(&outcome.project).cyan()
        );
    } else {
        println!(
            "  {} Updated {} in '{}'",
            style("✓").green().bold(),
            updated.join(", "),
            style(&outcome.project).cyan()
        );
    }
    println!();
    Ok(())
}

/// List generated projects in a table.
pub async fn list_projects(state: &AppState, json: bool) -> Result<()> {
    let projects = state.project_service.list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!();
        println!(
            "  {} No projects yet. Create one with: {}",
            style("i").blue().bold(),
            style("novaforge generate <name> -d <description>").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Project").fg(Color::White),
        Cell::new("Site").fg(Color::White),
    ]);

    for name in &projects {
        table.add_row(vec![
            Cell::new(name).fg(Color::Cyan),
            Cell::new(format!("/{name}/")).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!("  {} project(s)", projects.len());
    println!();
    Ok(())
}

/// Print a project's files, or one of them.
pub async fn show_project(
    state: &AppState,
    name: &str,
    artifact: Option<Artifact>,
    json: bool,
) -> Result<()> {
    let (project, bundle) = state.project_service.get(name).await?;

    if let Some(artifact) = artifact {
        if json {
            let out = json!({ "projectName": project, artifact.key(): bundle.get(artifact) });
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            print!("{}", bundle.get(artifact));
        }
        return Ok(());
    }

    if json {
        let out = json!({ "projectName": project, "code": bundle });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for artifact in Artifact::ALL {
        println!();
        println!("{}", style(format!("── {} ──", artifact.file_name())).bold().cyan());
        println!("{}", bundle.get(artifact));
    }
    Ok(())
}

/// Stage a project and fire the build hook when configured.
pub async fn deploy_project(state: &AppState, name: &str, json: bool) -> Result<()> {
    let outcome = state.deploy_service.deploy(name).await?;

    // The CLI process exits right after, so the hook is awaited here.
    let hook_triggered = match &state.config.deploy.build_hook_url {
        Some(url) => Some(trigger_build_hook(&state.http_client, url).await),
        None => None,
    };

    if json {
        let out = json!({
            "projectName": outcome.project,
            "destination": outcome.destination,
            "buildHookTriggered": hook_triggered,
            "siteUrl": state.config.deploy.site_url,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Project '{}' copied to {}",
        style("✓").green().bold(),
        style(&outcome.project).cyan(),
        style(outcome.destination.display()).dim()
    );
    match hook_triggered {
        Some(true) => println!("  {} Build hook triggered", style("✓").green()),
        Some(false) => println!("  {} Build hook failed (see logs)", style("✗").red()),
        None => {}
    }
    if let Some(site_url) = &state.config.deploy.site_url {
        println!("  {}  {}", style("Site:").bold(), style(site_url).cyan());
    }
    println!();
    Ok(())
}
