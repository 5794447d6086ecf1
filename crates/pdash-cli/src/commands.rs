use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use pdash_protocol::JsonCodec;
use pdash_service::{HierarchyService, InMemoryRecentColors, ServiceConfig};
use pdash_store::{JsonFileBackend, StoreAdapter};
use pdash_types::{sanitize_name, Group, GroupPatch, Project, ProjectPatch, StorageOption};
use serde_json::json;
use tracing::debug;

use crate::cli::*;

const CONFIG_FILE: &str = "config.toml";

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    let config_path = cli.config.clone().unwrap_or_else(|| data_dir.join(CONFIG_FILE));
    let config = ServiceConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    debug!(data_dir = %data_dir.display(), config = %config_path.display(), "opening backends");
    let mut service = open_service(&data_dir, config);
    let format = cli.format;

    match cli.command {
        Command::Migrate(_) => return cmd_migrate(&service, format).await,
        Command::Status(_) => return cmd_status(&service, &data_dir, format).await,
        Command::Config(_) => return cmd_config(&service, &config_path, format),
        _ => {}
    }

    let report = service.startup().await?;
    if report.migrated {
        eprintln!("{} Migrated projects into {}", "✓".green(), service.store().active_backend());
    }

    match cli.command {
        Command::List(args) => cmd_list(&service, args, format).await,
        Command::Find(args) => cmd_find(&service, args, format).await,
        Command::AddGroup(args) => cmd_add_group(&mut service, args, format).await,
        Command::AddProject(args) => cmd_add_project(&mut service, args, format).await,
        Command::UpdateProject(args) => cmd_update_project(&mut service, args, format).await,
        Command::UpdateGroup(args) => cmd_update_group(&mut service, args, format).await,
        Command::RemoveProject(args) => {
            let groups = service.remove_project(&args.id).await?;
            print_done(format, &format!("Removed project {}", args.id.yellow()), &groups)
        }
        Command::RemoveGroup(args) => {
            let groups = service.remove_group(&args.id, args.only_if_empty).await?;
            print_done(format, &format!("Removed group {}", args.id.yellow()), &groups)
        }
        Command::Reorder(args) => cmd_reorder(&mut service, args, format).await,
        Command::Migrate(_) | Command::Status(_) | Command::Config(_) => Ok(()),
    }
}

fn resolve_data_dir(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match flag {
        Some(dir) => Ok(dir),
        None => dirs::data_dir()
            .map(|d| d.join("pdash"))
            .context("no platform data directory; pass --data-dir"),
    }
}

pub fn open_service(data_dir: &Path, config: ServiceConfig) -> HierarchyService {
    let store = StoreAdapter::new(
        Arc::new(JsonFileBackend::settings(data_dir)),
        Arc::new(JsonFileBackend::global_state(data_dir)),
        config.use_settings_storage,
    );
    let colors = Arc::new(InMemoryRecentColors::new(config.max_recent_colors));
    HierarchyService::new(store, colors, config)
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_done(format: OutputFormat, message: &str, groups: &[Group]) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(groups)?),
        OutputFormat::Text => {
            println!("{} {}", "✓".green().bold(), message);
            Ok(())
        }
    }
}

fn print_tree(groups: &[Group], depth: usize) {
    let indent = "  ".repeat(depth);
    for group in groups {
        let marker = if group.collapsed { "▸" } else { "▾" };
        println!(
            "{}{} {} {}",
            indent,
            marker,
            group.display_name().bold(),
            format!("[{}]", group.id).dimmed()
        );
        for project in &group.projects {
            print_project(project, depth + 1);
        }
        print_tree(&group.children, depth + 1);
    }
}

fn print_project(project: &Project, depth: usize) {
    let remote = project.remote_type();
    let tag = if remote.is_remote() {
        format!(" ({remote})").cyan().to_string()
    } else {
        String::new()
    };
    println!(
        "{}{} {}{} {} {}",
        "  ".repeat(depth),
        "•".cyan(),
        project.name,
        tag,
        project.path.dimmed(),
        format!("[{}]", project.id).dimmed()
    );
}

async fn cmd_list(service: &HierarchyService, args: ListArgs, format: OutputFormat) -> anyhow::Result<()> {
    if args.raw {
        return print_json(&serde_json::to_value(service.list_unsanitized().await?)?);
    }
    if args.flat {
        let projects = service.projects_flat().await?;
        return match format {
            OutputFormat::Json => print_json(&serde_json::to_value(&projects)?),
            OutputFormat::Text => {
                for project in &projects {
                    print_project(project, 0);
                }
                Ok(())
            }
        };
    }
    let groups = service.list().await?;
    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(&groups)?),
        OutputFormat::Text => {
            if groups.is_empty() {
                println!("No projects yet.");
            }
            print_tree(&groups, 0);
            Ok(())
        }
    }
}

async fn cmd_find(service: &HierarchyService, args: FindArgs, format: OutputFormat) -> anyhow::Result<()> {
    let (project, group) = service.find_project_and_group(&args.id).await?;
    match format {
        OutputFormat::Json => print_json(&json!({ "project": project, "group": group })),
        OutputFormat::Text => {
            match (project, group) {
                (Some(project), Some(group)) => {
                    print_project(&project, 0);
                    println!("  in {} {}", group.display_name().bold(), format!("[{}]", group.id).dimmed());
                }
                _ => println!("No project {}", args.id.yellow()),
            }
            Ok(())
        }
    }
}

async fn cmd_add_group(
    service: &mut HierarchyService,
    args: AddGroupArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let name = args.name.as_deref().map(|n| sanitize_name(Some(n)));
    let group = service
        .add_group(name.as_deref().filter(|n| !n.is_empty()), Vec::new(), args.parent.as_deref())
        .await?;
    match format {
        OutputFormat::Json => print_json(&serde_json::to_value(&group)?),
        OutputFormat::Text => {
            println!("{} Created group {} {}", "✓".green().bold(), group.display_name().bold(), group.id.yellow());
            Ok(())
        }
    }
}

async fn cmd_add_project(
    service: &mut HierarchyService,
    args: AddProjectArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut project = Project::new(sanitize_name(Some(&args.name)), args.path);
    project.color = args.color.unwrap_or_default();
    project.is_git_repo = args.git;
    let id = project.id.clone();
    let groups = service.add_project(project, args.group.as_deref()).await?;
    print_done(format, &format!("Added project {}", id.yellow()), &groups)
}

async fn cmd_update_project(
    service: &mut HierarchyService,
    args: UpdateProjectArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let patch = ProjectPatch {
        name: args.name.map(|n| sanitize_name(Some(&n))),
        path: args.path,
        color: args.color,
        ..Default::default()
    };
    let found = service.update_project(&args.id, &patch).await?;
    report_update(format, "project", &args.id, found)
}

async fn cmd_update_group(
    service: &mut HierarchyService,
    args: UpdateGroupArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let patch = GroupPatch {
        group_name: args.name.map(|n| sanitize_name(Some(&n))),
        collapsed: args.collapsed,
        ..Default::default()
    };
    let found = service.update_group(&args.id, &patch).await?;
    report_update(format, "group", &args.id, found)
}

fn report_update(format: OutputFormat, kind: &str, id: &str, found: bool) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&json!({ "id": id, "found": found })),
        OutputFormat::Text => {
            if found {
                println!("{} Updated {} {}", "✓".green().bold(), kind, id.yellow());
            } else {
                println!("{} No {} {}", "!".yellow().bold(), kind, id.yellow());
            }
            Ok(())
        }
    }
}

async fn cmd_reorder(
    service: &mut HierarchyService,
    args: ReorderArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.message)
        .with_context(|| format!("reading {}", args.message.display()))?;
    let msg = JsonCodec::decode(&bytes)?;
    let outcome = service.handle_message(msg).await?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "groups": outcome.forest,
            "createdGroups": outcome.created_groups,
            "droppedGroups": outcome.dropped_groups,
            "droppedProjects": outcome.dropped_projects,
            "skippedIds": outcome.skipped_ids,
        })),
        OutputFormat::Text => {
            println!("{} Applied reorder ({} root groups)", "✓".green().bold(), outcome.forest.len());
            for id in &outcome.created_groups {
                println!("  {} {}", "created:".green(), id);
            }
            for id in outcome.dropped_groups.iter().chain(&outcome.dropped_projects) {
                println!("  {} {}", "dropped:".red(), id);
            }
            Ok(())
        }
    }
}

async fn cmd_migrate(service: &HierarchyService, format: OutputFormat) -> anyhow::Result<()> {
    let migrated = service.store().migrate_if_needed().await?;
    let filled = service.store().copy_filled_to_empty().await?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "migrated": migrated,
            "filled": filled.map(|o| o.to_string()),
        })),
        OutputFormat::Text => {
            if migrated {
                println!("{} Migrated into {}", "✓".green().bold(), service.store().active_backend());
            }
            match filled {
                Some(target) => println!("{} Copied projects into {}", "✓".green().bold(), target),
                None if !migrated => println!("Nothing to migrate."),
                None => {}
            }
            Ok(())
        }
    }
}

async fn cmd_status(service: &HierarchyService, data_dir: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let store = service.store();
    let active = store.active_backend();
    let with_data = store.backends_with_data().await?;
    let diverged = store.other_backend_has_data().await?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "dataDir": data_dir,
            "active": active.to_string(),
            "withData": with_data.iter().map(StorageOption::to_string).collect::<Vec<_>>(),
            "otherBackendHasData": diverged,
        })),
        OutputFormat::Text => {
            println!("Data dir: {}", data_dir.display().to_string().bold());
            println!("Active backend: {}", active.to_string().yellow().bold());
            for option in StorageOption::ALL {
                let state = if with_data.contains(&option) { "has data".green() } else { "empty".dimmed() };
                println!("  {option}: {state}");
            }
            if diverged {
                println!(
                    "{} {} also holds projects; run `pdash migrate` or remove it",
                    "warning:".yellow().bold(),
                    active.other()
                );
            }
            Ok(())
        }
    }
}

fn cmd_config(service: &HierarchyService, path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let config = service.config();
    match format {
        OutputFormat::Json => print_json(&json!({
            "path": path,
            "useSettingsStorage": config.use_settings_storage,
            "addNewProjectToFront": config.add_new_project_to_front,
            "maxRecentColors": config.max_recent_colors,
        })),
        OutputFormat::Text => {
            println!("# {}", path.display().to_string().dimmed());
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(dir: &Path, args: &[&str]) -> Cli {
        let mut argv = vec!["pdash", "--data-dir", dir.to_str().unwrap()];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn add_and_list_persist_to_global_state() {
        let dir = tempfile::tempdir().unwrap();
        run_command(cli(dir.path(), &["add-group", "Work"])).await.unwrap();
        run_command(cli(dir.path(), &["add-project", "Api", "/src/api"])).await.unwrap();

        let service = open_service(dir.path(), ServiceConfig::default());
        let groups = service.list().await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group_name.as_deref(), Some("Work"));
        assert_eq!(groups[0].projects[0].name, "Api");
        assert!(dir.path().join("global_state.json").exists());
        assert!(!dir.path().join("settings.json").exists());
    }

    #[tokio::test]
    async fn config_file_selects_settings_backend() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "use_settings_storage = true\n").unwrap();
        run_command(cli(dir.path(), &["add-group", "Work"])).await.unwrap();
        assert!(dir.path().join("settings.json").exists());
    }

    #[tokio::test]
    async fn reorder_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = open_service(dir.path(), ServiceConfig::default());
        let group = service.add_group(Some("Work"), vec![], None).await.unwrap();
        let a = Project::new("a", "/a");
        let b = Project::new("b", "/b");
        service.add_project(a.clone(), Some(group.id.as_str())).await.unwrap();
        service.add_project(b.clone(), Some(group.id.as_str())).await.unwrap();

        let msg = dir.path().join("msg.json");
        let body = json!({
            "type": "reordered-projects",
            "groupHierarchy": [{"groupId": group.id, "projectIds": [b.id, a.id], "children": [], "level": 0}]
        });
        std::fs::write(&msg, body.to_string()).unwrap();
        run_command(cli(dir.path(), &["reorder", msg.to_str().unwrap()])).await.unwrap();

        let order: Vec<_> = service
            .projects_flat()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(order, ["b", "a"]);
    }

    #[tokio::test]
    async fn reorder_rejects_unknown_message() {
        let dir = tempfile::tempdir().unwrap();
        let msg = dir.path().join("msg.json");
        std::fs::write(&msg, r#"{"type": "open-project"}"#).unwrap();
        assert!(run_command(cli(dir.path(), &["reorder", msg.to_str().unwrap()])).await.is_err());
    }

    #[tokio::test]
    async fn migrate_fills_virgin_active_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join(CONFIG_FILE);
        std::fs::write(&config, "use_settings_storage = true\n").unwrap();
        run_command(cli(dir.path(), &["add-group", "Work"])).await.unwrap();
        std::fs::remove_file(&config).unwrap();

        run_command(cli(dir.path(), &["migrate"])).await.unwrap();
        let global = open_service(dir.path(), ServiceConfig::default());
        assert_eq!(global.list().await.unwrap().len(), 1);
        assert!(dir.path().join("global_state.json").exists());
    }

    #[tokio::test]
    async fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "use_settings_storage = 3").unwrap();
        assert!(run_command(cli(dir.path(), &["status"])).await.is_err());
    }
}
