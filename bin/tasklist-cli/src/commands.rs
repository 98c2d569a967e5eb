//! Command handlers: each one issues client calls and prints the result.

use std::io::{self, BufRead, Write};

use anyhow::{Context, bail};
use tracing::debug;
use validator::Validate;

use tasklist_client::TaskClient;

use crate::cli::{AddArgs, Commands, EditArgs, ListArgs, ListFilter};
use crate::view;

pub async fn dispatch(command: Commands, client: &TaskClient) -> anyhow::Result<()> {
    match command {
        Commands::List(args) => list(client, &args).await,
        Commands::Show { id } => show(client, &id).await,
        Commands::Add(args) => add(client, args).await,
        Commands::Edit(args) => edit(client, args).await,
        Commands::Toggle { id } => toggle(client, &id).await,
        Commands::Delete { id, yes } => delete(client, &id, yes).await,
    }
}

async fn list(client: &TaskClient, args: &ListArgs) -> anyhow::Result<()> {
    let filter = args.filter();
    debug!(?filter, "listing tasks");
    let tasks = match filter {
        ListFilter::All => client.get_tasks().await,
        ListFilter::Category(category) => client.get_tasks_by_category(&category).await,
        ListFilter::Priority(priority) => client.get_tasks_by_priority(priority.as_str()).await,
    }
    .context("failed to load tasks")?;
    println!("{}", view::task_list(&tasks));
    Ok(())
}

async fn show(client: &TaskClient, id: &str) -> anyhow::Result<()> {
    let task = client
        .get_task(id)
        .await
        .with_context(|| format!("failed to load task {id}"))?;
    println!("{}", view::task_detail(&task));
    Ok(())
}

async fn add(client: &TaskClient, args: AddArgs) -> anyhow::Result<()> {
    let req = args.into_request();
    req.validate().context("task form is invalid")?;
    let task = client
        .create_task(&req)
        .await
        .context("failed to create task")?;
    println!("created {}", view::task_line(&task));
    println!("  id: {}", task.id);
    Ok(())
}

async fn edit(client: &TaskClient, args: EditArgs) -> anyhow::Result<()> {
    let (id, req) = args.into_request();
    if req.is_empty() {
        bail!("nothing to change; pass at least one field to edit");
    }
    req.validate().context("task edit is invalid")?;
    let task = client
        .update_task(&id, &req)
        .await
        .with_context(|| format!("failed to update task {id}"))?;
    println!("updated {}", view::task_line(&task));
    Ok(())
}

async fn toggle(client: &TaskClient, id: &str) -> anyhow::Result<()> {
    let task = client
        .toggle_complete(id)
        .await
        .with_context(|| format!("failed to toggle task {id}"))?;
    println!("{}", view::task_line(&task));
    Ok(())
}

async fn delete(client: &TaskClient, id: &str, yes: bool) -> anyhow::Result<()> {
    if !yes {
        let stdin = io::stdin();
        let confirmed = confirm(
            &format!("Delete task {id}? [y/N] "),
            &mut stdin.lock(),
            &mut io::stdout(),
        )?;
        if !confirmed {
            println!("cancelled");
            return Ok(());
        }
    }
    client
        .delete_task(id)
        .await
        .with_context(|| format!("failed to delete task {id}"))?;
    println!("deleted {id}");
    Ok(())
}

/// Ask a yes/no question; anything but `y` or `yes` counts as no.
fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
