use crate::output::{pr_row, print_json, print_table, PR_HEADERS};
use anyhow::Context;
use clap::Subcommand;
use reviewer_core::config::Config;

#[derive(Subcommand)]
pub enum PrSubcommand {
    /// Open a pull request and assign reviewers from the author's team
    Create {
        id: String,
        /// Pull request title
        #[arg(long)]
        name: String,
        /// Author user id
        #[arg(long)]
        author: String,
    },
    /// Show a pull request
    Show { id: String },
    /// Merge a pull request (repeating is a no-op)
    Merge { id: String },
    /// Replace one reviewer with another teammate
    Reassign {
        id: String,
        /// Reviewer to replace
        old_reviewer: String,
    },
}

pub fn run(config: &Config, subcmd: PrSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        PrSubcommand::Create { id, name, author } => create(config, &id, &name, &author, json),
        PrSubcommand::Show { id } => show(config, &id, json),
        PrSubcommand::Merge { id } => merge(config, &id, json),
        PrSubcommand::Reassign { id, old_reviewer } => reassign(config, &id, &old_reviewer, json),
    }
}

fn create(config: &Config, id: &str, name: &str, author: &str, json: bool) -> anyhow::Result<()> {
    let svc = super::open_service(config)?;
    let pr = svc
        .create_pull_request(id, name, author)
        .with_context(|| format!("failed to create pull request '{id}'"))?;

    if json {
        print_json(&pr)?;
    } else if pr.assigned_reviewers.is_empty() {
        println!("Created '{}' with no reviewers available.", pr.id);
    } else {
        println!(
            "Created '{}', reviewers: {}",
            pr.id,
            pr.assigned_reviewers.join(", ")
        );
    }
    Ok(())
}

fn show(config: &Config, id: &str, json: bool) -> anyhow::Result<()> {
    let svc = super::open_service(config)?;
    let pr = svc.get_pull_request(id)?;

    if json {
        print_json(&pr)?;
    } else {
        print_table(PR_HEADERS, &[pr_row(&pr)]);
    }
    Ok(())
}

fn merge(config: &Config, id: &str, json: bool) -> anyhow::Result<()> {
    let svc = super::open_service(config)?;
    let pr = svc.merge_pull_request(id)?;

    if json {
        print_json(&pr)?;
    } else if let Some(merged_at) = pr.merged_at {
        println!("Merged '{}' at {}.", pr.id, merged_at.to_rfc3339());
    }
    Ok(())
}

fn reassign(config: &Config, id: &str, old: &str, json: bool) -> anyhow::Result<()> {
    let svc = super::open_service(config)?;
    let outcome = svc
        .reassign_reviewer(id, old)
        .with_context(|| format!("failed to reassign '{old}' on '{id}'"))?;

    if json {
        print_json(&outcome)?;
    } else {
        println!(
            "Replaced '{old}' with '{}' on '{id}'.",
            outcome.replaced_by
        );
    }
    Ok(())
}
