use crate::output::{pr_row, print_json, print_table, PR_HEADERS};
use clap::Subcommand;
use reviewer_core::config::Config;

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// Mark a user active so they can be picked as a reviewer
    Activate { user_id: String },
    /// Mark a user inactive; existing assignments are kept
    Deactivate { user_id: String },
}

pub fn run(config: &Config, subcmd: UserSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        UserSubcommand::Activate { user_id } => set_active(config, &user_id, true, json),
        UserSubcommand::Deactivate { user_id } => set_active(config, &user_id, false, json),
    }
}

fn set_active(config: &Config, user_id: &str, is_active: bool, json: bool) -> anyhow::Result<()> {
    let svc = super::open_service(config)?;
    let user = svc.set_user_active(user_id, is_active)?;

    if json {
        print_json(&user)?;
    } else {
        let state = if user.is_active { "active" } else { "inactive" };
        println!("User '{}' ({}) is now {state}.", user.id, user.team_name);
    }
    Ok(())
}

pub fn reviews(config: &Config, user_id: &str, json: bool) -> anyhow::Result<()> {
    let svc = super::open_service(config)?;
    let prs = svc.list_user_reviews(user_id)?;

    if json {
        print_json(&serde_json::json!({
            "user_id": user_id,
            "pull_requests": prs,
        }))?;
        return Ok(());
    }

    if prs.is_empty() {
        println!("'{user_id}' has no pull requests to review.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = prs.iter().map(pr_row).collect();
    print_table(PR_HEADERS, &rows);
    Ok(())
}
