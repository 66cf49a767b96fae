use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use reviewer_core::config::Config;
use reviewer_core::types::Team;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberArg {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

/// Parse `ID:USERNAME` or `ID:USERNAME:inactive`.
fn parse_member(s: &str) -> Result<MemberArg, String> {
    let mut parts = s.splitn(3, ':');
    let user_id = parts.next().unwrap_or_default().trim();
    let username = parts.next().unwrap_or_default().trim();
    if user_id.is_empty() || username.is_empty() {
        return Err(format!("expected ID:USERNAME[:inactive], got '{s}'"));
    }
    let is_active = match parts.next().map(str::trim) {
        None | Some("active") => true,
        Some("inactive") => false,
        Some(other) => return Err(format!("unknown member state '{other}'")),
    };
    Ok(MemberArg {
        user_id: user_id.to_string(),
        username: username.to_string(),
        is_active,
    })
}

#[derive(Subcommand)]
pub enum TeamSubcommand {
    /// Create a team; members already in another team move to this one
    Add {
        name: String,
        /// Member as ID:USERNAME[:inactive] (repeatable)
        #[arg(long = "member", value_parser = parse_member, required = true)]
        members: Vec<MemberArg>,
    },
    /// Show a team and its roster
    Show { name: String },
}

pub fn run(config: &Config, subcmd: TeamSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TeamSubcommand::Add { name, members } => add(config, name, members, json),
        TeamSubcommand::Show { name } => show(config, &name, json),
    }
}

fn add(config: &Config, name: String, members: Vec<MemberArg>, json: bool) -> anyhow::Result<()> {
    let svc = super::open_service(config)?;
    let team = members.into_iter().fold(Team::new(name.clone()), |team, m| {
        team.with_member(m.user_id, m.username, m.is_active)
    });
    let created = svc
        .create_team(team)
        .with_context(|| format!("failed to create team '{name}'"))?;

    if json {
        print_json(&created)?;
    } else {
        println!(
            "Created team '{}' with {} member(s).",
            created.name,
            created.members.len()
        );
    }
    Ok(())
}

fn show(config: &Config, name: &str, json: bool) -> anyhow::Result<()> {
    let svc = super::open_service(config)?;
    let team = svc.get_team(name)?;

    if json {
        print_json(&team)?;
        return Ok(());
    }

    println!("Team: {}", team.name);
    let rows: Vec<Vec<String>> = team
        .members
        .iter()
        .map(|u| {
            vec![
                u.id.clone(),
                u.username.clone(),
                if u.is_active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "USERNAME", "ACTIVE"], &rows);
    Ok(())
}
