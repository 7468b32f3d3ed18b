//! Profile CLI commands

use clap::Subcommand;

use crate::config::FintrackPaths;
use crate::display::format_profile;
use crate::error::FintrackResult;
use crate::models::Identity;
use crate::storage::ProfileRepository;

/// Profile subcommands
#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the profile
    Show,

    /// Set profile fields; omitted fields keep their values
    Set {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        address: Option<String>,

        #[arg(long)]
        phone: Option<String>,
    },
}

/// Handle a profile command
pub fn handle_profile_command(
    paths: &FintrackPaths,
    identity: &Identity,
    cmd: ProfileCommands,
) -> FintrackResult<()> {
    let repo = ProfileRepository::new(paths.profile_file(identity));

    match cmd {
        ProfileCommands::Show => {
            println!("Profile for {}", identity);
            println!("{}", format_profile(&repo.load()?));
        }

        ProfileCommands::Set {
            name,
            email,
            address,
            phone,
        } => {
            let mut profile = repo.load()?;
            for (slot, value) in [
                (&mut profile.name, name),
                (&mut profile.email, email),
                (&mut profile.address, address),
                (&mut profile.phone, phone),
            ] {
                if let Some(value) = value {
                    *slot = value.trim().to_string();
                }
            }
            repo.save(&profile)?;
            println!("Profile saved.");
        }
    }

    Ok(())
}
