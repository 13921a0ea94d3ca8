//! Init command for creating the snapshot file.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use clap::Args;
use tb_core::{BlockDuration, UserId, UserProfile, format::duration_label};
use uuid::Uuid;

use crate::{Config, Snapshot};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Display name for the profile.
    #[arg(long)]
    pub name: Option<String>,

    /// Email for the profile.
    #[arg(long)]
    pub email: Option<String>,

    /// Block length in minutes (15, 30, 60 or 120).
    #[arg(long)]
    pub duration: Option<BlockDuration>,
}

/// Creates the snapshot, or updates the profile of an existing one.
///
/// Existing entries are never touched.
pub(crate) fn init_at(path: &Path, args: &InitArgs) -> Result<(Snapshot, bool)> {
    let (mut snapshot, created) = match Snapshot::load_optional(path)? {
        Some(existing) => (existing, false),
        None => {
            let uid = UserId::new(Uuid::new_v4().to_string())?;
            (Snapshot::new(UserProfile::new(uid)), true)
        }
    };

    let profile = &mut snapshot.profile;
    if let Some(name) = &args.name {
        profile.display_name.clone_from(name);
    }
    if let Some(email) = &args.email {
        profile.email.clone_from(email);
    }
    if let Some(duration) = args.duration {
        profile.time_block_duration = duration;
    }

    snapshot.save(path)?;
    Ok((snapshot, created))
}

/// Runs the init command.
pub fn run<W: Write>(writer: &mut W, args: &InitArgs, config: &Config) -> Result<()> {
    let (snapshot, created) = init_at(&config.snapshot_path, args)?;
    let profile = &snapshot.profile;

    let verb = if created { "Created" } else { "Updated" };
    writeln!(writer, "{verb} {}", config.snapshot_path.display())?;
    writeln!(writer, "User:       {}", profile.uid)?;
    writeln!(
        writer,
        "Blocks:     {}",
        duration_label(profile.time_block_duration)
    )?;
    writeln!(writer, "Categories: {}", profile.categories.len())?;
    Ok(())
}
