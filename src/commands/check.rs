//! `check`: look a paper up in the published posts.

use anyhow::Result;
use paper_digest_core::PublicationLedger;

use crate::app_config::FileConfig;
use crate::cli::CheckArgs;
use crate::settings::resolve_ledger;

pub fn run_check_command(args: &CheckArgs, file_config: Option<&FileConfig>) -> Result<()> {
    let ledger = resolve_ledger(file_config, &args.corpus)?;

    let title = args.title.as_deref().filter(|t| !t.trim().is_empty());
    if ledger.is_published(Some(args.identifier.as_str()), title) {
        println!("published");
    } else {
        println!("not published");
    }
    Ok(())
}
