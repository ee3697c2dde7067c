//! `pick`: run the topic rotation and write the handoff file.

use anyhow::{Context, Result};
use paper_digest_core::{OpenAlexSource, Selection, run_rotation, write_handoff};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::app_config::FileConfig;
use crate::cli::PickArgs;
use crate::settings::Settings;

use super::run_date;

pub async fn run_pick_command(args: &PickArgs, file_config: Option<&FileConfig>) -> Result<()> {
    let settings = Settings::for_pick(file_config, args)?;
    let today = run_date(args.rotation.date);
    debug!(?settings, %today, "Pick settings resolved");

    let source = OpenAlexSource::with_base_url(&settings.api_base_url, settings.http)?
        .with_mailto(settings.mailto.clone());
    let ledger = settings.ledger();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let selection = run_rotation(
        &source,
        &ledger,
        &settings.topics,
        today,
        &settings.rotation,
        &mut rng,
    )
    .await
    .context("Paper search failed")?;

    let Some(selection) = selection else {
        println!("No new eligible papers found for any topic");
        return Ok(());
    };

    print_selection(&selection);
    if args.dry_run {
        println!("dry_run = true (handoff file not written)");
        return Ok(());
    }

    write_handoff(&settings.output_file, &selection).with_context(|| {
        format!(
            "Failed to write handoff file '{}'",
            settings.output_file.display()
        )
    })?;
    info!(path = %settings.output_file.display(), "Handoff file written");
    println!("handoff = {}", settings.output_file.display());
    Ok(())
}

fn print_selection(selection: &Selection) {
    println!("topic = {}", selection.topic);
    println!("title = {}", selection.title);
    println!("identifier = {}", selection.identifier);
    println!("url = {}", selection.landing_url);
    if let Some(date) = &selection.publication_date {
        println!("published = {date}");
    }
}
