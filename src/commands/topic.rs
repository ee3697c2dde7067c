//! `topic`: show the topic of the week.

use anyhow::Result;
use chrono::Datelike;
use paper_digest_core::{rotation_order, select_topic};

use crate::app_config::FileConfig;
use crate::cli::{CorpusArgs, TopicArgs};
use crate::settings::Settings;

use super::run_date;

pub fn run_topic_command(args: &TopicArgs, file_config: Option<&FileConfig>) -> Result<()> {
    let settings = Settings::resolve_with(file_config, &CorpusArgs::default(), &args.rotation)?;
    let today = run_date(args.rotation.date);

    let topic = select_topic(today, &settings.topics)?;
    let order: Vec<&str> = rotation_order(today, &settings.topics)
        .map(|t| t.name.as_str())
        .collect();

    println!("date = {today}");
    println!("week = {}", today.iso_week().week());
    println!("topic = {topic}");
    println!("order = {}", order.join(", "));
    println!("topics_source = {}", settings.topics_origin);
    Ok(())
}
