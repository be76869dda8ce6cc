use anyhow::Result;
use owo_colors::OwoColorize;

use crate::config::Config;

pub fn run(config: &Config, title: &str, description: Option<&str>, location: Option<&str>) -> Result<()> {
    let classifier = config.classifier()?;
    let result = classifier.classify(title, description.unwrap_or(""), location.unwrap_or(""));

    println!("{} {}", classifier.emojis_of(&result.hosting_org), title.bold());
    println!("   {} {}", "hosting:".dimmed(), result.hosting_org.join(", "));
    println!("   {} {}", "primary:".dimmed(), result.primary_org);
    println!("   {} {}", "color:".dimmed(), classifier.color_of(&result.primary_org));
    println!("   {} {}", "emoji:".dimmed(), classifier.emoji_of(&result.primary_org));

    Ok(())
}
