use super::{find_html_files, STDIN};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use widgetry_resolver::{PlaceholderReport, PlaceholderStatus};

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// HTML file or directory to inspect, or `-` for stdin
    pub input: String,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    placeholders: Vec<PlaceholderReport>,
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let reports = collect_reports(&args.input, cwd)?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&reports)?),
        "text" => print_text(&reports),
        other => return Err(anyhow!("Unknown format: {}", other)),
    }

    Ok(())
}

fn collect_reports(input: &str, cwd: &str) -> Result<Vec<FileReport>> {
    if input == STDIN {
        let mut html = String::new();
        std::io::stdin().read_to_string(&mut html)?;
        return Ok(vec![FileReport {
            file: STDIN.to_string(),
            placeholders: widgetry_resolver::inspect(&html),
        }]);
    }

    let input = PathBuf::from(cwd).join(input);
    let base = if input.is_dir() {
        input.clone()
    } else {
        input.parent().map(|p| p.to_path_buf()).unwrap_or_default()
    };

    let mut reports = Vec::new();
    for file in find_html_files(&input, None)? {
        let source = fs::read_to_string(&file)?;
        let relative = file.strip_prefix(&base).unwrap_or(&file);
        reports.push(FileReport {
            file: relative.display().to_string(),
            placeholders: widgetry_resolver::inspect(&source),
        });
    }

    Ok(reports)
}

fn print_text(reports: &[FileReport]) {
    let mut inert_count = 0;
    let mut discarded_count = 0;

    for report in reports {
        println!("{}", report.file.bright_white().bold());

        if report.placeholders.is_empty() {
            println!("  {}", "no placeholders".dimmed());
            continue;
        }

        for placeholder in &report.placeholders {
            let indent = "  ".repeat(placeholder.depth);
            let areas = if placeholder.areas.is_empty() {
                String::new()
            } else {
                format!(" [{}]", placeholder.areas.join(", "))
            };

            match &placeholder.status {
                PlaceholderStatus::Valid => {
                    println!(
                        "{}{} {}{}",
                        indent,
                        "✓".green(),
                        placeholder.widget_type,
                        areas.dimmed()
                    );
                }
                PlaceholderStatus::Inert { reason } => {
                    inert_count += 1;
                    println!(
                        "{}{} {}{} - {}",
                        indent,
                        "✗".yellow(),
                        placeholder.widget_type,
                        areas.dimmed(),
                        reason.to_string().yellow()
                    );
                }
                PlaceholderStatus::Discarded => {
                    discarded_count += 1;
                    println!(
                        "{}{} {}{} - {}",
                        indent,
                        "✗".red(),
                        placeholder.widget_type,
                        areas.dimmed(),
                        "outside the content areas of its widget".red()
                    );
                }
            }
        }
    }

    if inert_count > 0 || discarded_count > 0 {
        println!();
    }
    if inert_count > 0 {
        println!(
            "{} {} placeholders will be left as stored",
            "⚠️".yellow(),
            inert_count
        );
    }
    if discarded_count > 0 {
        println!(
            "{} {} placeholders will be dropped with their enclosing widget",
            "⚠️".yellow(),
            discarded_count
        );
    }
}
