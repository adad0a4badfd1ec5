use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use widgetry_renderer::{WidgetDefinition, WidgetManifest};

const SLICE_TEMPLATE: &str = r#"<section class="slice slice--{{ config.mode }} slice--{{ config.colour }}">
  <div class="slice__content">{{ content.content }}</div>
  {% if content.image %}<div class="slice__image">{{ content.image }}</div>{% endif %}
</section>
"#;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Template directory
    #[arg(short, long, default_value = "templates")]
    pub templates_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing Widgetry project...".bright_blue().bold()
    );

    let config = Config {
        templates_dir: args.templates_dir.clone(),
        ..Config::default()
    };

    let templates_dir = config.get_templates_dir(cwd);
    if !templates_dir.exists() {
        fs::create_dir_all(&templates_dir)?;
        println!("  {} Created {}/", "✓".green(), args.templates_dir);
    }

    let slice_template = templates_dir.join("slice.html");
    if !slice_template.exists() || args.force {
        fs::write(&slice_template, SLICE_TEMPLATE)?;
        println!("  {} Created {}/slice.html", "✓".green(), args.templates_dir);
    }

    let manifest_path = config.get_manifest_path(cwd);
    if !manifest_path.exists() || args.force {
        fs::write(&manifest_path, default_manifest().to_json()?)?;
        println!("  {} Created {}", "✓".green(), config.manifest);
    }

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/slice.html", args.templates_dir);
    println!("  2. Run: widgetry render <content.html>");
    println!("  3. Check output in {}/", config.out_dir);

    Ok(())
}

/// The slice layout known to the editor plugin.
fn default_manifest() -> WidgetManifest {
    let mut defaults = serde_json::Map::new();
    defaults.insert("mode".to_string(), json!("transparent"));
    defaults.insert("colour".to_string(), json!("inherit"));

    let mut manifest = WidgetManifest::new();
    manifest.insert(
        "slice",
        WidgetDefinition {
            label: Some("Slice layout".to_string()),
            template: None,
            areas: vec!["content".to_string(), "image".to_string()],
            defaults,
        },
    );
    manifest
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cwd(dir: &TempDir) -> String {
        dir.path().display().to_string()
    }

    #[test]
    fn test_init_scaffolds_project() {
        let dir = TempDir::new().unwrap();
        init(
            InitArgs {
                templates_dir: "theme".to_string(),
                force: false,
            },
            &cwd(&dir),
        )
        .unwrap();

        let config = Config::load(&cwd(&dir)).unwrap();
        assert_eq!(config.templates_dir, "theme");

        let manifest = WidgetManifest::load(&dir.path().join("widgets.json")).unwrap();
        let slice = manifest.get("slice").unwrap();
        assert_eq!(slice.areas, vec!["content", "image"]);
        assert_eq!(slice.defaults.get("colour"), Some(&json!("inherit")));

        assert!(dir.path().join("theme/slice.html").is_file());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(DEFAULT_CONFIG_NAME);
        fs::write(&config_path, r#"{ "outDir": "public" }"#).unwrap();

        init(
            InitArgs {
                templates_dir: "templates".to_string(),
                force: false,
            },
            &cwd(&dir),
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(&config_path).unwrap(),
            r#"{ "outDir": "public" }"#
        );
        assert!(!dir.path().join("widgets.json").exists());
    }
}
