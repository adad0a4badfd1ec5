use super::{find_html_files, STDIN};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use widgetry_renderer::{TemplateRenderer, WidgetManifest};
use widgetry_resolver::{ResolveOptions, WidgetResolver};

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// HTML file or directory to render, or `-` for stdin
    pub input: String,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Deepest widget nesting to accept (overrides config)
    #[arg(long)]
    pub max_depth: Option<usize>,
}

pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let resolver = build_resolver(&config, args.max_depth, cwd)?;

    if args.input == STDIN {
        let mut html = String::new();
        std::io::stdin().read_to_string(&mut html)?;
        let output = resolver.resolve(&html)?;
        std::io::stdout().write_all(output.as_bytes())?;
        return Ok(());
    }

    let input = PathBuf::from(cwd).join(&args.input);
    let out_dir = match &args.out_dir {
        Some(out) => PathBuf::from(cwd).join(out),
        None => config.get_out_dir(cwd),
    };

    let files = find_html_files(&input, Some(&out_dir))?;
    if files.is_empty() {
        println!("{}", "⚠️  No .html files found".yellow());
        return Ok(());
    }

    if !args.stdout {
        println!("{}", "🔨 Rendering widget content...".bright_blue().bold());
        println!("Found {} files", files.len());
    }

    let base = if input.is_dir() {
        input.clone()
    } else {
        input.parent().map(Path::to_path_buf).unwrap_or_default()
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for file in &files {
        let relative_path = file.strip_prefix(&base).unwrap_or(file);
        match render_file(&resolver, file, relative_path, &out_dir, args.stdout) {
            Ok(output_path) => {
                success_count += 1;
                if !args.stdout {
                    println!(
                        "  {} {} → {}",
                        "✓".green(),
                        relative_path.display(),
                        output_path
                    );
                }
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    e.to_string().red()
                );
            }
        }
    }

    if error_count > 0 {
        return Err(anyhow!(
            "Rendered {} files, {} failed",
            success_count,
            error_count
        ));
    }

    if !args.stdout {
        println!();
        println!(
            "{} Rendered {} files successfully",
            "✅".green(),
            success_count
        );
    }

    Ok(())
}

fn build_resolver(
    config: &Config,
    max_depth: Option<usize>,
    cwd: &str,
) -> Result<WidgetResolver<TemplateRenderer>> {
    let manifest_path = config.get_manifest_path(cwd);
    let manifest = if manifest_path.exists() {
        WidgetManifest::load(&manifest_path)?
    } else {
        debug!(path = %manifest_path.display(), "No widget manifest, using defaults");
        WidgetManifest::default()
    };

    let mut renderer = TemplateRenderer::new()?.with_definitions(manifest);

    let templates_dir = config.get_templates_dir(cwd);
    if templates_dir.is_dir() {
        let count = renderer.load_templates(&templates_dir)?;
        info!(count, dir = %templates_dir.display(), "Loaded templates");
    }

    let options = ResolveOptions {
        max_depth: max_depth.or(config.max_depth),
    };
    Ok(WidgetResolver::with_options(renderer, options))
}

fn render_file(
    resolver: &WidgetResolver<TemplateRenderer>,
    file_path: &Path,
    relative_path: &Path,
    out_dir: &Path,
    stdout: bool,
) -> Result<String> {
    let source = fs::read_to_string(file_path)?;
    let output = resolver.resolve(&source)?;

    if stdout {
        println!("{}", output);
        return Ok("stdout".to_string());
    }

    let output_file = out_dir.join(relative_path);
    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_file, output)?;

    Ok(output_file.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, relative: &str, content: &str) {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn args(input: &str) -> RenderArgs {
        RenderArgs {
            input: input.to_string(),
            stdout: false,
            out_dir: None,
            max_depth: None,
        }
    }

    #[test]
    fn test_render_directory_mirrors_paths() {
        let dir = TempDir::new().unwrap();
        let cwd = dir.path().display().to_string();
        write(&dir, "templates/slice.html", "<section>{{ content.content }}</section>");
        write(
            &dir,
            "content/pages/home.html",
            r#"<p>Hi</p><div data-widget-type="slice" data-widget-config="{}"><div data-widget-content="content">Body</div></div>"#,
        );
        write(&dir, "content/plain.html", "<p>Plain</p>");

        render(args("content"), &cwd).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("dist/pages/home.html")).unwrap(),
            "<p>Hi</p><section>Body</section>"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("dist/plain.html")).unwrap(),
            "<p>Plain</p>"
        );
    }

    #[test]
    fn test_render_skips_output_directory() {
        let dir = TempDir::new().unwrap();
        let cwd = dir.path().display().to_string();
        write(&dir, "page.html", "<p>Page</p>");
        write(&dir, "dist/page.html", "<p>Stale</p>");

        render(args("."), &cwd).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("dist/page.html")).unwrap(),
            "<p>Page</p>"
        );
        assert!(!dir.path().join("dist/dist").exists());
    }

    #[test]
    fn test_render_reports_nesting_limit() {
        let dir = TempDir::new().unwrap();
        let cwd = dir.path().display().to_string();
        write(
            &dir,
            "deep.html",
            concat!(
                r#"<div data-widget-type="a" data-widget-config="{}"><div data-widget-content="c">"#,
                r#"<div data-widget-type="b" data-widget-config="{}"></div>"#,
                r#"</div></div>"#,
            ),
        );

        let result = render(
            RenderArgs {
                max_depth: Some(1),
                ..args("deep.html")
            },
            &cwd,
        );

        assert!(result.is_err());
        assert!(!dir.path().join("dist/deep.html").exists());
    }
}
