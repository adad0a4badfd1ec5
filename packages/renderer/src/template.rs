use crate::manifest::{WidgetDefinition, WidgetManifest};
use minijinja::{AutoEscape, Environment, ErrorKind, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;
use widgetry_resolver::{Render, RenderError, RenderRequest, RenderResult};

/// Template used when a widget type has no template of its own.
pub const FALLBACK_TEMPLATE: &str = "widget.html";

const FALLBACK_SOURCE: &str = concat!(
    r#"<div class="widget widget--{{ type }}">"#,
    r#"{% for area in areas %}<div class="widget__{{ area.name }}">{{ area.html }}</div>{% endfor %}"#,
    r#"</div>"#,
);

/// Renders widgets with minijinja templates.
///
/// Templates see `type`, `label`, `config` (definition defaults overlaid with
/// the stored config), `content` (area name to markup) and `areas` (ordered
/// `{name, html}` pairs). Area markup is already rendered and is never
/// escaped; everything else is HTML-escaped.
pub struct TemplateRenderer {
    env: Environment<'static>,
    manifest: WidgetManifest,
}

impl TemplateRenderer {
    /// Creates a renderer holding only the built-in fallback template.
    pub fn new() -> RenderResult<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_name: &str| AutoEscape::Html);
        env.add_template(FALLBACK_TEMPLATE, FALLBACK_SOURCE)
            .map_err(|e| RenderError::Template(format!("{}: {}", FALLBACK_TEMPLATE, e)))?;

        Ok(Self {
            env,
            manifest: WidgetManifest::default(),
        })
    }

    pub fn with_definitions(mut self, manifest: WidgetManifest) -> Self {
        self.manifest = manifest;
        self
    }

    /// Register (or replace) a template by name.
    pub fn add_template(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> RenderResult<()> {
        let name = name.into();
        debug!(template = %name, "Registering widget template");
        self.env
            .add_template_owned(name.clone(), source.into())
            .map_err(|e| RenderError::Template(format!("{}: {}", name, e)))
    }

    /// Register every `*.html` file below `dir`, named by its path relative to
    /// `dir` with `/` separators. Returns the number of templates registered.
    pub fn load_templates(&mut self, dir: &Path) -> RenderResult<usize> {
        let mut count = 0;

        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| RenderError::Io(e.into()))?;
            let path = entry.path();

            if !entry.file_type().is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some("html")
            {
                continue;
            }

            let relative = path.strip_prefix(dir).unwrap_or(path);
            let name = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let source = std::fs::read_to_string(path)?;
            self.add_template(name, source)?;
            count += 1;
        }

        debug!(dir = %dir.display(), count, "Loaded widget templates");
        Ok(count)
    }

    fn template_name(&self, request: &RenderRequest) -> RenderResult<String> {
        let definition = self.manifest.get(&request.widget_type);

        if let Some(declared) = definition.and_then(|d| d.template.as_ref()) {
            return match self.env.get_template(declared) {
                Ok(_) => Ok(declared.clone()),
                Err(_) => Err(RenderError::Template(format!(
                    "template '{}' declared for widget '{}' is not registered",
                    declared, request.widget_type
                ))),
            };
        }

        let by_type = format!("{}.html", request.widget_type);
        match self.env.get_template(&by_type) {
            Ok(_) => Ok(by_type),
            Err(e) if e.kind() == ErrorKind::TemplateNotFound => {
                Ok(FALLBACK_TEMPLATE.to_string())
            }
            Err(e) => Err(RenderError::Template(e.to_string())),
        }
    }

    fn context(&self, request: &RenderRequest) -> Value {
        let definition = self.manifest.get(&request.widget_type);

        let mut config = definition
            .map(|d| d.defaults.clone())
            .unwrap_or_default();
        config.extend(request.config.clone());

        let content: BTreeMap<String, Value> = request
            .content
            .iter()
            .map(|(name, html)| (name.clone(), Value::from_safe_string(html.clone())))
            .collect();

        let areas: Vec<Value> = ordered_areas(request, definition)
            .into_iter()
            .map(|(name, html)| {
                let area: BTreeMap<&str, Value> = BTreeMap::from([
                    ("name", Value::from(name)),
                    ("html", Value::from_safe_string(html.to_string())),
                ]);
                Value::from(area)
            })
            .collect();

        let mut ctx: BTreeMap<&str, Value> = BTreeMap::new();
        ctx.insert("type", Value::from(request.widget_type.as_str()));
        ctx.insert(
            "label",
            Value::from(definition.and_then(|d| d.label.clone())),
        );
        ctx.insert("config", Value::from_serialize(&config));
        ctx.insert("content", Value::from(content));
        ctx.insert("areas", Value::from(areas));
        Value::from(ctx)
    }
}

impl Render for TemplateRenderer {
    fn render(&self, request: &RenderRequest) -> RenderResult<String> {
        let name = self.template_name(request)?;
        let template = self
            .env
            .get_template(&name)
            .map_err(|e| RenderError::Template(e.to_string()))?;

        template
            .render(self.context(request))
            .map_err(|e| RenderError::Template(format!("{}: {}", name, e)))
    }
}

/// Declared areas present in the request first, in declaration order; then
/// undeclared areas in the order they appeared in the markup.
fn ordered_areas<'a>(
    request: &'a RenderRequest,
    definition: Option<&'a WidgetDefinition>,
) -> Vec<(&'a str, &'a str)> {
    let declared: &[String] = definition.map(|d| d.areas.as_slice()).unwrap_or(&[]);

    let mut ordered: Vec<(&str, &str)> = declared
        .iter()
        .filter_map(|name| request.area(name).map(|html| (name.as_str(), html)))
        .collect();

    ordered.extend(
        request
            .content
            .iter()
            .filter(|(name, _)| !declared.contains(name))
            .map(|(name, html)| (name.as_str(), html.as_str())),
    );

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn request(widget_type: &str, config: serde_json::Value) -> RenderRequest {
        let config: Map<String, serde_json::Value> = match config {
            serde_json::Value::Object(map) => map,
            _ => Map::new(),
        };
        RenderRequest::new(widget_type, config)
    }

    fn slice_manifest() -> WidgetManifest {
        WidgetManifest::from_json(
            r#"{
                "slice": {
                    "label": "Slice layout",
                    "areas": ["content", "image"],
                    "defaults": { "mode": "transparent", "colour": "inherit" }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_new_registers_fallback_template() {
        let renderer = TemplateRenderer::new().unwrap();
        assert!(renderer.env.get_template(FALLBACK_TEMPLATE).is_ok());
        assert!(renderer.manifest.is_empty());
    }

    #[test]
    fn test_fallback_template() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render(&request("quote", json!({})).with_area("body", "<p>Hi</p>"))
            .unwrap();

        assert_eq!(
            html,
            r#"<div class="widget widget--quote"><div class="widget__body"><p>Hi</p></div></div>"#
        );
    }

    #[test]
    fn test_fallback_orders_declared_areas_first() {
        let renderer = TemplateRenderer::new().unwrap().with_definitions(slice_manifest());
        let html = renderer
            .render(
                &request("slice", json!({}))
                    .with_area("extra", "e")
                    .with_area("image", "i")
                    .with_area("content", "c"),
            )
            .unwrap();

        assert_eq!(
            html,
            concat!(
                r#"<div class="widget widget--slice">"#,
                r#"<div class="widget__content">c</div>"#,
                r#"<div class="widget__image">i</div>"#,
                r#"<div class="widget__extra">e</div>"#,
                r#"</div>"#,
            )
        );
    }

    #[test]
    fn test_template_by_type_with_defaults() {
        let mut renderer = TemplateRenderer::new().unwrap().with_definitions(slice_manifest());
        renderer
            .add_template(
                "slice.html",
                r#"<section class="slice slice--{{ config.mode }} bg-{{ config.colour }}" aria-label="{{ label }}">{{ content.content }}{{ content.image }}</section>"#,
            )
            .unwrap();

        let html = renderer
            .render(&request("slice", json!({ "mode": "image" })).with_area("content", "<p>Body</p>"))
            .unwrap();

        // Missing image area renders as nothing; colour falls back to its default
        assert_eq!(
            html,
            r#"<section class="slice slice--image bg-inherit" aria-label="Slice layout"><p>Body</p></section>"#
        );
    }

    #[test]
    fn test_config_values_are_escaped() {
        let mut renderer = TemplateRenderer::new().unwrap();
        renderer
            .add_template("note.html", "<aside>{{ config.text }}</aside>{{ content.body }}")
            .unwrap();

        let html = renderer
            .render(
                &request("note", json!({ "text": "<b>bold</b> & \"quoted\"" }))
                    .with_area("body", "<em>kept</em>"),
            )
            .unwrap();

        assert!(html.starts_with("<aside>&lt;b&gt;bold&lt;"));
        assert!(html.contains("&amp; &quot;quoted&quot;"));
        assert!(html.ends_with("</aside><em>kept</em>"));
    }

    #[test]
    fn test_declared_template_must_exist() {
        let manifest = WidgetManifest::from_json(r#"{ "hero": { "template": "missing.html" } }"#)
            .unwrap();
        let renderer = TemplateRenderer::new().unwrap().with_definitions(manifest);

        let result = renderer.render(&request("hero", json!({})));
        match result {
            Err(RenderError::Template(message)) => {
                assert!(message.contains("missing.html"));
                assert!(message.contains("hero"));
            }
            other => panic!("Expected template error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_template_syntax() {
        let mut renderer = TemplateRenderer::new().unwrap();
        let result = renderer.add_template("broken.html", "{% for x in %}");
        assert!(matches!(result, Err(RenderError::Template(_))));
    }
}
