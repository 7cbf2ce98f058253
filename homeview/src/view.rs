use std::collections::BTreeMap;
use std::path::Path;
use handlebars::{handlebars_helper, Handlebars};
use rust_embed::RustEmbed;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

const TEMPLATE_EXTENSION: &str = "hbs";

// Scalars are printed as they are, arrays and tables as compact JSON
handlebars_helper!(attribute_text: |value: Json| match value {
    Value::Null => String::new(),
    Value::String(text) => text.clone(),
    other => other.to_string(),
});

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../templates"]
struct EmbeddedTemplates;


#[derive(Error, Debug)]
pub enum RenderError {

    /// view name
    #[error("no template for view '{0}'")]
    TemplateNotFound(String),

    /// template name, parser error
    #[error("invalid template '{0}': {1}")]
    Template(String, handlebars::TemplateError),

    /// view name, render error
    #[error("failed to render view '{0}': {1}")]
    Render(String, handlebars::RenderError),

    /// template directory, io error
    #[error("failed to load templates from '{0}': {1}")]
    Io(String, std::io::Error),
}


/// The data a view is rendered from.
/// Built fresh for every request, keys are iterated in sorted order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ViewModel(BTreeMap<String, Value>);

impl ViewModel {

    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the previous value of the key
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}


/// Turns a logical view name and its view model into an html fragment
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, model: &ViewModel) -> Result<String, RenderError>;
}


/// Renders views from handlebars templates.
///
/// A template file `<name>.hbs` provides the view `<name>`,
/// templates in subdirectories are named like `partials/<name>`.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {

    /// Load the built-in templates.
    /// Templates from templates_dir are loaded afterwards and replace built-in templates of the same name.
    pub fn new(templates_dir: Option<&Path>) -> Result<Self, RenderError> {
        let mut renderer = Self::empty();

        for file_path in EmbeddedTemplates::iter() {
            let Some(name) = template_name(&file_path) else { continue };
            if let Some(file) = EmbeddedTemplates::get(&file_path) {
                let source = String::from_utf8_lossy(&file.data);
                renderer.register_template(&name, &source)?;
            }
        }

        if let Some(dir) = templates_dir {
            renderer.load_templates_from_dir(dir, dir)?;
        }

        log::debug!("loaded {} view templates", renderer.registry.get_templates().len());
        Ok(renderer)
    }

    /// A renderer without any templates
    pub fn empty() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_helper("attribute_text", Box::new(attribute_text));
        Self { registry }
    }

    pub fn register_template(&mut self, name: &str, source: &str) -> Result<(), RenderError> {
        self.registry.register_template_string(name, source)
            .map_err(|e| RenderError::Template(name.to_string(), e))
    }

    pub fn has_view(&self, view: &str) -> bool {
        self.registry.has_template(view)
    }

    fn load_templates_from_dir(&mut self, base_dir: &Path, dir: &Path) -> Result<(), RenderError> {
        let io_err = |e| RenderError::Io(dir.display().to_string(), e);

        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_dir() {
                self.load_templates_from_dir(base_dir, &path)?;
                continue;
            }

            let relative_path = path.strip_prefix(base_dir).unwrap_or(&path).to_string_lossy().replace('\\', "/");
            let Some(name) = template_name(&relative_path) else { continue };
            let source = std::fs::read_to_string(&path)
                .map_err(|e| RenderError::Io(path.display().to_string(), e))?;
            log::debug!("loading template '{}' from {}", name, path.display());
            self.register_template(&name, &source)?;
        }

        Ok(())
    }
}

impl ViewRenderer for HandlebarsRenderer {
    fn render(&self, view: &str, model: &ViewModel) -> Result<String, RenderError> {
        if !self.has_view(view) {
            return Err(RenderError::TemplateNotFound(view.to_string()));
        }
        self.registry.render(view, model)
            .map_err(|e| RenderError::Render(view.to_string(), e))
    }
}


/// 'dir/name.hbs' -> 'dir/name', None for other files
fn template_name(file_path: &str) -> Option<String> {
    let name = file_path.strip_suffix(TEMPLATE_EXTENSION)?.strip_suffix('.')?;
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model(value: Value) -> ViewModel {
        let mut model = ViewModel::new();
        if let Value::Object(map) = value {
            for (key, value) in map {
                model.insert(key, value);
            }
        }
        model
    }

    #[test]
    fn template_names() {
        assert_eq!(template_name("home.hbs"), Some("home".to_string()));
        assert_eq!(template_name("partials/nav.hbs"), Some("partials/nav".to_string()));
        assert_eq!(template_name("home.html"), None);
        assert_eq!(template_name("homehbs"), None);
        assert_eq!(template_name(".hbs"), None);
    }

    #[test]
    fn view_model_serializes_as_map() {
        let model = model(json!({"name": "Alice", "age": 42}));
        assert_eq!(serde_json::to_value(&model).unwrap(), json!({"age": 42, "name": "Alice"}));
        let keys: Vec<&String> = model.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["age", "name"]);
    }

    #[test]
    fn builtin_home_anonymous() {
        let renderer = HandlebarsRenderer::new(None).unwrap();
        assert!(renderer.has_view("home"));
        let html = renderer.render("home", &ViewModel::new()).unwrap();
        assert!(html.contains("Just click on"));
    }

    #[test]
    fn builtin_home_authenticated() {
        let renderer = HandlebarsRenderer::new(None).unwrap();
        let html = renderer.render("home", &model(json!({"email": "a@b.com", "name": "<Alice>"}))).unwrap();
        assert!(!html.contains("Just click on"));
        assert!(html.contains("<span id=\"email\">a@b.com</span>"));
        assert!(html.contains("<span id=\"name\">&lt;Alice&gt;</span>"));
    }

    #[test]
    fn builtin_home_nested_attributes() {
        let renderer = HandlebarsRenderer::new(None).unwrap();
        let html = renderer.render("home", &model(json!({
            "address": {"city": "Berlin"},
            "groups": ["admin", "<staff>"],
            "age": 42,
            "verified": true,
        }))).unwrap();
        assert!(!html.contains("[object]"));
        assert!(html.contains("<span id=\"address\">{&quot;city&quot;:&quot;Berlin&quot;}</span>"));
        assert!(html.contains("<span id=\"groups\">[&quot;admin&quot;,&quot;&lt;staff&gt;&quot;]</span>"));
        assert!(html.contains("<span id=\"age\">42</span>"));
        assert!(html.contains("<span id=\"verified\">true</span>"));
    }

    #[test]
    fn unknown_view() {
        let renderer = HandlebarsRenderer::new(None).unwrap();
        let err = renderer.render("nowhere", &ViewModel::new()).unwrap_err();
        assert!(matches!(err, RenderError::TemplateNotFound(view) if view == "nowhere"));
    }

    #[test]
    fn invalid_template() {
        let mut renderer = HandlebarsRenderer::empty();
        let err = renderer.register_template("broken", "{{#if}}").unwrap_err();
        assert!(matches!(err, RenderError::Template(name, _) if name == "broken"));
    }

    #[test]
    fn templates_dir_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("partials")).unwrap();
        std::fs::write(dir.path().join("home.hbs"), "custom home for {{name}}").unwrap();
        std::fs::write(dir.path().join("partials").join("extra.hbs"), "extra").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "{{#if}}").unwrap();

        let renderer = HandlebarsRenderer::new(Some(dir.path())).unwrap();
        assert!(renderer.has_view("partials/extra"));
        let html = renderer.render("home", &model(json!({"name": "Bob"}))).unwrap();
        assert_eq!(html, "custom home for Bob");
    }

    #[test]
    fn missing_templates_dir() {
        let err = HandlebarsRenderer::new(Some(Path::new("/nonexistent/templates"))).err().unwrap();
        assert!(matches!(err, RenderError::Io(_, _)));
    }
}
