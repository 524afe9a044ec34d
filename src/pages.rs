use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;
use serde_json::json;

use crate::blog::{Post, PostSummary};
use crate::farmers::Farmer;
use crate::survey::{StatusSummary, SurveyAspect};
use crate::todo::TodoItem;

const TEMPLATES: [(&str, &str); 6] = [
    ("todos", include_str!("./templates/todos.hbs")),
    ("blog", include_str!("./templates/blog.hbs")),
    ("post", include_str!("./templates/post.hbs")),
    ("status", include_str!("./templates/status.hbs")),
    ("farmer", include_str!("./templates/farmer.hbs")),
    ("not_found", include_str!("./templates/not_found.hbs")),
];

/// Aspect row on the status page, with its display label
#[derive(Serialize)]
struct AspectView<'a> {
    #[serde(flatten)]
    aspect: &'a SurveyAspect,
    label: &'static str,
}

/// HTML renderer for every page of the site
///
/// Templates are compiled into the binary and registered once at startup.
/// Handlebars escapes every interpolated value, so user-entered todo text is
/// safe to render.
pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    /// Register all page templates
    ///
    /// # Errors
    /// * `TemplateError` if a template fails to parse
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);

        for (name, source) in TEMPLATES {
            registry.register_template_string(name, source)?;
        }

        Ok(Pages { registry })
    }

    pub fn todos(&self, todos: &[TodoItem]) -> Result<String, RenderError> {
        self.registry.render("todos", &json!({ "todos": todos }))
    }

    /// Blog index; `None` renders the page without posts
    pub fn blog(&self, summaries: Option<&[PostSummary]>) -> Result<String, RenderError> {
        self.registry
            .render("blog", &json!({ "summaries": summaries.unwrap_or_default() }))
    }

    pub fn post(&self, post: Option<&Post>) -> Result<String, RenderError> {
        self.registry.render("post", &json!({ "post": post }))
    }

    pub fn status(&self, aspects: &[SurveyAspect]) -> Result<String, RenderError> {
        let views: Vec<AspectView> = aspects
            .iter()
            .map(|aspect| AspectView {
                aspect,
                label: aspect.status.label(),
            })
            .collect();

        self.registry.render(
            "status",
            &json!({ "aspects": views, "summary": StatusSummary::of(aspects) }),
        )
    }

    pub fn farmer(&self, farmer: &Farmer) -> Result<String, RenderError> {
        self.registry.render(
            "farmer",
            &json!({
                "farmer": farmer,
                "recorded": farmer.recorded_count(),
                "total": farmer.surveys.len(),
            }),
        )
    }

    pub fn not_found(&self, message: &str) -> Result<String, RenderError> {
        self.registry
            .render("not_found", &json!({ "message": message }))
    }
}
