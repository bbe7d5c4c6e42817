//! Commit message rendering.
//!
//! # Responsibility
//! - Substitute named fields into the configured template.
//! - Return the text; choosing stdout or a message file is the caller's job.
//!
//! # Invariants
//! - `IssueTracker` is always bound from the configuration.
//! - Other fields are bound only when the caller supplies them.
//! - Under `Strictness::Strict` an unbound field is an error, never blank text.

use crate::config::Configuration;
use crate::model::author::Author;
use handlebars::Handlebars;
use log::{debug, error};
use serde_json::{Map, Value};
use thiserror::Error;

const TEMPLATE_NAME: &str = "commit";

/// Field names the template may reference.
pub const TEMPLATE_FIELDS: [&str; 8] = [
    "Type",
    "Scope",
    "Subject",
    "Body",
    "IssueTracker",
    "Issue",
    "CoAuthors",
    "Footer",
];

/// Trailer prefix emitted per co-author.
pub const CO_AUTHOR_TRAILER: &str = "Co-authored-by:";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("commit template is malformed: {reason}")]
    Syntax { reason: String },
    #[error("commit template could not be rendered: {reason}")]
    Unresolved { reason: String },
}

/// How unbound fields are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Unbound fields fail the render.
    #[default]
    Strict,
    /// Unbound fields render as empty text.
    Lenient,
}

/// Caller-supplied field values. `None` leaves the field unbound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Bound as `Type`.
    pub kind: Option<String>,
    pub scope: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub issue: Option<String>,
    pub footer: Option<String>,
    /// Bound as `CoAuthors`, one trailer line per author.
    pub co_authors: Option<Vec<Author>>,
}

impl RenderContext {
    fn to_data(&self, config: &Configuration) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert(
            "IssueTracker".to_string(),
            Value::String(config.issue_tracker.clone()),
        );

        let fields = [
            ("Type", &self.kind),
            ("Scope", &self.scope),
            ("Subject", &self.subject),
            ("Body", &self.body),
            ("Issue", &self.issue),
            ("Footer", &self.footer),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                data.insert(name.to_string(), Value::String(value.clone()));
            }
        }

        if let Some(co_authors) = &self.co_authors {
            data.insert(
                "CoAuthors".to_string(),
                Value::String(co_author_trailers(co_authors)),
            );
        }
        data
    }
}

/// `Co-authored-by: Name <email>` lines, newline separated.
pub fn co_author_trailers(authors: &[Author]) -> String {
    authors
        .iter()
        .map(|author| format!("{CO_AUTHOR_TRAILER} {}", author.render()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders `config.template` with `context`.
pub fn render(
    config: &Configuration,
    context: &RenderContext,
    strictness: Strictness,
) -> Result<String, TemplateError> {
    let mut engine = Handlebars::new();
    engine.set_strict_mode(strictness == Strictness::Strict);
    engine.register_escape_fn(handlebars::no_escape);

    engine
        .register_template_string(TEMPLATE_NAME, config.template.as_str())
        .map_err(|err| {
            error!("event=render module=render status=error error_code=template_syntax error={err}");
            TemplateError::Syntax {
                reason: err.to_string(),
            }
        })?;

    let rendered = engine
        .render(TEMPLATE_NAME, &context.to_data(config))
        .map_err(|err| {
            error!(
                "event=render module=render status=error error_code=template_unresolved error={err}"
            );
            TemplateError::Unresolved {
                reason: err.to_string(),
            }
        })?;

    debug!(
        "event=render module=render status=ok strict={} bytes={}",
        strictness == Strictness::Strict,
        rendered.len()
    );
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::{
        co_author_trailers, render, RenderContext, Strictness, TemplateError, TEMPLATE_FIELDS,
    };
    use crate::config::Configuration;
    use crate::identity::Identity;
    use crate::model::author::Author;

    fn config_with_template(template: &str) -> Configuration {
        let mut config = Configuration::with_defaults(
            "/tmp/git-comp-render.yaml",
            Identity::new("Ada Lovelace", "ada@example.com"),
        );
        config.template = template.to_string();
        config
    }

    fn full_context() -> RenderContext {
        RenderContext {
            kind: Some("feat".to_string()),
            scope: Some("cli".to_string()),
            subject: Some("add render command".to_string()),
            body: Some("Renders the configured template.".to_string()),
            issue: Some("PROJ-42".to_string()),
            footer: Some("Reviewed-by: nobody".to_string()),
            co_authors: Some(vec![Author::new("bob", "Bob", "bob@x.com")]),
        }
    }

    #[test]
    fn default_template_renders_all_fields() {
        let mut config = Configuration::with_defaults(
            "/tmp/git-comp-render.yaml",
            Identity::new("Ada Lovelace", "ada@example.com"),
        );
        config.issue_tracker = "Jira".to_string();

        let text = render(&config, &full_context(), Strictness::Strict).expect("render");
        assert_eq!(
            text,
            "feat(cli): add render command\n\n\
             Renders the configured template.\n\n\
             Jira: PROJ-42\n\
             Co-authored-by: Bob <bob@x.com>\n\
             Reviewed-by: nobody"
        );
    }

    #[test]
    fn full_context_binds_every_template_field() {
        let template = TEMPLATE_FIELDS
            .iter()
            .map(|field| format!("{{{{{field}}}}}"))
            .collect::<Vec<_>>()
            .join("|");
        let config = config_with_template(&template);
        render(&config, &full_context(), Strictness::Strict).expect("every field is bound");
    }

    #[test]
    fn strict_mode_rejects_unbound_fields() {
        let config = config_with_template("{{Type}}: {{Subject}}");
        let err = render(&config, &RenderContext::default(), Strictness::Strict)
            .expect_err("unbound fields must fail in strict mode");
        assert!(matches!(err, TemplateError::Unresolved { .. }));
    }

    #[test]
    fn lenient_mode_renders_unbound_fields_empty() {
        let config = config_with_template("{{Type}}: {{Subject}}");
        let text = render(&config, &RenderContext::default(), Strictness::Lenient)
            .expect("lenient render");
        assert_eq!(text, ": ");
    }

    #[test]
    fn issue_tracker_is_bound_from_configuration() {
        let mut config = config_with_template("[{{IssueTracker}}]");
        config.issue_tracker = "GitHub".to_string();
        let text =
            render(&config, &RenderContext::default(), Strictness::Strict).expect("bound field");
        assert_eq!(text, "[GitHub]");
    }

    #[test]
    fn malformed_template_is_a_syntax_error() {
        let config = config_with_template("{{#if Type}}x{{/each}}");
        let err = render(&config, &full_context(), Strictness::Lenient)
            .expect_err("malformed template must fail");
        assert!(matches!(err, TemplateError::Syntax { .. }));
    }

    #[test]
    fn values_are_not_html_escaped() {
        let config = config_with_template("{{CoAuthors}}");
        let context = RenderContext {
            co_authors: Some(vec![Author::new("o", "O'Neil & Co", "o@x.com")]),
            ..RenderContext::default()
        };
        let text = render(&config, &context, Strictness::Strict).expect("render");
        assert_eq!(text, "Co-authored-by: O'Neil & Co <o@x.com>");
    }

    #[test]
    fn empty_co_author_list_binds_empty_text() {
        let config = config_with_template("x{{CoAuthors}}y");
        let context = RenderContext {
            co_authors: Some(Vec::new()),
            ..RenderContext::default()
        };
        let text = render(&config, &context, Strictness::Strict).expect("render");
        assert_eq!(text, "xy");
    }

    #[test]
    fn trailers_are_newline_separated() {
        let trailers = co_author_trailers(&[
            Author::new("bob", "Bob", "bob@x.com"),
            Author::new("carol", "Carol", "carol@x.com"),
        ]);
        assert_eq!(
            trailers,
            "Co-authored-by: Bob <bob@x.com>\nCo-authored-by: Carol <carol@x.com>"
        );
    }
}
