//! Registry entries and their classification
//!
//! Every registry document carries a `kind` discriminator that selects one of
//! three entry variants:
//!
//! ```yaml
//! kind: app
//! name: billing
//! template: web-service
//! tags:
//!   team: payments
//! ```
//!
//! Classification is an explicit mapping from the discriminator to the variant
//! decoder, so adding a variant means touching [`EntryKind`] and
//! [`Entry::classify`] only.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::{CoreError, Result};

/// Field holding the entry discriminator
pub const DISCRIMINATOR: &str = "kind";

/// Tag set of an app, or tag predicate of an environment
pub type Tags = IndexMap<String, String>;

/// Entry variant selected by the discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    App,
    Template,
    Environment,
}

impl EntryKind {
    pub const ALL: [EntryKind; 3] = [EntryKind::App, EntryKind::Template, EntryKind::Environment];

    /// Discriminator value for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::App => "app",
            EntryKind::Template => "template",
            EntryKind::Environment => "environment",
        }
    }

    pub fn from_discriminator(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An application to deploy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub name: String,

    /// Name of the template rendering this app's values
    #[serde(rename = "template")]
    pub template_ref: String,

    pub tags: Tags,
}

/// A values template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,

    /// Jinja2 source
    #[serde(rename = "template")]
    pub body: String,
}

/// A deployment target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,

    /// Logical environment, e.g. `staging`
    #[serde(rename = "environment")]
    pub environment_name: String,

    /// Predicate over app tags
    pub tags: Tags,

    pub domain: String,

    /// Base URL of the Spinnaker gate serving this environment
    #[serde(rename = "spinnaker_url")]
    pub endpoint_base: String,
}

impl Environment {
    /// Every tag of the environment must be present on the app with the same
    /// value. A missing tag on the app never matches.
    pub fn matches(&self, app: &Application) -> bool {
        self.tags
            .iter()
            .all(|(key, value)| app.tags.get(key) == Some(value))
    }
}

/// A classified registry document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    App(Application),
    Template(Template),
    Environment(Environment),
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Entry::App(app) => &app.name,
            Entry::Template(template) => &template.name,
            Entry::Environment(environment) => &environment.name,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::App(_) => EntryKind::App,
            Entry::Template(_) => EntryKind::Template,
            Entry::Environment(_) => EntryKind::Environment,
        }
    }

    /// Parse YAML text and classify the resulting document
    pub fn parse(path: &str, source: &str) -> Result<Self> {
        let document: Value =
            serde_yaml::from_str(source).map_err(|e| CoreError::entry_parsing(path, e))?;
        Self::classify(path, &document)
    }

    /// Classify a structured document by its discriminator
    pub fn classify(path: &str, document: &Value) -> Result<Self> {
        let mapping = document.as_mapping().ok_or_else(|| {
            CoreError::entry_parsing(
                path,
                format!("expected a mapping, found {}", value_type(document)),
            )
        })?;

        let kind = match mapping.get(DISCRIMINATOR) {
            None => {
                return Err(CoreError::entry_parsing(
                    path,
                    format!("missing field `{}`", DISCRIMINATOR),
                ));
            }
            Some(Value::String(kind)) => kind.as_str(),
            Some(other) => {
                return Err(CoreError::entry_parsing(
                    path,
                    format!(
                        "field `{}` must be a string, found {}",
                        DISCRIMINATOR,
                        value_type(other)
                    ),
                ));
            }
        };

        let kind = EntryKind::from_discriminator(kind).ok_or_else(|| {
            CoreError::entry_parsing(
                path,
                format!(
                    "unknown {} `{}`, expected one of `app`, `template`, `environment`",
                    DISCRIMINATOR, kind
                ),
            )
        })?;

        let entry = match kind {
            EntryKind::App => Entry::App(decode(path, document)?),
            EntryKind::Template => Entry::Template(decode(path, document)?),
            EntryKind::Environment => Entry::Environment(decode(path, document)?),
        };

        if entry.name().is_empty() {
            return Err(CoreError::entry_parsing(path, "field `name` must not be empty"));
        }

        Ok(entry)
    }
}

fn decode<T: serde::de::DeserializeOwned>(path: &str, document: &Value) -> Result<T> {
    serde_yaml::from_value(document.clone()).map_err(|e| CoreError::entry_parsing(path, e))
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Render a tag set as `{key: value, ...}` for error details
pub fn format_tags(tags: &Tags) -> String {
    let pairs: Vec<String> = tags.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
    format!("{{{}}}", pairs.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(tags: &[(&str, &str)]) -> Application {
        Application {
            name: "svc".to_string(),
            template_ref: "t1".to_string(),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn environment(tags: &[(&str, &str)]) -> Environment {
        Environment {
            name: "e1".to_string(),
            environment_name: "prod".to_string(),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            domain: "example.com".to_string(),
            endpoint_base: "https://sk".to_string(),
        }
    }

    #[test]
    fn test_classify_app() {
        let entry = Entry::parse(
            "apps/svc.yaml",
            "kind: app\nname: svc\ntemplate: t1\ntags:\n  team: x\n",
        )
        .unwrap();

        assert_eq!(entry.kind(), EntryKind::App);
        assert_eq!(entry, Entry::App(app(&[("team", "x")])));
    }

    #[test]
    fn test_classify_template() {
        let entry = Entry::parse(
            "templates/t1.yml",
            "kind: template\nname: t1\ntemplate: |\n  image: {{ app.name }}\n",
        )
        .unwrap();

        match entry {
            Entry::Template(t) => {
                assert_eq!(t.name, "t1");
                assert_eq!(t.body, "image: {{ app.name }}\n");
            }
            other => panic!("Expected template, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_environment() {
        let entry = Entry::parse(
            "envs/prod.yaml",
            r#"
kind: environment
name: e1
environment: prod
tags:
  team: x
domain: example.com
spinnaker_url: https://sk
"#,
        )
        .unwrap();

        assert_eq!(entry, Entry::Environment(environment(&[("team", "x")])));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let entry = Entry::parse(
            "t.yaml",
            "kind: template\nname: t1\ntemplate: x\nowner: someone\n",
        )
        .unwrap();
        assert_eq!(entry.name(), "t1");
    }

    #[test]
    fn test_missing_discriminator() {
        let err = Entry::parse("a.yaml", "name: svc\n").unwrap_err();
        assert_eq!(
            err,
            CoreError::EntryParsing {
                path: "a.yaml".to_string(),
                message: "missing field `kind`".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_discriminator() {
        let err = Entry::parse("a.yaml", "kind: cluster\nname: c\n").unwrap_err();
        let details = err.details();
        assert!(details.starts_with("a.yaml: "));
        assert!(details.contains("unknown kind `cluster`"));
    }

    #[test]
    fn test_missing_required_field() {
        let err = Entry::parse("apps/svc.yaml", "kind: app\nname: svc\ntemplate: t1\n").unwrap_err();
        match err {
            CoreError::EntryParsing { path, message } => {
                assert_eq!(path, "apps/svc.yaml");
                assert!(message.contains("tags"), "{}", message);
            }
            other => panic!("Expected entry parsing error, got {:?}", other),
        }
    }

    #[test]
    fn test_mistyped_field() {
        let err = Entry::parse(
            "apps/svc.yaml",
            "kind: app\nname: svc\ntemplate: t1\ntags: [a, b]\n",
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::EntryParsing { .. }));
    }

    #[test]
    fn test_non_mapping_document() {
        let err = Entry::parse("list.yaml", "- a\n- b\n").unwrap_err();
        assert!(err.details().contains("expected a mapping, found a sequence"));

        let err = Entry::parse("empty.yaml", "").unwrap_err();
        assert!(err.details().contains("found null"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Entry::parse("bad.yaml", "kind: [unclosed\n").unwrap_err();
        assert!(matches!(err, CoreError::EntryParsing { ref path, .. } if path == "bad.yaml"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = Entry::parse("t.yaml", "kind: template\nname: ''\ntemplate: x\n").unwrap_err();
        assert!(err.details().contains("must not be empty"));
    }

    #[test]
    fn test_matches_all_tags() {
        let env = environment(&[("team", "x"), ("tier", "web")]);

        assert!(env.matches(&app(&[("team", "x"), ("tier", "web"), ("extra", "y")])));
        assert!(!env.matches(&app(&[("team", "x"), ("tier", "worker")])));
    }

    #[test]
    fn test_missing_tag_is_not_a_wildcard() {
        let env = environment(&[("team", "x"), ("tier", "web")]);
        assert!(!env.matches(&app(&[("team", "x")])));
        assert!(!env.matches(&app(&[])));
    }

    #[test]
    fn test_empty_predicate_matches_everything() {
        let env = environment(&[]);
        assert!(env.matches(&app(&[])));
        assert!(env.matches(&app(&[("team", "x")])));
    }

    #[test]
    fn test_format_tags() {
        let a = app(&[("team", "x"), ("tier", "web")]);
        assert_eq!(format_tags(&a.tags), "{team: x, tier: web}");
        assert_eq!(format_tags(&Tags::new()), "{}");
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in EntryKind::ALL {
            assert_eq!(EntryKind::from_discriminator(kind.as_str()), Some(kind));
        }
        assert_eq!(EntryKind::from_discriminator("App"), None);
    }
}
