//! Prompt templates for exercise generation
//!
//! Uses the Tera templating engine. Three prompts ship embedded in the
//! binary:
//! - `exercises/draft.txt`: phase one, exercise texts with blanks only
//! - `exercises/grade.txt`: phase two, answers, base forms and hints for the drafts
//! - `exercises/single_phase.txt`: one-shot mode producing everything at once
//!
//! # Template Locations
//!
//! A templates directory can be configured; any file in it whose relative
//! path matches an embedded template name replaces that template at startup.
//!
//! # Example
//!
//! ```rust,ignore
//! use infrastructure::templates::TemplateEngine;
//!
//! let engine = TemplateEngine::new()?;
//! let prompt = engine.draft_prompt(&request)?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use application::{error::ApplicationError, ports::PromptPort};
use domain::{ExerciseDraft, ExerciseRequest};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use thiserror::Error;
use tracing::{debug, info};

/// Phase one template name
pub const DRAFT_TEMPLATE: &str = "exercises/draft.txt";
/// Phase two template name
pub const GRADE_TEMPLATE: &str = "exercises/grade.txt";
/// One-shot template name
pub const SINGLE_PHASE_TEMPLATE: &str = "exercises/single_phase.txt";

/// Error type for template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template not found
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template rendering failed
    #[error("Template rendering failed: {0}")]
    Render(String),

    /// Template compilation failed
    #[error("Template compilation failed: {0}")]
    Compile(String),
}

impl From<tera::Error> for TemplateError {
    fn from(e: tera::Error) -> Self {
        match e.kind {
            tera::ErrorKind::TemplateNotFound(name) => Self::NotFound(name),
            _ => Self::Render(e.to_string()),
        }
    }
}

impl From<TemplateError> for ApplicationError {
    fn from(e: TemplateError) -> Self {
        match e {
            TemplateError::Compile(msg) => Self::Configuration(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Template engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Directory with template overrides (optional)
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
}

/// Embedded templates - compiled into the binary
mod embedded {
    pub const DRAFT: &str = r"You are an experienced {{ exercise_language }} teacher writing gap-fill exercises.

Write exactly {{ total }} exercises in {{ exercise_language }} on the topic: {{ topic }}.
The learner's level is {{ difficulty }} (CEFR). The learner's own language is {{ user_language }}.

Rules:
- Each exercise is one or two natural sentences.
- Replace every word the learner must supply with a blank written as three underscores: ___
- Every exercise has at least one blank.
- Do not reveal the missing words anywhere in the exercise text.
- Do not add answers, explanations, hints, numbering or translations.
- Return exactly {{ total }} exercises, no more and no fewer.
";

    pub const GRADE: &str = r"You are an experienced {{ exercise_language }} teacher checking gap-fill exercises.

Below are {{ drafts | length }} exercises in {{ exercise_language }} on the topic: {{ topic }}, level {{ difficulty }} (CEFR).
Each line is one exercise. Blanks are written as ___.

{{ drafts_text }}

For every exercise, in the same order:
- Copy the exercise text unchanged into `exercise`.
- Number the blanks of the exercise from zero, left to right. Blank 0 is the first ___.
- For every blank give its `position`, the correct `answer` and a short `explanation` written in {{ user_language }}.
- If several answers are correct for one blank, list each as a separate answer with the same position.
- Every blank must have at least one answer and every position must refer to an existing blank.
{%- if include_base_form %}
- Give the dictionary base form of the missing word in `baseForm`. The base form must never be the answer itself and must never contain it. Use null when the base form would reveal the answer.
{%- else %}
- Set `baseForm` to null.
{%- endif %}
{%- if include_hints %}
- Give hints in {{ user_language }} that help without giving the answer away. Rate each hint with `evidence` from 0 (vague) to 100 (almost the answer).
{%- else %}
- Return an empty `hints` list.
{%- endif %}
- Never put an answer into the visible exercise text.
";

    pub const SINGLE_PHASE: &str = r"You are an experienced {{ exercise_language }} teacher writing gap-fill exercises.

Write exactly {{ total }} exercises in {{ exercise_language }} on the topic: {{ topic }}.
The learner's level is {{ difficulty }} (CEFR). The learner's own language is {{ user_language }}.

Rules:
- Number the exercises from zero with `exerciseId`.
- Replace every word the learner must supply with a blank written as three underscores: ___
- Number the blanks of each exercise from zero, left to right.
- For every blank give an answer with its `exerciseId`, `position`, the correct `answer` and a short `explanation` in {{ user_language }}.
- If several answers are correct for one blank, list each as a separate answer with the same position.
- Every position must refer to an existing blank of its exercise.
{%- if include_base_form %}
- Give the dictionary base form of the missing word in `baseForm`. It must never be or contain the answer; use null otherwise.
{%- else %}
- Set `baseForm` to null.
{%- endif %}
{%- if include_hints %}
- Give hints in {{ user_language }} with their `exerciseId` and an `evidence` rating from 0 to 100.
{%- else %}
- Return an empty `hints` list.
{%- endif %}
- Never put an answer into the visible exercise text.
- Return exactly {{ total }} exercises.
";
}

/// Template engine using Tera
#[derive(Clone)]
pub struct TemplateEngine {
    tera: Arc<Tera>,
    config: TemplateConfig,
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TemplateEngine {
    /// Create a template engine with only the embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        Self::with_config(TemplateConfig::default())
    }

    /// Create a template engine, applying overrides from `templates_dir`
    pub fn with_config(config: TemplateConfig) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            (DRAFT_TEMPLATE, embedded::DRAFT),
            (GRADE_TEMPLATE, embedded::GRADE),
            (SINGLE_PHASE_TEMPLATE, embedded::SINGLE_PHASE),
        ])
        .map_err(|e| TemplateError::Compile(e.to_string()))?;

        if let Some(ref dir) = config.templates_dir {
            load_overrides(&mut tera, dir)?;
        }

        Ok(Self {
            tera: Arc::new(tera),
            config,
        })
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String, TemplateError> {
        self.tera
            .render(template_name, context)
            .map_err(TemplateError::from)
    }

    /// Check if a template exists
    #[must_use]
    pub fn template_exists(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }
}

/// Replace embedded templates with files found under `dir`
fn load_overrides(tera: &mut Tera, dir: &Path) -> Result<(), TemplateError> {
    if !dir.is_dir() {
        return Err(TemplateError::Compile(format!(
            "Templates directory does not exist: {}",
            dir.display()
        )));
    }

    for name in [DRAFT_TEMPLATE, GRADE_TEMPLATE, SINGLE_PHASE_TEMPLATE] {
        let path = dir.join(name);
        if path.is_file() {
            tera.add_template_file(&path, Some(name))
                .map_err(|e| TemplateError::Compile(format!("{}: {e}", path.display())))?;
            debug!(template = %name, path = %path.display(), "Loaded template override");
        }
    }

    info!(dir = %dir.display(), "Loaded custom templates");
    Ok(())
}

fn request_context(request: &ExerciseRequest) -> Context {
    let mut ctx = Context::new();
    ctx.insert("exercise_language", &request.exercise_language);
    ctx.insert("user_language", &request.user_language);
    ctx.insert("topic", &request.topic);
    ctx.insert("difficulty", request.difficulty.as_str());
    ctx.insert("total", &request.total);
    ctx.insert("include_base_form", &request.include_base_form);
    ctx.insert("include_hints", &request.include_hints);
    ctx
}

impl PromptPort for TemplateEngine {
    fn single_phase_prompt(&self, request: &ExerciseRequest) -> Result<String, ApplicationError> {
        Ok(self.render(SINGLE_PHASE_TEMPLATE, &request_context(request))?)
    }

    fn draft_prompt(&self, request: &ExerciseRequest) -> Result<String, ApplicationError> {
        Ok(self.render(DRAFT_TEMPLATE, &request_context(request))?)
    }

    fn grading_prompt(
        &self,
        request: &ExerciseRequest,
        drafts: &[ExerciseDraft],
    ) -> Result<String, ApplicationError> {
        let texts: Vec<&str> = drafts.iter().map(|d| d.text.as_str()).collect();
        let mut ctx = request_context(request);
        ctx.insert("drafts", &texts);
        ctx.insert("drafts_text", &texts.join("\n"));
        Ok(self.render(GRADE_TEMPLATE, &ctx)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{AiProvider, ExerciseDifficulty};

    fn request() -> ExerciseRequest {
        ExerciseRequest {
            provider: AiProvider::OpenAi,
            exercise_language: "German".into(),
            user_language: "English".into(),
            topic: "Perfekt".into(),
            total: 7,
            difficulty: ExerciseDifficulty::B1,
            include_base_form: true,
            include_hints: false,
        }
    }

    #[test]
    fn embedded_templates_are_registered() {
        let engine = TemplateEngine::new().unwrap();
        assert!(engine.template_exists(DRAFT_TEMPLATE));
        assert!(engine.template_exists(GRADE_TEMPLATE));
        assert!(engine.template_exists(SINGLE_PHASE_TEMPLATE));
        assert!(!engine.template_exists("nonexistent/template.txt"));
    }

    #[test]
    fn draft_prompt_carries_request_parameters() {
        let engine = TemplateEngine::new().unwrap();
        let prompt = engine.draft_prompt(&request()).unwrap();

        assert!(prompt.contains("exactly 7 exercises in German"));
        assert!(prompt.contains("topic: Perfekt"));
        assert!(prompt.contains("B1"));
        assert!(prompt.contains("English"));
        assert!(prompt.contains("___"));
    }

    #[test]
    fn grading_prompt_lists_drafts_one_per_line() {
        let engine = TemplateEngine::new().unwrap();
        let drafts = vec![
            ExerciseDraft::new("Ich ___ nach Hause gegangen."),
            ExerciseDraft::new("Wir ___ Pizza gegessen."),
        ];
        let prompt = engine.grading_prompt(&request(), &drafts).unwrap();

        assert!(prompt.contains("Ich ___ nach Hause gegangen.\nWir ___ Pizza gegessen."));
        assert!(prompt.contains("Below are 2 exercises"));
        assert!(prompt.contains("from zero"));
    }

    #[test]
    fn flags_switch_instructions() {
        let engine = TemplateEngine::new().unwrap();
        let drafts = vec![ExerciseDraft::new("___")];

        let prompt = engine.grading_prompt(&request(), &drafts).unwrap();
        assert!(prompt.contains("dictionary base form"));
        assert!(prompt.contains("Return an empty `hints` list"));

        let mut req = request();
        req.include_base_form = false;
        req.include_hints = true;
        let prompt = engine.grading_prompt(&req, &drafts).unwrap();
        assert!(prompt.contains("Set `baseForm` to null"));
        assert!(prompt.contains("evidence"));
    }

    #[test]
    fn single_phase_prompt_mentions_exercise_ids() {
        let engine = TemplateEngine::new().unwrap();
        let prompt = engine.single_phase_prompt(&request()).unwrap();
        assert!(prompt.contains("exerciseId"));
        assert!(prompt.contains("Return exactly 7 exercises"));
    }

    #[test]
    fn override_directory_replaces_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("exercises")).unwrap();
        std::fs::write(
            dir.path().join(DRAFT_TEMPLATE),
            "Custom: {{ total }} about {{ topic }}",
        )
        .unwrap();

        let engine = TemplateEngine::with_config(TemplateConfig {
            templates_dir: Some(dir.path().to_path_buf()),
        })
        .unwrap();

        assert_eq!(engine.draft_prompt(&request()).unwrap(), "Custom: 7 about Perfekt");
        assert!(
            engine
                .grading_prompt(&request(), &[ExerciseDraft::new("___")])
                .unwrap()
                .contains("Blanks are written as ___")
        );
    }

    #[test]
    fn missing_override_directory_is_rejected() {
        let result = TemplateEngine::with_config(TemplateConfig {
            templates_dir: Some(PathBuf::from("/nonexistent/templates")),
        });
        assert!(matches!(result, Err(TemplateError::Compile(_))));
    }

    #[test]
    fn compile_error_maps_to_configuration() {
        let err: ApplicationError = TemplateError::Compile("bad".into()).into();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }
}
