//! The synthesis form: every user input of one request, validated against
//! the knowledge base, plus the per-session UI state.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::ontology::{self, PARADIGMS, PROFILES, STRUCTURAL_MODELS};

/// Largest accepted attachment (2 MiB).
pub const MAX_ATTACHMENT_BYTES: u64 = 2 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
pub enum Expertise {
    Novice,
    Intermediate,
    #[default]
    Expert,
}

impl std::fmt::Display for Expertise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expertise::Novice => write!(f, "Novice"),
            Expertise::Intermediate => write!(f, "Intermediate"),
            Expertise::Expert => write!(f, "Expert"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GoalContext {
    #[default]
    ScientificResearch,
    ProblemSolving,
    Educational,
    PolicyMaking,
}

impl std::fmt::Display for GoalContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            GoalContext::ScientificResearch => ontology::GOAL_CONTEXTS[0],
            GoalContext::ProblemSolving => ontology::GOAL_CONTEXTS[1],
            GoalContext::Educational => ontology::GOAL_CONTEXTS[2],
            GoalContext::PolicyMaking => ontology::GOAL_CONTEXTS[3],
        };
        write!(f, "{}", label)
    }
}

/// UI state that outlives a single request: owned by the CLI layer and
/// handed to commands by reference.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub expertise_default: Expertise,
    pub show_user_guide: bool,
}

impl SessionState {
    pub fn new(expertise_default: Expertise) -> Self {
        Self {
            expertise_default,
            show_user_guide: false,
        }
    }

    pub fn toggle_user_guide(&mut self) {
        self.show_user_guide = !self.show_user_guide;
    }
}

/// Supplementary text appended to the inquiry.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub name: String,
    pub content: String,
}

impl Attachment {
    /// Read a `.txt` attachment, enforcing the size limit.
    pub fn read(path: &Path) -> Result<Self> {
        let is_txt = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
        if !is_txt {
            return Err(FormError::AttachmentNotText {
                path: path.to_path_buf(),
            }
            .into());
        }

        let size = fs::metadata(path)
            .with_context(|| format!("Failed to read attachment {}", path.display()))?
            .len();
        if size > MAX_ATTACHMENT_BYTES {
            return Err(FormError::AttachmentTooLarge {
                path: path.to_path_buf(),
                size,
                limit: MAX_ATTACHMENT_BYTES,
            }
            .into());
        }

        let bytes =
            fs::read(path).with_context(|| format!("Failed to read attachment {}", path.display()))?;
        let content = String::from_utf8(bytes).map_err(|_| FormError::AttachmentNotText {
            path: path.to_path_buf(),
        })?;

        Ok(Self {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            content,
        })
    }
}

/// All inputs of one synthesis request.
#[derive(Debug, Clone)]
pub struct SynthesisForm {
    /// Comma-separated author names.
    pub authors: String,
    pub profiles: Vec<String>,
    pub sciences: Vec<String>,
    pub expertise: Expertise,
    pub models: Vec<String>,
    pub paradigms: Vec<String>,
    pub goal: GoalContext,
    pub approaches: Vec<String>,
    pub methods: Vec<String>,
    pub tools: Vec<String>,
    pub inquiry: String,
    pub attachment: Option<Attachment>,
}

impl SynthesisForm {
    /// A form pre-filled with the minimal default configuration.
    pub fn with_defaults(session: &SessionState) -> Self {
        Self {
            authors: String::new(),
            profiles: vec!["Adventurers".into()],
            sciences: vec!["Physics".into(), "Psychology".into(), "Sociology".into()],
            expertise: session.expertise_default,
            models: vec!["Concepts".into()],
            paradigms: vec!["Rationalism".into()],
            goal: GoalContext::default(),
            approaches: vec!["Perspective shifting".into()],
            methods: Vec::new(),
            tools: Vec::new(),
            inquiry: String::new(),
            attachment: None,
        }
    }

    /// Canonicalize every selection against the knowledge base.
    ///
    /// Names match case-insensitively and are rewritten to their canonical
    /// spelling. Methods and tools must be offered by the selected sciences.
    pub fn normalize(&mut self) -> Result<(), FormError> {
        if self.inquiry.trim().is_empty() {
            return Err(FormError::EmptyInquiry);
        }

        let names = |table: &[(&'static str, &'static str)]| -> Vec<&'static str> {
            table.iter().map(|(name, _)| *name).collect()
        };

        canonicalize(&mut self.profiles, "user profile", &names(PROFILES))?;
        canonicalize(&mut self.sciences, "science field", &ontology::sorted_science_names())?;
        canonicalize(&mut self.models, "structural model", &names(STRUCTURAL_MODELS))?;
        canonicalize(&mut self.paradigms, "scientific paradigm", &names(PARADIGMS))?;
        let approaches: Vec<&str> = ontology::mental_approaches().collect();
        canonicalize(&mut self.approaches, "mental approach", &approaches)?;

        let (methods, tools) = ontology::methods_and_tools(&self.sciences);
        canonicalize_offered(&mut self.methods, "Methodology", &methods)?;
        canonicalize_offered(&mut self.tools, "Tool", &tools)?;

        Ok(())
    }

    /// The inquiry with the attachment appended, as sent to the model.
    pub fn processed_query(&self) -> String {
        match &self.attachment {
            Some(attachment) if !attachment.content.is_empty() => format!(
                "{}\n\n[SUPPLEMENTAL DATA FROM ATTACHMENT]:\n{}",
                self.inquiry, attachment.content
            ),
            _ => self.inquiry.clone(),
        }
    }
}

fn lookup(value: &str, options: &[&'static str]) -> Option<&'static str> {
    let value = value.trim();
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(value))
        .copied()
}

fn canonicalize(
    values: &mut [String],
    kind: &'static str,
    options: &[&'static str],
) -> Result<(), FormError> {
    for value in values.iter_mut() {
        let canonical = lookup(value, options).ok_or_else(|| FormError::Unknown {
            kind,
            value: value.clone(),
            options: options.join(", "),
        })?;
        *value = canonical.to_string();
    }
    Ok(())
}

fn canonicalize_offered(
    values: &mut [String],
    kind: &'static str,
    options: &[&'static str],
) -> Result<(), FormError> {
    for value in values.iter_mut() {
        let canonical = lookup(value, options).ok_or_else(|| FormError::NotOffered {
            kind,
            value: value.clone(),
            options: options.join(", "),
        })?;
        *value = canonical.to_string();
    }
    Ok(())
}
