//! Flat placeholder rendering over a closed key set, and per-step
//! template loading.
//!
//! This is deliberately not a template engine: substitution is a single
//! verbatim pass over a fixed enumerated key set, with no escaping,
//! recursion, conditionals or loops. Richer templating can replace this
//! module behind the same [`render`] signature.

use std::fs;
use std::io;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CadenceError, DeliveryError};
use crate::recipient::Recipient;
use crate::state::CadenceState;

/// A placeholder token is `{` + lowercase identifier + `}`. CSS blocks
/// in HTML bodies (`{ margin: 0 }`, `{color:#fff}`) never match this
/// shape, so they pass through untouched.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([a-z][a-z0-9_]*)\}").expect("placeholder pattern"));

/// Substitution keys recognized by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Name,
    Company,
    Email,
}

impl Placeholder {
    fn resolve(token: &str) -> Option<Self> {
        match token {
            "name" => Some(Self::Name),
            "company" => Some(Self::Company),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    fn bind(self, recipient: &Recipient) -> &str {
        match self {
            Self::Name => &recipient.name,
            Self::Company => &recipient.company,
            Self::Email => &recipient.email,
        }
    }
}

/// Render a template against one recipient.
///
/// Every recognized `{token}` is replaced verbatim with the recipient's
/// field; a token outside the recognized set fails the whole render
/// with [`DeliveryError::MissingField`]. Substituted values are not
/// scanned again, so a field value containing `{name}` stays literal.
pub fn render(template: &str, recipient: &Recipient) -> Result<String, DeliveryError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for m in PLACEHOLDER.find_iter(template) {
        let token = &template[m.start() + 1..m.end() - 1];
        let key = Placeholder::resolve(token)
            .ok_or_else(|| DeliveryError::MissingField(token.to_string()))?;
        out.push_str(&template[last..m.start()]);
        out.push_str(key.bind(recipient));
        last = m.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

/// Templates for one cadence step: subject line, HTML body, and an
/// optional plain-text variant for multipart delivery.
///
/// Loaded fresh every run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTemplates {
    pub subject: String,
    pub html: String,
    pub plain: Option<String>,
}

impl StepTemplates {
    /// Load the current step's templates.
    ///
    /// The HTML body is `sequence_dir/<paths[position]>`; a sibling
    /// file with a `.txt` extension, when present, becomes the plain
    /// variant of a multipart message. Missing or unreadable body files
    /// are fatal: the run aborts before any recipient is attempted.
    pub fn load(sequence_dir: &Path, state: &CadenceState) -> Result<Self, CadenceError> {
        let pos = state.position as usize;
        // Guaranteed in-bounds by the store's load-time validation.
        let subject = state.subjects[pos].clone();
        let html_path = sequence_dir.join(&state.paths[pos]);

        let html = fs::read_to_string(&html_path).map_err(|e| CadenceError::TemplateLoad {
            path: html_path.display().to_string(),
            source: e,
        })?;

        let plain_path = html_path.with_extension("txt");
        let plain = match fs::read_to_string(&plain_path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(CadenceError::TemplateLoad {
                    path: plain_path.display().to_string(),
                    source: e,
                })
            }
        };

        Ok(Self {
            subject,
            html,
            plain,
        })
    }
}
