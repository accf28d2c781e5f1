use super::ChangeSink;
use crate::models::question::{AnswerValue, Question};

/// Marks the blank inside a fill-blank prompt.
pub const BLANK_MARKER: &str = "_____";

/// Only one blank is supported: the prompt is split at the first marker and
/// any later marker is shown as literal text.
pub struct FillBlankWidget {
    prefix: String,
    suffix: Option<String>,
    text: String,
    pub(super) sink: ChangeSink,
}

impl FillBlankWidget {
    pub fn new(question: &Question, initial: Option<&AnswerValue>, sink: ChangeSink) -> Self {
        let (prefix, suffix) = match question.prompt.split_once(BLANK_MARKER) {
            Some((before, after)) => (before.to_string(), Some(after.to_string())),
            None => (question.prompt.clone(), None),
        };
        Self {
            prefix,
            suffix,
            text: initial
                .and_then(AnswerValue::as_text)
                .unwrap_or_default()
                .to_string(),
            sink,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Text after the blank; `None` when the prompt has no marker and the
    /// input is shown below it.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn has_inline_blank(&self) -> bool {
        self.suffix.is_some()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Reports the raw text; trimming and case folding happen at scoring.
    pub fn input(&mut self, text: impl Into<String>) -> bool {
        if self.sink.is_disabled() {
            return false;
        }
        self.text = text.into();
        self.sink.emit(AnswerValue::Text(self.text.clone()));
        true
    }

    pub fn value(&self) -> Option<AnswerValue> {
        (!self.text.is_empty()).then(|| AnswerValue::Text(self.text.clone()))
    }
}
