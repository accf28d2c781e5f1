use super::ChangeSink;
use crate::models::question::AnswerValue;

pub const MAX_CHARS: usize = 500;

pub struct ShortTextWidget {
    text: String,
    pub(super) sink: ChangeSink,
}

impl ShortTextWidget {
    pub fn new(initial: Option<&AnswerValue>, sink: ChangeSink) -> Self {
        Self {
            text: truncate(initial.and_then(AnswerValue::as_text).unwrap_or_default()),
            sink,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn remaining_chars(&self) -> usize {
        MAX_CHARS.saturating_sub(self.text.chars().count())
    }

    /// Input past the limit is cut off before it is reported.
    pub fn input(&mut self, text: &str) -> bool {
        if self.sink.is_disabled() {
            return false;
        }
        self.text = truncate(text);
        self.sink.emit(AnswerValue::Text(self.text.clone()));
        true
    }

    pub fn value(&self) -> Option<AnswerValue> {
        (!self.text.is_empty()).then(|| AnswerValue::Text(self.text.clone()))
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_CHARS).collect()
}
