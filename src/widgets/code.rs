use super::ChangeSink;
use crate::models::question::{AnswerValue, Question};

pub const DEFAULT_LANGUAGE: &str = "javascript";

pub struct CodeWidget {
    language: String,
    source: String,
    pub(super) sink: ChangeSink,
}

impl CodeWidget {
    /// Starts from the saved answer, else the template, else an empty editor.
    pub fn new(question: &Question, initial: Option<&AnswerValue>, sink: ChangeSink) -> Self {
        let source = initial
            .and_then(AnswerValue::as_text)
            .map(str::to_string)
            .or_else(|| question.code_template.clone())
            .unwrap_or_default();
        Self {
            language: question
                .language
                .clone()
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            source,
            sink,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn edit(&mut self, source: impl Into<String>) -> bool {
        if self.sink.is_disabled() {
            return false;
        }
        self.source = source.into();
        self.sink.emit(AnswerValue::Text(self.source.clone()));
        true
    }

    pub fn value(&self) -> Option<AnswerValue> {
        (!self.source.is_empty()).then(|| AnswerValue::Text(self.source.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionType;
    use crate::widgets::test_support::{question, recorder};

    #[test]
    fn initial_source_prefers_saved_answer() {
        let mut q = question(QuestionType::Code, "Write add");
        q.code_template = Some("function add(a, b) {}".into());

        let (cb, _) = recorder();
        let fresh = CodeWidget::new(&q, None, ChangeSink::new(false, cb));
        assert_eq!(fresh.source(), "function add(a, b) {}");
        assert_eq!(fresh.language(), DEFAULT_LANGUAGE);

        let (cb, _) = recorder();
        let saved = AnswerValue::from("return a + b");
        let resumed = CodeWidget::new(&q, Some(&saved), ChangeSink::new(false, cb));
        assert_eq!(resumed.source(), "return a + b");
    }

    #[test]
    fn edits_propagate_unless_disabled() {
        let mut q = question(QuestionType::Code, "Write add");
        q.language = Some("python".into());
        let (cb, seen) = recorder();
        let mut w = CodeWidget::new(&q, None, ChangeSink::new(false, cb));
        assert_eq!(w.language(), "python");
        assert!(w.edit("return a+b"));
        w.sink.set_disabled(true);
        assert!(!w.edit("lost"));
        assert_eq!(*seen.lock().unwrap(), vec![AnswerValue::from("return a+b")]);
    }
}
