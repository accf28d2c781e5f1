use super::ChangeSink;
use crate::models::question::{AnswerValue, Question};

pub struct SingleChoiceWidget {
    options: Vec<String>,
    selected: Option<usize>,
    pub(super) sink: ChangeSink,
}

impl SingleChoiceWidget {
    pub fn new(question: &Question, initial: Option<&AnswerValue>, sink: ChangeSink) -> Self {
        let options = question.options().to_vec();
        let selected = initial
            .and_then(AnswerValue::as_text)
            .and_then(|saved| options.iter().position(|o| o == saved));
        Self {
            options,
            selected,
            sink,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.map(|i| self.options[i].as_str())
    }

    /// Selects by option text. Unknown options are ignored.
    pub fn select(&mut self, option: &str) -> bool {
        match self.options.iter().position(|o| o == option) {
            Some(index) => self.select_index(index),
            None => false,
        }
    }

    pub fn select_index(&mut self, index: usize) -> bool {
        if self.sink.is_disabled() || index >= self.options.len() {
            return false;
        }
        self.selected = Some(index);
        let value = AnswerValue::Text(self.options[index].clone());
        self.sink.emit(value);
        true
    }

    pub fn value(&self) -> Option<AnswerValue> {
        self.selected().map(AnswerValue::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionType;
    use crate::widgets::test_support::{question, recorder};

    fn widget(initial: Option<&AnswerValue>, disabled: bool) -> (SingleChoiceWidget, std::sync::Arc<std::sync::Mutex<Vec<AnswerValue>>>) {
        let mut q = question(QuestionType::SingleChoice, "Which?");
        q.options = Some(vec!["A".into(), "B".into(), "C".into()]);
        let (cb, seen) = recorder();
        (SingleChoiceWidget::new(&q, initial, ChangeSink::new(disabled, cb)), seen)
    }

    #[test]
    fn nothing_selected_reports_nothing() {
        let (w, seen) = widget(None, false);
        assert_eq!(w.value(), None);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn selection_propagates_option_text() {
        let (mut w, seen) = widget(None, false);
        assert!(w.select("B"));
        assert!(w.select_index(2));
        assert!(!w.select("Z"));
        assert!(!w.select_index(9));
        assert_eq!(*seen.lock().unwrap(), vec![AnswerValue::from("B"), AnswerValue::from("C")]);
        assert_eq!(w.selected(), Some("C"));
    }

    #[test]
    fn saved_value_is_reselected() {
        let (w, _) = widget(Some(&"C".into()), false);
        assert_eq!(w.selected(), Some("C"));

        let (stale, _) = widget(Some(&"gone".into()), false);
        assert_eq!(stale.selected(), None);
    }

    #[test]
    fn disabled_ignores_selection() {
        let (mut w, seen) = widget(None, true);
        assert!(!w.select("A"));
        assert_eq!(w.value(), None);
        assert!(seen.lock().unwrap().is_empty());
    }
}
