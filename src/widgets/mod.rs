//! Answer capture widgets, one per question type.
//!
//! A widget owns its transient UI state and reports every interaction
//! upward through its callback immediately; there is no confirm step.
//! Building a widget from a previously saved answer reproduces the same
//! state and reports nothing. The one exception is an ordered list with no
//! saved order, which reports the order it shows.

pub mod code;
pub mod fill_blank;
pub mod ordered_list;
pub mod short_text;
pub mod single_choice;

use crate::models::question::{AnswerValue, Question, QuestionType};

pub use code::CodeWidget;
pub use fill_blank::FillBlankWidget;
pub use ordered_list::OrderedListWidget;
pub use short_text::ShortTextWidget;
pub use single_choice::SingleChoiceWidget;

pub type AnswerCallback = Box<dyn FnMut(AnswerValue) + Send>;

/// Forwards normalized answers to the owner unless the widget is disabled.
pub struct ChangeSink {
    disabled: bool,
    on_change: AnswerCallback,
}

impl ChangeSink {
    pub fn new(disabled: bool, on_change: AnswerCallback) -> Self {
        Self { disabled, on_change }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn emit(&mut self, value: AnswerValue) {
        (self.on_change)(value);
    }
}

pub enum Widget {
    SingleChoice(SingleChoiceWidget),
    FillBlank(FillBlankWidget),
    Code(CodeWidget),
    ShortText(ShortTextWidget),
    OrderedList(OrderedListWidget),
}

impl Widget {
    /// Picks the widget for the question type and restores `initial` into it.
    pub fn for_question(
        question: &Question,
        initial: Option<&AnswerValue>,
        disabled: bool,
        on_change: AnswerCallback,
    ) -> Self {
        let sink = ChangeSink::new(disabled, on_change);
        match question.question_type {
            QuestionType::SingleChoice => {
                Widget::SingleChoice(SingleChoiceWidget::new(question, initial, sink))
            }
            QuestionType::FillBlank => Widget::FillBlank(FillBlankWidget::new(question, initial, sink)),
            QuestionType::Code => Widget::Code(CodeWidget::new(question, initial, sink)),
            QuestionType::ShortText => Widget::ShortText(ShortTextWidget::new(initial, sink)),
            QuestionType::OrderedList => {
                Widget::OrderedList(OrderedListWidget::new(question, initial, sink))
            }
        }
    }

    pub fn question_type(&self) -> QuestionType {
        match self {
            Widget::SingleChoice(_) => QuestionType::SingleChoice,
            Widget::FillBlank(_) => QuestionType::FillBlank,
            Widget::Code(_) => QuestionType::Code,
            Widget::ShortText(_) => QuestionType::ShortText,
            Widget::OrderedList(_) => QuestionType::OrderedList,
        }
    }

    /// The answer the widget currently shows. Ordered lists always show an
    /// order and report it; the other widgets return `None` until something
    /// is entered.
    pub fn value(&self) -> Option<AnswerValue> {
        match self {
            Widget::SingleChoice(w) => w.value(),
            Widget::FillBlank(w) => w.value(),
            Widget::Code(w) => w.value(),
            Widget::ShortText(w) => w.value(),
            Widget::OrderedList(w) => w.value(),
        }
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.sink_mut().set_disabled(disabled);
    }

    pub fn is_disabled(&self) -> bool {
        match self {
            Widget::SingleChoice(w) => w.sink.is_disabled(),
            Widget::FillBlank(w) => w.sink.is_disabled(),
            Widget::Code(w) => w.sink.is_disabled(),
            Widget::ShortText(w) => w.sink.is_disabled(),
            Widget::OrderedList(w) => w.sink.is_disabled(),
        }
    }

    fn sink_mut(&mut self) -> &mut ChangeSink {
        match self {
            Widget::SingleChoice(w) => &mut w.sink,
            Widget::FillBlank(w) => &mut w.sink,
            Widget::Code(w) => &mut w.sink,
            Widget::ShortText(w) => &mut w.sink,
            Widget::OrderedList(w) => &mut w.sink,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{question, recorder};
    use super::*;

    #[test]
    fn dispatch_follows_question_type() {
        for t in QuestionType::ALL {
            let (cb, _) = recorder();
            let w = Widget::for_question(&question(t, "a|b"), None, false, cb);
            assert_eq!(w.question_type(), t);
        }
    }

    #[test]
    fn mounting_with_saved_answer_reports_nothing() {
        let mut q = question(QuestionType::SingleChoice, "Pick");
        q.options = Some(vec!["A".into(), "B".into()]);
        let (cb, seen) = recorder();
        let w = Widget::for_question(&q, Some(&"B".into()), false, cb);
        assert_eq!(w.value(), Some("B".into()));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn disabling_through_dispatch_blocks_input() {
        let (cb, seen) = recorder();
        let mut w = Widget::for_question(&question(QuestionType::ShortText, "Why?"), None, false, cb);
        w.set_disabled(true);
        assert!(w.is_disabled());
        if let Widget::ShortText(ref mut t) = w {
            assert!(!t.input("ignored"));
        }
        assert!(seen.lock().unwrap().is_empty());
    }
}
