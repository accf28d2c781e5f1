use super::ChangeSink;
use crate::models::question::{AnswerValue, Question};

/// Items are taken from the `|`-separated prompt. Every reorder reports the
/// whole sequence. Without a usable saved order the displayed order is
/// reported once on mount, so an untouched list still counts as answered.
pub struct OrderedListWidget {
    items: Vec<String>,
    pub(super) sink: ChangeSink,
}

impl OrderedListWidget {
    pub fn new(question: &Question, initial: Option<&AnswerValue>, sink: ChangeSink) -> Self {
        let authored = question.ordered_items();
        let (items, restored) = match initial.and_then(AnswerValue::as_list) {
            Some(saved) if is_permutation(saved, &authored) => (saved.to_vec(), true),
            _ => (authored, false),
        };
        let mut widget = Self { items, sink };
        if !restored && !widget.items.is_empty() && !widget.sink.is_disabled() {
            widget.propagate();
        }
        widget
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Drag-and-drop: the dragged item and the drop target trade places.
    pub fn drop_onto(&mut self, dragged: usize, target: usize) -> bool {
        if !self.can_reorder(dragged, target) {
            return false;
        }
        self.items.swap(dragged, target);
        self.propagate();
        true
    }

    /// Removes the item at `from` and inserts it at `to`, shifting the rest.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if !self.can_reorder(from, to) {
            return false;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        self.propagate();
        true
    }

    pub fn value(&self) -> Option<AnswerValue> {
        (!self.items.is_empty()).then(|| AnswerValue::List(self.items.clone()))
    }

    fn can_reorder(&self, a: usize, b: usize) -> bool {
        !self.sink.is_disabled() && a != b && a < self.items.len() && b < self.items.len()
    }

    fn propagate(&mut self) {
        self.sink.emit(AnswerValue::List(self.items.clone()));
    }
}

fn is_permutation(saved: &[String], authored: &[String]) -> bool {
    if saved.len() != authored.len() {
        return false;
    }
    let mut a = saved.to_vec();
    let mut b = authored.to_vec();
    a.sort();
    b.sort();
    a == b
}
