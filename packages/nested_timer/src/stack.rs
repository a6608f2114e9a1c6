//! The stack of currently open events.

use crate::event::OpenEvent;

/// Separates the segments of a full event path.
pub(crate) const PATH_SEPARATOR: char = '.';

/// Open events from outermost (bottom) to innermost (top).
///
/// Only ever modified by pushing a newly started event or popping the innermost one, so the
/// contents always form one unbroken nesting chain.
#[derive(Debug, Default)]
pub(crate) struct EventStack {
    open: Vec<OpenEvent>,
}

impl EventStack {
    /// Full path for an event with the given name started right now.
    pub(crate) fn path_for(&self, name: &str) -> String {
        match self.open.last() {
            None => name.to_string(),
            Some(parent) => {
                let mut path = String::with_capacity(
                    parent
                        .full_path
                        .len()
                        .saturating_add(1)
                        .saturating_add(name.len()),
                );
                path.push_str(&parent.full_path);
                path.push(PATH_SEPARATOR);
                path.push_str(name);
                path
            }
        }
    }

    pub(crate) fn push(&mut self, event: OpenEvent) {
        self.open.push(event);
    }

    /// Pops the innermost event if it has the given sequence number.
    ///
    /// Returns `None` and leaves the stack unchanged if the innermost event is a different
    /// one or if the stack is empty.
    pub(crate) fn pop_if_innermost(&mut self, sequence: u64) -> Option<OpenEvent> {
        if self.open.last()?.sequence != sequence {
            return None;
        }

        self.open.pop()
    }

    pub(crate) fn innermost_path(&self) -> Option<String> {
        self.open.last().map(|event| event.full_path.to_string())
    }

    /// Full paths of all open events, outermost first.
    pub(crate) fn paths(&self) -> Vec<String> {
        self.open
            .iter()
            .map(|event| event.full_path.to_string())
            .collect()
    }

    pub(crate) fn depth(&self) -> usize {
        self.open.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;

    fn push(stack: &mut EventStack, sequence: u64, name: &str) {
        let full_path: Rc<str> = stack.path_for(name).into();
        stack.push(OpenEvent {
            sequence,
            name: name.to_string(),
            full_path,
            start: Duration::ZERO,
        });
    }

    #[test]
    fn top_level_path_is_name() {
        let stack = EventStack::default();
        assert_eq!(stack.path_for("INNER"), "INNER");
    }

    #[test]
    fn nested_path_joins_with_separator() {
        let mut stack = EventStack::default();
        push(&mut stack, 0, "A");
        push(&mut stack, 1, "B");

        assert_eq!(stack.path_for("C"), "A.B.C");
        assert_eq!(stack.paths(), vec!["A".to_string(), "A.B".to_string()]);
    }

    #[test]
    fn pops_only_innermost() {
        let mut stack = EventStack::default();
        push(&mut stack, 0, "A");
        push(&mut stack, 1, "B");

        assert!(stack.pop_if_innermost(0).is_none());
        assert_eq!(stack.depth(), 2);

        let popped = stack.pop_if_innermost(1).unwrap();
        assert_eq!(&*popped.full_path, "A.B");
        assert_eq!(stack.innermost_path().as_deref(), Some("A"));

        let popped = stack.pop_if_innermost(0).unwrap();
        assert_eq!(popped.name, "A");
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_on_empty_stack_fails() {
        let mut stack = EventStack::default();

        assert!(stack.pop_if_innermost(0).is_none());
        assert!(stack.innermost_path().is_none());
    }

    #[test]
    fn path_uses_innermost_after_pop() {
        let mut stack = EventStack::default();
        push(&mut stack, 0, "A");
        push(&mut stack, 1, "B");
        _ = stack.pop_if_innermost(1);

        assert_eq!(stack.path_for("C"), "A.C");
    }
}
