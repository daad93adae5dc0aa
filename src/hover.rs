// Hover notifications to the host.
//
// At most one listener is registered; setting a new one replaces the old.
// The view decides *when* to emit; this only delivers.

use std::fmt;

use crate::hierarchy::SourceRef;

pub type HoverListener = Box<dyn FnMut(Option<SourceRef>)>;

#[derive(Default)]
pub struct HoverBridge {
    listener: Option<HoverListener>,
}

impl fmt::Debug for HoverBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoverBridge").field("listener", &self.listener.is_some()).finish()
    }
}

impl HoverBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_listener(&mut self, listener: impl FnMut(Option<SourceRef>) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Deliver `source` to the listener. Returns false when nobody listens.
    pub fn emit(&mut self, source: Option<SourceRef>) -> bool {
        match self.listener.as_mut() {
            Some(listener) => {
                listener(source);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_without_listener() {
        let mut bridge = HoverBridge::new();
        assert!(!bridge.has_listener());
        assert!(!bridge.emit(Some(SourceRef(1))));
    }

    #[test]
    fn test_latest_listener_wins() {
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let mut bridge = HoverBridge::new();

        let sink = first.clone();
        bridge.set_listener(move |s| sink.borrow_mut().push(s));
        bridge.emit(Some(SourceRef(1)));

        let sink = second.clone();
        bridge.set_listener(move |s| sink.borrow_mut().push(s));
        bridge.emit(None);

        assert_eq!(*first.borrow(), vec![Some(SourceRef(1))]);
        assert_eq!(*second.borrow(), vec![None]);

        bridge.clear_listener();
        assert!(!bridge.emit(None));
        assert_eq!(second.borrow().len(), 1);
    }
}
