use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UndoEvent {
    DefCreated(String),
    UseAdded { parent: String, name: String },
    PlanesCleared(String),
}

/// Journal of database edits. Recording can be suspended with [`pause`];
/// the returned guard re-enables it when dropped, on every exit path.
///
/// [`pause`]: UndoLog::pause
#[derive(Debug, Default)]
pub struct UndoLog {
    events: Vec<UndoEvent>,
    paused: Rc<Cell<u32>>,
}

#[must_use = "recording resumes as soon as the guard is dropped"]
pub struct UndoPause {
    paused: Rc<Cell<u32>>,
}

impl Drop for UndoPause {
    fn drop(&mut self) {
        self.paused.set(self.paused.get() - 1);
    }
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.paused.get() == 0
    }

    pub fn pause(&self) -> UndoPause {
        self.paused.set(self.paused.get() + 1);
        UndoPause {
            paused: Rc::clone(&self.paused),
        }
    }

    pub fn record(&mut self, event: UndoEvent) {
        if self.is_enabled() {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[UndoEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
