// ── Dialog / selection state ──
//
// One instance per resource screen, injected into the view rather than
// living in a global singleton. At most one dialog is open at a time.
//
// Destructive dialogs retain the selected row after the dialog closes so
// the in-flight request keeps a stable target id; `settle()` releases it
// once the mutation completes. Non-destructive dialogs clear the row on
// close.

/// Classification hook for dialog kinds. Destructive kinds (delete,
/// password reset) keep the selected row addressable until settled.
pub trait DialogKind: Copy + Eq {
    fn is_destructive(&self) -> bool;
}

/// Which dialog, if any, is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState<K> {
    #[default]
    Closed,
    Open {
        kind: K,
    },
}

/// Per-screen dialog and row-selection state.
#[derive(Debug)]
pub struct SelectionState<R, K: DialogKind> {
    dialog: DialogState<K>,
    current: Option<R>,
    /// Set while a destructive dialog's mutation is unsettled; keeps
    /// `current` alive past `close()`.
    retained: bool,
}

impl<R, K: DialogKind> SelectionState<R, K> {
    pub fn new() -> Self {
        Self {
            dialog: DialogState::Closed,
            current: None,
            retained: false,
        }
    }

    /// Open a dialog for a row. Replaces any previously open dialog.
    pub fn open(&mut self, kind: K, row: R) {
        self.dialog = DialogState::Open { kind };
        self.current = Some(row);
        self.retained = kind.is_destructive();
    }

    /// The open dialog kind, if any.
    pub fn open_kind(&self) -> Option<K> {
        match self.dialog {
            DialogState::Open { kind } => Some(kind),
            DialogState::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.dialog, DialogState::Open { .. })
    }

    /// The selected row, while one is held.
    pub fn current(&self) -> Option<&R> {
        self.current.as_ref()
    }

    /// Close the dialog. Non-destructive dialogs release the row
    /// immediately; destructive dialogs keep it until [`settle`](Self::settle).
    pub fn close(&mut self) {
        self.dialog = DialogState::Closed;
        if !self.retained {
            self.current = None;
        }
    }

    /// Mark the destructive mutation as settled, releasing the row.
    pub fn settle(&mut self) {
        self.retained = false;
        if !self.is_open() {
            self.current = None;
        }
    }

    /// Dismiss everything unconditionally (e.g. on screen unmount).
    pub fn reset(&mut self) {
        self.dialog = DialogState::Closed;
        self.current = None;
        self.retained = false;
    }
}

impl<R, K: DialogKind> Default for SelectionState<R, K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Edit,
        Delete,
    }

    impl DialogKind for Kind {
        fn is_destructive(&self) -> bool {
            matches!(self, Self::Delete)
        }
    }

    #[test]
    fn closing_non_destructive_dialog_clears_row_immediately() {
        let mut sel: SelectionState<&str, Kind> = SelectionState::new();
        sel.open(Kind::Edit, "row_1");
        assert_eq!(sel.open_kind(), Some(Kind::Edit));
        assert_eq!(sel.current(), Some(&"row_1"));

        sel.close();
        assert!(!sel.is_open());
        assert!(sel.current().is_none());
    }

    #[test]
    fn closing_destructive_dialog_retains_row_until_settled() {
        let mut sel: SelectionState<&str, Kind> = SelectionState::new();
        sel.open(Kind::Delete, "row_1");

        // Dialog visually closes while the delete request is in flight.
        sel.close();
        assert!(!sel.is_open());
        assert_eq!(sel.current(), Some(&"row_1"));

        // Mutation settles: the row is finally released.
        sel.settle();
        assert!(sel.current().is_none());
    }

    #[test]
    fn settle_while_dialog_open_keeps_row() {
        let mut sel: SelectionState<&str, Kind> = SelectionState::new();
        sel.open(Kind::Delete, "row_1");

        // Settled before the dialog closed (fast server): keep the row
        // for the still-open dialog, release on close.
        sel.settle();
        assert_eq!(sel.current(), Some(&"row_1"));

        sel.close();
        assert!(sel.current().is_none());
    }

    #[test]
    fn only_one_dialog_open_at_a_time() {
        let mut sel: SelectionState<&str, Kind> = SelectionState::new();
        sel.open(Kind::Edit, "row_1");
        sel.open(Kind::Delete, "row_2");

        assert_eq!(sel.open_kind(), Some(Kind::Delete));
        assert_eq!(sel.current(), Some(&"row_2"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut sel: SelectionState<&str, Kind> = SelectionState::new();
        sel.open(Kind::Delete, "row_1");
        sel.reset();
        assert!(!sel.is_open());
        assert!(sel.current().is_none());
    }
}
