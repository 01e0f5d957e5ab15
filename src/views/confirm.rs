/// Yes/no gate placed in front of destructive actions.
///
/// The dialog knows nothing about what `A` does: confirming hands the action
/// back to the caller, unless the caller reports that it is still busy with a
/// previous request.
#[derive(Debug, Clone)]
pub struct ConfirmDialog<A> {
    pub title: String,
    pub description: String,
    action: A,
    confirm_selected: bool,
}

impl<A: Clone> ConfirmDialog<A> {
    /// Opens with "Cancel" highlighted so a stray Enter does not destroy anything.
    pub fn new(title: impl Into<String>, description: impl Into<String>, action: A) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            action,
            confirm_selected: false,
        }
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn confirm_selected(&self) -> bool {
        self.confirm_selected
    }

    pub fn toggle_selection(&mut self) {
        self.confirm_selected = !self.confirm_selected;
    }

    pub fn select_confirm(&mut self, confirm: bool) {
        self.confirm_selected = confirm;
    }

    /// Returns the action to run, or `None` while the caller is busy.
    pub fn confirm(&self, busy: bool) -> Option<A> {
        if busy { None } else { Some(self.action.clone()) }
    }

    pub fn confirm_label(busy: bool) -> &'static str {
        if busy { "Eliminando..." } else { "Confirmar" }
    }
}
