use mirage_core::{ModelChoice, PromptEntry, PromptTable, SessionId};

/// Selected model, its prompt table and cursor, and the id of the current attempt.
///
/// While an attempt is live the active model is pinned; a new choice waits in
/// `pending_model` until the attempt ends.
#[derive(Debug, Clone)]
pub struct SessionState {
    model: ModelChoice,
    pending_model: Option<ModelChoice>,
    mirage: PromptTable,
    lucy: PromptTable,
    cursor: usize,
    session_id: Option<SessionId>,
}

impl SessionState {
    pub fn new(model: ModelChoice) -> Self {
        Self::with_tables(model, PromptTable::mirage(), PromptTable::lucy())
    }

    pub fn with_tables(model: ModelChoice, mirage: PromptTable, lucy: PromptTable) -> Self {
        Self {
            model,
            pending_model: None,
            mirage,
            lucy,
            cursor: 0,
            session_id: None,
        }
    }

    /// Takes effect at the next connect: swaps the table and rewinds the cursor.
    /// Returns `false` when the switch is deferred behind a live attempt.
    pub fn set_model_choice(&mut self, use_lucy: bool) -> bool {
        self.set_model(ModelChoice::from_use_lucy(use_lucy))
    }

    pub fn set_model(&mut self, model: ModelChoice) -> bool {
        if self.session_id.is_some() {
            self.pending_model = Some(model);
            return false;
        }
        self.pending_model = None;
        self.activate(model);
        true
    }

    fn activate(&mut self, model: ModelChoice) {
        self.model = model;
        self.cursor = 0;
    }

    /// Model the current attempt talks to.
    pub fn model(&self) -> ModelChoice {
        self.model
    }

    /// Choice waiting for the current attempt to end.
    pub fn pending_model(&self) -> Option<ModelChoice> {
        self.pending_model
    }

    /// Name of the most recent choice, pending or active.
    pub fn selected_model_name(&self) -> &'static str {
        self.pending_model.unwrap_or(self.model).display_name()
    }

    pub fn active_table(&self) -> &PromptTable {
        match self.model {
            ModelChoice::Mirage => &self.mirage,
            ModelChoice::Lucy => &self.lucy,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_entry(&self) -> Option<&PromptEntry> {
        self.active_table().get(self.cursor)
    }

    /// Moves the cursor one step with wrap-around and returns the new entry.
    pub fn advance(&mut self, forward: bool) -> Option<&PromptEntry> {
        self.cursor = self.active_table().step(self.cursor, forward)?;
        self.current_entry()
    }

    pub fn begin_attempt(&mut self) -> SessionId {
        let id = SessionId::new();
        self.session_id = Some(id);
        id
    }

    pub fn end_attempt(&mut self) {
        self.session_id = None;
        if let Some(model) = self.pending_model.take() {
            self.activate(model);
        }
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(ModelChoice::default())
    }
}
