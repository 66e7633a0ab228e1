use ratatui::widgets::ListState;
use std::time::Instant;
use talkquote_core::{Category, ConfigField, Error, GeminiClient, Quote, Session, TalkClient};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Config,
    Quote,
    Custom,
}

impl FocusPane {
    pub fn next(&self) -> FocusPane {
        match self {
            FocusPane::Config => FocusPane::Quote,
            FocusPane::Quote => FocusPane::Custom,
            FocusPane::Custom => FocusPane::Config,
        }
    }

    pub fn prev(&self) -> FocusPane {
        match self {
            FocusPane::Config => FocusPane::Custom,
            FocusPane::Quote => FocusPane::Config,
            FocusPane::Custom => FocusPane::Quote,
        }
    }
}

/// Which text box keystrokes go to while editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Config(ConfigField),
    CustomQuote,
    CustomAuthor,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusPane,
    pub session: Session,

    // Config form state
    pub config_state: ListState,

    // Text editing state
    pub edit_target: Option<EditTarget>,
    pub edit_cursor: usize, // cursor position in chars

    // Custom quote form and list
    pub custom_quote_input: String,
    pub custom_author_input: String,
    pub custom_state: ListState,

    // Background requests
    pub generate_task: Option<JoinHandle<talkquote_core::Result<Quote>>>,
    pub post_task: Option<JoinHandle<talkquote_core::Result<()>>>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Clients
    pub gemini: GeminiClient,
    pub talk: TalkClient,
}

impl App {
    pub fn new(gemini: GeminiClient, talk: TalkClient, category: Category) -> Self {
        let mut session = Session::new();
        session.set_category(category);

        let mut config_state = ListState::default();
        config_state.select(Some(0));

        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            focus: FocusPane::Config,
            session,

            config_state,

            edit_target: None,
            edit_cursor: 0,

            custom_quote_input: String::new(),
            custom_author_input: String::new(),
            custom_state: ListState::default(),

            generate_task: None,
            post_task: None,

            animation_frame: 0,

            gemini,
            talk,
        }
    }

    // Config form
    pub fn selected_config_field(&self) -> ConfigField {
        let fields = ConfigField::all();
        let i = self.config_state.selected().unwrap_or(0).min(fields.len() - 1);
        fields[i]
    }

    pub fn config_nav_down(&mut self) {
        let len = ConfigField::all().len();
        let i = self.config_state.selected().unwrap_or(0);
        self.config_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn config_nav_up(&mut self) {
        let i = self.config_state.selected().unwrap_or(0);
        self.config_state.select(Some(i.saturating_sub(1)));
    }

    // Custom quote list
    pub fn custom_nav_down(&mut self) {
        let len = self.session.custom_quotes().len();
        if len > 0 {
            let i = self.custom_state.selected().unwrap_or(0);
            self.custom_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn custom_nav_up(&mut self) {
        let i = self.custom_state.selected().unwrap_or(0);
        self.custom_state.select(Some(i.saturating_sub(1)));
    }

    pub fn select_custom_quote(&mut self) {
        if let Some(i) = self.custom_state.selected() {
            self.session.select_custom_quote(i);
        }
    }

    pub fn delete_selected_custom_quote(&mut self) {
        if let Some(i) = self.custom_state.selected() {
            if self.session.delete_custom_quote(i) {
                // Adjust selection
                let len = self.session.custom_quotes().len();
                if len == 0 {
                    self.custom_state.select(None);
                } else if i >= len {
                    self.custom_state.select(Some(len - 1));
                }
            }
        }
    }

    /// Add the quote typed into the custom form. Inputs are kept if it was rejected.
    pub fn submit_custom_quote(&mut self) {
        if self.session.add_custom_quote(&self.custom_quote_input, &self.custom_author_input) {
            self.custom_quote_input.clear();
            self.custom_author_input.clear();
            let last = self.session.custom_quotes().len() - 1;
            self.custom_state.select(Some(last));
        }
    }

    // Text editing
    pub fn start_editing(&mut self, target: EditTarget) {
        self.edit_target = Some(target);
        self.input_mode = InputMode::Editing;
        self.edit_cursor = self.edit_buffer().map(|s| s.chars().count()).unwrap_or(0);
    }

    pub fn stop_editing(&mut self) {
        self.edit_target = None;
        self.input_mode = InputMode::Normal;
        self.edit_cursor = 0;
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        match self.edit_target? {
            EditTarget::Config(field) => Some(self.session.config().get(field)),
            EditTarget::CustomQuote => Some(&self.custom_quote_input),
            EditTarget::CustomAuthor => Some(&self.custom_author_input),
        }
    }

    pub fn edit_buffer_mut(&mut self) -> Option<&mut String> {
        match self.edit_target? {
            EditTarget::Config(field) => Some(self.session.config_field_mut(field)),
            EditTarget::CustomQuote => Some(&mut self.custom_quote_input),
            EditTarget::CustomAuthor => Some(&mut self.custom_author_input),
        }
    }

    // Network actions
    pub fn start_generate(&mut self) {
        if self.generate_task.is_some() {
            return;
        }
        if let Some(category) = self.session.begin_generate() {
            let gemini = self.gemini.clone();
            self.generate_task = Some(tokio::spawn(async move {
                gemini.generate_quote(category).await
            }));
        }
    }

    pub fn start_post(&mut self) {
        if self.post_task.is_some() {
            return;
        }
        if let Some(request) = self.session.begin_post() {
            let talk = self.talk.clone();
            self.post_task = Some(tokio::spawn(async move {
                talk.post_message(&request.config, &request.message).await
            }));
        }
    }

    /// Hand finished background requests back to the session
    pub async fn poll_tasks(&mut self) {
        if self.generate_task.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(task) = self.generate_task.take() {
                let result = task.await.unwrap_or_else(|e| Err(Error::Task(e.to_string())));
                self.session.finish_generate(result);
            }
        }

        if self.post_task.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(task) = self.post_task.take() {
                let result = task.await.unwrap_or_else(|e| Err(Error::Task(e.to_string())));
                self.session.finish_post(result);
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.session.is_generating() || self.session.is_posting()
    }

    /// Tick: advance animation, expire the toast, collect finished requests
    pub async fn on_tick(&mut self) {
        if self.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        self.session.toast_mut().expire(Instant::now());
        self.poll_tasks().await;
    }
}
