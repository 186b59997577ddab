use ratatui::widgets::ListState;
use tokio::task::JoinHandle;

use crate::calculator::{self, FarmInput, Projection, ProjectionError};
use crate::chat::{RequestToken, Transcript};
use crate::config::Config;
use crate::gemini::{Advice, AdviceError, GeminiClient};
use crate::methods::{MethodCatalog, MethodCategory};

pub const SERVER_IP: &str = "play.donutsmp.net";
pub const STORE_URL: &str = "https://store.donutsmp.net";
pub const DISCORD_URL: &str = "https://discord.gg/donutsmp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Methods,
    Calculator,
    Assistant,
}

impl Screen {
    pub fn next(self) -> Self {
        match self {
            Screen::Dashboard => Screen::Methods,
            Screen::Methods => Screen::Calculator,
            Screen::Calculator => Screen::Assistant,
            Screen::Assistant => Screen::Dashboard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcField {
    Spawners,
    Price,
    Drops,
}

impl CalcField {
    pub fn next(self) -> Self {
        match self {
            CalcField::Spawners => CalcField::Price,
            CalcField::Price => CalcField::Drops,
            CalcField::Drops => CalcField::Spawners,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            CalcField::Spawners => CalcField::Drops,
            CalcField::Price => CalcField::Spawners,
            CalcField::Drops => CalcField::Price,
        }
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,

    // Catalog state
    pub catalog: MethodCatalog,
    pub methods_state: ListState,
    pub category_filter: Option<MethodCategory>,

    // Calculator state
    pub spawners_input: String,
    pub price_input: String,
    pub drops_input: String,
    pub calc_field: CalcField,

    // Assistant state
    pub transcript: Transcript,
    pub chat_input: String,
    pub chat_cursor: usize,
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,
    pub advice_client: Option<GeminiClient>,
    pub advice_task: Option<(RequestToken, JoinHandle<Result<Advice, AdviceError>>)>,

    // Animation state
    pub animation_frame: u8,

    // Toast notification: text plus remaining ticks
    pub notification: Option<(String, u8)>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let advice_client = config
            .resolve_api_key()
            .map(|key| GeminiClient::new(&key, &config.resolve_model()));

        let mut methods_state = ListState::default();
        methods_state.select(Some(0));

        Self {
            should_quit: false,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,

            catalog: MethodCatalog::new(),
            methods_state,
            category_filter: None,

            // Defaults mirror a typical starter golem farm
            spawners_input: "10".to_string(),
            price_input: "50".to_string(),
            drops_input: "12".to_string(),
            calc_field: CalcField::Spawners,

            transcript: Transcript::new(),
            chat_input: String::new(),
            chat_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            advice_client,
            advice_task: None,

            animation_frame: 0,

            notification: None,
        }
    }

    // Catalog helpers
    pub fn visible_methods(&self) -> Vec<&crate::methods::MoneyMethod> {
        match self.category_filter {
            Some(category) => self.catalog.by_category(category),
            None => self.catalog.all().iter().collect(),
        }
    }

    pub fn methods_nav_down(&mut self) {
        let len = self.visible_methods().len();
        if len > 0 {
            let i = self.methods_state.selected().unwrap_or(0);
            self.methods_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn methods_nav_up(&mut self) {
        let i = self.methods_state.selected().unwrap_or(0);
        self.methods_state.select(Some(i.saturating_sub(1)));
    }

    pub fn methods_nav_first(&mut self) {
        self.methods_state.select(Some(0));
    }

    pub fn methods_nav_last(&mut self) {
        let len = self.visible_methods().len();
        if len > 0 {
            self.methods_state.select(Some(len - 1));
        }
    }

    /// Cycle: no filter -> each category in order -> no filter.
    pub fn cycle_category_filter(&mut self) {
        let categories = MethodCategory::all();
        self.category_filter = match self.category_filter {
            None => categories.first().copied(),
            Some(current) => {
                let idx = categories.iter().position(|c| *c == current);
                idx.and_then(|i| categories.get(i + 1)).copied()
            }
        };
        self.methods_state.select(Some(0));
    }

    // Calculator helpers
    pub fn calc_field_value_mut(&mut self) -> &mut String {
        match self.calc_field {
            CalcField::Spawners => &mut self.spawners_input,
            CalcField::Price => &mut self.price_input,
            CalcField::Drops => &mut self.drops_input,
        }
    }

    pub fn projection(&self) -> Result<Projection, ProjectionError> {
        let input = FarmInput::parse(&self.spawners_input, &self.price_input, &self.drops_input)?;
        Ok(calculator::project(input))
    }

    // Assistant helpers
    pub fn is_advice_loading(&self) -> bool {
        self.transcript.is_loading()
    }

    /// Send the current input. Empty input and in-flight requests are
    /// refused by the transcript; a missing API key surfaces as a toast
    /// without consuming the typed question.
    pub fn send_chat_message(&mut self) {
        let Some(client) = self.advice_client.clone() else {
            self.notify("No Gemini API key configured. Set GEMINI_API_KEY and restart.");
            return;
        };

        let question = self.chat_input.clone();
        let Some(token) = self.transcript.begin_send(&question) else {
            return;
        };

        self.chat_input.clear();
        self.chat_cursor = 0;
        self.scroll_chat_to_bottom();

        let question = question.trim().to_string();
        self.advice_task = Some((
            token,
            tokio::spawn(async move { client.strategy_advice(&question).await }),
        ));
    }

    /// Collect a finished advice request, if any. A panicked or cancelled
    /// task is surfaced the same way as a failed request.
    pub async fn reap_advice_task(&mut self) {
        let finished = matches!(&self.advice_task, Some((_, handle)) if handle.is_finished());
        if !finished {
            return;
        }

        if let Some((token, handle)) = self.advice_task.take() {
            let result = match handle.await {
                Ok(result) => result,
                Err(_) => Err(AdviceError::TaskFailed),
            };
            self.transcript.complete(token, result);
            self.scroll_chat_to_bottom();
        }
    }

    /// Tick animation frame and expire the toast (called by Tick event)
    pub fn tick(&mut self) {
        if self.is_advice_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        if let Some((_, ticks)) = &mut self.notification {
            *ticks = ticks.saturating_sub(1);
            if *ticks == 0 {
                self.notification = None;
            }
        }
    }

    pub fn notify(&mut self, message: &str) {
        // ~3 seconds at the 250ms tick rate
        self.notification = Some((message.to_string(), 12));
    }

    /// Scroll chat so the newest message (or the loading line) is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in self.transcript.messages() {
            total_lines += 1; // Role line ("You:" or "Bot:")
            for line in msg.text.lines() {
                // Character count, not byte length, for wrapped-width math
                let char_count = line.chars().count();
                if char_count == 0 {
                    total_lines += 1;
                } else {
                    total_lines += ((char_count / wrap_width) + 1) as u16;
                }
            }
            // One line per rendered citation
            total_lines += msg.source_urls.len() as u16;
            total_lines += 1; // Blank line after message
        }

        if self.is_advice_loading() {
            total_lines += 2; // "Bot:" + loading line
        }

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(&Config::new())
    }

    #[test]
    fn screen_cycle_covers_all_screens() {
        let mut screen = Screen::Dashboard;
        let mut seen = vec![screen];
        for _ in 0..3 {
            screen = screen.next();
            seen.push(screen);
        }
        assert_eq!(
            seen,
            vec![
                Screen::Dashboard,
                Screen::Methods,
                Screen::Calculator,
                Screen::Assistant
            ]
        );
        assert_eq!(screen.next(), Screen::Dashboard);
    }

    #[test]
    fn category_filter_cycles_back_to_unfiltered() {
        let mut app = app();
        assert!(app.category_filter.is_none());
        let total = MethodCategory::all().len();
        for _ in 0..total {
            app.cycle_category_filter();
            assert!(app.category_filter.is_some());
        }
        app.cycle_category_filter();
        assert!(app.category_filter.is_none());
    }

    #[test]
    fn default_calculator_inputs_match_the_worked_example() {
        let app = app();
        let projection = app.projection().unwrap();
        assert_eq!(projection.profit_per_minute, 6_000.0);
        assert_eq!(projection.daily(), 8_640_000.0);
    }

    #[test]
    fn send_without_api_key_keeps_input_and_transcript() {
        std::env::remove_var("GEMINI_API_KEY");
        let mut app = app();
        assert!(app.advice_client.is_none());
        app.chat_input = "what's the meta?".to_string();
        let len_before = app.transcript.len();

        app.send_chat_message();

        assert_eq!(app.transcript.len(), len_before);
        assert_eq!(app.chat_input, "what's the meta?");
        assert!(app.notification.is_some());
        assert!(app.advice_task.is_none());
    }

    #[test]
    fn methods_nav_clamps_at_the_ends() {
        let mut app = app();
        app.methods_nav_up();
        assert_eq!(app.methods_state.selected(), Some(0));

        let last = app.visible_methods().len() - 1;
        for _ in 0..100 {
            app.methods_nav_down();
        }
        assert_eq!(app.methods_state.selected(), Some(last));
    }

    #[test]
    fn notification_expires_after_its_ticks() {
        let mut app = app();
        app.notify("copied");
        for _ in 0..12 {
            assert!(app.notification.is_some());
            app.tick();
        }
        assert!(app.notification.is_none());
    }
}
