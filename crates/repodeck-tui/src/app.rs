// TUI application state and key handling
//
// App never touches the network. Key presses turn into Commands that the
// runner executes, and finished gateway calls come back as GatewayEvents.
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use repodeck_core::{
    views::{DetailRequests, DetailView, FavoritesView, RequestToken, SearchRequest, SearchView},
    Contributor, FavoritesStore, RepositoryRecord, Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Search,
    Favorites,
}

impl Tab {
    pub fn title(self) -> &'static str {
        match self {
            Tab::Search => "Search",
            Tab::Favorites => "Favorites",
        }
    }

    fn other(self) -> Self {
        match self {
            Tab::Search => Tab::Favorites,
            Tab::Favorites => Tab::Search,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,    // Navigating lists or a details screen
    Searching, // Typing in the search box
    Filtering, // Typing a favorites filter
}

/// Side effects requested by a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(SearchRequest),
    LoadDetail { tab: Tab, requests: DetailRequests },
    OpenUrl(String),
    CopyToClipboard(String),
}

/// A finished gateway call, addressed by its request token
#[derive(Debug)]
pub enum GatewayEvent {
    Search {
        token: RequestToken,
        result: Result<Vec<RepositoryRecord>>,
    },
    Readme {
        tab: Tab,
        token: RequestToken,
        result: Result<String>,
    },
    Contributors {
        tab: Tab,
        token: RequestToken,
        result: Result<Vec<Contributor>>,
    },
}

pub struct App {
    pub should_quit: bool,
    pub tab: Tab,
    pub input_mode: InputMode,
    pub search_input: String,
    pub search: SearchView,
    pub favorites: FavoritesView,
    pub status_message: Option<String>,
    pub readme_scroll: u16,
    pub show_help: bool,
    // Each tab keeps its own details screen so switching tabs doesn't
    // lose where the user was
    search_detail: Option<DetailView>,
    favorites_detail: Option<DetailView>,
    store: FavoritesStore,
    contributors_limit: usize,
}

impl App {
    pub fn new(store: FavoritesStore, contributors_limit: usize) -> Self {
        Self {
            should_quit: false,
            tab: Tab::Search,
            input_mode: InputMode::Searching,
            search_input: String::new(),
            search: SearchView::new(store.clone()),
            favorites: FavoritesView::new(store.clone()),
            status_message: None,
            readme_scroll: 0,
            show_help: false,
            search_detail: None,
            favorites_detail: None,
            store,
            contributors_limit,
        }
    }

    pub fn store(&self) -> &FavoritesStore {
        &self.store
    }

    /// Details screen open on the current tab, if any
    pub fn detail(&self) -> Option<&DetailView> {
        self.detail_for(self.tab)
    }

    fn detail_for(&self, tab: Tab) -> Option<&DetailView> {
        match tab {
            Tab::Search => self.search_detail.as_ref(),
            Tab::Favorites => self.favorites_detail.as_ref(),
        }
    }

    fn detail_slot(&mut self, tab: Tab) -> &mut Option<DetailView> {
        match tab {
            Tab::Search => &mut self.search_detail,
            Tab::Favorites => &mut self.favorites_detail,
        }
    }

    /// Called once per frame before drawing
    pub fn tick(&mut self) {
        self.favorites.sync();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Vec::new();
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return Vec::new();
        }

        match self.input_mode {
            InputMode::Searching => self.handle_search_input(key),
            InputMode::Filtering => {
                self.handle_filter_input(key);
                Vec::new()
            }
            InputMode::Normal => {
                if self.detail().is_some() {
                    self.handle_detail_key(key)
                } else {
                    match self.tab {
                        Tab::Search => self.handle_results_key(key),
                        Tab::Favorites => self.handle_favorites_key(key),
                    }
                }
            }
        }
    }

    /// Mouse wheel scrolls whatever the current screen shows
    pub fn handle_scroll(&mut self, down: bool) {
        if self.input_mode != InputMode::Normal {
            return;
        }
        match (self.detail().is_some(), self.tab, down) {
            (true, _, true) => self.scroll_readme_down(),
            (true, _, false) => self.scroll_readme_up(),
            (false, Tab::Search, true) => self.search.select_next(),
            (false, Tab::Search, false) => self.search.select_previous(),
            (false, Tab::Favorites, true) => self.favorites.select_next(),
            (false, Tab::Favorites, false) => self.favorites.select_previous(),
        }
    }

    fn handle_search_input(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.status_message = None;
                self.search_detail = None;
                self.search
                    .begin_search(&self.search_input)
                    .map(Command::Search)
                    .into_iter()
                    .collect()
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                Vec::new()
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                Vec::new()
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_filter_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.input_mode = InputMode::Normal,
            KeyCode::Esc => {
                self.favorites.clear_filter();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Char(c) => self.favorites.push_filter_char(c),
            KeyCode::Backspace => self.favorites.pop_filter_char(),
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => self.switch_tab(),
            KeyCode::Char('/') | KeyCode::Char('i') => {
                self.input_mode = InputMode::Searching;
            }
            KeyCode::Char('j') | KeyCode::Down => self.search.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.search.select_previous(),
            KeyCode::Char('r') => {
                return self.search.refresh().map(Command::Search).into_iter().collect();
            }
            KeyCode::Char('f') => {
                if let Some(now_favorite) = self.search.toggle_selected_favorite() {
                    self.status_message = Some(favorite_message(now_favorite));
                }
            }
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                if let Some(record) = self.search.selected().cloned() {
                    return self.open_detail(Tab::Search, record);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_favorites_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => self.switch_tab(),
            KeyCode::Char('/') => self.input_mode = InputMode::Filtering,
            KeyCode::Esc => self.favorites.clear_filter(),
            KeyCode::Char('j') | KeyCode::Down => self.favorites.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.favorites.select_previous(),
            KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete => {
                if self.favorites.remove_selected().is_some() {
                    self.status_message = Some(favorite_message(false));
                }
            }
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                if let Some(record) = self.favorites.selected() {
                    return self.open_detail(Tab::Favorites, record);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let tab = self.tab;
        let Some(detail) = self.detail_slot(tab).as_mut() else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => {
                self.close_detail();
            }
            KeyCode::Char('f') => {
                let now_favorite = detail.toggle_favorite();
                self.status_message = Some(favorite_message(now_favorite));
            }
            KeyCode::Char('o') => {
                return vec![Command::OpenUrl(detail.record().html_url.clone())];
            }
            KeyCode::Char('s') => {
                return vec![Command::CopyToClipboard(detail.record().share_message())];
            }
            KeyCode::Char('e') => detail.toggle_description(),
            KeyCode::Char('r') => {
                let requests = detail.begin_load();
                self.readme_scroll = 0;
                return requests
                    .map(|requests| Command::LoadDetail { tab, requests })
                    .into_iter()
                    .collect();
            }
            KeyCode::Char('j') | KeyCode::Down => self.scroll_readme_down(),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_readme_up(),
            KeyCode::Char('g') | KeyCode::Home => self.readme_scroll = 0,
            KeyCode::Tab => self.switch_tab(),
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
        Vec::new()
    }

    fn open_detail(&mut self, tab: Tab, record: RepositoryRecord) -> Vec<Command> {
        let mut detail = DetailView::new(record, self.store.clone(), self.contributors_limit);
        let requests = detail.begin_load();
        *self.detail_slot(tab) = Some(detail);
        self.readme_scroll = 0;
        self.status_message = None;

        requests
            .map(|requests| Command::LoadDetail { tab, requests })
            .into_iter()
            .collect()
    }

    fn close_detail(&mut self) {
        let tab = self.tab;
        *self.detail_slot(tab) = None;
        self.readme_scroll = 0;
    }

    fn switch_tab(&mut self) {
        self.tab = self.tab.other();
        self.readme_scroll = 0;
        self.status_message = None;
    }

    fn scroll_readme_down(&mut self) {
        let last_line = self
            .detail()
            .and_then(|detail| detail.readme().ready())
            .map_or(0, |readme| readme.lines.len().saturating_sub(1));
        let last_line = u16::try_from(last_line).unwrap_or(u16::MAX);
        self.readme_scroll = self.readme_scroll.saturating_add(1).min(last_line);
    }

    fn scroll_readme_up(&mut self) {
        self.readme_scroll = self.readme_scroll.saturating_sub(1);
    }

    /// Apply a finished gateway call. Responses for screens that have been
    /// closed or reloaded since are dropped by the token check.
    pub fn apply(&mut self, event: GatewayEvent) {
        match event {
            GatewayEvent::Search { token, result } => {
                self.search.complete_search(token, result);
            }
            GatewayEvent::Readme { tab, token, result } => {
                if let Some(detail) = self.detail_slot(tab).as_mut() {
                    detail.complete_readme(token, result);
                }
            }
            GatewayEvent::Contributors { tab, token, result } => {
                if let Some(detail) = self.detail_slot(tab).as_mut() {
                    detail.complete_contributors(token, result);
                }
            }
        }
    }
}

fn favorite_message(now_favorite: bool) -> String {
    if now_favorite {
        "Added to favorites".to_string()
    } else {
        "Removed from favorites".to_string()
    }
}
