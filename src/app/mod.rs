//! Application state types and entry glue.
//!
//! Defines enums and structs that model the TUI state, as well as helpers
//! to construct defaults and to run the application loop (re-exported as `run`).
//!
pub mod form;
pub mod update;

use ratatui::style::Color;
use std::path::Path;

use crate::search::apply_search;
use crate::store::UserStore;
use form::{FormState, UsernamePrefix};

/// Which screen is shown in the body.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    List,
    /// Detail view of the user with this id.
    Detail(u64),
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub stripe_bg: Color,
    pub error_fg: Color,
}

impl Theme {
    /// Plain terminal colors.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            stripe_bg: Color::Black,
            error_fg: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            stripe_bg: Color::Rgb(0x18, 0x18, 0x25),    // mantle
            error_fg: Color::Rgb(0xf3, 0x8b, 0xa8),     // red
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            if let Some(color) = Self::parse_color(val) {
                match key.trim() {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "stripe_bg" => theme.stripe_bg = color,
                    "error_fg" => theme.error_fg = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 {
            return None;
        }
        match (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            (Ok(r), Ok(g), Ok(b)) => Some(Color::Rgb(r, g, b)),
            _ => None,
        }
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# usrapi-manager theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // Named colors: best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(i) => format!("index:{}", i),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("stripe_bg", self.stripe_bg);
        kv("error_fg", self.error_fg);

        std::fs::write(path, buf)
    }

    /// Load the theme at `path`, writing the default theme there first when missing.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write default theme");
        }
        t
    }
}

/// Modal dialogs drawn over the body.
#[derive(Clone, Debug)]
pub enum ModalState {
    /// Create/edit form; open exactly while the store has an editing selection.
    Form(FormState),
    DeleteConfirm { id: u64, name: String, selected: usize },
}

pub struct AppState {
    pub store: UserStore,
    /// Indices into `store.users()` that pass the current search.
    pub visible: Vec<usize>,
    /// Position within `visible`.
    pub selected: usize,
    pub rows_per_page: usize,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub search_query: String,
    pub theme: Theme,
    pub modal: Option<ModalState>,
    pub username_prefix: UsernamePrefix,
    pub base_url: String,
}

impl AppState {
    pub fn new(theme: Theme, username_prefix: UsernamePrefix, base_url: impl Into<String>) -> Self {
        Self::with_store(UserStore::new(), theme, username_prefix, base_url)
    }

    pub fn with_store(
        store: UserStore,
        theme: Theme,
        username_prefix: UsernamePrefix,
        base_url: impl Into<String>,
    ) -> Self {
        let mut app = Self {
            store,
            visible: Vec::new(),
            selected: 0,
            rows_per_page: 10,
            screen: Screen::List,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            theme,
            modal: None,
            username_prefix,
            base_url: base_url.into(),
        };
        apply_search(&mut app);
        app
    }

    /// The user under the cursor on the list screen.
    pub fn selected_user(&self) -> Option<&crate::model::User> {
        self.visible
            .get(self.selected)
            .and_then(|&i| self.store.users().get(i))
    }

    pub fn open_form_for_new(&mut self) {
        self.store.begin_create();
        self.open_form_from_store();
    }

    pub fn open_form_for_edit(&mut self, id: u64) {
        if let Some(user) = self.store.find(id).cloned() {
            self.store.begin_edit(user);
            self.open_form_from_store();
        }
    }

    fn open_form_from_store(&mut self) {
        if let Some(user) = self.store.editing() {
            self.modal = Some(ModalState::Form(FormState::open(user, self.username_prefix)));
            self.input_mode = InputMode::Modal;
        }
    }

    pub fn close_modal(&mut self) {
        if let Some(ModalState::Form(_)) = self.modal {
            self.store.cancel_editing();
        }
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    /// Bring derived view state in line with the store after completions were applied.
    pub fn sync_with_store(&mut self) {
        apply_search(self);
        if matches!(self.modal, Some(ModalState::Form(_))) && self.store.editing().is_none() {
            self.modal = None;
            self.input_mode = InputMode::Normal;
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
