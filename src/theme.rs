use crate::events::{DefakexEvent, EventBus};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Application themes. Selection lives in an explicit context object and
/// resolves to style tokens through a pure mapping; nothing mutates
/// shared document state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Teal,
    Dark,
    Blue,
    Green,
    Purple,
}

/// Style tokens a theme resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTokens {
    /// Background gradient class
    pub background: &'static str,
    /// Whether body text renders light-on-dark
    pub light_text: bool,
}

impl Theme {
    /// All selectable themes, in display order
    pub fn all() -> &'static [Theme] {
        &[
            Theme::Teal,
            Theme::Dark,
            Theme::Blue,
            Theme::Green,
            Theme::Purple,
        ]
    }

    /// Display name shown in the selector
    pub fn name(&self) -> &'static str {
        match self {
            Theme::Teal => "Default",
            Theme::Dark => "Dark",
            Theme::Blue => "Blue",
            Theme::Green => "Green",
            Theme::Purple => "Purple",
        }
    }

    /// Pure mapping from theme to style tokens
    pub fn tokens(&self) -> StyleTokens {
        match self {
            Theme::Teal => StyleTokens {
                background: "bg-teal-gradient",
                light_text: false,
            },
            Theme::Dark => StyleTokens {
                background: "bg-dark-gradient",
                light_text: true,
            },
            Theme::Blue => StyleTokens {
                background: "bg-blue-gradient",
                light_text: true,
            },
            Theme::Green => StyleTokens {
                background: "bg-green-gradient",
                light_text: true,
            },
            Theme::Purple => StyleTokens {
                background: "bg-purple-gradient",
                light_text: true,
            },
        }
    }
}

/// Application-level theme state, passed down to components instead of
/// being applied to a global document object
pub struct ThemeContext {
    events: EventBus,
    current: Mutex<Theme>,
}

impl ThemeContext {
    pub fn new(initial: Theme, events: EventBus) -> Self {
        Self {
            events,
            current: Mutex::new(initial),
        }
    }

    pub fn current(&self) -> Theme {
        *self.current.lock()
    }

    pub fn tokens(&self) -> StyleTokens {
        self.current().tokens()
    }

    /// Switch the theme and broadcast the change
    pub fn set(&self, theme: Theme) {
        {
            let mut current = self.current.lock();
            if *current == theme {
                return;
            }
            *current = theme;
        }
        self.events.publish(DefakexEvent::ThemeChanged { theme });
    }
}
