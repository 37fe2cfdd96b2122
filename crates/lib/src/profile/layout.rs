//! Toolbar layout descriptors.
//!
//! A descriptor such as `"arrows,spring,refresh,extensions"` picks toolbar
//! buttons by short token. The first `spring` splits the buttons into those
//! placed before the tab strip and those placed after it. The result is the
//! browser's `browser.uiCustomization.state` document.

use serde_json::{Value, json};

/// The built-in tab strip that user buttons are placed around.
const TAB_STRIP: &[&str] = &["tabbrowser-tabs", "new-tab-button", "alltabs-button"];

const SPLITTER: &str = "spring";
const SPACER: &str = "spacer";

fn widgets_for(token: &str) -> Option<&'static [&'static str]> {
  let widgets: &'static [&'static str] = match token {
    "back" => &["back-button"],
    "forward" => &["forward-button"],
    "arrows" => &["back-button", "forward-button"],
    "refresh" => &["stop-reload-button"],
    "home" => &["home-button"],
    "extensions" => &["unified-extensions-button"],
    "spacer" => &[SPACER],
    _ => return None,
  };
  Some(widgets)
}

/// Buttons placed left and right of the tab strip.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ToolbarLayout {
  pub left: Vec<&'static str>,
  pub right: Vec<&'static str>,
}

impl ToolbarLayout {
  /// Parse a descriptor. Returns `None` when no token places a button.
  pub fn parse(descriptor: &str) -> Option<Self> {
    let mut layout = Self::default();
    let mut split = false;

    for token in descriptor.split(',').map(|t| t.trim().to_lowercase()) {
      if token == SPLITTER {
        split = true;
        continue;
      }
      let Some(widgets) = widgets_for(&token) else {
        continue;
      };
      let side = if split { &mut layout.right } else { &mut layout.left };
      for widget in widgets {
        // Spacers may repeat; a button can only be placed once.
        if *widget == SPACER || !side.contains(widget) {
          side.push(*widget);
        }
      }
    }

    if layout.left.is_empty() && layout.right.is_empty() {
      return None;
    }
    Some(layout)
  }

  /// Widgets of the tab toolbar, in order.
  pub fn tabs_toolbar(&self) -> Vec<&'static str> {
    let mut row = self.left.clone();
    row.extend_from_slice(TAB_STRIP);
    row.extend_from_slice(&self.right);
    row
  }

  /// The full customization state document.
  pub fn state(&self) -> Value {
    let mut seen: Vec<&str> = Vec::new();
    for widget in self.left.iter().chain(&self.right) {
      if *widget != SPACER && !seen.contains(widget) {
        seen.push(*widget);
      }
    }

    json!({
      "placements": {
        "widget-overflow-fixed-list": [],
        "unified-extensions-area": [],
        "nav-bar": ["urlbar-container"],
        "toolbar-menubar": ["menubar-items"],
        "TabsToolbar": self.tabs_toolbar(),
        "PersonalToolbar": ["personal-bookmarks"]
      },
      "seen": seen,
      "dirtyAreaCache": [
        "nav-bar",
        "TabsToolbar",
        "toolbar-menubar",
        "PersonalToolbar",
        "unified-extensions-area",
        "widget-overflow-fixed-list"
      ],
      "currentVersion": 20,
      "newElementCount": 0
    })
  }
}

/// Compact, quote-escaped state document ready to embed in a `user_pref` line.
pub fn encode_layout(descriptor: &str) -> Option<String> {
  let layout = ToolbarLayout::parse(descriptor)?;
  Some(layout.state().to_string().replace('"', "\\\""))
}
