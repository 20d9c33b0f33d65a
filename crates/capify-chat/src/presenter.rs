//! Reply rendering.
//!
//! Turns drafts into display text. No business logic: every field is
//! listed in a fixed order, with a placeholder for anything unassigned.

use capify_core::config::PresenterConfig;
use capify_core::{ActionToken, Draft, FieldKind, UserId};

use crate::types::{ActionButton, Reply, ReplyMarkup};

const TRACK_HEADER: &str = "So, you've decided to track a transaction.\nHere are it's info:";
const EDIT_HEADER: &str = "Edit or Confirm transaction's data:";

/// Renders drafts and fixed replies.
#[derive(Debug, Clone, Default)]
pub struct Presenter {
    placeholders: PresenterConfig,
}

impl Presenter {
    pub fn new(placeholders: PresenterConfig) -> Self {
        Self { placeholders }
    }

    /// Display value of one field, or its placeholder.
    pub fn field_value(&self, draft: &Draft, kind: FieldKind) -> String {
        draft
            .value_of(kind)
            .unwrap_or_else(|| self.placeholder(kind))
    }

    fn placeholder(&self, kind: FieldKind) -> String {
        let p = &self.placeholders;
        match kind {
            FieldKind::Date => p.date_placeholder.clone(),
            FieldKind::Amount => p.amount_placeholder.to_string(),
            FieldKind::Category => p.category_placeholder.clone(),
            FieldKind::Subcategory => p.subcategory_placeholder.clone(),
            FieldKind::Description => p.description_placeholder.clone(),
        }
    }

    /// Plain-text listing of all five fields.
    pub fn render(&self, draft: &Draft) -> String {
        let mut out = String::from(TRACK_HEADER);
        for kind in FieldKind::ALL {
            out.push('\n');
            out.push_str(&format!("{} = {}", kind, self.field_value(draft, kind)));
        }
        out
    }

    /// Editable summary with the Edit / Confirm buttons attached.
    pub fn render_editable(&self, draft: &Draft) -> Reply {
        let mut text = String::from(EDIT_HEADER);
        for kind in FieldKind::ALL {
            text.push('\n');
            text.push_str(&format!(
                "{}: {}",
                capitalize(kind.as_str()),
                self.field_value(draft, kind)
            ));
        }
        let row: Vec<ActionButton> = ActionToken::ALL.into_iter().map(Into::into).collect();
        Reply::plain(text).with_markup(ReplyMarkup::InlineKeyboard(vec![row]))
    }

    /// Acknowledgement for a freshly stored field.
    pub fn confirmation(&self, draft: &Draft, kind: FieldKind) -> String {
        format!("Transaction {}: {}", kind, self.field_value(draft, kind))
    }

    /// Greeting that mentions the user and asks for a reply.
    pub fn greeting(&self, user: &UserId, display_name: Option<&str>) -> Reply {
        Reply::html(format!("Hi {}!", mention_html(user, display_name)))
            .with_markup(ReplyMarkup::ForceReply { selective: true })
    }

    pub fn help(&self) -> Reply {
        Reply::plain("Help!")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Inline user mention as an HTML link.
pub fn mention_html(user: &UserId, display_name: Option<&str>) -> String {
    let name = display_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(user.as_str());
    format!(
        "<a href=\"tg://user?id={}\">{}</a>",
        escape_html(user.as_str()),
        escape_html(name)
    )
}

/// Escape text for HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
