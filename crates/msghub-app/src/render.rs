//! Markup templates and history entry rendering.
//!
//! The hub serves three small HTML fragments. Each contains the literal
//! tokens `name_placeholder` and/or `message_placeholder`, which the client
//! fills in per entry. Templates are split into segments once at load time
//! so that substituted values are never scanned for placeholders again: a
//! username that happens to contain `message_placeholder` stays a username.

use msghub_proto::ChatEvent;

/// Token replaced with the username (or room name for room buttons).
pub const NAME_TOKEN: &str = "name_placeholder";

/// Token replaced with the message text.
pub const MESSAGE_TOKEN: &str = "message_placeholder";

/// A substitution point in a [`Template`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Filled with the name.
    Name,
    /// Filled with the message text.
    Message,
}

impl Slot {
    fn token(self) -> &'static str {
        match self {
            Self::Name => NAME_TOKEN,
            Self::Message => MESSAGE_TOKEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Slot),
}

/// A parsed markup template.
///
/// Only the first occurrence of each token is a slot. Later occurrences are
/// kept as literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Split `markup` at the first occurrence of each placeholder token.
    pub fn parse(markup: &str) -> Self {
        let mut marks: Vec<(usize, Slot)> = [Slot::Name, Slot::Message]
            .into_iter()
            .filter_map(|slot| markup.find(slot.token()).map(|at| (at, slot)))
            .collect();
        marks.sort_by_key(|&(at, _)| at);

        let mut segments = Vec::with_capacity(marks.len() * 2 + 1);
        let mut cursor = 0;
        for (at, slot) in marks {
            if at > cursor {
                segments.push(Segment::Literal(markup[cursor..at].to_string()));
            }
            segments.push(Segment::Slot(slot));
            cursor = at + slot.token().len();
        }
        if cursor < markup.len() {
            segments.push(Segment::Literal(markup[cursor..].to_string()));
        }

        Self { segments }
    }

    /// Whether the template substitutes `slot`.
    pub fn has_slot(&self, slot: Slot) -> bool {
        self.segments.contains(&Segment::Slot(slot))
    }

    /// Produce markup with both slots filled.
    pub fn fill(&self, name: &str, message: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(Slot::Name) => out.push_str(name),
                Segment::Slot(Slot::Message) => out.push_str(message),
            }
        }
        out
    }
}

/// The three templates a session renders with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    /// Entries attributed to the session user.
    pub own_message: Template,
    /// Entries attributed to anyone else.
    pub other_message: Template,
    /// Room list buttons.
    pub room_button: Template,
}

impl Templates {
    /// Parse all three templates from raw markup.
    pub fn parse(own_message: &str, other_message: &str, room_button: &str) -> Self {
        Self {
            own_message: Template::parse(own_message),
            other_message: Template::parse(other_message),
            room_button: Template::parse(room_button),
        }
    }

    /// Markup for one room button.
    pub fn room_button(&self, room: &str) -> String {
        self.room_button.fill(room, "")
    }
}

/// Which template an entry was rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStyle {
    /// The session user's own entry.
    Own,
    /// Someone else's entry.
    Other,
}

/// One history entry, ready for display.
///
/// The structured fields are kept next to the markup so frontends that do
/// not speak HTML can style entries themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEntry {
    /// Template the entry was rendered with.
    pub style: EntryStyle,
    /// Username the entry is attributed to.
    pub username: String,
    /// Displayed text: the message, or the capitalized error.
    pub message: String,
    /// Whether the hub rejected the request behind this entry.
    pub is_error: bool,
    /// Filled template markup.
    pub markup: String,
}

/// Render one message-class event.
///
/// The own-message template is chosen when the event's username equals
/// `session_username` exactly. No case folding or trimming happens here.
pub fn render_entry(event: &ChatEvent, templates: &Templates, session_username: &str) -> RenderedEntry {
    let style =
        if event.username == session_username { EntryStyle::Own } else { EntryStyle::Other };
    let template = match style {
        EntryStyle::Own => &templates.own_message,
        EntryStyle::Other => &templates.other_message,
    };
    let message = event.display_text().into_owned();
    let markup = template.fill(&event.username, &message);

    RenderedEntry {
        style,
        username: event.username.clone(),
        message,
        is_error: event.is_error(),
        markup,
    }
}
