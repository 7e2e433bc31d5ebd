//! Fuzz target for Template::fill
//!
//! Splits the input into a template and the values substituted into it.
//! Substituted values are never re-scanned, so tokens inside them must
//! survive verbatim.

#![no_main]

use libfuzzer_sys::fuzz_target;
use msghub_app::{MESSAGE_TOKEN, NAME_TOKEN, Slot, Template};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut parts = text.splitn(3, '\0');
    let (Some(markup), Some(name), Some(message)) = (parts.next(), parts.next(), parts.next())
    else {
        return;
    };

    let template = Template::parse(markup);
    let filled = template.fill(name, message);

    if template.has_slot(Slot::Name) {
        assert!(filled.contains(name));
    }
    if template.has_slot(Slot::Message) {
        assert!(filled.contains(message));
    }
    if !markup.contains(NAME_TOKEN) && !markup.contains(MESSAGE_TOKEN) {
        assert_eq!(filled, markup);
    }
});
