//! Human-readable display of key chords

use crate::binding::Binding;

/// Resolves a raw key (e.g. `"ctrl+q"`) into the form shown to the user
pub trait KeyDisplay {
    /// Display form of a single key alternative
    fn key_display(&self, key: &str) -> String;

    /// Display form of a binding's primary key
    fn binding_display(&self, binding: &Binding) -> String {
        self.key_display(binding.primary_key())
    }
}

/// Terminal-style key display
///
/// - `ctrl+q` becomes `^q`
/// - other modifier combinations are capitalised and joined: `shift+tab` becomes `Shift+Tab`
/// - named keys get short labels or glyphs: `escape` becomes `Esc`, `up` becomes `↑`
/// - single characters are shown as they are
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultKeyDisplay;

impl KeyDisplay for DefaultKeyDisplay {
    fn key_display(&self, key: &str) -> String {
        let key = key.trim();
        let (modifiers, base) = match key.rsplit_once('+') {
            Some((modifiers, base)) if !base.is_empty() && !modifiers.is_empty() => {
                (modifiers.split('+').collect::<Vec<_>>(), base)
            }
            _ => (Vec::new(), key),
        };

        let base = named_key(base);
        match modifiers.as_slice() {
            [] => base,
            [only] if only.eq_ignore_ascii_case("ctrl") => format!("^{}", base),
            _ => {
                let mut parts: Vec<String> = modifiers.iter().map(|m| capitalise(m)).collect();
                parts.push(base);
                parts.join("+")
            }
        }
    }
}

fn named_key(key: &str) -> String {
    let lower = key.to_ascii_lowercase();
    let named = match lower.as_str() {
        "escape" | "esc" => "Esc",
        "enter" | "return" => "Enter",
        "tab" => "Tab",
        "space" => "Space",
        "backspace" => "Backspace",
        "delete" => "Del",
        "insert" => "Ins",
        "home" => "Home",
        "end" => "End",
        "pageup" => "PgUp",
        "pagedown" => "PgDn",
        "up" => "↑",
        "down" => "↓",
        "left" => "←",
        "right" => "→",
        "question_mark" => "?",
        "colon" => ":",
        "comma" => ",",
        "plus" => "+",
        _ => {
            if is_function_key(&lower) {
                return lower.to_ascii_uppercase();
            }
            if key.chars().count() == 1 {
                return key.to_string();
            }
            return capitalise(key);
        }
    };
    named.to_string()
}

fn is_function_key(key: &str) -> bool {
    key.strip_prefix('f')
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
