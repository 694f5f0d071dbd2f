// Pure key mapping, kept free of browser types so host tests can include it.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    ToggleMorph,
    ToggleGestures,
    ToggleHelp,
    Fullscreen,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        " " | "Spacebar" => Some(KeyAction::ToggleMorph),
        "g" | "G" => Some(KeyAction::ToggleGestures),
        "h" | "H" => Some(KeyAction::ToggleHelp),
        "Enter" => Some(KeyAction::Fullscreen),
        _ => None,
    }
}
