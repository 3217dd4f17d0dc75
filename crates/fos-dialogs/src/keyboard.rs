//! Keyboard navigation helpers

use fos_dom::Key;

/// ArrowUp, ArrowDown, ArrowLeft or ArrowRight
pub fn is_arrow_key(key: &Key) -> bool {
    matches!(key, Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight)
}

/// Enter, Space, ArrowUp or ArrowDown
pub fn is_menu_navigation_key(key: &Key) -> bool {
    matches!(key, Key::Enter | Key::Space | Key::ArrowUp | Key::ArrowDown)
}

/// Circular selection over `items`.
///
/// ArrowDown/ArrowRight return the item after `current`, ArrowUp/ArrowLeft
/// the one before it, wrapping at both ends. Returns `None` for non-arrow
/// keys, an empty list or no current item. A `current` that is not in
/// `items` counts as sitting just before the first item.
pub fn next_item<'a, T: PartialEq>(key: &Key, items: &'a [T], current: Option<&T>) -> Option<&'a T> {
    let current = current?;
    if items.is_empty() || !is_arrow_key(key) {
        return None;
    }

    let last = items.len() - 1;
    let index = items.iter().position(|item| item == current);
    let next = match key {
        Key::ArrowUp | Key::ArrowLeft => match index {
            Some(i) if i > 0 => i - 1,
            _ => last,
        },
        _ => match index {
            Some(i) if i < last => i + 1,
            _ => 0,
        },
    };
    items.get(next)
}
