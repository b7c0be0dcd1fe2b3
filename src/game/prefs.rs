use rand::Rng;
use tracing::warn;

use super::storage::SharedStorage;

const THEME_KEY: &str = "duotiles_theme";
const USERNAME_KEY: &str = "duotiles_username";
const SOUND_KEY: &str = "duotiles_sound_on";

pub const DEFAULT_NAME: &str = "Player";
pub const NAME_MAX_CHARS: usize = 20;

/// Keeps ASCII word characters, whitespace, `-` and `.`, capped at 20 characters.
pub fn clamp_name(raw: &str) -> String {
    let name: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '-' | '.'))
        .take(NAME_MAX_CHARS)
        .collect();
    if name.trim().is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        name
    }
}

/// Player preferences stored next to the best scores.
pub struct Preferences {
    storage: SharedStorage,
}

impl Preferences {
    pub fn new(storage: SharedStorage) -> Self {
        Preferences { storage }
    }

    pub fn theme(&self) -> Option<String> {
        self.storage.borrow().get(THEME_KEY)
    }

    pub fn set_theme(&self, theme: &str) {
        self.write(THEME_KEY, theme.to_string());
    }

    /// Stored name, or a freshly generated `Player<n>` that is stored for next time.
    pub fn player_name(&self) -> String {
        if let Some(name) = self.storage.borrow().get(USERNAME_KEY) {
            return clamp_name(&name);
        }
        let generated = format!("{DEFAULT_NAME}{}", rand::rng().random_range(0..10_000));
        self.write(USERNAME_KEY, generated.clone());
        generated
    }

    pub fn set_player_name(&self, raw: &str) -> String {
        let name = clamp_name(raw);
        self.write(USERNAME_KEY, name.clone());
        name
    }

    pub fn sound_on(&self) -> bool {
        self.storage.borrow().get(SOUND_KEY).as_deref() != Some("0")
    }

    pub fn set_sound_on(&self, on: bool) {
        self.write(SOUND_KEY, if on { "1" } else { "0" }.to_string());
    }

    fn write(&self, key: &str, value: String) {
        if let Err(err) = self.storage.borrow_mut().set(key, value) {
            warn!(key, %err, "could not persist preference");
        }
    }
}
