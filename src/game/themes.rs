/// Built-in emoji packs, eight tokens each.
pub const PACKS: [(&str, [&str; 8]); 15] = [
    ("Animals", ["🐶", "🐱", "🐰", "🦊", "🐻", "🐼", "🐸", "🐵"]),
    ("Nature", ["🌸", "🍁", "🌿", "🌼", "🍄", "🌞", "🌈", "🌵"]),
    ("Sports", ["⚽", "🏀", "🎾", "🏈", "🏐", "🥊", "🏓", "⛳"]),
    ("Food", ["🍔", "🍕", "🍣", "🍩", "🍪", "🍦", "🍟", "🌮"]),
    ("Faces", ["😀", "😎", "😍", "🤓", "😭", "😡", "😴", "🤩"]),
    ("Space", ["🌍", "🌕", "🪐", "🚀", "👨‍🚀", "🛰️", "🌌", "☄️"]),
    ("Jobs", ["👨‍🏫", "👩‍🍳", "👨‍⚕️", "👩‍🚒", "👷‍♂️", "👨‍🔬", "🕵️", "💼"]),
    ("Music", ["🎵", "🎶", "🎧", "🎤", "🎷", "🎸", "🥁", "🎻"]),
    ("Zodiac", ["♈", "♉", "♊", "♋", "♌", "♍", "♎", "♏"]),
    ("Vehicles", ["🚗", "🛵", "🚜", "🚂", "🚕", "🚌", "🚛", "🚓"]),
    ("Spooky", ["🎃", "👻", "🧟", "🕷️", "🧛", "🦇", "🧙", "💀"]),
    ("Love", ["❤️", "💖", "💘", "💝", "💕", "💗", "💓", "💞"]),
    ("Fruits", ["🍎", "🍉", "🍓", "🍍", "🍌", "🥭", "🍒", "🍇"]),
    ("Ocean", ["🐬", "🐳", "🦈", "🐠", "🐙", "🦀", "🪸", "🌊"]),
    ("Buildings", ["🏠", "🏢", "🏰", "🏟️", "🏛️", "🗽", "🗼", "🕌"]),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub tokens: Vec<String>,
}

/// Ordered name -> tokens table.
#[derive(Clone, Debug, Default)]
pub struct ThemeCatalog {
    themes: Vec<Theme>,
}

impl ThemeCatalog {
    pub fn builtin() -> Self {
        let mut catalog = ThemeCatalog::default();
        for (name, tokens) in PACKS {
            catalog.insert(name, tokens);
        }
        catalog
    }

    /// Adds a theme, replacing one with the same name in place.
    pub fn insert<I, S>(&mut self, name: &str, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let theme = Theme {
            name: name.to_string(),
            tokens: tokens.into_iter().map(Into::into).collect(),
        };
        match self.themes.iter_mut().find(|t| t.name == name) {
            Some(existing) => *existing = theme,
            None => self.themes.push(theme),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn first(&self) -> Option<&Theme> {
        self.themes.first()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::deck::{self, PAIR_COUNT};

    #[test]
    fn builtin_packs_all_build_full_decks() {
        let catalog = ThemeCatalog::builtin();
        assert_eq!(catalog.len(), 15);
        for name in catalog.names() {
            let theme = catalog.get(name).unwrap();
            let deck = deck::build_random(&theme.tokens, PAIR_COUNT)
                .unwrap_or_else(|err| panic!("theme {name} is invalid: {err}"));
            assert_eq!(deck.len(), 16);
        }
    }

    #[test]
    fn catalog_keeps_insertion_order() {
        let catalog = ThemeCatalog::builtin();
        assert_eq!(catalog.first().map(|t| t.name.as_str()), Some("Animals"));
        assert_eq!(catalog.names().last(), Some("Buildings"));
    }

    #[test]
    fn insert_replaces_existing_theme() {
        let mut catalog = ThemeCatalog::builtin();
        catalog.insert("Animals", ["a", "b"]);
        assert_eq!(catalog.len(), 15);
        assert_eq!(catalog.get("Animals").unwrap().tokens, vec!["a", "b"]);
        assert!(!catalog.contains("Dinosaurs"));
    }
}
