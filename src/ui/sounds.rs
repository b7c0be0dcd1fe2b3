use std::collections::HashMap;
use std::path::Path;

use gtk4 as gtk;
use gtk4::prelude::*;
use tracing::debug;

use crate::game::sound::{SoundBoard, SoundCue};

/// Plays `<dir>/sounds/<cue>.ogg` for each cue that has a file.
pub struct MediaSounds {
    files: HashMap<SoundCue, gtk::MediaFile>,
}

impl MediaSounds {
    pub fn in_dir(dir: &Path) -> Self {
        let sounds_dir = dir.join("sounds");
        let mut files = HashMap::new();
        for cue in SoundCue::ALL {
            let path = sounds_dir.join(format!("{}.ogg", cue.file_stem()));
            if path.is_file() {
                files.insert(cue, gtk::MediaFile::for_filename(&path));
            } else {
                debug!(path = %path.display(), "no sound file");
            }
        }
        MediaSounds { files }
    }
}

impl SoundBoard for MediaSounds {
    fn play(&self, cue: SoundCue) {
        if let Some(media) = self.files.get(&cue) {
            media.seek(0);
            media.play();
        }
    }
}
