#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Flip,
    Match,
    Win,
}

impl SoundCue {
    pub const ALL: [SoundCue; 3] = [SoundCue::Flip, SoundCue::Match, SoundCue::Win];

    pub fn file_stem(self) -> &'static str {
        match self {
            SoundCue::Flip => "flip",
            SoundCue::Match => "match",
            SoundCue::Win => "win",
        }
    }
}

/// Sound effect playback owned by the session; the session decides when it is muted.
pub trait SoundBoard {
    fn play(&self, cue: SoundCue);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl SoundBoard for Silent {
    fn play(&self, _cue: SoundCue) {}
}
