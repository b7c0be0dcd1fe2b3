#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TileStatus {
    #[default]
    Hidden,
    Flipped,
    Matched,
}

impl TileStatus {
    pub fn is_face_up(self) -> bool {
        self != TileStatus::Hidden
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tile<T> {
    pub id: String,
    pub token: T,
    pub status: TileStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RoundPhase {
    #[default]
    NotStarted,
    Running,
    Won,
}

impl RoundPhase {
    pub fn name(self) -> &'static str {
        match self {
            RoundPhase::NotStarted => "Ready",
            RoundPhase::Running => "Counting",
            RoundPhase::Won => "Finished",
        }
    }
}
