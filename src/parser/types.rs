/// A directory name that encodes a season number and an inclusive episode range,
/// e.g. `Show S01E001-E012`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonFolder {
    pub season: u32,
    pub start: u32,
    pub end: u32,
    /// Start episode digits exactly as they appeared in the folder name
    pub start_text: String,
    /// End episode digits exactly as they appeared in the folder name
    pub end_text: String,
}

impl SeasonFolder {
    pub fn contains(&self, episode: u32) -> bool {
        self.start <= episode && episode <= self.end
    }
}

/// An episode number found inside a filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeMatch {
    pub file_name: String,
    pub episode: u32,
}
