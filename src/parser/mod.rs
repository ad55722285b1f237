mod types;

pub use types::*;

use once_cell::sync::Lazy;
use regex::Regex;

// Season folder: S<season>[separators]E<start>-E<end>
// Examples: "S01E001-E012", "Show s2 e13-e24", "S03_E100-E150"
static SEASON_FOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)S(?P<season>\d+)[ ._-]*E(?P<start>\d+)-E(?P<end>\d+)").unwrap()
});

// Episode number: a 3-4 digit run or E followed by 2-3 digits, whichever starts first
static EPISODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d{3,4})|E(\d{2,3})").unwrap());

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "wmv"];

/// Extension every renamed episode ends up with
pub const CANONICAL_EXTENSION: &str = "mp4";

/// Parse a folder name into its season and episode range
pub fn parse_season_folder(name: &str) -> Option<SeasonFolder> {
    let captures = SEASON_FOLDER_REGEX.captures(name)?;

    let season: u32 = captures.name("season")?.as_str().parse().ok()?;
    let start_text = captures.name("start")?.as_str();
    let end_text = captures.name("end")?.as_str();

    Some(SeasonFolder {
        season,
        start: start_text.parse().ok()?,
        end: end_text.parse().ok()?,
        start_text: start_text.to_string(),
        end_text: end_text.to_string(),
    })
}

/// Extract the episode number from a filename
pub fn extract_episode_number(file_name: &str) -> Option<EpisodeMatch> {
    let captures = EPISODE_REGEX.captures(file_name)?;

    let digits = captures.get(1).or_else(|| captures.get(2))?;
    let episode: u32 = digits.as_str().parse().ok()?;

    Some(EpisodeMatch {
        file_name: file_name.to_string(),
        episode,
    })
}

pub fn is_video_file(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    VIDEO_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// Trickplay assets are recognised by name, not by extension
pub fn is_trickplay(name: &str) -> bool {
    name.to_lowercase().contains("trickplay")
}

pub fn is_trickplay_folder(name: &str) -> bool {
    name.to_lowercase().ends_with(".trickplay")
}

pub fn is_nfo_file(name: &str) -> bool {
    name.to_lowercase().ends_with(".nfo")
}

/// Matches both plain `.jpg` images and `-thumb.jpg` thumbnails
pub fn is_jpg_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".jpg") || lower.contains("-thumb.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============ Season Folder Tests ============

    #[test]
    fn test_parse_season_folder_simple() {
        let folder = parse_season_folder("S01E001-E012").unwrap();
        assert_eq!(folder.season, 1);
        assert_eq!(folder.start, 1);
        assert_eq!(folder.end, 12);
        assert_eq!(folder.start_text, "001");
        assert_eq!(folder.end_text, "012");
    }

    #[test]
    fn test_parse_season_folder_with_prefix_and_separators() {
        let folder = parse_season_folder("One Piece s02 ._- e062-e077").unwrap();
        assert_eq!(folder.season, 2);
        assert_eq!(folder.start, 62);
        assert_eq!(folder.end, 77);
    }

    #[test]
    fn test_parse_season_folder_season_zero() {
        let folder = parse_season_folder("S0E1-E3").unwrap();
        assert_eq!(folder.season, 0);
        assert_eq!(folder.start_text, "1");
        assert_eq!(folder.end_text, "3");
    }

    #[test]
    fn test_parse_season_folder_unrecognized() {
        assert!(parse_season_folder("Season 01").is_none());
        assert!(parse_season_folder("S01E01").is_none());
        assert!(parse_season_folder("Extras").is_none());
        assert!(parse_season_folder("Season 01 (E001-E012)").is_none());
    }

    #[test]
    fn test_season_folder_contains_is_inclusive() {
        let folder = parse_season_folder("S01E010-E020").unwrap();
        assert!(folder.contains(10));
        assert!(folder.contains(20));
        assert!(!folder.contains(9));
        assert!(!folder.contains(21));
    }

    // ============ Episode Number Tests ============

    #[test]
    fn test_extract_episode_marker() {
        let m = extract_episode_number("SomeShow.E005.1080p.mkv").unwrap();
        assert_eq!(m.episode, 5);
        assert_eq!(m.file_name, "SomeShow.E005.1080p.mkv");
    }

    #[test]
    fn test_extract_bare_digits() {
        assert_eq!(extract_episode_number("Naruto 123 - Title.mkv").unwrap().episode, 123);
        assert_eq!(extract_episode_number("Show_1045.avi").unwrap().episode, 1045);
    }

    #[test]
    fn test_extract_earliest_alternative_wins() {
        // The resolution tag comes before the episode marker
        assert_eq!(extract_episode_number("Show.1080p.E05.mkv").unwrap().episode, 1080);
        // The episode marker comes first
        assert_eq!(extract_episode_number("Show.E05.1080p.mkv").unwrap().episode, 5);
    }

    #[test]
    fn test_extract_lowercase_marker() {
        assert_eq!(extract_episode_number("show.s01e07.mkv").unwrap().episode, 7);
    }

    #[test]
    fn test_extract_no_number() {
        assert!(extract_episode_number("Pilot.mkv").is_none());
        assert!(extract_episode_number("Show E1.mkv").is_none());
        assert!(extract_episode_number("Show 12.mkv").is_none());
    }

    // ============ File Classification Tests ============

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file("a.mkv"));
        assert!(is_video_file("a.MP4"));
        assert!(is_video_file("a.wmv"));
        assert!(!is_video_file("a.flv"));
        assert!(!is_video_file("a.nfo"));
        assert!(!is_video_file("mkv"));
    }

    #[test]
    fn test_is_trickplay_substring() {
        assert!(is_trickplay("episode-TrickPlay.bif"));
        assert!(is_trickplay("show.trickplay.mkv"));
        assert!(!is_trickplay("episode.mkv"));
    }

    #[test]
    fn test_sidecar_classification() {
        assert!(is_trickplay_folder("Episode 1.trickplay"));
        assert!(!is_trickplay_folder("trickplay stuff"));
        assert!(is_nfo_file("tvshow.NFO"));
        assert!(is_jpg_file("poster.jpg"));
        assert!(is_jpg_file("S01E01-thumb.JPG"));
        assert!(!is_jpg_file("poster.png"));
    }
}
