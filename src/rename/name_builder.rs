use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::{SeasonFolder, CANONICAL_EXTENSION};

// Season and episode markers are matched case-sensitively so lowercase words survive
static SEASON_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"S\d{1,3}").unwrap());
static EPISODE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"E\d{1,4}").unwrap());

static CONTAINER_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(mp4|mkv|avi|mov|wmv|flv|mpg)+").unwrap());

static DOTS_AND_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[._]+").unwrap());

static QUALITY_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(720p|1080p|2160p|x264|x265|hdr|webrip|bluray|hd|sd|4k|hdtv|dvdrip)\b")
        .unwrap()
});

static FILLER_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(sample|copy|part\d+|episode|ep|mp4)\b").unwrap());

static REPEATED_HYPHENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").unwrap());
static REPEATED_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

const EDGE_CHARS: &[char] = &[' ', '-', '_', '.'];

/// Derive a display title from a raw episode filename.
///
/// Strips the show name, `S`/`E` markers, container extensions, quality tags and
/// filler words, then normalises separators. Always returns a string, possibly empty.
/// Cleaning an already cleaned title returns it unchanged.
pub fn clean_title(file_name: &str, show_name: &str) -> String {
    let show_regex = if show_name.is_empty() {
        None
    } else {
        Regex::new(&format!("(?i){}", regex::escape(show_name))).ok()
    };

    // Removals can join fragments into a new match, so repeat until stable.
    // Every pass either shrinks the name or only turns separators into spaces.
    let mut name = clean_pass(file_name, show_regex.as_ref());
    loop {
        let next = clean_pass(&name, show_regex.as_ref());
        if next == name {
            return name;
        }
        name = next;
    }
}

fn clean_pass(input: &str, show_regex: Option<&Regex>) -> String {
    let mut name = input.to_string();

    if let Some(show_regex) = show_regex {
        name = show_regex.replace_all(&name, "").into_owned();
    }

    name = SEASON_MARKER.replace_all(&name, "").into_owned();
    name = EPISODE_MARKER.replace_all(&name, "").into_owned();
    name = CONTAINER_EXTENSION.replace_all(&name, "").into_owned();
    name = DOTS_AND_UNDERSCORES.replace_all(&name, " ").into_owned();
    name = QUALITY_TAGS.replace_all(&name, "").into_owned();
    name = FILLER_WORDS.replace_all(&name, "").into_owned();
    name = REPEATED_HYPHENS.replace_all(&name, "-").into_owned();
    name = REPEATED_SPACES.replace_all(&name, " ").into_owned();

    name.trim_matches(EDGE_CHARS).to_string()
}

/// Build the canonical episode filename: `<Show>-S<season:02>E<episode:03>-<title>.mp4`
pub fn build_episode_name(show_name: &str, season: u32, episode: u32, title: &str) -> String {
    format!(
        "{}-S{:02}E{:03}-{}.{}",
        show_name, season, episode, title, CANONICAL_EXTENSION
    )
}

/// Build the canonical season folder name, keeping the episode range digits as captured
pub fn build_season_folder_name(folder: &SeasonFolder) -> String {
    format!(
        "Season {:02} (E{}-E{})",
        folder.season, folder.start_text, folder.end_text
    )
}
