use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jellynamer")]
#[command(author, version, about, long_about = None)]
#[command(about = "Rename TV episode files and season folders for Jellyfin, Plex and Emby")]
pub struct Args {
    /// Media directory containing the season folders
    #[arg(
        value_name = "ROOT",
        required_unless_present_any = ["restore", "interactive"]
    )]
    pub root_dir: Option<PathBuf>,

    /// Show name used in the new episode filenames (e.g. OnePiece)
    #[arg(short, long, value_name = "NAME")]
    pub show: Option<String>,

    /// Directory for the change log (defaults to ROOT)
    #[arg(short, long, value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Preview changes without modifying the filesystem
    #[arg(short, long)]
    pub dry: bool,

    /// Write the change log even when previewing
    #[arg(long)]
    pub log_in_preview: bool,

    /// Delete trickplay files found in season folders
    #[arg(long)]
    pub delete_trickplay: bool,

    /// List ignored trickplay files in the output
    #[arg(long)]
    pub show_trickplay: bool,

    /// Rename season folders to "Season NN (Estart-Eend)"
    #[arg(long)]
    pub rename_folders: bool,

    /// Delete .nfo files anywhere under ROOT
    #[arg(long)]
    pub delete_nfo: bool,

    /// Delete .jpg and -thumb.jpg files anywhere under ROOT
    #[arg(long)]
    pub delete_jpg: bool,

    /// Delete .trickplay folders anywhere under ROOT
    #[arg(long)]
    pub delete_trickplay_folders: bool,

    /// Restore original names from a change log
    #[arg(short, long, value_name = "LOG_FILE", conflicts_with = "interactive")]
    pub restore: Option<PathBuf>,

    /// Ask for every setting interactively
    #[arg(short, long)]
    pub interactive: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
