use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for vocamark
/// CLI companion for reviewing and publishing vocaloid ranking spreadsheets
#[derive(Parser)]
#[command(
    name = "vocamark",
    version = env!("CARGO_PKG_VERSION"),
    about = "Review ranking spreadsheets, keep bookmarks and push files to the ranking server",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the local store and configuration
    Init,

    /// Inspect the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long, default_value_t = 50, help = "How many rows to show")]
        limit: usize,
    },

    /// Show ranking issue numbers and their time windows
    Issue {
        #[arg(
            long,
            value_name = "YYYY-MM-DD[THH:MM]",
            help = "Evaluate at this local time instead of now"
        )]
        at: Option<String>,

        #[arg(
            long,
            value_name = "ID",
            help = "Board id, e.g. vocaloid-weekly or vocaloid-daily-new"
        )]
        board: Option<String>,

        #[arg(long, requires = "board", help = "Issue of --board (default: current)")]
        issue: Option<i64>,
    },

    /// Tell which board/issue or snapshot date a file name stands for
    Classify {
        /// File name or path, e.g. 新曲2024-07-06.xlsx
        file: String,
    },

    /// Review the rows of a ranking workbook
    Mark {
        /// Workbook to load (.xlsx)
        file: String,

        #[arg(long, help = "SV marking mode (synthesizer chart codes)")]
        sv: bool,

        #[arg(long, help = "Page to show (1-based)")]
        page: Option<usize>,

        #[arg(long = "page-size", help = "Rows per page (default from config)")]
        page_size: Option<usize>,

        #[arg(long, help = "List rows whose title/producer/vocalist/bvid match")]
        search: Option<String>,

        #[arg(long, value_name = "INDEX", help = "Show the page holding this row")]
        jump: Option<usize>,

        #[arg(long = "include-all", conflicts_with = "exclude_all")]
        include_all: bool,

        #[arg(long = "exclude-all")]
        exclude_all: bool,

        #[arg(long, value_name = "INDEX", value_delimiter = ',', help = "Mark rows as included")]
        include: Vec<usize>,

        #[arg(long, value_name = "INDEX", value_delimiter = ',', help = "Mark rows as excluded")]
        exclude: Vec<usize>,

        #[arg(
            long = "set",
            value_name = "INDEX:FIELD=VALUE",
            help = "Overwrite one cell before showing or exporting"
        )]
        set: Vec<String>,

        #[arg(long, value_name = "INDEX", help = "Toggle a bookmark on this row")]
        bookmark: Option<usize>,

        #[arg(long = "bookmarked", help = "Show only bookmarked rows")]
        bookmarked: bool,

        #[arg(
            long,
            value_name = "FILE",
            num_args = 0..=1,
            default_missing_value = "",
            help = "Write the marked rows to FILE (default: export_file_name from config)"
        )]
        export: Option<String>,

        #[arg(long = "keep-excluded", requires = "export")]
        keep_excluded: bool,

        #[arg(long, value_enum, help = "Output format (default: from extension, else xlsx)")]
        format: Option<ExportFormat>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Manage bookmarks kept in the local store
    Bookmark {
        #[arg(long)]
        list: bool,

        #[arg(long, value_name = "INDEX", requires = "title")]
        add: Option<usize>,

        #[arg(long, value_name = "INDEX")]
        remove: Option<usize>,

        #[arg(long, value_name = "INDEX", requires = "title")]
        toggle: Option<usize>,

        #[arg(long, value_name = "INDEX", requires = "note", help = "Replace the note of a bookmark")]
        annotate: Option<usize>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        note: Option<String>,

        #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "")]
        export: Option<String>,

        #[arg(long, value_name = "FILE")]
        import: Option<String>,

        #[arg(long)]
        clear: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Manage the API credential
    Token {
        #[arg(long, value_name = "TOKEN")]
        set: Option<String>,

        #[arg(long)]
        clear: bool,

        #[arg(long)]
        show: bool,
    },

    /// Upload a ranking or data workbook and run the server job for it.
    /// Ctrl-C while the ranking job streams aborts the wait.
    Upload {
        /// Workbook to upload (.xlsx)
        file: String,

        #[arg(long = "check-only", help = "Stop after the server-side check")]
        check_only: bool,

        #[arg(long, help = "Use the legacy processing pipeline")]
        old: bool,
    },

    /// Query or edit catalogue entries on the server
    Remote {
        #[command(subcommand)]
        action: RemoteAction,
    },
}

#[derive(Subcommand)]
pub enum RemoteAction {
    /// Full-text search (type: song, video, producer, vocalist, ...)
    Search {
        kind: String,
        keyword: String,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long = "page-size", default_value_t = 20)]
        page_size: usize,
    },

    /// Show one song
    Song { id: i64 },

    /// Show one video
    Video { bvid: String },

    /// Show one artist (type: producer, vocalist, synthesizer, uploader)
    Artist { kind: String, id: i64 },

    /// Rename an artist; without --yes only the server's preview is shown
    RenameArtist {
        kind: String,
        id: i64,
        name: String,

        #[arg(long)]
        yes: bool,
    },

    /// Change fields of a song
    EditSong {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "type", value_name = "TYPE", help = "原创, 翻唱, 本家重置 or 串烧")]
        song_type: Option<String>,

        #[arg(long = "vocadb-id")]
        vocadb_id: Option<i64>,

        #[arg(long = "display-name")]
        display_name: Option<String>,
    },

    /// Change fields of a video
    EditVideo {
        bvid: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, help = "1, 2, 3, 100 or 101")]
        copyright: Option<i64>,
    },
}
