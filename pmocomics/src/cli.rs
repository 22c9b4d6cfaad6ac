use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pmocomics")]
#[command(version)]
#[command(about = "Serve comic archive pages as resized JPEGs from a disk cache", long_about = None)]
#[command(after_help = "Examples:\n  \
  pmocomics add ~/comics/vol1.zip                 register an archive and build its thumbnail\n  \
  pmocomics page <ID> 3 --max-width 1200          cache page 3 at 1200px wide\n  \
  pmocomics prefetch <ID> 4 10 --max-width 1200   warm pages 4..14")]
pub struct Cli {
    /// Configuration directory (default: $PMOCOMICS_CONFIG, ./.pmocomics or ~/.pmocomics)
    #[arg(short = 'c', long, value_name = "DIR", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Bounding box requested by the reader
#[derive(Args, Debug, Clone, Copy)]
pub struct Bounds {
    /// Maximum page height in pixels (0 = unconstrained)
    #[arg(long, default_value_t = 0)]
    pub max_height: u32,

    /// Maximum page width in pixels (0 = unconstrained)
    #[arg(long, default_value_t = 0)]
    pub max_width: u32,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register (or refresh) archives in the catalog and generate their thumbnails
    Add {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// List registered archives
    List,

    /// Resolve a page, generating it if missing
    Page {
        id: String,
        index: usize,
        #[command(flatten)]
        bounds: Bounds,
    },

    /// Check whether a page is cached without generating it
    Exists {
        id: String,
        index: usize,
        #[command(flatten)]
        bounds: Bounds,
    },

    /// Generate missing pages in [START, START + LIMIT)
    Prefetch {
        id: String,
        start: usize,
        limit: usize,
        #[command(flatten)]
        bounds: Bounds,
    },

    /// Regenerate the thumbnail of an archive
    Thumbnail { id: String },
}
