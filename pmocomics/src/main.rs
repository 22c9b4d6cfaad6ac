//! PMOComics command-line front-end
//!
//! Wires the configuration, the SQLite catalog and the page cache together
//! and prints the resulting cache paths.

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use pmocatalog::CatalogConfigExt;
use pmoconfig::Config;
use pmopages::{register_page_cache, PageCacheConfigExt};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_config(cli.config.as_deref().unwrap_or(""))?;
    logging::init_logging(&config);

    let catalog = config.open_catalog()?;
    let cache = config.create_page_cache(catalog.clone())?;
    register_page_cache(cache.clone());

    match cli.command {
        Command::Add { files } => {
            for file in files {
                let path = std::path::absolute(&file)?;
                let book = catalog.register_archive(&path)?;
                match cache.generate_thumbnail(&book.hash).await? {
                    Some(thumb) => println!("{}\t{}\t{}", book.hash, book.page, thumb.display()),
                    None => println!("{}\t{}\t-", book.hash, book.page),
                }
            }
        }
        Command::List => {
            for book in catalog.list_all()? {
                println!("{}\t{}\t{}", book.hash, book.page, book.file_path);
            }
        }
        Command::Page { id, index, bounds } => {
            let path = cache
                .resolve_page(&id, index, bounds.max_height, bounds.max_width)
                .await?;
            println!("{}", path.display());
        }
        Command::Exists { id, index, bounds } => {
            let (exists, path) = cache
                .page_exists(&id, index, bounds.max_height, bounds.max_width)
                .await?;
            println!("{}\t{}", exists, path.display());
        }
        Command::Prefetch {
            id,
            start,
            limit,
            bounds,
        } => {
            let report = cache
                .prefetch_range(&id, start, limit, bounds.max_height, bounds.max_width)
                .await?;
            println!("{}", report.generated_count());
            for failure in &report.failures {
                eprintln!("page {}: {}", failure.index, failure.error);
            }
        }
        Command::Thumbnail { id } => match cache.generate_thumbnail(&id).await? {
            Some(path) => println!("{}", path.display()),
            None => eprintln!("no page entry in archive {}", id),
        },
    }

    Ok(())
}
