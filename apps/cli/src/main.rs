//! cstl - Constellation catalog command line
//!
//! Indexes metadata records, runs spatial queries against the index and
//! fetches records from the metadata store.
//!
//! Usage:
//!   cstl index [--records <dir>]
//!   cstl search "Title:salinity" --bbox 0,50,10,60 --sort CreationDate --desc
//!   cstl get <identifier> --mode DUBLINCORE --element-set BRIEF
//!   cstl extract record.json "ISO 19115:MD_Metadata:fileIdentifier"

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use constellation::config::IndexStorage;
use constellation::db::{create_pool, PostgresVariableSource};
use constellation::index::{FsDirectory, IndexDirectory, MemoryDirectory};
use constellation::indexer::{extract_values, GenericIndexer};
use constellation::models::{ElementSetType, MetadataMode, MetadataRecord};
use constellation::reader::{ContactDirectory, GenericMetadataReader, MetadataReader, SdnDialect};
use constellation::search::{IndexSearcher, LogicalOperator, SortField, SpatialFilter, SpatialQuery};
use constellation::services::CatalogService;
use constellation::{logging, Config};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "cstl")]
#[command(about = "Constellation metadata catalog", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild the index from the metadata store, or add records from files
    Index {
        /// Directory of JSON metadata records to add instead of a full rebuild
        #[arg(long)]
        records: Option<PathBuf>,
    },
    /// Search the index
    Search {
        /// Query text (Lucene syntax); empty matches every record
        #[arg(default_value = "")]
        text: String,
        /// Bounding box filter: min_x,min_y,max_x,max_y in EPSG:4326
        #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
        bbox: Option<SpatialFilter>,
        /// How the bounding box combines with the text: AND, OR, NOT, XOR
        #[arg(long, default_value = "AND")]
        operator: String,
        /// Field to sort on
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
        /// Print identifiers only, without reading records from the store
        #[arg(long)]
        ids_only: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Read one record from the metadata store
    Get {
        identifier: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Re-index one record from the metadata store
    Reindex { identifier: String },
    /// Remove one record from the index
    Remove { identifier: String },
    /// Evaluate path expressions against a JSON metadata record file
    Extract {
        record: PathBuf,
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// ISO_19115, DUBLINCORE or NATIVE (or codes 2, 1, 3)
    #[arg(long, default_value = "ISO_19115")]
    mode: String,
    /// BRIEF, SUMMARY or FULL
    #[arg(long, default_value = "FULL")]
    element_set: String,
    /// Explicit element names; overrides the element set
    #[arg(long = "element")]
    elements: Vec<String>,
}

impl OutputArgs {
    fn parse(&self) -> Result<(MetadataMode, ElementSetType)> {
        let mode = self.mode.parse::<MetadataMode>()?;
        let element_set = self.element_set.parse::<ElementSetType>()?;
        Ok((mode, element_set))
    }
}

fn parse_bbox(s: &str) -> std::result::Result<SpatialFilter, String> {
    let coords = s
        .split(',')
        .map(|c| c.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate: {e}"))?;
    match coords.as_slice() {
        [min_x, min_y, max_x, max_y] => Ok(SpatialFilter::bbox(*min_x, *min_y, *max_x, *max_y)),
        _ => Err("expected min_x,min_y,max_x,max_y".to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Path extraction works on files alone, without configuration
    if let Command::Extract { record, paths } = &cli.command {
        logging::init_simple_logging();
        let record = read_record(record)?;
        for path in paths {
            println!("{path}\t{}", extract_values(&record, std::slice::from_ref(path)));
        }
        return Ok(());
    }

    let config = Config::load().context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    let _logging_guard =
        logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "cstl starting");

    match cli.command {
        Command::Extract { .. } => Ok(()),
        Command::Index { records: Some(dir) } => {
            let directory = open_directory(&config)?;
            let indexer = GenericIndexer::from_config(directory, &config.index);
            let records = read_records(&dir)?;
            let count = indexer.index_documents(&records)?;
            println!("indexed {count} records");
            Ok(())
        }
        Command::Search {
            text,
            bbox,
            operator,
            sort,
            desc,
            ids_only,
            output,
        } => {
            let operator = operator.parse::<LogicalOperator>()?;
            let mut query = SpatialQuery::new(text, bbox, operator);
            if let Some(field) = sort {
                query = query.with_sort(if desc {
                    SortField::descending(field)
                } else {
                    SortField::ascending(field)
                });
            }

            if ids_only {
                let searcher = IndexSearcher::open(open_directory(&config)?, &config.search)?;
                for identifier in searcher.do_search(&query)? {
                    println!("{identifier}");
                }
                return Ok(());
            }

            let (mode, element_set) = output.parse()?;
            let service = catalog_service(&config)?;
            let outcome = service
                .search_records(&query, mode, element_set, &output.elements)
                .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Command::Get { identifier, output } => {
            let (mode, element_set) = output.parse()?;
            let reader = metadata_reader(&config)?;
            match reader
                .get_metadata(&identifier, mode, element_set, &output.elements)
                .await?
            {
                Some(record) => {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                    Ok(())
                }
                None => anyhow::bail!("No record with identifier {identifier}"),
            }
        }
        Command::Index { records: None } => {
            let count = catalog_service(&config)?.rebuild_index().await?;
            println!("indexed {count} records");
            Ok(())
        }
        Command::Reindex { identifier } => {
            if catalog_service(&config)?.reindex_record(&identifier).await? {
                println!("reindexed {identifier}");
            } else {
                println!("{identifier} not in the metadata store, removed from index");
            }
            Ok(())
        }
        Command::Remove { identifier } => {
            let indexer = GenericIndexer::from_config(open_directory(&config)?, &config.index);
            indexer.remove_document(&identifier)?;
            println!("removed {identifier}");
            Ok(())
        }
    }
}

fn open_directory(config: &Config) -> Result<Arc<dyn IndexDirectory>> {
    match config.index.storage {
        IndexStorage::Filesystem => {
            let directory = FsDirectory::open(&config.index.directory).with_context(|| {
                format!(
                    "Failed to open index directory {}",
                    config.index.directory.display()
                )
            })?;
            Ok(Arc::new(directory))
        }
        IndexStorage::Memory => {
            tracing::warn!("Index storage is in memory; nothing persists past this command");
            Ok(Arc::new(MemoryDirectory::new()))
        }
    }
}

fn metadata_reader(config: &Config) -> Result<Arc<dyn MetadataReader>> {
    let pool = create_pool(&config.database).context("Failed to create database pool")?;
    let source = PostgresVariableSource::from_config(pool, &config.reader);
    let contacts = match &config.reader.contact_directory {
        Some(dir) => ContactDirectory::load(dir),
        None => ContactDirectory::new(),
    };
    let dialect = SdnDialect::new(config.reader.profile.into(), contacts);
    Ok(Arc::new(GenericMetadataReader::new(dialect, source)))
}

fn catalog_service(config: &Config) -> Result<CatalogService> {
    let directory = open_directory(config)?;
    let searcher = Arc::new(
        IndexSearcher::open(directory.clone(), &config.search)
            .context("Failed to open index searcher")?,
    );
    let indexer = GenericIndexer::from_config(directory, &config.index);
    Ok(CatalogService::new(searcher, indexer, metadata_reader(config)?))
}

fn read_record(path: &Path) -> Result<MetadataRecord> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Invalid metadata record {}", path.display()))
}

/// Every `*.json` record of `dir`, in file name order.
fn read_records(dir: &Path) -> Result<Vec<MetadataRecord>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();
    paths.iter().map(|p| read_record(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bbox_argument_parses_four_coordinates() {
        let filter = parse_bbox("-10, 43, -1, 48").unwrap();
        assert_eq!(filter.envelope.min_x, -10.0);
        assert_eq!(filter.envelope.max_y, 48.0);
        assert!(parse_bbox("1,2,3").is_err());
        assert!(parse_bbox("a,b,c,d").is_err());
    }

    #[test]
    fn search_arguments() {
        let cli = Cli::try_parse_from([
            "cstl", "search", "Title:salinity", "--bbox", "0,50,10,60", "--sort", "Title",
            "--desc", "--ids-only",
        ])
        .unwrap();
        match cli.command {
            Command::Search {
                text,
                bbox,
                desc,
                ids_only,
                ..
            } => {
                assert_eq!(text, "Title:salinity");
                assert!(bbox.is_some());
                assert!(desc && ids_only);
            }
            other => panic!("expected search command, got {other:?}"),
        }
    }
}
