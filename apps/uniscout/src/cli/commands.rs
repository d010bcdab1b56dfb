//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::AppConfig;
use crate::upstream::DirectoryClient;
use std::path::Path;
use uniscout_core::{
    Directory, DirectoryError, DirectoryQuery, FilterSelection, RatingTenths, RawUniversity,
    TuitionBand,
};

use super::Cli;

/// Maximum size for a local snapshot file (50 MB).
const MAX_SNAPSHOT_FILE_SIZE: u64 = 50 * 1024 * 1024;

// =============================================================================
// CONFIG AND SNAPSHOT LOADING
// =============================================================================

/// Load configuration, applying CLI overrides.
pub fn load_config(cli: &Cli) -> Result<AppConfig, DirectoryError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(upstream) = &cli.upstream {
        config.upstream.base_url = upstream.clone();
    }
    Ok(config)
}

/// Build a directory from a local JSON snapshot or the upstream API.
///
/// A snapshot file may be a bare array of records or the upstream
/// `{ success, message, data }` envelope.
async fn load_directory(
    config: &AppConfig,
    file: Option<&Path>,
) -> Result<Directory, DirectoryError> {
    let batch = match file {
        Some(path) => read_snapshot_file(path)?,
        None => {
            let client = DirectoryClient::new(&config.upstream);
            client
                .fetch_universities()
                .await
                .map_err(|e| DirectoryError::Upstream(e.to_string()))?
        }
    };
    Ok(Directory::from_raw(&batch))
}

/// Read and parse a local snapshot file.
fn read_snapshot_file(path: &Path) -> Result<Vec<RawUniversity>, DirectoryError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| DirectoryError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
    if metadata.len() > MAX_SNAPSHOT_FILE_SIZE {
        return Err(DirectoryError::InvalidInput(format!(
            "Snapshot file size {} bytes exceeds maximum {} bytes",
            metadata.len(),
            MAX_SNAPSHOT_FILE_SIZE
        )));
    }

    let text = std::fs::read_to_string(path)
        .map_err(|e| DirectoryError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| DirectoryError::Serialization(format!("Invalid snapshot JSON: {}", e)))?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("data") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return Err(DirectoryError::Serialization(
                    "Snapshot object has no 'data' array".to_string(),
                ));
            }
        },
        _ => {
            return Err(DirectoryError::Serialization(
                "Snapshot must be a JSON array or envelope object".to_string(),
            ));
        }
    };
    Ok(items.into_iter().map(RawUniversity::from_value).collect())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), DirectoryError> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    println!("Uniscout Directory Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Upstream: {}", config.upstream.base_url);
    println!();
    println!("Endpoints:");
    println!("  POST /query         - Search the directory");
    println!("  GET  /facets        - Facet catalogue");
    println!("  GET  /compare       - Comparison set");
    println!("  POST /leads         - Submit an enquiry");
    println!("  POST /refresh       - Re-fetch the snapshot");
    println!("  GET  /status        - Snapshot status");
    println!("  GET  /health        - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, config).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show directory snapshot status.
pub async fn cmd_status(
    config: &AppConfig,
    file: Option<&Path>,
    json_mode: bool,
) -> Result<(), DirectoryError> {
    let directory = load_directory(config, file).await?;
    let facets = directory.facets();

    if json_mode {
        let output = serde_json::json!({
            "source": file.map_or_else(
                || config.upstream.base_url.clone(),
                |p| p.to_string_lossy().into_owned(),
            ),
            "university_count": directory.len(),
            "location_count": facets.locations.len(),
            "program_count": facets.programs.len(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        println!("Directory Status");
        println!("================");
        println!("Universities: {}", directory.len());
        println!("Locations:    {}", facets.locations.len());
        println!("Programs:     {}", facets.programs.len());
    }
    Ok(())
}

// =============================================================================
// FACETS COMMAND
// =============================================================================

/// Show the facet catalogue.
pub async fn cmd_facets(
    config: &AppConfig,
    file: Option<&Path>,
    json_mode: bool,
) -> Result<(), DirectoryError> {
    let directory = load_directory(config, file).await?;
    let facets = directory.facets();

    if json_mode {
        let output = serde_json::json!({
            "locations": facets.locations,
            "programs": facets.programs,
            "tuition_bands": facets.tuition_bands.iter().map(|b| b.label()).collect::<Vec<_>>(),
            "rating_bands": facets.rating_bands.iter().map(|b| b.label()).collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        println!("Locations:");
        for location in &facets.locations {
            println!("  {}", location);
        }
        println!("Programs:");
        for program in &facets.programs {
            println!("  {}", program);
        }
        println!("Tuition bands:");
        for band in &facets.tuition_bands {
            println!("  {}", band.label());
        }
        println!("Rating bands:");
        for band in &facets.rating_bands {
            println!("  {}", band.label());
        }
    }
    Ok(())
}

// =============================================================================
// QUERY COMMAND
// =============================================================================

/// Parsed query arguments.
#[derive(Debug, Default)]
pub struct QueryArgs {
    pub text: Option<String>,
    pub location: Option<String>,
    pub program: Option<String>,
    pub tuition: Option<String>,
    pub rating: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

/// Parse a tuition band argument like "2001-5000" or "10001+".
fn parse_band_arg(text: &str) -> Result<TuitionBand, DirectoryError> {
    let normalized: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$' && *c != ',')
        .collect();
    match normalized.as_str() {
        "0-2000" => Ok(TuitionBand::UpTo2000),
        "2001-5000" => Ok(TuitionBand::From2001To5000),
        "5001-10000" => Ok(TuitionBand::From5001To10000),
        "10001+" => Ok(TuitionBand::Above10000),
        _ => Err(DirectoryError::InvalidInput(format!(
            "Unknown tuition band '{}' (expected 0-2000, 2001-5000, 5001-10000 or 10001+)",
            text
        ))),
    }
}

/// Search, filter and paginate the directory.
pub async fn cmd_query(
    config: &AppConfig,
    file: Option<&Path>,
    json_mode: bool,
    args: QueryArgs,
) -> Result<(), DirectoryError> {
    let tuition_band = args.tuition.as_deref().map(parse_band_arg).transpose()?;
    let rating_floor = match args.rating.as_deref() {
        Some(text) => Some(RatingTenths::parse(text).ok_or_else(|| {
            DirectoryError::InvalidInput(format!("Invalid rating '{}'", text))
        })?),
        None => None,
    };

    let query = DirectoryQuery {
        free_text: args.text.unwrap_or_default(),
        filters: FilterSelection {
            location: args.location.unwrap_or_default(),
            program: args.program.unwrap_or_default(),
            tuition_band,
            rating_floor,
        },
        ..DirectoryQuery::default()
    }
    .with_page(args.page, args.page_size);

    let directory = load_directory(config, file).await?;
    let page = directory.query(&query);

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&page).unwrap_or_default()
        );
    } else {
        println!(
            "Page {}/{} ({} match{})",
            page.page,
            page.page_count,
            page.total_count,
            if page.total_count == 1 { "" } else { "es" }
        );
        println!();
        for record in &page.items {
            println!(
                "  {:<40} {:<20} {}",
                record.name, record.location, record.rating
            );
        }
        if page.items.is_empty() {
            println!("  (no results)");
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
