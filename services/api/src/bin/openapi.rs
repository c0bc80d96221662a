//! services/api/src/bin/openapi.rs
//!
//! Dumps the review API's contract: `/submissions` with its preflight, `/config`,
//! `/essays` and `/health`, together with the response envelopes. Usage:
//! `openapi [OUTPUT]`, where `OUTPUT` defaults to `openapi.json`.

use api_lib::web::rest::ApiDoc;
use std::path::Path;
use utoipa::OpenApi;

fn write_document(output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let document = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(output, document)?;
    println!("Review API document written to {}", output.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args().nth(1).unwrap_or_else(|| "openapi.json".to_string());
    write_document(Path::new(&output))
}
