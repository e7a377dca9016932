//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document for the language practice API. The output path
//! is the first argument, or `openapi.json` when none is given.

use api_lib::web::docs::ApiDoc;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let doc = ApiDoc::openapi();
    std::fs::write(&path, doc.to_pretty_json()?)?;
    println!(
        "Wrote {} paths to {}",
        doc.paths.paths.len(),
        path
    );
    Ok(())
}
