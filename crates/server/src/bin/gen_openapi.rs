//! Print the OpenAPI document, or write it to the path given as the first
//! argument.

use server::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() {
    let document = match ApiDoc::openapi().to_pretty_json() {
        Ok(document) => document,
        Err(e) => {
            eprintln!("failed to serialize OpenAPI document: {e}");
            std::process::exit(1);
        }
    };

    match std::env::args().nth(1) {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, document) {
                eprintln!("failed to write {path}: {e}");
                std::process::exit(1);
            }
        }
        None => println!("{document}"),
    }
}
