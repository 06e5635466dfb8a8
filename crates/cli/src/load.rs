//! `stocktake headers` and `stocktake load`.

use std::path::PathBuf;

use serde::Serialize;
use stocktake_recon::headers::{detect_delimiter, detect_headers, suggest_mapping, MappingSuggestion};
use stocktake_recon::{FieldMapping, ReconError};

use crate::exit_codes::EXIT_EMPTY_INPUT;
use crate::store::Store;
use crate::util::read_input;
use crate::CliError;

#[derive(Serialize)]
struct HeadersOutput<'a> {
    delimiter: String,
    headers: &'a [String],
    suggested: &'a MappingSuggestion,
}

pub fn cmd_headers(input: PathBuf, json: bool) -> Result<(), CliError> {
    let text = read_input(&input)?;
    let headers = detect_headers(&text);
    if headers.is_empty() {
        return Err(CliError::new(EXIT_EMPTY_INPUT, "no header row found"));
    }
    let delimiter = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .map(detect_delimiter)
        .unwrap_or(',');
    let suggested = suggest_mapping(&headers);

    if json {
        let out = HeadersOutput {
            delimiter: delimiter.to_string(),
            headers: &headers,
            suggested: &suggested,
        };
        let json = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    let delimiter_name = if delimiter == '\t' { "tab" } else { "comma" };
    println!("Delimiter: {delimiter_name}");
    println!("Headers ({}): {}", headers.len(), headers.join(", "));
    println!("Suggested mapping:");
    let none = "(none)".to_string();
    println!("  unique id: {}", suggested.unique_id.as_ref().unwrap_or(&none));
    println!("  quantity:  {}", suggested.quantity.as_ref().unwrap_or(&none));
    println!("  price:     {}", suggested.price.as_ref().unwrap_or(&none));
    Ok(())
}

pub fn cmd_load(
    store: &Store,
    input: PathBuf,
    id: Option<String>,
    qty: Option<String>,
    price: Option<String>,
) -> Result<(), CliError> {
    let text = read_input(&input)?;

    // Flags win over configured defaults; anything still unset is auto-detected.
    let defaults = &store.settings.default_mapping;
    let id = id.or_else(|| defaults.unique_id.clone()).unwrap_or_default();
    let qty = qty.or_else(|| defaults.quantity.clone());
    let price = price.or_else(|| defaults.price.clone());
    let mapping = FieldMapping::new(&id, qty.as_deref(), price.as_deref());

    let mut session = store.session()?;
    let summary = session.load_text(&text, mapping).map_err(|e| {
        let hint = match &e {
            ReconError::MissingColumn { .. } | ReconError::MissingMapping => {
                Some("run `stocktake headers <FILE>` to see the detected headers, then pass --id")
            }
            ReconError::EmptyInput(_) => Some("the first line must be a header row"),
            _ => None,
        };
        let err = CliError::from(e);
        match hint {
            Some(hint) => err.with_hint(hint),
            None => err,
        }
    })?;
    store.save(&session)?;

    for skipped in &summary.skipped {
        eprintln!("skipped data line {}: {}", skipped.line, skipped.reason);
    }
    let mapping = session.mapping();
    println!(
        "Mapping: id={} qty={} price={}",
        mapping.unique_id_header,
        mapping.quantity().unwrap_or("-"),
        mapping.price().unwrap_or("-")
    );
    println!("{}", summary.message());
    Ok(())
}
