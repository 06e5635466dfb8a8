//! Header detection and mapping suggestion for pasted stock lists.

use serde::Serialize;

use crate::model::FieldMapping;

/// Keyword lists, most specific first. Matched as substrings of lower-cased headers.
const UNIQUE_ID_KEYWORDS: &[&str] = &[
    "asset id", "stock code", "sku", "id", "barcode", "code", "product id", "model",
];
const QUANTITY_KEYWORDS: &[&str] = &[
    "expected quantity", "expected qty", "qty", "quantity", "count", "stock",
];
const PRICE_KEYWORDS: &[&str] = &["unit price", "price", "cost", "value", "rate", "retail"];

/// Lines with any non-whitespace content, in order.
pub(crate) fn non_blank_lines(raw_text: &str) -> Vec<&str> {
    raw_text.lines().filter(|line| !line.trim().is_empty()).collect()
}

/// Tab when the header line has one, comma otherwise.
pub fn detect_delimiter(header_line: &str) -> char {
    if header_line.contains('\t') {
        '\t'
    } else {
        ','
    }
}

/// Split a header line: trim each part, drop empties.
pub(crate) fn split_headers(header_line: &str, delimiter: char) -> Vec<String> {
    header_line
        .split(delimiter)
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect()
}

/// Header names from the first non-blank line of `raw_text`.
pub fn detect_headers(raw_text: &str) -> Vec<String> {
    match non_blank_lines(raw_text).first() {
        Some(line) => split_headers(line, detect_delimiter(line)),
        None => Vec::new(),
    }
}

/// Suggested header per semantic field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingSuggestion {
    pub unique_id: Option<String>,
    pub quantity: Option<String>,
    pub price: Option<String>,
}

impl MappingSuggestion {
    pub fn detected_count(&self) -> usize {
        [&self.unique_id, &self.quantity, &self.price]
            .iter()
            .filter(|s| s.is_some())
            .count()
    }
}

/// Keyword-driven guess; unique id falls back to the first header.
///
/// The column picked for the unique id is never offered as quantity or price.
pub fn suggest_mapping(headers: &[String]) -> MappingSuggestion {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    let find = |keywords: &[&str], exclude: Option<usize>| -> Option<usize> {
        keywords.iter().find_map(|kw| {
            lowered
                .iter()
                .enumerate()
                .position(|(idx, h)| Some(idx) != exclude && h.contains(kw))
        })
    };

    let id_idx = find(UNIQUE_ID_KEYWORDS, None).or((!headers.is_empty()).then_some(0));
    let header = |idx: Option<usize>| idx.map(|i| headers[i].clone());

    MappingSuggestion {
        unique_id: header(id_idx),
        quantity: header(find(QUANTITY_KEYWORDS, id_idx)),
        price: header(find(PRICE_KEYWORDS, id_idx)),
    }
}

impl FieldMapping {
    /// Fill only the fields that are unset; caller-supplied names are never
    /// replaced, and quantity or price never reuse the unique id column.
    /// Returns how many fields were filled.
    pub fn fill_unset(&mut self, suggestion: &MappingSuggestion) -> usize {
        let mut filled = 0;
        if !self.has_unique_id() {
            if let Some(ref id) = suggestion.unique_id {
                self.unique_id_header = id.clone();
                filled += 1;
            }
        }
        let id = self.unique_id_header.trim().to_lowercase();
        let usable = |h: &String| h.trim().to_lowercase() != id;

        if self.quantity().is_none() {
            if let Some(qty) = suggestion.quantity.as_ref().filter(|h| usable(h)) {
                self.quantity_header = Some(qty.clone());
                filled += 1;
            }
        }
        if self.price().is_none() {
            if let Some(price) = suggestion.price.as_ref().filter(|h| usable(h)) {
                self.price_header = Some(price.clone());
                filled += 1;
            }
        }
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn headers_from_first_non_blank_line() {
        let text = "\n   \nCategory, Asset ID ,,Unit Price\nHardware,PC-1,,10";
        assert_eq!(detect_headers(text), strings(&["Category", "Asset ID", "Unit Price"]));
    }

    #[test]
    fn tab_wins_over_comma() {
        let text = "Name, long\tSKU\tQty\nx\ty\tz";
        assert_eq!(detect_headers(text), strings(&["Name, long", "SKU", "Qty"]));
        assert_eq!(detect_headers(""), Vec::<String>::new());
    }

    #[test]
    fn suggestion_prefers_specific_keywords() {
        let headers = strings(&["Description", "Stock Code", "Expected Qty", "Unit Price", "Retail"]);
        let s = suggest_mapping(&headers);
        assert_eq!(s.unique_id.as_deref(), Some("Stock Code"));
        // "stock" is a quantity keyword but "expected qty" is more specific
        assert_eq!(s.quantity.as_deref(), Some("Expected Qty"));
        assert_eq!(s.price.as_deref(), Some("Unit Price"));
        assert_eq!(s.detected_count(), 3);
    }

    #[test]
    fn unique_id_falls_back_to_first_header() {
        let s = suggest_mapping(&strings(&["Name", "Colour"]));
        assert_eq!(s.unique_id.as_deref(), Some("Name"));
        assert_eq!(s.quantity, None);
        assert_eq!(s.price, None);
        assert_eq!(suggest_mapping(&[]).unique_id, None);
    }

    #[test]
    fn fill_unset_never_overwrites() {
        let suggestion = suggest_mapping(&strings(&["SKU", "Qty", "Price"]));
        let mut mapping = FieldMapping::new("Barcode", None, None);
        let filled = mapping.fill_unset(&suggestion);
        assert_eq!(filled, 2);
        assert_eq!(mapping.unique_id_header, "Barcode");
        assert_eq!(mapping.quantity(), Some("Qty"));
        assert_eq!(mapping.price(), Some("Price"));
    }

    #[test]
    fn id_column_is_not_reused_for_quantity() {
        // "stock" is also a quantity keyword
        let s = suggest_mapping(&strings(&["Stock Code", "Description"]));
        assert_eq!(s.unique_id.as_deref(), Some("Stock Code"));
        assert_eq!(s.quantity, None);

        // "Cost Code" matches both "code" and "cost"
        let s = suggest_mapping(&strings(&["Cost Code", "Qty"]));
        assert_eq!(s.unique_id.as_deref(), Some("Cost Code"));
        assert_eq!(s.price, None);

        let suggestion = MappingSuggestion {
            unique_id: Some("Stock".into()),
            quantity: Some("stock".into()),
            price: None,
        };
        let mut mapping = FieldMapping::new("Stock", None, None);
        assert_eq!(mapping.fill_unset(&suggestion), 0);
        assert_eq!(mapping.quantity(), None);
    }
}
