// Integration tests enforcing the --json stdout contract and exit codes.
//
// stdout from --json commands must be exactly one JSON value with no
// banners; errors go to stderr with a registry exit code.
//
// Run with: cargo test -p stocktake-cli --test json_contract_tests -- --nocapture

mod common;

use common::{code, single_json, stderr, stdout, Sandbox, STOCK_CSV};

// ===========================================================================
// --json shapes
// ===========================================================================

#[test]
fn status_json_shape() {
    let sb = Sandbox::new();
    sb.ok(&["scan", "TOOL-DMM-01", "TOOL-DMM-01", "TOOL-DMM-01", "ghost"]);

    let output = sb.run(&["status", "--json"]);
    assert_eq!(code(&output), 0);
    let val = single_json(&output);

    assert_eq!(val["lastScanned"], "ghost");
    assert_eq!(val["isDemo"], true);
    assert_eq!(val["unexpectedCount"], 1);
    let items = val["items"].as_array().unwrap();
    assert_eq!(items.len(), 5);
    let dmm = items.iter().find(|i| i["id"] == "TOOL-DMM-01").unwrap();
    assert_eq!(dmm["status"], "OVER_SCAN");
    assert_eq!(dmm["remaining"], -1);

    // source columns travel with each row, in file order
    let attributes = dmm["attributes"].as_object().unwrap();
    assert_eq!(attributes["Description"], "Digital Multimeter");
    assert_eq!(attributes["Unit Price"], "99.99");
    let columns: Vec<&str> = attributes.keys().map(String::as_str).collect();
    assert_eq!(columns, ["Category", "Description", "Asset ID", "Expected Quantity", "Unit Price"]);
}

#[test]
fn report_json_shape() {
    let sb = Sandbox::new();
    let file = sb.write("stock.csv", STOCK_CSV);
    sb.ok(&["load", file.to_str().unwrap()]);
    sb.ok(&["scan", "A-1", "A-1", "A-1", "B-2", "B-2"]);

    let val = single_json(&sb.run(&["report", "--json"]));
    assert!(val["report_id"].as_str().unwrap().starts_with("INVENTORY_REPORT_"));
    assert_eq!(val["currency"], "£");
    assert_eq!(val["missing"].as_array().unwrap().len(), 1);
    assert_eq!(val["missing"][0]["raw_id"], "A-1");
    assert_eq!(val["missing"][0]["discrepancy"], 2);
    assert_eq!(val["over_scanned"][0]["raw_id"], "B-2");
    assert_eq!(val["price_header"], "Unit Price");
    // 26.00 scanned against 20.00 expected
    assert_eq!(val["financial"]["net_discrepancy"], "6.00");
}

#[test]
fn headers_json_shape() {
    let sb = Sandbox::new();
    let output = sb.run_with_stdin(&["headers", "-", "--json"], "SKU,Name,Qty\nA,b,1\n");
    let val = single_json(&output);
    assert_eq!(val["delimiter"], ",");
    assert_eq!(val["headers"], serde_json::json!(["SKU", "Name", "Qty"]));
    assert_eq!(val["suggested"]["unique_id"], "SKU");
    assert_eq!(val["suggested"]["quantity"], "Qty");
    assert!(val["suggested"]["price"].is_null());
}

#[test]
fn json_export_to_stdout() {
    let sb = Sandbox::new();
    sb.ok(&["scan", "CON-PAP-A4", "mystery"]);
    let val = single_json(&sb.run(&["export", "json", "-o", "-"]));
    assert_eq!(val["expectedStock"].as_array().unwrap().len(), 5);
    assert_eq!(val["expectedStock"][2]["scannedCount"], 1);
    assert_eq!(val["unexpectedScans"][0][0], "MYSTERY");
    assert_eq!(val["unexpectedScans"][0][1]["count"], 1);
}

// ===========================================================================
// exit codes
// ===========================================================================

#[test]
fn unknown_id_header_exits_4() {
    let sb = Sandbox::new();
    let file = sb.write("stock.csv", STOCK_CSV);
    let output = sb.run(&["load", file.to_str().unwrap(), "--id", "Serial"]);
    assert_eq!(code(&output), 4);
    assert!(stderr(&output).contains("error: unique ID header \"Serial\" not found"));
    assert!(stderr(&output).contains("hint:"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn failed_load_keeps_previous_session() {
    let sb = Sandbox::new();
    sb.ok(&["scan", "PC-D7-4822"]);
    let empty = sb.write("empty.csv", "Asset ID,Qty\n , 3\n");
    let output = sb.run(&["load", empty.to_str().unwrap()]);
    assert_eq!(code(&output), 5);

    let val = single_json(&sb.run(&["status", "--json"]));
    assert_eq!(val["isDemo"], true);
    assert_eq!(val["lastScanned"], "PC-D7-4822");
}

#[test]
fn blank_input_exits_5() {
    let sb = Sandbox::new();
    let output = sb.run_with_stdin(&["load", "-"], "\n  \n");
    assert_eq!(code(&output), 5);
}

#[test]
fn missing_file_exits_3() {
    let sb = Sandbox::new();
    let output = sb.run(&["load", "does-not-exist.csv"]);
    assert_eq!(code(&output), 3);
    assert!(stderr(&output).contains("cannot read does-not-exist.csv"));
}

#[test]
fn corrupt_state_exits_7() {
    let sb = Sandbox::new();
    std::fs::write(sb.state_path(), "{ nope").unwrap();
    let output = sb.run(&["status"]);
    assert_eq!(code(&output), 7);
    assert!(stderr(&output).contains("stocktake clear"));
}

#[test]
fn empty_stock_snapshot_rejects_scans_with_6() {
    let sb = Sandbox::new();
    std::fs::write(sb.state_path(), r#"{"expectedStock": [], "unexpectedScans": []}"#).unwrap();
    let output = sb.run(&["scan", "anything"]);
    assert_eq!(code(&output), 6);
    assert!(stderr(&output).contains("Load a stock list first."));
}

#[test]
fn blank_sign_off_is_usage_error() {
    let sb = Sandbox::new();
    assert_eq!(code(&sb.run(&["sign-off", "   "])), 2);
    assert_eq!(code(&sb.run(&["export", "pdf"])), 2);
}
