// End-to-end CLI session: load, scan, status, report, reset, clear.
//
// Run with: cargo test -p stocktake-cli --test session_tests

mod common;

use common::{code, stderr, stdout, Sandbox, STOCK_CSV};

#[test]
fn fresh_state_starts_from_demo_list() {
    let sb = Sandbox::new();
    let out = sb.ok(&["status"]);
    assert!(out.contains("5 items, 75 expected in total  [demo data]"), "{out}");
    assert!(out.contains("PC-D7-4822"));
    assert!(out.contains("Hardware | Desktop PC - Model 7 | 5 | £1200.00"), "{out}");
    assert!(out.contains("Last scanned: N/A"));
}

#[test]
fn load_scan_report_flow() {
    let sb = Sandbox::new();
    let file = sb.write("stock.csv", STOCK_CSV);

    let out = sb.ok(&["load", file.to_str().unwrap()]);
    assert!(
        out.contains("Successfully loaded 2 unique items (6 total quantity) with 4 columns. (Detected currency: £). Ready to scan!"),
        "{out}"
    );
    assert!(sb.state_path().exists());

    let out = sb.ok(&["scan", "a-1", "A-1", "A-1", "zz-9", "ZZ-9"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "SUCCESS: Item a-1 checked in. 4 remaining.");
    assert_eq!(lines[2], "SUCCESS: Item A-1 checked in. 2 remaining.");
    assert_eq!(lines[4], "UNEXPECTED ITEM: ID ZZ-9 not on list. Scanned 2 time(s).");

    // scans persisted between invocations
    let out = sb.ok(&["status", "--filter", "bolt"]);
    assert!(out.contains("PARTIAL"), "{out}");
    assert!(!out.contains("B-2"));
    assert!(out.contains("Last scanned: ZZ-9"));

    let out = sb.ok(&["report"]);
    assert!(out.contains("INVENTORY_REPORT_"));
    assert!(out.contains("_UNSPECIFIED_USER"));
    assert!(out.contains("MISSING ITEMS (2)"));
    assert!(out.contains("UNEXPECTED ITEMS (1)\n  zz-9  x2"), "{out}");
    assert!(out.contains("Missing Value (Understocked): £14.00"));
    assert!(out.contains("Net Inventory Discrepancy: LOSS of £14.00"));
}

#[test]
fn over_scan_messages() {
    let sb = Sandbox::new();
    let file = sb.write("stock.csv", STOCK_CSV);
    sb.ok(&["load", file.to_str().unwrap()]);

    let out = sb.ok(&["scan", "B-2", "B-2", "B-2"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "SUCCESS: Item B-2 checked in. 0 remaining.");
    assert_eq!(lines[1], "OVER-SCAN ALERT: Item B-2 is now over its expected quantity of 1.");
    assert_eq!(lines[2], "OVER-SCAN ALERT: Item B-2 scanned again. Count is now 3 (Expected 1).");
}

#[test]
fn scanner_mode_reads_stdin_lines() {
    let sb = Sandbox::new();
    let output = sb.run_with_stdin(&["scan"], "PC-D7-4822\n\n  tool-dmm-01  \n");
    assert_eq!(code(&output), 0, "{}", stderr(&output));

    let out = stdout(&output);
    assert_eq!(out.lines().count(), 2);
    assert!(out.contains("SUCCESS: Item PC-D7-4822 checked in. 4 remaining."));
    assert!(out.contains("SUCCESS: Item tool-dmm-01 checked in. 1 remaining."));
    assert!(stderr(&output).contains("Input is empty."));

    let out = sb.ok(&["status", "--filter", "multimeter"]);
    assert!(out.contains("TOOL-DMM-01"));
    assert!(out.contains("PARTIAL"));
}

#[test]
fn reset_returns_items_to_pending() {
    let sb = Sandbox::new();
    sb.ok(&["scan", "PC-D7-4822", "nope"]);
    let out = sb.ok(&["reset"]);
    assert!(out.contains("5 items back to PENDING"));

    let out = sb.ok(&["status"]);
    assert!(!out.contains("PARTIAL"));
    assert!(!out.contains("unexpected"));
    assert!(out.contains("Last scanned: N/A"));
}

#[test]
fn sign_off_names_the_report() {
    let sb = Sandbox::new();
    sb.ok(&["sign-off", "Jo Bloggs-Smith"]);
    let out = sb.ok(&["report"]);
    assert!(out.contains("_JO_BLOGGS_SMITH\n"), "{out}");
    assert!(out.contains("Signed off by: Jo Bloggs-Smith"));
}

#[test]
fn settings_supply_operator_and_mapping() {
    let sb = Sandbox::new();
    sb.write(
        "config/stocktake/settings.json",
        r#"{
    // site defaults
    "mapping": { "uniqueId": "Tag" },
    "report.operator": "Night Shift"
}"#,
    );
    let file = sb.write("stock.csv", "Code,Tag,Qty\nX1,T-1,2\nX2,T-2,1\n");

    let out = sb.ok(&["load", file.to_str().unwrap()]);
    assert!(out.contains("Mapping: id=Tag qty=- price=-"), "{out}");

    sb.ok(&["scan", "t-1"]);
    let out = sb.ok(&["report"]);
    assert!(out.contains("_NIGHT_SHIFT\n"));
    assert!(out.contains("Financial summary skipped"));
}

#[test]
fn remembered_operator_outlives_clear() {
    let sb = Sandbox::new();
    sb.ok(&["sign-off", "  Day Crew ", "--remember"]);
    assert!(sb.settings_path().exists());

    // settings keep the name once the session is gone
    sb.ok(&["clear"]);
    let out = sb.ok(&["report"]);
    assert!(out.contains("_DAY_CREW\n"), "{out}");
    assert!(out.contains("Signed off by: Day Crew"));
}

#[test]
fn clear_removes_state() {
    let sb = Sandbox::new();
    sb.ok(&["scan", "PC-D7-4822"]);
    assert!(sb.state_path().exists());

    let out = sb.ok(&["clear"]);
    assert!(out.contains("Removed saved session"));
    assert!(!sb.state_path().exists());

    let out = sb.ok(&["clear"]);
    assert!(out.contains("No saved session"));
}

#[test]
fn export_files_use_dated_names() {
    let sb = Sandbox::new();
    sb.ok(&["scan", "PC-D7-4822", "stray"]);

    sb.ok(&["export", "full"]);
    sb.ok(&["export", "unexpected"]);
    sb.ok(&["export", "json"]);

    let names: Vec<String> = std::fs::read_dir(sb.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    let has = |prefix: &str, ext: &str| names.iter().any(|n| n.starts_with(prefix) && n.ends_with(ext));
    assert!(has("Stock_Check_Full_Report_", ".csv"), "{names:?}");
    assert!(has("Stock_Check_Unexpected_Items_", ".csv"), "{names:?}");
    assert!(has("Stock_Check_Full_Report_", ".json"), "{names:?}");
}

#[test]
fn export_to_stdout() {
    let sb = Sandbox::new();
    sb.ok(&["scan", "PC-D7-4822", "PC-D7-4822"]);
    let out = sb.ok(&["export", "full", "-o", "-"]);
    let mut lines = out.lines();
    assert_eq!(
        lines.next(),
        Some(r#""Category","Description","Asset ID","Expected Quantity","Unit Price","Expected Quantity","Scanned Quantity","Remaining Quantity""#)
    );
    assert_eq!(
        lines.next(),
        Some(r#""Hardware","Desktop PC - Model 7","PC-D7-4822","5","£1200.00","5","2","3""#)
    );

    let out = sb.ok(&["export", "unexpected", "-o", "-"]);
    assert_eq!(out, "\"Unique ID (Raw)\",\"Count (Unexpected)\"\n");
}

#[test]
fn headers_shows_suggestion() {
    let sb = Sandbox::new();
    let file = sb.write("stock.tsv", "Barcode\tItem\tCount\tCost\n1\tTape\t3\tEUR 2.00\n");
    let out = sb.ok(&["headers", file.to_str().unwrap()]);
    assert!(out.contains("Delimiter: tab"));
    assert!(out.contains("Headers (4): Barcode, Item, Count, Cost"));
    assert!(out.contains("unique id: Barcode"));
    assert!(out.contains("quantity:  Count"));
    assert!(out.contains("price:     Cost"));
}
