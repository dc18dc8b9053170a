use calamine::Data;

use crate::errors::ParserError;
use crate::formats::dedupe_headers;
use crate::formats::xlsx_table::cell_to_string;
use crate::parse_shipment_table;

#[test]
fn parses_csv_with_header_and_rows() {
    let content = b"STATUS,TOTAL CHARGES,DEP,ARR\n440-BILLED,100.5,JFK,LHR\n100-OPEN,50,ORD,CDG\n";
    let parsed = parse_shipment_table(content).expect("CSV parse failed");

    assert_eq!(parsed.format, "csv");
    assert_eq!(
        parsed.df.get_column_names(),
        ["STATUS", "TOTAL CHARGES", "DEP", "ARR"]
    );
    assert_eq!(parsed.df.height(), 2);

    let status = parsed.df.column("STATUS").unwrap().str().unwrap();
    assert_eq!(status.get(0), Some("440-BILLED"));
    assert_eq!(status.get(1), Some("100-OPEN"));
}

#[test]
fn skips_blank_rows_and_pads_short_ones() {
    let content = b"A,B,C\n1,2,3\n,,\n4,5\n";
    let parsed = parse_shipment_table(content).expect("CSV parse failed");

    assert_eq!(parsed.df.height(), 2);
    let c = parsed.df.column("C").unwrap().str().unwrap();
    assert_eq!(c.get(0), Some("3"));
    assert_eq!(c.get(1), None);
}

#[test]
fn empty_cells_become_nulls() {
    let content = b"QDT,QCCODE\n2024-01-01 10:00:00,262\n,\n2024-01-02 10:00:00,\n";
    let parsed = parse_shipment_table(content).expect("CSV parse failed");

    // the all-empty row is dropped, the partially empty one kept
    assert_eq!(parsed.df.height(), 2);
    let qc = parsed.df.column("QCCODE").unwrap().str().unwrap();
    assert_eq!(qc.get(0), Some("262"));
    assert_eq!(qc.get(1), None);
}

#[test]
fn header_only_csv_yields_empty_table() {
    let content = b"STATUS,QDT\n";
    let parsed = parse_shipment_table(content).expect("CSV parse failed");
    assert_eq!(parsed.df.height(), 0);
    assert_eq!(parsed.df.get_column_names(), ["STATUS", "QDT"]);
}

#[test]
fn unreadable_bytes_exhaust_every_parser() {
    let garbage = [0xff, 0xfe, 0x00, 0x42, 0x99];
    let err = parse_shipment_table(&garbage).expect_err("garbage should not parse");

    // the message names every format that was tried
    let rendered = err.to_string();
    assert!(rendered.contains("xlsx ("), "{rendered}");
    assert!(rendered.contains("csv ("), "{rendered}");

    match err {
        ParserError::NoMatchingParser { attempts } => {
            assert_eq!(attempts.len(), 2);
            assert_eq!(attempts[0].parser, "xlsx");
            assert_eq!(attempts[1].parser, "csv");
        }
        other => panic!("expected NoMatchingParser, got {other:?}"),
    }
}

#[test]
fn dedupe_headers_fills_blanks_and_suffixes_repeats() {
    let raw = vec![
        "DEP".to_string(),
        "".to_string(),
        "DEP".to_string(),
        "  ARR  ".to_string(),
        "DEP".to_string(),
    ];
    let deduped = dedupe_headers(&raw);
    assert_eq!(deduped, vec!["DEP", "column_2", "DEP_2", "ARR", "DEP_3"]);
}

#[test]
fn cell_to_string_normalizes_workbook_values() {
    assert_eq!(cell_to_string(&Data::Empty), None);
    assert_eq!(cell_to_string(&Data::String("  JFK ".to_string())), Some("JFK".to_string()));
    assert_eq!(cell_to_string(&Data::String("   ".to_string())), None);
    assert_eq!(cell_to_string(&Data::Int(262)), Some("262".to_string()));
    // whole floats lose the fractional suffix so integer codes stay parseable
    assert_eq!(cell_to_string(&Data::Float(262.0)), Some("262".to_string()));
    assert_eq!(cell_to_string(&Data::Float(100.5)), Some("100.5".to_string()));
}
