use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static TABLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());

/// One HTML table as rows of trimmed cell text. Tables carry no semantic
/// labels in the modem's markup, so position in the page is their identity.
pub type Table = Vec<Vec<String>>;

/// Extract every `<table>` in the document, in document (depth-first
/// pre-order) order. Nested tables become separate entries.
pub fn extract_tables(html: &str) -> Vec<Table> {
    let doc = Html::parse_document(html);
    doc.select(&TABLE_SEL).map(extract_table).collect()
}

/// Rows are only taken from `<thead>`/`<tbody>` children of the table;
/// anything else (captions, `<tfoot>`) is ignored. Within a row, only
/// `<th>`/`<td>` cells contribute text.
fn extract_table(table: ElementRef) -> Table {
    let mut rows = Vec::new();
    for group in child_elements(table).filter(|el| matches!(el.value().name(), "thead" | "tbody")) {
        for tr in child_elements(group).filter(|el| el.value().name() == "tr") {
            let row = child_elements(tr)
                .filter(|el| matches!(el.value().name(), "th" | "td"))
                .map(cell_text)
                .collect();
            rows.push(row);
        }
    }
    rows
}

/// All descendant text nodes concatenated in document order, then trimmed.
/// Inline markup inside a cell contributes no separators.
fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_in_document_order() {
        let html = r#"<html><body>
            <table><tbody><tr><td>a</td></tr></tbody></table>
            <div><p>noise</p><table><tbody><tr><td>b</td></tr></tbody></table></div>
            <table><tbody><tr><td>c</td></tr></tbody></table>
        </body></html>"#;
        let tables = extract_tables(html);
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[0][0][0], "a");
        assert_eq!(tables[1][0][0], "b");
        assert_eq!(tables[2][0][0], "c");
    }

    #[test]
    fn nested_tables_are_separate_entries() {
        let html = "<table><tbody><tr><td>\
            <table><tbody><tr><td>inner</td></tr></tbody></table>\
            </td></tr></tbody></table>";
        let tables = extract_tables(html);
        assert_eq!(tables.len(), 2);
        // Outer first; its cell text includes the nested table's text.
        assert_eq!(tables[0][0][0], "inner");
        assert_eq!(tables[1][0][0], "inner");
    }

    #[test]
    fn cell_text_is_concatenated_and_trimmed() {
        let html = "<table><tbody><tr>\
            <td> 603000000 <b>Hz</b> </td>\
            <td><b>256</b><i>QAM</i></td>\
            <td>  </td>\
            </tr></tbody></table>";
        let tables = extract_tables(html);
        assert_eq!(tables[0][0], vec!["603000000 Hz", "256QAM", ""]);
    }

    #[test]
    fn header_and_body_rows_both_extracted() {
        let html = "<table>\
            <thead><tr><th>Channel</th><th>Status</th></tr></thead>\
            <tbody><tr><td>1</td><td>Locked</td></tr></tbody>\
            </table>";
        let tables = extract_tables(html);
        assert_eq!(tables[0].len(), 2);
        assert_eq!(tables[0][0], vec!["Channel", "Status"]);
        assert_eq!(tables[0][1], vec!["1", "Locked"]);
    }

    #[test]
    fn rows_outside_header_and_body_groups_ignored() {
        let html = "<table>\
            <tfoot><tr><td>footer</td></tr></tfoot>\
            <tbody><tr><td>data</td></tr></tbody>\
            </table>";
        let tables = extract_tables(html);
        assert_eq!(tables[0], vec![vec!["data".to_string()]]);
    }

    #[test]
    fn implicit_tbody_still_yields_rows() {
        // The modem's pages sometimes omit <tbody>; the HTML parser inserts it.
        let tables = extract_tables("<table><tr><td>x</td></tr></table>");
        assert_eq!(tables[0], vec![vec!["x".to_string()]]);
    }

    #[test]
    fn empty_or_missing_tables() {
        assert!(extract_tables("<p>no tables here</p>").is_empty());
        let tables = extract_tables("<table></table>");
        assert_eq!(tables.len(), 1);
        assert!(tables[0].is_empty());
    }

    #[test]
    fn ragged_rows_preserved_as_is() {
        let html = "<table><tbody>\
            <tr><td>a</td></tr>\
            <tr><td>b</td><td>c</td></tr>\
            </tbody></table>";
        let tables = extract_tables(html);
        assert_eq!(tables[0][0].len(), 1);
        assert_eq!(tables[0][1].len(), 2);
    }
}
