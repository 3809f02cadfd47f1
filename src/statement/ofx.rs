//! A tolerant scanner for OFX bank statement exports.
//!
//! OFX files in the wild are inconsistent: SGML and XML flavours, missing
//! closing tags, varying field sets per bank. Rather than a strict grammar,
//! the parser splits the raw text on the `<STMTTRN>` block marker and pulls
//! the three fields it needs out of each block. Blocks that do not yield all
//! three fields are skipped, never reported as errors.

use time::{Date, macros::format_description};

use crate::transaction::{TransactionKind, UNCATEGORIZED};

/// The marker that starts each transaction block in an OFX statement.
const SENTINEL: &str = "<stmttrn>";

/// A transaction parsed out of a statement file but not yet saved.
///
/// The provisional ID only exists so the review form can key its rows; it is
/// replaced by a database-assigned ID when the import is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTransaction {
    /// A locally generated identifier derived from the raw block text.
    pub provisional_id: i64,
    /// The amount as a positive magnitude, in dollars.
    pub amount: f64,
    /// The posting date.
    pub date: Date,
    /// The memo text from the statement.
    pub description: String,
    /// Whether the amount was money in or money out.
    pub kind: TransactionKind,
    /// Always [UNCATEGORIZED]: OFX carries no category information, so
    /// categorisation happens on the review screen.
    pub category: String,
}

/// Parse the transactions out of an OFX statement export.
///
/// The text before the first `<STMTTRN>` marker is header material and is
/// discarded. Matching is ASCII case-insensitive. Blocks missing the posting
/// date, amount, or memo field are skipped, as are blocks whose date or
/// amount does not parse; a memo that is present but blank keeps the record
/// with an empty description. Malformed input therefore yields fewer
/// transactions, never an error.
pub fn parse_ofx(text: &str) -> Vec<ParsedTransaction> {
    let lowered = text.to_ascii_lowercase();
    let block_starts: Vec<usize> = lowered.match_indices(SENTINEL).map(|(index, _)| index).collect();

    block_starts
        .iter()
        .enumerate()
        .filter_map(|(position, &start)| {
            let end = block_starts
                .get(position + 1)
                .copied()
                .unwrap_or(text.len());

            parse_block(&text[start..end])
        })
        .collect()
}

fn parse_block(block: &str) -> Option<ParsedTransaction> {
    let date_text = extract_field(block, "<dtposted>")?;
    let amount_text = extract_field(block, "<trnamt>")?;
    let memo = extract_field(block, "<memo>")?;

    // Posting dates look like YYYYMMDDHHMMSS, sometimes with a timezone
    // suffix. Only the calendar day matters.
    let date = Date::parse(
        date_text.get(..8)?,
        format_description!("[year][month][day]"),
    )
    .ok()?;

    let amount: f64 = amount_text.parse().ok()?;
    let kind = if amount < 0.0 {
        TransactionKind::Expense
    } else {
        TransactionKind::Income
    };

    Some(ParsedTransaction {
        provisional_id: provisional_id(block),
        amount: amount.abs(),
        date,
        description: memo.to_owned(),
        kind,
        category: UNCATEGORIZED.to_owned(),
    })
}

/// Extract the value following `tag`: the text up to the next tag-opening
/// character or line break, trimmed. Returns `None` only when the tag is
/// absent; a present-but-blank field yields an empty value so records with
/// an empty memo are kept.
fn extract_field<'a>(block: &'a str, tag: &str) -> Option<&'a str> {
    let lowered = block.to_ascii_lowercase();
    let value_start = lowered.find(tag)? + tag.len();
    let rest = &block[value_start..];
    let value_end = rest.find(['<', '\r', '\n']).unwrap_or(rest.len());

    Some(rest[..value_end].trim())
}

/// A deterministic identifier for a raw statement block.
///
/// Derived from an MD5 digest of the block text, so re-uploading the same
/// statement produces the same IDs. The digest also serves as the import ID
/// used to detect duplicate rows at commit time.
fn provisional_id(block: &str) -> i64 {
    let digest = md5::compute(block.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.0[..8]);

    i64::from_le_bytes(bytes)
}

#[cfg(test)]
mod parse_ofx_tests {
    use time::macros::date;

    use crate::transaction::{TransactionKind, UNCATEGORIZED};

    use super::parse_ofx;

    #[test]
    fn parses_statement_with_header_junk() {
        let text = "HEADERJUNK<STMTTRN><DTPOSTED>20260205120000<TRNAMT>-45.90\
            <MEMO>Grocery Store<STMTTRN><DTPOSTED>20260207120000<TRNAMT>2500.00<MEMO>Salary";

        let transactions = parse_ofx(text);

        assert_eq!(transactions.len(), 2);

        assert_eq!(transactions[0].kind, TransactionKind::Expense);
        assert_eq!(transactions[0].amount, 45.90);
        assert_eq!(transactions[0].description, "Grocery Store");
        assert_eq!(transactions[0].date, date!(2026 - 02 - 05));
        assert_eq!(transactions[0].category, UNCATEGORIZED);

        assert_eq!(transactions[1].kind, TransactionKind::Income);
        assert_eq!(transactions[1].amount, 2500.00);
        assert_eq!(transactions[1].description, "Salary");
        assert_eq!(transactions[1].date, date!(2026 - 02 - 07));
    }

    #[test]
    fn empty_input_yields_no_transactions() {
        assert!(parse_ofx("").is_empty());
    }

    #[test]
    fn text_without_block_marker_yields_no_transactions() {
        assert!(parse_ofx("OFXHEADER:100\nDATA:OFXSGML\nnothing to see here").is_empty());
    }

    #[test]
    fn block_marker_is_case_insensitive() {
        let text = "<StmtTrn><DTPOSTED>20260101120000<TRNAMT>5.00<MEMO>Coffee";

        assert_eq!(parse_ofx(text).len(), 1);
    }

    #[test]
    fn zero_amount_is_income() {
        let text = "<STMTTRN><DTPOSTED>20260101120000<TRNAMT>0<MEMO>Placeholder";

        let transactions = parse_ofx(text);

        assert_eq!(transactions[0].kind, TransactionKind::Income);
        assert_eq!(transactions[0].amount, 0.0);
    }

    #[test]
    fn block_missing_memo_is_skipped() {
        let text = "<STMTTRN><DTPOSTED>20260205120000<TRNAMT>-45.90\
            <STMTTRN><DTPOSTED>20260207120000<TRNAMT>2500.00<MEMO>Salary";

        let transactions = parse_ofx(text);

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].description, "Salary");
    }

    #[test]
    fn blank_memo_keeps_record_with_empty_description() {
        let text = "<STMTTRN><DTPOSTED>20260205120000<TRNAMT>-45.90<MEMO><FITID>1";

        let transactions = parse_ofx(text);

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].description, "");
        assert_eq!(transactions[0].amount, 45.90);
    }

    #[test]
    fn block_with_unparseable_date_is_skipped() {
        let text = "<STMTTRN><DTPOSTED>not-a-date<TRNAMT>1.00<MEMO>Bad date";

        assert!(parse_ofx(text).is_empty());
    }

    #[test]
    fn block_with_unparseable_amount_is_skipped() {
        let text = "<STMTTRN><DTPOSTED>20260101120000<TRNAMT>12,34<MEMO>Bad amount";

        assert!(parse_ofx(text).is_empty());
    }

    #[test]
    fn only_first_eight_date_characters_are_used() {
        let text = "<STMTTRN><DTPOSTED>20260205120000.000[+12:NZST]<TRNAMT>1.00<MEMO>Timezone";

        assert_eq!(parse_ofx(text)[0].date, date!(2026 - 02 - 05));
    }

    #[test]
    fn field_values_stop_at_line_breaks() {
        let text = "<STMTTRN>\r\n<DTPOSTED>20260205120000\r\n<TRNAMT>-45.90\r\n<MEMO>Grocery Store\r\n";

        let transactions = parse_ofx(text);

        assert_eq!(transactions[0].description, "Grocery Store");
        assert_eq!(transactions[0].amount, 45.90);
    }

    #[test]
    fn duplicate_blocks_are_all_retained() {
        let block = "<STMTTRN><DTPOSTED>20260205120000<TRNAMT>-45.90<MEMO>Grocery Store";
        let text = format!("{block}{block}");

        let transactions = parse_ofx(&text);

        assert_eq!(transactions.len(), 2);
        assert_eq!(
            transactions[0].provisional_id,
            transactions[1].provisional_id
        );
    }

    #[test]
    fn source_order_is_preserved() {
        let text = "<STMTTRN><DTPOSTED>20260210120000<TRNAMT>3.00<MEMO>Third of the month\
            <STMTTRN><DTPOSTED>20260201120000<TRNAMT>1.00<MEMO>First of the month";

        let transactions = parse_ofx(text);

        assert_eq!(transactions[0].description, "Third of the month");
        assert_eq!(transactions[1].description, "First of the month");
    }

    #[test]
    fn provisional_ids_are_deterministic() {
        let text = "<STMTTRN><DTPOSTED>20260205120000<TRNAMT>-45.90<MEMO>Grocery Store";

        assert_eq!(
            parse_ofx(text)[0].provisional_id,
            parse_ofx(text)[0].provisional_id
        );
    }
}
