// File: crates/airviz-core/src/parse.rs
// Summary: Delimited text -> RawRecord rows (header detection, delimiter sniffing, date parsing).

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::config::ParseOptions;
use crate::error::ParseError;
use crate::record::{parse_time_of_day, RawRecord};

/// Parser output: channel names in header order and rows in file order.
#[derive(Clone, Debug)]
pub struct ParsedTable {
    pub channels: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// Parse uploaded text into raw records.
///
/// Fails when the text is blank, has no usable header, lacks the date column,
/// has no data rows, or has no row whose date parses. Rows whose date does
/// not parse are otherwise kept with `date = None`; date-based passes skip
/// them later. Repeated channel headers get a `_2`, `_3`, ... suffix.
pub fn parse(text: &str, opts: &ParseOptions) -> Result<ParsedTable, ParseError> {
    let text = text.trim_start_matches('\u{feff}');
    if text.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let delimiter = match opts.delimiter {
        Some(c) if c.is_ascii() => c as u8,
        _ => sniff_delimiter(text),
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(ParseError::MissingHeader);
    }

    let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let i_date = find(&opts.date_column)
        .ok_or_else(|| ParseError::MissingDateColumn(opts.date_column.clone()))?;
    let i_time = find(&opts.time_column);

    let mut used = HashSet::new();
    let channels: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, h)| *i != i_date && Some(*i) != i_time && !h.is_empty())
        .map(|(i, h)| (i, unique_channel(h, &mut used)))
        .collect();

    let mut records = Vec::new();
    let mut bad_dates = 0usize;
    for row in rdr.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let date_text = row.get(i_date).unwrap_or("").trim().to_string();
        let date = NaiveDate::parse_from_str(&date_text, &opts.date_format).ok();
        if date.is_none() {
            bad_dates += 1;
        }
        let time_text = i_time
            .and_then(|ix| row.get(ix))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let time = time_text.as_deref().and_then(parse_time_of_day);

        let values: HashMap<String, String> = channels
            .iter()
            .map(|(ix, name)| (name.clone(), row.get(*ix).unwrap_or("").trim().to_string()))
            .collect();

        records.push(RawRecord { date_text, date, time_text, time, values });
    }

    if records.is_empty() {
        return Err(ParseError::NoDataRows);
    }
    if bad_dates == records.len() {
        return Err(ParseError::NoDatedRows(opts.date_format.clone()));
    }
    if bad_dates > 0 {
        tracing::warn!(
            "{} of {} rows have a date not matching `{}`; they are skipped by date-based views",
            bad_dates,
            records.len(),
            opts.date_format
        );
    }
    tracing::debug!("parsed {} rows, {} channels", records.len(), channels.len());

    Ok(ParsedTable { channels: channels.into_iter().map(|(_, n)| n).collect(), records })
}

fn unique_channel(name: &str, used: &mut HashSet<String>) -> String {
    let mut candidate = name.to_string();
    let mut n = 1;
    while used.contains(&candidate) {
        n += 1;
        candidate = format!("{name}_{n}");
    }
    if n > 1 {
        tracing::warn!("duplicate column `{}` renamed to `{}`", name, candidate);
    }
    used.insert(candidate.clone());
    candidate
}

/// Pick the field delimiter from the header line: `;` or tab when the line
/// uses them and has no comma, otherwise `,`.
pub fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    if header.contains(',') {
        b','
    } else if header.contains(';') {
        b';'
    } else if header.contains('\t') {
        b'\t'
    } else {
        b','
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> ParseOptions { ParseOptions::default() }

    #[test]
    fn comma_file() {
        let t = parse("Date,Time,CO,NOx\n3/10/2004,18:00:00,2.6,-200\n3/11/2004,19:00:00,-200,50\n", &opts()).unwrap();
        assert_eq!(t.channels, vec!["CO", "NOx"]);
        assert_eq!(t.records.len(), 2);
        assert_eq!(t.records[0].raw("NOx"), Some("-200"));
        assert_eq!(t.records[1].date, NaiveDate::from_ymd_opt(2004, 3, 11));
        assert!(t.records[0].time.is_some());
    }

    #[test]
    fn semicolon_file_with_trailing_columns() {
        let text = "Date;Time;CO(GT);T;;\n10/03/2004;18.00.00;2,6;13,6;;\n;;;;;\n";
        let mut o = opts();
        o.date_format = "%d/%m/%Y".into();
        let t = parse(text, &o).unwrap();
        assert_eq!(t.channels, vec!["CO(GT)", "T"]);
        assert_eq!(t.records.len(), 1);
        assert_eq!(t.records[0].date, NaiveDate::from_ymd_opt(2004, 3, 10));
        assert_eq!(t.records[0].raw("CO(GT)"), Some("2,6"));
    }

    #[test]
    fn errors_are_explicit() {
        assert!(matches!(parse("", &opts()), Err(ParseError::EmptyInput)));
        assert!(matches!(parse("  \n\n", &opts()), Err(ParseError::EmptyInput)));
        assert!(matches!(parse("Date,CO\n", &opts()), Err(ParseError::NoDataRows)));
        assert!(matches!(parse("When,CO\n1,2\n", &opts()), Err(ParseError::MissingDateColumn(_))));
        assert!(matches!(parse(",,\n1,2,3\n", &opts()), Err(ParseError::MissingHeader)));
        assert!(matches!(parse("Date,CO\n13/03/2004,1\n", &opts()), Err(ParseError::NoDatedRows(_))));
    }

    #[test]
    fn repeated_headers_get_distinct_names() {
        let t = parse("Date,CO,CO,CO_2,CO\n3/10/2004,1,2,3,4\n", &opts()).unwrap();
        assert_eq!(t.channels, vec!["CO", "CO_2", "CO_2_2", "CO_3"]);
        assert_eq!(t.records[0].raw("CO"), Some("1"));
        assert_eq!(t.records[0].raw("CO_2"), Some("2"));
        assert_eq!(t.records[0].raw("CO_2_2"), Some("3"));
        assert_eq!(t.records[0].raw("CO_3"), Some("4"));
    }

    #[test]
    fn bad_dates_are_kept_unparsed() {
        let t = parse("Date,CO\nyesterday,1\n3/10/2004,2\n", &opts()).unwrap();
        assert_eq!(t.records.len(), 2);
        assert!(t.records[0].date.is_none());
        assert_eq!(t.records[0].date_text, "yesterday");
    }

    #[test]
    fn sniffing() {
        assert_eq!(sniff_delimiter("a;b;c"), b';');
        assert_eq!(sniff_delimiter("a\tb"), b'\t');
        assert_eq!(sniff_delimiter("\n a,b"), b',');
    }
}
