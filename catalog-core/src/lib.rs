use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;

/// Field names as they appear in the upstream CSV conversion.
pub const BRAND: &str = "Typewriter Brand";
pub const MODEL: &str = "Model";
pub const YEAR: &str = "Year";
pub const SERIAL: &str = "Serial No";
pub const TYPEFACE: &str = "Typeface";
pub const PITCH: &str = "Pitch";
pub const LAYOUT: &str = "Layout";
pub const NOTES: &str = "Notes";
pub const VALUE_FIELD: &str = "Value";
pub const PURCHASE_FIELD: &str = "Purchase Price";

/// Columns shown by the list view, in display order. The Link column is
/// synthesized per row and appended after these.
pub const LIST_VIEW_COLUMNS: [&str; 8] = [
    BRAND, MODEL, YEAR, SERIAL, TYPEFACE, PITCH, LAYOUT, NOTES,
];

/// Placeholder rendered for absent or empty cell values.
pub const EMPTY_CELL: &str = "\u{2014}";

/// Group key used when the grouping field is absent on a record.
pub const UNKNOWN_GROUP: &str = "Unknown";

/// One catalog entry: a dynamic field map produced by the upstream CSV
/// conversion. Values are strings or numbers; missing fields are simply
/// absent from the map. Records are never written back after load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String form of a field, empty when absent. All filtering, sorting
    /// and grouping goes through this so missing values behave like "".
    pub fn text(&self, field: &str) -> String {
        self.get(field).map(value_text).unwrap_or_default()
    }

    /// String forms of every field on the record, for free-text search.
    pub fn field_texts(&self) -> impl Iterator<Item = String> + '_ {
        self.0.values().map(value_text)
    }
}

/// String form of a JSON value matching how the page script saw it:
/// numbers without quotes, null as empty.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Header label for a display column. Fields without a rename keep their
/// raw name.
pub fn column_label(name: &str) -> &str {
    match name {
        "Typewriter Brand" => "Make",
        "Serial No" => "Serial",
        "Electric/Manual" => "Type",
        "New Rubber?" => "Rubber",
        "Sale Price" => "Sale",
        "Purchase Price" => "Purchase",
        "From Where & Who" => "Source",
        other => other,
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Fetch(String),
    #[error("catalog payload was not a JSON array of records: {0}")]
    Decode(String),
}

/// Decode the catalog JSON document. The payload must be an array of
/// objects; anything else is a decode error the caller surfaces as the
/// single visible error row.
pub fn parse_catalog(body: &str) -> Result<Vec<Record>, CatalogError> {
    serde_json::from_str::<Vec<Record>>(body).map_err(|e| CatalogError::Decode(e.to_string()))
}

/// URL-safe slug: lowercase, trimmed, ASCII alphanumerics kept,
/// whitespace/underscore/hyphen runs collapsed to a single hyphen,
/// everything else dropped, no leading or trailing hyphen.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for ch in lowered.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        }
    }
    if out.ends_with('-') {
        out.pop();
    }
    out
}

/// Machine page path for a record: `/typewriters/{make}-{model}-{serial}/`.
/// Requires Brand, Model and Serial all present and all slugifying to
/// something non-empty; otherwise the row gets no link.
pub fn machine_link(record: &Record) -> Option<String> {
    let make = record.text(BRAND);
    let model = record.text(MODEL);
    let serial = record.text(SERIAL);
    if make.is_empty() || model.is_empty() || serial.is_empty() {
        return None;
    }
    let make = slugify(&make);
    let model = slugify(&model);
    let serial = slugify(&serial);
    if make.is_empty() || model.is_empty() || serial.is_empty() {
        return None;
    }
    Some(format!("/typewriters/{make}-{model}-{serial}/"))
}

/// Insert comma group separators into an integer.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && i % 3 == lead % 3 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_integral(n: i64) -> String {
    // Four-digit values in the plausible year range stay ungrouped.
    if (1000..=2100).contains(&n) {
        n.to_string()
    } else {
        group_thousands(n)
    }
}

/// Display text for a cell. Total: absent, null and empty-string values
/// become the em-dash placeholder; integral numbers get year handling and
/// group separators; fractional numbers render with two decimals; strings
/// pass through verbatim.
pub fn format_cell(value: Option<&Value>) -> String {
    let Some(value) = value else {
        return EMPTY_CELL.to_string();
    };
    match value {
        Value::Null => EMPTY_CELL.to_string(),
        Value::String(s) if s.is_empty() => EMPTY_CELL.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                format_integral(i)
            } else {
                let f = n.as_f64().unwrap_or(0.0);
                if f.fract() == 0.0 {
                    format_integral(f as i64)
                } else {
                    format!("{f:.2}")
                }
            }
        }
        other => value_text(other),
    }
}

/// Case-insensitive free-text filter over every field of every record.
/// An empty query returns the whole catalog; order is always preserved.
pub fn filter_records(catalog: &[Record], query: &str) -> Vec<Record> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return catalog.to_vec();
    }
    catalog
        .iter()
        .filter(|record| {
            record
                .field_texts()
                .any(|text| text.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Longest leading numeric prefix, `parseFloat`-style: leading whitespace
/// skipped, optional sign, digits, optional fraction and exponent. Returns
/// None when no digits are found, so malformed values never fail a sort or
/// sum, they just fall through.
pub fn parse_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    let mut saw_digit = false;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        saw_digit = true;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            saw_digit = true;
        }
    }
    if !saw_digit {
        return None;
    }
    let mut end = i;
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }
    s[..end].parse().ok()
}

/// First run of four consecutive ASCII digits, parsed as a year. Matches
/// the first window, so "1958 (approx)" yields 1958 and "12345" yields
/// 1234.
fn year_run(text: &str) -> Option<i64> {
    let bytes = text.as_bytes();
    let mut run_start = None;
    for (i, b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            let start = *run_start.get_or_insert(i);
            if i - start + 1 == 4 {
                return text[start..=i].parse().ok();
            }
        } else {
            run_start = None;
        }
    }
    None
}

fn locale_cmp(a: &str, b: &str) -> Ordering {
    // Case-insensitive ordering with a raw-order tiebreak, standing in
    // for the browser's localeCompare.
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Per-field comparator. Year fields compare by their first four-digit
/// run when both sides have one; otherwise both sides are tried as
/// numbers; otherwise they compare as case-insensitive strings. Missing
/// fields compare as empty strings.
pub fn compare_records(a: &Record, b: &Record, field: &str) -> Ordering {
    let av = a.text(field);
    let bv = b.text(field);
    if field == YEAR {
        if let (Some(ay), Some(by)) = (year_run(&av), year_run(&bv)) {
            return ay.cmp(&by);
        }
    }
    if let (Some(an), Some(bn)) = (parse_number(&av), parse_number(&bv)) {
        return an.partial_cmp(&bn).unwrap_or(Ordering::Equal);
    }
    locale_cmp(&av, &bv)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

/// A sort request as encoded by the sort selector: `"field|asc"` or
/// `"field|desc"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub dir: SortDir,
}

impl SortSpec {
    /// Parse the selector encoding. An empty selection means "no sort",
    /// which restores original catalog order.
    pub fn parse(raw: &str) -> Option<SortSpec> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let (field, dir) = raw.split_once('|').unwrap_or((raw, "asc"));
        let dir = if dir.eq_ignore_ascii_case("desc") {
            SortDir::Desc
        } else {
            SortDir::Asc
        };
        Some(SortSpec {
            field: field.to_string(),
            dir,
        })
    }
}

/// Stable sort of a view by the given spec. Descending is the exact
/// reverse of ascending, ties aside.
pub fn sort_view(view: &mut [Record], spec: &SortSpec) {
    view.sort_by(|a, b| {
        let ord = compare_records(a, b, &spec.field);
        match spec.dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
}

/// Metric selector for the pivot view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Metric {
    #[default]
    Count,
    Value,
    Purchase,
}

impl Metric {
    /// Parse the selector value; anything unrecognized counts records.
    pub fn parse(raw: &str) -> Metric {
        match raw {
            "value" => Metric::Value,
            "purchase" => Metric::Purchase,
            _ => Metric::Count,
        }
    }

    /// The record field summed for this metric, None for plain counts.
    pub fn source_field(&self) -> Option<&'static str> {
        match self {
            Metric::Count => None,
            Metric::Value => Some(VALUE_FIELD),
            Metric::Purchase => Some(PURCHASE_FIELD),
        }
    }

    /// Display form of an aggregated value: bare integer for counts,
    /// whole dollars with group separators for money metrics.
    pub fn format(&self, value: f64) -> String {
        match self {
            Metric::Count => format!("{}", value as i64),
            Metric::Value | Metric::Purchase => {
                format!("${}", group_thousands(value.round() as i64))
            }
        }
    }
}

/// One bucket of the pivot view: the grouping key, the aggregated metric
/// and the raw member count.
#[derive(Clone, Debug, PartialEq)]
pub struct PivotGroup {
    pub key: String,
    pub value: f64,
    pub count: usize,
}

/// Partition the full catalog by a field (absent values bucket under
/// "Unknown"), aggregate each bucket's metric and sort descending by it,
/// key-ascending on ties so output is deterministic. Non-numeric metric
/// source values contribute 0. The pivot view always runs over the whole
/// catalog, never the filtered view.
pub fn pivot_groups(catalog: &[Record], group_field: &str, metric: Metric) -> Vec<PivotGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<&Record>)> = Vec::new();
    for record in catalog {
        let text = record.text(group_field);
        let key = if text.is_empty() {
            UNKNOWN_GROUP.to_string()
        } else {
            text
        };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            buckets.push((key, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(record);
    }

    let mut out: Vec<PivotGroup> = buckets
        .into_iter()
        .map(|(key, members)| {
            let value = match metric.source_field() {
                None => members.len() as f64,
                Some(field) => members
                    .iter()
                    .map(|r| parse_number(&r.text(field)).unwrap_or(0.0))
                    .sum(),
            };
            PivotGroup {
                key,
                value,
                count: members.len(),
            }
        })
        .collect();
    out.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });
    out
}

/// Bar width for a group, as a percentage of the maximum metric across
/// all groups. Zero when there is no positive maximum.
pub fn bar_percent(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        0.0
    } else {
        value / max * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(fields: Value) -> Record {
        serde_json::from_value(fields).unwrap()
    }

    fn sample_catalog() -> Vec<Record> {
        vec![
            record(json!({
                "Typewriter Brand": "Royal",
                "Model": "KMM",
                "Year": "1939",
                "Serial No": "1234-5",
                "Pitch": 10,
                "Value": 250,
            })),
            record(json!({
                "Typewriter Brand": "Remington",
                "Model": "Quiet-Riter",
                "Year": "1958 (approx)",
                "Pitch": 12,
                "Purchase Price": 45.5,
            })),
            record(json!({
                "Typewriter Brand": "Royal",
                "Model": "FP",
                "Year": "1962",
                "Serial No": "FP-6,700,000",
                "Pitch": 2,
            })),
            record(json!({
                "Model": "Unknown portable",
                "Notes": "flea market find",
            })),
        ]
    }

    #[test]
    fn filter_is_case_insensitive() {
        let catalog = sample_catalog();
        let hits = filter_records(&catalog, "REM");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text(BRAND), "Remington");
    }

    #[test]
    fn filter_is_idempotent() {
        let catalog = sample_catalog();
        let once = filter_records(&catalog, "royal");
        let twice = filter_records(&once, "royal");
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn empty_query_returns_full_catalog() {
        let catalog = sample_catalog();
        assert_eq!(filter_records(&catalog, ""), catalog);
    }

    #[test]
    fn filter_matches_numeric_fields() {
        let catalog = sample_catalog();
        let hits = filter_records(&catalog, "45.5");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text(BRAND), "Remington");
    }

    #[test]
    fn year_comparator_reads_first_digit_run() {
        let catalog = sample_catalog();
        let mut view = catalog.clone();
        sort_view(
            &mut view,
            &SortSpec {
                field: YEAR.to_string(),
                dir: SortDir::Asc,
            },
        );
        let years: Vec<String> = view.iter().map(|r| r.text(YEAR)).collect();
        let pos_1958 = years.iter().position(|y| y.starts_with("1958")).unwrap();
        let pos_1962 = years.iter().position(|y| y == "1962").unwrap();
        assert!(pos_1958 < pos_1962);
    }

    #[test]
    fn numeric_comparator_beats_lexicographic() {
        let mut view = sample_catalog();
        sort_view(
            &mut view,
            &SortSpec {
                field: PITCH.to_string(),
                dir: SortDir::Asc,
            },
        );
        let pitches: Vec<String> = view
            .iter()
            .map(|r| r.text(PITCH))
            .filter(|p| !p.is_empty())
            .collect();
        assert_eq!(pitches, vec!["2", "10", "12"]);
    }

    #[test]
    fn descending_reverses_ascending() {
        let mut asc = sample_catalog();
        let mut desc = sample_catalog();
        sort_view(
            &mut asc,
            &SortSpec {
                field: MODEL.to_string(),
                dir: SortDir::Asc,
            },
        );
        sort_view(
            &mut desc,
            &SortSpec {
                field: MODEL.to_string(),
                dir: SortDir::Desc,
            },
        );
        asc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn sort_spec_parses_selector_encoding() {
        assert_eq!(SortSpec::parse(""), None);
        assert_eq!(SortSpec::parse("   "), None);
        let spec = SortSpec::parse("Year|desc").unwrap();
        assert_eq!(spec.field, "Year");
        assert_eq!(spec.dir, SortDir::Desc);
        let bare = SortSpec::parse("Model").unwrap();
        assert_eq!(bare.dir, SortDir::Asc);
    }

    #[test]
    fn missing_field_sorts_as_empty_string() {
        let mut view = sample_catalog();
        sort_view(
            &mut view,
            &SortSpec {
                field: SERIAL.to_string(),
                dir: SortDir::Asc,
            },
        );
        // Records without a serial come first, as empty strings.
        assert_eq!(view[0].text(SERIAL), "");
    }

    #[test]
    fn slugify_normalizes() {
        assert_eq!(slugify("Royal KMM"), "royal-kmm");
        assert_eq!(slugify("  Quiet_Riter  "), "quiet-riter");
        assert_eq!(slugify("FP-6,700,000"), "fp-6700000");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn machine_link_requires_all_three_fields() {
        let full = record(json!({
            "Typewriter Brand": "Royal",
            "Model": "KMM",
            "Serial No": "1234-5",
        }));
        assert_eq!(
            machine_link(&full).as_deref(),
            Some("/typewriters/royal-kmm-1234-5/")
        );

        let no_serial = record(json!({
            "Typewriter Brand": "Royal",
            "Model": "KMM",
        }));
        assert_eq!(machine_link(&no_serial), None);

        let unsluggable = record(json!({
            "Typewriter Brand": "Royal",
            "Model": "???",
            "Serial No": "1234",
        }));
        assert_eq!(machine_link(&unsluggable), None);
    }

    #[test]
    fn format_cell_policy() {
        assert_eq!(format_cell(None), EMPTY_CELL);
        assert_eq!(format_cell(Some(&json!(""))), EMPTY_CELL);
        assert_eq!(format_cell(Some(&Value::Null)), EMPTY_CELL);
        // Year-range integers stay ungrouped, others get separators.
        assert_eq!(format_cell(Some(&json!(1939))), "1939");
        assert_eq!(format_cell(Some(&json!(2100))), "2100");
        assert_eq!(format_cell(Some(&json!(6700000))), "6,700,000");
        assert_eq!(format_cell(Some(&json!(45.5))), "45.50");
        assert_eq!(format_cell(Some(&json!("1958 (approx)"))), "1958 (approx)");
        assert_eq!(format_cell(Some(&json!("1962"))), "1962");
    }

    #[test]
    fn group_thousands_handles_edges() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(-1234567), "-1,234,567");
    }

    #[test]
    fn parse_number_takes_numeric_prefix() {
        assert_eq!(parse_number("12"), Some(12.0));
        assert_eq!(parse_number("  -3.5kg"), Some(-3.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("1e"), Some(1.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn pivot_counts_by_brand() {
        let catalog = vec![
            record(json!({"Typewriter Brand": "Royal"})),
            record(json!({"Typewriter Brand": "Smith Corona"})),
            record(json!({"Typewriter Brand": "Royal"})),
        ];
        let groups = pivot_groups(&catalog, BRAND, Metric::Count);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "Royal");
        assert_eq!(groups[0].value, 2.0);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[1].key, "Smith Corona");
        assert_eq!(groups[1].value, 1.0);
    }

    #[test]
    fn pivot_sums_treat_malformed_as_zero() {
        let catalog = vec![
            record(json!({"Typewriter Brand": "Royal", "Value": 250})),
            record(json!({"Typewriter Brand": "Royal", "Value": "unknown"})),
            record(json!({"Typewriter Brand": "Royal"})),
        ];
        let groups = pivot_groups(&catalog, BRAND, Metric::Value);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].value, 250.0);
        assert_eq!(groups[0].count, 3);
    }

    #[test]
    fn pivot_buckets_absent_keys_as_unknown() {
        let catalog = vec![
            record(json!({"Typewriter Brand": "Royal"})),
            record(json!({"Model": "mystery"})),
        ];
        let groups = pivot_groups(&catalog, BRAND, Metric::Count);
        assert!(groups.iter().any(|g| g.key == UNKNOWN_GROUP && g.count == 1));
    }

    #[test]
    fn pivot_ignores_active_filter() {
        // The pivot contract takes the full catalog; callers must not pass
        // the filtered view. Groups over the sample cover every record.
        let catalog = sample_catalog();
        let groups = pivot_groups(&catalog, BRAND, Metric::Count);
        let total: usize = groups.iter().map(|g| g.count).sum();
        assert_eq!(total, catalog.len());
    }

    #[test]
    fn pivot_empty_catalog_yields_no_groups() {
        let groups = pivot_groups(&[], BRAND, Metric::Count);
        assert!(groups.is_empty());
        assert_eq!(bar_percent(0.0, 0.0), 0.0);
    }

    #[test]
    fn bar_percent_scales_to_max() {
        assert_eq!(bar_percent(2.0, 4.0), 50.0);
        assert_eq!(bar_percent(4.0, 4.0), 100.0);
    }

    #[test]
    fn metric_formatting() {
        assert_eq!(Metric::Count.format(7.0), "7");
        assert_eq!(Metric::Value.format(6700000.4), "$6,700,000");
        assert_eq!(Metric::Purchase.format(45.5), "$46");
        assert_eq!(Metric::parse("value"), Metric::Value);
        assert_eq!(Metric::parse("purchase"), Metric::Purchase);
        assert_eq!(Metric::parse("anything"), Metric::Count);
    }

    #[test]
    fn parse_catalog_roundtrip_and_errors() {
        let body = r#"[{"Typewriter Brand": "Royal", "Pitch": 10}]"#;
        let catalog = parse_catalog(body).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].text(PITCH), "10");

        assert!(parse_catalog("{}").is_err());
        assert!(parse_catalog("not json").is_err());
    }

    #[test]
    fn column_labels_renamed() {
        assert_eq!(column_label("Typewriter Brand"), "Make");
        assert_eq!(column_label("Serial No"), "Serial");
        assert_eq!(column_label("Purchase Price"), "Purchase");
        assert_eq!(column_label("Typeface"), "Typeface");
    }
}
