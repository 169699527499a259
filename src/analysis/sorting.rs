use std::cmp::Ordering;

/// A typed table cell. Sorting and formatting both work off this, so the
/// rendered text is never parsed back.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(u32),
    Number(f64),
    /// A fraction in [0, 1], shown as a percentage.
    Percent(f64),
    Text(String),
    Missing,
}

impl CellValue {
    pub fn text(value: Option<&String>) -> Self {
        value.map_or(CellValue::Missing, |s| CellValue::Text(s.clone()))
    }

    pub fn integer(value: Option<u32>) -> Self {
        value.map_or(CellValue::Missing, CellValue::Integer)
    }

    pub fn number(value: Option<f64>) -> Self {
        value.map_or(CellValue::Missing, CellValue::Number)
    }

    pub fn percent(value: Option<f64>) -> Self {
        value.map_or(CellValue::Missing, CellValue::Percent)
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Integer(n) => Some(f64::from(*n)),
            CellValue::Number(n) | CellValue::Percent(n) => Some(*n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }

    pub fn aria(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

/// Ascending order of two cells. Missing values go last, numbers compare by
/// value, text compares by collation key.
pub fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Missing, CellValue::Missing) => Ordering::Equal,
        (CellValue::Missing, _) => Ordering::Greater,
        (_, CellValue::Missing) => Ordering::Less,
        (CellValue::Text(x), CellValue::Text(y)) => compare_text(x, y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            // mixed text and number in one column: numbers first
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// Portuguese-friendly collation: case and accents are ignored first, the
/// raw text breaks ties.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(fold_accent)
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Stable sort of `rows` by the cell `cell_of` extracts. Rows with equal keys
/// keep their current relative order in both directions.
pub fn sort_rows<T, F>(rows: &mut [T], direction: SortDirection, cell_of: F)
where
    F: Fn(&T) -> CellValue,
{
    rows.sort_by(|a, b| {
        let ord = compare_cells(&cell_of(a), &cell_of(b));
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}
