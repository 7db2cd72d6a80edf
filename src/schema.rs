use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One customer/period balance record from the aging ledger, as parsed by
/// the presentation layer. The engine never performs file IO; it accepts an
/// already-typed row collection and re-derives provisions on every load.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LedgerRow {
    #[schemars(description = "Accounting period anchor for the row (the 'Fecha' column)")]
    pub as_of_date: NaiveDate,

    #[schemars(description = "Customer identifier (the 'Infor Code' column)")]
    pub customer_id: String,

    #[schemars(description = "Customer display name (the 'Customer' column)")]
    pub customer_name: String,

    #[schemars(description = "Balance not yet overdue")]
    pub current: Option<f64>,

    #[schemars(description = "Balance overdue by 1-90 days")]
    pub bucket_1_90: Option<f64>,

    #[schemars(description = "Balance overdue by 91-180 days")]
    pub bucket_91_180: Option<f64>,

    #[schemars(description = "Balance overdue by 181-270 days")]
    pub bucket_181_270: Option<f64>,

    #[schemars(description = "Balance overdue by 271-360 days")]
    pub bucket_271_360: Option<f64>,

    #[schemars(description = "Balance overdue by more than 360 days")]
    pub bucket_over_360: Option<f64>,

    #[schemars(description = "Total outstanding balance (the 'TOTAL' column)")]
    pub total_balance: Option<f64>,
}

impl LedgerRow {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(LedgerRow)
    }

    /// JSON schema the presentation layer can validate parsed spreadsheets
    /// against before handing rows to the engine.
    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// A single typed cell from the write-off sheet. Cells are typed, columns
/// are not: which column holds the date, amount, or customer varies between
/// source spreadsheets and is resolved heuristically per load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase", tag = "kind", content = "value")]
pub enum Cell {
    Date(NaiveDate),
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Numeric view of the cell; anything non-numeric coerces to 0.
    pub fn as_amount(&self) -> f64 {
        match self {
            Cell::Number(n) if n.is_finite() => *n,
            _ => 0.0,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Text view of the cell. Non-text cells are coerced to their string
    /// form so identifier heuristics can still run against them.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Date(d) => Some(d.to_string()),
            Cell::Empty => None,
        }
    }
}

/// One write-off transaction row: a positional list of cells matching the
/// sheet's declared column sequence.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WriteOffRecord {
    pub cells: Vec<Cell>,
}

static EMPTY_CELL: Cell = Cell::Empty;

impl WriteOffRecord {
    /// Positional access; a short row reads as empty cells past its end.
    pub fn cell(&self, index: usize) -> &Cell {
        self.cells.get(index).unwrap_or(&EMPTY_CELL)
    }
}

/// The optional write-off ledger: declared column names plus positional
/// rows. Never provisioned, never mutated; filtered per query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WriteOffSheet {
    #[schemars(description = "Column names in declared order, used for heuristic resolution")]
    pub columns: Vec<String>,

    pub rows: Vec<WriteOffRecord>,
}

impl WriteOffSheet {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(WriteOffSheet)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
