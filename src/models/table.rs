use chrono::NaiveDateTime;

/// One extracted time series: the points of a single terminal object,
/// named by its `type` field.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(NaiveDateTime, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    values: Vec<Option<f64>>,
}

/// The assembled query result: rows indexed by ascending timestamp, one
/// column per extracted series in discovery order.
///
/// Cells are `None` where a column supplied no value for a timestamp; the
/// outer join never drops or zero-fills.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    index: Vec<NaiveDateTime>,
    columns: Vec<Column>,
}

impl Table {
    /// Outer-joins the given series on timestamp.
    ///
    /// Column order follows the input order. Within one series a repeated
    /// timestamp keeps the last value.
    pub fn from_series(series: Vec<Series>) -> Self {
        let mut index: Vec<NaiveDateTime> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|(t, _)| *t))
            .collect();
        index.sort_unstable();
        index.dedup();

        let columns = series
            .into_iter()
            .map(|s| {
                let lookup: std::collections::HashMap<NaiveDateTime, f64> =
                    s.points.into_iter().collect();
                Column {
                    name: s.name,
                    values: index.iter().map(|t| lookup.get(t).copied()).collect(),
                }
            })
            .collect();

        Self { index, columns }
    }

    pub fn num_rows(&self) -> usize {
        self.index.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty() && self.columns.is_empty()
    }

    /// The sorted timestamp index.
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// Column names in discovery order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// The cells of one column, aligned with `index()`.
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// The cell at (timestamp, column), if both exist and the cell is filled.
    pub fn get(&self, timestamp: NaiveDateTime, name: &str) -> Option<f64> {
        let row = self.index.iter().position(|t| *t == timestamp)?;
        self.column(name)?[row]
    }

    /// Chronological row iteration: each item is the timestamp and the
    /// cells of every column at that timestamp, in column order.
    pub fn rows(&self) -> impl Iterator<Item = (NaiveDateTime, Vec<Option<f64>>)> + '_ {
        self.index.iter().enumerate().map(|(row, timestamp)| {
            (
                *timestamp,
                self.columns.iter().map(|c| c.values[row]).collect(),
            )
        })
    }
}
