use std::collections::HashMap;

use crate::{Bar, Error, Indicator, IndicatorOutput, Ohlcv, Price, Result, Series, Timestamp};

/// Names of the timestamp and OHLC columns in a [`Frame`].
///
/// Defaults: `Time`, `Open`, `High`, `Low`, `Close`.
///
/// # Example
///
/// ```
/// use quantedge_batch::ColumnLabels;
///
/// let labels = ColumnLabels::default().with_time("Date").with_close("Adj Close");
///
/// assert_eq!(labels.time(), "Date");
/// assert_eq!(labels.open(), "Open");
/// assert_eq!(labels.close(), "Adj Close");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnLabels {
    time: String,
    open: String,
    high: String,
    low: String,
    close: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            time: "Time".into(),
            open: "Open".into(),
            high: "High".into(),
            low: "Low".into(),
            close: "Close".into(),
        }
    }
}

impl ColumnLabels {
    #[must_use]
    pub fn with_time(mut self, label: impl Into<String>) -> Self {
        self.time = label.into();
        self
    }

    #[must_use]
    pub fn with_open(mut self, label: impl Into<String>) -> Self {
        self.open = label.into();
        self
    }

    #[must_use]
    pub fn with_high(mut self, label: impl Into<String>) -> Self {
        self.high = label.into();
        self
    }

    #[must_use]
    pub fn with_low(mut self, label: impl Into<String>) -> Self {
        self.low = label.into();
        self
    }

    #[must_use]
    pub fn with_close(mut self, label: impl Into<String>) -> Self {
        self.close = label.into();
        self
    }

    #[must_use]
    pub fn time(&self) -> &str {
        &self.time
    }

    #[must_use]
    pub fn open(&self) -> &str {
        &self.open
    }

    #[must_use]
    pub fn high(&self) -> &str {
        &self.high
    }

    #[must_use]
    pub fn low(&self) -> &str {
        &self.low
    }

    #[must_use]
    pub fn close(&self) -> &str {
        &self.close
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    cells: Vec<Option<Price>>,
}

/// In-memory table of bars: one timestamp index plus named price columns.
///
/// Cells are `Option<Price>`; `None` marks an undefined value, such as an
/// indicator row still in warm-up. Indicators are appended as new columns,
/// left-joined onto the index by timestamp.
///
/// # Example
///
/// ```
/// use quantedge_batch::{Bar, ColumnLabels, Frame, Rsi, RsiConfig};
/// use std::num::NonZero;
///
/// let bars: Vec<Bar> = [1.0, 1.1, 1.05, 1.2]
///     .iter()
///     .zip(1..)
///     .map(|(&c, t)| Bar::new(c, c, c, c).at(t))
///     .collect();
///
/// let labels = ColumnLabels::default();
/// let mut frame = Frame::from_bars(&bars, &labels);
///
/// let rsi = Rsi::new(RsiConfig::close(NonZero::new(2).unwrap()));
/// frame.append(&rsi, &labels).unwrap();
///
/// let column = frame.column("RSI").unwrap();
/// assert_eq!(column.len(), 4);
/// assert!(column[1].is_none());
/// assert!((column[3].unwrap() - 75.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    index_label: String,
    index: Vec<Timestamp>,
    columns: Vec<Column>,
}

impl Frame {
    /// Creates a frame with only a timestamp index.
    #[must_use]
    pub fn new(index_label: impl Into<String>, index: Vec<Timestamp>) -> Self {
        Self {
            index_label: index_label.into(),
            index,
            columns: Vec::new(),
        }
    }

    /// Builds a frame with the index and OHLC columns named by `labels`.
    #[must_use]
    pub fn from_bars<B: Ohlcv>(bars: &[B], labels: &ColumnLabels) -> Self {
        let column = |name: &str, price: fn(&B) -> Price| Column {
            name: name.to_owned(),
            cells: bars.iter().map(|bar| Some(price(bar))).collect(),
        };

        Self {
            index_label: labels.time.clone(),
            index: bars.iter().map(Ohlcv::open_time).collect(),
            columns: vec![
                column(&labels.open, B::open),
                column(&labels.high, B::high),
                column(&labels.low, B::low),
                column(&labels.close, B::close),
            ],
        }
    }

    /// Adds a column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnLength`] when `cells` doesn't have one entry per
    /// index row, or [`Error::DuplicateColumn`] when the name is taken.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        cells: Vec<Option<Price>>,
    ) -> Result<Self> {
        let name = name.into();

        if cells.len() != self.index.len() {
            return Err(Error::ColumnLength {
                name,
                expected: self.index.len(),
                actual: cells.len(),
            });
        }
        self.ensure_free(&name)?;

        self.columns.push(Column { name, cells });
        Ok(self)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Name of the timestamp column.
    #[must_use]
    pub fn index_label(&self) -> &str {
        &self.index_label
    }

    /// Timestamps in row order.
    #[must_use]
    pub fn index(&self) -> &[Timestamp] {
        &self.index
    }

    /// Cells of the column called `name`.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Option<Price>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.cells.as_slice())
    }

    /// Names of the price columns in insertion order (excluding the index).
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Reads the OHLC columns named by `labels` into bars.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] when a labelled column (or the index
    /// label) doesn't match the frame, and [`Error::MissingValue`] when an
    /// OHLC cell is undefined.
    pub fn bars(&self, labels: &ColumnLabels) -> Result<Vec<Bar>> {
        if labels.time != self.index_label {
            return Err(Error::MissingColumn {
                name: labels.time.clone(),
            });
        }

        let open = self.required(&labels.open)?;
        let high = self.required(&labels.high)?;
        let low = self.required(&labels.low)?;
        let close = self.required(&labels.close)?;

        self.index
            .iter()
            .enumerate()
            .map(|(row, &open_time)| {
                Ok(Bar {
                    open_time,
                    open: open.cell(row)?,
                    high: high.cell(row)?,
                    low: low.cell(row)?,
                    close: close.cell(row)?,
                })
            })
            .collect()
    }

    /// Computes `indicator` over the labelled OHLC columns and appends its
    /// output columns.
    ///
    /// The frame is left untouched when an error is returned.
    ///
    /// # Errors
    ///
    /// Fails when the OHLC columns can't be read (see [`bars`](Self::bars)),
    /// when timestamps are unsorted or duplicated, or when an output column
    /// name is already taken.
    pub fn append<I: Indicator>(&mut self, indicator: &I, labels: &ColumnLabels) -> Result<()> {
        for name in I::COLUMNS {
            self.ensure_free(name)?;
        }

        let bars = self.bars(labels)?;
        let series = indicator.compute(&bars)?;

        tracing::debug!(
            indicator = %indicator,
            rows = series.len(),
            warm_up = series.warm_up(),
            columns = ?I::COLUMNS,
            "appending indicator"
        );

        self.join(I::COLUMNS, &series)
    }

    /// Left-joins `series` onto the index by timestamp.
    ///
    /// Output column `i` is named `names[i]` and filled from
    /// [`IndicatorOutput::cell`]`(i)`. Index rows with no matching timestamp
    /// in `series` get `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateColumn`] when a name is taken or repeated in
    /// `names`, or [`Error::DuplicateTimestamp`] when `series` repeats a
    /// timestamp and the join key is ambiguous.
    pub fn join<T: IndicatorOutput>(&mut self, names: &[&str], series: &Series<T>) -> Result<()> {
        for (position, name) in names.iter().enumerate() {
            if names[..position].contains(name) {
                return Err(Error::DuplicateColumn {
                    name: (*name).to_owned(),
                });
            }
            self.ensure_free(name)?;
        }

        let mut by_time = HashMap::with_capacity(series.len());
        for (index, (timestamp, value)) in series.iter().enumerate() {
            if by_time.insert(timestamp, value.copied()).is_some() {
                return Err(Error::DuplicateTimestamp { index, timestamp });
            }
        }

        let rows: Vec<Option<T>> = self
            .index
            .iter()
            .map(|t| by_time.get(t).copied().flatten())
            .collect();

        self.columns
            .extend(names.iter().enumerate().map(|(column, name)| Column {
                name: (*name).to_owned(),
                cells: rows
                    .iter()
                    .map(|&row| row.and_then(|value| value.cell(column)))
                    .collect(),
            }));

        Ok(())
    }

    fn ensure_free(&self, name: &str) -> Result<()> {
        if name == self.index_label || self.column(name).is_some() {
            return Err(Error::DuplicateColumn {
                name: name.to_owned(),
            });
        }
        Ok(())
    }

    fn required(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::MissingColumn {
                name: name.to_owned(),
            })
    }
}

impl Column {
    fn cell(&self, row: usize) -> Result<Price> {
        self.cells[row].ok_or_else(|| Error::MissingValue {
            column: self.name.clone(),
            row,
        })
    }
}
