//! CSV Data Loader Module
//! Reads the avocado sales CSV with Polars and converts it to a typed, date-sorted dataset.

use super::dataset::{Dataset, Record};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Format of the `Date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_COL: &str = "Date";
const REGION_COL: &str = "region";
const TYPE_COL: &str = "type";
const PRICE_COL: &str = "AveragePrice";
const VOLUME_COL: &str = "Total Volume";

const REQUIRED_COLUMNS: [&str; 5] = [DATE_COL, REGION_COL, TYPE_COL, PRICE_COL, VOLUME_COL];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Data file not found: {0}")]
    FileNotFound(String),
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Invalid date {value:?} on row {row}")]
    InvalidDate { row: usize, value: String },
    #[error("Missing value in column '{column}' on row {row}")]
    MissingValue { row: usize, column: String },
}

/// Loads the sales table once at startup.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file into a [`Dataset`]. Any malformed row fails the whole load.
    pub fn load_csv(file_path: &Path) -> Result<Dataset, LoaderError> {
        if !file_path.exists() {
            return Err(LoaderError::FileNotFound(file_path.display().to_string()));
        }

        debug!(path = %file_path.display(), "reading csv");
        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        let dataset = Dataset::from_records(Self::records_from_frame(&df)?);

        match dataset.date_bounds() {
            Some((first, last)) => info!(
                rows = dataset.len(),
                regions = dataset.regions().len(),
                %first,
                %last,
                "dataset loaded"
            ),
            None => info!("dataset loaded with no rows"),
        }

        Ok(dataset)
    }

    /// Convert a raw DataFrame into records, validating every required cell.
    pub fn records_from_frame(df: &DataFrame) -> Result<Vec<Record>, LoaderError> {
        Self::require_columns(df)?;

        let dates = Self::string_values(df, DATE_COL)?;
        let regions = Self::string_values(df, REGION_COL)?;
        let types = Self::string_values(df, TYPE_COL)?;
        let prices = Self::float_values(df, PRICE_COL)?;
        let volumes = Self::float_values(df, VOLUME_COL)?;

        let mut records = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            // 1-based row number as seen in a spreadsheet, excluding the header
            let row = i + 1;
            let missing = |column: &str| LoaderError::MissingValue {
                row,
                column: column.to_string(),
            };

            let raw_date = dates[i].as_deref().ok_or_else(|| missing(DATE_COL))?;
            let date = NaiveDate::parse_from_str(raw_date.trim(), DATE_FORMAT).map_err(|_| {
                LoaderError::InvalidDate {
                    row,
                    value: raw_date.to_string(),
                }
            })?;

            records.push(Record {
                date,
                region: regions[i].clone().ok_or_else(|| missing(REGION_COL))?,
                avocado_type: types[i].clone().ok_or_else(|| missing(TYPE_COL))?,
                average_price: prices[i].ok_or_else(|| missing(PRICE_COL))?,
                total_volume: volumes[i].ok_or_else(|| missing(VOLUME_COL))?,
            });
        }

        Ok(records)
    }

    fn require_columns(df: &DataFrame) -> Result<(), LoaderError> {
        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        match REQUIRED_COLUMNS
            .iter()
            .find(|name| !present.iter().any(|p| p == *name))
        {
            Some(name) => Err(LoaderError::MissingColumn(name.to_string())),
            None => Ok(()),
        }
    }

    fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
        let column = df.column(name)?.cast(&DataType::String)?;
        Ok(column
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect())
    }

    fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoaderError> {
        let column = df.column(name)?.cast(&DataType::Float64)?;
        Ok(column
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Date,AveragePrice,Total Volume,4046,type,year,region";

    fn write_csv(body: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        write!(file, "{}", body).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_sorts_rows_by_date() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             2015-01-11,1.60,1200.0,10.0,organic,2015,Albany\n\
             2015-01-04,1.50,1000.0,10.0,organic,2015,Albany\n\
             2015-01-04,1.10,5000.0,10.0,conventional,2015,Albany\n"
        ));

        let ds = DataLoader::load_csv(file.path()).unwrap();

        assert_eq!(ds.len(), 3);
        let dates: Vec<String> = ds.records().iter().map(|r| r.date.to_string()).collect();
        assert_eq!(dates, vec!["2015-01-04", "2015-01-04", "2015-01-11"]);
        assert_eq!(ds.records()[0].average_price, 1.50);
        assert_eq!(ds.records()[1].avocado_type, "conventional");
        assert_eq!(ds.records()[2].total_volume, 1200.0);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result = DataLoader::load_csv(Path::new("definitely/not/here.csv"));
        assert!(matches!(result, Err(LoaderError::FileNotFound(_))));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let file = write_csv("Date,AveragePrice,type,region\n2015-01-04,1.5,organic,Albany\n");

        let result = DataLoader::load_csv(file.path());
        match result {
            Err(LoaderError::MissingColumn(col)) => assert_eq!(col, "Total Volume"),
            other => panic!("expected missing column, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_date_is_fatal() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             2015-01-04,1.50,1000.0,10.0,organic,2015,Albany\n\
             04/01/2015,1.50,1000.0,10.0,organic,2015,Albany\n"
        ));

        let result = DataLoader::load_csv(file.path());
        match result {
            Err(LoaderError::InvalidDate { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "04/01/2015");
            }
            other => panic!("expected invalid date, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_price_cell_is_fatal() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             2015-01-04,1.50,1000.0,10.0,organic,2015,Albany\n\
             2015-01-11,,1200.0,10.0,organic,2015,Albany\n"
        ));

        let result = DataLoader::load_csv(file.path());
        match result {
            Err(LoaderError::MissingValue { row, column }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "AveragePrice");
            }
            other => panic!("expected missing value, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_volume_is_fatal() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             2015-01-04,1.50,1000.0,10.0,organic,2015,Albany\n\
             2015-01-11,1.60,abc,10.0,organic,2015,Albany\n"
        ));

        let result = DataLoader::load_csv(file.path());
        match result {
            Err(LoaderError::MissingValue { row, column }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "Total Volume");
            }
            other => panic!("expected missing value, got {:?}", other),
        }
    }
}
