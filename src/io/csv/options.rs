//! Options for CSV export and import.

use crate::error::{Error, Result};

/// Output compression for CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Plain delimited text (default).
    #[default]
    None,
    /// Gzip stream of comma-joined rows. Fields are not quoted or escaped.
    ///
    /// In a single-column table a null cell is written as a blank line.
    /// Import skips blank lines, so such rows are lost on a round trip;
    /// use plain output there.
    Gzip,
}

impl std::str::FromStr for Compression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" | "false" | "" => Ok(Compression::None),
            "gzip" | "gz" => Ok(Compression::Gzip),
            _ => Err(Error::InvalidInput(format!(
                "Invalid compression '{}'. Expected: none or gzip",
                s
            ))),
        }
    }
}

/// Type coercion applied when CSV text is read back into a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Converters {
    /// Keep every column as text.
    None,
    /// Columns whose cells all parse as integers become Int64.
    Integer,
    /// Columns whose cells all parse as floats become Float64.
    Float,
    /// Integer columns become Int64, other numeric columns Float64 (default).
    #[default]
    Numeric,
}

impl std::str::FromStr for Converters {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Converters::None),
            "integer" => Ok(Converters::Integer),
            "float" => Ok(Converters::Float),
            "numeric" => Ok(Converters::Numeric),
            _ => Err(Error::InvalidInput(format!(
                "Invalid converters '{}'. Expected: none, integer, float, or numeric",
                s
            ))),
        }
    }
}

/// When the CSV writer quotes fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// Quote only fields that need it (default).
    #[default]
    Necessary,
    /// Quote every field.
    Always,
    /// Quote every field that does not look like a number.
    NonNumeric,
    /// Never quote. Output may not be readable back.
    Never,
}

impl QuoteStyle {
    pub(crate) fn to_csv(self) -> csv::QuoteStyle {
        match self {
            QuoteStyle::Necessary => csv::QuoteStyle::Necessary,
            QuoteStyle::Always => csv::QuoteStyle::Always,
            QuoteStyle::NonNumeric => csv::QuoteStyle::NonNumeric,
            QuoteStyle::Never => csv::QuoteStyle::Never,
        }
    }
}

impl std::str::FromStr for QuoteStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "necessary" => Ok(QuoteStyle::Necessary),
            "always" => Ok(QuoteStyle::Always),
            "nonnumeric" => Ok(QuoteStyle::NonNumeric),
            "never" => Ok(QuoteStyle::Never),
            _ => Err(Error::InvalidInput(format!(
                "Invalid quote style '{}'. Expected: necessary, always, non_numeric, or never",
                s
            ))),
        }
    }
}

/// Row terminator for the CSV writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Terminator {
    /// `\n` (default).
    #[default]
    Lf,
    /// `\r\n`.
    Crlf,
}

/// Options for [`write_csv`](super::write_csv).
///
/// `delimiter`, `quote`, `quote_style`, `terminator`, `double_quote` and
/// `escape` are handed to the CSV encoder and only affect uncompressed
/// output. Gzip output always joins fields with a bare comma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExportOptions {
    /// Coercion for reading the file back. Writing is unaffected.
    pub converters: Converters,
    /// Output compression.
    pub compression: Compression,
    /// Write the column names as the first row.
    pub headers: bool,
    /// Replace every `.` with `,` in every cell before writing.
    pub convert_comma: bool,
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
    /// Quoting policy.
    pub quote_style: QuoteStyle,
    /// Row terminator.
    pub terminator: Terminator,
    /// Escape quotes by doubling them.
    pub double_quote: bool,
    /// Escape character used when `double_quote` is off.
    pub escape: u8,
}

impl Default for CsvExportOptions {
    fn default() -> Self {
        Self {
            converters: Converters::Numeric,
            compression: Compression::None,
            headers: true,
            convert_comma: false,
            delimiter: b',',
            quote: b'"',
            quote_style: QuoteStyle::Necessary,
            terminator: Terminator::Lf,
            double_quote: true,
            escape: b'"',
        }
    }
}

impl CsvExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_converters(mut self, converters: Converters) -> Self {
        self.converters = converters;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_headers(mut self, headers: bool) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_convert_comma(mut self, convert_comma: bool) -> Self {
        self.convert_comma = convert_comma;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_quote_style(mut self, quote_style: QuoteStyle) -> Self {
        self.quote_style = quote_style;
        self
    }

    pub fn with_terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn with_double_quote(mut self, double_quote: bool) -> Self {
        self.double_quote = double_quote;
        self
    }

    pub fn with_escape(mut self, escape: u8) -> Self {
        self.escape = escape;
        self
    }

    /// Options for reading a file written with these options.
    pub fn read_options(&self) -> CsvReadOptions {
        CsvReadOptions {
            converters: self.converters,
            headers: self.headers,
            delimiter: match self.compression {
                Compression::Gzip => b',',
                Compression::None => self.delimiter,
            },
            quote: self.quote,
        }
    }

    pub(crate) fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .quote_style(self.quote_style.to_csv())
            .double_quote(self.double_quote)
            .escape(self.escape)
            .terminator(match self.terminator {
                Terminator::Lf => csv::Terminator::Any(b'\n'),
                Terminator::Crlf => csv::Terminator::CRLF,
            });
        builder
    }
}

/// Options for [`read_csv`](super::read_csv).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReadOptions {
    /// Type coercion for columns.
    pub converters: Converters,
    /// Treat the first row as column names.
    pub headers: bool,
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            converters: Converters::Numeric,
            headers: true,
            delimiter: b',',
            quote: b'"',
        }
    }
}

impl CsvReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_converters(mut self, converters: Converters) -> Self {
        self.converters = converters;
        self
    }

    pub fn with_headers(mut self, headers: bool) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_export_defaults() {
        let options = CsvExportOptions::default();
        assert_eq!(options.converters, Converters::Numeric);
        assert_eq!(options.compression, Compression::None);
        assert!(options.headers);
        assert!(!options.convert_comma);
        assert_eq!(options.delimiter, b',');
    }

    #[test]
    fn test_compression_from_str() {
        assert_eq!(Compression::from_str("gzip").unwrap(), Compression::Gzip);
        assert_eq!(Compression::from_str("GZIP").unwrap(), Compression::Gzip);
        assert_eq!(Compression::from_str("none").unwrap(), Compression::None);
        assert_eq!(Compression::from_str("false").unwrap(), Compression::None);
        assert!(Compression::from_str("zstd").is_err());
    }

    #[test]
    fn test_converters_from_str() {
        assert_eq!(Converters::from_str("numeric").unwrap(), Converters::Numeric);
        assert_eq!(Converters::from_str("Integer").unwrap(), Converters::Integer);
        assert_eq!(Converters::from_str("FLOAT").unwrap(), Converters::Float);
        assert_eq!(Converters::from_str("none").unwrap(), Converters::None);
        assert!(Converters::from_str("date").is_err());
    }

    #[test]
    fn test_quote_style_from_str() {
        assert_eq!(QuoteStyle::from_str("non_numeric").unwrap(), QuoteStyle::NonNumeric);
        assert_eq!(QuoteStyle::from_str("non-numeric").unwrap(), QuoteStyle::NonNumeric);
        assert_eq!(QuoteStyle::from_str("ALWAYS").unwrap(), QuoteStyle::Always);
        assert!(QuoteStyle::from_str("sometimes").is_err());
    }

    #[test]
    fn test_read_options_follow_export() {
        let export = CsvExportOptions::new()
            .with_headers(false)
            .with_delimiter(b';')
            .with_converters(Converters::None);
        let read = export.read_options();
        assert!(!read.headers);
        assert_eq!(read.delimiter, b';');
        assert_eq!(read.converters, Converters::None);

        let gzip = export.with_compression(Compression::Gzip).read_options();
        assert_eq!(gzip.delimiter, b',');
    }
}
