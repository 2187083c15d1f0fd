//! cardscan-ingest: rebuild statement tables from OCR fragments and parse them into transactions.

pub mod document;
pub mod header;
pub mod merge;
pub mod page;
pub mod parser;
pub mod rows;
pub mod table;
pub mod types;

pub use document::{
    DocumentAnalysis, DocumentAnalyzer, PageImage, TextRecognizer, assemble, correct_years,
    usable_elements,
};
pub use header::{StatementHeader, read_statement_header};
pub use merge::extract_transactions;
pub use page::PageAnalyzer;
pub use parser::{RowContext, bare_payment_method, parse_row};
pub use rows::{RowClustering, reconstruct_rows, rows_to_text};
pub use table::{TableBounds, find_table_bounds};
pub use types::RecognizedRow;
