//! cardscan-core: types and text rules for reading card statements out of OCR output

pub mod amount;
pub mod config;
pub mod correction;
pub mod currency;
pub mod dates;
pub mod error;
pub mod geometry;
pub mod payment_method;
pub mod transaction;

pub use amount::{StatementAmount, format_grouped, is_amount, parse_amount, parse_plain_number};
pub use config::{DEFAULT_ROW_THRESHOLD_FACTOR, ScanConfig};
pub use correction::{correct_date_text, correct_merchant_name};
pub use currency::{DEFAULT_HOME_CURRENCY, is_currency_code};
pub use dates::{DateResolver, DayMonth, extract_day_months, parse_full_date, realign_year, today_in};
pub use error::{Result, ScanError};
pub use geometry::{BoundingBox, OcrObservation, RecognizedElement};
pub use payment_method::{PaymentMethod, classify, keyword_method};
pub use transaction::{ParsedTransaction, RewardInput, StatementAnalysisResult};
