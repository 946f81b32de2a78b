pub mod delimited;
pub mod excel_read;
pub mod http;
pub mod listing;
