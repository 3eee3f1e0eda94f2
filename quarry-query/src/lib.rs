mod cursor;
mod ident;
mod validate;
mod where_clause;

pub use cursor::{decode_cursor, encode_cursor, unquote_plus};
pub use ident::{bracket_escape_for_pragma, is_boring_identifier, quote_ident};
pub use validate::validate_sql_select;
pub use where_clause::{build_where_clauses, Param};
