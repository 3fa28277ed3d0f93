//! Shared SQL helpers for the Diesel adapters.

use diesel::sql_types::Text;

diesel::define_sql_function! {
    /// SQL `lower()`, used for case-insensitive name comparisons.
    fn lower(value: Text) -> Text;
}
