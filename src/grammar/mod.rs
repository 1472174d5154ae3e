//! Filter grammars: each turns one user-supplied filter string into a [`Predicate`].
//!
//! All three share the same outer shape: comma-separated tokens, each parsed
//! on its own. Numeric and year tokens are OR'd and reject anything they do
//! not recognise; text terms combine into AND/OR groups and never fail.
//!
//! [`Predicate`]: crate::filter::Predicate

pub mod numeric;
pub mod text;
pub mod year;

pub use numeric::compile_numeric_filter;
pub use text::compile_text_filter;
pub use year::compile_year_filter;
