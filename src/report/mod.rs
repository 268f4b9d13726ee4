pub mod formatter;

pub use formatter::ErrorFormatter;
