mod date;
mod decimal;
mod symbol;
mod timestamp;

pub use date::Date;
pub use decimal::Decimal;
pub use symbol::Symbol;
pub use timestamp::Timestamp;
