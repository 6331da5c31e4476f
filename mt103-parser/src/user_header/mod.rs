//! Модуль разбора пользовательского заголовка (блок 3).
//!
//! Блок 3 содержит необязательные подблоки `{113:}`, `{108:}`, `{111:}`
//! и `{121:}` в фиксированном порядке.

pub mod fields;
pub mod parser;

pub use fields::UserHeaderField;
pub use parser::UserHeader;
