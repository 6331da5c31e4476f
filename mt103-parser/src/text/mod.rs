//! Модуль разбора текстового блока (блок 4).
//!
//! Текстовый блок MT103 состоит из необязательных полей вида `:NNa:значение`,
//! которые идут в строго фиксированном порядке.

pub mod fields;
pub mod parser;

pub use fields::TextField;
pub use parser::TextBlock;
