//! Модуль разбора сообщения MT103 на блоки.
//!
//! Сообщение состоит из необязательных блоков `{1:}` - `{5:}` в фиксированном
//! порядке. Блоки 3 и 4 разбираются дальше соответствующими модулями.

pub mod parser;

pub use parser::Mt103Message;
