//! # MT103 Parser
//!
//! Библиотека для разбора сообщений SWIFT MT103 (одиночный клиентский
//! перевод) в структурированное представление.
//!
//! ## Структура сообщения
//!
//! - **Блок 1** - базовый заголовок
//! - **Блок 2** - заголовок приложения (входящее сообщение, начинается с `I`)
//! - **Блок 3** - пользовательский заголовок: приоритет, референс, тип сервиса, UETR
//! - **Блок 4** - текстовый блок с полями `:20:` ... `:77A:`
//! - **Блок 5** - трейлер
//!
//! Разбор никогда не завершается ошибкой: результат всегда строится, а
//! несоответствие формату выражается флагом `is_valid()` и пустыми полями.
//!
//! ## Пример использования
//!
//! ```rust
//! use mt103_parser::Mt103Message;
//!
//! let message = Mt103Message::parse(
//!     "{1:F01ASDFJK20AXXX0987654321}{2:I103ASDFJK22XXXXN}{4: :20:20180101-ABCDEF :23B:GHIJ :32A:180117CAD5432,1 -}",
//! );
//! assert!(message.is_valid());
//!
//! let text = message.text().unwrap();
//! assert_eq!(text.transaction_reference(), Some("20180101-ABCDEF"));
//! assert_eq!(text.interbank_settled_currency(), Some("CAD"));
//! ```

pub mod error;
pub mod message;
pub mod text;
pub mod user_header;

mod scan;

pub use error::{Error, Result};
pub use message::Mt103Message;
pub use text::{TextBlock, TextField};
pub use user_header::{UserHeader, UserHeaderField};

/// Разбирает сообщение MT103 из строки.
pub fn parse_message(content: &str) -> Mt103Message {
    Mt103Message::parse(content)
}
