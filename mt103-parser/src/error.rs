//! Модуль обработки ошибок библиотеки.
//!
//! Сам разбор сообщения никогда не завершается ошибкой: результат всегда
//! строится, а неуспех выражается флагом валидности. Ошибки возникают только
//! на границах: при чтении входных данных и в строгом `FromStr`.

use thiserror::Error;

/// Основной тип ошибки библиотеки.
#[derive(Debug, Error)]
pub enum Error {
    /// Ошибка ввода/вывода
    #[error("Ошибка ввода/вывода: {0}")]
    Io(#[from] std::io::Error),
    /// Сообщение не соответствует формату MT103
    #[error("Неверный формат: {0}")]
    InvalidFormat(String),
}

/// Тип Result с ошибкой библиотеки.
pub type Result<T> = std::result::Result<T, Error>;
