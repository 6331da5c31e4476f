//! Разбор сообщения MT103 на блоки.

use std::io::Read;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::scan::{trim_end_spaces, Cursor};
use crate::text::TextBlock;
use crate::user_header::parser::scan_user_header;
use crate::user_header::UserHeader;

/// Сообщение MT103.
///
/// Разбор выполняется один раз при создании и никогда не завершается
/// ошибкой: если строка не соответствует структуре `{1:}{2:}{3:}{4:}{5:}`,
/// сообщение невалидно и все блоки пусты.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mt103Message {
    raw: String,
    basic_header: Option<String>,
    application_header: Option<String>,
    user_header: Option<UserHeader>,
    text: Option<TextBlock>,
    trailer: Option<String>,
    valid: bool,
}

/// Сырые блоки сообщения.
#[derive(Debug, Default, PartialEq, Eq)]
struct Blocks<'a> {
    basic_header: Option<&'a str>,
    application_header: Option<&'a str>,
    user_header: Option<&'a str>,
    text: Option<&'a str>,
    trailer: Option<&'a str>,
}

/// Проверка того, что с позиции начинается допустимый хвост сообщения:
/// конец строки или блок `{5:...}` до самого конца.
struct TailCheck<'a> {
    raw: &'a str,
    /// Последняя `}` перед завершающим символом строки.
    last_inner_close: Option<usize>,
}

impl<'a> TailCheck<'a> {
    fn new(raw: &'a str) -> Self {
        let bytes = raw.as_bytes();
        let last_inner_close = bytes
            .len()
            .checked_sub(1)
            .and_then(|last| bytes[..last].iter().rposition(|&b| b == b'}'));
        Self {
            raw,
            last_inner_close,
        }
    }

    fn accepts(&self, pos: usize) -> bool {
        let len = self.raw.len();
        if pos == len {
            return true;
        }

        let body = pos + 3;
        self.raw.as_bytes()[pos..].starts_with(b"{5:")
            && self.raw.ends_with('}')
            && body < len - 1
            && self.last_inner_close.map_or(true, |close| close < body)
    }
}

/// `{N:значение}`, где значение непусто и не содержит `}`.
fn plain_block<'a>(cursor: &mut Cursor<'a>, open: &str, lead: &str) -> Option<&'a str> {
    let mut probe = *cursor;
    probe.require(open)?;
    let start = probe.pos();
    probe.require(lead)?;
    probe.take_while1(|b| b != b'}')?;
    let value = probe.since(start);
    probe.require("}")?;
    *cursor = probe;
    Some(value)
}

/// `{3:...}` с содержимым по грамматике пользовательского заголовка.
fn user_header_block<'a>(cursor: &mut Cursor<'a>) -> Option<&'a str> {
    let mut probe = *cursor;
    probe.require("{3:")?;
    let start = probe.pos();
    scan_user_header(&mut probe);
    let value = probe.since(start);
    probe.require("}")?;
    *cursor = probe;
    Some(value)
}

/// `{4:...-}`.
///
/// Текст начинается после пробелов и заканчивается на первом `-}`, за
/// которым следует допустимый хвост сообщения. Текст не может быть пустым:
/// если между `{4:` и `-}` одни пробелы, текстом становится последний из них.
fn text_block<'a>(cursor: &mut Cursor<'a>, raw: &'a str, tail: &TailCheck<'_>) -> Option<&'a str> {
    let mut probe = *cursor;
    probe.require("{4:")?;
    let content_start = probe.pos();
    probe.skip_spaces();
    let start = probe.pos();

    let bytes = raw.as_bytes();
    let is_close = |pos: usize| bytes[pos..].starts_with(b"-}") && tail.accepts(pos + 2);

    let (text, close) = match (start + 1..bytes.len()).find(|&pos| is_close(pos)) {
        Some(close) => (trim_end_spaces(&raw[start..close]), close),
        None if start > content_start && is_close(start) => (&raw[start - 1..start], start),
        None => return None,
    };

    *cursor = Cursor::at(raw, close + 2);
    Some(text)
}

/// Разбивает сообщение на блоки; `None`, если строка не соответствует
/// структуре целиком.
fn split_blocks(raw: &str) -> Option<Blocks<'_>> {
    let tail = TailCheck::new(raw);
    let mut cursor = Cursor::new(raw);

    let blocks = Blocks {
        basic_header: plain_block(&mut cursor, "{1:", ""),
        application_header: plain_block(&mut cursor, "{2:", "I"),
        user_header: user_header_block(&mut cursor),
        text: text_block(&mut cursor, raw, &tail),
        trailer: plain_block(&mut cursor, "{5:", ""),
    };

    cursor.is_at_end().then_some(blocks)
}

impl Mt103Message {
    /// Разбирает сообщение из строки. Пробелы по краям отбрасываются.
    pub fn parse(message: &str) -> Self {
        let raw = message.trim();
        let mut parsed = Mt103Message {
            raw: raw.to_string(),
            ..Default::default()
        };

        if raw.is_empty() {
            return parsed;
        }

        let Some(blocks) = split_blocks(raw) else {
            tracing::debug!("Сообщение не соответствует структуре блоков MT103");
            return parsed;
        };

        parsed.valid = true;
        parsed.basic_header = blocks.basic_header.map(str::to_string);
        parsed.application_header = blocks.application_header.map(str::to_string);
        parsed.trailer = blocks.trailer.map(str::to_string);
        parsed.user_header = Some(UserHeader::parse(blocks.user_header.unwrap_or_default()));
        parsed.text = Some(TextBlock::parse(blocks.text.unwrap_or_default()));

        parsed
    }

    /// Отсутствующий ввод равносилен пустой строке.
    pub fn from_option(message: Option<&str>) -> Self {
        Self::parse(message.unwrap_or_default())
    }

    /// Читает и разбирает сообщение из любого источника, реализующего трейт Read.
    pub fn from_read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Ok(Self::parse(&content))
    }

    /// Сообщение без пробелов по краям.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// true, если строка целиком соответствует структуре блоков.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Базовый заголовок (блок 1).
    pub fn basic_header(&self) -> Option<&str> {
        self.basic_header.as_deref()
    }

    /// Заголовок приложения (блок 2), всегда начинается с `I`.
    pub fn application_header(&self) -> Option<&str> {
        self.application_header.as_deref()
    }

    /// Пользовательский заголовок (блок 3).
    ///
    /// Присутствует у любого валидного сообщения; если блока 3 не было,
    /// заголовок невалиден и его `raw` пуст.
    pub fn user_header(&self) -> Option<&UserHeader> {
        self.user_header.as_ref()
    }

    /// Текстовый блок (блок 4); присутствует у любого валидного сообщения.
    pub fn text(&self) -> Option<&TextBlock> {
        self.text.as_ref()
    }

    /// Трейлер (блок 5). Контрольные суммы не проверяются.
    pub fn trailer(&self) -> Option<&str> {
        self.trailer.as_deref()
    }
}

impl std::fmt::Display for Mt103Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Mt103Message {
    type Err = Error;

    /// Строгий вариант `parse`: невалидное сообщение превращается в ошибку.
    fn from_str(s: &str) -> Result<Self> {
        let message = Self::parse(s);
        if message.is_valid() {
            Ok(message)
        } else {
            Err(Error::InvalidFormat(
                "сообщение не соответствует структуре блоков MT103".to_string(),
            ))
        }
    }
}
