//! Курсор для посимвольного разбора блоков сообщения.
//!
//! Все служебные символы формата (теги, скобки, пробелы) являются ASCII,
//! поэтому курсор работает с байтами, а срезы строки берёт только на
//! границах ASCII-символов либо на конце входа.

/// Пробельный символ грамматики (`\s` для ASCII).
pub(crate) fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Строка без завершающих пробельных символов грамматики.
pub(crate) fn trim_end_spaces(s: &str) -> &str {
    s.trim_end_matches(|c: char| c.is_ascii() && is_space(c as u8))
}

/// Символ ссылочного поля: не пробел и не двоеточие.
pub(crate) fn is_token(byte: u8) -> bool {
    !is_space(byte) && byte != b':'
}

/// Символ суммы: цифры и запятая.
pub(crate) fn is_amount(byte: u8) -> bool {
    byte.is_ascii_digit() || byte == b','
}

/// Заглавная латинская буква или цифра.
pub(crate) fn is_upper_alnum(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte.is_ascii_digit()
}

/// Курсор по строке с позицией в байтах.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Создает курсор в начале строки.
    pub(crate) fn new(src: &'a str) -> Self {
        Self::at(src, 0)
    }

    /// Создает курсор в заданной позиции.
    pub(crate) fn at(src: &'a str, pos: usize) -> Self {
        Self { src, pos }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn bytes(&self) -> &'a [u8] {
        &self.src.as_bytes()[self.pos..]
    }

    /// Проверяет, начинается ли остаток с `prefix`, не сдвигая курсор.
    pub(crate) fn starts_with(&self, prefix: &str) -> bool {
        self.bytes().starts_with(prefix.as_bytes())
    }

    /// Съедает `prefix`, если остаток с него начинается.
    pub(crate) fn eat(&mut self, prefix: &str) -> bool {
        if self.starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    /// Как `eat`, но для цепочек с `?`.
    pub(crate) fn require(&mut self, prefix: &str) -> Option<()> {
        self.eat(prefix).then_some(())
    }

    /// Срез от позиции `start` до текущей позиции.
    pub(crate) fn since(&self, start: usize) -> &'a str {
        &self.src[start..self.pos]
    }

    /// Съедает ровно `count` символов, удовлетворяющих `pred`.
    pub(crate) fn take_exact(&mut self, count: usize, pred: impl Fn(u8) -> bool) -> Option<&'a str> {
        let bytes = self.bytes();
        if bytes.len() < count || !bytes[..count].iter().all(|&b| pred(b)) {
            return None;
        }
        let start = self.pos;
        self.pos += count;
        Some(&self.src[start..self.pos])
    }

    /// Съедает до `max` символов, удовлетворяющих `pred` (жадно).
    pub(crate) fn take_while(&mut self, max: usize, pred: impl Fn(u8) -> bool) -> &'a str {
        let len = self
            .bytes()
            .iter()
            .take(max)
            .take_while(|&&b| pred(b))
            .count();
        let start = self.pos;
        self.pos += len;
        &self.src[start..self.pos]
    }

    /// Как `take_while`, но требует хотя бы один символ.
    pub(crate) fn take_while1(&mut self, pred: impl Fn(u8) -> bool) -> Option<&'a str> {
        let taken = self.take_while(usize::MAX, pred);
        (!taken.is_empty()).then_some(taken)
    }

    /// Пропускает пробельные символы.
    pub(crate) fn skip_spaces(&mut self) {
        self.take_while(usize::MAX, is_space);
    }
}
