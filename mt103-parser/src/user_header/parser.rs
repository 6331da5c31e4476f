//! Парсер пользовательского заголовка (блок 3).

use crate::scan::{is_upper_alnum, Cursor};
use crate::user_header::fields::UserHeaderField;

/// Пользовательский заголовок сообщения MT103.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserHeader {
    raw: String,
    bank_priority_code: Option<String>,
    message_user_reference: Option<String>,
    service_type_identifier: Option<String>,
    unique_end_to_end_transaction_reference: Option<String>,
    valid: bool,
}

/// Значения подблоков, найденные сканером.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct UserHeaderCaptures<'a> {
    pub bank_priority_code: Option<&'a str>,
    pub message_user_reference: Option<&'a str>,
    pub service_type_identifier: Option<&'a str>,
    pub unique_end_to_end_transaction_reference: Option<&'a str>,
}

/// Разбирает подблоки блока 3, начиная с позиции курсора.
///
/// Все подблоки необязательны, поэтому сканирование всегда успешно: курсор
/// останавливается перед первым символом, который грамматика не принимает.
/// Вызывающий решает, должен ли остаток быть пустым (отдельный заголовок)
/// или начинаться с `}` (блок внутри сообщения).
pub(crate) fn scan_user_header<'a>(cursor: &mut Cursor<'a>) -> UserHeaderCaptures<'a> {
    UserHeaderCaptures {
        bank_priority_code: sub_block(cursor, "{113:", |c| {
            c.take_exact(4, |b| b.is_ascii_uppercase())
        }),
        message_user_reference: sub_block(cursor, "{108:", |c| Some(c.take_while(16, is_upper_alnum))),
        service_type_identifier: sub_block(cursor, "{111:", |c| {
            c.take_exact(3, |b| b.is_ascii_digit())
        }),
        unique_end_to_end_transaction_reference: sub_block(cursor, "{121:", take_uetr),
    }
}

/// `{NNN:значение}`; курсор сдвигается только при полном совпадении.
fn sub_block<'a>(
    cursor: &mut Cursor<'a>,
    open: &str,
    body: impl FnOnce(&mut Cursor<'a>) -> Option<&'a str>,
) -> Option<&'a str> {
    let mut probe = *cursor;
    probe.require(open)?;
    let value = body(&mut probe)?;
    probe.require("}")?;
    *cursor = probe;
    Some(value)
}

/// UETR: `xxxxxxxx-xxxx-4xxx-[89ab]xxx-xxxxxxxxxxxx`.
fn take_uetr<'a>(cursor: &mut Cursor<'a>) -> Option<&'a str> {
    let alnum = |b: u8| b.is_ascii_alphanumeric();
    let start = cursor.pos();

    cursor.take_exact(8, alnum)?;
    cursor.require("-")?;
    cursor.take_exact(4, alnum)?;
    cursor.require("-4")?;
    cursor.take_exact(3, alnum)?;
    cursor.require("-")?;
    cursor.take_exact(1, |b| matches!(b, b'8' | b'9' | b'a' | b'b'))?;
    cursor.take_exact(3, alnum)?;
    cursor.require("-")?;
    cursor.take_exact(12, alnum)?;

    Some(cursor.since(start))
}

impl UserHeader {
    /// Разбирает содержимое блока 3.
    ///
    /// Пустая строка считается несовпадением: заголовок получается
    /// невалидным, все поля остаются пустыми.
    pub fn parse(raw: &str) -> Self {
        let mut header = UserHeader {
            raw: raw.to_string(),
            ..Default::default()
        };

        if raw.is_empty() {
            return header;
        }

        let mut cursor = Cursor::new(raw);
        let captures = scan_user_header(&mut cursor);

        if !cursor.is_at_end() {
            tracing::debug!(
                "Блок 3 не соответствует грамматике, позиция {}: {:?}",
                cursor.pos(),
                raw
            );
            return header;
        }

        header.valid = true;
        header.bank_priority_code = captures.bank_priority_code.map(str::to_string);
        header.message_user_reference = captures.message_user_reference.map(str::to_string);
        header.service_type_identifier = captures.service_type_identifier.map(str::to_string);
        header.unique_end_to_end_transaction_reference = captures
            .unique_end_to_end_transaction_reference
            .map(str::to_string);

        header
    }

    /// Исходное содержимое блока.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// true, если содержимое соответствует грамматике блока 3.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Код приоритета банка (`{113:}`).
    pub fn bank_priority_code(&self) -> Option<&str> {
        self.bank_priority_code.as_deref()
    }

    /// Пользовательский референс сообщения (`{108:}`).
    pub fn message_user_reference(&self) -> Option<&str> {
        self.message_user_reference.as_deref()
    }

    /// Идентификатор типа сервиса (`{111:}`).
    pub fn service_type_identifier(&self) -> Option<&str> {
        self.service_type_identifier.as_deref()
    }

    /// UETR (`{121:}`).
    pub fn unique_end_to_end_transaction_reference(&self) -> Option<&str> {
        self.unique_end_to_end_transaction_reference.as_deref()
    }

    pub fn bpc(&self) -> Option<&str> {
        self.bank_priority_code()
    }

    pub fn mur(&self) -> Option<&str> {
        self.message_user_reference()
    }

    pub fn sti(&self) -> Option<&str> {
        self.service_type_identifier()
    }

    pub fn uetr(&self) -> Option<&str> {
        self.unique_end_to_end_transaction_reference()
    }

    /// Значение поля по его идентификатору.
    pub fn get(&self, field: UserHeaderField) -> Option<&str> {
        match field {
            UserHeaderField::BankPriorityCode => self.bank_priority_code(),
            UserHeaderField::MessageUserReference => self.message_user_reference(),
            UserHeaderField::ServiceTypeIdentifier => self.service_type_identifier(),
            UserHeaderField::UniqueEndToEndTransactionReference => {
                self.unique_end_to_end_transaction_reference()
            }
        }
    }

    /// Все поля блока в порядке следования.
    pub fn fields(&self) -> impl Iterator<Item = (UserHeaderField, Option<&str>)> + '_ {
        UserHeaderField::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }
}

impl std::fmt::Display for UserHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UETR: &str = "d2d62e74-4f7d-45dc-a230-85fa259e1694";

    #[test]
    fn test_empty_is_invalid() {
        let header = UserHeader::parse("");
        assert!(!header.is_valid());
        assert_eq!(header.raw(), "");
        assert!(header.fields().all(|(_, value)| value.is_none()));
    }

    #[test]
    fn test_message_user_reference_only() {
        let header = UserHeader::parse("{108:MT103}");
        assert!(header.is_valid());
        assert_eq!(header.mur(), Some("MT103"));
        assert_eq!(header.bpc(), None);
        assert_eq!(header.sti(), None);
        assert_eq!(header.uetr(), None);
    }

    #[test]
    fn test_all_sub_blocks() {
        let raw = format!("{{113:SEPA}}{{108:ILOVEMT103}}{{111:001}}{{121:{}}}", UETR);
        let header = UserHeader::parse(&raw);
        assert!(header.is_valid());
        assert_eq!(header.bank_priority_code(), Some("SEPA"));
        assert_eq!(header.message_user_reference(), Some("ILOVEMT103"));
        assert_eq!(header.service_type_identifier(), Some("001"));
        assert_eq!(header.unique_end_to_end_transaction_reference(), Some(UETR));
        assert_eq!(header.to_string(), raw);
    }

    #[test]
    fn test_aliases_match_long_names() {
        let header = UserHeader::parse(&format!("{{113:SEPA}}{{111:001}}{{121:{}}}", UETR));
        assert_eq!(header.bpc(), header.bank_priority_code());
        assert_eq!(header.sti(), header.service_type_identifier());
        assert_eq!(header.uetr(), header.unique_end_to_end_transaction_reference());
        assert_eq!(header.mur(), None);
    }

    #[test]
    fn test_empty_message_user_reference_is_set() {
        let header = UserHeader::parse("{108:}");
        assert!(header.is_valid());
        assert_eq!(header.mur(), Some(""));
    }

    #[test]
    fn test_out_of_order_is_invalid() {
        let header = UserHeader::parse("{111:001}{113:SEPA}");
        assert!(!header.is_valid());
        assert_eq!(header.bpc(), None);
        assert_eq!(header.sti(), None);
    }

    #[test]
    fn test_field_constraints() {
        assert!(!UserHeader::parse("{113:sepa}").is_valid());
        assert!(!UserHeader::parse("{113:SEP}").is_valid());
        assert!(!UserHeader::parse("{108:ABCDEFGHIJKLMNOPQ}").is_valid());
        assert!(UserHeader::parse("{108:ABCDEFGHIJKLMNOP}").is_valid());
        assert!(!UserHeader::parse("{111:01}").is_valid());
        assert!(!UserHeader::parse("{111:0012}").is_valid());
    }

    #[test]
    fn test_uetr_version_and_variant() {
        assert!(UserHeader::parse(&format!("{{121:{}}}", UETR)).is_valid());
        // версия должна быть 4
        assert!(!UserHeader::parse("{121:d2d62e74-4f7d-55dc-a230-85fa259e1694}").is_valid());
        // вариант: 8, 9, a или b
        assert!(!UserHeader::parse("{121:d2d62e74-4f7d-45dc-c230-85fa259e1694}").is_valid());
        assert!(!UserHeader::parse("{121:d2d62e74-4f7d-45dc-A230-85fa259e1694}").is_valid());
        assert!(!UserHeader::parse("{121:d2d62e74-4f7d-45dc-a230-85fa259e169}").is_valid());
    }

    #[test]
    fn test_get_by_field() {
        let header = UserHeader::parse("{113:URGT}");
        assert_eq!(header.get(UserHeaderField::BankPriorityCode), Some("URGT"));
        assert_eq!(header.get(UserHeaderField::ServiceTypeIdentifier), None);
    }
}
