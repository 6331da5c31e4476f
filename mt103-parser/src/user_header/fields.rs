//! Именованные поля пользовательского заголовка.

/// Поле блока 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserHeaderField {
    /// Код приоритета банка (`{113:}`).
    BankPriorityCode,
    /// Пользовательский референс сообщения (`{108:}`).
    MessageUserReference,
    /// Идентификатор типа сервиса (`{111:}`).
    ServiceTypeIdentifier,
    /// UETR (`{121:}`).
    UniqueEndToEndTransactionReference,
}

impl UserHeaderField {
    /// Все поля в порядке следования в блоке.
    pub const ALL: [UserHeaderField; 4] = [
        UserHeaderField::BankPriorityCode,
        UserHeaderField::MessageUserReference,
        UserHeaderField::ServiceTypeIdentifier,
        UserHeaderField::UniqueEndToEndTransactionReference,
    ];

    /// Полное имя поля.
    pub fn name(self) -> &'static str {
        match self {
            UserHeaderField::BankPriorityCode => "bank_priority_code",
            UserHeaderField::MessageUserReference => "message_user_reference",
            UserHeaderField::ServiceTypeIdentifier => "service_type_identifier",
            UserHeaderField::UniqueEndToEndTransactionReference => {
                "unique_end_to_end_transaction_reference"
            }
        }
    }

    /// Короткое имя поля.
    pub fn alias(self) -> &'static str {
        match self {
            UserHeaderField::BankPriorityCode => "bpc",
            UserHeaderField::MessageUserReference => "mur",
            UserHeaderField::ServiceTypeIdentifier => "sti",
            UserHeaderField::UniqueEndToEndTransactionReference => "uetr",
        }
    }

    /// Номер тега подблока.
    pub fn tag(self) -> &'static str {
        match self {
            UserHeaderField::BankPriorityCode => "113",
            UserHeaderField::MessageUserReference => "108",
            UserHeaderField::ServiceTypeIdentifier => "111",
            UserHeaderField::UniqueEndToEndTransactionReference => "121",
        }
    }
}

impl std::fmt::Display for UserHeaderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for UserHeaderField {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.to_lowercase();
        UserHeaderField::ALL
            .into_iter()
            .find(|field| field.name() == s || field.alias() == s || field.tag() == s)
            .ok_or(())
    }
}
