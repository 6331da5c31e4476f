//! Парсер текстового блока MT103.

use std::borrow::Cow;

use chrono::NaiveDate;

use crate::scan::{is_amount, is_token, trim_end_spaces, Cursor};
use crate::text::fields::TextField;

/// Синтаксис значения поля блока 4.
#[derive(Debug, Clone, Copy)]
enum Syntax {
    /// Последовательность без пробелов и двоеточий.
    Token { field: TextField, allow_empty: bool },
    /// Необязательная дата YYMMDD, валюта из трех букв и сумма из цифр и запятых.
    Money {
        dated: bool,
        currency: TextField,
        amount: TextField,
    },
    /// Свободный текст до следующего тега или конца блока.
    FreeText(TextField),
}

impl Syntax {
    fn tags(self) -> &'static [&'static str] {
        match self {
            Syntax::Token { field, .. } | Syntax::FreeText(field) => field.tags(),
            Syntax::Money { currency, .. } => currency.tags(),
        }
    }
}

/// Грамматика блока 4: поля в порядке следования, каждое необязательно.
const GRAMMAR: [Syntax; 15] = [
    Syntax::Token {
        field: TextField::TransactionReference,
        allow_empty: false,
    },
    Syntax::Token {
        field: TextField::BankOperationCode,
        allow_empty: false,
    },
    Syntax::Money {
        dated: true,
        currency: TextField::InterbankSettledCurrency,
        amount: TextField::InterbankSettledAmount,
    },
    Syntax::Money {
        dated: false,
        currency: TextField::OriginalOrderedCurrency,
        amount: TextField::OriginalOrderedAmount,
    },
    Syntax::FreeText(TextField::OrderingCustomer),
    Syntax::FreeText(TextField::OrderingInstitution),
    Syntax::Token {
        field: TextField::SenderCorrespondent,
        allow_empty: true,
    },
    Syntax::FreeText(TextField::ReceiverCorrespondent),
    Syntax::FreeText(TextField::Intermediary),
    Syntax::FreeText(TextField::AccountWithInstitution),
    Syntax::FreeText(TextField::Beneficiary),
    Syntax::FreeText(TextField::RemittanceInformation),
    Syntax::FreeText(TextField::DetailsOfCharges),
    Syntax::FreeText(TextField::SenderToReceiverInformation),
    Syntax::FreeText(TextField::RegulatoryReporting),
];

/// Строки таблицы разбора: поля грамматики и конец блока.
const ROWS: usize = GRAMMAR.len() + 1;

/// Сколько последних позиций помнит заполнение таблицы. Длиннее любого тега.
const WINDOW: usize = 8;

/// Одно совпавшее поле грамматики.
#[derive(Debug)]
struct Step<'a> {
    values: [Option<(TextField, &'a str)>; 3],
    next: usize,
}

/// Таблица разбора блока 4.
///
/// Бит `j` в `reachable[p]` означает, что остаток блока с позиции `p`
/// разбирается полями грамматики `j..`. Таблица заполняется от конца блока
/// к началу, поэтому свободный текст находит свою минимальную границу без
/// перебора с возвратами. Время линейно по длине блока, таблица занимает
/// два байта на байт блока.
struct Matcher<'a> {
    src: &'a str,
    reachable: Vec<u16>,
}

impl<'a> Matcher<'a> {
    fn new(src: &'a str) -> Self {
        let len = src.len();
        let bytes = src.as_bytes();

        let mut matcher = Matcher {
            src,
            reachable: vec![0; len + 1],
        };

        // Конец блока допускается и перед завершающим переводом строки.
        let end = 1 << GRAMMAR.len();
        matcher.reachable[len] = end;
        if bytes.last() == Some(&b'\n') {
            matcher.reachable[len - 1] = end;
        }

        // nearest[p % WINDOW][j] - первая позиция q >= p с битом j.
        let mut nearest = [[None; ROWS]; WINDOW];
        for pos in (0..=len).rev() {
            let mut bits = matcher.reachable[pos];
            if bytes.get(pos) == Some(&b':') {
                for index in (0..GRAMMAR.len()).rev() {
                    let row = index + 1;
                    let fits = bits & (1 << row) != 0
                        || matcher
                            .take(index, pos, |start| {
                                debug_assert!(start - pos < WINDOW);
                                nearest[start % WINDOW][row]
                            })
                            .is_some();
                    if fits {
                        bits |= 1 << index;
                    }
                }
            } else if bits & end != 0 {
                bits = u16::MAX;
            }
            matcher.reachable[pos] = bits;

            let mut here = if pos < len {
                nearest[(pos + 1) % WINDOW]
            } else {
                [None; ROWS]
            };
            for (row, slot) in here.iter_mut().enumerate() {
                if bits & (1 << row) != 0 {
                    *slot = Some(pos);
                }
            }
            nearest[pos % WINDOW] = here;
        }

        matcher
    }

    fn is_reachable(&self, index: usize, pos: usize) -> bool {
        self.reachable[pos] & (1 << index) != 0
    }

    /// Пробует разобрать поле `index` в позиции `pos` так, чтобы остаток
    /// разбирался следующими полями. `seek(p)` возвращает первую позицию
    /// `q >= p`, с которой разбираются поля `index + 1..`.
    ///
    /// Свободный текст возвращается вместе с завершающими пробелами.
    fn take(
        &self,
        index: usize,
        pos: usize,
        seek: impl Fn(usize) -> Option<usize>,
    ) -> Option<Step<'a>> {
        let syntax = GRAMMAR[index];
        let mut cursor = Cursor::at(self.src, pos);
        if !syntax.tags().iter().any(|tag| cursor.eat(tag)) {
            return None;
        }

        let mut values = [None; 3];

        match syntax {
            Syntax::Token { field, allow_empty } => {
                let token = cursor.take_while(usize::MAX, is_token);
                if token.is_empty() && !allow_empty {
                    return None;
                }
                values[0] = Some((field, token));
            }
            Syntax::Money {
                dated,
                currency,
                amount,
            } => {
                if dated {
                    let date = cursor.take_exact(6, |b| b.is_ascii_digit())?;
                    values[2] = Some((TextField::SettlementDate, date));
                }
                values[0] = Some((currency, cursor.take_exact(3, |b| b.is_ascii_uppercase())?));
                values[1] = Some((amount, cursor.take_while1(is_amount)?));
            }
            Syntax::FreeText(field) => {
                let start = cursor.pos();
                let next = seek(start)?;
                values[0] = Some((field, &self.src[start..next]));
                return Some(Step { values, next });
            }
        }

        cursor.skip_spaces();
        let next = cursor.pos();
        self.is_reachable(index + 1, next)
            .then_some(Step { values, next })
    }

    /// Проходит по таблице и собирает значения полей.
    fn captures(&self) -> Option<Vec<(TextField, &'a str)>> {
        if !self.is_reachable(0, 0) {
            return None;
        }

        let mut captures = Vec::new();
        let mut pos = 0;
        for index in 0..GRAMMAR.len() {
            let seek = |start: usize| {
                (start..self.reachable.len()).find(|&q| self.is_reachable(index + 1, q))
            };
            if let Some(step) = self.take(index, pos, seek) {
                captures.extend(
                    step.values
                        .into_iter()
                        .flatten()
                        .map(|(field, value)| (field, trim_end_spaces(value))),
                );
                pos = step.next;
            }
        }

        Some(captures)
    }
}

/// Текстовый блок (блок 4) сообщения MT103.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBlock {
    raw: String,
    transaction_reference: Option<String>,
    bank_operation_code: Option<String>,
    settlement_date: Option<NaiveDate>,
    interbank_settled_currency: Option<String>,
    interbank_settled_amount: Option<String>,
    original_ordered_currency: Option<String>,
    original_ordered_amount: Option<String>,
    ordering_customer: Option<String>,
    ordering_institution: Option<String>,
    sender_correspondent: Option<String>,
    receiver_correspondent: Option<String>,
    intermediary: Option<String>,
    account_with_institution: Option<String>,
    beneficiary: Option<String>,
    remittance_information: Option<String>,
    details_of_charges: Option<String>,
    sender_to_receiver_information: Option<String>,
    regulatory_reporting: Option<String>,
    valid: bool,
}

impl TextBlock {
    /// Разбирает содержимое блока 4 (без `{4:` и `-}`).
    ///
    /// Пустая строка считается несовпадением. Некорректная дата в `:32A:`
    /// оставляет пустым только `settlement_date`.
    pub fn parse(raw: &str) -> Self {
        let mut block = TextBlock {
            raw: raw.to_string(),
            ..Default::default()
        };

        if raw.is_empty() {
            return block;
        }

        let Some(captures) = Matcher::new(raw).captures() else {
            tracing::debug!("Блок 4 не соответствует грамматике MT103: {:?}", raw);
            return block;
        };

        block.valid = true;
        for (field, value) in captures {
            block.set(field, value);
        }

        block
    }

    fn set(&mut self, field: TextField, value: &str) {
        let slot = match field {
            TextField::SettlementDate => {
                self.settlement_date = parse_settlement_date(value);
                return;
            }
            TextField::TransactionReference => &mut self.transaction_reference,
            TextField::BankOperationCode => &mut self.bank_operation_code,
            TextField::InterbankSettledCurrency => &mut self.interbank_settled_currency,
            TextField::InterbankSettledAmount => &mut self.interbank_settled_amount,
            TextField::OriginalOrderedCurrency => &mut self.original_ordered_currency,
            TextField::OriginalOrderedAmount => &mut self.original_ordered_amount,
            TextField::OrderingCustomer => &mut self.ordering_customer,
            TextField::OrderingInstitution => &mut self.ordering_institution,
            TextField::SenderCorrespondent => &mut self.sender_correspondent,
            TextField::ReceiverCorrespondent => &mut self.receiver_correspondent,
            TextField::Intermediary => &mut self.intermediary,
            TextField::AccountWithInstitution => &mut self.account_with_institution,
            TextField::Beneficiary => &mut self.beneficiary,
            TextField::RemittanceInformation => &mut self.remittance_information,
            TextField::DetailsOfCharges => &mut self.details_of_charges,
            TextField::SenderToReceiverInformation => &mut self.sender_to_receiver_information,
            TextField::RegulatoryReporting => &mut self.regulatory_reporting,
        };
        *slot = Some(value.to_string());
    }

    /// Исходное содержимое блока.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// true, если блок полностью соответствует грамматике.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Референс транзакции (`:20:`).
    pub fn transaction_reference(&self) -> Option<&str> {
        self.transaction_reference.as_deref()
    }

    /// Код банковской операции (`:23B:`).
    pub fn bank_operation_code(&self) -> Option<&str> {
        self.bank_operation_code.as_deref()
    }

    /// Дата расчетов из `:32A:`. Год всегда трактуется как 20YY.
    pub fn settlement_date(&self) -> Option<NaiveDate> {
        self.settlement_date
    }

    /// Валюта межбанковского расчета (`:32A:`).
    pub fn interbank_settled_currency(&self) -> Option<&str> {
        self.interbank_settled_currency.as_deref()
    }

    /// Сумма межбанковского расчета (`:32A:`) в исходной записи, с запятой.
    pub fn interbank_settled_amount(&self) -> Option<&str> {
        self.interbank_settled_amount.as_deref()
    }

    /// Валюта исходного поручения (`:33B:`).
    pub fn original_ordered_currency(&self) -> Option<&str> {
        self.original_ordered_currency.as_deref()
    }

    /// Сумма исходного поручения (`:33B:`).
    pub fn original_ordered_amount(&self) -> Option<&str> {
        self.original_ordered_amount.as_deref()
    }

    /// Плательщик (`:50a:`).
    pub fn ordering_customer(&self) -> Option<&str> {
        self.ordering_customer.as_deref()
    }

    pub fn ordering_institution(&self) -> Option<&str> {
        self.ordering_institution.as_deref()
    }

    pub fn sender_correspondent(&self) -> Option<&str> {
        self.sender_correspondent.as_deref()
    }

    pub fn receiver_correspondent(&self) -> Option<&str> {
        self.receiver_correspondent.as_deref()
    }

    pub fn intermediary(&self) -> Option<&str> {
        self.intermediary.as_deref()
    }

    pub fn account_with_institution(&self) -> Option<&str> {
        self.account_with_institution.as_deref()
    }

    /// Получатель (`:59:` или `:59A:`).
    pub fn beneficiary(&self) -> Option<&str> {
        self.beneficiary.as_deref()
    }

    /// Назначение платежа (`:70:`).
    pub fn remittance_information(&self) -> Option<&str> {
        self.remittance_information.as_deref()
    }

    /// Детали расходов (`:71A:`), например `SHA`, `OUR`, `BEN`.
    pub fn details_of_charges(&self) -> Option<&str> {
        self.details_of_charges.as_deref()
    }

    pub fn sender_to_receiver_information(&self) -> Option<&str> {
        self.sender_to_receiver_information.as_deref()
    }

    pub fn regulatory_reporting(&self) -> Option<&str> {
        self.regulatory_reporting.as_deref()
    }

    /// Значение поля по его идентификатору. Дата отдается в формате ISO 8601.
    pub fn get(&self, field: TextField) -> Option<Cow<'_, str>> {
        let value = match field {
            TextField::SettlementDate => {
                return self
                    .settlement_date
                    .map(|date| Cow::Owned(date.format("%Y-%m-%d").to_string()));
            }
            TextField::TransactionReference => self.transaction_reference(),
            TextField::BankOperationCode => self.bank_operation_code(),
            TextField::InterbankSettledCurrency => self.interbank_settled_currency(),
            TextField::InterbankSettledAmount => self.interbank_settled_amount(),
            TextField::OriginalOrderedCurrency => self.original_ordered_currency(),
            TextField::OriginalOrderedAmount => self.original_ordered_amount(),
            TextField::OrderingCustomer => self.ordering_customer(),
            TextField::OrderingInstitution => self.ordering_institution(),
            TextField::SenderCorrespondent => self.sender_correspondent(),
            TextField::ReceiverCorrespondent => self.receiver_correspondent(),
            TextField::Intermediary => self.intermediary(),
            TextField::AccountWithInstitution => self.account_with_institution(),
            TextField::Beneficiary => self.beneficiary(),
            TextField::RemittanceInformation => self.remittance_information(),
            TextField::DetailsOfCharges => self.details_of_charges(),
            TextField::SenderToReceiverInformation => self.sender_to_receiver_information(),
            TextField::RegulatoryReporting => self.regulatory_reporting(),
        };
        value.map(Cow::Borrowed)
    }

    /// Все поля блока в порядке следования.
    pub fn fields(&self) -> impl Iterator<Item = (TextField, Option<Cow<'_, str>>)> + '_ {
        TextField::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }
}

/// YYMMDD -> дата 20YY-MM-DD; несуществующая дата дает `None`.
fn parse_settlement_date(digits: &str) -> Option<NaiveDate> {
    let year: i32 = digits.get(0..2)?.parse().ok()?;
    let month: u32 = digits.get(2..4)?.parse().ok()?;
    let day: u32 = digits.get(4..6)?.parse().ok()?;

    let date = NaiveDate::from_ymd_opt(2000 + year, month, day);
    if date.is_none() {
        tracing::warn!("Некорректная дата расчетов в поле :32A: {}", digits);
    }
    date
}

impl std::fmt::Display for TextBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
