//! Именованные поля текстового блока MT103.

/// Поле блока 4.
///
/// Порядок вариантов совпадает с порядком тегов в сообщении. Поля `:32A:` и
/// `:33B:` раскладываются на несколько значений, а `SettlementDate`
/// вычисляется из первых шести цифр `:32A:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    TransactionReference,
    BankOperationCode,
    SettlementDate,
    InterbankSettledCurrency,
    InterbankSettledAmount,
    OriginalOrderedCurrency,
    OriginalOrderedAmount,
    OrderingCustomer,
    OrderingInstitution,
    SenderCorrespondent,
    ReceiverCorrespondent,
    Intermediary,
    AccountWithInstitution,
    Beneficiary,
    RemittanceInformation,
    DetailsOfCharges,
    SenderToReceiverInformation,
    RegulatoryReporting,
}

impl TextField {
    /// Все поля в порядке следования в блоке.
    pub const ALL: [TextField; 18] = [
        TextField::TransactionReference,
        TextField::BankOperationCode,
        TextField::SettlementDate,
        TextField::InterbankSettledCurrency,
        TextField::InterbankSettledAmount,
        TextField::OriginalOrderedCurrency,
        TextField::OriginalOrderedAmount,
        TextField::OrderingCustomer,
        TextField::OrderingInstitution,
        TextField::SenderCorrespondent,
        TextField::ReceiverCorrespondent,
        TextField::Intermediary,
        TextField::AccountWithInstitution,
        TextField::Beneficiary,
        TextField::RemittanceInformation,
        TextField::DetailsOfCharges,
        TextField::SenderToReceiverInformation,
        TextField::RegulatoryReporting,
    ];

    /// Имя поля в snake_case.
    pub fn name(self) -> &'static str {
        match self {
            TextField::TransactionReference => "transaction_reference",
            TextField::BankOperationCode => "bank_operation_code",
            TextField::SettlementDate => "settlement_date",
            TextField::InterbankSettledCurrency => "interbank_settled_currency",
            TextField::InterbankSettledAmount => "interbank_settled_amount",
            TextField::OriginalOrderedCurrency => "original_ordered_currency",
            TextField::OriginalOrderedAmount => "original_ordered_amount",
            TextField::OrderingCustomer => "ordering_customer",
            TextField::OrderingInstitution => "ordering_institution",
            TextField::SenderCorrespondent => "sender_correspondent",
            TextField::ReceiverCorrespondent => "receiver_correspondent",
            TextField::Intermediary => "intermediary",
            TextField::AccountWithInstitution => "account_with_institution",
            TextField::Beneficiary => "beneficiary",
            TextField::RemittanceInformation => "remittance_information",
            TextField::DetailsOfCharges => "details_of_charges",
            TextField::SenderToReceiverInformation => "sender_to_receiver_information",
            TextField::RegulatoryReporting => "regulatory_reporting",
        }
    }

    /// Теги, которыми может быть записано поле.
    pub fn tags(self) -> &'static [&'static str] {
        match self {
            TextField::TransactionReference => &[":20:"],
            TextField::BankOperationCode => &[":23B:"],
            TextField::SettlementDate
            | TextField::InterbankSettledCurrency
            | TextField::InterbankSettledAmount => &[":32A:"],
            TextField::OriginalOrderedCurrency | TextField::OriginalOrderedAmount => &[":33B:"],
            TextField::OrderingCustomer => &[":50A:", ":50F:", ":50K:"],
            TextField::OrderingInstitution => &[":52A:", ":52D:"],
            TextField::SenderCorrespondent => &[":53A:", ":53B:", ":53D:"],
            TextField::ReceiverCorrespondent => &[":54A:", ":54B:", ":54D:"],
            TextField::Intermediary => &[":56A:", ":56C:", ":56D:"],
            TextField::AccountWithInstitution => &[":57A:", ":57B:", ":57C:", ":57D:"],
            TextField::Beneficiary => &[":59:", ":59A:"],
            TextField::RemittanceInformation => &[":70:"],
            TextField::DetailsOfCharges => &[":71A:"],
            TextField::SenderToReceiverInformation => &[":72:"],
            TextField::RegulatoryReporting => &[":77A:"],
        }
    }
}

impl std::fmt::Display for TextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for TextField {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.to_lowercase();
        TextField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or(())
    }
}
