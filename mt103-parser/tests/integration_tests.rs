//! Интеграционные тесты для mt103-parser.

use std::io::Cursor;

use chrono::NaiveDate;
use mt103_parser::{Error, Mt103Message, TextField, UserHeaderField};

const MESSAGE1: &str = "{1:F01ASDFJK20AXXX0987654321}{2:I103ASDFJK22XXXXN}{4: :20:20180101-ABCDEF :23B:GHIJ :32A:180117CAD5432,1 :33B:EUR9999,0 :50K:/123456-75901 SOMEWHERE New York 999999 GR :53B:/20100213012345 :57C://SC200123 :59:/201001020 First Name Last Name a12345bc6d789ef01a23 Nowhere NL :70:test reference test reason payment group: 1234567-ABCDEF :71A:SHA :77A:Test this -}";

const MESSAGE2: &str = "{1:F01QWERTY22AXXX1234567890}{2:I103QWERTY33XXXXA7}{3:{108:MT103}}{4:\n:20:1234567-8901\n:23B:ABCD\n:32A:000625EUR1000,00\n:33B:EUR1000,00\n:50K:COMPANY NAME\nNAPLES\n:52A:ABCDEFGH123\n:53A:ABCDEF12\n:54A:ABCDEF1G\n:57A:ABCDEFGHIJK\n:59:/20061120050500001A01234\nBENEFICIARY NAME\n:70:/REMITTANCE INFO\n:71A:SHA\n-}";

const SHORT_MESSAGE: &str = "{1:F01ASDFJK20AXXX0987654321}{2:I103ASDFJK22XXXXN}{4: :20:20180101-ABCDEF :23B:GHIJ :32A:180117CAD5432,1 :33B:EUR9999,0 -}";

fn assert_empty(message: &Mt103Message) {
    assert!(!message.is_valid());
    assert_eq!(message.basic_header(), None);
    assert_eq!(message.application_header(), None);
    assert!(message.user_header().is_none());
    assert!(message.text().is_none());
    assert_eq!(message.trailer(), None);
}

#[test]
fn test_empty_and_garbage_messages() {
    for input in ["", "   \n ", "test", "{1:F01}garbage", "{9:X}"] {
        let message = Mt103Message::parse(input);
        assert_empty(&message);
        assert_eq!(message.raw(), input.trim());
    }
    assert_empty(&Mt103Message::from_option(None));
    assert_empty(&Mt103Message::default());
}

#[test]
fn test_short_message() {
    let message = Mt103Message::parse(SHORT_MESSAGE);
    assert!(message.is_valid());
    assert_eq!(message.basic_header(), Some("F01ASDFJK20AXXX0987654321"));
    assert_eq!(message.application_header(), Some("I103ASDFJK22XXXXN"));
    assert_eq!(message.trailer(), None);

    let text = message.text().unwrap();
    assert!(text.is_valid());
    assert_eq!(text.transaction_reference(), Some("20180101-ABCDEF"));
    assert_eq!(text.bank_operation_code(), Some("GHIJ"));
    assert_eq!(text.settlement_date(), NaiveDate::from_ymd_opt(2018, 1, 17));
    assert_eq!(text.interbank_settled_currency(), Some("CAD"));
    assert_eq!(text.interbank_settled_amount(), Some("5432,1"));
    assert_eq!(text.original_ordered_currency(), Some("EUR"));
    assert_eq!(text.original_ordered_amount(), Some("9999,0"));
}

#[test]
fn test_full_message_fields() {
    let message = Mt103Message::parse(MESSAGE1);
    assert!(message.is_valid());

    let text = message.text().unwrap();
    assert!(text.is_valid());
    assert_eq!(text.ordering_customer(), Some("/123456-75901 SOMEWHERE New York 999999 GR"));
    assert_eq!(text.ordering_institution(), None);
    assert_eq!(text.sender_correspondent(), Some("/20100213012345"));
    assert_eq!(text.receiver_correspondent(), None);
    assert_eq!(text.intermediary(), None);
    assert_eq!(text.account_with_institution(), Some("//SC200123"));
    assert_eq!(
        text.beneficiary(),
        Some("/201001020 First Name Last Name a12345bc6d789ef01a23 Nowhere NL")
    );
    assert_eq!(
        text.remittance_information(),
        Some("test reference test reason payment group: 1234567-ABCDEF")
    );
    assert_eq!(text.details_of_charges(), Some("SHA"));
    assert_eq!(text.sender_to_receiver_information(), None);
    assert_eq!(text.regulatory_reporting(), Some("Test this"));
}

#[test]
fn test_text_raw_is_block_content() {
    let message = Mt103Message::parse(MESSAGE1);
    let start = MESSAGE1.find("{4:").unwrap() + 4;
    let end = MESSAGE1.len() - 3;
    assert_eq!(message.text().unwrap().to_string(), &MESSAGE1[start..end]);

    let message = Mt103Message::parse(MESSAGE2);
    let start = MESSAGE2.find("{4:").unwrap() + 4;
    let end = MESSAGE2.len() - 3;
    assert_eq!(message.text().unwrap().raw(), &MESSAGE2[start..end]);
}

#[test]
fn test_user_header_message_user_reference() {
    let message = Mt103Message::parse(MESSAGE2);
    assert!(message.is_valid());
    assert_eq!(message.basic_header(), Some("F01QWERTY22AXXX1234567890"));
    assert_eq!(message.application_header(), Some("I103QWERTY33XXXXA7"));

    let header = message.user_header().unwrap();
    assert!(header.is_valid());
    assert_eq!(header.raw(), "{108:MT103}");
    assert_eq!(header.message_user_reference(), Some("MT103"));
    assert_eq!(header.bank_priority_code(), None);
    assert_eq!(header.service_type_identifier(), None);
    assert_eq!(header.unique_end_to_end_transaction_reference(), None);
}

#[test]
fn test_user_header_gpi_fields() {
    let input = SHORT_MESSAGE.replace(
        "{4:",
        "{3:{113:SEPA}{111:001}{121:d2d62e74-4f7d-45dc-a230-85fa259e1694}}{4:",
    );
    let message = Mt103Message::parse(&input);
    assert!(message.is_valid());

    let header = message.user_header().unwrap();
    assert!(header.is_valid());
    assert_eq!(header.bpc(), Some("SEPA"));
    assert_eq!(header.sti(), Some("001"));
    assert_eq!(header.uetr(), Some("d2d62e74-4f7d-45dc-a230-85fa259e1694"));
    assert_eq!(header.mur(), None);
}

#[test]
fn test_absent_blocks_produce_invalid_entities() {
    let message = Mt103Message::parse("{1:F01ASDFJK20AXXX0987654321}");
    assert!(message.is_valid());

    let header = message.user_header().unwrap();
    assert!(!header.is_valid());
    assert_eq!(header.raw(), "");

    let text = message.text().unwrap();
    assert!(!text.is_valid());
    assert_eq!(text.raw(), "");
    assert!(text.fields().all(|(_, value)| value.is_none()));
}

#[test]
fn test_invalid_text_keeps_siblings() {
    let input = "{1:F01BANK}{3:{108:REF1}}{4::23B:CRED :20:LATE-}{5:{MAC:00}";
    let message = Mt103Message::parse(input);
    assert!(message.is_valid());
    assert_eq!(message.basic_header(), Some("F01BANK"));
    assert_eq!(message.trailer(), Some("{MAC:00"));
    assert!(message.user_header().unwrap().is_valid());

    let text = message.text().unwrap();
    assert!(!text.is_valid());
    assert_eq!(text.raw(), ":23B:CRED :20:LATE");
    assert_eq!(text.bank_operation_code(), None);
}

#[test]
fn test_invalid_settlement_date() {
    let input = SHORT_MESSAGE.replace("180117CAD", "181317CAD");
    let message = Mt103Message::parse(&input);
    assert!(message.is_valid());

    let text = message.text().unwrap();
    assert!(text.is_valid());
    assert_eq!(text.settlement_date(), None);
    assert_eq!(text.transaction_reference(), Some("20180101-ABCDEF"));
    assert_eq!(text.interbank_settled_currency(), Some("CAD"));
    assert_eq!(text.interbank_settled_amount(), Some("5432,1"));
    assert_eq!(text.original_ordered_currency(), Some("EUR"));
}

#[test]
fn test_whitespace_only_text_block() {
    let message = Mt103Message::parse("{1:F01BANK}{4:\n-}");
    assert!(message.is_valid());
    let text = message.text().unwrap();
    assert_eq!(text.raw(), "\n");
    assert!(text.is_valid());

    let message = Mt103Message::parse("{1:F01BANK}{4: -}");
    assert!(message.is_valid());
    let text = message.text().unwrap();
    assert_eq!(text.raw(), " ");
    assert!(!text.is_valid());
}

#[test]
fn test_round_trip_and_idempotence() {
    for input in [MESSAGE1, MESSAGE2, SHORT_MESSAGE] {
        let padded = format!("  \n{}\n\t", input);
        let message = Mt103Message::parse(&padded);
        assert_eq!(message.to_string(), input);

        let reparsed = Mt103Message::parse(&message.to_string());
        assert_eq!(reparsed, message);
    }
}

#[test]
fn test_from_read() {
    let mut cursor = Cursor::new(MESSAGE2);
    let message = Mt103Message::from_read(&mut cursor).unwrap();
    assert!(message.is_valid());
    assert_eq!(message.text().unwrap().transaction_reference(), Some("1234567-8901"));
}

#[test]
fn test_strict_parse() {
    let message: Mt103Message = MESSAGE1.parse().unwrap();
    assert!(message.is_valid());

    let err = "{4::20:X".parse::<Mt103Message>().unwrap_err();
    assert!(matches!(err, Error::InvalidFormat(_)));
}

#[test]
fn test_field_iteration() {
    let message = Mt103Message::parse(MESSAGE2);

    let text = message.text().unwrap();
    let set: Vec<_> = text
        .fields()
        .filter_map(|(field, value)| value.map(|_| field))
        .collect();
    assert!(set.contains(&TextField::SettlementDate));
    assert!(set.contains(&TextField::ReceiverCorrespondent));
    assert!(!set.contains(&TextField::RegulatoryReporting));
    assert_eq!(text.fields().count(), TextField::ALL.len());

    let header = message.user_header().unwrap();
    assert_eq!(
        header.get(UserHeaderField::MessageUserReference),
        Some("MT103")
    );
}

#[test]
fn test_large_message_is_parsed_quickly() {
    let mut body = String::from(":20:REF\n:50K:");
    for i in 0..3_000 {
        body.push_str(&format!("LINE {} :7\n", i));
    }
    body.push_str(":59:BENEFICIARY\n:71A:OUR");
    let input = format!("{{1:F01BANK}}{{4:\n{}\n-}}", body);

    let message = Mt103Message::parse(&input);
    assert!(message.is_valid());
    let text = message.text().unwrap();
    assert!(text.is_valid());
    assert_eq!(text.beneficiary(), Some("BENEFICIARY"));
    assert_eq!(text.details_of_charges(), Some("OUR"));
    assert!(text.ordering_customer().unwrap().ends_with("LINE 2999 :7"));
}
