use cardguard_core::{validate_submission, SubmissionForm, SubmissionValidationError};

fn valid_form() -> SubmissionForm {
    SubmissionForm {
        holder_name: "Ana Silva".to_string(),
        card_number: "4111-1111-1111-1111".to_string(),
        expiry: "09/27".to_string(),
        cvv: "123".to_string(),
        card_password: "abc123".to_string(),
    }
}

fn error_for(form: &SubmissionForm) -> SubmissionValidationError {
    validate_submission(form).unwrap_err()
}

#[test]
fn valid_form_is_normalized() {
    let normalized = validate_submission(&valid_form()).unwrap();
    assert_eq!(normalized.holder_name, "Ana Silva");
    assert_eq!(normalized.number_digits, "4111111111111111");
    assert_eq!(normalized.expiry, "09/27");
    assert_eq!(normalized.cvv, "123");
    assert_eq!(normalized.password, "abc123");
}

#[test]
fn any_blank_or_whitespace_field_is_missing() {
    let setters: [fn(&mut SubmissionForm, String); 5] = [
        |form, value| form.holder_name = value,
        |form, value| form.card_number = value,
        |form, value| form.expiry = value,
        |form, value| form.cvv = value,
        |form, value| form.card_password = value,
    ];

    for set in setters {
        for blank in ["", "   ", "\t\n"] {
            let mut form = valid_form();
            set(&mut form, blank.to_string());
            assert_eq!(error_for(&form), SubmissionValidationError::MissingFields);
        }
    }
}

#[test]
fn expiry_checks() {
    let cases = [
        ("13/25", Some(SubmissionValidationError::BadExpiryMonth)),
        ("00/25", Some(SubmissionValidationError::BadExpiryMonth)),
        ("0199", Some(SubmissionValidationError::BadExpiryFormat)),
        ("01-25", Some(SubmissionValidationError::BadExpiryFormat)),
        ("1/25", Some(SubmissionValidationError::BadExpiryFormat)),
        ("ab/25", Some(SubmissionValidationError::BadExpiryMonth)),
        ("12/25", None),
        ("01/30", None),
        (" 12/25 ", None),
        ("1 /25", None),
        ("+1/25", None),
        ("  /25", Some(SubmissionValidationError::BadExpiryMonth)),
    ];

    for (expiry, expected) in cases {
        let mut form = valid_form();
        form.expiry = expiry.to_string();
        assert_eq!(
            validate_submission(&form).err(),
            expected,
            "expiry `{expiry}`"
        );
    }
}

#[test]
fn card_number_length_checks() {
    let cases = [
        ("4111 1111 1111 1", None),
        ("4111 1111 1111", Some(SubmissionValidationError::BadCardNumberLength)),
        ("123", Some(SubmissionValidationError::BadCardNumberLength)),
        (
            "12345678901234567890",
            Some(SubmissionValidationError::BadCardNumberLength),
        ),
        ("1234567890123456789", None),
        ("card: 4111.1111.1111.1111", None),
        ("----", Some(SubmissionValidationError::BadCardNumberLength)),
    ];

    for (number, expected) in cases {
        let mut form = valid_form();
        form.card_number = number.to_string();
        assert_eq!(
            validate_submission(&form).err(),
            expected,
            "card number `{number}`"
        );
    }
}

#[test]
fn cvv_checks() {
    let cases = [
        ("12", Some(SubmissionValidationError::BadCvv)),
        ("123", None),
        ("1234", None),
        ("12a", Some(SubmissionValidationError::BadCvv)),
        ("12345", Some(SubmissionValidationError::BadCvv)),
        ("１２３", Some(SubmissionValidationError::BadCvv)),
    ];

    for (cvv, expected) in cases {
        let mut form = valid_form();
        form.cvv = cvv.to_string();
        assert_eq!(validate_submission(&form).err(), expected, "cvv `{cvv}`");
    }
}

#[test]
fn card_number_is_checked_before_cvv() {
    let mut form = valid_form();
    form.card_number = "123".to_string();
    form.cvv = "x".to_string();
    assert_eq!(
        error_for(&form),
        SubmissionValidationError::BadCardNumberLength
    );
}

#[test]
fn validation_messages_are_specific() {
    let messages = [
        SubmissionValidationError::MissingFields,
        SubmissionValidationError::BadExpiryFormat,
        SubmissionValidationError::BadExpiryMonth,
        SubmissionValidationError::BadCardNumberLength,
        SubmissionValidationError::BadCvv,
    ]
    .map(|err| err.to_string());

    for (idx, message) in messages.iter().enumerate() {
        assert!(!message.is_empty());
        assert!(!messages[idx + 1..].contains(message));
    }
    assert!(messages[3].contains("13") && messages[3].contains("19"));
}

#[test]
fn form_deserializes_with_missing_keys_as_empty() {
    let form: SubmissionForm =
        serde_json::from_str(r#"{"holder_name":"Ana Silva","cvv":"123"}"#).unwrap();
    assert_eq!(form.holder_name, "Ana Silva");
    assert!(form.card_number.is_empty());
    assert_eq!(error_for(&form), SubmissionValidationError::MissingFields);
}
