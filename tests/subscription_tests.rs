// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use subclip::cadence::advance;
use subclip::{Cadence, Category, NewSubscription, PaymentEvent, Subscription, ValidationError};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn record(cadence: Cadence, due: NaiveDate) -> Subscription {
    Subscription::new(
        1,
        NewSubscription {
            owner_id: 1,
            name: "Netflix".into(),
            amount: Decimal::from_str_exact("55.90").unwrap(),
            category: Category::Streaming,
            cadence,
            due_date: due,
        },
    )
    .unwrap()
}

#[test]
fn confirm_payment_appends_and_advances() {
    let mut s = record(Cadence::Monthly, d(2024, 1, 31));
    let event = s.confirm_payment(d(2024, 1, 30)).unwrap();
    assert_eq!(
        event,
        PaymentEvent {
            paid_on: d(2024, 1, 30),
            covered_due_date: d(2024, 1, 31)
        }
    );
    assert_eq!(s.due_date(), d(2024, 2, 29));
    assert_eq!(s.history().as_slice(), &[event]);
}

#[test]
fn n_confirmations_give_n_entries_and_n_steps() {
    let start = d(2024, 1, 15);
    for cadence in Cadence::ALL {
        let mut s = record(cadence, start);
        for i in 0..5u32 {
            let before = s.due_date();
            s.confirm_payment(d(2024, 1, 1)).unwrap();
            assert!(s.due_date() > before);
            assert_eq!(s.history().len(), (i + 1) as usize);
        }
        assert_eq!(s.due_date(), advance(start, cadence, 5).unwrap());
        let covered: Vec<NaiveDate> = s.history().iter().map(|e| e.covered_due_date).collect();
        let expected: Vec<NaiveDate> = (0..5).map(|n| advance(start, cadence, n).unwrap()).collect();
        assert_eq!(covered, expected);
    }
}

#[test]
fn far_overdue_advances_only_one_cycle() {
    let mut s = record(Cadence::Monthly, d(2020, 3, 10));
    s.confirm_payment(d(2024, 6, 1)).unwrap();
    assert_eq!(s.due_date(), d(2020, 4, 10));
}

#[test]
fn failed_confirmation_leaves_record_untouched() {
    let mut s = record(Cadence::Weekly, NaiveDate::MAX);
    let before = s.clone();
    let err = s.confirm_payment(d(2024, 1, 1)).unwrap_err();
    assert_eq!(err, ValidationError::DateOverflow(NaiveDate::MAX));
    assert_eq!(s, before);
    assert!(s.history().is_empty());
}

#[test]
fn payment_dated_before_last_payment_is_rejected() {
    let mut s = record(Cadence::Monthly, d(2024, 3, 1));
    s.confirm_payment(d(2024, 3, 1)).unwrap();
    let before = s.clone();

    let err = s.confirm_payment(d(2024, 1, 1)).unwrap_err();
    assert_eq!(
        err,
        ValidationError::PaidBeforeLastPayment {
            paid_on: d(2024, 1, 1),
            last: d(2024, 3, 1)
        }
    );
    assert_eq!(s, before);

    s.confirm_payment(d(2024, 3, 1)).unwrap();
    assert_eq!(s.history().len(), 2);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_checks_ledger_order() {
    let parse = |due: &str, history: &str| -> Subscription {
        serde_json::from_str(&format!(
            r#"{{"id": 1, "owner_id": 1, "name": "Netflix", "amount": "55.90",
                "category": "STREAMING", "cadence": "MONTHLY", "due_date": "{due}",
                "history": {history}}}"#
        ))
        .unwrap()
    };

    let ok = parse(
        "2024-03-01",
        r#"[{"paid_on": "2024-01-01", "covered_due_date": "2024-01-01"},
            {"paid_on": "2024-02-03", "covered_due_date": "2024-02-01"}]"#,
    );
    assert!(ok.validate().is_ok());

    let rewound = parse(
        "2024-07-01",
        r#"[{"paid_on": "2024-01-01", "covered_due_date": "2024-06-01"},
            {"paid_on": "2024-02-01", "covered_due_date": "2024-02-01"}]"#,
    );
    assert_eq!(
        rewound.validate(),
        Err(ValidationError::LedgerNotAdvancing {
            prev: d(2024, 6, 1),
            next: d(2024, 2, 1)
        })
    );

    let paid_backwards = parse(
        "2024-03-01",
        r#"[{"paid_on": "2024-02-10", "covered_due_date": "2024-01-01"},
            {"paid_on": "2024-02-01", "covered_due_date": "2024-02-01"}]"#,
    );
    assert!(matches!(
        paid_backwards.validate(),
        Err(ValidationError::PaidOnOutOfOrder { .. })
    ));

    let stale_due = parse(
        "2024-01-01",
        r#"[{"paid_on": "2024-01-01", "covered_due_date": "2024-01-01"}]"#,
    );
    assert!(matches!(
        stale_due.validate(),
        Err(ValidationError::DueNotAfterLastPayment { .. })
    ));
}

#[test]
fn edits_do_not_touch_history_or_due_date() {
    let mut s = record(Cadence::Monthly, d(2024, 5, 5));
    s.confirm_payment(d(2024, 5, 4)).unwrap();
    let history = s.history().clone();
    let due = s.due_date();

    s.rename("  Netflix Premium ").unwrap();
    s.set_amount(Decimal::from_str_exact("65.90").unwrap()).unwrap();
    s.set_category(Category::Service);
    s.set_cadence(Cadence::Annual);

    assert_eq!(s.name(), "Netflix Premium");
    assert_eq!(s.history(), &history);
    assert_eq!(s.due_date(), due);
}

#[test]
fn validation_rejects_empty_name_and_non_positive_amount() {
    let mut s = record(Cadence::Monthly, d(2024, 5, 5));
    assert_eq!(s.rename("   "), Err(ValidationError::EmptyName));
    assert!(matches!(
        s.set_amount(Decimal::ZERO),
        Err(ValidationError::NonPositiveAmount(_))
    ));
    assert_eq!(s.name(), "Netflix");

    let bad = NewSubscription {
        owner_id: 1,
        name: "Spotify".into(),
        amount: Decimal::new(-100, 2),
        category: Category::Streaming,
        cadence: Cadence::Monthly,
        due_date: d(2024, 1, 1),
    };
    assert!(Subscription::new(2, bad).is_err());
}

#[test]
fn serde_round_trip_keeps_history_dates_and_precision() {
    let mut s = record(Cadence::Quarterly, d(2024, 1, 31));
    s.set_amount(Decimal::from_str_exact("19.999").unwrap()).unwrap();
    s.confirm_payment(d(2024, 1, 29)).unwrap();
    s.confirm_payment(d(2024, 4, 28)).unwrap();
    s.confirm_payment(d(2024, 7, 30)).unwrap();

    let json = serde_json::to_string(&s).unwrap();
    let back: Subscription = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
    assert_eq!(back.amount().to_string(), "19.999");
    assert_eq!(back.history().as_slice(), s.history().as_slice());

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["due_date"], "2024-10-30");
    assert_eq!(value["history"][0]["covered_due_date"], "2024-01-31");
    assert_eq!(value["history"][1]["covered_due_date"], "2024-04-30");
    assert_eq!(value["history"][2]["paid_on"], "2024-07-30");
    assert_eq!(value["category"], "STREAMING");
    assert_eq!(value["cadence"], "QUARTERLY");
}
