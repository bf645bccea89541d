// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use subclip::cadence::{advance, next_due_date};
use subclip::{Cadence, ValidationError};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn month_end_clamps_into_february() {
    assert_eq!(
        next_due_date(d(2024, 1, 31), Cadence::Monthly).unwrap(),
        d(2024, 2, 29)
    );
    assert_eq!(
        next_due_date(d(2023, 1, 31), Cadence::Monthly).unwrap(),
        d(2023, 2, 28)
    );
    // 31st into a 30-day month
    assert_eq!(
        next_due_date(d(2024, 3, 31), Cadence::Monthly).unwrap(),
        d(2024, 4, 30)
    );
    assert_eq!(
        next_due_date(d(2023, 8, 31), Cadence::SemiAnnual).unwrap(),
        d(2024, 2, 29)
    );
}

#[test]
fn fixed_increments() {
    assert_eq!(
        next_due_date(d(2024, 1, 15), Cadence::Quarterly).unwrap(),
        d(2024, 4, 15)
    );
    assert_eq!(
        next_due_date(d(2024, 1, 15), Cadence::Annual).unwrap(),
        d(2025, 1, 15)
    );
    assert_eq!(
        next_due_date(d(2024, 1, 1), Cadence::Weekly).unwrap(),
        d(2024, 1, 8)
    );
    assert_eq!(
        next_due_date(d(2024, 12, 28), Cadence::Weekly).unwrap(),
        d(2025, 1, 4)
    );
    assert_eq!(
        next_due_date(d(2024, 2, 29), Cadence::Annual).unwrap(),
        d(2025, 2, 28)
    );
}

#[test]
fn every_cadence_moves_strictly_forward() {
    let mut day = d(2023, 1, 1);
    let end = d(2025, 1, 1);
    while day < end {
        for cadence in Cadence::ALL {
            let next = next_due_date(day, cadence).unwrap();
            assert!(next > day, "{} + {} gave {}", day, cadence, next);
        }
        day = day.succ_opt().unwrap();
    }
}

#[test]
fn advance_applies_one_step_per_payment() {
    assert_eq!(advance(d(2024, 1, 31), Cadence::Monthly, 0).unwrap(), d(2024, 1, 31));
    // Clamping is not undone on later steps
    assert_eq!(advance(d(2024, 1, 31), Cadence::Monthly, 2).unwrap(), d(2024, 3, 29));
    assert_eq!(advance(d(2024, 1, 1), Cadence::Weekly, 4).unwrap(), d(2024, 1, 29));
}

#[test]
fn overflow_is_an_error_not_a_panic() {
    let err = next_due_date(NaiveDate::MAX, Cadence::Weekly).unwrap_err();
    assert_eq!(err, ValidationError::DateOverflow(NaiveDate::MAX));
    assert!(next_due_date(NaiveDate::MAX, Cadence::Annual).is_err());
}

#[test]
fn cadence_text_forms() {
    assert_eq!("semi-annual".parse::<Cadence>().unwrap(), Cadence::SemiAnnual);
    assert_eq!(" monthly ".parse::<Cadence>().unwrap(), Cadence::Monthly);
    assert_eq!(Cadence::SemiAnnual.to_string(), "SEMI_ANNUAL");
    assert!(matches!(
        "fortnightly".parse::<Cadence>(),
        Err(ValidationError::UnknownCadence(_))
    ));
    assert_eq!(
        serde_json::to_string(&Cadence::SemiAnnual).unwrap(),
        "\"SEMI_ANNUAL\""
    );
}
