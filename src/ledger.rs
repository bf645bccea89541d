// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};

use crate::models::PaymentEvent;

/// Append-only payment history, kept in confirmation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentLedger {
    events: Vec<PaymentEvent>,
}

impl PaymentLedger {
    pub fn append(&mut self, event: PaymentEvent) {
        self.events.push(event);
    }

    pub fn as_slice(&self) -> &[PaymentEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PaymentEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&PaymentEvent> {
        self.events.last()
    }
}

impl FromIterator<PaymentEvent> for PaymentLedger {
    fn from_iter<I: IntoIterator<Item = PaymentEvent>>(iter: I) -> Self {
        PaymentLedger {
            events: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PaymentLedger {
    type Item = &'a PaymentEvent;
    type IntoIter = std::slice::Iter<'a, PaymentEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
