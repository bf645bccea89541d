// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cadence;
pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod ledger;
pub mod models;
pub mod ranker;
pub mod service;
pub mod store;
pub mod utils;

pub use error::{StoreError, ValidationError};
pub use models::{Cadence, Category, NewSubscription, PaymentEvent, Subscription};
