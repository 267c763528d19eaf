// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budgets;
pub mod cards;
pub mod categories;
pub mod doctor;
pub mod expenses;
pub mod exporter;
pub mod goals;
pub mod income;
pub mod nisa;
pub mod records;
pub mod settings;
