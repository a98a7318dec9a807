// SPDX-License-Identifier: AGPL-3.0-only
pub mod common;
pub mod config;
pub mod query;
pub mod token;
