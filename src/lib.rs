//! Wtview: a desktop viewer for sidechain withdrawal-bundle (WT-prime)
//! history.
//!
//! The heart of the crate is [`history_model::WithdrawalHistoryModel`], a
//! projection of withdrawal bundles into a four-column display table that
//! refreshes itself when the observed sidechain tip advances. Everything
//! else is plumbing around it: the record source ([`source`], [`rpc`]),
//! the tip notifier ([`notifier`]), display units ([`units`]), persisted
//! settings ([`user_settings`]), and the egui front end ([`gui`]).

pub mod config;
pub mod gui;
pub mod history_model;
pub mod notifier;
pub mod rpc;
pub mod source;
pub mod types;
pub mod units;
pub mod user_settings;
