//! A marketplace that mints non-fungible items and lists them for sale in a
//! single step.
//!
//! # Description
//! Every item is identified by a sequential token ID starting at 1. While an
//! item is listed the marketplace contract itself holds it in custody. A
//! listing can be bought for exactly its asking price, cancelled by its
//! seller, or, once bought, put up for sale again by its new owner. Creating
//! or relisting an item requires the configured listing fee, which is held by
//! the contract and forwarded to the fee recipient when the item sells.
#![cfg_attr(not(feature = "std"), no_std)]
use crate::{events::*, helper::*, structs::*};
use commons::*;
use concordium_cis2::*;
use concordium_std::*;

mod contract;
mod events;
mod helper;
mod impls;
mod structs;
