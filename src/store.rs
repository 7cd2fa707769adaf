// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store of pending multi-recipient transfers.
//!
//! Holds two independent, insertion-ordered lists: SwiftPay peers keyed by
//! tag and bank accounts keyed by account number. Nothing is deduplicated on
//! insert; removal filters out every entry with a matching key.

use serde::Serialize;

use crate::amount::sum_amounts;
use crate::error::BatchError;
use crate::models::{
    BankRecipient, MultipleBankTransferRequest, MultipleSwiftpayTransferRequest,
    SwiftpayTransferAccount, TransferRecipient, TransferSource,
};

/// Bank batches below this size are rejected by the API.
pub const MIN_BANK_BATCH_RECIPIENTS: usize = 2;

/// Used when a peer recipient was added without a description.
pub const DEFAULT_SWIFTPAY_DESCRIPTION: &str = "Multiple swiftpay transfer";

/// What happens to pending recipients when the transfer source changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSwitchPolicy {
    /// Keep both lists untouched.
    #[default]
    Retain,
    /// Empty both lists when the source actually changes.
    ClearRecipients,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TransferAccumulator {
    recipients: Vec<TransferRecipient>,
    bank_recipients: Vec<BankRecipient>,
    transfer_source: TransferSource,
    switch_policy: SourceSwitchPolicy,
}

impl TransferAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_switch_policy(policy: SourceSwitchPolicy) -> Self {
        Self {
            switch_policy: policy,
            ..Self::default()
        }
    }

    pub fn recipients(&self) -> &[TransferRecipient] {
        &self.recipients
    }

    pub fn bank_recipients(&self) -> &[BankRecipient] {
        &self.bank_recipients
    }

    pub fn add_recipient(&mut self, recipient: TransferRecipient) {
        self.recipients.push(recipient);
    }

    pub fn add_bank_recipient(&mut self, recipient: BankRecipient) {
        self.bank_recipients.push(recipient);
    }

    /// Drop every peer recipient with this tag.
    pub fn remove_recipient(&mut self, tag: &str) {
        self.recipients.retain(|recipient| recipient.tag != tag);
    }

    /// Drop every bank recipient with this account number.
    pub fn remove_bank_recipient(&mut self, account_number: &str) {
        self.bank_recipients
            .retain(|recipient| recipient.account_number != account_number);
    }

    /// Sum of peer amounts; unparsable amounts count as zero.
    pub fn total_amount(&self) -> f64 {
        sum_amounts(self.recipients.iter().map(|recipient| recipient.amount.as_str()))
    }

    /// Sum of bank amounts; unparsable amounts count as zero.
    pub fn total_bank_amount(&self) -> f64 {
        sum_amounts(
            self.bank_recipients
                .iter()
                .map(|recipient| recipient.amount.as_str()),
        )
    }

    pub fn clear_recipients(&mut self) {
        self.recipients.clear();
    }

    pub fn clear_bank_recipients(&mut self) {
        self.bank_recipients.clear();
    }

    pub fn transfer_source(&self) -> TransferSource {
        self.transfer_source
    }

    pub fn switch_policy(&self) -> SourceSwitchPolicy {
        self.switch_policy
    }

    /// Any source may be set from any other.
    pub fn set_transfer_source(&mut self, source: TransferSource) {
        if source != self.transfer_source
            && self.switch_policy == SourceSwitchPolicy::ClearRecipients
        {
            self.clear_recipients();
            self.clear_bank_recipients();
        }
        self.transfer_source = source;
    }

    /// Empty both lists and return to the normal source. The switch policy
    /// is kept.
    pub fn reset(&mut self) {
        self.clear_recipients();
        self.clear_bank_recipients();
        self.transfer_source = TransferSource::Normal;
    }

    /// `source_link` sent with batch requests.
    pub fn source_link(&self) -> Option<TransferSource> {
        match self.transfer_source {
            TransferSource::SendToAfrica => Some(TransferSource::SendToAfrica),
            TransferSource::Normal => None,
        }
    }

    /// Build the multi-recipient SwiftPay request for the pending peers.
    pub fn swiftpay_batch(
        &self,
        pin: &str,
    ) -> Result<MultipleSwiftpayTransferRequest, BatchError> {
        if self.recipients.is_empty() {
            return Err(BatchError::Empty);
        }

        let source_link = self.source_link();
        let swiftpay_accounts = self
            .recipients
            .iter()
            .map(|recipient| SwiftpayTransferAccount {
                id: recipient.user.id.to_string(),
                name: recipient.display_name.clone(),
                amount: recipient.amount.clone(),
                description: if recipient.description.trim().is_empty() {
                    DEFAULT_SWIFTPAY_DESCRIPTION.to_string()
                } else {
                    recipient.description.clone()
                },
                source_link,
            })
            .collect();

        Ok(MultipleSwiftpayTransferRequest {
            total_amount: self.total_amount().to_string(),
            pin: pin.to_string(),
            swiftpay_accounts,
        })
    }

    /// Build the multi-recipient bank request for the pending accounts.
    pub fn bank_batch(&self, pin: &str) -> Result<MultipleBankTransferRequest, BatchError> {
        if self.bank_recipients.len() < MIN_BANK_BATCH_RECIPIENTS {
            return Err(BatchError::TooFewRecipients {
                required: MIN_BANK_BATCH_RECIPIENTS,
                found: self.bank_recipients.len(),
            });
        }

        Ok(MultipleBankTransferRequest {
            total_amount: self.total_bank_amount().to_string(),
            pin: pin.to_string(),
            bank_accounts: self.bank_recipients.clone(),
            source_link: self.source_link(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SwiftpayUser;

    fn peer(tag: &str, amount: &str) -> TransferRecipient {
        TransferRecipient {
            tag: tag.to_string(),
            display_name: format!("{tag} name"),
            amount: amount.to_string(),
            description: String::new(),
            user: SwiftpayUser {
                id: tag.len() as u64,
                username: tag.to_string(),
                ..Default::default()
            },
        }
    }

    fn bank(account_number: &str, amount: &str) -> BankRecipient {
        BankRecipient {
            account_name: "Ada Obi".to_string(),
            bank_name: "GTBank".to_string(),
            bank_code: "058".to_string(),
            account_number: account_number.to_string(),
            amount: amount.to_string(),
            fee: 10.0,
            description: "school fees".to_string(),
        }
    }

    fn tags(store: &TransferAccumulator) -> Vec<&str> {
        store.recipients().iter().map(|r| r.tag.as_str()).collect()
    }

    #[test]
    fn add_and_remove_preserve_insertion_order() {
        let mut store = TransferAccumulator::new();
        store.add_recipient(peer("ada", "10"));
        store.add_recipient(peer("bola", "20"));
        store.add_recipient(peer("chi", "30"));
        store.add_recipient(peer("dayo", "40"));

        store.remove_recipient("bola");
        assert_eq!(tags(&store), vec!["ada", "chi", "dayo"]);

        store.add_recipient(peer("bola", "20"));
        store.remove_recipient("ada");
        assert_eq!(tags(&store), vec!["chi", "dayo", "bola"]);
    }

    #[test]
    fn duplicates_are_kept_and_removed_together() {
        let mut store = TransferAccumulator::new();
        store.add_recipient(peer("ada", "10"));
        store.add_recipient(peer("bola", "20"));
        store.add_recipient(peer("ada", "5"));
        assert_eq!(store.recipients().len(), 3);

        store.remove_recipient("ada");
        assert_eq!(tags(&store), vec!["bola"]);
    }

    fn accounts(store: &TransferAccumulator) -> Vec<&str> {
        store
            .bank_recipients()
            .iter()
            .map(|r| r.account_number.as_str())
            .collect()
    }

    #[test]
    fn bank_add_and_remove_preserve_insertion_order() {
        let mut store = TransferAccumulator::new();
        store.add_bank_recipient(bank("111", "10"));
        store.add_bank_recipient(bank("222", "20"));
        store.add_bank_recipient(bank("333", "30"));

        store.remove_bank_recipient("222");
        assert_eq!(accounts(&store), vec!["111", "333"]);

        store.add_bank_recipient(bank("222", "20"));
        store.remove_bank_recipient("111");
        assert_eq!(accounts(&store), vec!["333", "222"]);
    }

    #[test]
    fn bank_duplicates_are_kept_and_removed_together() {
        let mut store = TransferAccumulator::new();
        store.add_bank_recipient(bank("111", "10"));
        store.add_bank_recipient(bank("222", "20"));
        store.add_bank_recipient(bank("111", "5"));
        assert_eq!(store.bank_recipients().len(), 3);
        assert_eq!(store.total_bank_amount(), 35.0);

        store.remove_bank_recipient("111");
        assert_eq!(accounts(&store), vec!["222"]);
        assert_eq!(store.total_bank_amount(), 20.0);
    }

    #[test]
    fn removing_unknown_key_is_a_no_op() {
        let mut store = TransferAccumulator::new();
        store.add_recipient(peer("ada", "10"));
        store.add_bank_recipient(bank("0123456789", "10"));

        store.remove_recipient("nonexistent");
        store.remove_bank_recipient("9999999999");

        assert_eq!(tags(&store), vec!["ada"]);
        assert_eq!(store.bank_recipients().len(), 1);
    }

    #[test]
    fn totals_treat_malformed_amounts_as_zero() {
        let mut store = TransferAccumulator::new();
        store.add_recipient(peer("ada", "100"));
        store.add_recipient(peer("bola", "abc"));
        store.add_recipient(peer("chi", "50.5"));
        assert_eq!(store.total_amount(), 150.5);

        store.add_bank_recipient(bank("1", "2000"));
        store.add_bank_recipient(bank("2", ""));
        store.add_bank_recipient(bank("3", "250.25"));
        assert_eq!(store.total_bank_amount(), 2250.25);
    }

    #[test]
    fn empty_lists_total_zero() {
        let store = TransferAccumulator::new();
        assert_eq!(store.total_amount(), 0.0);
        assert_eq!(store.total_bank_amount(), 0.0);
    }

    #[test]
    fn clear_then_add_yields_single_entry() {
        let mut store = TransferAccumulator::new();
        store.add_recipient(peer("ada", "10"));
        store.add_recipient(peer("bola", "20"));
        store.clear_recipients();
        store.add_recipient(peer("chi", "30"));
        assert_eq!(tags(&store), vec!["chi"]);

        store.add_bank_recipient(bank("1", "10"));
        store.clear_bank_recipients();
        assert!(store.bank_recipients().is_empty());
        assert_eq!(tags(&store), vec!["chi"]);
    }

    #[test]
    fn source_switch_retains_recipients_by_default() {
        let mut store = TransferAccumulator::new();
        assert_eq!(store.transfer_source(), TransferSource::Normal);

        store.add_recipient(peer("ada", "10"));
        store.add_bank_recipient(bank("1", "10"));

        store.set_transfer_source(TransferSource::SendToAfrica);
        store.set_transfer_source(TransferSource::Normal);

        assert_eq!(store.transfer_source(), TransferSource::Normal);
        assert_eq!(store.recipients().len(), 1);
        assert_eq!(store.bank_recipients().len(), 1);
    }

    #[test]
    fn clear_policy_empties_lists_only_on_change() {
        let mut store = TransferAccumulator::with_switch_policy(SourceSwitchPolicy::ClearRecipients);
        store.add_recipient(peer("ada", "10"));

        store.set_transfer_source(TransferSource::Normal);
        assert_eq!(store.recipients().len(), 1);

        store.add_bank_recipient(bank("1", "10"));
        store.set_transfer_source(TransferSource::SendToAfrica);
        assert!(store.recipients().is_empty());
        assert!(store.bank_recipients().is_empty());
        assert_eq!(store.transfer_source(), TransferSource::SendToAfrica);
    }

    #[test]
    fn reset_restores_defaults_but_keeps_policy() {
        let mut store = TransferAccumulator::with_switch_policy(SourceSwitchPolicy::ClearRecipients);
        store.set_transfer_source(TransferSource::SendToAfrica);
        store.add_recipient(peer("ada", "10"));
        store.add_bank_recipient(bank("1", "10"));

        store.reset();

        assert!(store.recipients().is_empty());
        assert!(store.bank_recipients().is_empty());
        assert_eq!(store.transfer_source(), TransferSource::Normal);
        assert_eq!(store.switch_policy(), SourceSwitchPolicy::ClearRecipients);
    }

    #[test]
    fn swiftpay_batch_maps_recipients() {
        let mut store = TransferAccumulator::new();
        assert_eq!(store.swiftpay_batch("1234").unwrap_err(), BatchError::Empty);

        let mut described = peer("bola", "49.5");
        described.description = "rent".to_string();
        store.add_recipient(peer("ada", "100"));
        store.add_recipient(described);

        let batch = store.swiftpay_batch("1234").unwrap();
        assert_eq!(batch.total_amount, "149.5");
        assert_eq!(batch.pin, "1234");
        assert_eq!(batch.swiftpay_accounts.len(), 2);
        assert_eq!(batch.swiftpay_accounts[0].id, "3");
        assert_eq!(batch.swiftpay_accounts[0].name, "ada name");
        assert_eq!(
            batch.swiftpay_accounts[0].description,
            DEFAULT_SWIFTPAY_DESCRIPTION
        );
        assert_eq!(batch.swiftpay_accounts[1].description, "rent");
        assert!(batch.swiftpay_accounts.iter().all(|a| a.source_link.is_none()));

        store.set_transfer_source(TransferSource::SendToAfrica);
        let batch = store.swiftpay_batch("1234").unwrap();
        assert!(batch
            .swiftpay_accounts
            .iter()
            .all(|a| a.source_link == Some(TransferSource::SendToAfrica)));
    }

    #[test]
    fn bank_batch_requires_two_recipients() {
        let mut store = TransferAccumulator::new();
        store.add_bank_recipient(bank("1", "100"));
        assert_eq!(
            store.bank_batch("1234").unwrap_err(),
            BatchError::TooFewRecipients {
                required: 2,
                found: 1
            }
        );

        store.add_bank_recipient(bank("2", "200"));
        store.set_transfer_source(TransferSource::SendToAfrica);
        let batch = store.bank_batch("1234").unwrap();
        assert_eq!(batch.total_amount, "300");
        assert_eq!(batch.bank_accounts.len(), 2);
        assert_eq!(batch.source_link, Some(TransferSource::SendToAfrica));
    }
}
