//! Stealth payment creation (sender side) and payment ids.
//!
//! The sender picks a random transaction secret `r`, publishes `R = r·G`
//! (or `R = r·D` when paying a subaddress with spend key `D`) in the extra
//! field and derives every output from `S = 8·r·V`. The recipient recovers
//! the same `S` as `8·v·R`.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use xmrkit_core::constants::{
    ENCRYPTED_PAYMENT_ID_TAIL, LONG_PAYMENT_ID_SIZE, MAX_ENCRYPTED_AMOUNT_SIZE, PAYMENT_ID_SIZE,
};
use xmrkit_core::error::{Result, XmrError};
use xmrkit_core::types::{AddressType, LedgerOutput, LedgerTransaction};
use xmrkit_crypto::{
    compute_view_tag, derivation_scalar, encrypt_amount, keccak256_concat, one_time_public_key,
    shared_secret, PrivateKey, PublicKey, SharedSecret,
};

use crate::address::MoneroAddress;
use crate::extra::build_extra;

// ═══════════════════════════════════════════════════════════════════════════════
// PAYMENT IDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Generates a random short payment id for integrated addresses.
pub fn new_payment_id64() -> [u8; PAYMENT_ID_SIZE] {
    let mut id = [0u8; PAYMENT_ID_SIZE];
    OsRng.fill_bytes(&mut id);
    id
}

/// Generates a random legacy long payment id.
pub fn new_payment_id256() -> [u8; LONG_PAYMENT_ID_SIZE] {
    let mut id = [0u8; LONG_PAYMENT_ID_SIZE];
    OsRng.fill_bytes(&mut id);
    id
}

/// XORs a short payment id with `keccak256(S || 0x8d)`.
///
/// The operation is its own inverse, so the recipient decrypts with the same
/// call.
pub fn encrypt_payment_id(
    payment_id: &[u8; PAYMENT_ID_SIZE],
    secret: &SharedSecret,
) -> [u8; PAYMENT_ID_SIZE] {
    let keystream = keccak256_concat(&[secret.as_bytes(), &[ENCRYPTED_PAYMENT_ID_TAIL]]);
    let mut out = *payment_id;
    for (b, k) in out.iter_mut().zip(keystream.iter()) {
        *b ^= k;
    }
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUTS
// ═══════════════════════════════════════════════════════════════════════════════

/// One output as the sender builds it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealthOutput {
    /// Position in the transaction
    pub index: u64,
    /// One-time output key
    pub output_key: PublicKey,
    /// View tag
    pub view_tag: u8,
    /// Encrypted amount
    pub encrypted_amount: [u8; MAX_ENCRYPTED_AMOUNT_SIZE],
}

impl StealthOutput {
    /// Renders the output the way a daemon reports it.
    pub fn to_ledger_output(&self) -> LedgerOutput {
        LedgerOutput::new(self.output_key.to_hex(), hex::encode(self.encrypted_amount))
            .with_view_tag(hex::encode([self.view_tag]))
    }
}

/// Builds output `index` paying `amount` to `recipient` under transaction
/// secret `tx_secret`.
pub fn create_output(
    recipient: &MoneroAddress,
    tx_secret: &PrivateKey,
    index: u64,
    amount: u64,
) -> StealthOutput {
    let secret = shared_secret(tx_secret, recipient.public_view_key());
    let si = derivation_scalar(&secret, index);
    StealthOutput {
        index,
        output_key: one_time_public_key(&si, recipient.public_spend_key()),
        view_tag: compute_view_tag(&secret, index),
        encrypted_amount: encrypt_amount(&si, amount),
    }
}

/// Transaction public key for `recipient`: `r·D` for subaddresses, `r·G`
/// otherwise.
pub fn tx_public_key_for(recipient: &MoneroAddress, tx_secret: &PrivateKey) -> PublicKey {
    match recipient.address_type() {
        AddressType::Sub => recipient.public_spend_key().mul_scalar(tx_secret.as_scalar()),
        AddressType::Primary | AddressType::Integrated => tx_secret.public_key(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PAYMENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Stealth payment: transaction public key, extra field and outputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealthPayment {
    /// Transaction public key published in the extra field
    pub tx_public_key: PublicKey,
    /// Extra field carrying the key and an optional encrypted payment id
    pub extra: Vec<u8>,
    /// Outputs in order
    pub outputs: Vec<StealthOutput>,
}

impl StealthPayment {
    /// Renders the payment as a ledger transaction.
    pub fn to_transaction(&self, hash: impl Into<String>) -> LedgerTransaction {
        LedgerTransaction::new(
            hash,
            self.extra.clone(),
            self.outputs.iter().map(StealthOutput::to_ledger_output).collect(),
        )
    }
}

/// Builder for [`StealthPayment`].
#[derive(Default)]
pub struct StealthPaymentBuilder {
    tx_secret: Option<PrivateKey>,
    recipients: Vec<(MoneroAddress, u64)>,
    payment_id: Option<[u8; PAYMENT_ID_SIZE]>,
}

impl StealthPaymentBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the transaction secret instead of drawing a random one.
    pub fn tx_secret(mut self, tx_secret: PrivateKey) -> Self {
        self.tx_secret = Some(tx_secret);
        self
    }

    /// Adds an output paying `amount` atomic units to `address`.
    pub fn recipient(mut self, address: MoneroAddress, amount: u64) -> Self {
        self.recipients.push((address, amount));
        self
    }

    /// Attaches a payment id, overriding one taken from an integrated address.
    pub fn payment_id(mut self, payment_id: [u8; PAYMENT_ID_SIZE]) -> Self {
        self.payment_id = Some(payment_id);
        self
    }

    /// Builds the payment.
    ///
    /// # Errors
    /// Returns `ValidationError` without recipients, or when a subaddress is
    /// paid together with other recipients (that needs per-output keys).
    pub fn build(self) -> Result<StealthPayment> {
        let Some((first, _)) = self.recipients.first() else {
            return Err(XmrError::ValidationError("at least one recipient is required".into()));
        };

        let has_subaddress = self
            .recipients
            .iter()
            .any(|(address, _)| address.address_type() == AddressType::Sub);
        if has_subaddress && self.recipients.len() > 1 {
            return Err(XmrError::ValidationError(
                "a subaddress must be the only recipient".into(),
            ));
        }

        let tx_secret = self.tx_secret.unwrap_or_else(PrivateKey::generate);
        let tx_public_key = tx_public_key_for(first, &tx_secret);

        let outputs: Vec<StealthOutput> = self
            .recipients
            .iter()
            .enumerate()
            .map(|(index, (address, amount))| create_output(address, &tx_secret, index as u64, *amount))
            .collect();

        // The id is encrypted for the recipient it belongs to
        let integrated = self
            .recipients
            .iter()
            .find_map(|(address, _)| address.payment_id().map(|id| (address, id)));
        let payment_id = match (self.payment_id, integrated) {
            (Some(id), Some((address, _))) => Some((address, id)),
            (Some(id), None) => Some((first, id)),
            (None, found) => found,
        };
        let encrypted_id = payment_id.map(|(address, id)| {
            let secret = shared_secret(&tx_secret, address.public_view_key());
            encrypt_payment_id(&id, &secret)
        });

        Ok(StealthPayment {
            extra: build_extra(&tx_public_key, encrypted_id.as_ref()),
            tx_public_key,
            outputs,
        })
    }
}
