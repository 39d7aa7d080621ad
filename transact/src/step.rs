//! User-facing transaction steps built from accepted quotes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Resolves a message key with parameters into display text.
pub trait Translate {
    /// Translates `key`, substituting `params`.
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String;
}

/// [`Translate`] that renders keys verbatim, followed by their parameters.
#[derive(Clone, Copy, Debug, Default)]
pub struct MessageKeys;

impl Translate for MessageKeys {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> String {
        if params.is_empty() {
            return key.to_string();
        }
        let params: Vec<String> = params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        format!("{key}({})", params.join(", "))
    }
}

/// Kind of step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// A vault deposit.
    Deposit,
    /// A vault withdrawal.
    Withdraw,
}

impl StepKind {
    pub(crate) fn noun_key(self) -> &'static str {
        match self {
            Self::Deposit => "Deposit-noun",
            Self::Withdraw => "Withdraw-noun",
        }
    }
}

/// Wallet action dispatched when the user confirms a step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WalletAction {
    /// Deposit `amount` into the vault.
    Deposit {
        /// Vault to deposit into.
        vault_id: String,
        /// Amount in human units of the deposit token.
        amount: Decimal,
        /// Deposit the whole balance.
        max: bool,
    },
    /// Withdraw `amount` from the vault.
    Withdraw {
        /// Vault to withdraw from.
        vault_id: String,
        /// Amount in human units of the deposit token.
        amount: Decimal,
        /// Withdraw the whole balance.
        max: bool,
    },
}

/// Extra data attached to a step for the UI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepExtraInfo {
    /// Whether the step goes through the zap router.
    pub zap: bool,
    /// Vault the step acts on.
    pub vault_id: String,
}

/// A transaction step awaiting user confirmation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Kind of step.
    pub step: StepKind,
    /// Confirmation message.
    pub message: String,
    /// Wallet action to dispatch.
    pub action: WalletAction,
    /// Whether the step has been sent and is pending.
    pub pending: bool,
    /// Extra data for the UI.
    pub extra_info: StepExtraInfo,
}

/// Message key of transaction confirmations.
pub const TXN_CONFIRM_KEY: &str = "Vault-TxnConfirm";

/// Builds the confirmation message of a `kind` step.
pub(crate) fn confirm_message(kind: StepKind, t: &impl Translate) -> String {
    let noun = t.translate(kind.noun_key(), &[]);
    t.translate(TXN_CONFIRM_KEY, &[("type", &noun)])
}
