//! Value types shared by quotes and zap steps.
mod amount;
mod token;
mod vault;

pub use amount::{Allowance, InputTokenAmount, TokenAmount};
pub use token::{ChainId, Erc20Token, NativeToken, Token, TokenAddress};
pub use vault::{VaultKind, VaultStandard};
