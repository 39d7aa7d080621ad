//! Contract bindings of standard vaults.
#![allow(missing_docs)]

alloy::sol! {
    /// Interface of a standard auto-compounding vault.
    ///
    /// The vault contract is also the ERC-20 share token. The `BNB` suffixed
    /// functions wrap and unwrap the chain's native currency, whichever chain
    /// the vault is deployed on.
    #[sol(rpc)]
    interface IStandardVault {
        function getPricePerFullShare() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);

        function deposit(uint256 _amount) external;
        function depositAll() external;
        function depositBNB() external payable;

        function withdraw(uint256 _shares) external;
        function withdrawAll() external;
        function withdrawBNB(uint256 _shares) external;
        function withdrawAllBNB() external;
    }
}
