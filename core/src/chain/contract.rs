use alloy::sol;

sol! {
    /// Read side of the balance-payments contract that gem top-ups go through.
    #[sol(rpc)]
    contract BalancePayments {
        function balances(uint256 productType, uint256 productId, uint256 entityId)
            external
            view
            returns (uint256 balance);
    }
}
