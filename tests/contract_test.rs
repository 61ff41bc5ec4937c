//! Contract Proxy, Wallet Gateway and Network Guard Tests
//!
//! Exercises the interaction layer below the session: account handshake,
//! chain id validation, handle binding and transaction submission.
//!
//! These tests are self-contained and do not require a node.
//!
//! Run with: cargo test --test contract_test -- --nocapture

mod common;

use alloy_primitives::U256;
use common::{gateway, test_config, ScriptedWallet, WalletScript, BUYER};
use vending_dapp::{network, ContractHandle, VendingError, WalletGateway};

// ============================================================================
// Wallet Gateway
// ============================================================================

#[tokio::test]
async fn test_detect_provider_has_no_side_effects() {
    let wallet = ScriptedWallet::new(WalletScript::default());
    let gateway = gateway(&wallet);

    assert!(gateway.detect_provider().is_some());
    assert!(WalletGateway::new(None).detect_provider().is_none());
    assert!(wallet.methods().is_empty());
}

#[tokio::test]
async fn test_signer_prefers_authorized_accounts() {
    let wallet = ScriptedWallet::new(WalletScript::default());
    let gateway = gateway(&wallet);

    // Nothing authorized yet: falls back to a prompt
    assert_eq!(gateway.signer().await, Ok(BUYER.to_string()));
    assert_eq!(wallet.methods(), vec!["eth_accounts", "eth_requestAccounts"]);

    wallet.clear_calls();
    assert_eq!(gateway.signer().await, Ok(BUYER.to_string()));
    assert_eq!(wallet.methods(), vec!["eth_accounts"]);
}

#[tokio::test]
async fn test_signer_without_accounts() {
    let wallet = ScriptedWallet::new(WalletScript {
        accounts: Vec::new(),
        ..Default::default()
    });

    assert_eq!(gateway(&wallet).signer().await, Err(VendingError::NoAccounts));
    assert_eq!(
        WalletGateway::new(None).signer().await,
        Err(VendingError::ProviderMissing)
    );
}

// ============================================================================
// Network Guard
// ============================================================================

#[tokio::test]
async fn test_network_guard_accepts_expected_chain() {
    let wallet = ScriptedWallet::new(WalletScript::default());

    assert_eq!(network::chain_id(wallet.as_ref()).await, Ok(31337));
    assert_eq!(network::ensure_network(wallet.as_ref(), 31337).await, Ok(()));
}

#[tokio::test]
async fn test_network_guard_reports_both_chain_ids() {
    let wallet = ScriptedWallet::new(WalletScript {
        chain_id: 11155111,
        ..Default::default()
    });

    assert_eq!(
        network::ensure_network(wallet.as_ref(), 31337).await,
        Err(VendingError::WrongNetwork {
            expected: 31337,
            actual: 11155111
        })
    );
}

// ============================================================================
// Contract Proxy
// ============================================================================

#[tokio::test]
async fn test_read_only_handle_reads_without_signer() -> anyhow::Result<()> {
    let wallet = ScriptedWallet::new(WalletScript {
        stocks: [3, 0, 8, 1],
        ..Default::default()
    });
    let config = test_config();

    let contract = ContractHandle::connect(&gateway(&wallet), &config, false).await?;

    assert_eq!(contract.signer(), None);
    assert_eq!(contract.address(), config.contract_address);
    assert_eq!(
        contract.check_stock(2).await,
        Ok(("Coke".to_string(), 8))
    );
    assert_eq!(wallet.methods(), vec!["eth_call"]);
    Ok(())
}

#[tokio::test]
async fn test_read_only_handle_refuses_writes() -> anyhow::Result<()> {
    let wallet = ScriptedWallet::new(WalletScript::default());
    let config = test_config();
    let contract = ContractHandle::connect(&gateway(&wallet), &config, false).await?;

    let result = contract.buy_item(0, config.item_price).await;

    assert!(matches!(result, Err(VendingError::SignerRequired)));
    assert_eq!(wallet.count("eth_sendTransaction"), 0);
    Ok(())
}

#[tokio::test]
async fn test_signed_handle_propagates_signer_failure() {
    let wallet = ScriptedWallet::new(WalletScript {
        reject_prompts: true,
        ..Default::default()
    });

    let result = ContractHandle::connect(&gateway(&wallet), &test_config(), true).await;

    assert!(matches!(
        result,
        Err(VendingError::UserRejectedRequest(ref msg)) if msg == "User rejected the request."
    ));
}

#[tokio::test]
async fn test_purchase_sends_price_and_confirms() -> anyhow::Result<()> {
    let wallet = ScriptedWallet::new(WalletScript::default());
    let config = test_config();
    let contract = ContractHandle::connect(&gateway(&wallet), &config, true).await?;

    let pending = contract.buy_item(1, config.item_price).await?;
    let hash = pending.hash();
    let receipt = pending.wait().await?;

    assert_eq!(receipt.transaction_hash, hash);
    assert!(receipt.succeeded());
    assert_eq!(wallet.stocks(), [5, 4, 5, 5]);
    assert_eq!(config.item_price, U256::from(100_000_000_000_000u64));
    Ok(())
}

#[tokio::test]
async fn test_failed_receipt_is_a_contract_revert() -> anyhow::Result<()> {
    let wallet = ScriptedWallet::new(WalletScript {
        revert_receipts: true,
        ..Default::default()
    });
    let config = test_config();
    let contract = ContractHandle::connect(&gateway(&wallet), &config, true).await?;

    let pending = contract.add_stock(0, U256::from(2u64)).await?;
    let hash = pending.hash();

    assert_eq!(
        pending.wait().await,
        Err(VendingError::ContractRevert(format!(
            "transaction {} reverted",
            hash
        )))
    );
    assert_eq!(wallet.stocks(), [5; 4]);
    Ok(())
}

#[tokio::test]
async fn test_restock_and_withdraw_submit_transactions() -> anyhow::Result<()> {
    let wallet = ScriptedWallet::new(WalletScript::default());
    let config = test_config();
    let contract = ContractHandle::connect(&gateway(&wallet), &config, true).await?;

    contract.add_stock(3, U256::from(10u64)).await?.wait().await?;
    contract.withdraw_balance().await?.wait().await?;

    assert_eq!(wallet.stocks(), [5, 5, 5, 15]);
    assert_eq!(wallet.count("eth_sendTransaction"), 2);
    Ok(())
}
