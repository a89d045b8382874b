//!
//! The node state seeder.
//!

use crate::block::Block;
use crate::node::Node;
use crate::reporter::Level;
use crate::reporter::Reporter;
use crate::utils;
use crate::vector::Accounts;

///
/// Pushes the pre-state accounts into the node, in their stored order.
///
pub fn seed_accounts<N>(node: &N, pre: &Accounts, reporter: &dyn Reporter) -> crate::Result<()>
where
    N: Node + ?Sized,
{
    for (address, account) in pre.iter() {
        node.set_code(*address, &account.code)?;
        node.set_balance(*address, account.balance)?;
        node.set_nonce(*address, account.nonce)?;
        for (key, value) in account.storage.iter() {
            node.set_storage_at(
                *address,
                utils::u256_to_h256(key),
                utils::u256_to_h256(value),
            )?;
        }

        reporter.report(
            Level::Debug,
            &format!(
                "Seeded {} (balance {}, nonce {}, {} code bytes, {} storage slots)",
                utils::to_checksum_address(address),
                account.balance,
                account.nonce,
                account.code.0.len(),
                account.storage.len(),
            ),
        );
    }

    Ok(())
}

///
/// Pushes the block context into the node.
///
/// The chain id of the first transaction is authoritative for the block.
///
pub fn seed_block<N>(node: &N, block: &Block, reporter: &dyn Reporter) -> crate::Result<()>
where
    N: Node + ?Sized,
{
    if let Some(chain_id) = block.chain_id() {
        node.set_chain_id(chain_id)?;
    }
    for (index, chain_id) in block.conflicting_chain_ids() {
        reporter.report(
            Level::Warning,
            &format!(
                "Transaction {} declares chain id {chain_id}, but the block is replayed with chain id {}",
                index + 1,
                block.chain_id().unwrap_or_default(),
            ),
        );
    }

    node.set_coinbase(block.header.coinbase)?;
    if let Some(base_fee) = block.header.base_fee_per_gas {
        node.set_next_block_base_fee(base_fee)?;
    }
    node.set_block_gas_limit(block.header.gas_limit)?;

    reporter.report(
        Level::Debug,
        &format!(
            "Seeded the context of block {} (coinbase {}, base fee {}, gas limit {})",
            block.header.number,
            utils::to_checksum_address(&block.header.coinbase),
            block
                .header
                .base_fee_per_gas
                .map(|base_fee| base_fee.to_string())
                .unwrap_or_else(|| "none".to_owned()),
            block.header.gas_limit,
        ),
    );

    Ok(())
}

///
/// Seeds the accounts, then the block context.
///
pub fn seed<N>(node: &N, pre: &Accounts, block: &Block, reporter: &dyn Reporter) -> crate::Result<()>
where
    N: Node + ?Sized,
{
    seed_accounts(node, pre, reporter)?;
    seed_block(node, block, reporter)?;
    reporter.report(
        Level::Info,
        &format!("Pre-state of {} accounts seeded", pre.len()),
    );
    Ok(())
}
