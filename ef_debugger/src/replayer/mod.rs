//!
//! The transaction replayer.
//!

pub mod execution_result;

use std::time::Duration;

use crate::block::Block;
use crate::error::Error;
use crate::node::Node;
use crate::node::Receipt;
use crate::reporter::Level;
use crate::reporter::Reporter;

pub use self::execution_result::ExecutionResult;

///
/// The transaction replayer.
///
/// Transaction N+1 is submitted only after transaction N is confirmed.
///
#[derive(Debug, Clone, Copy)]
pub struct Replayer {
    /// The receipt polling interval.
    poll_interval: Duration,
}

impl Default for Replayer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_POLL_INTERVAL)
    }
}

impl Replayer {
    /// The default receipt polling interval.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

    ///
    /// A shortcut constructor.
    ///
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    ///
    /// Replays the block transactions in order.
    ///
    pub fn replay<N>(
        &self,
        node: &N,
        block: &Block,
        reporter: &dyn Reporter,
    ) -> crate::Result<ExecutionResult>
    where
        N: Node + ?Sized,
    {
        if block.transactions.is_empty() {
            return Err(Error::EmptyBlock);
        }

        let mut receipts = Vec::with_capacity(block.transactions.len());
        for (index, transaction) in block.transactions.iter().enumerate() {
            let hash = node.send_raw_transaction(transaction.encoded.as_slice())?;
            if hash != transaction.hash() {
                reporter.report(
                    Level::Warning,
                    &format!(
                        "Transaction {} was accepted as {hash:?}, but its encoding hashes to {:?}",
                        index + 1,
                        transaction.hash(),
                    ),
                );
            }
            reporter.report(
                Level::Debug,
                &format!(
                    "Submitted {} transaction {} with nonce {}: {hash:?}",
                    transaction.kind,
                    index + 1,
                    transaction.nonce,
                ),
            );

            let receipt = self.wait_for_receipt(node, hash)?;
            if let Some(block_number) = receipt.block_number {
                reporter.report(
                    Level::Debug,
                    &format!("Transaction {} confirmed in block {block_number}", index + 1),
                );
            }
            if receipt.is_reverted() {
                reporter.report(
                    Level::Warning,
                    &format!("Transaction {} reverted: {hash:?}", index + 1),
                );
            }
            receipts.push(receipt);
        }

        let result = ExecutionResult::new(receipts);
        if result.receipts.iter().all(|receipt| receipt.gas_used.is_some())
            && result.gas_used() != block.header.gas_used
        {
            reporter.report(
                Level::Warning,
                &format!(
                    "The block header declares {} gas used, the replay used {}",
                    block.header.gas_used,
                    result.gas_used()
                ),
            );
        }
        reporter.report(
            Level::Info,
            &format!(
                "{} transactions replayed, {} gas used",
                result.receipts.len(),
                result.gas_used()
            ),
        );
        Ok(result)
    }

    ///
    /// Polls the receipt until the transaction is included.
    ///
    fn wait_for_receipt<N>(&self, node: &N, hash: web3::types::H256) -> crate::Result<Receipt>
    where
        N: Node + ?Sized,
    {
        loop {
            if let Some(receipt) = node.transaction_receipt(hash)? {
                return Ok(receipt);
            }
            std::thread::sleep(self.poll_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use web3::types::Address;
    use web3::types::U256;

    use super::Replayer;
    use crate::block::Block;
    use crate::error::Error;
    use crate::node::memory::Event;
    use crate::node::memory::MemoryNode;
    use crate::node::Node;
    use crate::reporter::recording::RecordingReporter;
    use crate::reporter::Level;
    use crate::testing;

    fn funded_node(sender: Address) -> MemoryNode {
        let node = MemoryNode::with_pending_polls(2);
        node.set_balance(sender, U256::from(10_000_000u64)).expect("Seeded");
        node.set_next_block_base_fee(U256::from(testing::BASE_FEE)).expect("Seeded");
        node.set_coinbase(testing::COINBASE).expect("Seeded");
        node
    }

    #[test]
    fn transactions_are_confirmed_in_order() {
        let key = testing::secret_key(1);
        let sender = testing::address_of(&key);
        let transactions: Vec<_> = (0..3)
            .map(|nonce| testing::legacy_transfer(&key, nonce, Address::repeat_byte(0x22), 1, 10, 1))
            .collect();
        let encoded = testing::encode_block(&testing::header_fields(1), &transactions);
        let block = Block::decode(encoded.as_slice()).expect("Valid block");

        let node = funded_node(sender);
        let result = Replayer::new(Duration::from_millis(1))
            .replay(&node, &block, &RecordingReporter::default())
            .expect("Replayed");

        let expected_hashes: Vec<_> = block.transactions.iter().map(|transaction| transaction.hash()).collect();
        assert_eq!(result.hashes(), expected_hashes);
        assert_eq!(result.gas_used(), U256::from(3 * testing::TRANSFER_GAS));

        let replay_events: Vec<_> = node
            .events()
            .into_iter()
            .filter(|event| !matches!(event, Event::Admin(_)))
            .collect();
        assert_eq!(
            replay_events,
            vec![
                Event::Submitted(expected_hashes[0]),
                Event::Confirmed(expected_hashes[0]),
                Event::Submitted(expected_hashes[1]),
                Event::Confirmed(expected_hashes[1]),
                Event::Submitted(expected_hashes[2]),
                Event::Confirmed(expected_hashes[2]),
            ]
        );
    }

    #[test]
    fn header_gas_used_is_compared() {
        let key = testing::secret_key(1);
        let sender = testing::address_of(&key);
        let transfer = testing::legacy_transfer(&key, 0, Address::repeat_byte(0x22), 1, 10, 1);

        let mut header = testing::header_fields(1);
        header[10] = testing::uint_bytes(testing::TRANSFER_GAS);
        let encoded = testing::encode_block(&header, &[transfer.clone()]);
        let block = Block::decode(encoded.as_slice()).expect("Valid block");
        let reporter = RecordingReporter::default();
        Replayer::new(Duration::from_millis(1))
            .replay(&funded_node(sender), &block, &reporter)
            .expect("Replayed");
        assert!(reporter.at(Level::Warning).is_empty());

        header[10] = testing::uint_bytes(2 * testing::TRANSFER_GAS);
        let encoded = testing::encode_block(&header, &[transfer]);
        let block = Block::decode(encoded.as_slice()).expect("Valid block");
        let reporter = RecordingReporter::default();
        Replayer::new(Duration::from_millis(1))
            .replay(&funded_node(sender), &block, &reporter)
            .expect("Replayed");
        assert_eq!(reporter.at(Level::Warning).len(), 1);
    }

    #[test]
    fn empty_block_fails_before_submission() {
        let encoded = testing::encode_block(&testing::header_fields(1), &[]);
        let block = Block::decode(encoded.as_slice()).expect("Valid block");

        let node = MemoryNode::default();
        assert!(matches!(
            Replayer::default().replay(&node, &block, &RecordingReporter::default()),
            Err(Error::EmptyBlock)
        ));
        assert!(node.events().is_empty());
    }

    #[test]
    fn rejected_submission_aborts_replay() {
        let key = testing::secret_key(1);
        let sender = testing::address_of(&key);
        let transactions = vec![
            testing::legacy_transfer(&key, 0, Address::repeat_byte(0x22), 1, 10, 1),
            testing::legacy_transfer(&key, 5, Address::repeat_byte(0x22), 1, 10, 1),
            testing::legacy_transfer(&key, 1, Address::repeat_byte(0x22), 1, 10, 1),
        ];
        let encoded = testing::encode_block(&testing::header_fields(1), &transactions);
        let block = Block::decode(encoded.as_slice()).expect("Valid block");

        let node = funded_node(sender);
        let result = Replayer::new(Duration::from_millis(1)).replay(
            &node,
            &block,
            &RecordingReporter::default(),
        );
        assert!(matches!(result, Err(Error::Environment { .. })));

        let submissions = node
            .events()
            .into_iter()
            .filter(|event| matches!(event, Event::Submitted(_)))
            .count();
        assert_eq!(submissions, 1);
        assert_eq!(node.account(&sender).nonce, U256::one());
    }
}
