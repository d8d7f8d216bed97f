//! Concrete values shared by the state machine tests.

use lsd_poller::Direction;
use lsd_primitives::{
    msgs::{ChainMsg, TRANSFER_PORT},
    staking::TokenizedShareRecord,
    types::{ChainId, Coin, OpId, TxHash},
};

use crate::{
    plan::{ConfirmationProbe, FollowUp, PlannedTx, Quote, Step},
    request::{Accounts, OperationArgs, OperationRequest},
};

pub(crate) const TEST_OP_ID: OpId = OpId::from_bytes([7u8; 16]);
pub(crate) const SOURCE_ADDR: &str = "cosmos1user";
pub(crate) const HUB_ADDR: &str = "neutron1user";
pub(crate) const VALIDATOR_A: &str = "cosmosvaloper1a";
pub(crate) const VALIDATOR_B: &str = "cosmosvaloper1b";
pub(crate) const LSD_DENOM: &str = "cw20:neutron1lsd";

pub(crate) fn test_accounts() -> Accounts {
    Accounts {
        source: Some(SOURCE_ADDR.to_owned()),
        hub: Some(HUB_ADDR.to_owned()),
    }
}

pub(crate) fn stake_request() -> OperationRequest {
    OperationRequest::new(test_accounts(), OperationArgs::Stake { amount: 1_000 })
}

pub(crate) fn redelegate_request() -> OperationRequest {
    OperationRequest::new(
        test_accounts(),
        OperationArgs::RedelegateStaked { amount: 100 },
    )
}

pub(crate) fn test_tx_hash(n: u8) -> TxHash {
    TxHash::new(format!("{n:02X}").repeat(32))
}

pub(crate) fn test_record(id: u64) -> TokenizedShareRecord {
    TokenizedShareRecord {
        id,
        owner: SOURCE_ADDR.to_owned(),
        module_account: format!("cosmos1module{id}"),
        validator: VALIDATOR_B.to_owned(),
    }
}

pub(crate) fn hub_balance_probe(direction: Direction) -> ConfirmationProbe {
    ConfirmationProbe::Balance {
        chain: ChainId::new("neutron-1"),
        address: HUB_ADDR.to_owned(),
        denom: LSD_DENOM.to_owned(),
        direction,
    }
}

/// Redelegates 100 from A to B and tokenizes 99.
pub(crate) fn prepare_tx() -> PlannedTx {
    PlannedTx {
        step: Step::Prepare,
        chain: ChainId::new("cosmoshub-4"),
        sender: SOURCE_ADDR.to_owned(),
        msgs: vec![
            ChainMsg::BeginRedelegate {
                delegator_address: SOURCE_ADDR.to_owned(),
                validator_src_address: VALIDATOR_A.to_owned(),
                validator_dst_address: VALIDATOR_B.to_owned(),
                amount: Coin::new("uatom", 100),
            },
            ChainMsg::TokenizeShares {
                delegator_address: SOURCE_ADDR.to_owned(),
                validator_address: VALIDATOR_B.to_owned(),
                amount: Coin::new("uatom", 99),
                tokenized_share_owner: SOURCE_ADDR.to_owned(),
            },
        ],
        probe: ConfirmationProbe::ShareRecords {
            owner: SOURCE_ADDR.to_owned(),
            expected: 1,
        },
        followup: Some(FollowUp {
            tokenize_count: 1,
            direct: vec![],
        }),
        records: None,
        quote: Some(Quote {
            amount: 100,
            will_receive: Some(90),
        }),
    }
}

/// Sends the share tokens of `records` to the hub.
pub(crate) fn send_tx(records: Option<Vec<TokenizedShareRecord>>) -> PlannedTx {
    PlannedTx {
        step: Step::Send,
        chain: ChainId::new("cosmoshub-4"),
        sender: SOURCE_ADDR.to_owned(),
        msgs: vec![ChainMsg::IbcTransfer {
            source_port: TRANSFER_PORT.to_owned(),
            source_channel: "channel-0".to_owned(),
            token: Coin::new(format!("{VALIDATOR_B}/1"), 99),
            sender: SOURCE_ADDR.to_owned(),
            receiver: "neutron1manager".to_owned(),
            timeout_timestamp: 1,
            memo: "{}".to_owned(),
        }],
        probe: hub_balance_probe(Direction::Increase),
        followup: None,
        records,
        quote: None,
    }
}

/// The single transaction of a stake.
pub(crate) fn stake_tx() -> PlannedTx {
    PlannedTx {
        msgs: vec![ChainMsg::IbcTransfer {
            source_port: TRANSFER_PORT.to_owned(),
            source_channel: "channel-0".to_owned(),
            token: Coin::new("uatom", 1_000),
            sender: SOURCE_ADDR.to_owned(),
            receiver: "neutron1manager".to_owned(),
            timeout_timestamp: 1,
            memo: "{}".to_owned(),
        }],
        quote: Some(Quote {
            amount: 1_000,
            will_receive: Some(900),
        }),
        ..send_tx(None)
    }
}
