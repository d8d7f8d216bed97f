//! Builds the hub-side contract executions for unstaking and withdrawing.

use lsd_primitives::{
    msgs::{ChainMsg, Cw20Msg, StakeManagerMsg},
    types::{Amount, Coin, UnstakeIndex},
};

use crate::errors::{PlanError, PlanResult};

/// Unstake messages: an allowance top-up for the stake manager if the current allowance does not
/// cover `amount`, then the unstake itself.
pub fn unstake_messages(
    owner: &str,
    lsd_token: &str,
    stake_manager: &str,
    pool_addr: &str,
    amount: Amount,
    allowance: Amount,
) -> PlanResult<Vec<ChainMsg>> {
    if amount == 0 {
        return Err(PlanError::ZeroAmount);
    }

    let mut msgs = Vec::with_capacity(2);
    if allowance < amount {
        msgs.push(ChainMsg::execute(
            owner,
            lsd_token,
            &Cw20Msg::IncreaseAllowance {
                spender: stake_manager.to_owned(),
                amount: amount - allowance,
            },
            Vec::new(),
        )?);
    }
    msgs.push(ChainMsg::execute(
        owner,
        stake_manager,
        &StakeManagerMsg::Unstake {
            amount,
            pool_addr: pool_addr.to_owned(),
        },
        Vec::new(),
    )?);
    Ok(msgs)
}

/// Withdraw message claiming `indices`, with the relayer fee attached as funds.
pub fn withdraw_message(
    owner: &str,
    stake_manager: &str,
    pool_addr: &str,
    receiver: &str,
    indices: Vec<UnstakeIndex>,
    fee: Option<Coin>,
) -> PlanResult<ChainMsg> {
    let funds = fee.into_iter().filter(|coin| coin.amount > 0).collect();
    Ok(ChainMsg::execute(
        owner,
        stake_manager,
        &StakeManagerMsg::Withdraw {
            pool_addr: pool_addr.to_owned(),
            receiver: receiver.to_owned(),
            unstake_index_list: indices,
        },
        funds,
    )?)
}
