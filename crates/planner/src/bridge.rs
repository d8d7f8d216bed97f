//! Builds transfers of the derivative token between the hub and bridge targets.

use base64::{engine::general_purpose::STANDARD, Engine};
use lsd_primitives::{
    hub::cw20_denom,
    msgs::{ChainMsg, Cw20Msg, Ics20TransferMsg, TRANSFER_PORT},
    types::{Amount, Coin},
};
use sha2::{Digest, Sha256};

use crate::errors::{PlanError, PlanResult};

/// IBC denomination of the derivative token on a bridge target reached over `remote_channel`.
pub fn bridge_denom(remote_channel: &str, lsd_token: &str) -> String {
    let trace = format!("{TRANSFER_PORT}/{remote_channel}/{}", cw20_denom(lsd_token));
    let digest = Sha256::digest(trace.as_bytes());
    format!("ibc/{}", hex::encode_upper(digest))
}

/// Sends derivative tokens from the hub through the cw20-ics20 contract.
pub fn from_hub(
    sender: &str,
    lsd_token: &str,
    ics20_contract: &str,
    hub_channel: &str,
    remote_receiver: &str,
    amount: Amount,
) -> PlanResult<ChainMsg> {
    if amount == 0 {
        return Err(PlanError::ZeroAmount);
    }

    let hook = serde_json::to_vec(&Ics20TransferMsg {
        channel: hub_channel.to_owned(),
        remote_address: remote_receiver.to_owned(),
    })?;

    Ok(ChainMsg::execute(
        sender,
        lsd_token,
        &Cw20Msg::Send {
            contract: ics20_contract.to_owned(),
            amount,
            msg: STANDARD.encode(hook),
        },
        Vec::new(),
    )?)
}

/// Sends derivative tokens from a bridge target back to the hub.
pub fn to_hub(
    sender: &str,
    remote_channel: &str,
    lsd_token: &str,
    hub_receiver: &str,
    amount: Amount,
    timeout_timestamp: u64,
) -> PlanResult<ChainMsg> {
    if amount == 0 {
        return Err(PlanError::ZeroAmount);
    }

    Ok(ChainMsg::IbcTransfer {
        source_port: TRANSFER_PORT.to_owned(),
        source_channel: remote_channel.to_owned(),
        token: Coin::new(bridge_denom(remote_channel, lsd_token), amount),
        sender: sender.to_owned(),
        receiver: hub_receiver.to_owned(),
        timeout_timestamp,
        memo: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_denom_is_uppercase_sha256_of_trace() {
        let denom = bridge_denom("channel-71", "neutron1lsd");
        let expected = Sha256::digest(b"transfer/channel-71/cw20:neutron1lsd");
        assert_eq!(denom, format!("ibc/{}", hex::encode_upper(expected)));
        assert_eq!(denom.len(), 4 + 64);
        assert!(denom[4..].chars().all(|c| !c.is_ascii_lowercase()));
    }

    #[test]
    fn from_hub_encodes_channel_hook() {
        let msg = from_hub(
            "neutron1user",
            "neutron1lsd",
            "neutron1ics20",
            "channel-1551",
            "stafi1user",
            10,
        )
        .unwrap();
        let ChainMsg::ExecuteContract { contract, msg, .. } = msg else {
            panic!("expected execute");
        };
        assert_eq!(contract, "neutron1lsd");
        let encoded = msg["send"]["msg"].as_str().unwrap();
        let decoded: serde_json::Value =
            serde_json::from_slice(&STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(
            decoded,
            serde_json::json!({"channel": "channel-1551", "remote_address": "stafi1user"})
        );
    }
}
