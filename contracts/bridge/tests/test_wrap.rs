//! Outgoing transfers, wrap signatures and fee collection.

mod helpers;

use bridge::msg::{ExecuteMsg, QueryMsg, WrapRequestsResponse};
use bridge::ContractError;
use common::AssetInfo;
use cosmwasm_std::{coins, Binary, Uint128};
use cw_multi_test::Executor;
use helpers::*;

#[test]
fn test_wrap_native_takes_fee() {
    let mut env = setup_initialized();
    let user = env.user.clone();
    let bridge_addr = env.bridge.clone();
    let user_before = native_balance(&env, &user);

    let res = wrap_native(&mut env, 1_500_000_000).unwrap();
    assert_eq!(attr(&res, "fee"), "2250000");
    assert_eq!(attr(&res, "owned"), "false");

    // Custody holds the full amount; the fee is only a ledger entry
    assert_eq!(native_balance(&env, &bridge_addr), 1_500_000_000);
    assert_eq!(native_balance(&env, &user), user_before - 1_500_000_000);
    assert_eq!(query_fee(&env, native_zts()), Uint128::new(2_250_000));

    let id = hex_attr(&res, "id");
    let request = query_wrap_request(&env, &id);
    assert_eq!(request.id, id);
    assert_eq!(request.amount, Uint128::new(1_500_000_000));
    assert_eq!(request.fee, Uint128::new(2_250_000));
    assert_eq!(request.token_address, FOREIGN_TOKEN);
    assert_eq!(request.to_address, FOREIGN_RECIPIENT);
    assert_eq!(request.creation_momentum_height, height(&env));
    assert!(request.signature.is_empty());
}

#[test]
fn test_fee_ledger_only_grows() {
    let mut env = setup_initialized();

    wrap_native(&mut env, 1_000_000).unwrap();
    assert_eq!(query_fee(&env, native_zts()), Uint128::new(1_500));

    // Fee rounds down to zero for small amounts
    wrap_native(&mut env, 600).unwrap();
    assert_eq!(query_fee(&env, native_zts()), Uint128::new(1_500));

    wrap_native(&mut env, 2_000_000).unwrap();
    assert_eq!(query_fee(&env, native_zts()), Uint128::new(4_500));

    let res: WrapRequestsResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.bridge,
            &QueryMsg::WrapRequests {
                start_after: None,
                limit: None,
            },
        )
        .unwrap();
    assert_eq!(res.requests.len(), 3);
}

#[test]
fn test_identical_wraps_in_one_block_are_distinct() {
    let mut env = setup_initialized();
    let bridge_addr = env.bridge.clone();

    let first = wrap_native(&mut env, 1_000_000).unwrap();
    let second = wrap_native(&mut env, 1_000_000).unwrap();

    let first_id = hex_attr(&first, "id");
    let second_id = hex_attr(&second, "id");
    assert_ne!(first_id, second_id);
    assert_eq!(query_wrap_request(&env, &first_id).amount, Uint128::new(1_000_000));
    assert_eq!(query_wrap_request(&env, &second_id).amount, Uint128::new(1_000_000));

    assert_eq!(native_balance(&env, &bridge_addr), 2_000_000);
    assert_eq!(query_fee(&env, native_zts()), Uint128::new(3_000));
}

#[test]
fn test_wrap_rejections() {
    let mut env = setup_initialized();

    assert_eq!(
        wrap_native(&mut env, MIN_AMOUNT - 1).unwrap_err(),
        ContractError::InvalidMinAmount
    );

    let no_funds = env
        .app
        .execute_contract(
            env.user.clone(),
            env.bridge.clone(),
            &ExecuteMsg::WrapToken {
                network_class: EVM_CLASS,
                chain_id: CHAIN_ID,
                to_address: FOREIGN_RECIPIENT.to_string(),
            },
            &[],
        )
        .unwrap_err()
        .downcast::<ContractError>()
        .unwrap();
    assert_eq!(no_funds, ContractError::InvalidTokenOrAmount);

    let bad_recipient = env
        .app
        .execute_contract(
            env.user.clone(),
            env.bridge.clone(),
            &ExecuteMsg::WrapToken {
                network_class: EVM_CLASS,
                chain_id: CHAIN_ID,
                to_address: "not-an-address".to_string(),
            },
            &coins(1_000, DENOM),
        )
        .unwrap_err()
        .downcast::<ContractError>()
        .unwrap();
    assert!(matches!(bad_recipient, ContractError::ForbiddenParam { .. }));

    let unknown = env
        .app
        .execute_contract(
            env.user.clone(),
            env.bridge.clone(),
            &ExecuteMsg::WrapToken {
                network_class: EVM_CLASS,
                chain_id: 5,
                to_address: FOREIGN_RECIPIENT.to_string(),
            },
            &coins(1_000, DENOM),
        )
        .unwrap_err()
        .downcast::<ContractError>()
        .unwrap();
    assert!(matches!(unknown, ContractError::UnknownNetwork { .. }));

    assert_eq!(query_fee(&env, native_zts()), Uint128::zero());
}

#[test]
fn test_wrap_requires_bridgeable_pair() {
    let mut env = setup_initialized();
    set_token_pair(
        &mut env,
        ExecuteMsg::SetTokenPair {
            network_class: EVM_CLASS,
            chain_id: CHAIN_ID,
            zts: native_zts(),
            token_address: FOREIGN_TOKEN.to_string(),
            bridgeable: false,
            redeemable: true,
            owned: false,
            min_amount: Uint128::new(MIN_AMOUNT),
            fee_percentage: FEE_PERCENTAGE,
            redeem_delay: REDEEM_DELAY,
            metadata: "{}".to_string(),
        },
    );

    assert_eq!(
        wrap_native(&mut env, 1_000).unwrap_err(),
        ContractError::TokenNotBridgeable
    );
}

#[test]
fn test_wrap_requires_initialized_bridge() {
    let mut env = setup();
    assert_eq!(
        wrap_native(&mut env, 1_000).unwrap_err(),
        ContractError::BridgeNotInitialized
    );
}

#[test]
fn test_update_wrap_token_signature() {
    let mut env = setup_initialized();
    let user = env.user.clone();
    let res = wrap_native(&mut env, 1_000_000).unwrap();
    let id = hex_attr(&res, "id");
    let request = query_wrap_request(&env, &id);

    let forged = sign_wrap_request(&signing_key(9), &request);
    let err = execute(
        &mut env,
        &user,
        &ExecuteMsg::UpdateWrapToken {
            id: id.clone(),
            signature: forged,
        },
    )
    .unwrap_err();
    assert_eq!(err, ContractError::InvalidECDSASignature);

    let signature = sign_wrap_request(&env.tss, &request);
    execute(
        &mut env,
        &user,
        &ExecuteMsg::UpdateWrapToken {
            id: id.clone(),
            signature: signature.clone(),
        },
    )
    .unwrap();
    assert_eq!(query_wrap_request(&env, &id).signature, signature);

    let err = execute(
        &mut env,
        &user,
        &ExecuteMsg::UpdateWrapToken {
            id: Binary::from(vec![0xab; 32]),
            signature,
        },
    )
    .unwrap_err();
    assert_eq!(err, ContractError::DataNonExistent);
}

#[test]
fn test_update_wrap_token_after_key_rotation() {
    let mut env = setup_initialized();
    let user = env.user.clone();
    let res = wrap_native(&mut env, 1_000_000).unwrap();
    let id = hex_attr(&res, "id");
    let request = query_wrap_request(&env, &id);

    let old_signature = sign_wrap_request(&env.tss, &request);
    execute(
        &mut env,
        &user,
        &ExecuteMsg::UpdateWrapToken {
            id: id.clone(),
            signature: old_signature,
        },
    )
    .unwrap();

    execute_admin(&mut env, &ExecuteMsg::SetAllowKeyGen { allow_key_gen: true }).unwrap();
    let new_key = signing_key(5);
    let new_compressed = compressed_key(&new_key);
    let rotate = ExecuteMsg::ChangeTssECDSAPubKey {
        pub_key: new_compressed.clone(),
        old_pub_key_signature: Some(sign_change_tss(&env, &env.tss, 0, &new_compressed)),
        new_pub_key_signature: Some(sign_change_tss(&env, &new_key, 0, &new_compressed)),
    };
    execute(&mut env, &user, &rotate).unwrap();

    let new_signature = sign_wrap_request(&new_key, &request);
    execute(
        &mut env,
        &user,
        &ExecuteMsg::UpdateWrapToken {
            id: id.clone(),
            signature: new_signature.clone(),
        },
    )
    .unwrap();
    assert_eq!(query_wrap_request(&env, &id).signature, new_signature);
}

#[test]
fn test_wrap_owned_cw20_burns_all_but_fee() {
    let mut env = setup_initialized();
    let token = setup_owned_cw20(&mut env);
    let user = env.user.clone();
    let bridge_addr = env.bridge.clone();
    let supply_before = cw20_supply(&env, &token);

    let res = env
        .app
        .execute_contract(
            user.clone(),
            token.clone(),
            &cw20_wrap_msg(&bridge_addr, 1_000_000),
            &[],
        )
        .unwrap();
    assert_eq!(attr(&res, "fee"), "10000");
    assert_eq!(attr(&res, "owned"), "true");

    assert_eq!(cw20_supply(&env, &token), supply_before - 990_000);
    assert_eq!(cw20_balance(&env, &token, &bridge_addr), 10_000);
    assert_eq!(cw20_balance(&env, &token, &user), 1_000_000_000 - 1_000_000);

    let zts = AssetInfo::Cw20 {
        contract_addr: token.clone(),
    };
    assert_eq!(query_fee(&env, zts.clone()), Uint128::new(10_000));

    let request = query_wrap_request(&env, &hex_attr(&res, "id"));
    assert_eq!(request.token_standard, zts);
    assert_eq!(request.token_address, FOREIGN_OWNED_TOKEN);
}

#[test]
fn test_collect_fees() {
    let mut env = setup_initialized();
    let admin = env.admin.clone();
    let user = env.user.clone();

    assert_eq!(
        execute_admin(
            &mut env,
            &ExecuteMsg::CollectFees {
                zts: native_zts(),
                recipient: None,
            },
        )
        .unwrap_err(),
        ContractError::InvalidTokenOrAmount
    );

    wrap_native(&mut env, 1_500_000_000).unwrap();

    assert_eq!(
        execute(
            &mut env,
            &user,
            &ExecuteMsg::CollectFees {
                zts: native_zts(),
                recipient: None,
            },
        )
        .unwrap_err(),
        ContractError::PermissionDenied
    );

    let admin_before = native_balance(&env, &admin);
    execute_admin(
        &mut env,
        &ExecuteMsg::CollectFees {
            zts: native_zts(),
            recipient: None,
        },
    )
    .unwrap();
    assert_eq!(native_balance(&env, &admin), admin_before + 2_250_000);
    assert_eq!(query_fee(&env, native_zts()), Uint128::zero());
    assert_eq!(native_balance(&env, &env.bridge), 1_500_000_000 - 2_250_000);
}

#[test]
fn test_collect_owned_fees_to_recipient() {
    let mut env = setup_initialized();
    let token = setup_owned_cw20(&mut env);
    let user = env.user.clone();
    let bridge_addr = env.bridge.clone();

    env.app
        .execute_contract(
            user,
            token.clone(),
            &cw20_wrap_msg(&bridge_addr, 500_000),
            &[],
        )
        .unwrap();

    execute_admin(
        &mut env,
        &ExecuteMsg::CollectFees {
            zts: AssetInfo::Cw20 {
                contract_addr: token.clone(),
            },
            recipient: Some("treasury".to_string()),
        },
    )
    .unwrap();
    let treasury = cosmwasm_std::Addr::unchecked("treasury");
    assert_eq!(cw20_balance(&env, &token, &treasury), 5_000);
    assert_eq!(cw20_balance(&env, &token, &bridge_addr), 0);
}
