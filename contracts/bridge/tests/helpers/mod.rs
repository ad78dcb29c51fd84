//! Shared setup for the bridge integration tests.
#![allow(dead_code)]

use cosmwasm_std::{coins, to_json_binary, Addr, Binary, Empty, Uint128};
use cw20::{Cw20Coin, MinterResponse};
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};
use k256::ecdsa::SigningKey;

use bridge::hash::{
    change_tss_message, digest_for_network_class, halt_message, sha256, unwrap_message,
    wrap_message,
};
use bridge::msg::{
    BridgeInfoResponse, ExecuteMsg, FeeTokenPairResponse, InstantiateMsg, QueryMsg,
    SecurityInfoResponse,
};
use bridge::state::{UnwrapTokenRequest, WrapTokenRequest};
use bridge::ContractError;
use common::AssetInfo;

pub const DENOM: &str = "uznn";
pub const EVM_CLASS: u32 = 2;
pub const CHAIN_ID: u32 = 1;
pub const FOREIGN_BRIDGE: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const FOREIGN_TOKEN: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
pub const FOREIGN_OWNED_TOKEN: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";
pub const FOREIGN_RECIPIENT: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

pub const ADMINISTRATOR_DELAY: u64 = 20;
pub const SOFT_DELAY: u64 = 10;
pub const REDEEM_DELAY: u64 = 5;
pub const FEE_PERCENTAGE: u32 = 15;
pub const MIN_AMOUNT: u128 = 100;

// ============================================================================
// Contracts
// ============================================================================

fn contract_bridge() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        bridge::contract::execute,
        bridge::contract::instantiate,
        bridge::contract::query,
    );
    Box::new(contract)
}

fn contract_cw20() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

// ============================================================================
// Test Environment
// ============================================================================

pub struct TestEnv {
    pub app: App,
    pub bridge: Addr,
    pub admin: Addr,
    pub user: Addr,
    pub guardians: Vec<Addr>,
    pub tss: SigningKey,
}

/// Freshly instantiated bridge: no TSS key, orchestrator info or guardians.
pub fn setup() -> TestEnv {
    let mut app = App::default();
    let admin = Addr::unchecked("admin");
    let user = Addr::unchecked("user");

    app.init_modules(|router, _, storage| {
        router
            .bank
            .init_balance(storage, &admin, coins(100_000_000_000, DENOM))
            .unwrap();
        router
            .bank
            .init_balance(storage, &user, coins(100_000_000_000, DENOM))
            .unwrap();
    });

    let code_id = app.store_code(contract_bridge());
    let bridge = app
        .instantiate_contract(
            code_id,
            admin.clone(),
            &InstantiateMsg {
                administrator: admin.to_string(),
                administrator_delay: ADMINISTRATOR_DELAY,
                soft_delay: SOFT_DELAY,
                min_guardians: 2,
                unhalt_duration_in_momentums: 30,
                metadata: None,
            },
            &[],
            "bridge",
            Some(admin.to_string()),
        )
        .unwrap();

    TestEnv {
        app,
        bridge,
        admin,
        user,
        guardians: vec![
            Addr::unchecked("guardian1"),
            Addr::unchecked("guardian2"),
            Addr::unchecked("guardian3"),
        ],
        tss: signing_key(1),
    }
}

/// Bridge with orchestrator info, TSS key, three guardians, one EVM network
/// and a native token pair (15 bps fee, redeem delay 5).
pub fn setup_initialized() -> TestEnv {
    let mut env = setup();
    let admin = env.admin.clone();

    execute(
        &mut env,
        &admin,
        &ExecuteMsg::SetOrchestratorInfo {
            window_size: 10,
            key_gen_threshold: 2,
            confirmations_to_finality: 5,
            estimated_momentum_time: 10,
        },
    )
    .unwrap();

    let tss_key = compressed_key(&env.tss);
    execute_with_challenge(
        &mut env,
        &ExecuteMsg::ChangeTssECDSAPubKey {
            pub_key: tss_key,
            old_pub_key_signature: None,
            new_pub_key_signature: None,
        },
        SOFT_DELAY,
    );

    let guardians = env.guardians.iter().map(|g| g.to_string()).collect();
    execute_with_challenge(
        &mut env,
        &ExecuteMsg::NominateGuardians { guardians },
        ADMINISTRATOR_DELAY,
    );

    execute(
        &mut env,
        &admin,
        &ExecuteMsg::SetNetwork {
            network_class: EVM_CLASS,
            chain_id: CHAIN_ID,
            name: "Ethereum".to_string(),
            contract_address: FOREIGN_BRIDGE.to_string(),
            metadata: "{}".to_string(),
        },
    )
    .unwrap();

    set_token_pair(&mut env, native_pair_msg());
    env
}

pub fn native_zts() -> AssetInfo {
    AssetInfo::Native {
        denom: DENOM.to_string(),
    }
}

pub fn native_pair_msg() -> ExecuteMsg {
    ExecuteMsg::SetTokenPair {
        network_class: EVM_CLASS,
        chain_id: CHAIN_ID,
        zts: native_zts(),
        token_address: FOREIGN_TOKEN.to_string(),
        bridgeable: true,
        redeemable: true,
        owned: false,
        min_amount: Uint128::new(MIN_AMOUNT),
        fee_percentage: FEE_PERCENTAGE,
        redeem_delay: REDEEM_DELAY,
        metadata: "{}".to_string(),
    }
}

/// Instantiate a CW20 minted by the bridge and pair it as an owned token.
pub fn setup_owned_cw20(env: &mut TestEnv) -> Addr {
    let code_id = env.app.store_code(contract_cw20());
    let token = env
        .app
        .instantiate_contract(
            code_id,
            env.admin.clone(),
            &cw20_base::msg::InstantiateMsg {
                name: "Wrapped Ether".to_string(),
                symbol: "WETH".to_string(),
                decimals: 18,
                initial_balances: vec![Cw20Coin {
                    address: env.user.to_string(),
                    amount: Uint128::new(1_000_000_000),
                }],
                mint: Some(MinterResponse {
                    minter: env.bridge.to_string(),
                    cap: None,
                }),
                marketing: None,
            },
            &[],
            "weth",
            None,
        )
        .unwrap();

    set_token_pair(
        env,
        ExecuteMsg::SetTokenPair {
            network_class: EVM_CLASS,
            chain_id: CHAIN_ID,
            zts: AssetInfo::Cw20 {
                contract_addr: token.clone(),
            },
            token_address: FOREIGN_OWNED_TOKEN.to_string(),
            bridgeable: true,
            redeemable: true,
            owned: true,
            min_amount: Uint128::new(MIN_AMOUNT),
            fee_percentage: 100,
            redeem_delay: REDEEM_DELAY,
            metadata: "{}".to_string(),
        },
    );
    token
}

// ============================================================================
// Execution
// ============================================================================

pub fn execute(
    env: &mut TestEnv,
    sender: &Addr,
    msg: &ExecuteMsg,
) -> Result<AppResponse, ContractError> {
    env.app
        .execute_contract(sender.clone(), env.bridge.clone(), msg, &[])
        .map_err(|e| e.downcast::<ContractError>().unwrap())
}

pub fn execute_admin(env: &mut TestEnv, msg: &ExecuteMsg) -> Result<AppResponse, ContractError> {
    let admin = env.admin.clone();
    execute(env, &admin, msg)
}

/// Submit an administrator call, wait out its time challenge and confirm it.
pub fn execute_with_challenge(env: &mut TestEnv, msg: &ExecuteMsg, delay: u64) -> AppResponse {
    let res = execute_admin(env, msg).unwrap();
    assert_eq!(attr(&res, "time_challenge"), "started");
    advance_blocks(env, delay);
    let res = execute_admin(env, msg).unwrap();
    assert_eq!(attr(&res, "time_challenge"), "applied");
    res
}

pub fn set_token_pair(env: &mut TestEnv, msg: ExecuteMsg) {
    execute_with_challenge(env, &msg, SOFT_DELAY);
}

pub fn advance_blocks(env: &mut TestEnv, blocks: u64) {
    env.app.update_block(|block| {
        block.height += blocks;
        block.time = block.time.plus_seconds(blocks * 10);
    });
}

pub fn height(env: &TestEnv) -> u64 {
    env.app.block_info().height
}

pub fn chain_identifier(env: &TestEnv) -> String {
    env.app.block_info().chain_id
}

pub fn attr(res: &AppResponse, key: &str) -> String {
    res.events
        .iter()
        .flat_map(|e| &e.attributes)
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
        .unwrap_or_else(|| panic!("{} attribute not found", key))
}

pub fn hex_attr(res: &AppResponse, key: &str) -> Binary {
    let value = attr(res, key);
    Binary::from(hex::decode(value.trim_start_matches("0x")).unwrap())
}

pub fn wrap_native(env: &mut TestEnv, amount: u128) -> Result<AppResponse, ContractError> {
    env.app
        .execute_contract(
            env.user.clone(),
            env.bridge.clone(),
            &ExecuteMsg::WrapToken {
                network_class: EVM_CLASS,
                chain_id: CHAIN_ID,
                to_address: FOREIGN_RECIPIENT.to_string(),
            },
            &coins(amount, DENOM),
        )
        .map_err(|e| e.downcast::<ContractError>().unwrap())
}

// ============================================================================
// TSS Signing
// ============================================================================

pub fn signing_key(seed: u8) -> SigningKey {
    SigningKey::from_slice(&[seed; 32]).unwrap()
}

pub fn compressed_key(key: &SigningKey) -> Binary {
    Binary::from(key.verifying_key().to_encoded_point(true).as_bytes().to_vec())
}

/// 65-byte `r || s || v` signature with `v` in {27, 28}
pub fn sign_digest(key: &SigningKey, digest: &[u8; 32]) -> Binary {
    let (signature, recovery_id) = key.sign_prehash_recoverable(digest).unwrap();
    let mut bytes = signature.to_bytes().to_vec();
    bytes.push(recovery_id.to_byte() + 27);
    Binary::from(bytes)
}

pub fn sign_halt(env: &TestEnv, key: &SigningKey, tss_nonce: u64) -> Binary {
    let message = halt_message(tss_nonce, &chain_identifier(env));
    sign_digest(key, &sha256(&message))
}

pub fn sign_change_tss(
    env: &TestEnv,
    key: &SigningKey,
    tss_nonce: u64,
    new_key: &Binary,
) -> Binary {
    let message = change_tss_message(tss_nonce, &chain_identifier(env), new_key.as_slice());
    sign_digest(key, &sha256(&message))
}

pub fn unwrap_msg(tx_seed: u8, log_index: u32, to: &Addr, token: &str, amount: u128) -> UnwrapArgs {
    UnwrapArgs {
        transaction_hash: Binary::from(vec![tx_seed; 32]),
        log_index,
        to_address: to.to_string(),
        token_address: token.to_string(),
        amount: Uint128::new(amount),
    }
}

pub struct UnwrapArgs {
    pub transaction_hash: Binary,
    pub log_index: u32,
    pub to_address: String,
    pub token_address: String,
    pub amount: Uint128,
}

impl UnwrapArgs {
    pub fn signed_by(&self, key: &SigningKey) -> ExecuteMsg {
        let message = unwrap_message(
            EVM_CLASS,
            CHAIN_ID,
            self.transaction_hash.as_slice(),
            self.log_index,
            &self.to_address,
            &self.token_address,
            self.amount,
        );
        let digest = digest_for_network_class(&message, EVM_CLASS);
        ExecuteMsg::UnwrapToken {
            network_class: EVM_CLASS,
            chain_id: CHAIN_ID,
            transaction_hash: self.transaction_hash.clone(),
            log_index: self.log_index,
            to_address: self.to_address.clone(),
            token_address: self.token_address.clone(),
            amount: self.amount,
            signature: sign_digest(key, &digest),
        }
    }

    pub fn redeem(&self) -> ExecuteMsg {
        ExecuteMsg::RedeemUnwrap {
            transaction_hash: self.transaction_hash.clone(),
            log_index: self.log_index,
        }
    }
}

pub fn sign_wrap_request(key: &SigningKey, request: &WrapTokenRequest) -> Binary {
    let message = wrap_message(
        request.network_class,
        request.chain_id,
        request.id.as_slice(),
        &request.to_address,
        &request.token_address,
        request.amount,
        request.fee,
        FOREIGN_BRIDGE,
    );
    sign_digest(key, &digest_for_network_class(&message, request.network_class))
}

// ============================================================================
// Queries
// ============================================================================

pub fn query_bridge_info(env: &TestEnv) -> BridgeInfoResponse {
    env.app
        .wrap()
        .query_wasm_smart(&env.bridge, &QueryMsg::BridgeInfo {})
        .unwrap()
}

pub fn query_security_info(env: &TestEnv) -> SecurityInfoResponse {
    env.app
        .wrap()
        .query_wasm_smart(&env.bridge, &QueryMsg::SecurityInfo {})
        .unwrap()
}

pub fn query_fee(env: &TestEnv, zts: AssetInfo) -> Uint128 {
    let res: FeeTokenPairResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.bridge, &QueryMsg::FeeTokenPair { zts })
        .unwrap();
    res.accumulated_fee
}

pub fn query_wrap_request(env: &TestEnv, id: &Binary) -> WrapTokenRequest {
    env.app
        .wrap()
        .query_wasm_smart(&env.bridge, &QueryMsg::WrapRequest { id: id.clone() })
        .unwrap()
}

pub fn query_unwrap_request(env: &TestEnv, args: &UnwrapArgs) -> UnwrapTokenRequest {
    env.app
        .wrap()
        .query_wasm_smart(
            &env.bridge,
            &QueryMsg::UnwrapRequest {
                transaction_hash: args.transaction_hash.clone(),
                log_index: args.log_index,
            },
        )
        .unwrap()
}

pub fn native_balance(env: &TestEnv, addr: &Addr) -> u128 {
    env.app
        .wrap()
        .query_balance(addr, DENOM)
        .unwrap()
        .amount
        .u128()
}

pub fn cw20_balance(env: &TestEnv, token: &Addr, addr: &Addr) -> u128 {
    let res: cw20::BalanceResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            token,
            &cw20::Cw20QueryMsg::Balance {
                address: addr.to_string(),
            },
        )
        .unwrap();
    res.balance.u128()
}

pub fn cw20_supply(env: &TestEnv, token: &Addr) -> u128 {
    let res: cw20::TokenInfoResponse = env
        .app
        .wrap()
        .query_wasm_smart(token, &cw20::Cw20QueryMsg::TokenInfo {})
        .unwrap();
    res.total_supply.u128()
}

pub fn cw20_wrap_msg(bridge: &Addr, amount: u128) -> cw20::Cw20ExecuteMsg {
    cw20::Cw20ExecuteMsg::Send {
        contract: bridge.to_string(),
        amount: Uint128::new(amount),
        msg: to_json_binary(&bridge::msg::ReceiveMsg::WrapToken {
            network_class: EVM_CLASS,
            chain_id: CHAIN_ID,
            to_address: FOREIGN_RECIPIENT.to_string(),
        })
        .unwrap(),
    }
}
