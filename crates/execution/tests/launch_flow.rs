//! End-to-end launch: deploy, bind the oracle, trade through the router.

use clmm_launch_domain::prelude::*;
use clmm_launch_execution::prelude::*;
use clmm_launch_protocols::prelude::*;
use primitive_types::{H160, U256};
use proptest::prelude::*;
use std::sync::Arc;

const E18: u64 = 1_000_000_000_000_000_000;
const NOW: u64 = 1_700_000_000;

fn addr(n: u64) -> Address {
    H160::from_low_u64_be(n)
}

fn units(whole: u64) -> TokenAmount {
    TokenAmount::from_units(whole, 18).unwrap()
}

const DEPLOYER: u64 = 0xd0;
const MANAGER: u64 = 0xd1;
const TRADER: u64 = 0xd2;

/// A token that sorts before the wrapped native token.
fn low_token() -> Address {
    addr(0x1000)
}

/// A token that sorts after the wrapped native token.
fn high_token() -> Address {
    H160::repeat_byte(0xee)
}

struct Launch {
    registry: Arc<PoolRegistry>,
    weth: Arc<WrappedNative>,
    token: Arc<Erc20Ledger>,
    manager: Arc<PoolDeploymentManager>,
    oracle: PriceOracle,
    router: Router,
}

async fn setup(token_address: Address, balance: TokenAmount) -> Launch {
    let directory = Arc::new(TokenDirectory::new());
    let weth = Arc::new(WrappedNative::new(Token::new(
        DEFAULT_WRAPPED_NATIVE_ADDRESS,
        "WETH",
        18,
        "Wrapped Ether",
    )));
    let token = Arc::new(Erc20Ledger::new(
        Token::new(token_address, "LCH", 18, "Launch Token"),
        Some(addr(DEPLOYER)),
    ));
    directory.register(weth.clone()).await.unwrap();
    directory.register(token.clone()).await.unwrap();
    if !balance.is_zero() {
        token
            .mint(addr(DEPLOYER), addr(MANAGER), balance)
            .await
            .unwrap();
    }

    let clock = Arc::new(FixedClock::new(NOW));
    let registry = Arc::new(PoolRegistry::new(directory, clock.clone()));
    let manager = Arc::new(PoolDeploymentManager::new(
        addr(MANAGER),
        DeploymentConfig::default(),
        registry.clone(),
        weth.clone(),
    ));
    let oracle = PriceOracle::new(registry.clone(), weth.address());
    let router = Router::new(RouterConfig::default(), registry.clone(), clock);
    Launch {
        registry,
        weth,
        token,
        manager,
        oracle,
        router,
    }
}

async fn deployed(token_address: Address) -> Launch {
    let launch = setup(token_address, units(40_000_000)).await;
    let handle = launch
        .manager
        .deploy_coin_and_pool(units(100), token_address)
        .await
        .unwrap();
    launch.oracle.set_pool(handle).await.unwrap();
    launch
}

fn assert_launch_price(price: Price) {
    let expected = U256::from(2_500_000_000_000u64);
    let wad = price.wad();
    assert!(
        wad == expected || wad == expected - U256::one(),
        "effective price {price} is not 2.5e-6"
    );
}

async fn assert_tick_brackets(oracle: &PriceOracle) {
    let (sqrt_price, tick) = oracle.get_pool_price().await.unwrap();
    assert!(tick.sqrt_price() <= sqrt_price);
    if tick < Tick::MAX {
        let next = Tick::new(tick.value() + 1).unwrap();
        assert!(sqrt_price < next.sqrt_price());
    }
}

#[tokio::test]
async fn test_launch_price_with_token_as_token0() {
    let launch = deployed(low_token()).await;
    let handle = launch.manager.get_address_pool().await.unwrap();
    let pool = launch.registry.pool(handle).await.unwrap();
    assert_eq!(pool.token0, low_token());
    assert_eq!(pool.fee_tier, FeeTier::Medium);
    assert_eq!(pool.tick.value(), -128999);

    assert_launch_price(launch.oracle.calc_effective_price().await.unwrap());
    assert_tick_brackets(&launch.oracle).await;
}

#[tokio::test]
async fn test_launch_price_with_token_as_token1() {
    let launch = deployed(high_token()).await;
    let handle = launch.manager.get_address_pool().await.unwrap();
    let pool = launch.registry.pool(handle).await.unwrap();
    assert_eq!(pool.token1, high_token());
    assert_eq!(pool.tick.value(), 128998);

    let price = launch.oracle.calc_effective_price().await.unwrap();
    assert_launch_price(price);
    assert_tick_brackets(&launch.oracle).await;

    // The reported price is the reciprocal of the raw pool price.
    let (sqrt_price, _) = launch.oracle.get_pool_price().await.unwrap();
    let inverted = sqrt_price.to_price().invert();
    assert!(price.abs_diff(&inverted) <= price.raw() / U256::exp10(20) + U256::one());
}

#[tokio::test]
async fn test_deployment_record_and_reserves() {
    let launch = deployed(low_token()).await;
    let state = launch.manager.state().await;
    assert_eq!(state.phase, DeploymentPhase::Deployed);
    assert_eq!(state.token, Some(low_token()));
    assert_eq!(state.token_balance, units(40_000_000));
    assert_eq!(state.native_funding, units(100));
    assert_eq!(state.liquidity, 63_245_553_203_367_586_639_983);

    let pool = launch.registry.pool(state.pool.unwrap()).await.unwrap();
    assert!(launch.token.balance_of(pool.account()).await <= units(40_000_000));
    assert!(launch.weth.balance_of(pool.account()).await <= units(100));
    assert!(launch.token.is_conserved().await);
    assert!(launch.weth.is_conserved().await);
}

#[tokio::test]
async fn test_second_deploy_keeps_first_pool() {
    let launch = deployed(low_token()).await;
    let first = launch.manager.get_address_pool().await.unwrap();

    let second = launch
        .manager
        .deploy_coin_and_pool(units(1), low_token())
        .await;
    assert_eq!(second, Err(LaunchError::AlreadyDeployed));
    assert_eq!(launch.manager.get_address_pool().await.unwrap(), first);
    assert_eq!(launch.registry.pools().await.len(), 1);
}

#[tokio::test]
async fn test_zero_balance_deploy() {
    let launch = setup(low_token(), TokenAmount::zero()).await;
    let result = launch
        .manager
        .deploy_coin_and_pool(units(100), low_token())
        .await;
    assert_eq!(result, Err(LaunchError::InsufficientTokenBalance(low_token())));
    assert_eq!(launch.manager.state().await.phase, DeploymentPhase::Uninitialized);
    assert!(launch.registry.pools().await.is_empty());
    assert!(launch.weth.total_supply().await.is_zero());
}

#[tokio::test]
async fn test_unbound_oracle() {
    let launch = setup(low_token(), units(1)).await;
    assert_eq!(
        launch.oracle.calc_effective_price().await,
        Err(LaunchError::UnboundOracle)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deploys_have_one_winner() {
    let launch = setup(low_token(), units(40_000_000)).await;
    let mut tasks = Vec::new();
    for _ in 0..8 {
        let manager = launch.manager.clone();
        tasks.push(tokio::spawn(async move {
            manager.deploy_coin_and_pool(units(100), low_token()).await
        }));
    }

    let mut winners = Vec::new();
    for task in tasks {
        match task.await.unwrap() {
            Ok(handle) => winners.push(handle),
            Err(err) => assert_eq!(err, LaunchError::AlreadyDeployed),
        }
    }
    assert_eq!(winners.len(), 1);
    assert_eq!(launch.manager.get_address_pool().await.unwrap(), winners[0]);
    assert_eq!(launch.registry.pools().await.len(), 1);
}

/// Funds the trader, approves the router and swaps once.
async fn trade(launch: &Launch, token_address: Address, sell: bool, amount: TokenAmount) {
    let trader = addr(TRADER);
    let (token_in, token_out) = if sell {
        launch
            .token
            .mint(addr(DEPLOYER), trader, amount)
            .await
            .unwrap();
        (token_address, launch.weth.address())
    } else {
        launch.weth.deposit(trader, amount).await.unwrap();
        (launch.weth.address(), token_address)
    };
    let ledger = launch.registry.directory().get(token_in).await.unwrap();
    ledger
        .approve(trader, launch.router.account(), amount)
        .await
        .unwrap();

    launch
        .router
        .exact_input_single(
            trader,
            ExactInputSingleParams {
                token_in,
                token_out,
                fee: FeeTier::Medium.pips(),
                recipient: trader,
                deadline: NOW + 600,
                amount_in: amount,
                amount_out_minimum: TokenAmount::zero(),
                sqrt_price_limit_x96: U256::zero(),
            },
        )
        .await
        .unwrap();
}

struct Observation {
    price: Price,
    tick: Tick,
}

async fn observe(launch: &Launch) -> Observation {
    Observation {
        price: launch.oracle.calc_effective_price().await.unwrap(),
        tick: launch.oracle.get_pool_price().await.unwrap().1,
    }
}

fn check_swap_direction(
    token_is_token0: bool,
    sell: bool,
    amount: u128,
) -> std::result::Result<(), TestCaseError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    runtime.block_on(async {
        let token_address = if token_is_token0 { low_token() } else { high_token() };
        let launch = deployed(token_address).await;
        let before = observe(&launch).await;
        trade(&launch, token_address, sell, TokenAmount::from(amount)).await;
        let after = observe(&launch).await;

        if sell {
            prop_assert!(after.price < before.price);
        } else {
            prop_assert!(after.price > before.price);
        }
        // The raw tick follows token1/token0; it moves against the effective
        // price when the listed token is token1.
        let raw_tick_falls = sell == token_is_token0;
        if raw_tick_falls {
            prop_assert!(after.tick <= before.tick);
        } else {
            prop_assert!(after.tick >= before.tick);
        }
        prop_assert!(launch.weth.is_conserved().await);
        prop_assert!(launch.token.is_conserved().await);
        Ok(())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // Sizes are drawn log-uniformly so dust trades are exercised as often as
    // whale trades.
    #[test]
    fn prop_sells_lower_the_price(
        token_is_token0 in any::<bool>(),
        mantissa in 1u128..10,
        exponent in 7u32..24,
    ) {
        check_swap_direction(token_is_token0, true, mantissa * 10u128.pow(exponent))?;
    }

    #[test]
    fn prop_buys_raise_the_price(
        token_is_token0 in any::<bool>(),
        mantissa in 1u128..5,
        exponent in 4u32..20,
    ) {
        check_swap_direction(token_is_token0, false, mantissa * 10u128.pow(exponent))?;
    }
}

#[tokio::test]
async fn test_dust_swaps_move_the_reported_price() {
    // Sizes whose price move is below 1e-18 at the launch price.
    for (token_is_token0, sell, amount) in [
        (true, true, 1_000_000_000_000u128),
        (false, false, 1_000_000u128),
        (true, true, 10_000_000u128),
        (false, false, 10_000u128),
    ] {
        let token_address = if token_is_token0 { low_token() } else { high_token() };
        let launch = deployed(token_address).await;
        let before = observe(&launch).await;
        trade(&launch, token_address, sell, TokenAmount::from(amount)).await;
        let after = observe(&launch).await;

        if sell {
            assert!(after.price < before.price, "sell of {amount} left {}", after.price);
        } else {
            assert!(after.price > before.price, "buy of {amount} left {}", after.price);
        }
    }
}

#[tokio::test]
async fn test_swaps_after_launch_walk_the_price() {
    let launch = deployed(low_token()).await;
    let mut last = observe(&launch).await;
    for (sell, amount) in [
        (true, units(50)),
        (false, TokenAmount::from(20_000_000_000_000_000u64)),
        (true, units(3200)),
        (false, TokenAmount::from(1_280_000_000_000_000_000u64)),
    ] {
        trade(&launch, low_token(), sell, amount).await;
        let next = observe(&launch).await;
        if sell {
            assert!(next.price < last.price);
        } else {
            assert!(next.price > last.price);
        }
        last = next;
    }
    assert_eq!(last.tick.value(), -128743);
}

#[tokio::test]
async fn test_expired_swap_leaves_pool_unchanged() {
    let launch = deployed(low_token()).await;
    let handle = launch.manager.get_address_pool().await.unwrap();
    let before = launch.registry.pool(handle).await.unwrap();

    launch
        .token
        .mint(addr(DEPLOYER), addr(TRADER), units(10))
        .await
        .unwrap();
    launch
        .token
        .approve(addr(TRADER), launch.router.account(), units(10))
        .await
        .unwrap();
    let result = launch
        .router
        .exact_input_single(
            addr(TRADER),
            ExactInputSingleParams {
                token_in: low_token(),
                token_out: launch.weth.address(),
                fee: 3000,
                recipient: addr(TRADER),
                deadline: NOW - 1,
                amount_in: units(10),
                amount_out_minimum: TokenAmount::zero(),
                sqrt_price_limit_x96: U256::zero(),
            },
        )
        .await;
    assert!(matches!(result, Err(LaunchError::DeadlineExpired { .. })));
    assert_eq!(launch.registry.pool(handle).await.unwrap(), before);
    assert_eq!(launch.token.balance_of(addr(TRADER)).await, units(10));
}
