use super::*;

/// Initialize the marketplace with its listing fee and fee recipient.
/// The account creating the instance becomes the contract owner.
#[init(contract = "NFTMarketplace", parameter = "MarketConfig")]
fn init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let config: MarketConfig = ctx.parameter_cursor().get()?;

    Ok(State::new(state_builder, ctx.init_origin(), config))
}

/// Mint a new item and list it for sale in one step.
/// The attached amount must equal the listing fee, which is held by the
/// contract until the item sells.
/// Logs `Mint`, `TokenMetadata` and `Transfer` events followed by a
/// `MarketItemCreated` event. Returns the new item id.
///
/// It rejects if:
/// - Sender is a contract address.
/// - It fails to parse the parameter.
/// - The uri is empty.
/// - The price is zero.
/// - The attached amount differs from the listing fee.
/// - Fails to log any of the events.
#[receive(
    contract = "NFTMarketplace",
    name = "createToken",
    parameter = "CreateTokenParams",
    return_value = "ContractTokenId",
    mutable,
    enable_logger,
    payable
)]
fn create_token<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<ContractTokenId> {
    let creator = get_account_address(ctx.sender())?;
    let params: CreateTokenParams = ctx.parameter_cursor().get()?;
    let marketplace = marketplace_address(ctx);

    let item_id = host
        .state_mut()
        .create_item(creator, marketplace, &params, amount)?;

    logger.log(&Cis2Event::Mint(MintEvent {
        token_id: item_id,
        amount: ContractTokenAmount::from(1),
        owner: Address::Account(creator),
    }))?;
    logger.log(&token_metadata_event(item_id, params.uri))?;
    logger.log(&transfer_event(
        item_id,
        Address::Account(creator),
        marketplace,
    ))?;
    logger.log(&MarketEvent::MarketItemCreated(MarketItemCreatedEvent {
        item_id,
        creator,
        owner: marketplace,
        price: params.price,
        sold: false,
    }))?;

    Ok(item_id)
}

/// Buy a listed item for exactly its asking price.
/// The payment goes to the seller and the listing fee held for the item goes
/// to the fee recipient.
///
/// Rejects if:
/// - Sender is a contract address.
/// - It fails to parse the parameter.
/// - The item does not exist or is not listed.
/// - The amount differs from the asking price.
/// - Any of the payouts fails.
#[receive(
    contract = "NFTMarketplace",
    name = "createMarketSale",
    parameter = "ContractTokenId",
    mutable,
    enable_logger,
    payable
)]
fn create_market_sale<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let buyer = get_account_address(ctx.sender())?;
    let item_id: ContractTokenId = ctx.parameter_cursor().get()?;

    let settlement = host.state_mut().sell(&item_id, buyer, amount)?;
    let fee_recipient = host.state().config.fee_recipient;

    pay(host, &settlement.seller, settlement.proceeds)?;
    pay(host, &fee_recipient, settlement.listing_fee)?;

    logger.log(&transfer_event(
        item_id,
        marketplace_address(ctx),
        Address::Account(buyer),
    ))?;
    logger.log(&MarketEvent::MarketSale(MarketSaleEvent {
        item_id,
        seller: settlement.seller,
        buyer,
        price: settlement.proceeds,
    }))?;

    Ok(())
}

/// Put an owned item up for sale again at a new price.
/// The attached amount must equal the listing fee.
///
/// Rejects if:
/// - Sender is a contract address.
/// - It fails to parse the parameter.
/// - The item does not exist.
/// - Sender is not the current owner of the item.
/// - The price is zero.
/// - The attached amount differs from the listing fee.
#[receive(
    contract = "NFTMarketplace",
    name = "resellToken",
    parameter = "ResellTokenParams",
    mutable,
    enable_logger,
    payable
)]
fn resell_token<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let seller = get_account_address(ctx.sender())?;
    let params: ResellTokenParams = ctx.parameter_cursor().get()?;
    let marketplace = marketplace_address(ctx);

    host.state_mut()
        .relist(&params.item_id, seller, marketplace, params.price, amount)?;

    logger.log(&transfer_event(
        params.item_id,
        Address::Account(seller),
        marketplace,
    ))?;
    logger.log(&MarketEvent::ItemRelisted(ItemRelistedEvent {
        item_id: params.item_id,
        seller,
        price: params.price,
    }))?;

    Ok(())
}

/// Withdraw a listing and return the item to its seller.
///
/// No CCD is transferred. The listing fee held for the item is kept as
/// retained fees, see `claimFees`.
///
/// Rejects if:
/// - It fails to parse the parameter.
/// - The item does not exist.
/// - Sender is not the seller of the item.
/// - The item is not listed.
#[receive(
    contract = "NFTMarketplace",
    name = "cancelItemListing",
    parameter = "ContractTokenId",
    mutable,
    enable_logger
)]
fn cancel_item_listing<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let item_id: ContractTokenId = ctx.parameter_cursor().get()?;

    let seller = host.state_mut().cancel(&item_id, &ctx.sender())?;

    logger.log(&transfer_event(
        item_id,
        marketplace_address(ctx),
        Address::Account(seller),
    ))?;
    logger.log(&MarketEvent::ListingCancelled(ListingCancelledEvent {
        item_id,
        seller,
    }))?;

    Ok(())
}

/// View all items currently available for purchase.
#[receive(
    contract = "NFTMarketplace",
    name = "fetchMarketItems",
    return_value = "Vec<MarketItemView>"
)]
fn fetch_market_items<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Vec<MarketItemView>> {
    Ok(host
        .state()
        .items_where(|item| item.status == ItemStatus::Listed))
}

/// View all items owned by the sender.
#[receive(
    contract = "NFTMarketplace",
    name = "fetchPurchasedNFTs",
    return_value = "Vec<MarketItemView>"
)]
fn fetch_purchased_nfts<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Vec<MarketItemView>> {
    let sender = ctx.sender();

    Ok(host.state().items_where(|item| item.owner == sender))
}

/// View all active listings of the sender.
#[receive(
    contract = "NFTMarketplace",
    name = "fetchItemsListed",
    return_value = "Vec<MarketItemView>"
)]
fn fetch_items_listed<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Vec<MarketItemView>> {
    let sender = ctx.sender();

    Ok(host.state().items_where(|item| {
        item.status == ItemStatus::Listed && sender.matches_account(&item.seller)
    }))
}

#[receive(
    contract = "NFTMarketplace",
    name = "getListingPrice",
    return_value = "Amount"
)]
fn get_listing_price<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<Amount> {
    Ok(host.state().config.listing_fee)
}

/// Update the listing fee for future listings.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Sender is not the contract owner.
/// - Fails to log `ListingFeeUpdated` event.
#[receive(
    contract = "NFTMarketplace",
    name = "updateListingPrice",
    parameter = "Amount",
    mutable,
    enable_logger
)]
fn update_listing_price<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let fee: Amount = ctx.parameter_cursor().get()?;

    let previous = host.state_mut().update_listing_fee(&ctx.sender(), fee)?;

    logger.log(&MarketEvent::ListingFeeUpdated(ListingFeeUpdatedEvent {
        from: previous,
        to: fee,
    }))?;

    Ok(())
}

/// Update the account receiving listing fees.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Sender is not the contract owner.
/// - Fails to log `FeeRecipientUpdated` event.
#[receive(
    contract = "NFTMarketplace",
    name = "updateFeeRecipient",
    parameter = "AccountAddress",
    mutable,
    enable_logger
)]
fn update_fee_recipient<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let recipient: AccountAddress = ctx.parameter_cursor().get()?;

    host.state_mut()
        .update_fee_recipient(&ctx.sender(), recipient)?;

    logger.log(&MarketEvent::FeeRecipientUpdated(recipient))?;

    Ok(())
}

/// Send the listing fees retained from cancelled listings to the fee
/// recipient. Does nothing when no fees are retained.
///
/// It rejects if:
/// - Sender is not the contract owner.
/// - The transfer fails.
#[receive(
    contract = "NFTMarketplace",
    name = "claimFees",
    mutable,
    enable_logger
)]
fn claim_fees<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let amount = host.state_mut().take_retained_fees(&ctx.sender())?;
    if amount == Amount::zero() {
        return Ok(());
    }

    let recipient = host.state().config.fee_recipient;
    pay(host, &recipient, amount)?;

    logger.log(&MarketEvent::FeesClaimed(FeesClaimedEvent { recipient, amount }))?;

    Ok(())
}

#[receive(
    contract = "NFTMarketplace",
    name = "viewConfig",
    return_value = "ConfigView"
)]
fn view_config<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ReceiveResult<ConfigView> {
    Ok(host.state().config_view())
}

/// View the current holder of an item.
#[receive(
    contract = "NFTMarketplace",
    name = "ownerOf",
    parameter = "ContractTokenId",
    return_value = "Address"
)]
fn owner_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Address> {
    let item_id: ContractTokenId = ctx.parameter_cursor().get()?;

    host.state().owner_of(&item_id)
}

/// View the metadata uri of an item.
#[receive(
    contract = "NFTMarketplace",
    name = "tokenURI",
    parameter = "ContractTokenId",
    return_value = "String"
)]
fn token_uri<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<String> {
    let item_id: ContractTokenId = ctx.parameter_cursor().get()?;

    host.state().token_uri(&item_id)
}

/// Get the balance of given token IDs and addresses.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Any of the queried `token_id` does not exist.
#[receive(
    contract = "NFTMarketplace",
    name = "balanceOf",
    parameter = "ContractBalanceOfQueryParams",
    return_value = "ContractBalanceOfQueryResponse"
)]
fn balance_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<ContractBalanceOfQueryResponse> {
    // Parse the parameter.
    let params: ContractBalanceOfQueryParams = ctx.parameter_cursor().get()?;
    // Build the response.
    let mut response = Vec::with_capacity(params.queries.len());
    let state = host.state();
    for query in params.queries {
        // Query the state for balance.
        let amount = state.balance(&query.token_id, &query.address)?;
        response.push(amount);
    }

    Ok(ContractBalanceOfQueryResponse::from(response))
}

/// Get the metadata URLs of given token IDs.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Any of the queried `token_id` does not exist.
#[receive(
    contract = "NFTMarketplace",
    name = "tokenMetadata",
    parameter = "ContractTokenMetadataQueryParams",
    return_value = "TokenMetadataQueryResponse"
)]
fn token_metadata<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<TokenMetadataQueryResponse> {
    let params: ContractTokenMetadataQueryParams = ctx.parameter_cursor().get()?;
    let mut response = Vec::with_capacity(params.queries.len());
    let state = host.state();
    for token_id in params.queries {
        let url = state.token_uri(&token_id)?;
        response.push(MetadataUrl { url, hash: None });
    }

    Ok(TokenMetadataQueryResponse::from(response))
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use test_infrastructure::*;

    const OWNER: AccountAddress = AccountAddress([0u8; 32]);
    const SELLER: AccountAddress = AccountAddress([1u8; 32]);
    const BUYER: AccountAddress = AccountAddress([2u8; 32]);
    const FEE_RECIPIENT: AccountAddress = AccountAddress([3u8; 32]);
    const MARKETPLACE_CONTRACT: ContractAddress = ContractAddress {
        index: 10,
        subindex: 0,
    };
    const MARKETPLACE: Address = Address::Contract(MARKETPLACE_CONTRACT);

    const LISTING_FEE: Amount = Amount { micro_ccd: 25_000 };
    const AUCTION_PRICE: Amount = Amount {
        micro_ccd: 100_000_000,
    };
    const TOKEN_URI: &str = "http://sometoken.uri";

    fn default_host() -> TestHost<State<TestStateApi>> {
        let mut ctx = TestInitContext::empty();
        let config = MarketConfig {
            listing_fee: LISTING_FEE,
            fee_recipient: FEE_RECIPIENT,
        };
        let bytes = to_bytes(&config);
        ctx.set_init_origin(OWNER).set_parameter(&bytes);
        let mut state_builder = TestStateBuilder::new();

        let state =
            init(&ctx, &mut state_builder).expect_report("Failed during init_NFTMarketplace");

        let mut host = TestHost::new(state, state_builder);
        host.set_self_balance(Amount::from_ccd(10_000));
        host
    }

    fn receive_ctx(sender: Address, parameter: &[u8]) -> TestReceiveContext<'_> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(sender)
            .set_self_address(MARKETPLACE_CONTRACT)
            .set_parameter(parameter);
        ctx
    }

    fn mint_and_list(
        host: &mut TestHost<State<TestStateApi>>,
        creator: AccountAddress,
        price: Amount,
        fee: Amount,
    ) -> ContractResult<ContractTokenId> {
        let bytes = to_bytes(&CreateTokenParams {
            uri: String::from(TOKEN_URI),
            price,
        });
        let ctx = receive_ctx(Address::Account(creator), &bytes);
        let mut logger = TestLogger::init();

        create_token(&ctx, host, fee, &mut logger)
    }

    fn buy(
        host: &mut TestHost<State<TestStateApi>>,
        buyer: AccountAddress,
        item_id: ContractTokenId,
        payment: Amount,
    ) -> ContractResult<()> {
        let bytes = to_bytes(&item_id);
        let ctx = receive_ctx(Address::Account(buyer), &bytes);
        let mut logger = TestLogger::init();

        create_market_sale(&ctx, host, payment, &mut logger)
    }

    fn resell(
        host: &mut TestHost<State<TestStateApi>>,
        seller: AccountAddress,
        item_id: ContractTokenId,
        price: Amount,
        fee: Amount,
    ) -> ContractResult<()> {
        let bytes = to_bytes(&ResellTokenParams { item_id, price });
        let ctx = receive_ctx(Address::Account(seller), &bytes);
        let mut logger = TestLogger::init();

        resell_token(&ctx, host, fee, &mut logger)
    }

    fn cancel(
        host: &mut TestHost<State<TestStateApi>>,
        sender: AccountAddress,
        item_id: ContractTokenId,
    ) -> ContractResult<()> {
        let bytes = to_bytes(&item_id);
        let ctx = receive_ctx(Address::Account(sender), &bytes);
        let mut logger = TestLogger::init();

        cancel_item_listing(&ctx, host, &mut logger)
    }

    fn owner(host: &TestHost<State<TestStateApi>>, item_id: ContractTokenId) -> Address {
        let bytes = to_bytes(&item_id);
        let ctx = receive_ctx(Address::Account(OWNER), &bytes);

        owner_of(&ctx, host).expect_report("Item is expected to exist")
    }

    fn market_items(host: &TestHost<State<TestStateApi>>) -> Vec<MarketItemView> {
        let ctx = receive_ctx(Address::Account(OWNER), &[]);

        fetch_market_items(&ctx, host).expect_report("Failed to fetch market items")
    }

    /// Test initialization stores the configuration and the owner.
    #[concordium_test]
    fn test_init() {
        let host = default_host();
        let ctx = receive_ctx(Address::Account(SELLER), &[]);

        let config = view_config(&ctx, &host).expect_report("Failed to view config");
        claim_eq!(
            config,
            ConfigView {
                owner: OWNER,
                listing_fee: LISTING_FEE,
                fee_recipient: FEE_RECIPIENT,
                retained_fees: Amount::zero(),
                item_count: 0,
            }
        );

        let listing_price =
            get_listing_price(&ctx, &host).expect_report("Failed to get listing price");
        claim_eq!(listing_price, LISTING_FEE);
    }

    #[concordium_test]
    fn test_create_token_zero_price() {
        let mut host = default_host();

        let result = mint_and_list(&mut host, SELLER, Amount::zero(), LISTING_FEE);

        claim_eq!(result, Err(CustomContractError::InvalidPrice.into()));
        claim_eq!(market_items(&host).len(), 0);
    }

    #[concordium_test]
    fn test_create_token_incorrect_fee() {
        let mut host = default_host();

        let result = mint_and_list(&mut host, SELLER, AUCTION_PRICE, Amount::zero());
        claim_eq!(result, Err(CustomContractError::IncorrectFee.into()));

        let result = mint_and_list(
            &mut host,
            SELLER,
            AUCTION_PRICE,
            LISTING_FEE + Amount::from_micro_ccd(1),
        );
        claim_eq!(result, Err(CustomContractError::IncorrectFee.into()));

        claim_eq!(market_items(&host).len(), 0);
    }

    #[concordium_test]
    fn test_create_token_from_contract() {
        let mut host = default_host();
        let bytes = to_bytes(&CreateTokenParams {
            uri: String::from(TOKEN_URI),
            price: AUCTION_PRICE,
        });
        let ctx = receive_ctx(Address::Contract(MARKETPLACE_CONTRACT), &bytes);
        let mut logger = TestLogger::init();

        let result = create_token(&ctx, &mut host, LISTING_FEE, &mut logger);

        claim_eq!(result, Err(CustomContractError::OnlyAccountAddress.into()));
        claim!(logger.logs.is_empty(), "No event should be logged");
    }

    /// The new item is held by the marketplace and keeps its uri.
    #[concordium_test]
    fn test_create_token_owner_and_uri() {
        let mut host = default_host();

        let item_id = mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        claim_eq!(item_id, TokenIdU32(1));
        claim_eq!(owner(&host, item_id), MARKETPLACE);

        let bytes = to_bytes(&item_id);
        let ctx = receive_ctx(Address::Account(BUYER), &bytes);
        let uri = token_uri(&ctx, &host).expect_report("Item is expected to exist");
        claim_eq!(uri, String::from(TOKEN_URI));
    }

    #[concordium_test]
    fn test_create_token_events() {
        let mut host = default_host();
        let bytes = to_bytes(&CreateTokenParams {
            uri: String::from(TOKEN_URI),
            price: AUCTION_PRICE,
        });
        let ctx = receive_ctx(Address::Account(SELLER), &bytes);
        let mut logger = TestLogger::init();

        let item_id = create_token(&ctx, &mut host, LISTING_FEE, &mut logger)
            .expect_report("Failed to create token");

        claim_eq!(logger.logs.len(), 4, "Four events should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&Cis2Event::Mint(MintEvent {
                token_id: item_id,
                amount: ContractTokenAmount::from(1),
                owner: Address::Account(SELLER),
            })),
            "Incorrect mint event emitted"
        );
        claim_eq!(
            logger.logs[1],
            to_bytes(&token_metadata_event(item_id, String::from(TOKEN_URI))),
            "Incorrect metadata event emitted"
        );
        claim_eq!(
            logger.logs[2],
            to_bytes(&transfer_event(item_id, Address::Account(SELLER), MARKETPLACE)),
            "Incorrect transfer event emitted"
        );
        claim_eq!(
            logger.logs[3],
            to_bytes(&MarketEvent::MarketItemCreated(MarketItemCreatedEvent {
                item_id,
                creator: SELLER,
                owner: MARKETPLACE,
                price: AUCTION_PRICE,
                sold: false,
            })),
            "Incorrect market item created event emitted"
        );
    }

    #[concordium_test]
    fn test_sale_incorrect_payment() {
        let mut host = default_host();
        let item_id = mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");

        let result = buy(&mut host, BUYER, item_id, Amount::from_micro_ccd(20));

        claim_eq!(result, Err(CustomContractError::IncorrectPayment.into()));
        claim_eq!(owner(&host, item_id), MARKETPLACE);
        claim!(!host.transfer_occurred(&SELLER, Amount::from_micro_ccd(20)));
    }

    #[concordium_test]
    fn test_sale_unknown_item() {
        let mut host = default_host();

        let result = buy(&mut host, BUYER, TokenIdU32(1), AUCTION_PRICE);

        claim_eq!(result, Err(CustomContractError::UnknownItem.into()));
    }

    /// Buying moves the item to the buyer and pays the seller and the fee
    /// recipient. The same item cannot be bought twice.
    #[concordium_test]
    fn test_sale() {
        let mut host = default_host();
        let item_id = mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        claim_eq!(owner(&host, item_id), MARKETPLACE);

        let bytes = to_bytes(&item_id);
        let ctx = receive_ctx(Address::Account(BUYER), &bytes);
        let mut logger = TestLogger::init();
        let result = create_market_sale(&ctx, &mut host, AUCTION_PRICE, &mut logger);

        claim_eq!(result, Ok(()));
        claim_eq!(owner(&host, item_id), Address::Account(BUYER));
        claim!(host.transfer_occurred(&SELLER, AUCTION_PRICE));
        claim!(host.transfer_occurred(&FEE_RECIPIENT, LISTING_FEE));
        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&transfer_event(item_id, MARKETPLACE, Address::Account(BUYER))),
                to_bytes(&MarketEvent::MarketSale(MarketSaleEvent {
                    item_id,
                    seller: SELLER,
                    buyer: BUYER,
                    price: AUCTION_PRICE,
                })),
            ]
        );

        let result = buy(&mut host, BUYER, item_id, AUCTION_PRICE);
        claim_eq!(result, Err(CustomContractError::UnknownItem.into()));
        claim_eq!(owner(&host, item_id), Address::Account(BUYER));
    }

    #[concordium_test]
    fn test_resell_not_owner_or_incorrect_fee() {
        let mut host = default_host();
        let item_id = mint_and_list(&mut host, OWNER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        buy(&mut host, BUYER, item_id, AUCTION_PRICE).expect_report("Failed to buy token");

        let result = resell(&mut host, OWNER, item_id, AUCTION_PRICE, LISTING_FEE);
        claim_eq!(result, Err(CustomContractError::NotOwner.into()));

        let result = resell(&mut host, BUYER, item_id, AUCTION_PRICE, Amount::zero());
        claim_eq!(result, Err(CustomContractError::IncorrectFee.into()));

        claim_eq!(owner(&host, item_id), Address::Account(BUYER));
    }

    #[concordium_test]
    fn test_resell_zero_price() {
        let mut host = default_host();
        let item_id = mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        buy(&mut host, BUYER, item_id, AUCTION_PRICE).expect_report("Failed to buy token");

        let bytes = to_bytes(&ResellTokenParams {
            item_id,
            price: Amount::zero(),
        });
        let ctx = receive_ctx(Address::Account(BUYER), &bytes);
        let mut logger = TestLogger::init();
        let result = resell_token(&ctx, &mut host, LISTING_FEE, &mut logger);

        claim_eq!(result, Err(CustomContractError::InvalidPrice.into()));
        claim!(logger.logs.is_empty(), "No event should be logged");
        claim_eq!(owner(&host, item_id), Address::Account(BUYER));
        claim_eq!(market_items(&host).len(), 0);

        let ctx = receive_ctx(Address::Account(BUYER), &[]);
        let purchased =
            fetch_purchased_nfts(&ctx, &host).expect_report("Failed to fetch purchased items");
        claim_eq!(purchased.len(), 1);
        claim_eq!(purchased[0].status, ItemStatus::Sold);
        claim_eq!(purchased[0].price, AUCTION_PRICE);
    }

    /// A listed item is held by the marketplace, so nobody can resell it.
    #[concordium_test]
    fn test_resell_listed_item() {
        let mut host = default_host();
        let item_id = mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");

        let result = resell(&mut host, SELLER, item_id, AUCTION_PRICE, LISTING_FEE);

        claim_eq!(result, Err(CustomContractError::NotOwner.into()));
    }

    #[concordium_test]
    fn test_buy_and_resell() {
        let mut host = default_host();
        let item_id = mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        buy(&mut host, BUYER, item_id, AUCTION_PRICE).expect_report("Failed to buy token");
        claim_eq!(owner(&host, item_id), Address::Account(BUYER));
        claim_eq!(market_items(&host).len(), 0);

        let result = resell(&mut host, BUYER, item_id, AUCTION_PRICE, LISTING_FEE);

        claim_eq!(result, Ok(()));
        claim_eq!(owner(&host, item_id), MARKETPLACE);

        let items = market_items(&host);
        claim_eq!(items.len(), 1);
        claim_eq!(items[0].seller, BUYER);
        claim_eq!(items[0].creator, SELLER);
        claim!(!items[0].sold, "Relisted item should be for sale");
    }

    #[concordium_test]
    fn test_fetch_market_items() {
        let mut host = default_host();
        let first = mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");

        claim_eq!(market_items(&host).len(), 3);

        buy(&mut host, BUYER, first, AUCTION_PRICE).expect_report("Failed to buy token");

        let ids: Vec<ContractTokenId> = market_items(&host)
            .iter()
            .map(|item| item.item_id)
            .collect();
        claim_eq!(ids, vec![TokenIdU32(2), TokenIdU32(3)]);
    }

    #[concordium_test]
    fn test_fetch_purchased_nfts() {
        let mut host = default_host();
        let item_id = mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        buy(&mut host, BUYER, item_id, AUCTION_PRICE).expect_report("Failed to buy token");

        let ctx = receive_ctx(Address::Account(BUYER), &[]);
        let purchased =
            fetch_purchased_nfts(&ctx, &host).expect_report("Failed to fetch purchased items");

        claim_eq!(purchased.len(), 1);
        claim_eq!(purchased[0].item_id, item_id);
        claim!(purchased[0].sold, "Purchased item should be sold");
        claim_eq!(purchased[0].status, ItemStatus::Sold);
    }

    #[concordium_test]
    fn test_fetch_items_listed() {
        let mut host = default_host();
        mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        mint_and_list(&mut host, BUYER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");

        let ctx = receive_ctx(Address::Account(SELLER), &[]);
        let listed = fetch_items_listed(&ctx, &host).expect_report("Failed to fetch listings");

        claim_eq!(listed.len(), 2);
        claim!(listed.iter().all(|item| item.seller == SELLER));
    }

    /// Cancelling returns the item to the seller without moving any CCD.
    #[concordium_test]
    fn test_cancel_listing() {
        let mut host = default_host();
        let item_id = mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        mint_and_list(&mut host, BUYER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        mint_and_list(&mut host, BUYER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        claim_eq!(market_items(&host).len(), 3);
        let transfers_before = host.get_transfers().len();
        let balance_before = host.self_balance();

        let result = cancel(&mut host, SELLER, item_id);

        claim_eq!(result, Ok(()));
        claim_eq!(market_items(&host).len(), 2);
        claim_eq!(owner(&host, item_id), Address::Account(SELLER));
        claim_eq!(
            host.get_transfers().len(),
            transfers_before,
            "Cancelling should not transfer any CCD"
        );
        claim_eq!(host.self_balance(), balance_before);
        claim_eq!(host.state().retained_fees, LISTING_FEE);

        let ctx = receive_ctx(Address::Account(SELLER), &[]);
        let listed = fetch_items_listed(&ctx, &host).expect_report("Failed to fetch listings");
        claim_eq!(listed.len(), 0);
    }

    #[concordium_test]
    fn test_cancel_not_seller() {
        let mut host = default_host();
        let item_id = mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");

        let result = cancel(&mut host, BUYER, item_id);

        claim_eq!(result, Err(CustomContractError::NotSeller.into()));
        claim_eq!(market_items(&host).len(), 1);
        claim_eq!(owner(&host, item_id), MARKETPLACE);
    }

    #[concordium_test]
    fn test_cancel_sold_item() {
        let mut host = default_host();
        let item_id = mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        buy(&mut host, BUYER, item_id, AUCTION_PRICE).expect_report("Failed to buy token");

        let result = cancel(&mut host, SELLER, item_id);

        claim_eq!(result, Err(CustomContractError::UnknownItem.into()));
        claim_eq!(owner(&host, item_id), Address::Account(BUYER));
    }

    /// Changing the fee applies to new listings, existing listings forward the
    /// fee they paid.
    #[concordium_test]
    fn test_update_listing_price() {
        let mut host = default_host();
        let new_fee = Amount::from_ccd(1);
        let item_id = mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");

        let bytes = to_bytes(&new_fee);
        let ctx = receive_ctx(Address::Account(SELLER), &bytes);
        let mut logger = TestLogger::init();
        let result = update_listing_price(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::OnlyContractOwner.into()));

        let ctx = receive_ctx(Address::Account(OWNER), &bytes);
        let result = update_listing_price(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));
        claim_eq!(
            logger.logs,
            vec![to_bytes(&MarketEvent::ListingFeeUpdated(
                ListingFeeUpdatedEvent {
                    from: LISTING_FEE,
                    to: new_fee,
                }
            ))]
        );

        let result = mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE);
        claim_eq!(result, Err(CustomContractError::IncorrectFee.into()));
        mint_and_list(&mut host, SELLER, AUCTION_PRICE, new_fee)
            .expect_report("Failed to create token with the new fee");

        buy(&mut host, BUYER, item_id, AUCTION_PRICE).expect_report("Failed to buy token");
        claim!(host.transfer_occurred(&FEE_RECIPIENT, LISTING_FEE));
    }

    #[concordium_test]
    fn test_update_fee_recipient() {
        let mut host = default_host();
        let bytes = to_bytes(&BUYER);
        let mut logger = TestLogger::init();

        let ctx = receive_ctx(Address::Account(BUYER), &bytes);
        let result = update_fee_recipient(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::OnlyContractOwner.into()));

        let ctx = receive_ctx(Address::Account(OWNER), &bytes);
        let result = update_fee_recipient(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));
        claim_eq!(host.state().config.fee_recipient, BUYER);
        claim_eq!(
            logger.logs,
            vec![to_bytes(&MarketEvent::FeeRecipientUpdated(BUYER))]
        );
    }

    #[concordium_test]
    fn test_claim_fees() {
        let mut host = default_host();
        let item_id = mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        cancel(&mut host, SELLER, item_id).expect_report("Failed to cancel listing");

        let mut logger = TestLogger::init();
        let ctx = receive_ctx(Address::Account(SELLER), &[]);
        let result = claim_fees(&ctx, &mut host, &mut logger);
        claim_eq!(result, Err(CustomContractError::OnlyContractOwner.into()));

        let ctx = receive_ctx(Address::Account(OWNER), &[]);
        let result = claim_fees(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));
        claim!(host.transfer_occurred(&FEE_RECIPIENT, LISTING_FEE));
        claim_eq!(host.state().retained_fees, Amount::zero());
        claim_eq!(
            logger.logs,
            vec![to_bytes(&MarketEvent::FeesClaimed(FeesClaimedEvent {
                recipient: FEE_RECIPIENT,
                amount: LISTING_FEE,
            }))]
        );

        // Nothing left to claim.
        let result = claim_fees(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()));
        claim_eq!(logger.logs.len(), 1);
    }

    #[concordium_test]
    fn test_balance_of_and_token_metadata() {
        let mut host = default_host();
        let item_id = mint_and_list(&mut host, SELLER, AUCTION_PRICE, LISTING_FEE)
            .expect_report("Failed to create token");
        buy(&mut host, BUYER, item_id, AUCTION_PRICE).expect_report("Failed to buy token");

        let params = ContractBalanceOfQueryParams {
            queries: vec![
                BalanceOfQuery {
                    token_id: item_id,
                    address: Address::Account(BUYER),
                },
                BalanceOfQuery {
                    token_id: item_id,
                    address: MARKETPLACE,
                },
            ],
        };
        let bytes = to_bytes(&params);
        let ctx = receive_ctx(Address::Account(OWNER), &bytes);
        let balances = balance_of(&ctx, &host).expect_report("Failed to query balances");
        claim_eq!(
            to_bytes(&balances),
            to_bytes(&ContractBalanceOfQueryResponse::from(vec![
                ContractTokenAmount::from(1),
                ContractTokenAmount::from(0),
            ]))
        );

        let params = ContractTokenMetadataQueryParams {
            queries: vec![item_id],
        };
        let bytes = to_bytes(&params);
        let ctx = receive_ctx(Address::Account(OWNER), &bytes);
        let metadata = token_metadata(&ctx, &host).expect_report("Failed to query metadata");
        claim_eq!(
            to_bytes(&metadata),
            to_bytes(&TokenMetadataQueryResponse::from(vec![MetadataUrl {
                url: String::from(TOKEN_URI),
                hash: None,
            }]))
        );

        let params = ContractTokenMetadataQueryParams {
            queries: vec![TokenIdU32(2)],
        };
        let bytes = to_bytes(&params);
        let ctx = receive_ctx(Address::Account(OWNER), &bytes);
        let result = token_metadata(&ctx, &host);
        claim!(result.is_err(), "Unknown token should be rejected");
    }
}
