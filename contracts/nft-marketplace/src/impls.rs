use super::*;

// Functions for creating, updating and querying the contract state.
impl<S: HasStateApi> State<S> {
    /// Creates a new state with no items.
    pub fn new(
        state_builder: &mut StateBuilder<S>,
        owner: AccountAddress,
        config: MarketConfig,
    ) -> Self {
        Self {
            owner,
            config,
            last_item_id: 0,
            items: state_builder.new_map(),
            retained_fees: Amount::zero(),
        }
    }

    /// Mint a new item and list it for sale with the marketplace as custodian.
    /// Results in an error if the uri is empty, the price is zero or the
    /// attached fee differs from the listing fee.
    pub fn create_item(
        &mut self,
        creator: AccountAddress,
        marketplace: Address,
        params: &CreateTokenParams,
        fee: Amount,
    ) -> ContractResult<ContractTokenId> {
        ensure!(!params.uri.is_empty(), CustomContractError::EmptyUri.into());
        ensure!(
            params.price > Amount::zero(),
            CustomContractError::InvalidPrice.into()
        );
        ensure!(
            fee == self.config.listing_fee,
            CustomContractError::IncorrectFee.into()
        );

        let next_id = self
            .last_item_id
            .checked_add(1)
            .ok_or(CustomContractError::ItemIdOverflow)?;
        let item_id = TokenIdU32(next_id);

        self.items.insert(
            item_id,
            MarketItem {
                uri: params.uri.clone(),
                creator,
                owner: marketplace,
                seller: creator,
                price: params.price,
                listing_fee: fee,
                status: ItemStatus::Listed,
            },
        );
        self.last_item_id = next_id;

        Ok(item_id)
    }

    /// Hand a listed item over to the buyer.
    /// Fails with `UnknownItem` if the item is missing or not listed and with
    /// `IncorrectPayment` unless the payment equals the asking price.
    /// Returns the payouts owed to the seller and the fee recipient.
    pub fn sell(
        &mut self,
        item_id: &ContractTokenId,
        buyer: AccountAddress,
        payment: Amount,
    ) -> ContractResult<Settlement> {
        let mut item = self
            .items
            .get_mut(item_id)
            .filter(|item| item.status == ItemStatus::Listed)
            .ok_or(CustomContractError::UnknownItem)?;

        ensure!(
            payment == item.price,
            CustomContractError::IncorrectPayment.into()
        );

        let settlement = Settlement {
            seller: item.seller,
            proceeds: payment,
            listing_fee: item.listing_fee,
        };

        item.owner = Address::Account(buyer);
        item.status = ItemStatus::Sold;
        item.listing_fee = Amount::zero();

        Ok(settlement)
    }

    /// Put an owned item back on the market at a new price.
    /// Only the current owner can relist, which excludes items that are
    /// still listed since those are held by the marketplace.
    pub fn relist(
        &mut self,
        item_id: &ContractTokenId,
        seller: AccountAddress,
        marketplace: Address,
        price: Amount,
        fee: Amount,
    ) -> ContractResult<()> {
        let listing_fee = self.config.listing_fee;
        let mut item = self
            .items
            .get_mut(item_id)
            .ok_or(CustomContractError::UnknownItem)?;

        ensure!(
            item.owner.matches_account(&seller),
            CustomContractError::NotOwner.into()
        );
        ensure!(
            price > Amount::zero(),
            CustomContractError::InvalidPrice.into()
        );
        ensure!(fee == listing_fee, CustomContractError::IncorrectFee.into());

        item.owner = marketplace;
        item.seller = seller;
        item.price = price;
        item.listing_fee = fee;
        item.status = ItemStatus::Listed;

        Ok(())
    }

    /// Withdraw a listing and return the item to its seller.
    /// The listing fee is not refunded, it is kept as retained fees.
    /// Returns the seller the item was returned to.
    pub fn cancel(
        &mut self,
        item_id: &ContractTokenId,
        sender: &Address,
    ) -> ContractResult<AccountAddress> {
        let mut item = self
            .items
            .get_mut(item_id)
            .ok_or(CustomContractError::UnknownItem)?;

        ensure!(
            sender.matches_account(&item.seller),
            CustomContractError::NotSeller.into()
        );
        ensure!(
            item.status == ItemStatus::Listed,
            CustomContractError::UnknownItem.into()
        );

        let seller = item.seller;
        self.retained_fees += item.listing_fee;

        item.owner = Address::Account(seller);
        item.status = ItemStatus::Cancelled;
        item.listing_fee = Amount::zero();

        Ok(seller)
    }

    /// All items matching `predicate`, in ascending id order.
    pub fn items_where(&self, predicate: impl Fn(&MarketItem) -> bool) -> Vec<MarketItemView> {
        // Walk the id range rather than the map, whose iteration follows
        // the serialized key bytes.
        (1..=self.last_item_id)
            .map(TokenIdU32)
            .filter_map(|item_id| {
                self.items
                    .get(&item_id)
                    .filter(|item| predicate(item))
                    .map(|item| item.as_view(item_id))
            })
            .collect()
    }

    pub fn owner_of(&self, item_id: &ContractTokenId) -> ContractResult<Address> {
        self.items
            .get(item_id)
            .map(|item| item.owner)
            .ok_or(ContractError::InvalidTokenId)
    }

    pub fn token_uri(&self, item_id: &ContractTokenId) -> ContractResult<String> {
        self.items
            .get(item_id)
            .map(|item| item.uri.clone())
            .ok_or(ContractError::InvalidTokenId)
    }

    /// Get the balance of an item for a given address, which is `1` for its
    /// owner and `0` for everyone else.
    /// Results in an error if the item does not exist.
    pub fn balance(
        &self,
        item_id: &ContractTokenId,
        address: &Address,
    ) -> ContractResult<ContractTokenAmount> {
        let owner = self.owner_of(item_id)?;
        Ok(if owner == *address { 1.into() } else { 0.into() })
    }

    fn ensure_owner(&self, sender: &Address) -> ContractResult<()> {
        ensure!(
            sender.matches_account(&self.owner),
            CustomContractError::OnlyContractOwner.into()
        );
        Ok(())
    }

    /// Replace the listing fee, returning the previous one.
    /// Items already listed keep the fee they were listed with.
    pub fn update_listing_fee(&mut self, sender: &Address, fee: Amount) -> ContractResult<Amount> {
        self.ensure_owner(sender)?;
        let previous = self.config.listing_fee;
        self.config.listing_fee = fee;
        Ok(previous)
    }

    pub fn update_fee_recipient(
        &mut self,
        sender: &Address,
        recipient: AccountAddress,
    ) -> ContractResult<()> {
        self.ensure_owner(sender)?;
        self.config.fee_recipient = recipient;
        Ok(())
    }

    /// Reset the retained fees, returning the amount to pay out.
    pub fn take_retained_fees(&mut self, sender: &Address) -> ContractResult<Amount> {
        self.ensure_owner(sender)?;
        let amount = self.retained_fees;
        self.retained_fees = Amount::zero();
        Ok(amount)
    }

    pub fn config_view(&self) -> ConfigView {
        ConfigView {
            owner: self.owner,
            listing_fee: self.config.listing_fee,
            fee_recipient: self.config.fee_recipient,
            retained_fees: self.retained_fees,
            item_count: self.last_item_id,
        }
    }
}

impl MarketItem {
    pub fn as_view(&self, item_id: ContractTokenId) -> MarketItemView {
        MarketItemView {
            item_id,
            uri: self.uri.clone(),
            creator: self.creator,
            owner: self.owner,
            seller: self.seller,
            price: self.price,
            sold: self.status != ItemStatus::Listed,
            status: self.status,
        }
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use test_infrastructure::*;

    const OWNER: AccountAddress = AccountAddress([0u8; 32]);
    const SELLER: AccountAddress = AccountAddress([1u8; 32]);
    const BUYER: AccountAddress = AccountAddress([2u8; 32]);
    const MARKETPLACE: Address = Address::Contract(ContractAddress {
        index: 7,
        subindex: 0,
    });
    const LISTING_FEE: Amount = Amount { micro_ccd: 25_000 };

    fn empty_state(state_builder: &mut TestStateBuilder) -> State<TestStateApi> {
        State::new(
            state_builder,
            OWNER,
            MarketConfig {
                listing_fee: LISTING_FEE,
                fee_recipient: OWNER,
            },
        )
    }

    fn params(price: Amount) -> CreateTokenParams {
        CreateTokenParams {
            uri: String::from("http://sometoken.uri"),
            price,
        }
    }

    #[concordium_test]
    fn test_item_ids_are_sequential() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = empty_state(&mut state_builder);

        for expected in 1..=3 {
            let item_id = state
                .create_item(SELLER, MARKETPLACE, &params(Amount::from_ccd(1)), LISTING_FEE)
                .expect_report("Failed to create item");
            claim_eq!(item_id, TokenIdU32(expected));
        }
        claim_eq!(state.last_item_id, 3);
    }

    #[concordium_test]
    fn test_rejected_creation_keeps_counter() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = empty_state(&mut state_builder);

        let result = state.create_item(SELLER, MARKETPLACE, &params(Amount::zero()), LISTING_FEE);
        claim_eq!(result, Err(CustomContractError::InvalidPrice.into()));

        let result = state.create_item(
            SELLER,
            MARKETPLACE,
            &CreateTokenParams {
                uri: String::new(),
                price: Amount::from_ccd(1),
            },
            LISTING_FEE,
        );
        claim_eq!(result, Err(CustomContractError::EmptyUri.into()));

        claim_eq!(state.last_item_id, 0);
        claim_eq!(state.items.iter().count(), 0, "No item should be stored");
    }

    #[concordium_test]
    fn test_item_id_overflow() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = empty_state(&mut state_builder);
        state.last_item_id = u32::MAX;

        let result = state.create_item(SELLER, MARKETPLACE, &params(Amount::from_ccd(1)), LISTING_FEE);
        claim_eq!(result, Err(CustomContractError::ItemIdOverflow.into()));
    }

    /// Ids above 255 serialize with a different leading byte, the listing
    /// must still come out in numeric order.
    #[concordium_test]
    fn test_items_where_ascending_order() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = empty_state(&mut state_builder);

        for _ in 0..300 {
            state
                .create_item(SELLER, MARKETPLACE, &params(Amount::from_ccd(1)), LISTING_FEE)
                .expect_report("Failed to create item");
        }

        let ids: Vec<u32> = state
            .items_where(|_| true)
            .iter()
            .map(|view| view.item_id.0)
            .collect();
        let expected: Vec<u32> = (1..=300).collect();
        claim_eq!(ids, expected);
    }

    #[concordium_test]
    fn test_sell_settlement() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = empty_state(&mut state_builder);
        let price = Amount::from_ccd(100);
        let item_id = state
            .create_item(SELLER, MARKETPLACE, &params(price), LISTING_FEE)
            .expect_report("Failed to create item");

        let settlement = state
            .sell(&item_id, BUYER, price)
            .expect_report("Failed to sell item");
        claim_eq!(
            settlement,
            Settlement {
                seller: SELLER,
                proceeds: price,
                listing_fee: LISTING_FEE,
            }
        );

        let item = state.items.get(&item_id).expect_report("Item should exist");
        claim_eq!(item.owner, Address::Account(BUYER));
        claim_eq!(item.status, ItemStatus::Sold);
        claim_eq!(item.listing_fee, Amount::zero());
    }

    #[concordium_test]
    fn test_failed_sale_keeps_listing() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = empty_state(&mut state_builder);
        let price = Amount::from_ccd(100);
        let item_id = state
            .create_item(SELLER, MARKETPLACE, &params(price), LISTING_FEE)
            .expect_report("Failed to create item");

        let result = state.sell(&item_id, BUYER, Amount::from_micro_ccd(20));
        claim_eq!(result, Err(CustomContractError::IncorrectPayment.into()));

        let item = state.items.get(&item_id).expect_report("Item should exist");
        claim_eq!(item.owner, MARKETPLACE);
        claim_eq!(item.status, ItemStatus::Listed);
        claim_eq!(item.listing_fee, LISTING_FEE);
    }

    #[concordium_test]
    fn test_cancel_retains_fee() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = empty_state(&mut state_builder);
        let item_id = state
            .create_item(SELLER, MARKETPLACE, &params(Amount::from_ccd(1)), LISTING_FEE)
            .expect_report("Failed to create item");

        let seller = state
            .cancel(&item_id, &Address::Account(SELLER))
            .expect_report("Failed to cancel listing");
        claim_eq!(seller, SELLER);
        claim_eq!(state.retained_fees, LISTING_FEE);

        // A second cancellation finds no listing.
        let result = state.cancel(&item_id, &Address::Account(SELLER));
        claim_eq!(result, Err(CustomContractError::UnknownItem.into()));
        claim_eq!(state.retained_fees, LISTING_FEE);

        let taken = state
            .take_retained_fees(&Address::Account(OWNER))
            .expect_report("Owner should take retained fees");
        claim_eq!(taken, LISTING_FEE);
        claim_eq!(state.retained_fees, Amount::zero());
    }

    #[concordium_test]
    fn test_relist_cancelled_item() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = empty_state(&mut state_builder);
        let item_id = state
            .create_item(SELLER, MARKETPLACE, &params(Amount::from_ccd(1)), LISTING_FEE)
            .expect_report("Failed to create item");
        state
            .cancel(&item_id, &Address::Account(SELLER))
            .expect_report("Failed to cancel listing");

        let result = state.relist(&item_id, SELLER, MARKETPLACE, Amount::from_ccd(2), LISTING_FEE);
        claim_eq!(result, Ok(()));

        let item = state.items.get(&item_id).expect_report("Item should exist");
        claim_eq!(item.owner, MARKETPLACE);
        claim_eq!(item.price, Amount::from_ccd(2));
        claim_eq!(item.status, ItemStatus::Listed);
    }

    #[concordium_test]
    fn test_balance() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = empty_state(&mut state_builder);
        let item_id = state
            .create_item(SELLER, MARKETPLACE, &params(Amount::from_ccd(1)), LISTING_FEE)
            .expect_report("Failed to create item");

        claim_eq!(state.balance(&item_id, &MARKETPLACE), Ok(1.into()));
        claim_eq!(
            state.balance(&item_id, &Address::Account(SELLER)),
            Ok(0.into())
        );
        claim_eq!(
            state.balance(&TokenIdU32(42), &MARKETPLACE),
            Err(ContractError::InvalidTokenId)
        );
    }

    #[concordium_test]
    fn test_config_updates_require_owner() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = empty_state(&mut state_builder);

        let result = state.update_listing_fee(&Address::Account(SELLER), Amount::zero());
        claim_eq!(result, Err(CustomContractError::OnlyContractOwner.into()));
        let result = state.update_fee_recipient(&Address::Account(SELLER), SELLER);
        claim_eq!(result, Err(CustomContractError::OnlyContractOwner.into()));
        claim_eq!(state.config.listing_fee, LISTING_FEE);
        claim_eq!(state.config.fee_recipient, OWNER);

        let previous = state
            .update_listing_fee(&Address::Account(OWNER), Amount::from_ccd(1))
            .expect_report("Owner should update the fee");
        claim_eq!(previous, LISTING_FEE);
        claim_eq!(state.config.listing_fee, Amount::from_ccd(1));
    }
}
