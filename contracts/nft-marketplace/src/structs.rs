use super::*;

/// The contract state.
#[derive(Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Account allowed to update the marketplace configuration.
    pub owner: AccountAddress,
    /// Listing fee and fee recipient.
    pub config: MarketConfig,
    /// Id of the most recently created item, `0` when there are none.
    pub last_item_id: u32,
    /// All items ever created, by token id.
    pub items: StateMap<ContractTokenId, MarketItem, S>,
    /// Listing fees kept from cancelled listings, not yet claimed.
    pub retained_fees: Amount,
}

/// Marketplace configuration, passed as the init parameter.
#[derive(Debug, Serialize, SchemaType, Clone, Copy, PartialEq, Eq)]
pub struct MarketConfig {
    /// Amount that must accompany every creation or relisting.
    pub listing_fee: Amount,
    /// Account receiving the listing fees.
    pub fee_recipient: AccountAddress,
}

#[derive(Debug, Serialize, SchemaType, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// Held by the marketplace and available for purchase.
    Listed,
    /// Bought and held by the buyer.
    Sold,
    /// Withdrawn by the seller without a sale.
    Cancelled,
}

/// A minted item together with its current listing.
#[derive(Debug, Serialize, SchemaType, Clone, PartialEq, Eq)]
pub struct MarketItem {
    /// Metadata URI, fixed at creation.
    pub uri: String,
    /// Account that minted the item.
    pub creator: AccountAddress,
    /// Current holder of the item.
    pub owner: Address,
    /// Account receiving the proceeds of the current listing.
    pub seller: AccountAddress,
    /// Asking price.
    pub price: Amount,
    /// Listing fee held by the contract for the current listing.
    pub listing_fee: Amount,
    pub status: ItemStatus,
}

/// Payouts owed after a completed sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub seller: AccountAddress,
    pub proceeds: Amount,
    pub listing_fee: Amount,
}

#[derive(Debug, Serialize, SchemaType)]
pub struct CreateTokenParams {
    /// Metadata URI of the new item.
    pub uri: String,
    /// Asking price of the new item.
    pub price: Amount,
}

#[derive(Debug, Serialize, SchemaType)]
pub struct ResellTokenParams {
    pub item_id: ContractTokenId,
    /// New asking price.
    pub price: Amount,
}

/// An item as returned by the view functions.
#[derive(Debug, Serialize, SchemaType, Clone, PartialEq, Eq)]
pub struct MarketItemView {
    pub item_id: ContractTokenId,
    pub uri: String,
    pub creator: AccountAddress,
    pub owner: Address,
    pub seller: AccountAddress,
    pub price: Amount,
    /// `false` only while the item can be bought.
    pub sold: bool,
    pub status: ItemStatus,
}

#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct ConfigView {
    pub owner: AccountAddress,
    pub listing_fee: Amount,
    pub fee_recipient: AccountAddress,
    pub retained_fees: Amount,
    pub item_count: u32,
}
