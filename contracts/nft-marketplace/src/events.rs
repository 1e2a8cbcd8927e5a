use super::*;

/// An untagged event of a new item being minted and listed.
#[derive(Debug, Serialize, SchemaType)]
pub struct MarketItemCreatedEvent {
    /// The ID of the new item.
    pub item_id: ContractTokenId,
    /// The account that minted the item.
    pub creator: AccountAddress,
    /// The custodian of the item, which is the marketplace.
    pub owner: Address,
    /// Asking price.
    pub price: Amount,
    /// Always `false` for a new listing.
    pub sold: bool,
}

/// An untagged event of an item being bought.
#[derive(Debug, Serialize, SchemaType)]
pub struct MarketSaleEvent {
    /// The ID of the item being purchased.
    pub item_id: ContractTokenId,
    /// The account receiving the proceeds.
    pub seller: AccountAddress,
    /// The account owning the item after the sale.
    pub buyer: AccountAddress,
    /// Amount paid.
    pub price: Amount,
}

/// An untagged event of an owned item being put up for sale again.
#[derive(Debug, Serialize, SchemaType)]
pub struct ItemRelistedEvent {
    pub item_id: ContractTokenId,
    pub seller: AccountAddress,
    /// New asking price.
    pub price: Amount,
}

/// An untagged event of a listing being withdrawn by its seller.
#[derive(Debug, Serialize, SchemaType)]
pub struct ListingCancelledEvent {
    pub item_id: ContractTokenId,
    pub seller: AccountAddress,
}

#[derive(Debug, Serialize, SchemaType)]
pub struct ListingFeeUpdatedEvent {
    /// Previous listing fee.
    pub from: Amount,
    /// Updated listing fee.
    pub to: Amount,
}

#[derive(Debug, Serialize, SchemaType)]
pub struct FeesClaimedEvent {
    pub recipient: AccountAddress,
    pub amount: Amount,
}

/// Tagged Custom event to be serialized for the event log.
#[derive(Debug)]
pub enum MarketEvent {
    /// Minting and listing an item
    MarketItemCreated(MarketItemCreatedEvent),
    /// Buying an item
    MarketSale(MarketSaleEvent),
    /// Relisting an item
    ItemRelisted(ItemRelistedEvent),
    /// Cancelling a listing
    ListingCancelled(ListingCancelledEvent),
    /// Updating the listing fee
    ListingFeeUpdated(ListingFeeUpdatedEvent),
    /// Updating the fee recipient
    FeeRecipientUpdated(AccountAddress),
    /// Paying out retained fees
    FeesClaimed(FeesClaimedEvent),
}

impl Serial for MarketEvent {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            MarketEvent::MarketItemCreated(event) => {
                out.write_u8(MARKET_ITEM_CREATED_TAG)?;
                event.serial(out)
            }
            MarketEvent::MarketSale(event) => {
                out.write_u8(MARKET_SALE_TAG)?;
                event.serial(out)
            }
            MarketEvent::ItemRelisted(event) => {
                out.write_u8(ITEM_RELISTED_TAG)?;
                event.serial(out)
            }
            MarketEvent::ListingCancelled(event) => {
                out.write_u8(LISTING_CANCELLED_TAG)?;
                event.serial(out)
            }
            MarketEvent::ListingFeeUpdated(event) => {
                out.write_u8(LISTING_FEE_UPDATED_TAG)?;
                event.serial(out)
            }
            MarketEvent::FeeRecipientUpdated(event) => {
                out.write_u8(FEE_RECIPIENT_UPDATED_TAG)?;
                event.serial(out)
            }
            MarketEvent::FeesClaimed(event) => {
                out.write_u8(FEES_CLAIMED_TAG)?;
                event.serial(out)
            }
        }
    }
}

impl Deserial for MarketEvent {
    fn deserial<R: Read>(source: &mut R) -> ParseResult<Self> {
        let tag = source.read_u8()?;
        match tag {
            MARKET_ITEM_CREATED_TAG => {
                MarketItemCreatedEvent::deserial(source).map(MarketEvent::MarketItemCreated)
            }
            MARKET_SALE_TAG => MarketSaleEvent::deserial(source).map(MarketEvent::MarketSale),
            ITEM_RELISTED_TAG => ItemRelistedEvent::deserial(source).map(MarketEvent::ItemRelisted),
            LISTING_CANCELLED_TAG => {
                ListingCancelledEvent::deserial(source).map(MarketEvent::ListingCancelled)
            }
            LISTING_FEE_UPDATED_TAG => {
                ListingFeeUpdatedEvent::deserial(source).map(MarketEvent::ListingFeeUpdated)
            }
            FEE_RECIPIENT_UPDATED_TAG => {
                AccountAddress::deserial(source).map(MarketEvent::FeeRecipientUpdated)
            }
            FEES_CLAIMED_TAG => FeesClaimedEvent::deserial(source).map(MarketEvent::FeesClaimed),
            _ => Err(ParseError::default()),
        }
    }
}

/// CIS-2 transfer of a single item.
pub fn transfer_event(
    item_id: ContractTokenId,
    from: Address,
    to: Address,
) -> Cis2Event<ContractTokenId, ContractTokenAmount> {
    Cis2Event::Transfer(TransferEvent {
        token_id: item_id,
        amount: ContractTokenAmount::from(1),
        from,
        to,
    })
}

/// Metadata URL event pointing at the item uri.
pub fn token_metadata_event(
    item_id: ContractTokenId,
    uri: String,
) -> Cis2Event<ContractTokenId, ContractTokenAmount> {
    Cis2Event::TokenMetadata(TokenMetadataEvent {
        token_id: item_id,
        metadata_url: MetadataUrl {
            url: uri,
            hash: None,
        },
    })
}
