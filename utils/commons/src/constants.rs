/// Tag for the Custom Market Item Created event.
pub const MARKET_ITEM_CREATED_TAG: u8 = u8::MAX - 5;

/// Tag for the Custom Market Sale event.
pub const MARKET_SALE_TAG: u8 = u8::MAX - 6;

/// Tag for the Custom Item Relisted event.
pub const ITEM_RELISTED_TAG: u8 = u8::MAX - 7;

/// Tag for the Custom Listing Cancelled event.
pub const LISTING_CANCELLED_TAG: u8 = u8::MAX - 8;

/// Tag for the Custom Listing Fee Updated event.
pub const LISTING_FEE_UPDATED_TAG: u8 = u8::MAX - 9;

/// Tag for the Custom Fee Recipient Updated event.
pub const FEE_RECIPIENT_UPDATED_TAG: u8 = u8::MAX - 10;

/// Tag for the Custom Fees Claimed event.
pub const FEES_CLAIMED_TAG: u8 = u8::MAX - 11;
