use super::*;

/// The custom errors the contract can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Asking price must be greater than zero (Error code: -4).
    InvalidPrice,
    /// Attached amount differs from the listing fee (Error code: -5).
    IncorrectFee,
    /// Attached amount differs from the asking price (Error code: -6).
    IncorrectPayment,
    /// Item does not exist or is not listed for sale (Error code: -7).
    UnknownItem,
    /// Only the item owner can perform this operation (Error code: -8).
    NotOwner,
    /// Only the item seller can perform this operation (Error code: -9).
    NotSeller,
    /// Only account addresses can trade items (Error code: -10).
    OnlyAccountAddress,
    /// Only the contract owner has access (Error code: -11).
    OnlyContractOwner,
    /// Token URI must not be empty (Error code: -12).
    EmptyUri,
    /// No item ids left to allocate (Error code: -13).
    ItemIdOverflow,
    /// Failed to invoke a transfer (Error code: -14).
    InvokeTransferError,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to transfers to CustomContractError.
impl From<TransferError> for CustomContractError {
    fn from(_te: TransferError) -> Self {
        Self::InvokeTransferError
    }
}

/// Mapping CustomContractError to ContractError
impl From<CustomContractError> for ContractError {
    fn from(c: CustomContractError) -> Self {
        Cis2Error::Custom(c)
    }
}
