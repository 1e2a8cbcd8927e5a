use super::*;

pub fn get_account_address(address: Address) -> ContractResult<AccountAddress> {
    match address {
        Address::Account(addr) => Ok(addr),
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    }
}

/// Address under which the marketplace holds listed items.
pub fn marketplace_address(ctx: &impl HasReceiveContext) -> Address {
    Address::Contract(ctx.self_address())
}

/// Transfer CCD out of the contract balance.
/// Zero amounts are skipped thereby avoiding unnecessary gas fees.
pub fn pay<S: HasStateApi>(
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    receiver: &AccountAddress,
    amount: Amount,
) -> ContractResult<()> {
    if amount == Amount::zero() {
        return Ok(());
    }

    host.invoke_transfer(receiver, amount)
        .map_err(CustomContractError::from)?;

    Ok(())
}
